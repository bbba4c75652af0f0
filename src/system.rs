use crate::bus::{Bus, BusError};
use crate::cpu::{Cpu, Registers, RESET_VECTOR};

/// A CPU wired to its memory. Owns both; observers borrow through
/// `bus()` and `cpu()`.
pub struct System {
    bus: Bus,
    cpu: Cpu,
}

impl System {
    pub fn new() -> Self {
        System {
            bus: Bus::new(),
            cpu: Cpu::new(),
        }
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn registers(&self) -> Registers {
        self.cpu.registers()
    }

    /// Loads a program image and aims the reset vector at it, unless the
    /// image writes either vector byte itself.
    pub fn load_program(&mut self, origin: u16, image: &[u8]) -> Result<(), BusError> {
        self.bus.load(origin, image)?;

        let end = origin as u32 + image.len() as u32;
        let covers_vector = (origin as u32) <= RESET_VECTOR as u32 + 1 && end > RESET_VECTOR as u32;
        if !covers_vector {
            self.bus.load(RESET_VECTOR, &origin.to_le_bytes())?;
        }

        let vec_lo = self.bus.read(RESET_VECTOR);
        let vec_hi = self.bus.read(RESET_VECTOR + 1);
        log::info!(
            "Reset vector bytes: 0x{:02X} 0x{:02X} => PC: 0x{:04X}",
            vec_lo,
            vec_hi,
            (vec_hi as u16) << 8 | vec_lo as u16
        );
        Ok(())
    }

    pub fn reset(&mut self) {
        self.cpu.reset(&self.bus);
    }

    pub fn tick(&mut self) {
        self.cpu.tick(&mut self.bus);
    }

    /// Runs one whole instruction and returns the cycles it took.
    pub fn step(&mut self) -> u32 {
        self.cpu.step(&mut self.bus)
    }

    pub fn irq(&mut self) {
        self.cpu.irq(&mut self.bus);
    }

    pub fn nmi(&mut self) {
        self.cpu.nmi(&mut self.bus);
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}
