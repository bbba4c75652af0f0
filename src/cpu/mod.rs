//! 6502 instruction engine with decimal mode disabled.
//!
//! Each instruction runs in one go on the tick that fetches it; the remaining
//! ticks only count down the cycles it costs.

mod opcodes;

use std::fmt;

use bitflags::bitflags;

use crate::bus::Bus;

pub use self::opcodes::{lookup, AddrMode, Instruction, Operation, LOOKUP};

pub const STACK_BASE: u16 = 0x0100;
pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        const CARRY = 0b00000001;
        const ZERO = 0b00000010;
        const INTERRUPT = 0b00000100;
        const DECIMAL = 0b00001000;
        const BREAK = 0b00010000;
        const UNUSED = 0b00100000;
        const OVERFLOW = 0b01000000;
        const NEGATIVE = 0b10000000;
    }
}

/// Read-only copy of the programmer-visible registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: Status,
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LETTERS: [(Status, char); 8] = [
            (Status::NEGATIVE, 'N'),
            (Status::OVERFLOW, 'V'),
            (Status::UNUSED, '-'),
            (Status::BREAK, 'B'),
            (Status::DECIMAL, 'D'),
            (Status::INTERRUPT, 'I'),
            (Status::ZERO, 'Z'),
            (Status::CARRY, 'C'),
        ];
        let flags: String = LETTERS
            .iter()
            .map(|&(flag, letter)| if self.status.contains(flag) { letter } else { '-' })
            .collect();

        write!(
            f,
            "PC:${:04X} A:${:02X} X:${:02X} Y:${:02X} SP:${:02X} P:{}",
            self.pc, self.a, self.x, self.y, self.sp, flags
        )
    }
}

pub struct Cpu {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    pc: u16,
    status: Status,

    // Scratch state for the instruction being decoded.
    addr_abs: u16,
    addr_rel: u16,
    fetched: u8,
    opcode: u8,
    cycles: u8,

    clock_count: u64,
    nmi_pending: bool,
    irq_pending: bool,
}

impl Cpu {
    pub fn new() -> Self {
        Cpu {
            a: 0,
            x: 0,
            y: 0,
            sp: 0,
            pc: 0,
            status: Status::empty(),
            addr_abs: 0,
            addr_rel: 0,
            fetched: 0,
            opcode: 0,
            cycles: 0,
            clock_count: 0,
            nmi_pending: false,
            irq_pending: false,
        }
    }

    pub fn reset(&mut self, bus: &Bus) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.status = Status::UNUSED;
        self.pc = Self::read_word(bus, RESET_VECTOR);

        self.addr_abs = 0;
        self.addr_rel = 0;
        self.fetched = 0;
        self.nmi_pending = false;
        self.irq_pending = false;
        self.cycles = 8;

        log::info!("Reset CPU, PC set to: 0x{:04X}", self.pc);
    }

    /// Advances the CPU by one clock cycle.
    ///
    /// On an instruction boundary this services a latched interrupt or
    /// fetches and executes the next instruction in full.
    pub fn tick(&mut self, bus: &mut Bus) {
        if self.cycles == 0 && !self.service_pending(bus) {
            self.execute_next(bus);
        }

        self.cycles -= 1;
        self.clock_count += 1;
    }

    /// Ticks until the work in flight has used up its cycles. Returns the
    /// number of ticks taken.
    pub fn complete(&mut self, bus: &mut Bus) -> u32 {
        let mut ticks = 0;
        loop {
            self.tick(bus);
            ticks += 1;
            if self.cycles == 0 {
                return ticks;
            }
        }
    }

    /// Runs exactly one instruction (or interrupt entry) from the next
    /// boundary and returns the cycles it cost.
    pub fn step(&mut self, bus: &mut Bus) -> u32 {
        if self.cycles != 0 {
            self.complete(bus);
        }
        self.complete(bus)
    }

    /// Maskable interrupt request. Taken at the next instruction boundary
    /// unless the I flag is set at that point. Queues behind a waiting NMI.
    pub fn irq(&mut self, bus: &mut Bus) {
        if self.cycles != 0 || self.nmi_pending {
            log::debug!("IRQ latched until instruction boundary");
            self.irq_pending = true;
            return;
        }
        self.enter_irq(bus);
    }

    /// Non-maskable interrupt request, taken at the next instruction boundary.
    pub fn nmi(&mut self, bus: &mut Bus) {
        if self.cycles != 0 {
            log::debug!("NMI latched until instruction boundary");
            self.nmi_pending = true;
            return;
        }
        self.enter_nmi(bus);
    }

    pub fn registers(&self) -> Registers {
        Registers {
            a: self.a,
            x: self.x,
            y: self.y,
            sp: self.sp,
            pc: self.pc,
            status: self.status,
        }
    }

    /// Cycles left before the next fetch.
    pub fn cycles(&self) -> u8 {
        self.cycles
    }

    pub fn clock_count(&self) -> u64 {
        self.clock_count
    }

    pub fn is_complete(&self) -> bool {
        self.cycles == 0
    }

    fn service_pending(&mut self, bus: &mut Bus) -> bool {
        if self.nmi_pending {
            self.nmi_pending = false;
            self.enter_nmi(bus);
            return true;
        }
        if self.irq_pending {
            self.irq_pending = false;
            return self.enter_irq(bus);
        }
        false
    }

    fn enter_irq(&mut self, bus: &mut Bus) -> bool {
        if self.status.contains(Status::INTERRUPT) {
            log::debug!("IRQ masked at PC: 0x{:04X}", self.pc);
            return false;
        }
        log::debug!("IRQ at PC: 0x{:04X}", self.pc);
        self.interrupt(bus, IRQ_VECTOR);
        self.cycles = 7;
        true
    }

    fn enter_nmi(&mut self, bus: &mut Bus) {
        log::debug!("NMI at PC: 0x{:04X}", self.pc);
        self.interrupt(bus, NMI_VECTOR);
        self.cycles = 8;
    }

    fn interrupt(&mut self, bus: &mut Bus, vector: u16) {
        self.push_word(bus, self.pc);
        let pushed = (self.status - Status::BREAK) | Status::UNUSED;
        self.push(bus, pushed.bits());
        self.status.insert(Status::INTERRUPT);
        self.pc = Self::read_word(bus, vector);
    }

    fn execute_next(&mut self, bus: &mut Bus) {
        let opcode_pc = self.pc;
        self.opcode = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);

        let ins = lookup(self.opcode);
        log::trace!("PC: 0x{:04X}, Op: 0x{:02X} {}", opcode_pc, self.opcode, ins.name);

        self.cycles = ins.cycles;
        let extra_addr = self.resolve_address(bus, ins.mode);
        let extra_op = self.execute(bus, ins.op);
        self.cycles += extra_addr & extra_op;
    }

    fn read_word(bus: &Bus, addr: u16) -> u16 {
        let lo = bus.read(addr) as u16;
        let hi = bus.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    fn next_byte(&mut self, bus: &Bus) -> u8 {
        let value = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    fn next_word(&mut self, bus: &Bus) -> u16 {
        let lo = self.next_byte(bus) as u16;
        let hi = self.next_byte(bus) as u16;
        (hi << 8) | lo
    }

    fn page_crossed(addr1: u16, addr2: u16) -> bool {
        (addr1 & 0xFF00) != (addr2 & 0xFF00)
    }

    /// Works out the operand location for `mode`, consuming operand bytes.
    /// Returns 1 when the mode may cost an extra cycle.
    fn resolve_address(&mut self, bus: &Bus, mode: AddrMode) -> u8 {
        match mode {
            AddrMode::Imp => {
                self.fetched = self.a;
                0
            }
            AddrMode::Imm => {
                self.addr_abs = self.pc;
                self.pc = self.pc.wrapping_add(1);
                0
            }
            AddrMode::Zp0 => {
                self.addr_abs = self.next_byte(bus) as u16;
                0
            }
            AddrMode::Zpx => {
                self.addr_abs = self.next_byte(bus).wrapping_add(self.x) as u16;
                0
            }
            AddrMode::Zpy => {
                self.addr_abs = self.next_byte(bus).wrapping_add(self.y) as u16;
                0
            }
            AddrMode::Rel => {
                self.addr_rel = self.next_byte(bus) as i8 as u16;
                0
            }
            AddrMode::Abs => {
                self.addr_abs = self.next_word(bus);
                0
            }
            AddrMode::Abx => {
                let base = self.next_word(bus);
                self.indexed(base, self.x)
            }
            AddrMode::Aby => {
                let base = self.next_word(bus);
                self.indexed(base, self.y)
            }
            AddrMode::Ind => {
                let ptr = self.next_word(bus);
                let lo = bus.read(ptr) as u16;
                // 6502 bug: the high byte never crosses into the next page
                let hi = if (ptr & 0x00FF) == 0x00FF {
                    bus.read(ptr & 0xFF00) as u16
                } else {
                    bus.read(ptr.wrapping_add(1)) as u16
                };
                self.addr_abs = (hi << 8) | lo;
                0
            }
            AddrMode::Izx => {
                let ptr = self.next_byte(bus).wrapping_add(self.x);
                let lo = bus.read(ptr as u16) as u16;
                let hi = bus.read(ptr.wrapping_add(1) as u16) as u16;
                self.addr_abs = (hi << 8) | lo;
                0
            }
            AddrMode::Izy => {
                let ptr = self.next_byte(bus);
                let lo = bus.read(ptr as u16) as u16;
                let hi = bus.read(ptr.wrapping_add(1) as u16) as u16;
                self.indexed((hi << 8) | lo, self.y)
            }
        }
    }

    fn indexed(&mut self, base: u16, index: u8) -> u8 {
        self.addr_abs = base.wrapping_add(index as u16);
        Self::page_crossed(base, self.addr_abs) as u8
    }

    fn fetch(&mut self, bus: &Bus) -> u8 {
        if lookup(self.opcode).mode != AddrMode::Imp {
            self.fetched = bus.read(self.addr_abs);
        }
        self.fetched
    }

    /// Stores a shift/rotate result back where the operand came from.
    fn write_back(&mut self, bus: &mut Bus, value: u8) {
        if lookup(self.opcode).mode == AddrMode::Imp {
            self.a = value;
        } else {
            bus.write(self.addr_abs, value);
        }
    }

    /// Runs the operation half of an instruction. Returns 1 when the
    /// operation takes the addressing mode's extra cycle.
    fn execute(&mut self, bus: &mut Bus, op: Operation) -> u8 {
        use Operation::*;

        match op {
            Adc => {
                let value = self.fetch(bus);
                self.adc(value);
                1
            }
            Sbc => {
                let value = self.fetch(bus);
                self.sbc(value);
                1
            }

            And => {
                let value = self.fetch(bus);
                self.a &= value;
                self.update_nz(self.a);
                1
            }
            Ora => {
                let value = self.fetch(bus);
                self.a |= value;
                self.update_nz(self.a);
                1
            }
            Eor => {
                let value = self.fetch(bus);
                self.a ^= value;
                self.update_nz(self.a);
                1
            }
            Bit => {
                let value = self.fetch(bus);
                self.status.set(Status::ZERO, self.a & value == 0);
                self.status.set(Status::NEGATIVE, value & 0x80 != 0);
                self.status.set(Status::OVERFLOW, value & 0x40 != 0);
                0
            }

            Asl => {
                let value = self.fetch(bus);
                let result = value << 1;
                self.status.set(Status::CARRY, value & 0x80 != 0);
                self.update_nz(result);
                self.write_back(bus, result);
                0
            }
            Lsr => {
                let value = self.fetch(bus);
                let result = value >> 1;
                self.status.set(Status::CARRY, value & 0x01 != 0);
                self.update_nz(result);
                self.write_back(bus, result);
                0
            }
            Rol => {
                let value = self.fetch(bus);
                let result = (value << 1) | self.status.contains(Status::CARRY) as u8;
                self.status.set(Status::CARRY, value & 0x80 != 0);
                self.update_nz(result);
                self.write_back(bus, result);
                0
            }
            Ror => {
                let value = self.fetch(bus);
                let result = (value >> 1) | ((self.status.contains(Status::CARRY) as u8) << 7);
                self.status.set(Status::CARRY, value & 0x01 != 0);
                self.update_nz(result);
                self.write_back(bus, result);
                0
            }

            Inc => {
                let result = self.fetch(bus).wrapping_add(1);
                bus.write(self.addr_abs, result);
                self.update_nz(result);
                0
            }
            Dec => {
                let result = self.fetch(bus).wrapping_sub(1);
                bus.write(self.addr_abs, result);
                self.update_nz(result);
                0
            }
            Inx => {
                self.x = self.x.wrapping_add(1);
                self.update_nz(self.x);
                0
            }
            Iny => {
                self.y = self.y.wrapping_add(1);
                self.update_nz(self.y);
                0
            }
            Dex => {
                self.x = self.x.wrapping_sub(1);
                self.update_nz(self.x);
                0
            }
            Dey => {
                self.y = self.y.wrapping_sub(1);
                self.update_nz(self.y);
                0
            }

            Cmp => {
                let value = self.fetch(bus);
                self.compare(self.a, value);
                1
            }
            Cpx => {
                let value = self.fetch(bus);
                self.compare(self.x, value);
                0
            }
            Cpy => {
                let value = self.fetch(bus);
                self.compare(self.y, value);
                0
            }

            Bcc => self.branch(!self.status.contains(Status::CARRY)),
            Bcs => self.branch(self.status.contains(Status::CARRY)),
            Bne => self.branch(!self.status.contains(Status::ZERO)),
            Beq => self.branch(self.status.contains(Status::ZERO)),
            Bpl => self.branch(!self.status.contains(Status::NEGATIVE)),
            Bmi => self.branch(self.status.contains(Status::NEGATIVE)),
            Bvc => self.branch(!self.status.contains(Status::OVERFLOW)),
            Bvs => self.branch(self.status.contains(Status::OVERFLOW)),

            Jmp => {
                self.pc = self.addr_abs;
                0
            }
            Jsr => {
                self.push_word(bus, self.pc.wrapping_sub(1));
                self.pc = self.addr_abs;
                0
            }
            Rts => {
                self.pc = self.pop_word(bus).wrapping_add(1);
                0
            }

            Brk => {
                self.pc = self.pc.wrapping_add(1);
                self.push_word(bus, self.pc);
                self.push(bus, (self.status | Status::BREAK | Status::UNUSED).bits());
                self.status.remove(Status::BREAK);
                self.status.insert(Status::INTERRUPT);
                self.pc = Self::read_word(bus, IRQ_VECTOR);
                0
            }
            Rti => {
                self.status = Status::from_bits_retain(self.pop(bus)) - Status::BREAK - Status::UNUSED;
                self.pc = self.pop_word(bus);
                0
            }

            Pha => {
                self.push(bus, self.a);
                0
            }
            Pla => {
                self.a = self.pop(bus);
                self.update_nz(self.a);
                0
            }
            Php => {
                self.push(bus, (self.status | Status::BREAK | Status::UNUSED).bits());
                0
            }
            Plp => {
                self.status = Status::from_bits_retain(self.pop(bus)) | Status::UNUSED;
                0
            }

            Tax => {
                self.x = self.a;
                self.update_nz(self.x);
                0
            }
            Tay => {
                self.y = self.a;
                self.update_nz(self.y);
                0
            }
            Txa => {
                self.a = self.x;
                self.update_nz(self.a);
                0
            }
            Tya => {
                self.a = self.y;
                self.update_nz(self.a);
                0
            }
            Tsx => {
                self.x = self.sp;
                self.update_nz(self.x);
                0
            }
            Txs => {
                self.sp = self.x;
                0
            }

            Clc => self.set_flag(Status::CARRY, false),
            Cli => self.set_flag(Status::INTERRUPT, false),
            Cld => self.set_flag(Status::DECIMAL, false),
            Clv => self.set_flag(Status::OVERFLOW, false),
            Sec => self.set_flag(Status::CARRY, true),
            Sei => self.set_flag(Status::INTERRUPT, true),
            Sed => self.set_flag(Status::DECIMAL, true),

            Sta => {
                bus.write(self.addr_abs, self.a);
                0
            }
            Stx => {
                bus.write(self.addr_abs, self.x);
                0
            }
            Sty => {
                bus.write(self.addr_abs, self.y);
                0
            }
            Lda => {
                self.a = self.fetch(bus);
                self.update_nz(self.a);
                1
            }
            Ldx => {
                self.x = self.fetch(bus);
                self.update_nz(self.x);
                1
            }
            Ldy => {
                self.y = self.fetch(bus);
                self.update_nz(self.y);
                1
            }

            Nop => match self.opcode {
                0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC => 1,
                _ => 0,
            },
            Unk => 0,
        }
    }

    fn set_flag(&mut self, flag: Status, on: bool) -> u8 {
        self.status.set(flag, on);
        0
    }

    fn update_nz(&mut self, value: u8) {
        self.status.set(Status::ZERO, value == 0);
        self.status.set(Status::NEGATIVE, value & 0x80 != 0);
    }

    fn adc(&mut self, value: u8) {
        let sum = self.a as u16 + value as u16 + self.status.contains(Status::CARRY) as u16;
        let result = sum as u8;

        self.status.set(Status::CARRY, sum > 0xFF);
        self.status.set(
            Status::OVERFLOW,
            (!(self.a ^ value) & (self.a ^ result) & 0x80) != 0,
        );

        self.a = result;
        self.update_nz(self.a);
    }

    // A - M - borrow is A + !M + C.
    fn sbc(&mut self, value: u8) {
        self.adc(!value);
    }

    fn compare(&mut self, reg: u8, value: u8) {
        let result = reg.wrapping_sub(value);
        self.status.set(Status::CARRY, reg >= value);
        self.update_nz(result);
    }

    fn branch(&mut self, taken: bool) -> u8 {
        if taken {
            self.cycles += 1;
            self.addr_abs = self.pc.wrapping_add(self.addr_rel);
            if Self::page_crossed(self.addr_abs, self.pc) {
                self.cycles += 1;
            }
            self.pc = self.addr_abs;
        }
        0
    }

    fn push(&mut self, bus: &mut Bus, value: u8) {
        bus.write(STACK_BASE | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pop(&mut self, bus: &Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_BASE | self.sp as u16)
    }

    fn push_word(&mut self, bus: &mut Bus, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, value as u8);
    }

    fn pop_word(&mut self, bus: &Bus) -> u16 {
        let lo = self.pop(bus) as u16;
        let hi = self.pop(bus) as u16;
        (hi << 8) | lo
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
