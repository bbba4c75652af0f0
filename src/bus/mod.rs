use std::fmt::Write;

use thiserror::Error;

/// Size of the flat address space.
pub const ADDRESS_SPACE: usize = 0x10000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BusError {
    #[error("image of {len} bytes at ${origin:04X} runs past $FFFF")]
    ImageOverrun { origin: u16, len: usize },
}

/// Flat 64KB memory with a log of every written address.
///
/// The log is only for debug observers; the CPU never looks at it.
pub struct Bus {
    ram: Box<[u8; ADDRESS_SPACE]>,
    addr_written: Vec<u16>,
}

impl Bus {
    pub fn new() -> Self {
        Bus {
            ram: Box::new([0; ADDRESS_SPACE]),
            addr_written: Vec::new(),
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.ram[addr as usize] = value;
        self.addr_written.push(addr);
    }

    /// Copies `image` into memory starting at `origin`.
    ///
    /// Goes straight to RAM without touching the write log. Nothing is
    /// written if the image would run past the end of the address space.
    pub fn load(&mut self, origin: u16, image: &[u8]) -> Result<(), BusError> {
        let start = origin as usize;
        let end = start + image.len();
        if end > ADDRESS_SPACE {
            return Err(BusError::ImageOverrun { origin, len: image.len() });
        }

        self.ram[start..end].copy_from_slice(image);
        log::info!("Loaded {} bytes at ${:04X}", image.len(), origin);
        Ok(())
    }

    pub fn written(&self) -> &[u16] {
        &self.addr_written
    }

    pub fn take_written(&mut self) -> Vec<u16> {
        std::mem::take(&mut self.addr_written)
    }

    /// Renders `rows` lines of 16 bytes starting at `start`, one line per row.
    pub fn dump(&self, start: u16, rows: usize) -> Vec<String> {
        let mut lines = Vec::with_capacity(rows);
        let mut addr = start as usize;

        for _ in 0..rows {
            if addr >= ADDRESS_SPACE {
                break;
            }
            let mut line = format!("${:04X}:", addr);
            let row_end = (addr + 16).min(ADDRESS_SPACE);
            for byte in &self.ram[addr..row_end] {
                let _ = write!(line, " {:02X}", byte);
            }
            lines.push(line);
            addr = row_end;
        }

        lines
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_is_logged_and_read_back() {
        let mut bus = Bus::new();
        bus.write(0x1234, 0xAB);
        bus.write(0xFFFF, 0x01);

        assert_eq!(bus.read(0x1234), 0xAB);
        assert_eq!(bus.read(0xFFFF), 0x01);
        assert_eq!(bus.written(), &[0x1234, 0xFFFF]);
    }

    #[test]
    fn reads_do_not_touch_the_log() {
        let mut bus = Bus::new();
        bus.write(0x0010, 0x42);
        let _ = bus.read(0x0010);
        let _ = bus.read(0x0011);

        assert_eq!(bus.take_written(), vec![0x0010]);
        assert!(bus.written().is_empty());
    }

    #[test]
    fn load_copies_image_without_logging() {
        let mut bus = Bus::new();
        bus.load(0xFFFE, &[0x34, 0x12]).unwrap();

        assert_eq!(bus.read(0xFFFE), 0x34);
        assert_eq!(bus.read(0xFFFF), 0x12);
        assert!(bus.written().is_empty());
    }

    #[test]
    fn load_rejects_overrun() {
        let mut bus = Bus::new();
        let err = bus.load(0xFFFF, &[1, 2]).unwrap_err();

        assert_eq!(err, BusError::ImageOverrun { origin: 0xFFFF, len: 2 });
        assert_eq!(bus.read(0xFFFF), 0);
    }

    #[test]
    fn dump_renders_sixteen_bytes_per_row() {
        let mut bus = Bus::new();
        bus.load(0x0000, &[0x00, 0x01, 0x02]).unwrap();

        let lines = bus.dump(0x0000, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("$0000: 00 01 02 00"));
        assert!(lines[1].starts_with("$0010: 00"));
        assert_eq!(lines[0].split(' ').count(), 17);
    }

    #[test]
    fn dump_stops_at_end_of_memory() {
        let bus = Bus::new();
        let lines = bus.dump(0xFFF0, 4);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("$FFF0:"));
    }
}
