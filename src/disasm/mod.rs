//! Text disassembly of memory, driven by the opcode table.
//!
//! Only uses `Bus::read`, so disassembling never disturbs the CPU or the
//! write log.

use std::collections::BTreeMap;
use std::fmt;

use crate::bus::Bus;
use crate::cpu::{lookup, AddrMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub addr: u16,
    pub bytes: Vec<u8>,
    pub mnemonic: &'static str,
    pub mode: AddrMode,
    pub operand: String,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex: Vec<String> = self.bytes.iter().map(|b| format!("{:02X}", b)).collect();
        write!(f, "${:04X}: {:<9}{}", self.addr, hex.join(" "), self.mnemonic)?;
        if !self.operand.is_empty() {
            write!(f, " {}", self.operand)?;
        }
        write!(f, " {{{}}}", self.mode.tag())
    }
}

/// Decodes the single instruction at `addr`.
pub fn decode(bus: &Bus, addr: u16) -> Line {
    let opcode = bus.read(addr);
    let ins = lookup(opcode);
    let bytes: Vec<u8> = (0..ins.bytes as u16)
        .map(|i| bus.read(addr.wrapping_add(i)))
        .collect();

    let lo = bytes.get(1).copied().unwrap_or(0);
    let hi = bytes.get(2).copied().unwrap_or(0);
    let word = u16::from_le_bytes([lo, hi]);

    let operand = match ins.mode {
        AddrMode::Imp => String::new(),
        AddrMode::Imm => format!("#${:02X}", lo),
        AddrMode::Zp0 => format!("${:02X}", lo),
        AddrMode::Zpx => format!("${:02X},X", lo),
        AddrMode::Zpy => format!("${:02X},Y", lo),
        AddrMode::Izx => format!("(${:02X},X)", lo),
        AddrMode::Izy => format!("(${:02X}),Y", lo),
        AddrMode::Abs => format!("${:04X}", word),
        AddrMode::Abx => format!("${:04X},X", word),
        AddrMode::Aby => format!("${:04X},Y", word),
        AddrMode::Ind => format!("(${:04X})", word),
        AddrMode::Rel => {
            let target = addr.wrapping_add(2).wrapping_add(lo as i8 as u16);
            format!("${:04X}", target)
        }
    };

    Line {
        addr,
        bytes,
        mnemonic: ins.name,
        mode: ins.mode,
        operand,
    }
}

/// Disassembles `start..=end`, stepping by each instruction's length.
pub fn disassemble(bus: &Bus, start: u16, end: u16) -> BTreeMap<u16, Line> {
    let mut lines = BTreeMap::new();
    let mut addr = start as u32;

    while addr <= end as u32 {
        let line = decode(bus, addr as u16);
        addr += line.bytes.len() as u32;
        lines.insert(line.addr, line);
    }

    lines
}
