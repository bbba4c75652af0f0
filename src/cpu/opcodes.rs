//! The 256-entry opcode table.
//!
//! Undefined opcodes are named `???`. Most execute as `Unk`, a no-op that only
//! burns the listed cycles; a handful of the undocumented NOPs are listed as
//! `Nop` with their real addressing mode so page crossings cost a cycle.

use self::AddrMode::*;
use self::Operation::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    Imp,
    Imm,
    Zp0,
    Zpx,
    Zpy,
    Rel,
    Abs,
    Abx,
    Aby,
    Ind,
    Izx,
    Izy,
}

impl AddrMode {
    pub fn tag(self) -> &'static str {
        match self {
            Imp => "IMP",
            Imm => "IMM",
            Zp0 => "ZP0",
            Zpx => "ZPX",
            Zpy => "ZPY",
            Rel => "REL",
            Abs => "ABS",
            Abx => "ABX",
            Aby => "ABY",
            Ind => "IND",
            Izx => "IZX",
            Izy => "IZY",
        }
    }

    /// Instruction length in bytes, opcode included.
    pub fn byte_len(self) -> u8 {
        match self {
            Imp => 1,
            Imm | Zp0 | Zpx | Zpy | Rel | Izx | Izy => 2,
            Abs | Abx | Aby | Ind => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    Unk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub name: &'static str,
    pub op: Operation,
    pub mode: AddrMode,
    pub cycles: u8,
    pub bytes: u8,
}

const fn op(name: &'static str, op: Operation, mode: AddrMode, cycles: u8, bytes: u8) -> Instruction {
    Instruction { name, op, mode, cycles, bytes }
}

pub fn lookup(opcode: u8) -> &'static Instruction {
    &LOOKUP[opcode as usize]
}

#[rustfmt::skip]
pub static LOOKUP: [Instruction; 256] = [
    // 0x00
    op("BRK", Brk, Imp, 7, 1),
    op("ORA", Ora, Izx, 6, 2),
    op("???", Unk, Imp, 2, 1),
    op("???", Unk, Imp, 8, 1),
    op("???", Nop, Imp, 3, 1),
    op("ORA", Ora, Zp0, 3, 2),
    op("ASL", Asl, Zp0, 5, 2),
    op("???", Unk, Imp, 5, 1),
    op("PHP", Php, Imp, 3, 1),
    op("ORA", Ora, Imm, 2, 2),
    op("ASL", Asl, Imp, 2, 1),
    op("???", Unk, Imp, 2, 1),
    op("???", Nop, Imp, 4, 1),
    op("ORA", Ora, Abs, 4, 3),
    op("ASL", Asl, Abs, 6, 3),
    op("???", Unk, Imp, 6, 1),
    // 0x10
    op("BPL", Bpl, Rel, 2, 2),
    op("ORA", Ora, Izy, 5, 2),
    op("???", Unk, Imp, 2, 1),
    op("???", Unk, Imp, 8, 1),
    op("???", Nop, Imp, 4, 1),
    op("ORA", Ora, Zpx, 4, 2),
    op("ASL", Asl, Zpx, 6, 2),
    op("???", Unk, Imp, 6, 1),
    op("CLC", Clc, Imp, 2, 1),
    op("ORA", Ora, Aby, 4, 3),
    op("???", Nop, Imp, 2, 1),
    op("???", Unk, Imp, 7, 1),
    op("???", Nop, Abx, 4, 3),
    op("ORA", Ora, Abx, 4, 3),
    op("ASL", Asl, Abx, 7, 3),
    op("???", Unk, Imp, 7, 1),
    // 0x20
    op("JSR", Jsr, Abs, 6, 3),
    op("AND", And, Izx, 6, 2),
    op("???", Unk, Imp, 2, 1),
    op("???", Unk, Imp, 8, 1),
    op("BIT", Bit, Zp0, 3, 2),
    op("AND", And, Zp0, 3, 2),
    op("ROL", Rol, Zp0, 5, 2),
    op("???", Unk, Imp, 5, 1),
    op("PLP", Plp, Imp, 4, 1),
    op("AND", And, Imm, 2, 2),
    op("ROL", Rol, Imp, 2, 1),
    op("???", Unk, Imp, 2, 1),
    op("BIT", Bit, Abs, 4, 3),
    op("AND", And, Abs, 4, 3),
    op("ROL", Rol, Abs, 6, 3),
    op("???", Unk, Imp, 6, 1),
    // 0x30
    op("BMI", Bmi, Rel, 2, 2),
    op("AND", And, Izy, 5, 2),
    op("???", Unk, Imp, 2, 1),
    op("???", Unk, Imp, 8, 1),
    op("???", Nop, Imp, 4, 1),
    op("AND", And, Zpx, 4, 2),
    op("ROL", Rol, Zpx, 6, 2),
    op("???", Unk, Imp, 6, 1),
    op("SEC", Sec, Imp, 2, 1),
    op("AND", And, Aby, 4, 3),
    op("???", Nop, Imp, 2, 1),
    op("???", Unk, Imp, 7, 1),
    op("???", Nop, Abx, 4, 3),
    op("AND", And, Abx, 4, 3),
    op("ROL", Rol, Abx, 7, 3),
    op("???", Unk, Imp, 7, 1),
    // 0x40
    op("RTI", Rti, Imp, 6, 1),
    op("EOR", Eor, Izx, 6, 2),
    op("???", Unk, Imp, 2, 1),
    op("???", Unk, Imp, 8, 1),
    op("???", Nop, Imp, 3, 1),
    op("EOR", Eor, Zp0, 3, 2),
    op("LSR", Lsr, Zp0, 5, 2),
    op("???", Unk, Imp, 5, 1),
    op("PHA", Pha, Imp, 3, 1),
    op("EOR", Eor, Imm, 2, 2),
    op("LSR", Lsr, Imp, 2, 1),
    op("???", Unk, Imp, 2, 1),
    op("JMP", Jmp, Abs, 3, 3),
    op("EOR", Eor, Abs, 4, 3),
    op("LSR", Lsr, Abs, 6, 3),
    op("???", Unk, Imp, 6, 1),
    // 0x50
    op("BVC", Bvc, Rel, 2, 2),
    op("EOR", Eor, Izy, 5, 2),
    op("???", Unk, Imp, 2, 1),
    op("???", Unk, Imp, 8, 1),
    op("???", Nop, Imp, 4, 1),
    op("EOR", Eor, Zpx, 4, 2),
    op("LSR", Lsr, Zpx, 6, 2),
    op("???", Unk, Imp, 6, 1),
    op("CLI", Cli, Imp, 2, 1),
    op("EOR", Eor, Aby, 4, 3),
    op("???", Nop, Imp, 2, 1),
    op("???", Unk, Imp, 7, 1),
    op("???", Nop, Abx, 4, 3),
    op("EOR", Eor, Abx, 4, 3),
    op("LSR", Lsr, Abx, 7, 3),
    op("???", Unk, Imp, 7, 1),
    // 0x60
    op("RTS", Rts, Imp, 6, 1),
    op("ADC", Adc, Izx, 6, 2),
    op("???", Unk, Imp, 2, 1),
    op("???", Unk, Imp, 8, 1),
    op("???", Nop, Imp, 3, 1),
    op("ADC", Adc, Zp0, 3, 2),
    op("ROR", Ror, Zp0, 5, 2),
    op("???", Unk, Imp, 5, 1),
    op("PLA", Pla, Imp, 4, 1),
    op("ADC", Adc, Imm, 2, 2),
    op("ROR", Ror, Imp, 2, 1),
    op("???", Unk, Imp, 2, 1),
    op("JMP", Jmp, Ind, 5, 3),
    op("ADC", Adc, Abs, 4, 3),
    op("ROR", Ror, Abs, 6, 3),
    op("???", Unk, Imp, 6, 1),
    // 0x70
    op("BVS", Bvs, Rel, 2, 2),
    op("ADC", Adc, Izy, 5, 2),
    op("???", Unk, Imp, 2, 1),
    op("???", Unk, Imp, 8, 1),
    op("???", Nop, Imp, 4, 1),
    op("ADC", Adc, Zpx, 4, 2),
    op("ROR", Ror, Zpx, 6, 2),
    op("???", Unk, Imp, 6, 1),
    op("SEI", Sei, Imp, 2, 1),
    op("ADC", Adc, Aby, 4, 3),
    op("???", Nop, Imp, 2, 1),
    op("???", Unk, Imp, 7, 1),
    op("???", Nop, Abx, 4, 3),
    op("ADC", Adc, Abx, 4, 3),
    op("ROR", Ror, Abx, 7, 3),
    op("???", Unk, Imp, 7, 1),
    // 0x80
    op("???", Nop, Imp, 2, 1),
    op("STA", Sta, Izx, 6, 2),
    op("???", Nop, Imp, 2, 1),
    op("???", Unk, Imp, 6, 1),
    op("STY", Sty, Zp0, 3, 2),
    op("STA", Sta, Zp0, 3, 2),
    op("STX", Stx, Zp0, 3, 2),
    op("???", Unk, Imp, 3, 1),
    op("DEY", Dey, Imp, 2, 1),
    op("???", Nop, Imp, 2, 1),
    op("TXA", Txa, Imp, 2, 1),
    op("???", Unk, Imp, 2, 1),
    op("STY", Sty, Abs, 4, 3),
    op("STA", Sta, Abs, 4, 3),
    op("STX", Stx, Abs, 4, 3),
    op("???", Unk, Imp, 4, 1),
    // 0x90
    op("BCC", Bcc, Rel, 2, 2),
    op("STA", Sta, Izy, 6, 2),
    op("???", Unk, Imp, 2, 1),
    op("???", Unk, Imp, 6, 1),
    op("STY", Sty, Zpx, 4, 2),
    op("STA", Sta, Zpx, 4, 2),
    op("STX", Stx, Zpy, 4, 2),
    op("???", Unk, Imp, 4, 1),
    op("TYA", Tya, Imp, 2, 1),
    op("STA", Sta, Aby, 5, 3),
    op("TXS", Txs, Imp, 2, 1),
    op("???", Unk, Imp, 5, 1),
    op("???", Nop, Imp, 5, 1),
    op("STA", Sta, Abx, 5, 3),
    op("???", Unk, Imp, 5, 1),
    op("???", Unk, Imp, 5, 1),
    // 0xA0
    op("LDY", Ldy, Imm, 2, 2),
    op("LDA", Lda, Izx, 6, 2),
    op("LDX", Ldx, Imm, 2, 2),
    op("???", Unk, Imp, 6, 1),
    op("LDY", Ldy, Zp0, 3, 2),
    op("LDA", Lda, Zp0, 3, 2),
    op("LDX", Ldx, Zp0, 3, 2),
    op("???", Unk, Imp, 3, 1),
    op("TAY", Tay, Imp, 2, 1),
    op("LDA", Lda, Imm, 2, 2),
    op("TAX", Tax, Imp, 2, 1),
    op("???", Unk, Imp, 2, 1),
    op("LDY", Ldy, Abs, 4, 3),
    op("LDA", Lda, Abs, 4, 3),
    op("LDX", Ldx, Abs, 4, 3),
    op("???", Unk, Imp, 4, 1),
    // 0xB0
    op("BCS", Bcs, Rel, 2, 2),
    op("LDA", Lda, Izy, 5, 2),
    op("???", Unk, Imp, 2, 1),
    op("???", Unk, Imp, 5, 1),
    op("LDY", Ldy, Zpx, 4, 2),
    op("LDA", Lda, Zpx, 4, 2),
    op("LDX", Ldx, Zpy, 4, 2),
    op("???", Unk, Imp, 4, 1),
    op("CLV", Clv, Imp, 2, 1),
    op("LDA", Lda, Aby, 4, 3),
    op("TSX", Tsx, Imp, 2, 1),
    op("???", Unk, Imp, 4, 1),
    op("LDY", Ldy, Abx, 4, 3),
    op("LDA", Lda, Abx, 4, 3),
    op("LDX", Ldx, Aby, 4, 3),
    op("???", Unk, Imp, 4, 1),
    // 0xC0
    op("CPY", Cpy, Imm, 2, 2),
    op("CMP", Cmp, Izx, 6, 2),
    op("???", Nop, Imp, 2, 1),
    op("???", Unk, Imp, 8, 1),
    op("CPY", Cpy, Zp0, 3, 2),
    op("CMP", Cmp, Zp0, 3, 2),
    op("DEC", Dec, Zp0, 5, 2),
    op("???", Unk, Imp, 5, 1),
    op("INY", Iny, Imp, 2, 1),
    op("CMP", Cmp, Imm, 2, 2),
    op("DEX", Dex, Imp, 2, 1),
    op("???", Unk, Imp, 2, 1),
    op("CPY", Cpy, Abs, 4, 3),
    op("CMP", Cmp, Abs, 4, 3),
    op("DEC", Dec, Abs, 6, 3),
    op("???", Unk, Imp, 6, 1),
    // 0xD0
    op("BNE", Bne, Rel, 2, 2),
    op("CMP", Cmp, Izy, 5, 2),
    op("???", Unk, Imp, 2, 1),
    op("???", Unk, Imp, 8, 1),
    op("???", Nop, Imp, 4, 1),
    op("CMP", Cmp, Zpx, 4, 2),
    op("DEC", Dec, Zpx, 6, 2),
    op("???", Unk, Imp, 6, 1),
    op("CLD", Cld, Imp, 2, 1),
    op("CMP", Cmp, Aby, 4, 3),
    op("NOP", Nop, Imp, 2, 1),
    op("???", Unk, Imp, 7, 1),
    op("???", Nop, Abx, 4, 3),
    op("CMP", Cmp, Abx, 4, 3),
    op("DEC", Dec, Abx, 7, 3),
    op("???", Unk, Imp, 7, 1),
    // 0xE0
    op("CPX", Cpx, Imm, 2, 2),
    op("SBC", Sbc, Izx, 6, 2),
    op("???", Nop, Imp, 2, 1),
    op("???", Unk, Imp, 8, 1),
    op("CPX", Cpx, Zp0, 3, 2),
    op("SBC", Sbc, Zp0, 3, 2),
    op("INC", Inc, Zp0, 5, 2),
    op("???", Unk, Imp, 5, 1),
    op("INX", Inx, Imp, 2, 1),
    op("SBC", Sbc, Imm, 2, 2),
    op("NOP", Nop, Imp, 2, 1),
    op("???", Sbc, Imp, 2, 1),
    op("CPX", Cpx, Abs, 4, 3),
    op("SBC", Sbc, Abs, 4, 3),
    op("INC", Inc, Abs, 6, 3),
    op("???", Unk, Imp, 6, 1),
    // 0xF0
    op("BEQ", Beq, Rel, 2, 2),
    op("SBC", Sbc, Izy, 5, 2),
    op("???", Unk, Imp, 2, 1),
    op("???", Unk, Imp, 8, 1),
    op("???", Nop, Imp, 4, 1),
    op("SBC", Sbc, Zpx, 4, 2),
    op("INC", Inc, Zpx, 6, 2),
    op("???", Unk, Imp, 6, 1),
    op("SED", Sed, Imp, 2, 1),
    op("SBC", Sbc, Aby, 4, 3),
    op("NOP", Nop, Imp, 2, 1),
    op("???", Unk, Imp, 7, 1),
    op("???", Nop, Abx, 4, 3),
    op("SBC", Sbc, Abx, 4, 3),
    op("INC", Inc, Abx, 7, 3),
    op("???", Unk, Imp, 7, 1),
];

#[cfg(test)]
mod tests {
    use super::AddrMode::*;
    use super::Operation::*;
    use super::{lookup, op, LOOKUP};

    #[test]
    fn byte_length_matches_addressing_mode() {
        for (opcode, ins) in LOOKUP.iter().enumerate() {
            assert_eq!(ins.bytes, ins.mode.byte_len(), "opcode {:02X}", opcode);
            assert!((1..=3).contains(&ins.bytes));
            assert!((2..=8).contains(&ins.cycles), "opcode {:02X}", opcode);
        }
    }

    #[test]
    fn spot_check_entries() {
        assert_eq!(*lookup(0xA9), op("LDA", Lda, Imm, 2, 2));
        assert_eq!(*lookup(0x6C), op("JMP", Jmp, Ind, 5, 3));
        assert_eq!(*lookup(0x20), op("JSR", Jsr, Abs, 6, 3));
        assert_eq!(*lookup(0xB6), op("LDX", Ldx, Zpy, 4, 2));
        assert_eq!(*lookup(0xEA), op("NOP", Nop, Imp, 2, 1));
        assert_eq!(*lookup(0x02), op("???", Unk, Imp, 2, 1));
        assert_eq!(*lookup(0xFC), op("???", Nop, Abx, 4, 3));
    }

    #[test]
    fn undefined_opcodes_are_unnamed() {
        let named = LOOKUP.iter().filter(|ins| ins.name != "???").count();
        assert_eq!(named, 153);
        assert!(LOOKUP
            .iter()
            .filter(|ins| ins.op == Unk)
            .all(|ins| ins.name == "???" && ins.mode == Imp));
    }
}
