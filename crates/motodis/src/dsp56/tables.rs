//! Data ALU operation table for parallel-class instructions, indexed by
//! the low byte of the instruction word.

use super::instruction::Opcode;
use super::registers::Reg;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluEntry {
    pub opcode: Opcode,
    /// Print the first operand negated (`-x0,x0,a`).
    pub neg: bool,
    pub regs: [Option<Reg>; 3],
}

const fn entry(opcode: Opcode, regs: [Option<Reg>; 3]) -> AluEntry {
    AluEntry { opcode, neg: false, regs }
}

const fn unary(opcode: Opcode, d: Reg) -> AluEntry {
    entry(opcode, [Some(d), None, None])
}

const fn binary(opcode: Opcode, s: Reg, d: Reg) -> AluEntry {
    entry(opcode, [Some(s), Some(d), None])
}

const INVALID: AluEntry = entry(Opcode::Invalid, [None, None, None]);

/// Multiplier input pairs selected by `QQQ`.
const MUL_PAIRS: [(Reg, Reg); 8] = [
    (Reg::X0, Reg::X0),
    (Reg::Y0, Reg::Y0),
    (Reg::X1, Reg::X0),
    (Reg::Y1, Reg::Y0),
    (Reg::X0, Reg::Y1),
    (Reg::Y0, Reg::X0),
    (Reg::X1, Reg::Y0),
    (Reg::Y1, Reg::X1),
];

const MUL_OPS: [Opcode; 4] = [Opcode::Mpy, Opcode::Mpyr, Opcode::Mac, Opcode::Macr];

/// Logic-class source registers selected by `JJ` in the 01JJ rows.
const LOGIC_SOURCES: [Reg; 4] = [Reg::X0, Reg::Y0, Reg::X1, Reg::Y1];

const LOGIC_OPS: [Opcode; 8] = [
    Opcode::Add,
    Opcode::Tfr,
    Opcode::Or,
    Opcode::Eor,
    Opcode::Sub,
    Opcode::Cmp,
    Opcode::And,
    Opcode::Cmpm,
];

const fn alu_entry(code: u8) -> AluEntry {
    let d_is_b = code & 0x08 != 0;
    let d = if d_is_b { Reg::B } else { Reg::A };
    let other = if d_is_b { Reg::A } else { Reg::B };
    let k = code & 7;

    if code & 0x80 != 0 {
        let (s1, s2) = MUL_PAIRS[((code >> 4) & 7) as usize];
        return AluEntry {
            opcode: MUL_OPS[(code & 3) as usize],
            neg: code & 0x04 != 0,
            regs: [Some(s1), Some(s2), Some(d)],
        };
    }

    if code & 0x40 != 0 {
        let s = LOGIC_SOURCES[((code >> 4) & 3) as usize];
        return binary(LOGIC_OPS[k as usize], s, d);
    }

    match (code >> 4) & 3 {
        0 => match k {
            0 if !d_is_b => entry(Opcode::Move, [None, None, None]),
            1 => binary(Opcode::Tfr, other, d),
            2 => binary(Opcode::Addr, other, d),
            3 => unary(Opcode::Tst, d),
            5 => binary(Opcode::Cmp, other, d),
            6 => binary(Opcode::Subr, other, d),
            7 => binary(Opcode::Cmpm, other, d),
            _ => INVALID,
        },
        1 => match k {
            0 => binary(Opcode::Add, other, d),
            1 => unary(Opcode::Rnd, d),
            2 => binary(Opcode::Addl, other, d),
            3 => unary(Opcode::Clr, d),
            4 => binary(Opcode::Sub, other, d),
            6 => binary(Opcode::Subl, other, d),
            7 => unary(Opcode::Not, d),
            _ => INVALID,
        },
        2 => match k {
            0 => binary(Opcode::Add, Reg::X, d),
            1 => binary(Opcode::Adc, Reg::X, d),
            2 => unary(Opcode::Asr, d),
            3 => unary(Opcode::Lsr, d),
            4 => binary(Opcode::Sub, Reg::X, d),
            5 => binary(Opcode::Sbc, Reg::X, d),
            6 => unary(Opcode::Abs, d),
            _ => unary(Opcode::Ror, d),
        },
        _ => match k {
            0 => binary(Opcode::Add, Reg::Y, d),
            1 => binary(Opcode::Adc, Reg::Y, d),
            2 => unary(Opcode::Asl, d),
            3 => unary(Opcode::Lsl, d),
            4 => binary(Opcode::Sub, Reg::Y, d),
            5 => binary(Opcode::Sbc, Reg::Y, d),
            6 => unary(Opcode::Neg, d),
            _ => unary(Opcode::Rol, d),
        },
    }
}

const fn build_alu_table() -> [AluEntry; 256] {
    let mut table = [INVALID; 256];
    let mut code = 0;
    while code < 256 {
        table[code] = alu_entry(code as u8);
        code += 1;
    }
    table
}

pub static ALU_TABLE: [AluEntry; 256] = build_alu_table();
