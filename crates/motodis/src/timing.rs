//! 68000 cycle estimates.
//!
//! Values are for a plain 68000 on a 4-cycle memory bus (Atari ST style)
//! and ignore wait states. MOVE and MOVEA are summed from per-operand
//! addend tables; everything else is a first-hit lookup on opcode, size
//! and the kinds of the first two operands, optionally plus the usual
//! effective address calculation time of one operand.

use crate::m68k::{Instruction, Opcode, Operand, Size};

/// This instruction can share a bus slot with the previous one.
pub const PAIR_FRONT: u8 = 1 << 0;
/// This instruction can share a bus slot with the next one.
pub const PAIR_BACK: u8 = 1 << 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub min: u16,
    pub max: u16,
    pub flags: u8,
}

impl Timing {
    /// Cycle count shown in listings: `min` rounded up to whole bus slots.
    pub fn rounded(&self) -> u16 {
        (self.min + 3) & !3
    }
}

/// Operand kinds as far as timing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    D,
    A,
    Ind,
    PostInc,
    PreDec,
    Disp,
    Index,
    AbsW,
    AbsL,
    PcDisp,
    PcIndex,
    Imm,
    Other,
}

impl Kind {
    fn of(op: &Operand) -> Option<Kind> {
        let kind = match op {
            Operand::None => return None,
            Operand::DataDirect(_) => Kind::D,
            Operand::AddressDirect(_) => Kind::A,
            Operand::Indirect(_) => Kind::Ind,
            Operand::PostIncrement(_) => Kind::PostInc,
            Operand::PreDecrement(_) => Kind::PreDec,
            Operand::Displacement { .. } => Kind::Disp,
            Operand::Index { .. } => Kind::Index,
            Operand::AbsoluteWord(_) => Kind::AbsW,
            Operand::AbsoluteLong(_) => Kind::AbsL,
            Operand::PcDisplacement { .. } => Kind::PcDisp,
            Operand::PcIndex { .. } => Kind::PcIndex,
            Operand::Immediate(_) => Kind::Imm,
            _ => Kind::Other,
        };
        Some(kind)
    }

    fn is_memory(self) -> bool {
        !matches!(self, Kind::D | Kind::A | Kind::Imm | Kind::Other)
    }
}

/// Source operand addends for MOVE, also the generic effective address
/// calculation time.
fn source_addend(kind: Kind, long: bool) -> Option<u16> {
    let (bw, l) = match kind {
        Kind::D | Kind::A => (0, 0),
        Kind::Ind | Kind::PostInc => (4, 8),
        Kind::PreDec => (6, 10),
        Kind::Disp => (8, 12),
        Kind::Index => (10, 14),
        Kind::AbsW => (8, 12),
        Kind::AbsL => (12, 16),
        Kind::PcDisp => (8, 12),
        Kind::PcIndex => (10, 14),
        Kind::Imm => (4, 8),
        Kind::Other => return None,
    };
    Some(if long { l } else { bw })
}

fn dest_addend(kind: Kind, long: bool) -> Option<u16> {
    let (bw, l) = match kind {
        Kind::D | Kind::A => (0, 0),
        Kind::Ind | Kind::PostInc | Kind::PreDec => (4, 8),
        Kind::Disp => (8, 12),
        Kind::Index => (10, 14),
        Kind::AbsW => (8, 12),
        Kind::AbsL => (12, 16),
        _ => return None,
    };
    Some(if long { l } else { bw })
}

fn move_timing(inst: &Instruction) -> Option<Timing> {
    if !matches!(inst.opcode, Opcode::Move | Opcode::Movea) {
        return None;
    }
    let long = match inst.size? {
        Size::Byte | Size::Word => false,
        Size::Long => true,
        Size::Short => return None,
    };
    let src = Kind::of(&inst.operands[0])?;
    let dst = Kind::of(&inst.operands[1])?;
    let cycles = 4 + source_addend(src, long)? + dest_addend(dst, long)?;
    let flags = if src == Kind::Index || src == Kind::PcIndex || dst == Kind::Index {
        PAIR_FRONT
    } else {
        0
    };
    Some(Timing {
        min: cycles,
        max: cycles,
        flags,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sz {
    Any,
    /// Byte or word
    Bw,
    W,
    L,
    S,
}

impl Sz {
    fn matches(self, size: Option<Size>) -> bool {
        let Some(size) = size else {
            return true;
        };
        match self {
            Sz::Any => true,
            Sz::Bw => matches!(size, Size::Byte | Size::Word),
            Sz::W => size == Size::Word,
            Sz::L => size == Size::Long,
            Sz::S => size == Size::Short,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pat {
    Any,
    Is(Kind),
    /// Any memory addressing mode
    Mem,
}

impl Pat {
    /// An empty operand slot matches every pattern.
    fn matches(self, kind: Option<Kind>) -> bool {
        let Some(kind) = kind else {
            return true;
        };
        match self {
            Pat::Any => true,
            Pat::Is(k) => k == kind,
            Pat::Mem => kind.is_memory(),
        }
    }
}

/// Which operand's effective address time is added to the base cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ea {
    None,
    Op0,
    Op1,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    opcode: Opcode,
    size: Sz,
    op0: Pat,
    op1: Pat,
    min: u16,
    max: u16,
    ea: Ea,
    flags: u8,
}

impl Entry {
    const fn ea(mut self, ea: Ea) -> Self {
        self.ea = ea;
        self
    }

    const fn flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }
}

const fn e(opcode: Opcode, size: Sz, op0: Pat, op1: Pat, min: u16, max: u16) -> Entry {
    Entry {
        opcode,
        size,
        op0,
        op1,
        min,
        max,
        ea: Ea::None,
        flags: 0,
    }
}

const fn fixed(opcode: Opcode, cycles: u16) -> Entry {
    e(opcode, Sz::Any, Pat::Any, Pat::Any, cycles, cycles)
}

use Kind::*;
use Pat::{Any as X, Is, Mem};

const DN: Pat = Is(D);
const AN: Pat = Is(A);
const IMM: Pat = Is(Imm);

#[rustfmt::skip]
static TIMINGS: &[Entry] = &[
    fixed(Opcode::Nop, 4),
    fixed(Opcode::Rts, 16),
    fixed(Opcode::Rte, 20),
    fixed(Opcode::Rtr, 20),
    fixed(Opcode::Illegal, 34),
    fixed(Opcode::Trap, 34),
    fixed(Opcode::Trapv, 4),
    fixed(Opcode::Reset, 132),
    fixed(Opcode::Stop, 4),
    fixed(Opcode::Link, 16),
    fixed(Opcode::Unlk, 12),
    fixed(Opcode::Swap, 4),
    fixed(Opcode::Ext, 4),
    fixed(Opcode::Moveq, 4),
    fixed(Opcode::Exg, 6).flags(PAIR_BACK),

    // Branches: not taken / taken
    e(Opcode::Bra, Sz::Any, X, X, 10, 10),
    e(Opcode::Bsr, Sz::Any, X, X, 18, 18),
    e(Opcode::Bcc, Sz::S, X, X, 8, 10),
    e(Opcode::Bcc, Sz::W, X, X, 10, 12),
    e(Opcode::Dbcc, Sz::Any, X, X, 10, 14),
    e(Opcode::Scc, Sz::Any, DN, X, 4, 6),
    e(Opcode::Scc, Sz::Any, Mem, X, 8, 8).ea(Ea::Op0),

    e(Opcode::Jmp, Sz::Any, Is(Ind), X, 8, 8),
    e(Opcode::Jmp, Sz::Any, Is(Disp), X, 10, 10),
    e(Opcode::Jmp, Sz::Any, Is(Index), X, 14, 14).flags(PAIR_FRONT),
    e(Opcode::Jmp, Sz::Any, Is(AbsW), X, 10, 10),
    e(Opcode::Jmp, Sz::Any, Is(AbsL), X, 12, 12),
    e(Opcode::Jmp, Sz::Any, Is(PcDisp), X, 10, 10),
    e(Opcode::Jmp, Sz::Any, Is(PcIndex), X, 14, 14).flags(PAIR_FRONT),
    e(Opcode::Jsr, Sz::Any, Is(Ind), X, 16, 16),
    e(Opcode::Jsr, Sz::Any, Is(Disp), X, 18, 18),
    e(Opcode::Jsr, Sz::Any, Is(Index), X, 22, 22).flags(PAIR_FRONT),
    e(Opcode::Jsr, Sz::Any, Is(AbsW), X, 18, 18),
    e(Opcode::Jsr, Sz::Any, Is(AbsL), X, 20, 20),
    e(Opcode::Jsr, Sz::Any, Is(PcDisp), X, 18, 18),
    e(Opcode::Jsr, Sz::Any, Is(PcIndex), X, 22, 22).flags(PAIR_FRONT),

    e(Opcode::Lea, Sz::Any, Is(Ind), X, 4, 4),
    e(Opcode::Lea, Sz::Any, Is(Disp), X, 8, 8),
    e(Opcode::Lea, Sz::Any, Is(Index), X, 12, 12).flags(PAIR_FRONT),
    e(Opcode::Lea, Sz::Any, Is(AbsW), X, 8, 8),
    e(Opcode::Lea, Sz::Any, Is(AbsL), X, 12, 12),
    e(Opcode::Lea, Sz::Any, Is(PcDisp), X, 8, 8),
    e(Opcode::Lea, Sz::Any, Is(PcIndex), X, 12, 12).flags(PAIR_FRONT),
    e(Opcode::Pea, Sz::Any, Is(Ind), X, 12, 12),
    e(Opcode::Pea, Sz::Any, Is(Disp), X, 16, 16),
    e(Opcode::Pea, Sz::Any, Is(Index), X, 20, 20).flags(PAIR_FRONT),
    e(Opcode::Pea, Sz::Any, Is(AbsW), X, 16, 16),
    e(Opcode::Pea, Sz::Any, Is(AbsL), X, 20, 20),
    e(Opcode::Pea, Sz::Any, Is(PcDisp), X, 16, 16),
    e(Opcode::Pea, Sz::Any, Is(PcIndex), X, 20, 20).flags(PAIR_FRONT),

    // MOVE forms not covered by the addend tables
    e(Opcode::Move, Sz::Any, Is(Other), DN, 6, 6).flags(PAIR_BACK),
    e(Opcode::Move, Sz::Any, X, Is(Other), 12, 12).ea(Ea::Op0),
    e(Opcode::Move, Sz::Any, Is(Other), Mem, 8, 8).ea(Ea::Op1),
    e(Opcode::Move, Sz::Any, Is(Other), AN, 4, 4),

    // Binary arithmetic and logic
    e(Opcode::Add, Sz::Bw, X, DN, 4, 4).ea(Ea::Op0),
    e(Opcode::Add, Sz::L, DN, DN, 8, 8),
    e(Opcode::Add, Sz::L, IMM, DN, 16, 16),
    e(Opcode::Add, Sz::L, X, DN, 6, 6).ea(Ea::Op0).flags(PAIR_BACK),
    e(Opcode::Add, Sz::Bw, DN, Mem, 8, 8).ea(Ea::Op1),
    e(Opcode::Add, Sz::L, DN, Mem, 12, 12).ea(Ea::Op1),
    e(Opcode::Sub, Sz::Bw, X, DN, 4, 4).ea(Ea::Op0),
    e(Opcode::Sub, Sz::L, DN, DN, 8, 8),
    e(Opcode::Sub, Sz::L, IMM, DN, 16, 16),
    e(Opcode::Sub, Sz::L, X, DN, 6, 6).ea(Ea::Op0).flags(PAIR_BACK),
    e(Opcode::Sub, Sz::Bw, DN, Mem, 8, 8).ea(Ea::Op1),
    e(Opcode::Sub, Sz::L, DN, Mem, 12, 12).ea(Ea::Op1),
    e(Opcode::And, Sz::Bw, X, DN, 4, 4).ea(Ea::Op0),
    e(Opcode::And, Sz::L, DN, DN, 8, 8),
    e(Opcode::And, Sz::L, IMM, DN, 16, 16),
    e(Opcode::And, Sz::L, X, DN, 6, 6).ea(Ea::Op0).flags(PAIR_BACK),
    e(Opcode::And, Sz::Bw, DN, Mem, 8, 8).ea(Ea::Op1),
    e(Opcode::And, Sz::L, DN, Mem, 12, 12).ea(Ea::Op1),
    e(Opcode::Or, Sz::Bw, X, DN, 4, 4).ea(Ea::Op0),
    e(Opcode::Or, Sz::L, DN, DN, 8, 8),
    e(Opcode::Or, Sz::L, IMM, DN, 16, 16),
    e(Opcode::Or, Sz::L, X, DN, 6, 6).ea(Ea::Op0).flags(PAIR_BACK),
    e(Opcode::Or, Sz::Bw, DN, Mem, 8, 8).ea(Ea::Op1),
    e(Opcode::Or, Sz::L, DN, Mem, 12, 12).ea(Ea::Op1),
    e(Opcode::Eor, Sz::Bw, DN, DN, 4, 4),
    e(Opcode::Eor, Sz::L, DN, DN, 8, 8),
    e(Opcode::Eor, Sz::Bw, DN, Mem, 8, 8).ea(Ea::Op1),
    e(Opcode::Eor, Sz::L, DN, Mem, 12, 12).ea(Ea::Op1),
    e(Opcode::Cmp, Sz::Bw, X, DN, 4, 4).ea(Ea::Op0),
    e(Opcode::Cmp, Sz::L, X, DN, 6, 6).ea(Ea::Op0).flags(PAIR_BACK),
    e(Opcode::Adda, Sz::W, X, AN, 8, 8).ea(Ea::Op0),
    e(Opcode::Adda, Sz::L, DN, AN, 8, 8),
    e(Opcode::Adda, Sz::L, AN, AN, 8, 8),
    e(Opcode::Adda, Sz::L, IMM, AN, 16, 16),
    e(Opcode::Adda, Sz::L, X, AN, 6, 6).ea(Ea::Op0).flags(PAIR_BACK),
    e(Opcode::Suba, Sz::W, X, AN, 8, 8).ea(Ea::Op0),
    e(Opcode::Suba, Sz::L, DN, AN, 8, 8),
    e(Opcode::Suba, Sz::L, AN, AN, 8, 8),
    e(Opcode::Suba, Sz::L, IMM, AN, 16, 16),
    e(Opcode::Suba, Sz::L, X, AN, 6, 6).ea(Ea::Op0).flags(PAIR_BACK),
    e(Opcode::Cmpa, Sz::Any, X, AN, 6, 6).ea(Ea::Op0).flags(PAIR_BACK),

    // Immediate forms
    e(Opcode::Addi, Sz::Bw, IMM, DN, 8, 8),
    e(Opcode::Addi, Sz::L, IMM, DN, 16, 16),
    e(Opcode::Addi, Sz::Bw, IMM, Mem, 12, 12).ea(Ea::Op1),
    e(Opcode::Addi, Sz::L, IMM, Mem, 20, 20).ea(Ea::Op1),
    e(Opcode::Subi, Sz::Bw, IMM, DN, 8, 8),
    e(Opcode::Subi, Sz::L, IMM, DN, 16, 16),
    e(Opcode::Subi, Sz::Bw, IMM, Mem, 12, 12).ea(Ea::Op1),
    e(Opcode::Subi, Sz::L, IMM, Mem, 20, 20).ea(Ea::Op1),
    e(Opcode::Andi, Sz::Any, IMM, Is(Other), 20, 20),
    e(Opcode::Andi, Sz::Bw, IMM, DN, 8, 8),
    e(Opcode::Andi, Sz::L, IMM, DN, 14, 14),
    e(Opcode::Andi, Sz::Bw, IMM, Mem, 12, 12).ea(Ea::Op1),
    e(Opcode::Andi, Sz::L, IMM, Mem, 20, 20).ea(Ea::Op1),
    e(Opcode::Ori, Sz::Any, IMM, Is(Other), 20, 20),
    e(Opcode::Ori, Sz::Bw, IMM, DN, 8, 8),
    e(Opcode::Ori, Sz::L, IMM, DN, 16, 16),
    e(Opcode::Ori, Sz::Bw, IMM, Mem, 12, 12).ea(Ea::Op1),
    e(Opcode::Ori, Sz::L, IMM, Mem, 20, 20).ea(Ea::Op1),
    e(Opcode::Eori, Sz::Any, IMM, Is(Other), 20, 20),
    e(Opcode::Eori, Sz::Bw, IMM, DN, 8, 8),
    e(Opcode::Eori, Sz::L, IMM, DN, 16, 16),
    e(Opcode::Eori, Sz::Bw, IMM, Mem, 12, 12).ea(Ea::Op1),
    e(Opcode::Eori, Sz::L, IMM, Mem, 20, 20).ea(Ea::Op1),
    e(Opcode::Cmpi, Sz::Bw, IMM, DN, 8, 8),
    e(Opcode::Cmpi, Sz::L, IMM, DN, 14, 14),
    e(Opcode::Cmpi, Sz::Bw, IMM, Mem, 8, 8).ea(Ea::Op1),
    e(Opcode::Cmpi, Sz::L, IMM, Mem, 12, 12).ea(Ea::Op1),
    e(Opcode::Addq, Sz::Bw, IMM, DN, 4, 4),
    e(Opcode::Addq, Sz::Any, IMM, AN, 8, 8),
    e(Opcode::Addq, Sz::L, IMM, DN, 8, 8),
    e(Opcode::Addq, Sz::Bw, IMM, Mem, 8, 8).ea(Ea::Op1),
    e(Opcode::Addq, Sz::L, IMM, Mem, 12, 12).ea(Ea::Op1),
    e(Opcode::Subq, Sz::Bw, IMM, DN, 4, 4),
    e(Opcode::Subq, Sz::Any, IMM, AN, 8, 8),
    e(Opcode::Subq, Sz::L, IMM, DN, 8, 8),
    e(Opcode::Subq, Sz::Bw, IMM, Mem, 8, 8).ea(Ea::Op1),
    e(Opcode::Subq, Sz::L, IMM, Mem, 12, 12).ea(Ea::Op1),

    // Single operand
    e(Opcode::Clr, Sz::Bw, DN, X, 4, 4),
    e(Opcode::Clr, Sz::L, DN, X, 6, 6).flags(PAIR_BACK),
    e(Opcode::Clr, Sz::Bw, Mem, X, 8, 8).ea(Ea::Op0),
    e(Opcode::Clr, Sz::L, Mem, X, 12, 12).ea(Ea::Op0),
    e(Opcode::Neg, Sz::Bw, DN, X, 4, 4),
    e(Opcode::Neg, Sz::L, DN, X, 6, 6).flags(PAIR_BACK),
    e(Opcode::Neg, Sz::Bw, Mem, X, 8, 8).ea(Ea::Op0),
    e(Opcode::Neg, Sz::L, Mem, X, 12, 12).ea(Ea::Op0),
    e(Opcode::Negx, Sz::Bw, DN, X, 4, 4),
    e(Opcode::Negx, Sz::L, DN, X, 6, 6).flags(PAIR_BACK),
    e(Opcode::Negx, Sz::Bw, Mem, X, 8, 8).ea(Ea::Op0),
    e(Opcode::Negx, Sz::L, Mem, X, 12, 12).ea(Ea::Op0),
    e(Opcode::Not, Sz::Bw, DN, X, 4, 4),
    e(Opcode::Not, Sz::L, DN, X, 6, 6).flags(PAIR_BACK),
    e(Opcode::Not, Sz::Bw, Mem, X, 8, 8).ea(Ea::Op0),
    e(Opcode::Not, Sz::L, Mem, X, 12, 12).ea(Ea::Op0),
    e(Opcode::Tst, Sz::Any, X, X, 4, 4).ea(Ea::Op0),
    e(Opcode::Tas, Sz::Any, DN, X, 4, 4),
    e(Opcode::Tas, Sz::Any, Mem, X, 14, 14).ea(Ea::Op0),
    e(Opcode::Nbcd, Sz::Any, DN, X, 6, 6).flags(PAIR_BACK),
    e(Opcode::Nbcd, Sz::Any, Mem, X, 8, 8).ea(Ea::Op0),

    // Shifts and rotates: register count or #1-8
    e(Opcode::Asl, Sz::Bw, IMM, DN, 8, 22).flags(PAIR_BACK),
    e(Opcode::Asl, Sz::L, IMM, DN, 10, 24).flags(PAIR_BACK),
    e(Opcode::Asl, Sz::Bw, DN, DN, 6, 132).flags(PAIR_BACK),
    e(Opcode::Asl, Sz::L, DN, DN, 8, 134).flags(PAIR_BACK),
    e(Opcode::Asl, Sz::W, Mem, X, 8, 8).ea(Ea::Op0),
    e(Opcode::Asr, Sz::Bw, IMM, DN, 8, 22).flags(PAIR_BACK),
    e(Opcode::Asr, Sz::L, IMM, DN, 10, 24).flags(PAIR_BACK),
    e(Opcode::Asr, Sz::Bw, DN, DN, 6, 132).flags(PAIR_BACK),
    e(Opcode::Asr, Sz::L, DN, DN, 8, 134).flags(PAIR_BACK),
    e(Opcode::Asr, Sz::W, Mem, X, 8, 8).ea(Ea::Op0),
    e(Opcode::Lsl, Sz::Bw, IMM, DN, 8, 22).flags(PAIR_BACK),
    e(Opcode::Lsl, Sz::L, IMM, DN, 10, 24).flags(PAIR_BACK),
    e(Opcode::Lsl, Sz::Bw, DN, DN, 6, 132).flags(PAIR_BACK),
    e(Opcode::Lsl, Sz::L, DN, DN, 8, 134).flags(PAIR_BACK),
    e(Opcode::Lsl, Sz::W, Mem, X, 8, 8).ea(Ea::Op0),
    e(Opcode::Lsr, Sz::Bw, IMM, DN, 8, 22).flags(PAIR_BACK),
    e(Opcode::Lsr, Sz::L, IMM, DN, 10, 24).flags(PAIR_BACK),
    e(Opcode::Lsr, Sz::Bw, DN, DN, 6, 132).flags(PAIR_BACK),
    e(Opcode::Lsr, Sz::L, DN, DN, 8, 134).flags(PAIR_BACK),
    e(Opcode::Lsr, Sz::W, Mem, X, 8, 8).ea(Ea::Op0),
    e(Opcode::Rol, Sz::Bw, IMM, DN, 8, 22).flags(PAIR_BACK),
    e(Opcode::Rol, Sz::L, IMM, DN, 10, 24).flags(PAIR_BACK),
    e(Opcode::Rol, Sz::Bw, DN, DN, 6, 132).flags(PAIR_BACK),
    e(Opcode::Rol, Sz::L, DN, DN, 8, 134).flags(PAIR_BACK),
    e(Opcode::Rol, Sz::W, Mem, X, 8, 8).ea(Ea::Op0),
    e(Opcode::Ror, Sz::Bw, IMM, DN, 8, 22).flags(PAIR_BACK),
    e(Opcode::Ror, Sz::L, IMM, DN, 10, 24).flags(PAIR_BACK),
    e(Opcode::Ror, Sz::Bw, DN, DN, 6, 132).flags(PAIR_BACK),
    e(Opcode::Ror, Sz::L, DN, DN, 8, 134).flags(PAIR_BACK),
    e(Opcode::Ror, Sz::W, Mem, X, 8, 8).ea(Ea::Op0),
    e(Opcode::Roxl, Sz::Bw, IMM, DN, 8, 22).flags(PAIR_BACK),
    e(Opcode::Roxl, Sz::L, IMM, DN, 10, 24).flags(PAIR_BACK),
    e(Opcode::Roxl, Sz::Bw, DN, DN, 6, 132).flags(PAIR_BACK),
    e(Opcode::Roxl, Sz::L, DN, DN, 8, 134).flags(PAIR_BACK),
    e(Opcode::Roxl, Sz::W, Mem, X, 8, 8).ea(Ea::Op0),
    e(Opcode::Roxr, Sz::Bw, IMM, DN, 8, 22).flags(PAIR_BACK),
    e(Opcode::Roxr, Sz::L, IMM, DN, 10, 24).flags(PAIR_BACK),
    e(Opcode::Roxr, Sz::Bw, DN, DN, 6, 132).flags(PAIR_BACK),
    e(Opcode::Roxr, Sz::L, DN, DN, 8, 134).flags(PAIR_BACK),
    e(Opcode::Roxr, Sz::W, Mem, X, 8, 8).ea(Ea::Op0),

    // Bit operations
    e(Opcode::Btst, Sz::Any, DN, DN, 6, 6).flags(PAIR_BACK),
    e(Opcode::Btst, Sz::Any, IMM, DN, 10, 10).flags(PAIR_BACK),
    e(Opcode::Btst, Sz::Any, DN, X, 4, 4).ea(Ea::Op1),
    e(Opcode::Btst, Sz::Any, IMM, X, 8, 8).ea(Ea::Op1),
    e(Opcode::Bchg, Sz::Any, DN, DN, 6, 8),
    e(Opcode::Bchg, Sz::Any, IMM, DN, 10, 12),
    e(Opcode::Bchg, Sz::Any, DN, X, 8, 8).ea(Ea::Op1),
    e(Opcode::Bchg, Sz::Any, IMM, X, 12, 12).ea(Ea::Op1),
    e(Opcode::Bset, Sz::Any, DN, DN, 6, 8),
    e(Opcode::Bset, Sz::Any, IMM, DN, 10, 12),
    e(Opcode::Bset, Sz::Any, DN, X, 8, 8).ea(Ea::Op1),
    e(Opcode::Bset, Sz::Any, IMM, X, 12, 12).ea(Ea::Op1),
    e(Opcode::Bclr, Sz::Any, DN, DN, 8, 10),
    e(Opcode::Bclr, Sz::Any, IMM, DN, 12, 14),
    e(Opcode::Bclr, Sz::Any, DN, X, 8, 8).ea(Ea::Op1),
    e(Opcode::Bclr, Sz::Any, IMM, X, 12, 12).ea(Ea::Op1),

    // Multiply and divide, data dependent
    e(Opcode::Mulu, Sz::Any, X, DN, 38, 70).ea(Ea::Op0),
    e(Opcode::Muls, Sz::Any, X, DN, 38, 70).ea(Ea::Op0),
    e(Opcode::Divu, Sz::Any, X, DN, 76, 140).ea(Ea::Op0),
    e(Opcode::Divs, Sz::Any, X, DN, 120, 158).ea(Ea::Op0),
    e(Opcode::Chk, Sz::Any, X, DN, 10, 10).ea(Ea::Op0),

    // Multi-precision and BCD
    e(Opcode::Abcd, Sz::Any, DN, DN, 6, 6).flags(PAIR_BACK),
    e(Opcode::Abcd, Sz::Any, Is(PreDec), Is(PreDec), 18, 18),
    e(Opcode::Sbcd, Sz::Any, DN, DN, 6, 6).flags(PAIR_BACK),
    e(Opcode::Sbcd, Sz::Any, Is(PreDec), Is(PreDec), 18, 18),
    e(Opcode::Addx, Sz::Bw, DN, DN, 4, 4),
    e(Opcode::Addx, Sz::L, DN, DN, 8, 8),
    e(Opcode::Addx, Sz::Bw, Is(PreDec), Is(PreDec), 18, 18),
    e(Opcode::Addx, Sz::L, Is(PreDec), Is(PreDec), 30, 30),
    e(Opcode::Subx, Sz::Bw, DN, DN, 4, 4),
    e(Opcode::Subx, Sz::L, DN, DN, 8, 8),
    e(Opcode::Subx, Sz::Bw, Is(PreDec), Is(PreDec), 18, 18),
    e(Opcode::Subx, Sz::L, Is(PreDec), Is(PreDec), 30, 30),
    e(Opcode::Cmpm, Sz::Bw, X, X, 12, 12),
    e(Opcode::Cmpm, Sz::L, X, X, 20, 20),

    // Register lists: 4 cycles per word, 8 per long, up to 16 registers
    e(Opcode::Movem, Sz::W, Is(Other), Mem, 8, 72),
    e(Opcode::Movem, Sz::L, Is(Other), Mem, 8, 136),
    e(Opcode::Movem, Sz::W, Mem, Is(Other), 12, 76),
    e(Opcode::Movem, Sz::L, Mem, Is(Other), 12, 140),
    e(Opcode::Movep, Sz::W, X, X, 16, 16),
    e(Opcode::Movep, Sz::L, X, X, 24, 24),
];

fn ea_time(entry: &Entry, inst: &Instruction) -> Option<u16> {
    let slot = match entry.ea {
        Ea::None => return Some(0),
        Ea::Op0 => 0,
        Ea::Op1 => 1,
    };
    let Some(kind) = Kind::of(&inst.operands[slot]) else {
        return Some(0);
    };
    source_addend(kind, inst.size == Some(Size::Long))
}

/// Estimate the 68000 cycle cost of `inst`.
///
/// Returns `None` for instructions with no known timing, including
/// placeholders and anything above the 68000 instruction set.
pub fn calc_timing(inst: &Instruction) -> Option<Timing> {
    if !inst.is_valid() {
        return None;
    }
    if let Some(timing) = move_timing(inst) {
        return Some(timing);
    }

    let kind0 = Kind::of(&inst.operands[0]);
    let kind1 = Kind::of(&inst.operands[1]);
    TIMINGS
        .iter()
        .filter(|entry| entry.opcode == inst.opcode)
        .filter(|entry| entry.size.matches(inst.size))
        .find(|entry| entry.op0.matches(kind0) && entry.op1.matches(kind1))
        .and_then(|entry| {
            let extra = ea_time(entry, inst)?;
            Some(Timing {
                min: entry.min + extra,
                max: entry.max + extra,
                flags: entry.flags,
            })
        })
}
