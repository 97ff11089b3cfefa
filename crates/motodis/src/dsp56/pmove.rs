//! Effective addresses and the parallel data moves carried in the upper
//! 16 bits of parallel-class instruction words.

use super::instruction::{Instruction, Operand, OperandKind, ParallelMove};
use super::registers::{accumulator, pmove_register, Memory, Reg, BANK_X, BANK_Y, LONG_MOVE};
use crate::cursor::WordCursor;
use crate::error::DecodeError;

/// Which `MMMRRR` modes a given encoding accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EaMode {
    /// Register modes, absolute address and long immediate.
    All,
    /// Register modes and absolute address.
    Abs,
    /// Register modes only.
    Regs,
    /// Post-update modes only (LUA).
    Lua,
}

pub(crate) fn reg_operand(reg: Option<Reg>) -> Result<Operand, DecodeError> {
    reg.map(Operand::reg).ok_or(DecodeError::UnrecognizedEncoding)
}

/// Decode a 6-bit `MMMRRR` effective address, reading the extension word
/// for the absolute and immediate forms.
pub fn decode_mmmrrr(
    cursor: &mut WordCursor,
    memory: Memory,
    mmm: u32,
    rrr: u32,
    mode: EaMode,
) -> Result<Operand, DecodeError> {
    let r = (rrr & 7) as u8;
    let mmm = mmm & 7;
    if mode == EaMode::Lua && mmm > 3 {
        return Err(DecodeError::IllegalAddressingMode);
    }
    let kind = match mmm {
        0 => OperandKind::PostDecOffset(r),
        1 => OperandKind::PostIncOffset(r),
        2 => OperandKind::PostDec(r),
        3 => OperandKind::PostInc(r),
        4 => OperandKind::NoUpdate(r),
        5 => OperandKind::IndexOffset(r),
        7 => OperandKind::PreDec(r),
        _ => {
            return match (r, mode) {
                (4, EaMode::All) => {
                    // Immediate data lives in no memory space.
                    let word = cursor.read_word()?;
                    Ok(Operand::new(Memory::None, OperandKind::Imm(word)))
                }
                (0, EaMode::All | EaMode::Abs) => {
                    let word = cursor.read_word()?;
                    Ok(Operand::new(memory, OperandKind::Abs(word)))
                }
                _ => Err(DecodeError::IllegalAddressingMode),
            };
        }
    };
    Ok(Operand::new(memory, kind))
}

/// The 2-bit `MM` modes of the XY moves.
fn decode_mmrrr(memory: Memory, mm: u32, rrr: u32) -> Operand {
    let r = (rrr & 7) as u8;
    let kind = match mm & 3 {
        0 => OperandKind::NoUpdate(r),
        1 => OperandKind::PostIncOffset(r),
        2 => OperandKind::PostDec(r),
        _ => OperandKind::PostInc(r),
    };
    Operand::new(memory, kind)
}

/// Order a memory/register pair by the `W` bit: set means memory is read.
fn directed(w: bool, mem: Operand, reg: Operand) -> ParallelMove {
    if w {
        ParallelMove::new(mem, reg)
    } else {
        ParallelMove::new(reg, mem)
    }
}

/// Decode the parallel move field `pdata` (header bits 23-8) into
/// `out.pmoves`. A field that matches no move pattern carries no move.
pub fn decode_pmove(cursor: &mut WordCursor, out: &mut Instruction, pdata: u32) -> Result<(), DecodeError> {
    let w = pdata & 0x80 != 0;
    let mmm = (pdata >> 3) & 7;
    let rrr = pdata & 7;
    let mode = if w { EaMode::All } else { EaMode::Abs };

    if pdata == 0x2000 {
        return Ok(());
    }

    // R: address register update
    if pdata & 0xFFE0 == 0x2040 {
        let r = rrr as u8;
        let kind = match (pdata >> 3) & 3 {
            0 => OperandKind::PostDecOffset(r),
            1 => OperandKind::PostIncOffset(r),
            2 => OperandKind::PostDec(r),
            _ => OperandKind::PostInc(r),
        };
        out.pmoves[0].operands[0] = Operand::new(Memory::None, kind);
        return Ok(());
    }

    // L: long moves
    if pdata & 0xF440 == 0x4040 || pdata & 0xF440 == 0x4000 {
        let lll = ((pdata >> 8) & 3) | ((pdata >> 9) & 4);
        let reg = Operand::reg(LONG_MOVE[lll as usize]);
        let mem = if pdata & 0x40 != 0 {
            decode_mmmrrr(cursor, Memory::L, mmm, rrr, EaMode::Abs)?
        } else {
            Operand::new(Memory::L, OperandKind::AbsShort(pdata & 0x3F))
        };
        out.pmoves[0] = directed(w, mem, reg);
        return Ok(());
    }

    // X:R class I
    if pdata & 0xF040 == 0x1000 {
        let reg = Operand::reg(BANK_X[((pdata >> 10) & 3) as usize]);
        let mem = decode_mmmrrr(cursor, Memory::X, mmm, rrr, mode)?;
        out.pmoves[0] = directed(w, mem, reg);
        let d = accumulator(pdata & 0x200 != 0);
        let f = if pdata & 0x100 != 0 { Reg::Y1 } else { Reg::Y0 };
        out.pmoves[1] = ParallelMove::new(Operand::reg(d), Operand::reg(f));
        return Ok(());
    }

    // R:Y class I
    if pdata & 0xF040 == 0x1040 {
        let reg = Operand::reg(BANK_Y[((pdata >> 8) & 3) as usize]);
        let mem = decode_mmmrrr(cursor, Memory::Y, mmm, rrr, mode)?;
        out.pmoves[1] = directed(w, mem, reg);
        let d = accumulator(pdata & 0x800 != 0);
        let e = if pdata & 0x400 != 0 { Reg::X1 } else { Reg::X0 };
        out.pmoves[0] = ParallelMove::new(Operand::reg(d), Operand::reg(e));
        return Ok(());
    }

    // X:R class II: acc -> x:ea, x0 -> acc
    if pdata & 0xFEC0 == 0x0800 {
        let acc = Operand::reg(accumulator(pdata & 0x100 != 0));
        let mem = decode_mmmrrr(cursor, Memory::X, mmm, rrr, EaMode::Regs)?;
        out.pmoves[0] = ParallelMove::new(acc, mem);
        out.pmoves[1] = ParallelMove::new(Operand::reg(Reg::X0), acc);
        return Ok(());
    }

    // R:Y class II: y0 -> acc, acc -> y:ea
    if pdata & 0xFEC0 == 0x0880 {
        let acc = Operand::reg(accumulator(pdata & 0x100 != 0));
        let mem = decode_mmmrrr(cursor, Memory::Y, mmm, rrr, EaMode::Regs)?;
        out.pmoves[1] = ParallelMove::new(acc, mem);
        out.pmoves[0] = ParallelMove::new(Operand::reg(Reg::Y0), acc);
        return Ok(());
    }

    // X: and Y: memory moves with a 5-bit register field
    let ddddd = ((pdata >> 8) & 7) | ((pdata >> 9) & 0x18);
    let single = match pdata & 0xC840 {
        0x4000 => Some((Memory::X, 0, false)),
        0x4040 => Some((Memory::X, 0, true)),
        0x4800 => Some((Memory::Y, 1, false)),
        0x4840 => Some((Memory::Y, 1, true)),
        _ => None,
    };
    if let Some((memory, slot, has_ea)) = single {
        let reg = reg_operand(pmove_register(ddddd))?;
        let mem = if has_ea {
            decode_mmmrrr(cursor, memory, mmm, rrr, mode)?
        } else {
            Operand::new(memory, OperandKind::AbsShort(pdata & 0x3F))
        };
        out.pmoves[slot] = directed(w, mem, reg);
        return Ok(());
    }

    // R: register to register
    if pdata & 0xFC00 == 0x2000 {
        let src = reg_operand(pmove_register(pdata >> 5))?;
        let dst = reg_operand(pmove_register(pdata))?;
        out.pmoves[0] = ParallelMove::new(src, dst);
        return Ok(());
    }

    // I: immediate short
    if pdata & 0xE000 == 0x2000 {
        let imm = Operand::new(Memory::None, OperandKind::ImmShort((pdata & 0xFF) as u8 as i8));
        let dst = reg_operand(pmove_register(pdata >> 8))?;
        out.pmoves[0] = ParallelMove::new(imm, dst);
        return Ok(());
    }

    // XY: two moves, X side on R0-R3 or R4-R7 and Y side on the other bank
    if pdata & 0x8000 != 0 {
        let x_reg = Operand::reg(BANK_X[((pdata >> 10) & 3) as usize]);
        let x_mem = decode_mmrrr(Memory::X, (pdata >> 3) & 3, rrr);
        out.pmoves[0] = directed(w, x_mem, x_reg);

        let y_rrr = ((rrr & 4) ^ 4) | ((pdata >> 5) & 3);
        let y_w = pdata & 0x4000 != 0;
        let y_reg = Operand::reg(BANK_Y[((pdata >> 8) & 3) as usize]);
        let y_mem = decode_mmrrr(Memory::Y, (pdata >> 12) & 3, y_rrr);
        out.pmoves[1] = directed(y_w, y_mem, y_reg);
        return Ok(());
    }

    Ok(())
}
