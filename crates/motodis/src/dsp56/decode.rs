use log::trace;

use super::instruction::{Condition, Instruction, Opcode, Operand, OperandKind};
use super::pmove::{decode_mmmrrr, decode_pmove, reg_operand, EaMode};
use super::registers::{accumulator, Memory, Reg, DIV_SOURCE, MOVEC, TRIPLE_BIT};
use super::tables::ALU_TABLE;
use crate::cursor::{UnitCursor, WordCursor};
use crate::error::DecodeError;

/// Options for [`decode`]. The 56000 has no revision tiers to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DspSettings;

/// Width of the INVALID placeholder: one word.
const PLACEHOLDER_WORDS: usize = 1;

type Handler = fn(&mut WordCursor<'_>, &mut Instruction, u32) -> Result<(), DecodeError>;

/// One non-parallel dispatch row: `header & mask == val` selects `handler`.
struct MatchEntry {
    mask: u32,
    val: u32,
    opcode: Opcode,
    handler: Handler,
}

const fn m(mask: u32, val: u32, opcode: Opcode, handler: Handler) -> MatchEntry {
    MatchEntry {
        mask,
        val,
        opcode,
        handler,
    }
}

// ─── Operand helpers ─────────────────────────────────────────────

fn imm(value: u32) -> Operand {
    Operand::new(Memory::None, OperandKind::Imm(value))
}

fn abs(value: u32) -> Operand {
    Operand::new(Memory::None, OperandKind::Abs(value))
}

/// X or Y space selected by a single bit.
fn x_or_y(bit: bool) -> Memory {
    if bit {
        Memory::Y
    } else {
        Memory::X
    }
}

/// The common `MMMRRR` field in bits 13-8.
fn ea_field(cursor: &mut WordCursor, header: u32, memory: Memory, mode: EaMode) -> Result<Operand, DecodeError> {
    decode_mmmrrr(cursor, memory, (header >> 11) & 7, (header >> 8) & 7, mode)
}

/// Six-bit short address in bits 13-8.
fn short_field(header: u32, memory: Memory) -> Operand {
    Operand::new(memory, OperandKind::AbsShort((header >> 8) & 0x3F))
}

fn io_short(pppppp: u32, memory: Memory) -> Operand {
    Operand::new(memory, OperandKind::IoShort(0xFFC0 | (pppppp & 0x3F)))
}

/// Place a pair by the `W` bit in bit 15: set means `a` is the source.
fn set_directed(out: &mut Instruction, header: u32, a: Operand, b: Operand) {
    let w = header & 0x8000 != 0;
    out.operands[0] = if w { a } else { b };
    out.operands[1] = if w { b } else { a };
}

// ─── Parallel-class instructions ─────────────────────────────────

/// Words whose top nibble is nonzero, plus the MOVE class-II carriers:
/// an ALU operation in the low byte and a move in bits 23-8.
fn decode_parallel(cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    let entry = &ALU_TABLE[(header & 0xFF) as usize];
    if entry.opcode == Opcode::Invalid {
        return Err(DecodeError::UnrecognizedEncoding);
    }
    out.opcode = entry.opcode;
    out.neg_operands = entry.neg;
    for (slot, reg) in out.operands.iter_mut().zip(entry.regs.iter()) {
        if let Some(reg) = reg {
            *slot = Operand::reg(*reg);
        }
    }
    decode_pmove(cursor, out, (header >> 8) & 0xFFFF)
}

fn nonp_parallel(cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    decode_parallel(cursor, out, header)
}

// ─── Non-parallel: control and arithmetic ────────────────────────

fn nonp_none(_cursor: &mut WordCursor, _out: &mut Instruction, _header: u32) -> Result<(), DecodeError> {
    Ok(())
}

fn nonp_div(_cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    out.operands[0] = Operand::reg(DIV_SOURCE[((header >> 4) & 3) as usize]);
    out.operands[1] = Operand::reg(accumulator(header & 0x08 != 0));
    Ok(())
}

/// ANDI / ORI to MR, CCR or OMR.
fn nonp_imm_control(_cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    let dest = match header & 3 {
        0 => Reg::Mr,
        1 => Reg::Ccr,
        2 => Reg::Omr,
        _ => return Err(DecodeError::UnrecognizedEncoding),
    };
    out.operands[0] = imm((header >> 8) & 0xFF);
    out.operands[1] = Operand::reg(dest);
    Ok(())
}

fn nonp_tcc(_cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    let (src, dst) = match (header >> 3) & 0xF {
        0x0 => (Reg::B, Reg::A),
        0x1 => (Reg::A, Reg::B),
        0x8 => (Reg::X0, Reg::A),
        0x9 => (Reg::X0, Reg::B),
        0xA => (Reg::Y0, Reg::A),
        0xB => (Reg::Y0, Reg::B),
        0xC => (Reg::X1, Reg::A),
        0xD => (Reg::X1, Reg::B),
        0xE => (Reg::Y1, Reg::A),
        0xF => (Reg::Y1, Reg::B),
        _ => return Err(DecodeError::UnrecognizedEncoding),
    };
    out.condition = Some(Condition::from_bits(header >> 12));
    out.operands[0] = Operand::reg(src);
    out.operands[1] = Operand::reg(dst);
    if header & 0x1_0000 != 0 {
        out.operands2[0] = Operand::reg(Reg::R(((header >> 8) & 7) as u8));
        out.operands2[1] = Operand::reg(Reg::R((header & 7) as u8));
    }
    Ok(())
}

fn nonp_norm(_cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    out.operands[0] = Operand::reg(Reg::R(((header >> 8) & 7) as u8));
    out.operands[1] = Operand::reg(accumulator(header & 0x08 != 0));
    Ok(())
}

fn nonp_lua(cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    out.operands[0] = ea_field(cursor, header, Memory::None, EaMode::Lua)?;
    let n = (header & 7) as u8;
    out.operands[1] = Operand::reg(if header & 0x08 != 0 { Reg::N(n) } else { Reg::R(n) });
    Ok(())
}

// ─── Non-parallel: jumps ─────────────────────────────────────────

/// 12-bit absolute target in the opcode word; condition in bits 15-12.
fn nonp_jump_abs(_cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    if out.opcode.is_conditional() {
        out.condition = Some(Condition::from_bits(header >> 12));
    }
    out.operands[0] = abs(header & 0xFFF);
    Ok(())
}

/// Effective-address target; condition in bits 3-0.
fn nonp_jump_ea(cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    if out.opcode.is_conditional() {
        out.condition = Some(Condition::from_bits(header));
    }
    out.operands[0] = ea_field(cursor, header, Memory::None, EaMode::Abs)?;
    Ok(())
}

// ─── Non-parallel: bit manipulation ──────────────────────────────

/// BCLR/BSET/BCHG/BTST and the JCLR family, for all four operand forms
/// selected by bits 15-14.
fn nonp_bit(cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    out.operands[0] = imm(header & 0x1F);
    let memory = x_or_y(header & 0x40 != 0);
    let jumps = match (header >> 14) & 3 {
        0 => {
            out.operands[1] = short_field(header, memory);
            header & 0x80 != 0
        }
        1 => {
            out.operands[1] = ea_field(cursor, header, memory, EaMode::Abs)?;
            header & 0x80 != 0
        }
        2 => {
            out.operands[1] = io_short(header >> 8, memory);
            header & 0x80 != 0
        }
        _ => {
            out.operands[1] = reg_operand(TRIPLE_BIT[((header >> 8) & 0x3F) as usize])?;
            header & 0x40 == 0
        }
    };
    if jumps {
        out.operands[2] = abs(cursor.read_word()?);
    }
    Ok(())
}

// ─── Non-parallel: hardware loops ────────────────────────────────

/// DO carries its loop end address in a second word; the operand holds
/// the first address past the loop body.
fn loop_end(cursor: &mut WordCursor, out: &mut Instruction) -> Result<(), DecodeError> {
    if out.opcode == Opcode::Do {
        let word = cursor.read_word()?;
        out.operands[1] = abs((word & 0xFFFF) + 1);
    }
    Ok(())
}

fn nonp_loop_ea(cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    out.operands[0] = ea_field(cursor, header, x_or_y(header & 0x40 != 0), EaMode::Regs)?;
    loop_end(cursor, out)
}

fn nonp_loop_aa(cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    out.operands[0] = short_field(header, x_or_y(header & 0x40 != 0));
    loop_end(cursor, out)
}

fn nonp_loop_imm(cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    out.operands[0] = imm(((header & 0xF) << 8) | ((header >> 8) & 0xFF));
    loop_end(cursor, out)
}

fn nonp_loop_reg(cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    out.operands[0] = reg_operand(TRIPLE_BIT[((header >> 8) & 0x3F) as usize])?;
    loop_end(cursor, out)
}

// ─── Non-parallel: MOVEC / MOVEM / MOVEP ─────────────────────────

fn movec_reg(header: u32) -> Result<Operand, DecodeError> {
    reg_operand(MOVEC[(header & 0x1F) as usize])
}

fn nonp_movec_imm(_cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    out.operands[0] = imm((header >> 8) & 0xFF);
    out.operands[1] = movec_reg(header)?;
    Ok(())
}

fn nonp_movec_ea(cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    let mode = if header & 0x8000 != 0 { EaMode::All } else { EaMode::Abs };
    let ea = ea_field(cursor, header, x_or_y(header & 0x40 != 0), mode)?;
    let reg = movec_reg(header)?;
    set_directed(out, header, ea, reg);
    Ok(())
}

fn nonp_movec_aa(_cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    let aa = short_field(header, x_or_y(header & 0x40 != 0));
    let reg = movec_reg(header)?;
    set_directed(out, header, aa, reg);
    Ok(())
}

fn nonp_movec_reg(_cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    let other = reg_operand(TRIPLE_BIT[((header >> 8) & 0x3F) as usize])?;
    let reg = movec_reg(header)?;
    set_directed(out, header, other, reg);
    Ok(())
}

fn nonp_movem_ea(cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    let ea = ea_field(cursor, header, Memory::P, EaMode::Abs)?;
    let reg = reg_operand(TRIPLE_BIT[(header & 0x3F) as usize])?;
    set_directed(out, header, ea, reg);
    Ok(())
}

fn nonp_movem_aa(_cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    let aa = short_field(header, Memory::P);
    let reg = reg_operand(TRIPLE_BIT[(header & 0x3F) as usize])?;
    set_directed(out, header, aa, reg);
    Ok(())
}

/// Peripheral side of MOVEP: space from bit 16, address in bits 5-0.
fn movep_peripheral(header: u32) -> Operand {
    io_short(header, x_or_y(header & 0x1_0000 != 0))
}

fn nonp_movep_ea(cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    let mode = if header & 0x8000 != 0 { EaMode::All } else { EaMode::Abs };
    let ea = ea_field(cursor, header, x_or_y(header & 0x40 != 0), mode)?;
    set_directed(out, header, ea, movep_peripheral(header));
    Ok(())
}

fn nonp_movep_p(cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    let ea = ea_field(cursor, header, Memory::P, EaMode::Abs)?;
    set_directed(out, header, ea, movep_peripheral(header));
    Ok(())
}

fn nonp_movep_reg(_cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    let reg = reg_operand(TRIPLE_BIT[((header >> 8) & 0x3F) as usize])?;
    set_directed(out, header, reg, movep_peripheral(header));
    Ok(())
}

// ─── Non-parallel matcher table ──────────────────────────────────

/// Words with bits 23-20 clear, most specific patterns first.
static NON_PARALLEL: &[MatchEntry] = &[
    m(0xFFFFFF, 0x000000, Opcode::Nop, nonp_none),
    m(0xFFFFFF, 0x000004, Opcode::Rti, nonp_none),
    m(0xFFFFFF, 0x000005, Opcode::Illegal, nonp_none),
    m(0xFFFFFF, 0x000006, Opcode::Swi, nonp_none),
    m(0xFFFFFF, 0x00000C, Opcode::Rts, nonp_none),
    m(0xFFFFFF, 0x000084, Opcode::Reset, nonp_none),
    m(0xFFFFFF, 0x000086, Opcode::Wait, nonp_none),
    m(0xFFFFFF, 0x000087, Opcode::Stop, nonp_none),
    m(0xFFFFFF, 0x00008C, Opcode::Enddo, nonp_none),
    m(0xFFF8F7, 0x01D815, Opcode::Norm, nonp_norm),
    m(0xFFFFC7, 0x018040, Opcode::Div, nonp_div),
    m(0xFF00FC, 0x0000B8, Opcode::Andi, nonp_imm_control),
    m(0xFF00FC, 0x0000F8, Opcode::Ori, nonp_imm_control),
    m(0xFE0880, 0x020000, Opcode::Tcc, nonp_tcc),
    // Jumps
    m(0xFFC0FF, 0x0AC080, Opcode::Jmp, nonp_jump_ea),
    m(0xFFC0FF, 0x0BC080, Opcode::Jsr, nonp_jump_ea),
    m(0xFFC0F0, 0x0AC0A0, Opcode::Jcc, nonp_jump_ea),
    m(0xFFC0F0, 0x0BC0A0, Opcode::Jscc, nonp_jump_ea),
    m(0xFFF000, 0x0C0000, Opcode::Jmp, nonp_jump_abs),
    m(0xFFF000, 0x0D0000, Opcode::Jsr, nonp_jump_abs),
    m(0xFF0000, 0x0E0000, Opcode::Jcc, nonp_jump_abs),
    m(0xFF0000, 0x0F0000, Opcode::Jscc, nonp_jump_abs),
    // Bit manipulation, register forms
    m(0xFFC0E0, 0x0AC000, Opcode::Jclr, nonp_bit),
    m(0xFFC0E0, 0x0AC020, Opcode::Jset, nonp_bit),
    m(0xFFC0E0, 0x0AC040, Opcode::Bclr, nonp_bit),
    m(0xFFC0E0, 0x0AC060, Opcode::Bset, nonp_bit),
    m(0xFFC0E0, 0x0BC000, Opcode::Jsclr, nonp_bit),
    m(0xFFC0E0, 0x0BC020, Opcode::Jsset, nonp_bit),
    m(0xFFC0E0, 0x0BC040, Opcode::Bchg, nonp_bit),
    m(0xFFC0E0, 0x0BC060, Opcode::Btst, nonp_bit),
    // Bit manipulation, memory forms (aa, ea, pp)
    m(0xFF80A0, 0x0A0000, Opcode::Bclr, nonp_bit),
    m(0xFF80A0, 0x0A0020, Opcode::Bset, nonp_bit),
    m(0xFF80A0, 0x0A0080, Opcode::Jclr, nonp_bit),
    m(0xFF80A0, 0x0A00A0, Opcode::Jset, nonp_bit),
    m(0xFF80A0, 0x0B0000, Opcode::Bchg, nonp_bit),
    m(0xFF80A0, 0x0B0020, Opcode::Btst, nonp_bit),
    m(0xFF80A0, 0x0B0080, Opcode::Jsclr, nonp_bit),
    m(0xFF80A0, 0x0B00A0, Opcode::Jsset, nonp_bit),
    m(0xFFC0A0, 0x0A8000, Opcode::Bclr, nonp_bit),
    m(0xFFC0A0, 0x0A8020, Opcode::Bset, nonp_bit),
    m(0xFFC0A0, 0x0A8080, Opcode::Jclr, nonp_bit),
    m(0xFFC0A0, 0x0A80A0, Opcode::Jset, nonp_bit),
    m(0xFFC0A0, 0x0B8000, Opcode::Bchg, nonp_bit),
    m(0xFFC0A0, 0x0B8020, Opcode::Btst, nonp_bit),
    m(0xFFC0A0, 0x0B8080, Opcode::Jsclr, nonp_bit),
    m(0xFFC0A0, 0x0B80A0, Opcode::Jsset, nonp_bit),
    // Hardware loops
    m(0xFFC0FF, 0x06C000, Opcode::Do, nonp_loop_reg),
    m(0xFFC0FF, 0x06C020, Opcode::Rep, nonp_loop_reg),
    m(0xFFC0BF, 0x064000, Opcode::Do, nonp_loop_ea),
    m(0xFFC0BF, 0x064020, Opcode::Rep, nonp_loop_ea),
    m(0xFFC0BF, 0x060000, Opcode::Do, nonp_loop_aa),
    m(0xFFC0BF, 0x060020, Opcode::Rep, nonp_loop_aa),
    m(0xFF00F0, 0x060080, Opcode::Do, nonp_loop_imm),
    m(0xFF00F0, 0x0600A0, Opcode::Rep, nonp_loop_imm),
    m(0xFFE0F0, 0x044010, Opcode::Lua, nonp_lua),
    // Moves
    m(0xFF40E0, 0x0440A0, Opcode::Movec, nonp_movec_reg),
    m(0xFF40A0, 0x054020, Opcode::Movec, nonp_movec_ea),
    m(0xFF40A0, 0x050020, Opcode::Movec, nonp_movec_aa),
    m(0xFF00E0, 0x0500A0, Opcode::Movec, nonp_movec_imm),
    m(0xFF40C0, 0x074080, Opcode::Movem, nonp_movem_ea),
    m(0xFF40C0, 0x070000, Opcode::Movem, nonp_movem_aa),
    m(0xFE4080, 0x084080, Opcode::Movep, nonp_movep_ea),
    m(0xFE40C0, 0x084040, Opcode::Movep, nonp_movep_p),
    m(0xFE40C0, 0x084000, Opcode::Movep, nonp_movep_reg),
    // Class II parallel moves with no ALU operation
    m(0xFE4000, 0x080000, Opcode::Move, nonp_parallel),
];

fn decode_non_parallel(cursor: &mut WordCursor, out: &mut Instruction, header: u32) -> Result<(), DecodeError> {
    let entry = NON_PARALLEL
        .iter()
        .find(|entry| header & entry.mask == entry.val)
        .ok_or(DecodeError::UnrecognizedEncoding)?;
    out.opcode = entry.opcode;
    (entry.handler)(cursor, out, header)
}

/// Decode one DSP56000 instruction at the cursor.
///
/// On success `out` holds the instruction and the cursor has moved past
/// all of its words. On failure `out` is an INVALID placeholder carrying
/// the raw word, the cursor has moved one word (less at the very end of
/// the buffer) and the error says why.
pub fn decode(out: &mut Instruction, cursor: &mut WordCursor, _settings: &DspSettings) -> Result<(), DecodeError> {
    let address = cursor.address();
    out.reset(address);

    let mut probe = *cursor;
    let header = match probe.read_word() {
        Ok(header) => header,
        Err(kind) => return Err(fail(out, cursor, 0, kind)),
    };
    out.header = header;

    let res = if header >> 20 == 0 {
        decode_non_parallel(&mut probe, out, header)
    } else {
        decode_parallel(&mut probe, out, header)
    };
    match res {
        Ok(()) => {
            let width = probe.position() - cursor.position();
            out.word_count = width as u32;
            cursor.advance(width);
            Ok(())
        }
        Err(kind) => Err(fail(out, cursor, header, kind)),
    }
}

fn fail(out: &mut Instruction, cursor: &mut WordCursor, header: u32, kind: DecodeError) -> DecodeError {
    let address = cursor.address();
    trace!("p:${address:04x}: ${header:06x} not decoded: {kind}");
    out.set_invalid(address, header);
    cursor.advance(PLACEHOLDER_WORDS);
    kind
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp56::instruction::ParallelMove;

    fn words(ws: &[u32]) -> Vec<u8> {
        ws.iter().flat_map(|w| w.to_be_bytes()[1..].to_vec()).collect()
    }

    fn decode_words(ws: &[u32]) -> (Instruction, Result<(), DecodeError>) {
        let data = words(ws);
        let mut cursor = WordCursor::new(&data, 0);
        let mut inst = Instruction::default();
        let res = decode(&mut inst, &mut cursor, &DspSettings);
        (inst, res)
    }

    fn decode_ok(ws: &[u32]) -> Instruction {
        let (inst, res) = decode_words(ws);
        assert_eq!(res, Ok(()), "failed to decode {ws:06x?}");
        inst
    }

    #[test]
    fn table_entries_are_self_consistent() {
        for entry in NON_PARALLEL {
            assert_eq!(entry.mask & entry.val, entry.val);
            assert_eq!(entry.val >> 20, 0);
            assert_eq!(entry.mask & 0xF00000, 0xF00000);
        }
    }

    #[test]
    fn nop() {
        let inst = decode_ok(&[0x000000]);
        assert_eq!(inst.opcode, Opcode::Nop);
        assert_eq!(inst.word_count, 1);
        assert!(inst.operands[0].is_none());
    }

    #[test]
    fn clr_a_without_move() {
        let inst = decode_ok(&[0x200013]);
        assert_eq!(inst.opcode, Opcode::Clr);
        assert_eq!(inst.operands[0], Operand::reg(Reg::A));
        assert!(inst.pmoves[0].is_empty());
    }

    #[test]
    fn add_with_x_read() {
        // add x0,a x:(r0)+,x1
        let inst = decode_ok(&[0x45D840]);
        assert_eq!(inst.opcode, Opcode::Add);
        assert_eq!(inst.operands[0], Operand::reg(Reg::X0));
        assert_eq!(inst.operands[1], Operand::reg(Reg::A));
        assert_eq!(
            inst.pmoves[0],
            ParallelMove::new(Operand::new(Memory::X, OperandKind::PostInc(0)), Operand::reg(Reg::X1))
        );
    }

    #[test]
    fn move_immediate_short() {
        // move #5,x0
        let inst = decode_ok(&[0x240500]);
        assert_eq!(inst.opcode, Opcode::Move);
        assert_eq!(inst.pmoves[0].operands[0].kind, OperandKind::ImmShort(5));
        assert_eq!(inst.pmoves[0].operands[1], Operand::reg(Reg::X0));
    }

    #[test]
    fn move_with_absolute_extension() {
        // move x:$1234,a
        let inst = decode_ok(&[0x56F000, 0x001234]);
        assert_eq!(inst.word_count, 2);
        assert_eq!(
            inst.pmoves[0].operands[0],
            Operand::new(Memory::X, OperandKind::Abs(0x1234))
        );
        assert_eq!(inst.pmoves[0].operands[1], Operand::reg(Reg::A));
    }

    #[test]
    fn negated_multiply() {
        // mpy -x1,x0,b
        let inst = decode_ok(&[0x2000AC]);
        assert_eq!(inst.opcode, Opcode::Mpy);
        assert!(inst.neg_operands);
        assert_eq!(inst.operands[2], Operand::reg(Reg::B));
    }

    #[test]
    fn jmp_absolute_short() {
        let inst = decode_ok(&[0x0C0123]);
        assert_eq!(inst.opcode, Opcode::Jmp);
        assert_eq!(inst.operands[0], abs(0x123));
        assert_eq!(inst.condition, None);
    }

    #[test]
    fn jcc_carries_condition() {
        // jeq $40
        let inst = decode_ok(&[0x0EA040]);
        assert_eq!(inst.opcode, Opcode::Jcc);
        assert_eq!(inst.condition, Some(Condition::Eq));
        assert_eq!(inst.operands[0], abs(0x40));
    }

    #[test]
    fn jsr_long_target() {
        // jsr $2000
        let inst = decode_ok(&[0x0BF080, 0x002000]);
        assert_eq!(inst.opcode, Opcode::Jsr);
        assert_eq!(inst.operands[0], abs(0x2000));
        assert_eq!(inst.word_count, 2);
    }

    #[test]
    fn jclr_on_peripheral() {
        // jclr #0,x:$ffe9,$100
        let inst = decode_ok(&[0x0AA980, 0x000100]);
        assert_eq!(inst.opcode, Opcode::Jclr);
        assert_eq!(inst.operands[0], imm(0));
        assert_eq!(inst.operands[1], Operand::new(Memory::X, OperandKind::IoShort(0xFFE9)));
        assert_eq!(inst.operands[2], abs(0x100));
        assert_eq!(inst.word_count, 2);
    }

    #[test]
    fn bset_register_form_has_no_target() {
        // bset #3,r2
        let inst = decode_ok(&[0x0AD263]);
        assert_eq!(inst.opcode, Opcode::Bset);
        assert_eq!(inst.operands[1], Operand::reg(Reg::R(2)));
        assert!(inst.operands[2].is_none());
    }

    #[test]
    fn do_loop_end_is_exclusive() {
        // do #16,$0047 (loop end word holds the last address)
        let inst = decode_ok(&[0x061080, 0x000046]);
        assert_eq!(inst.opcode, Opcode::Do);
        assert_eq!(inst.operands[0], imm(0x10));
        assert_eq!(inst.operands[1], abs(0x47));
        assert_eq!(inst.word_count, 2);
    }

    #[test]
    fn rep_register() {
        // rep x0
        let inst = decode_ok(&[0x06C420]);
        assert_eq!(inst.opcode, Opcode::Rep);
        assert_eq!(inst.operands[0], Operand::reg(Reg::X0));
        assert_eq!(inst.word_count, 1);
    }

    #[test]
    fn tcc_with_address_registers() {
        // tgt x0,a r1,r2
        let inst = decode_ok(&[0x037142]);
        assert_eq!(inst.opcode, Opcode::Tcc);
        assert_eq!(inst.condition, Some(Condition::Gt));
        assert_eq!(inst.operands[0], Operand::reg(Reg::X0));
        assert_eq!(inst.operands2[0], Operand::reg(Reg::R(1)));
        assert_eq!(inst.operands2[1], Operand::reg(Reg::R(2)));
    }

    #[test]
    fn movec_immediate_is_unsigned() {
        // movec #$ff,m0
        let inst = decode_ok(&[0x05FFA0]);
        assert_eq!(inst.opcode, Opcode::Movec);
        assert_eq!(inst.operands[0], imm(0xFF));
        assert_eq!(inst.operands[1], Operand::reg(Reg::M(0)));
    }

    #[test]
    fn movep_write_to_peripheral() {
        // movep x:(r0),x:$ffe0
        let inst = decode_ok(&[0x08E0A0]);
        assert_eq!(inst.opcode, Opcode::Movep);
        assert_eq!(inst.operands[0], Operand::new(Memory::X, OperandKind::NoUpdate(0)));
        assert_eq!(inst.operands[1], Operand::new(Memory::X, OperandKind::IoShort(0xFFE0)));
    }

    #[test]
    fn movem_takes_any_onchip_register() {
        // movem p:$5,a
        let inst = decode_ok(&[0x07850E]);
        assert_eq!(inst.opcode, Opcode::Movem);
        assert_eq!(inst.operands[0], Operand::new(Memory::P, OperandKind::AbsShort(5)));
        assert_eq!(inst.operands[1], Operand::reg(Reg::A));

        // movem r0,p:$2
        let inst = decode_ok(&[0x070210]);
        assert_eq!(inst.operands[0], Operand::reg(Reg::R(0)));
        assert_eq!(inst.operands[1], Operand::new(Memory::P, OperandKind::AbsShort(2)));

        // Unassigned register code
        let (inst, res) = decode_words(&[0x070228]);
        assert_eq!(res, Err(DecodeError::UnrecognizedEncoding));
        assert_eq!(inst.opcode, Opcode::Invalid);
    }

    #[test]
    fn andi_to_ccr() {
        let inst = decode_ok(&[0x00FEB9]);
        assert_eq!(inst.opcode, Opcode::Andi);
        assert_eq!(inst.operands[0], imm(0xFE));
        assert_eq!(inst.operands[1], Operand::reg(Reg::Ccr));
    }

    #[test]
    fn invalid_word_becomes_placeholder() {
        let (inst, res) = decode_words(&[0x000001]);
        assert_eq!(res, Err(DecodeError::UnrecognizedEncoding));
        assert_eq!(inst.opcode, Opcode::Invalid);
        assert_eq!(inst.word_count, 1);
        assert_eq!(inst.operands[0], abs(0x000001));
    }

    #[test]
    fn truncated_extension_fails_one_word() {
        let data = words(&[0x0BF080]);
        let mut cursor = WordCursor::new(&data, 0x10);
        let mut inst = Instruction::default();
        let res = decode(&mut inst, &mut cursor, &DspSettings);
        assert_eq!(res, Err(DecodeError::BufferExhausted));
        assert_eq!(inst.address, 0x10);
        assert_eq!(inst.operands[0], abs(0x0BF080));
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn partial_trailing_word() {
        let data = [0x00, 0x00];
        let mut cursor = WordCursor::new(&data, 0);
        let mut inst = Instruction::default();
        assert_eq!(
            decode(&mut inst, &mut cursor, &DspSettings),
            Err(DecodeError::BufferExhausted)
        );
        assert_eq!(inst.opcode, Opcode::Invalid);
    }
}
