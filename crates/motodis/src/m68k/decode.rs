use log::trace;

use super::addressing::{decode_ea, read_immediate, EaClass, IndexRegister};
use super::instruction::*;
use super::variants::*;
use crate::cursor::{Cursor, UnitCursor};
use crate::error::DecodeError;

/// Options for [`decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeSettings {
    /// Revision tier; gates instructions, control registers and
    /// extension-word formats.
    pub cpu: CpuVariant,
}

/// Width of the INVALID placeholder: one opcode word.
const PLACEHOLDER_BYTES: usize = 2;

/// Decode state for one attempt. Owns a copy of the caller's cursor so a
/// failed attempt leaves the caller untouched.
struct DecodeCtx<'a> {
    cursor: Cursor<'a>,
    cpu: CpuVariant,
    /// Address of the opcode word.
    address: u32,
}

impl<'a> DecodeCtx<'a> {
    fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.cursor.read_u16()
    }

    fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.cursor.read_u32()
    }

    /// Distance from the opcode word to the next unread byte.
    fn read_disp(&self) -> i32 {
        self.cursor.address().wrapping_sub(self.address) as i32
    }

    fn ea(&mut self, class: EaClass, mode: u16, reg: u16, size: Option<Size>) -> Result<Operand, DecodeError> {
        decode_ea(
            &mut self.cursor,
            self.cpu,
            class,
            (mode & 7) as u8,
            (reg & 7) as u8,
            size,
            self.address,
        )
    }

    /// EA from the standard mode/register fields in bits 5-0.
    fn ea_low(&mut self, header: u16, class: EaClass, size: Option<Size>) -> Result<Operand, DecodeError> {
        self.ea(class, header >> 3, header, size)
    }

    fn require_020(&self) -> Result<(), DecodeError> {
        if self.cpu.is_020_plus() {
            Ok(())
        } else {
            Err(DecodeError::UnsupportedOnRevision)
        }
    }
}

type Handler = fn(&mut DecodeCtx<'_>, &mut Instruction, u16) -> Result<(), DecodeError>;

/// One dispatch row: `header & mask == val` selects `handler` when the
/// selected CPU is in `cpu`.
struct MatchEntry {
    mask: u16,
    val: u16,
    cpu: CpuMask,
    opcode: Opcode,
    handler: Handler,
}

const fn field_mask(shift: u32, count: u32) -> u16 {
    (((1u32 << count) - 1) << shift) as u16
}

const fn m1(sh: u32, ct: u32, val: u16, cpu: CpuMask, opcode: Opcode, handler: Handler) -> MatchEntry {
    MatchEntry {
        mask: field_mask(sh, ct),
        val: ((val as u32) << sh) as u16,
        cpu,
        opcode,
        handler,
    }
}

#[allow(clippy::too_many_arguments)]
const fn m2(
    sh: u32,
    ct: u32,
    val: u16,
    sh2: u32,
    ct2: u32,
    val2: u16,
    cpu: CpuMask,
    opcode: Opcode,
    handler: Handler,
) -> MatchEntry {
    MatchEntry {
        mask: field_mask(sh, ct) | field_mask(sh2, ct2),
        val: (((val as u32) << sh) | ((val2 as u32) << sh2)) as u16,
        cpu,
        opcode,
        handler,
    }
}

#[allow(clippy::too_many_arguments)]
const fn m3(
    sh: u32,
    ct: u32,
    val: u16,
    sh2: u32,
    ct2: u32,
    val2: u16,
    sh3: u32,
    ct3: u32,
    val3: u16,
    cpu: CpuMask,
    opcode: Opcode,
    handler: Handler,
) -> MatchEntry {
    MatchEntry {
        mask: field_mask(sh, ct) | field_mask(sh2, ct2) | field_mask(sh3, ct3),
        val: (((val as u32) << sh) | ((val2 as u32) << sh2) | ((val3 as u32) << sh3)) as u16,
        cpu,
        opcode,
        handler,
    }
}

// ─── Operand helpers ─────────────────────────────────────────────

const STANDARD_SIZES: [Option<Size>; 4] = [Some(Size::Byte), Some(Size::Word), Some(Size::Long), None];

/// Two-bit size field as used by most ALU instructions; `11` is not a size.
fn standard_size(bits: u16) -> Result<Size, DecodeError> {
    STANDARD_SIZES[(bits & 3) as usize].ok_or(DecodeError::UnrecognizedEncoding)
}

fn imm(value: u32, size: Size, signed: bool) -> Operand {
    Operand::Immediate(Immediate { value, size, signed })
}

fn imm_byte(value: u16) -> Operand {
    imm((value & 0xFF) as u32, Size::Byte, false)
}

fn imm_word(value: u16) -> Operand {
    imm(value as u32, Size::Word, false)
}

fn dn(header: u16, shift: u32) -> Operand {
    Operand::DataDirect(((header >> shift) & 7) as u8)
}

fn an(header: u16, shift: u32) -> Operand {
    Operand::AddressDirect(((header >> shift) & 7) as u8)
}

fn d_or_a(is_address: bool, reg: u16) -> Operand {
    if is_address {
        Operand::AddressDirect((reg & 7) as u8)
    } else {
        Operand::DataDirect((reg & 7) as u8)
    }
}

fn condition(header: u16) -> Option<Condition> {
    Some(Condition::from_bits(((header >> 8) & 0xF) as u8))
}

/// Immediate byte stored in a word whose high byte must be clear.
fn read_imm_byte_word(ctx: &mut DecodeCtx<'_>) -> Result<Operand, DecodeError> {
    let word = ctx.read_u16()?;
    if word & 0xFF00 != 0 {
        return Err(DecodeError::UnrecognizedEncoding);
    }
    Ok(imm_byte(word))
}

// ─── Group 0: Immediate operations, bit ops, 68020 atomics ───────

fn inst_imm_sr(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, _header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = imm_word(ctx.read_u16()?);
    inst.operands[1] = Operand::Sr;
    Ok(())
}

fn inst_imm_ccr(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, _header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = read_imm_byte_word(ctx)?;
    inst.operands[1] = Operand::Ccr;
    Ok(())
}

fn inst_integer_imm_ea(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let size = standard_size(header >> 6)?;
    inst.size = Some(size);
    inst.operands[0] = Operand::Immediate(read_immediate(&mut ctx.cursor, Some(size))?);
    inst.operands[1] = ctx.ea_low(header, EaClass::DataAlt, Some(size))?;
    Ok(())
}

fn bit_imm(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16, class: EaClass) -> Result<(), DecodeError> {
    inst.operands[0] = read_imm_byte_word(ctx)?;
    inst.operands[1] = ctx.ea_low(header, class, None)?;
    // Long on a data register, byte in memory.
    inst.size = Some(match inst.operands[1] {
        Operand::DataDirect(_) => Size::Long,
        _ => Size::Byte,
    });
    Ok(())
}

fn inst_bchg_imm(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    bit_imm(ctx, inst, header, EaClass::DataAlt)
}

fn inst_btst_imm(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    bit_imm(ctx, inst, header, EaClass::Data)
}

fn inst_bchg(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = dn(header, 9);
    inst.operands[1] = ctx.ea_low(header, EaClass::DataAlt, Some(Size::Byte))?;
    Ok(())
}

fn inst_btst(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = dn(header, 9);
    inst.operands[1] = ctx.ea_low(header, EaClass::Data, Some(Size::Byte))?;
    Ok(())
}

fn inst_movep(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(if header & 0x0040 != 0 { Size::Long } else { Size::Word });
    let mem = Operand::Displacement {
        reg: (header & 7) as u8,
        disp: ctx.read_u16()? as i16,
    };
    let reg = dn(header, 9);
    // Bit 7 set: register to memory.
    if header & 0x0080 != 0 {
        inst.operands[0] = reg;
        inst.operands[1] = mem;
    } else {
        inst.operands[0] = mem;
        inst.operands[1] = reg;
    }
    Ok(())
}

fn inst_moves(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let size = standard_size(header >> 6)?;
    let ext = ctx.read_u16()?;
    inst.size = Some(size);
    let reg = d_or_a(ext & 0x8000 != 0, ext >> 12);
    let ea = ctx.ea_low(header, EaClass::Alt, Some(size))?;
    if ext & 0x0800 != 0 {
        inst.operands[0] = reg;
        inst.operands[1] = ea;
    } else {
        inst.operands[0] = ea;
        inst.operands[1] = reg;
    }
    Ok(())
}

fn inst_rtm(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = d_or_a(header & 0x0008 != 0, header);
    Ok(())
}

fn inst_callm(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = read_imm_byte_word(ctx)?;
    inst.operands[1] = ctx.ea_low(header, EaClass::Control, None)?;
    Ok(())
}

fn inst_cas(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    const SIZES: [Option<Size>; 4] = [None, Some(Size::Byte), Some(Size::Word), Some(Size::Long)];
    let size = SIZES[((header >> 9) & 3) as usize].ok_or(DecodeError::UnrecognizedEncoding)?;
    let ext = ctx.read_u16()?;
    inst.size = Some(size);
    inst.operands[0] = dn(ext, 0);
    inst.operands[1] = dn(ext, 6);
    inst.operands[2] = ctx.ea_low(header, EaClass::MemAlt, Some(size))?;
    Ok(())
}

fn inst_cas2(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    // No byte form.
    let size = match (header >> 9) & 3 {
        2 => Size::Word,
        3 => Size::Long,
        _ => return Err(DecodeError::UnrecognizedEncoding),
    };
    let w1 = ctx.read_u16()?;
    let w2 = ctx.read_u16()?;
    inst.size = Some(size);
    inst.operands[0] = Operand::DataRegisterPair((w1 & 7) as u8, (w2 & 7) as u8);
    inst.operands[1] = Operand::DataRegisterPair(((w1 >> 6) & 7) as u8, ((w2 >> 6) & 7) as u8);
    inst.operands[2] = Operand::IndirectRegisterPair(
        IndexRegister::from_bits(w1 & 0x8000 != 0, ((w1 >> 12) & 7) as u8),
        IndexRegister::from_bits(w2 & 0x8000 != 0, ((w2 >> 12) & 7) as u8),
    );
    Ok(())
}

fn inst_chk2_cmp2(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let size = standard_size(header >> 9)?;
    let ext = ctx.read_u16()?;
    inst.size = Some(size);
    // The extension word picks the final opcode.
    inst.opcode = if ext & 0x0800 != 0 { Opcode::Chk2 } else { Opcode::Cmp2 };
    inst.operands[1] = d_or_a(ext & 0x8000 != 0, ext >> 12);
    inst.operands[0] = ctx.ea_low(header, EaClass::Control, Some(size))?;
    Ok(())
}

// ─── Groups 1-3: MOVE ────────────────────────────────────────────

fn inst_move(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    // Size field order differs from the ALU instructions.
    const SIZES: [Option<Size>; 4] = [None, Some(Size::Byte), Some(Size::Long), Some(Size::Word)];
    let size = SIZES[((header >> 12) & 3) as usize].ok_or(DecodeError::UnrecognizedEncoding)?;
    inst.size = Some(size);
    inst.operands[0] = ctx.ea_low(header, EaClass::All, Some(size))?;
    // Destination has mode and register swapped.
    inst.operands[1] = ctx.ea(EaClass::DataAlt, header >> 6, header >> 9, Some(size))?;
    Ok(())
}

fn inst_movea(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let size = match (header >> 12) & 3 {
        2 => Size::Long,
        3 => Size::Word,
        _ => return Err(DecodeError::UnrecognizedEncoding),
    };
    inst.size = Some(size);
    inst.operands[0] = ctx.ea_low(header, EaClass::All, Some(size))?;
    inst.operands[1] = an(header, 9);
    Ok(())
}

// ─── Group 4: Miscellaneous ──────────────────────────────────────

fn inst_simple(_ctx: &mut DecodeCtx<'_>, _inst: &mut Instruction, _header: u16) -> Result<(), DecodeError> {
    Ok(())
}

fn inst_stop(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, _header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = imm_word(ctx.read_u16()?);
    Ok(())
}

fn inst_rtd(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, _header: u16) -> Result<(), DecodeError> {
    let disp = ctx.read_u16()? as i16;
    inst.operands[0] = imm(disp as i32 as u32, Size::Word, true);
    Ok(())
}

fn control_register(cr: u16, cpu: CpuVariant) -> Result<ControlRegister, DecodeError> {
    let (reg, min_cpu) = match cr {
        0x000 => (ControlRegister::Sfc, CpuVariant::M68010),
        0x001 => (ControlRegister::Dfc, CpuVariant::M68010),
        0x800 => (ControlRegister::Usp, CpuVariant::M68010),
        0x801 => (ControlRegister::Vbr, CpuVariant::M68010),
        0x002 => (ControlRegister::Cacr, CpuVariant::M68020),
        0x802 => (ControlRegister::Caar, CpuVariant::M68020),
        0x803 => (ControlRegister::Msp, CpuVariant::M68020),
        0x804 => (ControlRegister::Isp, CpuVariant::M68020),
        _ => return Err(DecodeError::UnrecognizedEncoding),
    };
    if cpu < min_cpu {
        return Err(DecodeError::UnsupportedOnRevision);
    }
    Ok(reg)
}

fn inst_movec(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let ext = ctx.read_u16()?;
    let cr = Operand::ControlRegister(control_register(ext & 0x0FFF, ctx.cpu)?);
    let reg = d_or_a(ext & 0x8000 != 0, ext >> 12);
    // Bit 0 set: general register to control register.
    if header & 1 != 0 {
        inst.operands[0] = reg;
        inst.operands[1] = cr;
    } else {
        inst.operands[0] = cr;
        inst.operands[1] = reg;
    }
    Ok(())
}

fn inst_bkpt(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = imm_byte(header & 7);
    Ok(())
}

fn inst_swap(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = dn(header, 0);
    Ok(())
}

fn inst_link_w(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(Size::Word);
    inst.operands[0] = an(header, 0);
    let disp = ctx.read_u16()? as i16;
    inst.operands[1] = imm(disp as i32 as u32, Size::Word, true);
    Ok(())
}

fn inst_link_l(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(Size::Long);
    inst.operands[0] = an(header, 0);
    inst.operands[1] = imm(ctx.read_u32()?, Size::Long, true);
    Ok(())
}

fn inst_unlk(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = an(header, 0);
    Ok(())
}

fn inst_move_to_usp(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = an(header, 0);
    inst.operands[1] = Operand::Usp;
    Ok(())
}

fn inst_move_from_usp(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = Operand::Usp;
    inst.operands[1] = an(header, 0);
    Ok(())
}

fn inst_ext(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(match (header >> 6) & 7 {
        2 => Size::Word,
        3 => Size::Long,
        7 => {
            ctx.require_020()?;
            Size::Long
        }
        _ => return Err(DecodeError::UnrecognizedEncoding),
    });
    inst.operands[0] = dn(header, 0);
    Ok(())
}

fn inst_trap(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = imm_byte(header & 0xF);
    Ok(())
}

fn inst_move_from_sr(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(Size::Word);
    inst.operands[0] = Operand::Sr;
    inst.operands[1] = ctx.ea_low(header, EaClass::DataAlt, Some(Size::Word))?;
    Ok(())
}

fn inst_move_from_ccr(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(Size::Word);
    inst.operands[0] = Operand::Ccr;
    inst.operands[1] = ctx.ea_low(header, EaClass::DataAlt, Some(Size::Word))?;
    Ok(())
}

fn inst_move_to_sr(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(Size::Word);
    inst.operands[0] = ctx.ea_low(header, EaClass::Data, Some(Size::Word))?;
    inst.operands[1] = Operand::Sr;
    Ok(())
}

fn inst_move_to_ccr(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = ctx.ea_low(header, EaClass::Data, Some(Size::Word))?;
    inst.operands[1] = Operand::Ccr;
    Ok(())
}

fn inst_nbcd(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(Size::Byte);
    inst.operands[0] = ctx.ea_low(header, EaClass::DataAlt, Some(Size::Byte))?;
    Ok(())
}

fn inst_tas(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = ctx.ea_low(header, EaClass::DataAlt, Some(Size::Byte))?;
    Ok(())
}

fn inst_pea(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = ctx.ea_low(header, EaClass::Control, Some(Size::Long))?;
    Ok(())
}

/// JMP and JSR.
fn inst_jump(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = ctx.ea_low(header, EaClass::Control, None)?;
    Ok(())
}

fn inst_lea(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = ctx.ea_low(header, EaClass::Control, Some(Size::Long))?;
    inst.operands[1] = an(header, 9);
    Ok(())
}

fn inst_chk(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let size = if header & 0x0080 != 0 {
        Size::Word
    } else {
        ctx.require_020()?;
        Size::Long
    };
    inst.size = Some(size);
    inst.operands[1] = dn(header, 9);
    inst.operands[0] = ctx.ea_low(header, EaClass::Data, Some(size))?;
    Ok(())
}

fn inst_size_ea(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let size = standard_size(header >> 6)?;
    inst.size = Some(size);
    inst.operands[0] = ctx.ea_low(header, EaClass::DataAlt, Some(size))?;
    Ok(())
}

fn movem_size(header: u16) -> Size {
    if header & 0x0040 != 0 {
        Size::Long
    } else {
        Size::Word
    }
}

fn inst_movem_reg_mem(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let size = movem_size(header);
    inst.size = Some(size);
    // The mask word precedes any EA extension words.
    let mask = ctx.read_u16()?;
    inst.operands[1] = ctx.ea_low(header, EaClass::MovemToMem, Some(size))?;
    // Predecrement lists the registers in reverse bit order.
    let mask = match inst.operands[1] {
        Operand::PreDecrement(_) => mask.reverse_bits(),
        _ => mask,
    };
    inst.operands[0] = Operand::RegisterMask(mask);
    Ok(())
}

fn inst_movem_mem_reg(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let size = movem_size(header);
    inst.size = Some(size);
    let mask = ctx.read_u16()?;
    inst.operands[1] = Operand::RegisterMask(mask);
    inst.operands[0] = ctx.ea_low(header, EaClass::MovemToReg, Some(size))?;
    Ok(())
}

/// 32-bit DIVS/DIVU. The extension word selects the register form.
fn inst_divl(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(Size::Long);
    let ext = ctx.read_u16()?;
    let dq = ((ext >> 12) & 7) as u8;
    let dr = (ext & 7) as u8;
    let is_64 = ext & 0x0400 != 0;
    let signed = ext & 0x0800 != 0;

    inst.operands[0] = ctx.ea_low(header, EaClass::Data, Some(Size::Long))?;
    inst.opcode = if signed { Opcode::Divs } else { Opcode::Divu };
    inst.operands[1] = if is_64 {
        Operand::DataRegisterPair(dr, dq)
    } else if dq == dr {
        Operand::DataDirect(dq)
    } else {
        inst.opcode = if signed { Opcode::Divsl } else { Opcode::Divul };
        Operand::DataRegisterPair(dr, dq)
    };
    Ok(())
}

/// 32-bit MULS/MULU.
fn inst_mull(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(Size::Long);
    let ext = ctx.read_u16()?;
    let dl = ((ext >> 12) & 7) as u8;
    let dh = (ext & 7) as u8;

    inst.operands[0] = ctx.ea_low(header, EaClass::Data, Some(Size::Long))?;
    inst.opcode = if ext & 0x0800 != 0 { Opcode::Muls } else { Opcode::Mulu };
    inst.operands[1] = if ext & 0x0400 != 0 {
        Operand::DataRegisterPair(dh, dl)
    } else {
        Operand::DataDirect(dl)
    };
    Ok(())
}

// ─── Group 5: ADDQ / SUBQ / Scc / DBcc / TRAPcc ──────────────────

fn inst_dbcc(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.condition = condition(header);
    let read_disp = ctx.read_disp();
    let disp = ctx.read_u16()? as i16;
    inst.operands[0] = dn(header, 0);
    inst.operands[1] = Operand::RelativeBranch {
        inst_disp: read_disp.wrapping_add(disp as i32),
    };
    Ok(())
}

fn inst_trapcc(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.condition = condition(header);
    match header & 7 {
        2 => {
            inst.size = Some(Size::Word);
            inst.operands[0] = imm_word(ctx.read_u16()?);
        }
        3 => {
            inst.size = Some(Size::Long);
            inst.operands[0] = imm(ctx.read_u32()?, Size::Long, false);
        }
        4 => {}
        _ => return Err(DecodeError::UnrecognizedEncoding),
    }
    Ok(())
}

fn inst_scc(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.condition = condition(header);
    inst.operands[0] = ctx.ea_low(header, EaClass::DataAlt, Some(Size::Byte))?;
    Ok(())
}

/// ADDQ and SUBQ. A data field of 0 means 8.
fn inst_addq(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let data = match (header >> 9) & 7 {
        0 => 8,
        n => n,
    };
    inst.operands[0] = imm_byte(data);
    let size = standard_size(header >> 6)?;
    inst.size = Some(size);
    inst.operands[1] = ctx.ea_low(header, EaClass::Alt, Some(size))?;
    Ok(())
}

// ─── Group 6: Bcc / BRA / BSR ────────────────────────────────────

fn inst_branch(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    match (header >> 8) & 0xF {
        0 => inst.opcode = Opcode::Bra,
        1 => inst.opcode = Opcode::Bsr,
        _ => inst.condition = condition(header),
    }

    let read_disp = ctx.read_disp();
    let disp8 = (header & 0xFF) as u8 as i8;
    let (disp, size) = if disp8 == 0 {
        (ctx.read_u16()? as i16 as i32, Size::Word)
    } else if disp8 == -1 && ctx.cpu.is_020_plus() {
        (ctx.read_u32()? as i32, Size::Long)
    } else {
        (disp8 as i32, Size::Short)
    };
    inst.size = Some(size);
    inst.operands[0] = Operand::RelativeBranch {
        inst_disp: read_disp.wrapping_add(disp),
    };
    Ok(())
}

// ─── Group 7: MOVEQ ─────────────────────────────────────────────

fn inst_moveq(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(Size::Long);
    let value = (header & 0xFF) as u8 as i8;
    inst.operands[0] = imm(value as i32 as u32, Size::Long, true);
    inst.operands[1] = dn(header, 9);
    Ok(())
}

// ─── Groups 8-D: ALU, BCD, multiply/divide, exchange ─────────────

/// OR, AND, ADD, SUB with one data register operand.
fn inst_alu_dreg(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let size = standard_size(header >> 6)?;
    inst.size = Some(size);
    // Bit 8 set: Dn is the source and the EA the destination.
    if header & 0x0100 != 0 {
        inst.operands[0] = dn(header, 9);
        inst.operands[1] = ctx.ea_low(header, EaClass::MemAlt, Some(size))?;
    } else {
        inst.operands[1] = dn(header, 9);
        inst.operands[0] = ctx.ea_low(header, EaClass::All, Some(size))?;
    }
    Ok(())
}

/// ADDA, SUBA and CMPA.
fn inst_address_alu(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let size = if header & 0x0100 != 0 { Size::Long } else { Size::Word };
    inst.size = Some(size);
    inst.operands[0] = ctx.ea_low(header, EaClass::All, Some(size))?;
    inst.operands[1] = an(header, 9);
    Ok(())
}

/// ADDX and SUBX, data register form.
fn inst_addx_reg(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(standard_size(header >> 6)?);
    inst.operands[0] = dn(header, 0);
    inst.operands[1] = dn(header, 9);
    Ok(())
}

/// ADDX and SUBX, predecrement form.
fn inst_addx_predec(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(standard_size(header >> 6)?);
    inst.operands[0] = Operand::PreDecrement((header & 7) as u8);
    inst.operands[1] = Operand::PreDecrement(((header >> 9) & 7) as u8);
    Ok(())
}

/// ABCD and SBCD, data register form.
fn inst_bcd_reg(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = dn(header, 0);
    inst.operands[1] = dn(header, 9);
    Ok(())
}

fn inst_bcd_predec(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = Operand::PreDecrement((header & 7) as u8);
    inst.operands[1] = Operand::PreDecrement(((header >> 9) & 7) as u8);
    Ok(())
}

/// PACK and UNPK: register form plus the adjustment word.
fn inst_pack_reg(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst_bcd_reg(ctx, inst, header)?;
    inst.operands[2] = imm_word(ctx.read_u16()?);
    Ok(())
}

fn inst_pack_predec(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst_bcd_predec(ctx, inst, header)?;
    inst.operands[2] = imm_word(ctx.read_u16()?);
    Ok(())
}

/// 16-bit MULU/MULS/DIVU/DIVS.
fn inst_muldiv(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(Size::Word);
    inst.operands[0] = ctx.ea_low(header, EaClass::Data, Some(Size::Word))?;
    inst.operands[1] = dn(header, 9);
    Ok(())
}

fn inst_cmpm(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(standard_size(header >> 6)?);
    inst.operands[0] = Operand::PostIncrement((header & 7) as u8);
    inst.operands[1] = Operand::PostIncrement(((header >> 9) & 7) as u8);
    Ok(())
}

fn inst_cmp(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let size = standard_size(header >> 6)?;
    inst.size = Some(size);
    inst.operands[0] = ctx.ea_low(header, EaClass::All, Some(size))?;
    inst.operands[1] = dn(header, 9);
    Ok(())
}

fn inst_eor(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let size = standard_size(header >> 6)?;
    inst.size = Some(size);
    inst.operands[0] = dn(header, 9);
    inst.operands[1] = ctx.ea_low(header, EaClass::DataAlt, Some(size))?;
    Ok(())
}

fn inst_exg_dd(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = dn(header, 9);
    inst.operands[1] = dn(header, 0);
    Ok(())
}

fn inst_exg_aa(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = an(header, 9);
    inst.operands[1] = an(header, 0);
    Ok(())
}

fn inst_exg_da(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.operands[0] = dn(header, 9);
    inst.operands[1] = an(header, 0);
    Ok(())
}

// ─── Group E: Shifts / Rotates / Bitfields ───────────────────────

/// Memory shift: one bit, word-sized.
fn inst_shift_mem(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(Size::Word);
    inst.operands[0] = ctx.ea_low(header, EaClass::MemAlt, Some(Size::Word))?;
    Ok(())
}

/// Register shift by an immediate count (0 means 8) or by Dn.
fn inst_shift_reg(_ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    inst.size = Some(standard_size(header >> 6)?);
    let count = (header >> 9) & 7;
    inst.operands[0] = if header & 0x0020 != 0 {
        Operand::DataDirect(count as u8)
    } else if count == 0 {
        imm_byte(8)
    } else {
        imm_byte(count)
    };
    inst.operands[1] = dn(header, 0);
    Ok(())
}

fn bitfield_ext(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, slot: usize) -> Result<u16, DecodeError> {
    let ext = ctx.read_u16()?;
    inst.bitfields[slot] = Some(Bitfield::from_extension(ext));
    Ok(ext)
}

/// BFCHG, BFCLR, BFSET: `<ea>{o:w}`.
fn inst_bf_ea_write(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    bitfield_ext(ctx, inst, 0)?;
    inst.operands[0] = ctx.ea_low(header, EaClass::BfWrite, None)?;
    Ok(())
}

/// BFTST: `<ea>{o:w}`.
fn inst_bf_ea_read(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    bitfield_ext(ctx, inst, 0)?;
    inst.operands[0] = ctx.ea_low(header, EaClass::BfRead, None)?;
    Ok(())
}

/// BFEXTU, BFEXTS, BFFFO: `<ea>{o:w},Dn`.
fn inst_bf_ea_dreg(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let ext = bitfield_ext(ctx, inst, 0)?;
    inst.operands[1] = dn(ext, 12);
    inst.operands[0] = ctx.ea_low(header, EaClass::BfRead, None)?;
    Ok(())
}

/// BFINS: `Dn,<ea>{o:w}`.
fn inst_bf_dreg_ea(ctx: &mut DecodeCtx<'_>, inst: &mut Instruction, header: u16) -> Result<(), DecodeError> {
    let ext = bitfield_ext(ctx, inst, 1)?;
    inst.operands[0] = dn(ext, 12);
    inst.operands[1] = ctx.ea_low(header, EaClass::BfWrite, None)?;
    Ok(())
}

// ─── Matcher tables ──────────────────────────────────────────────
//
// One table per value of bits 15-12. Within a table the first matching
// entry wins, so more specific patterns come first.

static TABLE_0000: &[MatchEntry] = &[
    m1(0, 16, 0b0000101001111100, CPU_MIN_68000, Opcode::Eori, inst_imm_sr),
    m1(0, 16, 0b0000001000111100, CPU_MIN_68000, Opcode::Andi, inst_imm_ccr),
    m1(0, 16, 0b0000101000111100, CPU_MIN_68000, Opcode::Eori, inst_imm_ccr),
    m1(0, 16, 0b0000000000111100, CPU_MIN_68000, Opcode::Ori, inst_imm_ccr),
    m1(0, 16, 0b0000000001111100, CPU_MIN_68000, Opcode::Ori, inst_imm_sr),
    m1(0, 16, 0b0000001001111100, CPU_MIN_68000, Opcode::Andi, inst_imm_sr),
    m1(4, 12, 0b000001101100, CPU_68020, Opcode::Rtm, inst_rtm),
    m2(11, 5, 0b00001, 0, 9, 0b011111100, CPU_MIN_68020, Opcode::Cas2, inst_cas2),
    m2(12, 4, 0b0000, 3, 6, 0b100001, CPU_MIN_68000, Opcode::Movep, inst_movep),
    m2(12, 4, 0b0000, 3, 6, 0b101001, CPU_MIN_68000, Opcode::Movep, inst_movep),
    m2(12, 4, 0b0000, 3, 6, 0b110001, CPU_MIN_68000, Opcode::Movep, inst_movep),
    m2(12, 4, 0b0000, 3, 6, 0b111001, CPU_MIN_68000, Opcode::Movep, inst_movep),
    m1(6, 10, 0b0000011011, CPU_68020, Opcode::Callm, inst_callm),
    // Shares its pattern with CALLM, which only the 68020 has.
    m2(11, 5, 0b00000, 6, 3, 0b011, CPU_MIN_68020, Opcode::Chk2, inst_chk2_cmp2),
    m1(6, 10, 0b0000100001, CPU_MIN_68000, Opcode::Bchg, inst_bchg_imm),
    m1(6, 10, 0b0000100010, CPU_MIN_68000, Opcode::Bclr, inst_bchg_imm),
    m1(6, 10, 0b0000100011, CPU_MIN_68000, Opcode::Bset, inst_bchg_imm),
    m1(6, 10, 0b0000100000, CPU_MIN_68000, Opcode::Btst, inst_btst_imm),
    // Size 00 of this pattern is BSET #imm, matched above.
    m2(11, 5, 0b00001, 6, 3, 0b011, CPU_MIN_68020, Opcode::Cas, inst_cas),
    m1(8, 8, 0b00000000, CPU_MIN_68000, Opcode::Ori, inst_integer_imm_ea),
    m1(8, 8, 0b00000010, CPU_MIN_68000, Opcode::Andi, inst_integer_imm_ea),
    m1(8, 8, 0b00000100, CPU_MIN_68000, Opcode::Subi, inst_integer_imm_ea),
    m1(8, 8, 0b00000110, CPU_MIN_68000, Opcode::Addi, inst_integer_imm_ea),
    m1(8, 8, 0b00001010, CPU_MIN_68000, Opcode::Eori, inst_integer_imm_ea),
    m1(8, 8, 0b00001100, CPU_MIN_68000, Opcode::Cmpi, inst_integer_imm_ea),
    m1(8, 8, 0b00001110, CPU_MIN_68010, Opcode::Moves, inst_moves),
    m2(12, 4, 0b0000, 6, 3, 0b101, CPU_MIN_68000, Opcode::Bchg, inst_bchg),
    m2(12, 4, 0b0000, 6, 3, 0b110, CPU_MIN_68000, Opcode::Bclr, inst_bchg),
    m2(12, 4, 0b0000, 6, 3, 0b111, CPU_MIN_68000, Opcode::Bset, inst_bchg),
    m2(12, 4, 0b0000, 6, 3, 0b100, CPU_MIN_68000, Opcode::Btst, inst_btst),
    m1(12, 4, 0b0000, CPU_MIN_68000, Opcode::Move, inst_move),
];

static TABLE_0001: &[MatchEntry] = &[m1(12, 4, 0b0001, CPU_MIN_68000, Opcode::Move, inst_move)];

static TABLE_0010: &[MatchEntry] = &[
    m2(12, 4, 0b0010, 6, 3, 0b001, CPU_MIN_68000, Opcode::Movea, inst_movea),
    m1(12, 4, 0b0010, CPU_MIN_68000, Opcode::Move, inst_move),
];

static TABLE_0011: &[MatchEntry] = &[
    m2(12, 4, 0b0011, 6, 3, 0b001, CPU_MIN_68000, Opcode::Movea, inst_movea),
    m1(12, 4, 0b0011, CPU_MIN_68000, Opcode::Move, inst_move),
];

static TABLE_0100: &[MatchEntry] = &[
    m1(0, 16, 0b0100101011111100, CPU_MIN_68000, Opcode::Illegal, inst_simple),
    m1(0, 16, 0b0100111001110000, CPU_MIN_68000, Opcode::Reset, inst_simple),
    m1(0, 16, 0b0100111001110001, CPU_MIN_68000, Opcode::Nop, inst_simple),
    m1(0, 16, 0b0100111001110011, CPU_MIN_68000, Opcode::Rte, inst_simple),
    m1(0, 16, 0b0100111001110101, CPU_MIN_68000, Opcode::Rts, inst_simple),
    m1(0, 16, 0b0100111001110110, CPU_MIN_68000, Opcode::Trapv, inst_simple),
    m1(0, 16, 0b0100111001110111, CPU_MIN_68000, Opcode::Rtr, inst_simple),
    m1(0, 16, 0b0100111001110010, CPU_MIN_68000, Opcode::Stop, inst_stop),
    m1(0, 16, 0b0100111001110100, CPU_MIN_68010, Opcode::Rtd, inst_rtd),
    m1(1, 15, 0b010011100111101, CPU_MIN_68010, Opcode::Movec, inst_movec),
    m1(3, 13, 0b0100100001001, CPU_MIN_68010, Opcode::Bkpt, inst_bkpt),
    m1(3, 13, 0b0100100001000, CPU_MIN_68000, Opcode::Swap, inst_swap),
    m1(3, 13, 0b0100111001010, CPU_MIN_68000, Opcode::Link, inst_link_w),
    m1(3, 13, 0b0100100000001, CPU_MIN_68020, Opcode::Link, inst_link_l),
    m1(3, 13, 0b0100111001011, CPU_MIN_68000, Opcode::Unlk, inst_unlk),
    m1(3, 13, 0b0100111001100, CPU_MIN_68000, Opcode::Move, inst_move_to_usp),
    m1(3, 13, 0b0100111001101, CPU_MIN_68000, Opcode::Move, inst_move_from_usp),
    m1(3, 13, 0b0100100010000, CPU_MIN_68000, Opcode::Ext, inst_ext),
    m1(3, 13, 0b0100100011000, CPU_MIN_68000, Opcode::Ext, inst_ext),
    m1(3, 13, 0b0100100111000, CPU_MIN_68020, Opcode::Extb, inst_ext),
    m1(4, 12, 0b010011100100, CPU_MIN_68000, Opcode::Trap, inst_trap),
    m1(6, 10, 0b0100000011, CPU_MIN_68000, Opcode::Move, inst_move_from_sr),
    m1(6, 10, 0b0100011011, CPU_MIN_68000, Opcode::Move, inst_move_to_sr),
    m1(6, 10, 0b0100010011, CPU_MIN_68000, Opcode::Move, inst_move_to_ccr),
    m1(6, 10, 0b0100001011, CPU_MIN_68010, Opcode::Move, inst_move_from_ccr),
    m1(6, 10, 0b0100100000, CPU_MIN_68000, Opcode::Nbcd, inst_nbcd),
    m1(6, 10, 0b0100100001, CPU_MIN_68000, Opcode::Pea, inst_pea),
    m1(6, 10, 0b0100101011, CPU_MIN_68000, Opcode::Tas, inst_tas),
    m1(6, 10, 0b0100111010, CPU_MIN_68000, Opcode::Jsr, inst_jump),
    m1(6, 10, 0b0100111011, CPU_MIN_68000, Opcode::Jmp, inst_jump),
    m1(6, 10, 0b0100110001, CPU_MIN_68020, Opcode::Divs, inst_divl),
    m1(6, 10, 0b0100110000, CPU_MIN_68020, Opcode::Muls, inst_mull),
    m1(7, 9, 0b010010001, CPU_MIN_68000, Opcode::Movem, inst_movem_reg_mem),
    m1(7, 9, 0b010011001, CPU_MIN_68000, Opcode::Movem, inst_movem_mem_reg),
    m1(8, 8, 0b01000000, CPU_MIN_68000, Opcode::Negx, inst_size_ea),
    m1(8, 8, 0b01000010, CPU_MIN_68000, Opcode::Clr, inst_size_ea),
    m1(8, 8, 0b01000100, CPU_MIN_68000, Opcode::Neg, inst_size_ea),
    m1(8, 8, 0b01000110, CPU_MIN_68000, Opcode::Not, inst_size_ea),
    m1(8, 8, 0b01001010, CPU_MIN_68000, Opcode::Tst, inst_size_ea),
    m2(12, 4, 0b0100, 6, 3, 0b111, CPU_MIN_68000, Opcode::Lea, inst_lea),
    m2(12, 4, 0b0100, 6, 3, 0b110, CPU_MIN_68000, Opcode::Chk, inst_chk),
    m2(12, 4, 0b0100, 6, 3, 0b100, CPU_MIN_68000, Opcode::Chk, inst_chk),
];

static TABLE_0101: &[MatchEntry] = &[
    // DBcc and TRAPcc reuse EA modes Scc cannot take.
    m2(12, 4, 0b0101, 3, 5, 0b11001, CPU_MIN_68000, Opcode::Dbcc, inst_dbcc),
    m2(12, 4, 0b0101, 0, 8, 0b11111010, CPU_MIN_68020, Opcode::Trapcc, inst_trapcc),
    m2(12, 4, 0b0101, 0, 8, 0b11111011, CPU_MIN_68020, Opcode::Trapcc, inst_trapcc),
    m2(12, 4, 0b0101, 0, 8, 0b11111100, CPU_MIN_68020, Opcode::Trapcc, inst_trapcc),
    m2(12, 4, 0b0101, 6, 2, 0b11, CPU_MIN_68000, Opcode::Scc, inst_scc),
    m2(12, 4, 0b0101, 8, 1, 0b1, CPU_MIN_68000, Opcode::Subq, inst_addq),
    m2(12, 4, 0b0101, 8, 1, 0b0, CPU_MIN_68000, Opcode::Addq, inst_addq),
];

static TABLE_0110: &[MatchEntry] = &[m1(12, 4, 0b0110, CPU_MIN_68000, Opcode::Bcc, inst_branch)];

static TABLE_0111: &[MatchEntry] = &[m2(12, 4, 0b0111, 8, 1, 0b0, CPU_MIN_68000, Opcode::Moveq, inst_moveq)];

static TABLE_1000: &[MatchEntry] = &[
    m2(12, 4, 0b1000, 3, 6, 0b100000, CPU_MIN_68000, Opcode::Sbcd, inst_bcd_reg),
    m2(12, 4, 0b1000, 3, 6, 0b100001, CPU_MIN_68000, Opcode::Sbcd, inst_bcd_predec),
    m2(12, 4, 0b1000, 3, 6, 0b101000, CPU_MIN_68020, Opcode::Pack, inst_pack_reg),
    m2(12, 4, 0b1000, 3, 6, 0b101001, CPU_MIN_68020, Opcode::Pack, inst_pack_predec),
    m2(12, 4, 0b1000, 3, 6, 0b110000, CPU_MIN_68020, Opcode::Unpk, inst_pack_reg),
    m2(12, 4, 0b1000, 3, 6, 0b110001, CPU_MIN_68020, Opcode::Unpk, inst_pack_predec),
    m2(12, 4, 0b1000, 6, 3, 0b011, CPU_MIN_68000, Opcode::Divu, inst_muldiv),
    m2(12, 4, 0b1000, 6, 3, 0b111, CPU_MIN_68000, Opcode::Divs, inst_muldiv),
    m1(12, 4, 0b1000, CPU_MIN_68000, Opcode::Or, inst_alu_dreg),
];

static TABLE_1001: &[MatchEntry] = &[
    m2(12, 4, 0b1001, 6, 2, 0b11, CPU_MIN_68000, Opcode::Suba, inst_address_alu),
    m3(12, 4, 0b1001, 8, 1, 1, 3, 3, 0, CPU_MIN_68000, Opcode::Subx, inst_addx_reg),
    m3(12, 4, 0b1001, 8, 1, 1, 3, 3, 1, CPU_MIN_68000, Opcode::Subx, inst_addx_predec),
    m1(12, 4, 0b1001, CPU_MIN_68000, Opcode::Sub, inst_alu_dreg),
];

static TABLE_1010: &[MatchEntry] = &[];

static TABLE_1011: &[MatchEntry] = &[
    m2(12, 4, 0b1011, 6, 2, 0b11, CPU_MIN_68000, Opcode::Cmpa, inst_address_alu),
    m3(12, 4, 0b1011, 8, 1, 1, 3, 3, 1, CPU_MIN_68000, Opcode::Cmpm, inst_cmpm),
    m2(12, 4, 0b1011, 6, 3, 0b100, CPU_MIN_68000, Opcode::Eor, inst_eor),
    m2(12, 4, 0b1011, 6, 3, 0b101, CPU_MIN_68000, Opcode::Eor, inst_eor),
    m2(12, 4, 0b1011, 6, 3, 0b110, CPU_MIN_68000, Opcode::Eor, inst_eor),
    m1(12, 4, 0b1011, CPU_MIN_68000, Opcode::Cmp, inst_cmp),
];

static TABLE_1100: &[MatchEntry] = &[
    m2(12, 4, 0b1100, 3, 6, 0b100000, CPU_MIN_68000, Opcode::Abcd, inst_bcd_reg),
    m2(12, 4, 0b1100, 3, 6, 0b100001, CPU_MIN_68000, Opcode::Abcd, inst_bcd_predec),
    m2(12, 4, 0b1100, 6, 3, 0b011, CPU_MIN_68000, Opcode::Mulu, inst_muldiv),
    m2(12, 4, 0b1100, 6, 3, 0b111, CPU_MIN_68000, Opcode::Muls, inst_muldiv),
    m2(12, 4, 0b1100, 3, 6, 0b101000, CPU_MIN_68000, Opcode::Exg, inst_exg_dd),
    m2(12, 4, 0b1100, 3, 6, 0b101001, CPU_MIN_68000, Opcode::Exg, inst_exg_aa),
    m2(12, 4, 0b1100, 3, 6, 0b110001, CPU_MIN_68000, Opcode::Exg, inst_exg_da),
    m1(12, 4, 0b1100, CPU_MIN_68000, Opcode::And, inst_alu_dreg),
];

static TABLE_1101: &[MatchEntry] = &[
    m2(12, 4, 0b1101, 6, 2, 0b11, CPU_MIN_68000, Opcode::Adda, inst_address_alu),
    m3(12, 4, 0b1101, 8, 1, 1, 3, 3, 0, CPU_MIN_68000, Opcode::Addx, inst_addx_reg),
    m3(12, 4, 0b1101, 8, 1, 1, 3, 3, 1, CPU_MIN_68000, Opcode::Addx, inst_addx_predec),
    m1(12, 4, 0b1101, CPU_MIN_68000, Opcode::Add, inst_alu_dreg),
];

static TABLE_1110: &[MatchEntry] = &[
    m1(6, 10, 0b1110000011, CPU_MIN_68000, Opcode::Asr, inst_shift_mem),
    m1(6, 10, 0b1110000111, CPU_MIN_68000, Opcode::Asl, inst_shift_mem),
    m1(6, 10, 0b1110001011, CPU_MIN_68000, Opcode::Lsr, inst_shift_mem),
    m1(6, 10, 0b1110001111, CPU_MIN_68000, Opcode::Lsl, inst_shift_mem),
    m1(6, 10, 0b1110010011, CPU_MIN_68000, Opcode::Roxr, inst_shift_mem),
    m1(6, 10, 0b1110010111, CPU_MIN_68000, Opcode::Roxl, inst_shift_mem),
    m1(6, 10, 0b1110011011, CPU_MIN_68000, Opcode::Ror, inst_shift_mem),
    m1(6, 10, 0b1110011111, CPU_MIN_68000, Opcode::Rol, inst_shift_mem),
    m1(6, 10, 0b1110101011, CPU_MIN_68020, Opcode::Bfchg, inst_bf_ea_write),
    m1(6, 10, 0b1110100111, CPU_MIN_68020, Opcode::Bfextu, inst_bf_ea_dreg),
    m1(6, 10, 0b1110101111, CPU_MIN_68020, Opcode::Bfexts, inst_bf_ea_dreg),
    m1(6, 10, 0b1110110011, CPU_MIN_68020, Opcode::Bfclr, inst_bf_ea_write),
    m1(6, 10, 0b1110110111, CPU_MIN_68020, Opcode::Bfffo, inst_bf_ea_dreg),
    m1(6, 10, 0b1110111011, CPU_MIN_68020, Opcode::Bfset, inst_bf_ea_write),
    m1(6, 10, 0b1110111111, CPU_MIN_68020, Opcode::Bfins, inst_bf_dreg_ea),
    m1(6, 10, 0b1110100011, CPU_MIN_68020, Opcode::Bftst, inst_bf_ea_read),
    m3(12, 4, 0b1110, 3, 2, 0, 8, 1, 1, CPU_MIN_68000, Opcode::Asl, inst_shift_reg),
    m3(12, 4, 0b1110, 3, 2, 0, 8, 1, 0, CPU_MIN_68000, Opcode::Asr, inst_shift_reg),
    m3(12, 4, 0b1110, 3, 2, 1, 8, 1, 1, CPU_MIN_68000, Opcode::Lsl, inst_shift_reg),
    m3(12, 4, 0b1110, 3, 2, 1, 8, 1, 0, CPU_MIN_68000, Opcode::Lsr, inst_shift_reg),
    m3(12, 4, 0b1110, 3, 2, 3, 8, 1, 1, CPU_MIN_68000, Opcode::Rol, inst_shift_reg),
    m3(12, 4, 0b1110, 3, 2, 3, 8, 1, 0, CPU_MIN_68000, Opcode::Ror, inst_shift_reg),
    m3(12, 4, 0b1110, 3, 2, 2, 8, 1, 1, CPU_MIN_68000, Opcode::Roxl, inst_shift_reg),
    m3(12, 4, 0b1110, 3, 2, 2, 8, 1, 0, CPU_MIN_68000, Opcode::Roxr, inst_shift_reg),
];

static TABLE_1111: &[MatchEntry] = &[];

static MATCHER_TABLES: [&[MatchEntry]; 16] = [
    TABLE_0000, TABLE_0001, TABLE_0010, TABLE_0011, TABLE_0100, TABLE_0101, TABLE_0110, TABLE_0111,
    TABLE_1000, TABLE_1001, TABLE_1010, TABLE_1011, TABLE_1100, TABLE_1101, TABLE_1110, TABLE_1111,
];

// ─── Entry point ─────────────────────────────────────────────────

/// Decode one instruction at `cursor`.
///
/// On success `out` holds the instruction and `cursor` has moved past it.
/// On failure `out` holds the INVALID placeholder for the opcode word,
/// `cursor` has moved one word (or to the end of a shorter buffer), and the
/// returned error says why the word was rejected.
pub fn decode(out: &mut Instruction, cursor: &mut Cursor, settings: &DecodeSettings) -> Result<(), DecodeError> {
    let address = cursor.address();
    out.reset(address);

    let mut ahead = *cursor;
    let header = match ahead.read_u16() {
        Ok(header) => header,
        Err(kind) => {
            // A lone trailing byte still shows up in the placeholder.
            let partial = ahead.read_u8().map(|b| (b as u16) << 8).unwrap_or(0);
            return Err(fail(out, cursor, partial, kind));
        }
    };
    out.header = header;

    let cpu_bit = settings.cpu.mask();
    let mut gated = false;
    for entry in MATCHER_TABLES[(header >> 12) as usize] {
        if header & entry.mask != entry.val {
            continue;
        }
        if entry.cpu & cpu_bit == 0 {
            gated = true;
            continue;
        }

        // Set before the handler so it can refine the opcode.
        out.opcode = entry.opcode;
        let mut ctx = DecodeCtx {
            cursor: ahead,
            cpu: settings.cpu,
            address,
        };
        return match (entry.handler)(&mut ctx, out, header) {
            Ok(()) => {
                let width = ctx.cursor.position() - cursor.position();
                out.size_bytes = width as u32;
                cursor.advance(width);
                Ok(())
            }
            Err(kind) => Err(fail(out, cursor, header, kind)),
        };
    }

    let kind = if gated {
        DecodeError::UnsupportedOnRevision
    } else {
        DecodeError::UnrecognizedEncoding
    };
    Err(fail(out, cursor, header, kind))
}

fn fail(out: &mut Instruction, cursor: &mut Cursor, header: u16, kind: DecodeError) -> DecodeError {
    let address = cursor.address();
    trace!("${address:08x}: ${header:04x} not decoded: {kind}");
    out.set_invalid(address, header);
    let start = cursor.position();
    cursor.advance(PLACEHOLDER_BYTES);
    // Short of a whole word at the end of the buffer.
    out.size_bytes = (cursor.position() - start) as u32;
    kind
}
