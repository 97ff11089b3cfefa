use std::fmt;

use crate::m68k::instruction::*;
use crate::m68k::{FullIndex, IndexRegister, IndexSpec, MemoryIndirection};
use crate::symbols::{relative_target, SymbolResolver};

/// Options controlling assembly output formatting.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Use uppercase mnemonics (MOVE vs move).
    pub uppercase: bool,
}

/// A formatted instruction ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedInstruction {
    /// Mnemonic + condition + size suffix (e.g., "move.l" or "dbne").
    pub mnemonic: String,
    /// Operand string (e.g., "#$2a,d0").
    pub operands: String,
    /// Trailing comment, without the `;`.
    pub comment: Option<String>,
}

impl fmt::Display for FormattedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operands.is_empty() {
            f.write_str(&self.mnemonic)?;
        } else {
            write!(f, "{:<9}{}", self.mnemonic, self.operands)?;
        }
        if let Some(comment) = &self.comment {
            write!(f, "  ; {comment}")?;
        }
        Ok(())
    }
}

/// Format a decoded instruction into Motorola assembly syntax.
///
/// PC-relative, branch and absolute long operands are shown by name when
/// `symbols` knows the target address.
pub fn format_instruction(
    inst: &Instruction,
    symbols: &dyn SymbolResolver,
    opts: &FormatOptions,
) -> FormattedInstruction {
    if !inst.is_valid() {
        return format_placeholder(inst, opts);
    }

    let mut mnemonic = inst.opcode.name().to_string();
    if inst.opcode.is_conditional() {
        if let Some(cond) = &inst.condition {
            mnemonic.push_str(cond.suffix());
        }
    }
    if let Some(size) = &inst.size {
        mnemonic.push_str(size.suffix());
    }
    if opts.uppercase {
        mnemonic = mnemonic.to_uppercase();
    }

    FormattedInstruction {
        mnemonic,
        operands: format_operands(inst, symbols),
        comment: None,
    }
}

fn format_placeholder(inst: &Instruction, opts: &FormatOptions) -> FormattedInstruction {
    let [hi, lo] = inst.header.to_be_bytes();
    FormattedInstruction {
        mnemonic: if opts.uppercase { "DC.W" } else { "dc.w" }.to_string(),
        operands: format!("${:04x}", inst.header),
        comment: Some(format!("{}{}", printable(hi), printable(lo))),
    }
}

fn printable(b: u8) -> char {
    if (32..128).contains(&b) {
        b as char
    } else {
        '.'
    }
}

fn format_operands(inst: &Instruction, symbols: &dyn SymbolResolver) -> String {
    let mut text = String::new();
    for (i, op) in inst.operands().enumerate() {
        if i > 0 {
            text.push(',');
        }
        text.push_str(&format_operand(op, inst, symbols));
        // Bitfields follow the first and second operands
        if let Some(Some(bf)) = inst.bitfields.get(i) {
            text.push_str(&format_bitfield(bf));
        }
    }
    text
}

fn format_operand(op: &Operand, inst: &Instruction, symbols: &dyn SymbolResolver) -> String {
    match op {
        Operand::None => String::new(),
        Operand::DataDirect(n) => format!("d{n}"),
        Operand::AddressDirect(n) => areg(*n),
        Operand::Indirect(n) => format!("({})", areg(*n)),
        Operand::PostIncrement(n) => format!("({})+", areg(*n)),
        Operand::PreDecrement(n) => format!("-({})", areg(*n)),
        Operand::Displacement { reg, disp } => format!("{disp}({})", areg(*reg)),
        Operand::Index { reg, disp, index } => {
            format!("{disp}({},{})", areg(*reg), format_index(index))
        }
        Operand::AbsoluteWord(addr) => {
            if addr & 0x8000 != 0 {
                format!("$ffff{addr:x}.w")
            } else {
                format!("${addr:x}.w")
            }
        }
        Operand::AbsoluteLong(addr) => match symbols.resolve_address(*addr) {
            Some(label) => label.to_string(),
            None => format!("${addr:x}.l"),
        },
        Operand::PcDisplacement { .. } => {
            format!("{}(pc)", format_target(op, inst.address, symbols))
        }
        Operand::PcIndex { index, .. } => {
            format!(
                "{}(pc,{})",
                format_target(op, inst.address, symbols),
                format_index(index)
            )
        }
        Operand::RelativeBranch { .. } => format_target(op, inst.address, symbols),
        Operand::FullIndex(full) => format_full_index(full, inst.address, symbols),
        Operand::Immediate(imm) => format_immediate(imm, inst.address, symbols),
        Operand::RegisterMask(mask) => format_register_list(*mask),
        Operand::DataRegisterPair(d1, d2) => format!("d{d1}:d{d2}"),
        Operand::IndirectRegisterPair(r1, r2) => format!("({r1}):({r2})"),
        Operand::Sr => "sr".to_string(),
        Operand::Ccr => "ccr".to_string(),
        Operand::Usp => "usp".to_string(),
        Operand::ControlRegister(cr) => cr.name().to_string(),
    }
}

fn areg(n: u8) -> String {
    IndexRegister::Address(n).to_string()
}

fn format_index(index: &IndexSpec) -> String {
    const SCALES: [&str; 4] = ["", "*2", "*4", "*8"];
    format!(
        "{}.{}{}",
        index.reg,
        if index.long { "l" } else { "w" },
        SCALES[(index.scale_shift & 3) as usize]
    )
}

/// Label or `$hex` for a PC-relative operand's target address.
fn format_target(op: &Operand, inst_address: u32, symbols: &dyn SymbolResolver) -> String {
    let target = relative_target(op, inst_address).unwrap_or(inst_address);
    match symbols.resolve_address(target) {
        Some(label) => label.to_string(),
        None => format!("${target:x}"),
    }
}

fn signed_hex(value: i32) -> String {
    if value < 0 {
        format!("-${:x}", value.unsigned_abs())
    } else {
        format!("${value:x}")
    }
}

fn format_immediate(imm: &Immediate, inst_address: u32, symbols: &dyn SymbolResolver) -> String {
    // A relocated long immediate is always the first extension: +2
    if imm.size == Size::Long
        && symbols.resolve_reloc(inst_address.wrapping_add(2)) == Some(imm.value)
    {
        if let Some(label) = symbols.resolve_address(imm.value) {
            return format!("#{label}");
        }
    }
    if imm.signed {
        format!("#{}", signed_hex(imm.value as i32))
    } else {
        format!("#${:x}", imm.value)
    }
}

#[derive(PartialEq, Eq)]
enum Last {
    Start,
    Value,
    Open,
    Close,
}

/// `([bd,br],xn.s*sc,od)` and friends. Only the parts present in the
/// extension word are printed; the memory indirection kind decides which
/// of them go inside the brackets.
fn format_full_index(full: &FullIndex, inst_address: u32, symbols: &dyn SymbolResolver) -> String {
    let bracket = match full.kind {
        MemoryIndirection::None => None,
        MemoryIndirection::PreIndexed => Some(0..=2),
        MemoryIndirection::PostIndexed | MemoryIndirection::MemoryIndirect => Some(0..=1),
    };
    let used = full.used();

    let mut text = String::from("(");
    let mut last = Last::Start;
    let mut open = false;
    for (i, &present) in used.iter().enumerate() {
        if present {
            if !open && bracket.as_ref().is_some_and(|r| r.contains(&i)) {
                text.push('[');
                open = true;
                last = Last::Open;
            }
            if last == Last::Value || last == Last::Close {
                text.push(',');
            }
            match i {
                0 if full.base == Some(IndexRegister::Pc) => {
                    let target = inst_address.wrapping_add(full.base_disp as u32);
                    match symbols.resolve_address(target) {
                        Some(label) => text.push_str(label),
                        None => text.push_str(&format!("${target:x}")),
                    }
                }
                0 => text.push_str(&signed_hex(full.base_disp)),
                1 => {
                    if let Some(base) = &full.base {
                        text.push_str(&base.to_string());
                    }
                }
                2 => {
                    if let Some(index) = &full.index {
                        text.push_str(&format_index(index));
                    }
                }
                _ => text.push_str(&signed_hex(full.outer_disp.unwrap_or(0))),
            }
            last = Last::Value;
        }
        if open && bracket.as_ref().is_some_and(|r| *r.end() == i) {
            text.push(']');
            open = false;
            last = Last::Close;
        }
    }
    text.push(')');
    text
}

fn format_bitfield(bf: &Bitfield) -> String {
    let part = |is_reg: bool, value: u8| {
        if is_reg {
            format!("d{}", value & 7)
        } else {
            value.to_string()
        }
    };
    format!(
        "{{{}:{}}}",
        part(bf.offset_is_dreg, bf.offset),
        part(bf.width_is_dreg, bf.width)
    )
}

/// Format a MOVEM register list into `d0-d3/a6` notation.
///
/// Bit 0 is D0 and bit 15 is A7; predecrement masks arrive already
/// reversed from the decoder.
fn format_register_list(mask: u16) -> String {
    let mut parts = Vec::new();
    format_reg_range(&mut parts, mask & 0xFF, "d");
    format_reg_range(&mut parts, (mask >> 8) & 0xFF, "a");
    parts.join("/")
}

fn format_reg_range(parts: &mut Vec<String>, mask: u16, prefix: &str) {
    let mut i = 0u8;
    while i < 8 {
        if (mask & (1 << i)) != 0 {
            let start = i;
            while i < 7 && (mask & (1 << (i + 1))) != 0 {
                i += 1;
            }
            if i > start {
                parts.push(format!("{prefix}{start}-{prefix}{i}"));
            } else {
                parts.push(format!("{prefix}{start}"));
            }
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{Section, Symbol, SymbolTable};

    fn make_inst(opcode: Opcode, size: Option<Size>, operands: &[Operand]) -> Instruction {
        let mut inst = Instruction::default();
        inst.opcode = opcode;
        inst.size = size;
        for (slot, op) in inst.operands.iter_mut().zip(operands) {
            *slot = *op;
        }
        inst
    }

    fn text(inst: &Instruction) -> String {
        format_instruction(inst, &SymbolTable::new(), &FormatOptions::default()).to_string()
    }

    fn imm(value: u32, size: Size, signed: bool) -> Operand {
        Operand::Immediate(Immediate {
            value,
            size,
            signed,
        })
    }

    #[test]
    fn format_rts() {
        let inst = make_inst(Opcode::Rts, None, &[]);
        let fmt = format_instruction(&inst, &SymbolTable::new(), &FormatOptions::default());
        assert_eq!(fmt.mnemonic, "rts");
        assert_eq!(fmt.operands, "");
        assert_eq!(fmt.to_string(), "rts");
    }

    #[test]
    fn format_move_long() {
        let inst = make_inst(
            Opcode::Move,
            Some(Size::Long),
            &[imm(5, Size::Long, false), Operand::DataDirect(0)],
        );
        assert_eq!(text(&inst), "move.l   #$5,d0");
    }

    #[test]
    fn format_displacement_and_index() {
        let inst = make_inst(
            Opcode::Move,
            Some(Size::Word),
            &[
                Operand::Displacement { reg: 5, disp: -8 },
                Operand::Index {
                    reg: 0,
                    disp: 4,
                    index: IndexSpec {
                        reg: IndexRegister::Data(1),
                        long: false,
                        scale_shift: 1,
                    },
                },
            ],
        );
        assert_eq!(text(&inst), "move.w   -8(a5),4(a0,d1.w*2)");
    }

    #[test]
    fn format_absolute_word_sign() {
        let inst = make_inst(
            Opcode::Move,
            Some(Size::Word),
            &[Operand::AbsoluteWord(0x8240), Operand::AbsoluteWord(0x1234)],
        );
        assert_eq!(text(&inst), "move.w   $ffff8240.w,$1234.w");
    }

    #[test]
    fn format_uppercase() {
        let inst = make_inst(Opcode::Nop, None, &[]);
        let fmt = format_instruction(
            &inst,
            &SymbolTable::new(),
            &FormatOptions { uppercase: true },
        );
        assert_eq!(fmt.mnemonic, "NOP");
    }

    #[test]
    fn format_a7_as_sp() {
        let inst = make_inst(
            Opcode::Move,
            Some(Size::Long),
            &[Operand::DataDirect(0), Operand::PreDecrement(7)],
        );
        assert_eq!(text(&inst), "move.l   d0,-(sp)");
    }

    #[test]
    fn format_conditional_suffix() {
        let mut inst = make_inst(
            Opcode::Dbcc,
            None,
            &[Operand::DataDirect(1), Operand::RelativeBranch { inst_disp: -4 }],
        );
        inst.condition = Some(Condition::Ne);
        inst.address = 0x100;
        assert_eq!(text(&inst), "dbne     d1,$fc");
    }

    #[test]
    fn format_branch_target_symbol() {
        let mut inst = make_inst(
            Opcode::Bsr,
            Some(Size::Short),
            &[Operand::RelativeBranch { inst_disp: 0x12 }],
        );
        inst.address = 0x20;
        let mut symbols = SymbolTable::new();
        symbols.add(Symbol::new("_sub", Section::Text, 0x32));
        let fmt = format_instruction(&inst, &symbols, &FormatOptions::default());
        assert_eq!(fmt.to_string(), "bsr.s    _sub");
    }

    #[test]
    fn format_pc_relative() {
        let mut inst = make_inst(
            Opcode::Lea,
            None,
            &[Operand::PcDisplacement { inst_disp: 0x10 }, Operand::AddressDirect(0)],
        );
        inst.address = 0x1000;
        assert_eq!(text(&inst), "lea      $1010(pc),a0");

        let mut inst = make_inst(
            Opcode::Move,
            Some(Size::Word),
            &[
                Operand::PcIndex {
                    inst_disp: 6,
                    index: IndexSpec {
                        reg: IndexRegister::Data(0),
                        long: true,
                        scale_shift: 0,
                    },
                },
                Operand::DataDirect(2),
            ],
        );
        inst.address = 0x200;
        assert_eq!(text(&inst), "move.w   $206(pc,d0.l),d2");
    }

    #[test]
    fn format_signed_immediates() {
        let inst = make_inst(
            Opcode::Moveq,
            Some(Size::Long),
            &[imm(0xFFFF_FFFC, Size::Long, true), Operand::DataDirect(3)],
        );
        assert_eq!(text(&inst), "moveq.l  #-$4,d3");
        let inst = make_inst(
            Opcode::Andi,
            Some(Size::Byte),
            &[imm(0x1F, Size::Byte, false), Operand::Ccr],
        );
        assert_eq!(text(&inst), "andi.b   #$1f,ccr");
    }

    #[test]
    fn format_relocated_immediate() {
        let mut inst = make_inst(
            Opcode::Move,
            Some(Size::Long),
            &[imm(0x400, Size::Long, false), Operand::AddressDirect(0)],
        );
        inst.address = 0x10;
        let mut symbols = SymbolTable::new();
        symbols.add(Symbol::new("_buffer", Section::Bss, 0x400));
        let opts = FormatOptions::default();
        assert_eq!(
            format_instruction(&inst, &symbols, &opts).to_string(),
            "move.l   #$400,a0"
        );
        symbols.add_reloc(0x12, 0x400);
        assert_eq!(
            format_instruction(&inst, &symbols, &opts).to_string(),
            "move.l   #_buffer,a0"
        );
    }

    #[test]
    fn format_absolute_long_symbol() {
        let inst = make_inst(
            Opcode::Jsr,
            None,
            &[Operand::AbsoluteLong(0x00FC_0000)],
        );
        assert_eq!(text(&inst), "jsr      $fc0000.l");
        let mut symbols = SymbolTable::new();
        symbols.add(Symbol::new("rom", Section::Unknown, 0x00FC_0000));
        assert_eq!(
            format_instruction(&inst, &symbols, &FormatOptions::default()).to_string(),
            "jsr      rom"
        );
    }

    #[test]
    fn format_register_lists() {
        assert_eq!(format_register_list(0x000F), "d0-d3");
        assert_eq!(format_register_list(0x4000), "a6");
        assert_eq!(format_register_list(0x40FF), "d0-d7/a6");
        assert_eq!(format_register_list(0x0505), "d0/d2/a0/a2");
        let inst = make_inst(
            Opcode::Movem,
            Some(Size::Long),
            &[Operand::RegisterMask(0x4003), Operand::PreDecrement(7)],
        );
        assert_eq!(text(&inst), "movem.l  d0-d1/a6,-(sp)");
    }

    #[test]
    fn format_pairs_and_control() {
        let inst = make_inst(
            Opcode::Divsl,
            Some(Size::Long),
            &[Operand::DataDirect(0), Operand::DataRegisterPair(1, 2)],
        );
        assert_eq!(text(&inst), "divsl.l  d0,d1:d2");

        let inst = make_inst(
            Opcode::Movec,
            None,
            &[Operand::ControlRegister(ControlRegister::Vbr), Operand::AddressDirect(0)],
        );
        assert_eq!(text(&inst), "movec    vbr,a0");

        let inst = make_inst(
            Opcode::Move,
            Some(Size::Long),
            &[Operand::Usp, Operand::AddressDirect(3)],
        );
        assert_eq!(text(&inst), "move.l   usp,a3");
    }

    #[test]
    fn format_bitfields() {
        let mut inst = make_inst(
            Opcode::Bfextu,
            None,
            &[Operand::DataDirect(0), Operand::DataDirect(1)],
        );
        inst.bitfields[0] = Some(Bitfield {
            offset_is_dreg: true,
            offset: 1,
            width_is_dreg: false,
            width: 8,
        });
        assert_eq!(text(&inst), "bfextu   d0{d1:8},d1");

        let mut inst = make_inst(
            Opcode::Bfins,
            None,
            &[Operand::DataDirect(2), Operand::Indirect(0)],
        );
        inst.bitfields[1] = Some(Bitfield {
            offset_is_dreg: false,
            offset: 3,
            width_is_dreg: false,
            width: 32,
        });
        assert_eq!(text(&inst), "bfins    d2,(a0){3:32}");
    }

    fn full(kind: MemoryIndirection) -> FullIndex {
        FullIndex {
            kind,
            base_disp: 0x10,
            base_disp_used: true,
            base: Some(IndexRegister::Address(0)),
            index: Some(IndexSpec {
                reg: IndexRegister::Data(1),
                long: true,
                scale_shift: 2,
            }),
            outer_disp: Some(4),
        }
    }

    #[test]
    fn format_full_index_brackets() {
        let op = Operand::FullIndex(full(MemoryIndirection::PostIndexed));
        let inst = make_inst(Opcode::Tst, Some(Size::Long), &[op]);
        assert_eq!(text(&inst), "tst.l    ([$10,a0],d1.l*4,$4)");

        let op = Operand::FullIndex(full(MemoryIndirection::PreIndexed));
        let inst = make_inst(Opcode::Tst, Some(Size::Long), &[op]);
        assert_eq!(text(&inst), "tst.l    ([$10,a0,d1.l*4],$4)");

        let mut f = full(MemoryIndirection::None);
        f.outer_disp = None;
        f.base_disp = -2;
        let inst = make_inst(Opcode::Tst, Some(Size::Long), &[Operand::FullIndex(f)]);
        assert_eq!(text(&inst), "tst.l    (-$2,a0,d1.l*4)");

        let mut f = full(MemoryIndirection::MemoryIndirect);
        f.index = None;
        f.base_disp_used = false;
        f.base_disp = 0;
        let inst = make_inst(Opcode::Tst, Some(Size::Long), &[Operand::FullIndex(f)]);
        assert_eq!(text(&inst), "tst.l    ([a0],$4)");
    }

    #[test]
    fn format_full_index_pc_base() {
        let mut f = full(MemoryIndirection::PreIndexed);
        f.base = Some(IndexRegister::Pc);
        f.outer_disp = None;
        let mut inst = make_inst(Opcode::Jmp, None, &[Operand::FullIndex(f)]);
        inst.address = 0x100;
        assert_eq!(text(&inst), "jmp      ([$110,pc,d1.l*4])");
    }

    #[test]
    fn format_invalid_placeholder() {
        let mut inst = Instruction::default();
        inst.set_invalid(0, 0x4AFB);
        assert_eq!(text(&inst), "dc.w     $4afb  ; J.");
        inst.set_invalid(0, 0x4142);
        assert_eq!(text(&inst), "dc.w     $4142  ; AB");
    }
}
