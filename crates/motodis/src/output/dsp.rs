//! DSP56000 assembly text.

use crate::dsp56::{Instruction, Memory, Operand, OperandKind};
use crate::symbols::SymbolResolver;

use super::formatter::FormatOptions;

/// Format a decoded DSP instruction: mnemonic, operands, the Tcc register
/// pair, then each parallel move, separated by tabs.
pub fn format_dsp_instruction(
    inst: &Instruction,
    symbols: &dyn SymbolResolver,
    opts: &FormatOptions,
) -> String {
    if !inst.is_valid() {
        let dc = if opts.uppercase { "DC" } else { "dc" };
        return format!("{dc}\t${:06x}", inst.header);
    }

    let mut mnemonic = inst.opcode.name().to_string();
    if inst.opcode.is_conditional() {
        if let Some(cond) = &inst.condition {
            mnemonic.push_str(cond.suffix());
        }
    }
    if opts.uppercase {
        mnemonic = mnemonic.to_uppercase();
    }

    let mut text = mnemonic;
    let operands: Vec<String> = inst
        .operands()
        .map(|op| format_dsp_operand(op, symbols))
        .collect();
    if !operands.is_empty() {
        text.push('\t');
        if inst.neg_operands {
            text.push('-');
        }
        text.push_str(&operands.join(","));
    }

    let pair: Vec<String> = inst
        .operands2
        .iter()
        .filter(|op| !op.is_none())
        .map(|op| format_dsp_operand(op, symbols))
        .collect();
    if !pair.is_empty() {
        text.push('\t');
        text.push_str(&pair.join(","));
    }

    for pmove in inst.pmoves.iter().filter(|pm| !pm.is_empty()) {
        text.push('\t');
        text.push_str(&format_dsp_operand(&pmove.operands[0], symbols));
        if !pmove.operands[1].is_none() {
            text.push(',');
            text.push_str(&format_dsp_operand(&pmove.operands[1], symbols));
        }
    }
    text
}

pub fn format_dsp_operand(op: &Operand, symbols: &dyn SymbolResolver) -> String {
    let body = match op.kind {
        OperandKind::None => String::new(),
        OperandKind::ImmShort(v) => format!("#{v}"),
        OperandKind::Reg(reg) => reg.to_string(),
        OperandKind::PostDecOffset(n) => format!("(r{n})-n{n}"),
        OperandKind::PostIncOffset(n) => format!("(r{n})+n{n}"),
        OperandKind::PostDec(n) => format!("(r{n})-"),
        OperandKind::PostInc(n) => format!("(r{n})+"),
        OperandKind::IndexOffset(n) => format!("(r{n}+n{n})"),
        OperandKind::NoUpdate(n) => format!("(r{n})"),
        OperandKind::PreDec(n) => format!("-(r{n})"),
        OperandKind::Abs(addr) => {
            // Only program addresses carry no memory space
            match (op.memory, symbols.resolve_address(addr)) {
                (Memory::None, Some(label)) => label.to_string(),
                _ => format!("${addr:x}"),
            }
        }
        OperandKind::AbsShort(addr) => format!(">${addr:x}"),
        OperandKind::Imm(v) => format!("#${v:x}"),
        OperandKind::IoShort(addr) => format!("<<${addr:x}"),
    };
    format!("{}{body}", op.memory.prefix())
}
