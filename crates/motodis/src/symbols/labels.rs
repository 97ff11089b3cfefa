//! Auto-label generation for referenced addresses.
//!
//! Walks already-decoded instructions, extracts the addresses their
//! operands refer to, and names every address that has no symbol yet.
//! Labels are `prefix` followed by a counter, in scan order.

use crate::dsp56;
use crate::m68k::{IndexRegister, Instruction, Operand};

use super::table::{Section, Symbol, SymbolTable};

/// Naming scheme for generated labels.
#[derive(Debug, Clone)]
pub struct LabelOptions {
    pub prefix: String,
    /// Number used for the first generated label.
    pub start: u32,
}

impl Default for LabelOptions {
    fn default() -> Self {
        LabelOptions {
            prefix: "L".to_string(),
            start: 0,
        }
    }
}

/// Absolute address an operand refers to relative to its instruction.
///
/// Covers PC displacement, PC index, branch targets and full-format
/// operands whose base register is the PC.
pub fn relative_target(op: &Operand, inst_address: u32) -> Option<u32> {
    let disp = match op {
        Operand::PcDisplacement { inst_disp } => *inst_disp,
        Operand::PcIndex { inst_disp, .. } => *inst_disp,
        Operand::RelativeBranch { inst_disp } => *inst_disp,
        Operand::FullIndex(full) if full.base == Some(IndexRegister::Pc) => full.base_disp,
        _ => return None,
    };
    Some(inst_address.wrapping_add(disp as u32))
}

/// Name every PC-relative target in `instructions` that has no symbol.
///
/// Returns the number of labels added.
pub fn add_reference_symbols(
    instructions: &[Instruction],
    options: &LabelOptions,
    symbols: &mut SymbolTable,
) -> usize {
    let targets = instructions.iter().flat_map(|inst| {
        inst.operands()
            .filter_map(move |op| relative_target(op, inst.address))
    });
    add_labels(targets, options, symbols)
}

/// Name every program address referenced by DSP jumps, subroutine calls,
/// bit-test branches and loops.
///
/// Only absolute operands without a memory space are addresses in program
/// memory; `x:`/`y:` operands of the same instructions are data.
pub fn add_reference_symbols_dsp(
    instructions: &[dsp56::Instruction],
    options: &LabelOptions,
    symbols: &mut SymbolTable,
) -> usize {
    let targets = instructions
        .iter()
        .filter(|inst| inst.opcode.is_flow())
        .flat_map(|inst| inst.all_operands())
        .filter_map(|op| match (op.memory, op.kind) {
            (dsp56::Memory::None, dsp56::OperandKind::Abs(addr)) => Some(addr),
            _ => None,
        });
    add_labels(targets, options, symbols)
}

fn add_labels(
    targets: impl Iterator<Item = u32>,
    options: &LabelOptions,
    symbols: &mut SymbolTable,
) -> usize {
    let mut id = options.start;
    let mut added = 0;
    for target in targets {
        if symbols.contains(target) {
            continue;
        }
        let label = format!("{}{}", options.prefix, id);
        symbols.add(Symbol::new(label, Section::Text, target));
        id += 1;
        added += 1;
    }
    added
}
