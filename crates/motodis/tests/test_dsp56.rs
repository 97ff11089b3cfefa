/// Tests for the DSP56000 decoder and printer:
/// - Parallel ALU operations with data moves
/// - Non-parallel control flow with extension words
/// - Placeholders for undecodable and truncated words
/// - Program-address labels

use motodis::dsp56::{decode, DspSettings, Instruction, Memory, Opcode, OperandKind};
use motodis::output::dsp::format_dsp_instruction;
use motodis::output::formatter::FormatOptions;
use motodis::symbols::{add_reference_symbols_dsp, LabelOptions};
use motodis::{generate_dsp_listing, scan_dsp, DecodeError, ListingOptions, SymbolTable, UnitCursor, WordCursor};

fn words(ws: &[u32]) -> Vec<u8> {
    ws.iter().flat_map(|w| w.to_be_bytes()[1..].to_vec()).collect()
}

fn decode_words(ws: &[u32]) -> (Instruction, Result<(), DecodeError>, usize) {
    let data = words(ws);
    let mut cursor = WordCursor::new(&data, 0);
    let mut inst = Instruction::default();
    let res = decode(&mut inst, &mut cursor, &DspSettings);
    (inst, res, cursor.position())
}

fn text(ws: &[u32]) -> String {
    let (inst, res, consumed) = decode_words(ws);
    assert_eq!(res, Ok(()), "failed to decode {ws:06x?}");
    assert_eq!(consumed, inst.word_count as usize);
    format_dsp_instruction(&inst, &SymbolTable::new(), &FormatOptions::default())
}

// ─── Parallel instructions ───────────────────────────────────────────

#[test]
fn test_alu_with_x_read() {
    assert_eq!(text(&[0x45D840]), "add\tx0,a\tx:(r0)+,x1");
}

#[test]
fn test_clr_without_move() {
    assert_eq!(text(&[0x200013]), "clr\ta");
}

#[test]
fn test_move_forms() {
    assert_eq!(text(&[0x240500]), "move\t#5,x0");
    assert_eq!(text(&[0x56F000, 0x001234]), "move\tx:$1234,a");
}

#[test]
fn test_negated_multiply() {
    let (inst, res, _) = decode_words(&[0x2000AC]);
    assert!(res.is_ok());
    assert_eq!(inst.opcode, Opcode::Mpy);
    assert!(inst.neg_operands);
    assert!(text(&[0x2000AC]).starts_with("mpy\t-"));
}

// ─── Non-parallel instructions ───────────────────────────────────────

#[test]
fn test_simple_control() {
    assert_eq!(text(&[0x000000]), "nop");
    assert_eq!(text(&[0x00000C]), "rts");
}

#[test]
fn test_jumps() {
    assert_eq!(text(&[0x0C0123]), "jmp\t$123");
    assert_eq!(text(&[0x0EA040]), "jeq\t$40");
    assert_eq!(text(&[0x0BF080, 0x002000]), "jsr\t$2000");
}

#[test]
fn test_bit_test_branch() {
    assert_eq!(text(&[0x0AA980, 0x000100]), "jclr\t#$0,x:<<$ffe9,$100");
}

#[test]
fn test_hardware_loops() {
    assert_eq!(text(&[0x061080, 0x000046]), "do\t#$10,$47");
    assert_eq!(text(&[0x06C420]), "rep\tx0");
}

#[test]
fn test_movec_and_andi() {
    assert_eq!(text(&[0x05FFA0]), "movec\t#$ff,m0");
    assert_eq!(text(&[0x00FEB9]), "andi\t#$fe,ccr");
}

// ─── Placeholders ────────────────────────────────────────────────────

#[test]
fn test_unmatched_word() {
    let (inst, res, consumed) = decode_words(&[0x000001]);
    assert_eq!(res, Err(DecodeError::UnrecognizedEncoding));
    assert_eq!(inst.opcode, Opcode::Invalid);
    assert_eq!(inst.word_count, 1);
    assert_eq!(consumed, 1);
    assert_eq!(inst.operands[0].memory, Memory::None);
    assert_eq!(inst.operands[0].kind, OperandKind::Abs(0x000001));
    let fmt = format_dsp_instruction(&inst, &SymbolTable::new(), &FormatOptions::default());
    assert_eq!(fmt, "dc\t$000001");
}

#[test]
fn test_missing_extension_word() {
    let (inst, res, consumed) = decode_words(&[0x0BF080]);
    assert_eq!(res, Err(DecodeError::BufferExhausted));
    assert!(!inst.is_valid());
    assert_eq!(consumed, 1);
}

// ─── Scanning and labels ─────────────────────────────────────────────

#[test]
fn test_scan_two_word_instructions() {
    let data = words(&[0x0BF080, 0x000003, 0x000000, 0x00000C]);
    let insts = scan_dsp(&data, 0);
    let addrs: Vec<u32> = insts.iter().map(|i| i.address).collect();
    assert_eq!(addrs, [0, 2, 3]);
}

#[test]
fn test_program_labels() {
    // jeq $2 ; nop ; rts
    let data = words(&[0x0EA002, 0x000000, 0x00000C]);
    let insts = scan_dsp(&data, 0);
    let mut symbols = SymbolTable::new();
    let added = add_reference_symbols_dsp(&insts, &LabelOptions::default(), &mut symbols);
    assert_eq!(added, 1);

    let lines = generate_dsp_listing(&insts, &symbols, &ListingOptions::default());
    let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, ["\tjeq\tL0", "\tnop", "L0:", "\trts"]);
}

#[test]
fn test_data_addresses_not_labelled() {
    // move x:$1234,a does not name $1234
    let data = words(&[0x56F000, 0x001234]);
    let insts = scan_dsp(&data, 0);
    let mut symbols = SymbolTable::new();
    assert_eq!(add_reference_symbols_dsp(&insts, &LabelOptions::default(), &mut symbols), 0);
    assert!(symbols.is_empty());
}
