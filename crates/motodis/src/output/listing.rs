use crate::cursor::{Cursor, UnitCursor, WordCursor};
use crate::dsp56::{self, DspSettings};
use crate::m68k::{decode, CpuVariant, DecodeSettings, Instruction};
use crate::symbols::{add_reference_symbols, LabelOptions, SymbolResolver};
use crate::timing::{calc_timing, PAIR_BACK, PAIR_FRONT};
use crate::tos::{LineTable, TosProgram};

use super::dsp::format_dsp_instruction;
use super::formatter::{format_instruction, FormatOptions};

/// Options controlling the listing output.
#[derive(Debug, Clone, Default)]
pub struct ListingOptions {
    /// Prefix each instruction with its address and opcode word.
    pub show_address: bool,
    /// Append 68000 cycle estimates.
    pub show_timings: bool,
    pub uppercase: bool,
    pub cpu: CpuVariant,
}

/// A single line of the disassembly listing.
#[derive(Debug, Clone)]
pub struct ListingLine {
    pub line_number: u32,
    pub text: String,
}

/// Decode `data` as 68k code loaded at `base`, one instruction after the
/// other until less than a whole opcode word is left.
///
/// Undecodable words become INVALID placeholders and the scan carries on
/// with the next word.
pub fn scan_m68k(data: &[u8], base: u32, settings: &DecodeSettings) -> Vec<Instruction> {
    let mut cursor = Cursor::new(data, base);
    let mut out = Vec::new();
    while cursor.remaining() >= 2 {
        let mut inst = Instruction::default();
        // A failed decode still leaves a printable placeholder
        let _ = decode(&mut inst, &mut cursor, settings);
        out.push(inst);
    }
    out
}

/// Decode `data` as DSP56000 program words loaded at word address `base`.
pub fn scan_dsp(data: &[u8], base: u32) -> Vec<dsp56::Instruction> {
    let mut cursor = WordCursor::new(data, base);
    let mut out = Vec::new();
    while cursor.remaining() >= 1 {
        let mut inst = dsp56::Instruction::default();
        let _ = dsp56::decode(&mut inst, &mut cursor, &DspSettings);
        out.push(inst);
    }
    out
}

/// Generate a 68k listing from decoded instructions.
///
/// Named addresses get a `label:` line. When `lines` is given, source
/// file and line comments are emitted for instructions with debug info.
pub fn generate_listing(
    instructions: &[Instruction],
    symbols: &dyn SymbolResolver,
    lines: Option<&LineTable>,
    options: &ListingOptions,
) -> Vec<ListingLine> {
    let mut out = Vec::new();
    let mut line_num: u32 = 1;
    append_m68k(&mut out, &mut line_num, instructions, symbols, lines, options);
    out
}

fn append_m68k(
    out: &mut Vec<ListingLine>,
    line_num: &mut u32,
    instructions: &[Instruction],
    symbols: &dyn SymbolResolver,
    lines: Option<&LineTable>,
    options: &ListingOptions,
) {
    let fmt_opts = FormatOptions {
        uppercase: options.uppercase,
    };
    let mut prev_flags = 0u8;
    let mut last_file = None;

    for inst in instructions {
        if let Some(label) = symbols.resolve_address(inst.address) {
            push_line(out, line_num, format!("{label}:"));
        }

        if let Some(info) = lines.and_then(|table| table.find(inst.address)) {
            if last_file != Some(info.file_index) {
                let name = lines
                    .and_then(|table| table.filename(info.file_index))
                    .unwrap_or("?");
                push_line(out, line_num, format!("; File: {name}"));
                last_file = Some(info.file_index);
            }
            push_line(out, line_num, format!("; line {:04}:", info.line));
        }

        let mut text = String::new();
        if options.show_address {
            text.push_str(&format!(">> {:04x}:   ${:04x} ", inst.address, inst.header));
        }
        text.push('\t');
        text.push_str(&format_instruction(inst, symbols, &fmt_opts).to_string());

        if options.show_timings && inst.is_valid() {
            match calc_timing(inst) {
                Some(timing) => {
                    let mut cycles = timing.rounded();
                    let mut note = "";
                    if prev_flags & PAIR_BACK != 0 && timing.flags & PAIR_FRONT != 0 {
                        cycles = cycles.saturating_sub(4);
                        note = " (pair)";
                    }
                    text.push_str(&format!("\t; {cycles}{note}"));
                    prev_flags = timing.flags;
                }
                None => {
                    text.push_str("\t; ?");
                    prev_flags = 0;
                }
            }
        } else {
            prev_flags = 0;
        }

        push_line(out, line_num, text);
    }
}

/// Generate a DSP56000 listing from decoded instructions.
pub fn generate_dsp_listing(
    instructions: &[dsp56::Instruction],
    symbols: &dyn SymbolResolver,
    options: &ListingOptions,
) -> Vec<ListingLine> {
    let fmt_opts = FormatOptions {
        uppercase: options.uppercase,
    };
    let mut out = Vec::new();
    let mut line_num: u32 = 1;

    for inst in instructions {
        if let Some(label) = symbols.resolve_address(inst.address) {
            push_line(&mut out, &mut line_num, format!("{label}:"));
        }
        let mut text = String::new();
        if options.show_address {
            text.push_str(&format!(">> {:04x}:   ${:06x} ", inst.address, inst.header));
        }
        text.push('\t');
        text.push_str(&format_dsp_instruction(inst, symbols, &fmt_opts));
        push_line(&mut out, &mut line_num, text);
    }
    out
}

/// Disassemble the text section of a loaded TOS program.
///
/// The program's own symbols are used first; every other referenced
/// address gets a generated label.
pub fn generate_tos_listing(
    program: &TosProgram,
    labels: &LabelOptions,
    options: &ListingOptions,
) -> Vec<ListingLine> {
    let mut out = Vec::new();
    let mut line_num: u32 = 1;
    push_line(&mut out, &mut line_num, "; Reading text section".to_string());
    push_line(&mut out, &mut line_num, "; Reading symbols...".to_string());

    let settings = DecodeSettings { cpu: options.cpu };
    let instructions = scan_m68k(&program.text, program.header.text_address(), &settings);
    let mut symbols = program.symbol_table();
    add_reference_symbols(&instructions, labels, &mut symbols);

    append_m68k(
        &mut out,
        &mut line_num,
        &instructions,
        &symbols,
        Some(&program.lines),
        options,
    );
    out
}

fn push_line(lines: &mut Vec<ListingLine>, line_num: &mut u32, text: String) {
    lines.push(ListingLine {
        line_number: *line_num,
        text,
    });
    *line_num += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{Section, Symbol, SymbolTable};

    fn texts(lines: &[ListingLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    fn m68k(data: &[u8]) -> Vec<Instruction> {
        scan_m68k(data, 0, &DecodeSettings::default())
    }

    // ─── Scanning ───

    #[test]
    fn scan_advances_by_width() {
        // move.l #5,d0 ; nop ; rts
        let data = [0x20, 0x3C, 0, 0, 0, 5, 0x4E, 0x71, 0x4E, 0x75];
        let insts = m68k(&data);
        let addrs: Vec<u32> = insts.iter().map(|i| i.address).collect();
        assert_eq!(addrs, [0, 6, 8]);
    }

    #[test]
    fn scan_skips_invalid_words() {
        let insts = m68k(&[0x4A, 0xFB, 0x4E, 0x75]);
        assert_eq!(insts.len(), 2);
        assert!(!insts[0].is_valid());
        assert_eq!(insts[1].address, 2);
        assert!(insts[1].is_valid());
    }

    #[test]
    fn scan_ignores_trailing_byte() {
        assert_eq!(m68k(&[0x4E, 0x75, 0x4E]).len(), 1);
        assert_eq!(scan_dsp(&[0, 0, 0, 0, 0], 0).len(), 1);
    }

    #[test]
    fn scan_uses_base() {
        let insts = scan_m68k(&[0x4E, 0x71, 0x4E, 0x71], 0x1000, &DecodeSettings::default());
        assert_eq!(insts[1].address, 0x1002);
        let dsp = scan_dsp(&[0, 0, 0, 0, 0, 0], 0x40);
        assert_eq!(dsp[1].address, 0x41);
    }

    // ─── 68k listing ───

    #[test]
    fn plain_listing() {
        let insts = m68k(&[0x4E, 0x71, 0x4E, 0x75]);
        let lines = generate_listing(&insts, &SymbolTable::new(), None, &ListingOptions::default());
        assert_eq!(texts(&lines), ["\tnop", "\trts"]);
        assert_eq!(lines[1].line_number, 2);
    }

    #[test]
    fn address_column_and_labels() {
        let insts = m68k(&[0x4E, 0x71, 0x4E, 0x75]);
        let mut symbols = SymbolTable::new();
        symbols.add(Symbol::new("done", Section::Text, 2));
        let options = ListingOptions {
            show_address: true,
            ..Default::default()
        };
        let lines = generate_listing(&insts, &symbols, None, &options);
        assert_eq!(
            texts(&lines),
            [">> 0000:   $4e71 \tnop", "done:", ">> 0002:   $4e75 \trts"]
        );
    }

    #[test]
    fn line_number_comments() {
        let insts = m68k(&[0x4E, 0x71, 0x4E, 0x71, 0x4E, 0x75]);
        let mut table = LineTable::new();
        let a = table.add_filename("a.c");
        let b = table.add_filename("b.c");
        table.add(a, 7, 0);
        table.add(a, 8, 2);
        table.add(b, 1, 4);
        let lines = generate_listing(
            &insts,
            &SymbolTable::new(),
            Some(&table),
            &ListingOptions::default(),
        );
        assert_eq!(
            texts(&lines),
            [
                "; File: a.c",
                "; line 0007:",
                "\tnop",
                "; line 0008:",
                "\tnop",
                "; File: b.c",
                "; line 0001:",
                "\trts",
            ]
        );
    }

    #[test]
    fn timing_comments() {
        // nop ; rts ; invalid
        let insts = m68k(&[0x4E, 0x71, 0x4E, 0x75, 0x4A, 0xFB]);
        let options = ListingOptions {
            show_timings: true,
            ..Default::default()
        };
        let lines = generate_listing(&insts, &SymbolTable::new(), None, &options);
        assert_eq!(lines[0].text, "\tnop\t; 4");
        assert_eq!(lines[1].text, "\trts\t; 16");
        assert_eq!(lines[2].text, "\tdc.w     $4afb  ; J.");
    }

    #[test]
    fn uppercase_listing() {
        let insts = m68k(&[0x4E, 0x75]);
        let options = ListingOptions {
            uppercase: true,
            ..Default::default()
        };
        let lines = generate_listing(&insts, &SymbolTable::new(), None, &options);
        assert_eq!(lines[0].text, "\tRTS");
    }

    // ─── DSP listing ───

    #[test]
    fn dsp_listing() {
        // nop ; rts
        let insts = scan_dsp(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x0C], 0);
        let mut symbols = SymbolTable::new();
        symbols.add(Symbol::new("exit", Section::Text, 1));
        let options = ListingOptions {
            show_address: true,
            ..Default::default()
        };
        let lines = generate_dsp_listing(&insts, &symbols, &options);
        assert_eq!(
            texts(&lines),
            [">> 0000:   $000000 \tnop", "exit:", ">> 0001:   $00000c \trts"]
        );
    }
}
