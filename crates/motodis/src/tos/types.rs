use std::collections::BTreeMap;

use crate::symbols::{Symbol, SymbolTable};

/// Header branch every TOS program starts with (`bra.s` over the header).
pub const TOS_MAGIC: u16 = 0x601A;
/// Size of the fixed program header in bytes.
pub const HEADER_SIZE: usize = 28;

/// DRI symbol table constants.
pub mod dri {
    /// Bytes per symbol record.
    pub const RECORD_SIZE: usize = 14;
    /// Bytes of name inside a record.
    pub const NAME_SIZE: usize = 8;
    /// Bytes of name in a following extension record.
    pub const EXT_NAME_SIZE: usize = 14;
    /// Either bit marks a GST long name continued in the next record.
    pub const EXT_SYMBOL_FLAG: u16 = 0x0048;
    pub const SECTION_MASK: u16 = 0x0F00;
    pub const SECTION_TEXT: u16 = 0x0200;
    pub const SECTION_DATA: u16 = 0x0400;
    pub const SECTION_BSS: u16 = 0x0100;
}

/// Debug hunk ids appended after the relocation stream.
pub mod debug_ids {
    pub const HUNK_DEBUG: u32 = 0x3F1;
    /// "HEAD"
    pub const HEAD: u32 = 0x4845_4144;
    /// "LINE"
    pub const LINE: u32 = 0x4C49_4E45;
    /// "HCLN", HiSoft compressed line numbers
    pub const HCLN: u32 = 0x4843_4C4E;
}

/// The fixed 28-byte program header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TosHeader {
    pub branch: u16,
    pub text_len: u32,
    pub data_len: u32,
    pub bss_len: u32,
    pub symbol_len: u32,
    pub reserved: u32,
    pub prg_flags: u32,
    /// Nonzero when the program carries no relocation information.
    pub abs_flag: u16,
}

impl TosHeader {
    pub fn text_address(&self) -> u32 {
        0
    }

    pub fn data_address(&self) -> u32 {
        self.text_len
    }

    pub fn bss_address(&self) -> u32 {
        self.text_len.wrapping_add(self.data_len)
    }
}

/// Source position of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo {
    /// Index into [`LineTable::filenames`].
    pub file_index: usize,
    pub line: u32,
}

/// Program counter to source line mapping from the debug hunks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTable {
    pub filenames: Vec<String>,
    lines: BTreeMap<u32, LineInfo>,
}

impl LineTable {
    pub fn new() -> Self {
        LineTable::default()
    }

    /// Register a source file and return its index.
    pub fn add_filename(&mut self, name: impl Into<String>) -> usize {
        self.filenames.push(name.into());
        self.filenames.len() - 1
    }

    /// Record a line for `pc`. The first entry for an address wins.
    pub fn add(&mut self, file_index: usize, line: u32, pc: u32) {
        self.lines.entry(pc).or_insert(LineInfo { file_index, line });
    }

    pub fn find(&self, pc: u32) -> Option<LineInfo> {
        self.lines.get(&pc).copied()
    }

    pub fn filename(&self, file_index: usize) -> Option<&str> {
        self.filenames.get(file_index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A loaded TOS program.
#[derive(Debug, Clone)]
pub struct TosProgram {
    pub header: TosHeader,
    pub text: Vec<u8>,
    pub data: Vec<u8>,
    /// Symbols of the text, data and bss sections, with section-relative
    /// values already turned into addresses.
    pub symbols: Vec<Symbol>,
    /// Relocated offset to the longword stored there.
    pub relocations: BTreeMap<u32, u32>,
    pub lines: LineTable,
}

impl TosProgram {
    /// Build a symbol table holding the program's symbols and relocations.
    pub fn symbol_table(&self) -> SymbolTable {
        let mut table = SymbolTable::new();
        for sym in &self.symbols {
            table.add(sym.clone());
        }
        for (&address, &value) in &self.relocations {
            table.add_reloc(address, value);
        }
        table
    }
}
