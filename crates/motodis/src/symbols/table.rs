//! Address-keyed symbol table and relocation map.
//!
//! Symbols come from an executable's own symbol table or from the label
//! builder. Relocation sites record the longword value stored at each
//! relocated offset, so a long immediate that was relocated can be shown
//! by name.

use std::collections::BTreeMap;
use std::fmt;

/// Program section a symbol belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    Text,
    Data,
    Bss,
    #[default]
    Unknown,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Text => write!(f, "TEXT"),
            Section::Data => write!(f, "DATA"),
            Section::Bss => write!(f, "BSS"),
            Section::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub label: String,
    pub section: Section,
    pub address: u32,
}

impl Symbol {
    pub fn new(label: impl Into<String>, section: Section, address: u32) -> Self {
        Symbol {
            label: label.into(),
            section,
            address,
        }
    }
}

/// Lookup interface used by the printers.
pub trait SymbolResolver {
    /// Label naming `address`, if any.
    fn resolve_address(&self, address: u32) -> Option<&str>;

    /// Value stored at a relocated longword position, if `address` is one.
    fn resolve_reloc(&self, address: u32) -> Option<u32>;
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: BTreeMap<u32, Symbol>,
    relocs: BTreeMap<u32, u32>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Insert `symbol` unless its address is already named.
    ///
    /// Returns `true` if the symbol was added.
    pub fn add(&mut self, symbol: Symbol) -> bool {
        if self.symbols.contains_key(&symbol.address) {
            return false;
        }
        self.symbols.insert(symbol.address, symbol);
        true
    }

    pub fn find(&self, address: u32) -> Option<&Symbol> {
        self.symbols.get(&address)
    }

    pub fn contains(&self, address: u32) -> bool {
        self.symbols.contains_key(&address)
    }

    /// Record the longword `value` found at relocated position `address`.
    pub fn add_reloc(&mut self, address: u32, value: u32) {
        self.relocs.insert(address, value);
    }

    pub fn find_reloc(&self, address: u32) -> Option<u32> {
        self.relocs.get(&address).copied()
    }

    /// Symbols in address order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn reloc_count(&self) -> usize {
        self.relocs.len()
    }
}

impl SymbolResolver for SymbolTable {
    fn resolve_address(&self, address: u32) -> Option<&str> {
        self.find(address).map(|sym| sym.label.as_str())
    }

    fn resolve_reloc(&self, address: u32) -> Option<u32> {
        self.find_reloc(address)
    }
}
