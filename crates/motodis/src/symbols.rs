//! Symbol storage and auto-labelling.
//!
//! A [`SymbolTable`] maps addresses to names and records relocation
//! sites. The label builders add generated names for every address the
//! decoded code refers to, so the printers can show targets by name.

pub mod labels;
pub mod table;

pub use labels::{add_reference_symbols, add_reference_symbols_dsp, relative_target, LabelOptions};
pub use table::{Section, Symbol, SymbolResolver, SymbolTable};
