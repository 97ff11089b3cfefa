pub mod cursor;
pub mod dsp56;
pub mod error;
pub mod hex;
pub mod m68k;
pub mod output;
pub mod symbols;
pub mod timing;
pub mod tos;

pub use cursor::{Cursor, UnitCursor, WordCursor};
pub use error::{DecodeError, Error};
pub use hex::{parse_hex, HexError};
pub use m68k::{decode, CpuVariant, DecodeSettings, Instruction, Opcode, Operand, Size};
pub use output::listing::{
    generate_dsp_listing, generate_listing, generate_tos_listing, scan_dsp, scan_m68k,
    ListingLine, ListingOptions,
};
pub use output::formatter::{format_instruction, FormatOptions};
pub use output::dsp::format_dsp_instruction;
pub use symbols::{
    add_reference_symbols, add_reference_symbols_dsp, LabelOptions, Section, Symbol,
    SymbolResolver, SymbolTable,
};
pub use timing::{calc_timing, Timing};
pub use tos::{parse_tos, TosError, TosProgram};
