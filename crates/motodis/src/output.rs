//! Assembly text output for both architectures.

pub mod dsp;
pub mod formatter;
pub mod listing;

pub use dsp::{format_dsp_instruction, format_dsp_operand};
pub use formatter::{format_instruction, FormatOptions, FormattedInstruction};
pub use listing::{
    generate_dsp_listing, generate_listing, generate_tos_listing, scan_dsp, scan_m68k,
    ListingLine, ListingOptions,
};
