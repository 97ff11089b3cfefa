//! Atari TOS program loader.
//!
//! A TOS program (`.prg`, `.tos`, `.ttp`) is a 28-byte header followed by
//! the text and data images, an optional DRI symbol table and the
//! relocation stream. Compilers such as Pure C and HiSoft tools may append
//! line-number debug hunks after the relocation stream.

pub mod error;
pub mod parser;
pub mod types;

pub use error::TosError;
pub use parser::parse_tos;
pub use types::{LineInfo, LineTable, TosHeader, TosProgram};
