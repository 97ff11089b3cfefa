use thiserror::Error;

use crate::hex::HexError;
use crate::tos::error::TosError;

/// Why a single instruction failed to decode.
///
/// Every kind is local to one instruction: the top-level decoders turn any
/// of them into an INVALID placeholder and keep scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A field needed more bytes than remain in the buffer.
    #[error("buffer exhausted")]
    BufferExhausted,
    /// The addressing mode is not permitted for this operand.
    #[error("illegal addressing mode")]
    IllegalAddressingMode,
    /// No table entry matched, or a sub-field held an undefined value.
    #[error("unrecognized encoding")]
    UnrecognizedEncoding,
    /// The encoding needs a newer CPU revision than the one selected.
    #[error("not supported on the selected cpu")]
    UnsupportedOnRevision,
}

/// Unified error type for the motodis library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("tos error: {0}")]
    Tos(#[from] TosError),
    #[error("hex input: {0}")]
    Hex(#[from] HexError),
}
