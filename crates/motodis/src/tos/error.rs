use thiserror::Error;

/// Errors that can occur while loading an Atari TOS program file.
///
/// All variants are self-contained (no std::io references) so the
/// library stays usable on in-memory buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TosError {
    /// File is too short to contain the expected data.
    #[error("at offset 0x{offset:X}: need {needed} bytes, only {available} available")]
    TooShort {
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// File does not start with the `bra.s` header branch (0x601A).
    #[error("not a TOS program: expected magic 0x601A, found 0x{found:04X}")]
    BadMagic { found: u16 },
    /// A debug block does not start with the debug hunk id (0x3F1).
    #[error("bad debug hunk magic 0x{found:08X} at offset 0x{offset:X}")]
    BadDebugMagic { found: u32, offset: usize },
    /// Debug block of a kind other than HEAD, LINE or HCLN.
    #[error("unknown debug hunk type 0x{kind:08X} at offset 0x{offset:X}")]
    UnknownDebugHunk { kind: u32, offset: usize },
    /// A string length field exceeds reasonable bounds.
    #[error("invalid string length {length} longwords at offset 0x{offset:X}")]
    InvalidStringLength { length: u32, offset: usize },
}
