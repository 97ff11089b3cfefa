//! Hex-string input: `4e75`, `20 3c 00 00 00 05`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("invalid hex digit {found:?} at offset {offset}")]
    InvalidDigit { offset: usize, found: char },
    #[error("odd number of hex digits")]
    OddLength,
}

/// Parse pairs of hex digits, optionally separated by spaces or tabs
/// between pairs.
pub fn parse_hex(s: &str) -> Result<Vec<u8>, HexError> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut bytes = Vec::with_capacity(chars.len() / 2);
    let mut i = 0;

    while i < chars.len() {
        let (offset, hi) = chars[i];
        let hi = digit(hi).ok_or(HexError::InvalidDigit { offset, found: hi })?;
        let &(offset, lo) = chars.get(i + 1).ok_or(HexError::OddLength)?;
        let lo = digit(lo).ok_or(HexError::InvalidDigit { offset, found: lo })?;
        bytes.push((hi << 4) | lo);
        i += 2;

        while i < chars.len() && matches!(chars[i].1, ' ' | '\t') {
            i += 1;
        }
    }
    Ok(bytes)
}

fn digit(c: char) -> Option<u8> {
    c.to_digit(16).map(|d| d as u8)
}
