//! Bounded big-endian read cursors over a borrowed byte region.
//!
//! Both cursors are `Copy`. Decoders take a copy, read speculatively from
//! it, and only move the caller's cursor once the outcome is known. A read
//! that would run past the end fails with [`DecodeError::BufferExhausted`]
//! and leaves the position where it was.

use crate::error::DecodeError;

/// Operations shared by the byte cursor and the 24-bit word cursor.
///
/// Positions and counts are expressed in the cursor's own unit: bytes for
/// [`Cursor`], 24-bit words for [`WordCursor`].
pub trait UnitCursor {
    /// Current position, in units, from the start of the region.
    fn position(&self) -> usize;
    /// Logical address of the current position (`base + position`).
    fn address(&self) -> u32;
    /// Whole units left before the end of the region.
    fn remaining(&self) -> usize;
    /// Move forward by `units`, stopping at the end of the region.
    fn advance(&mut self, units: usize);
}

/// Byte-unit cursor used by the 68k decoder.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    data: &'a [u8],
    base: u32,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8], base: u32) -> Self {
        Cursor { data, base, pos: 0 }
    }

    /// Total length of the underlying region in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.data.len() - self.pos < n {
            return Err(DecodeError::BufferExhausted);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

impl UnitCursor for Cursor<'_> {
    fn position(&self) -> usize {
        self.pos
    }

    fn address(&self) -> u32 {
        self.base.wrapping_add(self.pos as u32)
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn advance(&mut self, units: usize) {
        self.pos = self.pos.saturating_add(units).min(self.data.len());
    }
}

/// Bytes per DSP word.
pub const DSP_WORD_BYTES: usize = 3;

/// 24-bit word cursor used by the DSP decoder.
///
/// The base address is a word address; each word is stored as three
/// big-endian bytes. A trailing partial word is never readable.
#[derive(Debug, Clone, Copy)]
pub struct WordCursor<'a> {
    data: &'a [u8],
    base: u32,
    pos: usize,
}

impl<'a> WordCursor<'a> {
    pub fn new(data: &'a [u8], base: u32) -> Self {
        WordCursor { data, base, pos: 0 }
    }

    pub fn read_word(&mut self) -> Result<u32, DecodeError> {
        if self.data.len() - self.pos < DSP_WORD_BYTES {
            return Err(DecodeError::BufferExhausted);
        }
        let b = &self.data[self.pos..self.pos + DSP_WORD_BYTES];
        self.pos += DSP_WORD_BYTES;
        Ok(u32::from_be_bytes([0, b[0], b[1], b[2]]))
    }
}

impl UnitCursor for WordCursor<'_> {
    fn position(&self) -> usize {
        self.pos / DSP_WORD_BYTES
    }

    fn address(&self) -> u32 {
        self.base.wrapping_add(self.position() as u32)
    }

    fn remaining(&self) -> usize {
        (self.data.len() - self.pos) / DSP_WORD_BYTES
    }

    fn advance(&mut self, units: usize) {
        let bytes = units.saturating_mul(DSP_WORD_BYTES);
        self.pos = self.pos.saturating_add(bytes).min(self.data.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_reads_are_big_endian() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A];
        let mut c = Cursor::new(&data, 0x1000);
        assert_eq!(c.read_u16().unwrap(), 0x1234);
        assert_eq!(c.address(), 0x1002);
        assert_eq!(c.read_u8().unwrap(), 0x56);
        assert_eq!(c.remaining(), 2);
    }

    #[test]
    fn failed_read_keeps_position() {
        let data = [0x12, 0x34, 0x56];
        let mut c = Cursor::new(&data, 0);
        c.advance(1);
        assert_eq!(c.read_u32(), Err(DecodeError::BufferExhausted));
        assert_eq!(c.position(), 1);
        assert_eq!(c.read_u16().unwrap(), 0x3456);
    }

    #[test]
    fn advance_saturates() {
        let data = [0u8; 4];
        let mut c = Cursor::new(&data, 0);
        c.advance(100);
        assert_eq!(c.position(), 4);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn copies_are_independent() {
        let data = [0x4E, 0x75, 0x4E, 0x71];
        let c = Cursor::new(&data, 0);
        let mut probe = c;
        probe.read_u16().unwrap();
        assert_eq!(c.position(), 0);
        assert_eq!(probe.position(), 2);
    }

    #[test]
    fn word_cursor_units() {
        let data = [0x0A, 0xF0, 0x80, 0x00, 0x12, 0x34, 0xFF];
        let mut c = WordCursor::new(&data, 0x40);
        assert_eq!(c.remaining(), 2);
        assert_eq!(c.read_word().unwrap(), 0x0AF080);
        assert_eq!(c.position(), 1);
        assert_eq!(c.address(), 0x41);
        assert_eq!(c.read_word().unwrap(), 0x001234);
        assert_eq!(c.read_word(), Err(DecodeError::BufferExhausted));
        assert_eq!(c.remaining(), 0);
        c.advance(5);
        assert_eq!(c.position(), 2);
    }
}
