//! Brief and full-format index extension words.

use super::addressing::{FullIndex, IndexRegister, IndexSpec, MemoryIndirection};
use super::variants::CpuVariant;
use crate::cursor::Cursor;
use crate::error::DecodeError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum DispSize {
    Null,
    Word,
    Long,
}

/// Indirection class, keyed by `(IS << 3) | I/IS`. `None` entries are reserved.
const FULL_KINDS: [Option<MemoryIndirection>; 16] = [
    Some(MemoryIndirection::None),
    Some(MemoryIndirection::PreIndexed),
    Some(MemoryIndirection::PreIndexed),
    Some(MemoryIndirection::PreIndexed),
    None,
    Some(MemoryIndirection::PostIndexed),
    Some(MemoryIndirection::PostIndexed),
    Some(MemoryIndirection::PostIndexed),
    Some(MemoryIndirection::None),
    Some(MemoryIndirection::MemoryIndirect),
    Some(MemoryIndirection::MemoryIndirect),
    Some(MemoryIndirection::MemoryIndirect),
    None,
    None,
    None,
    None,
];

/// Outer displacement size, same key as [`FULL_KINDS`].
const OUTER_SIZES: [DispSize; 16] = [
    DispSize::Null,
    DispSize::Null,
    DispSize::Word,
    DispSize::Long,
    DispSize::Null,
    DispSize::Null,
    DispSize::Word,
    DispSize::Long,
    DispSize::Null,
    DispSize::Null,
    DispSize::Word,
    DispSize::Long,
    DispSize::Null,
    DispSize::Null,
    DispSize::Null,
    DispSize::Null,
];

fn read_disp(cursor: &mut Cursor, size: DispSize) -> Result<Option<i32>, DecodeError> {
    Ok(match size {
        DispSize::Null => None,
        DispSize::Word => Some(cursor.read_u16()? as i16 as i32),
        DispSize::Long => Some(cursor.read_u32()? as i32),
    })
}

/// Index register, size and scale shared by both extension formats.
///
/// The scale field only exists from the 68020 on; older CPUs ignore it.
pub fn decode_index_spec(ext: u16, cpu: CpuVariant) -> IndexSpec {
    IndexSpec {
        reg: IndexRegister::from_bits(ext & 0x8000 != 0, ((ext >> 12) & 7) as u8),
        long: ext & 0x0800 != 0,
        scale_shift: if cpu.is_020_plus() {
            ((ext >> 9) & 3) as u8
        } else {
            0
        },
    }
}

/// Split a brief extension word into its signed 8-bit displacement and index.
pub fn decode_brief(ext: u16, cpu: CpuVariant) -> (i8, IndexSpec) {
    ((ext & 0xFF) as u8 as i8, decode_index_spec(ext, cpu))
}

/// Decode a 68020 full extension word and the displacements following it.
///
/// `base` is the base register the EA mode implies (An or PC) before base
/// suppression. `pc_adjust` is the distance from the instruction start to
/// the extension word, added to the base displacement for PC bases.
pub fn decode_full(
    cursor: &mut Cursor,
    cpu: CpuVariant,
    ext: u16,
    base: Option<IndexRegister>,
    pc_adjust: i32,
) -> Result<FullIndex, DecodeError> {
    let base_suppress = (ext >> 7) & 1 != 0;
    let index_suppress = (ext >> 6) & 1 != 0;
    let bd_size = (ext >> 4) & 3;
    let key = (((index_suppress as u16) << 3) | (ext & 7)) as usize;

    let kind = FULL_KINDS[key].ok_or(DecodeError::UnrecognizedEncoding)?;
    let base = if base_suppress { None } else { base };

    let bd = match bd_size {
        0 => return Err(DecodeError::UnrecognizedEncoding),
        1 => DispSize::Null,
        2 => DispSize::Word,
        _ => DispSize::Long,
    };
    let base_disp_raw = read_disp(cursor, bd)?;
    let mut base_disp = base_disp_raw.unwrap_or(0);
    if base == Some(IndexRegister::Pc) {
        base_disp = base_disp.wrapping_add(pc_adjust);
    }

    let outer_disp = read_disp(cursor, OUTER_SIZES[key])?;
    let index = if index_suppress {
        None
    } else {
        Some(decode_index_spec(ext, cpu))
    };

    Ok(FullIndex {
        kind,
        base_disp,
        base_disp_used: base_disp_raw.is_some(),
        base,
        index,
        outer_disp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::UnitCursor;

    #[test]
    fn brief_scale_ignored_on_68000() {
        // d3.l*4, disp -2
        let ext = 0x3000 | 0x0800 | (2 << 9) | 0xFE;
        let (disp, spec) = decode_brief(ext, CpuVariant::M68000);
        assert_eq!(disp, -2);
        assert_eq!(spec.reg, IndexRegister::Data(3));
        assert!(spec.long);
        assert_eq!(spec.scale_shift, 0);
        let (_, spec) = decode_brief(ext, CpuVariant::M68020);
        assert_eq!(spec.scale_shift, 2);
    }

    #[test]
    fn full_reserved_bd_size_fails() {
        let data = [0u8; 4];
        let mut c = Cursor::new(&data, 0);
        let ext = 0x0100; // bd size 0
        assert_eq!(
            decode_full(&mut c, CpuVariant::M68020, ext, Some(IndexRegister::Address(0)), 0),
            Err(DecodeError::UnrecognizedEncoding)
        );
    }

    #[test]
    fn full_memory_indirect_with_long_outer() {
        // BS=0 IS=1 bd=word I/IS=011 -> ([bd,a1],od.l)
        let ext = 0x0100 | 0x0040 | 0x0020 | 0x0003;
        let data = [0x00, 0x10, 0x00, 0x00, 0x01, 0x00];
        let mut c = Cursor::new(&data, 0);
        let full = decode_full(&mut c, CpuVariant::M68030, ext, Some(IndexRegister::Address(1)), 0).unwrap();
        assert_eq!(full.kind, MemoryIndirection::MemoryIndirect);
        assert_eq!(full.base_disp, 0x10);
        assert_eq!(full.index, None);
        assert_eq!(full.outer_disp, Some(0x100));
        assert_eq!(full.used(), [true, true, false, true]);
        assert_eq!(c.position(), 6);
    }

    #[test]
    fn full_pc_base_adjusted() {
        // BS=0 IS=0 bd=null I/IS=000
        let ext = 0x0100 | 0x0010;
        let data: [u8; 0] = [];
        let mut c = Cursor::new(&data, 0);
        let full = decode_full(&mut c, CpuVariant::M68020, ext, Some(IndexRegister::Pc), 2).unwrap();
        assert_eq!(full.kind, MemoryIndirection::None);
        assert_eq!(full.base_disp, 2);
        assert!(!full.base_disp_used);
        assert_eq!(full.base, Some(IndexRegister::Pc));
    }

    #[test]
    fn full_reserved_indirection_fails() {
        let data = [0u8; 4];
        let mut c = Cursor::new(&data, 0);
        let ext = 0x0100 | 0x0010 | 0x0004;
        assert!(decode_full(&mut c, CpuVariant::M68020, ext, None, 0).is_err());
    }
}
