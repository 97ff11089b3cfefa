use super::extension::{decode_brief, decode_full};
use super::instruction::{Immediate, Operand, Size};
use super::variants::CpuVariant;
use crate::cursor::{Cursor, UnitCursor};
use crate::error::DecodeError;

/// Identifies a register used as an index or base in indexed addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexRegister {
    /// Data register D0-D7
    Data(u8),
    /// Address register A0-A7
    Address(u8),
    /// Program counter (base register only)
    Pc,
}

impl IndexRegister {
    /// Build from the D/A flag and 3-bit register number of an extension word.
    pub fn from_bits(is_address: bool, reg: u8) -> Self {
        if is_address {
            IndexRegister::Address(reg & 7)
        } else {
            IndexRegister::Data(reg & 7)
        }
    }
}

impl std::fmt::Display for IndexRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexRegister::Data(n) => write!(f, "d{n}"),
            IndexRegister::Address(7) => f.write_str("sp"),
            IndexRegister::Address(n) => write!(f, "a{n}"),
            IndexRegister::Pc => f.write_str("pc"),
        }
    }
}

/// Index part of an extension word: `Xn.size*scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub reg: IndexRegister,
    pub long: bool,
    /// 0 = *1, 1 = *2, 2 = *4, 3 = *8. Always 0 below the 68020.
    pub scale_shift: u8,
}

/// Memory indirection class selected by the IS and I/IS fields of a full
/// extension word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryIndirection {
    /// (bd,BR,Xn): no memory access.
    None,
    /// ([bd,BR,Xn],od)
    PreIndexed,
    /// ([bd,BR],Xn,od)
    PostIndexed,
    /// ([bd,BR],od) with the index suppressed.
    MemoryIndirect,
}

/// 68020 full-format indexed operand.
///
/// Each of the four parts is independently present: a `None` base
/// register or index means that part was suppressed, and the displacement
/// flags record whether a displacement was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullIndex {
    pub kind: MemoryIndirection,
    /// Base displacement. With a PC base it is relative to the
    /// instruction's own address.
    pub base_disp: i32,
    pub base_disp_used: bool,
    pub base: Option<IndexRegister>,
    pub index: Option<IndexSpec>,
    pub outer_disp: Option<i32>,
}

impl FullIndex {
    /// Presence of (base displacement, base register, index, outer displacement).
    pub fn used(&self) -> [bool; 4] {
        [
            self.base_disp_used,
            self.base.is_some(),
            self.index.is_some(),
            self.outer_disp.is_some(),
        ]
    }
}

/// Addressing-mode legality class of an operand position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EaClass {
    /// Data alterable: no An, no PC-relative, no immediate.
    DataAlt,
    /// Data: no An.
    Data,
    /// Memory alterable.
    MemAlt,
    /// Memory.
    Mem,
    /// Control.
    Control,
    /// MOVEM registers to memory.
    MovemToMem,
    /// MOVEM memory to registers.
    MovemToReg,
    /// Alterable, An included.
    Alt,
    /// Every mode.
    All,
    /// Readable bitfield operand.
    BfRead,
    /// Writable bitfield operand.
    BfWrite,
}

impl EaClass {
    pub const ALL_CLASSES: [EaClass; 11] = [
        EaClass::DataAlt,
        EaClass::Data,
        EaClass::MemAlt,
        EaClass::Mem,
        EaClass::Control,
        EaClass::MovemToMem,
        EaClass::MovemToReg,
        EaClass::Alt,
        EaClass::All,
        EaClass::BfRead,
        EaClass::BfWrite,
    ];
}

/// Number of EA ordinals: modes 0-6, mode 7 registers 0-4, and one
/// catch-all invalid row.
pub const EA_ORDINALS: usize = 13;

const T: bool = true;
const F: bool = false;

/// Legality matrix, indexed `[ordinal][class as usize]`.
static MODE_AVAILABILITY: [[bool; 11]; EA_ORDINALS] = [
    // DataAlt Data MemAlt Mem Ctrl MovemM MovemR Alt All BfRd BfWr
    [T, T, F, F, F, F, F, T, T, T, T], // Dn
    [F, F, F, F, F, F, F, T, T, F, F], // An
    [T, T, T, T, T, T, T, T, T, T, T], // (An)
    [T, T, T, T, F, F, T, T, T, F, F], // (An)+
    [T, T, T, T, F, T, T, T, T, F, F], // -(An)
    [T, T, T, T, T, T, T, T, T, T, T], // (d16,An)
    [T, T, T, T, T, T, T, T, T, T, T], // (d8,An,Xn)
    [T, T, T, T, T, T, T, T, T, T, T], // (xxx).w
    [T, T, T, T, T, T, T, T, T, T, T], // (xxx).l
    [F, T, F, T, T, T, T, F, T, T, F], // (d16,PC)
    [F, T, F, T, T, T, T, F, T, T, F], // (d8,PC,Xn)
    [F, T, F, T, F, F, F, F, T, F, F], // #imm
    [F, F, F, F, F, F, F, F, F, F, F], // invalid
];

/// Collapse the 3-bit mode and register fields into an ordinal 0-12.
pub fn ea_ordinal(mode: u8, reg: u8) -> usize {
    match mode & 7 {
        7 if reg & 7 <= 4 => 7 + (reg & 7) as usize,
        7 => 12,
        m => m as usize,
    }
}

/// Whether the legality matrix permits `ordinal` for `class`.
pub fn is_allowed(ordinal: usize, class: EaClass) -> bool {
    MODE_AVAILABILITY[ordinal][class as usize]
}

/// Read an immediate of `size`. Byte immediates occupy a full word and
/// keep its low byte.
pub fn read_immediate(cursor: &mut Cursor, size: Option<Size>) -> Result<Immediate, DecodeError> {
    let (value, size) = match size {
        Some(Size::Byte) => ((cursor.read_u16()? & 0xFF) as u32, Size::Byte),
        Some(Size::Word) => (cursor.read_u16()? as u32, Size::Word),
        Some(Size::Long) => (cursor.read_u32()?, Size::Long),
        _ => return Err(DecodeError::IllegalAddressingMode),
    };
    Ok(Immediate {
        value,
        size,
        signed: false,
    })
}

/// Decode a 6-bit effective address field into an operand.
///
/// `size` is the operand size the instruction works at, or `None` for
/// instructions without one (JMP, bitfields). `inst_address` is the
/// address of the opcode word and anchors PC-relative results.
pub fn decode_ea(
    cursor: &mut Cursor,
    cpu: CpuVariant,
    class: EaClass,
    mode: u8,
    reg: u8,
    size: Option<Size>,
    inst_address: u32,
) -> Result<Operand, DecodeError> {
    let ordinal = ea_ordinal(mode, reg);
    if !is_allowed(ordinal, class) {
        return Err(DecodeError::IllegalAddressingMode);
    }

    let reg = reg & 7;
    let read_disp = cursor.address().wrapping_sub(inst_address) as i32;
    match ordinal {
        0 => Ok(Operand::DataDirect(reg)),
        1 => {
            // Address registers are never byte-addressable.
            if size == Some(Size::Byte) {
                return Err(DecodeError::IllegalAddressingMode);
            }
            Ok(Operand::AddressDirect(reg))
        }
        2 => Ok(Operand::Indirect(reg)),
        3 => Ok(Operand::PostIncrement(reg)),
        4 => Ok(Operand::PreDecrement(reg)),
        5 => {
            let disp = cursor.read_u16()? as i16;
            Ok(Operand::Displacement { reg, disp })
        }
        6 => {
            let ext = cursor.read_u16()?;
            if cpu.is_020_plus() && ext & 0x0100 != 0 {
                let full = decode_full(cursor, cpu, ext, Some(IndexRegister::Address(reg)), 0)?;
                return Ok(Operand::FullIndex(full));
            }
            let (disp, index) = decode_brief(ext, cpu);
            Ok(Operand::Index { reg, disp, index })
        }
        7 => Ok(Operand::AbsoluteWord(cursor.read_u16()?)),
        8 => Ok(Operand::AbsoluteLong(cursor.read_u32()?)),
        9 => {
            let disp = cursor.read_u16()? as i16;
            Ok(Operand::PcDisplacement {
                inst_disp: read_disp.wrapping_add(disp as i32),
            })
        }
        10 => {
            let ext = cursor.read_u16()?;
            if cpu.is_020_plus() && ext & 0x0100 != 0 {
                let full = decode_full(cursor, cpu, ext, Some(IndexRegister::Pc), read_disp)?;
                return Ok(Operand::FullIndex(full));
            }
            let (disp, index) = decode_brief(ext, cpu);
            Ok(Operand::PcIndex {
                inst_disp: read_disp.wrapping_add(disp as i32),
                index,
            })
        }
        11 => Ok(Operand::Immediate(read_immediate(cursor, size)?)),
        _ => Err(DecodeError::IllegalAddressingMode),
    }
}
