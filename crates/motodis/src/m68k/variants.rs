/// CPU revision selection for instruction decoding.
///
/// Each successive variant is a superset of the previous one, except for
/// RTM and CALLM which exist only on the MC68020. When the decoder meets an
/// instruction or addressing mode the selected variant lacks, it emits the
/// INVALID placeholder instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum CpuVariant {
    /// MC68000: the base 16/32-bit processor.
    #[default]
    M68000,
    /// MC68010: adds MOVEC, MOVES, RTD, BKPT and MOVE from CCR.
    M68010,
    /// MC68020: bitfields, 32-bit mul/div, CAS/CAS2, full extension words.
    M68020,
    /// MC68030: as the 68020, without the module instructions.
    M68030,
}

/// Bitmask of the variants a table entry is valid for.
pub type CpuMask = u8;

pub const CPU_MIN_68000: CpuMask = 0b1111;
pub const CPU_MIN_68010: CpuMask = 0b1110;
pub const CPU_MIN_68020: CpuMask = 0b1100;
pub const CPU_68020: CpuMask = 0b0100;

impl std::fmt::Display for CpuVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CpuVariant::M68000 => f.write_str("68000"),
            CpuVariant::M68010 => f.write_str("68010"),
            CpuVariant::M68020 => f.write_str("68020"),
            CpuVariant::M68030 => f.write_str("68030"),
        }
    }
}

impl CpuVariant {
    /// Parse a variant from a string like "68000" or "m68020".
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "68000" | "m68000" | "M68000" => Some(CpuVariant::M68000),
            "68010" | "m68010" | "M68010" => Some(CpuVariant::M68010),
            "68020" | "m68020" | "M68020" => Some(CpuVariant::M68020),
            "68030" | "m68030" | "M68030" => Some(CpuVariant::M68030),
            _ => None,
        }
    }

    /// The single bit this variant occupies in a [`CpuMask`].
    pub fn mask(self) -> CpuMask {
        1 << (self as u8)
    }

    pub fn is_020_plus(self) -> bool {
        self >= CpuVariant::M68020
    }
}
