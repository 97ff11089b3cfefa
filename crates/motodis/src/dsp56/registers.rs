use std::fmt;

/// DSP56000 programmer-visible registers, including the accumulator
/// part/pair names that only appear in moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    A,
    B,
    X,
    Y,
    A0,
    A1,
    A2,
    B0,
    B1,
    B2,
    X0,
    X1,
    Y0,
    Y1,
    /// Address register R0-R7
    R(u8),
    /// Offset register N0-N7
    N(u8),
    /// Modifier register M0-M7
    M(u8),
    A10,
    B10,
    Ab,
    Ba,
    Mr,
    Ccr,
    Omr,
    Sr,
    Sp,
    Ssh,
    Ssl,
    La,
    Lc,
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reg::R(n) => return write!(f, "r{n}"),
            Reg::N(n) => return write!(f, "n{n}"),
            Reg::M(n) => return write!(f, "m{n}"),
            Reg::A => "a",
            Reg::B => "b",
            Reg::X => "x",
            Reg::Y => "y",
            Reg::A0 => "a0",
            Reg::A1 => "a1",
            Reg::A2 => "a2",
            Reg::B0 => "b0",
            Reg::B1 => "b1",
            Reg::B2 => "b2",
            Reg::X0 => "x0",
            Reg::X1 => "x1",
            Reg::Y0 => "y0",
            Reg::Y1 => "y1",
            Reg::A10 => "a10",
            Reg::B10 => "b10",
            Reg::Ab => "ab",
            Reg::Ba => "ba",
            Reg::Mr => "mr",
            Reg::Ccr => "ccr",
            Reg::Omr => "omr",
            Reg::Sr => "sr",
            Reg::Sp => "sp",
            Reg::Ssh => "ssh",
            Reg::Ssl => "ssl",
            Reg::La => "la",
            Reg::Lc => "lc",
        };
        f.write_str(name)
    }
}

/// Memory space an operand addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Memory {
    #[default]
    None,
    X,
    Y,
    P,
    /// X and Y together as one 48-bit long word.
    L,
}

impl Memory {
    /// Assembler prefix, e.g. `x:`.
    pub fn prefix(self) -> &'static str {
        match self {
            Memory::None => "",
            Memory::X => "x:",
            Memory::Y => "y:",
            Memory::P => "p:",
            Memory::L => "l:",
        }
    }
}

const NO: Option<Reg> = None;

/// Table A-18 triple-bit register encoding, indexed by a 6-bit field.
/// Rows 000 and 101/110 are mostly unassigned.
pub static TRIPLE_BIT: [Option<Reg>; 64] = [
    NO, NO, NO, NO, Some(Reg::X0), Some(Reg::X1), Some(Reg::Y0), Some(Reg::Y1),
    Some(Reg::A0), Some(Reg::B0), Some(Reg::A2), Some(Reg::B2),
    Some(Reg::A1), Some(Reg::B1), Some(Reg::A), Some(Reg::B),
    Some(Reg::R(0)), Some(Reg::R(1)), Some(Reg::R(2)), Some(Reg::R(3)),
    Some(Reg::R(4)), Some(Reg::R(5)), Some(Reg::R(6)), Some(Reg::R(7)),
    Some(Reg::N(0)), Some(Reg::N(1)), Some(Reg::N(2)), Some(Reg::N(3)),
    Some(Reg::N(4)), Some(Reg::N(5)), Some(Reg::N(6)), Some(Reg::N(7)),
    Some(Reg::M(0)), Some(Reg::M(1)), Some(Reg::M(2)), Some(Reg::M(3)),
    Some(Reg::M(4)), Some(Reg::M(5)), Some(Reg::M(6)), Some(Reg::M(7)),
    NO, NO, NO, NO, NO, NO, NO, NO,
    NO, NO, NO, NO, NO, NO, NO, NO,
    NO, Some(Reg::Sr), Some(Reg::Omr), Some(Reg::Sp),
    Some(Reg::Ssh), Some(Reg::Ssl), Some(Reg::La), Some(Reg::Lc),
];

/// 5-bit register field of the parallel moves: the first 32 triple-bit codes.
pub fn pmove_register(code: u32) -> Option<Reg> {
    TRIPLE_BIT[(code & 0x1F) as usize]
}

/// `ff`/`ee` accumulator-or-input field of X moves.
pub static BANK_X: [Reg; 4] = [Reg::X0, Reg::X1, Reg::A, Reg::B];

/// `ff` field of Y moves.
pub static BANK_Y: [Reg; 4] = [Reg::Y0, Reg::Y1, Reg::A, Reg::B];

/// `LLL` field of L: moves.
pub static LONG_MOVE: [Reg; 8] = [
    Reg::A10,
    Reg::B10,
    Reg::X,
    Reg::Y,
    Reg::A,
    Reg::B,
    Reg::Ab,
    Reg::Ba,
];

/// `jj` source field of DIV.
pub static DIV_SOURCE: [Reg; 4] = [Reg::X0, Reg::Y0, Reg::X1, Reg::Y1];

pub fn accumulator(is_b: bool) -> Reg {
    if is_b {
        Reg::B
    } else {
        Reg::A
    }
}

/// 5-bit control register field of MOVEC.
pub static MOVEC: [Option<Reg>; 32] = [
    Some(Reg::M(0)), Some(Reg::M(1)), Some(Reg::M(2)), Some(Reg::M(3)),
    Some(Reg::M(4)), Some(Reg::M(5)), Some(Reg::M(6)), Some(Reg::M(7)),
    NO, NO, NO, NO, NO, NO, NO, NO,
    NO, NO, NO, NO, NO, NO, NO, NO,
    NO, Some(Reg::Sr), Some(Reg::Omr), Some(Reg::Sp),
    Some(Reg::Ssh), Some(Reg::Ssl), Some(Reg::La), Some(Reg::Lc),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_bit_rows() {
        assert_eq!(TRIPLE_BIT[0b001110], Some(Reg::A));
        assert_eq!(TRIPLE_BIT[0b010011], Some(Reg::R(3)));
        assert_eq!(TRIPLE_BIT[0b111111], Some(Reg::Lc));
        assert_eq!(TRIPLE_BIT[0b101000], None);
        assert_eq!(pmove_register(0b11111), Some(Reg::N(7)));
    }

    #[test]
    fn names() {
        assert_eq!(Reg::N(4).to_string(), "n4");
        assert_eq!(Reg::A10.to_string(), "a10");
        assert_eq!(Memory::Y.prefix(), "y:");
    }
}
