use super::addressing::{FullIndex, IndexRegister, IndexSpec};

/// Operation size suffix (.b, .w, .l, and .s for short branches).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Size {
    Byte,
    Word,
    Long,
    /// 8-bit displacement form of Bcc/BRA/BSR.
    Short,
}

impl Size {
    /// Size suffix for Motorola syntax.
    pub fn suffix(&self) -> &'static str {
        match self {
            Size::Byte => ".b",
            Size::Word => ".w",
            Size::Long => ".l",
            Size::Short => ".s",
        }
    }

    /// Number of bytes an operand of this size occupies.
    pub fn bytes(&self) -> u8 {
        match self {
            Size::Byte | Size::Short => 1,
            Size::Word => 2,
            Size::Long => 4,
        }
    }
}

/// Condition codes for Bcc, DBcc, Scc, and TRAPcc instructions.
///
/// These correspond to the 4-bit condition field (bits 11-8) in
/// the opcode word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// 0000: true (always)
    True,
    /// 0001: false (never)
    False,
    /// 0010: high (!C & !Z)
    Hi,
    /// 0011: low or same (C | Z)
    Ls,
    /// 0100: carry clear (!C)
    Cc,
    /// 0101: carry set (C)
    Cs,
    /// 0110: not equal (!Z)
    Ne,
    /// 0111: equal (Z)
    Eq,
    /// 1000: overflow clear (!V)
    Vc,
    /// 1001: overflow set (V)
    Vs,
    /// 1010: plus (!N)
    Pl,
    /// 1011: minus (N)
    Mi,
    /// 1100: greater or equal
    Ge,
    /// 1101: less than
    Lt,
    /// 1110: greater than
    Gt,
    /// 1111: less or equal
    Le,
}

impl Condition {
    pub fn from_bits(bits: u8) -> Self {
        const ALL: [Condition; 16] = [
            Condition::True,
            Condition::False,
            Condition::Hi,
            Condition::Ls,
            Condition::Cc,
            Condition::Cs,
            Condition::Ne,
            Condition::Eq,
            Condition::Vc,
            Condition::Vs,
            Condition::Pl,
            Condition::Mi,
            Condition::Ge,
            Condition::Lt,
            Condition::Gt,
            Condition::Le,
        ];
        ALL[(bits & 0xF) as usize]
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Condition::True => "t",
            Condition::False => "f",
            Condition::Hi => "hi",
            Condition::Ls => "ls",
            Condition::Cc => "cc",
            Condition::Cs => "cs",
            Condition::Ne => "ne",
            Condition::Eq => "eq",
            Condition::Vc => "vc",
            Condition::Vs => "vs",
            Condition::Pl => "pl",
            Condition::Mi => "mi",
            Condition::Ge => "ge",
            Condition::Lt => "lt",
            Condition::Gt => "gt",
            Condition::Le => "le",
        }
    }
}

/// Instruction identity. Conditional families share one opcode and carry
/// their [`Condition`] separately on the [`Instruction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Abcd,
    Add,
    Adda,
    Addi,
    Addq,
    Addx,
    And,
    Andi,
    Asl,
    Asr,
    Bcc,
    Bchg,
    Bclr,
    Bfchg,
    Bfclr,
    Bfexts,
    Bfextu,
    Bfffo,
    Bfins,
    Bfset,
    Bftst,
    Bkpt,
    Bra,
    Bset,
    Bsr,
    Btst,
    Callm,
    Cas,
    Cas2,
    Chk,
    Chk2,
    Clr,
    Cmp,
    Cmp2,
    Cmpa,
    Cmpi,
    Cmpm,
    Dbcc,
    Divs,
    Divsl,
    Divu,
    Divul,
    Eor,
    Eori,
    Exg,
    Ext,
    Extb,
    Illegal,
    Jmp,
    Jsr,
    Lea,
    Link,
    Lsl,
    Lsr,
    Move,
    Movea,
    Movec,
    Movem,
    Movep,
    Moveq,
    Moves,
    Muls,
    Mulu,
    Nbcd,
    Neg,
    Negx,
    Nop,
    Not,
    Or,
    Ori,
    Pack,
    Pea,
    Reset,
    Rol,
    Ror,
    Roxl,
    Roxr,
    Rtd,
    Rte,
    Rtm,
    Rtr,
    Rts,
    Sbcd,
    Scc,
    Stop,
    Sub,
    Suba,
    Subi,
    Subq,
    Subx,
    Swap,
    Tas,
    Trap,
    Trapcc,
    Trapv,
    Tst,
    Unlk,
    Unpk,

    /// Raw data placeholder for words that failed to decode.
    Invalid,
}

impl Opcode {
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::Abcd => "abcd",
            Opcode::Add => "add",
            Opcode::Adda => "adda",
            Opcode::Addi => "addi",
            Opcode::Addq => "addq",
            Opcode::Addx => "addx",
            Opcode::And => "and",
            Opcode::Andi => "andi",
            Opcode::Asl => "asl",
            Opcode::Asr => "asr",
            Opcode::Bcc => "b",
            Opcode::Bchg => "bchg",
            Opcode::Bclr => "bclr",
            Opcode::Bfchg => "bfchg",
            Opcode::Bfclr => "bfclr",
            Opcode::Bfexts => "bfexts",
            Opcode::Bfextu => "bfextu",
            Opcode::Bfffo => "bfffo",
            Opcode::Bfins => "bfins",
            Opcode::Bfset => "bfset",
            Opcode::Bftst => "bftst",
            Opcode::Bkpt => "bkpt",
            Opcode::Bra => "bra",
            Opcode::Bset => "bset",
            Opcode::Bsr => "bsr",
            Opcode::Btst => "btst",
            Opcode::Callm => "callm",
            Opcode::Cas => "cas",
            Opcode::Cas2 => "cas2",
            Opcode::Chk => "chk",
            Opcode::Chk2 => "chk2",
            Opcode::Clr => "clr",
            Opcode::Cmp => "cmp",
            Opcode::Cmp2 => "cmp2",
            Opcode::Cmpa => "cmpa",
            Opcode::Cmpi => "cmpi",
            Opcode::Cmpm => "cmpm",
            Opcode::Dbcc => "db",
            Opcode::Divs => "divs",
            Opcode::Divsl => "divsl",
            Opcode::Divu => "divu",
            Opcode::Divul => "divul",
            Opcode::Eor => "eor",
            Opcode::Eori => "eori",
            Opcode::Exg => "exg",
            Opcode::Ext => "ext",
            Opcode::Extb => "extb",
            Opcode::Illegal => "illegal",
            Opcode::Jmp => "jmp",
            Opcode::Jsr => "jsr",
            Opcode::Lea => "lea",
            Opcode::Link => "link",
            Opcode::Lsl => "lsl",
            Opcode::Lsr => "lsr",
            Opcode::Move => "move",
            Opcode::Movea => "movea",
            Opcode::Movec => "movec",
            Opcode::Movem => "movem",
            Opcode::Movep => "movep",
            Opcode::Moveq => "moveq",
            Opcode::Moves => "moves",
            Opcode::Muls => "muls",
            Opcode::Mulu => "mulu",
            Opcode::Nbcd => "nbcd",
            Opcode::Neg => "neg",
            Opcode::Negx => "negx",
            Opcode::Nop => "nop",
            Opcode::Not => "not",
            Opcode::Or => "or",
            Opcode::Ori => "ori",
            Opcode::Pack => "pack",
            Opcode::Pea => "pea",
            Opcode::Reset => "reset",
            Opcode::Rol => "rol",
            Opcode::Ror => "ror",
            Opcode::Roxl => "roxl",
            Opcode::Roxr => "roxr",
            Opcode::Rtd => "rtd",
            Opcode::Rte => "rte",
            Opcode::Rtm => "rtm",
            Opcode::Rtr => "rtr",
            Opcode::Rts => "rts",
            Opcode::Sbcd => "sbcd",
            Opcode::Scc => "s",
            Opcode::Stop => "stop",
            Opcode::Sub => "sub",
            Opcode::Suba => "suba",
            Opcode::Subi => "subi",
            Opcode::Subq => "subq",
            Opcode::Subx => "subx",
            Opcode::Swap => "swap",
            Opcode::Tas => "tas",
            Opcode::Trap => "trap",
            Opcode::Trapcc => "trap",
            Opcode::Trapv => "trapv",
            Opcode::Tst => "tst",
            Opcode::Unlk => "unlk",
            Opcode::Unpk => "unpk",
            Opcode::Invalid => "dc",
        }
    }

    /// Returns true if this opcode takes a condition code suffix.
    pub fn is_conditional(&self) -> bool {
        matches!(
            self,
            Opcode::Bcc | Opcode::Dbcc | Opcode::Scc | Opcode::Trapcc
        )
    }
}

/// Control registers reachable through MOVEC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRegister {
    Sfc,
    Dfc,
    Usp,
    Vbr,
    Cacr,
    Caar,
    Msp,
    Isp,
}

impl ControlRegister {
    pub fn name(&self) -> &'static str {
        match self {
            ControlRegister::Sfc => "sfc",
            ControlRegister::Dfc => "dfc",
            ControlRegister::Usp => "usp",
            ControlRegister::Vbr => "vbr",
            ControlRegister::Cacr => "cacr",
            ControlRegister::Caar => "caar",
            ControlRegister::Msp => "msp",
            ControlRegister::Isp => "isp",
        }
    }
}

/// Immediate operand value with its encoded width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Immediate {
    /// Raw value; signed immediates are stored sign-extended to 32 bits.
    pub value: u32,
    pub size: Size,
    pub signed: bool,
}

/// An operand of a decoded instruction.
///
/// `None` marks an empty slot and terminates the operand list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operand {
    #[default]
    None,
    /// Dn
    DataDirect(u8),
    /// An
    AddressDirect(u8),
    /// (An)
    Indirect(u8),
    /// (An)+
    PostIncrement(u8),
    /// -(An)
    PreDecrement(u8),
    /// (d16,An)
    Displacement { reg: u8, disp: i16 },
    /// (d8,An,Xn.size*scale), brief extension word
    Index { reg: u8, disp: i8, index: IndexSpec },
    /// (xxx).W
    AbsoluteWord(u16),
    /// (xxx).L
    AbsoluteLong(u32),
    /// (d16,PC); `inst_disp` is relative to the instruction's own address.
    PcDisplacement { inst_disp: i32 },
    /// (d8,PC,Xn.size*scale); `inst_disp` is relative to the instruction.
    PcIndex { inst_disp: i32, index: IndexSpec },
    /// 68020 full extension word forms.
    FullIndex(FullIndex),
    /// #data
    Immediate(Immediate),
    /// MOVEM register list, bit i = register i (d0-d7 then a0-a7).
    RegisterMask(u16),
    /// Branch target relative to the instruction's own address.
    RelativeBranch { inst_disp: i32 },
    /// Dx:Dy for 64-bit MUL/DIV and CAS2.
    DataRegisterPair(u8, u8),
    /// (Rx):(Ry) for CAS2.
    IndirectRegisterPair(IndexRegister, IndexRegister),
    Sr,
    Ccr,
    Usp,
    ControlRegister(ControlRegister),
}

impl Operand {
    pub fn is_none(&self) -> bool {
        matches!(self, Operand::None)
    }
}

/// Offset/width of a 68020 bitfield. Each part is either a literal or a
/// data register number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitfield {
    pub offset_is_dreg: bool,
    /// 0-31, or register 0-7
    pub offset: u8,
    pub width_is_dreg: bool,
    /// 1-32, or register 0-7
    pub width: u8,
}

impl Bitfield {
    /// Decode the offset/width fields of a bitfield extension word.
    pub fn from_extension(ext: u16) -> Self {
        let offset_is_dreg = (ext >> 11) & 1 != 0;
        let width_is_dreg = (ext >> 5) & 1 != 0;
        let offset = ((ext >> 6) & if offset_is_dreg { 7 } else { 0x1F }) as u8;
        let mut width = (ext & if width_is_dreg { 7 } else { 0x1F }) as u8;
        if !width_is_dreg && width == 0 {
            width = 32;
        }
        Bitfield {
            offset_is_dreg,
            offset,
            width_is_dreg,
            width,
        }
    }
}

/// A decoded 68k instruction.
///
/// A freshly reset instruction is the INVALID placeholder, so the value is
/// always safe to print whatever the decode outcome was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Address of the first opcode word.
    pub address: u32,
    /// First opcode word.
    pub header: u16,
    /// Total instruction length in bytes.
    pub size_bytes: u32,
    pub opcode: Opcode,
    /// Operation size (.b/.w/.l/.s), if applicable.
    pub size: Option<Size>,
    /// Condition code for the conditional families.
    pub condition: Option<Condition>,
    /// Up to three operands; unused trailing slots hold `Operand::None`.
    pub operands: [Operand; 3],
    /// Bitfield descriptor following operand 0 or operand 1.
    pub bitfields: [Option<Bitfield>; 2],
}

impl Default for Instruction {
    fn default() -> Self {
        Instruction {
            address: 0,
            header: 0,
            size_bytes: 2,
            opcode: Opcode::Invalid,
            size: None,
            condition: None,
            operands: [Operand::None; 3],
            bitfields: [None; 2],
        }
    }
}

impl Instruction {
    /// Return to the placeholder state at `address`.
    pub fn reset(&mut self, address: u32) {
        *self = Instruction {
            address,
            ..Instruction::default()
        };
    }

    /// Turn this into the raw-data placeholder for `header`.
    pub fn set_invalid(&mut self, address: u32, header: u16) {
        self.reset(address);
        self.header = header;
        self.operands[0] = Operand::Immediate(Immediate {
            value: header as u32,
            size: Size::Word,
            signed: false,
        });
    }

    pub fn is_valid(&self) -> bool {
        self.opcode != Opcode::Invalid
    }

    /// The filled operand slots, stopping at the first empty one.
    pub fn operands(&self) -> impl Iterator<Item = &Operand> {
        self.operands.iter().take_while(|op| !op.is_none())
    }
}
