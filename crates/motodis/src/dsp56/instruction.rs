use super::registers::{Memory, Reg};

/// DSP56000 condition codes, in encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Carry clear (also HS)
    Cc,
    Ge,
    Ne,
    Pl,
    Nn,
    Ec,
    Lc,
    Gt,
    /// Carry set (also LO)
    Cs,
    Lt,
    Eq,
    Mi,
    Nr,
    Es,
    Ls,
    Le,
}

impl Condition {
    pub fn from_bits(bits: u32) -> Self {
        const ALL: [Condition; 16] = [
            Condition::Cc,
            Condition::Ge,
            Condition::Ne,
            Condition::Pl,
            Condition::Nn,
            Condition::Ec,
            Condition::Lc,
            Condition::Gt,
            Condition::Cs,
            Condition::Lt,
            Condition::Eq,
            Condition::Mi,
            Condition::Nr,
            Condition::Es,
            Condition::Ls,
            Condition::Le,
        ];
        ALL[(bits & 0xF) as usize]
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Condition::Cc => "cc",
            Condition::Ge => "ge",
            Condition::Ne => "ne",
            Condition::Pl => "pl",
            Condition::Nn => "nn",
            Condition::Ec => "ec",
            Condition::Lc => "lc",
            Condition::Gt => "gt",
            Condition::Cs => "cs",
            Condition::Lt => "lt",
            Condition::Eq => "eq",
            Condition::Mi => "mi",
            Condition::Nr => "nr",
            Condition::Es => "es",
            Condition::Ls => "ls",
            Condition::Le => "le",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Abs,
    Adc,
    Add,
    Addl,
    Addr,
    And,
    Andi,
    Asl,
    Asr,
    Bchg,
    Bclr,
    Bset,
    Btst,
    Clr,
    Cmp,
    Cmpm,
    Div,
    Do,
    Enddo,
    Eor,
    Illegal,
    Jcc,
    Jclr,
    Jmp,
    Jscc,
    Jsclr,
    Jset,
    Jsr,
    Jsset,
    Lsl,
    Lsr,
    Lua,
    Mac,
    Macr,
    Move,
    Movec,
    Movem,
    Movep,
    Mpy,
    Mpyr,
    Neg,
    Nop,
    Norm,
    Not,
    Or,
    Ori,
    Rep,
    Reset,
    Rnd,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Stop,
    Sub,
    Subl,
    Subr,
    Swi,
    Tcc,
    Tfr,
    Tst,
    Wait,

    /// Raw data placeholder for words that failed to decode.
    Invalid,
}

impl Opcode {
    /// Mnemonic, without the condition suffix of the conditional families.
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::Abs => "abs",
            Opcode::Adc => "adc",
            Opcode::Add => "add",
            Opcode::Addl => "addl",
            Opcode::Addr => "addr",
            Opcode::And => "and",
            Opcode::Andi => "andi",
            Opcode::Asl => "asl",
            Opcode::Asr => "asr",
            Opcode::Bchg => "bchg",
            Opcode::Bclr => "bclr",
            Opcode::Bset => "bset",
            Opcode::Btst => "btst",
            Opcode::Clr => "clr",
            Opcode::Cmp => "cmp",
            Opcode::Cmpm => "cmpm",
            Opcode::Div => "div",
            Opcode::Do => "do",
            Opcode::Enddo => "enddo",
            Opcode::Eor => "eor",
            Opcode::Illegal => "illegal",
            Opcode::Jcc => "j",
            Opcode::Jclr => "jclr",
            Opcode::Jmp => "jmp",
            Opcode::Jscc => "js",
            Opcode::Jsclr => "jsclr",
            Opcode::Jset => "jset",
            Opcode::Jsr => "jsr",
            Opcode::Jsset => "jsset",
            Opcode::Lsl => "lsl",
            Opcode::Lsr => "lsr",
            Opcode::Lua => "lua",
            Opcode::Mac => "mac",
            Opcode::Macr => "macr",
            Opcode::Move => "move",
            Opcode::Movec => "movec",
            Opcode::Movem => "movem",
            Opcode::Movep => "movep",
            Opcode::Mpy => "mpy",
            Opcode::Mpyr => "mpyr",
            Opcode::Neg => "neg",
            Opcode::Nop => "nop",
            Opcode::Norm => "norm",
            Opcode::Not => "not",
            Opcode::Or => "or",
            Opcode::Ori => "ori",
            Opcode::Rep => "rep",
            Opcode::Reset => "reset",
            Opcode::Rnd => "rnd",
            Opcode::Rol => "rol",
            Opcode::Ror => "ror",
            Opcode::Rti => "rti",
            Opcode::Rts => "rts",
            Opcode::Sbc => "sbc",
            Opcode::Stop => "stop",
            Opcode::Sub => "sub",
            Opcode::Subl => "subl",
            Opcode::Subr => "subr",
            Opcode::Swi => "swi",
            Opcode::Tcc => "t",
            Opcode::Tfr => "tfr",
            Opcode::Tst => "tst",
            Opcode::Wait => "wait",
            Opcode::Invalid => "dc",
        }
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self, Opcode::Jcc | Opcode::Jscc | Opcode::Tcc)
    }

    /// Opcodes whose absolute operands name program addresses.
    pub fn is_flow(&self) -> bool {
        matches!(
            self,
            Opcode::Jcc
                | Opcode::Jmp
                | Opcode::Jscc
                | Opcode::Jsr
                | Opcode::Jclr
                | Opcode::Jset
                | Opcode::Jsclr
                | Opcode::Jsset
                | Opcode::Do
        )
    }
}

/// Addressing mode of a DSP operand. Register numbers index R0-R7, and
/// the offset forms pair Rn with the Nn of the same number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperandKind {
    #[default]
    None,
    /// `#xx`, signed 8-bit
    ImmShort(i8),
    Reg(Reg),
    /// `(Rn)-Nn`
    PostDecOffset(u8),
    /// `(Rn)+Nn`
    PostIncOffset(u8),
    /// `(Rn)-`
    PostDec(u8),
    /// `(Rn)+`
    PostInc(u8),
    /// `(Rn+Nn)`
    IndexOffset(u8),
    /// `(Rn)`
    NoUpdate(u8),
    /// `-(Rn)`
    PreDec(u8),
    /// Absolute address from an extension word or an inline field.
    Abs(u32),
    /// 6-bit absolute short address.
    AbsShort(u32),
    /// `#xxxxxx`, unsigned
    Imm(u32),
    /// I/O short address, already ones-extended into $ffc0-$ffff.
    IoShort(u32),
}

/// An operand with its memory space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Operand {
    pub memory: Memory,
    pub kind: OperandKind,
}

impl Operand {
    pub fn new(memory: Memory, kind: OperandKind) -> Self {
        Operand { memory, kind }
    }

    pub fn reg(reg: Reg) -> Self {
        Operand::new(Memory::None, OperandKind::Reg(reg))
    }

    pub fn is_none(&self) -> bool {
        matches!(self.kind, OperandKind::None)
    }
}

/// One parallel move: a source and destination operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParallelMove {
    pub operands: [Operand; 2],
}

impl ParallelMove {
    pub fn new(src: Operand, dst: Operand) -> Self {
        ParallelMove { operands: [src, dst] }
    }

    pub fn is_empty(&self) -> bool {
        self.operands[0].is_none()
    }
}

/// A decoded DSP56000 instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Word address of the opcode word.
    pub address: u32,
    /// The 24-bit opcode word.
    pub header: u32,
    /// Length in 24-bit words.
    pub word_count: u32,
    pub opcode: Opcode,
    pub condition: Option<Condition>,
    /// Print a `-` before the first operand (negated multiply forms).
    pub neg_operands: bool,
    pub operands: [Operand; 3],
    /// Extra register pair of Tcc.
    pub operands2: [Operand; 2],
    pub pmoves: [ParallelMove; 2],
}

impl Default for Instruction {
    fn default() -> Self {
        Instruction {
            address: 0,
            header: 0,
            word_count: 1,
            opcode: Opcode::Invalid,
            condition: None,
            neg_operands: false,
            operands: [Operand::default(); 3],
            operands2: [Operand::default(); 2],
            pmoves: [ParallelMove::default(); 2],
        }
    }
}

impl Instruction {
    pub fn reset(&mut self, address: u32) {
        *self = Instruction {
            address,
            ..Instruction::default()
        };
    }

    /// Turn this into the raw-data placeholder for `header`.
    pub fn set_invalid(&mut self, address: u32, header: u32) {
        self.reset(address);
        self.header = header;
        self.operands[0] = Operand::new(Memory::None, OperandKind::Abs(header));
    }

    pub fn is_valid(&self) -> bool {
        self.opcode != Opcode::Invalid
    }

    pub fn operands(&self) -> impl Iterator<Item = &Operand> {
        self.operands.iter().take_while(|op| !op.is_none())
    }

    /// Every operand slot that holds something: primary operands, the Tcc
    /// pair, then both parallel moves.
    pub fn all_operands(&self) -> impl Iterator<Item = &Operand> {
        self.operands
            .iter()
            .chain(self.operands2.iter())
            .chain(self.pmoves.iter().flat_map(|pm| pm.operands.iter()))
            .filter(|op| !op.is_none())
    }
}
