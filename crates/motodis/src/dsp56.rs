//! Motorola DSP56000 decoder.
//!
//! Program memory is 24 bits wide. Instructions are one or two words; a
//! second word carries an absolute address, an immediate, or a jump or
//! loop target. Words with a nonzero top nibble pair a data ALU operation
//! with up to two parallel data moves.

pub mod decode;
pub mod instruction;
pub mod pmove;
pub mod registers;
pub mod tables;

pub use decode::{decode, DspSettings};
pub use instruction::{Condition, Instruction, Opcode, Operand, OperandKind, ParallelMove};
pub use registers::{Memory, Reg};
