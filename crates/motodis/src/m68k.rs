//! 68000-68030 instruction decoding.

pub mod addressing;
pub mod decode;
pub mod extension;
pub mod instruction;
pub mod variants;

pub use addressing::{EaClass, FullIndex, IndexRegister, IndexSpec, MemoryIndirection};
pub use decode::{decode, DecodeSettings};
pub use instruction::{Bitfield, Condition, ControlRegister, Immediate, Instruction, Opcode, Operand, Size};
pub use variants::CpuVariant;
