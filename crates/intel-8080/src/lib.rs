//! Instruction-stepped Intel 8080 CPU emulator.
//!
//! Each call to `step()` executes one whole instruction and returns its
//! cost in clock cycles, taken from the 8080 datasheet timing table.
//! Decoding goes through a 256-entry table of [`Instruction`] values, so
//! the instruction set can be enumerated and tested on its own.

mod alu;
mod cpu;
mod decode;
pub mod flags;
mod registers;

pub use cpu::{I8080, Quirks};
pub use decode::{AluOp, Condition, Instruction, Operand, RegPair, Restart, StackPair, decode};
pub use flags::Flags;
pub use registers::Registers;
