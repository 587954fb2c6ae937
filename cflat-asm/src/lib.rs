//! Cflat Compiler - Assembler Emitter DSL
//!
//! This crate defines the register model, the operand value objects,
//! and a narrow line-at-a-time emitter for GNU-syntax IA-32 assembly.
//! The code generator drives exactly this surface; nothing else in the
//! compiler writes assembly text.

pub mod assembler;
pub mod operand;

pub use assembler::Assembler;
pub use operand::{Label, Operand, Reg, RegWidth, Register};
