//! Cflat Compiler - Common Types and Utilities
//!
//! This crate defines data types that are shared between the AST,
//! the assembler DSL, and the code generator: the scalar type model,
//! the code-generation error taxonomy, and small id/label helpers.

pub mod error;
pub mod types;

pub use error::CodegenError;
pub use types::{LabelGenerator, Type, TypeTable};

/// Entity identifier into the AST's variable arena
pub type VarId = u32;

/// Identifier into the string-constant table
pub type ConstId = u32;
