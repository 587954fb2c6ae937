//! Cflat Compiler - Code Generation Backend
//!
//! Lowers a fully resolved cflat AST to textual GNU-syntax assembly
//! for 32-bit IA-32 Linux under the `cdecl` calling convention.
//!
//! The generator is an accumulator-and-stack machine: every expression
//! leaves its result in the `ax` family sized to the expression's
//! type, every lvalue walk leaves the designated object's address in
//! `bx`, and temporaries spill through `pushq`/`popq`. There is no
//! register allocator; that is deliberate.

pub mod module;

mod expr;
mod frame;
mod lvalue;
mod stmt;

pub use module::{generate, CodeGenerator};

#[cfg(test)]
mod tests;
