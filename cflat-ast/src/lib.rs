//! Cflat Compiler - Resolved Abstract Syntax Tree
//!
//! The input contract of the code generator: a fully type-checked,
//! scope-resolved AST. Every expression carries its resolved `Type`,
//! every variable reference points into the entity arena, every string
//! literal points into the constant table, and every jump target
//! carries the label an earlier phase resolved for it.
//!
//! Ownership follows an arena-plus-index scheme: the [`Ast`] root owns
//! all entities, and nodes refer to them through [`cflat_common::VarId`]
//! / [`cflat_common::ConstId`] instead of back-pointers.

pub mod ast;
pub mod entity;
pub mod expr;
pub mod stmt;

pub use ast::{Ast, ConstantEntry, ConstantTable};
pub use entity::{DefinedFunction, Params, Variable};
pub use expr::{BinaryOp, Callee, Expr, ExprKind, UnaryOp};
pub use stmt::{Block, Case, Stmt};
