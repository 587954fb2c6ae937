//! Expression nodes
//!
//! Every expression carries the `Type` the semantic phase resolved for
//! it. Short-circuit and conditional expressions additionally carry
//! the control-flow labels minted for them, so lowering never has to
//! invent label names.

use cflat_asm::Label;
use cflat_common::{ConstId, Type, VarId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An expression with its resolved type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Type) -> Self {
        Expr { kind, ty }
    }

    /// An `int` literal
    pub fn int(value: i64) -> Self {
        Expr::new(ExprKind::IntLiteral(value), Type::Int)
    }

    /// A `char` literal
    pub fn char_lit(value: i64) -> Self {
        Expr::new(ExprKind::CharLiteral(value), Type::Char)
    }

    /// A reference to a resolved variable
    pub fn var(id: VarId, ty: Type) -> Self {
        Expr::new(ExprKind::Variable(id), ty)
    }

    /// A plain assignment; the expression's type is the lhs type
    pub fn assign(lhs: Expr, rhs: Expr) -> Self {
        let ty = lhs.ty;
        Expr::new(
            ExprKind::Assign {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            ty,
        )
    }

    /// A binary operation typed like its left operand
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        let ty = left.ty;
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
        )
    }
}

/// Binary operators, short-circuit forms excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::LShift => "<<",
            BinaryOp::RShift => ">>",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
        };
        write!(f, "{}", s)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Plus,
    Minus,
    LogicalNot,
    BitwiseNot,
}

/// Call target: a named function or a computed function pointer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Callee {
    /// Direct call to a function known by name. `defined` records
    /// whether the callee is defined in this module or external.
    Static { name: String, defined: bool },
    /// Indirect call through the value of an expression
    Pointer(Box<Expr>),
}

/// Expression node kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    IntLiteral(i64),
    CharLiteral(i64),
    /// A string literal and its interned constant entry; `None` means
    /// the resolution never happened and is a fatal diagnostic.
    StringLiteral {
        value: String,
        entry: Option<ConstId>,
    },
    Variable(VarId),

    /// Array reference `e[i]`; the node's type is the element type
    Aref {
        expr: Box<Expr>,
        index: Box<Expr>,
    },
    /// Member access `e.f` with the member's resolved byte offset
    Member {
        expr: Box<Expr>,
        offset: i64,
    },
    /// Pointer member access `p->f` with the member's byte offset
    PtrMember {
        expr: Box<Expr>,
        offset: i64,
    },
    Dereference {
        expr: Box<Expr>,
    },
    Address {
        expr: Box<Expr>,
    },

    Assign {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Compound assignment `l op= r`
    OpAssign {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    LogicalAnd {
        left: Box<Expr>,
        right: Box<Expr>,
        end_label: Label,
    },
    LogicalOr {
        left: Box<Expr>,
        right: Box<Expr>,
        end_label: Label,
    },

    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    PrefixInc {
        expr: Box<Expr>,
    },
    PrefixDec {
        expr: Box<Expr>,
    },
    SuffixInc {
        expr: Box<Expr>,
    },
    SuffixDec {
        expr: Box<Expr>,
    },

    /// Conditional expression `c ? a : b`
    Cond {
        cond: Box<Expr>,
        then: Box<Expr>,
        els: Box<Expr>,
        else_label: Label,
        end_label: Label,
    },

    Funcall {
        callee: Callee,
        args: Vec<Expr>,
    },

    /// Type cast; no conversion op is emitted yet, the operand is
    /// evaluated as-is
    Cast {
        expr: Box<Expr>,
    },
}

impl ExprKind {
    /// Short description of the node kind, used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::IntLiteral(_) => "integer literal",
            ExprKind::CharLiteral(_) => "character literal",
            ExprKind::StringLiteral { .. } => "string literal",
            ExprKind::Variable(_) => "variable",
            ExprKind::Aref { .. } => "array reference",
            ExprKind::Member { .. } => "member access",
            ExprKind::PtrMember { .. } => "pointer member access",
            ExprKind::Dereference { .. } => "dereference",
            ExprKind::Address { .. } => "address-of",
            ExprKind::Assign { .. } => "assignment",
            ExprKind::OpAssign { .. } => "compound assignment",
            ExprKind::Binary { .. } => "binary expression",
            ExprKind::LogicalAnd { .. } => "logical and",
            ExprKind::LogicalOr { .. } => "logical or",
            ExprKind::Unary { .. } => "unary expression",
            ExprKind::PrefixInc { .. } => "prefix increment",
            ExprKind::PrefixDec { .. } => "prefix decrement",
            ExprKind::SuffixInc { .. } => "suffix increment",
            ExprKind::SuffixDec { .. } => "suffix decrement",
            ExprKind::Cond { .. } => "conditional expression",
            ExprKind::Funcall { .. } => "function call",
            ExprKind::Cast { .. } => "cast",
        }
    }
}
