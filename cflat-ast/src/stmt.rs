//! Statement nodes
//!
//! Control-flow statements carry the labels the semantic phase minted
//! for them. `break`, `continue` and `goto` hold `Option<Label>`: an
//! unresolved target is representable so the generator can report it
//! instead of crashing.

use crate::expr::Expr;
use cflat_asm::Label;
use cflat_common::VarId;
use serde::{Deserialize, Serialize};

/// A block with its own scope of local variables
///
/// `vars` lists the variables declared in this scope, in declaration
/// order; their initializer expressions are evaluated on block entry.
/// Stack slots for them are assigned up front from the owning
/// function's flattened local list, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub vars: Vec<VarId>,
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(vars: Vec<VarId>, stmts: Vec<Stmt>) -> Self {
        Block { vars, stmts }
    }

    /// A block with no locals of its own
    pub fn of(stmts: Vec<Stmt>) -> Self {
        Block { vars: Vec::new(), stmts }
    }
}

/// One `case` arm of a switch: its literal values, the label jumped to
/// on a match, and the body. There is no default arm and no implicit
/// break; control falls through to the next arm's body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub values: Vec<Expr>,
    pub begin_label: Label,
    pub body: Box<Stmt>,
}

/// Statement node kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// An expression evaluated for its side effects
    Expr(Expr),
    Block(Block),
    If {
        cond: Expr,
        then: Box<Stmt>,
        els: Option<Box<Stmt>>,
        else_label: Label,
        end_label: Label,
    },
    Switch {
        cond: Expr,
        cases: Vec<Case>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
        beg_label: Label,
        end_label: Label,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
        beg_label: Label,
        continue_label: Label,
        end_label: Label,
    },
    For {
        init: Option<Expr>,
        cond: Expr,
        incr: Option<Expr>,
        body: Box<Stmt>,
        beg_label: Label,
        continue_label: Label,
        end_label: Label,
    },
    Break {
        target: Option<Label>,
    },
    Continue {
        target: Option<Label>,
    },
    Label {
        label: Label,
        stmt: Box<Stmt>,
    },
    Goto {
        target: Option<Label>,
    },
    Return {
        expr: Option<Expr>,
    },
}
