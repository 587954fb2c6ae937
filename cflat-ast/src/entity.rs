//! Entities resolved by the semantic phase
//!
//! Variables, parameters and functions as the code generator consumes
//! them. One `Variable` shape covers globals, common symbols,
//! parameters and locals; the stream an entity arrives on (the AST
//! root's global/common lists, a function's parameter/local lists)
//! determines its role. Stack and label addresses are assigned by the
//! generator in a side table, never stored back into the entity.

use crate::expr::Expr;
use crate::stmt::Block;
use cflat_common::{Type, VarId};
use serde::{Deserialize, Serialize};

/// A declared variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub ty: Type,
    pub private: bool,
    pub initializer: Option<Expr>,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Variable {
            name: name.into(),
            ty,
            private: false,
            initializer: None,
        }
    }

    pub fn with_initializer(mut self, init: Expr) -> Self {
        self.initializer = Some(init);
        self
    }

    pub fn as_private(mut self) -> Self {
        self.private = true;
        self
    }
}

/// A function's parameter list, fixed or variadic
///
/// Equality is structural over the inner parameter lists. Two lists
/// are equal only when their arities, entities and variadic markers
/// all match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Params {
    Fixed(Vec<VarId>),
    Variadic(Vec<VarId>),
}

impl Params {
    /// The named parameters, in declaration order
    pub fn parameters(&self) -> &[VarId] {
        match self {
            Params::Fixed(params) | Params::Variadic(params) => params,
        }
    }

    pub fn is_vararg(&self) -> bool {
        matches!(self, Params::Variadic(_))
    }
}

/// A function defined in this module
///
/// `locals` is the flattened list of every local declared anywhere in
/// the body, in declaration order; stack slots are assigned from it at
/// function entry. The nested blocks still reference the same entities
/// for their initializers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinedFunction {
    pub name: String,
    pub ty: Type,
    pub private: bool,
    pub params: Params,
    pub locals: Vec<VarId>,
    pub body: Block,
}

impl DefinedFunction {
    pub fn new(name: impl Into<String>, ty: Type, params: Params, body: Block) -> Self {
        DefinedFunction {
            name: name.into(),
            ty,
            private: false,
            params,
            locals: Vec::new(),
            body,
        }
    }

    pub fn with_locals(mut self, locals: Vec<VarId>) -> Self {
        self.locals = locals;
        self
    }

    pub fn as_private(mut self) -> Self {
        self.private = true;
        self
    }
}
