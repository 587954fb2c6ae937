//! Common types used throughout the compiler
//!
//! This module defines the scalar type model the code generator works
//! against. The generator only ever asks a type for its byte size, its
//! alignment, and its signedness; everything else about a type has been
//! dealt with by the semantic phase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar types of the cflat language, plus the function type.
///
/// Sizes follow the 32-bit IA-32 target: `char` family is 1 byte,
/// `short` family 2, `int`/`long`/pointers 4, `long long` family 8.
/// Function types have no size; querying one is a design-level
/// invariant violation that callers surface as a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Pointer,
    Function,
}

impl Type {
    /// Byte size of this type, or `None` for function types.
    pub fn size(&self) -> Option<u32> {
        match self {
            Type::Char | Type::UChar => Some(1),
            Type::Short | Type::UShort => Some(2),
            Type::Int | Type::UInt | Type::Long | Type::ULong | Type::Pointer => Some(4),
            Type::LongLong | Type::ULongLong => Some(8),
            Type::Function => None,
        }
    }

    /// Required alignment in bytes, or `None` for function types.
    pub fn alignment(&self) -> Option<u32> {
        self.size()
    }

    /// Check if this type is signed
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            Type::Char | Type::Short | Type::Int | Type::Long | Type::LongLong
        )
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Char => write!(f, "char"),
            Type::UChar => write!(f, "unsigned char"),
            Type::Short => write!(f, "short"),
            Type::UShort => write!(f, "unsigned short"),
            Type::Int => write!(f, "int"),
            Type::UInt => write!(f, "unsigned int"),
            Type::Long => write!(f, "long"),
            Type::ULong => write!(f, "unsigned long"),
            Type::LongLong => write!(f, "long long"),
            Type::ULongLong => write!(f, "unsigned long long"),
            Type::Pointer => write!(f, "pointer"),
            Type::Function => write!(f, "function"),
        }
    }
}

/// Lookup surface for the types the generator has to conjure out of
/// thin air (the switch scrutinee comparison type).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTable;

impl TypeTable {
    pub fn new() -> Self {
        TypeTable
    }

    /// The platform `int` type used for switch comparisons.
    pub fn signed_int(&self) -> Type {
        Type::Int
    }
}

/// Label generator for control-flow labels
///
/// Produces GNU-style local labels (`.L0`, `.L1`, ...). The code
/// generator itself only consumes labels resolved by earlier phases;
/// this lives here so those phases and test fixtures mint them the
/// same way.
#[derive(Debug, Clone, Default)]
pub struct LabelGenerator {
    next_id: u32,
}

impl LabelGenerator {
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Generate a new unique local label
    pub fn new_label(&mut self) -> String {
        let label = format!(".L{}", self.next_id);
        self.next_id += 1;
        label
    }

    /// Generate a new label with a prefix
    pub fn new_label_with_prefix(&mut self, prefix: &str) -> String {
        let label = format!("{}{}", prefix, self.next_id);
        self.next_id += 1;
        label
    }
}
