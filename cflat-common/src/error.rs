//! Error handling for the cflat code generator
//!
//! Every error in this taxonomy is a programmer-facing fatal
//! diagnostic: the caller handed the generator an AST outside the
//! supported subset. Nothing is recovered and no partial assembly is
//! returned.

use thiserror::Error;

/// Fatal code-generation diagnostics
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    #[error("jump target is not resolved for {construct}")]
    UnresolvedLabel { construct: String },

    #[error("string literal has no constant table entry: {value:?}")]
    UnresolvedConstant { value: String },

    #[error("unsupported initializer for '{symbol}': static data accepts only integer literals")]
    UnsupportedInitializer { symbol: String },

    #[error("case accepts only integer literals, found {found}")]
    UnsupportedCaseValue { found: String },

    #[error("{found} is not a supported lvalue")]
    UnsupportedLvalue { found: String },

    #[error("entry size of '{symbol}' is not 1,2,4,8: {size}")]
    InvalidDataEntrySize { symbol: String, size: u32 },

    #[error("size or alignment queried on a function type: {context}")]
    TypeQueryOnFunction { context: String },
}

impl CodegenError {
    /// Create an unresolved-label error for a control-flow construct
    pub fn unresolved_label(construct: &str) -> Self {
        CodegenError::UnresolvedLabel {
            construct: construct.to_string(),
        }
    }

    /// Create an unsupported-lvalue error from a node description
    pub fn unsupported_lvalue(found: &str) -> Self {
        CodegenError::UnsupportedLvalue {
            found: found.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let err = CodegenError::unresolved_label("break statement");
        assert_eq!(
            err.to_string(),
            "jump target is not resolved for break statement"
        );

        let err = CodegenError::UnsupportedInitializer {
            symbol: "counter".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported initializer for 'counter': static data accepts only integer literals"
        );

        let err = CodegenError::InvalidDataEntrySize {
            symbol: "blob".to_string(),
            size: 3,
        };
        assert_eq!(err.to_string(), "entry size of 'blob' is not 1,2,4,8: 3");
    }

    #[test]
    fn test_unsupported_lvalue_display() {
        let err = CodegenError::unsupported_lvalue("suffix increment");
        assert_eq!(err.to_string(), "suffix increment is not a supported lvalue");
    }

    #[test]
    fn test_errors_compare_structurally() {
        assert_eq!(
            CodegenError::unresolved_label("goto statement"),
            CodegenError::UnresolvedLabel {
                construct: "goto statement".to_string()
            }
        );
        assert_ne!(
            CodegenError::unresolved_label("break statement"),
            CodegenError::unresolved_label("continue statement")
        );
    }
}
