//! Error types for formula parsing, type inference, and evaluation.

use thiserror::Error;

use crate::ast::VarType;
use crate::span::Span;

/// Errors raised while tokenising or parsing a formula string
/// (spec.md §4.1, §7: `Parse`).
#[derive(Debug, Error, Clone, PartialEq)]
#[error("parse error at {span}: {message} (found {found:?})")]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub found: String,
}

/// Errors raised by [`crate::eval::evaluate`] (spec.md §7, evaluation only).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("unresolved name `{0}`")]
    UnresolvedName(String),

    #[error("type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch { expected: VarType, found: VarType },

    #[error("division by zero")]
    DivisionByZero,

    #[error("arity mismatch for `{name}`: expected {expected}, found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// Errors raised by [`crate::infer::result_type`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypeError {
    #[error("unresolved name `{0}`")]
    UnresolvedName(String),

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("operator `{op}` requires {expected:?}, found {found:?}")]
    OperandType {
        op: String,
        expected: VarType,
        found: VarType,
    },

    #[error("arity mismatch for `{name}`: expected {expected}, found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}
