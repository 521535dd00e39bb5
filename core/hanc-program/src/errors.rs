use hanc_formula::{ParseError as FormulaParseError, TypeError as FormulaTypeError, VarType};
use thiserror::Error;

/// Errors raised while parsing or analysing a [`crate::ast::Program`]
/// (spec.md §4.2, §4.3, §7).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProgramError {
    #[error("formula error: {0}")]
    Formula(#[from] FormulaParseError),

    #[error("formula type error: {0}")]
    FormulaType(#[from] FormulaTypeError),

    /// A conditional header's brace body never closes (spec.md §4.2,
    /// §8: "Brace balance").
    #[error("unbalanced braces starting at line {line}")]
    UnbalancedBraces { line: usize },

    /// Redeclaration of `name` with a conflicting type (spec.md §4.3,
    /// scenario 6 in §8).
    #[error("type conflict for variable `{name}`: previously {previous:?}, now {found:?}")]
    TypeConflict {
        name: String,
        previous: VarType,
        found: VarType,
    },

    /// Two `return` sites (or a `return` site and a recursive branch)
    /// disagree on result type (spec.md §4.3).
    #[error("return type conflict: {first:?} vs {second:?}")]
    ReturnTypeConflict { first: VarType, second: VarType },
}
