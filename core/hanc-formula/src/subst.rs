//! Parameter substitution (spec.md §4.1: `setParameter`).

use crate::ast::Formula;

/// Replaces every [`Formula::Variable`] node named `name` with a clone of
/// `replacement`, leaving the rest of the tree untouched. Matching is by
/// structural equality of the name, exactly as spec.md §4.1 describes.
#[must_use]
pub fn set_parameter(formula: &Formula, name: &str, replacement: &Formula) -> Formula {
    match formula {
        Formula::Variable(v) if v == name => replacement.clone(),
        Formula::BoolLiteral(_) | Formula::RealLiteral(_) | Formula::Variable(_) => formula.clone(),
        Formula::Unary(op, inner) => {
            Formula::Unary(*op, Box::new(set_parameter(inner, name, replacement)))
        }
        Formula::Binary(op, lhs, rhs) => Formula::Binary(
            *op,
            Box::new(set_parameter(lhs, name, replacement)),
            Box::new(set_parameter(rhs, name, replacement)),
        ),
        Formula::Nary(op, args) => Formula::Nary(
            *op,
            args.iter().map(|a| set_parameter(a, name, replacement)).collect(),
        ),
        Formula::Call(fname, args) => Formula::Call(
            fname.clone(),
            args.iter().map(|a| set_parameter(a, name, replacement)).collect(),
        ),
        Formula::Builtin(b, args) => Formula::Builtin(
            *b,
            args.iter().map(|a| set_parameter(a, name, replacement)).collect(),
        ),
    }
}
