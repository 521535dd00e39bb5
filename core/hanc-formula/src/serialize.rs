//! Canonical infix serialization (spec.md §4.1: `toString`).
//!
//! Parentheses are emitted only where needed to preserve precedence and
//! associativity relative to the parent node, so that `parse(serialize(f))`
//! yields a structurally equal tree (the round-trip law in spec.md §8).

use std::fmt;

use crate::ast::{BinaryOp, Builtin, Formula, NaryOp, UnaryOp};

/// Serializes `formula` to canonical infix text.
#[must_use]
pub fn to_infix(formula: &Formula) -> String {
    let mut out = String::new();
    write_formula(formula, 0, &mut out);
    out
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_infix(self))
    }
}

/// `parent_precedence` is the precedence of the operator the current
/// subtree is an operand of; `0` at the root. A child whose own operator
/// binds looser needs parens to survive re-parsing.
fn write_formula(formula: &Formula, parent_precedence: u8, out: &mut String) {
    match formula {
        Formula::BoolLiteral(b) => out.push_str(if *b { "true" } else { "false" }),
        Formula::RealLiteral(x) => out.push_str(&format_real(*x)),
        Formula::Variable(name) => out.push_str(name),
        Formula::Unary(op, inner) => {
            out.push_str(match op {
                UnaryOp::Negate => "-",
                UnaryOp::Not => "!",
            });
            let needs_parens = matches!(inner.as_ref(), Formula::Binary(..) | Formula::Nary(..));
            if needs_parens {
                out.push('(');
                write_formula(inner, 0, out);
                out.push(')');
            } else {
                write_formula(inner, u8::MAX, out);
            }
        }
        Formula::Binary(op, lhs, rhs) => {
            let prec = op.precedence();
            let needs_parens = prec < parent_precedence;
            if needs_parens {
                out.push('(');
            }
            let lhs_min = if op.is_left_assoc() { prec } else { prec + 1 };
            let rhs_min = if op.is_left_assoc() { prec + 1 } else { prec };
            write_formula(lhs, lhs_min, out);
            out.push(' ');
            out.push_str(op.as_str());
            out.push(' ');
            write_formula(rhs, rhs_min, out);
            if needs_parens {
                out.push(')');
            }
        }
        Formula::Nary(op, args) => {
            let prec = nary_precedence(*op);
            let needs_parens = prec < parent_precedence;
            if needs_parens {
                out.push('(');
            }
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                    out.push_str(nary_str(*op));
                    out.push(' ');
                }
                write_formula(arg, prec, out);
            }
            if needs_parens {
                out.push(')');
            }
        }
        Formula::Call(name, args) => write_call(name, args, out),
        Formula::Builtin(builtin, args) => write_call(builtin.name(), args, out),
    }
}

fn write_call(name: &str, args: &[Formula], out: &mut String) {
    out.push_str(name);
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_formula(arg, 0, out);
    }
    out.push(')');
}

fn nary_precedence(op: NaryOp) -> u8 {
    match op {
        NaryOp::Or => BinaryOp::Or.precedence(),
        NaryOp::And => BinaryOp::And.precedence(),
    }
}

fn nary_str(op: NaryOp) -> &'static str {
    match op {
        NaryOp::And => "&&",
        NaryOp::Or => "||",
    }
}

/// Formats a real literal so it reparses to the same value, avoiding
/// trailing `.0` noise only when the source genuinely had none to begin
/// with is not tracked — the lexer always accepts `1` and `1.0` as the same
/// token, so the canonical form always carries a decimal point.
fn format_real(x: f64) -> String {
    if x.fract() == 0.0 && x.is_finite() {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn roundtrip(src: &str) {
        let f1 = parse(src).unwrap();
        let text = to_infix(&f1);
        let f2 = parse(&text).unwrap();
        assert_eq!(f1, f2, "roundtrip mismatch: {src:?} -> {text:?}");
    }

    #[test]
    fn roundtrips_precedence() {
        roundtrip("1 + 2 * 3");
        roundtrip("(1 + 2) * 3");
        roundtrip("2 ^ 3 ^ 2");
        roundtrip("(2 ^ 3) ^ 2");
        roundtrip("a && b || c");
        roundtrip("a && (b || c)");
        roundtrip("-x + 1");
        roundtrip("!a && b");
        roundtrip("sqrt(x) + pow(y, 2)");
        roundtrip("a.b + c.d");
    }

    #[test]
    fn drops_redundant_parens() {
        let f = parse("(1 + 2) + 3").unwrap();
        assert_eq!(to_infix(&f), "1 + 2 + 3");
    }

    #[test]
    fn keeps_required_parens_for_subtraction() {
        let f = parse("1 - (2 - 3)").unwrap();
        assert_eq!(to_infix(&f), "1 - (2 - 3)");
    }
}
