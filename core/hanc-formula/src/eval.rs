//! Side-effect-free, deterministic evaluation of a [`Formula`] (spec.md §4.1).

use std::collections::HashMap;

use crate::ast::{BinaryOp, Builtin, Formula, NaryOp, UnaryOp, VarType};
use crate::errors::EvalError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Real(f64),
}

impl Value {
    #[must_use]
    pub fn var_type(self) -> VarType {
        match self {
            Value::Bool(_) => VarType::Boolean,
            Value::Real(_) => VarType::Real,
        }
    }

    fn as_real(self) -> Result<f64, EvalError> {
        match self {
            Value::Real(x) => Ok(x),
            Value::Bool(_) => Err(EvalError::TypeMismatch {
                expected: VarType::Real,
                found: VarType::Boolean,
            }),
        }
    }

    fn as_bool(self) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(b),
            Value::Real(_) => Err(EvalError::TypeMismatch {
                expected: VarType::Boolean,
                found: VarType::Real,
            }),
        }
    }
}

/// A `name -> value` environment. User-declared functions are not callable
/// during plain evaluation (spec.md §4.1 does not define function-body
/// evaluation at this layer; [`crate::ast::Formula::Call`] nodes only ever
/// appear lowered away by code generation or rejected here).
pub type Env = HashMap<String, Value>;

/// Evaluates `formula` against `env`, deterministically and without side
/// effects (spec.md §4.1).
pub fn evaluate(formula: &Formula, env: &Env) -> Result<Value, EvalError> {
    match formula {
        Formula::BoolLiteral(b) => Ok(Value::Bool(*b)),
        Formula::RealLiteral(x) => Ok(Value::Real(*x)),
        Formula::Variable(name) => env
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::UnresolvedName(name.clone())),
        Formula::Unary(op, inner) => eval_unary(*op, evaluate(inner, env)?),
        Formula::Binary(op, lhs, rhs) => {
            eval_binary(*op, evaluate(lhs, env)?, evaluate(rhs, env)?)
        }
        Formula::Nary(op, args) => eval_nary(*op, args, env),
        Formula::Call(name, _) => Err(EvalError::UnresolvedName(name.clone())),
        Formula::Builtin(builtin, args) => eval_builtin(*builtin, args, env),
    }
}

fn eval_unary(op: UnaryOp, value: Value) -> Result<Value, EvalError> {
    match op {
        UnaryOp::Negate => Ok(Value::Real(-value.as_real()?)),
        UnaryOp::Not => Ok(Value::Bool(!value.as_bool()?)),
    }
}

fn eval_binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    if matches!(op, BinaryOp::And | BinaryOp::Or) {
        let l = lhs.as_bool()?;
        let r = rhs.as_bool()?;
        return Ok(Value::Bool(if op == BinaryOp::And { l && r } else { l || r }));
    }
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(values_equal(lhs, rhs)?)),
        BinaryOp::Ne => return Ok(Value::Bool(!values_equal(lhs, rhs)?)),
        _ => {}
    }
    let l = lhs.as_real()?;
    let r = rhs.as_real()?;
    Ok(match op {
        BinaryOp::Add => Value::Real(l + r),
        BinaryOp::Sub => Value::Real(l - r),
        BinaryOp::Mul => Value::Real(l * r),
        BinaryOp::Div => {
            if r == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Value::Real(l / r)
        }
        BinaryOp::Pow => Value::Real(l.powf(r)),
        BinaryOp::Lt => Value::Bool(l < r),
        BinaryOp::Le => Value::Bool(l <= r),
        BinaryOp::Gt => Value::Bool(l > r),
        BinaryOp::Ge => Value::Bool(l >= r),
        BinaryOp::Eq | BinaryOp::Ne | BinaryOp::And | BinaryOp::Or => unreachable!(),
    })
}

fn values_equal(lhs: Value, rhs: Value) -> Result<bool, EvalError> {
    match (lhs, rhs) {
        (Value::Bool(l), Value::Bool(r)) => Ok(l == r),
        (Value::Real(l), Value::Real(r)) => Ok((l - r).abs() == 0.0),
        _ => Err(EvalError::TypeMismatch {
            expected: lhs.var_type(),
            found: rhs.var_type(),
        }),
    }
}

fn eval_nary(op: NaryOp, args: &[Formula], env: &Env) -> Result<Value, EvalError> {
    let mut acc = match op {
        NaryOp::And => true,
        NaryOp::Or => false,
    };
    for arg in args {
        let v = evaluate(arg, env)?.as_bool()?;
        acc = match op {
            NaryOp::And => acc && v,
            NaryOp::Or => acc || v,
        };
    }
    Ok(Value::Bool(acc))
}

fn eval_builtin(builtin: Builtin, args: &[Formula], env: &Env) -> Result<Value, EvalError> {
    let expected = builtin.arity();
    if args.len() != expected {
        return Err(EvalError::ArityMismatch {
            name: builtin.name().to_string(),
            expected,
            found: args.len(),
        });
    }
    let values: Result<Vec<f64>, EvalError> =
        args.iter().map(|a| evaluate(a, env)?.as_real()).collect();
    let values = values?;
    let x = values[0];
    Ok(Value::Real(match builtin {
        Builtin::Sqrt => x.sqrt(),
        Builtin::Exp => x.exp(),
        Builtin::Ln => x.ln(),
        Builtin::Sin => x.sin(),
        Builtin::Cos => x.cos(),
        Builtin::Tan => x.tan(),
        Builtin::Floor => x.floor(),
        Builtin::Ceil => x.ceil(),
        Builtin::Abs => x.abs(),
        Builtin::Pow => x.powf(values[1]),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn env(pairs: &[(&str, Value)]) -> Env {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn evaluates_arithmetic() {
        let f = parse("2 + 3 * 4").unwrap();
        assert_eq!(evaluate(&f, &Env::new()).unwrap(), Value::Real(14.0));
    }

    #[test]
    fn evaluates_division_by_zero() {
        let f = parse("1 / 0").unwrap();
        assert_eq!(evaluate(&f, &Env::new()).unwrap_err(), EvalError::DivisionByZero);
    }

    #[test]
    fn evaluates_variable_lookup() {
        let f = parse("x + 1").unwrap();
        let e = env(&[("x", Value::Real(41.0))]);
        assert_eq!(evaluate(&f, &e).unwrap(), Value::Real(42.0));
    }

    #[test]
    fn unresolved_name_fails() {
        let f = parse("y").unwrap();
        assert_eq!(
            evaluate(&f, &Env::new()).unwrap_err(),
            EvalError::UnresolvedName("y".to_string())
        );
    }

    #[test]
    fn builtin_arity_mismatch() {
        let f = Formula::Builtin(Builtin::Pow, vec![Formula::real(2.0)]);
        assert!(matches!(
            evaluate(&f, &Env::new()).unwrap_err(),
            EvalError::ArityMismatch { .. }
        ));
    }

    #[test]
    fn chained_and() {
        let f = parse("true && true && false").unwrap();
        assert_eq!(evaluate(&f, &Env::new()).unwrap(), Value::Bool(false));
    }
}
