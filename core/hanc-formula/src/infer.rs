//! Result-type inference over Formula trees (spec.md §4.1, §4.3).

use std::collections::HashMap;

use crate::ast::{BinaryOp, Builtin, Formula, NaryOp, UnaryOp, VarType};
use crate::errors::TypeError;

/// Function name -> declared return type, used to type-check [`Formula::Call`]
/// nodes (spec.md §4.1: "function calls look up `funcTypes[name]`").
pub type FuncTypes = HashMap<String, VarType>;

/// `resultType(expr, varTypes, funcTypes)` (spec.md §4.1).
pub fn result_type(
    formula: &Formula,
    var_types: &HashMap<String, VarType>,
    func_types: &FuncTypes,
) -> Result<VarType, TypeError> {
    match formula {
        Formula::BoolLiteral(_) => Ok(VarType::Boolean),
        Formula::RealLiteral(_) => Ok(VarType::Real),
        Formula::Variable(name) => var_types
            .get(name)
            .copied()
            .ok_or_else(|| TypeError::UnresolvedName(name.clone())),
        Formula::Unary(op, inner) => {
            let inner_ty = result_type(inner, var_types, func_types)?;
            match op {
                UnaryOp::Negate => expect(inner_ty, VarType::Real, "negate").map(|()| VarType::Real),
                UnaryOp::Not => expect(inner_ty, VarType::Boolean, "not").map(|()| VarType::Boolean),
            }
        }
        Formula::Binary(op, lhs, rhs) => infer_binary(*op, lhs, rhs, var_types, func_types),
        Formula::Nary(op, args) => {
            for arg in args {
                expect(result_type(arg, var_types, func_types)?, VarType::Boolean, nary_name(*op))?;
            }
            Ok(VarType::Boolean)
        }
        Formula::Call(name, args) => {
            for arg in args {
                result_type(arg, var_types, func_types)?;
            }
            func_types
                .get(name)
                .copied()
                .ok_or_else(|| TypeError::UnknownFunction(name.clone()))
        }
        Formula::Builtin(builtin, args) => {
            if args.len() != builtin.arity() {
                return Err(TypeError::ArityMismatch {
                    name: builtin.name().to_string(),
                    expected: builtin.arity(),
                    found: args.len(),
                });
            }
            for arg in args {
                expect(result_type(arg, var_types, func_types)?, VarType::Real, builtin.name())?;
            }
            Ok(VarType::Real)
        }
    }
}

fn nary_name(op: NaryOp) -> &'static str {
    match op {
        NaryOp::And => "&&",
        NaryOp::Or => "||",
    }
}

fn expect(found: VarType, expected: VarType, op: &str) -> Result<(), TypeError> {
    if found == expected {
        Ok(())
    } else {
        Err(TypeError::OperandType {
            op: op.to_string(),
            expected,
            found,
        })
    }
}

fn infer_binary(
    op: BinaryOp,
    lhs: &Formula,
    rhs: &Formula,
    var_types: &HashMap<String, VarType>,
    func_types: &FuncTypes,
) -> Result<VarType, TypeError> {
    let lhs_ty = result_type(lhs, var_types, func_types)?;
    let rhs_ty = result_type(rhs, var_types, func_types)?;
    match op {
        BinaryOp::And | BinaryOp::Or => {
            expect(lhs_ty, VarType::Boolean, op.as_str())?;
            expect(rhs_ty, VarType::Boolean, op.as_str())?;
            Ok(VarType::Boolean)
        }
        BinaryOp::Eq | BinaryOp::Ne => {
            if lhs_ty != rhs_ty {
                return Err(TypeError::OperandType {
                    op: op.as_str().to_string(),
                    expected: lhs_ty,
                    found: rhs_ty,
                });
            }
            Ok(VarType::Boolean)
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            expect(lhs_ty, VarType::Real, op.as_str())?;
            expect(rhs_ty, VarType::Real, op.as_str())?;
            Ok(VarType::Boolean)
        }
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Pow => {
            expect(lhs_ty, VarType::Real, op.as_str())?;
            expect(rhs_ty, VarType::Real, op.as_str())?;
            Ok(VarType::Real)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn types(pairs: &[(&str, VarType)]) -> HashMap<String, VarType> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn arithmetic_is_real() {
        let f = parse("1 + 2 * 3").unwrap();
        assert_eq!(
            result_type(&f, &HashMap::new(), &FuncTypes::new()).unwrap(),
            VarType::Real
        );
    }

    #[test]
    fn comparison_is_boolean() {
        let f = parse("x < 3").unwrap();
        let vt = types(&[("x", VarType::Real)]);
        assert_eq!(result_type(&f, &vt, &FuncTypes::new()).unwrap(), VarType::Boolean);
    }

    #[test]
    fn mismatched_and_operand_fails() {
        let f = parse("x && true").unwrap();
        let vt = types(&[("x", VarType::Real)]);
        assert!(result_type(&f, &vt, &FuncTypes::new()).is_err());
    }

    #[test]
    fn unknown_function_fails() {
        let f = parse("foo(1)").unwrap();
        assert!(matches!(
            result_type(&f, &HashMap::new(), &FuncTypes::new()),
            Err(TypeError::UnknownFunction(name)) if name == "foo"
        ));
    }

    #[test]
    fn known_function_returns_declared_type() {
        let f = parse("foo(1)").unwrap();
        let ft: FuncTypes = [("foo".to_string(), VarType::Boolean)].into_iter().collect();
        assert_eq!(result_type(&f, &HashMap::new(), &ft).unwrap(), VarType::Boolean);
    }
}
