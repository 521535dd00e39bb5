//! C-specific [`TypeLowering`] and [`FormulaTarget`] implementations
//! (spec.md §4.6: "type lowering (target-specific rendering of
//! BOOLEAN/REAL)"). `BinaryOp::as_str` already produces C-compatible
//! infix tokens for every operator except `^`, which C has no operator
//! for — that one lowers to `pow(lhs, rhs)` instead.

use hanc_codegen_core::{FormulaTarget, TypeLowering};
use hanc_formula::{BinaryOp, Builtin, NaryOp, UnaryOp, VarType};

pub struct CTypes;

impl TypeLowering for CTypes {
    fn lower_type(&self, var_type: VarType) -> String {
        match var_type {
            VarType::Real => "double".to_string(),
            VarType::Boolean => "bool".to_string(),
        }
    }

    fn lower_bool_literal(&self, value: bool) -> String {
        if value { "true".to_string() } else { "false".to_string() }
    }

    fn lower_real_literal(&self, value: f64) -> String {
        format!("{value:?}")
    }
}

pub struct CFormula;

impl FormulaTarget for CFormula {
    fn render_bool(&self, value: bool) -> String {
        CTypes.lower_bool_literal(value)
    }

    fn render_real(&self, value: f64) -> String {
        CTypes.lower_real_literal(value)
    }

    fn render_unary(&self, op: UnaryOp, operand: String) -> String {
        match op {
            UnaryOp::Negate => format!("(-{operand})"),
            UnaryOp::Not => format!("(!{operand})"),
        }
    }

    fn render_binary(&self, op: BinaryOp, lhs: String, rhs: String) -> String {
        if op == BinaryOp::Pow {
            format!("pow({lhs}, {rhs})")
        } else {
            format!("({lhs} {} {rhs})", op.as_str())
        }
    }

    fn render_nary(&self, op: NaryOp, args: Vec<String>) -> String {
        let sep = match op {
            NaryOp::And => " && ",
            NaryOp::Or => " || ",
        };
        format!("({})", args.join(sep))
    }

    fn render_call(&self, name: &str, args: Vec<String>) -> String {
        format!("{name}({})", args.join(", "))
    }

    fn render_builtin(&self, builtin: Builtin, args: Vec<String>) -> String {
        format!("{}({})", builtin.name(), args.join(", "))
    }
}
