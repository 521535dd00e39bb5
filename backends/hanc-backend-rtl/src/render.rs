//! VHDL-specific [`TypeLowering`] and [`FormulaTarget`] implementations
//! (spec.md §4.6.2). `BOOLEAN` lowers to `std_logic`; `REAL` lowers to a
//! 32-bit `signed` Q16.16 fixed-point vector. Literals are converted via
//! [`crate::fixed_point::convert_to_fixed_point`] before being rendered
//! as a `to_signed(n, 32)` call, since VHDL has no native fixed-point
//! literal syntax in the subset most synthesis tools accept.

use hanc_codegen_core::{FormulaTarget, TypeLowering};
use hanc_formula::{BinaryOp, Builtin, NaryOp, UnaryOp, VarType};

use crate::fixed_point::{convert_to_fixed_point, DEFAULT_FRACTIONAL_BITS};

pub struct VhdlTypes {
    pub fractional_bits: u32,
}

impl Default for VhdlTypes {
    fn default() -> Self {
        Self {
            fractional_bits: DEFAULT_FRACTIONAL_BITS,
        }
    }
}

impl TypeLowering for VhdlTypes {
    fn lower_type(&self, var_type: VarType) -> String {
        match var_type {
            VarType::Real => "signed(31 downto 0)".to_string(),
            VarType::Boolean => "std_logic".to_string(),
        }
    }

    fn lower_bool_literal(&self, value: bool) -> String {
        if value { "'1'".to_string() } else { "'0'".to_string() }
    }

    fn lower_real_literal(&self, value: f64) -> String {
        format!(
            "to_signed({}, 32)",
            convert_to_fixed_point(value, self.fractional_bits)
        )
    }
}

pub struct VhdlFormula {
    pub fractional_bits: u32,
}

impl Default for VhdlFormula {
    fn default() -> Self {
        Self {
            fractional_bits: DEFAULT_FRACTIONAL_BITS,
        }
    }
}

impl FormulaTarget for VhdlFormula {
    fn render_bool(&self, value: bool) -> String {
        VhdlTypes {
            fractional_bits: self.fractional_bits,
        }
        .lower_bool_literal(value)
    }

    fn render_real(&self, value: f64) -> String {
        VhdlTypes {
            fractional_bits: self.fractional_bits,
        }
        .lower_real_literal(value)
    }

    fn render_unary(&self, op: UnaryOp, operand: String) -> String {
        match op {
            UnaryOp::Negate => format!("(-{operand})"),
            UnaryOp::Not => format!("(not {operand})"),
        }
    }

    fn render_binary(&self, op: BinaryOp, lhs: String, rhs: String) -> String {
        let token = match op {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "/=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            // Fixed-point exponentiation has no native VHDL operator;
            // the emitted entity assumes a `fixed_pow` helper function
            // exists in the project's fixed-point support package.
            BinaryOp::Pow => return format!("fixed_pow({lhs}, {rhs})"),
        };
        format!("({lhs} {token} {rhs})")
    }

    fn render_nary(&self, op: NaryOp, args: Vec<String>) -> String {
        let sep = match op {
            NaryOp::And => " and ",
            NaryOp::Or => " or ",
        };
        format!("({})", args.join(sep))
    }

    fn render_call(&self, name: &str, args: Vec<String>) -> String {
        format!("{name}({})", args.join(", "))
    }

    fn render_builtin(&self, builtin: Builtin, args: Vec<String>) -> String {
        format!("fixed_{}({})", builtin.name(), args.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanc_codegen_core::{lower_formula, PrefixData};

    #[test]
    fn real_literal_lowers_to_fixed_point_signed() {
        let formula = hanc_formula::Formula::real(1.5);
        let rendered = lower_formula(&formula, &PrefixData::default(), &VhdlFormula::default());
        assert_eq!(rendered, "to_signed(98304, 32)");
    }

    #[test]
    fn comparison_uses_vhdl_equality_token() {
        let formula = hanc_formula::parse("a == b").unwrap();
        let rendered = lower_formula(&formula, &PrefixData::default(), &VhdlFormula::default());
        assert_eq!(rendered, "(a = b)");
    }
}
