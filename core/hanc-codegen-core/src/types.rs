//! Target-specific rendering of [`VarType`] (spec.md §4.6): each back-end
//! implements this trait once for its own value representation (C's
//! `double`/`bool`, the RTL back-end's fixed-point `std_logic_vector`).

use hanc_formula::VarType;

pub trait TypeLowering {
    /// The target-language type name used for a declaration.
    fn lower_type(&self, var_type: VarType) -> String;

    /// A literal value rendered in the target language's own syntax.
    fn lower_bool_literal(&self, value: bool) -> String;
    fn lower_real_literal(&self, value: f64) -> String;
}
