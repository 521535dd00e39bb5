//! Formula lowering with a `PrefixData` context (spec.md §4.6): rewrites a
//! [`Formula`]'s Variable references through a scope prefix plus an
//! explicit name -> substitute map, then renders the tree into
//! target-language text via a back-end-supplied [`FormulaTarget`].

use std::collections::HashMap;

use hanc_formula::{BinaryOp, Builtin, Formula, NaryOp, UnaryOp};

/// Carries the scope a Formula is being lowered inside: an optional prefix
/// applied to every unresolved name (`"inst_data->"`, a VHDL signal
/// prefix, …) and an explicit map for names that need a different
/// rewrite than plain prefixing (e.g. a delayed variable's read site,
/// rewritten to index its ring buffer by the back-end).
#[derive(Clone, Debug, Default)]
pub struct PrefixData {
    pub prefix: String,
    pub substitutions: HashMap<String, String>,
}

impl PrefixData {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            substitutions: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_substitution(mut self, name: impl Into<String>, rewrite: impl Into<String>) -> Self {
        self.substitutions.insert(name.into(), rewrite.into());
        self
    }

    /// Resolves one Variable name: an explicit substitution wins, then the
    /// prefix is applied, then the bare name if there's no prefix.
    #[must_use]
    pub fn resolve(&self, name: &str) -> String {
        if let Some(rewrite) = self.substitutions.get(name) {
            return rewrite.clone();
        }
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}{}", self.prefix, name)
        }
    }
}

/// Target-language rendering rules a back-end supplies to `lower_formula`.
/// Traversal, precedence-driven parenthesisation, and `PrefixData`
/// resolution are shared; only the concrete tokens differ between C and
/// VHDL.
pub trait FormulaTarget {
    fn render_bool(&self, value: bool) -> String;
    fn render_real(&self, value: f64) -> String;
    fn render_unary(&self, op: UnaryOp, operand: String) -> String;
    fn render_binary(&self, op: BinaryOp, lhs: String, rhs: String) -> String;
    fn render_nary(&self, op: NaryOp, args: Vec<String>) -> String;
    fn render_call(&self, name: &str, args: Vec<String>) -> String;
    fn render_builtin(&self, builtin: Builtin, args: Vec<String>) -> String;
}

/// Recursively renders `formula` as target-language text, resolving every
/// Variable reference through `prefix` and dispatching operator/literal
/// syntax to `target`.
#[must_use]
pub fn lower_formula(formula: &Formula, prefix: &PrefixData, target: &dyn FormulaTarget) -> String {
    match formula {
        Formula::BoolLiteral(b) => target.render_bool(*b),
        Formula::RealLiteral(x) => target.render_real(*x),
        Formula::Variable(name) => prefix.resolve(name),
        Formula::Unary(op, inner) => {
            target.render_unary(*op, lower_formula(inner, prefix, target))
        }
        Formula::Binary(op, lhs, rhs) => target.render_binary(
            *op,
            lower_formula(lhs, prefix, target),
            lower_formula(rhs, prefix, target),
        ),
        Formula::Nary(op, args) => target.render_nary(
            *op,
            args.iter().map(|a| lower_formula(a, prefix, target)).collect(),
        ),
        Formula::Call(name, args) => target.render_call(
            name,
            args.iter().map(|a| lower_formula(a, prefix, target)).collect(),
        ),
        Formula::Builtin(builtin, args) => target.render_builtin(
            *builtin,
            args.iter().map(|a| lower_formula(a, prefix, target)).collect(),
        ),
    }
}
