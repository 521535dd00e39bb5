use serde::{Deserialize, Serialize};

/// Result type of a Formula expression (spec.md §3.1, §3.3).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum VarType {
    Boolean,
    Real,
}

impl VarType {
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, VarType::Real)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnaryOp {
    Negate,
    Not,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    /// Precedence used by the Pratt parser; higher binds tighter.
    #[must_use]
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::Ne => 3,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div => 6,
            BinaryOp::Pow => 7,
        }
    }

    /// `true` for operators that associate left-to-right; `pow` is
    /// right-associative, matching the usual mathematical convention.
    #[must_use]
    pub fn is_left_assoc(self) -> bool {
        !matches!(self, BinaryOp::Pow)
    }

    #[must_use]
    pub fn is_boolean_result(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::And
                | BinaryOp::Or
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NaryOp {
    And,
    Or,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Builtin {
    Sqrt,
    Exp,
    Ln,
    Sin,
    Cos,
    Tan,
    Floor,
    Ceil,
    Abs,
    Pow,
}

impl Builtin {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Sqrt => "sqrt",
            Builtin::Exp => "exp",
            Builtin::Ln => "ln",
            Builtin::Sin => "sin",
            Builtin::Cos => "cos",
            Builtin::Tan => "tan",
            Builtin::Floor => "floor",
            Builtin::Ceil => "ceil",
            Builtin::Abs => "abs",
            Builtin::Pow => "pow",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sqrt" => Builtin::Sqrt,
            "exp" => Builtin::Exp,
            "ln" => Builtin::Ln,
            "sin" => Builtin::Sin,
            "cos" => Builtin::Cos,
            "tan" => Builtin::Tan,
            "floor" => Builtin::Floor,
            "ceil" => Builtin::Ceil,
            "abs" => Builtin::Abs,
            "pow" => Builtin::Pow,
            _ => return None,
        })
    }

    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Builtin::Pow => 2,
            _ => 1,
        }
    }
}

/// A node in the Formula expression tree (spec.md §3.1).
///
/// Closed sum type with `Box` recursion, matching the design note in
/// spec.md §9: "prefer tagged-variant encoding plus match-exhaustive
/// dispatch; never open inheritance." The teacher's `core/ast` crate
/// reaches the same shape via an arena + macro-generated structs because
/// its AST is consumed incrementally by an IDE; this compiler runs batch,
/// so a plain recursive enum is the idiomatic fit.
#[derive(Clone, PartialEq, Debug)]
pub enum Formula {
    BoolLiteral(bool),
    RealLiteral(f64),
    /// A possibly dot-qualified name (`v` or `instance.field`).
    Variable(String),
    Unary(UnaryOp, Box<Formula>),
    Binary(BinaryOp, Box<Formula>, Box<Formula>),
    Nary(NaryOp, Vec<Formula>),
    Call(String, Vec<Formula>),
    Builtin(Builtin, Vec<Formula>),
}

impl Formula {
    #[must_use]
    pub fn bool(b: bool) -> Self {
        Formula::BoolLiteral(b)
    }

    #[must_use]
    pub fn real(x: f64) -> Self {
        Formula::RealLiteral(x)
    }

    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Formula::Variable(name.into())
    }

    /// Collects every distinct variable name referenced anywhere in this
    /// subtree, in first-encountered order.
    #[must_use]
    pub fn free_variables(&self) -> Vec<String> {
        let mut seen = Vec::new();
        self.collect_free_variables(&mut seen);
        seen
    }

    fn collect_free_variables(&self, out: &mut Vec<String>) {
        match self {
            Formula::BoolLiteral(_) | Formula::RealLiteral(_) => {}
            Formula::Variable(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Formula::Unary(_, inner) => inner.collect_free_variables(out),
            Formula::Binary(_, lhs, rhs) => {
                lhs.collect_free_variables(out);
                rhs.collect_free_variables(out);
            }
            Formula::Nary(_, args) | Formula::Call(_, args) | Formula::Builtin(_, args) => {
                for arg in args {
                    arg.collect_free_variables(out);
                }
            }
        }
    }
}
