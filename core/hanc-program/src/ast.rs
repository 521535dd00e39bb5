use hanc_formula::Formula;

/// One line of a [`Program`] (spec.md §3.2).
#[derive(Clone, Debug, PartialEq)]
pub enum Line {
    Statement(Formula),
    Assignment { target: String, value: Formula },
    Return(Formula),
    If { condition: Formula, body: Program },
    ElseIf { condition: Formula, body: Program },
    Else { body: Program },
}

/// An ordered sequence of [`Line`]s (spec.md §3.2). Chaining order is
/// significant: an `ElseIf`/`Else` is only meaningful immediately after an
/// `If`/`ElseIf` at the same nesting level, which the parser enforces but
/// the tree itself does not re-validate (it is a flat ordered `Vec`, not a
/// linked if/else-if/else chain struct, matching the "closed sum plus
/// match-exhaustive dispatch" design note in spec.md §9).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Program {
    pub lines: Vec<Line>,
}

impl Program {
    #[must_use]
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }
}
