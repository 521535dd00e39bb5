use hanc_formula::Formula;
use indexmap::IndexMap;

/// An outgoing edge of a [`crate::location::Location`] (spec.md §3.5).
///
/// "At most one transition is taken per inter-transition step" (spec.md §5)
/// is enforced by the generated simulator, not by this data structure —
/// `Location::transitions` is an ordered list precisely so a back-end can
/// evaluate guards "in declaration order, taking the first that holds"
/// (spec.md §4.6.1).
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub target: String,
    pub guard: Formula,
    pub update: IndexMap<String, Formula>,
}

impl Transition {
    #[must_use]
    pub fn new(target: impl Into<String>, guard: Formula) -> Self {
        Self {
            target: target.into(),
            guard,
            update: IndexMap::new(),
        }
    }

    /// A transition with the default guard `true` (spec.md §3.5).
    #[must_use]
    pub fn unconditional(target: impl Into<String>) -> Self {
        Self::new(target, Formula::bool(true))
    }
}
