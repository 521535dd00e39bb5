use hanc_formula::Formula;
use indexmap::IndexMap;

use crate::transition::Transition;

/// A state of a [`crate::definition::Definition`] (spec.md §3.4).
///
/// "A Location with no flow is purely discrete; with no transitions it is
/// terminal." Both are just empty maps/vecs here, not separate variants —
/// spec.md §9 prefers closed sums over ad-hoc subtyping, and a Location's
/// "kind" is a derived property (see [`Location::is_discrete`] /
/// [`Location::is_terminal`]), not part of its representation.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub name: String,
    pub invariant: Formula,
    pub flow: IndexMap<String, Formula>,
    pub update: IndexMap<String, Formula>,
    pub transitions: Vec<Transition>,
}

impl Location {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            invariant: Formula::bool(true),
            flow: IndexMap::new(),
            update: IndexMap::new(),
            transitions: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_discrete(&self) -> bool {
        self.flow.is_empty()
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.transitions.is_empty()
    }
}
