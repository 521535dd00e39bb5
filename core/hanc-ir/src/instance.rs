use hanc_formula::Formula;
use indexmap::IndexMap;

/// One instantiation of a [`crate::definition::Definition`] inside a
/// [`crate::network::Network`] (spec.md §3.7).
///
/// `definition` names a key into the enclosing Network's `definitions`
/// table rather than holding a pointer — spec.md §9's "Recursive IR with
/// back-references" note: look-ups are O(1) and cycles are syntactically
/// forbidden because a table can't contain itself under its own key.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub name: String,
    pub definition: String,
    pub parameters: IndexMap<String, Formula>,
}

impl Instance {
    #[must_use]
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
            parameters: IndexMap::new(),
        }
    }
}
