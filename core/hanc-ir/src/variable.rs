use hanc_formula::{Formula, VarType};

/// Where a [`Variable`] gets its value from (spec.md §3.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Locality {
    Internal,
    ExternalInput,
    ExternalOutput,
    Parameter,
}

/// A named, typed slot in a [`crate::definition::Definition`] (spec.md §3.3).
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub var_type: VarType,
    pub locality: Locality,
    pub default: Option<Formula>,
    /// `delayableBy` (spec.md §3.3, §4.5 "Delay expansion"). `None` means
    /// the variable is never delayed; the transform phase treats a literal
    /// `0` formula the same as `None`.
    pub delayable_by: Option<Formula>,
}

impl Variable {
    #[must_use]
    pub fn new(name: impl Into<String>, var_type: VarType, locality: Locality) -> Self {
        Self {
            name: name.into(),
            var_type,
            locality,
            default: None,
            delayable_by: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Formula) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn with_delayable_by(mut self, delay: Formula) -> Self {
        self.delayable_by = Some(delay);
        self
    }
}
