use thiserror::Error;

/// Structural errors a [`crate::definition::Definition`] or
/// [`crate::network::Network`] builder can raise on its own, without
/// needing the rest of the network in scope (spec.md §3.3, §3.6).
///
/// Errors that need cross-Definition/Instance context (`UnresolvedName`,
/// `UnresolvedMapping`, `DelayUnsupported`, …) belong to `hanc-transform`'s
/// validation pass instead, which sees the whole [`crate::network::Network`]
/// at once.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IrError {
    /// Two variables in the same [`crate::definition::Definition`] share a
    /// name (spec.md §3.3: "within a Definition a name is unique").
    #[error("duplicate variable `{name}` in definition `{definition}`")]
    DuplicateVariable { definition: String, name: String },

    /// Two locations in the same [`crate::definition::Definition`] share a
    /// name.
    #[error("duplicate location `{name}` in definition `{definition}`")]
    DuplicateLocation { definition: String, name: String },

    /// A [`crate::definition::Definition`]'s `initial_location` does not
    /// name one of its own locations (spec.md §3.6: "initial location
    /// exists").
    #[error("initial location `{location}` not found in definition `{definition}`")]
    UnknownInitialLocation { definition: String, location: String },

    /// A PARAMETER-locality variable was given a `flow` entry (spec.md
    /// §3.3: "A PARAMETER may not have flow").
    #[error("parameter `{name}` may not have a flow entry")]
    ParameterHasFlow { name: String },
}
