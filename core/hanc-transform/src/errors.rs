use hanc_formula::{EvalError, TypeError};
use thiserror::Error;

/// Errors raised while validating or rewriting an already-imported
/// [`hanc_ir::Network`] (spec.md §4.5, §7).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    /// A Formula anywhere in the network refers to a name that resolves
    /// to neither a declared Variable, a declared function, a parameter,
    /// nor a builtin (spec.md §3.6 invariant, §7 `UnresolvedName`).
    #[error("in definition `{definition}`: {source}")]
    UnresolvedName {
        definition: String,
        #[source]
        source: TypeError,
    },

    /// A mapping's destination does not resolve to a declared
    /// Instance/Definition port (spec.md §4.4, §7 `UnresolvedMapping`).
    #[error("unresolved mapping target `{target}`")]
    UnresolvedMapping { target: String },

    /// An Instance names a Definition absent from the enclosing Network's
    /// `definitions` table.
    #[error("instance `{instance}` references unknown definition `{definition}`")]
    UnknownDefinition { instance: String, definition: String },

    /// A transition's `target` does not name a Location in the same
    /// Definition (spec.md §3.6 invariant).
    #[error("transition in definition `{definition}` targets unknown location `{location}`")]
    UnknownTransitionTarget { definition: String, location: String },

    /// Evaluating an Instance's parameter expression, or a `delayableBy`
    /// expression, during parameter propagation / delay-plan computation
    /// failed.
    #[error("failed to evaluate constant expression: {0}")]
    ConstEval(#[from] EvalError),

    /// A function body failed variable collection or return-type
    /// unification (spec.md §4.2, §4.3).
    #[error("in definition `{definition}` function body: {source}")]
    FunctionBody {
        definition: String,
        #[source]
        source: hanc_program::ProgramError,
    },
}
