use thiserror::Error;

/// Errors shared across back-ends (spec.md §7).
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("{variable} cannot be delayed by this back-end")]
    DelayUnsupported { variable: String },

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// A `hanc-transform` pass (parameter propagation, flattening, …)
    /// failed while a back-end was driving it as part of `generate`.
    #[error("transformation failed: {0}")]
    Transform(String),
}
