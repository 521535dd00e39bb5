use thiserror::Error;

/// Errors specific to the RTL back-end (spec.md §4.6.2, §7).
#[derive(Debug, Error)]
pub enum RtlError {
    /// "Delayable variables are rejected with DelayUnsupported at
    /// present" (spec.md §4.6.2) — the RTL back-end has no ring-buffer
    /// lowering, unlike the C back-end.
    #[error("{variable} cannot be delayed by the RTL back-end")]
    DelayUnsupported { variable: String },

    #[error("template rendering failed for `{definition}`: {source}")]
    Template { definition: String, source: String },

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<RtlError> for hanc_codegen_core::CodegenError {
    fn from(err: RtlError) -> Self {
        match err {
            RtlError::DelayUnsupported { variable } => {
                hanc_codegen_core::CodegenError::DelayUnsupported { variable }
            }
            RtlError::Template { definition, source } => {
                hanc_codegen_core::CodegenError::Transform(format!(
                    "template rendering failed for `{definition}`: {source}"
                ))
            }
            RtlError::Io { path, source } => hanc_codegen_core::CodegenError::Io { path, source },
        }
    }
}
