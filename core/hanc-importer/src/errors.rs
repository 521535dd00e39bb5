use hanc_formula::ParseError as FormulaParseError;
use hanc_program::ProgramError;
use thiserror::Error;

/// Errors raised while turning a source document into a
/// [`hanc_ir::Network`] (spec.md §4.4, §7).
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Formula(#[from] FormulaParseError),

    #[error(transparent)]
    Program(#[from] ProgramError),

    #[error(transparent)]
    Ir(#[from] hanc_ir::IrError),

    /// A mapping's destination or source port does not resolve to a
    /// declared Instance/Definition port after Instance/Definition
    /// resolution (spec.md §4.4).
    #[error("unresolved mapping target `{target}`")]
    UnresolvedMapping { target: String },

    /// `!include` forms a cycle; `cycle` lists the participating paths in
    /// the order they were (re-)entered (spec.md §4.4, §8 scenario 5).
    #[error("include cycle: {}", .cycle.join(" -> "))]
    IncludeCycle { cycle: Vec<String> },

    /// An Instance names a Definition that isn't declared anywhere in the
    /// document.
    #[error("instance `{instance}` references unknown definition `{definition}`")]
    UnknownDefinition { instance: String, definition: String },

    /// A `type` field is neither `REAL` nor `BOOLEAN` (spec.md §6
    /// "Variable Definition").
    #[error("invalid variable type `{found}`, expected REAL or BOOLEAN")]
    InvalidVariableType { found: String },
}
