use serde::{Deserialize, Serialize};

/// Whether instance parameters are baked into generated source or carried
/// in a runtime struct (spec.md §6, GLOSSARY).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParametrisationMethod {
    CompileTime,
    RunTime,
}

impl Default for ParametrisationMethod {
    fn default() -> Self {
        Self::CompileTime
    }
}

/// `execution` sub-document of `codegenConfig` (spec.md §6).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutionConfig {
    pub step_size: f64,
    pub simulation_time: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            step_size: 0.001,
            simulation_time: 10.0,
        }
    }
}

/// `logging` sub-document of `codegenConfig` (spec.md §6).
///
/// `interval` defaults to the enclosing [`ExecutionConfig::step_size`], not
/// a fixed constant, so it is left `None` here and resolved by
/// [`LoggingConfig::effective_interval`] once both sections are available.
/// `fields` defaults to "all outputs of all Instances", which likewise
/// needs the [`crate::network::Network`] in scope to compute — left `None`
/// and resolved by `hanc-transform`/the code-gen core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    pub enable: bool,
    pub interval: Option<f64>,
    pub file: String,
    pub fields: Option<Vec<String>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable: true,
            interval: None,
            file: "out.csv".to_string(),
            fields: None,
        }
    }
}

impl LoggingConfig {
    #[must_use]
    pub fn effective_interval(&self, execution: &ExecutionConfig) -> f64 {
        self.interval.unwrap_or(execution.step_size)
    }
}

/// The `codegenConfig` contract consumed by every back-end (spec.md §3.8,
/// §6, §8 component 8).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodegenConfig {
    pub indent_size: i32,
    pub execution: ExecutionConfig,
    pub logging: LoggingConfig,
    pub parametrisation_method: ParametrisationMethod,
    pub maximum_inter_transitions: u32,
    pub require_one_intra_transition_per_tick: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            indent_size: 4,
            execution: ExecutionConfig::default(),
            logging: LoggingConfig::default(),
            parametrisation_method: ParametrisationMethod::default(),
            maximum_inter_transitions: 1,
            require_one_intra_transition_per_tick: false,
        }
    }
}

impl CodegenConfig {
    /// Whether [`CodegenConfig::indent_size`] requests tabs rather than
    /// spaces (spec.md §6: "negative means tabs").
    #[must_use]
    pub fn uses_tabs(&self) -> bool {
        self.indent_size < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = CodegenConfig::default();
        assert_eq!(config.indent_size, 4);
        assert!((config.execution.step_size - 0.001).abs() < f64::EPSILON);
        assert!((config.execution.simulation_time - 10.0).abs() < f64::EPSILON);
        assert!(config.logging.enable);
        assert_eq!(
            config.logging.effective_interval(&config.execution),
            config.execution.step_size
        );
        assert_eq!(config.logging.file, "out.csv");
        assert_eq!(
            config.parametrisation_method,
            ParametrisationMethod::CompileTime
        );
        assert_eq!(config.maximum_inter_transitions, 1);
        assert!(!config.require_one_intra_transition_per_tick);
    }

    #[test]
    fn deserializes_partial_document_with_defaults() {
        let yaml = "indentSize: 2\nexecution:\n  stepSize: 0.01\n";
        let config: CodegenConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.indent_size, 2);
        assert!((config.execution.step_size - 0.01).abs() < f64::EPSILON);
        assert!((config.execution.simulation_time - 10.0).abs() < f64::EPSILON);
        assert!(config.logging.enable);
    }
}
