use hanc_formula::Formula;
use indexmap::IndexMap;

use crate::config::CodegenConfig;
use crate::definition::Definition;
use crate::instance::Instance;
use crate::variable::Variable;

/// A key into [`Network::definitions`]: recursion is allowed, so an entry
/// may itself be a nested [`Network`] rather than a leaf [`Definition`]
/// (spec.md §3.8, §9 "Recursive IR with back-references").
#[derive(Clone, Debug, PartialEq)]
pub enum DefinitionEntry {
    Automaton(Definition),
    Network(Box<Network>),
}

impl DefinitionEntry {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            DefinitionEntry::Automaton(d) => &d.name,
            DefinitionEntry::Network(n) => &n.name,
        }
    }
}

/// The destination side of an I/O mapping: an `instance.port` pair, or a
/// top-level port when `instance` is `None` (spec.md §3.8, §6).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MappingTarget {
    pub instance: Option<String>,
    pub port: String,
}

impl MappingTarget {
    #[must_use]
    pub fn top_level(port: impl Into<String>) -> Self {
        Self {
            instance: None,
            port: port.into(),
        }
    }

    #[must_use]
    pub fn on_instance(instance: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            instance: Some(instance.into()),
            port: port.into(),
        }
    }
}

/// A composition of Hybrid Automata (and nested Networks) connected by
/// port-to-port mappings (spec.md §3.8).
#[derive(Clone, Debug, PartialEq)]
pub struct Network {
    pub name: String,
    pub inputs: IndexMap<String, Variable>,
    pub outputs: IndexMap<String, Variable>,
    pub definitions: IndexMap<String, DefinitionEntry>,
    pub instances: IndexMap<String, Instance>,
    pub mappings: IndexMap<MappingTarget, Formula>,
    pub codegen_config: CodegenConfig,
}

impl Network {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: IndexMap::new(),
            outputs: IndexMap::new(),
            definitions: IndexMap::new(),
            instances: IndexMap::new(),
            mappings: IndexMap::new(),
            codegen_config: CodegenConfig::default(),
        }
    }

    /// All `instance.port` dotted names declared as logging fields, or
    /// (when `logging.fields` is unset) every output port of every
    /// [`Instance`] whose underlying [`Definition`] has external outputs,
    /// in declaration order (spec.md §6: "default all outputs of all
    /// Instances").
    #[must_use]
    pub fn logging_fields(&self) -> Vec<String> {
        if let Some(fields) = &self.codegen_config.logging.fields {
            return fields.clone();
        }
        let mut fields = Vec::new();
        for (instance_name, instance) in &self.instances {
            let Some(entry) = self.definitions.get(&instance.definition) else {
                continue;
            };
            if let DefinitionEntry::Automaton(definition) = entry {
                for variable in
                    definition.variables_with_locality(crate::variable::Locality::ExternalOutput)
                {
                    fields.push(format!("{instance_name}.{}", variable.name));
                }
            }
        }
        fields
    }
}
