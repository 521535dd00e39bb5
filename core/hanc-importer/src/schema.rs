//! Raw, `serde`-deserialisable mirror of the HAML document shape (spec.md
//! §6). `lower.rs` turns these into [`hanc_ir`] types, parsing every
//! Formula/Program-bearing string field along the way.

use indexmap::IndexMap;
use serde::Deserialize;

/// A variable entry: either the bare-type-name shorthand or a full object
/// (spec.md §4.4 "Variable-definition shorthand").
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum VariableSpec {
    Shorthand(String),
    Full(VariableSpecBody),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableSpecBody {
    #[serde(rename = "type")]
    pub var_type: String,
    pub default: Option<String>,
    #[serde(rename = "delayableBy")]
    pub delayable_by: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionSpec {
    pub target: String,
    pub guard: Option<String>,
    #[serde(default)]
    pub update: IndexMap<String, String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LocationSpec {
    pub invariant: Option<String>,
    #[serde(default)]
    pub flow: IndexMap<String, String>,
    #[serde(default)]
    pub update: IndexMap<String, String>,
    #[serde(default)]
    pub transitions: Vec<TransitionSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionSpec {
    #[serde(default)]
    pub inputs: IndexMap<String, String>,
    pub body: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitSpec {
    pub location: String,
    #[serde(default)]
    pub valuations: IndexMap<String, String>,
}

/// An Automaton-shaped definition body (spec.md §3.6).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefinitionSpec {
    #[serde(default)]
    pub inputs: IndexMap<String, VariableSpec>,
    #[serde(default)]
    pub outputs: IndexMap<String, VariableSpec>,
    #[serde(default)]
    pub parameters: IndexMap<String, VariableSpec>,
    #[serde(default)]
    pub internals: IndexMap<String, VariableSpec>,
    #[serde(default)]
    pub locations: IndexMap<String, LocationSpec>,
    #[serde(default)]
    pub functions: IndexMap<String, FunctionSpec>,
    pub init: InitSpec,
}

/// A Network-shaped definition body (spec.md §3.8): a `definitions` map
/// nested one level down, without an `init` field (the discriminator
/// `DefinitionEntrySpec` relies on to tell the two shapes apart).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkBodySpec {
    #[serde(default)]
    pub inputs: IndexMap<String, VariableSpec>,
    #[serde(default)]
    pub outputs: IndexMap<String, VariableSpec>,
    pub definitions: IndexMap<String, DefinitionEntrySpec>,
    #[serde(default)]
    pub instances: IndexMap<String, InstanceSpec>,
    #[serde(default)]
    pub mappings: IndexMap<String, String>,
    #[serde(default, rename = "codegenConfig")]
    pub codegen_config: hanc_ir::CodegenConfig,
}

/// One entry of a `definitions` map: either a nested Network or a leaf
/// Automaton (spec.md §3.8 "recursion is allowed"). Tried in this order so
/// that a body with no `init` field lowers to a Network rather than
/// failing as a malformed Automaton.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DefinitionEntrySpec {
    Network(NetworkBodySpec),
    Automaton(DefinitionSpec),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceSpec {
    #[serde(rename = "type")]
    pub definition: String,
    #[serde(default)]
    pub parameters: IndexMap<String, String>,
}

/// Root HAML document (spec.md §6 "Input schema (HAML, root)"). Shaped
/// like [`NetworkBodySpec`] plus the required top-level `name`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HamlDocument {
    pub name: String,
    #[serde(default)]
    pub inputs: IndexMap<String, VariableSpec>,
    #[serde(default)]
    pub outputs: IndexMap<String, VariableSpec>,
    #[serde(default)]
    pub definitions: IndexMap<String, DefinitionEntrySpec>,
    #[serde(default)]
    pub instances: IndexMap<String, InstanceSpec>,
    /// Keyed by `"instance.port"` (spec.md §4.4 "Mappings are stored as
    /// `(destInstance, destPort) -> Formula`"); split on the last `.` in
    /// `lower.rs`.
    #[serde(default)]
    pub mappings: IndexMap<String, String>,
    #[serde(default, rename = "codegenConfig")]
    pub codegen_config: hanc_ir::CodegenConfig,
}
