//! Third-party biomedical (CellML-style) importer (spec.md §4.4 closing
//! paragraph, SPEC_FULL.md §4.7).
//!
//! `original_source/` carried no retrievable reference for this importer,
//! so its schema is inferred from the spec's own description: it is
//! "architecturally equivalent" to the HAML importer, translating each
//! `<component>` into one [`hanc_ir::Location`], each `<variable>` into a
//! [`hanc_ir::Variable`], and each ODE entry into a `flow` entry on that
//! Location. Connections lower to the same `(destInstance, destPort) ->
//! Formula` mapping table the HAML importer produces, so both importers
//! terminate in the same [`hanc_ir::Network`] shape before Transformations
//! run. A YAML encoding is used (rather than an XML one) since no example
//! in this workspace grounds an XML parsing dependency.

use std::path::Path;

use hanc_ir::{
    Definition, DefinitionEntry, Initialisation, Instance, Location, Locality, Network, Variable,
};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::errors::ImportError;
use crate::schema::VariableSpec;

/// One `<component>`: a bag of variables plus the ODEs driving them.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellComponent {
    #[serde(default)]
    pub variables: IndexMap<String, VariableSpec>,
    /// Variable name -> the Formula text for its derivative.
    #[serde(default)]
    pub math: IndexMap<String, String>,
}

/// Root CellML-style document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellModel {
    pub name: String,
    pub components: IndexMap<String, CellComponent>,
    /// Keyed by `"component.port"`, same shape as a HAML mapping.
    #[serde(default)]
    pub connections: IndexMap<String, String>,
    #[serde(default, rename = "codegenConfig")]
    pub codegen_config: hanc_ir::CodegenConfig,
}

/// Loads and lowers a CellML-style document at `path` into a
/// [`hanc_ir::Network`] with one [`hanc_ir::Instance`] per component.
pub fn import_cellml(path: &Path) -> Result<Network, ImportError> {
    let text = std::fs::read_to_string(path)?;
    let model: CellModel = serde_yaml::from_str(&text)?;
    lower_cell_model(model)
}

const STATE_LOCATION: &str = "state";

fn lower_cell_model(model: CellModel) -> Result<Network, ImportError> {
    let mut network = Network::new(model.name);
    for (component_name, component) in model.components {
        let definition = lower_component(component_name.clone(), component)?;
        network
            .definitions
            .insert(component_name.clone(), DefinitionEntry::Automaton(definition));
        network.instances.insert(
            component_name.clone(),
            Instance::new(component_name.clone(), component_name),
        );
    }
    for (key, formula_text) in model.connections {
        let target = match key.rsplit_once('.') {
            Some((instance, port)) => hanc_ir::MappingTarget::on_instance(instance, port),
            None => hanc_ir::MappingTarget::top_level(key),
        };
        network
            .mappings
            .insert(target, hanc_formula::parse(&formula_text)?);
    }
    network.codegen_config = model.codegen_config;
    Ok(network)
}

fn lower_component(name: String, component: CellComponent) -> Result<Definition, ImportError> {
    let init = Initialisation {
        initial_location: STATE_LOCATION.to_string(),
        valuations: IndexMap::new(),
    };
    let mut definition = Definition::new(name, init);

    let mut location = Location::new(STATE_LOCATION);
    for (variable_name, formula_text) in component.math {
        location
            .flow
            .insert(variable_name, hanc_formula::parse(&formula_text)?);
    }
    definition.add_location(location)?;

    for (variable_name, spec) in component.variables {
        let locality = if definition
            .locations
            .get(STATE_LOCATION)
            .is_some_and(|loc| loc.flow.contains_key(&variable_name))
        {
            Locality::Internal
        } else {
            Locality::ExternalOutput
        };
        definition.add_variable(lower_cellml_variable(variable_name, spec, locality)?)?;
    }

    definition.validate()?;
    Ok(definition)
}

fn lower_cellml_variable(
    name: String,
    spec: VariableSpec,
    locality: Locality,
) -> Result<Variable, ImportError> {
    match spec {
        VariableSpec::Shorthand(type_name) => Ok(Variable::new(
            name,
            lower_cellml_var_type(&type_name)?,
            locality,
        )),
        VariableSpec::Full(body) => {
            let mut variable = Variable::new(name, lower_cellml_var_type(&body.var_type)?, locality);
            if let Some(default) = &body.default {
                variable = variable.with_default(hanc_formula::parse(default)?);
            }
            Ok(variable)
        }
    }
}

fn lower_cellml_var_type(s: &str) -> Result<hanc_formula::VarType, ImportError> {
    match s {
        "REAL" => Ok(hanc_formula::VarType::Real),
        "BOOLEAN" => Ok(hanc_formula::VarType::Boolean),
        other => Err(ImportError::InvalidVariableType {
            found: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowers_single_component_with_one_flow_variable() {
        let yaml = "\
name: Cell
components:
  sa_node:
    variables:
      voltage: REAL
    math:
      voltage: \"-0.1 * voltage\"
connections: {}
";
        let model: CellModel = serde_yaml::from_str(yaml).unwrap();
        let network = lower_cell_model(model).unwrap();
        assert_eq!(network.instances.len(), 1);
        let DefinitionEntry::Automaton(def) = &network.definitions["sa_node"] else {
            panic!("expected automaton");
        };
        assert_eq!(def.locations.len(), 1);
        assert!(def.locations[STATE_LOCATION].flow.contains_key("voltage"));
        assert_eq!(
            def.variables["voltage"].locality,
            Locality::Internal
        );
    }
}
