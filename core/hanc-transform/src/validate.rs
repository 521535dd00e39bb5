//! Semantic validation of an imported [`hanc_ir::Network`] (spec.md §3.6
//! invariant, §4.5, §7).
//!
//! Validation errors accumulate per Definition so one invocation reports
//! every problem instead of stopping at the first (spec.md §7:
//! "Validation errors are accumulated per Definition"). Structural
//! invariants a [`hanc_ir::Definition`] can check alone
//! (`hanc_ir::Definition::validate`) have already run by the time the
//! importer hands a Network here; this pass adds the checks that need the
//! whole Network in scope.

use std::collections::HashMap;

use hanc_formula::{result_type, FuncTypes, VarType};
use hanc_ir::{Definition, DefinitionEntry, Network};

use crate::errors::TransformError;

/// Runs every cross-Definition semantic check against `network`, returning
/// every failure found rather than stopping at the first.
pub fn validate(network: &Network) -> Vec<TransformError> {
    let mut errors = Vec::new();
    for entry in network.definitions.values() {
        match entry {
            DefinitionEntry::Automaton(def) => validate_definition(def, &mut errors),
            DefinitionEntry::Network(inner) => errors.extend(validate(inner)),
        }
    }
    for (instance_name, instance) in &network.instances {
        if !network.definitions.contains_key(&instance.definition) {
            errors.push(TransformError::UnknownDefinition {
                instance: instance_name.clone(),
                definition: instance.definition.clone(),
            });
        }
    }
    for (target, formula) in &network.mappings {
        if let Some(instance_name) = &target.instance {
            match network.instances.get(instance_name) {
                None => errors.push(TransformError::UnresolvedMapping {
                    target: format!("{instance_name}.{}", target.port),
                }),
                Some(instance) if !port_exists(network, &instance.definition, &target.port) => {
                    errors.push(TransformError::UnresolvedMapping {
                        target: format!("{instance_name}.{}", target.port),
                    });
                }
                Some(_) => {}
            }
        }
        check_source_ports(network, formula, &mut errors);
    }
    errors
}

/// A mapping's value may itself reference `instance.port` (spec.md §4.4:
/// "Ports referenced on either side must resolve"). Every dotted free
/// variable in `formula` is resolved the same way a mapping's destination
/// is, so a source naming a nonexistent instance or port is reported too.
fn check_source_ports(network: &Network, formula: &hanc_formula::Formula, errors: &mut Vec<TransformError>) {
    for name in formula.free_variables() {
        let Some((instance_name, port)) = name.split_once('.') else {
            continue;
        };
        match network.instances.get(instance_name) {
            None => errors.push(TransformError::UnresolvedMapping {
                target: name.clone(),
            }),
            Some(instance) if !port_exists(network, &instance.definition, port) => {
                errors.push(TransformError::UnresolvedMapping { target: name.clone() });
            }
            Some(_) => {}
        }
    }
}

/// Whether `port` names a declared variable/top-level input-or-output on
/// the Definition or nested Network keyed by `definition_name`.
fn port_exists(network: &Network, definition_name: &str, port: &str) -> bool {
    match network.definitions.get(definition_name) {
        Some(DefinitionEntry::Automaton(def)) => def.variables.contains_key(port),
        Some(DefinitionEntry::Network(inner)) => {
            inner.inputs.contains_key(port) || inner.outputs.contains_key(port)
        }
        None => true, // reported separately as UnknownDefinition
    }
}

fn validate_definition(def: &Definition, errors: &mut Vec<TransformError>) {
    let var_types: HashMap<String, VarType> = def
        .variables
        .values()
        .map(|v| (v.name.clone(), v.var_type))
        .collect();
    let func_types: FuncTypes = def
        .functions
        .iter()
        .filter_map(|(name, f)| {
            let inputs: HashMap<String, VarType> = f.inputs.iter().cloned().collect();
            hanc_program::return_type(&f.body, &combined(&var_types, &inputs), &FuncTypes::new())
                .ok()
                .flatten()
                .map(|ty| (name.clone(), ty))
        })
        .collect();

    let mut check = |formula: &hanc_formula::Formula| {
        if let Err(source) = result_type(formula, &var_types, &func_types) {
            errors.push(TransformError::UnresolvedName {
                definition: def.name.clone(),
                source,
            });
        }
    };

    for variable in def.variables.values() {
        if let Some(default) = &variable.default {
            check(default);
        }
        if let Some(delay) = &variable.delayable_by {
            check(delay);
        }
    }
    for location in def.locations.values() {
        check(&location.invariant);
        for formula in location.flow.values().chain(location.update.values()) {
            check(formula);
        }
        for transition in &location.transitions {
            if !def.locations.contains_key(&transition.target) {
                errors.push(TransformError::UnknownTransitionTarget {
                    definition: def.name.clone(),
                    location: transition.target.clone(),
                });
            }
            check(&transition.guard);
            for formula in transition.update.values() {
                check(formula);
            }
        }
    }
    for function in def.functions.values() {
        let inputs: HashMap<String, VarType> = function.inputs.iter().cloned().collect();
        let scope = combined(&var_types, &inputs);
        if let Err(source) = hanc_program::collect_variables(&function.body, &scope, &func_types) {
            errors.push(TransformError::FunctionBody {
                definition: def.name.clone(),
                source,
            });
        }
    }
}

fn combined(
    base: &HashMap<String, VarType>,
    extra: &HashMap<String, VarType>,
) -> HashMap<String, VarType> {
    let mut out = base.clone();
    out.extend(extra.clone());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanc_ir::{Initialisation, Instance, Location, Locality, MappingTarget, Variable};
    use indexmap::IndexMap;

    fn simple_network() -> Network {
        let init = Initialisation {
            initial_location: "idle".to_string(),
            valuations: IndexMap::new(),
        };
        let mut def = Definition::new("Gate", init);
        def.add_variable(Variable::new("x", VarType::Real, Locality::Internal))
            .unwrap();
        let mut loc = Location::new("idle");
        loc.flow
            .insert("x".to_string(), hanc_formula::parse("1.0").unwrap());
        def.add_location(loc).unwrap();

        let mut network = Network::new("Top");
        network
            .definitions
            .insert("Gate".to_string(), DefinitionEntry::Automaton(def));
        network
            .instances
            .insert("gate".to_string(), Instance::new("gate", "Gate"));
        network
    }

    #[test]
    fn well_formed_network_has_no_errors() {
        assert!(validate(&simple_network()).is_empty());
    }

    #[test]
    fn unresolved_name_in_flow_is_reported() {
        let mut network = simple_network();
        if let DefinitionEntry::Automaton(def) = network.definitions.get_mut("Gate").unwrap() {
            def.locations
                .get_mut("idle")
                .unwrap()
                .flow
                .insert("x".to_string(), hanc_formula::parse("y + 1").unwrap());
        }
        let errors = validate(&network);
        assert!(errors
            .iter()
            .any(|e| matches!(e, TransformError::UnresolvedName { .. })));
    }

    #[test]
    fn instance_referencing_unknown_definition_is_reported() {
        let mut network = simple_network();
        network
            .instances
            .insert("ghost".to_string(), Instance::new("ghost", "Nonexistent"));
        let errors = validate(&network);
        assert!(errors
            .iter()
            .any(|e| matches!(e, TransformError::UnknownDefinition { .. })));
    }

    #[test]
    fn mapping_to_unknown_instance_is_reported() {
        let mut network = simple_network();
        network.mappings.insert(
            MappingTarget::on_instance("missing", "field"),
            hanc_formula::Formula::real(1.0),
        );
        let errors = validate(&network);
        assert!(errors
            .iter()
            .any(|e| matches!(e, TransformError::UnresolvedMapping { .. })));
    }

    #[test]
    fn mapping_source_referencing_nonexistent_port_is_reported() {
        let mut network = simple_network();
        network.mappings.insert(
            MappingTarget::on_instance("gate", "x"),
            hanc_formula::parse("gate.nonexistent").unwrap(),
        );
        let errors = validate(&network);
        assert!(errors.iter().any(
            |e| matches!(e, TransformError::UnresolvedMapping { target } if target == "gate.nonexistent")
        ));
    }

    #[test]
    fn mapping_source_referencing_unknown_instance_is_reported() {
        let mut network = simple_network();
        network.mappings.insert(
            MappingTarget::on_instance("gate", "x"),
            hanc_formula::parse("ghost.field").unwrap(),
        );
        let errors = validate(&network);
        assert!(errors.iter().any(
            |e| matches!(e, TransformError::UnresolvedMapping { target } if target == "ghost.field")
        ));
    }

    #[test]
    fn mapping_to_nonexistent_port_on_known_instance_is_reported() {
        let mut network = simple_network();
        network.mappings.insert(
            MappingTarget::on_instance("gate", "nonexistent"),
            hanc_formula::Formula::real(1.0),
        );
        let errors = validate(&network);
        assert!(errors
            .iter()
            .any(|e| matches!(e, TransformError::UnresolvedMapping { target } if target == "gate.nonexistent")));
    }
}
