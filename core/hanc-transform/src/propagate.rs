//! Parameter propagation (spec.md §4.5 step 1).
//!
//! "For each Instance, evaluate its parameter expressions in the
//! enclosing scope and push the results into a clone of the referenced
//! Definition via `setParameter`." Under COMPILE_TIME this produces one
//! specialised [`Definition`] per Instance; under RUN_TIME, Instances keep
//! their raw parameter expressions and the back-end is responsible for
//! writing them into the runtime struct at init — so this module is only
//! consulted when `codegen_config.parametrisation_method` is
//! `CompileTime` (the call site in `apps/hanc` makes that choice).

use hanc_formula::{evaluate, set_parameter, Env, Formula, Value};
use hanc_ir::{Definition, DefinitionEntry, Location, Network, Transition, Variable};
use indexmap::IndexMap;

use crate::errors::TransformError;

/// One specialised [`Definition`] per Instance, keyed by instance name.
pub type SpecialisedDefinitions = IndexMap<String, Definition>;

/// Builds the constant environment instance parameter expressions are
/// evaluated against: every Network input with a literal default.
/// Non-constant or missing defaults are simply absent from the
/// environment, which surfaces as an ordinary `UnresolvedName` evaluation
/// failure if a parameter expression actually needed one.
fn enclosing_env(network: &Network) -> Env {
    let mut env = Env::new();
    for variable in network.inputs.values() {
        if let Some(default) = &variable.default {
            if let Ok(value) = evaluate(default, &Env::new()) {
                env.insert(variable.name.clone(), value);
            }
        }
    }
    env
}

/// Runs parameter propagation over every Instance in `network` whose
/// Definition is a leaf [`hanc_ir::DefinitionEntry::Automaton`] (nested
/// Networks are expected to already be flattened by the time this runs).
pub fn propagate(network: &Network) -> Result<SpecialisedDefinitions, TransformError> {
    let env = enclosing_env(network);
    let mut out = SpecialisedDefinitions::new();
    tracing::debug!(network = %network.name, instances = network.instances.len(), "propagating instance parameters");
    for (instance_name, instance) in &network.instances {
        let Some(DefinitionEntry::Automaton(definition)) =
            network.definitions.get(&instance.definition)
        else {
            continue;
        };
        let mut specialised = definition.clone();
        for (param_name, expr) in &instance.parameters {
            let value = evaluate(expr, &env)?;
            specialised = substitute(&specialised, param_name, &value_formula(value));
        }
        out.insert(instance_name.clone(), specialised);
    }
    Ok(out)
}

fn value_formula(value: Value) -> Formula {
    match value {
        Value::Bool(b) => Formula::bool(b),
        Value::Real(x) => Formula::real(x),
    }
}

/// Applies `setParameter(name, replacement)` to every Formula-bearing
/// field of `definition`: variable defaults/delays, location invariants
/// and flow/update maps, and transition guards/updates.
fn substitute(definition: &Definition, name: &str, replacement: &Formula) -> Definition {
    let mut out = definition.clone();
    for variable in out.variables.values_mut() {
        *variable = substitute_variable(variable, name, replacement);
    }
    for location in out.locations.values_mut() {
        *location = substitute_location(location, name, replacement);
    }
    out
}

fn substitute_variable(variable: &Variable, name: &str, replacement: &Formula) -> Variable {
    let mut out = variable.clone();
    out.default = out.default.map(|f| set_parameter(&f, name, replacement));
    out.delayable_by = out
        .delayable_by
        .map(|f| set_parameter(&f, name, replacement));
    out
}

fn substitute_location(location: &Location, name: &str, replacement: &Formula) -> Location {
    let mut out = location.clone();
    out.invariant = set_parameter(&out.invariant, name, replacement);
    for formula in out.flow.values_mut().chain(out.update.values_mut()) {
        *formula = set_parameter(formula, name, replacement);
    }
    for transition in &mut out.transitions {
        *transition = substitute_transition(transition, name, replacement);
    }
    out
}

fn substitute_transition(transition: &Transition, name: &str, replacement: &Formula) -> Transition {
    let mut out = transition.clone();
    out.guard = set_parameter(&out.guard, name, replacement);
    for formula in out.update.values_mut() {
        *formula = set_parameter(formula, name, replacement);
    }
    out
}
