//! Lowers the raw [`crate::schema`] types into [`hanc_ir`] (spec.md §4.4).

use hanc_formula::{Formula, VarType};
use hanc_ir::{
    CodegenConfig, Definition, DefinitionEntry, FunctionDef, Initialisation, Instance, Location,
    Locality, MappingTarget, Network, Transition, Variable,
};
use indexmap::IndexMap;

use crate::errors::ImportError;
use crate::schema::{
    DefinitionEntrySpec, DefinitionSpec, FunctionSpec, HamlDocument, InstanceSpec, LocationSpec,
    NetworkBodySpec, TransitionSpec, VariableSpec,
};

pub fn lower_document(doc: HamlDocument) -> Result<Network, ImportError> {
    lower_network(
        doc.name,
        doc.inputs,
        doc.outputs,
        doc.definitions,
        doc.instances,
        doc.mappings,
        doc.codegen_config,
    )
}

fn lower_network_body(name: String, body: NetworkBodySpec) -> Result<Network, ImportError> {
    lower_network(
        name,
        body.inputs,
        body.outputs,
        body.definitions,
        body.instances,
        body.mappings,
        body.codegen_config,
    )
}

#[allow(clippy::too_many_arguments)]
fn lower_network(
    name: String,
    inputs: IndexMap<String, VariableSpec>,
    outputs: IndexMap<String, VariableSpec>,
    definitions: IndexMap<String, DefinitionEntrySpec>,
    instances: IndexMap<String, InstanceSpec>,
    mappings: IndexMap<String, String>,
    codegen_config: CodegenConfig,
) -> Result<Network, ImportError> {
    let mut network = Network::new(name);
    network.inputs = lower_variables(inputs, Locality::ExternalInput)?;
    network.outputs = lower_variables(outputs, Locality::ExternalOutput)?;
    for (name, entry) in definitions {
        let entry = lower_definition_entry(name.clone(), entry)?;
        network.definitions.insert(name, entry);
    }
    for (name, spec) in instances {
        let instance = lower_instance(name.clone(), spec)?;
        network.instances.insert(name, instance);
    }
    for (key, formula_text) in mappings {
        let target = parse_mapping_target(&key);
        network.mappings.insert(target, hanc_formula::parse(&formula_text)?);
    }
    network.codegen_config = codegen_config;
    Ok(network)
}

fn lower_definition_entry(
    name: String,
    entry: DefinitionEntrySpec,
) -> Result<DefinitionEntry, ImportError> {
    match entry {
        DefinitionEntrySpec::Automaton(spec) => {
            Ok(DefinitionEntry::Automaton(lower_definition(name, spec)?))
        }
        DefinitionEntrySpec::Network(body) => Ok(DefinitionEntry::Network(Box::new(
            lower_network_body(name, body)?,
        ))),
    }
}

fn lower_definition(name: String, spec: DefinitionSpec) -> Result<Definition, ImportError> {
    let init = Initialisation {
        initial_location: spec.init.location,
        valuations: lower_formula_map(spec.init.valuations)?,
    };
    let mut def = Definition::new(name, init);
    for (var_name, var_spec) in spec.inputs {
        def.add_variable(lower_variable(var_name, var_spec, Locality::ExternalInput)?)?;
    }
    for (var_name, var_spec) in spec.outputs {
        def.add_variable(lower_variable(
            var_name,
            var_spec,
            Locality::ExternalOutput,
        )?)?;
    }
    for (var_name, var_spec) in spec.parameters {
        def.add_variable(lower_variable(var_name, var_spec, Locality::Parameter)?)?;
    }
    for (var_name, var_spec) in spec.internals {
        def.add_variable(lower_variable(var_name, var_spec, Locality::Internal)?)?;
    }
    for (loc_name, loc_spec) in spec.locations {
        def.add_location(lower_location(loc_name, loc_spec)?)?;
    }
    for (fn_name, fn_spec) in spec.functions {
        def.functions.insert(fn_name, lower_function(fn_spec)?);
    }
    def.validate()?;
    Ok(def)
}

fn lower_variable(
    name: String,
    spec: VariableSpec,
    locality: Locality,
) -> Result<Variable, ImportError> {
    match spec {
        VariableSpec::Shorthand(type_name) => {
            Ok(Variable::new(name, lower_var_type(&type_name)?, locality))
        }
        VariableSpec::Full(body) => {
            let mut variable = Variable::new(name, lower_var_type(&body.var_type)?, locality);
            if let Some(default) = &body.default {
                variable = variable.with_default(hanc_formula::parse(default)?);
            }
            if let Some(delay) = &body.delayable_by {
                variable = variable.with_delayable_by(hanc_formula::parse(delay)?);
            }
            Ok(variable)
        }
    }
}

fn lower_variables(
    specs: IndexMap<String, VariableSpec>,
    locality: Locality,
) -> Result<IndexMap<String, Variable>, ImportError> {
    let mut out = IndexMap::new();
    for (name, spec) in specs {
        out.insert(name.clone(), lower_variable(name, spec, locality)?);
    }
    Ok(out)
}

fn lower_location(name: String, spec: LocationSpec) -> Result<Location, ImportError> {
    let mut location = Location::new(name);
    if let Some(invariant) = &spec.invariant {
        location.invariant = hanc_formula::parse(invariant)?;
    }
    location.flow = lower_formula_map(spec.flow)?;
    location.update = lower_formula_map(spec.update)?;
    for transition in spec.transitions {
        location.transitions.push(lower_transition(transition)?);
    }
    Ok(location)
}

fn lower_transition(spec: TransitionSpec) -> Result<Transition, ImportError> {
    let guard = match &spec.guard {
        Some(guard) => hanc_formula::parse(guard)?,
        None => Formula::bool(true),
    };
    let mut transition = Transition::new(spec.target, guard);
    transition.update = lower_formula_map(spec.update)?;
    Ok(transition)
}

fn lower_function(spec: FunctionSpec) -> Result<FunctionDef, ImportError> {
    let mut inputs = Vec::with_capacity(spec.inputs.len());
    for (name, type_name) in spec.inputs {
        inputs.push((name, lower_var_type(&type_name)?));
    }
    let body = hanc_program::parse(&spec.body)?;
    Ok(FunctionDef { inputs, body })
}

fn lower_instance(name: String, spec: InstanceSpec) -> Result<Instance, ImportError> {
    let mut instance = Instance::new(name, spec.definition);
    for (param_name, formula_text) in spec.parameters {
        instance
            .parameters
            .insert(param_name, hanc_formula::parse(&formula_text)?);
    }
    Ok(instance)
}

fn lower_formula_map(
    raw: IndexMap<String, String>,
) -> Result<IndexMap<String, Formula>, ImportError> {
    let mut out = IndexMap::new();
    for (name, text) in raw {
        out.insert(name, hanc_formula::parse(&text)?);
    }
    Ok(out)
}

/// Splits `"instance.port"` on the last dot (spec.md §4.4: mappings are
/// keyed by `(destInstance, destPort)`); a bare name with no dot is a
/// top-level port.
fn parse_mapping_target(key: &str) -> MappingTarget {
    match key.rsplit_once('.') {
        Some((instance, port)) => MappingTarget::on_instance(instance, port),
        None => MappingTarget::top_level(key),
    }
}

fn lower_var_type(s: &str) -> Result<VarType, ImportError> {
    match s {
        "REAL" => Ok(VarType::Real),
        "BOOLEAN" => Ok(VarType::Boolean),
        other => Err(ImportError::InvalidVariableType {
            found: other.to_string(),
        }),
    }
}
