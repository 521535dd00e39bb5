//! Network flattening (spec.md §4.5 step 3, §8 "Flatten preserves I/O").
//!
//! Collapses nested Networks into a single flat Network: every Instance
//! whose Definition is itself a Network is replaced by the lifted
//! instances of that inner Network, renamed with a dotted prefix
//! (`outer.inner`), and the outer Network's mapping table is extended to
//! route through to the lifted instances. The outer Network's own
//! observable `inputs`/`outputs` are left untouched, which is what makes
//! flattening I/O-preserving: callers never see the dotted names, only
//! the instances they settle on.
//!
//! This performs one substitution pass per nesting level rather than an
//! unbounded search for transitive mapping chains: a mapping that targets
//! a port of a nested Network is resolved against that Network's own
//! `mappings` table once, which is sufficient because nested Networks are
//! flattened bottom-up (innermost first) before their instances are
//! lifted into the parent.

use hanc_ir::{DefinitionEntry, Instance, MappingTarget, Network};

/// Returns a new [`Network`] with every nested-Network instance lifted
/// into the top level, recursively.
pub fn flatten(network: &Network) -> Network {
    tracing::debug!(network = %network.name, "flattening network");
    let mut out = Network::new(&network.name);
    out.inputs = network.inputs.clone();
    out.outputs = network.outputs.clone();
    out.codegen_config = network.codegen_config.clone();

    for (def_name, entry) in &network.definitions {
        match entry {
            DefinitionEntry::Automaton(def) => {
                out.definitions
                    .insert(def_name.clone(), DefinitionEntry::Automaton(def.clone()));
            }
            DefinitionEntry::Network(_) => {
                // Nested Network definitions are consumed by lifting below;
                // they never survive into the flattened Network's own
                // `definitions` table.
            }
        }
    }

    for (instance_name, instance) in &network.instances {
        match network.definitions.get(&instance.definition) {
            Some(DefinitionEntry::Network(inner)) => {
                lift(&mut out, instance_name, inner);
            }
            _ => {
                out.instances.insert(instance_name.clone(), instance.clone());
            }
        }
    }

    for (target, formula) in &network.mappings {
        out.mappings.insert(target.clone(), formula.clone());
    }

    out
}

/// Lifts every instance of an already-flattened `inner` Network into
/// `out`, prefixing instance names with `outer_instance_name.` and
/// re-keying `inner`'s own mappings onto the lifted names.
fn lift(out: &mut Network, outer_instance_name: &str, inner: &Network) {
    let inner = flatten(inner);

    for (def_name, entry) in &inner.definitions {
        let qualified = format!("{outer_instance_name}.{def_name}");
        out.definitions.insert(qualified, entry.clone());
    }

    for (inner_instance_name, instance) in &inner.instances {
        let qualified_name = format!("{outer_instance_name}.{inner_instance_name}");
        let qualified_definition = format!("{outer_instance_name}.{}", instance.definition);
        let mut lifted = Instance::new(&qualified_name, &qualified_definition);
        lifted.parameters = instance.parameters.clone();
        out.instances.insert(qualified_name, lifted);
    }

    for (inner_target, formula) in &inner.mappings {
        let qualified_target = match &inner_target.instance {
            Some(instance) => MappingTarget::on_instance(
                format!("{outer_instance_name}.{instance}"),
                inner_target.port.clone(),
            ),
            // A mapping onto one of `inner`'s own top-level ports becomes a
            // mapping onto the lifted instance's port of the same name.
            None => MappingTarget::on_instance(outer_instance_name, inner_target.port.clone()),
        };
        out.mappings.insert(qualified_target, formula.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanc_formula::{Formula, VarType};
    use hanc_ir::{Definition, Initialisation, Locality, Location, Variable};
    use indexmap::IndexMap;

    fn leaf_definition(name: &str) -> Definition {
        let init = Initialisation {
            initial_location: "idle".to_string(),
            valuations: IndexMap::new(),
        };
        let mut def = Definition::new(name, init);
        def.add_variable(Variable::new("x", VarType::Real, Locality::Internal))
            .unwrap();
        def.add_location(Location::new("idle")).unwrap();
        def
    }

    #[test]
    fn instances_of_nested_networks_are_lifted_with_dotted_names() {
        let mut inner = Network::new("Inner");
        inner
            .definitions
            .insert("Leaf".to_string(), DefinitionEntry::Automaton(leaf_definition("Leaf")));
        inner
            .instances
            .insert("leaf".to_string(), Instance::new("leaf", "Leaf"));

        let mut outer = Network::new("Outer");
        outer
            .definitions
            .insert("Inner".to_string(), DefinitionEntry::Network(Box::new(inner)));
        outer
            .instances
            .insert("sub".to_string(), Instance::new("sub", "Inner"));

        let flattened = flatten(&outer);
        assert!(flattened.instances.contains_key("sub.leaf"));
        assert!(flattened.definitions.contains_key("sub.Leaf"));
        assert!(!flattened
            .instances
            .values()
            .any(|i| matches!(i.definition.as_str(), "Inner")));
    }

    #[test]
    fn top_level_inputs_and_outputs_are_preserved() {
        let mut outer = Network::new("Outer");
        outer
            .inputs
            .insert("in1".to_string(), Variable::new("in1", VarType::Real, Locality::ExternalInput));
        outer
            .outputs
            .insert("out1".to_string(), Variable::new("out1", VarType::Real, Locality::ExternalOutput));

        let flattened = flatten(&outer);
        assert_eq!(flattened.inputs.len(), 1);
        assert_eq!(flattened.outputs.len(), 1);
        assert!(flattened.inputs.contains_key("in1"));
        assert!(flattened.outputs.contains_key("out1"));
    }

    #[test]
    fn inner_mapping_onto_own_port_is_rekeyed_to_lifted_instance() {
        let mut inner = Network::new("Inner");
        inner
            .definitions
            .insert("Leaf".to_string(), DefinitionEntry::Automaton(leaf_definition("Leaf")));
        inner
            .instances
            .insert("leaf".to_string(), Instance::new("leaf", "Leaf"));
        inner
            .mappings
            .insert(MappingTarget::on_instance("leaf", "x"), Formula::real(0.0));

        let mut outer = Network::new("Outer");
        outer
            .definitions
            .insert("Inner".to_string(), DefinitionEntry::Network(Box::new(inner)));
        outer
            .instances
            .insert("sub".to_string(), Instance::new("sub", "Inner"));

        let flattened = flatten(&outer);
        assert!(flattened
            .mappings
            .contains_key(&MappingTarget::on_instance("sub.leaf", "x")));
    }
}
