//! Makefile emission (spec.md §4.6.1): per-target compile rules, an
//! archive step for sub-networks (each nested Network compiles to its own
//! `.a`), and a `clean` target that recurses.

use std::fmt::Write as _;

use hanc_ir::{DefinitionEntry, Network, ParametrisationMethod};

#[must_use]
pub fn emit_makefile(network: &Network) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "CC ?= cc");
    let _ = writeln!(out, "CFLAGS ?= -std=c11 -O2 -Wall");
    out.push('\n');

    let objects = object_paths(network);
    let _ = writeln!(out, "OBJECTS = {}", objects.join(" "));
    out.push('\n');

    let _ = writeln!(out, "runnable: runnable.o $(OBJECTS)");
    let _ = writeln!(out, "\t$(CC) $(CFLAGS) -o runnable runnable.o $(OBJECTS) -lm");
    out.push('\n');
    let _ = writeln!(out, "%.o: %.c");
    let _ = writeln!(out, "\t$(CC) $(CFLAGS) -c $< -o $@");
    out.push('\n');

    let sub_networks: Vec<&str> = network
        .definitions
        .iter()
        .filter_map(|(name, entry)| matches!(entry, DefinitionEntry::Network(_)).then_some(name.as_str()))
        .collect();
    for sub in &sub_networks {
        let stem = hanc_codegen_core::mangle_file_name(sub);
        let _ = writeln!(out, "{stem}.a:");
        let _ = writeln!(out, "\t$(MAKE) -C {stem} archive");
    }
    out.push('\n');

    let _ = writeln!(out, "clean:");
    let _ = writeln!(out, "\trm -f runnable *.o *.a");
    for sub in &sub_networks {
        let stem = hanc_codegen_core::mangle_file_name(sub);
        let _ = writeln!(out, "\t$(MAKE) -C {stem} clean");
    }
    out
}

/// `RUN_TIME` emits one object per Definition at the top level;
/// `COMPILE_TIME` emits one object per Instance, nested under a folder
/// named for the Definition it instantiates (spec.md §4.6.1).
fn object_paths(network: &Network) -> Vec<String> {
    match network.codegen_config.parametrisation_method {
        ParametrisationMethod::RunTime => network
            .definitions
            .values()
            .filter_map(|entry| match entry {
                DefinitionEntry::Automaton(def) => {
                    Some(format!("{}.o", hanc_codegen_core::mangle_file_name(&def.name)))
                }
                DefinitionEntry::Network(_) => None,
            })
            .collect(),
        ParametrisationMethod::CompileTime => network
            .instances
            .iter()
            .filter_map(|(instance_name, instance)| {
                matches!(
                    network.definitions.get(&instance.definition),
                    Some(DefinitionEntry::Automaton(_))
                )
                .then(|| {
                    format!(
                        "{}/{}.o",
                        hanc_codegen_core::mangle_file_name(&instance.definition),
                        hanc_codegen_core::mangle_file_name(instance_name)
                    )
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanc_ir::{Definition, Initialisation};
    use indexmap::IndexMap;

    #[test]
    fn compile_time_makefile_lists_per_instance_objects() {
        let mut network = Network::new("Top");
        let init = Initialisation {
            initial_location: "idle".to_string(),
            valuations: IndexMap::new(),
        };
        let mut def = Definition::new("Gate", init);
        def.add_location(hanc_ir::Location::new("idle")).unwrap();
        network
            .definitions
            .insert("Gate".to_string(), DefinitionEntry::Automaton(def));
        network
            .instances
            .insert("gate1".to_string(), hanc_ir::Instance::new("gate1", "Gate"));

        let makefile = emit_makefile(&network);
        assert!(makefile.contains("gate/gate1.o"));
        assert!(makefile.contains("clean:"));
    }

    #[test]
    fn run_time_makefile_lists_per_definition_objects() {
        let mut network = Network::new("Top");
        let init = Initialisation {
            initial_location: "idle".to_string(),
            valuations: IndexMap::new(),
        };
        let mut def = Definition::new("Gate", init);
        def.add_location(hanc_ir::Location::new("idle")).unwrap();
        network
            .definitions
            .insert("Gate".to_string(), DefinitionEntry::Automaton(def));
        network.codegen_config.parametrisation_method = ParametrisationMethod::RunTime;

        let makefile = emit_makefile(&network);
        assert!(makefile.contains("gate.o"));
    }
}
