#![warn(clippy::pedantic)]
//! Portable C back-end (spec.md §4.6.1).
//!
//! Parametrisation strategies differ only in file layout: COMPILE_TIME
//! writes one source pair per Instance under a folder per Definition,
//! with each Instance's parameters inlined via
//! [`hanc_transform::propagate`]; RUN_TIME writes one source pair per
//! Definition and has the runnable write parameter values into each
//! Instance's struct right after `_init`.

mod definition;
mod makefile;
mod network;
mod render;

use std::fs;
use std::path::Path;

use hanc_codegen_core::{mangle_file_name, Backend, CodegenError};
use hanc_ir::{CodegenConfig, DefinitionEntry, ParametrisationMethod};

pub use definition::{emit_definition, DefinitionUnit};
pub use network::{emit_runnable, RunnableUnit};

pub struct CBackend;

impl Backend for CBackend {
    fn generate(
        &self,
        network: &hanc_ir::Network,
        config: &CodegenConfig,
        out_dir: &Path,
    ) -> Result<(), CodegenError> {
        fs::create_dir_all(out_dir).map_err(|source| io_error(out_dir, source))?;
        generate_into(network, config, out_dir)
    }
}

fn generate_into(
    network: &hanc_ir::Network,
    config: &CodegenConfig,
    out_dir: &Path,
) -> Result<(), CodegenError> {
    // Nested Networks compile leaves-first into their own sub-directory,
    // each with its own Makefile producing a `.a` (spec.md §5, §4.6.1).
    for (name, entry) in &network.definitions {
        if let DefinitionEntry::Network(inner) = entry {
            let sub_dir = out_dir.join(mangle_file_name(name));
            fs::create_dir_all(&sub_dir).map_err(|source| io_error(&sub_dir, source))?;
            generate_into(inner, &inner.codegen_config, &sub_dir)?;
        }
    }

    match config.parametrisation_method {
        ParametrisationMethod::CompileTime => emit_compile_time(network, config, out_dir)?,
        ParametrisationMethod::RunTime => emit_run_time(network, config, out_dir)?,
    }

    let runnable = emit_runnable(network, config);
    write_file(out_dir, "config.h", &runnable.config_header)?;
    write_file(out_dir, "runnable.h", &runnable.runnable_header)?;
    write_file(out_dir, "runnable.c", &runnable.runnable_body)?;
    write_file(out_dir, "Makefile", &makefile::emit_makefile(network))?;
    Ok(())
}

/// RUN_TIME: one source pair per Definition, shared by every Instance of
/// it; parameters are written into each Instance's struct at runtime by
/// the runnable (spec.md §4.5 step 1: "Definitions are shared and
/// parameter values live on each Instance's runtime struct").
fn emit_run_time(
    network: &hanc_ir::Network,
    config: &CodegenConfig,
    out_dir: &Path,
) -> Result<(), CodegenError> {
    let delay_plans = hanc_transform::compute_delay_plans(network, config.execution.step_size)
        .map_err(|e| CodegenError::Transform(e.to_string()))?;
    let empty = hanc_transform::DelayPlan::new();
    for (name, entry) in &network.definitions {
        if let DefinitionEntry::Automaton(def) = entry {
            let plan = delay_plans.get(name).unwrap_or(&empty);
            let unit = emit_definition(def, config, plan);
            write_file(out_dir, &format!("{}.h", unit.type_name), &unit.header)?;
            write_file(out_dir, &format!("{}.c", unit.type_name), &unit.body)?;
        }
    }
    Ok(())
}

/// COMPILE_TIME: each Instance gets its own specialised Definition (every
/// instance parameter Formula substituted in by
/// [`hanc_transform::propagate`]), emitted under a folder named for the
/// Definition it instantiates.
fn emit_compile_time(
    network: &hanc_ir::Network,
    config: &CodegenConfig,
    out_dir: &Path,
) -> Result<(), CodegenError> {
    let specialised =
        hanc_transform::propagate(network).map_err(|e| CodegenError::Transform(e.to_string()))?;
    let delay_plans = hanc_transform::compute_delay_plans(network, config.execution.step_size)
        .map_err(|e| CodegenError::Transform(e.to_string()))?;
    let empty = hanc_transform::DelayPlan::new();
    for (instance_name, instance) in &network.instances {
        let Some(DefinitionEntry::Automaton(base)) = network.definitions.get(&instance.definition)
        else {
            continue;
        };
        let def = specialised.get(instance_name).unwrap_or(base);
        let folder = out_dir.join(mangle_file_name(&instance.definition));
        fs::create_dir_all(&folder).map_err(|source| io_error(&folder, source))?;

        let mut specialised_def = def.clone();
        specialised_def.name = instance_name.clone();
        let plan = delay_plans.get(&instance.definition).unwrap_or(&empty);
        let unit = emit_definition(&specialised_def, config, plan);
        write_file(&folder, &format!("{}.h", unit.type_name), &unit.header)?;
        write_file(&folder, &format!("{}.c", unit.type_name), &unit.body)?;
    }
    Ok(())
}

fn write_file(dir: &Path, name: &str, contents: &str) -> Result<(), CodegenError> {
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|source| io_error(&path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> CodegenError {
    CodegenError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanc_ir::{Definition, Initialisation, Instance, Location, Network};
    use indexmap::IndexMap;
    use tempfile::tempdir;

    fn simple_network() -> Network {
        let init = Initialisation {
            initial_location: "idle".to_string(),
            valuations: IndexMap::new(),
        };
        let mut def = Definition::new("Gate", init);
        def.add_location(Location::new("idle")).unwrap();
        let mut network = Network::new("Top");
        network
            .definitions
            .insert("Gate".to_string(), DefinitionEntry::Automaton(def));
        network
            .instances
            .insert("gate1".to_string(), Instance::new("gate1", "Gate"));
        network
    }

    #[test]
    fn compile_time_layout_writes_per_instance_folder() {
        let network = simple_network();
        let dir = tempdir().unwrap();
        CBackend.generate(&network, &network.codegen_config, dir.path()).unwrap();

        let def_folder = dir.path().join("gate");
        assert!(def_folder.join("gate1.h").exists());
        assert!(def_folder.join("gate1.c").exists());
        assert!(dir.path().join("runnable.c").exists());
        assert!(dir.path().join("Makefile").exists());
    }

    #[test]
    fn run_time_layout_writes_one_pair_per_definition() {
        let mut network = simple_network();
        network.codegen_config.parametrisation_method = ParametrisationMethod::RunTime;
        let dir = tempdir().unwrap();
        CBackend.generate(&network, &network.codegen_config, dir.path()).unwrap();

        assert!(dir.path().join("gate.h").exists());
        assert!(dir.path().join("gate.c").exists());
    }
}
