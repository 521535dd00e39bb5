//! Per-Network C emission (spec.md §4.6.1): I/O-mapping glue between
//! Instances, and at the root, a `runnable` with the simulation time loop
//! and an optional CSV logger gated by a `LOGGING` macro. The logger
//! writes the initial-state row before the loop starts and then one row
//! every `LOGGING_EVERY_N_STEPS` ticks, so `logging.interval` (default:
//! `stepSize`, i.e. every tick) actually governs row cadence instead of
//! being a declared-but-unused macro.

use std::fmt::Write as _;

use hanc_codegen_core::{lower_formula, mangle_file_name, mangle_variable_name, PrefixData};
use hanc_ir::{CodegenConfig, DefinitionEntry, Network};

use crate::render::CFormula;

/// The generated `runnable.c`/`runnable.h` pair and `config.h` for the
/// root Network.
pub struct RunnableUnit {
    pub config_header: String,
    pub runnable_header: String,
    pub runnable_body: String,
}

#[must_use]
pub fn emit_runnable(network: &Network, config: &CodegenConfig) -> RunnableUnit {
    RunnableUnit {
        config_header: emit_config_header(config),
        runnable_header: emit_runnable_header(),
        runnable_body: emit_runnable_body(network, config),
    }
}

fn emit_config_header(config: &CodegenConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#ifndef CONFIG_H");
    let _ = writeln!(out, "#define CONFIG_H");
    let _ = writeln!(out, "#define STEP_SIZE {}", config.execution.step_size);
    let _ = writeln!(out, "#define SIMULATION_TIME {}", config.execution.simulation_time);
    if config.logging.enable {
        let _ = writeln!(out, "#define LOGGING 1");
        let _ = writeln!(
            out,
            "#define LOGGING_INTERVAL {}",
            config.logging.effective_interval(&config.execution)
        );
        let _ = writeln!(out, "#define LOGGING_EVERY_N_STEPS {}", log_every_n_steps(config));
        let _ = writeln!(out, "#define LOGGING_FILE \"{}\"", config.logging.file);
    }
    let _ = writeln!(out, "#endif");
    out
}

/// How many `STEP_SIZE` ticks elapse between logged rows (spec.md §6:
/// `logging.interval` defaults to `stepSize`, i.e. one row per tick).
/// Computed as an integer tick count rather than compared against `t` as
/// a float so the generated loop can't drift off the requested cadence.
fn log_every_n_steps(config: &CodegenConfig) -> u64 {
    let interval = config.logging.effective_interval(&config.execution);
    let ratio = interval / config.execution.step_size;
    ratio.round().max(1.0) as u64
}

fn emit_runnable_header() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#ifndef RUNNABLE_H");
    let _ = writeln!(out, "#define RUNNABLE_H");
    let _ = writeln!(out, "int run(void);");
    let _ = writeln!(out, "#endif");
    out
}

fn emit_runnable_body(network: &Network, config: &CodegenConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#include \"runnable.h\"");
    let _ = writeln!(out, "#include \"config.h\"");
    for (instance_name, instance) in &network.instances {
        if let Some(entry) = network.definitions.get(&instance.definition) {
            if let DefinitionEntry::Automaton(_) = entry {
                let type_name = mangle_file_name(&instance.definition);
                let _ = writeln!(out, "#include \"{type_name}.h\"");
                let _ = writeln!(out, "static {type_name} {instance_name};");
            }
        }
    }
    if config.logging.enable {
        let _ = writeln!(out, "#include <stdio.h>");
    }
    out.push('\n');

    let _ = writeln!(out, "int run(void) {{");
    for (instance_name, instance) in &network.instances {
        if let DefinitionEntry::Automaton(_) = network.definitions.get(&instance.definition).unwrap() {
            let type_name = mangle_file_name(&instance.definition);
            let _ = writeln!(out, "    {type_name}_init(&{instance_name});");
        }
    }
    if config.logging.enable {
        let _ = writeln!(out, "    FILE *log_file = fopen(LOGGING_FILE, \"w\");");
        emit_log_header(&mut out, network);
    }
    out.push('\n');
    let _ = writeln!(out, "    double t = 0.0;");
    if config.logging.enable {
        let _ = writeln!(out, "    long tick = 0;");
        // The initial-state row (t = 0, post-init) so a run over
        // `simulationTime / stepSize` ticks produces `+ 1` rows, not one
        // short (spec.md §8 scenario 2).
        emit_log_row(&mut out, network, "    ");
    }
    let _ = writeln!(out, "    while (t < SIMULATION_TIME) {{");
    emit_mapping_glue(&mut out, network);
    for (instance_name, instance) in &network.instances {
        if let DefinitionEntry::Automaton(_) = network.definitions.get(&instance.definition).unwrap() {
            let type_name = mangle_file_name(&instance.definition);
            let _ = writeln!(out, "        {type_name}_run(&{instance_name}, STEP_SIZE);");
        }
    }
    let _ = writeln!(out, "        t += STEP_SIZE;");
    if config.logging.enable {
        let _ = writeln!(out, "        tick++;");
        let _ = writeln!(out, "        if (tick % LOGGING_EVERY_N_STEPS == 0) {{");
        emit_log_row(&mut out, network, "            ");
        let _ = writeln!(out, "        }}");
    }
    let _ = writeln!(out, "    }}");
    if config.logging.enable {
        let _ = writeln!(out, "    fclose(log_file);");
    }
    let _ = writeln!(out, "    return 0;");
    let _ = writeln!(out, "}}");
    out
}

/// Mappings route a Formula's value (possibly referencing another
/// Instance's output) into a destination instance's port before that
/// instance's own `_run` executes this tick.
fn emit_mapping_glue(out: &mut String, network: &Network) {
    for (target, formula) in &network.mappings {
        let Some(instance) = &target.instance else {
            continue;
        };
        let destination = resolve_field_expr(network, &format!("{instance}.{}", target.port));
        let rendered = lower_formula(formula, &cross_instance_prefix(network, formula), &CFormula);
        let _ = writeln!(out, "        {destination} = {rendered};");
    }
}

/// A Formula inside a mapping may reference `other_instance.field`. The
/// Formula grammar represents that as a single dotted
/// `Formula::Variable`, but the generated struct member for `field` may
/// carry a locality suffix (`ident::mangle_variable_name`), so every
/// dotted free variable in `formula` is resolved against the Network
/// before rendering.
fn cross_instance_prefix(network: &Network, formula: &hanc_formula::Formula) -> PrefixData {
    let mut prefix = PrefixData::default();
    for name in formula.free_variables() {
        if name.contains('.') {
            let resolved = resolve_field_expr(network, &name);
            prefix = prefix.with_substitution(name, resolved);
        }
    }
    prefix
}

fn emit_log_header(out: &mut String, network: &Network) {
    let fields = network.logging_fields();
    let _ = writeln!(out, "    fprintf(log_file, \"t\");");
    for field in &fields {
        let _ = writeln!(out, "    fprintf(log_file, \",%s\", \"{field}\");");
    }
    let _ = writeln!(out, "    fprintf(log_file, \"\\n\");");
}

fn emit_log_row(out: &mut String, network: &Network, indent: &str) {
    let fields = network.logging_fields();
    let _ = writeln!(out, "{indent}fprintf(log_file, \"%f\", t);");
    for field in &fields {
        let expr = resolve_field_expr(network, field);
        let _ = writeln!(out, "{indent}fprintf(log_file, \",%f\", {expr});");
    }
    let _ = writeln!(out, "{indent}fprintf(log_file, \"\\n\");");
}

/// A logging field is `instance.variable` using the Variable's declared
/// name; the generated struct field carries a locality suffix
/// (`ident::mangle_variable_name`), so the dotted name has to be resolved
/// against the instance's Definition to find the actual C member.
fn resolve_field_expr(network: &Network, dotted: &str) -> String {
    let Some((instance_name, var_name)) = dotted.split_once('.') else {
        return dotted.to_string();
    };
    let member = network
        .instances
        .get(instance_name)
        .and_then(|instance| network.definitions.get(&instance.definition))
        .and_then(|entry| match entry {
            DefinitionEntry::Automaton(def) => def.variables.get(var_name),
            DefinitionEntry::Network(_) => None,
        })
        .map_or_else(
            || var_name.to_string(),
            |variable| mangle_variable_name(&variable.name, variable.locality),
        );
    format!("{instance_name}.{member}")
}
