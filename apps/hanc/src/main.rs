#![warn(clippy::pedantic)]
//! # Hybrid Automata Network Compiler CLI
//!
//! 1. Import  – load the root HAML document into the Hybrid IR.
//! 2. Validate – run cross-Definition semantic checks, accumulating every
//!    diagnostic rather than stopping at the first (spec.md §7).
//! 3. Transform – optionally flatten the Network hierarchy (`-f`), then
//!    apply the saturation pass.
//! 4. Code-generation – emit C or RTL/VHDL source via the selected back-end.
//!
//! `--validate-only` stops after step 2 and writes no files.
//!
//! ## Exit codes
//! * 0 – success.
//! * 1 – any surfaced error, reported as a single-line diagnostic on stderr.

mod parser;

use std::path::Path;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser as _;
use hanc_codegen_core::Backend;
use hanc_ir::Network;

use parser::{Cli, Language};

fn main() {
    let args = Cli::parse();
    init_tracing(args.quiet);

    if let Err(err) = run(&args) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
    process::exit(0);
}

fn init_tracing(quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hanc=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Cli) -> Result<()> {
    let network = hanc_importer::import_haml(&args.source)
        .with_context(|| format!("importing {}", args.source.display()))?;

    let errors = hanc_transform::validate(&network);
    if !errors.is_empty() {
        report_validation_errors(&errors);
        bail!("{} validation error(s)", errors.len());
    }

    if args.validate_only {
        println!("OK: no validation errors");
        return Ok(());
    }

    let network = if args.flatten {
        tracing::info!("flattening network hierarchy");
        hanc_transform::flatten(&network)
    } else {
        network
    };
    let network = hanc_transform::saturate(network);

    generate(&network, args.language, &args.output)?;
    println!(
        "Generated {} sources in {}",
        language_name(args.language),
        args.output.display()
    );
    Ok(())
}

fn generate(network: &Network, language: Language, output: &Path) -> Result<()> {
    let config = network.codegen_config.clone();
    match language {
        Language::C => hanc_backend_c::CBackend
            .generate(network, &config, output)
            .context("C code-generation failed"),
        Language::Vhdl => hanc_backend_rtl::RtlBackend
            .generate(network, &config, output)
            .context("RTL code-generation failed"),
    }
}

fn language_name(language: Language) -> &'static str {
    match language {
        Language::C => "C",
        Language::Vhdl => "VHDL",
    }
}

/// Prints every accumulated diagnostic, one per line, sorted by
/// (definition name, message) for deterministic output (SPEC_FULL.md §7).
/// Errors with no associated Definition (e.g. an unresolved mapping) sort
/// under an empty key, ahead of any Definition-scoped error.
fn report_validation_errors(errors: &[hanc_transform::TransformError]) {
    let mut sorted: Vec<&hanc_transform::TransformError> = errors.iter().collect();
    sorted.sort_by(|a, b| {
        (definition_key(a), a.to_string()).cmp(&(definition_key(b), b.to_string()))
    });
    for error in sorted {
        eprintln!("{error}");
    }
}

fn definition_key(error: &hanc_transform::TransformError) -> &str {
    use hanc_transform::TransformError::{
        ConstEval, FunctionBody, UnknownDefinition, UnknownTransitionTarget, UnresolvedMapping,
        UnresolvedName,
    };
    match error {
        UnresolvedName { definition, .. }
        | UnknownTransitionTarget { definition, .. }
        | FunctionBody { definition, .. } => definition,
        UnknownDefinition { .. } | UnresolvedMapping { .. } | ConstEval(_) => "",
    }
}
