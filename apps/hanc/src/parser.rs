//! Command line argument parsing for the Hybrid Automata Network compiler.
//!
//! This module defines the CLI interface using `clap`. The `Cli` struct
//! captures every flag and argument passed to the `hanc` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Target back-end selected by `-l`/`--language`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Language {
    /// Portable C (spec.md §4.6.1).
    C,
    /// Synthesizable RTL/VHDL (spec.md §4.6.2).
    Vhdl,
}

/// Command line interface definition for the Hybrid Automata Network
/// compiler.
///
/// `hanc` runs Importer -> Transformations -> Code-Generation over a
/// single root HAML document, emitting a tree of generated source files
/// plus a build driver. `--validate-only` stops after semantic checks and
/// writes no files.
#[derive(Parser)]
#[command(
    name = "hanc",
    author,
    version,
    about = "Hybrid Automata Network compiler",
    long_about = "Compiles a declarative HAML description of a Hybrid Automata Network into \
executable simulator source code in portable C or a synthesizable RTL/VHDL target."
)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct Cli {
    /// Path to the root HAML document to compile.
    pub(crate) source: PathBuf,

    /// Target back-end to generate.
    #[arg(short = 'l', long = "language", value_enum, default_value_t = Language::C)]
    pub(crate) language: Language,

    /// Directory generated source files are written into.
    #[arg(short = 'o', long = "output", default_value = "output")]
    pub(crate) output: PathBuf,

    /// Flatten the Network hierarchy before code-generation (spec.md
    /// §4.5 step 3).
    #[arg(short = 'f', long = "flatten")]
    pub(crate) flatten: bool,

    /// Run the Importer, transformations, and semantic checks only;
    /// report every accumulated diagnostic and write no files.
    #[arg(short = 'v', long = "validate-only")]
    pub(crate) validate_only: bool,

    /// Suppress tracing output below the error level, overriding
    /// `RUST_LOG`.
    #[arg(short = 'q', long = "quiet")]
    pub(crate) quiet: bool,
}
