#![warn(clippy::pedantic)]
//! Hybrid Automaton / Hybrid Network intermediate representation.
//!
//! An entire IR tree is built by an importer, mutated only by the
//! transformation phase, then treated as read-only during code generation
//! (spec.md §3.8 "Lifecycle"). This crate only models the data; cross-node
//! validation that needs a whole [`network::Network`] in scope (unresolved
//! names, unresolved mappings, include cycles, delay support) lives in
//! `hanc-transform`.

pub mod config;
pub mod definition;
pub mod errors;
pub mod instance;
pub mod location;
pub mod network;
pub mod transition;
pub mod variable;

pub use config::{CodegenConfig, ExecutionConfig, LoggingConfig, ParametrisationMethod};
pub use definition::{Definition, FunctionDef, Initialisation};
pub use errors::IrError;
pub use instance::Instance;
pub use location::Location;
pub use network::{DefinitionEntry, MappingTarget, Network};
pub use transition::Transition;
pub use variable::{Locality, Variable};
