#![warn(clippy::pedantic)]
//! Semantic transformations over an imported Hybrid IR [`hanc_ir::Network`]
//! (spec.md §4.5): validation, parameter propagation, delay expansion, and
//! network flattening, run in that fixed order by callers (typically
//! `apps/hanc`) before a back-end lowers the result to target code.
//!
//! This crate does not decide *when* each step runs relative to the
//! others beyond the order spec.md §4.5 fixes; it exposes each step as an
//! independent function so a caller can run validation standalone
//! (`--validate-only`), or flatten before propagating, as the pipeline
//! requires.

pub mod delay;
pub mod errors;
pub mod flatten;
pub mod propagate;
pub mod saturate;
pub mod validate;

pub use delay::{compute_delay_plans, DelayBuffer, DelayPlan};
pub use errors::TransformError;
pub use flatten::flatten;
pub use propagate::{propagate, SpecialisedDefinitions};
pub use saturate::saturate;
pub use validate::validate;
