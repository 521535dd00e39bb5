//! Delay expansion (spec.md §4.5 step 2, §8 scenario 3).
//!
//! "Any variable with `delayableBy = d` and step size `s` is expanded to a
//! ring buffer of length `ceil(d / s) + 1`, and every read site is
//! rewritten to index the buffer; writes advance the head." The Formula
//! grammar (spec.md §3.1) has no array-indexing node kind, so the actual
//! read/write rewrite is a code-generation concern, not something
//! representable as another Formula — this module computes the
//! [`DelayPlan`] once (the buffer length each delayed variable needs) and
//! hands it to whichever back-end is generating code; each back-end lowers
//! reads/writes against its own target-language indexing syntax using that
//! plan (spec.md §4.6 "Formula lowering with a PrefixData context").

use std::collections::HashMap;

use hanc_formula::{evaluate, Env};
use hanc_ir::{Definition, DefinitionEntry, Network};

use crate::errors::TransformError;

/// Ring-buffer length a single delayed variable needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayBuffer {
    pub length: u32,
}

/// Variable name -> [`DelayBuffer`], for every variable in one
/// [`Definition`] whose `delayableBy` evaluates to a positive constant.
pub type DelayPlan = HashMap<String, DelayBuffer>;

/// Computes the [`DelayPlan`] for every Automaton Definition reachable
/// from `network`, keyed by Definition name.
pub fn compute_delay_plans(
    network: &Network,
    step_size: f64,
) -> Result<HashMap<String, DelayPlan>, TransformError> {
    let mut plans = HashMap::new();
    for entry in network.definitions.values() {
        match entry {
            DefinitionEntry::Automaton(def) => {
                plans.insert(def.name.clone(), compute_definition_plan(def, step_size)?);
            }
            DefinitionEntry::Network(inner) => {
                plans.extend(compute_delay_plans(inner, step_size)?);
            }
        }
    }
    Ok(plans)
}

fn compute_definition_plan(
    definition: &Definition,
    step_size: f64,
) -> Result<DelayPlan, TransformError> {
    let mut plan = DelayPlan::new();
    for variable in definition.variables.values() {
        let Some(delay_formula) = &variable.delayable_by else {
            continue;
        };
        let delay = match evaluate(delay_formula, &Env::new())? {
            hanc_formula::Value::Real(x) => x,
            hanc_formula::Value::Bool(_) => continue,
        };
        if delay <= 0.0 {
            continue;
        }
        let length = (delay / step_size).ceil() as u32 + 1;
        plan.insert(variable.name.clone(), DelayBuffer { length });
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanc_formula::{Formula, VarType};
    use hanc_ir::{Initialisation, Locality, Variable};
    use indexmap::IndexMap;

    #[test]
    fn buffer_length_matches_spec_example() {
        let init = Initialisation {
            initial_location: "idle".to_string(),
            valuations: IndexMap::new(),
        };
        let mut def = Definition::new("Cell", init);
        def.add_variable(
            Variable::new("v", VarType::Real, Locality::Internal)
                .with_delayable_by(Formula::real(0.005)),
        )
        .unwrap();

        let plan = compute_definition_plan(&def, 0.001).unwrap();
        assert_eq!(plan["v"].length, 6);
    }

    #[test]
    fn zero_delay_is_not_buffered() {
        let init = Initialisation {
            initial_location: "idle".to_string(),
            valuations: IndexMap::new(),
        };
        let mut def = Definition::new("Cell", init);
        def.add_variable(
            Variable::new("v", VarType::Real, Locality::Internal)
                .with_delayable_by(Formula::real(0.0)),
        )
        .unwrap();

        let plan = compute_definition_plan(&def, 0.001).unwrap();
        assert!(plan.is_empty());
    }
}
