use hanc_formula::VarType;
use hanc_program::Program;
use indexmap::IndexMap;

use crate::errors::IrError;
use crate::location::Location;
use crate::variable::{Locality, Variable};

/// A named [`Program`] with typed inputs (spec.md §3.6: "functions (named
/// Programs with typed inputs)").
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub inputs: Vec<(String, VarType)>,
    pub body: Program,
}

/// The initial location and initial variable valuations a
/// [`Definition`] starts a simulation run in (spec.md §3.6).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Initialisation {
    pub initial_location: String,
    pub valuations: IndexMap<String, hanc_formula::Formula>,
}

/// A Hybrid Automaton (spec.md §3.6).
///
/// `variables` holds every [`Variable`] regardless of [`Locality`] in
/// declaration order; [`Definition::variables_with_locality`] gives the
/// partitioned view spec.md describes without duplicating storage across
/// four separate maps.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    pub name: String,
    pub variables: IndexMap<String, Variable>,
    pub locations: IndexMap<String, Location>,
    pub functions: IndexMap<String, FunctionDef>,
    pub init: Initialisation,
}

impl Definition {
    #[must_use]
    pub fn new(name: impl Into<String>, init: Initialisation) -> Self {
        Self {
            name: name.into(),
            variables: IndexMap::new(),
            locations: IndexMap::new(),
            functions: IndexMap::new(),
            init,
        }
    }

    pub fn add_variable(&mut self, variable: Variable) -> Result<(), IrError> {
        if self.variables.contains_key(&variable.name) {
            return Err(IrError::DuplicateVariable {
                definition: self.name.clone(),
                name: variable.name,
            });
        }
        self.variables.insert(variable.name.clone(), variable);
        Ok(())
    }

    pub fn add_location(&mut self, location: Location) -> Result<(), IrError> {
        if self.locations.contains_key(&location.name) {
            return Err(IrError::DuplicateLocation {
                definition: self.name.clone(),
                name: location.name,
            });
        }
        self.locations.insert(location.name.clone(), location);
        Ok(())
    }

    #[must_use]
    pub fn variables_with_locality(&self, locality: Locality) -> Vec<&Variable> {
        self.variables
            .values()
            .filter(|v| v.locality == locality)
            .collect()
    }

    /// Structural checks that don't require the enclosing [`crate::network::Network`]
    /// (spec.md §3.3, §3.6): initial location exists, no PARAMETER has a
    /// flow entry.
    pub fn validate(&self) -> Result<(), IrError> {
        if !self.locations.contains_key(&self.init.initial_location) {
            return Err(IrError::UnknownInitialLocation {
                definition: self.name.clone(),
                location: self.init.initial_location.clone(),
            });
        }
        let parameters: std::collections::HashSet<&str> = self
            .variables_with_locality(Locality::Parameter)
            .into_iter()
            .map(|v| v.name.as_str())
            .collect();
        for location in self.locations.values() {
            for name in location.flow.keys() {
                if parameters.contains(name.as_str()) {
                    return Err(IrError::ParameterHasFlow { name: name.clone() });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;
    use hanc_formula::VarType;

    fn idle_definition() -> Definition {
        let init = Initialisation {
            initial_location: "idle".to_string(),
            valuations: IndexMap::new(),
        };
        let mut def = Definition::new("Cell", init);
        def.add_location(Location::new("idle")).unwrap();
        def
    }

    #[test]
    fn duplicate_variable_is_rejected() {
        let mut def = idle_definition();
        def.add_variable(Variable::new("x", VarType::Real, Locality::Internal))
            .unwrap();
        let err = def
            .add_variable(Variable::new("x", VarType::Boolean, Locality::Internal))
            .unwrap_err();
        assert!(matches!(err, IrError::DuplicateVariable { name, .. } if name == "x"));
    }

    #[test]
    fn unknown_initial_location_is_rejected() {
        let init = Initialisation {
            initial_location: "missing".to_string(),
            valuations: IndexMap::new(),
        };
        let def = Definition::new("Cell", init);
        assert!(matches!(
            def.validate(),
            Err(IrError::UnknownInitialLocation { .. })
        ));
    }

    #[test]
    fn parameter_with_flow_is_rejected() {
        let mut def = idle_definition();
        def.add_variable(Variable::new("k", VarType::Real, Locality::Parameter))
            .unwrap();
        def.locations
            .get_mut("idle")
            .unwrap()
            .flow
            .insert("k".to_string(), hanc_formula::Formula::real(1.0));
        assert!(matches!(
            def.validate(),
            Err(IrError::ParameterHasFlow { .. })
        ));
    }

    #[test]
    fn well_formed_definition_validates() {
        let def = idle_definition();
        assert!(def.validate().is_ok());
    }
}
