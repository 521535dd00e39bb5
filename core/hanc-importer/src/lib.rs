#![warn(clippy::pedantic)]
//! Schema-driven loaders that build the Hybrid IR from source documents
//! (spec.md §4.4).
//!
//! [`import_haml`] reads a HAML YAML document (resolving `!include`
//! splices first), deserialises it against [`schema::HamlDocument`], and
//! lowers it into a [`hanc_ir::Network`]. [`cellml::import_cellml`] does
//! the architecturally-equivalent thing for the third-party biomedical
//! format (SPEC_FULL.md §4.7).

pub mod cellml;
mod errors;
mod include;
mod lower;
mod schema;

use std::path::Path;

pub use cellml::import_cellml;
pub use errors::ImportError;
pub use schema::HamlDocument;

/// Loads and lowers a HAML document at `path`, resolving `!include`
/// splices first (spec.md §4.4).
pub fn import_haml(path: &Path) -> Result<hanc_ir::Network, ImportError> {
    tracing::debug!(path = %path.display(), "resolving includes");
    let text = include::resolve(path)?;
    let doc: HamlDocument = serde_yaml::from_str(&text)?;
    tracing::info!(name = %doc.name, "lowering HAML document");
    lower::lower_document(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_doc(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::File::create(&path)
            .unwrap()
            .write_all(contents.as_bytes())
            .unwrap();
        path
    }

    #[test]
    fn imports_minimal_single_definition_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            dir.path(),
            "gate.yaml",
            "\
name: Gate
definitions:
  Gate:
    outputs:
      open: BOOLEAN
    locations:
      closed:
        transitions:
          - target: open_loc
            guard: \"trainNear\"
      open_loc: {}
    init:
      location: closed
instances:
  gate:
    type: Gate
",
        );
        let network = import_haml(&path).unwrap();
        assert_eq!(network.name, "Gate");
        assert_eq!(network.instances.len(), 1);
        let hanc_ir::DefinitionEntry::Automaton(def) = &network.definitions["Gate"] else {
            panic!("expected automaton");
        };
        assert_eq!(def.locations.len(), 2);
        assert_eq!(def.locations["closed"].transitions.len(), 1);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            dir.path(),
            "bad.yaml",
            "name: Bad\nnotAField: true\n",
        );
        assert!(matches!(import_haml(&path), Err(ImportError::Yaml(_))));
    }

    #[test]
    fn shorthand_variable_type_lowers_with_no_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            dir.path(),
            "shorthand.yaml",
            "\
name: Top
inputs:
  speed: REAL
",
        );
        let network = import_haml(&path).unwrap();
        let speed = &network.inputs["speed"];
        assert_eq!(speed.var_type, hanc_formula::VarType::Real);
        assert!(speed.default.is_none());
    }

    #[test]
    fn nested_network_definition_lowers_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            dir.path(),
            "nested.yaml",
            "\
name: Outer
definitions:
  Inner:
    definitions:
      Leaf:
        locations:
          idle: {}
        init:
          location: idle
    instances:
      leaf:
        type: Leaf
",
        );
        let network = import_haml(&path).unwrap();
        let hanc_ir::DefinitionEntry::Network(inner) = &network.definitions["Inner"] else {
            panic!("expected nested network");
        };
        assert_eq!(inner.instances.len(), 1);
    }
}
