//! End-to-end scenarios over the Importer -> Transform -> Code-generation
//! pipeline.

#[cfg(test)]
mod scenarios {
    use std::io::Write as _;
    use std::path::{Path, PathBuf};

    use hanc_codegen_core::Backend;
    use hanc_ir::{DefinitionEntry, ParametrisationMethod};

    fn write_doc(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::File::create(&path)
            .unwrap()
            .write_all(contents.as_bytes())
            .unwrap();
        path
    }

    /// Scenario 1: a train-gate-shaped network compiles to one C source
    /// pair per Instance under COMPILE_TIME parametrisation.
    #[test]
    fn train_gate_compiles_with_compile_time_parametrisation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            dir.path(),
            "gate.yaml",
            "\
name: TrainGate
definitions:
  Gate:
    parameters:
      closeDelay: REAL
    outputs:
      open: BOOLEAN
    locations:
      closed:
        update:
          open: \"false\"
        transitions:
          - target: opening
            guard: \"trainNear\"
      opening:
        update:
          open: \"true\"
    init:
      location: closed
      valuations:
        open: \"false\"
instances:
  gate:
    type: Gate
    parameters:
      closeDelay: \"2.0\"
codegenConfig:
  parametrisationMethod: COMPILE_TIME
",
        );

        let network = hanc_importer::import_haml(&path).unwrap();
        assert!(hanc_transform::validate(&network).is_empty());
        let network = hanc_transform::saturate(network);

        let out_dir = dir.path().join("out");
        hanc_backend_c::CBackend
            .generate(&network, &network.codegen_config, &out_dir)
            .unwrap();

        assert!(out_dir.join("Gate/gate.c").exists());
        assert!(out_dir.join("Gate/gate.h").exists());
        assert!(out_dir.join("runnable.c").exists());
        assert!(out_dir.join("Makefile").exists());
    }

    /// Scenario 2: a nested heart-shaped network flattens to a single
    /// level, generates one file pair per Definition under RUN_TIME, and
    /// logs every instance output in declared order.
    #[test]
    fn heart_network_flattens_and_logs_every_instance_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            dir.path(),
            "heart.yaml",
            "\
name: Heart
definitions:
  Cell:
    outputs:
      voltage: REAL
    locations:
      resting:
        flow:
          voltage: \"0.0\"
    init:
      location: resting
      valuations:
        voltage: \"-70.0\"
  Conduction:
    definitions:
      Path:
        outputs:
          signal: REAL
        locations:
          idle:
            flow:
              signal: \"0.0\"
        init:
          location: idle
    instances:
      path:
        type: Path
instances:
  sa_node:
    type: Cell
  conduction:
    type: Conduction
codegenConfig:
  parametrisationMethod: RUN_TIME
",
        );

        let network = hanc_importer::import_haml(&path).unwrap();
        assert!(hanc_transform::validate(&network).is_empty());
        let flattened = hanc_transform::flatten(&network);

        // Flattening lifted the nested instance under a dotted name and
        // left the outer network's own I/O untouched.
        assert!(flattened
            .instances
            .keys()
            .any(|name| name == "conduction.path"));
        assert_eq!(flattened.inputs.len(), network.inputs.len());
        assert_eq!(flattened.outputs.len(), network.outputs.len());

        let network = hanc_transform::saturate(flattened);
        let out_dir = dir.path().join("out");
        hanc_backend_c::CBackend
            .generate(&network, &network.codegen_config, &out_dir)
            .unwrap();

        assert!(out_dir.join("Cell.c").exists());
        assert!(out_dir.join("Cell.h").exists());

        let fields = network.logging_fields();
        assert_eq!(
            fields,
            vec!["sa_node.voltage".to_string(), "conduction.path.signal".to_string()]
        );
        let runnable_body = std::fs::read_to_string(out_dir.join("runnable.c")).unwrap();
        let sa_pos = runnable_body.find("sa_node.voltage").unwrap();
        let path_pos = runnable_body.find("conduction.path.signal").unwrap();
        assert!(sa_pos < path_pos, "fields must log in declared order");
    }

    /// Scenario 3: a `delayableBy` variable expands to a ring buffer whose
    /// length matches `ceil(d / s) + 1`, and the generated C rewrites
    /// every read of that variable to index the buffer.
    #[test]
    fn delayable_variable_expands_to_ring_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            dir.path(),
            "delay.yaml",
            "\
name: Delayed
definitions:
  Cell:
    internals:
      v:
        type: REAL
        delayableBy: \"0.005\"
    locations:
      resting:
        flow:
          v: \"v + 1.0\"
    init:
      location: resting
      valuations:
        v: \"0.0\"
instances:
  cell:
    type: Cell
codegenConfig:
  execution:
    stepSize: 0.001
  parametrisationMethod: RUN_TIME
",
        );

        let network = hanc_importer::import_haml(&path).unwrap();
        let plans =
            hanc_transform::compute_delay_plans(&network, network.codegen_config.execution.step_size)
                .unwrap();
        assert_eq!(plans["Cell"]["v"].length, 6);

        let out_dir = dir.path().join("out");
        hanc_backend_c::CBackend
            .generate(&network, &network.codegen_config, &out_dir)
            .unwrap();
        let body = std::fs::read_to_string(out_dir.join("Cell.c")).unwrap();
        assert!(body.contains("v_buf"));
        assert!(body.contains("v_head"));
    }

    /// Scenario 4: a mapping to a nonexistent port on a known instance is
    /// reported as an unresolved mapping rather than silently accepted.
    #[test]
    fn mapping_to_nonexistent_port_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(
            dir.path(),
            "bad_mapping.yaml",
            "\
name: BadMapping
definitions:
  Gate:
    outputs:
      open: BOOLEAN
    locations:
      closed: {}
    init:
      location: closed
instances:
  gate:
    type: Gate
mappings:
  gate.nonexistent: \"true\"
",
        );

        let network = hanc_importer::import_haml(&path).unwrap();
        let errors = hanc_transform::validate(&network);
        assert!(errors.iter().any(|e| matches!(
            e,
            hanc_transform::TransformError::UnresolvedMapping { target }
                if target == "gate.nonexistent"
        )));
    }

    /// Scenario 5: a document whose `!include` forms a cycle reports the
    /// participating paths rather than recursing forever.
    #[test]
    fn include_cycle_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "a.yaml", "name: A\n!include b.yaml\n");
        let b_path = write_doc(dir.path(), "b.yaml", "!include a.yaml\n");
        let a_path = dir.path().join("a.yaml");

        let err = hanc_importer::import_haml(&a_path).unwrap_err();
        let hanc_importer::ImportError::IncludeCycle { cycle } = err else {
            panic!("expected an include cycle, got {err:?}");
        };
        assert!(cycle.iter().any(|p| p.ends_with("a.yaml")));
        assert!(cycle.iter().any(|p| p.ends_with("b.yaml")));
        let _ = b_path;
    }

    /// Scenario 6: reassigning a variable with a conflicting type within a
    /// function body is a type conflict naming the offending variable.
    #[test]
    fn conflicting_reassignment_is_a_type_conflict() {
        let program = hanc_program::parse("x = 1\nx = true\n").unwrap();
        let err = hanc_program::collect_variables(
            &program,
            &std::collections::HashMap::new(),
            &hanc_formula::FuncTypes::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            hanc_program::ProgramError::TypeConflict { ref name, .. } if name == "x"
        ));
    }

    /// A nested Network Definition still reaches the back-end: generating
    /// RTL/VHDL produces one file per Automaton, recursing into the
    /// nested Network's own sub-directory.
    #[test]
    fn nested_network_generates_vhdl_per_automaton() {
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
        outputs:
          y: REAL
        locations:
          idle:
            flow:
              y: \"1.0\"
        init:
          location: idle
          valuations:
            y: \"0.0\"
    instances:
      leaf:
        type: Leaf
instances: {}
",
        );

        let network = hanc_importer::import_haml(&path).unwrap();
        assert!(hanc_transform::validate(&network).is_empty());
        let out_dir = dir.path().join("out");
        hanc_backend_rtl::RtlBackend
            .generate(&network, &network.codegen_config, &out_dir)
            .unwrap();
        assert!(out_dir.join("Inner/Leaf.vhdl").exists());

        let DefinitionEntry::Network(inner) = &network.definitions["Inner"] else {
            panic!("expected nested network");
        };
        assert_eq!(
            inner.codegen_config.parametrisation_method,
            ParametrisationMethod::CompileTime
        );
    }
}
