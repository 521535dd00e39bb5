//! Per-Automaton VHDL entity emission (spec.md §4.6.2): one entity with
//! ports for external inputs/outputs, signals for internal variables and
//! an `update` shadow for every variable, a clocked process running the
//! transition/flow logic, and a state enumeration for locations.
//!
//! Structural layout (entity/architecture skeleton, port and signal
//! lists) is template-driven via `tera`; per-statement process logic is
//! computed in Rust and handed to the template as pre-rendered lines,
//! the way a hardware generator keeps templates declarative and leaves
//! control flow to the host language.

use tera::{Context, Tera};

use hanc_codegen_core::{ident, lower_formula, mangle_file_name, PrefixData, TypeLowering};
use hanc_ir::{CodegenConfig, Definition, Locality, Variable};

use crate::errors::RtlError;
use crate::render::{VhdlFormula, VhdlTypes};

const ENTITY_TEMPLATE: &str = r#"library ieee;
use ieee.std_logic_1164.all;
use ieee.numeric_std.all;

entity {{ entity_name }} is
  port (
    clk : in std_logic;
    reset : in std_logic
{%- for port in ports %}
;    {{ port }}
{%- endfor %}
  );
end entity {{ entity_name }};

architecture rtl of {{ entity_name }} is
  type state_t is ({{ states | join(sep=", ") }});
  signal state, state_update : state_t := {{ initial_state }};
{%- for signal in signals %}
  signal {{ signal }};
{%- endfor %}
begin

  process (clk, reset)
  begin
    if reset = '1' then
      state <= {{ initial_state }};
{%- for reset_line in reset_lines %}
      {{ reset_line }}
{%- endfor %}
    elsif rising_edge(clk) then
      state <= state_update;
{%- for commit_line in commit_lines %}
      {{ commit_line }}
{%- endfor %}
    end if;
  end process;

  process (state{% for sensitivity in sensitivities %}, {{ sensitivity }}{% endfor %})
  begin
    state_update <= state;
{%- for update_line in update_lines %}
    {{ update_line }}
{%- endfor %}
    case state is
{%- for arm in case_arms %}
      when {{ arm.label }} =>
{%- for line in arm.lines %}
        {{ line }}
{%- endfor %}
{%- endfor %}
    end case;
  end process;

end architecture rtl;
"#;

fn variable_signal(variable: &Variable, types: &VhdlTypes) -> String {
    format!("{} : {}", variable.name, types.lower_type(variable.var_type))
}

fn port_direction(locality: Locality) -> Option<&'static str> {
    match locality {
        Locality::ExternalInput => Some("in"),
        Locality::ExternalOutput => Some("out"),
        _ => None,
    }
}

/// Renders `definition` as one VHDL entity/architecture source string.
///
/// # Errors
///
/// Returns [`RtlError::DelayUnsupported`] if any variable declares a
/// nonzero `delayableBy` (spec.md §4.6.2: "Delayable variables are
/// rejected with DelayUnsupported at present").
pub fn emit_entity(definition: &Definition, config: &CodegenConfig) -> Result<String, RtlError> {
    for variable in definition.variables.values() {
        if let Some(delay) = &variable.delayable_by {
            if !matches!(delay, hanc_formula::Formula::RealLiteral(x) if *x <= 0.0) {
                return Err(RtlError::DelayUnsupported {
                    variable: variable.name.clone(),
                });
            }
        }
    }

    let types = VhdlTypes::default();
    let formula_target = VhdlFormula::default();
    let entity_name = mangle_file_name(&definition.name);

    let mut ports = Vec::new();
    for locality in [Locality::ExternalInput, Locality::ExternalOutput] {
        for variable in definition.variables_with_locality(locality) {
            if let Some(dir) = port_direction(locality) {
                ports.push(format!(
                    "{} : {} {}",
                    variable.name,
                    dir,
                    types.lower_type(variable.var_type)
                ));
            }
        }
    }

    let mut signals = Vec::new();
    for locality in [Locality::Internal, Locality::Parameter] {
        for variable in definition.variables_with_locality(locality) {
            signals.push(variable_signal(variable, &types));
            signals.push(format!(
                "{}_update : {}",
                variable.name,
                types.lower_type(variable.var_type)
            ));
        }
    }

    let states: Vec<String> = definition
        .locations
        .keys()
        .map(|name| ident::mangle_macro_name(name))
        .collect();
    let initial_state = ident::mangle_macro_name(&definition.init.initial_location);

    let mut commit_lines = Vec::new();
    for variable in definition
        .variables_with_locality(Locality::Internal)
        .into_iter()
        .chain(definition.variables_with_locality(Locality::ExternalOutput))
    {
        commit_lines.push(format!("{0} <= {0}_update;", variable.name));
    }

    let mut case_arms = Vec::new();
    for location in definition.locations.values() {
        let mut lines = Vec::new();
        for transition in &location.transitions {
            let guard = lower_formula(&transition.guard, &PrefixData::default(), &formula_target);
            lines.push(format!("if {guard} = '1' then"));
            lines.push(format!(
                "  state_update <= {};",
                ident::mangle_macro_name(&transition.target)
            ));
            for (name, update) in &transition.update {
                let rendered = lower_formula(update, &PrefixData::default(), &formula_target);
                lines.push(format!("  {name}_update <= {rendered};"));
            }
            lines.push("end if;".to_string());
        }
        for (name, flow) in &location.flow {
            let rendered = lower_formula(flow, &PrefixData::default(), &formula_target);
            lines.push(format!(
                "{name}_update <= {name} + ({rendered}) * to_signed(1, 32);"
            ));
        }
        for (name, update) in &location.update {
            let rendered = lower_formula(update, &PrefixData::default(), &formula_target);
            lines.push(format!("{name}_update <= {rendered};"));
        }
        case_arms.push(CaseArm {
            label: ident::mangle_macro_name(&location.name),
            lines,
        });
    }

    let reset_lines: Vec<String> = definition
        .variables
        .values()
        .filter(|v| matches!(v.locality, Locality::Internal | Locality::ExternalOutput))
        .map(|v| {
            let reset_value = v
                .default
                .as_ref()
                .map_or_else(|| types.lower_real_literal(0.0), |d| {
                    lower_formula(d, &PrefixData::default(), &formula_target)
                });
            format!("{} <= {reset_value};", v.name)
        })
        .collect();

    let sensitivities: Vec<String> = definition
        .variables_with_locality(Locality::ExternalInput)
        .into_iter()
        .map(|v| v.name.clone())
        .collect();

    let mut context = Context::new();
    context.insert("entity_name", &entity_name);
    context.insert("ports", &ports);
    context.insert("states", &states);
    context.insert("initial_state", &initial_state);
    context.insert("signals", &signals);
    context.insert("reset_lines", &reset_lines);
    context.insert("commit_lines", &commit_lines);
    context.insert("update_lines", &Vec::<String>::new());
    context.insert("sensitivities", &sensitivities);
    context.insert("case_arms", &case_arms);
    let _ = config;

    Tera::one_off(ENTITY_TEMPLATE, &context, false).map_err(|source| RtlError::Template {
        definition: definition.name.clone(),
        source: source.to_string(),
    })
}

#[derive(serde::Serialize)]
struct CaseArm {
    label: String,
    lines: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanc_formula::VarType;
    use hanc_ir::{Initialisation, Location};
    use indexmap::IndexMap;

    #[test]
    fn emits_entity_with_state_type_and_ports() {
        let init = Initialisation {
            initial_location: "idle".to_string(),
            valuations: IndexMap::new(),
        };
        let mut def = Definition::new("Gate", init);
        def.add_variable(Variable::new("v_in", VarType::Real, Locality::ExternalInput))
            .unwrap();
        let mut loc = Location::new("idle");
        loc.flow
            .insert("v_in".to_string(), hanc_formula::Formula::real(0.0));
        loc.flow.clear();
        def.add_location(loc).unwrap();

        let vhdl = emit_entity(&def, &CodegenConfig::default()).unwrap();
        assert!(vhdl.contains("entity gate is"));
        assert!(vhdl.contains("type state_t is (IDLE)"));
        assert!(vhdl.contains("v_in : in signed(31 downto 0)"));
    }

    #[test]
    fn delayed_variable_is_rejected() {
        let init = Initialisation {
            initial_location: "idle".to_string(),
            valuations: IndexMap::new(),
        };
        let mut def = Definition::new("Gate", init);
        def.add_variable(
            Variable::new("x", VarType::Real, Locality::Internal)
                .with_delayable_by(hanc_formula::Formula::real(0.01)),
        )
        .unwrap();
        def.add_location(Location::new("idle")).unwrap();

        let err = emit_entity(&def, &CodegenConfig::default()).unwrap_err();
        assert!(matches!(err, RtlError::DelayUnsupported { .. }));
    }
}
