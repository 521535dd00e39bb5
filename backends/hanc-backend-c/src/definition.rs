//! Per-Definition C emission (spec.md §4.6.1): a header (state enum,
//! struct, prototypes) and a body (`init` zeroes the struct and applies
//! defaults; `run` evaluates outgoing guards before falling back to an
//! explicit Euler flow step).
//!
//! Every flow/update/transition-update RHS is computed into a `*_update`
//! shadow field before any of that tick's values are committed back onto
//! the real fields (spec.md §5: entry-valuation semantics), the same
//! shadow-then-commit split the RTL back-end runs across a clock edge.
//! This is what keeps a coupled Euler step like `v' = f(w); w' = g(v)`
//! reading both `v` and `w` as of tick start rather than one seeing the
//! other's already-advanced value.

use std::fmt::Write as _;

use hanc_codegen_core::{
    lower_formula, mangle_file_name, mangle_variable_name, Indent, PrefixData, TypeLowering,
};
use hanc_ir::{CodegenConfig, Definition, Locality};
use hanc_transform::DelayPlan;

use crate::render::{CFormula, CTypes};

/// Header + body text for one Definition, plus the symbol names the
/// caller (Network/Instance emission) needs to reference it.
pub struct DefinitionUnit {
    pub type_name: String,
    pub header: String,
    pub body: String,
}

/// Renders `definition`'s struct field name for `variable`, used both for
/// declarations and for `self->` access expressions.
fn field_name(variable: &hanc_ir::Variable) -> String {
    mangle_variable_name(&variable.name, variable.locality)
}

fn state_macro(type_name: &str, location: &str) -> String {
    format!(
        "{}_STATE_{}",
        type_name.to_uppercase(),
        location.to_uppercase()
    )
}

/// Renders `definition`, expanding every `delayableBy` variable named in
/// `delay_plan` into a ring buffer (spec.md §4.5 step 2): reads of that
/// variable anywhere in its own guards/flows/updates are rewritten to
/// index the buffer, and every write additionally pushes into it.
#[must_use]
pub fn emit_definition(
    definition: &Definition,
    config: &CodegenConfig,
    delay_plan: &DelayPlan,
) -> DefinitionUnit {
    let type_name = mangle_file_name(&definition.name);
    let header = emit_header(definition, &type_name, delay_plan);
    let body = emit_body(definition, &type_name, config, delay_plan);
    DefinitionUnit {
        type_name,
        header,
        body,
    }
}

fn emit_header(definition: &Definition, type_name: &str, delay_plan: &DelayPlan) -> String {
    let mut out = String::new();
    let guard = format!("{}_H", type_name.to_uppercase());
    let _ = writeln!(out, "#ifndef {guard}");
    let _ = writeln!(out, "#define {guard}");
    let _ = writeln!(out, "#include <stdbool.h>");
    out.push('\n');

    let _ = writeln!(out, "enum {type_name}_state {{");
    for location in definition.locations.values() {
        let _ = writeln!(out, "    {},", state_macro(type_name, &location.name));
    }
    let _ = writeln!(out, "}};");
    out.push('\n');

    let _ = writeln!(out, "typedef struct {type_name} {{");
    let _ = writeln!(out, "    enum {type_name}_state state;");
    // Declaration order: external inputs, external outputs, internals,
    // parameters (spec.md §4.6.1).
    for locality in [
        Locality::ExternalInput,
        Locality::ExternalOutput,
        Locality::Internal,
        Locality::Parameter,
    ] {
        for variable in definition.variables_with_locality(locality) {
            let _ = writeln!(
                out,
                "    {} {};",
                CTypes.lower_type(variable.var_type),
                field_name(variable)
            );
            if let Some(buffer) = delay_plan.get(&variable.name) {
                let _ = writeln!(
                    out,
                    "    {} {}_buf[{}];",
                    CTypes.lower_type(variable.var_type),
                    field_name(variable),
                    buffer.length
                );
                let _ = writeln!(out, "    int {}_head;", field_name(variable));
            }
            if matches!(locality, Locality::Internal | Locality::ExternalOutput) {
                let _ = writeln!(
                    out,
                    "    {} {}_update;",
                    CTypes.lower_type(variable.var_type),
                    field_name(variable)
                );
            }
        }
    }
    let _ = writeln!(out, "}} {type_name};");
    out.push('\n');

    let _ = writeln!(out, "void {type_name}_init({type_name} *self);");
    let _ = writeln!(out, "void {type_name}_run({type_name} *self, double step_size);");
    out.push('\n');
    let _ = writeln!(out, "#endif");
    out
}

fn emit_body(
    definition: &Definition,
    type_name: &str,
    config: &CodegenConfig,
    delay_plan: &DelayPlan,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#include \"{type_name}.h\"");
    let _ = writeln!(out, "#include <math.h>");
    let _ = writeln!(out, "#include <string.h>");
    out.push('\n');

    emit_init(&mut out, definition, type_name, delay_plan);
    out.push('\n');
    emit_run(&mut out, definition, type_name, config, delay_plan);
    out
}

fn emit_init(out: &mut String, definition: &Definition, type_name: &str, delay_plan: &DelayPlan) {
    let _ = writeln!(out, "void {type_name}_init({type_name} *self) {{");
    let _ = writeln!(out, "    memset(self, 0, sizeof(*self));");
    let prefix = field_prefix(definition);
    for variable in definition.variables.values() {
        if let Some(default) = &variable.default {
            let rendered = lower_formula(default, &prefix, &CFormula);
            let _ = writeln!(out, "    self->{} = {};", field_name(variable), rendered);
        }
    }
    for (name, value) in &definition.init.valuations {
        let rendered = lower_formula(value, &prefix, &CFormula);
        let field = field_name(&definition.variables[name]);
        let _ = writeln!(out, "    self->{field} = {rendered};");
    }
    for variable in definition.variables.values() {
        if let Some(buffer) = delay_plan.get(&variable.name) {
            let field = field_name(variable);
            let _ = writeln!(out, "    for (int i = 0; i < {}; i++) {{", buffer.length);
            let _ = writeln!(out, "        self->{field}_buf[i] = self->{field};");
            let _ = writeln!(out, "    }}");
            let _ = writeln!(out, "    self->{field}_head = 0;");
        }
    }
    let _ = writeln!(
        out,
        "    self->state = {};",
        state_macro(type_name, &definition.init.initial_location)
    );
    let _ = writeln!(out, "}}");
}

/// Resolves every declared variable name to its mangled, locality-suffixed
/// struct field (`voltage` -> `self->voltage_out`) so Formula reads inside
/// a Definition's own guards/flows/updates land on the right field — the
/// Formula AST only ever carries the declared name.
fn field_prefix(definition: &Definition) -> PrefixData {
    let mut prefix = PrefixData::new("self->");
    for variable in definition.variables.values() {
        prefix = prefix.with_substitution(&variable.name, format!("self->{}", field_name(variable)));
    }
    prefix
}

/// Layers the ring-buffer read rewrite for every variable in `delay_plan`
/// on top of [`field_prefix`] — writes are emitted separately by
/// [`write_shadow`]/[`commit_shadow`], only reads need this.
fn delayed_read_prefix(definition: &Definition, delay_plan: &DelayPlan) -> PrefixData {
    let mut prefix = field_prefix(definition);
    for variable in definition.variables.values() {
        if delay_plan.contains_key(&variable.name) {
            let field = field_name(variable);
            prefix = prefix.with_substitution(
                &variable.name,
                format!("self->{field}_buf[self->{field}_head]"),
            );
        }
    }
    prefix
}

/// Writes `self->{field}_update = {rendered};` for the variable declared
/// as `name` (spec.md §5: "computing into shadow `*_update` variables").
/// `rendered` is lowered against the entry-valuation read prefix, so every
/// read in it still sees `self`'s state as of tick start no matter how
/// many sibling updates have already had their shadow computed this tick.
fn write_shadow(out: &mut String, indent: &str, definition: &Definition, name: &str, rendered: &str) {
    let field = field_name(&definition.variables[name]);
    let _ = writeln!(out, "{indent}self->{field}_update = {rendered};");
}

/// Commits the shadow value computed by [`write_shadow`] into the real
/// field, then if `name` is delay-buffered, pushes the committed value
/// into its ring buffer and advances the head (spec.md §4.5 step 2:
/// "writes advance the head"). Called once every sibling update's shadow
/// has been computed, so commit order cannot affect any read.
fn commit_shadow(
    out: &mut String,
    indent: &str,
    definition: &Definition,
    name: &str,
    delay_plan: &DelayPlan,
) {
    let field = field_name(&definition.variables[name]);
    let _ = writeln!(out, "{indent}self->{field} = self->{field}_update;");
    if let Some(buffer) = delay_plan.get(name) {
        let _ = writeln!(
            out,
            "{indent}self->{field}_buf[self->{field}_head] = self->{field};"
        );
        let _ = writeln!(
            out,
            "{indent}self->{field}_head = (self->{field}_head + 1) % {};",
            buffer.length
        );
    }
}

fn emit_run(
    out: &mut String,
    definition: &Definition,
    type_name: &str,
    config: &CodegenConfig,
    delay_plan: &DelayPlan,
) {
    let _ = writeln!(out, "void {type_name}_run({type_name} *self, double step_size) {{");
    let _ = writeln!(out, "    int transitions_left = {};", config.maximum_inter_transitions);
    let _ = writeln!(out, "    bool fired = true;");
    let _ = writeln!(out, "    while (fired && transitions_left > 0) {{");
    let _ = writeln!(out, "        fired = false;");
    let _ = writeln!(out, "        switch (self->state) {{");
    let read_prefix = delayed_read_prefix(definition, delay_plan);
    for location in definition.locations.values() {
        let _ = writeln!(out, "        case {}:", state_macro(type_name, &location.name));
        for transition in &location.transitions {
            let guard = lower_formula(&transition.guard, &read_prefix, &CFormula);
            let _ = writeln!(out, "            if ({guard}) {{");
            for (name, update) in &transition.update {
                let rendered = lower_formula(update, &read_prefix, &CFormula);
                write_shadow(out, "                ", definition, name, &rendered);
            }
            for name in transition.update.keys() {
                commit_shadow(out, "                ", definition, name, delay_plan);
            }
            let _ = writeln!(
                out,
                "                self->state = {};",
                state_macro(type_name, &transition.target)
            );
            let _ = writeln!(out, "                fired = true;");
            let _ = writeln!(out, "                transitions_left--;");
            let _ = writeln!(out, "                break;");
            let _ = writeln!(out, "            }}");
        }
        let _ = writeln!(out, "            break;");
    }
    let _ = writeln!(out, "        }}");
    let _ = writeln!(out, "    }}");
    out.push('\n');

    let _ = writeln!(
        out,
        "    if (!fired || {}) {{",
        if config.require_one_intra_transition_per_tick {
            "true"
        } else {
            "!fired"
        }
    );
    let _ = writeln!(out, "        switch (self->state) {{");
    for location in definition.locations.values() {
        let _ = writeln!(out, "        case {}:", state_macro(type_name, &location.name));
        for (name, flow) in &location.flow {
            let rendered = lower_formula(flow, &read_prefix, &CFormula);
            let field = field_name(&definition.variables[name]);
            let value = format!("self->{field} + ({rendered}) * step_size");
            write_shadow(out, "            ", definition, name, &value);
        }
        for (name, update) in &location.update {
            let rendered = lower_formula(update, &read_prefix, &CFormula);
            write_shadow(out, "            ", definition, name, &rendered);
        }
        for name in location.flow.keys().chain(location.update.keys()) {
            commit_shadow(out, "            ", definition, name, delay_plan);
        }
        let _ = writeln!(out, "            break;");
    }
    let _ = writeln!(out, "        }}");
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "}}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanc_formula::VarType;
    use hanc_ir::{Initialisation, Location, Variable};
    use hanc_transform::DelayBuffer;
    use indexmap::IndexMap;

    #[test]
    fn emits_header_with_state_enum_and_struct_fields() {
        let init = Initialisation {
            initial_location: "idle".to_string(),
            valuations: IndexMap::new(),
        };
        let mut def = Definition::new("Gate", init);
        def.add_variable(Variable::new("x", VarType::Real, Locality::Internal))
            .unwrap();
        def.add_location(Location::new("idle")).unwrap();

        let unit = emit_definition(&def, &CodegenConfig::default(), &DelayPlan::new());
        assert!(unit.header.contains("enum gate_state"));
        assert!(unit.header.contains("GATE_STATE_IDLE"));
        assert!(unit.header.contains("double x;"));
        assert!(unit.body.contains("gate_init"));
        assert!(unit.body.contains("gate_run"));
    }

    #[test]
    fn delayed_variable_gets_ring_buffer_and_rewritten_reads() {
        let init = Initialisation {
            initial_location: "idle".to_string(),
            valuations: IndexMap::new(),
        };
        let mut def = Definition::new("Gate", init);
        def.add_variable(
            Variable::new("x", VarType::Real, Locality::Internal)
                .with_delayable_by(hanc_formula::Formula::real(0.005)),
        )
        .unwrap();
        let mut loc = Location::new("idle");
        loc.flow
            .insert("x".to_string(), hanc_formula::parse("x + 1.0").unwrap());
        def.add_location(loc).unwrap();

        let mut plan = DelayPlan::new();
        plan.insert("x".to_string(), DelayBuffer { length: 6 });

        let unit = emit_definition(&def, &CodegenConfig::default(), &plan);
        assert!(unit.header.contains("double x_buf[6];"));
        assert!(unit.header.contains("int x_head;"));
        assert!(unit.body.contains("self->x_buf[self->x_head]"));
        assert!(unit.body.contains("self->x_head = (self->x_head + 1) % 6;"));
    }

    /// A coupled Euler step (`v' = f(w)`, `w' = g(v)`) must read both
    /// variables as of tick start: every RHS lands in a `*_update` shadow
    /// before either field is committed, so `w`'s flow never sees `v`'s
    /// already-advanced value.
    #[test]
    fn coupled_flows_read_entry_valuation_not_sibling_updates() {
        let init = Initialisation {
            initial_location: "idle".to_string(),
            valuations: IndexMap::new(),
        };
        let mut def = Definition::new("Couple", init);
        def.add_variable(Variable::new("v", VarType::Real, Locality::Internal))
            .unwrap();
        def.add_variable(Variable::new("w", VarType::Real, Locality::Internal))
            .unwrap();
        let mut loc = Location::new("idle");
        loc.flow.insert("v".to_string(), hanc_formula::parse("w").unwrap());
        loc.flow.insert("w".to_string(), hanc_formula::parse("v").unwrap());
        def.add_location(loc).unwrap();

        let unit = emit_definition(&def, &CodegenConfig::default(), &DelayPlan::new());
        assert!(unit.body.contains("self->v_update = self->v + (self->w) * step_size;"));
        assert!(unit.body.contains("self->w_update = self->w + (self->v) * step_size;"));
        let v_commit = unit.body.find("self->v = self->v_update;").unwrap();
        let w_shadow = unit.body.find("self->w_update = self->w + (self->v)").unwrap();
        assert!(
            w_shadow < v_commit,
            "w's shadow must be computed from v's entry value, before v commits"
        );
    }
}
