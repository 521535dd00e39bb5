//! Variable collection and return-type unification over a [`Program`]
//! (spec.md §4.2 "Variable collection", §4.3).

use std::collections::HashMap;

use hanc_formula::{result_type, FuncTypes, VarType};

use crate::ast::{Line, Program};
use crate::errors::ProgramError;

/// `collectVariables(externals, knownFunctionTypes)` (spec.md §4.3).
///
/// A single mutable table is threaded through the whole (possibly nested)
/// tree in textual order, so a variable first assigned inside a nested
/// `if` is recorded in the very same table an enclosing sibling sees —
/// "hoisted to the scope where the name first becomes reachable" (spec.md
/// §4.2) falls out of sharing one table rather than scoping a fresh one per
/// level. Externals seed the table as already-typed and are never
/// re-inferred.
pub fn collect_variables(
    program: &Program,
    externals: &HashMap<String, VarType>,
    func_types: &FuncTypes,
) -> Result<HashMap<String, VarType>, ProgramError> {
    let mut vars = externals.clone();
    collect_at_level(program, &mut vars, func_types)?;
    Ok(vars)
}

fn collect_at_level(
    program: &Program,
    vars: &mut HashMap<String, VarType>,
    func_types: &FuncTypes,
) -> Result<(), ProgramError> {
    for line in &program.lines {
        match line {
            Line::Assignment { target, value } => {
                let ty = result_type(value, vars, func_types)?;
                register_assignment(vars, target, ty)?;
            }
            Line::If { body, .. } | Line::ElseIf { body, .. } | Line::Else { body } => {
                collect_at_level(body, vars, func_types)?;
            }
            Line::Statement(_) | Line::Return(_) => {}
        }
    }
    Ok(())
}

fn register_assignment(
    vars: &mut HashMap<String, VarType>,
    target: &str,
    ty: VarType,
) -> Result<(), ProgramError> {
    match vars.get(target) {
        None => {
            vars.insert(target.to_string(), ty);
            Ok(())
        }
        Some(existing) if *existing == ty => Ok(()),
        Some(existing) => Err(ProgramError::TypeConflict {
            name: target.to_string(),
            previous: *existing,
            found: ty,
        }),
    }
}

/// `combine(a, b)` (spec.md §4.3): `None` is dominated by any concrete type;
/// two equal concrete types combine to that type; two unequal concrete
/// types raise `ReturnTypeConflict`.
pub fn combine(a: Option<VarType>, b: Option<VarType>) -> Result<Option<VarType>, ProgramError> {
    match (a, b) {
        (None, x) | (x, None) => Ok(x),
        (Some(x), Some(y)) if x == y => Ok(Some(x)),
        (Some(first), Some(second)) => Err(ProgramError::ReturnTypeConflict { first, second }),
    }
}

/// Recovers the [`Program`]'s return type by unifying every `return` site
/// and every recursive sub-`Program` (spec.md §3.2, §4.3). `vars` should be
/// the table produced by [`collect_variables`] so that `return`ed variable
/// references resolve.
pub fn return_type(
    program: &Program,
    vars: &HashMap<String, VarType>,
    func_types: &FuncTypes,
) -> Result<Option<VarType>, ProgramError> {
    let mut acc = None;
    for line in &program.lines {
        let found = match line {
            Line::Return(formula) => Some(result_type(formula, vars, func_types)?),
            Line::If { body, .. } | Line::ElseIf { body, .. } | Line::Else { body } => {
                return_type(body, vars, func_types)?
            }
            Line::Statement(_) | Line::Assignment { .. } => None,
        };
        if let Some(ty) = found {
            acc = combine(acc, Some(ty))?;
        }
    }
    Ok(acc)
}
