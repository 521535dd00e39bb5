//! Identifier mangling shared by every back-end (spec.md §4.6): file names
//! lowercase-snake, macro names uppercase-snake, variable names carry a
//! locality suffix so a reader can tell an external input from an
//! internal apart at the call site.

use hanc_ir::Locality;

/// Splits `name` on non-alphanumeric boundaries and case transitions, the
/// way `mangle_file_name`/`mangle_macro_name` both need to before
/// re-joining with their own separator and case.
fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() && prev_lower {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            prev_lower = ch.is_lowercase();
            current.push(ch);
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
            prev_lower = false;
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Lowercase, underscore-separated file stem for a Definition/Network name
/// (e.g. `SA_Node` -> `sa_node`).
#[must_use]
pub fn mangle_file_name(name: &str) -> String {
    words(name)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Uppercase, underscore-separated macro/constant name (e.g. `stepSize` ->
/// `STEP_SIZE`).
#[must_use]
pub fn mangle_macro_name(name: &str) -> String {
    words(name)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Locality suffix applied to a variable's mangled name so a reader (and
/// the back-end's own generated comments) can tell at a glance which
/// struct field category it lives in.
#[must_use]
pub fn locality_suffix(locality: Locality) -> &'static str {
    match locality {
        Locality::ExternalInput => "_in",
        Locality::ExternalOutput => "_out",
        Locality::Parameter => "_param",
        Locality::Internal => "",
    }
}

/// Mangles a variable name for back-end emission: lowercase-snake plus its
/// locality suffix.
#[must_use]
pub fn mangle_variable_name(name: &str, locality: Locality) -> String {
    format!("{}{}", mangle_file_name(name), locality_suffix(locality))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_lowercases_camel_case() {
        assert_eq!(mangle_file_name("SA_Node"), "sa_node");
        assert_eq!(mangle_file_name("stepSize"), "step_size");
    }

    #[test]
    fn macro_name_uppercases() {
        assert_eq!(mangle_macro_name("stepSize"), "STEP_SIZE");
    }

    #[test]
    fn variable_name_carries_locality_suffix() {
        assert_eq!(
            mangle_variable_name("voltage", Locality::ExternalOutput),
            "voltage_out"
        );
        assert_eq!(
            mangle_variable_name("gain", Locality::Parameter),
            "gain_param"
        );
        assert_eq!(
            mangle_variable_name("x", Locality::Internal),
            "x"
        );
    }
}
