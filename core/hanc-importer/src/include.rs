//! `!include <path>` textual splice (spec.md §4.4).
//!
//! The include mechanism runs *before* YAML parsing: it is a plain text
//! substitution, so `!include` can appear anywhere a scalar value is
//! expected and the spliced-in content is itself re-scanned for further
//! `!include` tokens, recursively. Relative paths resolve against the file
//! that contained the tag; absolute paths are used as-is.

use std::path::{Path, PathBuf};

use crate::errors::ImportError;

const TAG: &str = "!include";

/// Reads `path` and recursively splices in every `!include` it contains,
/// returning the fully-resolved document text.
pub fn resolve(path: &Path) -> Result<String, ImportError> {
    let mut stack = Vec::new();
    resolve_at(path, &mut stack)
}

fn resolve_at(path: &Path, stack: &mut Vec<PathBuf>) -> Result<String, ImportError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if let Some(pos) = stack.iter().position(|p| p == &canonical) {
        let mut cycle: Vec<String> = stack[pos..]
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        cycle.push(canonical.display().to_string());
        return Err(ImportError::IncludeCycle { cycle });
    }

    let text = read_with_retry(path)?;
    stack.push(canonical);
    let resolved = splice(&text, path, stack)?;
    stack.pop();
    Ok(resolved)
}

/// Reads `path`, retrying once on a transient I/O error (spec.md §7: "only
/// the Importer's include resolver retries (once) for a transient
/// filesystem error"). A second failure is returned as-is; `NotFound` and
/// other non-transient errors are never retried.
fn read_with_retry(path: &Path) -> std::io::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if is_transient(&err) => std::fs::read_to_string(path),
        Err(err) => Err(err),
    }
}

fn is_transient(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::Interrupted | std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}

/// Finds every `!include <path>` occurrence in `text` and replaces it with
/// the recursively-resolved content of the referenced file. `base` is the
/// file `text` came from, used to resolve relative include paths.
fn splice(text: &str, base: &Path, stack: &mut Vec<PathBuf>) -> Result<String, ImportError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(tag_pos) = rest.find(TAG) {
        out.push_str(&rest[..tag_pos]);
        let after_tag = &rest[tag_pos + TAG.len()..];
        let (raw_arg, remainder) = take_argument(after_tag);
        let included_path = resolve_relative(base, raw_arg.trim());
        let included_text = resolve_at(&included_path, stack)?;
        out.push_str(included_text.trim_end_matches('\n'));
        rest = remainder;
    }
    out.push_str(rest);
    Ok(out)
}

/// Splits off the whitespace-delimited (optionally quoted) path argument
/// immediately following an `!include` tag.
fn take_argument(s: &str) -> (&str, &str) {
    let s = s.trim_start_matches([' ', '\t']);
    if let Some(rest) = s.strip_prefix('"') {
        if let Some(end) = rest.find('"') {
            return (&rest[..end], &rest[end + 1..]);
        }
    }
    if let Some(rest) = s.strip_prefix('\'') {
        if let Some(end) = rest.find('\'') {
            return (&rest[..end], &rest[end + 1..]);
        }
    }
    let end = s.find(['\n', ' ', '\t']).unwrap_or(s.len());
    (&s[..end], &s[end..])
}

fn resolve_relative(base: &Path, arg: &str) -> PathBuf {
    let candidate = Path::new(arg);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }
    base.parent()
        .map(|dir| dir.join(candidate))
        .unwrap_or_else(|| candidate.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn splices_included_file_content() {
        let dir = tempfile::tempdir().unwrap();
        let included_path = dir.path().join("inner.yaml");
        std::fs::File::create(&included_path)
            .unwrap()
            .write_all(b"inner: value\n")
            .unwrap();

        let root_path = dir.path().join("root.yaml");
        std::fs::File::create(&root_path)
            .unwrap()
            .write_all(b"outer: !include inner.yaml\n")
            .unwrap();

        let resolved = resolve(&root_path).unwrap();
        assert_eq!(resolved, "outer: inner: value\n");
    }

    #[test]
    fn retries_once_on_a_transient_read_error() {
        use std::io::ErrorKind;

        let transient = std::io::Error::from(ErrorKind::Interrupted);
        assert!(is_transient(&transient));
        let permanent = std::io::Error::from(ErrorKind::NotFound);
        assert!(!is_transient(&permanent));
    }

    #[test]
    fn detects_include_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let a_path = dir.path().join("a.yaml");
        let b_path = dir.path().join("b.yaml");
        std::fs::File::create(&a_path)
            .unwrap()
            .write_all(b"!include b.yaml\n")
            .unwrap();
        std::fs::File::create(&b_path)
            .unwrap()
            .write_all(b"!include a.yaml\n")
            .unwrap();

        let err = resolve(&a_path).unwrap_err();
        assert!(matches!(err, ImportError::IncludeCycle { .. }));
    }
}
