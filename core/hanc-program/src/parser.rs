//! Line-oriented parser for the Program statement language (spec.md §4.2).

use hanc_formula::parse as parse_formula;

use crate::ast::{Line, Program};
use crate::errors::ProgramError;

/// Parses `text` into a [`Program`] (spec.md §4.2).
pub fn parse(text: &str) -> Result<Program, ProgramError> {
    parse_at(text, 0)
}

fn parse_at(text: &str, line_offset: usize) -> Result<Program, ProgramError> {
    let mut lines = Vec::new();
    let mut pos = 0usize;
    while pos < text.len() {
        let line_end = text[pos..].find('\n').map_or(text.len(), |o| pos + o);
        let raw_line = &text[pos..line_end];
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            pos = advance_past_newline(text, line_end);
            continue;
        }

        let current_line = line_offset + count_newlines(&text[..pos]) + 1;

        if let Some(kind) = try_conditional(trimmed) {
            let body_start = advance_past_newline(text, line_end);
            let (body_text, after_brace) = extract_brace_body(text, body_start, current_line)?;
            let body_line_offset = line_offset + count_newlines(&text[..body_start]);
            let body = parse_at(body_text, body_line_offset)?;
            lines.push(kind.into_line(body)?);
            pos = if text.as_bytes().get(after_brace) == Some(&b'\n') {
                after_brace + 1
            } else {
                after_brace
            };
            continue;
        }

        if let Some(expr_text) = strip_return_prefix(trimmed) {
            let formula = parse_formula(expr_text)?;
            lines.push(Line::Return(formula));
            pos = advance_past_newline(text, line_end);
            continue;
        }

        if let Some((target, expr_text)) = try_assignment(trimmed) {
            let formula = parse_formula(expr_text)?;
            lines.push(Line::Assignment {
                target: target.to_string(),
                value: formula,
            });
            pos = advance_past_newline(text, line_end);
            continue;
        }

        let formula = parse_formula(trimmed)?;
        lines.push(Line::Statement(formula));
        pos = advance_past_newline(text, line_end);
    }
    Ok(Program::new(lines))
}

fn advance_past_newline(text: &str, line_end: usize) -> usize {
    if line_end < text.len() {
        line_end + 1
    } else {
        line_end
    }
}

fn count_newlines(s: &str) -> usize {
    s.bytes().filter(|&b| b == b'\n').count()
}

enum ConditionalKind<'a> {
    If(&'a str),
    ElseIf(&'a str),
    Else,
}

impl<'a> ConditionalKind<'a> {
    fn into_line(self, body: Program) -> Result<Line, ProgramError> {
        Ok(match self {
            ConditionalKind::If(cond) => Line::If {
                condition: parse_formula(cond)?,
                body,
            },
            ConditionalKind::ElseIf(cond) => Line::ElseIf {
                condition: parse_formula(cond)?,
                body,
            },
            ConditionalKind::Else => Line::Else { body },
        })
    }
}

/// Recognises `if (…) {`, `else if (…) {`, and `else {` headers
/// (spec.md §4.2). The header's condition must appear on the same physical
/// line as the header keyword and brace.
fn try_conditional(trimmed: &str) -> Option<ConditionalKind<'_>> {
    if let Some(rest) = trimmed.strip_prefix("else") {
        let rest = rest.trim_start();
        if let Some(rest) = rest.strip_prefix("if") {
            let rest = rest.trim_start();
            if rest.starts_with('(') && rest.ends_with('{') {
                return extract_condition(rest).map(ConditionalKind::ElseIf);
            }
            return None;
        }
        if rest == "{" {
            return Some(ConditionalKind::Else);
        }
        return None;
    }
    if let Some(rest) = trimmed.strip_prefix("if") {
        let rest = rest.trim_start();
        if rest.starts_with('(') && rest.ends_with('{') {
            return extract_condition(rest).map(ConditionalKind::If);
        }
    }
    None
}

/// `s` starts with `(` and ends with `{`; extracts the text strictly
/// between the matching parens, requiring nothing but whitespace between
/// the closing paren and the trailing brace.
fn extract_condition(s: &str) -> Option<&str> {
    let mut depth: i32 = 0;
    let mut close_idx = None;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    close_idx = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let close_idx = close_idx?;
    if s[close_idx + 1..].trim() != "{" {
        return None;
    }
    Some(s[1..close_idx].trim())
}

/// Scans forward from `start` counting brace depth (starting at 1, for the
/// `{` that closed the header line) until depth returns to zero, per
/// spec.md §4.2. Returns `(body_text, index_right_after_closing_brace)`.
fn extract_brace_body(
    text: &str,
    start: usize,
    header_line: usize,
) -> Result<(&str, usize), ProgramError> {
    let mut depth: i32 = 1;
    for (offset, c) in text[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let close = start + offset;
                    return Ok((&text[start..close], close + 1));
                }
            }
            _ => {}
        }
    }
    Err(ProgramError::UnbalancedBraces { line: header_line })
}

fn strip_return_prefix(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix("return")?;
    if rest.is_empty() {
        return None;
    }
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn try_assignment(trimmed: &str) -> Option<(&str, &str)> {
    let eq_idx = find_assignment_operator(trimmed)?;
    let target = trimmed[..eq_idx].trim();
    let value = trimmed[eq_idx + 1..].trim();
    if !is_identifier(target) || value.is_empty() {
        return None;
    }
    Some((target, value))
}

fn find_assignment_operator(s: &str) -> Option<usize> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    for (idx, &(byte_i, c)) in chars.iter().enumerate() {
        if c != '=' {
            continue;
        }
        let prev = if idx > 0 { Some(chars[idx - 1].1) } else { None };
        let next = chars.get(idx + 1).map(|&(_, c)| c);
        if next == Some('=') {
            continue;
        }
        if matches!(prev, Some('=') | Some('!') | Some('<') | Some('>')) {
            continue;
        }
        return Some(byte_i);
    }
    None
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanc_formula::Formula;

    #[test]
    fn parses_assignment_and_return() {
        let p = parse("x = 1 + 2\nreturn x\n").unwrap();
        assert_eq!(
            p.lines,
            vec![
                Line::Assignment {
                    target: "x".to_string(),
                    value: hanc_formula::parse("1 + 2").unwrap(),
                },
                Line::Return(Formula::var("x")),
            ]
        );
    }

    #[test]
    fn parses_if_else_chain() {
        let src = "if (x > 0) {\n  y = 1\n} else if (x < 0) {\n  y = -1\n} else {\n  y = 0\n}\n";
        let p = parse(src).unwrap();
        assert_eq!(p.lines.len(), 3);
        assert!(matches!(p.lines[0], Line::If { .. }));
        assert!(matches!(p.lines[1], Line::ElseIf { .. }));
        assert!(matches!(p.lines[2], Line::Else { .. }));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let p = parse("\n\nx = 1\n\n\nreturn x\n").unwrap();
        assert_eq!(p.lines.len(), 2);
    }

    #[test]
    fn nested_if_bodies() {
        let src = "if (a) {\n  if (b) {\n    x = 1\n  }\n}\n";
        let p = parse(src).unwrap();
        let Line::If { body, .. } = &p.lines[0] else {
            panic!("expected if")
        };
        assert_eq!(body.lines.len(), 1);
        assert!(matches!(body.lines[0], Line::If { .. }));
    }

    #[test]
    fn unbalanced_braces_error() {
        let err = parse("if (a) {\n  x = 1\n").unwrap_err();
        assert!(matches!(err, ProgramError::UnbalancedBraces { .. }));
    }

    #[test]
    fn condition_with_nested_parens() {
        let src = "if (a && (b || c)) {\n  x = 1\n}\n";
        let p = parse(src).unwrap();
        assert!(matches!(p.lines[0], Line::If { .. }));
    }

    #[test]
    fn bare_expression_statement() {
        let p = parse("foo(x)\n").unwrap();
        assert_eq!(
            p.lines,
            vec![Line::Statement(hanc_formula::parse("foo(x)").unwrap())]
        );
    }

    #[test]
    fn comparison_operators_do_not_confuse_assignment_detection() {
        let p = parse("ok = x >= 1 && x <= 2\n").unwrap();
        assert_eq!(
            p.lines,
            vec![Line::Assignment {
                target: "ok".to_string(),
                value: hanc_formula::parse("x >= 1 && x <= 2").unwrap(),
            }]
        );
    }
}
