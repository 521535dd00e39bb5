use std::fmt;

/// A position in a formula source string.
///
/// Trimmed down from the teacher's `inference_ast::nodes::Location`: this
/// compiler has no IDE consumer, so there is no need to carry a CST byte
/// range or a copy of the originating source text, only enough to print a
/// `line:column` diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
