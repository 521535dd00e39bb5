//! Indentation writer shared by every back-end (spec.md §4.6, §6
//! `codegenConfig.indentSize`: "negative means tabs").

use std::fmt::Write as _;

use hanc_ir::CodegenConfig;

/// One unit of indentation, resolved once from a [`CodegenConfig`] and then
/// pushed/popped as emission walks into nested blocks.
#[derive(Clone, Debug)]
pub struct Indent {
    unit: String,
    level: usize,
}

impl Indent {
    #[must_use]
    pub fn new(config: &CodegenConfig) -> Self {
        let unit = if config.uses_tabs() {
            "\t".to_string()
        } else {
            " ".repeat(config.indent_size.unsigned_abs() as usize)
        };
        Self { unit, level: 0 }
    }

    pub fn push(&mut self) {
        self.level += 1;
    }

    pub fn pop(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Writes the current indentation level's worth of whitespace to `out`.
    pub fn write(&self, out: &mut String) {
        for _ in 0..self.level {
            out.push_str(&self.unit);
        }
    }

    /// Writes the current indentation followed by `line` and a newline.
    pub fn writeln(&self, out: &mut String, line: &str) {
        self.write(out);
        let _ = writeln!(out, "{line}");
    }
}
