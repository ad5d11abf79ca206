//! One-line-context diagnostics
//!
//! [`ErrorReporter`] renders a parse or lex failure against the text it was
//! produced from: the error's line number, the full source line containing
//! the offending offset, and a caret aligned under the offending column.
//!
//! Offsets index the text as it exists after preprocessing; on heavily
//! macro-substituted input the caret may drift from the raw input's columns.

/// Renders diagnostics for one input string.
pub struct ErrorReporter {
    content: Vec<char>,
}

impl ErrorReporter {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.chars().collect(),
        }
    }

    /// Render a caret diagnostic for an error at `offset` on `line`.
    pub fn render(&self, line: usize, offset: usize, message: &str) -> String {
        let offset = offset.min(self.content.len());

        let mut start = offset;
        while start > 0 && self.content[start - 1] != '\n' {
            start -= 1;
        }

        let mut end = offset;
        while end < self.content.len() && self.content[end] != '\n' {
            end += 1;
        }

        let source_line: String = self.content[start..end].iter().collect();
        let padding = " ".repeat(offset - start);

        format!("Error: {}\n{}\n{}^ {}", line, source_line, padding, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caret_alignment() {
        let reporter = ErrorReporter::new("int a;\nint b c;\nint d;");
        let rendered = reporter.render(2, 13, "expected ','");

        assert_eq!(rendered, "Error: 2\nint b c;\n      ^ expected ','");
    }

    #[test]
    fn test_offset_at_end_of_input() {
        let reporter = ErrorReporter::new("int a");
        let rendered = reporter.render(1, 5, "expected ';'");

        assert_eq!(rendered, "Error: 1\nint a\n     ^ expected ';'");
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let reporter = ErrorReporter::new("int");
        let rendered = reporter.render(1, 99, "expected ';'");

        assert_eq!(rendered, "Error: 1\nint\n   ^ expected ';'");
    }
}
