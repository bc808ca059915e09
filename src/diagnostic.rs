//! The boundary through which the scanner and parser report errors.

/// Receives `(message, offset)` reports. What happens next (printing,
/// collecting, exiting) is up to the implementation.
pub trait DiagnosticSink {
    fn report(&mut self, message: String, offset: usize);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub offset: usize,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }

    /// The 1-based line and column of this diagnostic within `source`.
    pub fn location(&self, source: &str) -> (usize, usize) {
        let mut line = 1;
        let mut column = 1;
        for (index, c) in source.char_indices() {
            if index >= self.offset {
                break;
            }
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }

    pub fn render(&self, source: &str) -> String {
        let (line, column) = self.location(source);
        let line_text = source.lines().nth(line - 1).unwrap_or("");
        format!(
            "error:{line}:{column}: {}\n  {line_text}\n  {}^",
            self.message,
            " ".repeat(column - 1)
        )
    }
}

/// A sink that keeps every report in order.
#[derive(Debug, Default)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, message: String, offset: usize) {
        self.items.push(Diagnostic::new(message, offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_counts_lines_and_columns() {
        let source = "class C {\n  int 1a;\n}";
        let diagnostic = Diagnostic::new("bad", 16);
        assert_eq!(diagnostic.location(source), (2, 7));
    }

    #[test]
    fn render_points_at_the_offending_column() {
        let source = "int 123abc;";
        let rendered = Diagnostic::new("illegal", 4).render(source);
        assert_eq!(rendered, "error:1:5: illegal\n  int 123abc;\n      ^");
    }

    #[test]
    fn diagnostics_collect_in_report_order() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.report("first".to_owned(), 3);
        diagnostics.report("second".to_owned(), 1);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.items[0], Diagnostic::new("first", 3));
        assert_eq!(diagnostics.items[1].offset, 1);
    }
}
