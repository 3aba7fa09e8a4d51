//! Diagnostic sink shared by every production of one parser.

use super::ParseError;
use balsyn_ast::foundation::LineIndex;

/// Collected syntax errors, capped at a configured maximum.
///
/// Errors past the cap are counted but not stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    errors: Vec<ParseError>,
    max_errors: usize,
    suppressed: usize,
}

impl Diagnostics {
    /// Create an empty sink keeping at most `max_errors` diagnostics.
    pub fn new(max_errors: usize) -> Self {
        Self {
            errors: Vec::new(),
            max_errors,
            suppressed: 0,
        }
    }

    /// Record a diagnostic.
    pub fn push(&mut self, error: ParseError) {
        if self.errors.len() < self.max_errors {
            self.errors.push(error);
        } else {
            self.suppressed += 1;
        }
    }

    /// Stored diagnostics in the order they were reported.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Iterate over stored diagnostics.
    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.errors.iter()
    }

    /// Number of stored diagnostics.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no diagnostic was reported at all.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.suppressed == 0
    }

    /// Number of diagnostics dropped because the cap was reached.
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    /// Sink state, for rollback.
    pub(crate) fn checkpoint(&self) -> (usize, usize) {
        (self.errors.len(), self.suppressed)
    }

    /// Drop everything reported after `checkpoint`.
    pub(crate) fn rollback(&mut self, checkpoint: (usize, usize)) {
        self.errors.truncate(checkpoint.0);
        self.suppressed = checkpoint.1;
    }

    /// Render diagnostics as `line:col: message` lines against `source`.
    pub fn render(&self, source: &str) -> String {
        let index = LineIndex::new(source);
        let mut out = String::new();
        for error in &self.errors {
            let (line, col) = index.line_col(error.span.start);
            out.push_str(&format!("{}:{}: {}\n", line, col, error.message));
        }
        if self.suppressed > 0 {
            out.push_str(&format!("... and {} more\n", self.suppressed));
        }
        out
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balsyn_ast::foundation::Span;

    fn error(start: u32) -> ParseError {
        ParseError::invalid_syntax("oops", Span::new(0, start, start + 1))
    }

    #[test]
    fn test_cap_counts_suppressed() {
        let mut sink = Diagnostics::new(2);
        for i in 0..5 {
            sink.push(error(i));
        }
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.suppressed(), 3);
        assert!(!sink.is_empty());
    }

    #[test]
    fn test_rollback_restores_checkpoint() {
        let mut sink = Diagnostics::new(1);
        sink.push(error(0));
        let checkpoint = sink.checkpoint();
        sink.push(error(1));
        sink.push(error(2));
        sink.rollback(checkpoint);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.suppressed(), 0);
    }

    #[test]
    fn test_render_line_and_column() {
        let mut sink = Diagnostics::new(10);
        sink.push(ParseError::invalid_syntax("bad", Span::new(0, 4, 5)));
        assert_eq!(sink.render("ab\ncd;"), "2:2: bad\n");
    }
}
