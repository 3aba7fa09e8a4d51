//! Parse error types and error recovery.

use balsyn_ast::foundation::Span;
use balsyn_lexer::Token;
use thiserror::Error;

/// Parse error with source location and context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at {span}")]
pub struct ParseError {
    /// Kind of parse error
    pub kind: ParseErrorKind,
    /// Source location where error occurred
    pub span: Span,
    /// Human-readable error message
    pub message: String,
    /// Recovery action taken after the error, once it has been recovered
    pub recovery: Option<Recovery>,
}

/// Category of parse error.
///
/// Each variant represents a specific class of parsing failure so that
/// tools can filter diagnostics without matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The current token cannot start or continue the expected production.
    ///
    /// Example: `1 + ;` has no right operand.
    UnexpectedToken,

    /// The stream ended while a production was incomplete.
    UnexpectedEof,

    /// A `(`, `[`, `{` or `<` was opened but not closed before a statement
    /// terminator or the end of input.
    ///
    /// The message names the opening delimiter and its position.
    UnclosedDelimiter,

    /// Every candidate of a speculative choice failed.
    ///
    /// Example: `(;` is neither a parenthesized expression nor a type.
    AmbiguousConstruct,

    /// A pattern violates the rest-placement rule or its mode.
    ///
    /// Example: `[a, ...rest, b]`, or a literal in a binding pattern.
    MalformedPattern,

    /// Tokens are present but violate a structural rule of the grammar.
    ///
    /// Example: `a ... b ... c` chains a non-associative operator.
    InvalidSyntax,

    /// Construct nesting exceeded the configured depth limit.
    NestingTooDeep,
}

/// What the parser did to get past an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Recovery {
    /// Skipped `skipped` tokens and stopped before `token`, a member of the
    /// stop set.
    SkippedTo {
        /// Stop token found
        token: Token,
        /// Number of tokens skipped
        skipped: usize,
    },
    /// Skipped `skipped` tokens and ran off the end of the stream.
    ReachedEof {
        /// Number of tokens skipped
        skipped: usize,
    },
}

fn describe(found: Option<&Token>) -> String {
    match found {
        Some(token) => format!("`{}`", token),
        None => "end of input".to_string(),
    }
}

fn eof_or(found: Option<&Token>, kind: ParseErrorKind) -> ParseErrorKind {
    if found.is_none() {
        ParseErrorKind::UnexpectedEof
    } else {
        kind
    }
}

impl ParseError {
    fn new(kind: ParseErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            recovery: None,
        }
    }

    /// Create an "expected token" error.
    pub fn expected_token(expected: &Token, found: Option<&Token>, span: Span) -> Self {
        let message = format!("expected `{}`, found {}", expected, describe(found));
        Self::new(eof_or(found, ParseErrorKind::UnexpectedToken), span, message)
    }

    /// Create an "expected <construct>" error, e.g. "expected expression".
    pub fn expected(what: &str, found: Option<&Token>, span: Span) -> Self {
        let message = format!("expected {}, found {}", what, describe(found));
        Self::new(eof_or(found, ParseErrorKind::UnexpectedToken), span, message)
    }

    /// Create an "unexpected token" error.
    pub fn unexpected_token(found: Option<&Token>, context: &str, span: Span) -> Self {
        let message = format!("unexpected {} {}", describe(found), context);
        Self::new(eof_or(found, ParseErrorKind::UnexpectedToken), span, message)
    }

    /// Create an "unclosed delimiter" error for `open` at `open_span`.
    pub fn unclosed_delimiter(
        open: &Token,
        open_span: Span,
        found: Option<&Token>,
        span: Span,
    ) -> Self {
        let message = format!(
            "unclosed `{}` opened at {}, found {}",
            open,
            open_span,
            describe(found)
        );
        Self::new(ParseErrorKind::UnclosedDelimiter, span, message)
    }

    /// Create an "ambiguous construct" error.
    pub fn ambiguous(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::AmbiguousConstruct, span, message.into())
    }

    /// Create a "malformed pattern" error.
    pub fn malformed_pattern(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::MalformedPattern, span, message.into())
    }

    /// Create an "invalid syntax" error.
    pub fn invalid_syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::InvalidSyntax, span, message.into())
    }

    /// Create a "nesting too deep" error.
    pub fn nesting_too_deep(limit: usize, span: Span) -> Self {
        let message = format!("nesting exceeds the maximum depth of {}", limit);
        Self::new(ParseErrorKind::NestingTooDeep, span, message)
    }

    /// Attach the recovery action taken for this error.
    pub fn with_recovery(mut self, recovery: Recovery) -> Self {
        self.recovery = Some(recovery);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_token_messages() {
        let span = Span::new(0, 3, 4);
        let err = ParseError::expected_token(&Token::RParen, Some(&Token::Semicolon), span);
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert_eq!(err.message, "expected `)`, found `;`");

        let err = ParseError::expected_token(&Token::RParen, None, span);
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
        assert_eq!(err.message, "expected `)`, found end of input");
    }

    #[test]
    fn test_display_includes_span() {
        let err = ParseError::invalid_syntax("bad", Span::new(0, 1, 2));
        assert_eq!(err.to_string(), "bad at 1..2");
    }

    #[test]
    fn test_unclosed_delimiter_names_opener() {
        let err = ParseError::unclosed_delimiter(
            &Token::LParen,
            Span::new(0, 4, 5),
            Some(&Token::Semicolon),
            Span::new(0, 9, 10),
        );
        assert_eq!(err.kind, ParseErrorKind::UnclosedDelimiter);
        assert!(err.message.contains("unclosed `(` opened at 4..5"));
    }
}
