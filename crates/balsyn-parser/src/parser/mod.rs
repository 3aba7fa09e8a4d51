//! Hand-written recursive descent parser for Balsyn source.
//!
//! ## Architecture
//!
//! - `stream`: TokenStream wrapper with lookahead, rollback and the
//!   diagnostic sink
//! - `error`: ParseError and recovery records
//! - `diagnostics`: capped diagnostic sink
//! - `speculate`: production-scoped backtracking
//! - `expr`: Expression parser using precedence climbing
//! - `types`: Type-descriptor parser
//! - `patterns`: Binding and reference patterns
//! - `stmt`: Statement harness, where error recovery happens
//!
//! ## Public API
//!
//! ```rust,ignore
//! pub fn parse_expr(source: &str, file_id: u16) -> Result<Expr, Vec<ParseError>>
//! pub fn parse_expr_with_spans(tokens: &[(Token, Range<usize>)], file_id: u16) -> Result<Expr, Vec<ParseError>>
//! pub fn parse_program(tokens: &[(Token, Range<usize>)], file_id: u16) -> Parsed<Vec<Stmt>>
//! ```
//!
//! The `Parser` type exposes the recovering entry points: each returns a
//! node (a placeholder on failure) and leaves the diagnostics in its sink.

mod config;
mod diagnostics;
mod error;
mod speculate;
mod stream;

pub use config::{ConfigError, ParserConfig};
pub use diagnostics::Diagnostics;
pub use error::{ParseError, ParseErrorKind, Recovery};
pub use stream::{Marker, TokenStream};

mod expr;
mod helpers;
mod patterns;
mod stmt;

/// Token utility functions for keyword-to-string mappings and token
/// classification.
pub mod token_utils;
mod types;

pub use expr::prec;
pub use patterns::PatternMode;
pub use types::TypeContext;

use balsyn_ast::foundation::Span;
use balsyn_ast::{Expr, Pattern, Stmt, TypeDesc};
use balsyn_lexer::{LexError, Token};
use std::ops::Range;
use tracing::{debug, trace};

/// Resynchronize after `error`, record it and return its message.
///
/// The cursor is left on the stop token (not consumed) or at the end of
/// input.
pub(crate) fn recover(stream: &mut TokenStream, error: ParseError) -> String {
    let recovery = stream.synchronize();
    match &recovery {
        Recovery::SkippedTo { token, skipped } => debug!(
            kind = ?error.kind,
            skipped,
            stop = %token,
            "recovered from syntax error"
        ),
        Recovery::ReachedEof { skipped } => debug!(
            kind = ?error.kind,
            skipped,
            "syntax error recovery reached end of input"
        ),
    }
    let message = error.message.clone();
    stream.report(error.with_recovery(recovery));
    message
}

/// Recovering parser over one token slice.
///
/// Entry points never fail: a syntax error becomes a diagnostic in the sink
/// plus a `ParseError` placeholder node spanning the skipped tokens.
pub struct Parser<'src> {
    stream: TokenStream<'src>,
}

impl<'src> Parser<'src> {
    /// Create a parser with the default configuration.
    pub fn new(tokens: &'src [(Token, Range<usize>)], file_id: u16) -> Self {
        Self {
            stream: TokenStream::new(tokens, file_id),
        }
    }

    /// Create a parser with explicit limits.
    pub fn with_config(
        tokens: &'src [(Token, Range<usize>)],
        file_id: u16,
        config: ParserConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            stream: TokenStream::with_config(tokens, file_id, &config),
        })
    }

    /// Replace the recovery stop set (default `;` and `}`).
    pub fn with_stop_set(mut self, stop_set: Vec<Token>) -> Self {
        self.stream.set_stop_set(stop_set);
        self
    }

    fn recovering<T>(
        &mut self,
        parse: impl FnOnce(&mut TokenStream<'src>) -> Result<T, ParseError>,
        placeholder: impl FnOnce(String, Span) -> T,
    ) -> T {
        let start = self.stream.current_pos();
        match parse(&mut self.stream) {
            Ok(node) => node,
            Err(err) => {
                let message = recover(&mut self.stream, err);
                placeholder(message, self.stream.span_from(start))
            }
        }
    }

    /// Parse an expression whose operators bind at least as tightly as
    /// `min_prec` (`prec::LOWEST` for a complete expression).
    pub fn parse_expression(&mut self, min_prec: u8) -> Expr {
        trace!(pos = self.stream.current_pos(), min_prec, "parse_expression");
        self.recovering(|s| expr::parse_expression(s, min_prec), Expr::error)
    }

    /// Parse a standalone type descriptor.
    pub fn parse_type(&mut self) -> TypeDesc {
        trace!(pos = self.stream.current_pos(), "parse_type");
        self.recovering(
            |s| types::parse_type(s, TypeContext::Standalone),
            TypeDesc::error,
        )
    }

    /// Parse a binding pattern (declaration side).
    pub fn parse_binding_pattern(&mut self) -> Pattern {
        trace!(pos = self.stream.current_pos(), "parse_binding_pattern");
        self.recovering(
            |s| patterns::parse_pattern(s, PatternMode::Binding),
            Pattern::error,
        )
    }

    /// Parse a reference pattern (left of `=` in a destructuring
    /// assignment).
    pub fn parse_ref_binding_pattern(&mut self) -> Pattern {
        trace!(pos = self.stream.current_pos(), "parse_ref_binding_pattern");
        self.recovering(
            |s| patterns::parse_pattern(s, PatternMode::Reference),
            Pattern::error,
        )
    }

    /// Parse statements until the end of input.
    pub fn parse_statements(&mut self) -> Vec<Stmt> {
        trace!(pos = self.stream.current_pos(), "parse_statements");
        stmt::parse_statements(&mut self.stream)
    }

    /// Diagnostics reported so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        self.stream.diagnostics()
    }

    /// Whether every token has been consumed.
    pub fn at_end(&self) -> bool {
        self.stream.at_end()
    }

    /// Whether error recovery ran off the end of the stream.
    pub fn is_exhausted(&self) -> bool {
        self.stream.is_exhausted()
    }

    /// Consume the parser and take its diagnostics.
    pub fn finish(self) -> Diagnostics {
        self.stream.into_diagnostics()
    }
}

/// A parsed node together with the diagnostics produced while parsing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    /// Parsed node, with placeholders where recovery happened
    pub node: T,
    /// Diagnostics in source order
    pub diagnostics: Diagnostics,
}

impl<T> Parsed<T> {
    /// Whether parsing produced no diagnostics.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Convert a lexer failure into a parse error.
fn lex_error(error: LexError, file_id: u16) -> ParseError {
    ParseError::invalid_syntax(
        format!("invalid token `{}`", error.text),
        Span::from_range(file_id, &error.span),
    )
}

/// Run `parse` and require it to consume every token.
fn parse_complete<'src, T>(
    tokens: &'src [(Token, Range<usize>)],
    file_id: u16,
    what: &str,
    parse: impl FnOnce(&mut TokenStream<'src>) -> Result<T, ParseError>,
) -> Result<T, Vec<ParseError>> {
    let mut stream = TokenStream::new(tokens, file_id);
    let node = parse(&mut stream).map_err(|e| vec![e])?;
    if !stream.at_end() {
        return Err(vec![ParseError::unexpected_token(
            stream.peek(),
            &format!("after {}", what),
            stream.current_span(),
        )]);
    }
    Ok(node)
}

/// Lex and parse `source` as one complete expression.
///
/// # Parameters
/// - `source`: Source text of the expression
/// - `file_id`: File identifier for span tracking
///
/// # Returns
/// - `Ok(Expr)` if the whole source is one expression
/// - `Err(Vec<ParseError>)` with the lexer or parser error otherwise
pub fn parse_expr(source: &str, file_id: u16) -> Result<Expr, Vec<ParseError>> {
    let tokens = balsyn_lexer::lex(source).map_err(|e| vec![lex_error(e, file_id)])?;
    parse_expr_with_spans(&tokens, file_id)
}

/// Parse a sequence of tokens with byte spans into one complete expression.
///
/// # Parameters
/// - `tokens`: Slice of (token, byte_span) pairs
/// - `file_id`: File identifier for span tracking
///
/// # Returns
/// - `Ok(Expr)` if parsing succeeds and consumes every token
/// - `Err(Vec<ParseError>)` if parsing fails
pub fn parse_expr_with_spans(
    tokens: &[(Token, Range<usize>)],
    file_id: u16,
) -> Result<Expr, Vec<ParseError>> {
    parse_complete(tokens, file_id, "expression", expr::parse_expr)
}

/// Parse a sequence of tokens into one complete type descriptor.
pub fn parse_type_descriptor(
    tokens: &[(Token, Range<usize>)],
    file_id: u16,
) -> Result<TypeDesc, Vec<ParseError>> {
    parse_complete(tokens, file_id, "type descriptor", |s| {
        types::parse_type(s, TypeContext::Standalone)
    })
}

/// Parse a sequence of tokens into one complete binding pattern.
pub fn parse_binding_pattern(
    tokens: &[(Token, Range<usize>)],
    file_id: u16,
) -> Result<Pattern, Vec<ParseError>> {
    parse_complete(tokens, file_id, "binding pattern", |s| {
        patterns::parse_pattern(s, PatternMode::Binding)
    })
}

/// Parse a sequence of tokens into one complete reference pattern.
pub fn parse_ref_pattern(
    tokens: &[(Token, Range<usize>)],
    file_id: u16,
) -> Result<Pattern, Vec<ParseError>> {
    parse_complete(tokens, file_id, "reference pattern", |s| {
        patterns::parse_pattern(s, PatternMode::Reference)
    })
}

/// Parse a sequence of statements, recovering from syntax errors.
///
/// # Parameters
/// - `tokens`: Slice of (token, byte_span) pairs
/// - `file_id`: File identifier for span tracking
///
/// # Returns
/// The statements (with placeholders where recovery happened) and every
/// diagnostic reported on the way.
pub fn parse_program(tokens: &[(Token, Range<usize>)], file_id: u16) -> Parsed<Vec<Stmt>> {
    let mut parser = Parser::new(tokens, file_id);
    let node = parser.parse_statements();
    Parsed {
        node,
        diagnostics: parser.finish(),
    }
}
