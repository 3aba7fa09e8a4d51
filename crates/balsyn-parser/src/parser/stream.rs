//! Token stream wrapper for the hand-written parser.

use super::diagnostics::Diagnostics;
use super::error::Recovery;
use super::{ParseError, ParserConfig};
use balsyn_ast::foundation::Span;
use balsyn_lexer::Token;
use std::mem::discriminant;
use std::ops::Range;

/// Saved cursor state for speculative parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pos: usize,
    diagnostics: (usize, usize),
    exhausted: bool,
}

impl Marker {
    /// Token position the marker points at.
    pub fn pos(&self) -> usize {
        self.pos
    }
}

/// Token stream with lookahead, rollback and position tracking.
///
/// Each token is paired with its byte range in the source. Reading past the
/// end yields `None` as many times as asked, so lookahead code never has to
/// special-case the end of input.
///
/// The stream also owns the parse's diagnostic sink, the recovery stop set
/// and the nesting counter, so one stream is everything a parse needs.
pub struct TokenStream<'src> {
    tokens: &'src [(Token, Range<usize>)],
    pos: usize,
    file_id: u16,
    depth: usize,
    max_depth: usize,
    stop_set: Vec<Token>,
    diagnostics: Diagnostics,
    exhausted: bool,
    qualified_names: bool,
}

impl<'src> TokenStream<'src> {
    /// Create a new token stream with the default configuration.
    pub fn new(tokens: &'src [(Token, Range<usize>)], file_id: u16) -> Self {
        Self::with_config(tokens, file_id, &ParserConfig::default())
    }

    /// Create a new token stream with explicit limits.
    pub fn with_config(
        tokens: &'src [(Token, Range<usize>)],
        file_id: u16,
        config: &ParserConfig,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            file_id,
            depth: 0,
            max_depth: config.max_depth,
            stop_set: vec![Token::Semicolon, Token::RBrace],
            diagnostics: Diagnostics::new(config.max_diagnostics),
            exhausted: false,
            qualified_names: true,
        }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&'src Token> {
        self.peek_nth(0)
    }

    /// Peek at the nth token ahead without consuming.
    pub fn peek_nth(&self, n: usize) -> Option<&'src Token> {
        let tokens = self.tokens;
        tokens.get(self.pos + n).map(|(tok, _)| tok)
    }

    /// Advance to the next token and return the current one.
    pub fn advance(&mut self) -> Option<&'src Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Push back the most recently consumed token.
    pub fn retreat(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// Check if the current token matches the expected token kind.
    pub fn check(&self, expected: &Token) -> bool {
        self.check_nth(0, expected)
    }

    /// Check if the nth token ahead matches the expected token kind.
    pub fn check_nth(&self, n: usize, expected: &Token) -> bool {
        matches!(self.peek_nth(n), Some(t) if discriminant(t) == discriminant(expected))
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Expect a specific token and advance if it matches.
    ///
    /// Returns the token's span, or an error naming what was found instead.
    pub fn expect(&mut self, expected: Token) -> Result<Span, ParseError> {
        if self.check(&expected) {
            let span = self.current_span();
            self.pos += 1;
            Ok(span)
        } else {
            Err(ParseError::expected_token(
                &expected,
                self.peek(),
                self.current_span(),
            ))
        }
    }

    /// Expect the delimiter closing `open`, which was opened at `open_span`.
    ///
    /// Hitting a statement boundary (`;`, a `}` that does not close this
    /// delimiter) or the end of input reports an unclosed delimiter; any
    /// other token is an ordinary unexpected token.
    pub fn expect_closing(
        &mut self,
        close: Token,
        open: &Token,
        open_span: Span,
    ) -> Result<Span, ParseError> {
        if self.check(&close) {
            return self.expect(close);
        }
        let found = self.peek();
        let at_boundary = match found {
            None | Some(Token::Semicolon) => true,
            Some(Token::RBrace) => !matches!(close, Token::RBrace),
            Some(_) => false,
        };
        if at_boundary {
            Err(ParseError::unclosed_delimiter(
                open,
                open_span,
                found,
                self.current_span(),
            ))
        } else {
            Err(ParseError::expected_token(&close, found, self.current_span()))
        }
    }

    /// Check if we've reached the end of the token stream.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Get the current position in the token stream.
    pub fn current_pos(&self) -> usize {
        self.pos
    }

    /// Save the cursor for a later [`reset`](Self::reset).
    pub fn mark(&self) -> Marker {
        Marker {
            pos: self.pos,
            diagnostics: self.diagnostics.checkpoint(),
            exhausted: self.exhausted,
        }
    }

    /// Roll the cursor and the diagnostic sink back to `marker`.
    pub fn reset(&mut self, marker: Marker) {
        self.pos = marker.pos;
        self.diagnostics.rollback(marker.diagnostics);
        self.exhausted = marker.exhausted;
    }

    /// Whether the token `n` positions ahead starts exactly where the token
    /// before it ends.
    ///
    /// `n == 0` compares the current token with the last consumed one.
    pub fn is_adjacent(&self, n: usize) -> bool {
        let idx = self.pos + n;
        if idx == 0 {
            return false;
        }
        match (self.tokens.get(idx - 1), self.tokens.get(idx)) {
            (Some((_, prev)), Some((_, next))) => prev.end == next.start,
            _ => false,
        }
    }

    /// Create a span from a starting position to the last consumed token.
    ///
    /// When nothing was consumed since `start`, the span is empty and sits
    /// at the start of the token at `start`.
    pub fn span_from(&self, start: usize) -> Span {
        let start_span = self.token_span(start);
        if self.pos > start {
            let end_span = self.token_span(self.pos - 1);
            start_span.merge(&end_span)
        } else {
            Span::new(self.file_id, start_span.start, start_span.start)
        }
    }

    /// Get a span for the current token.
    ///
    /// At the end of input this is the empty span just past the last token,
    /// or a zero span for an empty stream.
    pub fn current_span(&self) -> Span {
        self.token_span(self.pos)
    }

    /// Span of the token `n` positions ahead.
    pub fn peek_span(&self, n: usize) -> Span {
        self.token_span(self.pos + n)
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        self.token_span(self.pos.saturating_sub(1))
    }

    fn token_span(&self, idx: usize) -> Span {
        match self.tokens.get(idx) {
            Some((_, range)) => Span::from_range(self.file_id, range),
            None => match self.tokens.last() {
                Some((_, range)) => Span::from_range(self.file_id, &(range.end..range.end)),
                None => Span::zero(self.file_id),
            },
        }
    }

    /// Run `f` one nesting level deeper.
    ///
    /// Exceeding the configured maximum depth is a `NestingTooDeep` error.
    pub fn descend<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::nesting_too_deep(
                self.max_depth,
                self.current_span(),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Run `f` with `module:name` references read as separate tokens.
    pub fn without_qualified_names<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.qualified_names, false);
        let result = f(self);
        self.qualified_names = saved;
        result
    }

    /// Whether expression atoms may be read as `module:name`.
    pub fn qualified_names_allowed(&self) -> bool {
        self.qualified_names
    }

    /// Tokens consumed since position `start`.
    pub fn consumed_since(&self, start: usize) -> impl Iterator<Item = &'src Token> {
        let tokens = self.tokens;
        tokens[start.min(self.pos)..self.pos].iter().map(|(tok, _)| tok)
    }

    /// Replace the recovery stop set.
    pub fn set_stop_set(&mut self, stop_set: Vec<Token>) {
        self.stop_set = stop_set;
    }

    /// Whether `token` belongs to the recovery stop set.
    pub fn is_stop_token(&self, token: &Token) -> bool {
        self.stop_set
            .iter()
            .any(|stop| discriminant(stop) == discriminant(token))
    }

    /// Skip tokens until one in the stop set, for error recovery.
    ///
    /// The stop token itself is not consumed. Running off the end of the
    /// stream marks the stream exhausted.
    pub fn synchronize(&mut self) -> Recovery {
        let mut skipped = 0;
        loop {
            match self.peek() {
                Some(token) if self.is_stop_token(token) => {
                    return Recovery::SkippedTo {
                        token: token.clone(),
                        skipped,
                    };
                }
                Some(_) => {
                    self.pos += 1;
                    skipped += 1;
                }
                None => {
                    self.exhausted = true;
                    return Recovery::ReachedEof { skipped };
                }
            }
        }
    }

    /// Whether error recovery ran off the end of the stream.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Record a diagnostic.
    pub fn report(&mut self, error: ParseError) {
        self.diagnostics.push(error);
    }

    /// Diagnostics reported so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Take the diagnostic sink.
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}
