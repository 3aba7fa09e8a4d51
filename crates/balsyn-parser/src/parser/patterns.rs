//! Binding and reference pattern parser.
//!
//! Both modes share the list / record / error shapes. In binding mode the
//! leaves introduce names; in reference mode they are places (`a`, `a.b`,
//! `a[0]`) parsed as postfix expressions and checked to be assignable.
//!
//! The rest marker is checked inside each comma loop: once a rest element
//! has been parsed, a following comma is the error.

use super::expr;
use super::helpers;
use super::{ParseError, TokenStream};
use balsyn_ast::{FieldPattern, Pattern, PatternKind, RestPattern};
use balsyn_lexer::Token;

/// Pattern parsing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMode {
    /// Declaration side: leaves introduce names.
    Binding,
    /// Assignment side: leaves are existing places.
    Reference,
}

impl PatternMode {
    fn describe(self) -> &'static str {
        match self {
            PatternMode::Binding => "binding pattern",
            PatternMode::Reference => "reference pattern",
        }
    }
}

/// Parse one pattern in `mode`.
pub fn parse_pattern(stream: &mut TokenStream, mode: PatternMode) -> Result<Pattern, ParseError> {
    stream.descend(|stream| match stream.peek() {
        Some(Token::LBracket) => parse_list_pattern(stream, mode),
        Some(Token::LBrace) => parse_record_pattern(stream, mode),
        Some(Token::Error) => parse_error_pattern(stream, mode),
        Some(Token::Ident(name)) if name.as_ref() == "_" => {
            let span = stream.current_span();
            stream.advance();
            Ok(Pattern::new(PatternKind::Wildcard, span))
        }
        Some(Token::Ident(_)) => parse_leaf(stream, mode),
        Some(
            Token::Integer(_)
            | Token::Float(_)
            | Token::String(_)
            | Token::True
            | Token::False
            | Token::Null
            | Token::Minus,
        ) => Err(ParseError::malformed_pattern(
            format!("a literal is not allowed in a {}", mode.describe()),
            stream.current_span(),
        )),
        other => Err(ParseError::expected(
            mode.describe(),
            other,
            stream.current_span(),
        )),
    })
}

/// Parse a name (binding mode) or a variable reference (reference mode).
fn parse_leaf(stream: &mut TokenStream, mode: PatternMode) -> Result<Pattern, ParseError> {
    match mode {
        PatternMode::Binding => {
            let (name, span) = helpers::parse_ident(stream, "in binding pattern")?;
            if matches!(
                stream.peek(),
                Some(Token::Dot | Token::QuestionDot | Token::LBracket)
            ) {
                return Err(ParseError::malformed_pattern(
                    "field and index access are not allowed in a binding pattern",
                    span.merge(&stream.current_span()),
                ));
            }
            Ok(Pattern::new(PatternKind::BindName(name), span))
        }
        PatternMode::Reference => {
            let place = expr::parse_postfix_expr(stream)?;
            if !place.is_lvalue() {
                return Err(ParseError::malformed_pattern(
                    "expected a variable reference in reference pattern",
                    place.span,
                ));
            }
            let span = place.span;
            Ok(Pattern::new(PatternKind::VarRef(place), span))
        }
    }
}

/// Parse the target of a `...` rest marker.
fn parse_rest_target(stream: &mut TokenStream, mode: PatternMode) -> Result<Pattern, ParseError> {
    match stream.peek() {
        Some(Token::Ident(_)) => parse_leaf(stream, mode),
        other => Err(ParseError::expected(
            "rest variable name",
            other,
            stream.current_span(),
        )),
    }
}

/// A rest element was just parsed; it must be followed by the closer.
fn reject_after_rest(stream: &TokenStream) -> Result<(), ParseError> {
    if stream.check(&Token::Comma) {
        return Err(ParseError::malformed_pattern(
            "rest pattern must be the last element",
            stream.current_span(),
        ));
    }
    Ok(())
}

/// Parse `[p1, p2, ...rest]`.
fn parse_list_pattern(stream: &mut TokenStream, mode: PatternMode) -> Result<Pattern, ParseError> {
    let start = stream.current_pos();
    let open_span = stream.expect(Token::LBracket)?;
    let mut elements = Vec::new();
    let mut rest = None;

    while !stream.check(&Token::RBracket) {
        if stream.eat(&Token::Ellipsis) {
            rest = Some(Box::new(parse_rest_target(stream, mode)?));
            reject_after_rest(stream)?;
            break;
        }
        elements.push(parse_pattern(stream, mode)?);
        if !stream.eat(&Token::Comma) {
            break;
        }
    }
    stream.expect_closing(Token::RBracket, &Token::LBracket, open_span)?;

    Ok(Pattern::new(
        PatternKind::List { elements, rest },
        stream.span_from(start),
    ))
}

/// Parse `{f: p, f, ...rest}` or, in reference mode, `{f: p, !...}`.
fn parse_record_pattern(
    stream: &mut TokenStream,
    mode: PatternMode,
) -> Result<Pattern, ParseError> {
    let start = stream.current_pos();
    let open_span = stream.expect(Token::LBrace)?;
    let mut fields = Vec::new();
    let mut rest = RestPattern::None;

    while !stream.check(&Token::RBrace) {
        if stream.eat(&Token::Ellipsis) {
            rest = RestPattern::Bind(Box::new(parse_rest_target(stream, mode)?));
            reject_after_rest(stream)?;
            break;
        }
        if stream.check(&Token::Bang) && stream.check_nth(1, &Token::Ellipsis) {
            if mode == PatternMode::Binding {
                return Err(ParseError::malformed_pattern(
                    "`!...` is only allowed in reference patterns",
                    stream.current_span().merge(&stream.peek_span(1)),
                ));
            }
            stream.advance();
            stream.advance();
            rest = RestPattern::Sealed;
            reject_after_rest(stream)?;
            break;
        }

        fields.push(parse_field_pattern(stream, mode)?);
        if !stream.eat(&Token::Comma) {
            break;
        }
    }
    stream.expect_closing(Token::RBrace, &Token::LBrace, open_span)?;

    Ok(Pattern::new(
        PatternKind::Record { fields, rest },
        stream.span_from(start),
    ))
}

/// Parse `name: pattern` or the shorthand `name`.
fn parse_field_pattern(
    stream: &mut TokenStream,
    mode: PatternMode,
) -> Result<FieldPattern, ParseError> {
    let start = stream.current_pos();
    let (name, _) = helpers::parse_name(stream, "where a field name was expected")?;
    let pattern = if stream.eat(&Token::Colon) {
        Some(parse_pattern(stream, mode)?)
    } else {
        None
    };
    Ok(FieldPattern {
        name,
        pattern,
        span: stream.span_from(start),
    })
}

/// Parse `error Type(message, cause, field = p, ...rest)`.
fn parse_error_pattern(
    stream: &mut TokenStream,
    mode: PatternMode,
) -> Result<Pattern, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::Error)?;
    let type_ref = if matches!(stream.peek(), Some(Token::Ident(_))) {
        Some(helpers::parse_qualified_name(stream)?)
    } else {
        None
    };

    let open_span = stream.expect(Token::LParen)?;
    let mut args = Vec::new();
    let mut fields = Vec::new();
    let mut rest = None;

    while !stream.check(&Token::RParen) {
        if stream.eat(&Token::Ellipsis) {
            rest = Some(Box::new(parse_rest_target(stream, mode)?));
            reject_after_rest(stream)?;
            break;
        }

        if matches!(stream.peek(), Some(Token::Ident(_))) && stream.check_nth(1, &Token::Eq) {
            let field_start = stream.current_pos();
            let (name, _) = helpers::parse_ident(stream, "in error pattern")?;
            stream.advance(); // '='
            let pattern = parse_pattern(stream, mode)?;
            fields.push(FieldPattern {
                name,
                pattern: Some(pattern),
                span: stream.span_from(field_start),
            });
        } else {
            if !fields.is_empty() {
                return Err(ParseError::malformed_pattern(
                    "positional error pattern arguments must come before named ones",
                    stream.current_span(),
                ));
            }
            if args.len() == 2 {
                return Err(ParseError::malformed_pattern(
                    "error pattern takes at most a message and a cause",
                    stream.current_span(),
                ));
            }
            args.push(parse_pattern(stream, mode)?);
        }

        if !stream.eat(&Token::Comma) {
            break;
        }
    }
    stream.expect_closing(Token::RParen, &Token::LParen, open_span)?;

    Ok(Pattern::new(
        PatternKind::Error {
            type_ref,
            args,
            fields,
            rest,
        },
        stream.span_from(start),
    ))
}
