//! Primary expressions - literals, names, constructors, parenthesized forms
//! and type descriptors used as values.

use super::super::helpers::{self, parse_delimited};
use super::super::speculate::{ambiguous, attempt, try_parse};
use super::super::types::{self, TypeContext};
use super::super::{token_utils, ParseError, ParseErrorKind, TokenStream};
use super::{pratt, prec, special};
use balsyn_ast::{
    Expr, ExprKind, ListMember, Literal, QualifiedName, RecordField, RecordKey,
};
use balsyn_lexer::Token;

/// Parse a primary expression.
pub(super) fn parse_primary(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();

    let literal = match stream.peek() {
        Some(Token::Integer(n)) => Some(Literal::Integer(*n)),
        Some(Token::Float(x)) => Some(Literal::Float(*x)),
        Some(Token::String(s)) => Some(Literal::String(s.to_string())),
        Some(Token::True) => Some(Literal::Boolean(true)),
        Some(Token::False) => Some(Literal::Boolean(false)),
        Some(Token::Null) => Some(Literal::Null),
        _ => None,
    };
    if let Some(literal) = literal {
        stream.advance();
        return Ok(Expr::new(
            ExprKind::Literal(literal),
            stream.span_from(start),
        ));
    }

    if stream.qualified_names_allowed() && helpers::at_qualified_name(stream) {
        let name = helpers::parse_qualified_name(stream)?;
        return Ok(Expr::new(
            ExprKind::Identifier(name),
            stream.span_from(start),
        ));
    }

    match stream.peek() {
        Some(Token::LParen) => parse_parenthesized(stream),
        Some(Token::LBracket) => parse_list_ctor(stream),
        Some(Token::LBrace) => parse_record_ctor(stream),
        Some(Token::Ident(_)) if stream.check_nth(1, &Token::FatArrow) => {
            special::parse_inferred_lambda(stream)
        }
        Some(Token::Ident(name)) if token_utils::is_builtin_type(name) => {
            parse_type_desc_expr(stream)
        }
        Some(Token::Ident(name)) => {
            stream.advance();
            Ok(Expr::new(
                ExprKind::Identifier(QualifiedName::local(name.to_string())),
                stream.span_from(start),
            ))
        }
        Some(Token::Function) => special::parse_explicit_lambda(stream),
        Some(Token::New) => special::parse_new(stream),
        // `error(...)` constructs an error value; bare `error` is the type
        Some(Token::Error) if stream.check_nth(1, &Token::LParen) => {
            stream.advance();
            Ok(Expr::new(
                ExprKind::Identifier(QualifiedName::local("error")),
                stream.span_from(start),
            ))
        }
        Some(token) if token_utils::is_type_keyword(token) => parse_type_desc_expr(stream),
        other => Err(ParseError::expected(
            "expression",
            other,
            stream.current_span(),
        )),
    }
}

/// Parse a type descriptor in value position: `int`, `int[]`, `map<string>`.
fn parse_type_desc_expr(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let ty = types::parse_type(stream, TypeContext::Expression)?;
    let span = ty.span;
    Ok(Expr::new(ExprKind::TypeDesc(ty), span))
}

/// Parse everything that starts with `(`.
///
/// In order:
/// - `()` is the nil literal, `() => e` a lambda without parameters
/// - `(a, b) => e` is an inferred-parameter lambda
/// - `(e)` is a parenthesized expression
/// - `(T)` is a parenthesized type descriptor, e.g. `(int|string)[]`
fn parse_parenthesized(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();

    if stream.check_nth(1, &Token::RParen) && !stream.check_nth(2, &Token::FatArrow) {
        stream.advance();
        stream.advance();
        return Ok(Expr::new(
            ExprKind::Literal(Literal::Nil),
            stream.span_from(start),
        ));
    }

    if let Some(lambda) = try_parse(stream, special::parse_paren_lambda) {
        return Ok(lambda);
    }

    let marker = stream.mark();
    let group = attempt(stream, |s| {
        let open_span = s.expect(Token::LParen)?;
        let inner = pratt::parse_pratt(s, prec::LOWEST)?;
        s.expect_closing(Token::RParen, &Token::LParen, open_span)?;
        Ok(inner)
    });
    let expr_err = match group {
        // `(int|string)[]`: a group holding only a type takes type suffixes
        Ok(inner) if matches!(inner.kind, ExprKind::TypeDesc(_)) => {
            stream.reset(marker);
            return parse_type_desc_expr(stream);
        }
        Ok(inner) => {
            return Ok(Expr::new(
                ExprKind::Group(Box::new(inner)),
                stream.span_from(start),
            ));
        }
        Err(err) => err,
    };
    if matches!(
        expr_err.kind,
        ParseErrorKind::NestingTooDeep | ParseErrorKind::UnclosedDelimiter
    ) {
        return Err(expr_err);
    }

    match attempt(stream, |s| types::parse_type(s, TypeContext::Expression)) {
        Ok(ty) => {
            let span = ty.span;
            Ok(Expr::new(ExprKind::TypeDesc(ty), span))
        }
        // both readings failed, but the type reading matched more input
        Err(type_err) if type_err.span.start > expr_err.span.start => Err(ambiguous(
            &["parenthesized expression", "parenthesized type descriptor"],
            &type_err,
            stream.current_span().merge(&type_err.span),
        )),
        Err(_) => Err(expr_err),
    }
}

/// Parse a list constructor: `[1, 2, ...rest]`.
fn parse_list_ctor(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let members = parse_delimited(stream, Token::LBracket, Token::RBracket, |s| {
        if s.eat(&Token::Ellipsis) {
            Ok(ListMember::Spread(pratt::parse_pratt(s, prec::LOWEST)?))
        } else {
            Ok(ListMember::Item(pratt::parse_pratt(s, prec::LOWEST)?))
        }
    })?;
    Ok(Expr::new(ExprKind::ListCtor(members), stream.span_from(start)))
}

/// Parse a mapping constructor: `{a: 1, "b": 2, [k]: 3, c, ...rest}`.
pub(super) fn parse_record_ctor(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let fields = parse_delimited(stream, Token::LBrace, Token::RBrace, |s| {
        if s.eat(&Token::Ellipsis) {
            return Ok(RecordField::Spread(pratt::parse_pratt(s, prec::LOWEST)?));
        }

        let key = match s.peek() {
            Some(Token::LBracket) => {
                let open_span = s.expect(Token::LBracket)?;
                let key = pratt::parse_pratt(s, prec::LOWEST)?;
                s.expect_closing(Token::RBracket, &Token::LBracket, open_span)?;
                RecordKey::Computed(key)
            }
            Some(Token::String(key)) => {
                s.advance();
                RecordKey::String(key.to_string())
            }
            _ => {
                let (name, _) = helpers::parse_name(s, "as mapping key")?;
                if !s.check(&Token::Colon) {
                    return Ok(RecordField::Shorthand(name));
                }
                RecordKey::Name(name)
            }
        };
        s.expect(Token::Colon)?;
        let value = pratt::parse_pratt(s, prec::LOWEST)?;
        Ok(RecordField::KeyValue { key, value })
    })?;
    Ok(Expr::new(ExprKind::RecordCtor(fields), stream.span_from(start)))
}
