//! Postfix access: `.f`, `?.f`, `.@a`, `[i]` and `(args)`.
//!
//! The loop runs eagerly right after the primary, before any prefix or
//! binary operator gets a chance to bind.

use super::super::helpers::{self, parse_delimited};
use super::super::{ParseError, TokenStream};
use super::{atoms, pratt, prec};
use balsyn_ast::{Accessor, Arg, Expr, ExprKind};
use balsyn_lexer::Token;

/// Parse a primary expression and its postfix accesses.
pub(super) fn parse_postfix(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let mut expr = atoms::parse_primary(stream)?;

    loop {
        let accessor = match stream.peek() {
            Some(Token::Dot | Token::QuestionDot) => {
                let optional = matches!(stream.advance(), Some(Token::QuestionDot));
                let (name, _) = helpers::parse_name(stream, "after `.`")?;
                Accessor::Field { name, optional }
            }
            Some(Token::DotAt) => {
                stream.advance();
                Accessor::Annotation(helpers::parse_qualified_name(stream)?)
            }
            Some(Token::LBracket) => {
                let open_span = stream.expect(Token::LBracket)?;
                let index = pratt::parse_pratt(stream, prec::LOWEST)?;
                stream.expect_closing(Token::RBracket, &Token::LBracket, open_span)?;
                Accessor::Index(Box::new(index))
            }
            Some(Token::LParen) => {
                let args = parse_call_args(stream)?;
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    stream.span_from(start),
                );
                continue;
            }
            _ => break,
        };
        expr = Expr::new(
            ExprKind::Postfix {
                base: Box::new(expr),
                accessor,
            },
            stream.span_from(start),
        );
    }

    Ok(expr)
}

/// Parse a parenthesized argument list: positional `e`, named `n = e` and
/// rest `...e` arguments.
pub(super) fn parse_call_args(stream: &mut TokenStream) -> Result<Vec<Arg>, ParseError> {
    parse_delimited(stream, Token::LParen, Token::RParen, |s| {
        if s.eat(&Token::Ellipsis) {
            return Ok(Arg::Rest(pratt::parse_pratt(s, prec::LOWEST)?));
        }
        if matches!(s.peek(), Some(Token::Ident(_))) && s.check_nth(1, &Token::Eq) {
            let (name, _) = helpers::parse_ident(s, "as argument name")?;
            s.advance(); // '='
            let value = pratt::parse_pratt(s, prec::LOWEST)?;
            return Ok(Arg::Named { name, value });
        }
        Ok(Arg::Positional(pratt::parse_pratt(s, prec::LOWEST)?))
    })
}
