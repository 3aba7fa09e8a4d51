//! Pratt parser core - precedence climbing for binary, ternary, range,
//! type-test and send operators, plus prefix operators and casts.

use super::super::speculate::try_parse;
use super::super::types::{self, TypeContext};
use super::super::{ParseError, TokenStream};
use super::{postfix, prec, special, workers};
use balsyn_ast::foundation::{BinaryOp, UnaryOp};
use balsyn_ast::{Expr, ExprKind};
use balsyn_lexer::Token;

/// Get binary operator metadata at the cursor.
///
/// Returns (precedence, op, token count). All binary operators are
/// left-associative. Shifts are spelled with adjacent `<` / `>` tokens, so
/// `a < <int>b` is a comparison with a cast operand while `a << b` shifts.
fn binary_op_info(stream: &TokenStream) -> Option<(u8, BinaryOp, usize)> {
    let info = match stream.peek()? {
        Token::Star => (prec::MULTIPLICATIVE, BinaryOp::Mul, 1),
        Token::Slash => (prec::MULTIPLICATIVE, BinaryOp::Div, 1),
        Token::Percent => (prec::MULTIPLICATIVE, BinaryOp::Mod, 1),
        Token::Plus => (prec::ADDITIVE, BinaryOp::Add, 1),
        Token::Minus => (prec::ADDITIVE, BinaryOp::Sub, 1),
        Token::Lt if stream.check_nth(1, &Token::Lt) && stream.is_adjacent(1) => {
            (prec::SHIFT, BinaryOp::Shl, 2)
        }
        Token::Gt if stream.check_nth(1, &Token::Gt) && stream.is_adjacent(1) => {
            if stream.check_nth(2, &Token::Gt) && stream.is_adjacent(2) {
                (prec::SHIFT, BinaryOp::UShr, 3)
            } else {
                (prec::SHIFT, BinaryOp::Shr, 2)
            }
        }
        Token::Lt => (prec::RELATIONAL, BinaryOp::Lt, 1),
        Token::Gt => (prec::RELATIONAL, BinaryOp::Gt, 1),
        Token::LtEq => (prec::RELATIONAL, BinaryOp::Le, 1),
        Token::GtEq => (prec::RELATIONAL, BinaryOp::Ge, 1),
        Token::EqEq => (prec::EQUALITY, BinaryOp::Eq, 1),
        Token::BangEq => (prec::EQUALITY, BinaryOp::Ne, 1),
        Token::EqEqEq => (prec::REF_EQUALITY, BinaryOp::RefEq, 1),
        Token::BangEqEq => (prec::REF_EQUALITY, BinaryOp::RefNe, 1),
        Token::Amp => (prec::BITWISE_AND, BinaryOp::BitAnd, 1),
        Token::Caret => (prec::BITWISE_OR, BinaryOp::BitXor, 1),
        Token::Pipe => (prec::BITWISE_OR, BinaryOp::BitOr, 1),
        Token::AndAnd => (prec::LOGICAL_AND, BinaryOp::And, 1),
        Token::OrOr => (prec::LOGICAL_OR, BinaryOp::Or, 1),
        Token::Elvis => (prec::ELVIS, BinaryOp::Elvis, 1),
        _ => return None,
    };
    Some(info)
}

/// Pratt parser - climbs over every infix operator binding at least as
/// tightly as `min_prec`.
pub(super) fn parse_pratt(stream: &mut TokenStream, min_prec: u8) -> Result<Expr, ParseError> {
    stream.descend(|stream| {
        let start = stream.current_pos();
        let mut left = parse_prefix(stream)?;

        while let Some(token) = stream.peek() {
            left = match token {
                Token::Question => {
                    if prec::TERNARY < min_prec {
                        break;
                    }
                    stream.advance();
                    let marker = stream.mark();
                    let mut then_branch = parse_pratt(stream, prec::LOWEST)?;
                    // `c ? a:b` lexes the branches as one qualified name
                    if !stream.check(&Token::Colon)
                        && stream.qualified_names_allowed()
                        && stream
                            .consumed_since(marker.pos())
                            .any(|t| matches!(t, Token::Colon))
                    {
                        stream.reset(marker);
                        then_branch = stream
                            .without_qualified_names(|s| parse_pratt(s, prec::LOWEST))?;
                    }
                    stream.expect(Token::Colon)?;
                    let else_branch = parse_pratt(stream, prec::TERNARY)?;
                    Expr::new(
                        ExprKind::Ternary {
                            condition: Box::new(left),
                            then_branch: Box::new(then_branch),
                            else_branch: Box::new(else_branch),
                        },
                        stream.span_from(start),
                    )
                }
                Token::Is => {
                    if prec::TYPE_TEST < min_prec {
                        break;
                    }
                    stream.advance();
                    let ty = types::parse_type(stream, TypeContext::Expression)?;
                    Expr::new(
                        ExprKind::TypeTest {
                            operand: Box::new(left),
                            ty,
                        },
                        stream.span_from(start),
                    )
                }
                Token::Ellipsis | Token::HalfOpenRange => {
                    if prec::RANGE < min_prec {
                        break;
                    }
                    if matches!(left.kind, ExprKind::Range { .. }) {
                        return Err(ParseError::invalid_syntax(
                            "range operators are non-associative; parenthesize the inner range",
                            stream.current_span(),
                        ));
                    }
                    let inclusive = matches!(token, Token::Ellipsis);
                    stream.advance();
                    let to = parse_pratt(stream, prec::RANGE + 1)?;
                    Expr::new(
                        ExprKind::Range {
                            from: Box::new(left),
                            to: Box::new(to),
                            inclusive,
                        },
                        stream.span_from(start),
                    )
                }
                Token::Arrow | Token::SyncArrow => {
                    if prec::SEND < min_prec {
                        break;
                    }
                    if matches!(left.kind, ExprKind::Send { .. }) {
                        return Err(ParseError::invalid_syntax(
                            "worker sends cannot be chained",
                            stream.current_span(),
                        ));
                    }
                    workers::parse_send(stream, start, left)?
                }
                _ => {
                    let Some((op_prec, op, width)) = binary_op_info(stream) else {
                        break;
                    };
                    if op_prec < min_prec {
                        break;
                    }
                    for _ in 0..width {
                        stream.advance();
                    }
                    let right = parse_pratt(stream, op_prec + 1)?;
                    Expr::binary(op, left, right, stream.span_from(start))
                }
            };
        }

        Ok(left)
    })
}

/// Parse prefix expressions (unary operators, casts, prefix keywords) or a
/// postfix chain.
fn parse_prefix(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    match stream.peek() {
        Some(Token::Plus | Token::Minus | Token::Bang | Token::Tilde | Token::Typeof) => {
            parse_unary(stream)
        }
        Some(Token::Check | Token::Checkpanic) => parse_check(stream),
        Some(Token::Lt) => parse_cast(stream),
        Some(Token::Trap) => {
            let start = stream.current_pos();
            stream.advance();
            let operand = parse_pratt(stream, prec::TERNARY)?;
            Ok(Expr::new(
                ExprKind::Trap(Box::new(operand)),
                stream.span_from(start),
            ))
        }
        Some(Token::Wait) => workers::parse_wait(stream),
        Some(Token::Start) => workers::parse_start(stream),
        Some(Token::LeftArrow) => workers::parse_receive(stream),
        Some(Token::Flush) => workers::parse_flush(stream),
        Some(Token::Let) => special::parse_let(stream),
        _ => postfix::parse_postfix(stream),
    }
}

/// Parse unary operators.
fn parse_unary(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let span = stream.current_span();
    let op = match stream.advance() {
        Some(Token::Plus) => UnaryOp::Plus,
        Some(Token::Minus) => UnaryOp::Neg,
        Some(Token::Bang) => UnaryOp::Not,
        Some(Token::Tilde) => UnaryOp::BitNot,
        Some(Token::Typeof) => UnaryOp::Typeof,
        other => {
            return Err(ParseError::unexpected_token(other, "as unary operator", span));
        }
    };

    let operand = parse_pratt(stream, prec::UNARY)?;
    Ok(Expr::unary(op, operand, stream.span_from(start)))
}

/// Parse `check e` / `checkpanic e`.
///
/// The operand is parsed at the check level, so `check a + b` is
/// `(check a) + b` and `check check f()` nests.
fn parse_check(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let panics = matches!(stream.advance(), Some(Token::Checkpanic));
    let operand = parse_pratt(stream, prec::CHECK)?;
    Ok(Expr::new(
        ExprKind::Check {
            panics,
            operand: Box::new(operand),
        },
        stream.span_from(start),
    ))
}

/// Parse a cast `<T>e`, `<@a T>e` or `<@a>e`.
///
/// The `<...>` head is parsed speculatively. A `<` in operand position can
/// start nothing else, so a failed head is reported as a missing operand.
fn parse_cast(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let lt_span = stream.current_span();

    let head = try_parse(stream, |s| {
        s.expect(Token::Lt)?;
        let annotations = special::parse_annotations(s)?;
        let target = if s.check(&Token::Gt) {
            None
        } else {
            Some(types::parse_type(s, TypeContext::Expression)?)
        };
        if annotations.is_empty() && target.is_none() {
            return Err(ParseError::invalid_syntax("empty cast", s.current_span()));
        }
        s.expect(Token::Gt)?;
        Ok((annotations, target))
    });

    let Some((annotations, target)) = head else {
        return Err(ParseError::expected("expression", Some(&Token::Lt), lt_span));
    };
    let operand = parse_pratt(stream, prec::UNARY)?;
    Ok(Expr::new(
        ExprKind::Cast {
            annotations,
            target,
            operand: Box::new(operand),
        },
        stream.span_from(start),
    ))
}
