//! Lambdas, `let`, `new` and annotation attachments.

use super::super::helpers;
use super::super::patterns::{parse_pattern, PatternMode};
use super::super::speculate::attempt;
use super::super::stmt;
use super::super::types::{self, TypeContext};
use super::super::{ParseError, TokenStream};
use super::{atoms, postfix, pratt, prec};
use balsyn_ast::{Annotation, Expr, ExprKind, Lambda, LambdaBody, LetBinding, Param};
use balsyn_lexer::Token;

/// Parse zero or more `@name` / `@mod:name {value}` annotations.
pub(super) fn parse_annotations(stream: &mut TokenStream) -> Result<Vec<Annotation>, ParseError> {
    let mut annotations = Vec::new();
    while stream.check(&Token::At) {
        let start = stream.current_pos();
        stream.advance();
        let name = helpers::parse_qualified_name(stream)?;
        let value = if stream.check(&Token::LBrace) {
            Some(atoms::parse_record_ctor(stream)?)
        } else {
            None
        };
        annotations.push(Annotation {
            name,
            value,
            span: stream.span_from(start),
        });
    }
    Ok(annotations)
}

fn lambda_body(stream: &mut TokenStream) -> Result<LambdaBody, ParseError> {
    if stream.eat(&Token::FatArrow) {
        return Ok(LambdaBody::Expr(Box::new(pratt::parse_pratt(
            stream,
            prec::TERNARY,
        )?)));
    }
    if stream.check(&Token::LBrace) {
        return Ok(LambdaBody::Block(stmt::parse_block(stream)?));
    }
    Err(ParseError::expected(
        "`=>` or function body",
        stream.peek(),
        stream.current_span(),
    ))
}

fn inferred_param(name: String, span: balsyn_ast::Span) -> Param {
    Param {
        ty: None,
        name,
        default: None,
        rest: false,
        span,
    }
}

/// Parse `x => e`.
pub(super) fn parse_inferred_lambda(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let (name, span) = helpers::parse_ident(stream, "as lambda parameter")?;
    stream.expect(Token::FatArrow)?;
    let body = pratt::parse_pratt(stream, prec::TERNARY)?;
    Ok(Expr::new(
        ExprKind::Lambda(Lambda {
            params: vec![inferred_param(name, span)],
            return_type: None,
            body: LambdaBody::Expr(Box::new(body)),
        }),
        stream.span_from(start),
    ))
}

/// Parse `() => e` or `(x, y) => e`.
///
/// Run speculatively by the caller: `(x, y)` without a following `=>` is
/// not a lambda.
pub(super) fn parse_paren_lambda(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let params = helpers::parse_delimited(stream, Token::LParen, Token::RParen, |s| {
        let (name, span) = helpers::parse_ident(s, "as lambda parameter")?;
        Ok(inferred_param(name, span))
    })?;
    stream.expect(Token::FatArrow)?;
    let body = pratt::parse_pratt(stream, prec::TERNARY)?;
    Ok(Expr::new(
        ExprKind::Lambda(Lambda {
            params,
            return_type: None,
            body: LambdaBody::Expr(Box::new(body)),
        }),
        stream.span_from(start),
    ))
}

/// Parse `function (params) returns T => e` or `function (params) { ... }`.
///
/// Without a body the same tokens describe a function type, so a failed
/// lambda falls back to a type-descriptor expression.
pub(super) fn parse_explicit_lambda(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    let lambda = attempt(stream, |s| {
        s.expect(Token::Function)?;
        let params = types::parse_params(s)?;
        let return_type = if s.eat(&Token::Returns) {
            Some(Box::new(types::parse_type(s, TypeContext::Standalone)?))
        } else {
            None
        };
        let body = lambda_body(s)?;
        Ok(Lambda {
            params,
            return_type,
            body,
        })
    });

    match lambda {
        Ok(lambda) => Ok(Expr::new(ExprKind::Lambda(lambda), stream.span_from(start))),
        Err(lambda_err) => match attempt(stream, |s| types::parse_type(s, TypeContext::Expression)) {
            Ok(ty) => {
                let span = ty.span;
                Ok(Expr::new(ExprKind::TypeDesc(ty), span))
            }
            Err(_) => Err(lambda_err),
        },
    }
}

/// Parse `let T p = e, var q = f in body`.
pub(super) fn parse_let(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::Let)?;

    let mut bindings = Vec::new();
    loop {
        let binding_start = stream.current_pos();
        let ty = if stream.eat(&Token::Var) {
            None
        } else {
            Some(types::parse_type(stream, TypeContext::Standalone)?)
        };
        let pattern = parse_pattern(stream, PatternMode::Binding)?;
        stream.expect(Token::Eq)?;
        let value = pratt::parse_pratt(stream, prec::TERNARY)?;
        bindings.push(LetBinding {
            ty,
            pattern,
            value,
            span: stream.span_from(binding_start),
        });
        if !stream.eat(&Token::Comma) {
            break;
        }
    }

    stream.expect(Token::In)?;
    let body = pratt::parse_pratt(stream, prec::TERNARY)?;
    Ok(Expr::new(
        ExprKind::Let {
            bindings,
            body: Box::new(body),
        },
        stream.span_from(start),
    ))
}

/// Parse `new`, `new(args)` or `new T(args)`.
pub(super) fn parse_new(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::New)?;

    let (ty, args) = match stream.peek() {
        Some(Token::LParen) => (None, postfix::parse_call_args(stream)?),
        Some(Token::Ident(_) | Token::Stream | Token::Object) => {
            let ty = types::parse_type(stream, TypeContext::Expression)?;
            let args = postfix::parse_call_args(stream)?;
            (Some(ty), args)
        }
        _ => (None, Vec::new()),
    };

    Ok(Expr::new(ExprKind::New { ty, args }, stream.span_from(start)))
}
