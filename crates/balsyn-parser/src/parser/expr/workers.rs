//! Worker interaction: `wait`, `start`, send, receive and `flush`.

use super::super::helpers::{self, parse_delimited};
use super::super::{ParseError, TokenStream};
use super::{pratt, prec};
use balsyn_ast::{Expr, ExprKind, ReceiveField, ReceiveKind, WaitField, WaitKind};
use balsyn_lexer::Token;

/// Parse a worker name; `function` names the enclosing function's worker.
fn parse_worker(stream: &mut TokenStream) -> Result<String, ParseError> {
    if stream.eat(&Token::Function) {
        return Ok("function".to_string());
    }
    let (name, _) = helpers::parse_ident(stream, "where a worker name was expected")?;
    Ok(name)
}

/// Parse `-> w` / `->> w` after an already parsed value.
pub(super) fn parse_send(
    stream: &mut TokenStream,
    start: usize,
    value: Expr,
) -> Result<Expr, ParseError> {
    let sync = matches!(stream.advance(), Some(Token::SyncArrow));
    let worker = parse_worker(stream)?;
    Ok(Expr::new(
        ExprKind::Send {
            value: Box::new(value),
            worker,
            sync,
        },
        stream.span_from(start),
    ))
}

/// Parse `wait f`, `wait f1 | f2` or `wait {a: f1, b}`.
pub(super) fn parse_wait(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::Wait)?;

    let kind = if stream.check(&Token::LBrace) {
        let fields = parse_delimited(stream, Token::LBrace, Token::RBrace, |s| {
            let (key, _) = helpers::parse_ident(s, "as wait field name")?;
            let value = if s.eat(&Token::Colon) {
                Some(pratt::parse_pratt(s, prec::UNARY)?)
            } else {
                None
            };
            Ok(WaitField { key, value })
        })?;
        WaitKind::Multiple(fields)
    } else {
        let first = pratt::parse_pratt(stream, prec::UNARY)?;
        if stream.check(&Token::Pipe) {
            let mut futures = vec![first];
            while stream.eat(&Token::Pipe) {
                futures.push(pratt::parse_pratt(stream, prec::UNARY)?);
            }
            WaitKind::Alternate(futures)
        } else {
            WaitKind::Single(Box::new(first))
        }
    };

    Ok(Expr::new(ExprKind::Wait(kind), stream.span_from(start)))
}

/// Parse `start f(args)`; the operand must be a call.
pub(super) fn parse_start(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::Start)?;
    let call = pratt::parse_pratt(stream, prec::UNARY)?;
    if !matches!(call.kind, ExprKind::Call { .. }) {
        return Err(ParseError::invalid_syntax(
            "`start` requires a function call",
            call.span,
        ));
    }
    Ok(Expr::new(
        ExprKind::Start(Box::new(call)),
        stream.span_from(start),
    ))
}

/// Parse `<- w`, `<- w1 | w2` or `<- {a: w1, b: w2}`.
pub(super) fn parse_receive(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::LeftArrow)?;

    let kind = if stream.check(&Token::LBrace) {
        let fields = parse_delimited(stream, Token::LBrace, Token::RBrace, |s| {
            let (key, _) = helpers::parse_ident(s, "as receive field name")?;
            s.expect(Token::Colon)?;
            let worker = parse_worker(s)?;
            Ok(ReceiveField { key, worker })
        })?;
        ReceiveKind::Multiple(fields)
    } else {
        let first = parse_worker(stream)?;
        if stream.check(&Token::Pipe) {
            let mut workers = vec![first];
            while stream.eat(&Token::Pipe) {
                workers.push(parse_worker(stream)?);
            }
            ReceiveKind::Alternate(workers)
        } else {
            ReceiveKind::Single(first)
        }
    };

    Ok(Expr::new(ExprKind::Receive(kind), stream.span_from(start)))
}

/// Parse `flush` or `flush w`.
pub(super) fn parse_flush(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::Flush)?;
    let worker = match stream.peek() {
        Some(Token::Ident(_) | Token::Function) => Some(parse_worker(stream)?),
        _ => None,
    };
    Ok(Expr::new(ExprKind::Flush(worker), stream.span_from(start)))
}
