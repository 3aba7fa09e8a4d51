//! Statement harness.
//!
//! Statements are where recovery happens: a failed statement is replaced by
//! a placeholder, the cursor resynchronizes at the stop set and parsing
//! carries on with the next statement. Speculation (typed declaration vs.
//! expression, destructuring vs. block) stays inside the statement being
//! parsed.

use super::expr::{self, prec};
use super::helpers;
use super::patterns::{parse_pattern, PatternMode};
use super::speculate::try_parse;
use super::types::{self, TypeContext};
use super::{recover, ParseError, TokenStream};
use balsyn_ast::foundation::AssignOp;
use balsyn_ast::{
    Expr, ExprKind, MatchClause, MatchPattern, Pattern, PatternKind, Stmt, StmtKind, TypeDesc,
};
use balsyn_lexer::Token;

/// Parse statements until the end of input.
///
/// Stops early when error recovery has run off the end of the stream.
pub fn parse_statements(stream: &mut TokenStream) -> Vec<Stmt> {
    let mut stmts = Vec::new();
    while !stream.at_end() && !stream.is_exhausted() {
        let before = stream.current_pos();
        stmts.push(parse_statement_recovering(stream, true));
        if stream.current_pos() == before && !stream.at_end() {
            stream.advance();
        }
    }
    stmts
}

/// Parse `{ stmts }`.
///
/// Errors inside the block are recovered statement by statement. If
/// recovery exhausts the stream the partial block is returned; the missing
/// `}` is not reported a second time.
pub fn parse_block(stream: &mut TokenStream) -> Result<Vec<Stmt>, ParseError> {
    stream.descend(|stream| {
        let open_span = stream.expect(Token::LBrace)?;
        let mut stmts = Vec::new();
        while !stream.check(&Token::RBrace) && !stream.at_end() {
            let before = stream.current_pos();
            stmts.push(parse_statement_recovering(stream, false));
            if stream.is_exhausted() {
                return Ok(stmts);
            }
            if stream.current_pos() == before && !stream.check(&Token::RBrace) {
                stream.advance();
            }
        }
        stream.expect_closing(Token::RBrace, &Token::LBrace, open_span)?;
        Ok(stmts)
    })
}

fn parse_statement_recovering(stream: &mut TokenStream, top_level: bool) -> Stmt {
    let start = stream.current_pos();
    match parse_statement(stream) {
        Ok(stmt) => stmt,
        Err(err) => {
            let message = recover(stream, err);
            if !stream.eat(&Token::Semicolon) && top_level {
                // nothing left to close at the top level
                stream.eat(&Token::RBrace);
            }
            Stmt::error(message, stream.span_from(start))
        }
    }
}

/// Parse an expression, replacing a failure with a placeholder.
fn parse_expr_recovering(stream: &mut TokenStream) -> (Expr, bool) {
    let start = stream.current_pos();
    match expr::parse_expr(stream) {
        Ok(expr) => (expr, true),
        Err(err) => {
            let message = recover(stream, err);
            (Expr::error(message, stream.span_from(start)), false)
        }
    }
}

/// Expect the `;` after an expression that may have been recovered.
///
/// A recovered expression has already resynchronized; its terminator is
/// optional.
fn finish_after(stream: &mut TokenStream, ok: bool) -> Result<(), ParseError> {
    if ok {
        stream.expect(Token::Semicolon)?;
    } else {
        stream.eat(&Token::Semicolon);
    }
    Ok(())
}

fn parse_statement(stream: &mut TokenStream) -> Result<Stmt, ParseError> {
    let start = stream.current_pos();
    match stream.peek() {
        Some(Token::Var) => parse_var_decl(stream),
        Some(Token::Return) => {
            stream.advance();
            let value = if stream.eat(&Token::Semicolon) {
                None
            } else {
                let (value, ok) = parse_expr_recovering(stream);
                finish_after(stream, ok)?;
                Some(value)
            };
            Ok(Stmt::new(StmtKind::Return(value), stream.span_from(start)))
        }
        Some(Token::Panic) => {
            stream.advance();
            let (value, ok) = parse_expr_recovering(stream);
            finish_after(stream, ok)?;
            Ok(Stmt::new(StmtKind::Panic(value), stream.span_from(start)))
        }
        Some(Token::If) => parse_if(stream),
        Some(Token::While) => {
            stream.advance();
            let condition = expr::parse_expr(stream)?;
            let body = parse_block(stream)?;
            Ok(Stmt::new(
                StmtKind::While { condition, body },
                stream.span_from(start),
            ))
        }
        Some(Token::Foreach) => parse_foreach(stream),
        Some(Token::Match) => parse_match(stream),
        Some(Token::LBrace) => {
            if let Some(pattern) = try_parse(stream, parse_destructure_head) {
                return parse_destructure_tail(stream, start, pattern);
            }
            let stmts = parse_block(stream)?;
            Ok(Stmt::new(StmtKind::Block(stmts), stream.span_from(start)))
        }
        Some(Token::LBracket | Token::Error) => {
            if let Some(pattern) = try_parse(stream, parse_destructure_head) {
                return parse_destructure_tail(stream, start, pattern);
            }
            parse_typed_decl_or_expr(stream)
        }
        _ => parse_typed_decl_or_expr(stream),
    }
}

/// `var p = e;`
fn parse_var_decl(stream: &mut TokenStream) -> Result<Stmt, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::Var)?;
    let pattern = parse_pattern(stream, PatternMode::Binding)?;
    stream.expect(Token::Eq)?;
    let (init, ok) = parse_expr_recovering(stream);
    finish_after(stream, ok)?;
    Ok(Stmt::new(
        StmtKind::VarDecl {
            ty: None,
            pattern,
            init: Some(init),
        },
        stream.span_from(start),
    ))
}

/// Head of a typed declaration: `T p` followed by `=` or `;`.
fn parse_typed_decl_head(stream: &mut TokenStream) -> Result<(TypeDesc, Pattern), ParseError> {
    let ty = types::parse_type(stream, TypeContext::Standalone)?;
    let pattern = parse_pattern(stream, PatternMode::Binding)?;
    if !stream.check(&Token::Eq) && !stream.check(&Token::Semicolon) {
        return Err(ParseError::expected_token(
            &Token::Eq,
            stream.peek(),
            stream.current_span(),
        ));
    }
    Ok((ty, pattern))
}

fn parse_typed_decl_or_expr(stream: &mut TokenStream) -> Result<Stmt, ParseError> {
    let start = stream.current_pos();

    if let Some((ty, pattern)) = try_parse(stream, parse_typed_decl_head) {
        let init = if stream.eat(&Token::Eq) {
            let (init, ok) = parse_expr_recovering(stream);
            finish_after(stream, ok)?;
            Some(init)
        } else {
            stream.expect(Token::Semicolon)?;
            None
        };
        return Ok(Stmt::new(
            StmtKind::VarDecl {
                ty: Some(ty),
                pattern,
                init,
            },
            stream.span_from(start),
        ));
    }

    let target = expr::parse_expr(stream)?;
    let op = match stream.peek() {
        Some(Token::Eq) => None,
        Some(Token::PlusEq) => Some(AssignOp::Add),
        Some(Token::MinusEq) => Some(AssignOp::Sub),
        Some(Token::StarEq) => Some(AssignOp::Mul),
        Some(Token::SlashEq) => Some(AssignOp::Div),
        _ => {
            stream.expect(Token::Semicolon)?;
            return Ok(Stmt::new(StmtKind::Expr(target), stream.span_from(start)));
        }
    };

    if !target.is_lvalue() {
        return Err(ParseError::invalid_syntax(
            "invalid assignment target",
            target.span,
        ));
    }
    stream.advance();
    let (value, ok) = parse_expr_recovering(stream);
    finish_after(stream, ok)?;
    Ok(Stmt::new(
        StmtKind::Assign { target, op, value },
        stream.span_from(start),
    ))
}

/// Reference pattern followed by `=`.
fn parse_destructure_head(stream: &mut TokenStream) -> Result<Pattern, ParseError> {
    let pattern = parse_pattern(stream, PatternMode::Reference)?;
    stream.expect(Token::Eq)?;
    Ok(pattern)
}

fn parse_destructure_tail(
    stream: &mut TokenStream,
    start: usize,
    pattern: Pattern,
) -> Result<Stmt, ParseError> {
    let (value, ok) = parse_expr_recovering(stream);
    finish_after(stream, ok)?;
    Ok(Stmt::new(
        StmtKind::Destructure { pattern, value },
        stream.span_from(start),
    ))
}

/// `if c { ... } else if d { ... } else { ... }`
fn parse_if(stream: &mut TokenStream) -> Result<Stmt, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::If)?;
    let condition = expr::parse_expr(stream)?;
    let then_block = parse_block(stream)?;

    let else_branch = if stream.eat(&Token::Else) {
        if stream.check(&Token::If) {
            Some(Box::new(parse_if(stream)?))
        } else {
            let else_start = stream.current_pos();
            let stmts = parse_block(stream)?;
            Some(Box::new(Stmt::new(
                StmtKind::Block(stmts),
                stream.span_from(else_start),
            )))
        }
    } else {
        None
    };

    Ok(Stmt::new(
        StmtKind::If {
            condition,
            then_block,
            else_branch,
        },
        stream.span_from(start),
    ))
}

/// `foreach T p in e { ... }` or `foreach var p in e { ... }`
fn parse_foreach(stream: &mut TokenStream) -> Result<Stmt, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::Foreach)?;
    let ty = if stream.eat(&Token::Var) {
        None
    } else {
        Some(types::parse_type(stream, TypeContext::Standalone)?)
    };
    let pattern = parse_pattern(stream, PatternMode::Binding)?;
    stream.expect(Token::In)?;
    let iterable = expr::parse_expr(stream)?;
    let body = parse_block(stream)?;
    Ok(Stmt::new(
        StmtKind::Foreach {
            ty,
            pattern,
            iterable,
            body,
        },
        stream.span_from(start),
    ))
}

/// `match e { p1 | p2 if guard => { ... } }`
fn parse_match(stream: &mut TokenStream) -> Result<Stmt, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::Match)?;
    let subject = expr::parse_expr(stream)?;
    let open_span = stream.expect(Token::LBrace)?;

    let mut clauses = Vec::new();
    while !stream.check(&Token::RBrace) && !stream.at_end() {
        clauses.push(parse_match_clause(stream)?);
    }
    stream.expect_closing(Token::RBrace, &Token::LBrace, open_span)?;

    Ok(Stmt::new(
        StmtKind::Match { subject, clauses },
        stream.span_from(start),
    ))
}

fn parse_match_clause(stream: &mut TokenStream) -> Result<MatchClause, ParseError> {
    let start = stream.current_pos();
    let mut patterns = vec![parse_match_pattern(stream)?];
    while stream.eat(&Token::Pipe) {
        patterns.push(parse_match_pattern(stream)?);
    }

    let guard = if stream.eat(&Token::If) {
        Some(parse_clause_operand(stream, prec::LOWEST)?)
    } else {
        None
    };
    stream.expect(Token::FatArrow)?;
    let body = parse_block(stream)?;

    Ok(MatchClause {
        patterns,
        guard,
        body,
        span: stream.span_from(start),
    })
}

fn parse_match_pattern(stream: &mut TokenStream) -> Result<MatchPattern, ParseError> {
    if stream.eat(&Token::Var) {
        return Ok(MatchPattern::Binding(parse_pattern(
            stream,
            PatternMode::Binding,
        )?));
    }
    if matches!(stream.peek(), Some(Token::Ident(name)) if name.as_ref() == "_") {
        let span = stream.current_span();
        stream.advance();
        return Ok(MatchPattern::Binding(Pattern::new(PatternKind::Wildcard, span)));
    }
    // `|` separates alternatives
    Ok(MatchPattern::Const(parse_clause_operand(
        stream,
        prec::BITWISE_OR + 1,
    )?))
}

/// A bare name right before `=>` is the operand, not a lambda parameter.
fn parse_clause_operand(stream: &mut TokenStream, min_prec: u8) -> Result<Expr, ParseError> {
    if matches!(stream.peek(), Some(Token::Ident(_))) && stream.check_nth(1, &Token::FatArrow) {
        let span = stream.current_span();
        let name = helpers::parse_qualified_name(stream)?;
        return Ok(Expr::new(ExprKind::Identifier(name), span));
    }
    expr::parse_expression(stream, min_prec)
}
