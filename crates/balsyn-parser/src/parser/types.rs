//! Type descriptor parser.
//!
//! Precedence climbing over three type operators: the array suffix `[..]`
//! and the nullable suffix `?` bind tighter than union `|`. Every other form
//! is a primary parsed without left recursion.
//!
//! A `[` at the start of a type opens a tuple; a `[` after a type is an array
//! suffix. The two never meet at the same entry point, so no lookahead is
//! needed to tell them apart.

use super::expr::{self, prec};
use super::helpers::{self, parse_delimited};
use super::{token_utils, ParseError, TokenStream};
use balsyn_ast::{
    ArrayDimension, BuiltinGeneric, Expr, FieldDecl, FieldDesc, FunctionTypeParam, Literal,
    MethodDecl, Param, QualifiedName, TypeDesc, TypeKind, Visibility,
};
use balsyn_lexer::Token;

/// Where a type descriptor appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeContext {
    /// Declarations, type arguments, parenthesized types.
    Standalone,
    /// After `is` or inside a cast. A `?` followed by something that can
    /// start an expression belongs to an enclosing ternary.
    Expression,
}

/// Parse a full type descriptor, including unions.
pub fn parse_type(stream: &mut TokenStream, ctx: TypeContext) -> Result<TypeDesc, ParseError> {
    let start = stream.current_pos();
    let first = parse_suffixed(stream, ctx)?;
    if !stream.check(&Token::Pipe) {
        return Ok(first);
    }

    let mut members = Vec::new();
    splice_member(&mut members, first);
    while stream.eat(&Token::Pipe) {
        let member = parse_suffixed(stream, ctx)?;
        splice_member(&mut members, member);
    }
    Ok(TypeDesc::new(
        TypeKind::Union { members },
        stream.span_from(start),
    ))
}

/// Append a union operand, flattening a parenthesized union into its
/// members.
fn splice_member(members: &mut Vec<TypeDesc>, member: TypeDesc) {
    match member.kind {
        TypeKind::Union { members: inner } => members.extend(inner),
        kind => members.push(TypeDesc::new(kind, member.span)),
    }
}

/// Parse a primary followed by any number of array and nullable suffixes.
fn parse_suffixed(stream: &mut TokenStream, ctx: TypeContext) -> Result<TypeDesc, ParseError> {
    let start = stream.current_pos();
    let mut ty = parse_primary(stream, ctx)?;

    loop {
        match stream.peek() {
            Some(Token::LBracket) => {
                let dimension = parse_array_dimension(stream)?;
                ty = TypeDesc::new(
                    TypeKind::Array {
                        element: Box::new(ty),
                        dimension,
                    },
                    stream.span_from(start),
                );
            }
            Some(Token::Question) => {
                stream.advance();
                if ctx == TypeContext::Expression
                    && token_utils::can_start_expression(stream.peek())
                {
                    // ternary `?`
                    stream.retreat();
                    break;
                }
                ty = TypeDesc::new(TypeKind::Nullable(Box::new(ty)), stream.span_from(start));
            }
            _ => break,
        }
    }

    Ok(ty)
}

/// Parse `[]`, `[n]`, `[N]` or `[*]`.
fn parse_array_dimension(stream: &mut TokenStream) -> Result<ArrayDimension, ParseError> {
    let open_span = stream.expect(Token::LBracket)?;
    let dimension = match stream.peek() {
        Some(Token::RBracket) => ArrayDimension::Open,
        Some(Token::Star) => {
            stream.advance();
            ArrayDimension::Inferred
        }
        Some(Token::Integer(n)) => {
            let span = stream.current_span();
            stream.advance();
            let len = u64::try_from(*n)
                .map_err(|_| ParseError::invalid_syntax("array length must be >= 0", span))?;
            ArrayDimension::Fixed(len)
        }
        Some(Token::Ident(_)) => ArrayDimension::Constant(helpers::parse_qualified_name(stream)?),
        other => {
            return Err(ParseError::expected(
                "array length",
                other,
                stream.current_span(),
            ));
        }
    };
    stream.expect_closing(Token::RBracket, &Token::LBracket, open_span)?;
    Ok(dimension)
}

fn parse_primary(stream: &mut TokenStream, ctx: TypeContext) -> Result<TypeDesc, ParseError> {
    stream.descend(|stream| {
        let start = stream.current_pos();
        let kind = match stream.peek() {
            Some(Token::Ident(_)) => TypeKind::Simple(helpers::parse_qualified_name(stream)?),
            Some(Token::LParen) => return parse_group(stream),
            Some(Token::LBracket) => parse_tuple(stream)?,
            Some(Token::Record) => parse_record(stream)?,
            Some(Token::Object) => parse_object(stream)?,
            Some(Token::Function) => parse_function_type(stream, ctx)?,
            Some(Token::Map) => parse_generic(stream, BuiltinGeneric::Map)?,
            Some(Token::Future) => parse_generic(stream, BuiltinGeneric::Future)?,
            Some(Token::Typedesc) => parse_generic(stream, BuiltinGeneric::Typedesc)?,
            Some(Token::Stream) => parse_generic(stream, BuiltinGeneric::Stream)?,
            Some(Token::Table) => parse_generic(stream, BuiltinGeneric::Table)?,
            Some(Token::Xml) => parse_generic(stream, BuiltinGeneric::Xml)?,
            Some(Token::Error) => parse_generic(stream, BuiltinGeneric::Error)?,
            Some(_) => match parse_singleton(stream)? {
                Some(literal) => TypeKind::Singleton(literal),
                None => {
                    return Err(ParseError::expected(
                        "type descriptor",
                        stream.peek(),
                        stream.current_span(),
                    ));
                }
            },
            None => {
                return Err(ParseError::expected(
                    "type descriptor",
                    None,
                    stream.current_span(),
                ));
            }
        };
        Ok(TypeDesc::new(kind, stream.span_from(start)))
    })
}

/// Parse `()` or `( T )`.
///
/// The parentheses are not represented in the tree, but the span of the
/// result includes them.
fn parse_group(stream: &mut TokenStream) -> Result<TypeDesc, ParseError> {
    let start = stream.current_pos();
    let open_span = stream.expect(Token::LParen)?;
    if stream.eat(&Token::RParen) {
        return Ok(TypeDesc::new(TypeKind::Nil, stream.span_from(start)));
    }
    let inner = parse_type(stream, TypeContext::Standalone)?;
    stream.expect_closing(Token::RParen, &Token::LParen, open_span)?;
    Ok(TypeDesc::new(inner.kind, stream.span_from(start)))
}

/// Parse a singleton literal type: `"on"`, `1`, `-1`, `2.5`, `true`, `null`.
fn parse_singleton(stream: &mut TokenStream) -> Result<Option<Literal>, ParseError> {
    let negative = stream.check(&Token::Minus)
        && matches!(
            stream.peek_nth(1),
            Some(Token::Integer(_)) | Some(Token::Float(_))
        );
    if negative {
        stream.advance();
    }
    let literal = match stream.peek() {
        Some(Token::Integer(n)) if negative => Literal::Integer(-n),
        Some(Token::Integer(n)) => Literal::Integer(*n),
        Some(Token::Float(x)) if negative => Literal::Float(-x),
        Some(Token::Float(x)) => Literal::Float(*x),
        Some(Token::String(s)) => Literal::String(s.to_string()),
        Some(Token::True) => Literal::Boolean(true),
        Some(Token::False) => Literal::Boolean(false),
        Some(Token::Null) => Literal::Null,
        _ => return Ok(None),
    };
    stream.advance();
    Ok(Some(literal))
}

/// Parse `[A, B, R...]`.
fn parse_tuple(stream: &mut TokenStream) -> Result<TypeKind, ParseError> {
    let open_span = stream.expect(Token::LBracket)?;
    let mut members = Vec::new();
    let mut rest = None;
    while !stream.check(&Token::RBracket) {
        let member = parse_type(stream, TypeContext::Standalone)?;
        if stream.eat(&Token::Ellipsis) {
            rest = Some(Box::new(member));
            if stream.check(&Token::Comma) {
                return Err(ParseError::invalid_syntax(
                    "tuple rest type must be the last member",
                    stream.current_span(),
                ));
            }
            break;
        }
        members.push(member);
        if !stream.eat(&Token::Comma) {
            break;
        }
    }
    stream.expect_closing(Token::RBracket, &Token::LBracket, open_span)?;
    Ok(TypeKind::Tuple { members, rest })
}

/// Parse `record { ... }` or `record {| ... |}`.
fn parse_record(stream: &mut TokenStream) -> Result<TypeKind, ParseError> {
    stream.expect(Token::Record)?;
    let open_span = stream.current_span();
    let (open, close, sealed) = match stream.advance() {
        Some(Token::LBrace) => (Token::LBrace, Token::RBrace, false),
        Some(Token::LBracePipe) => (Token::LBracePipe, Token::PipeRBrace, true),
        other => {
            return Err(ParseError::expected("`{` or `{|`", other, open_span));
        }
    };

    let mut fields = Vec::new();
    let mut rest = None;
    while !stream.check(&close) && !stream.at_end() {
        if stream.eat(&Token::Star) {
            fields.push(FieldDesc::Inclusion(parse_inclusion_tail(stream)?));
            continue;
        }

        let field_start = stream.current_pos();
        let ty = parse_type(stream, TypeContext::Standalone)?;
        if stream.check(&Token::Ellipsis) {
            if !sealed {
                return Err(ParseError::invalid_syntax(
                    "rest field is only allowed in exclusive records `record {| ... |}`",
                    stream.current_span(),
                ));
            }
            stream.advance();
            stream.expect(Token::Semicolon)?;
            rest = Some(Box::new(ty));
            if !stream.check(&close) {
                return Err(ParseError::invalid_syntax(
                    "rest field must be the last field of a record",
                    stream.current_span(),
                ));
            }
            break;
        }

        let field = parse_field_tail(stream, field_start, None, ty, true)?;
        fields.push(FieldDesc::Field(field));
    }
    stream.expect_closing(close, &open, open_span)?;

    Ok(TypeKind::Record {
        fields,
        rest,
        sealed,
    })
}

/// Parse the `T;` of a `*T;` type inclusion, after the `*`.
fn parse_inclusion_tail(stream: &mut TokenStream) -> Result<TypeDesc, ParseError> {
    let ty = parse_type(stream, TypeContext::Standalone)?;
    stream.expect(Token::Semicolon)?;
    Ok(ty)
}

/// Parse `name ?; ` / `name = default;` after a field's type.
fn parse_field_tail(
    stream: &mut TokenStream,
    start: usize,
    visibility: Option<Visibility>,
    ty: TypeDesc,
    allow_optional: bool,
) -> Result<FieldDecl, ParseError> {
    let (name, _) = helpers::parse_name(stream, "where a field name was expected")?;
    let optional = allow_optional && stream.eat(&Token::Question);
    let default = if stream.eat(&Token::Eq) {
        Some(expr::parse_expr(stream)?)
    } else {
        None
    };
    stream.expect(Token::Semicolon)?;
    Ok(FieldDecl {
        visibility,
        ty,
        name,
        optional,
        default,
        span: stream.span_from(start),
    })
}

/// Parse `object { fields; method declarations; }`.
fn parse_object(stream: &mut TokenStream) -> Result<TypeKind, ParseError> {
    stream.expect(Token::Object)?;
    let open_span = stream.expect(Token::LBrace)?;

    let mut fields = Vec::new();
    let mut methods = Vec::new();
    while !stream.check(&Token::RBrace) && !stream.at_end() {
        let start = stream.current_pos();
        if stream.eat(&Token::Star) {
            fields.push(FieldDesc::Inclusion(parse_inclusion_tail(stream)?));
            continue;
        }

        let visibility = if stream.eat(&Token::Public) {
            Some(Visibility::Public)
        } else if stream.eat(&Token::Private) {
            Some(Visibility::Private)
        } else {
            None
        };

        // `function name(` declares a method; `function (` starts a field
        // of function type.
        if stream.check(&Token::Function) && matches!(stream.peek_nth(1), Some(Token::Ident(_))) {
            stream.advance();
            let (name, _) = helpers::parse_ident(stream, "where a method name was expected")?;
            let params = parse_params(stream)?;
            let return_type = if stream.eat(&Token::Returns) {
                Some(parse_type(stream, TypeContext::Standalone)?)
            } else {
                None
            };
            stream.expect(Token::Semicolon)?;
            methods.push(MethodDecl {
                visibility,
                name,
                params,
                return_type,
                span: stream.span_from(start),
            });
            continue;
        }

        let ty = parse_type(stream, TypeContext::Standalone)?;
        let field = parse_field_tail(stream, start, visibility, ty, false)?;
        fields.push(FieldDesc::Field(field));
    }
    stream.expect_closing(Token::RBrace, &Token::LBrace, open_span)?;

    Ok(TypeKind::Object { fields, methods })
}

/// Parse `function (params) returns T`, or bare `function`.
fn parse_function_type(stream: &mut TokenStream, ctx: TypeContext) -> Result<TypeKind, ParseError> {
    stream.expect(Token::Function)?;
    if !stream.check(&Token::LParen) {
        return Ok(TypeKind::Simple(QualifiedName::local("function")));
    }

    let mut seen_rest = false;
    let params = parse_delimited(stream, Token::LParen, Token::RParen, |s| {
        if seen_rest {
            return Err(ParseError::invalid_syntax(
                "rest parameter must be the last parameter",
                s.current_span(),
            ));
        }
        let ty = parse_type(s, TypeContext::Standalone)?;
        let rest = s.eat(&Token::Ellipsis);
        seen_rest = rest;
        let name = match s.peek() {
            Some(Token::Ident(name)) => {
                s.advance();
                Some(name.to_string())
            }
            _ => None,
        };
        Ok(FunctionTypeParam { ty, name, rest })
    })?;

    let return_type = if stream.eat(&Token::Returns) {
        Some(Box::new(parse_type(stream, ctx)?))
    } else {
        None
    };
    Ok(TypeKind::Function {
        params,
        return_type,
    })
}

/// Parse `map<T>`, `stream<T, E>`, or a bare `future` / `error` / ...
fn parse_generic(stream: &mut TokenStream, base: BuiltinGeneric) -> Result<TypeKind, ParseError> {
    let keyword_span = stream.current_span();
    stream.advance();
    if !stream.check(&Token::Lt) {
        if base.allows_bare() {
            return Ok(TypeKind::Generic {
                base,
                args: Vec::new(),
            });
        }
        return Err(ParseError::expected_token(
            &Token::Lt,
            stream.peek(),
            stream.current_span(),
        ));
    }

    let args = parse_delimited(stream, Token::Lt, Token::Gt, |s| {
        parse_type(s, TypeContext::Standalone)
    })?;
    if args.is_empty() || args.len() > base.max_args() {
        return Err(ParseError::invalid_syntax(
            format!(
                "`{}` takes {} type argument{}",
                base.keyword(),
                if base.max_args() == 1 { "one" } else { "one or two" },
                if base.max_args() == 1 { "" } else { "s" },
            ),
            keyword_span.merge(&stream.previous_span()),
        ));
    }
    Ok(TypeKind::Generic { base, args })
}

/// Parse a parenthesized parameter list with names: `(int a, string b = "x",
/// int... rest)`.
pub fn parse_params(stream: &mut TokenStream) -> Result<Vec<Param>, ParseError> {
    let mut seen_rest = false;
    parse_delimited(stream, Token::LParen, Token::RParen, |s| {
        if seen_rest {
            return Err(ParseError::invalid_syntax(
                "rest parameter must be the last parameter",
                s.current_span(),
            ));
        }
        let start = s.current_pos();
        let ty = parse_type(s, TypeContext::Standalone)?;
        let rest = s.eat(&Token::Ellipsis);
        seen_rest = rest;
        let (name, _) = helpers::parse_ident(s, "where a parameter name was expected")?;
        let default: Option<Expr> = if !rest && s.eat(&Token::Eq) {
            Some(expr::parse_expression(s, prec::LOWEST)?)
        } else {
            None
        };
        Ok(Param {
            ty: Some(ty),
            name,
            default,
            rest,
            span: s.span_from(start),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use balsyn_lexer::lex;

    fn parse(source: &str) -> TypeDesc {
        let tokens = lex(source).unwrap();
        let mut stream = TokenStream::new(&tokens, 0);
        let ty = parse_type(&mut stream, TypeContext::Standalone).expect("Parse failed");
        assert!(stream.at_end(), "trailing tokens in {:?}", source);
        ty
    }

    #[test]
    fn test_nullable_binds_tighter_than_union() {
        let ty = parse("int?|string");
        let TypeKind::Union { members } = ty.kind else {
            panic!("expected union, got {:?}", ty.kind);
        };
        assert!(matches!(members[0].kind, TypeKind::Nullable(_)));
    }

    #[test]
    fn test_group_span_includes_parens() {
        let ty = parse("(int)");
        assert!(matches!(ty.kind, TypeKind::Simple(_)));
        assert_eq!((ty.span.start, ty.span.end), (0, 5));
    }

    #[test]
    fn test_negative_singleton() {
        let ty = parse("-1|1");
        let TypeKind::Union { members } = ty.kind else {
            panic!("expected union");
        };
        assert_eq!(members[0].kind, TypeKind::Singleton(Literal::Integer(-1)));
    }

    #[test]
    fn test_expression_context_leaves_ternary_question() {
        let tokens = lex("int ? a").unwrap();
        let mut stream = TokenStream::new(&tokens, 0);
        let ty = parse_type(&mut stream, TypeContext::Expression).unwrap();
        assert!(matches!(ty.kind, TypeKind::Simple(_)));
        assert!(stream.check(&Token::Question));
    }
}
