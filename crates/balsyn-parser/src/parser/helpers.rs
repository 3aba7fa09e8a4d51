//! Common parsing helper functions shared by the expression, type and
//! pattern parsers.

use crate::parser::{token_utils, ParseError, TokenStream};
use balsyn_ast::foundation::Span;
use balsyn_ast::QualifiedName;
use balsyn_lexer::Token;

/// Parse a plain identifier.
pub fn parse_ident(stream: &mut TokenStream, context: &str) -> Result<(String, Span), ParseError> {
    let span = stream.current_span();
    match stream.peek() {
        Some(Token::Ident(name)) => {
            stream.advance();
            Ok((name.to_string(), span))
        }
        other => Err(ParseError::unexpected_token(other, context, span)),
    }
}

/// Parse a name where keywords are also accepted: field names after `.`,
/// mapping keys, record field declarations.
pub fn parse_name(stream: &mut TokenStream, context: &str) -> Result<(String, Span), ParseError> {
    let span = stream.current_span();
    match stream.peek().and_then(token_utils::name_of) {
        Some(name) => {
            stream.advance();
            Ok((name, span))
        }
        None => Err(ParseError::unexpected_token(stream.peek(), context, span)),
    }
}

/// Whether the cursor is at `module:name` with no whitespace around the
/// colon.
///
/// The module may be a keyword (`map:length`, `error:Retriable`); the name
/// must be an identifier.
pub fn at_qualified_name(stream: &TokenStream) -> bool {
    stream.peek().and_then(token_utils::name_of).is_some()
        && stream.check_nth(1, &Token::Colon)
        && matches!(stream.peek_nth(2), Some(Token::Ident(_)))
        && stream.is_adjacent(1)
        && stream.is_adjacent(2)
}

/// Parse a possibly module-qualified name: `x` or `io:println`.
pub fn parse_qualified_name(stream: &mut TokenStream) -> Result<QualifiedName, ParseError> {
    if at_qualified_name(stream) {
        let (module, _) = parse_name(stream, "as module prefix")?;
        stream.advance(); // ':'
        let (name, _) = parse_ident(stream, "after module prefix")?;
        Ok(QualifiedName::qualified(module, name))
    } else {
        let (name, _) = parse_ident(stream, "where a name was expected")?;
        Ok(QualifiedName::local(name))
    }
}

/// Parse `open item, item, ... close` with an optional trailing comma.
///
/// Returns the items and the span of the opening delimiter.
pub fn parse_delimited<'src, T>(
    stream: &mut TokenStream<'src>,
    open: Token,
    close: Token,
    mut item: impl FnMut(&mut TokenStream<'src>) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    let open_span = stream.expect(open.clone())?;
    let mut items = Vec::new();
    while !stream.check(&close) {
        items.push(item(stream)?);
        if !stream.eat(&Token::Comma) {
            break;
        }
    }
    stream.expect_closing(close, &open, open_span)?;
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use balsyn_lexer::lex;

    #[test]
    fn test_qualified_name_requires_adjacency() {
        let tokens = lex("io:println").unwrap();
        let mut stream = TokenStream::new(&tokens, 0);
        assert_eq!(
            parse_qualified_name(&mut stream).unwrap(),
            QualifiedName::qualified("io", "println")
        );

        let tokens = lex("a : b").unwrap();
        let mut stream = TokenStream::new(&tokens, 0);
        assert_eq!(
            parse_qualified_name(&mut stream).unwrap(),
            QualifiedName::local("a")
        );
        assert_eq!(stream.current_pos(), 1);
    }

    #[test]
    fn test_keyword_module_prefix() {
        let tokens = lex("map:length").unwrap();
        let mut stream = TokenStream::new(&tokens, 0);
        assert_eq!(
            parse_qualified_name(&mut stream).unwrap(),
            QualifiedName::qualified("map", "length")
        );
    }

    #[test]
    fn test_delimited_trailing_comma() {
        let tokens = lex("(a, b,)").unwrap();
        let mut stream = TokenStream::new(&tokens, 0);
        let items = parse_delimited(&mut stream, Token::LParen, Token::RParen, |s| {
            parse_ident(s, "in list")
        })
        .unwrap();
        assert_eq!(items.len(), 2);
        assert!(stream.at_end());
    }
}
