//! Token classification helpers.
//!
//! Single source of truth for which identifiers name builtin types, which
//! tokens can start an expression, and which keywords may double as names.

use balsyn_lexer::Token;

/// Builtin simple type names, lexed as identifiers.
const BUILTIN_TYPES: &[&str] = &[
    "int", "float", "decimal", "boolean", "string", "byte", "any", "anydata", "json", "never",
    "readonly", "handle",
];

/// Whether `name` is a builtin simple type.
pub fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name)
}

/// Whether `token` is a type constructor keyword that can start a type
/// descriptor.
pub fn is_type_keyword(token: &Token) -> bool {
    matches!(
        token,
        Token::Map
            | Token::Future
            | Token::Typedesc
            | Token::Stream
            | Token::Table
            | Token::Xml
            | Token::Error
            | Token::Record
            | Token::Object
            | Token::Function
    )
}

/// Whether `token` can start an expression.
pub fn can_start_expression(token: Option<&Token>) -> bool {
    let Some(token) = token else {
        return false;
    };
    is_type_keyword(token)
        || matches!(
            token,
            Token::Integer(_)
                | Token::Float(_)
                | Token::String(_)
                | Token::Ident(_)
                | Token::True
                | Token::False
                | Token::Null
                | Token::LParen
                | Token::LBracket
                | Token::LBrace
                | Token::Plus
                | Token::Minus
                | Token::Bang
                | Token::Tilde
                | Token::Typeof
                | Token::Check
                | Token::Checkpanic
                | Token::Trap
                | Token::Wait
                | Token::Start
                | Token::Flush
                | Token::New
                | Token::Let
                | Token::Lt
                | Token::LeftArrow
        )
}

/// Convert a keyword token to its spelling, for positions where keywords
/// are accepted as names (field access, mapping keys, module prefixes).
pub fn keyword_to_string(token: &Token) -> Option<&'static str> {
    if token.is_keyword() {
        token.text()
    } else {
        None
    }
}

/// Name carried by an identifier or keyword token.
pub fn name_of(token: &Token) -> Option<String> {
    match token {
        Token::Ident(name) => Some(name.to_string()),
        other => keyword_to_string(other).map(str::to_string),
    }
}
