// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Lexical analysis for the balsyn front end.
//!
//! Tokenization of source text using logos. The parser consumes the
//! `(Token, Range<usize>)` pairs produced here; the byte ranges are what the
//! parser turns into node spans, and what it uses to tell adjacent tokens
//! (`<<`, `mod:name`) from separated ones (`a < <T>b`, `c ? a : b`).
//!
//! # Design
//!
//! - `Token` — keywords, operators, delimiters, literals and identifiers
//! - Whitespace, `//` comments and `#` documentation lines are skipped
//! - `<` and `>` are always single tokens so nested generics such as
//!   `map<map<int>>` close correctly; shifts are recognised by the parser
//! - Simple builtin type names (`int`, `string`, ...) are identifiers; only
//!   the type constructors that take part in the grammar are keywords
//!
//! # Examples
//!
//! ```
//! use balsyn_lexer::{lex, Token};
//!
//! let tokens = lex("x + 1").unwrap();
//! assert_eq!(tokens[1].0, Token::Plus);
//! assert_eq!(tokens[2].1, 4..5);
//! ```

use logos::Logos;
use std::ops::Range;
use std::rc::Rc;

/// Source token.
///
/// Data-carrying variants hold their decoded value; every other variant maps
/// to exactly one spelling, available through [`Token::text`] and `Display`.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")] // Skip whitespace
#[logos(skip r"//[^\n]*")] // Skip // comments
#[logos(skip r"#[^\n]*")] // Skip documentation lines
pub enum Token {
    // === Keywords ===

    // Declarations
    /// Keyword `var`
    #[token("var")]
    Var,
    /// Keyword `function`
    #[token("function")]
    Function,
    /// Keyword `returns`
    #[token("returns")]
    Returns,
    /// Keyword `public`
    #[token("public")]
    Public,
    /// Keyword `private`
    #[token("private")]
    Private,

    // Type constructors
    /// Keyword `record`
    #[token("record")]
    Record,
    /// Keyword `object`
    #[token("object")]
    Object,
    /// Keyword `map`
    #[token("map")]
    Map,
    /// Keyword `future`
    #[token("future")]
    Future,
    /// Keyword `typedesc`
    #[token("typedesc")]
    Typedesc,
    /// Keyword `stream`
    #[token("stream")]
    Stream,
    /// Keyword `table`
    #[token("table")]
    Table,
    /// Keyword `xml`
    #[token("xml")]
    Xml,
    /// Keyword `error`
    #[token("error")]
    Error,

    // Expression keywords
    /// Keyword `is`
    #[token("is")]
    Is,
    /// Keyword `check`
    #[token("check")]
    Check,
    /// Keyword `checkpanic`
    #[token("checkpanic")]
    Checkpanic,
    /// Keyword `trap`
    #[token("trap")]
    Trap,
    /// Keyword `wait`
    #[token("wait")]
    Wait,
    /// Keyword `start`
    #[token("start")]
    Start,
    /// Keyword `flush`
    #[token("flush")]
    Flush,
    /// Keyword `typeof`
    #[token("typeof")]
    Typeof,
    /// Keyword `new`
    #[token("new")]
    New,
    /// Keyword `let`
    #[token("let")]
    Let,
    /// Keyword `in`
    #[token("in")]
    In,

    // Statements
    /// Keyword `if`
    #[token("if")]
    If,
    /// Keyword `else`
    #[token("else")]
    Else,
    /// Keyword `while`
    #[token("while")]
    While,
    /// Keyword `foreach`
    #[token("foreach")]
    Foreach,
    /// Keyword `match`
    #[token("match")]
    Match,
    /// Keyword `return`
    #[token("return")]
    Return,
    /// Keyword `panic`
    #[token("panic")]
    Panic,

    // Literals
    /// Boolean literal `true`
    #[token("true")]
    True,
    /// Boolean literal `false`
    #[token("false")]
    False,
    /// Literal `null`
    #[token("null")]
    Null,

    // === Operators ===

    // Arithmetic
    /// Operator `+`
    #[token("+")]
    Plus,
    /// Operator `-`
    #[token("-")]
    Minus,
    /// Operator `*`
    #[token("*")]
    Star,
    /// Operator `/`
    #[token("/")]
    Slash,
    /// Operator `%`
    #[token("%")]
    Percent,

    // Unary
    /// Operator `!`
    #[token("!")]
    Bang,
    /// Operator `~`
    #[token("~")]
    Tilde,

    // Bitwise
    /// Operator `&`
    #[token("&")]
    Amp,
    /// Operator `^`
    #[token("^")]
    Caret,
    /// Operator `|`
    #[token("|")]
    Pipe,

    // Logic
    /// Operator `&&`
    #[token("&&")]
    AndAnd,
    /// Operator `||`
    #[token("||")]
    OrOr,

    // Comparison
    /// Operator `==`
    #[token("==")]
    EqEq,
    /// Operator `!=`
    #[token("!=")]
    BangEq,
    /// Operator `===`
    #[token("===")]
    EqEqEq,
    /// Operator `!==`
    #[token("!==")]
    BangEqEq,
    /// Operator `<` (also opens casts and type arguments, and forms `<<`)
    #[token("<")]
    Lt,
    /// Operator `<=`
    #[token("<=")]
    LtEq,
    /// Operator `>` (also closes casts and type arguments, and forms `>>`)
    #[token(">")]
    Gt,
    /// Operator `>=`
    #[token(">=")]
    GtEq,

    // Assignment
    /// Operator `=`
    #[token("=")]
    Eq,
    /// Operator `+=`
    #[token("+=")]
    PlusEq,
    /// Operator `-=`
    #[token("-=")]
    MinusEq,
    /// Operator `*=`
    #[token("*=")]
    StarEq,
    /// Operator `/=`
    #[token("/=")]
    SlashEq,

    // Conditional
    /// Operator `?`
    #[token("?")]
    Question,
    /// Operator `?.`
    #[token("?.")]
    QuestionDot,
    /// Operator `?:`
    #[token("?:")]
    Elvis,

    // Range
    /// Operator `...`
    #[token("...")]
    Ellipsis,
    /// Operator `..<`
    #[token("..<")]
    HalfOpenRange,

    // Workers and functions
    /// Operator `->` (asynchronous send)
    #[token("->")]
    Arrow,
    /// Operator `->>` (synchronous send)
    #[token("->>")]
    SyncArrow,
    /// Operator `<-` (receive)
    #[token("<-")]
    LeftArrow,
    /// Operator `=>`
    #[token("=>")]
    FatArrow,

    // Other
    /// Operator `.`
    #[token(".")]
    Dot,
    /// Operator `.@`
    #[token(".@")]
    DotAt,
    /// Operator `@`
    #[token("@")]
    At,
    /// Operator `:`
    #[token(":")]
    Colon,
    /// Operator `,`
    #[token(",")]
    Comma,
    /// Operator `;`
    #[token(";")]
    Semicolon,

    // === Delimiters ===
    /// Delimiter `(`
    #[token("(")]
    LParen,
    /// Delimiter `)`
    #[token(")")]
    RParen,
    /// Delimiter `{`
    #[token("{")]
    LBrace,
    /// Delimiter `}`
    #[token("}")]
    RBrace,
    /// Delimiter `{|`
    #[token("{|")]
    LBracePipe,
    /// Delimiter `|}`
    #[token("|}")]
    PipeRBrace,
    /// Delimiter `[`
    #[token("[")]
    LBracket,
    /// Delimiter `]`
    #[token("]")]
    RBracket,

    // === Literals ===
    /// Integer literal, decimal (`42`) or hexadecimal (`0x2A`).
    ///
    /// Literals that overflow `i64` fail to lex and surface as lexer errors.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| i64::from_str_radix(&lex.slice()[2..], 16).ok())]
    Integer(i64),

    /// Floating point literal (`3.14`, `1.0e-3`, `2e8`, `1.5f`, `1.5d`)
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?[fFdD]?", parse_float)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fFdD]?", parse_float)]
    Float(f64),

    /// String literal with escapes resolved.
    ///
    /// Uses `Rc<str>` for cheap cloning throughout the parser pipeline.
    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        let content = &s[1..s.len() - 1];
        unescape_string(content).map(|s| Rc::from(s.as_str()))
    })]
    String(Rc<str>),

    /// Identifier, including builtin type names and `_`.
    ///
    /// Quoted identifiers (`'function`) let keywords be used as names; the
    /// quote is dropped from the payload.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| Rc::from(lex.slice()))]
    #[regex(r"'[a-zA-Z_][a-zA-Z0-9_]*", |lex| Rc::from(&lex.slice()[1..]))]
    Ident(Rc<str>),
}

fn parse_float(lex: &mut logos::Lexer<Token>) -> Option<f64> {
    lex.slice()
        .trim_end_matches(['f', 'F', 'd', 'D'])
        .parse::<f64>()
        .ok()
}

/// Unescape a string literal content.
fn unescape_string(s: &str) -> Option<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                // Unsupported escape or trailing backslash
                _ => return None,
            }
        } else {
            result.push(c);
        }
    }
    Some(result)
}

impl Token {
    /// Fixed spelling of the token, `None` for data-carrying tokens.
    pub fn text(&self) -> Option<&'static str> {
        let text = match self {
            Token::Var => "var",
            Token::Function => "function",
            Token::Returns => "returns",
            Token::Public => "public",
            Token::Private => "private",
            Token::Record => "record",
            Token::Object => "object",
            Token::Map => "map",
            Token::Future => "future",
            Token::Typedesc => "typedesc",
            Token::Stream => "stream",
            Token::Table => "table",
            Token::Xml => "xml",
            Token::Error => "error",
            Token::Is => "is",
            Token::Check => "check",
            Token::Checkpanic => "checkpanic",
            Token::Trap => "trap",
            Token::Wait => "wait",
            Token::Start => "start",
            Token::Flush => "flush",
            Token::Typeof => "typeof",
            Token::New => "new",
            Token::Let => "let",
            Token::In => "in",
            Token::If => "if",
            Token::Else => "else",
            Token::While => "while",
            Token::Foreach => "foreach",
            Token::Match => "match",
            Token::Return => "return",
            Token::Panic => "panic",
            Token::True => "true",
            Token::False => "false",
            Token::Null => "null",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Bang => "!",
            Token::Tilde => "~",
            Token::Amp => "&",
            Token::Caret => "^",
            Token::Pipe => "|",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::EqEq => "==",
            Token::BangEq => "!=",
            Token::EqEqEq => "===",
            Token::BangEqEq => "!==",
            Token::Lt => "<",
            Token::LtEq => "<=",
            Token::Gt => ">",
            Token::GtEq => ">=",
            Token::Eq => "=",
            Token::PlusEq => "+=",
            Token::MinusEq => "-=",
            Token::StarEq => "*=",
            Token::SlashEq => "/=",
            Token::Question => "?",
            Token::QuestionDot => "?.",
            Token::Elvis => "?:",
            Token::Ellipsis => "...",
            Token::HalfOpenRange => "..<",
            Token::Arrow => "->",
            Token::SyncArrow => "->>",
            Token::LeftArrow => "<-",
            Token::FatArrow => "=>",
            Token::Dot => ".",
            Token::DotAt => ".@",
            Token::At => "@",
            Token::Colon => ":",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LBracePipe => "{|",
            Token::PipeRBrace => "|}",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::Integer(_) | Token::Float(_) | Token::String(_) | Token::Ident(_) => {
                return None;
            }
        };
        Some(text)
    }

    /// Whether this token is a reserved word.
    pub fn is_keyword(&self) -> bool {
        self.text()
            .is_some_and(|text| text.chars().all(|c| c.is_ascii_alphabetic()))
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Integer(n) => write!(f, "{}", n),
            Token::Float(x) => write!(f, "{}", x),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Ident(id) => write!(f, "{}", id),
            other => f.write_str(other.text().unwrap_or_default()),
        }
    }
}

/// Source text that does not form a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid token `{text}` at bytes {span:?}")]
pub struct LexError {
    /// Offending source text
    pub text: String,
    /// Byte range of the offending text
    pub span: Range<usize>,
}

/// Lex `source` into spanned tokens, stopping at the first invalid token.
pub fn lex(source: &str) -> Result<Vec<(Token, Range<usize>)>, LexError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                return Err(LexError {
                    text: lexer.slice().to_string(),
                    span: lexer.span(),
                });
            }
        }
    }
    Ok(tokens)
}

/// Lex `source` into spanned tokens, dropping invalid input.
///
/// Returns the tokens together with every lexing error so callers can report
/// them without losing the rest of the stream.
pub fn lex_lossy(source: &str) -> (Vec<(Token, Range<usize>)>, Vec<LexError>) {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => errors.push(LexError {
                text: lexer.slice().to_string(),
                span: lexer.span(),
            }),
        }
    }
    (tokens, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test helper: lex source and keep only the tokens.
    fn kinds(source: &str) -> Vec<Token> {
        lex(source).unwrap().into_iter().map(|(tok, _)| tok).collect()
    }

    fn ident(s: &str) -> Token {
        Token::Ident(Rc::from(s))
    }

    #[test]
    fn test_keywords_and_builtin_names() {
        let tokens = kinds("var record int string map error");
        assert_eq!(
            tokens,
            vec![
                Token::Var,
                Token::Record,
                ident("int"),
                ident("string"),
                Token::Map,
                Token::Error,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42 0x2A"), vec![Token::Integer(42), Token::Integer(42)]);
        assert_eq!(
            kinds("3.5 2e3 1.5f"),
            vec![Token::Float(3.5), Token::Float(2000.0), Token::Float(1.5)]
        );
    }

    #[test]
    fn test_range_operators_after_integers() {
        assert_eq!(
            kinds("1...5 0..<n"),
            vec![
                Token::Integer(1),
                Token::Ellipsis,
                Token::Integer(5),
                Token::Integer(0),
                Token::HalfOpenRange,
                ident("n"),
            ]
        );
    }

    #[test]
    fn test_angle_brackets_stay_single() {
        assert_eq!(
            kinds("map<map<int>>"),
            vec![
                Token::Map,
                Token::Lt,
                Token::Map,
                Token::Lt,
                ident("int"),
                Token::Gt,
                Token::Gt,
            ]
        );
    }

    #[test]
    fn test_shift_spans_are_adjacent() {
        let tokens = lex("a << b").unwrap();
        assert_eq!(tokens[1], (Token::Lt, 2..3));
        assert_eq!(tokens[2], (Token::Lt, 3..4));
    }

    #[test]
    fn test_conditional_operators() {
        assert_eq!(
            kinds("a ?: b ?. c ? d"),
            vec![
                ident("a"),
                Token::Elvis,
                ident("b"),
                Token::QuestionDot,
                ident("c"),
                Token::Question,
                ident("d"),
            ]
        );
    }

    #[test]
    fn test_exclusive_record_delimiters() {
        assert_eq!(
            kinds("record {| int a; |}"),
            vec![
                Token::Record,
                Token::LBracePipe,
                ident("int"),
                ident("a"),
                Token::Semicolon,
                Token::PipeRBrace,
            ]
        );
    }

    #[test]
    fn test_worker_arrows() {
        assert_eq!(
            kinds("x -> w; y ->> w; <- w"),
            vec![
                ident("x"),
                Token::Arrow,
                ident("w"),
                Token::Semicolon,
                ident("y"),
                Token::SyncArrow,
                ident("w"),
                Token::Semicolon,
                Token::LeftArrow,
                ident("w"),
            ]
        );
    }

    #[test]
    fn test_strings_and_quoted_identifiers() {
        assert_eq!(
            kinds(r#""a\tb" 'function"#),
            vec![Token::String(Rc::from("a\tb")), ident("function")]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("# doc line\nx // trailing\n+ y"),
            vec![ident("x"), Token::Plus, ident("y")]
        );
    }

    #[test]
    fn test_display_matches_spelling() {
        assert_eq!(Token::Ellipsis.to_string(), "...");
        assert_eq!(Token::LBracePipe.to_string(), "{|");
        assert_eq!(Token::Checkpanic.to_string(), "checkpanic");
        assert_eq!(ident("x").to_string(), "x");
        assert!(Token::Typeof.is_keyword());
        assert!(!Token::Arrow.is_keyword());
    }

    #[test]
    fn test_invalid_input() {
        let err = lex("a $ b").unwrap_err();
        assert_eq!(err.text, "$");
        assert_eq!(err.span, 2..3);

        let (tokens, errors) = lex_lossy("a $ b");
        assert_eq!(tokens.len(), 2);
        assert_eq!(errors.len(), 1);
    }
}
