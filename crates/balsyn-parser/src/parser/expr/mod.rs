//! Expression parser using precedence climbing.
//!
//! ## Precedence Levels (loosest to tightest)
//!
//! | level | operators                               | assoc        |
//! |------:|-----------------------------------------|--------------|
//! |     5 | `->` `->>` worker send                  | non-chaining |
//! |    10 | `? :` ternary                           | right        |
//! |    20 | `?:` elvis                              | left         |
//! |    30 | `\|\|`                                  | left         |
//! |    40 | `&&`                                    | left         |
//! |    50 | `^` `\|`                                | left         |
//! |    60 | `&`                                     | left         |
//! |    70 | `===` `!==`                             | left         |
//! |    80 | `==` `!=`                               | left         |
//! |    90 | `is` type test                          | left         |
//! |   100 | `<` `>` `<=` `>=`                       | left         |
//! |   110 | `...` `..<`                             | non-assoc    |
//! |   120 | `<<` `>>` `>>>` (adjacent `<` / `>`)     | left         |
//! |   130 | `+` `-`                                 | left         |
//! |   140 | `*` `/` `%`                             | left         |
//! |   150 | `check` `checkpanic`                    | prefix       |
//! |   160 | unary `+ - ! ~ typeof`, cast `<T>`      | prefix       |
//! |   170 | `.f` `?.f` `.@a` `[i]` `(args)`         | postfix      |
//!
//! Postfix access is applied eagerly right after a primary, so prefix
//! operators and casts apply to the whole access chain: `-a.b` is `-(a.b)`.
//!
//! ## Module Organization
//!
//! - `pratt` - climbing loop, prefix operators, casts
//! - `atoms` - literals, names, constructors, parenthesized forms
//! - `postfix` - field, index, annotation access and calls
//! - `special` - lambdas, `let`, `new`, annotations
//! - `workers` - `wait`, `start`, send, receive, `flush`

mod atoms;
mod postfix;
mod pratt;
mod special;
mod workers;

use super::{ParseError, TokenStream};
use balsyn_ast::Expr;

/// Binding power of each operator level; higher binds tighter.
pub mod prec {
    /// Parse a complete expression.
    pub const LOWEST: u8 = 0;
    /// `->`, `->>`
    pub const SEND: u8 = 5;
    /// `? :`
    pub const TERNARY: u8 = 10;
    /// `?:`
    pub const ELVIS: u8 = 20;
    /// `||`
    pub const LOGICAL_OR: u8 = 30;
    /// `&&`
    pub const LOGICAL_AND: u8 = 40;
    /// `^`, `|`
    pub const BITWISE_OR: u8 = 50;
    /// `&`
    pub const BITWISE_AND: u8 = 60;
    /// `===`, `!==`
    pub const REF_EQUALITY: u8 = 70;
    /// `==`, `!=`
    pub const EQUALITY: u8 = 80;
    /// `is`
    pub const TYPE_TEST: u8 = 90;
    /// `<`, `>`, `<=`, `>=`
    pub const RELATIONAL: u8 = 100;
    /// `...`, `..<`
    pub const RANGE: u8 = 110;
    /// `<<`, `>>`, `>>>`
    pub const SHIFT: u8 = 120;
    /// `+`, `-`
    pub const ADDITIVE: u8 = 130;
    /// `*`, `/`, `%`
    pub const MULTIPLICATIVE: u8 = 140;
    /// `check`, `checkpanic`
    pub const CHECK: u8 = 150;
    /// Prefix unary operators and casts
    pub const UNARY: u8 = 160;
    /// Field, index, annotation access and calls
    pub const POSTFIX: u8 = 170;
}

/// Parse a complete expression.
pub fn parse_expr(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    pratt::parse_pratt(stream, prec::LOWEST)
}

/// Parse an expression containing only operators that bind at least as
/// tightly as `min_prec`.
pub fn parse_expression(stream: &mut TokenStream, min_prec: u8) -> Result<Expr, ParseError> {
    pratt::parse_pratt(stream, min_prec)
}

/// Parse a primary followed by its postfix accesses, without any prefix or
/// binary operator. Used for variable references in patterns.
pub(super) fn parse_postfix_expr(stream: &mut TokenStream) -> Result<Expr, ParseError> {
    postfix::parse_postfix(stream)
}
