//! Hand-written precedence-climbing parser for Balsyn expressions, type
//! descriptors and binding patterns.
//!
//! Consumes the spanned token stream produced by `balsyn-lexer` and builds
//! the `balsyn-ast` tree. Syntax errors are collected as diagnostics; the
//! recovering entry points on [`Parser`] always return a node.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod parser;

pub use parser::{
    parse_binding_pattern, parse_expr, parse_expr_with_spans, parse_program, parse_ref_pattern,
    parse_type_descriptor, prec, ConfigError, Diagnostics, ParseError, ParseErrorKind, Parsed,
    Parser, ParserConfig, PatternMode, Recovery, TypeContext,
};

// Re-export lexer
pub use balsyn_lexer::Token;
