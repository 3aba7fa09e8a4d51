// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! AST types for the balsyn front end
//!
//! This crate contains the parse tree produced by `balsyn-parser`:
//! expressions, type descriptors, patterns and statements, plus the
//! foundation types (spans and operators) they are built from.

pub mod ast;
pub mod foundation;

// Re-export commonly used types
pub use foundation::{AssignOp, BinaryOp, LineIndex, Span, UnaryOp};

pub use ast::*;
