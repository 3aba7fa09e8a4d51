//! Foundation types shared by every node: source spans and operators.

pub mod operators;
pub mod span;

pub use operators::{AssignOp, BinaryOp, UnaryOp};
pub use span::{LineIndex, Span};
