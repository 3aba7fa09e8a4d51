//! Parse tree nodes.
//!
//! Every node is a `{kind, span}` pair: a sum type describing the construct
//! and the source span of its full extent. Nodes own their children and are
//! never mutated by the parser after being returned.

pub mod expr;
pub mod pattern;
pub mod stmt;
pub mod types;

pub use expr::*;
pub use pattern::*;
pub use stmt::*;
pub use types::*;
