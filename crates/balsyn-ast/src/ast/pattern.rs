//! Binding and destructuring pattern nodes.
//!
//! Binding patterns introduce names (`var [a, b] = ...`); reference patterns
//! assign into existing places (`[a, b.c] = ...`) and hold their places as
//! [`PatternKind::VarRef`] expressions. Both share one node type.

use crate::ast::expr::{Expr, QualifiedName};
use crate::foundation::Span;
use serde::{Deserialize, Serialize};

/// Parsed pattern with its source extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Pattern kind
    pub kind: PatternKind,
    /// First token start .. last token end
    pub span: Span,
}

impl Pattern {
    /// Create a new pattern.
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Create an error placeholder.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(PatternKind::ParseError(message.into()), span)
    }

    /// Whether this is an error placeholder.
    pub fn is_error(&self) -> bool {
        matches!(self.kind, PatternKind::ParseError(_))
    }
}

/// Pattern kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatternKind {
    /// Introduces a name
    BindName(String),

    /// `_`
    Wildcard,

    /// Existing place, reference patterns only: `a`, `a.b`, `a[0]`
    VarRef(Expr),

    /// `[p1, p2, ...rest]`
    List {
        /// Element patterns
        elements: Vec<Pattern>,
        /// Rest element
        rest: Option<Box<Pattern>>,
    },

    /// `{f1: p, f2, ...rest}`
    Record {
        /// Field patterns
        fields: Vec<FieldPattern>,
        /// Remaining fields
        rest: RestPattern,
    },

    /// `error Type(message, cause, code = c, ...rest)`
    Error {
        /// Error type reference
        type_ref: Option<QualifiedName>,
        /// Message and cause patterns
        args: Vec<Pattern>,
        /// Detail field patterns
        fields: Vec<FieldPattern>,
        /// Remaining detail fields
        rest: Option<Box<Pattern>>,
    },

    /// Unparsable pattern; the message is the recorded diagnostic
    ParseError(String),
}

/// Named field of a record or error pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPattern {
    /// Field name
    pub name: String,
    /// Sub-pattern, absent for the shorthand `{name}`
    pub pattern: Option<Pattern>,
    /// Source extent
    pub span: Span,
}

/// Remainder of a record pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RestPattern {
    /// No rest marker
    None,
    /// `...name` or `...ref`
    Bind(Box<Pattern>),
    /// `!...`, reference patterns only
    Sealed,
}
