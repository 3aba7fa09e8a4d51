//! Statement nodes.
//!
//! Covers the statements needed to drive expressions, types and patterns
//! from a statement sequence: declarations, assignments, blocks and the
//! basic control flow forms.

use crate::ast::expr::Expr;
use crate::ast::pattern::Pattern;
use crate::ast::types::TypeDesc;
use crate::foundation::{AssignOp, Span};
use serde::{Deserialize, Serialize};

/// Parsed statement with its source extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    /// Statement kind
    pub kind: StmtKind,
    /// First token start .. last token end (including the `;`)
    pub span: Span,
}

impl Stmt {
    /// Create a new statement.
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Create an error placeholder.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(StmtKind::ParseError(message.into()), span)
    }

    /// Whether this is an error placeholder.
    pub fn is_error(&self) -> bool {
        matches!(self.kind, StmtKind::ParseError(_))
    }
}

/// Statement kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    /// `var p = e;`, `T p = e;`, `T p;`
    VarDecl {
        /// Declared type, absent for `var`
        ty: Option<TypeDesc>,
        /// Declared pattern
        pattern: Pattern,
        /// Initializer
        init: Option<Expr>,
    },

    /// `x = e;` or compound `x += e;`
    Assign {
        /// Assigned place
        target: Expr,
        /// Compound operator
        op: Option<AssignOp>,
        /// Assigned value
        value: Expr,
    },

    /// `[a, b] = e;`, `{x, y} = e;`, `error(m) = e;`
    Destructure {
        /// Reference pattern
        pattern: Pattern,
        /// Destructured value
        value: Expr,
    },

    /// `e;`
    Expr(Expr),

    /// `{ ... }`
    Block(Vec<Stmt>),

    /// `return;` or `return e;`
    Return(Option<Expr>),

    /// `if c { ... } else ...`
    If {
        /// Condition
        condition: Expr,
        /// Statements run when true
        then_block: Vec<Stmt>,
        /// `else` block or chained `else if`
        else_branch: Option<Box<Stmt>>,
    },

    /// `while c { ... }`
    While {
        /// Condition
        condition: Expr,
        /// Loop body
        body: Vec<Stmt>,
    },

    /// `foreach T p in e { ... }`
    Foreach {
        /// Declared type, absent for `var`
        ty: Option<TypeDesc>,
        /// Bound pattern
        pattern: Pattern,
        /// Iterated value
        iterable: Expr,
        /// Loop body
        body: Vec<Stmt>,
    },

    /// `match e { clauses }`
    Match {
        /// Matched value
        subject: Expr,
        /// Clauses in source order
        clauses: Vec<MatchClause>,
    },

    /// `panic e;`
    Panic(Expr),

    /// Unparsable statement; the message is the recorded diagnostic
    ParseError(String),
}

/// One `match` clause: `p1 | p2 if guard => { ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchClause {
    /// Alternatives separated by `|`
    pub patterns: Vec<MatchPattern>,
    /// `if` guard
    pub guard: Option<Expr>,
    /// Clause body
    pub body: Vec<Stmt>,
    /// Source extent
    pub span: Span,
}

/// Alternative of a `match` clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchPattern {
    /// Constant: `1`, `"a"`, `-1`, `Color:RED`
    Const(Expr),
    /// `_` or `var p`
    Binding(Pattern),
}
