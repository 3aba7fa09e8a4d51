//! Expression nodes.
//!
//! The parser produces one [`Expr`] per expression, owning its children.
//! Operator precedence is already resolved in the tree shape: `1 + 2 * 3`
//! is a `Binary(Add)` whose right operand is a `Binary(Mul)`.
//!
//! # Error Recovery
//!
//! A construct that failed to parse is kept in the tree as
//! [`ExprKind::ParseError`], spanning the tokens skipped during recovery, so
//! consumers see the full statement list of a broken file.

use crate::ast::pattern::Pattern;
use crate::ast::stmt::Stmt;
use crate::ast::types::TypeDesc;
use crate::foundation::{BinaryOp, Span, UnaryOp};
use serde::{Deserialize, Serialize};

/// Name reference, optionally qualified by a module prefix: `io:println`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Module prefix before the `:`
    pub module: Option<String>,
    /// Referenced name
    pub name: String,
}

impl QualifiedName {
    /// Unqualified name.
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            module: None,
            name: name.into(),
        }
    }

    /// Module-qualified name.
    pub fn qualified(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.module {
            Some(module) => write!(f, "{}:{}", module, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Literal value, shared by expressions and singleton types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Integer literal, decimal or hexadecimal
    Integer(i64),
    /// Floating point literal
    Float(f64),
    /// String literal with escapes resolved
    String(String),
    /// `true` or `false`
    Boolean(bool),
    /// Nil literal `()`
    Nil,
    /// `null`
    Null,
}

/// Parsed expression with its source extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    /// Expression kind
    pub kind: ExprKind,
    /// First token start .. last token end
    pub span: Span,
}

impl Expr {
    /// Create a new expression.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Create a binary operator expression.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr, span: Span) -> Self {
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    /// Create a unary operator expression.
    pub fn unary(op: UnaryOp, operand: Expr, span: Span) -> Self {
        Self::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    /// Create an error placeholder.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::ParseError(message.into()), span)
    }

    /// Whether this is an error placeholder.
    pub fn is_error(&self) -> bool {
        matches!(self.kind, ExprKind::ParseError(_))
    }

    /// Whether this expression can be assigned to: a name, `_`, a field
    /// access or an index access.
    pub fn is_lvalue(&self) -> bool {
        match &self.kind {
            ExprKind::Identifier(_) => true,
            ExprKind::Postfix { accessor, .. } => {
                !matches!(accessor, Accessor::Annotation(_))
            }
            _ => false,
        }
    }
}

/// Expression kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    // === Primaries ===
    /// Literal value: `42`, `0x2A`, `"s"`, `true`, `()`, `null`
    Literal(Literal),

    /// Variable or constant reference: `x`, `io:println`, `int:MAX_VALUE`
    Identifier(QualifiedName),

    /// Parenthesized expression: `(a + b)`
    Group(Box<Expr>),

    /// List constructor: `[1, 2, ...rest]`
    ListCtor(Vec<ListMember>),

    /// Mapping constructor: `{a: 1, "b": 2, [k]: 3, c, ...rest}`
    RecordCtor(Vec<RecordField>),

    /// Type descriptor used as a value: `int[]`, `map<string>`
    TypeDesc(TypeDesc),

    // === Operators ===
    /// Prefix operator: `-x`, `typeof x`
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },

    /// Infix operator, including elvis `a ?: b`
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },

    /// Conditional: `c ? a : b`
    Ternary {
        /// Condition
        condition: Box<Expr>,
        /// Value when true
        then_branch: Box<Expr>,
        /// Value when false
        else_branch: Box<Expr>,
    },

    /// Integer range: `a ... b` (inclusive) or `a ..< b`
    Range {
        /// Lower bound
        from: Box<Expr>,
        /// Upper bound
        to: Box<Expr>,
        /// `...` when true, `..<` when false
        inclusive: bool,
    },

    /// Type cast: `<int>x`, `<@untainted string>s`, `<@untainted>s`
    Cast {
        /// Annotations inside the angle brackets
        annotations: Vec<Annotation>,
        /// Target type, absent for annotation-only casts
        target: Option<TypeDesc>,
        /// Operand
        operand: Box<Expr>,
    },

    /// Type test: `x is int`
    TypeTest {
        /// Tested value
        operand: Box<Expr>,
        /// Tested type
        ty: TypeDesc,
    },

    /// Field, index or annotation access
    Postfix {
        /// Accessed value
        base: Box<Expr>,
        /// Access form
        accessor: Accessor,
    },

    /// Function or method call: `f(a, n = b, ...rest)`
    Call {
        /// Called expression
        callee: Box<Expr>,
        /// Arguments in source order
        args: Vec<Arg>,
    },

    /// `check e` or `checkpanic e`
    Check {
        /// `checkpanic` when true
        panics: bool,
        /// Checked expression
        operand: Box<Expr>,
    },

    /// `trap e`
    Trap(Box<Expr>),

    /// `new`, `new(args)`, `new T(args)`
    New {
        /// Constructed type
        ty: Option<TypeDesc>,
        /// Constructor arguments
        args: Vec<Arg>,
    },

    /// `let int x = 1, var y = 2 in x + y`
    Let {
        /// Bindings in declaration order
        bindings: Vec<LetBinding>,
        /// Body evaluated with the bindings in scope
        body: Box<Expr>,
    },

    /// Anonymous function
    Lambda(Lambda),

    // === Concurrency ===
    /// `start f()`
    Start(Box<Expr>),

    /// `wait f`, `wait f1 | f2`, `wait {a: f1, b: f2}`
    Wait(WaitKind),

    /// Worker send: `x -> w` (async) or `x ->> w` (sync)
    Send {
        /// Sent value
        value: Box<Expr>,
        /// Target worker name (`function` for the enclosing function)
        worker: String,
        /// `->>` when true
        sync: bool,
    },

    /// Worker receive: `<- w`, `<- w1 | w2`, `<- {a: w1, b: w2}`
    Receive(ReceiveKind),

    /// `flush` or `flush w`
    Flush(Option<String>),

    // === Error Recovery ===
    /// Unparsable construct; the message is the recorded diagnostic
    ParseError(String),
}

/// Postfix access forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Accessor {
    /// `.f` or optional `?.f`
    Field {
        /// Field name
        name: String,
        /// `?.` when true
        optional: bool,
    },
    /// `[e]`
    Index(Box<Expr>),
    /// `.@a`
    Annotation(QualifiedName),
}

/// Call argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Arg {
    /// `e`
    Positional(Expr),
    /// `name = e`
    Named {
        /// Parameter name
        name: String,
        /// Argument value
        value: Expr,
    },
    /// `...e`
    Rest(Expr),
}

/// List constructor member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ListMember {
    /// `e`
    Item(Expr),
    /// `...e`
    Spread(Expr),
}

/// Mapping constructor field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordField {
    /// `key: value`
    KeyValue {
        /// Field key
        key: RecordKey,
        /// Field value
        value: Expr,
    },
    /// `name`, short for `name: name`
    Shorthand(String),
    /// `...e`
    Spread(Expr),
}

/// Mapping constructor key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordKey {
    /// `name: ...`
    Name(String),
    /// `"name": ...`
    String(String),
    /// `[e]: ...`
    Computed(Expr),
}

/// Annotation attachment: `@name` or `@mod:name {value}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation tag
    pub name: QualifiedName,
    /// Attached mapping value
    pub value: Option<Expr>,
    /// Source extent including the `@`
    pub span: Span,
}

/// Anonymous function.
///
/// Explicit form `function (int x) returns int => x + 1` or with a statement
/// body `function (int x) { ... }`; inferred form `x => x + 1` or
/// `(x, y) => x + y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lambda {
    /// Parameters in declaration order
    pub params: Vec<Param>,
    /// Declared return type
    pub return_type: Option<Box<TypeDesc>>,
    /// Function body
    pub body: LambdaBody,
}

/// Anonymous function body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LambdaBody {
    /// `=> e`
    Expr(Box<Expr>),
    /// `{ stmts }`
    Block(Vec<Stmt>),
}

/// Named function parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Declared type, absent for inferred lambda parameters
    pub ty: Option<TypeDesc>,
    /// Parameter name
    pub name: String,
    /// Default value: `int x = 1`
    pub default: Option<Expr>,
    /// Rest parameter: `int... xs`
    pub rest: bool,
    /// Source extent
    pub span: Span,
}

/// One binding of a `let` expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetBinding {
    /// Declared type, absent for `var`
    pub ty: Option<TypeDesc>,
    /// Bound pattern
    pub pattern: Pattern,
    /// Bound value
    pub value: Expr,
    /// Source extent
    pub span: Span,
}

/// `wait` forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WaitKind {
    /// `wait f`
    Single(Box<Expr>),
    /// `wait f1 | f2`, first to complete
    Alternate(Vec<Expr>),
    /// `wait {a: f1, b}`, all of them
    Multiple(Vec<WaitField>),
}

/// Field of a multiple `wait`: `key: future` or shorthand `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitField {
    /// Result field name
    pub key: String,
    /// Awaited future, absent for the shorthand form
    pub value: Option<Expr>,
}

/// Worker receive forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReceiveKind {
    /// `<- w`
    Single(String),
    /// `<- w1 | w2`
    Alternate(Vec<String>),
    /// `<- {a: w1, b: w2}`
    Multiple(Vec<ReceiveField>),
}

/// Field of a multiple receive: `key: worker`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiveField {
    /// Result field name
    pub key: String,
    /// Sending worker
    pub worker: String,
}
