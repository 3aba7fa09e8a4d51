//! Type descriptor nodes.
//!
//! Unions are flat: `int|string|boolean` is a single [`TypeKind::Union`]
//! with three members in source order, including members spliced in from a
//! parenthesized union such as `int|(string|boolean)`.

use crate::ast::expr::{Expr, Literal, Param, QualifiedName};
use crate::foundation::Span;
use serde::{Deserialize, Serialize};

/// Parsed type descriptor with its source extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDesc {
    /// Type kind
    pub kind: TypeKind,
    /// First token start .. last token end
    pub span: Span,
}

impl TypeDesc {
    /// Create a new type descriptor.
    pub fn new(kind: TypeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Create an error placeholder.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(TypeKind::ParseError(message.into()), span)
    }

    /// Whether this is an error placeholder.
    pub fn is_error(&self) -> bool {
        matches!(self.kind, TypeKind::ParseError(_))
    }
}

/// Type descriptor kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeKind {
    /// Builtin or user type reference: `int`, `Person`, `mod:Person`
    Simple(QualifiedName),

    /// Nil type `()`
    Nil,

    /// Singleton type: `"on"`, `1`, `true`, `-1`
    Singleton(Literal),

    /// Array: `T[]`, `T[3]`, `T[N]`, `T[*]`
    Array {
        /// Element type
        element: Box<TypeDesc>,
        /// Length constraint
        dimension: ArrayDimension,
    },

    /// Union `A|B|C`, flattened, members in source order
    Union {
        /// Member types
        members: Vec<TypeDesc>,
    },

    /// Nullable `T?`
    Nullable(Box<TypeDesc>),

    /// Tuple `[A, B, R...]`
    Tuple {
        /// Member types
        members: Vec<TypeDesc>,
        /// Rest member type
        rest: Option<Box<TypeDesc>>,
    },

    /// Record `record { ... }` or exclusive `record {| ... |}`
    Record {
        /// Fields and type inclusions in source order
        fields: Vec<FieldDesc>,
        /// Rest field type, exclusive records only
        rest: Option<Box<TypeDesc>>,
        /// Exclusive (`{| |}`) when true
        sealed: bool,
    },

    /// Function type `function (int a, string...) returns T`
    Function {
        /// Parameters; names are optional
        params: Vec<FunctionTypeParam>,
        /// Return type
        return_type: Option<Box<TypeDesc>>,
    },

    /// Object type `object { fields; method declarations; }`
    Object {
        /// Fields and type inclusions in source order
        fields: Vec<FieldDesc>,
        /// Method declarations
        methods: Vec<MethodDecl>,
    },

    /// Builtin parameterized type: `map<T>`, `stream<T, E>`, `future`
    Generic {
        /// Type constructor
        base: BuiltinGeneric,
        /// Type arguments, empty for the bare form
        args: Vec<TypeDesc>,
    },

    /// Unparsable type; the message is the recorded diagnostic
    ParseError(String),
}

/// Array length constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrayDimension {
    /// `[]`
    Open,
    /// `[3]`
    Fixed(u64),
    /// `[N]` or `[mod:N]`
    Constant(QualifiedName),
    /// `[*]`, length taken from the initializer
    Inferred,
}

/// Builtin type constructors that accept type arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinGeneric {
    /// `map<T>`
    Map,
    /// `future<T>`
    Future,
    /// `typedesc<T>`
    Typedesc,
    /// `stream<T, E>`
    Stream,
    /// `table<T>`
    Table,
    /// `xml<T>`
    Xml,
    /// `error<T>`
    Error,
}

impl BuiltinGeneric {
    /// Keyword spelling.
    pub fn keyword(self) -> &'static str {
        match self {
            BuiltinGeneric::Map => "map",
            BuiltinGeneric::Future => "future",
            BuiltinGeneric::Typedesc => "typedesc",
            BuiltinGeneric::Stream => "stream",
            BuiltinGeneric::Table => "table",
            BuiltinGeneric::Xml => "xml",
            BuiltinGeneric::Error => "error",
        }
    }

    /// Whether the bare keyword is a complete type.
    pub fn allows_bare(self) -> bool {
        !matches!(self, BuiltinGeneric::Map | BuiltinGeneric::Table)
    }

    /// Maximum number of type arguments.
    pub fn max_args(self) -> usize {
        match self {
            BuiltinGeneric::Stream => 2,
            _ => 1,
        }
    }
}

/// Member of a record or object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldDesc {
    /// Named field
    Field(FieldDecl),
    /// Type inclusion `*T;`
    Inclusion(TypeDesc),
}

/// Named field of a record or object type: `T name?;`, `T name = e;`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Object field visibility
    pub visibility: Option<Visibility>,
    /// Field type
    pub ty: TypeDesc,
    /// Field name
    pub name: String,
    /// Optional field (`name?`)
    pub optional: bool,
    /// Default value
    pub default: Option<Expr>,
    /// Source extent including the `;`
    pub span: Span,
}

/// Object member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// `public`
    Public,
    /// `private`
    Private,
}

/// Method declaration of an object type:
/// `public function area(int scale) returns float;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Method visibility
    pub visibility: Option<Visibility>,
    /// Method name
    pub name: String,
    /// Parameters
    pub params: Vec<Param>,
    /// Return type
    pub return_type: Option<TypeDesc>,
    /// Source extent including the `;`
    pub span: Span,
}

/// Parameter of a function type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTypeParam {
    /// Parameter type
    pub ty: TypeDesc,
    /// Parameter name
    pub name: Option<String>,
    /// Rest parameter `T...`
    pub rest: bool,
}
