//! Operators for expressions.
//!
//! One enum per operator arity, shared by the expression nodes and by the
//! parser's precedence table.

use serde::{Deserialize, Serialize};

/// Binary operators, including the elvis operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Multiplication: `a * b`.
    Mul,
    /// Division: `a / b`.
    Div,
    /// Remainder: `a % b`.
    Mod,
    /// Addition: `a + b`.
    Add,
    /// Subtraction: `a - b`.
    Sub,
    /// Left shift: `a << b`.
    Shl,
    /// Signed right shift: `a >> b`.
    Shr,
    /// Unsigned right shift: `a >>> b`.
    UShr,
    /// Less than: `a < b`.
    Lt,
    /// Greater than: `a > b`.
    Gt,
    /// Less than or equal: `a <= b`.
    Le,
    /// Greater than or equal: `a >= b`.
    Ge,
    /// Value equality: `a == b`.
    Eq,
    /// Value inequality: `a != b`.
    Ne,
    /// Reference equality: `a === b`.
    RefEq,
    /// Reference inequality: `a !== b`.
    RefNe,
    /// Bitwise and: `a & b`.
    BitAnd,
    /// Bitwise xor: `a ^ b`.
    BitXor,
    /// Bitwise or: `a | b`.
    BitOr,
    /// Logical and: `a && b`.
    And,
    /// Logical or: `a || b`.
    Or,
    /// Nil-coalescing: `a ?: b`.
    Elvis,
}

impl BinaryOp {
    /// Source spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::RefEq => "===",
            BinaryOp::RefNe => "!==",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::BitOr => "|",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Elvis => "?:",
        }
    }
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Numeric identity: `+x`.
    Plus,
    /// Numeric negation: `-x`.
    Neg,
    /// Logical not: `!x`.
    Not,
    /// Bitwise complement: `~x`.
    BitNot,
    /// Type of a value: `typeof x`.
    Typeof,
}

impl UnaryOp {
    /// Source spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Typeof => "typeof",
        }
    }
}

/// Compound assignment operators: `x += 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignOp {
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
