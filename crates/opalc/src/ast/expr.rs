//! Expression AST nodes

use crate::common::Span;
use crate::types::Type;

/// Expression node
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Expression kinds
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Integer literal with the type its suffix selected: 42, 200ub, 7l.
    /// A digit sequence beyond 64 bits saturates `value` to the maximum
    /// and sets `overflowed` for the analyzer's range check.
    IntLiteral {
        value: u64,
        ty: Type,
        overflowed: bool,
    },

    /// Float literal with the type its suffix selected: 3.14, 2f
    FloatLiteral { value: f64, ty: Type },

    /// Boolean literal: true, false
    BoolLiteral(bool),

    /// Variable reference: x
    Variable(String),

    /// Function call: f(a, b)
    Call { name: String, args: Vec<Expr> },

    /// Unary operation: -x, ~x, !x
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Binary operation: a + b
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,

    // Relational
    Lt,
    Le,
    Gt,
    Ge,

    // Equality
    Eq,
    Ne,

    // Logical (short-circuit)
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// `+ - * /`: requires numeric operands
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div
        )
    }

    /// `% & | ^ << >>`: requires integer operands
    pub fn is_integer_only(&self) -> bool {
        matches!(
            self,
            BinaryOp::Mod
                | BinaryOp::BitAnd
                | BinaryOp::BitOr
                | BinaryOp::BitXor
                | BinaryOp::Shl
                | BinaryOp::Shr
        )
    }

    /// `< <= > >=`: requires numeric operands, yields bool
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    /// `== !=`: requires non-void operands, yields bool
    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Ne)
    }

    /// `&& ||`: requires bool operands, yields bool, short-circuits
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// Relational, equality or logical: the result type is bool
    pub fn yields_bool(&self) -> bool {
        self.is_relational() || self.is_equality() || self.is_logical()
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation: -x
    Neg,
    /// Logical not: !x
    Not,
    /// Bitwise complement: ~x
    BitNot,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }
}
