//! Analyzed program representation
//!
//! The analyzer's output mirrors the AST, with every expression carrying
//! its resolved type, every statement its guaranteed-return flag, and
//! every variable reference the index of the local slot it resolved to.
//! IR construction consumes indices only; names are kept for debugging.

use crate::ast::{BinaryOp, Param, UnaryOp};
use crate::common::Span;
use crate::types::Type;

/// A fully analyzed program, free of diagnostics
#[derive(Debug, Clone)]
pub struct AnalyzedProgram {
    pub functions: Vec<AnalyzedFunction>,
}

/// An analyzed function with its dense local-slot table
#[derive(Debug, Clone)]
pub struct AnalyzedFunction {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Param>,
    /// Always an `AnalyzedStmtKind::Block`
    pub body: AnalyzedStmt,
    /// Slot table: parameters first, then declarations in first-seen
    /// order; position equals index
    pub locals: Vec<LocalVariable>,
}

/// One local slot: parameters and declarations alike
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    pub index: u32,
    pub name: String,
    pub ty: Type,
}

impl LocalVariable {
    pub fn new(index: u32, name: impl Into<String>, ty: Type) -> Self {
        Self {
            index,
            name: name.into(),
            ty,
        }
    }
}

/// Analyzed statement node
#[derive(Debug, Clone)]
pub struct AnalyzedStmt {
    pub kind: AnalyzedStmtKind,
    pub span: Span,
    /// Every path through this statement ends in a return
    pub has_guaranteed_return: bool,
}

impl AnalyzedStmt {
    pub fn new(kind: AnalyzedStmtKind, span: Span, has_guaranteed_return: bool) -> Self {
        Self {
            kind,
            span,
            has_guaranteed_return,
        }
    }
}

/// Analyzed statement kinds
#[derive(Debug, Clone)]
pub enum AnalyzedStmtKind {
    Block(Vec<AnalyzedStmt>),

    Declaration {
        name: String,
        index: u32,
        init: Option<AnalyzedExpr>,
    },

    Assignment {
        name: String,
        index: u32,
        value: AnalyzedExpr,
    },

    If {
        condition: AnalyzedExpr,
        then_branch: Box<AnalyzedStmt>,
        else_branch: Option<Box<AnalyzedStmt>>,
    },

    While {
        condition: AnalyzedExpr,
        body: Box<AnalyzedStmt>,
    },

    DoWhile {
        body: Box<AnalyzedStmt>,
        condition: AnalyzedExpr,
    },

    For {
        init: Option<Box<AnalyzedStmt>>,
        condition: Option<AnalyzedExpr>,
        update: Option<Box<AnalyzedStmt>>,
        body: Box<AnalyzedStmt>,
    },

    Return(Option<AnalyzedExpr>),

    Expression(AnalyzedExpr),
}

/// Analyzed expression node with its resolved type
#[derive(Debug, Clone)]
pub struct AnalyzedExpr {
    pub kind: AnalyzedExprKind,
    pub ty: Type,
    pub span: Span,
}

impl AnalyzedExpr {
    pub fn new(kind: AnalyzedExprKind, ty: Type, span: Span) -> Self {
        Self { kind, ty, span }
    }
}

/// Analyzed expression kinds
#[derive(Debug, Clone)]
pub enum AnalyzedExprKind {
    IntLiteral(u64),
    FloatLiteral(f64),
    BoolLiteral(bool),

    /// Variable reference resolved to its local slot
    Variable { name: String, index: u32 },

    Call {
        name: String,
        args: Vec<AnalyzedExpr>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<AnalyzedExpr>,
    },

    Binary {
        op: BinaryOp,
        left: Box<AnalyzedExpr>,
        right: Box<AnalyzedExpr>,
    },
}
