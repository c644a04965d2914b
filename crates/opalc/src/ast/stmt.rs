//! Statement AST nodes

use super::Expr;
use crate::common::Span;
use crate::types::Type;

/// Statement node
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Braced statement list: { ... }
    Block(Vec<Stmt>),

    /// Variable declaration: int x = 5;
    Declaration {
        name: String,
        ty: Type,
        init: Option<Expr>,
    },

    /// Assignment: x = 5;
    Assignment { name: String, value: Expr },

    /// If statement: if (cond) stmt [else stmt]
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// While loop: while (cond) stmt
    While { condition: Expr, body: Box<Stmt> },

    /// Do-while loop: do stmt while (cond);
    DoWhile { body: Box<Stmt>, condition: Expr },

    /// For loop: for (init; cond; update) stmt
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        update: Option<Box<Stmt>>,
        body: Box<Stmt>,
    },

    /// Return statement: return [expr];
    Return(Option<Expr>),

    /// Expression statement: f(x);
    Expression(Expr),
}
