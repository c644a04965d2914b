//! Declaration AST nodes

use super::Stmt;
use crate::common::Span;
use crate::types::Type;

/// Function declaration. Every declaration carries a body; there are
/// no prototypes.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Param>,
    /// Always a `StmtKind::Block`
    pub body: Stmt,
    pub span: Span,
}

impl FunctionDecl {
    pub fn new(
        name: String,
        return_type: Type,
        params: Vec<Param>,
        body: Stmt,
        span: Span,
    ) -> Self {
        Self {
            name,
            return_type,
            params,
            body,
            span,
        }
    }
}

/// Function parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

impl Param {
    pub fn new(name: String, ty: Type, span: Span) -> Self {
        Self { name, ty, span }
    }
}
