//! Abstract Syntax Tree definitions

mod decl;
mod expr;
mod stmt;

pub use decl::*;
pub use expr::*;
pub use stmt::*;

/// A complete source file: a sequence of function declarations
#[derive(Debug, Clone)]
pub struct Program {
    pub functions: Vec<FunctionDecl>,
}

impl Program {
    pub fn new(functions: Vec<FunctionDecl>) -> Self {
        Self { functions }
    }
}
