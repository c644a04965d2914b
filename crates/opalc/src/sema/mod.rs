//! Semantic analysis
//!
//! Resolves names against the scope chain, checks types, assigns
//! dense local-slot indices and verifies that non-void functions
//! return on every path.

mod analyzer;
mod scope;
mod typed;

pub use analyzer::SemanticAnalyzer;
pub use scope::{FunctionSymbol, Scope, VariableSymbol};
pub use typed::{
    AnalyzedExpr, AnalyzedExprKind, AnalyzedFunction, AnalyzedProgram, AnalyzedStmt,
    AnalyzedStmtKind, LocalVariable,
};
