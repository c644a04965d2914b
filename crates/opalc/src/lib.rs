//! Opal Compiler - a small C-like language lowered to a textual IR
//!
//! The pipeline takes Opal source through four phases and prints the
//! result as a control-flow graph of basic blocks:
//!
//! ```text
//! source -> tokens -> AST -> analyzed AST -> IR module -> text
//! ```
//!
//! ## Architecture
//!
//! The compiler is organized into:
//! - **Lexer** (`lexer/`): logos-based tokenizer
//! - **Parser** (`parser/`): recursive descent into the AST
//! - **Sema** (`sema/`): scope resolution, type checking, return analysis
//! - **IR** (`ir/`): CFG lowering and the textual serializer
//! - **Driver** (`driver/`): pipeline orchestration
//! - **Common** (`common/`): shared infrastructure (errors, spans)
//! - **Types** (`types/`): the primitive type system

pub mod common;
pub mod types;
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod sema;
pub mod ir;
pub mod driver;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, Diagnostic, DiagnosticReporter, Span};
pub use driver::{CompileConfig, CompileContext};
pub use ir::IrModule;
