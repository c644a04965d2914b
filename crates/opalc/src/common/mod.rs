//! Common infrastructure shared across compiler phases

mod error;
mod span;

pub use error::{CompileError, CompileResult, Diagnostic, DiagnosticReporter};
pub use span::Span;
