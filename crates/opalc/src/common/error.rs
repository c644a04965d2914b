//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic as TermDiagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;

use super::Span;

/// Fatal compile error that aborts the pipeline
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("analysis failed with {count} error(s)")]
    Analysis { count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn analysis(count: usize) -> Self {
        Self::Analysis { count }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Semantic diagnostic, accumulated during analysis rather than thrown.
///
/// A program with any diagnostic never reaches IR construction; the
/// analyzer keeps going after each one so a single run reports as many
/// problems as it can find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// Plain-text form: reason line, then a 1-based location line
    pub fn render(&self, source: &str) -> String {
        let (line, column) = self.span.location(source);
        format!(
            "Error: {}\nAt line: {}, column: {}",
            self.message, line, column
        )
    }
}

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    pub fn report_error(&self, file_id: usize, error: &CompileError) {
        let diagnostic = match error {
            CompileError::Lexer { message, span } => TermDiagnostic::error()
                .with_message("Lexer error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message),
                ]),

            CompileError::Parser { message, span } => TermDiagnostic::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message),
                ]),

            CompileError::Analysis { count } => TermDiagnostic::error()
                .with_message(format!("analysis failed with {} error(s)", count)),

            CompileError::Io(err) => {
                TermDiagnostic::error().with_message(format!("IO error: {}", err))
            }
        };

        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }

    pub fn report_diagnostic(&self, file_id: usize, diagnostic: &Diagnostic) {
        let rendered = TermDiagnostic::error()
            .with_message("Semantic error")
            .with_labels(vec![
                Label::primary(file_id, diagnostic.span.start..diagnostic.span.end)
                    .with_message(&diagnostic.message),
            ]);

        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &rendered);
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
