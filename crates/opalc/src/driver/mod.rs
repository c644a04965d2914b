//! Compilation driver and pipeline orchestration
//!
//! `compile` runs the whole pipeline on one source file:
//! lex -> parse -> analyze -> lower. Every failure is reported through
//! the context's reporter before it is returned to the caller.

use crate::common::{CompileError, CompileResult, DiagnosticReporter};
use crate::ir::{IrBuilder, IrModule};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::sema::SemanticAnalyzer;

/// Configuration options for a compilation run
#[derive(Debug, Clone, Default)]
pub struct CompileConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub verbose: bool,
}

/// Compilation context providing access to diagnostics and file info
pub struct CompileContext<'a> {
    pub filename: String,
    pub file_id: usize,
    pub reporter: &'a DiagnosticReporter,
}

impl<'a> CompileContext<'a> {
    pub fn new(filename: String, file_id: usize, reporter: &'a DiagnosticReporter) -> Self {
        Self {
            filename,
            file_id,
            reporter,
        }
    }
}

/// Compile Opal source to an IR module.
///
/// Lexer and parser errors abort the run as soon as they occur.
/// Analyzer diagnostics are reported one by one and folded into a
/// single `CompileError::Analysis` carrying their count.
pub fn compile(
    source: &str,
    ctx: &CompileContext,
    config: &CompileConfig,
) -> CompileResult<IrModule> {
    // Phase 1: Lexing (the parser lexes on demand; this pass only
    // serves the token dump)
    if config.dump_tokens {
        match Lexer::new(source).tokenize_all() {
            Ok(tokens) => {
                eprintln!("=== Tokens ===");
                for token in &tokens {
                    eprintln!("{:?}", token);
                }
                eprintln!("=== End Tokens ===\n");
            }
            Err(e) => {
                ctx.reporter.report_error(ctx.file_id, &e);
                return Err(e);
            }
        }
    }

    // Phase 2: Parsing
    if config.verbose {
        eprintln!("Parsing...");
    }

    let mut parser = match Parser::new(source) {
        Ok(parser) => parser,
        Err(e) => {
            ctx.reporter.report_error(ctx.file_id, &e);
            return Err(e);
        }
    };

    let program = match parser.parse() {
        Ok(program) => program,
        Err(e) => {
            ctx.reporter.report_error(ctx.file_id, &e);
            return Err(e);
        }
    };

    if config.dump_ast {
        eprintln!("=== AST ===");
        eprintln!("{:#?}", program);
        eprintln!("=== End AST ===\n");
    }

    // Phase 3: Semantic analysis
    if config.verbose {
        eprintln!("Analyzing...");
    }

    let analyzed = match SemanticAnalyzer::new().analyze(&program) {
        Ok(analyzed) => analyzed,
        Err(diagnostics) => {
            for diagnostic in &diagnostics {
                ctx.reporter.report_diagnostic(ctx.file_id, diagnostic);
            }
            return Err(CompileError::analysis(diagnostics.len()));
        }
    };

    // Phase 4: IR generation. The analyzed program is diagnostic-free,
    // so this phase cannot fail.
    if config.verbose {
        eprintln!("Generating IR...");
    }

    Ok(IrBuilder::build(&analyzed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn try_compile(source: &str) -> CompileResult<IrModule> {
        let mut reporter = DiagnosticReporter::new();
        let file_id = reporter.add_file("test.opal", source);
        let ctx = CompileContext::new("test.opal".to_string(), file_id, &reporter);
        compile(source, &ctx, &CompileConfig::default())
    }

    fn compile_source(source: &str) -> IrModule {
        try_compile(source).unwrap()
    }

    #[test]
    fn test_golden_straight_line() {
        let module = compile_source("int add(int a, int b) { return a + b; }");
        let expected = "define int @add(int, int) {
    local %l0 : int
    local %l1 : int
  bb0:  ; entry
    %t0 = add %l0, %l1
    ret %t0
}
";
        assert_eq!(module.to_string(), expected);
    }

    #[test]
    fn test_golden_if_merge() {
        let module = compile_source(
            "int main() { int x = 10; if (x > 5) { return 1; } return 0; }",
        );
        // The sink left behind by `return 1` is wired to the merge and
        // prints in id order; the final return's sink never does.
        let expected = "define int @main() {
    local %l0 : int
  bb0:  ; entry
    store %l0, 10
    %t0 = cmp gt %l0, 5
    br %t0, bb1, bb2
  bb1:  ; if.then
    ret 1
  bb2:  ; if.merge
    ret 0
  bb3:  ; unreachable
    br bb2
}
";
        assert_eq!(module.to_string(), expected);
    }

    #[test]
    fn test_golden_while_loop() {
        let module = compile_source(
            "int count() { int i = 0; while (i < 3) { i = i + 1; } return i; }",
        );
        let expected = "define int @count() {
    local %l0 : int
  bb0:  ; entry
    store %l0, 0
    br bb1
  bb1:  ; while.cond
    %t0 = cmp lt %l0, 3
    br %t0, bb2, bb3
  bb2:  ; while.body
    %t1 = add %l0, 1
    store %l0, %t1
    br bb1
  bb3:  ; while.exit
    ret %l0
}
";
        assert_eq!(module.to_string(), expected);
    }

    #[test]
    fn test_golden_short_circuit() {
        let module = compile_source("bool both(bool a, bool b) { return a && b; }");
        let expected = "define bool @both(bool, bool) {
    local %l0 : bool
    local %l1 : bool
  bb0:  ; entry
    br %l0, bb1, bb2
  bb1:  ; and.rhs
    br bb2
  bb2:  ; and.merge
    %t0 = phi [ bb0, %l0 ], [ bb1, %l1 ]
    ret %t0
}
";
        assert_eq!(module.to_string(), expected);
    }

    #[test]
    fn test_golden_two_functions() {
        let module = compile_source(
            "int twice(int x) { return x + x; }\n\
             void main() { int r = twice(21); }",
        );
        // One blank line between functions; the void function gets an
        // implicit `ret void`.
        let expected = "define int @twice(int) {
    local %l0 : int
  bb0:  ; entry
    %t0 = add %l0, %l0
    ret %t0
}

define void @main() {
    local %l0 : int
  bb0:  ; entry
    %t0 = call @twice(21)
    store %l0, %t0
    ret void
}
";
        assert_eq!(module.to_string(), expected);
    }

    #[test]
    fn test_serialized_counts_match_structure() {
        let module = compile_source(
            "int add(int a, int b) { return a + b; }\n\
             double half(double x) { return x / 2.0; }\n\
             void main() { int r = add(1, 2); }",
        );
        let text = module.to_string();

        let defines: Vec<&str> = text
            .lines()
            .filter(|line| line.starts_with("define"))
            .collect();
        assert_eq!(defines.len(), module.functions.len());

        for (line, func) in defines.iter().zip(&module.functions) {
            let params = line
                .split_once('(')
                .and_then(|(_, rest)| rest.split_once(')'))
                .map(|(params, _)| params)
                .unwrap();
            let count = if params.is_empty() {
                0
            } else {
                params.split(", ").count()
            };
            assert_eq!(count, func.params.len());
        }

        let local_lines = text
            .lines()
            .filter(|line| line.trim_start().starts_with("local "))
            .count();
        let local_total: usize = module.functions.iter().map(|f| f.locals.len()).sum();
        assert_eq!(local_lines, local_total);
    }

    #[test]
    fn test_lexer_error_is_fatal() {
        let err = try_compile("int f() { return 0 @ 1; }").unwrap_err();
        assert!(matches!(err, CompileError::Lexer { .. }));
    }

    #[test]
    fn test_parser_error_is_fatal() {
        let err = try_compile("int f( { return 0; }").unwrap_err();
        assert!(matches!(err, CompileError::Parser { .. }));
    }

    #[test]
    fn test_analysis_errors_fold_into_count() {
        // Four diagnostics: x undefined, y undefined, `+` on two void
        // operands, and the resulting return type mismatch
        let err = try_compile("int f() { return x + y; }").unwrap_err();
        assert!(matches!(err, CompileError::Analysis { count: 4 }));
    }
}
