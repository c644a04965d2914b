//! Opal Compiler - compiles Opal source to a textual IR
//!
//! Usage: opalc [OPTIONS] <input>

use anyhow::Context;
use clap::Parser as ClapParser;
use opal_compiler::common::DiagnosticReporter;
use opal_compiler::driver::{self, CompileConfig, CompileContext};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "opalc")]
#[command(version)]
#[command(about = "Compiler for the Opal language, emitting a textual SSA-style IR", long_about = None)]
struct Args {
    /// Input source file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file for the serialized IR (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    // Diagnostics render against the registered source
    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(&filename, &source);

    if args.verbose {
        eprintln!("Compiling {}", args.input.display());
    }

    let config = CompileConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        verbose: args.verbose,
    };
    let ctx = CompileContext::new(filename, file_id, &reporter);

    let module = driver::compile(&source, &ctx, &config)?;

    match &args.output {
        Some(path) => fs::write(path, module.to_string())
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", module),
    }

    if args.verbose {
        eprintln!("Compiled {} function(s)", module.functions.len());
    }

    Ok(())
}
