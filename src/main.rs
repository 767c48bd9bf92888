// ABOUTME: CLI entry point dispatching between the REPL and the file driver

use clap::Parser;
use log::debug;
use mini_lisp::builtins::register_builtins;
use mini_lisp::env::Environment;
use mini_lisp::error::Error;
use mini_lisp::reader::Reader;
use mini_lisp::{eval, lexer, repl};
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::rc::Rc;

/// Interpreter for a small Scheme-flavored Lisp dialect
#[derive(Parser, Debug)]
#[command(name = "mini-lisp")]
#[command(version)]
#[command(about = "A tree-walking interpreter for a small Lisp dialect")]
struct CliArgs {
    /// Script file to evaluate (starts a REPL when omitted)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = CliArgs::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    let _ = SimpleLogger::new().with_level(level).init();

    let env = Environment::new();
    register_builtins(&env);

    match args.script {
        Some(path) => run_file(&path, &env),
        None => match repl::Repl::new() {
            Ok(mut repl) => repl.run(&env),
            Err(e) => {
                eprintln!("Error: failed to initialize the REPL: {}", e);
                std::process::exit(1);
            }
        },
    }
}

/// Evaluate every top-level form of a script in order, printing diagnostics
/// for failures but not the value of each form
fn run_file(path: &PathBuf, env: &Rc<Environment>) {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            let err = Error::File(format!("Cannot open {}: {}", path.display(), e));
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    let tokens = match lexer::tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut reader = Reader::new(tokens);
    while !reader.is_empty() {
        let result = reader.parse().and_then(|expr| {
            debug!("evaluating form spanning lines {:?}", reader.line_span());
            eval::eval(&expr, env)
        });
        if let Err(e) = result {
            let (first, last) = reader.line_span();
            eprintln!("Error in line {} to line {}: {}", first, last, e);
            std::process::exit(1);
        }
    }
}
