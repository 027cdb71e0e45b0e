use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use colored::Colorize;
use rill::{
    error::InterpreterError,
    interpreter::{builtins, environment::Environment, evaluator::test_runner, lexer, parser},
};

/// rill is a small, expression-oriented scripting language with
/// immutable-by-default bindings, pipelines, and pattern matching.
#[derive(Parser, Debug)]
#[command(name = "rill", version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a .rill source file.
    Run {
        /// Path to the source file.
        file: PathBuf,
    },
    /// Run the test blocks in a .rill source file.
    Test {
        /// Path to the source file.
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    match args.command {
        None => match rill::repl::start() {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("error: {error}");
                ExitCode::FAILURE
            },
        },
        Some(Command::Run { file }) => run_file(&file),
        Some(Command::Test { file }) => test_file(&file),
    }
}

/// Tokenizes, parses, and evaluates a file. Diagnostics go to stderr;
/// the exit code is 1 on any parse or runtime error.
fn run_file(path: &PathBuf) -> ExitCode {
    let Some(source) = read_source(path) else { return ExitCode::FAILURE };

    match rill::execute(&source, &path.to_string_lossy()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        },
    }
}

/// Evaluates a file's non-test statements, then runs its test blocks,
/// printing a per-test line and a summary. Exit code 0 iff all passed.
fn test_file(path: &PathBuf) -> ExitCode {
    let Some(source) = read_source(path) else { return ExitCode::FAILURE };

    let tokens = lexer::scan(&source, &path.to_string_lossy());
    let (program, diagnostics) = parser::core::parse(tokens);
    if !diagnostics.is_empty() {
        eprintln!("{}", InterpreterError::Parse(diagnostics));
        return ExitCode::FAILURE;
    }

    let env = Environment::new();
    builtins::register(&env);

    let outcomes = match test_runner::run_tests(&program, &env) {
        Ok(outcomes) => outcomes,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        },
    };

    let mut passed = 0;
    let mut failed = 0;
    for outcome in &outcomes {
        if outcome.passed {
            println!("  {}: {}", "PASS".green(), outcome.description);
            passed += 1;
        } else {
            let message = outcome.message.as_deref().unwrap_or("failed");
            println!("  {}: {} — {}", "FAIL".red(), outcome.description, message);
            failed += 1;
        }
    }
    println!("\n{passed} passed, {failed} failed");

    if failed > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

fn read_source(path: &PathBuf) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(error) => {
            eprintln!("error: failed to read {}: {error}", path.display());
            None
        },
    }
}
