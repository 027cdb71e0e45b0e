use colored::Colorize;
use rustyline::{DefaultEditor, error::ReadlineError};

use crate::{
    execute_in,
    interpreter::{builtins, environment::Environment},
};

const PROMPT: &str = "rill> ";

/// Starts the interactive REPL.
///
/// Each line is lexed, parsed and evaluated against a persistent root
/// environment with built-ins pre-registered, so bindings and function
/// declarations survive across lines. A non-`none` result is printed as
/// `=> <repr>`; errors are printed and the loop continues.
///
/// `exit` or `quit` terminates, as does Ctrl-D. Ctrl-C cancels the
/// current line.
///
/// # Errors
/// Returns an error only when the line editor itself fails.
pub fn start() -> rustyline::Result<()> {
    let mut editor = DefaultEditor::new()?;
    let env = Environment::new();
    builtins::register(&env);

    println!("rill v{} — type 'exit' to quit", env!("CARGO_PKG_VERSION"));

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    println!("bye!");
                    break;
                }
                let _ = editor.add_history_entry(line);

                match execute_in(line, "<repl>", &env) {
                    Ok(value) => {
                        if !value.is_none() {
                            println!("=> {value}");
                        }
                    },
                    Err(error) => println!("{}", error.to_string().red()),
                }
            },
            Err(ReadlineError::Interrupted) => {},
            Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error),
        }
    }

    Ok(())
}
