use std::io::{self, Write};

use colored::Colorize;
use log::info;
use thiserror::Error;

use crate::error::{ExprError, WatchError};
use crate::eval::evaluate_expression;
use crate::watchpoint::{WatchId, Watchpoints};

const PROMPT: &str = "(simdbg) ";

/// A parsed monitor command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// `p EXPR`
    Print(String),
    /// `w EXPR`
    Watch(String),
    /// `d N`
    Delete(WatchId),
    /// `info w`
    Info,
    /// `check`
    Check,
    /// `q`
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' needs an argument")]
    MissingArgument { command: &'static str },

    #[error("'{given}' is not a watchpoint id")]
    BadId { given: String },

    #[error("unknown info subject '{0}', try 'info w'")]
    UnknownInfo(String),
}

impl Command {
    /// Parses one input line. The first word selects the command; the
    /// rest of the line is its argument.
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "help" | "h" => Ok(Command::Help),
            "p" | "print" => {
                if rest.is_empty() {
                    Err(CommandError::MissingArgument { command: "p" })
                } else {
                    Ok(Command::Print(rest.to_string()))
                }
            }
            "w" | "watch" => {
                if rest.is_empty() {
                    Err(CommandError::MissingArgument { command: "w" })
                } else {
                    Ok(Command::Watch(rest.to_string()))
                }
            }
            "d" | "delete" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument { command: "d" });
                }
                rest.parse()
                    .map(Command::Delete)
                    .map_err(|_| CommandError::BadId {
                        given: rest.to_string(),
                    })
            }
            "info" => {
                if rest == "w" {
                    Ok(Command::Info)
                } else {
                    Err(CommandError::UnknownInfo(rest.to_string()))
                }
            }
            "check" => Ok(Command::Check),
            "q" | "quit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Interactive session over the evaluator and the watchpoint pool.
pub struct Monitor {
    watchpoints: Watchpoints,
}

impl Monitor {
    pub fn new(watch_capacity: usize) -> Self {
        Self {
            watchpoints: Watchpoints::new(watch_capacity),
        }
    }

    pub fn watchpoints(&self) -> &Watchpoints {
        &self.watchpoints
    }

    /// Reads commands from stdin until `q` or end of input. Every error
    /// is reported and the session continues.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut line = String::new();

        info!(
            "monitor session started with {} watchpoint slots",
            self.watchpoints.capacity()
        );
        loop {
            write!(stdout, "{}", PROMPT)?;
            stdout.flush()?;

            line.clear();
            if stdin.read_line(&mut line)? == 0 {
                break;
            }
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            match Command::parse(input) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command),
                Err(err) => {
                    println!("{}: {}", "error".red().bold(), err);
                    println!("Type 'help' for the command list.");
                }
            }
        }
        info!("monitor session ended");
        Ok(())
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Help => print_help(),
            Command::Print(expr) => match evaluate_expression(&expr) {
                Ok(value) => println!("{} (0x{:x})", value, value),
                Err(err) => println!("{}", render_expr_error(&expr, &err)),
            },
            Command::Watch(expr) => match self.watchpoints.create(&expr) {
                Ok(id) => println!("Watchpoint {}: {}", id, expr),
                Err(WatchError::Expression(err)) => {
                    println!("{}", render_expr_error(&expr, &err))
                }
                Err(err) => println!("{}: {}", "error".red().bold(), err),
            },
            Command::Delete(id) => match self.watchpoints.delete(id) {
                Ok(()) => println!("Deleted watchpoint {}", id),
                Err(err) => println!("{}: {}", "error".red().bold(), err),
            },
            Command::Info => {
                let entries = self.watchpoints.list();
                if entries.is_empty() {
                    println!(
                        "No watchpoints ({} slots available).",
                        self.watchpoints.capacity()
                    );
                    return;
                }
                println!("{:<8}{:<12}{}", "Num", "Value", "Expr");
                for entry in entries {
                    let marker = if entry.changed { " *" } else { "" };
                    println!("{:<8}{:<12}{}{}", entry.id, entry.value, entry.expr, marker);
                }
            }
            Command::Check => {
                let report = self.watchpoints.check_all();
                for change in &report.changed {
                    println!(
                        "{}",
                        format!("Watchpoint {}: {} -> {}", change.id, change.old, change.new)
                            .yellow()
                    );
                }
                for (id, err) in &report.failures {
                    println!("{}: watchpoint {}: {}", "error".red().bold(), id, err);
                }
                if !report.any_changed() && report.failures.is_empty() {
                    println!("No watchpoints changed.");
                }
            }
            Command::Quit => {}
        }
    }
}

/// Formats an expression failure. Lex errors point a caret at the
/// offending position; evaluation errors render their message alone.
pub fn render_expr_error(input: &str, err: &ExprError) -> String {
    let prefix = "error".red().bold();
    match err {
        ExprError::Lex(lex) => format!(
            "{}: {}\n  {}\n  {}{}",
            prefix,
            lex,
            input,
            " ".repeat(lex.position()),
            "^".red()
        ),
        ExprError::Eval(eval) => format!("{}: {}", prefix, eval),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  help            show this help");
    println!("  p EXPR          evaluate EXPR and print its value");
    println!("  w EXPR          set a watchpoint on EXPR");
    println!("  d N             delete watchpoint N");
    println!("  info w          list watchpoints");
    println!("  check           re-evaluate all watchpoints");
    println!("  q               quit");
}
