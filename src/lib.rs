pub mod error;
pub mod eval;
pub mod lexer;
pub mod monitor;
pub mod token;
pub mod watchpoint;

// Export the common types so callers need one import path
pub use error::{EvalError, ExprError, LexError, WatchError};
pub use eval::{evaluate, evaluate_expression};
pub use lexer::Lexer;
pub use monitor::{Command, Monitor};
pub use token::{Token, TokenKind};
pub use watchpoint::{CheckReport, WatchChange, WatchEntry, WatchId, Watchpoints};

pub type Result<T> = std::result::Result<T, ExprError>;

/// Wires `log` to env_logger for the binaries. `RUST_LOG` overrides the
/// default `info` filter. Calling it more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
