use thiserror::Error;

use crate::watchpoint::WatchId;

/// Tokenization failures. `position` is a byte offset into the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("no token rule matches at position {position}")]
    NoMatch { position: usize },

    #[error("numeric literal at position {position} is {length} characters long (max {max})")]
    OversizedLiteral {
        position: usize,
        length: usize,
        max: usize,
    },

    #[error("expression exceeds {max} tokens at position {position}")]
    OversizedSequence { position: usize, max: usize },
}

impl LexError {
    /// Byte offset the failure points at, for caret diagnostics.
    pub fn position(&self) -> usize {
        match self {
            LexError::NoMatch { position } => *position,
            LexError::OversizedLiteral { position, .. } => *position,
            LexError::OversizedSequence { position, .. } => *position,
        }
    }
}

/// Structural and arithmetic failures while evaluating a token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("empty expression")]
    EmptyExpression,

    #[error("expected a number, found '{found}'")]
    ExpectedNumber { found: String },

    #[error("number '{text}' does not fit in 32 bits")]
    NumberOutOfRange { text: String },

    #[error("unmatched parenthesis")]
    UnmatchedParenthesis,

    #[error("expected an operator between operands")]
    MissingOperator,

    #[error("division by zero")]
    DivisionByZero,
}

/// Either phase of a full text-to-value evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Watchpoint registry failures. The pool is left unchanged by all of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchError {
    #[error("watchpoint pool exhausted")]
    PoolExhausted,

    #[error("no watchpoint with id {id}")]
    NotFound { id: WatchId },

    #[error("watchpoint expression is invalid: {0}")]
    Expression(#[from] ExprError),
}
