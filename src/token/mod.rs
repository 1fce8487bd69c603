use std::fmt;

/// Longest accepted numeric literal, in characters.
pub const MAX_LITERAL_LEN: usize = 31;

/// Most tokens one expression may produce. Evaluation recurses on
/// sub-sequences, so the bound also caps recursion depth.
pub const MAX_SEQUENCE_LEN: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Decimal,

    // Discarded during scanning
    Whitespace,

    // Binary operators
    Plus,
    Minus,
    Multiply,
    Divide,

    // Unary operator, produced by the retype pass over Minus
    Negate,

    // Grouping
    LeftParen,
    RightParen,
}

impl TokenKind {
    /// Binding strength for main-operator selection. `None` for
    /// non-operator tokens. Lower rank splits first.
    pub fn precedence(self) -> Option<u8> {
        match self {
            TokenKind::Plus | TokenKind::Minus => Some(0),
            TokenKind::Multiply | TokenKind::Divide => Some(1),
            TokenKind::Negate => Some(2),
            _ => None,
        }
    }

    pub fn is_operator(self) -> bool {
        self.precedence().is_some()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Decimal => "number",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Plus => "+",
            TokenKind::Minus | TokenKind::Negate => "-",
            TokenKind::Multiply => "*",
            TokenKind::Divide => "/",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Matched digits for `Decimal` tokens; empty otherwise.
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            text: String::new(),
        }
    }

    pub fn decimal(text: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Decimal,
            text: text.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == TokenKind::Decimal {
            write!(f, "{}", self.text)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}
