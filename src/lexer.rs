use std::sync::OnceLock;

use log::trace;
use regex::Regex;

use crate::error::LexError;
use crate::token::{Token, TokenKind, MAX_LITERAL_LEN, MAX_SEQUENCE_LEN};

/// One scan rule: a pattern tried at the cursor and the kind it produces.
struct Rule {
    pattern: Regex,
    kind: TokenKind,
}

/// Rules are tried in table order; the first match at the cursor wins.
/// Every pattern is anchored so a match never starts past the cursor.
fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"[ \t]+", TokenKind::Whitespace),
            (r"\+", TokenKind::Plus),
            (r"-", TokenKind::Minus),
            (r"\*", TokenKind::Multiply),
            (r"/", TokenKind::Divide),
            (r"\(", TokenKind::LeftParen),
            (r"\)", TokenKind::RightParen),
            (r"[0-9]+", TokenKind::Decimal),
        ]
        .into_iter()
        .map(|(pattern, kind)| Rule {
            pattern: Regex::new(&format!("^(?:{})", pattern))
                .expect("rule table patterns are fixed and valid"),
            kind,
        })
        .collect()
    })
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Scans the whole input into tokens. Whitespace matches advance the
    /// cursor without emitting anything; any position no rule matches
    /// fails the entire call, as does emitting more than
    /// `MAX_SEQUENCE_LEN` tokens.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while self.position < self.input.len() {
            let rest = &self.input[self.position..];
            let (kind, len) = match Self::match_rule(rest) {
                Some(hit) => hit,
                None => {
                    return Err(LexError::NoMatch {
                        position: self.position,
                    })
                }
            };

            trace!(
                "matched {:?} \"{}\" at position {}",
                kind,
                &rest[..len],
                self.position
            );

            if kind != TokenKind::Whitespace && tokens.len() == MAX_SEQUENCE_LEN {
                return Err(LexError::OversizedSequence {
                    position: self.position,
                    max: MAX_SEQUENCE_LEN,
                });
            }

            match kind {
                TokenKind::Whitespace => {}
                TokenKind::Decimal => {
                    if len > MAX_LITERAL_LEN {
                        return Err(LexError::OversizedLiteral {
                            position: self.position,
                            length: len,
                            max: MAX_LITERAL_LEN,
                        });
                    }
                    tokens.push(Token::decimal(&rest[..len]));
                }
                _ => tokens.push(Token::new(kind)),
            }

            self.position += len;
        }

        retype_unary_minus(&mut tokens);
        Ok(tokens)
    }

    fn match_rule(rest: &str) -> Option<(TokenKind, usize)> {
        rules()
            .iter()
            .find_map(|rule| rule.pattern.find(rest).map(|m| (rule.kind, m.end())))
    }
}

/// Single left-to-right sweep after scanning: a minus becomes a negation
/// when it starts the sequence or follows another operator. A minus after
/// a literal or a closing parenthesis stays binary; so does one directly
/// after an opening parenthesis.
fn retype_unary_minus(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        if tokens[i].kind != TokenKind::Minus {
            continue;
        }
        if i == 0 || tokens[i - 1].kind.is_operator() {
            tokens[i].kind = TokenKind::Negate;
        }
    }
}
