use log::debug;

use crate::error::{EvalError, ExprError};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Tokenizes and evaluates `text` in one shot.
pub fn evaluate_expression(text: &str) -> Result<u32, ExprError> {
    let mut lexer = Lexer::new(text);
    let tokens = lexer.tokenize()?;
    let value = evaluate(&tokens)?;
    Ok(value)
}

/// Computes the value of a token sequence.
///
/// A single literal is its own value. A sequence enclosed by one outer
/// parenthesis pair evaluates to its inside. Anything else splits at the
/// main operator: the rightmost lowest-precedence operator outside
/// parentheses, which groups equal-precedence binary operators to the
/// left. All arithmetic is 32-bit unsigned with wraparound.
pub fn evaluate(tokens: &[Token]) -> Result<u32, EvalError> {
    match tokens {
        [] => Err(EvalError::EmptyExpression),
        [single] => literal_value(single),
        _ if is_enclosed(tokens) => evaluate(&tokens[1..tokens.len() - 1]),
        _ => {
            let op = main_operator(tokens)?;
            debug!("splitting at token {} ({})", op, tokens[op].kind);

            if op == 0 && tokens[0].kind == TokenKind::Negate {
                let value = evaluate(&tokens[1..])?;
                return Ok(value.wrapping_neg());
            }

            let lhs = evaluate(&tokens[..op])?;
            let rhs = evaluate(&tokens[op + 1..])?;
            apply(tokens[op].kind, lhs, rhs)
        }
    }
}

fn literal_value(token: &Token) -> Result<u32, EvalError> {
    if token.kind != TokenKind::Decimal {
        return Err(EvalError::ExpectedNumber {
            found: token.to_string(),
        });
    }
    token.text.parse().map_err(|_| EvalError::NumberOutOfRange {
        text: token.text.clone(),
    })
}

/// True when one outer pair encloses the whole sequence, i.e. the pair
/// opened by the first token closes only at the last one. Unbalanced
/// sequences report false here and fail in the operator scan instead.
fn is_enclosed(tokens: &[Token]) -> bool {
    let [first, inner @ .., last] = tokens else {
        return false;
    };
    if first.kind != TokenKind::LeftParen || last.kind != TokenKind::RightParen {
        return false;
    }

    let mut depth = 1u32;
    for token in inner {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => {
                depth -= 1;
                if depth == 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 1
}

/// Selects the split position: scan left to right, skip everything inside
/// parentheses (tracked with a nesting depth counter), and keep replacing
/// the candidate whenever an operator's precedence rank is at most the
/// current one's. The rightmost operator of the minimum rank wins.
fn main_operator(tokens: &[Token]) -> Result<usize, EvalError> {
    let mut depth = 0u32;
    let mut best: Option<(usize, u8)> = None;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => {
                if depth == 0 {
                    return Err(EvalError::UnmatchedParenthesis);
                }
                depth -= 1;
            }
            kind if depth == 0 => {
                if let Some(rank) = kind.precedence() {
                    if best.map_or(true, |(_, best_rank)| rank <= best_rank) {
                        best = Some((i, rank));
                    }
                }
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(EvalError::UnmatchedParenthesis);
    }
    match best {
        Some((pos, _)) => Ok(pos),
        None => Err(EvalError::MissingOperator),
    }
}

fn apply(op: TokenKind, lhs: u32, rhs: u32) -> Result<u32, EvalError> {
    match op {
        TokenKind::Plus => Ok(lhs.wrapping_add(rhs)),
        TokenKind::Minus => Ok(lhs.wrapping_sub(rhs)),
        TokenKind::Multiply => Ok(lhs.wrapping_mul(rhs)),
        TokenKind::Divide => {
            if rhs == 0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(lhs / rhs)
            }
        }
        // A negation with operands on both sides is malformed input.
        _ => Err(EvalError::MissingOperator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LexError;

    fn eval(text: &str) -> Result<u32, ExprError> {
        evaluate_expression(text)
    }

    #[test]
    fn test_single_literal() {
        assert_eq!(eval("42"), Ok(42));
        assert_eq!(eval("0"), Ok(0));
        assert_eq!(eval("4294967295"), Ok(u32::MAX));
    }

    #[test]
    fn test_literal_out_of_range() {
        assert_eq!(
            eval("4294967296"),
            Err(EvalError::NumberOutOfRange {
                text: "4294967296".into()
            }
            .into())
        );
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        assert_eq!(eval("1+2*3"), Ok(7));
        assert_eq!(eval("2*3+4"), Ok(10));
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(eval("(1+2)*3"), Ok(9));
        assert_eq!(eval("2*(3+4)"), Ok(14));
    }

    #[test]
    fn test_subtraction_groups_left() {
        assert_eq!(eval("10-3-4"), Ok(3));
    }

    #[test]
    fn test_division_truncates_and_groups_left() {
        assert_eq!(eval("10/3"), Ok(3));
        assert_eq!(eval("100/10/5"), Ok(2));
        assert_eq!(eval("6*2/3"), Ok(4));
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        assert_eq!(eval("5/0"), Err(EvalError::DivisionByZero.into()));
        assert_eq!(eval("1/(2-2)"), Err(EvalError::DivisionByZero.into()));
    }

    #[test]
    fn test_leading_negation() {
        assert_eq!(eval("-3+5"), Ok(2));
        assert_eq!(eval("-0"), Ok(0));
    }

    #[test]
    fn test_negation_after_operator_wraps() {
        assert_eq!(eval("5*-3"), Ok(5u32.wrapping_mul(3u32.wrapping_neg())));
        assert_eq!(eval("2--3"), Ok(5));
    }

    #[test]
    fn test_subtraction_wraps_around_zero() {
        assert_eq!(eval("0-1"), Ok(u32::MAX));
        assert_eq!(eval("4294967295+1"), Ok(0));
    }

    #[test]
    fn test_redundant_parentheses_are_idempotent() {
        for expr in ["1+2*3", "10-3-4", "-3+5", "(1+2)*(3+4)"] {
            let plain = eval(expr);
            let wrapped = eval(&format!("({})", expr));
            assert_eq!(plain, wrapped, "wrapping {:?} changed the result", expr);
        }
    }

    #[test]
    fn test_nested_enclosure_strips_one_pair_at_a_time() {
        assert_eq!(eval("((1+2)*(3+4))"), Ok(21));
        assert_eq!(eval("(((5)))"), Ok(5));
    }

    #[test]
    fn test_unmatched_parentheses_are_structural_errors() {
        assert_eq!(eval("(1+2"), Err(EvalError::UnmatchedParenthesis.into()));
        assert_eq!(eval("1+2)"), Err(EvalError::UnmatchedParenthesis.into()));
        assert_eq!(eval("((1)"), Err(EvalError::UnmatchedParenthesis.into()));
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        assert_eq!(eval(""), Err(EvalError::EmptyExpression.into()));
        assert_eq!(eval("   "), Err(EvalError::EmptyExpression.into()));
        assert_eq!(eval("()"), Err(EvalError::EmptyExpression.into()));
    }

    #[test]
    fn test_adjacent_literals_need_an_operator() {
        assert_eq!(eval("1 2"), Err(EvalError::MissingOperator.into()));
    }

    #[test]
    fn test_trailing_operator_is_rejected() {
        assert_eq!(eval("1+"), Err(EvalError::EmptyExpression.into()));
    }

    #[test]
    fn test_negation_inside_parentheses_stays_binary_minus() {
        // The retype sweep does not treat '(' as an operator.
        assert!(matches!(eval("(-3)"), Err(ExprError::Eval(_))));
    }

    #[test]
    fn test_doubled_negation_is_rejected() {
        assert!(matches!(eval("--3"), Err(ExprError::Eval(_))));
    }

    #[test]
    fn test_lex_failures_surface_through_the_one_shot_entry() {
        assert_eq!(
            eval("1 + x"),
            Err(LexError::NoMatch { position: 4 }.into())
        );
    }
}
