//! Shunting-yard reduction of a token stream to postfix order.

use log::debug;

use crate::error::{CalcError, Result};
use crate::token::{Program, Token};

/// Reorders `tokens` into postfix order.
///
/// Operands go straight to the output; functions wait on an auxiliary
/// stack until something of lower precedence arrives, so equal
/// precedence reduces left to right. Separators only delimit tokens and
/// are dropped here: argument counts are checked by the validator.
pub fn parse(tokens: Vec<Token>) -> Result<Program> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Constant(_) | Token::Variable(_) => output.push(token),
            Token::Function(ref incoming) => {
                while let Some(Token::Function(top)) = stack.last() {
                    if top.precedence() < incoming.precedence() {
                        break;
                    }
                    if let Some(popped) = stack.pop() {
                        output.push(popped);
                    }
                }
                stack.push(token);
            }
            Token::BraceOpen => stack.push(token),
            Token::BraceClosed => loop {
                match stack.pop() {
                    Some(Token::BraceOpen) => break,
                    Some(other) => output.push(other),
                    None => {
                        return Err(CalcError::Structural(
                            "unbalanced braces: ')' without '('".to_string(),
                        ));
                    }
                }
            },
            Token::Separator => {}
        }
    }

    while let Some(token) = stack.pop() {
        if matches!(token, Token::BraceOpen) {
            return Err(CalcError::Structural(
                "unbalanced braces: '(' is never closed".to_string(),
            ));
        }
        output.push(token);
    }

    debug!("parsed {} tokens into postfix", output.len());
    Ok(Program::from_tokens(output))
}
