//! Stack machine that runs postfix programs.

use crate::error::{CalcError, Result};
use crate::registry::Registry;
use crate::token::{Program, Token};

/// Executes `program` against the variable bindings in `registry`.
///
/// Each function consumes the top `arity` values, the most recently
/// pushed value being its rightmost operand.
pub fn execute(program: &Program, registry: &Registry) -> Result<f64> {
    let mut stack: Vec<f64> = Vec::with_capacity(program.len());

    for token in program.tokens() {
        match token {
            Token::Constant(value) => stack.push(*value),
            Token::Variable(name) => {
                let value = registry.variable(name).ok_or_else(|| {
                    CalcError::Runtime(format!("no variable \"{name}\" defined"))
                })?;
                stack.push(value);
            }
            Token::Function(function) => {
                let base = stack.len().checked_sub(function.arity()).ok_or_else(|| {
                    CalcError::Structural(format!(
                        "not enough arguments for function \"{}\"",
                        function.name()
                    ))
                })?;
                let value = function.call(&stack[base..]);
                stack.truncate(base);
                stack.push(value);
            }
            other => {
                return Err(CalcError::Structural(format!(
                    "unexpected token '{other}' detected"
                )));
            }
        }
    }

    match stack.as_slice() {
        [result] => Ok(*result),
        _ => Err(CalcError::Structural("unbalanced expression".to_string())),
    }
}
