//! Constant folding over postfix programs.
//!
//! Values that are known at compile time are kept in a pending buffer.
//! A function whose operands are all in the buffer is evaluated on the
//! spot and its result goes back into the buffer. A variable, or a
//! function that needs operands from before the buffer, flushes the
//! buffer to the output as literals first, so nothing derived from a
//! variable is ever folded.

use log::debug;

use crate::token::{Program, Token};

pub fn optimize(program: &Program) -> Program {
    let mut output = Vec::with_capacity(program.len());
    let mut pending: Vec<f64> = Vec::new();
    let mut folds = 0usize;

    for token in program.tokens() {
        match token {
            Token::Constant(value) => pending.push(*value),
            Token::Function(function) if pending.len() >= function.arity() => {
                let base = pending.len() - function.arity();
                let value = function.call(&pending[base..]);
                pending.truncate(base);
                pending.push(value);
                folds += 1;
            }
            _ => {
                flush(&mut pending, &mut output);
                output.push(token.clone());
            }
        }
    }
    flush(&mut pending, &mut output);

    debug!(
        "folded {folds} calls: {} tokens -> {}",
        program.len(),
        output.len()
    );
    Program::from_tokens(output)
}

fn flush(pending: &mut Vec<f64>, output: &mut Vec<Token>) {
    output.extend(pending.drain(..).map(Token::Constant));
}
