use crate::error::{CalcError, Result};
use crate::token::{Program, Token};

/// Checks that a postfix program leaves exactly one value when run.
///
/// Walks the program counting available values: operands add one, a
/// function of arity `a` needs `a` values and leaves one.
pub fn validate(program: &Program) -> Result<()> {
    let mut values: usize = 0;

    for token in program.tokens() {
        match token {
            token if token.is_value() => values += 1,
            Token::Function(function) => {
                if function.arity() > values {
                    return Err(CalcError::Structural(format!(
                        "not enough arguments for function \"{}\"",
                        function.name()
                    )));
                }
                values = values - function.arity() + 1;
            }
            other => {
                return Err(CalcError::Structural(format!(
                    "unexpected token '{other}' in postfix program"
                )));
            }
        }
    }

    if values != 1 {
        return Err(CalcError::Structural("unbalanced statement".to_string()));
    }
    Ok(())
}
