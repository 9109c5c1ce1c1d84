//! Line-oriented read-eval-print loop.
//!
//! Each line is one of:
//!
//! - `let NAME = EXPR` evaluates `EXPR` and binds it to `NAME`
//! - `del NAME` removes a variable
//! - `:rpn EXPR` prints the postfix form of `EXPR`
//! - `:vars` lists variables
//! - `:quit` / `:q` leaves the loop
//! - anything else is evaluated as an expression

use std::io::{BufRead, Write};

use anyhow::Result;
use calc_core::{CalcError, Calculator, CompileOptions};

enum Outcome {
    Continue,
    Quit,
}

pub fn run<R: BufRead, W: Write>(
    calc: &mut Calculator,
    options: CompileOptions,
    input: R,
    mut output: W,
) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match handle(calc, options, line, &mut output) {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Quit) => break,
            Err(err) => writeln!(output, "error: {err}")?,
        }
        output.flush()?;
    }
    Ok(())
}

fn handle<W: Write>(
    calc: &mut Calculator,
    options: CompileOptions,
    line: &str,
    output: &mut W,
) -> Result<Outcome> {
    if matches!(line, ":quit" | ":q") {
        return Ok(Outcome::Quit);
    }
    if line == ":vars" {
        for (name, value) in calc.variables() {
            writeln!(output, "{name} = {value}")?;
        }
        return Ok(Outcome::Continue);
    }
    if let Some(expression) = line.strip_prefix(":rpn") {
        let program = calc.compile_with(expression, options)?;
        writeln!(output, "{program}")?;
        return Ok(Outcome::Continue);
    }
    if let Some(name) = line.strip_prefix("del ") {
        calc.delete_variable(name.trim())?;
        return Ok(Outcome::Continue);
    }
    if let Some(binding) = line.strip_prefix("let ") {
        let (name, expression) = binding.split_once('=').ok_or_else(|| {
            CalcError::Structural("expected `let NAME = EXPR`".to_string())
        })?;
        let name = name.trim();
        if !is_identifier(name) {
            return Err(CalcError::Structural(format!("invalid variable name '{name}'")).into());
        }
        let value = evaluate(calc, options, expression)?;
        calc.set_variable(name, value);
        writeln!(output, "{name} = {value}")?;
        return Ok(Outcome::Continue);
    }

    let value = evaluate(calc, options, line)?;
    writeln!(output, "{value}")?;
    Ok(Outcome::Continue)
}

fn evaluate(calc: &Calculator, options: CompileOptions, expression: &str) -> Result<f64> {
    let program = calc.compile_with(expression, options)?;
    Ok(calc.execute_program(&program)?)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
