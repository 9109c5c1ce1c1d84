use log::debug;

use crate::error::Result;
use crate::lexer::tokenize;
use crate::optimizer::optimize;
use crate::parser::parse;
use crate::registry::Registry;
use crate::token::Program;
use crate::validate::validate;

/// Knobs for a single compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Fold constant sub-expressions after validation.
    pub optimize: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions { optimize: true }
    }
}

impl CompileOptions {
    pub fn unoptimized() -> Self {
        CompileOptions { optimize: false }
    }
}

/// Runs tokenizer, parser, validator and (optionally) the optimizer.
pub fn compile(source: &str, registry: &Registry, options: CompileOptions) -> Result<Program> {
    let tokens = tokenize(source, registry)?;
    let program = parse(tokens)?;
    validate(&program)?;

    let program = if options.optimize {
        optimize(&program)
    } else {
        program
    };
    debug!("compiled {source:?} to `{program}`");
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::error::{CalcError, ErrorKind};
    use crate::evaluator::execute;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        builtins::install(&mut registry);
        registry
    }

    #[test]
    fn optimizes_by_default() {
        let program = compile("1 + 2", &registry(), CompileOptions::default()).expect("compile");
        assert_eq!(program.to_string(), "3");
    }

    #[test]
    fn can_skip_optimization() {
        let program =
            compile("1 + 2", &registry(), CompileOptions::unoptimized()).expect("compile");
        assert_eq!(program.to_string(), "1 2 +");
    }

    #[test]
    fn reports_each_error_kind_from_its_stage() {
        let registry = registry();
        let kind = |source: &str| {
            compile(source, &registry, CompileOptions::default())
                .map(|_| ())
                .map_err(|err| err.kind())
        };
        assert_eq!(kind("22 33 + 2"), Err(ErrorKind::Lexical));
        assert_eq!(kind("12 + 2 - (22 + 2"), Err(ErrorKind::Structural));
        assert_eq!(kind(")  + 12 * 22 * sin(12)"), Err(ErrorKind::Structural));
        assert_eq!(kind("sin(22, 11)"), Err(ErrorKind::Structural));
        assert_eq!(kind("atan2(11)"), Err(ErrorKind::Structural));
    }

    #[test]
    fn folding_does_not_hide_missing_variables() {
        let registry = registry();
        let program = compile("x * (2 + 3)", &registry, CompileOptions::default()).expect("compile");
        let err = execute(&program, &registry).unwrap_err();
        assert!(matches!(err, CalcError::Runtime(_)));
    }
}
