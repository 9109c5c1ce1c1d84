//! The `Calculator` facade: a symbol registry plus the most recently
//! compiled program.

use log::info;

use crate::builtins;
use crate::compiler::{CompileOptions, compile};
use crate::error::{CalcError, Result};
use crate::evaluator;
use crate::registry::{Function, Registry};
use crate::token::{Program, Token};

/// Owns the symbol tables and the current program.
///
/// `Calculator::default()` comes with the builtin operators, functions
/// and constants; `Calculator::new()` starts empty.
#[derive(Debug, Clone)]
pub struct Calculator {
    registry: Registry,
    program: Option<Program>,
}

impl Default for Calculator {
    fn default() -> Self {
        let mut calculator = Calculator::new();
        calculator.add_builtins();
        calculator
    }
}

impl Calculator {
    pub fn new() -> Self {
        Calculator {
            registry: Registry::new(),
            program: None,
        }
    }

    pub fn add_builtins(&mut self) {
        builtins::install(&mut self.registry);
    }

    /// Adds or replaces a function. Already compiled programs keep
    /// calling the implementation they were compiled against.
    pub fn register_function<F>(&mut self, name: &str, arity: usize, precedence: u32, implementation: F)
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.registry
            .register_function(Function::new(name, arity, precedence, implementation));
    }

    /// Adds a constant; fails if the name is already a constant.
    pub fn register_constant(&mut self, name: &str, value: f64) -> Result<()> {
        self.registry.register_constant(name, value)
    }

    pub fn set_variable(&mut self, name: &str, value: f64) {
        self.registry.set_variable(name, value);
    }

    pub fn delete_variable(&mut self, name: &str) -> Result<f64> {
        self.registry.delete_variable(name)
    }

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.registry.variable(name)
    }

    /// Variable bindings sorted by name.
    pub fn variables(&self) -> Vec<(&str, f64)> {
        let mut variables: Vec<_> = self.registry.variables().collect();
        variables.sort_by(|a, b| a.0.cmp(b.0));
        variables
    }

    /// Compiles `source` with default options without storing it.
    pub fn compile(&self, source: &str) -> Result<Program> {
        self.compile_with(source, CompileOptions::default())
    }

    pub fn compile_with(&self, source: &str, options: CompileOptions) -> Result<Program> {
        compile(source, &self.registry, options)
    }

    /// Compiles `source` and makes it the current program.
    ///
    /// On failure the previous program stays in place.
    pub fn set_expression(&mut self, source: &str) -> Result<()> {
        self.set_expression_with(source, CompileOptions::default())
    }

    pub fn set_expression_with(&mut self, source: &str, options: CompileOptions) -> Result<()> {
        let program = self.compile_with(source, options)?;
        info!("expression set: {source:?}");
        self.program = Some(program);
        Ok(())
    }

    /// Runs the current program against the current variables.
    pub fn execute(&self) -> Result<f64> {
        let program = self
            .program
            .as_ref()
            .ok_or_else(|| CalcError::Structural("no expression has been set".to_string()))?;
        self.execute_program(program)
    }

    pub fn execute_program(&self, program: &Program) -> Result<f64> {
        evaluator::execute(program, &self.registry)
    }

    /// Postfix form of the current program.
    pub fn rpn(&self) -> Option<&[Token]> {
        self.program.as_ref().map(Program::tokens)
    }
}
