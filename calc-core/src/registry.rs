//! Symbol registry: the named functions, constants and variables an
//! expression can refer to.
//!
//! All three tables are keyed by the full identifier string. Name
//! resolution order is fixed: functions, then constants, then variables,
//! so an identifier that names a function can never be read as a variable.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

use crate::error::{CalcError, Result};

/// Native implementation of a function.
///
/// Receives exactly `arity` operands, leftmost first.
pub type Implementation = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// Descriptor of a callable symbol: an operator such as `+` or a named
/// function such as `atan2`.
#[derive(Clone)]
pub struct Function {
    name: String,
    arity: usize,
    precedence: u32,
    implementation: Implementation,
}

impl Function {
    pub fn new<F>(name: impl Into<String>, arity: usize, precedence: u32, implementation: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Function {
            name: name.into(),
            arity,
            precedence,
            implementation: Arc::new(implementation),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Higher values bind tighter during parsing.
    pub fn precedence(&self) -> u32 {
        self.precedence
    }

    /// Invokes the implementation on the given operands.
    pub fn call(&self, operands: &[f64]) -> f64 {
        debug_assert_eq!(operands.len(), self.arity, "arity mismatch for {}", self.name);
        (self.implementation)(operands)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("precedence", &self.precedence)
            .finish_non_exhaustive()
    }
}

// Implementations are opaque; two descriptors compare by signature only.
impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arity == other.arity && self.precedence == other.precedence
    }
}

/// What an identifier resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Function(Arc<Function>),
    Constant(f64),
    Variable,
}

#[derive(Debug, Default, Clone)]
pub struct Registry {
    functions: HashMap<String, Arc<Function>>,
    constants: HashMap<String, f64>,
    variables: HashMap<String, f64>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a function, replacing any previous entry with the same name.
    ///
    /// Programs compiled before the replacement keep the old descriptor.
    pub fn register_function(&mut self, function: Function) {
        debug!(
            "registering function '{}' (arity {}, precedence {})",
            function.name, function.arity, function.precedence
        );
        self.functions
            .insert(function.name.clone(), Arc::new(function));
    }

    /// Adds a constant. Constants are immutable: registering an existing
    /// name is rejected.
    pub fn register_constant(&mut self, name: impl Into<String>, value: f64) -> Result<()> {
        let name = name.into();
        if self.constants.contains_key(&name) {
            return Err(CalcError::Redefinition(format!("constant \"{name}\"")));
        }
        debug!("registering constant '{name}' = {value}");
        self.constants.insert(name, value);
        Ok(())
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        if self.functions.contains_key(&name) || self.constants.contains_key(&name) {
            warn!("variable \"{name}\" is shadowed by a function or constant and cannot be referenced");
        }
        self.variables.insert(name, value);
    }

    /// Removes a variable binding, returning its last value.
    pub fn delete_variable(&mut self, name: &str) -> Result<f64> {
        self.variables
            .remove(name)
            .ok_or_else(|| CalcError::NotFound(format!("there is no variable \"{name}\"")))
    }

    pub fn function(&self, name: &str) -> Option<&Arc<Function>> {
        self.functions.get(name)
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, f64)> {
        self.variables.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Resolves an identifier: function names first, then constants,
    /// otherwise the identifier is a variable reference.
    pub fn resolve(&self, name: &str) -> Resolved {
        if let Some(function) = self.functions.get(name) {
            return Resolved::Function(Arc::clone(function));
        }
        match self.constants.get(name) {
            Some(value) => Resolved::Constant(*value),
            None => Resolved::Variable,
        }
    }
}
