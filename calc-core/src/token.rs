//! Tokens and compiled programs.

use std::fmt;
use std::sync::Arc;

use crate::registry::Function;

/// A single lexical unit of an expression.
///
/// Function tokens share their descriptor with the registry that
/// resolved them; cloning a token never copies the implementation.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Constant(f64),
    Variable(Arc<str>),
    Function(Arc<Function>),
    BraceOpen,
    BraceClosed,
    Separator,
}

impl Token {
    pub fn variable(name: &str) -> Self {
        Token::Variable(Arc::from(name))
    }

    /// Returns true for tokens that push exactly one value when evaluated.
    pub fn is_value(&self) -> bool {
        matches!(self, Token::Constant(_) | Token::Variable(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Constant(value) => write!(f, "{value}"),
            Token::Variable(name) => f.write_str(name),
            Token::Function(function) => f.write_str(function.name()),
            Token::BraceOpen => f.write_str("("),
            Token::BraceClosed => f.write_str(")"),
            Token::Separator => f.write_str(","),
        }
    }
}

/// An expression in postfix (reverse-Polish) order.
///
/// Programs are immutable once built; recompiling produces a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    tokens: Vec<Token>,
}

impl Program {
    pub(crate) fn from_tokens(tokens: Vec<Token>) -> Self {
        Program { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Renders every token for display, in execution order.
    pub fn dump_postfix(&self) -> Vec<String> {
        self.tokens.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, token) in self.tokens.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}
