//! Core of the calc toolchain: compiles arithmetic expressions to postfix
//! programs and evaluates them against named variables.
//!
//! The pipeline is:
//!
//!   expression text
//!     -> lexer      (tokens, identifiers resolved against the registry)
//!     -> parser     (shunting-yard, postfix program)
//!     -> validate   (arity / balance check)
//!     -> optimizer  (constant folding, optional)
//!     -> evaluator  (stack machine, re-run after variable changes)
//!
//! Front ends (CLI, REPL, benchmarks) should go through [`Calculator`]
//! rather than driving the stages by hand.

// ---------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------

pub mod error;

// ---------------------------------------------------------------------
// Symbols and tokens
// ---------------------------------------------------------------------

pub mod registry;
pub mod builtins;
pub mod token;

// ---------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------

pub mod lexer;
pub mod parser;
pub mod validate;
pub mod optimizer;
pub mod evaluator;

// ---------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------

pub mod compiler;
pub mod calculator;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use calculator::Calculator;
pub use compiler::{CompileOptions, compile};
pub use error::{CalcError, ErrorKind, Result};
pub use registry::{Function, Registry};
pub use token::{Program, Token};
