use thiserror::Error;

/// Coarse classification of a [`CalcError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Structural,
    Runtime,
    NotFound,
    Redefinition,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("lex error at byte {position}: {message}")]
    Lexical { position: usize, message: String },
    #[error("statement error: {0}")]
    Structural(String),
    #[error("calculation error: {0}")]
    Runtime(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already defined: {0}")]
    Redefinition(String),
}

impl CalcError {
    pub(crate) fn lexical(position: usize, message: impl Into<String>) -> Self {
        CalcError::Lexical {
            position,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::Lexical { .. } => ErrorKind::Lexical,
            CalcError::Structural(_) => ErrorKind::Structural,
            CalcError::Runtime(_) => ErrorKind::Runtime,
            CalcError::NotFound(_) => ErrorKind::NotFound,
            CalcError::Redefinition(_) => ErrorKind::Redefinition,
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
