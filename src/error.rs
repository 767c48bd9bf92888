// ABOUTME: Error types for lexing, reading, and evaluation failures

use crate::value::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Lexer or reader rejected the input
    #[error("{0}")]
    Syntax(String),

    #[error("Variable {0} not defined")]
    Undefined(String),

    /// Arity failure with procedure name, expected count/range, and actual count
    #[error("{procedure}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    Arity {
        procedure: String,
        expected: String, // "2", "1-2", "at least 1"
        actual: usize,
    },

    /// Argument-type failure with procedure name and argument position
    #[error("{procedure}: expected {expected}, got {actual} at argument {position}")]
    TypeMismatch {
        procedure: String,
        expected: String,
        actual: String,
        position: usize,
    },

    /// Evaluation-time failure: domain errors, malformed forms, user-raised (error ...)
    #[error("{0}")]
    Lisp(String),

    /// Source file could not be opened or read
    #[error("{0}")]
    File(String),
}

impl Error {
    pub fn syntax(message: impl Into<String>) -> Self {
        Error::Syntax(message.into())
    }

    pub fn lisp(message: impl Into<String>) -> Self {
        Error::Lisp(message.into())
    }

    /// Create an arity error with expected and actual counts
    pub fn arity(procedure: &str, expected: impl Into<String>, actual: usize) -> Self {
        Error::Arity {
            procedure: procedure.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create a type mismatch error pointing at the offending argument
    pub fn type_mismatch(procedure: &str, expected: &str, actual: &Value, position: usize) -> Self {
        Error::TypeMismatch {
            procedure: procedure.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
            position,
        }
    }
}
