//! Error types shared by the reader and the evaluator.

use thiserror::Error;

/// Errors produced while tokenizing or parsing input.
///
/// `Eof` means the input ran out at a point where more is needed. At the top
/// level that is the normal end of a program; inside a list it means the list
/// was never closed, and the driver reports it as such.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("{0}")]
    SyntaxError(String),
    #[error("Unexpected EOF")]
    Eof,
}

/// Errors produced while evaluating an object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("Undefined symbol: {0}")]
    UndefinedSymbol(String),
    #[error("Unbound variable {0}")]
    UnboundVariable(String),
    #[error("The head of a list must be a function")]
    NotCallable,
    #[error("Cannot apply function: number of arguments does not match")]
    ArityMismatch,
    #[error("Malformed {0}")]
    Malformed(&'static str),
    #[error("{0}")]
    Message(String),
    /// An object reached a code path that its tag rules out. Always a bug in
    /// the interpreter, never in the interpreted program.
    #[error("Bug: {0}")]
    Internal(String),
}

// Allow automatic conversion from String to EvalError
impl From<String> for EvalError {
    fn from(message: String) -> Self {
        EvalError::Message(message)
    }
}

/// Any failure a program can hit between reading and printing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}
