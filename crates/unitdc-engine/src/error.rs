use thiserror::Error;

use crate::tokenizer::Cursor;

/// Malformed input found while tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("Invalid character: {0:?}")]
    InvalidCharacter(char),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Missing closing parenthesis")]
    Unterminated,
}

/// Evaluation failure. The display text becomes the error cell text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("{error} at {at}")]
    Syntax { at: Cursor, error: SyntaxError },
    #[error("Stack underflow")]
    StackUnderflow,
    #[error("Undefined unit: {0}")]
    UndefinedUnit(String),
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),
    #[error("Undefined macro: {0}")]
    UndefinedMacro(String),
    #[error("Incompatible units: {0}")]
    IncompatibleUnits(String),
    #[error("Already defined: {0}")]
    AlreadyDefined(String),
    #[error("Invalid operand: {0}")]
    InvalidOperand(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
