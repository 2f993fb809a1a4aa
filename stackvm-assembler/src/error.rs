//! Assembler errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("syntax error at line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    #[error("unknown instruction: {0}")]
    UnknownInstruction(String),

    #[error("{0} takes no operand")]
    UnexpectedOperand(String),

    #[error("{0} is missing its operand")]
    MissingOperand(String),

    #[error("invalid immediate value: {0}")]
    InvalidImmediate(String),

    #[error("undefined label: {0}")]
    UndefinedLabel(String),

    #[error("duplicate label: {0}")]
    DuplicateLabel(String),

    #[error("invalid directive: {0}")]
    InvalidDirective(String),
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
