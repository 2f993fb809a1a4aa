//! Disassembler errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisassemblerError {
    #[error("unknown opcode: {0:#04x}")]
    UnknownOpcode(u8),

    #[error("operand at offset {offset:#x} runs past the image")]
    TruncatedOperand { offset: usize },

    #[error("offset {0:#x} is outside the image")]
    OffsetOutOfRange(usize),
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
