//! Strict single-instruction decoder.

use crate::error::{DisassemblerError, Result};
use stackvm_spec::{Opcode, OperandClass, Word, WORD_BYTES};

/// One decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub opcode: Opcode,
    /// Byte operands are zero-extended into a word.
    pub operand: Option<Word>,
    /// Total encoded length, opcode byte included.
    pub len: usize,
}

/// Decode the instruction starting at `offset`.
pub fn decode(image: &[u8], offset: usize) -> Result<Decoded> {
    let byte = *image
        .get(offset)
        .ok_or(DisassemblerError::OffsetOutOfRange(offset))?;
    let opcode = Opcode::from_u8(byte).ok_or(DisassemblerError::UnknownOpcode(byte))?;

    let class = opcode.operand_class();
    // Assigned opcodes never sit in the reserved class.
    let len = class.instruction_len().unwrap_or(1);

    let operand_bytes = image
        .get(offset + 1..offset + len)
        .ok_or(DisassemblerError::TruncatedOperand { offset })?;

    let operand = match class {
        OperandClass::None | OperandClass::Reserved => None,
        OperandClass::Byte => Some(operand_bytes[0] as Word),
        OperandClass::Word => {
            let mut bytes = [0u8; WORD_BYTES];
            bytes.copy_from_slice(operand_bytes);
            Some(Word::from_ne_bytes(bytes))
        }
    };

    Ok(Decoded {
        opcode,
        operand,
        len,
    })
}
