//! Instruction formatting.

use crate::decoder::Decoded;
use stackvm_spec::OperandClass;

/// Render a decoded instruction as assembly text.
///
/// Word operands print in hex (they are usually addresses), byte operands
/// in decimal.
pub fn format(decoded: &Decoded) -> String {
    match (decoded.opcode.operand_class(), decoded.operand) {
        (OperandClass::Word, Some(operand)) => format!("{} {:#x}", decoded.opcode, operand),
        (_, Some(operand)) => format!("{} {}", decoded.opcode, operand),
        _ => decoded.opcode.to_string(),
    }
}
