//! Two-pass assembly: size statements and collect labels, then resolve and
//! emit bytes.

use std::collections::HashMap;

use crate::error::{AssemblerError, Result};
use crate::parser::{parse_line, Operand, Statement};
use stackvm_spec::{OperandClass, Program, Word, WORD_BYTES};

/// Assemble source text into a program image at origin 0.
pub fn assemble(source: &str) -> Result<Program> {
    let mut statements = Vec::new();
    let mut labels: HashMap<String, u64> = HashMap::new();
    let mut address: u64 = 0;

    for (index, text) in source.lines().enumerate() {
        let line = parse_line(text, index + 1)?;
        if let Some(label) = line.label {
            if labels.insert(label.clone(), address).is_some() {
                return Err(AssemblerError::DuplicateLabel(label));
            }
        }
        if let Some(statement) = line.statement {
            address += statement.size() as u64;
            statements.push(statement);
        }
    }

    let mut image = Vec::with_capacity(address as usize);
    for statement in statements {
        match statement {
            Statement::Instruction { opcode, operand } => {
                image.push(opcode.to_u8());
                match opcode.operand_class() {
                    OperandClass::None | OperandClass::Reserved => {}
                    OperandClass::Byte => {
                        let value = resolve(opcode.mnemonic(), &operand, &labels)?;
                        let byte = u8::try_from(value)
                            .map_err(|_| AssemblerError::InvalidImmediate(value.to_string()))?;
                        image.push(byte);
                    }
                    OperandClass::Word => {
                        let value = resolve(opcode.mnemonic(), &operand, &labels)?;
                        image.extend_from_slice(&encode_word(value)?);
                    }
                }
            }
            Statement::Bytes(bytes) => image.extend_from_slice(&bytes),
        }
    }

    Ok(Program::new(image))
}

fn resolve(
    mnemonic: &str,
    operand: &Option<Operand>,
    labels: &HashMap<String, u64>,
) -> Result<i64> {
    match operand {
        Some(Operand::Immediate(value)) => Ok(*value),
        Some(Operand::Label(name)) => labels
            .get(name)
            .map(|&address| address as i64)
            .ok_or_else(|| AssemblerError::UndefinedLabel(name.clone())),
        None => Err(AssemblerError::MissingOperand(mnemonic.to_string())),
    }
}

// Word operands accept the full unsigned range plus two's-complement
// negatives; both land in the image in native word layout.
fn encode_word(value: i64) -> Result<[u8; WORD_BYTES]> {
    let bits = WORD_BYTES as u32 * 8;
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << bits) - 1;
    if value < min || value > max {
        return Err(AssemblerError::InvalidImmediate(value.to_string()));
    }
    Ok((value as Word).to_ne_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackvm_spec::Opcode;

    #[test]
    fn test_assemble_simple() {
        let source = r#"
            ; Simple test
            nop
            halt
        "#;

        let program = assemble(source).unwrap();
        assert_eq!(
            program.image,
            vec![Opcode::Nop.to_u8(), Opcode::Halt.to_u8()]
        );
    }

    #[test]
    fn test_forward_label_reference() {
        let source = "jump end\nnop\nend: halt";
        let program = assemble(source).unwrap();

        let end = (1 + WORD_BYTES + 1) as Word;
        let mut expected = vec![Opcode::Jump.to_u8()];
        expected.extend_from_slice(&end.to_ne_bytes());
        expected.push(Opcode::Nop.to_u8());
        expected.push(Opcode::Halt.to_u8());
        assert_eq!(program.image, expected);
    }

    #[test]
    fn test_negative_immediate_wraps() {
        let program = assemble("loadi -1\nhalt").unwrap();
        let mut expected = vec![Opcode::Loadi.to_u8()];
        expected.extend_from_slice(&Word::MAX.to_ne_bytes());
        expected.push(Opcode::Halt.to_u8());
        assert_eq!(program.image, expected);
    }
}
