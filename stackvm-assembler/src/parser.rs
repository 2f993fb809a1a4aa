//! Line parser: optional label, then an instruction or a `.db` directive.

use crate::error::{AssemblerError, Result};
use crate::lexer::Token;
use logos::Logos;
use stackvm_spec::{Opcode, OperandClass};

/// An instruction operand before label resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Immediate(i64),
    Label(String),
}

/// One sized unit of output.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Instruction {
        opcode: Opcode,
        operand: Option<Operand>,
    },
    Bytes(Vec<u8>),
}

impl Statement {
    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        match self {
            // Assigned opcodes never sit in the reserved class.
            Statement::Instruction { opcode, .. } => {
                opcode.operand_class().instruction_len().unwrap_or(1)
            }
            Statement::Bytes(bytes) => bytes.len(),
        }
    }
}

/// A parsed source line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub label: Option<String>,
    pub statement: Option<Statement>,
}

/// Parse one source line; `number` is 1-based for diagnostics.
pub fn parse_line(text: &str, number: usize) -> Result<Line> {
    let mut line = Line::default();
    let mut rest = text.trim();

    // A leading `name:` word defines a label at the current address.
    if let Some((first, remainder)) = split_first_word(rest) {
        if let Some(name) = first.strip_suffix(':') {
            line.label = Some(name.to_string());
            rest = remainder.trim_start();
        }
    }

    if rest.is_empty() || rest.starts_with(';') || rest.starts_with('#') {
        return Ok(line);
    }

    // `.db` takes the rest of the line verbatim and appends a NUL.
    if let Some(payload) = strip_db(rest) {
        let mut bytes = payload.as_bytes().to_vec();
        bytes.push(0);
        line.statement = Some(Statement::Bytes(bytes));
        return Ok(line);
    }

    line.statement = Some(parse_instruction(rest, number)?);
    Ok(line)
}

fn split_first_word(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    match text.split_once(|c: char| c.is_whitespace()) {
        Some((first, rest)) => Some((first, rest)),
        None => Some((text, "")),
    }
}

// `.db TEXT` with exactly one separator consumed, so payload spacing is
// preserved byte for byte.
fn strip_db(text: &str) -> Option<&str> {
    let rest = text
        .strip_prefix(".db")
        .or_else(|| text.strip_prefix(".DB"))?;
    if rest.is_empty() {
        return Some("");
    }
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    Some(&rest[1..])
}

fn parse_instruction(text: &str, number: usize) -> Result<Statement> {
    let mut tokens = Vec::new();
    for token in Token::lexer(text) {
        match token {
            Ok(token) => tokens.push(token),
            Err(()) => {
                return Err(AssemblerError::SyntaxError {
                    line: number,
                    message: format!("unrecognized input in {text:?}"),
                })
            }
        }
    }

    let mut tokens = tokens.into_iter();
    let mnemonic = match tokens.next() {
        Some(Token::Identifier(name)) => name.to_lowercase(),
        Some(Token::Directive(name)) => return Err(AssemblerError::InvalidDirective(name)),
        _ => {
            return Err(AssemblerError::SyntaxError {
                line: number,
                message: "expected a mnemonic".to_string(),
            })
        }
    };

    let opcode = Opcode::from_mnemonic(&mnemonic)
        .ok_or_else(|| AssemblerError::UnknownInstruction(mnemonic.clone()))?;

    let operand = match tokens.next() {
        None => None,
        Some(Token::Number(value)) | Some(Token::Hex(value)) => Some(Operand::Immediate(value)),
        Some(Token::Identifier(name)) => Some(Operand::Label(name)),
        Some(_) => {
            return Err(AssemblerError::SyntaxError {
                line: number,
                message: "expected an operand".to_string(),
            })
        }
    };

    if tokens.next().is_some() {
        return Err(AssemblerError::SyntaxError {
            line: number,
            message: "trailing tokens after operand".to_string(),
        });
    }

    match (opcode.operand_class(), &operand) {
        (OperandClass::None, Some(_)) => {
            return Err(AssemblerError::UnexpectedOperand(mnemonic))
        }
        (OperandClass::Byte | OperandClass::Word, None) => {
            return Err(AssemblerError::MissingOperand(mnemonic))
        }
        (OperandClass::Byte, Some(Operand::Label(name))) => {
            return Err(AssemblerError::InvalidImmediate(format!(
                "label {name} is not a byte operand"
            )))
        }
        _ => {}
    }

    Ok(Statement::Instruction { opcode, operand })
}
