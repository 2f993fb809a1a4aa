//! # Opcode Definitions
//!
//! One opcode byte per instruction. The top two bits are the operand-length
//! class, the low six bits select the operation:
//!
//! ```text
//! 00xxxxxx - no operand follows
//! 01xxxxxx - 1 byte follows
//! 10xxxxxx - 1 word follows
//! 11xxxxxx - reserved (fatal decode error)
//! ```

use crate::WORD_BYTES;
use serde::{Deserialize, Serialize};

/// Instruction opcode (full byte: class bits plus operation selector).
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    // ========== No operand (0x00-0x3F) ==========
    /// NOP: no effect
    Nop = 0x00,
    /// AND: pop a, pop b, push a & b
    And = 0x01,
    /// OR: pop a, pop b, push a | b
    Or = 0x02,
    /// NOT: pop a, push !a
    Not = 0x03,
    /// DUP: push a copy of the top-of-stack word
    Dup = 0x04,
    /// CMP: pop a, condition flag = (a == 0)
    Cmp = 0x05,
    /// INC: pop a, push a + 1 (wrapping)
    Inc = 0x06,
    /// POP: pop and discard one word
    Pop = 0x07,
    /// LDI1: pop address, read one byte there, push it zero-extended
    Ldi1 = 0x08,
    /// RET: pop a word into the program counter
    Ret = 0x3E,
    /// HALT: stop the run loop
    Halt = 0x3F,

    // ========== One-byte operand (0x40-0x7F) ==========
    /// HVCALL: pop argument, invoke host call `operand`, push its result
    Hvcall = 0x40,

    // ========== One-word operand (0x80-0xBF) ==========
    /// LOADI: push the literal word operand
    Loadi = 0x81,
    /// JUMP: program counter = operand
    Jump = 0x82,
    /// CALL: push the return address, program counter = operand
    Call = 0x83,
    /// JUMPZ: if the condition flag is set, program counter = operand
    Jumpz = 0x84,
    /// JUMPNZ: if the condition flag is clear, program counter = operand
    Jumpnz = 0x85,
    /// STORE: pop a word, write it to the literal address operand
    Store = 0x86,
}

impl Opcode {
    /// Try to convert from a raw opcode byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Opcode::Nop),
            0x01 => Some(Opcode::And),
            0x02 => Some(Opcode::Or),
            0x03 => Some(Opcode::Not),
            0x04 => Some(Opcode::Dup),
            0x05 => Some(Opcode::Cmp),
            0x06 => Some(Opcode::Inc),
            0x07 => Some(Opcode::Pop),
            0x08 => Some(Opcode::Ldi1),
            0x3E => Some(Opcode::Ret),
            0x3F => Some(Opcode::Halt),
            0x40 => Some(Opcode::Hvcall),
            0x81 => Some(Opcode::Loadi),
            0x82 => Some(Opcode::Jump),
            0x83 => Some(Opcode::Call),
            0x84 => Some(Opcode::Jumpz),
            0x85 => Some(Opcode::Jumpnz),
            0x86 => Some(Opcode::Store),
            _ => None,
        }
    }

    /// Convert to the raw opcode byte.
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Operand-length class carried in the top two bits.
    #[inline]
    pub fn operand_class(self) -> OperandClass {
        OperandClass::from_opcode(self as u8)
    }

    /// Assembly mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "nop",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Not => "not",
            Opcode::Dup => "dup",
            Opcode::Cmp => "cmp",
            Opcode::Inc => "inc",
            Opcode::Pop => "pop",
            Opcode::Ldi1 => "ldi.1",
            Opcode::Ret => "ret",
            Opcode::Halt => "halt",
            Opcode::Hvcall => "hvcall",
            Opcode::Loadi => "loadi",
            Opcode::Jump => "jump",
            Opcode::Call => "call",
            Opcode::Jumpz => "jumpz",
            Opcode::Jumpnz => "jumpnz",
            Opcode::Store => "store",
        }
    }

    /// Look up an opcode by its lowercase mnemonic.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        match mnemonic {
            "nop" => Some(Opcode::Nop),
            "and" => Some(Opcode::And),
            "or" => Some(Opcode::Or),
            "not" => Some(Opcode::Not),
            "dup" => Some(Opcode::Dup),
            "cmp" => Some(Opcode::Cmp),
            "inc" => Some(Opcode::Inc),
            "pop" => Some(Opcode::Pop),
            "ldi.1" => Some(Opcode::Ldi1),
            "ret" => Some(Opcode::Ret),
            "halt" => Some(Opcode::Halt),
            "hvcall" => Some(Opcode::Hvcall),
            "loadi" => Some(Opcode::Loadi),
            "jump" => Some(Opcode::Jump),
            "call" => Some(Opcode::Call),
            "jumpz" => Some(Opcode::Jumpz),
            "jumpnz" => Some(Opcode::Jumpnz),
            "store" => Some(Opcode::Store),
            _ => None,
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// Operand-length class from the top two opcode bits.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperandClass {
    /// `00......` - no operand bytes
    None = 0,
    /// `01......` - one operand byte
    Byte = 1,
    /// `10......` - one operand word
    Word = 2,
    /// `11......` - reserved, always a fatal decode error
    Reserved = 3,
}

impl OperandClass {
    /// Classify a raw opcode byte.
    #[inline]
    pub fn from_opcode(opcode: u8) -> Self {
        match opcode >> 6 {
            0 => OperandClass::None,
            1 => OperandClass::Byte,
            2 => OperandClass::Word,
            _ => OperandClass::Reserved,
        }
    }

    /// Operand bytes following the opcode byte; `None` for the reserved class.
    #[inline]
    pub fn operand_len(self) -> Option<usize> {
        match self {
            OperandClass::None => Some(0),
            OperandClass::Byte => Some(1),
            OperandClass::Word => Some(WORD_BYTES),
            OperandClass::Reserved => None,
        }
    }

    /// Total instruction length including the opcode byte.
    #[inline]
    pub fn instruction_len(self) -> Option<usize> {
        self.operand_len().map(|n| n + 1)
    }
}
