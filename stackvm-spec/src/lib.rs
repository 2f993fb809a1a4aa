//! # Stack VM Specification
//!
//! Core definitions for a minimal stack-based bytecode virtual machine:
//! the word model, the opcode table with its operand-length encoding, the
//! fault taxonomy shared by the memory bus and the execution engine, and
//! the program-image container.
//!
//! ## Key Features
//! - One flat byte-addressed space shared by code, stack, and devices
//! - One opcode byte per instruction; the top two bits give the operand
//!   length, the low six bits select the operation
//! - Word width is a single build-time parameter (32-bit canonical,
//!   16-bit behind the `word16` feature)
//! - Downward-growing data stack of whole words

pub mod error;
pub mod opcode;
pub mod program;

pub use error::Fault;
pub use opcode::{Opcode, OperandClass};
pub use program::{Program, ProgramError};

/// Machine word: fixed-width unsigned, all arithmetic wraps.
#[cfg(not(feature = "word16"))]
pub type Word = u32;

/// Machine word: fixed-width unsigned, all arithmetic wraps.
#[cfg(feature = "word16")]
pub type Word = u16;

/// A word interpreted as a byte offset into the flat address space.
pub type Address = Word;

/// Width of a machine word in bytes.
pub const WORD_BYTES: usize = core::mem::size_of::<Word>();

/// Canonical page size for memory bus registrations, in bytes.
pub const DEFAULT_PAGE_SIZE: u32 = 0x400;

/// Number of slots in the host-call table.
pub const HOST_CALL_SLOTS: usize = 256;
