//! # Program Image Container
//!
//! A program is a flat byte image plus the address it loads at. The on-disk
//! format is a small fixed header followed by the bincode-encoded body:
//!
//! ```text
//! Offset  Size  Field
//! ─────────────────────────────
//! 0x00    4     magic ("SVM1")
//! 0x04    4     format version
//! 0x08    ..    bincode body (origin, image)
//! ```

use crate::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Magic number for program files: "SVM1" = 0x53564D31.
pub const MAGIC: u32 = 0x53564D31;

/// File format version.
pub const VERSION: u32 = 0x0000_0001;

/// Errors in the program file format, distinct from run-time faults.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("invalid program magic: {0:#010x}")]
    InvalidMagic(u32),

    #[error("unsupported program version: expected {expected:#010x}, found {found:#010x}")]
    InvalidVersion { expected: u32, found: u32 },

    #[error("truncated program file: {0} bytes")]
    Truncated(usize),

    #[error("malformed program body: {0}")]
    Encoding(#[from] bincode::Error),
}

/// An assembled program image and its load address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Load address of the first image byte.
    pub origin: Address,

    /// Raw instruction and data bytes.
    pub image: Vec<u8>,
}

impl Program {
    /// Create a program loading at address zero.
    pub fn new(image: Vec<u8>) -> Self {
        Self { origin: 0, image }
    }

    /// Create a program loading at `origin`.
    pub fn with_origin(origin: Address, image: Vec<u8>) -> Self {
        Self { origin, image }
    }

    /// Image length in bytes.
    pub fn len(&self) -> usize {
        self.image.len()
    }

    /// Whether the image is empty.
    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }

    /// Serialize to the on-disk format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProgramError> {
        let mut bytes = Vec::with_capacity(8 + self.image.len());
        bytes.extend_from_slice(&MAGIC.to_le_bytes());
        bytes.extend_from_slice(&VERSION.to_le_bytes());
        bytes.extend_from_slice(&bincode::serialize(self)?);
        Ok(bytes)
    }

    /// Deserialize from the on-disk format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProgramError> {
        if bytes.len() < 8 {
            return Err(ProgramError::Truncated(bytes.len()));
        }

        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != MAGIC {
            return Err(ProgramError::InvalidMagic(magic));
        }

        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if version != VERSION {
            return Err(ProgramError::InvalidVersion {
                expected: VERSION,
                found: version,
            });
        }

        Ok(bincode::deserialize(&bytes[8..])?)
    }
}
