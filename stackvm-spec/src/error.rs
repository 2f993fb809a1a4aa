//! # Fault Taxonomy
//!
//! Status values shared by the memory bus, the region adapters, and the
//! execution engine. Every fault is fatal for the run that raised it; the
//! embedding host recovers, if at all, by constructing a fresh instance.

use crate::Address;
use thiserror::Error;

/// Fatal execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    /// Reserved operand-length class, or an opcode byte naming no operation.
    #[error("cannot decode opcode {opcode:#04x} at pc {pc:#x}")]
    Decode { opcode: u8, pc: Address },

    /// Address falls in no registered region, or a region rejected it.
    #[error("no region mapped at address {address:#x}")]
    MemoryBus { address: Address },

    /// Word access to a buffer-backed region at a non-word-aligned offset.
    #[error("unaligned word access at address {address:#x}")]
    Unaligned { address: Address },

    /// HVCALL named a host-call slot with no registered handler.
    #[error("host call {number} has no registered handler")]
    HostCallUnregistered { number: u8 },
}
