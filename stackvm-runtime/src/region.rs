//! Region adapters: storage semantics for one mapped range.

use crate::bus::Region;
use stackvm_spec::{Address, Fault, Word, WORD_BYTES};

/// General-purpose adapter over a flat byte buffer (RAM, ROM images).
///
/// Word accesses must be word-aligned; words are kept in native layout, so
/// the buffer is not a portable wire format.
pub struct RamRegion {
    data: Vec<u8>,
}

impl RamRegion {
    /// Create a zero-filled buffer of `bytes` bytes.
    pub fn new(bytes: usize) -> Self {
        Self {
            data: vec![0; bytes],
        }
    }

    /// Wrap an existing buffer.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Buffer contents.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    // A registration wider than the buffer is a configuration error; accesses
    // past the end surface as bus faults rather than panics.
    fn check(&self, offset: Address) -> Result<usize, Fault> {
        if offset as usize % WORD_BYTES != 0 {
            return Err(Fault::Unaligned { address: offset });
        }
        let at = offset as usize;
        if at + WORD_BYTES > self.data.len() {
            return Err(Fault::MemoryBus { address: offset });
        }
        Ok(at)
    }
}

impl Region for RamRegion {
    fn read(&mut self, offset: Address) -> Result<Word, Fault> {
        let at = self.check(offset)?;
        let mut bytes = [0u8; WORD_BYTES];
        bytes.copy_from_slice(&self.data[at..at + WORD_BYTES]);
        Ok(Word::from_ne_bytes(bytes))
    }

    fn write(&mut self, offset: Address, word: Word) -> Result<(), Fault> {
        let at = self.check(offset)?;
        self.data[at..at + WORD_BYTES].copy_from_slice(&word.to_ne_bytes());
        Ok(())
    }
}

/// Single-register output device.
///
/// Reads always fault. A write to offset 0 hands the lowest byte of the
/// word to the sink; any other offset faults.
pub struct OutputPort {
    sink: Box<dyn FnMut(u8)>,
}

impl OutputPort {
    pub fn new(sink: impl FnMut(u8) + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }
}

impl Region for OutputPort {
    fn read(&mut self, offset: Address) -> Result<Word, Fault> {
        Err(Fault::MemoryBus { address: offset })
    }

    fn write(&mut self, offset: Address, word: Word) -> Result<(), Fault> {
        if offset != 0 {
            return Err(Fault::MemoryBus { address: offset });
        }
        (self.sink)(word as u8);
        Ok(())
    }
}
