//! Execution engine: the fetch-decode-execute loop.
//!
//! The engine owns the program counter, the stack pointer, the condition
//! flag, a 256-slot host-call table, and its memory bus. Every byte it
//! touches goes through the bus; any fault aborts the run and surfaces to
//! the caller, distinct from a clean `HALT`.

use crate::bus::MemoryBus;
use stackvm_spec::{
    Address, Fault, Opcode, OperandClass, Program, Word, HOST_CALL_SLOTS, WORD_BYTES,
};

/// Host-call handler: one word in, one word out, arbitrary host side
/// effects. Must not re-enter the engine.
pub type HostCall = Box<dyn FnMut(Word) -> Word>;

/// Outcome of a single [`Vm::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep fetching.
    Continue,
    /// `HALT` executed; the run is over.
    Halt,
}

/// A virtual machine instance.
///
/// Instances are plain values: construct as many as needed, each with its
/// own bus; nothing is shared between them.
pub struct Vm {
    program_counter: Address,
    stack_pointer: Address,
    condition_flag: bool,
    host_calls: [Option<HostCall>; HOST_CALL_SLOTS],
    bus: MemoryBus,
}

impl Vm {
    /// Create an instance over `bus` with all registers zeroed.
    pub fn new(bus: MemoryBus) -> Self {
        Self {
            program_counter: 0,
            stack_pointer: 0,
            condition_flag: false,
            host_calls: std::array::from_fn(|_| None),
            bus,
        }
    }

    pub fn program_counter(&self) -> Address {
        self.program_counter
    }

    pub fn set_program_counter(&mut self, address: Address) {
        self.program_counter = address;
    }

    /// Address of the most recently pushed word.
    pub fn stack_pointer(&self) -> Address {
        self.stack_pointer
    }

    pub fn set_stack_pointer(&mut self, address: Address) {
        self.stack_pointer = address;
    }

    /// Flag set by `CMP`, consumed by `JUMPZ`/`JUMPNZ`.
    pub fn condition_flag(&self) -> bool {
        self.condition_flag
    }

    pub fn bus(&self) -> &MemoryBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut MemoryBus {
        &mut self.bus
    }

    /// Register or replace the handler for a host-call number.
    ///
    /// Safe only before or between runs, never during one.
    pub fn set_host_call(&mut self, number: u8, handler: impl FnMut(Word) -> Word + 'static) {
        self.host_calls[number as usize] = Some(Box::new(handler));
    }

    /// Write an image through the bus starting at `destination`, one word
    /// at a time, zero-padding the final partial word.
    pub fn load(&mut self, destination: Address, image: &[u8]) -> Result<(), Fault> {
        for (i, chunk) in image.chunks(WORD_BYTES).enumerate() {
            let mut bytes = [0u8; WORD_BYTES];
            bytes[..chunk.len()].copy_from_slice(chunk);
            let address = destination.wrapping_add((i * WORD_BYTES) as Word);
            self.bus.write(address, Word::from_ne_bytes(bytes))?;
        }
        Ok(())
    }

    /// Load a program image at its origin.
    pub fn load_program(&mut self, program: &Program) -> Result<(), Fault> {
        self.load(program.origin, &program.image)
    }

    /// Run until `HALT` or a fatal fault.
    ///
    /// Blocks the calling thread; the only suspension points are host-call
    /// handlers, which run synchronously on the same thread.
    pub fn run(&mut self) -> Result<(), Fault> {
        loop {
            if self.step()? == Step::Halt {
                return Ok(());
            }
        }
    }

    /// Fetch, decode, and execute one instruction.
    pub fn step(&mut self) -> Result<Step, Fault> {
        let pc = self.program_counter;
        let opcode_byte = self.fetch_byte(pc)?;

        let class = OperandClass::from_opcode(opcode_byte);
        let mut advance = match class.instruction_len() {
            Some(len) => len as Word,
            None => {
                return Err(Fault::Decode {
                    opcode: opcode_byte,
                    pc,
                })
            }
        };

        let opcode = Opcode::from_u8(opcode_byte).ok_or(Fault::Decode {
            opcode: opcode_byte,
            pc,
        })?;

        tracing::trace!(pc, opcode = %opcode, "step");

        match opcode {
            Opcode::Nop => {}

            Opcode::And => {
                let a = self.pop()?;
                let b = self.pop()?;
                self.push(a & b)?;
            }

            Opcode::Or => {
                let a = self.pop()?;
                let b = self.pop()?;
                self.push(a | b)?;
            }

            Opcode::Not => {
                let a = self.pop()?;
                self.push(!a)?;
            }

            Opcode::Dup => {
                let top = self.bus.read(self.stack_pointer)?;
                self.push(top)?;
            }

            Opcode::Cmp => {
                self.condition_flag = self.pop()? == 0;
            }

            Opcode::Inc => {
                let a = self.pop()?;
                self.push(a.wrapping_add(1))?;
            }

            Opcode::Pop => {
                self.pop()?;
            }

            Opcode::Ldi1 => {
                let address = self.pop()?;
                let byte = self.fetch_byte(address)?;
                self.push(byte as Word)?;
            }

            Opcode::Loadi => {
                let word = self.fetch_word(pc.wrapping_add(1))?;
                self.push(word)?;
            }

            Opcode::Store => {
                let address = self.fetch_word(pc.wrapping_add(1))?;
                let word = self.pop()?;
                self.bus.write(address, word)?;
            }

            Opcode::Jump => {
                self.program_counter = self.fetch_word(pc.wrapping_add(1))?;
                advance = 0;
            }

            Opcode::Jumpz => {
                if self.condition_flag {
                    self.program_counter = self.fetch_word(pc.wrapping_add(1))?;
                    advance = 0;
                }
            }

            Opcode::Jumpnz => {
                if !self.condition_flag {
                    self.program_counter = self.fetch_word(pc.wrapping_add(1))?;
                    advance = 0;
                }
            }

            Opcode::Call => {
                let return_address = pc.wrapping_add(advance);
                self.push(return_address)?;
                self.program_counter = self.fetch_word(pc.wrapping_add(1))?;
                advance = 0;
            }

            Opcode::Ret => {
                self.program_counter = self.pop()?;
                advance = 0;
            }

            Opcode::Halt => return Ok(Step::Halt),

            Opcode::Hvcall => {
                let number = self.fetch_byte(pc.wrapping_add(1))?;
                let argument = self.pop()?;
                let result = {
                    let handler = self.host_calls[number as usize]
                        .as_mut()
                        .ok_or(Fault::HostCallUnregistered { number })?;
                    handler(argument)
                };
                self.push(result)?;
            }
        }

        if advance != 0 {
            self.program_counter = self.program_counter.wrapping_add(advance);
        }

        Ok(Step::Continue)
    }

    fn push(&mut self, word: Word) -> Result<(), Fault> {
        self.stack_pointer = self.stack_pointer.wrapping_sub(WORD_BYTES as Word);
        self.bus.write(self.stack_pointer, word)
    }

    fn pop(&mut self) -> Result<Word, Fault> {
        let word = self.bus.read(self.stack_pointer)?;
        self.stack_pointer = self.stack_pointer.wrapping_add(WORD_BYTES as Word);
        Ok(word)
    }

    // Gather bytes from the instruction stream. Operands are not word-aligned
    // in general; each enclosing aligned word is read whole through the bus
    // and the needed bytes extracted. Stack traffic never comes through here.
    fn read_bytes(&mut self, address: Address, dest: &mut [u8]) -> Result<(), Fault> {
        let mask = (WORD_BYTES - 1) as Word;
        let mut gathered = 0;
        while gathered < dest.len() {
            let cursor = address.wrapping_add(gathered as Word);
            let word = self.bus.read(cursor & !mask)?;
            let bytes = word.to_ne_bytes();
            let mut offset = (cursor & mask) as usize;
            while gathered < dest.len() && offset < WORD_BYTES {
                dest[gathered] = bytes[offset];
                gathered += 1;
                offset += 1;
            }
        }
        Ok(())
    }

    fn fetch_byte(&mut self, address: Address) -> Result<u8, Fault> {
        let mut byte = [0u8; 1];
        self.read_bytes(address, &mut byte)?;
        Ok(byte[0])
    }

    fn fetch_word(&mut self, address: Address) -> Result<Word, Fault> {
        let mut bytes = [0u8; WORD_BYTES];
        self.read_bytes(address, &mut bytes)?;
        Ok(Word::from_ne_bytes(bytes))
    }
}

impl std::fmt::Debug for Vm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vm")
            .field("program_counter", &self.program_counter)
            .field("stack_pointer", &self.stack_pointer)
            .field("condition_flag", &self.condition_flag)
            .finish_non_exhaustive()
    }
}
