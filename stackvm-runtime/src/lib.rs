//! # Stack VM Runtime
//!
//! Execute stack VM programs against a flat, bus-mediated address space.
//!
//! The runtime has three pieces: the [`MemoryBus`] multiplexes word reads
//! and writes onto page-granular regions, the adapters in [`region`] give
//! those regions their storage semantics, and the [`Vm`] drives the
//! fetch-decode-execute loop with all memory traffic going through the bus.
//!
//! ## Example
//!
//! ```rust
//! use stackvm_runtime::{MemoryBus, RamRegion, Vm};
//!
//! let mut bus = MemoryBus::default();
//! bus.register(0, 4, Box::new(RamRegion::new(4 * 0x400)));
//!
//! let mut vm = Vm::new(bus);
//! vm.set_stack_pointer(4 * 0x400);
//! vm.load(0, &[0x3F]).unwrap(); // halt
//! vm.run().unwrap();
//! ```

pub mod bus;
pub mod region;
pub mod vm;

pub use bus::{MemoryBus, Region};
pub use region::{OutputPort, RamRegion};
pub use vm::{HostCall, Step, Vm};
