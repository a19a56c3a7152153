//! Core traits and types for instruction-stepped emulation.
//!
//! CPUs execute one instruction per `step()` and report its cycle cost.
//! Everything that paces the emulated machine (interrupt cadence, frame
//! boundaries) is derived from those cycle counts and the master clock.

mod bus;
mod clock;
mod cpu;
mod io_bus;
mod memory;
mod observable;
mod ticks;

pub use bus::Bus;
pub use clock::MasterClock;
pub use cpu::Cpu;
pub use io_bus::IoBus;
pub use memory::{MEMORY_SIZE, Memory};
pub use observable::{Observable, Value, parse_address};
pub use ticks::Ticks;
