//! CPU core trait.

use crate::{Bus, Ticks};

/// A CPU that executes whole instructions.
///
/// The bus is passed in, not owned, so the machine can keep the CPU and
/// its peripherals side by side and hand the bus to other components
/// between steps.
pub trait Cpu<B: Bus> {
    /// The type used for register inspection.
    type Registers;

    /// Execute one instruction. Returns cycles consumed.
    fn step(&mut self, bus: &mut B) -> u32;

    /// Present an interrupt. `data` is the byte the interrupting device
    /// places on the data bus during acknowledge.
    ///
    /// Returns the cycles consumed if the CPU accepted the interrupt, or
    /// `None` if interrupts are disabled.
    fn interrupt(&mut self, bus: &mut B, data: u8) -> Option<u32>;

    /// Reset the CPU to its power-on state.
    fn reset(&mut self);

    /// Current program counter.
    fn pc(&self) -> u16;

    /// Snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// True while the CPU is halted waiting for an interrupt.
    fn is_halted(&self) -> bool;

    /// Total cycles executed since creation or the last reset.
    fn total_ticks(&self) -> Ticks;
}
