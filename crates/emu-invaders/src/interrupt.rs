//! Vertical blank interrupt controller.
//!
//! The board raises two interrupts per frame: one when the beam reaches the
//! middle of the screen and one at vertical blank. They alternate, and the
//! alternation only advances when the CPU actually takes the interrupt, so
//! the two vectors stay in phase with the display even across stretches
//! where the game runs with interrupts disabled.

use emu_core::{Bus, Cpu};
use intel_8080::Restart;

/// Which interrupt fires next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VblankPhase {
    NextIsVblankStart,
    NextIsVblankEnd,
}

impl VblankPhase {
    const fn flip(self) -> Self {
        match self {
            Self::NextIsVblankStart => Self::NextIsVblankEnd,
            Self::NextIsVblankEnd => Self::NextIsVblankStart,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NextIsVblankStart => "start",
            Self::NextIsVblankEnd => "end",
        }
    }
}

/// Two-phase interrupt source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VblankInterrupt {
    phase: VblankPhase,
    start: Restart,
    end: Restart,
}

impl VblankInterrupt {
    #[must_use]
    pub const fn new(start: Restart, end: Restart) -> Self {
        Self {
            phase: VblankPhase::NextIsVblankStart,
            start,
            end,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> VblankPhase {
        self.phase
    }

    /// The restart the next serviced interrupt will execute.
    #[must_use]
    pub const fn next_restart(&self) -> Restart {
        match self.phase {
            VblankPhase::NextIsVblankStart => self.start,
            VblankPhase::NextIsVblankEnd => self.end,
        }
    }

    /// Offer the current phase's interrupt to the CPU.
    ///
    /// Returns the cycles taken if the CPU accepted it, in which case the
    /// phase flips. If the CPU has interrupts disabled nothing changes.
    pub fn service<B: Bus, C: Cpu<B>>(&mut self, cpu: &mut C, bus: &mut B) -> Option<u32> {
        let cycles = cpu.interrupt(bus, self.next_restart().opcode())?;
        self.phase = self.phase.flip();
        Some(cycles)
    }

    pub fn reset(&mut self) {
        self.phase = VblankPhase::NextIsVblankStart;
    }
}
