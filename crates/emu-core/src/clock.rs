//! CPU clock rate.

use crate::Ticks;

/// The rate a machine's CPU is clocked at.
///
/// Video-driven interrupt cadence is expressed in cycles, derived from
/// this rate and the display refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterClock {
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Whole cycles per frame. `None` for a zero refresh rate.
    #[must_use]
    pub const fn ticks_per_frame(&self, frames_per_second: u64) -> Option<Ticks> {
        match self.frequency_hz.checked_div(frames_per_second) {
            Some(ticks) => Some(Ticks::new(ticks)),
            None => None,
        }
    }

    /// Whole cycles per half frame, for boards that interrupt twice a frame.
    #[must_use]
    pub const fn ticks_per_half_frame(&self, frames_per_second: u64) -> Option<Ticks> {
        match self.ticks_per_frame(frames_per_second) {
            Some(frame) => Some(Ticks::new(frame.get() / 2)),
            None => None,
        }
    }
}
