//! Board configuration.

use std::fs;
use std::path::Path;

use emu_core::MasterClock;
use intel_8080::{Quirks, Restart};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest accepted half frame. The headroom above it absorbs the last
/// instruction of a half frame, so the cycle counter cannot overflow.
pub const MAX_HALF_FRAME_CYCLES: u32 = u32::MAX - 32;

/// Configuration for creating an `Invaders` instance.
///
/// Every field has a default matching the arcade board, so a JSON
/// config file only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvadersConfig {
    /// CPU clock in Hz.
    pub cpu_frequency_hz: u64,
    /// Display refresh rate. Two interrupts fire per frame.
    pub frames_per_second: u64,
    /// Cycles between interrupts. `None` derives it from the clock and
    /// refresh rate.
    pub half_frame_cycles: Option<u32>,
    /// Restart number fired at mid-screen.
    pub vblank_start_rst: u8,
    /// Restart number fired at the end of the frame.
    pub vblank_end_rst: u8,
    /// Stack pointer at power-on.
    pub initial_sp: u16,
    pub quirks: Quirks,
}

impl Default for InvadersConfig {
    fn default() -> Self {
        Self {
            cpu_frequency_hz: 2_000_000,
            frames_per_second: 60,
            half_frame_cycles: None,
            vblank_start_rst: 1,
            vblank_end_rst: 2,
            initial_sp: 0xF000,
            quirks: Quirks::default(),
        }
    }
}

impl InvadersConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Cycles between interrupts: half a frame at the configured clock.
    pub fn half_frame_cycles(&self) -> Result<u32, ConfigError> {
        let cycles = match self.half_frame_cycles {
            Some(cycles) => u64::from(cycles),
            None => MasterClock::new(self.cpu_frequency_hz)
                .ticks_per_half_frame(self.frames_per_second)
                .ok_or(ConfigError::ZeroFrameRate)?
                .get(),
        };
        if cycles == 0 {
            return Err(ConfigError::ZeroHalfFrame);
        }
        u32::try_from(cycles)
            .ok()
            .filter(|&half| half <= MAX_HALF_FRAME_CYCLES)
            .ok_or(ConfigError::HalfFrameTooLong { cycles })
    }

    /// The (mid-screen, end-of-frame) restarts.
    pub fn vblank_restarts(&self) -> Result<(Restart, Restart), ConfigError> {
        let start = Restart::new(self.vblank_start_rst).ok_or(ConfigError::InvalidRestart {
            field: "vblank_start_rst",
            value: self.vblank_start_rst,
        })?;
        let end = Restart::new(self.vblank_end_rst).ok_or(ConfigError::InvalidRestart {
            field: "vblank_end_rst",
            value: self.vblank_end_rst,
        })?;
        Ok((start, end))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.half_frame_cycles()?;
        self.vblank_restarts()?;
        Ok(())
    }
}
