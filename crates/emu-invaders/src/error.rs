//! Startup errors.
//!
//! Nothing fails once the machine is running; these cover loading ROMs
//! and validating configuration before the first cycle.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RomError {
    #[error("failed to read ROM {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("ROM {name} is {actual} bytes, expected {expected}")]
    WrongSize {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("ROM {name} ({len} bytes at {offset:#06X}) runs past the end of the address space")]
    Overflow { name: String, offset: u16, len: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a restart number 0-7, got {value}")]
    InvalidRestart { field: &'static str, value: u8 },
    #[error("frame rate must be non-zero")]
    ZeroFrameRate,
    #[error("half-frame cycle count must be non-zero")]
    ZeroHalfFrame,
    #[error("half frame of {cycles} cycles exceeds the limit of {}", crate::config::MAX_HALF_FRAME_CYCLES)]
    HalfFrameTooLong { cycles: u64 },
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum InvadersError {
    #[error(transparent)]
    Rom(#[from] RomError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown button {0:?}")]
pub struct ParseButtonError(pub String);
