//! Space Invaders arcade board emulator.
//!
//! An Intel 8080 at 2 MHz runs the game ROM out of a flat 64 KiB address
//! space. The board adds a Fujitsu MB14241 shift register on the I/O ports,
//! two input-port bytes, and an interrupt pair fired twice per 60 Hz frame
//! (RST 1 at mid-screen, RST 2 at vertical blank).
//!
//! The video hardware is a 1-bpp bitmap in RAM at 0x2400. This crate
//! exposes it as bytes; turning it into pixels is left to the caller.

mod bus;
mod config;
mod error;
pub mod input;
mod interrupt;
mod invaders;
mod rom;

pub use bus::InvadersBus;
pub use config::{InvadersConfig, MAX_HALF_FRAME_CYCLES};
pub use error::{ConfigError, InvadersError, ParseButtonError, RomError};
pub use input::{Button, InputPorts, InputQueue};
pub use interrupt::{VblankInterrupt, VblankPhase};
pub use invaders::{FRAMEBUFFER_BASE, FRAMEBUFFER_LEN, Invaders};
pub use rom::{ROM_SIZE, RomImage, RomSet};
