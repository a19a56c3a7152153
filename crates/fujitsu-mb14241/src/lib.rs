//! Fujitsu MB14241 barrel shifter.
//!
//! The 8080 has no multi-bit shift instruction, so the board shifts sprite
//! bytes through this chip. Two data bytes form a 16-bit window; writing a
//! new byte pushes the previous one into the low half. A 3-bit offset picks
//! which 8 bits of the window are read back.
//!
//! | Access        | Effect                                          |
//! |---------------|-------------------------------------------------|
//! | write offset  | offset = value & 7                              |
//! | write data    | old = new; new = value                          |
//! | read result   | ((new << 8) \| old) >> (8 - offset), low 8 bits |
//!
//! The chip sits on the CPU's I/O ports; the board decides which port
//! numbers reach which access.

#![allow(clippy::cast_possible_truncation)]

use emu_core::{Observable, Value};

/// MB14241 shift register state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mb14241 {
    /// Most recently written byte, high half of the window.
    new: u8,
    /// Byte written before that, low half of the window.
    old: u8,
    /// Shift offset, 0-7.
    offset: u8,
}

impl Mb14241 {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            new: 0,
            old: 0,
            offset: 0,
        }
    }

    /// Set the read offset. Only the low 3 bits are kept.
    pub fn set_offset(&mut self, value: u8) {
        self.offset = value & 0x07;
        log::trace!("shifter offset {}", self.offset);
    }

    /// Push a data byte into the window.
    pub fn write_data(&mut self, value: u8) {
        self.old = self.new;
        self.new = value;
    }

    /// The 8 bits of the window selected by the offset.
    #[must_use]
    pub const fn result(&self) -> u8 {
        let window = (self.new as u16) << 8 | self.old as u16;
        (window >> (8 - self.offset)) as u8
    }

    #[must_use]
    pub const fn offset(&self) -> u8 {
        self.offset
    }

    /// The 16-bit window, new byte high.
    #[must_use]
    pub const fn window(&self) -> u16 {
        (self.new as u16) << 8 | self.old as u16
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

const MB14241_QUERY_PATHS: &[&str] = &["offset", "window", "result"];

impl Observable for Mb14241 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "offset" => Some(self.offset.into()),
            "window" => Some(self.window().into()),
            "result" => Some(self.result().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        MB14241_QUERY_PATHS
    }
}
