//! Flat 64 KiB memory.

use crate::{Bus, IoBus};

/// Size of the 16-bit address space in bytes.
pub const MEMORY_SIZE: usize = 0x1_0000;

/// Flat, zero-initialised 64 KiB store.
///
/// There is no ROM/RAM distinction: ROM images are loaded as ordinary
/// writable bytes. Used directly as the bus in CPU tests, and as the
/// memory half of machine buses.
pub struct Memory {
    data: Box<[u8]>,
}

impl Memory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    /// Copy `bytes` into memory starting at `offset`.
    ///
    /// Bytes that run past `0xFFFF` wrap around to address 0.
    pub fn load(&mut self, offset: u16, bytes: &[u8]) {
        let mut address = offset;
        for &byte in bytes {
            self.data[usize::from(address)] = byte;
            address = address.wrapping_add(1);
        }
    }

    /// Read a byte without going through the `Bus` trait.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.data[usize::from(address)]
    }

    /// A window of `len` bytes starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics if the window runs past the end of the address space.
    #[must_use]
    pub fn slice(&self, start: u16, len: usize) -> &[u8] {
        let start = usize::from(start);
        &self.data[start..start + len]
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Memory {
    fn read(&mut self, address: u16) -> u8 {
        self.data[usize::from(address)]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.data[usize::from(address)] = value;
    }
}

/// Bare memory has no devices on the I/O space.
impl IoBus for Memory {
    fn read_io(&mut self, _port: u8) -> Option<u8> {
        None
    }

    fn write_io(&mut self, _port: u8, _value: u8) {}
}
