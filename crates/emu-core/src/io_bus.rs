use crate::Bus;

/// A bus that also has a separate I/O port space.
///
/// The 8080 addresses 256 ports through its IN and OUT instructions. Boards
/// decode only some of them; a port nobody answers leaves the data bus
/// undriven, which is reported as `None`.
pub trait IoBus: Bus {
    /// Read a byte from the given I/O port.
    ///
    /// Returns `None` when no device responds on that port.
    fn read_io(&mut self, port: u8) -> Option<u8>;

    /// Write a byte to the given I/O port. Writes to undecoded ports are
    /// dropped.
    fn write_io(&mut self, port: u8, value: u8);
}
