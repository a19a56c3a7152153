//! Board bus: memory and I/O port routing.
//!
//! | Port | IN                 | OUT                  |
//! |------|--------------------|----------------------|
//! | 1    | input port 1       | -                    |
//! | 2    | input port 2       | shifter offset       |
//! | 3    | shifter result     | sound latch 1        |
//! | 4    | -                  | shifter data         |
//! | 5    | -                  | sound latch 2        |
//! | 6    | -                  | watchdog             |
//!
//! Sound and the watchdog are not emulated. Reads from any other port leave
//! the data bus undriven.

use emu_core::{Bus, IoBus, Memory};
use fujitsu_mb14241::Mb14241;

use crate::input::InputPorts;

const PORT_INPUT_1: u8 = 1;
const PORT_INPUT_2: u8 = 2;
const PORT_SHIFT_RESULT: u8 = 3;
const PORT_SHIFT_OFFSET: u8 = 2;
const PORT_SHIFT_DATA: u8 = 4;

/// The board bus, implementing `emu_core::Bus` and `emu_core::IoBus`.
///
/// Owns the memory, the shift register and the input ports. The CPU
/// reaches all of them through the bus traits.
pub struct InvadersBus {
    pub memory: Memory,
    pub shifter: Mb14241,
    pub inputs: InputPorts,
}

impl InvadersBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            memory: Memory::new(),
            shifter: Mb14241::new(),
            inputs: InputPorts::new(),
        }
    }
}

impl Default for InvadersBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for InvadersBus {
    fn read(&mut self, address: u16) -> u8 {
        self.memory.read(address)
    }

    fn write(&mut self, address: u16, value: u8) {
        self.memory.write(address, value);
    }
}

impl IoBus for InvadersBus {
    fn read_io(&mut self, port: u8) -> Option<u8> {
        match port {
            PORT_INPUT_1 | PORT_INPUT_2 => self.inputs.get(port),
            PORT_SHIFT_RESULT => Some(self.shifter.result()),
            _ => {
                log::trace!("IN from undecoded port {port}");
                None
            }
        }
    }

    fn write_io(&mut self, port: u8, value: u8) {
        match port {
            PORT_SHIFT_OFFSET => self.shifter.set_offset(value),
            PORT_SHIFT_DATA => self.shifter.write_data(value),
            _ => log::trace!("OUT {value:#04X} to port {port} ignored"),
        }
    }
}
