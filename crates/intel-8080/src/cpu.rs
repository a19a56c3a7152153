//! Intel 8080 CPU core with per-instruction execution.

mod execute;

use std::collections::BTreeMap;

use emu_core::{Bus, Cpu, IoBus, Observable, Ticks, Value};

use crate::decode::{Instruction, Restart, decode};
use crate::registers::Registers;

/// Cycles burned by each `step()` while halted.
const HALTED_CYCLES: u32 = 4;

/// Deliberate deviations from documented behaviour that some software was
/// written against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Quirks {
    /// `SBB M` always leaves carry set.
    pub sbb_memory_forces_carry: bool,
}

/// Intel 8080 CPU.
///
/// The CPU does not own the bus. It is passed to `step()` on each
/// instruction so the board can keep memory and I/O devices alongside.
pub struct I8080 {
    pub regs: Registers,
    quirks: Quirks,
    total_ticks: Ticks,
    /// Times each undecodable opcode has been executed.
    unimplemented: BTreeMap<u8, u64>,
    last_unimplemented: Option<u8>,
}

impl I8080 {
    /// Create a CPU in its power-on state: all registers zero, interrupts
    /// disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default())
    }

    #[must_use]
    pub fn with_quirks(quirks: Quirks) -> Self {
        Self {
            regs: Registers::default(),
            quirks,
            total_ticks: Ticks::ZERO,
            unimplemented: BTreeMap::new(),
            last_unimplemented: None,
        }
    }

    #[must_use]
    pub const fn quirks(&self) -> Quirks {
        self.quirks
    }

    /// Undecodable opcodes seen so far with their execution counts, in
    /// opcode order.
    pub fn unimplemented(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.unimplemented.iter().map(|(&op, &count)| (op, count))
    }

    /// Total executions of undecodable opcodes.
    #[must_use]
    pub fn unimplemented_count(&self) -> u64 {
        self.unimplemented.values().sum()
    }

    /// The most recent undecodable opcode, if any.
    #[must_use]
    pub const fn last_unimplemented(&self) -> Option<u8> {
        self.last_unimplemented
    }

    fn record_unimplemented(&mut self, opcode: u8) {
        let pc = self.regs.pc.wrapping_sub(1);
        let count = self.unimplemented.entry(opcode).or_insert(0);
        if *count == 0 {
            log::warn!("unimplemented opcode {opcode:#04X} at {pc:#06X}, treated as NOP");
        }
        *count += 1;
        self.last_unimplemented = Some(opcode);
    }

    /// Read the byte at PC and advance PC.
    fn fetch<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Read a little-endian word at PC and advance PC past it.
    fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch(bus);
        let hi = self.fetch(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Push high byte at SP-1, then low byte at SP-2.
    fn push<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, lo);
    }

    fn pop<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let value = bus.read_word(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        value
    }
}

impl Default for I8080 {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: IoBus> Cpu<B> for I8080 {
    type Registers = Registers;

    fn step(&mut self, bus: &mut B) -> u32 {
        let cycles = if self.regs.halted {
            HALTED_CYCLES
        } else {
            let pc = self.regs.pc;
            let opcode = self.fetch(bus);
            let instruction = decode(opcode);
            log::trace!("{pc:04X}  {opcode:02X}  {instruction}");
            self.execute(bus, opcode, instruction)
        };
        self.total_ticks += cycles;
        cycles
    }

    /// Accept an interrupt if INTE is set. The data byte is executed as an
    /// `RST` instruction: the current PC is pushed, PC jumps to the restart
    /// vector and INTE is cleared. A halted CPU resumes.
    fn interrupt(&mut self, bus: &mut B, data: u8) -> Option<u32> {
        if !self.regs.inte {
            log::debug!("interrupt {data:#04X} ignored, interrupts disabled");
            return None;
        }
        let Some(restart) = Restart::from_opcode(data) else {
            log::warn!("interrupt data {data:#04X} is not an RST opcode, ignored");
            return None;
        };

        self.regs.inte = false;
        self.regs.halted = false;
        self.push(bus, self.regs.pc);
        self.regs.pc = restart.vector();

        let cycles = Instruction::Rst(restart).cycles(true);
        self.total_ticks += cycles;
        log::debug!("interrupt RST {} accepted", restart.number());
        Some(cycles)
    }

    /// Clear every register and latch. Quirks are kept.
    fn reset(&mut self) {
        self.regs = Registers::default();
        self.total_ticks = Ticks::ZERO;
        self.unimplemented.clear();
        self.last_unimplemented = None;
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.regs.halted
    }

    fn total_ticks(&self) -> Ticks {
        self.total_ticks
    }
}

/// All query paths supported by the 8080.
const I8080_QUERY_PATHS: &[&str] = &[
    "a",
    "b",
    "c",
    "d",
    "e",
    "h",
    "l",
    "bc",
    "de",
    "hl",
    "psw",
    "sp",
    "pc",
    "flags.s",
    "flags.z",
    "flags.ac",
    "flags.p",
    "flags.cy",
    "inte",
    "halted",
    "ticks",
    "unimplemented",
    "last_unimplemented",
];

impl Observable for I8080 {
    fn query(&self, path: &str) -> Option<Value> {
        let flags = self.regs.flags;
        match path {
            "a" => Some(self.regs.a.into()),
            "b" => Some(self.regs.b.into()),
            "c" => Some(self.regs.c.into()),
            "d" => Some(self.regs.d.into()),
            "e" => Some(self.regs.e.into()),
            "h" => Some(self.regs.h.into()),
            "l" => Some(self.regs.l.into()),

            "bc" => Some(self.regs.bc().into()),
            "de" => Some(self.regs.de().into()),
            "hl" => Some(self.regs.hl().into()),
            "psw" => Some(self.regs.psw().into()),
            "sp" => Some(self.regs.sp.into()),
            "pc" => Some(self.regs.pc.into()),

            "flags.s" => Some(flags.sign.into()),
            "flags.z" => Some(flags.zero.into()),
            "flags.ac" => Some(flags.aux_carry().into()),
            "flags.p" => Some(flags.parity.into()),
            "flags.cy" => Some(flags.carry.into()),

            "inte" => Some(self.regs.inte.into()),
            "halted" => Some(self.regs.halted.into()),
            "ticks" => Some(self.total_ticks.get().into()),
            "unimplemented" => Some(self.unimplemented_count().into()),
            "last_unimplemented" => self.last_unimplemented.map(Value::from),

            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        I8080_QUERY_PATHS
    }
}
