//! Top-level board.
//!
//! # Frame loop
//!
//! The CPU runs at 2 MHz and the display at 60 Hz, so a frame is 33,333
//! cycles and an interrupt falls due every 16,666. `run_half_frame()` steps
//! the CPU until the counter reaches that threshold, then at the boundary:
//! 1. applies scripted input due this frame,
//! 2. offers the next vblank interrupt to the CPU,
//! 3. copies the framebuffer into the frame snapshot,
//! 4. resets the counter to 0.

use emu_core::{Cpu, Observable, Ticks, Value, parse_address};
use intel_8080::I8080;

use crate::bus::InvadersBus;
use crate::config::InvadersConfig;
use crate::error::InvadersError;
use crate::input::{Button, InputQueue};
use crate::interrupt::VblankInterrupt;
use crate::rom::RomSet;

/// Start of video RAM.
pub const FRAMEBUFFER_BASE: u16 = 0x2400;

/// Video RAM size: 224 rows of 32 bytes, 1 bit per pixel.
pub const FRAMEBUFFER_LEN: usize = 0x1C00;

/// Space Invaders board.
pub struct Invaders {
    cpu: I8080,
    bus: InvadersBus,
    vblank: VblankInterrupt,
    /// Timed input event queue for scripted sequences.
    input_queue: InputQueue,
    /// Stack pointer loaded at power-on and reset.
    initial_sp: u16,
    /// Cycles between interrupts.
    half_frame_cycles: u32,
    /// Cycles since the last boundary.
    cycle_counter: u32,
    /// Completed half-frame counter.
    half_frame_count: u64,
    /// Framebuffer copy taken at the last boundary.
    frame: Box<[u8]>,
}

impl Invaders {
    /// Validate the configuration, load the ROMs and power on.
    pub fn new(config: &InvadersConfig, roms: &RomSet) -> Result<Self, InvadersError> {
        config.validate()?;
        let half_frame_cycles = config.half_frame_cycles()?;
        let (start, end) = config.vblank_restarts()?;

        let mut bus = InvadersBus::new();
        roms.load_into(&mut bus.memory);

        let mut cpu = I8080::with_quirks(config.quirks);
        cpu.regs.sp = config.initial_sp;

        log::info!(
            "board ready: {half_frame_cycles} cycles per half frame, vblank RST {} / RST {}",
            start.number(),
            end.number()
        );

        Ok(Self {
            cpu,
            bus,
            vblank: VblankInterrupt::new(start, end),
            input_queue: InputQueue::new(),
            initial_sp: config.initial_sp,
            half_frame_cycles,
            cycle_counter: 0,
            half_frame_count: 0,
            frame: vec![0; FRAMEBUFFER_LEN].into_boxed_slice(),
        })
    }

    /// Execute one instruction. Returns its cycle cost.
    pub fn step(&mut self) -> u32 {
        let cycles = self.cpu.step(&mut self.bus);
        self.cycle_counter = self.cycle_counter.saturating_add(cycles);
        cycles
    }

    /// Run until the next interrupt boundary and handle it.
    ///
    /// Returns the CPU cycles executed, including any interrupt entry.
    pub fn run_half_frame(&mut self) -> u64 {
        let start_ticks = self.total_ticks();

        while self.cycle_counter < self.half_frame_cycles {
            self.step();
        }
        self.end_half_frame();

        (self.total_ticks() - start_ticks).get()
    }

    /// Run two half frames. Returns the CPU cycles executed.
    pub fn run_frame(&mut self) -> u64 {
        self.run_half_frame() + self.run_half_frame()
    }

    fn end_half_frame(&mut self) {
        self.input_queue
            .process(self.frame_count(), &mut self.bus.inputs);

        if self.vblank.service(&mut self.cpu, &mut self.bus).is_none() {
            log::trace!(
                "half frame {}: interrupts disabled at {:#06X}",
                self.half_frame_count,
                self.cpu.regs.pc
            );
        }

        self.frame
            .copy_from_slice(self.bus.memory.slice(FRAMEBUFFER_BASE, FRAMEBUFFER_LEN));
        self.cycle_counter = 0;
        self.half_frame_count += 1;
    }

    /// Live video RAM.
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        self.bus.memory.slice(FRAMEBUFFER_BASE, FRAMEBUFFER_LEN)
    }

    /// Video RAM as it was at the last half-frame boundary.
    #[must_use]
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    #[must_use]
    pub fn cpu(&self) -> &I8080 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut I8080 {
        &mut self.cpu
    }

    #[must_use]
    pub fn bus(&self) -> &InvadersBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut InvadersBus {
        &mut self.bus
    }

    #[must_use]
    pub fn vblank(&self) -> &VblankInterrupt {
        &self.vblank
    }

    /// Cycles the CPU has executed since power-on or reset.
    #[must_use]
    pub fn total_ticks(&self) -> Ticks {
        Cpu::<InvadersBus>::total_ticks(&self.cpu)
    }

    #[must_use]
    pub const fn half_frame_cycles(&self) -> u32 {
        self.half_frame_cycles
    }

    /// Cycles since the last half-frame boundary.
    #[must_use]
    pub const fn cycle_counter(&self) -> u32 {
        self.cycle_counter
    }

    #[must_use]
    pub const fn half_frame_count(&self) -> u64 {
        self.half_frame_count
    }

    /// Completed whole frames.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.half_frame_count / 2
    }

    /// Timed input event queue for scripted sequences.
    pub fn input_queue(&mut self) -> &mut InputQueue {
        &mut self.input_queue
    }

    pub fn press(&mut self, button: Button) {
        self.bus.inputs.set_button(button, true);
    }

    pub fn release(&mut self, button: Button) {
        self.bus.inputs.set_button(button, false);
    }

    /// Reset the CPU, the shifter, the inputs and the frame timing. Memory
    /// is kept, so the ROMs stay loaded.
    pub fn reset(&mut self) {
        Cpu::<InvadersBus>::reset(&mut self.cpu);
        self.cpu.regs.sp = self.initial_sp;
        self.bus.shifter.reset();
        self.bus.inputs.reset();
        self.vblank.reset();
        self.input_queue.clear();
        self.cycle_counter = 0;
        self.half_frame_count = 0;
        self.frame.fill(0);
    }
}

impl Observable for Invaders {
    fn query(&self, path: &str) -> Option<Value> {
        // Route queries to sub-components
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("shifter.") {
            self.bus.shifter.query(rest)
        } else if let Some(rest) = path.strip_prefix("inputs.port") {
            rest.parse()
                .ok()
                .and_then(|port| self.bus.inputs.get(port))
                .map(Value::from)
        } else if let Some(rest) = path.strip_prefix("memory.") {
            parse_address(rest).map(|addr| Value::U8(self.bus.memory.peek(addr)))
        } else {
            match path {
                "vblank.next" => Some(self.vblank.phase().name().into()),
                "vblank.vector" => Some(self.vblank.next_restart().vector().into()),
                "half_frame_count" => Some(self.half_frame_count.into()),
                "frame_count" => Some(self.frame_count().into()),
                "cycle_counter" => Some(self.cycle_counter.into()),
                "ticks" => Some(self.total_ticks().get().into()),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<i8080_paths>",
            "shifter.offset",
            "shifter.window",
            "shifter.result",
            "inputs.port0",
            "inputs.port1",
            "inputs.port2",
            "memory.<address>",
            "vblank.next",
            "vblank.vector",
            "half_frame_count",
            "frame_count",
            "cycle_counter",
            "ticks",
        ]
    }
}
