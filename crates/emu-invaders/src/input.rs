//! Input handling for the Space Invaders board.
//!
//! Three layers:
//! 1. `Button` - logical cabinet controls mapped to (port, bit).
//! 2. `InputPorts` - the input-port bytes the CPU reads with IN.
//! 3. `InputQueue` - timed button events for scripted sequences.
//!
//! Port 1 carries coin, the start buttons and player 1's controls. Port 2
//! carries player 2's controls, tilt and the DIP switches. All buttons are
//! active high.

use std::collections::VecDeque;
use std::str::FromStr;

use crate::error::ParseButtonError;

/// Power-on values of ports 0, 1 and 2. Port 2 sets the DIP switches for
/// six lives and coin info shown.
const PORT_DEFAULTS: [u8; 3] = [0x00, 0x00, 0b1000_0011];

/// Logical cabinet control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Coin,
    P1Start,
    P2Start,
    P1Fire,
    P1Left,
    P1Right,
    P2Fire,
    P2Left,
    P2Right,
    Tilt,
}

impl Button {
    /// Return the (port, bit) pair for this button.
    #[must_use]
    pub const fn port_bit(self) -> (u8, u8) {
        match self {
            Self::Coin => (1, 0),
            Self::P2Start => (1, 1),
            Self::P1Start => (1, 2),
            Self::P1Fire => (1, 4),
            Self::P1Left => (1, 5),
            Self::P1Right => (1, 6),
            Self::Tilt => (2, 2),
            Self::P2Fire => (2, 4),
            Self::P2Left => (2, 5),
            Self::P2Right => (2, 6),
        }
    }
}

impl FromStr for Button {
    type Err = ParseButtonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "coin" => Ok(Self::Coin),
            "p1-start" | "start1" => Ok(Self::P1Start),
            "p2-start" | "start2" => Ok(Self::P2Start),
            "p1-fire" | "fire" => Ok(Self::P1Fire),
            "p1-left" | "left" => Ok(Self::P1Left),
            "p1-right" | "right" => Ok(Self::P1Right),
            "p2-fire" => Ok(Self::P2Fire),
            "p2-left" => Ok(Self::P2Left),
            "p2-right" => Ok(Self::P2Right),
            "tilt" => Ok(Self::Tilt),
            _ => Err(ParseButtonError(s.to_string())),
        }
    }
}

/// Input-port bytes.
///
/// Port 0 exists on the board but nothing in the game reads it, so the
/// I/O map does not decode it. It is still stored and settable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPorts {
    ports: [u8; 3],
}

impl InputPorts {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ports: PORT_DEFAULTS,
        }
    }

    /// Current value of an input port, or `None` for ports beyond 2.
    #[must_use]
    pub fn get(&self, port: u8) -> Option<u8> {
        self.ports.get(usize::from(port)).copied()
    }

    /// Set or clear the bit for a button.
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        let (port, bit) = button.port_bit();
        let slot = &mut self.ports[usize::from(port)];
        if pressed {
            *slot |= 1 << bit;
        } else {
            *slot &= !(1 << bit);
        }
    }

    #[must_use]
    pub fn is_pressed(&self, button: Button) -> bool {
        let (port, bit) = button.port_bit();
        self.ports[usize::from(port)] & (1 << bit) != 0
    }

    /// Release every button and restore the DIP switches.
    pub fn reset(&mut self) {
        self.ports = PORT_DEFAULTS;
    }
}

impl Default for InputPorts {
    fn default() -> Self {
        Self::new()
    }
}

/// A timed button event.
#[derive(Debug, Clone)]
pub struct InputEvent {
    /// Frame number at which this event fires.
    pub frame: u64,
    /// Which button.
    pub button: Button,
    /// True = press, false = release.
    pub pressed: bool,
}

/// Timed input queue for scripted button sequences.
///
/// Events are sorted by frame number and applied at half-frame boundaries.
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Enqueue a raw input event.
    pub fn push(&mut self, event: InputEvent) {
        // Insert in sorted order by frame.
        let pos = self
            .events
            .iter()
            .position(|e| e.frame > event.frame)
            .unwrap_or(self.events.len());
        self.events.insert(pos, event);
    }

    /// Enqueue a button press and release.
    ///
    /// The button is pressed at `at_frame` and released at
    /// `at_frame + hold_frames`.
    pub fn enqueue_button(&mut self, button: Button, at_frame: u64, hold_frames: u64) {
        self.push(InputEvent {
            frame: at_frame,
            button,
            pressed: true,
        });
        self.push(InputEvent {
            frame: at_frame + hold_frames,
            button,
            pressed: false,
        });
    }

    /// Apply all events due at or before `frame`.
    pub fn process(&mut self, frame: u64, ports: &mut InputPorts) {
        while self.events.front().is_some_and(|e| e.frame <= frame) {
            if let Some(event) = self.events.pop_front() {
                log::debug!(
                    "frame {frame}: {:?} {}",
                    event.button,
                    if event.pressed { "pressed" } else { "released" }
                );
                ports.set_button(event.button, event.pressed);
            }
        }
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
