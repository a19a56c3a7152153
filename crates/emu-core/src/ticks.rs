//! Cycle counts.

use std::fmt;
use std::ops::{AddAssign, Sub};

/// Running total of CPU clock cycles.
///
/// Instructions report a `u32` cost; the total only ever grows, so the
/// difference of two readings is the cost of whatever ran between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ticks(u64);

impl Ticks {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(count: u64) -> Self {
        Self(count)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl AddAssign<u32> for Ticks {
    fn add_assign(&mut self, cycles: u32) {
        self.0 += u64::from(cycles);
    }
}

/// Elapsed cycles between two readings. Saturates if `rhs` is later.
impl Sub for Ticks {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cycles", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_instruction_costs() {
        let mut total = Ticks::ZERO;
        for cycles in [4, 10, 7, 11] {
            total += cycles;
        }
        assert_eq!(total.get(), 32);
        assert_eq!(total.to_string(), "32 cycles");
    }

    #[test]
    fn elapsed_saturates() {
        assert_eq!(Ticks::new(40) - Ticks::new(15), Ticks::new(25));
        assert_eq!(Ticks::new(15) - Ticks::new(40), Ticks::ZERO);
    }
}
