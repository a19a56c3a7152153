//! 8080 condition flags.
//!
//! The flag byte pushed by `PUSH PSW` is laid out as `S Z 0 AC 0 P 1 CY`.
//! Auxiliary carry is never computed: its bit position is reserved and
//! always packed as 0.

/// Sign flag (bit 7) - copy of bit 7 of the result.
pub const SF: u8 = 0b1000_0000;

/// Zero flag (bit 6) - set if the result is zero.
pub const ZF: u8 = 0b0100_0000;

/// Auxiliary carry flag (bit 4) - not modelled, always packed as 0.
pub const AF: u8 = 0b0001_0000;

/// Parity flag (bit 2) - set if the result has even parity.
pub const PF: u8 = 0b0000_0100;

/// Bit 1 always reads back as 1.
pub const FIXED_ONE: u8 = 0b0000_0010;

/// Carry flag (bit 0) - carry out of bit 7, or borrow.
pub const CF: u8 = 0b0000_0001;

/// True if the low 8 bits of `result` are zero.
#[must_use]
pub const fn zero(result: u16) -> bool {
    result & 0xFF == 0
}

/// True if bit 7 of `result` is set.
#[must_use]
pub const fn sign(result: u16) -> bool {
    result & 0x80 != 0
}

/// True if the low `size` bits of `result` hold an even number of ones.
#[must_use]
pub const fn parity(result: u16, size: u32) -> bool {
    let masked = if size >= 16 {
        result
    } else {
        result & ((1 << size) - 1)
    };
    masked.count_ones() & 1 == 0
}

/// The four tracked condition flags plus the auxiliary-carry stub.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub zero: bool,
    pub sign: bool,
    pub parity: bool,
    pub carry: bool,
    aux_carry: bool,
}

impl Flags {
    /// Update Zero, Sign and Parity from an 8-bit result.
    pub fn set_zsp(&mut self, result: u16) {
        self.zero = zero(result);
        self.sign = sign(result);
        self.parity = parity(result, 8);
    }

    /// Auxiliary carry. Never computed, so always false.
    #[must_use]
    pub const fn aux_carry(&self) -> bool {
        self.aux_carry
    }

    /// Pack into the PSW flag byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        let mut f = FIXED_ONE;
        if self.sign {
            f |= SF;
        }
        if self.zero {
            f |= ZF;
        }
        if self.aux_carry {
            f |= AF;
        }
        if self.parity {
            f |= PF;
        }
        if self.carry {
            f |= CF;
        }
        f
    }

    /// Unpack a PSW flag byte. Reserved bits and AC are ignored.
    #[must_use]
    pub const fn from_byte(f: u8) -> Self {
        Self {
            zero: f & ZF != 0,
            sign: f & SF != 0,
            parity: f & PF != 0,
            carry: f & CF != 0,
            aux_carry: false,
        }
    }
}
