//! ALU operations for the 8080.
//!
//! These compute the result and the carry out. Zero, Sign and Parity are
//! derived from the stored result by the caller via `Flags::set_zsp`.

#![allow(clippy::cast_possible_truncation)] // Intentional truncation for low byte extraction.

/// Result of an 8-bit ALU operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluResult {
    pub value: u8,
    pub carry: bool,
}

/// Add with optional carry in. Carry out is set when the sum exceeds 0xFF.
#[must_use]
pub fn add(a: u8, b: u8, carry: bool) -> AluResult {
    let sum = u16::from(a) + u16::from(b) + u16::from(carry);
    AluResult {
        value: sum as u8,
        carry: sum > 0xFF,
    }
}

/// Subtract with optional borrow in. Carry out is the borrow.
#[must_use]
pub fn sub(a: u8, b: u8, borrow: bool) -> AluResult {
    let subtrahend = u16::from(b) + u16::from(borrow);
    AluResult {
        value: a.wrapping_sub(b).wrapping_sub(u8::from(borrow)),
        carry: subtrahend > u16::from(a),
    }
}

#[must_use]
pub fn and(a: u8, b: u8) -> AluResult {
    AluResult {
        value: a & b,
        carry: false,
    }
}

#[must_use]
pub fn xor(a: u8, b: u8) -> AluResult {
    AluResult {
        value: a ^ b,
        carry: false,
    }
}

#[must_use]
pub fn or(a: u8, b: u8) -> AluResult {
    AluResult {
        value: a | b,
        carry: false,
    }
}

/// 16-bit add for DAD. Only the carry out of bit 15 is reported.
#[must_use]
pub fn dad(hl: u16, rp: u16) -> (u16, bool) {
    hl.overflowing_add(rp)
}

/// Rotate left, bit 7 into both bit 0 and carry.
#[must_use]
pub fn rlc(a: u8) -> AluResult {
    AluResult {
        value: a.rotate_left(1),
        carry: a & 0x80 != 0,
    }
}

/// Rotate right, bit 0 into both bit 7 and carry.
#[must_use]
pub fn rrc(a: u8) -> AluResult {
    AluResult {
        value: a.rotate_right(1),
        carry: a & 0x01 != 0,
    }
}

/// Rotate left through carry.
#[must_use]
pub fn ral(a: u8, carry: bool) -> AluResult {
    AluResult {
        value: (a << 1) | u8::from(carry),
        carry: a & 0x80 != 0,
    }
}

/// Rotate right through carry.
#[must_use]
pub fn rar(a: u8, carry: bool) -> AluResult {
    AluResult {
        value: (a >> 1) | (u8::from(carry) << 7),
        carry: a & 0x01 != 0,
    }
}

/// Decimal adjust.
///
/// The low nibble is corrected when it exceeds 9 (auxiliary carry is not
/// tracked, so it never forces the correction). The high nibble is then
/// corrected when it exceeds 9 or carry is set. Carry is set if that
/// correction overflows and otherwise left as it was.
#[must_use]
pub fn daa(a: u8, carry: bool) -> AluResult {
    let mut value = a;
    let mut carry = carry;

    if value & 0x0F > 9 {
        value = value.wrapping_add(0x06);
    }

    let high = value >> 4;
    if high > 9 || carry {
        let corrected = high + 6;
        if corrected > 0x0F {
            carry = true;
        }
        value = (value & 0x0F) | ((corrected & 0x0F) << 4);
    }

    AluResult { value, carry }
}
