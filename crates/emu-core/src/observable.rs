//! Read-only state queries by path.
//!
//! Tests and the command line inspect machines through this interface
//! without touching emulation state.

use std::fmt;

/// The result of a state query.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    String(String),
}

/// Bytes and words print as hex, counters as decimal.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::U8(byte) => write!(f, "{byte:#04X}"),
            Self::U16(word) => write!(f, "{word:#06X}"),
            Self::U32(count) => write!(f, "{count}"),
            Self::U64(count) => write!(f, "{count}"),
            Self::String(text) => f.write_str(text),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(inner: $ty) -> Self {
                    Self::$variant(inner)
                }
            }
        )*
    };
}

value_from!(bool => Bool, u8 => U8, u16 => U16, u32 => U32, u64 => U64);

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::String(text.to_owned())
    }
}

/// A component whose state can be inspected.
pub trait Observable {
    /// Look up one dotted path (`pc`, `flags.cy`, `shifter.offset`).
    /// Unknown paths yield `None`.
    fn query(&self, path: &str) -> Option<Value>;

    /// The fixed paths this component answers. Prefix families such as
    /// `memory.<address>` are listed by their prefix.
    fn query_paths(&self) -> &'static [&'static str];
}

/// Parse the address part of a `memory.<address>` query.
///
/// Accepts `0x2400`, `$2400` or plain decimal.
#[must_use]
pub fn parse_address(text: &str) -> Option<u16> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else if let Some(hex) = text.strip_prefix('$') {
        u16::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}
