//! Coercion of stored strings into primitive values

use std::str::FromStr;

use rust_decimal::Decimal;

/// A type that can be read from a single stored value
///
/// Implementations return `None` on anything they cannot parse so getters
/// can fall back to a caller-supplied default.
pub trait FromScalar: Sized {
    /// Parse `raw`, or `None` if it is not a valid `Self`
    fn from_scalar(raw: &str) -> Option<Self>;
}

macro_rules! parse_scalar {
    (exact: $($ty:ty),* $(,)?) => {
        $(
            impl FromScalar for $ty {
                fn from_scalar(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }
            }
        )*
    };
    (trimmed: $($ty:ty),* $(,)?) => {
        $(
            impl FromScalar for $ty {
                fn from_scalar(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )*
    };
}

// Integers must be exact; floats tolerate surrounding whitespace
parse_scalar!(exact: i16, i32, i64, u16, u32, u64);
parse_scalar!(trimmed: f32, f64);

/// `true` in any case is true, anything else is false
impl FromScalar for bool {
    fn from_scalar(raw: &str) -> Option<Self> {
        Some(raw.eq_ignore_ascii_case("true"))
    }
}

impl FromScalar for Decimal {
    fn from_scalar(raw: &str) -> Option<Self> {
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .ok()
    }
}

impl FromScalar for String {
    fn from_scalar(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}
