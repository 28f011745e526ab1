//! Rounding flag words.
//!
//! Quotients, approximations and roots that are not exact are resolved by a
//! flag word. The low four bits select a rule for non-exact quotients
//! `t = x / y`, where `q` is the chosen integer and `r = x - q*y`:
//!
//! | bits | rule |
//! |------|------|
//! | 0 | `r` has the sign of `y` (floor) |
//! | 1 | `r` has the sign of `-y` (ceiling) |
//! | 2 | `r` has the sign of `x` (toward zero) |
//! | 3 | `r` has the sign of `-x` (away from zero) |
//! | 4, 5 | `r` positive, negative |
//! | 6, 7 | `r` has the sign of `x/y`, of `-x/y` |
//! | 8, 9 | `q` even, odd |
//! | 10, 11 | `q` even (odd) if `x/y > 0`, else odd (even) |
//! | 12, 13 | `q` even (odd) if `y > 0`, else odd (even) |
//! | 14, 15 | `q` even (odd) if `x > 0`, else odd (even) |
//!
//! Bit 16 rounds to nearest and uses the rule above only for exact ties.
//! Bit 32 and bit 64 carry operation-specific meaning (significant digits
//! for `round`, exact/negative roots for `sqrt`).

use std::cmp::Ordering;
use std::fmt;

/// A rounding flag word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rounding(u32);

impl Rounding {
    /// Round the quotient down.
    pub const FLOOR: Self = Self(0);
    /// Round the quotient up.
    pub const CEIL: Self = Self(1);
    /// Round the quotient toward zero.
    pub const TRUNC: Self = Self(2);
    /// Round the quotient away from zero.
    pub const AWAY: Self = Self(3);
    /// Round to nearest, ties to even.
    pub const NEAREST_EVEN: Self = Self(24);

    /// Bit selecting round-to-nearest.
    pub const NEAREST: u32 = 16;
    /// Bit selecting significant digits (round) or exact roots (sqrt).
    pub const EXACT: u32 = 32;
    /// Bit selecting the negative square root.
    pub const NEGATE: u32 = 64;

    /// Largest accepted flag word (exclusive).
    pub const LIMIT: u64 = 1 << 31;

    /// Wraps a raw flag word.
    #[must_use]
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw flag word.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if the given bit(s) are set.
    #[must_use]
    pub const fn has(self, bit: u32) -> bool {
        self.0 & bit != 0
    }

    /// True when round-to-nearest is selected.
    #[must_use]
    pub const fn is_nearest(self) -> bool {
        self.has(Self::NEAREST)
    }

    /// Returns the same word with the operation-specific high bits removed.
    #[must_use]
    pub const fn base(self) -> Self {
        Self(self.0 & 31)
    }

    /// Decides whether a non-exact quotient rounds up from its floor.
    ///
    /// `x_sign` and `y_sign` are the signs (-1 or 1) of dividend and divisor,
    /// `floor_even` is the parity of `floor(x/y)` and `frac_vs_half` compares
    /// the fractional part of `x/y` with one half.
    #[must_use]
    pub fn rounds_up(self, x_sign: i8, y_sign: i8, floor_even: bool, frac_vs_half: Ordering) -> bool {
        if self.is_nearest() {
            match frac_vs_half {
                Ordering::Less => return false,
                Ordering::Greater => return true,
                Ordering::Equal => {}
            }
        }

        let positive_quotient = x_sign == y_sign;
        // Taking the floor leaves a remainder with the divisor's sign.
        let remainder_sign = |sign: i8| sign != y_sign;
        let parity = |want_even: bool| want_even != floor_even;

        match self.0 & 15 {
            0 => false,
            1 => true,
            2 => remainder_sign(x_sign),
            3 => remainder_sign(-x_sign),
            4 => remainder_sign(1),
            5 => remainder_sign(-1),
            6 => remainder_sign(if positive_quotient { 1 } else { -1 }),
            7 => remainder_sign(if positive_quotient { -1 } else { 1 }),
            8 => parity(true),
            9 => parity(false),
            10 => parity(positive_quotient),
            11 => parity(!positive_quotient),
            12 => parity(y_sign > 0),
            13 => parity(y_sign < 0),
            14 => parity(x_sign > 0),
            _ => parity(x_sign < 0),
        }
    }
}

impl From<u32> for Rounding {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Debug for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rounding({})", self.0)
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_rules() {
        // 5.44 / 0.1 = 54.4, floor 54 (even)
        let r = |bits| Rounding::new(bits).rounds_up(1, 1, true, Ordering::Less);
        assert!(!r(0));
        assert!(r(1));
        assert!(!r(2));
        assert!(r(3));
        assert!(r(9));
        // -5.44 / 0.1 = -54.4, floor -55 (odd)
        let r = |bits| Rounding::new(bits).rounds_up(-1, 1, false, Ordering::Greater);
        assert!(!r(0));
        assert!(r(2));
        assert!(!r(3));
        assert!(r(6));
        assert!(!r(9));
    }

    #[test]
    fn test_nearest() {
        assert!(!Rounding::NEAREST_EVEN.rounds_up(1, 1, true, Ordering::Less));
        assert!(Rounding::NEAREST_EVEN.rounds_up(1, 1, true, Ordering::Greater));
        // tie from an even floor stays
        assert!(!Rounding::NEAREST_EVEN.rounds_up(1, 1, true, Ordering::Equal));
        assert!(Rounding::NEAREST_EVEN.rounds_up(1, 1, false, Ordering::Equal));
    }

    #[test]
    fn test_bits() {
        let r = Rounding::new(24 | Rounding::NEGATE);
        assert!(r.has(Rounding::NEGATE));
        assert!(!r.has(Rounding::EXACT));
        assert_eq!(r.base(), Rounding::NEAREST_EVEN);
    }
}
