//! Rounding to multiples and continued-fraction approximation.

use num_traits::{One, Zero};
use std::cmp::Ordering;

use calq_integers::{CalcError, Integer, Result, Rounding};

use crate::Rational;

/// Convergents `h/k` of a continued fraction, built one term at a time.
#[derive(Clone, Debug)]
struct Convergents {
    h: (Integer, Integer),
    k: (Integer, Integer),
}

impl Convergents {
    fn new() -> Self {
        Self {
            h: (Integer::zero(), Integer::one()),
            k: (Integer::one(), Integer::zero()),
        }
    }

    /// The convergent that would follow after appending `term`.
    fn peek(&self, term: &Integer) -> (Integer, Integer) {
        (term * &self.h.1 + &self.h.0, term * &self.k.1 + &self.k.0)
    }

    fn push(&mut self, next: (Integer, Integer)) {
        let h = std::mem::replace(&mut self.h.1, next.0);
        self.h.0 = h;
        let k = std::mem::replace(&mut self.k.1, next.1);
        self.k.0 = k;
    }

    fn last(&self) -> Rational {
        pair(&self.h.1, &self.k.1)
    }

    fn previous(&self) -> Rational {
        pair(&self.h.0, &self.k.0)
    }
}

fn pair(num: &Integer, den: &Integer) -> Rational {
    Rational::from_pair(num.clone(), den.clone()).unwrap_or_default()
}

/// Continued-fraction terms of a rational, by the Euclidean algorithm.
fn terms(x: &Rational) -> impl Iterator<Item = Integer> {
    let mut num = x.numerator();
    let mut den = x.denominator();
    std::iter::from_fn(move || {
        if den.is_zero() {
            return None;
        }
        let (q, r) = num.div_rem_floor(&den).ok()?;
        num = std::mem::replace(&mut den, r);
        Some(q)
    })
}

/// The rational with the smallest denominator in `[lo, hi]`.
fn simplest_between(lo: &Rational, hi: &Rational) -> Rational {
    if hi.is_negative() {
        return -simplest_between(&-hi, &-lo);
    }
    if !lo.is_positive() {
        return Rational::zero();
    }
    let mut convergents = Convergents::new();
    let (mut a, mut b) = (lo.clone(), hi.clone());
    loop {
        let fl = Rational::from_integer(a.floor_int());
        let term = if fl == a {
            Some(fl.numerator())
        } else if &fl + &Rational::one() <= b {
            Some(fl.numerator() + Integer::one())
        } else {
            None
        };
        if let Some(term) = term {
            let next = convergents.peek(&term);
            convergents.push(next);
            return convergents.last();
        }
        let next = convergents.peek(&fl.numerator());
        convergents.push(next);
        let lower = (&b - &fl).inverse().unwrap_or_default();
        let upper = (&a - &fl).inverse().unwrap_or_default();
        a = lower;
        b = upper;
    }
}

/// Best rational approximations from below and above with denominators
/// at most `limit`, for a value whose own denominator exceeds it.
///
/// One neighbour is the last convergent within the limit, the other the
/// largest semiconvergent that follows it.
fn bounded_neighbors(x: &Rational, limit: &Integer) -> (Rational, Rational) {
    let mut convergents = Convergents::new();
    for term in terms(x) {
        let next = convergents.peek(&term);
        if &next.1 > limit {
            break;
        }
        convergents.push(next);
    }
    let Convergents { h: (h0, h1), k: (k0, k1) } = &convergents;
    let j = &(limit - k0) / k1;
    let semi = pair(&(h0 + &(&j * h1)), &(k0 + &(&j * k1)));
    let last = convergents.last();
    if last < *x {
        (last, semi)
    } else {
        (semi, last)
    }
}

impl Rational {
    /// Nearest multiple of `eps` chosen by the rounding word; `eps == 0`
    /// returns the value unchanged.
    #[must_use]
    pub fn appr(&self, eps: &Rational, rounding: Rounding) -> Rational {
        if eps.is_zero() {
            return self.clone();
        }
        match self.quo(eps, rounding) {
            Ok(q) => eps * &Rational::from_integer(q),
            Err(_) => self.clone(),
        }
    }

    /// Rounds to `places` decimal places, or to `places` significant digits
    /// when the rounding word carries [`Rounding::EXACT`].
    #[must_use]
    pub fn round(&self, places: i64, rounding: Rounding) -> Rational {
        let places = if rounding.has(Rounding::EXACT) {
            if self.is_zero() {
                return self.clone();
            }
            places - self.ilog10().unwrap_or(0) - 1
        } else {
            places
        };
        self.appr(&Rational::power_of_ten(-places), rounding)
    }

    /// Rounds to `places` binary places, or significant bits with
    /// [`Rounding::EXACT`].
    #[must_use]
    pub fn bround(&self, places: i64, rounding: Rounding) -> Rational {
        let places = if rounding.has(Rounding::EXACT) {
            if self.is_zero() {
                return self.clone();
            }
            places - self.ilog2().unwrap_or(0) - 1
        } else {
            places
        };
        self.appr(&Rational::power_of_two(-places), rounding)
    }

    /// Smallest integer not below the value.
    #[must_use]
    pub fn ceil(&self) -> Rational {
        self.appr(&Rational::one(), Rounding::CEIL)
    }

    /// Largest integer not above the value.
    #[must_use]
    pub fn floor(&self) -> Rational {
        self.appr(&Rational::one(), Rounding::FLOOR)
    }

    /// Picks between the neighbours `lower < self < upper`.
    ///
    /// Rounding words resolve the choice as for a quotient by `eps_sign`;
    /// with [`Rounding::NEAREST`] the nearer wins and ties go to the smaller
    /// denominator.
    fn choose_neighbor(&self, lower: Rational, upper: Rational, rounding: Rounding, eps_sign: i8) -> Rational {
        let below = self - &lower;
        let above = &upper - self;
        if rounding.is_nearest() {
            return match below.cmp(&above) {
                Ordering::Less => lower,
                Ordering::Greater => upper,
                Ordering::Equal if upper.denominator() < lower.denominator() => upper,
                Ordering::Equal => lower,
            };
        }
        // the floor side of a quotient by eps is below for positive eps
        let (floor_side, ceil_side, frac) = if eps_sign > 0 {
            (lower, upper, below.cmp(&above))
        } else {
            (upper, lower, above.cmp(&below))
        };
        let floor_even = floor_side.numerator().is_even();
        let up = rounding.base().rounds_up(self.signum(), eps_sign, floor_even, frac);
        if up {
            ceil_side
        } else {
            floor_side
        }
    }

    /// Continued-fraction approximation.
    ///
    /// For `|eps| < 1` this is the simplest rational within `|eps|` on the
    /// side selected by the rounding word, or within `|eps|/2` on either
    /// side with [`Rounding::NEAREST`]. For `|eps| >= 1` it is the closest
    /// rational below or above with denominator at most `floor(|eps|)`.
    #[must_use]
    pub fn cfappr(&self, eps: &Rational, rounding: Rounding) -> Rational {
        if eps.is_zero() || self.is_integer() {
            return self.clone();
        }
        let width = eps.abs();
        let eps_sign = eps.signum();
        if width < Rational::one() {
            if rounding.is_nearest() {
                let half = width.scale(-1);
                return simplest_between(&(self - &half), &(self + &half));
            }
            let lower = simplest_between(&(self - &width), self);
            let upper = simplest_between(self, &(self + &width));
            if lower == *self || upper == *self {
                return self.clone();
            }
            return self.choose_neighbor(lower, upper, rounding, eps_sign);
        }
        let limit = width.floor_int();
        if self.denominator() <= limit {
            return self.clone();
        }
        let (lower, upper) = bounded_neighbors(self, &limit);
        self.choose_neighbor(lower, upper, rounding, eps_sign)
    }

    /// Continued-fraction simplification: one of the two Stern-Brocot
    /// parents of the value, chosen by the rounding word. Integers are
    /// returned unchanged.
    #[must_use]
    pub fn cfsim(&self, rounding: Rounding) -> Rational {
        if self.is_integer() {
            return self.clone();
        }
        let mut convergents = Convergents::new();
        for term in terms(self) {
            let next = convergents.peek(&term);
            convergents.push(next);
        }
        // self = h1/k1; the parents are h0/k0 and (h1-h0)/(k1-k0)
        let first = convergents.previous();
        let second = pair(
            &(&convergents.h.1 - &convergents.h.0),
            &(&convergents.k.1 - &convergents.k.0),
        );
        let (lower, upper) = if first < second { (first, second) } else { (second, first) };
        self.choose_neighbor(lower, upper, rounding, 1)
    }
}

/// Validates an epsilon argument for transcendental functions.
pub(crate) fn positive_epsilon(eps: &Rational) -> Result<()> {
    if eps.is_positive() {
        Ok(())
    } else {
        Err(CalcError::domain("epsilon must be positive"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> Rational {
        s.parse().unwrap()
    }

    fn r(bits: u32) -> Rounding {
        Rounding::new(bits)
    }

    #[test]
    fn test_appr_table() {
        let x = q("5.44");
        let eps = q(".1");
        let expected = [
            (0, "5.4"), (1, "5.5"), (2, "5.4"), (3, "5.5"), (4, "5.4"), (5, "5.5"),
            (6, "5.4"), (7, "5.5"), (8, "5.4"), (9, "5.5"), (16, "5.4"), (24, "5.4"),
        ];
        for (bits, want) in expected {
            assert_eq!(x.appr(&eps, r(bits)), q(want), "mode {bits}");
        }
        let y = q("-5.44");
        assert_eq!(y.appr(&eps, r(0)), q("-5.5"));
        assert_eq!(y.appr(&eps, r(2)), q("-5.4"));
        assert_eq!(y.appr(&q("-.1"), r(0)), q("-5.4"));
        assert_eq!(q("5.45").appr(&eps, r(24)), q("5.4"));
        assert_eq!(q("5.55").appr(&eps, r(24)), q("5.6"));
        assert_eq!(x.appr(&Rational::zero(), r(0)), x);
    }

    #[test]
    fn test_round_and_bround() {
        let x = q("7/32");
        assert_eq!(x.round(3, Rounding::NEAREST_EVEN), q(".219"));
        assert_eq!(x.round(3, r(0)), q(".218"));
        assert_eq!(x.bround(3, Rounding::NEAREST_EVEN), q(".25"));
        assert_eq!(x.bround(5, Rounding::NEAREST_EVEN), q(".21875"));
        assert_eq!(x.bround(4, r(0)), q(".1875"));
        assert_eq!(q("123.456").round(2, r(24 + 32)), q("120"));
        assert_eq!(q("123.456").round(-1, Rounding::NEAREST_EVEN), q("120"));
        assert_eq!(q("-3.5").round(0, Rounding::NEAREST_EVEN), q("-4"));
    }

    #[test]
    fn test_ceil_floor() {
        assert_eq!(q("-3.125").ceil(), q("-3"));
        assert_eq!(q("-3.125").floor(), q("-4"));
        assert_eq!(q("7/2").ceil(), q("4"));
        assert_eq!(q("5").floor(), q("5"));
    }

    #[test]
    fn test_cfappr_bounded_denominator() {
        let x = q("17/12");
        assert_eq!(x.cfappr(&q("4"), r(0)), q("4/3"));
        assert_eq!(x.cfappr(&q("4"), r(1)), q("3/2"));
        assert_eq!(x.cfappr(&q("4"), r(16)), q("3/2"));
        let y = q("43/30");
        assert_eq!(y.cfappr(&q("10"), r(0)), q("10/7"));
        assert_eq!(y.cfappr(&q("10"), r(1)), q("13/9"));
        assert_eq!(y.cfappr(&q("10"), r(16)), q("10/7"));
        assert_eq!(y.cfappr(&q("100"), r(0)), y);
        assert_eq!(y.cfappr(&Rational::zero(), r(0)), y);

        let pi = q("3.1415926535897932384626");
        assert_eq!(pi.cfappr(&q("100"), r(0)), q("311/99"));
        assert_eq!(pi.cfappr(&q("100"), r(1)), q("22/7"));
        assert_eq!(pi.cfappr(&q("100"), r(16)), q("311/99"));
    }

    #[test]
    fn test_cfappr_within_epsilon() {
        let pi = q("3.1415926535897932384626");
        assert_eq!(pi.cfappr(&q(".01"), r(16)), q("22/7"));
        assert_eq!(pi.cfappr(&q("1e-6"), r(16)), q("355/113"));
        assert_eq!(pi.cfappr(&q(".01"), r(0)), q("47/15"));
        assert_eq!(pi.cfappr(&q(".01"), r(1)), q("22/7"));
        assert_eq!(q("-17/12").cfappr(&q(".1"), r(16)), q("-7/5"));
    }

    #[test]
    fn test_cfsim() {
        let x = q("43/30");
        assert_eq!(x.cfsim(r(8)), q("10/7"));
        assert_eq!(x.cfsim(r(0)), q("10/7"));
        assert_eq!(x.cfsim(r(1)), q("33/23"));
        assert_eq!(x.cfsim(r(16)), q("33/23"));
        assert_eq!(q("10/7").cfsim(r(8)), q("3/2"));
        assert_eq!(q("3/2").cfsim(r(0)), q("1"));
        assert_eq!(q("3/2").cfsim(r(1)), q("2"));
        assert_eq!(q("5").cfsim(r(8)), q("5"));
    }

    #[test]
    fn test_simplest_between() {
        assert_eq!(simplest_between(&q("0.3"), &q("0.35")), q("1/3"));
        assert_eq!(simplest_between(&q("-0.35"), &q("-0.3")), q("-1/3"));
        assert_eq!(simplest_between(&q("-1/2"), &q("1/2")), q("0"));
        assert_eq!(simplest_between(&q("2.5"), &q("3.5")), q("3"));
    }
}
