//! Complex values over exact rationals.
//!
//! A [`Complex`] is an immutable pair of [`Rational`] parts. Arithmetic is
//! exact; rounding operations act on each part independently.

use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use calq_integers::{CalcError, Integer, Result, Rounding};
use calq_rational::Rational;

/// Results of integer powers are limited to this many bits per part.
const POWER_BIT_LIMIT: u64 = 1 << 28;

/// Upper bound (exclusive) on the number of factors in [`Complex::comb`].
const PRODUCT_LIMIT: u64 = 1 << 24;

/// A complex number with rational real and imaginary parts.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Complex {
    re: Rational,
    im: Rational,
}

impl Complex {
    /// Creates `re + im*i`.
    #[must_use]
    pub fn new(re: Rational, im: Rational) -> Self {
        Self { re, im }
    }

    /// Creates `re + im*i` from machine integers.
    #[must_use]
    pub fn from_i64(re: i64, im: i64) -> Self {
        Self::new(Rational::from(re), Rational::from(im))
    }

    /// The imaginary unit.
    #[must_use]
    pub fn i() -> Self {
        Self::from_i64(0, 1)
    }

    /// Real part.
    #[must_use]
    pub fn re(&self) -> &Rational {
        &self.re
    }

    /// Imaginary part.
    #[must_use]
    pub fn im(&self) -> &Rational {
        &self.im
    }

    /// Splits into `(re, im)`.
    #[must_use]
    pub fn into_parts(self) -> (Rational, Rational) {
        (self.re, self.im)
    }

    /// The real part when the imaginary part is zero.
    #[must_use]
    pub fn to_real(&self) -> Option<Rational> {
        self.is_real().then(|| self.re.clone())
    }

    fn map(&self, f: impl Fn(&Rational) -> Rational) -> Self {
        Self::new(f(&self.re), f(&self.im))
    }

    fn try_map(&self, f: impl Fn(&Rational) -> Result<Rational>) -> Result<Self> {
        Ok(Self::new(f(&self.re)?, f(&self.im)?))
    }

    // Predicates

    /// True when the imaginary part is zero.
    #[must_use]
    pub fn is_real(&self) -> bool {
        self.im.is_zero()
    }

    /// True when the real part is zero and the imaginary part is not.
    #[must_use]
    pub fn is_imag(&self) -> bool {
        self.re.is_zero() && !self.im.is_zero()
    }

    /// True for a real integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.is_real() && self.re.is_integer()
    }

    /// True for a real, even integer.
    ///
    /// Parity is only defined here for real values: any value with a
    /// nonzero imaginary part is neither even nor odd, even when both parts
    /// are even integers.
    #[must_use]
    pub fn is_even(&self) -> bool {
        self.is_real() && self.re.is_even()
    }

    /// True for a real, odd integer. See [`Complex::is_even`].
    #[must_use]
    pub fn is_odd(&self) -> bool {
        self.is_real() && self.re.is_odd()
    }

    // Arithmetic

    /// Complex conjugate.
    #[must_use]
    pub fn conj(&self) -> Self {
        Self::new(self.re.clone(), -&self.im)
    }

    /// Squared magnitude, `re^2 + im^2`.
    #[must_use]
    pub fn norm(&self) -> Rational {
        &(&self.re * &self.re) + &(&self.im * &self.im)
    }

    /// Reciprocal.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for zero.
    pub fn inverse(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(CalcError::domain("inverse of zero"));
        }
        let norm = self.norm();
        Ok(Self::new(self.re.checked_div(&norm)?, (-&self.im).checked_div(&norm)?))
    }

    /// Exact division.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `other` is zero.
    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(CalcError::DivideByZero);
        }
        if other.is_real() {
            return self.try_map(|part| part.checked_div(&other.re));
        }
        let norm = other.norm();
        let top = self * &other.conj();
        top.try_map(|part| part.checked_div(&norm))
    }

    /// Multiplies by a real factor.
    #[must_use]
    pub fn mul_real(&self, factor: &Rational) -> Self {
        self.map(|part| part * factor)
    }

    /// Multiplies both parts by 2^n.
    #[must_use]
    pub fn scale(&self, n: i64) -> Self {
        self.map(|part| part.scale(n))
    }

    /// Multiplies by `i`.
    #[must_use]
    pub fn mul_i(&self) -> Self {
        Self::new(-&self.im, self.re.clone())
    }

    /// Multiplies by `-i`.
    #[must_use]
    pub fn mul_neg_i(&self) -> Self {
        Self::new(self.im.clone(), -&self.re)
    }

    /// Raises to an integer power, exactly.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a negative power of zero or a result
    /// too large to represent.
    pub fn powi(&self, exp: i64) -> Result<Self> {
        if self.is_real() {
            return Ok(Self::from(self.re.powi(exp)?));
        }
        if self.re.is_zero() && self.im.abs().is_one() && !(0..4).contains(&exp) {
            // (±i)^4 == 1
            return self.powi(exp.rem_euclid(4));
        }
        if exp < 0 {
            return self.powi(exp.checked_neg().unwrap_or(i64::MAX))?.inverse();
        }
        let size = [&self.re, &self.im]
            .iter()
            .map(|part| part.numerator().bit_len().max(part.denominator().bit_len()) as u64)
            .max()
            .unwrap_or(0)
            + 1;
        if size.saturating_mul(exp.unsigned_abs()) > POWER_BIT_LIMIT {
            return Err(CalcError::domain("power result too large"));
        }
        let mut result = Self::one();
        let mut base = self.clone();
        let mut n = exp.unsigned_abs();
        while n > 0 {
            if n & 1 == 1 {
                result = &result * &base;
            }
            n >>= 1;
            if n > 0 {
                base = &base * &base;
            }
        }
        Ok(result)
    }

    // Componentwise rounding

    /// Integer part of each component.
    #[must_use]
    pub fn int(&self) -> Self {
        self.map(Rational::int)
    }

    /// Fractional part of each component.
    #[must_use]
    pub fn frac(&self) -> Self {
        self.map(Rational::frac)
    }

    /// Ceiling of each component.
    #[must_use]
    pub fn ceil(&self) -> Self {
        self.map(Rational::ceil)
    }

    /// Floor of each component.
    #[must_use]
    pub fn floor(&self) -> Self {
        self.map(Rational::floor)
    }

    /// Each component rounded to a multiple of `eps`.
    #[must_use]
    pub fn appr(&self, eps: &Rational, rounding: Rounding) -> Self {
        self.map(|part| part.appr(eps, rounding))
    }

    /// Each component rounded to `places` decimal places.
    #[must_use]
    pub fn round(&self, places: i64, rounding: Rounding) -> Self {
        self.map(|part| part.round(places, rounding))
    }

    /// Each component rounded to `places` binary places.
    #[must_use]
    pub fn bround(&self, places: i64, rounding: Rounding) -> Self {
        self.map(|part| part.bround(places, rounding))
    }

    /// Componentwise remainder modulo a real `y`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `y` is zero.
    pub fn modulo(&self, y: &Rational, rounding: Rounding) -> Result<Self> {
        self.try_map(|part| part.modulo(y, rounding))
    }

    /// Componentwise remainder of least magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `y` is zero.
    pub fn mmin(&self, y: &Rational) -> Result<Self> {
        self.try_map(|part| part.mmin(y))
    }

    /// Componentwise integer quotient by a real `y`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `y` is zero.
    pub fn quo(&self, y: &Rational, rounding: Rounding) -> Result<Self> {
        self.try_map(|part| Ok(Rational::from_integer(part.quo(y, rounding)?)))
    }

    /// Componentwise three-way comparison.
    ///
    /// The result holds the sign of `re - other.re` and of `im - other.im`,
    /// so it is real whenever the imaginary parts agree.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn cmp(&self, other: &Self) -> Self {
        Self::from_i64(
            i64::from(self.re.cmp_sign(&other.re)),
            i64::from(self.im.cmp_sign(&other.im)),
        )
    }

    /// Generalized binomial coefficient `C(self, k)`.
    ///
    /// Negative `k` gives 0 and `k == 0` gives 1.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a fractional `k` or `k >= 2^24`.
    pub fn comb(&self, k: &Rational) -> Result<Self> {
        if self.is_real() {
            return Ok(Self::from(self.re.comb(k)?));
        }
        let k = k.to_integer().ok_or_else(|| CalcError::domain("non-integer argument for comb"))?;
        if k.is_negative() {
            return Ok(Self::zero());
        }
        let k = match k.to_u64() {
            Ok(k) if k < PRODUCT_LIMIT => k,
            _ => return Err(CalcError::domain("comb argument too large")),
        };
        let mut result = Self::one();
        let mut top = self.clone();
        for i in 1..=k {
            let divisor = Rational::from_integer(Integer::from(i));
            result = (&result * &top).try_map(|part| part.checked_div(&divisor))?;
            top = Self::new(&top.re - &Rational::one(), top.im.clone());
        }
        Ok(result)
    }

    /// Floor of the logarithm of the magnitude in an integer base.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for zero or a base that is not an
    /// integer of at least 2.
    pub fn ilog(&self, base: &Rational) -> Result<i64> {
        Ok(self.norm().ilog(base)?.div_euclid(2))
    }

    /// Floor of the base 10 logarithm of the magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for zero.
    pub fn ilog10(&self) -> Result<i64> {
        Ok(self.norm().ilog10()?.div_euclid(2))
    }

    /// Floor of the base 2 logarithm of the magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for zero.
    pub fn ilog2(&self) -> Result<i64> {
        Ok(self.norm().ilog2()?.div_euclid(2))
    }
}

impl Zero for Complex {
    fn zero() -> Self {
        Self::new(Rational::zero(), Rational::zero())
    }

    fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }
}

impl One for Complex {
    fn one() -> Self {
        Self::new(Rational::one(), Rational::zero())
    }
}

impl fmt::Debug for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Complex({:?}, {:?})", self.re, self.im)
    }
}

impl From<Rational> for Complex {
    fn from(re: Rational) -> Self {
        Self::new(re, Rational::zero())
    }
}

impl From<i64> for Complex {
    fn from(re: i64) -> Self {
        Self::from_i64(re, 0)
    }
}

// Arithmetic operations
impl Add for Complex {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        &self + &other
    }
}

impl Add for &Complex {
    type Output = Complex;

    fn add(self, other: Self) -> Complex {
        Complex::new(&self.re + &other.re, &self.im + &other.im)
    }
}

impl Sub for Complex {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        &self - &other
    }
}

impl Sub for &Complex {
    type Output = Complex;

    fn sub(self, other: Self) -> Complex {
        Complex::new(&self.re - &other.re, &self.im - &other.im)
    }
}

impl Mul for Complex {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        &self * &other
    }
}

impl Mul for &Complex {
    type Output = Complex;

    fn mul(self, other: Self) -> Complex {
        if other.is_real() {
            return self.mul_real(&other.re);
        }
        let re = &(&self.re * &other.re) - &(&self.im * &other.im);
        let im = &(&self.re * &other.im) + &(&self.im * &other.re);
        Complex::new(re, im)
    }
}

impl Neg for Complex {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}

impl Neg for &Complex {
    type Output = Complex;

    fn neg(self) -> Complex {
        Complex::new(-&self.re, -&self.im)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: i64, im: i64) -> Complex {
        Complex::from_i64(re, im)
    }

    fn q(s: &str) -> Rational {
        s.parse().unwrap()
    }

    fn cq(re: &str, im: &str) -> Complex {
        Complex::new(q(re), q(im))
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(&c(1, 2) + &c(3, -4), c(4, -2));
        assert_eq!(&c(1, 2) - &c(3, -4), c(-2, 6));
        assert_eq!(&c(1, 2) * &c(3, -4), c(11, 2));
        assert_eq!(c(11, 2).checked_div(&c(3, -4)).unwrap(), c(1, 2));
        assert_eq!(-c(1, -1), c(-1, 1));
        assert_eq!(c(1, 1).checked_div(&Complex::zero()), Err(CalcError::DivideByZero));
    }

    #[test]
    fn test_inverse_conj_norm() {
        assert_eq!(c(3, 4).inverse().unwrap(), cq("0.12", "-0.16"));
        assert_eq!(c(3, 4).conj(), c(3, -4));
        assert_eq!(c(3, 4).norm(), 25);
        assert!(Complex::zero().inverse().is_err());
    }

    #[test]
    fn test_powi() {
        assert_eq!(c(1, 3).powi(3).unwrap(), c(-26, -18));
        assert_eq!(c(1, 1).powi(4).unwrap(), c(-4, 0));
        assert_eq!(Complex::i().powi(-1).unwrap(), c(0, -1));
        assert_eq!(c(2, 0).powi(-2).unwrap(), cq("1/4", "0"));
        assert!(Complex::zero().powi(-1).is_err());
        assert!(c(3, 3).powi(1 << 40).is_err());
        assert_eq!(Complex::i().powi(1 << 40).unwrap(), c(1, 0));
        assert_eq!(c(0, -1).powi((1 << 40) + 3).unwrap(), c(0, 1));
        assert_eq!(Complex::i().powi(i64::MIN).unwrap(), c(1, 0));
        assert_eq!(Complex::i().powi(-3).unwrap(), c(0, 1));
    }

    #[test]
    fn test_predicates() {
        assert!(c(1, 0).is_real());
        assert!(!c(1, 1).is_real());
        assert!(c(0, 1).is_imag());
        assert!(!c(0, 0).is_imag());
        assert!(!c(1, 1).is_imag());
        assert!(c(0, 0).is_zero());
        assert!(c(4, 0).is_integer());
        assert!(!c(4, 1).is_integer());
        assert!(!cq("1/2", "0").is_integer());
    }

    #[test]
    fn test_parity_is_real_only() {
        assert!(c(0, 0).is_even());
        assert!(c(2, 0).is_even());
        assert!(c(1, 0).is_odd());
        assert!(!c(2, 2).is_even());
        assert!(!c(1, 1).is_odd());
        assert!(!cq("1/2", "0").is_even());
    }

    #[test]
    fn test_componentwise_rounding() {
        let z = cq("7/32", "-7/32");
        assert_eq!(z.round(3, Rounding::NEAREST_EVEN), cq(".219", "-.219"));
        assert_eq!(z.round(3, Rounding::FLOOR), cq(".218", "-.219"));
        assert_eq!(z.bround(3, Rounding::NEAREST_EVEN), cq(".25", "-.25"));
        assert_eq!(z.bround(3, Rounding::FLOOR), cq(".125", "-.25"));
        assert_eq!(cq("3.5", "-2.5").int(), c(3, -2));
        assert_eq!(cq("3.5", "-2.5").frac(), cq(".5", "-.5"));
        assert_eq!(cq("3.5", "-2.5").ceil(), c(4, -2));
        assert_eq!(cq("3.5", "-2.5").floor(), c(3, -3));
        assert_eq!(cq("1.26", "-3.74").appr(&q("0.5"), Rounding::NEAREST_EVEN), cq("1.5", "-3.5"));
    }

    #[test]
    fn test_modulo_and_quo() {
        assert_eq!(c(11, 11).modulo(&q("5"), Rounding::FLOOR).unwrap(), c(1, 1));
        assert_eq!(c(11, -11).modulo(&q("5"), Rounding::FLOOR).unwrap(), c(1, 4));
        assert_eq!(c(13, 11).mmin(&q("5")).unwrap(), c(-2, 1));
        assert_eq!(c(11, 11).quo(&q("5"), Rounding::FLOOR).unwrap(), c(2, 2));
        assert_eq!(c(11, 11).quo(&q("5"), Rounding::CEIL).unwrap(), c(3, 3));
        assert!(c(1, 1).modulo(&Rational::zero(), Rounding::FLOOR).is_err());
    }

    #[test]
    fn test_cmp() {
        assert_eq!(c(0, -4).cmp(&c(5, 0)), c(-1, -1));
        assert_eq!(c(0, -4).cmp(&c(-5, 0)), c(1, -1));
        assert_eq!(c(3, 4).cmp(&c(5, 0)), c(-1, 1));
        assert_eq!(c(3, 4).cmp(&c(3, -4)), c(0, 1));
        assert_eq!(c(0, 4).cmp(&c(0, 4)), c(0, 0));
        assert!(c(0, 4).cmp(&c(0, 4)).is_real());
    }

    #[test]
    fn test_comb() {
        assert_eq!(c(0, 7).comb(&q("3")).unwrap(), cq("49/2", "-329/6"));
        assert_eq!(c(0, 7).comb(&q("0")).unwrap(), c(1, 0));
        assert_eq!(c(0, 7).comb(&q("-1")).unwrap(), c(0, 0));
        assert_eq!(c(5, 0).comb(&q("2")).unwrap(), c(10, 0));
        assert!(c(0, 7).comb(&q("1/2")).is_err());
        assert!(c(0, 7).comb(&q("16777216")).is_err());
    }

    #[test]
    fn test_ilog() {
        assert_eq!(c(10, 10).ilog(&q("3")).unwrap(), 2);
        assert_eq!(c(10, 100).ilog(&q("3")).unwrap(), 4);
        assert_eq!(c(100, 100).ilog(&q("3")).unwrap(), 4);
        assert_eq!(cq("0", "1/15").ilog2().unwrap(), -4);
        assert_eq!(c(0, 7).ilog10().unwrap(), 0);
        assert_eq!(c(0, 100).ilog10().unwrap(), 2);
        assert!(c(0, 10).ilog(&q("1")).is_err());
        assert!(Complex::zero().ilog2().is_err());
    }
}
