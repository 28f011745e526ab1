//! Arbitrary precision integers.
//!
//! This module provides a wrapper around `dashu::IBig` with the division,
//! shift, bit and root operations the rational layer builds on.

use dashu::base::{Abs, BitTest, Gcd, Signed as DashuSigned, UnsignedAbs};
use dashu::integer::{IBig, UBig};
use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Rem, Sub};
use std::str::FromStr;

use crate::{CalcError, Result, Rounding};

/// An arbitrary precision integer.
///
/// Values are immutable; every operation returns a new integer.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Integer(IBig);

impl Integer {
    /// Creates a new integer from an i64.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(IBig::from(value))
    }

    /// Creates an integer from a string of digits in the given base.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Parse`] if the string is not a valid integer.
    pub fn from_str_radix(s: &str, radix: u32) -> Result<Self> {
        IBig::from_str_radix(s, radix)
            .map(Self)
            .map_err(|_| CalcError::parse(s))
    }

    /// Formats the value in base 2, 8, 10 or 16, without any radix prefix.
    #[must_use]
    pub fn to_radix_string(&self, radix: u32) -> String {
        let magnitude = self.magnitude();
        let digits = match radix {
            2 => format!("{magnitude:b}"),
            8 => format!("{magnitude:o}"),
            16 => format!("{magnitude:x}"),
            _ => magnitude.to_string(),
        };
        if self.is_negative() {
            format!("-{digits}")
        } else {
            digits
        }
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns |self| as an unsigned big integer.
    #[must_use]
    pub fn magnitude(&self) -> UBig {
        self.0.clone().unsigned_abs()
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }

    /// Returns true if this integer is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// Returns true if this integer is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        DashuSigned::is_positive(&self.0)
    }

    /// Returns true if this integer is even.
    #[must_use]
    pub fn is_even(&self) -> bool {
        !self.magnitude().bit(0)
    }

    /// Returns true if this integer is odd.
    #[must_use]
    pub fn is_odd(&self) -> bool {
        self.magnitude().bit(0)
    }

    /// Returns the number of bits needed to represent |self|.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.0.bit_len()
    }

    /// Index of the highest set bit of |self|, or -1 for zero.
    #[must_use]
    pub fn highbit(&self) -> i64 {
        self.bit_len() as i64 - 1
    }

    /// Index of the lowest set bit of |self|, or -1 for zero.
    #[must_use]
    pub fn lowbit(&self) -> i64 {
        self.0.trailing_zeros().map_or(-1, |i| i as i64)
    }

    /// Tests bit `index` of |self|.
    #[must_use]
    pub fn bit(&self, index: usize) -> bool {
        self.magnitude().bit(index)
    }

    /// Computes the greatest common divisor.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        Self(IBig::from(self.0.clone().gcd(other.0.clone())))
    }

    /// Computes the least common multiple.
    #[must_use]
    pub fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let g = self.gcd(other);
        Self(&self.0 / &g.0 * &other.0).abs()
    }

    /// Returns the inner `dashu::IBig`.
    #[must_use]
    pub fn into_inner(self) -> IBig {
        self.0
    }

    /// Returns a reference to the inner `dashu::IBig`.
    #[must_use]
    pub fn as_inner(&self) -> &IBig {
        &self.0
    }

    /// Converts to an i64.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Range`] if the value doesn't fit in an i64.
    pub fn to_i64(&self) -> Result<i64> {
        self.0
            .clone()
            .try_into()
            .map_err(|_| CalcError::range(format!("{self} does not fit in a 64-bit integer")))
    }

    /// Converts to a u64.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Range`] if the value is negative or too large.
    pub fn to_u64(&self) -> Result<u64> {
        self.0
            .clone()
            .try_into()
            .map_err(|_| CalcError::range(format!("{self} does not fit in an unsigned 64-bit integer")))
    }

    /// Computes self^exp.
    #[must_use]
    pub fn pow(&self, exp: usize) -> Self {
        Self(self.0.pow(exp))
    }

    /// Truncating division: the quotient rounds toward zero and the
    /// remainder takes the sign of the dividend.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `divisor` is zero.
    pub fn div_rem_trunc(&self, divisor: &Self) -> Result<(Self, Self)> {
        if divisor.is_zero() {
            return Err(CalcError::DivideByZero);
        }
        Ok((Self(&self.0 / &divisor.0), Self(&self.0 % &divisor.0)))
    }

    /// Floor division: the remainder takes the sign of the divisor.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `divisor` is zero.
    pub fn div_rem_floor(&self, divisor: &Self) -> Result<(Self, Self)> {
        self.div_rem_rounded(divisor, Rounding::FLOOR)
    }

    /// Division whose non-exact quotient is resolved by a rounding word.
    ///
    /// The remainder is always `self - quotient * divisor`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `divisor` is zero.
    pub fn div_rem_rounded(&self, divisor: &Self, rounding: Rounding) -> Result<(Self, Self)> {
        let (q, r) = self.div_rem_trunc(divisor)?;
        if r.is_zero() {
            return Ok((q, r));
        }

        let negative_quotient = self.is_negative() != divisor.is_negative();
        let (floor, floor_rem) = if negative_quotient {
            (&q - &Self::one(), r + divisor)
        } else {
            (q, r)
        };
        // floor_rem / divisor is the fractional part of the quotient
        let twice = Self(&floor_rem.0 * IBig::from(2)).abs();
        let frac_vs_half = twice.cmp(&divisor.abs());

        if rounding.rounds_up(self.signum(), divisor.signum(), floor.is_even(), frac_vs_half) {
            let q = floor + Self::one();
            let r = self - &(&q * divisor);
            Ok((q, r))
        } else {
            Ok((floor, floor_rem))
        }
    }

    /// Multiplies by 2^count for positive counts and divides by 2^|count|,
    /// truncating toward zero, for negative ones.
    #[must_use]
    pub fn shift(&self, count: i64) -> Self {
        let amount = count.unsigned_abs() as usize;
        if count >= 0 {
            Self(self.0.clone() << amount)
        } else {
            let magnitude = IBig::from(self.magnitude() >> amount);
            if self.is_negative() {
                Self(-magnitude)
            } else {
                Self(magnitude)
            }
        }
    }

    /// Integer square root: the largest `r` with `r*r <= self`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for negative values.
    pub fn isqrt(&self) -> Result<Self> {
        self.iroot(2)
    }

    /// Integer k-th root, truncated toward zero.
    ///
    /// Negative values are accepted for odd `k`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] when `k` is zero or when `self` is
    /// negative and `k` is even.
    pub fn iroot(&self, k: u32) -> Result<Self> {
        if k == 0 {
            return Err(CalcError::domain("zeroth root"));
        }
        if self.is_negative() {
            if k % 2 == 0 {
                return Err(CalcError::domain("even root of negative number"));
            }
            return Ok(-self.abs().iroot(k)?);
        }
        Ok(Self(nth_root_floor(&self.0, k as usize)))
    }

    /// Returns true if this integer is a perfect square.
    #[must_use]
    pub fn is_square(&self) -> bool {
        if self.is_negative() {
            return false;
        }
        self.isqrt().is_ok_and(|r| &r * &r == *self)
    }
}

/// Floor of the k-th root of a non-negative integer by Newton iteration.
fn nth_root_floor(n: &IBig, k: usize) -> IBig {
    if n.is_zero() || k == 1 {
        return n.clone();
    }
    let k_big = IBig::from(k);
    let k_less = IBig::from(k - 1);
    // start above the root so the iteration decreases monotonically
    let mut x = IBig::ONE << n.bit_len().div_ceil(k);
    loop {
        let y = (&x * &k_less + n / x.pow(k - 1)) / &k_big;
        if y >= x {
            return x;
        }
        x = y;
    }
}

impl Zero for Integer {
    fn zero() -> Self {
        Self(IBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Integer {
    fn one() -> Self {
        Self(IBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == IBig::ONE
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integer({})", self.0)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Integer {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_radix(s.trim(), 10)
    }
}

// Arithmetic operations
impl Add for Integer {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Add<&Integer> for Integer {
    type Output = Self;

    fn add(self, rhs: &Integer) -> Self::Output {
        Self(self.0 + &rhs.0)
    }
}

impl Add for &Integer {
    type Output = Integer;

    fn add(self, rhs: Self) -> Self::Output {
        Integer(&self.0 + &rhs.0)
    }
}

impl Sub for Integer {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sub<&Integer> for Integer {
    type Output = Self;

    fn sub(self, rhs: &Integer) -> Self::Output {
        Self(self.0 - &rhs.0)
    }
}

impl Sub for &Integer {
    type Output = Integer;

    fn sub(self, rhs: Self) -> Self::Output {
        Integer(&self.0 - &rhs.0)
    }
}

impl Mul for Integer {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Mul<&Integer> for Integer {
    type Output = Self;

    fn mul(self, rhs: &Integer) -> Self::Output {
        Self(self.0 * &rhs.0)
    }
}

impl Mul for &Integer {
    type Output = Integer;

    fn mul(self, rhs: Self) -> Self::Output {
        Integer(&self.0 * &rhs.0)
    }
}

impl Div for Integer {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Self(self.0 / rhs.0)
    }
}

impl Div<&Integer> for &Integer {
    type Output = Integer;

    fn div(self, rhs: &Integer) -> Self::Output {
        Integer(&self.0 / &rhs.0)
    }
}

impl Rem for Integer {
    type Output = Self;

    fn rem(self, rhs: Self) -> Self::Output {
        Self(self.0 % rhs.0)
    }
}

impl Rem<&Integer> for &Integer {
    type Output = Integer;

    fn rem(self, rhs: &Integer) -> Self::Output {
        Integer(&self.0 % &rhs.0)
    }
}

impl Neg for Integer {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Integer {
    type Output = Integer;

    fn neg(self) -> Self::Output {
        Integer(-&self.0)
    }
}

impl BitAnd for &Integer {
    type Output = Integer;

    fn bitand(self, rhs: Self) -> Self::Output {
        Integer(&self.0 & &rhs.0)
    }
}

impl BitOr for &Integer {
    type Output = Integer;

    fn bitor(self, rhs: Self) -> Self::Output {
        Integer(&self.0 | &rhs.0)
    }
}

impl BitXor for &Integer {
    type Output = Integer;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Integer(&self.0 ^ &rhs.0)
    }
}

impl PartialEq<i64> for Integer {
    fn eq(&self, other: &i64) -> bool {
        self.0 == IBig::from(*other)
    }
}

impl PartialOrd<i64> for Integer {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        Some(self.0.cmp(&IBig::from(*other)))
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Self::new(i64::from(value))
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self(IBig::from(value))
    }
}

impl From<u32> for Integer {
    fn from(value: u32) -> Self {
        Self(IBig::from(value))
    }
}

impl From<IBig> for Integer {
    fn from(value: IBig) -> Self {
        Self(value)
    }
}

impl From<UBig> for Integer {
    fn from(value: UBig) -> Self {
        Self(IBig::from(value))
    }
}
