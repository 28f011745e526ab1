//! Arbitrary precision rational numbers.
//!
//! A [`Rational`] is a shared handle to a reduced fraction: cloning only bumps
//! a reference count, and every operation builds a new value.

use dashu::base::{Abs, Inverse, Signed as DashuSigned, UnsignedAbs};
use dashu::integer::IBig;
use dashu::rational::RBig;
use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use calq_integers::{CalcError, Integer, Result, Rounding};

/// Shift counts at or above this magnitude are rejected.
const SHIFT_LIMIT: u64 = 1 << 31;

/// Results of integer powers are limited to this many bits.
const POWER_BIT_LIMIT: u64 = 1 << 28;

/// An arbitrary precision rational number.
///
/// Rationals are always stored in lowest terms with a positive denominator.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rational(Arc<RBig>);

impl Rational {
    pub(crate) fn from_rbig(value: RBig) -> Self {
        Self(Arc::new(value))
    }

    /// Creates a rational from numerator and denominator, reducing to lowest
    /// terms and moving the sign into the numerator.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if the denominator is zero.
    pub fn from_pair(numerator: Integer, denominator: Integer) -> Result<Self> {
        if denominator.is_zero() {
            return Err(CalcError::DivideByZero);
        }
        let negative = denominator.is_negative();
        let value = RBig::from_parts(numerator.into_inner(), denominator.into_inner().unsigned_abs());
        Ok(Self::from_rbig(if negative { -value } else { value }))
    }

    /// Creates a rational from i64 numerator and denominator.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if the denominator is zero.
    pub fn from_i64_pair(numerator: i64, denominator: i64) -> Result<Self> {
        Self::from_pair(Integer::new(numerator), Integer::new(denominator))
    }

    /// Creates a rational from an integer (denominator = 1).
    #[must_use]
    pub fn from_integer(n: Integer) -> Self {
        Self::from_rbig(RBig::from(n.into_inner()))
    }

    /// Creates a rational from an i64.
    #[must_use]
    pub fn from_i64(n: i64) -> Self {
        Self::from_integer(Integer::new(n))
    }

    /// Returns 2^exp as a rational.
    #[must_use]
    pub fn power_of_two(exp: i64) -> Self {
        Self::one().scale(exp)
    }

    /// Returns 10^exp as a rational.
    #[must_use]
    pub fn power_of_ten(exp: i64) -> Self {
        let p = Integer::new(10).pow(exp.unsigned_abs() as usize);
        if exp >= 0 {
            Self::from_integer(p)
        } else {
            Self::from_rbig(RBig::from_parts(IBig::ONE, p.magnitude()))
        }
    }

    /// Returns the numerator.
    #[must_use]
    pub fn numerator(&self) -> Integer {
        Integer::from(self.0.numerator().clone())
    }

    /// Returns the denominator.
    #[must_use]
    pub fn denominator(&self) -> Integer {
        Integer::from(self.0.denominator().clone())
    }

    /// Returns true if this rational is an integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.0.denominator().is_one()
    }

    /// Converts to an integer if the denominator is 1.
    #[must_use]
    pub fn to_integer(&self) -> Option<Integer> {
        if self.is_integer() {
            Some(self.numerator())
        } else {
            None
        }
    }

    /// Converts to an i64, truncating any fraction toward zero.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Range`] when the integer part does not fit.
    pub fn to_i64(&self) -> Result<i64> {
        self.int().numerator().to_i64()
    }

    /// Returns the integer value or a [`CalcError::Domain`] naming `what`.
    pub(crate) fn integer_arg(&self, what: &str) -> Result<Integer> {
        self.to_integer()
            .ok_or_else(|| CalcError::domain(format!("non-integer argument for {what}")))
    }

    /// Returns the integer value or a [`CalcError::Type`] naming `what`.
    pub(crate) fn require_integer(&self, what: &str) -> Result<Integer> {
        self.to_integer()
            .ok_or_else(|| CalcError::type_error(format!("non-integer value for {what}")))
    }

    /// Returns an integer argument bounded by `limit` in magnitude.
    pub(crate) fn bounded_arg(&self, what: &str, limit: u64) -> Result<i64> {
        let n = self.integer_arg(what)?;
        match n.to_i64() {
            Ok(v) if v.unsigned_abs() < limit => Ok(v),
            _ => Err(CalcError::domain(format!("argument too large for {what}"))),
        }
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        if self.is_negative() {
            Self::from_rbig(self.0.as_ref().clone().abs())
        } else {
            self.clone()
        }
    }

    /// Returns the reciprocal (1/x).
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] if the rational is zero.
    pub fn inverse(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(CalcError::domain("inverse of zero"));
        }
        Ok(Self::from_rbig(self.0.as_ref().clone().inv()))
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
        Ok(Self::from_rbig(self.0.as_ref() / other.0.as_ref()))
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(self.0.as_ref()) {
            1
        } else {
            -1
        }
    }

    /// Three-way comparison as -1, 0 or 1.
    #[must_use]
    pub fn cmp_sign(&self, other: &Self) -> i8 {
        match self.cmp(other) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    /// Returns true if negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(self.0.as_ref())
    }

    /// Returns true if strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        DashuSigned::is_positive(self.0.as_ref())
    }

    /// True for even integers; fractions are neither even nor odd.
    #[must_use]
    pub fn is_even(&self) -> bool {
        self.is_integer() && self.numerator().is_even()
    }

    /// True for odd integers; fractions are neither even nor odd.
    #[must_use]
    pub fn is_odd(&self) -> bool {
        self.is_integer() && self.numerator().is_odd()
    }

    /// Returns a reference to the inner `dashu::RBig`.
    #[must_use]
    pub fn as_inner(&self) -> &RBig {
        &self.0
    }

    /// Multiplies by 2^n.
    #[must_use]
    pub fn scale(&self, n: i64) -> Self {
        if n == 0 || self.is_zero() {
            return self.clone();
        }
        let shift = n.unsigned_abs() as usize;
        let num = self.0.numerator().clone();
        let den = self.0.denominator().clone();
        let value = if n > 0 {
            RBig::from_parts(num << shift, den)
        } else {
            RBig::from_parts(num, den << shift)
        };
        Self::from_rbig(value)
    }

    /// Shifts an integer left by `count` bits (right for negative counts,
    /// truncating toward zero).
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Type`] if either operand is not an integer and
    /// [`CalcError::Domain`] if |count| >= 2^31.
    pub fn shift(&self, count: &Self) -> Result<Self> {
        let count = count.require_integer("shift count")?;
        let value = self.require_integer("shift")?;
        let n = match count.to_i64() {
            Ok(n) if n.unsigned_abs() < SHIFT_LIMIT => n,
            _ => return Err(CalcError::domain("shift count too large")),
        };
        Ok(Self::from_integer(value.shift(n)))
    }

    /// Raises to an integer power, exactly.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a negative power of zero or a result
    /// too large to represent.
    pub fn powi(&self, exp: i64) -> Result<Self> {
        if exp == 0 {
            return Ok(Self::one());
        }
        if self.is_zero() {
            if exp < 0 {
                return Err(CalcError::domain("negative power of zero"));
            }
            return Ok(Self::zero());
        }
        if self.abs().is_one() {
            return Ok(if self.is_negative() && exp % 2 != 0 { self.clone() } else { Self::one() });
        }
        let size = self.numerator().bit_len().max(self.denominator().bit_len()) as u64;
        if size.saturating_mul(exp.unsigned_abs()) > POWER_BIT_LIMIT {
            return Err(CalcError::domain("power result too large"));
        }
        let raised = Self::from_rbig(self.0.pow(exp.unsigned_abs() as usize));
        if exp < 0 {
            raised.inverse()
        } else {
            Ok(raised)
        }
    }

    /// Integer quotient `x / y` resolved by a rounding word.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `y` is zero.
    pub fn quo(&self, y: &Self, rounding: Rounding) -> Result<Integer> {
        let a = self.numerator() * y.denominator();
        let b = self.denominator() * y.numerator();
        Ok(a.div_rem_rounded(&b, rounding)?.0)
    }

    /// Remainder `x - y * quo(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `y` is zero.
    pub fn modulo(&self, y: &Self, rounding: Rounding) -> Result<Self> {
        Ok(self.quomod(y, rounding)?.1)
    }

    /// Remainder of least magnitude; ties take the sign of `y`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `y` is zero.
    pub fn mmin(&self, y: &Self) -> Result<Self> {
        self.modulo(y, Rounding::new(Rounding::NEAREST))
    }

    /// Quotient and remainder together.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `y` is zero.
    pub fn quomod(&self, y: &Self, rounding: Rounding) -> Result<(Integer, Self)> {
        let q = self.quo(y, rounding)?;
        let r = self - &(y * &Self::from_integer(q.clone()));
        Ok((q, r))
    }

    /// Integer part, truncated toward zero.
    #[must_use]
    pub fn int(&self) -> Self {
        if self.is_integer() {
            return self.clone();
        }
        let (q, _) = self
            .numerator()
            .div_rem_rounded(&self.denominator(), Rounding::TRUNC)
            .unwrap_or_default();
        Self::from_integer(q)
    }

    /// Fractional part, `x - int(x)`.
    #[must_use]
    pub fn frac(&self) -> Self {
        self - &self.int()
    }

    /// Floor, as an integer.
    #[must_use]
    pub fn floor_int(&self) -> Integer {
        self.numerator()
            .div_rem_floor(&self.denominator())
            .map(|(q, _)| q)
            .unwrap_or_default()
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self::from_rbig(RBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl One for Rational {
    fn one() -> Self {
        Self::from_rbig(RBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0.is_one()
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "Rational({})", self.0.numerator())
        } else {
            write!(f, "Rational({}/{})", self.0.numerator(), self.0.denominator())
        }
    }
}

// Arithmetic operations
impl Add for Rational {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl Add for &Rational {
    type Output = Rational;

    fn add(self, rhs: Self) -> Self::Output {
        Rational::from_rbig(self.0.as_ref() + rhs.0.as_ref())
    }
}

impl Sub for Rational {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl Sub for &Rational {
    type Output = Rational;

    fn sub(self, rhs: Self) -> Self::Output {
        Rational::from_rbig(self.0.as_ref() - rhs.0.as_ref())
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

impl Mul for &Rational {
    type Output = Rational;

    fn mul(self, rhs: Self) -> Self::Output {
        Rational::from_rbig(self.0.as_ref() * rhs.0.as_ref())
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self::Output {
        -&self
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Self::Output {
        Rational::from_rbig(-self.0.as_ref().clone())
    }
}

impl PartialEq<i64> for Rational {
    fn eq(&self, other: &i64) -> bool {
        self.is_integer() && self.0.numerator() == &IBig::from(*other)
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<i32> for Rational {
    fn from(value: i32) -> Self {
        Self::from_i64(i64::from(value))
    }
}

impl From<Integer> for Rational {
    fn from(value: Integer) -> Self {
        Self::from_integer(value)
    }
}

impl From<RBig> for Rational {
    fn from(value: RBig) -> Self {
        Self::from_rbig(value)
    }
}
