//! Transcendental functions of a rational argument.
//!
//! Every function takes a positive error bound `eps` and returns a multiple
//! of `eps` within `eps` of the true value. Values are evaluated in binary
//! fixed point a few guard bits past the bound and then rounded to the
//! nearest multiple of `eps`.
//!
//! Arguments outside the real domain fail with [`CalcError::NonReal`] when
//! the complex continuation is defined there, and with
//! [`CalcError::Undefined`] at poles.

use std::cmp::Ordering;

use dashu::base::{Abs, BitTest, Signed as DashuSigned};
use dashu::integer::IBig;
use num_traits::{One, Zero};
use tracing::trace;

use calq_integers::{CalcError, Integer, Result, Rounding};

use crate::approx::positive_epsilon;
use crate::fixed::{self, from_fixed, one, rescale, to_fixed, GUARD};
use crate::Rational;

/// Results needing more than this many integer bits are refused.
const MAGNITUDE_LIMIT: i64 = 1 << 22;

/// Precision raises tried before a quotient is treated as a pole.
const RETRIES: usize = 12;

/// Largest root order tried for an exact rational root.
const EXACT_ROOT_LIMIT: u64 = 1 << 16;

/// Bits of precision that put `2^-bits` below `eps`, plus guard bits.
fn precision(eps: &Rational) -> Result<usize> {
    positive_epsilon(eps)?;
    let num = eps.as_inner().numerator().bit_len();
    let den = eps.as_inner().denominator().bit_len();
    Ok((den + 1).saturating_sub(num) + GUARD)
}

fn finish(v: IBig, prec: usize, eps: &Rational) -> Rational {
    from_fixed(v, prec).appr(eps, Rounding::NEAREST_EVEN)
}

fn with_sign(v: IBig, negative: bool) -> IBig {
    if negative {
        -v
    } else {
        v
    }
}

fn half_pi(prec: usize) -> IBig {
    fixed::pi(prec) >> 1
}

/// Floor of `sqrt(x) * 2^prec` for non-negative `x`.
fn sqrt_fixed(x: &Rational, prec: usize) -> IBig {
    Integer::from(to_fixed(x, 2 * prec))
        .isqrt()
        .map_or(IBig::ZERO, Integer::into_inner)
}

/// `num / den` at precision `base`, where `f(p)` yields both at precision
/// `p`. Precision is raised until cancellation in `den` no longer reaches
/// the result bits.
fn ratio(base: usize, what: &str, f: impl Fn(usize) -> (IBig, IBig)) -> Result<IBig> {
    let mut prec = base + GUARD;
    for _ in 0..RETRIES {
        let (num, den) = f(prec);
        let lost = prec.saturating_sub(den.bit_len());
        let need = base + 2 * lost + GUARD;
        if !den.is_zero() && prec >= need {
            return Ok(rescale(fixed::div(&num, &den, prec), prec, base));
        }
        trace!(what, prec, need, "raising precision");
        prec = need.max(2 * prec);
    }
    Err(CalcError::undefined(format!("{what} too close to a pole")))
}

/// `e^x` and `e^-x`.
fn exp_pair(x: &Rational, prec: usize) -> (IBig, IBig) {
    (fixed::exp(x, prec), fixed::exp(&-x, prec))
}

fn check_magnitude(x: &Rational, what: &str) -> Result<()> {
    if fixed::log2_estimate(&x.abs()) > MAGNITUDE_LIMIT {
        Err(CalcError::domain(format!("argument too large for {what}")))
    } else {
        Ok(())
    }
}

/// The exact `n`-th root of a non-negative value, if it has one.
fn exact_root(x: &Rational, n: u64) -> Option<Rational> {
    if n > EXACT_ROOT_LIMIT {
        return None;
    }
    let k = u32::try_from(n).ok()?;
    let (num, den) = (x.numerator(), x.denominator());
    let (r_num, r_den) = (num.iroot(k).ok()?, den.iroot(k).ok()?);
    let exact = r_num.pow(k as usize) == num && r_den.pow(k as usize) == den;
    exact.then(|| Rational::from_pair(r_num, r_den).ok()).flatten()
}

/// True when `0 <= x < pi/2`, for non-negative `x`.
fn below_half_pi(x: &Rational) -> bool {
    let mut prec = 64;
    loop {
        let diff = half_pi(prec) - to_fixed(x, prec);
        // x is rational and pi/2 is not, so a wide enough gap appears
        if diff.clone().abs() > IBig::from(4u8) || prec > 1 << 20 {
            return diff.is_positive();
        }
        prec *= 4;
    }
}

/// `e^(y ln x)` at precision `prec`, for positive `x`.
fn exp_product(y: &Rational, x: &Rational, prec: usize) -> Result<IBig> {
    let coarse_ln = fixed::ln(x, 64);
    let coarse = fixed::mul(&to_fixed(y, 64), &coarse_ln, 64);
    let k = fixed::log2_estimate(&from_fixed(coarse, 64));
    if k > MAGNITUDE_LIMIT {
        return Err(CalcError::domain("power too large"));
    }
    if k < -(prec as i64) - 2 {
        return Ok(IBig::ZERO);
    }
    let w = prec + k.max(0).unsigned_abs() as usize + GUARD;
    let ln_bits = (coarse_ln.abs() >> 64).bit_len();
    let y_bits = y.abs().floor_int().bit_len();
    let q = w + ln_bits + y_bits + 2;
    let exponent = fixed::mul(&to_fixed(y, q), &fixed::ln(x, q), q);
    let v = fixed::exp_fixed(&rescale(exponent, q, w), w);
    Ok(rescale(v, w, prec))
}

fn asin_fixed(x: &Rational, prec: usize) -> IBig {
    let w = prec + GUARD;
    let cos = sqrt_fixed(&(&Rational::one() - &(x * x)), w);
    rescale(fixed::atan2_fixed(&to_fixed(x, w), &cos, w), w, prec)
}

fn acos_fixed(x: &Rational, prec: usize) -> IBig {
    let w = prec + GUARD;
    let sin = sqrt_fixed(&(&Rational::one() - &(x * x)), w);
    rescale(fixed::atan2_fixed(&sin, &to_fixed(x, w), w), w, prec)
}

/// `ln(|x| + sqrt(x^2 + 1))` with the sign of `x`.
fn asinh_fixed(x: &Rational, prec: usize) -> IBig {
    let w = prec + GUARD;
    let arg = to_fixed(&x.abs(), w) + sqrt_fixed(&(&(x * x) + &Rational::one()), w);
    rescale(with_sign(fixed::ln_fixed(&arg, w), x.is_negative()), w, prec)
}

/// `ln(x + sqrt(x^2 - 1))` for `x >= 1`.
fn acosh_fixed(x: &Rational, prec: usize) -> IBig {
    let w = prec + GUARD;
    let arg = to_fixed(x, w) + sqrt_fixed(&(&(x * x) - &Rational::one()), w);
    rescale(fixed::ln_fixed(&arg, w), w, prec)
}

/// `ln((1 + x) / (1 - x)) / 2` for `|x| < 1`.
fn atanh_fixed(x: &Rational, prec: usize) -> Result<IBig> {
    let arg = (&Rational::one() + x).checked_div(&(&Rational::one() - x))?;
    Ok(fixed::ln(&arg, prec + 1) >> 2)
}

impl Rational {
    /// Pi to within `eps`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn pi(eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        Ok(finish(fixed::pi(prec), prec, eps))
    }

    /// The argument of the value as a complex number: 0 or pi.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn arg(&self, eps: &Rational) -> Result<Rational> {
        if self.is_negative() {
            Rational::pi(eps)
        } else {
            positive_epsilon(eps)?;
            Ok(Rational::zero())
        }
    }

    /// e raised to the value.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps` or a result
    /// too large to represent.
    pub fn exp(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.is_zero() {
            return Ok(Rational::one());
        }
        let k = fixed::log2_estimate(self);
        if k > MAGNITUDE_LIMIT {
            return Err(CalcError::domain("argument too large for exp"));
        }
        if k < -(prec as i64) - 2 {
            return Ok(Rational::zero());
        }
        Ok(finish(fixed::exp(self, prec), prec, eps))
    }

    /// Natural logarithm.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] for zero, [`CalcError::NonReal`] for
    /// negative values.
    pub fn ln(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        match self.signum() {
            0 => Err(CalcError::undefined("logarithm of zero")),
            -1 => Err(CalcError::NonReal("ln")),
            _ if self.is_one() => Ok(Rational::zero()),
            _ => Ok(finish(fixed::ln(self, prec), prec, eps)),
        }
    }

    /// Base 10 logarithm.
    ///
    /// # Errors
    ///
    /// As [`Rational::ln`].
    pub fn log(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        match self.signum() {
            0 => Err(CalcError::undefined("logarithm of zero")),
            -1 => Err(CalcError::NonReal("log")),
            _ if self.is_one() => Ok(Rational::zero()),
            _ => {
                let w = prec + GUARD;
                let ln10 = fixed::ln(&Rational::from(10), w);
                let v = fixed::div(&fixed::ln(self, w), &ln10, w);
                Ok(finish(rescale(v, w, prec), prec, eps))
            }
        }
    }

    /// Sine.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn sin(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        Ok(finish(fixed::sin_cos(self, prec).0, prec, eps))
    }

    /// Cosine.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn cos(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        Ok(finish(fixed::sin_cos(self, prec).1, prec, eps))
    }

    /// Tangent.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn tan(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.is_zero() {
            return Ok(Rational::zero());
        }
        let v = ratio(prec, "tan", |p| fixed::sin_cos(self, p))?;
        Ok(finish(v, prec, eps))
    }

    /// Cotangent.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Undefined`] at zero.
    pub fn cot(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.is_zero() {
            return Err(CalcError::undefined("cotangent of zero"));
        }
        let v = ratio(prec, "cot", |p| {
            let (s, c) = fixed::sin_cos(self, p);
            (c, s)
        })?;
        Ok(finish(v, prec, eps))
    }

    /// Secant.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn sec(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        let v = ratio(prec, "sec", |p| (one(p), fixed::sin_cos(self, p).1))?;
        Ok(finish(v, prec, eps))
    }

    /// Cosecant.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Undefined`] at zero.
    pub fn csc(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.is_zero() {
            return Err(CalcError::undefined("cosecant of zero"));
        }
        let v = ratio(prec, "csc", |p| (one(p), fixed::sin_cos(self, p).0))?;
        Ok(finish(v, prec, eps))
    }

    /// Hyperbolic sine.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps` or an
    /// argument whose result is too large.
    pub fn sinh(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        check_magnitude(self, "sinh")?;
        let (e, m) = exp_pair(self, prec + 1);
        Ok(finish((e - m) >> 2, prec, eps))
    }

    /// Hyperbolic cosine.
    ///
    /// # Errors
    ///
    /// As [`Rational::sinh`].
    pub fn cosh(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        check_magnitude(self, "cosh")?;
        let (e, m) = exp_pair(self, prec + 1);
        Ok(finish((e + m) >> 2, prec, eps))
    }

    /// Hyperbolic tangent.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn tanh(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.is_zero() {
            return Ok(Rational::zero());
        }
        if self.abs() > Rational::from(prec as i64) {
            return Ok(finish(with_sign(one(prec), self.is_negative()), prec, eps));
        }
        let v = ratio(prec, "tanh", |p| {
            let (e, m) = exp_pair(self, p);
            (&e - &m, e + m)
        })?;
        Ok(finish(v, prec, eps))
    }

    /// Hyperbolic cotangent.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Undefined`] at zero.
    pub fn coth(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.is_zero() {
            return Err(CalcError::undefined("hyperbolic cotangent of zero"));
        }
        if self.abs() > Rational::from(prec as i64) {
            return Ok(finish(with_sign(one(prec), self.is_negative()), prec, eps));
        }
        let v = ratio(prec, "coth", |p| {
            let (e, m) = exp_pair(self, p);
            (&e + &m, e - m)
        })?;
        Ok(finish(v, prec, eps))
    }

    /// Hyperbolic secant.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn sech(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.abs() > Rational::from(prec as i64) {
            return Ok(Rational::zero());
        }
        let v = ratio(prec, "sech", |p| {
            let (e, m) = exp_pair(self, p);
            (one(p) << 1, e + m)
        })?;
        Ok(finish(v, prec, eps))
    }

    /// Hyperbolic cosecant.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Undefined`] at zero.
    pub fn csch(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.is_zero() {
            return Err(CalcError::undefined("hyperbolic cosecant of zero"));
        }
        if self.abs() > Rational::from(prec as i64) {
            return Ok(Rational::zero());
        }
        let v = ratio(prec, "csch", |p| {
            let (e, m) = exp_pair(self, p);
            (one(p) << 1, e - m)
        })?;
        Ok(finish(v, prec, eps))
    }

    /// Arcsine, in `[-pi/2, pi/2]`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::NonReal`] when `|x| > 1`.
    pub fn asin(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.abs() > Rational::one() {
            return Err(CalcError::NonReal("asin"));
        }
        Ok(finish(asin_fixed(self, prec), prec, eps))
    }

    /// Arccosine, in `[0, pi]`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::NonReal`] when `|x| > 1`.
    pub fn acos(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.abs() > Rational::one() {
            return Err(CalcError::NonReal("acos"));
        }
        Ok(finish(acos_fixed(self, prec), prec, eps))
    }

    /// Arctangent, in `(-pi/2, pi/2)`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn atan(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        Ok(finish(fixed::atan(self, prec), prec, eps))
    }

    /// Arccotangent, in `(0, pi)`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn acot(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        Ok(finish(half_pi(prec) - fixed::atan(self, prec), prec, eps))
    }

    /// Arcsecant.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at zero, [`CalcError::NonReal`] when
    /// `|x| < 1`.
    pub fn asec(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.is_zero() {
            return Err(CalcError::undefined("arcsecant of zero"));
        }
        if self.abs() < Rational::one() {
            return Err(CalcError::NonReal("asec"));
        }
        Ok(finish(acos_fixed(&self.inverse()?, prec), prec, eps))
    }

    /// Arccosecant.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at zero, [`CalcError::NonReal`] when
    /// `|x| < 1`.
    pub fn acsc(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.is_zero() {
            return Err(CalcError::undefined("arccosecant of zero"));
        }
        if self.abs() < Rational::one() {
            return Err(CalcError::NonReal("acsc"));
        }
        Ok(finish(asin_fixed(&self.inverse()?, prec), prec, eps))
    }

    /// Inverse hyperbolic sine.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn asinh(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        Ok(finish(asinh_fixed(self, prec), prec, eps))
    }

    /// Inverse hyperbolic cosine, non-negative branch.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::NonReal`] when `x < 1`.
    pub fn acosh(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if *self < Rational::one() {
            return Err(CalcError::NonReal("acosh"));
        }
        Ok(finish(acosh_fixed(self, prec), prec, eps))
    }

    /// Inverse hyperbolic tangent.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at `±1`, [`CalcError::NonReal`] beyond.
    pub fn atanh(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        match self.abs().cmp(&Rational::one()) {
            Ordering::Equal => Err(CalcError::undefined("atanh of ±1")),
            Ordering::Greater => Err(CalcError::NonReal("atanh")),
            Ordering::Less => Ok(finish(atanh_fixed(self, prec)?, prec, eps)),
        }
    }

    /// Inverse hyperbolic cotangent.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at 0 and `±1`, [`CalcError::NonReal`]
    /// strictly between -1 and 1.
    pub fn acoth(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.is_zero() {
            return Err(CalcError::undefined("acoth of zero"));
        }
        match self.abs().cmp(&Rational::one()) {
            Ordering::Equal => Err(CalcError::undefined("acoth of ±1")),
            Ordering::Less => Err(CalcError::NonReal("acoth")),
            Ordering::Greater => Ok(finish(atanh_fixed(&self.inverse()?, prec)?, prec, eps)),
        }
    }

    /// Inverse hyperbolic secant.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at zero, [`CalcError::NonReal`] outside
    /// `(0, 1]`.
    pub fn asech(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.is_zero() {
            return Err(CalcError::undefined("asech of zero"));
        }
        if self.is_negative() || *self > Rational::one() {
            return Err(CalcError::NonReal("asech"));
        }
        Ok(finish(acosh_fixed(&self.inverse()?, prec), prec, eps))
    }

    /// Inverse hyperbolic cosecant.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Undefined`] at zero.
    pub fn acsch(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.is_zero() {
            return Err(CalcError::undefined("acsch of zero"));
        }
        Ok(finish(asinh_fixed(&self.inverse()?, prec), prec, eps))
    }

    /// Gudermannian function `atan(sinh x)`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn gd(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.abs() > Rational::from(2 * prec as i64) {
            return Ok(finish(with_sign(half_pi(prec), self.is_negative()), prec, eps));
        }
        let w = prec + GUARD;
        let (e, m) = exp_pair(self, w + 1);
        let v = fixed::atan_fixed(&((e - m) >> 2), w);
        Ok(finish(rescale(v, w, prec), prec, eps))
    }

    /// Inverse Gudermannian function `ln((1 + sin x) / cos x)`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::NonReal`] when `|x| >= pi/2`.
    pub fn agd(&self, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.is_zero() {
            return Ok(Rational::zero());
        }
        let x = self.abs();
        if !below_half_pi(&x) {
            return Err(CalcError::NonReal("agd"));
        }
        let base = prec + GUARD;
        let q = ratio(base, "agd", |p| {
            let (s, c) = fixed::sin_cos(&x, p);
            (one(p) + s, c)
        })?;
        let v = with_sign(fixed::ln_fixed(&q, base), self.is_negative());
        Ok(finish(rescale(v, base, prec), prec, eps))
    }

    /// Square root as a multiple of `eps`, chosen by the rounding word.
    ///
    /// [`Rounding::EXACT`] returns the exact root of a perfect square
    /// whatever `eps` is; [`Rounding::NEGATE`] selects the negative root.
    ///
    /// # Errors
    ///
    /// [`CalcError::NonReal`] for negative values, [`CalcError::Domain`]
    /// for a non-positive `eps`.
    pub fn sqrt(&self, eps: &Rational, rounding: Rounding) -> Result<Rational> {
        positive_epsilon(eps)?;
        if self.is_negative() {
            return Err(CalcError::NonReal("sqrt"));
        }
        if self.is_zero() {
            return Ok(Rational::zero());
        }
        let negate = rounding.has(Rounding::NEGATE);
        let signed = |r: Rational| if negate { -r } else { r };
        if rounding.has(Rounding::EXACT) {
            if let Some(root) = exact_root(self, 2) {
                return Ok(signed(root));
            }
        }

        // sqrt(x) / eps = sqrt(p b^2 / (q a^2)) for x = p/q, eps = a/b
        let (a, b) = (eps.numerator(), eps.denominator());
        let big_p = &self.numerator() * &(&b * &b);
        let big_q = &self.denominator() * &(&a * &a);
        let k0 = (&big_p / &big_q).isqrt()?;
        if &(&k0 * &k0) * &big_q == big_p {
            return Ok(signed(eps * &Rational::from_integer(k0)));
        }
        let odd = &(&k0 + &k0) + &Integer::one();
        let frac_vs_half = (&big_p * &Integer::new(4)).cmp(&(&(&odd * &odd) * &big_q));
        let (floor, frac_vs_half) = if negate {
            (-(k0 + Integer::one()), frac_vs_half.reverse())
        } else {
            (k0, frac_vs_half)
        };
        let sign = if negate { -1 } else { 1 };
        let k = if rounding.base().rounds_up(sign, 1, floor.is_even(), frac_vs_half) {
            floor + Integer::one()
        } else {
            floor
        };
        Ok(eps * &Rational::from_integer(k))
    }

    /// Principal `n`-th root.
    ///
    /// # Errors
    ///
    /// [`CalcError::Domain`] when `n` is not a positive integer, or for an
    /// even root of a negative value.
    pub fn root(&self, n: &Rational, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        let n = n.integer_arg("root")?;
        if !n.is_positive() {
            return Err(CalcError::domain("root order must be positive"));
        }
        if self.is_zero() || n.is_one() {
            return Ok(self.clone());
        }
        if self.is_negative() {
            if n.is_even() {
                return Err(CalcError::domain("even root of a negative value"));
            }
            return Ok(-(-self).root(&Rational::from_integer(n), eps)?);
        }
        let order = n.to_u64().unwrap_or(u64::MAX);
        if let Some(root) = exact_root(self, order) {
            return Ok(root);
        }
        let inverse = Rational::from_pair(Integer::one(), n)?;
        Ok(finish(exp_product(&inverse, self, prec)?, prec, eps))
    }

    /// `sqrt(x^2 + y^2)` rounded to nearest.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn hypot(&self, y: &Rational, eps: &Rational) -> Result<Rational> {
        (&(self * self) + &(y * y)).sqrt(eps, Rounding::NEAREST_EVEN)
    }

    /// Angle of the point `(x, self)`, in `(-pi, pi]`; zero at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn atan2(&self, x: &Rational, eps: &Rational) -> Result<Rational> {
        let prec = precision(eps)?;
        if self.is_zero() && x.is_zero() {
            return Ok(Rational::zero());
        }
        let size = [self, x]
            .iter()
            .filter(|v| !v.is_zero())
            .filter_map(|v| v.ilog2().ok())
            .max()
            .unwrap_or(0);
        let w = prec + GUARD;
        let y = to_fixed(&self.scale(-size), w);
        let x = to_fixed(&x.scale(-size), w);
        Ok(finish(rescale(fixed::atan2_fixed(&y, &x, w), w, prec), prec, eps))
    }

    /// The value raised to `y`.
    ///
    /// Integer exponents and exponents whose root of the base is exact give
    /// exact results; other exponents are evaluated as `exp(y ln x)`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Domain`] for zero to a negative power or an oversized
    /// result, [`CalcError::NonReal`] for a negative base with a
    /// fractional exponent.
    pub fn power(&self, y: &Rational, eps: &Rational) -> Result<Rational> {
        positive_epsilon(eps)?;
        if let Some(n) = y.to_integer() {
            let n = n.to_i64().map_err(|_| CalcError::domain("exponent too large"))?;
            return self.powi(n);
        }
        if self.is_zero() {
            return if y.is_positive() {
                Ok(Rational::zero())
            } else {
                Err(CalcError::domain("zero to a negative power"))
            };
        }
        if self.is_negative() {
            return Err(CalcError::NonReal("power"));
        }
        if let Ok(order) = y.denominator().to_u64() {
            if let Some(root) = exact_root(self, order) {
                if let Ok(n) = y.numerator().to_i64() {
                    return root.powi(n);
                }
            }
        }
        let prec = precision(eps)?;
        Ok(finish(exp_product(y, self, prec)?, prec, eps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calq_integers::ErrorKind;

    fn q(s: &str) -> Rational {
        s.parse().unwrap()
    }

    fn eps20() -> Rational {
        Rational::power_of_ten(-20)
    }

    /// Checks a result against a reference value carrying 19 or 20 decimals.
    fn assert_close(actual: Result<Rational>, expected: &str) {
        let actual = actual.unwrap();
        let diff = (&actual - &q(expected)).abs();
        assert!(diff < Rational::power_of_ten(-19), "{actual:?} vs {expected}");
    }

    #[test]
    fn test_pi_and_arg() {
        assert_eq!(Rational::pi(&eps20()).unwrap(), q("3.14159265358979323846"));
        assert_eq!(Rational::pi(&q("0.01")).unwrap(), q("3.14"));
        assert_eq!(q("-1").arg(&eps20()).unwrap(), Rational::pi(&eps20()).unwrap());
        assert_eq!(q("1").arg(&eps20()).unwrap(), 0);
        assert!(Rational::pi(&Rational::zero()).is_err());
    }

    #[test]
    fn test_exp_ln_log() {
        let e = eps20();
        assert_close(q("-1").exp(&e), "0.36787944117144232160");
        assert_close(q("2").exp(&e), "7.38905609893065022723");
        assert_eq!(q("0").exp(&e).unwrap(), 1);
        assert_eq!(q("-100000").exp(&e).unwrap(), 0);
        assert!(Rational::from(1i64 << 40).exp(&e).is_err());

        assert_close(q("2").ln(&e), "0.69314718055994530942");
        assert_eq!(q("1").ln(&e).unwrap(), 0);
        assert_eq!(q("0").ln(&e).unwrap_err().kind(), ErrorKind::UndefinedResult);
        assert!(q("-1").ln(&e).unwrap_err().is_non_real());

        assert_close(q("2").log(&e), "0.30102999566398119521");
        assert_eq!(q("1000").log(&e).unwrap(), 3);
        assert!(q("-2").log(&e).unwrap_err().is_non_real());
    }

    #[test]
    fn test_circular() {
        let e = eps20();
        assert_close(q("1").sin(&e), "0.84147098480789650665");
        assert_close(q("-1").cos(&e), "0.54030230586813971740");
        assert_close(q("1").tan(&e), "1.55740772465490223051");
        assert_close(q("1").cot(&e), "0.64209261593433070301");
        assert_close(q("1").sec(&e), "1.85081571768092561791");
        assert_close(q("1").csc(&e), "1.18839510577812121626");
        assert_eq!(q("0").sin(&e).unwrap(), 0);
        assert_eq!(q("0").cos(&e).unwrap(), 1);
        assert_eq!(q("0").sec(&e).unwrap(), 1);
        assert_eq!(q("0").cot(&e).unwrap_err().kind(), ErrorKind::UndefinedResult);
        assert_eq!(q("0").csc(&e).unwrap_err().kind(), ErrorKind::UndefinedResult);
    }

    #[test]
    fn test_tan_near_pole() {
        // 355/226 is within 2e-7 of pi/2
        assert_close(q("355/226").tan(&eps20()), "-7497258.18532558711290507183");
    }

    #[test]
    fn test_hyperbolic() {
        let e = eps20();
        assert_close(q("1").sinh(&e), "1.17520119364380145688");
        assert_close(q("1").cosh(&e), "1.54308063481524377848");
        assert_close(q("1").tanh(&e), "0.76159415595576488812");
        assert_close(q("1").coth(&e), "1.31303528549933130364");
        assert_close(q("1").sech(&e), "0.64805427366388539958");
        assert_close(q("1").csch(&e), "0.85091812823932154513");
        assert_eq!(q("0").cosh(&e).unwrap(), 1);
        assert_eq!(q("0").sech(&e).unwrap(), 1);
        assert_eq!(q("1000").tanh(&e).unwrap(), 1);
        assert_eq!(q("-1000").coth(&e).unwrap(), -1);
        assert_eq!(q("1000").sech(&e).unwrap(), 0);
        assert!(q("0").coth(&e).is_err());
        assert!(q("0").csch(&e).is_err());
    }

    #[test]
    fn test_inverse_circular() {
        let e = eps20();
        assert_close(q("0.5").acos(&e), "1.04719755119659774615");
        assert_close(q("1").asin(&e), "1.57079632679489661923");
        assert_close(q("-1").atan(&e), "-0.78539816339744830962");
        assert_close(q("-1").acot(&e), "2.35619449019234492885");
        assert_close(q("0").acot(&e), "1.57079632679489661923");
        assert_close(q("-1").asec(&e), "3.14159265358979323846");
        assert_close(q("1").acsc(&e), "1.57079632679489661923");
        assert_eq!(q("0").asin(&e).unwrap(), 0);
        assert_eq!(q("1").asec(&e).unwrap(), 0);
        assert!(q("2").acos(&e).unwrap_err().is_non_real());
        assert!(q("2").asin(&e).unwrap_err().is_non_real());
        assert!(q("0.5").asec(&e).unwrap_err().is_non_real());
        assert!(!q("0").asec(&e).unwrap_err().is_non_real());
        assert!(!q("0").acsc(&e).unwrap_err().is_non_real());
    }

    #[test]
    fn test_inverse_hyperbolic() {
        let e = eps20();
        assert_close(q("1").asinh(&e), "0.88137358701954302523");
        assert_close(q("-1").asinh(&e), "-0.88137358701954302523");
        assert_close(q("2").acosh(&e), "1.31695789692481670862");
        assert_close(q("0.5").atanh(&e), "0.5493061443340548457");
        assert_close(q("2").acoth(&e), "0.5493061443340548457");
        assert_close(q("0.5").asech(&e), "1.31695789692481670862");
        assert_close(q("1").acsch(&e), "0.88137358701954302523");
        assert_eq!(q("1").acosh(&e).unwrap(), 0);
        assert_eq!(q("1").asech(&e).unwrap(), 0);
        assert_eq!(q("0").atanh(&e).unwrap(), 0);
        assert!(q("0").acosh(&e).unwrap_err().is_non_real());
        assert!(q("2").atanh(&e).unwrap_err().is_non_real());
        assert!(!q("1").atanh(&e).unwrap_err().is_non_real());
        assert!(q("0.5").acoth(&e).unwrap_err().is_non_real());
        assert!(!q("1").acoth(&e).unwrap_err().is_non_real());
        assert!(!q("0").acoth(&e).unwrap_err().is_non_real());
        assert!(q("-0.5").asech(&e).unwrap_err().is_non_real());
        assert!(q("0").acsch(&e).is_err());
    }

    #[test]
    fn test_gudermannian() {
        let e = eps20();
        assert_close(q("1").gd(&e), "0.86576948323965862429");
        assert_close(q("1").agd(&e), "1.22619117088351707081");
        assert_close(q("-1").agd(&e), "-1.22619117088351707081");
        assert_eq!(q("0").agd(&e).unwrap(), 0);
        assert!(q("2").agd(&e).unwrap_err().is_non_real());
        assert!(q("-2").agd(&e).unwrap_err().is_non_real());
    }

    #[test]
    fn test_sqrt_rounding() {
        let e = q("1e-4");
        let sqrt = |x: &str, mode: u32| q(x).sqrt(&e, Rounding::new(mode)).unwrap();
        assert_eq!(sqrt("4", 0), 2);
        assert_eq!(sqrt("4", 64), -2);
        assert_eq!(sqrt("2", 0), q("1.4142"));
        assert_eq!(sqrt("2", 1), q("1.4143"));
        assert_eq!(sqrt("2", 24), q("1.4142"));
        let x = (&q("1.2345678") * &q("1.2345678")).to_display_string(crate::DisplayMode::Fraction, 0);
        assert_eq!(sqrt(&x, 24), q("1.2346"));
        assert_eq!(sqrt(&x, 32), q("1.2345678"));
        assert_eq!(sqrt(&x, 96), q("-1.2345678"));
        // exact halves of eps break ties to even
        assert_eq!(sqrt("0.0000000025", 24), 0);
        assert_eq!(sqrt("0.0000000225", 24), q("0.0002"));
        assert!(q("-4").sqrt(&e, Rounding::NEAREST_EVEN).unwrap_err().is_non_real());
        assert_eq!(q("4").sqrt(&eps20(), Rounding::NEAREST_EVEN).unwrap(), 2);
    }

    #[test]
    fn test_root_and_hypot() {
        let e = eps20();
        assert_eq!(q("7").root(&q("4"), &e).unwrap(), q("1.62657656169778574321"));
        assert_eq!(q("27/8").root(&q("3"), &e).unwrap(), q("3/2"));
        assert_eq!(q("-8").root(&q("3"), &e).unwrap(), -2);
        assert!(q("1").root(&q("0"), &e).is_err());
        assert!(q("0").root(&q("-1"), &e).is_err());
        assert_eq!(q("-2").root(&q("4"), &e).unwrap_err().kind(), ErrorKind::DomainError);

        assert_eq!(q("3").hypot(&q("4"), &e).unwrap(), 5);
        assert_close(q("2").hypot(&q("-3"), &e), "3.60555127546398929312");
    }

    #[test]
    fn test_atan2_quadrants() {
        let e = eps20();
        let atan2 = |y: i64, x: i64| Rational::from(y).atan2(&Rational::from(x), &e).unwrap();
        assert_eq!(atan2(0, 0), 0);
        assert_eq!(atan2(0, 1), 0);
        assert_close(Ok(atan2(0, -1)), "3.14159265358979323846");
        assert_close(Ok(atan2(1, 1)), "0.78539816339744830962");
        assert_close(Ok(atan2(-1, -1)), "-2.35619449019234492885");
        assert_close(Ok(atan2(1, 0)), "1.57079632679489661923");
        assert_close(Ok(atan2(-1, 0)), "-1.57079632679489661923");
        let big = q("1e30").atan2(&q("1e30"), &e).unwrap();
        assert_eq!(big, atan2(1, 1));
    }

    #[test]
    fn test_power() {
        let e = eps20();
        assert_eq!(q("81").power(&q("1/4"), &e).unwrap(), 3);
        assert_eq!(q("8").power(&q("2/3"), &e).unwrap(), 4);
        assert_eq!(q("2").power(&q("-1"), &e).unwrap(), q("1/2"));
        assert_eq!(q("-2").power(&q("3"), &e).unwrap(), -8);
        assert_close(q("2").power(&q("0.1"), &e), "1.07177346253629316421");
        assert_close(q("2").power(&q("1/2"), &e), "1.41421356237309504880");
        assert_eq!(q("10").power(&q("-30.5"), &e).unwrap(), 0);
        assert_eq!(q("0").power(&q("1/2"), &e).unwrap(), 0);
        assert_eq!(q("0").power(&q("-1"), &e).unwrap_err().kind(), ErrorKind::DomainError);
        assert_eq!(q("0").power(&q("-1/2"), &e).unwrap_err().kind(), ErrorKind::DomainError);
        assert!(q("-1").power(&q("0.1"), &e).unwrap_err().is_non_real());
    }

    #[test]
    fn test_epsilon_bounds() {
        let x = q("0.7");
        for digits in [3, 10, 30] {
            let eps = Rational::power_of_ten(-digits);
            let coarse = x.exp(&eps).unwrap();
            let fine = x.exp(&Rational::power_of_ten(-digits - 10)).unwrap();
            assert!((&coarse - &fine).abs() <= eps, "{digits}");
            assert!(coarse.is_multiple_of(&eps));
        }
        assert!(x.sin(&q("-1e-5")).is_err());
    }
}
