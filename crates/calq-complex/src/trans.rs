//! Exponential, logarithmic, circular and hyperbolic functions of a complex
//! argument, plus roots and powers.
//!
//! Each function evaluates its parts with the real functions at a working
//! epsilon a few bits finer than the requested one, scaled down further by
//! the magnitude of the intermediate values, and rounds both parts to the
//! nearest multiple of `eps` at the end.

use num_traits::{One, Zero};
use tracing::trace;

use calq_integers::{CalcError, Integer, Result, Rounding};
use calq_rational::{Config, Rational};

use crate::Complex;

/// Guard bits between the working epsilon and the requested one.
const GUARD: i64 = 8;

/// Precision raises tried before a quotient is treated as a pole.
pub(crate) const RETRIES: usize = 12;

/// Exponentials needing more than this many bits are refused.
const EXP_BIT_LIMIT: i64 = 1 << 22;

pub(crate) fn working(eps: &Rational, bits: i64) -> Rational {
    eps.scale(-(bits + GUARD))
}

pub(crate) fn finish(z: &Complex, eps: &Rational) -> Complex {
    z.appr(eps, Rounding::NEAREST_EVEN)
}

/// Number of integer bits of |x|; zero below one.
pub(crate) fn magnitude_bits(x: &Rational) -> i64 {
    if x.is_zero() {
        return 0;
    }
    x.ilog2().map_or(0, |b| (b + 1).max(0))
}

/// A `k` with `e^x <= 2^k`.
pub(crate) fn exp_bits(x: &Rational) -> Result<i64> {
    if !x.is_positive() {
        return Ok(0);
    }
    // e < 2^(3/2)
    let bound = (x * &Rational::from_i64_pair(3, 2)?).ceil();
    match bound.to_i64() {
        Ok(b) if b < EXP_BIT_LIMIT => Ok(b + 1),
        _ => Err(CalcError::domain("exponential argument too large")),
    }
}

/// Runs the real function on a real argument, falling back to the complex
/// evaluation when the real result does not exist.
pub(crate) fn real_or<R, C>(z: &Complex, real: R, complex: C) -> Result<Complex>
where
    R: FnOnce(&Rational) -> Result<Rational>,
    C: FnOnce() -> Result<Complex>,
{
    if z.is_real() {
        match real(z.re()) {
            Ok(v) => return Ok(Complex::from(v)),
            Err(e) if e.is_non_real() => trace!(error = %e, "continuing into the complex plane"),
            Err(e) => return Err(e),
        }
    }
    complex()
}

/// Evaluates `num / den` where both come from `parts` at a working epsilon,
/// refining until the denominator is resolved well enough for `eps`.
fn quotient<F>(eps: &Rational, parts: F) -> Result<Complex>
where
    F: Fn(&Rational) -> Result<(Complex, Complex)>,
{
    let mut bits = 0;
    for _ in 0..RETRIES {
        let (num, den) = parts(&working(eps, bits))?;
        let need = if den.is_zero() {
            2 * bits + 64
        } else {
            let lost = (-den.ilog2()?).max(0) + 1;
            let grow = num.ilog2().map_or(0, |b| b.max(0) + 1);
            2 * lost + grow
        };
        if bits >= need {
            return Ok(finish(&num.checked_div(&den)?, eps));
        }
        trace!(from = bits, to = need, "raising precision");
        bits = need;
    }
    Err(CalcError::undefined("too close to a pole"))
}

fn sin_cos(x: &Rational, w: &Rational) -> Result<(Rational, Rational)> {
    Ok((x.sin(w)?, x.cos(w)?))
}

fn sinh_cosh(x: &Rational, w: &Rational) -> Result<(Rational, Rational)> {
    Ok((x.sinh(w)?, x.cosh(w)?))
}

impl Complex {
    /// Magnitude `sqrt(re^2 + im^2)`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn abs(&self, eps: &Rational) -> Result<Rational> {
        self.re().hypot(self.im(), eps)
    }

    /// Argument in `(-pi, pi]`; zero for zero.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn arg(&self, eps: &Rational) -> Result<Rational> {
        self.im().atan2(self.re(), eps)
    }

    /// The value with magnitude `r` and argument `theta`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn polar(r: &Rational, theta: &Rational, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        let w = working(eps, magnitude_bits(r) + 1);
        let (s, c) = sin_cos(theta, &w)?;
        Ok(finish(&Complex::new(c, s).mul_real(r), eps))
    }

    /// Exponential function.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps` or a real part
    /// too large to represent.
    pub fn exp(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().exp(eps)?));
        }
        let w = working(eps, exp_bits(self.re())?);
        let scale = self.re().exp(&w)?;
        let (s, c) = sin_cos(self.im(), &w)?;
        Ok(finish(&Complex::new(c, s).mul_real(&scale), eps))
    }

    /// Principal natural logarithm, with imaginary part in `(-pi, pi]`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] for zero, [`CalcError::Domain`] for a
    /// non-positive `eps`.
    pub fn ln(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        real_or(self, |x| x.ln(eps), || {
            let w = working(eps, 1);
            let re = self.norm().ln(&w)?.scale(-1);
            let im = self.arg(&w)?;
            Ok(finish(&Complex::new(re, im), eps))
        })
    }

    /// Principal base 10 logarithm.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] for zero, [`CalcError::Domain`] for a
    /// non-positive `eps`.
    pub fn log(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        real_or(self, |x| x.log(eps), || {
            let w = working(eps, 2);
            let ln = self.ln(&w)?;
            let size = magnitude_bits(&(&ln.re().abs() + &ln.im().abs()));
            let ten = Rational::from(10).ln(&working(eps, size + 2))?;
            Ok(finish(&ln.try_div_real(&ten)?, eps))
        })
    }

    /// Sine.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps` or an
    /// imaginary part too large to represent.
    pub fn sin(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().sin(eps)?));
        }
        let w = working(eps, exp_bits(&self.im().abs())?);
        let (s, c) = sin_cos(self.re(), &w)?;
        let (sh, ch) = sinh_cosh(self.im(), &w)?;
        Ok(finish(&Complex::new(&s * &ch, &c * &sh), eps))
    }

    /// Cosine.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps` or an
    /// imaginary part too large to represent.
    pub fn cos(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().cos(eps)?));
        }
        let w = working(eps, exp_bits(&self.im().abs())?);
        let (s, c) = sin_cos(self.re(), &w)?;
        let (sh, ch) = sinh_cosh(self.im(), &w)?;
        Ok(finish(&Complex::new(&c * &ch, -(&s * &sh)), eps))
    }

    /// Hyperbolic sine.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps` or a real part
    /// too large to represent.
    pub fn sinh(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().sinh(eps)?));
        }
        let w = working(eps, exp_bits(&self.re().abs())?);
        let (sh, ch) = sinh_cosh(self.re(), &w)?;
        let (s, c) = sin_cos(self.im(), &w)?;
        Ok(finish(&Complex::new(&sh * &c, &ch * &s), eps))
    }

    /// Hyperbolic cosine.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps` or a real part
    /// too large to represent.
    pub fn cosh(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().cosh(eps)?));
        }
        let w = working(eps, exp_bits(&self.re().abs())?);
        let (sh, ch) = sinh_cosh(self.re(), &w)?;
        let (s, c) = sin_cos(self.im(), &w)?;
        Ok(finish(&Complex::new(&ch * &c, &sh * &s), eps))
    }

    /// Tangent, `sin / cos`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at or too close to a pole,
    /// [`CalcError::Domain`] for a non-positive `eps`.
    pub fn tan(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().tan(eps)?));
        }
        quotient(eps, |w| Ok((self.sin(w)?, self.cos(w)?)))
    }

    /// Cotangent, `cos / sin`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at or too close to a pole,
    /// [`CalcError::Domain`] for a non-positive `eps`.
    pub fn cot(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().cot(eps)?));
        }
        quotient(eps, |w| Ok((self.cos(w)?, self.sin(w)?)))
    }

    /// Secant, `1 / cos`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at or too close to a pole,
    /// [`CalcError::Domain`] for a non-positive `eps`.
    pub fn sec(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().sec(eps)?));
        }
        quotient(eps, |w| Ok((Complex::one(), self.cos(w)?)))
    }

    /// Cosecant, `1 / sin`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at or too close to a pole,
    /// [`CalcError::Domain`] for a non-positive `eps`.
    pub fn csc(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().csc(eps)?));
        }
        quotient(eps, |w| Ok((Complex::one(), self.sin(w)?)))
    }

    /// Hyperbolic tangent, `sinh / cosh`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at or too close to a pole,
    /// [`CalcError::Domain`] for a non-positive `eps`.
    pub fn tanh(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().tanh(eps)?));
        }
        quotient(eps, |w| Ok((self.sinh(w)?, self.cosh(w)?)))
    }

    /// Hyperbolic cotangent, `cosh / sinh`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at or too close to a pole,
    /// [`CalcError::Domain`] for a non-positive `eps`.
    pub fn coth(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().coth(eps)?));
        }
        quotient(eps, |w| Ok((self.cosh(w)?, self.sinh(w)?)))
    }

    /// Hyperbolic secant, `1 / cosh`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at or too close to a pole,
    /// [`CalcError::Domain`] for a non-positive `eps`.
    pub fn sech(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().sech(eps)?));
        }
        quotient(eps, |w| Ok((Complex::one(), self.cosh(w)?)))
    }

    /// Hyperbolic cosecant, `1 / sinh`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at or too close to a pole,
    /// [`CalcError::Domain`] for a non-positive `eps`.
    pub fn csch(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().csch(eps)?));
        }
        quotient(eps, |w| Ok((Complex::one(), self.sinh(w)?)))
    }

    /// Principal square root, with both parts rounded by `rounding`.
    ///
    /// Bit 64 of the rounding word selects the negated root. With bit 32 set,
    /// a root whose parts are exact rationals is returned unrounded.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn sqrt(&self, eps: &Rational, rounding: Rounding) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            if self.re().is_negative() {
                return Ok(Complex::new(Rational::zero(), (-self.re()).sqrt(eps, rounding)?));
            }
            return Ok(Complex::from(self.re().sqrt(eps, rounding)?));
        }
        let exact = exact_half_root(self);
        let keep_exact = exact.is_some() && rounding.has(Rounding::EXACT);
        let (big, small) = match exact {
            Some(parts) => parts,
            None => approx_half_root(self, eps)?,
        };
        let (re, im) = if self.re().is_negative() { (small, big) } else { (big, small) };
        let im = if self.im().is_negative() { -im } else { im };
        let mut root = Complex::new(re, im);
        if !keep_exact {
            let parts = Rounding::new(rounding.bits() & !(Rounding::NEGATE | Rounding::EXACT));
            root = root.appr(eps, parts);
        }
        Ok(if rounding.has(Rounding::NEGATE) { -root } else { root })
    }

    /// Principal `n`-th root.
    ///
    /// Real arguments with a real root give the real root.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps` or an order
    /// that is not a positive integer.
    pub fn root(&self, n: &Rational, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        let order = n
            .to_integer()
            .filter(Integer::is_positive)
            .ok_or_else(|| CalcError::domain("root order must be a positive integer"))?;
        if self.is_real() && (!self.re().is_negative() || order.is_odd()) {
            return Ok(Complex::from(self.re().root(n, eps)?));
        }
        if order == 1 {
            return Ok(finish(self, eps));
        }
        let twice = order
            .to_i64()
            .ok()
            .and_then(|k| k.checked_mul(2))
            .ok_or_else(|| CalcError::domain("root order too large"))?;
        let norm = self.norm();
        let bits = magnitude_bits(&norm) / twice + 1;
        let w = working(eps, bits + 1);
        let modulus = norm.root(&Rational::from(twice), &w)?;
        let angle = self.arg(&w)?.checked_div(n)?;
        Complex::polar(&modulus, &angle, eps)
    }

    /// The value raised to a complex power, `exp(w ln z)` on the principal
    /// branch, rounded to `eps`.
    ///
    /// Integer exponents are computed exactly before rounding.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`, zero to a
    /// power with non-positive real part, or a result too large to
    /// represent.
    pub fn power(&self, exponent: &Complex, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if let Some(y) = exponent.to_real() {
            if let Some(n) = y.to_integer() {
                let n = n.to_i64().map_err(|_| CalcError::domain("exponent too large"))?;
                return Ok(finish(&self.powi(n)?, eps));
            }
            if self.is_real() {
                match self.re().power(&y, eps) {
                    Ok(v) => return Ok(Complex::from(v)),
                    Err(e) if e.is_non_real() => {}
                    Err(e) => return Err(e),
                }
            }
        }
        if self.is_zero() {
            return if exponent.re().is_positive() {
                Ok(Complex::zero())
            } else {
                Err(CalcError::domain("zero to a non-positive power"))
            };
        }
        // the coarse logarithm is off by at most 1/8 in each part
        let size = &exponent.re().abs() + &exponent.im().abs();
        let rough = exponent * &self.ln(&Rational::from_i64_pair(1, 16)?)?;
        let margin = &size.scale(-2) + &Rational::one();
        let k = exp_bits(&(rough.re() + &margin))?;
        let log = self.ln(&working(eps, k + magnitude_bits(&size) + 2))?;
        (exponent * &log).exp(eps)
    }

    fn try_div_real(&self, divisor: &Rational) -> Result<Complex> {
        Ok(Complex::new(self.re().checked_div(divisor)?, self.im().checked_div(divisor)?))
    }
}

/// The larger and smaller magnitude of the square root's parts, when the
/// root of the value is an exact complex rational.
fn exact_half_root(z: &Complex) -> Option<(Rational, Rational)> {
    let norm = z.norm();
    if !norm.is_square() {
        return None;
    }
    let exact = Rounding::new(Rounding::NEAREST_EVEN.bits() | Rounding::EXACT);
    let one = Rational::one();
    let modulus = norm.sqrt(&one, exact).ok()?;
    let half = (&modulus + &z.re().abs()).scale(-1);
    if !half.is_square() {
        return None;
    }
    let big = half.sqrt(&one, exact).ok()?;
    let small = z.im().abs().checked_div(&big.scale(1)).ok()?;
    Some((big, small))
}

/// As [`exact_half_root`], to within a working epsilon finer than `eps`.
fn approx_half_root(z: &Complex, eps: &Rational) -> Result<(Rational, Rational)> {
    let norm = z.norm();
    let lost = (-norm.ilog2()?.div_euclid(4)).max(0) + 1;
    let w = working(eps, 2 * lost);
    let modulus = norm.sqrt(&w, Rounding::NEAREST_EVEN)?;
    let half = (&modulus + &z.re().abs()).scale(-1);
    let big = half.sqrt(&w, Rounding::NEAREST_EVEN)?;
    let small = z.im().abs().checked_div(&big.scale(1))?;
    Ok((big, small))
}
