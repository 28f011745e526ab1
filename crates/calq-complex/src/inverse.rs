//! Inverse circular and hyperbolic functions and the Gudermannian pair.
//!
//! Every inverse is written as a principal logarithm:
//!
//! | function | form |
//! |----------|------|
//! | `asin z` | `-i ln(iz + sqrt(1 - z^2))` |
//! | `acos z` | `-i ln(z + i sqrt(1 - z^2))` |
//! | `atan z` | `i/2 (ln(1 - iz) - ln(1 + iz))` |
//! | `asinh z` | `ln(z + sqrt(z^2 + 1))` |
//! | `acosh z` | `ln(z + sqrt(z^2 - 1))` |
//! | `atanh z` | `1/2 ln((1 + z) / (1 - z))` |
//! | `agd z` | `ln(1 + sin z) - ln(cos z)` |
//! | `gd z` | `-i (ln(1 + i sinh z) - ln(cosh z))` |
//!
//! and the reciprocal forms apply these to `1/z`. Real arguments inside the
//! real domain give the real result.

use num_traits::{One, Zero};
use tracing::trace;

use calq_integers::{CalcError, Result, Rounding};
use calq_rational::{Config, Rational};

use crate::trans::{finish, real_or, working, RETRIES};
use crate::Complex;

/// `ln(a)` for an `a` built by `arg` at a working epsilon. Cancellation can
/// make `a` small, so the working epsilon shrinks with `|a|`.
fn log_of<F>(eps: &Rational, arg: F) -> Result<Complex>
where
    F: Fn(&Rational) -> Result<Complex>,
{
    let mut bits = 1;
    for _ in 0..RETRIES {
        let w = working(eps, bits);
        let a = arg(&w)?;
        let need = if a.is_zero() { 2 * bits + 64 } else { (-a.ilog2()?).max(0) + 2 };
        if bits >= need {
            return a.ln(&w);
        }
        trace!(from = bits, to = need, "raising precision");
        bits = need;
    }
    Err(CalcError::undefined("logarithm of zero"))
}

fn square_root(z: &Complex, w: &Rational) -> Result<Complex> {
    z.sqrt(w, Rounding::NEAREST_EVEN)
}

fn one_minus_square(z: &Complex) -> Complex {
    &Complex::one() - &(z * z)
}

impl Complex {
    /// Inverse sine.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn asin(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        real_or(self, |x| x.asin(eps), || {
            let rest = one_minus_square(self);
            let l = log_of(eps, |w| Ok(&self.mul_i() + &square_root(&rest, w)?))?;
            Ok(finish(&l.mul_neg_i(), eps))
        })
    }

    /// Inverse cosine.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn acos(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        real_or(self, |x| x.acos(eps), || {
            let rest = one_minus_square(self);
            let l = log_of(eps, |w| Ok(self + &square_root(&rest, w)?.mul_i()))?;
            Ok(finish(&l.mul_neg_i(), eps))
        })
    }

    /// Inverse tangent.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at `i` and `-i`, [`CalcError::Domain`] for a
    /// non-positive `eps`.
    pub fn atan(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().atan(eps)?));
        }
        let iz = self.mul_i();
        let below = &Complex::one() - &iz;
        let above = &Complex::one() + &iz;
        if below.is_zero() || above.is_zero() {
            return Err(CalcError::undefined("atan of i or -i"));
        }
        let w = working(eps, 2);
        let diff = &below.ln(&w)? - &above.ln(&w)?;
        Ok(finish(&diff.mul_i().scale(-1), eps))
    }

    /// Inverse cotangent, `atan(1/z)`; `pi/2` at zero.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at `i` and `-i`, [`CalcError::Domain`] for a
    /// non-positive `eps`.
    pub fn acot(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().acot(eps)?));
        }
        self.inverse()?.atan(eps)
    }

    /// Inverse secant, `acos(1/z)`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at zero, [`CalcError::Domain`] for a
    /// non-positive `eps`.
    pub fn asec(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        real_or(self, |x| x.asec(eps), || self.inverse()?.acos(eps))
    }

    /// Inverse cosecant, `asin(1/z)`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at zero, [`CalcError::Domain`] for a
    /// non-positive `eps`.
    pub fn acsc(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        real_or(self, |x| x.acsc(eps), || self.inverse()?.asin(eps))
    }

    /// Inverse hyperbolic sine.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn asinh(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().asinh(eps)?));
        }
        let rest = &(self * self) + &Complex::one();
        let l = log_of(eps, |w| Ok(self + &square_root(&rest, w)?))?;
        Ok(finish(&l, eps))
    }

    /// Inverse hyperbolic cosine.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive `eps`.
    pub fn acosh(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        real_or(self, |x| x.acosh(eps), || {
            let rest = &(self * self) - &Complex::one();
            let l = log_of(eps, |w| Ok(self + &square_root(&rest, w)?))?;
            Ok(finish(&l, eps))
        })
    }

    /// Inverse hyperbolic tangent.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at 1 and -1, [`CalcError::Domain`] for a
    /// non-positive `eps`.
    pub fn atanh(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        real_or(self, |x| x.atanh(eps), || {
            let below = &Complex::one() - self;
            if below.is_zero() {
                return Err(CalcError::undefined("atanh of 1"));
            }
            let ratio = (&Complex::one() + self).checked_div(&below)?;
            Ok(finish(&ratio.ln(&working(eps, 1))?.scale(-1), eps))
        })
    }

    /// Inverse hyperbolic cotangent, `atanh(1/z)`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at 0, 1 and -1, [`CalcError::Domain`] for a
    /// non-positive `eps`.
    pub fn acoth(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        real_or(self, |x| x.acoth(eps), || self.inverse()?.atanh(eps))
    }

    /// Inverse hyperbolic secant, `acosh(1/z)`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at zero, [`CalcError::Domain`] for a
    /// non-positive `eps`.
    pub fn asech(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        real_or(self, |x| x.asech(eps), || self.inverse()?.acosh(eps))
    }

    /// Inverse hyperbolic cosecant, `asinh(1/z)`.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] at zero, [`CalcError::Domain`] for a
    /// non-positive `eps`.
    pub fn acsch(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().acsch(eps)?));
        }
        self.inverse()?.asinh(eps)
    }

    /// Gudermannian function.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] where `cosh z` vanishes to within `eps`,
    /// [`CalcError::Domain`] for a non-positive `eps`.
    pub fn gd(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        if self.is_real() {
            return Ok(Complex::from(self.re().gd(eps)?));
        }
        if self.cosh(eps)?.is_zero() {
            return Err(CalcError::undefined("gd at a pole"));
        }
        let top = log_of(eps, |w| Ok(&Complex::one() + &self.sinh(w)?.mul_i()))?;
        let bottom = log_of(eps, |w| self.cosh(w))?;
        Ok(finish(&(&top - &bottom).mul_neg_i(), eps))
    }

    /// Inverse Gudermannian function.
    ///
    /// # Errors
    ///
    /// [`CalcError::Undefined`] where `cos z` vanishes,
    /// [`CalcError::Domain`] for a non-positive `eps`.
    pub fn agd(&self, eps: &Rational) -> Result<Complex> {
        Config::check_epsilon(eps)?;
        real_or(self, |x| x.agd(eps), || {
            let top = log_of(eps, |w| Ok(&Complex::one() + &self.sin(w)?))?;
            let bottom = log_of(eps, |w| self.cos(w))?;
            Ok(finish(&(&top - &bottom), eps))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calq_integers::ErrorKind;

    fn q(s: &str) -> Rational {
        s.parse().unwrap()
    }

    fn c(re: i64, im: i64) -> Complex {
        Complex::from_i64(re, im)
    }

    fn eps20() -> Rational {
        Rational::power_of_ten(-20)
    }

    fn assert_close(actual: Result<Complex>, re: &str, im: &str) {
        let actual = actual.unwrap();
        let tolerance = Rational::power_of_ten(-19);
        let dre = (actual.re() - &q(re)).abs();
        let dim = (actual.im() - &q(im)).abs();
        assert!(dre < tolerance && dim < tolerance, "got {actual:?}, want {re} {im}");
    }

    #[test]
    fn test_inverse_circular() {
        let z = c(2, 3);
        assert_close(z.asin(&eps20()), "0.57065278432109940071", "1.98338702991653543235");
        assert_close(z.acos(&eps20()), "1.00014354247379721852", "-1.98338702991653543235");
        assert_close(z.atan(&eps20()), "1.40992104959657552253", "0.22907268296853876630");
        assert_close(z.acot(&eps20()), "0.16087527719832109670", "-0.22907268296853876630");
        assert_close(z.asec(&eps20()), "1.42041072246703465598", "0.23133469857397331455");
        assert_close(z.acsc(&eps20()), "0.15038560432786196325", "-0.23133469857397331455");
    }

    #[test]
    fn test_inverse_hyperbolic() {
        let z = c(2, 3);
        assert_close(z.asinh(&eps20()), "1.96863792579309629179", "0.96465850440760279204");
        assert_close(z.acosh(&eps20()), "1.98338702991653543235", "1.00014354247379721852");
        assert_close(z.atanh(&eps20()), "0.14694666622552975204", "1.33897252229449356112");
        assert_close(z.acoth(&eps20()), "0.14694666622552975204", "-0.23182380450040305810");
        assert_close(z.asech(&eps20()), "0.23133469857397331455", "-1.42041072246703465598");
        assert_close(z.acsch(&eps20()), "0.15735549884498542878", "-0.22996290237720785451");
    }

    #[test]
    fn test_real_continuation() {
        let pi = "3.14159265358979323846";
        assert_close(c(2, 0).acos(&eps20()), "0", "1.31695789692481670863");
        assert_close(c(2, 0).asin(&eps20()), "1.57079632679489661923", "-1.31695789692481670863");
        assert_close(Complex::from(q("0.5")).asec(&eps20()), "0", "1.31695789692481670863");
        assert_close(Complex::from(q("0.5")).acsc(&eps20()), "1.57079632679489661923", "-1.31695789692481670863");
        assert_close(Complex::from(q("-0.5")).asech(&eps20()), "-1.31695789692481670863", pi);
        assert_close(c(2, 0).atanh(&eps20()), "0.54930614433405484570", "1.57079632679489661923");
        assert_close(Complex::from(q("0.5")).acoth(&eps20()), "0.54930614433405484570", "1.57079632679489661923");
        assert_close(c(0, 0).acosh(&eps20()), "0", "1.57079632679489661923");
        assert_close(c(2, 0).agd(&eps20()), "1.52345244356267352090", &format!("-{pi}"));
    }

    #[test]
    fn test_real_arguments_stay_real() {
        assert_eq!(c(0, 0).asin(&eps20()).unwrap(), c(0, 0));
        assert_eq!(c(1, 0).acos(&eps20()).unwrap(), c(0, 0));
        assert_eq!(c(0, 0).acot(&eps20()).unwrap(), c(0, 0).acos(&eps20()).unwrap());
        assert!(c(1, 0).atanh(&eps20()).is_err());
        assert_eq!(c(0, 0).asec(&eps20()).unwrap_err().kind(), ErrorKind::UndefinedResult);
    }

    #[test]
    fn test_poles() {
        assert_eq!(c(0, 1).atan(&eps20()).unwrap_err().kind(), ErrorKind::UndefinedResult);
        assert_eq!(c(0, -1).atan(&eps20()).unwrap_err().kind(), ErrorKind::UndefinedResult);
        assert_eq!(c(0, 1).acot(&eps20()).unwrap_err().kind(), ErrorKind::UndefinedResult);
    }

    #[test]
    fn test_gudermannian() {
        assert_close(c(1, 2).agd(&eps20()), "0.22751065843194319695", "1.42291146245922679700");
        assert_close(c(2, 1).gd(&eps20()), "1.42291146245922679700", "0.22751065843194319695");
        assert_eq!(c(0, 0).gd(&eps20()).unwrap(), c(0, 0));
        let half_pi = Rational::pi(&eps20()).unwrap().scale(-1);
        let err = Complex::new(Rational::zero(), half_pi).gd(&eps20()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndefinedResult);
    }
}
