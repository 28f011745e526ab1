//! A numeric value that is either real or complex.
//!
//! [`Number`] is the closed sum of [`Rational`] and [`Complex`]. A complex
//! result whose imaginary part is zero is always demoted to
//! [`Number::Real`], and real functions whose result leaves the real line
//! continue into the complex plane.
//!
//! Optional epsilon and rounding arguments fall back to the process-wide
//! configuration at call time.

use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;
use tracing::debug;

use calq_complex::{parse_complex, Complex};
use calq_integers::{CalcError, Integer, Result, Rounding};
use calq_rational::{config, Config, Rational};

/// A real or complex value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Number {
    /// A rational value.
    Real(Rational),
    /// A value with a nonzero imaginary part.
    Complex(Complex),
}

fn epsilon(eps: Option<&Rational>) -> Rational {
    eps.cloned().unwrap_or_else(config::epsilon)
}

fn rounding_or(rounding: Option<Rounding>, default: fn(&Config) -> Rounding) -> Rounding {
    rounding.unwrap_or_else(|| config::with(default))
}

/// Generates the transcendental functions that continue into the complex
/// plane when the real function has no real result.
macro_rules! continued {
    ($($name:ident => $what:literal;)*) => {
        $(
            #[doc = concat!("The ", $what, ".")]
            ///
            /// A real argument outside the real domain gives the complex
            /// continuation.
            ///
            /// # Errors
            ///
            /// [`CalcError::Undefined`] at poles, [`CalcError::Domain`] for a
            /// non-positive epsilon or an argument too large to evaluate.
            pub fn $name(&self, eps: Option<&Rational>) -> Result<Number> {
                let eps = epsilon(eps);
                match self {
                    Number::Real(x) => match x.$name(&eps) {
                        Err(e) if e.is_non_real() => {
                            debug!(function = stringify!($name), "continuing into the complex plane");
                            Complex::from(x.clone()).$name(&eps).map(Number::from)
                        }
                        other => other.map(Number::Real),
                    },
                    Number::Complex(z) => z.$name(&eps).map(Number::from),
                }
            }
        )*
    };
}

impl Number {
    /// Creates `re + im*i`, demoting to a real value when `im` is zero.
    #[must_use]
    pub fn complex(re: Rational, im: Rational) -> Self {
        Self::from(Complex::new(re, im))
    }

    /// Real part.
    #[must_use]
    pub fn re(&self) -> Rational {
        match self {
            Self::Real(x) => x.clone(),
            Self::Complex(z) => z.re().clone(),
        }
    }

    /// Imaginary part; zero for real values.
    #[must_use]
    pub fn im(&self) -> Rational {
        match self {
            Self::Real(_) => Rational::zero(),
            Self::Complex(z) => z.im().clone(),
        }
    }

    /// The real value, if this is one.
    #[must_use]
    pub fn as_real(&self) -> Option<&Rational> {
        match self {
            Self::Real(x) => Some(x),
            Self::Complex(_) => None,
        }
    }

    /// The value as a complex number.
    #[must_use]
    pub fn to_complex(&self) -> Complex {
        match self {
            Self::Real(x) => Complex::from(x.clone()),
            Self::Complex(z) => z.clone(),
        }
    }

    fn real_arg<'a>(&'a self, what: &str) -> Result<&'a Rational> {
        self.as_real().ok_or_else(|| CalcError::type_error(format!("complex argument for {what}")))
    }

    // Predicates

    /// True for a real value.
    #[must_use]
    pub fn is_real(&self) -> bool {
        matches!(self, Self::Real(_))
    }

    /// True when the real part is zero and the imaginary part is not.
    #[must_use]
    pub fn is_imag(&self) -> bool {
        matches!(self, Self::Complex(z) if z.is_imag())
    }

    /// True for a real integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Real(x) if x.is_integer())
    }

    /// True for an even real integer; complex values are never even.
    #[must_use]
    pub fn is_even(&self) -> bool {
        matches!(self, Self::Real(x) if x.is_even())
    }

    /// True for an odd real integer; complex values are never odd.
    #[must_use]
    pub fn is_odd(&self) -> bool {
        matches!(self, Self::Real(x) if x.is_odd())
    }

    // Arithmetic

    fn combine(
        &self,
        other: &Self,
        real: impl FnOnce(&Rational, &Rational) -> Result<Rational>,
        complex: impl FnOnce(&Complex, &Complex) -> Result<Complex>,
    ) -> Result<Self> {
        match (self, other) {
            (Self::Real(a), Self::Real(b)) => real(a, b).map(Self::Real),
            _ => complex(&self.to_complex(), &other.to_complex()).map(Self::from),
        }
    }

    /// Exact division.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `other` is zero.
    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        self.combine(other, Rational::checked_div, Complex::checked_div)
    }

    /// Reciprocal.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for zero.
    pub fn inverse(&self) -> Result<Self> {
        match self {
            Self::Real(x) => x.inverse().map(Self::Real),
            Self::Complex(z) => z.inverse().map(Self::from),
        }
    }

    /// Complex conjugate.
    #[must_use]
    pub fn conj(&self) -> Self {
        match self {
            Self::Real(_) => self.clone(),
            Self::Complex(z) => Self::from(z.conj()),
        }
    }

    /// Squared magnitude.
    #[must_use]
    pub fn norm(&self) -> Rational {
        match self {
            Self::Real(x) => x * x,
            Self::Complex(z) => z.norm(),
        }
    }

    /// Magnitude; exact for real values.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive epsilon.
    pub fn abs(&self, eps: Option<&Rational>) -> Result<Rational> {
        match self {
            Self::Real(x) => Ok(x.abs()),
            Self::Complex(z) => z.abs(&epsilon(eps)),
        }
    }

    /// Argument in `(-pi, pi]`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive epsilon.
    pub fn arg(&self, eps: Option<&Rational>) -> Result<Rational> {
        self.to_complex().arg(&epsilon(eps))
    }

    /// Componentwise comparison: a real -1, 0 or 1 when the imaginary parts
    /// agree, otherwise the complex pair of signs.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn cmp(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Real(a), Self::Real(b)) => Self::from(i64::from(a.cmp_sign(b))),
            _ => Self::from(self.to_complex().cmp(&other.to_complex())),
        }
    }

    /// The value raised to `y`.
    ///
    /// Real powers that are exact stay exact; a negative base with a
    /// fractional exponent continues into the complex plane.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for zero to a non-positive power, a
    /// non-positive epsilon, or a result too large to represent.
    pub fn power(&self, y: &Self, eps: Option<&Rational>) -> Result<Self> {
        let eps = epsilon(eps);
        if let (Self::Real(x), Self::Real(e)) = (self, y) {
            match x.power(e, &eps) {
                Err(err) if err.is_non_real() => {
                    debug!("power continuing into the complex plane");
                }
                other => return other.map(Self::Real),
            }
        }
        self.to_complex().power(&y.to_complex(), &eps).map(Self::from)
    }

    /// Generalized binomial coefficient.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a fractional `k` or `k >= 2^24`,
    /// and [`CalcError::Type`] for a complex `k`.
    pub fn comb(&self, k: &Self) -> Result<Self> {
        let k = k.real_arg("comb")?;
        match self {
            Self::Real(x) => x.comb(k).map(Self::Real),
            Self::Complex(z) => z.comb(k).map(Self::from),
        }
    }

    /// Square root; negative real values give an imaginary root.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive epsilon.
    pub fn sqrt(&self, eps: Option<&Rational>, rounding: Option<Rounding>) -> Result<Self> {
        let eps = epsilon(eps);
        let rounding = rounding_or(rounding, |c| c.sqrt);
        match self {
            Self::Real(x) if !x.is_negative() => x.sqrt(&eps, rounding).map(Self::Real),
            _ => self.to_complex().sqrt(&eps, rounding).map(Self::from),
        }
    }

    /// Principal `n`-th root.
    ///
    /// Real values keep to the real line: an even root of a negative real is
    /// an error rather than a complex value.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive epsilon, an order
    /// that is not a positive integer, or an even root of a negative real.
    pub fn root(&self, n: &Rational, eps: Option<&Rational>) -> Result<Self> {
        let eps = epsilon(eps);
        match self {
            Self::Real(x) => x.root(n, &eps).map(Self::Real),
            Self::Complex(z) => z.root(n, &eps).map(Self::from),
        }
    }

    /// The value with magnitude `r` and argument `theta`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive epsilon.
    pub fn polar(r: &Rational, theta: &Rational, eps: Option<&Rational>) -> Result<Self> {
        Complex::polar(r, theta, &epsilon(eps)).map(Self::from)
    }

    /// Pi to within epsilon.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a non-positive epsilon.
    pub fn pi(eps: Option<&Rational>) -> Result<Self> {
        Rational::pi(&epsilon(eps)).map(Self::Real)
    }

    // Rounding

    fn map_parts(&self, real: impl Fn(&Rational) -> Rational, complex: impl Fn(&Complex) -> Complex) -> Self {
        match self {
            Self::Real(x) => Self::Real(real(x)),
            Self::Complex(z) => Self::from(complex(z)),
        }
    }

    /// Nearest multiple of `eps` by the rounding word, per component.
    #[must_use]
    pub fn appr(&self, eps: Option<&Rational>, rounding: Option<Rounding>) -> Self {
        let eps = epsilon(eps);
        let rounding = rounding_or(rounding, |c| c.appr);
        self.map_parts(|x| x.appr(&eps, rounding), |z| z.appr(&eps, rounding))
    }

    /// Rounds to `places` decimal places, per component.
    #[must_use]
    pub fn round(&self, places: i64, rounding: Option<Rounding>) -> Self {
        let rounding = rounding_or(rounding, |c| c.round);
        self.map_parts(|x| x.round(places, rounding), |z| z.round(places, rounding))
    }

    /// Rounds to `places` binary places, per component.
    #[must_use]
    pub fn bround(&self, places: i64, rounding: Option<Rounding>) -> Self {
        let rounding = rounding_or(rounding, |c| c.round);
        self.map_parts(|x| x.bround(places, rounding), |z| z.bround(places, rounding))
    }

    /// Integer part, per component.
    #[must_use]
    pub fn int(&self) -> Self {
        self.map_parts(Rational::int, Complex::int)
    }

    /// Fractional part, per component.
    #[must_use]
    pub fn frac(&self) -> Self {
        self.map_parts(Rational::frac, Complex::frac)
    }

    /// Ceiling, per component.
    #[must_use]
    pub fn ceil(&self) -> Self {
        self.map_parts(Rational::ceil, Complex::ceil)
    }

    /// Floor, per component.
    #[must_use]
    pub fn floor(&self) -> Self {
        self.map_parts(Rational::floor, Complex::floor)
    }

    /// Remainder modulo a real `y`, per component.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `y` is zero and
    /// [`CalcError::Type`] if it is complex.
    pub fn modulo(&self, y: &Self, rounding: Option<Rounding>) -> Result<Self> {
        let y = y.real_arg("mod")?;
        let rounding = rounding_or(rounding, |c| c.modulo);
        match self {
            Self::Real(x) => x.modulo(y, rounding).map(Self::Real),
            Self::Complex(z) => z.modulo(y, rounding).map(Self::from),
        }
    }

    /// Remainder of least magnitude, per component.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `y` is zero and
    /// [`CalcError::Type`] if it is complex.
    pub fn mmin(&self, y: &Self) -> Result<Self> {
        let y = y.real_arg("mmin")?;
        match self {
            Self::Real(x) => x.mmin(y).map(Self::Real),
            Self::Complex(z) => z.mmin(y).map(Self::from),
        }
    }

    /// Integer quotient by a real `y`, per component.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivideByZero`] if `y` is zero and
    /// [`CalcError::Type`] if it is complex.
    pub fn quo(&self, y: &Self, rounding: Option<Rounding>) -> Result<Self> {
        let y = y.real_arg("quo")?;
        let rounding = rounding_or(rounding, |c| c.quo);
        match self {
            Self::Real(x) => Ok(Self::Real(Rational::from_integer(x.quo(y, rounding)?))),
            Self::Complex(z) => z.quo(y, rounding).map(Self::from),
        }
    }

    /// Floor of the logarithm of the magnitude in an integer base.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for zero or an invalid base.
    pub fn ilog(&self, base: &Rational) -> Result<i64> {
        match self {
            Self::Real(x) => x.ilog(base),
            Self::Complex(z) => z.ilog(base),
        }
    }

    // Transcendental functions

    continued! {
        exp => "exponential function";
        ln => "natural logarithm";
        log => "base 10 logarithm";
        sin => "sine";
        cos => "cosine";
        tan => "tangent";
        cot => "cotangent";
        sec => "secant";
        csc => "cosecant";
        sinh => "hyperbolic sine";
        cosh => "hyperbolic cosine";
        tanh => "hyperbolic tangent";
        coth => "hyperbolic cotangent";
        sech => "hyperbolic secant";
        csch => "hyperbolic cosecant";
        asin => "inverse sine";
        acos => "inverse cosine";
        atan => "inverse tangent";
        acot => "inverse cotangent";
        asec => "inverse secant";
        acsc => "inverse cosecant";
        asinh => "inverse hyperbolic sine";
        acosh => "inverse hyperbolic cosine";
        atanh => "inverse hyperbolic tangent";
        acoth => "inverse hyperbolic cotangent";
        asech => "inverse hyperbolic secant";
        acsch => "inverse hyperbolic cosecant";
        gd => "Gudermannian function";
        agd => "inverse Gudermannian function";
    }
}

impl Zero for Number {
    fn zero() -> Self {
        Self::Real(Rational::zero())
    }

    fn is_zero(&self) -> bool {
        matches!(self, Self::Real(x) if x.is_zero())
    }
}

impl One for Number {
    fn one() -> Self {
        Self::Real(Rational::one())
    }
}

impl From<Complex> for Number {
    fn from(z: Complex) -> Self {
        match z.to_real() {
            Some(x) => Self::Real(x),
            None => Self::Complex(z),
        }
    }
}

impl From<Rational> for Number {
    fn from(x: Rational) -> Self {
        Self::Real(x)
    }
}

impl From<Integer> for Number {
    fn from(n: Integer) -> Self {
        Self::Real(Rational::from_integer(n))
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::Real(Rational::from(n))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(x) => fmt::Display::fmt(x, f),
            Self::Complex(z) => fmt::Display::fmt(z, f),
        }
    }
}

impl FromStr for Number {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        parse_complex(s).map(Self::from)
    }
}

// Arithmetic operations
impl Add for &Number {
    type Output = Number;

    fn add(self, other: Self) -> Number {
        match (self, other) {
            (Number::Real(a), Number::Real(b)) => Number::Real(a + b),
            _ => Number::from(&self.to_complex() + &other.to_complex()),
        }
    }
}

impl Add for Number {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        &self + &other
    }
}

impl Sub for &Number {
    type Output = Number;

    fn sub(self, other: Self) -> Number {
        match (self, other) {
            (Number::Real(a), Number::Real(b)) => Number::Real(a - b),
            _ => Number::from(&self.to_complex() - &other.to_complex()),
        }
    }
}

impl Sub for Number {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        &self - &other
    }
}

impl Mul for &Number {
    type Output = Number;

    fn mul(self, other: Self) -> Number {
        match (self, other) {
            (Number::Real(a), Number::Real(b)) => Number::Real(a * b),
            _ => Number::from(&self.to_complex() * &other.to_complex()),
        }
    }
}

impl Mul for Number {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        &self * &other
    }
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        match self {
            Number::Real(x) => Number::Real(-x),
            Number::Complex(z) => Number::Complex(-z),
        }
    }
}

impl Neg for Number {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> Number {
        s.parse().unwrap()
    }

    #[test]
    fn test_demotion() {
        assert_eq!(Number::complex(Rational::from(3), Rational::zero()), Number::from(3));
        assert!(n("1+0i").is_real());
        assert!(!n("1+1i").is_real());
        assert_eq!(&n("1+1i") * &n("1-1i"), Number::from(2));
        assert_eq!(&n("2+3i") - &n("3i"), Number::from(2));
    }

    #[test]
    fn test_mixed_arithmetic() {
        assert_eq!(&n("1/2") + &n("2i"), n("1/2+2i"));
        assert_eq!(n("4+2i").checked_div(&n("2")).unwrap(), n("2+1i"));
        assert_eq!(n("1").checked_div(&n("0")), Err(CalcError::DivideByZero));
        assert_eq!(-n("1-1i"), n("-1+1i"));
        assert_eq!(n("3+4i").inverse().unwrap(), n("0.12-0.16i"));
    }

    #[test]
    fn test_cmp() {
        assert_eq!(n("3").cmp(&n("5")), Number::from(-1));
        assert_eq!(n("0-4i").cmp(&n("5")), n("-1-1i"));
        assert_eq!(n("4i").cmp(&n("4i")), Number::from(0));
        assert_eq!(n("3+4i").cmp(&n("3-4i")), n("1i"));
    }

    #[test]
    fn test_parity() {
        assert!(n("4").is_even());
        assert!(n("3").is_odd());
        assert!(!n("4+2i").is_even());
        assert!(!n("1/2").is_odd());
    }

    #[test]
    fn test_rejects_complex_divisor() {
        assert!(n("5+5i").modulo(&n("2i"), None).is_err());
        assert!(n("5").comb(&n("1+1i")).is_err());
    }
}
