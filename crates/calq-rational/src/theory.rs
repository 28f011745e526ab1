//! Number theory and digit queries on rationals.
//!
//! Most of these operations are only defined for integer values; they
//! reject fractions with a domain error rather than truncating silently.

use num_traits::{One, Zero};

use calq_integers::combinatorics::{self, SEQUENCE_LIMIT};
use calq_integers::modular::{jacobi, mod_inverse, mod_pow};
use calq_integers::primes::{self, DEFAULT_FACTOR_LIMIT};
use calq_integers::{CalcError, Integer, Result, Rounding};

use crate::Rational;

/// Bound on the number of factors in a falling-factorial product.
const PRODUCT_LIMIT: u64 = 1 << 24;

/// Largest `e` with `base^e <= m`, for `m >= 1` and `base >= 2`.
fn ilog_integer(m: &Integer, base: &Integer) -> i64 {
    let mut e = (m.bit_len() - 1) / base.bit_len();
    let mut power = base.pow(e);
    loop {
        let next = &power * base;
        if next > *m {
            return e as i64;
        }
        power = next;
        e += 1;
    }
}

/// Smallest `n >= 0` with `base^n >= m`.
fn ilog_ceiling(m: &Integer, base: &Integer) -> i64 {
    if *m <= 1 {
        0
    } else {
        ilog_integer(&(m - &Integer::one()), base) + 1
    }
}

fn integer_pair(x: &Rational, y: &Rational, what: &str) -> Result<(Integer, Integer)> {
    Ok((x.integer_arg(what)?, y.integer_arg(what)?))
}

fn base_arg(base: &Rational, what: &str) -> Result<Integer> {
    let base = base.integer_arg(what)?;
    if base < 2 {
        return Err(CalcError::domain(format!("base for {what} must be at least 2")));
    }
    Ok(base)
}

impl Rational {
    /// Greatest common divisor of this value and `others`.
    ///
    /// For fractions this is the gcd of the numerators over the lcm of the
    /// denominators, so every argument is an integer multiple of it.
    #[must_use]
    pub fn gcd(&self, others: &[Rational]) -> Rational {
        let (num, den) = others.iter().fold((self.numerator().abs(), self.denominator()), |(n, d), x| {
            (n.gcd(&x.numerator()), d.lcm(&x.denominator()))
        });
        Rational::from_pair(num, den).unwrap_or_default()
    }

    /// Least common multiple of this value and `others`; zero if any is zero.
    #[must_use]
    pub fn lcm(&self, others: &[Rational]) -> Rational {
        if self.is_zero() || others.iter().any(Zero::is_zero) {
            return Rational::zero();
        }
        let (num, den) = others.iter().fold((self.numerator().abs(), self.denominator()), |(n, d), x| {
            (n.lcm(&x.numerator()), d.gcd(&x.denominator()))
        });
        Rational::from_pair(num, den).unwrap_or_default()
    }

    /// Least common multiple of `1..=self`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractions, negative values and
    /// values of 2^24 or more.
    pub fn lcmfact(&self) -> Result<Rational> {
        let n = self.bounded_arg("lcmfact", PRODUCT_LIMIT)?;
        let n = u64::try_from(n).map_err(|_| CalcError::domain("negative argument for lcmfact"))?;
        Ok(Rational::from_integer(combinatorics::lcm_fact(n)?))
    }

    /// Factorial.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractions, negative values and
    /// values of 2^31 or more.
    pub fn factorial(&self) -> Result<Rational> {
        let n = self.bounded_arg("factorial", SEQUENCE_LIMIT)?;
        let n = u64::try_from(n).map_err(|_| CalcError::domain("negative argument for factorial"))?;
        Ok(Rational::from_integer(combinatorics::factorial(n)?))
    }

    /// Binomial coefficient `C(self, k)` for any rational `self`.
    ///
    /// Negative `k` gives 0 and `k == 0` gives 1.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a fractional `k` or a product of
    /// 2^24 factors or more.
    pub fn comb(&self, k: &Rational) -> Result<Rational> {
        let k = k.integer_arg("comb")?;
        if k.is_negative() {
            return Ok(Rational::zero());
        }
        if k.is_zero() {
            return Ok(Rational::one());
        }
        if let Some(n) = self.to_integer() {
            // C(n, k) = C(n, n-k) only shortens the product for n >= 0
            let effective = if n.is_negative() || k > n {
                k.clone()
            } else {
                (&n - &k).min(k.clone())
            };
            if !n.is_negative() && k > n {
                return Ok(Rational::zero());
            }
            match effective.to_u64() {
                Ok(e) if e < PRODUCT_LIMIT => {}
                _ => return Err(CalcError::domain("comb argument too large")),
            }
            let k = k.to_u64().map_err(|_| CalcError::domain("comb argument too large"))?;
            return Ok(Rational::from_integer(combinatorics::binomial(&n, k)));
        }
        let k = match k.to_u64() {
            Ok(k) if k < PRODUCT_LIMIT => k,
            _ => return Err(CalcError::domain("comb argument too large")),
        };
        let mut result = Rational::one();
        let mut top = self.clone();
        for i in 1..=k {
            result = (&result * &top).checked_div(&Rational::from_integer(Integer::from(i)))?;
            top = &top - &Rational::one();
        }
        Ok(result)
    }

    /// Number of permutations, `self (self-1) ... (self-k+1)`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractional arguments, negative `k`
    /// or `k >= 2^24`.
    pub fn perm(&self, k: &Rational) -> Result<Rational> {
        let (n, k) = integer_pair(self, k, "perm")?;
        if k.is_negative() {
            return Err(CalcError::domain("negative argument for perm"));
        }
        if !n.is_negative() && k > n {
            return Ok(Rational::zero());
        }
        match k.to_u64() {
            Ok(k) if k < PRODUCT_LIMIT => Ok(Rational::from_integer(combinatorics::falling_factorial(&n, k))),
            _ => Err(CalcError::domain("perm argument too large")),
        }
    }

    /// Fibonacci number, extended to negative indices.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractions or |n| >= 2^31.
    pub fn fib(&self) -> Result<Rational> {
        let n = self.bounded_arg("fib", SEQUENCE_LIMIT)?;
        Ok(Rational::from_integer(combinatorics::fibonacci(n)))
    }

    /// Catalan number; zero for negative arguments.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractions or n >= 2^31.
    pub fn catalan(&self) -> Result<Rational> {
        let n = self.bounded_arg("catalan", SEQUENCE_LIMIT)?;
        Ok(match u64::try_from(n) {
            Ok(n) => Rational::from_integer(combinatorics::catalan(n)),
            Err(_) => Rational::zero(),
        })
    }

    /// Smallest prime factor not above `limit` (default 2^32 - 1), or 1.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractions or a limit that is
    /// negative, fractional or at least 2^32.
    pub fn factor(&self, limit: Option<&Rational>) -> Result<Rational> {
        let n = self.integer_arg("factor")?;
        let limit = match limit {
            None => DEFAULT_FACTOR_LIMIT,
            Some(l) => l
                .integer_arg("factor")?
                .to_u64()
                .map_err(|_| CalcError::domain("factor limit must be between 0 and 2^32"))?,
        };
        Ok(Rational::from_integer(primes::smallest_factor(&n, limit)?))
    }

    /// Smallest prime factor among the first `count` primes, or 1.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractions or a count outside
    /// `[0, 2^24)`.
    pub fn lfactor(&self, count: &Rational) -> Result<Rational> {
        let n = self.integer_arg("lfactor")?;
        let count = count.bounded_arg("lfactor", PRODUCT_LIMIT)?;
        let count = u64::try_from(count).map_err(|_| CalcError::domain("negative count for lfactor"))?;
        Ok(Rational::from_integer(primes::smallest_factor_among(&n, count)))
    }

    /// |self| with every factor `y` removed.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractional arguments.
    pub fn frem(&self, y: &Rational) -> Result<Rational> {
        let (x, y) = integer_pair(self, y, "frem")?;
        Ok(Rational::from_integer(primes::remove_factor(&x, &y)))
    }

    /// Number of times `y` divides `self`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractional arguments.
    pub fn fcnt(&self, y: &Rational) -> Result<Rational> {
        let (x, y) = integer_pair(self, y, "fcnt")?;
        Ok(Rational::from_integer(Integer::from(primes::factor_count(&x, &y))))
    }

    /// Largest divisor of |self| relatively prime to `y`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractional arguments.
    pub fn gcdrem(&self, y: &Rational) -> Result<Rational> {
        let (x, y) = integer_pair(self, y, "gcdrem")?;
        Ok(Rational::from_integer(primes::gcd_rem(&x, &y)))
    }

    /// Jacobi symbol `(self / y)`; 0 when `y` is not a positive odd integer.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractional arguments.
    pub fn jacobi(&self, y: &Rational) -> Result<Rational> {
        let (x, y) = integer_pair(self, y, "jacobi")?;
        Ok(Rational::from(i64::from(jacobi(&x, &y))))
    }

    /// Inverse of `self` modulo `m`, reduced by the rounding word as for
    /// `mod`; 0 if no inverse exists.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractional arguments.
    pub fn minv(&self, m: &Rational, rounding: Rounding) -> Result<Rational> {
        let (x, modulus) = integer_pair(self, m, "minv")?;
        match mod_inverse(&x, &modulus) {
            Some(inv) => Rational::from_integer(inv).modulo(m, rounding),
            None => Ok(Rational::zero()),
        }
    }

    /// Digit at position `pos` of |self| in `base`; negative positions
    /// count places after the point.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a fractional position or a base
    /// that is not an integer of at least 2.
    pub fn digit(&self, pos: &Rational, base: &Rational) -> Result<Rational> {
        let pos = pos.integer_arg("digit")?;
        let base = base_arg(base, "digit")?;
        let x = self.abs();
        let digit = if pos.is_negative() {
            // floor(b * frac(x b^(k-1))) with the power taken mod den
            let den = x.denominator();
            let frac_num = &x.numerator() % &den;
            let k = -pos;
            let shifted = mod_pow(&base, &(k - Integer::one()), &den)?;
            let rem = &(&frac_num * &shifted) % &den;
            &(&base * &rem) / &den
        } else {
            let whole = x.floor_int();
            match pos.to_u64() {
                Ok(p) if p <= whole.bit_len() as u64 => {
                    let scaled = &whole / &base.pow(p as usize);
                    &scaled % &base
                }
                _ => Integer::zero(),
            }
        };
        Ok(Rational::from_integer(digit))
    }

    /// Number of digits in the integer part of |self|; at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a base that is not an integer of at
    /// least 2.
    pub fn digits(&self, base: &Rational) -> Result<Rational> {
        let base = base_arg(base, "digits")?;
        let whole = self.abs().floor_int();
        let count = if whole.is_zero() { 1 } else { ilog_integer(&whole, &base) + 1 };
        Ok(Rational::from(count))
    }

    /// Floor of the logarithm of |self| in an integer base.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for zero or a base that is not an
    /// integer of at least 2.
    pub fn ilog(&self, base: &Rational) -> Result<i64> {
        let base = base_arg(base, "ilog")?;
        self.ilog_with(&base)
    }

    fn ilog_with(&self, base: &Integer) -> Result<i64> {
        if self.is_zero() {
            return Err(CalcError::domain("logarithm of zero"));
        }
        let x = self.abs();
        if x >= Rational::one() {
            return Ok(ilog_integer(&x.floor_int(), base));
        }
        let reciprocal = x.inverse()?.ceil().floor_int();
        Ok(-ilog_ceiling(&reciprocal, base))
    }

    /// Floor of the base 10 logarithm of |self|.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for zero.
    pub fn ilog10(&self) -> Result<i64> {
        self.ilog_with(&Integer::new(10))
    }

    /// Floor of the base 2 logarithm of |self|.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for zero.
    pub fn ilog2(&self) -> Result<i64> {
        if self.is_zero() {
            return Err(CalcError::domain("logarithm of zero"));
        }
        let x = self.abs();
        if x >= Rational::one() {
            return Ok(x.floor_int().highbit());
        }
        let reciprocal = x.inverse()?.ceil().floor_int();
        Ok(-((&reciprocal - &Integer::one()).bit_len() as i64))
    }

    /// Index of the highest set bit of an integer; -1 for zero.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractions.
    pub fn highbit(&self) -> Result<i64> {
        Ok(self.integer_arg("highbit")?.highbit())
    }

    /// Index of the lowest set bit of an integer.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractions.
    pub fn lowbit(&self) -> Result<i64> {
        Ok(self.integer_arg("lowbit")?.lowbit())
    }

    /// Bit `index` of the binary expansion of |self|; negative indices
    /// address the fraction.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for a fractional index or
    /// |index| >= 2^31.
    pub fn bit(&self, index: &Rational) -> Result<bool> {
        let index = index.bounded_arg("bit", SEQUENCE_LIMIT)?;
        let x = self.abs();
        if index >= 0 {
            return Ok(x.floor_int().bit(index as usize));
        }
        Ok(x.scale(-index).floor_int().is_odd())
    }

    /// Integer part of the n-th root, truncated toward zero.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for `n` not a positive integer or an
    /// even root of a negative value.
    pub fn iroot(&self, n: &Rational) -> Result<Rational> {
        let n = n.bounded_arg("iroot", SEQUENCE_LIMIT)?;
        let n = u32::try_from(n)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| CalcError::domain("root index must be positive"))?;
        let whole = self.abs().floor_int();
        if self.is_negative() {
            if n % 2 == 0 {
                return Err(CalcError::domain("even root of negative number"));
            }
            return Ok(-Rational::from_integer(whole.iroot(n)?));
        }
        Ok(Rational::from_integer(whole.iroot(n)?))
    }

    /// Floor of the square root.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for negative values.
    pub fn isqrt(&self) -> Result<Rational> {
        if self.is_negative() {
            return Err(CalcError::domain("square root of negative number"));
        }
        Ok(Rational::from_integer(self.floor_int().isqrt()?))
    }

    /// True if both numerator and denominator are perfect squares.
    #[must_use]
    pub fn is_square(&self) -> bool {
        self.numerator().is_square() && self.denominator().is_square()
    }

    /// True if two integers share no factor.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractions.
    pub fn is_rel_prime(&self, other: &Rational) -> Result<bool> {
        let (x, y) = integer_pair(self, other, "relative primality")?;
        Ok(x.gcd(&y).is_one())
    }

    /// True if `self / other` is an integer; zero only divides zero.
    #[must_use]
    pub fn is_multiple_of(&self, other: &Rational) -> bool {
        match self.checked_div(other) {
            Ok(q) => q.is_integer(),
            Err(_) => self.is_zero(),
        }
    }

    /// Primality test for integers.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractions and
    /// [`CalcError::Argument`] for odd values of 2^32 or more.
    pub fn is_prime(&self) -> Result<bool> {
        primes::is_prime(&self.integer_arg("prime test")?)
    }
}
