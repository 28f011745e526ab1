//! Bernoulli and Euler numbers with process-wide memo tables.
//!
//! Both sequences vanish at odd indices (except `B(1) = -1/2`), so the
//! tables only hold even-index values. They grow on demand and can be
//! released with [`free_bernoulli`] and [`free_euler`].

use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::debug;

use calq_integers::combinatorics::{binomial, SEQUENCE_LIMIT};
use calq_integers::{CalcError, Integer, Result};

use crate::Rational;

/// `B(2i)` for every computed `i`.
static BERNOULLI: Lazy<Mutex<Vec<Rational>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// `E(2i)` for every computed `i`.
static EULER: Lazy<Mutex<Vec<Integer>>> = Lazy::new(|| Mutex::new(Vec::new()));

fn binomial_rational(n: u64, k: u64) -> Rational {
    Rational::from_integer(binomial(&Integer::from(n), k))
}

/// Extends the Bernoulli table through index `2 * half`.
fn extend_bernoulli(table: &mut Vec<Rational>, half: usize) {
    if table.len() > half {
        return;
    }
    debug!(from = table.len() * 2, to = half * 2, "extending bernoulli table");
    if table.is_empty() {
        table.push(Rational::one());
    }
    let minus_half = -Rational::from_i64_pair(1, 2).unwrap_or_default();
    while table.len() <= half {
        // B(m) = -1/(m+1) * sum_{k<m} C(m+1, k) B(k)
        let m = (table.len() * 2) as u64;
        let mut sum = &binomial_rational(m + 1, 1) * &minus_half;
        for (i, b) in table.iter().enumerate() {
            sum = &sum + &(&binomial_rational(m + 1, 2 * i as u64) * b);
        }
        let divisor = Rational::from_integer(Integer::from(m + 1));
        table.push(-sum.checked_div(&divisor).unwrap_or_default());
    }
}

/// Extends the Euler table through index `2 * half`.
fn extend_euler(table: &mut Vec<Integer>, half: usize) {
    if table.len() > half {
        return;
    }
    debug!(from = table.len() * 2, to = half * 2, "extending euler table");
    if table.is_empty() {
        table.push(Integer::one());
    }
    while table.len() <= half {
        // E(n) = -sum_{k<n/2} C(n, 2k) E(2k)
        let n = (table.len() * 2) as u64;
        let n_big = Integer::from(n);
        let sum = table
            .iter()
            .enumerate()
            .fold(Integer::zero(), |acc, (i, e)| acc + binomial(&n_big, 2 * i as u64) * e);
        table.push(-sum);
    }
}

fn sequence_index(n: &Rational, what: &str) -> Result<Option<u64>> {
    let n = n.integer_arg(what)?;
    if n.is_negative() {
        return Ok(None);
    }
    match n.to_u64() {
        Ok(v) if v < SEQUENCE_LIMIT => Ok(Some(v)),
        // odd indices above 1 are zero however large
        _ if n.is_odd() => Ok(Some(3)),
        _ => Err(CalcError::domain(format!("{what} index too large"))),
    }
}

impl Rational {
    /// Bernoulli number `B(n)`, with `B(1) = -1/2`; zero for negative and
    /// other odd indices.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractions and even indices of 2^31
    /// or more.
    pub fn bernoulli(&self) -> Result<Rational> {
        let n = match sequence_index(self, "bernoulli")? {
            None => return Ok(Rational::zero()),
            Some(n) => n,
        };
        if n == 1 {
            return Rational::from_i64_pair(-1, 2);
        }
        if n % 2 == 1 {
            return Ok(Rational::zero());
        }
        let half = (n / 2) as usize;
        let mut table = BERNOULLI.lock();
        extend_bernoulli(&mut table, half);
        Ok(table[half].clone())
    }

    /// Euler number `E(n)`; zero for odd indices.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Domain`] for fractions, negative indices and
    /// even indices of 2^31 or more.
    pub fn euler(&self) -> Result<Rational> {
        let n = sequence_index(self, "euler")?
            .ok_or_else(|| CalcError::domain("negative index for euler"))?;
        if n % 2 == 1 {
            return Ok(Rational::zero());
        }
        let half = (n / 2) as usize;
        let mut table = EULER.lock();
        extend_euler(&mut table, half);
        Ok(Rational::from_integer(table[half].clone()))
    }
}

/// Releases the Bernoulli memo table.
pub fn free_bernoulli() {
    let mut table = BERNOULLI.lock();
    debug!(entries = table.len(), "freeing bernoulli table");
    *table = Vec::new();
}

/// Releases the Euler memo table.
pub fn free_euler() {
    let mut table = EULER.lock();
    debug!(entries = table.len(), "freeing euler table");
    *table = Vec::new();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: i64) -> Rational {
        Rational::from(v)
    }

    #[test]
    fn test_bernoulli() {
        let expected = ["1", "-1/2", "1/6", "0", "-1/30", "0", "1/42"];
        for (i, want) in expected.iter().enumerate() {
            assert_eq!(n(i as i64).bernoulli().unwrap(), want.parse::<Rational>().unwrap(), "B({i})");
        }
        assert_eq!(n(20).bernoulli().unwrap(), "-174611/330".parse::<Rational>().unwrap());
        assert_eq!(n(-2).bernoulli().unwrap(), 0);
        assert!("1/2".parse::<Rational>().unwrap().bernoulli().is_err());
        assert!(n(1 << 31).bernoulli().is_err());
        assert_eq!(n((1 << 31) + 1).bernoulli().unwrap(), 0);
    }

    #[test]
    fn test_euler() {
        let expected = [1, 0, -1, 0, 5, 0, -61];
        for (i, want) in expected.iter().enumerate() {
            assert_eq!(n(i as i64).euler().unwrap(), *want, "E({i})");
        }
        assert_eq!(n(18).euler().unwrap(), -2_404_879_675_441);
        assert_eq!(n(20).euler().unwrap(), 370_371_188_237_525);
        assert!(n(-2).euler().is_err());
    }

    #[test]
    fn test_free_tables() {
        assert_eq!(n(10).bernoulli().unwrap(), "5/66".parse::<Rational>().unwrap());
        free_bernoulli();
        free_euler();
        assert_eq!(n(10).bernoulli().unwrap(), "5/66".parse::<Rational>().unwrap());
        assert_eq!(n(4).euler().unwrap(), 5);
    }
}
