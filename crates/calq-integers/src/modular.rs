//! Modular arithmetic on big integers.
//!
//! Powers and inverses modulo an arbitrary positive modulus, plus the
//! Jacobi symbol.

use num_traits::{One, Zero};

use crate::{CalcError, Integer, Result};

/// Reduces `value` into `[0, modulus)`.
fn reduce(value: &Integer, modulus: &Integer) -> Integer {
    let r = value % modulus;
    if r.is_negative() {
        r + modulus
    } else {
        r
    }
}

/// Computes `base^exp mod modulus` using binary exponentiation.
///
/// # Errors
///
/// Returns [`CalcError::Domain`] for a negative exponent or a non-positive
/// modulus.
pub fn mod_pow(base: &Integer, exp: &Integer, modulus: &Integer) -> Result<Integer> {
    if !modulus.is_positive() {
        return Err(CalcError::domain("non-positive modulus"));
    }
    if exp.is_negative() {
        return Err(CalcError::domain("negative exponent in modular power"));
    }
    if modulus.is_one() {
        return Ok(Integer::zero());
    }

    let mut result = Integer::one();
    let mut square = reduce(base, modulus);
    let bits = exp.bit_len();
    for i in 0..bits {
        if exp.bit(i) {
            result = reduce(&(&result * &square), modulus);
        }
        if i + 1 < bits {
            square = reduce(&(&square * &square), modulus);
        }
    }
    Ok(result)
}

/// Computes the inverse of `value` modulo `modulus`.
///
/// Returns `None` if the inverse doesn't exist (when gcd(value, modulus) != 1).
#[must_use]
pub fn mod_inverse(value: &Integer, modulus: &Integer) -> Option<Integer> {
    let modulus = modulus.abs();
    if modulus.is_zero() {
        return None;
    }

    // Extended Euclidean algorithm
    let mut t = Integer::zero();
    let mut new_t = Integer::one();
    let mut r = modulus.clone();
    let mut new_r = reduce(value, &modulus);

    while !new_r.is_zero() {
        let quotient = &r / &new_r;
        let next_t = &t - &(&quotient * &new_t);
        let next_r = &r - &(&quotient * &new_r);
        t = std::mem::replace(&mut new_t, next_t);
        r = std::mem::replace(&mut new_r, next_r);
    }

    if !r.is_one() {
        return None;
    }
    Some(reduce(&t, &modulus))
}

/// Computes the Jacobi symbol `(a / n)`.
///
/// Returns 0 when `n` is not a positive odd integer or when `a` and `n`
/// share a factor.
#[must_use]
pub fn jacobi(a: &Integer, n: &Integer) -> i8 {
    if !n.is_positive() || n.is_even() {
        return 0;
    }

    let mut a = reduce(a, n);
    let mut n = n.clone();
    let mut result = 1i8;
    let eight = Integer::new(8);

    while !a.is_zero() {
        while a.is_even() {
            a = a.shift(-1);
            let n8 = (&n % &eight).to_i64().unwrap_or(0);
            if n8 == 3 || n8 == 5 {
                result = -result;
            }
        }
        std::mem::swap(&mut a, &mut n);
        let four = Integer::new(4);
        if (&a % &four) == 3 && (&n % &four) == 3 {
            result = -result;
        }
        a = reduce(&a, &n);
    }

    if n.is_one() {
        result
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Integer {
        Integer::new(v)
    }

    #[test]
    fn test_mod_pow() {
        assert_eq!(mod_pow(&int(3), &int(4), &int(7)).unwrap(), int(4));
        assert_eq!(mod_pow(&int(-2), &int(3), &int(5)).unwrap(), int(2));
        assert_eq!(mod_pow(&int(10), &int(0), &int(7)).unwrap(), int(1));
        assert!(mod_pow(&int(2), &int(-1), &int(7)).is_err());
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(mod_inverse(&int(3), &int(7)), Some(int(5)));
        assert_eq!(mod_inverse(&int(11), &int(5)), Some(int(1)));
        assert_eq!(mod_inverse(&int(4), &int(8)), None);
        assert_eq!(mod_inverse(&int(-3), &int(7)), Some(int(2)));
    }

    #[test]
    fn test_jacobi() {
        assert_eq!(jacobi(&int(2), &int(5)), -1);
        assert_eq!(jacobi(&int(2), &int(15)), 1);
        assert_eq!(jacobi(&int(5), &int(15)), 0);
        assert_eq!(jacobi(&int(1), &int(4)), 0);
        assert_eq!(jacobi(&int(1001), &int(9907)), -1);
    }
}
