//! Factorials, binomials and integer sequences.

use num_traits::{One, Zero};

use crate::primes::primes_up_to;
use crate::{CalcError, Integer, Result};

/// Arguments at or above this bound are rejected by the sequence functions.
pub const SEQUENCE_LIMIT: u64 = 1 << 31;

/// Product of the integers in `[lo, hi)` by binary splitting.
fn range_product(lo: u64, hi: u64) -> Integer {
    match hi.saturating_sub(lo) {
        0 => Integer::one(),
        1 => Integer::from(lo),
        2 => Integer::from(lo) * Integer::from(lo + 1),
        len => {
            let mid = lo + len / 2;
            range_product(lo, mid) * range_product(mid, hi)
        }
    }
}

/// Computes n!.
///
/// # Errors
///
/// Returns [`CalcError::Domain`] when `n >= 2^31`.
pub fn factorial(n: u64) -> Result<Integer> {
    if n >= SEQUENCE_LIMIT {
        return Err(CalcError::domain("factorial argument too large"));
    }
    Ok(range_product(1, n + 1))
}

/// Falling factorial `n (n-1) ... (n-k+1)`.
#[must_use]
pub fn falling_factorial(n: &Integer, k: u64) -> Integer {
    let mut result = Integer::one();
    let mut term = n.clone();
    for _ in 0..k {
        result = result * &term;
        term = term - Integer::one();
    }
    result
}

/// Binomial coefficient C(n, k) for any integer `n`.
///
/// For negative `n` this is the generalized coefficient
/// `n (n-1) ... (n-k+1) / k!`.
#[must_use]
pub fn binomial(n: &Integer, k: u64) -> Integer {
    let k = if n.is_negative() {
        k
    } else {
        let rest = n - &Integer::from(k);
        if rest.is_negative() {
            return Integer::zero();
        }
        match rest.to_u64() {
            Ok(rest) if rest < k => rest,
            _ => k,
        }
    };

    let mut result = Integer::one();
    let mut top = n.clone();
    for i in 1..=k {
        // exact: the running product of i consecutive integers over i!
        result = &(result * &top) / &Integer::from(i);
        top = top - Integer::one();
    }
    result
}

/// Fibonacci number F(n), extended to negative `n` by
/// F(-n) = (-1)^(n+1) F(n).
#[must_use]
pub fn fibonacci(n: i64) -> Integer {
    let (f, _) = fib_pair(n.unsigned_abs());
    if n < 0 && n % 2 == 0 {
        -f
    } else {
        f
    }
}

/// Returns (F(n), F(n+1)) by fast doubling.
fn fib_pair(n: u64) -> (Integer, Integer) {
    if n == 0 {
        return (Integer::zero(), Integer::one());
    }
    let (a, b) = fib_pair(n / 2);
    let two_b = &b + &b;
    let c = &a * &(two_b - &a);
    let d = &(&a * &a) + &(&b * &b);
    if n % 2 == 0 {
        (c, d)
    } else {
        let next = &c + &d;
        (d, next)
    }
}

/// Catalan number C(2n, n) / (n + 1).
#[must_use]
pub fn catalan(n: u64) -> Integer {
    let central = binomial(&Integer::from(2 * n), n);
    &central / &Integer::from(n + 1)
}

/// Least common multiple of 1..=n.
///
/// # Errors
///
/// Returns [`CalcError::Domain`] when `n >= 2^24`.
pub fn lcm_fact(n: u64) -> Result<Integer> {
    if n >= 1 << 24 {
        return Err(CalcError::domain("lcmfact argument too large"));
    }
    let n = n as usize;
    let mut result = Integer::one();
    for p in primes_up_to(n) {
        let mut power = p;
        while power * p <= n {
            power *= p;
        }
        result = result * Integer::from(power as u64);
    }
    Ok(result)
}
