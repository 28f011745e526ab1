//! Primality tests and small-factor searches.

use num_traits::{One, Zero};

use crate::{CalcError, Integer, Result};

/// Largest value (exclusive) for which odd inputs can be tested.
pub const PRIME_TEST_LIMIT: u64 = 1 << 32;

/// Default bound for [`smallest_factor`].
pub const DEFAULT_FACTOR_LIMIT: u64 = (1 << 32) - 1;

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((u128::from(a) * u128::from(b)) % u128::from(m)) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut result = 1 % m;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    result
}

/// Deterministic Miller-Rabin for 32-bit values.
fn is_prime_u64(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for p in [2u64, 3, 5, 7, 11, 13, 61] {
        if n % p == 0 {
            return n == p;
        }
    }

    let mut d = n - 1;
    let mut s = 0;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    // bases 2, 7, 61 suffice below 4,759,123,141
    'witness: for a in [2u64, 7, 61] {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Tests |n| for primality.
///
/// Even values of any size are answered directly.
///
/// # Errors
///
/// Returns [`CalcError::Argument`] for odd |n| >= 2^32.
pub fn is_prime(n: &Integer) -> Result<bool> {
    let magnitude = n.abs();
    if magnitude.is_even() {
        return Ok(magnitude == 2);
    }
    match magnitude.to_u64() {
        Ok(m) if m < PRIME_TEST_LIMIT => Ok(is_prime_u64(m)),
        _ => Err(CalcError::argument("prime test of odd value above 2^32")),
    }
}

/// Returns the smallest prime > `n`.
#[must_use]
pub fn next_prime(n: u64) -> u64 {
    let mut candidate = n.saturating_add(1).max(2);
    while !is_prime_u64(candidate) {
        candidate += 1;
    }
    candidate
}

/// All primes `<= limit`, by sieving.
#[must_use]
pub fn primes_up_to(limit: usize) -> Vec<usize> {
    if limit < 2 {
        return Vec::new();
    }
    let mut composite = vec![false; limit + 1];
    let mut primes = Vec::new();
    for i in 2..=limit {
        if composite[i] {
            continue;
        }
        primes.push(i);
        let mut j = i * i;
        while j <= limit {
            composite[j] = true;
            j += i;
        }
    }
    primes
}

fn divides(p: u64, n: &Integer) -> bool {
    (n % &Integer::from(p)).is_zero()
}

/// Smallest prime factor `p <= limit` of |n|, or 1 if there is none.
///
/// # Errors
///
/// Returns [`CalcError::Domain`] when `limit >= 2^32`.
pub fn smallest_factor(n: &Integer, limit: u64) -> Result<Integer> {
    if limit > DEFAULT_FACTOR_LIMIT {
        return Err(CalcError::domain("factor limit must be below 2^32"));
    }
    let n = n.abs();
    if n <= 1 {
        return Ok(Integer::one());
    }

    if let Ok(small) = n.to_u64() {
        let bound = limit.min(isqrt_u64(small));
        for p in trial_divisors(bound) {
            if small % p == 0 {
                return Ok(Integer::from(p));
            }
        }
        return Ok(if small <= limit { n } else { Integer::one() });
    }

    let root = n.isqrt()?;
    let bound = root.to_u64().map_or(limit, |r| r.min(limit));
    for p in trial_divisors(bound) {
        if divides(p, &n) {
            return Ok(Integer::from(p));
        }
    }
    Ok(Integer::one())
}

/// Smallest prime factor of |n| among the first `count` primes, or 1.
#[must_use]
pub fn smallest_factor_among(n: &Integer, count: u64) -> Integer {
    let n = n.abs();
    if n <= 1 {
        return Integer::one();
    }
    let mut p = 1;
    let mut past_root = false;
    for _ in 0..count {
        p = next_prime(p);
        let prime = Integer::from(p);
        if past_root {
            // n is prime; it only qualifies if it is reached in time
            match prime.cmp(&n) {
                std::cmp::Ordering::Less => continue,
                std::cmp::Ordering::Equal => return n,
                std::cmp::Ordering::Greater => return Integer::one(),
            }
        }
        if divides(p, &n) {
            return prime;
        }
        past_root = &prime * &prime > n;
    }
    Integer::one()
}

fn isqrt_u64(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = n / 2 + (n & 1);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// 2, 3 and then candidates of the form 6k +/- 1 up to `bound`.
fn trial_divisors(bound: u64) -> impl Iterator<Item = u64> {
    [2u64, 3]
        .into_iter()
        .chain((5..).step_by(6).flat_map(|k| [k, k + 2]))
        .take_while(move |&p| p <= bound)
}

/// Counts how many times `y` divides `x`.
///
/// Returns 0 when `x` is zero or |y| <= 1.
#[must_use]
pub fn factor_count(x: &Integer, y: &Integer) -> u64 {
    let y = y.abs();
    if x.is_zero() || y <= 1 {
        return 0;
    }
    let mut x = x.abs();
    let mut count = 0;
    loop {
        let (q, r) = (&x / &y, &x % &y);
        if !r.is_zero() {
            return count;
        }
        x = q;
        count += 1;
    }
}

/// Removes every factor `y` from |x|.
#[must_use]
pub fn remove_factor(x: &Integer, y: &Integer) -> Integer {
    let y = y.abs();
    let mut x = x.abs();
    if x.is_zero() || y <= 1 {
        return x;
    }
    loop {
        let (q, r) = (&x / &y, &x % &y);
        if !r.is_zero() {
            return x;
        }
        x = q;
    }
}

/// Largest divisor of |x| that is relatively prime to `y`.
#[must_use]
pub fn gcd_rem(x: &Integer, y: &Integer) -> Integer {
    let mut x = x.abs();
    if x.is_zero() {
        return x;
    }
    let mut g = x.gcd(y);
    while !g.is_one() {
        x = &x / &g;
        g = x.gcd(&g);
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Integer {
        Integer::new(v)
    }

    #[test]
    fn test_is_prime() {
        assert_eq!(is_prime(&int(2)), Ok(true));
        assert_eq!(is_prime(&int(-3)), Ok(true));
        assert_eq!(is_prime(&int(1)), Ok(false));
        assert_eq!(is_prime(&int(91)), Ok(false));
        assert_eq!(is_prime(&int((1 << 31) + 11)), Ok(true));
        assert_eq!(is_prime(&int(4).pow(99)), Ok(false));
        let err = is_prime(&int((1 << 32) + 1)).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ArgumentError);
    }

    #[test]
    fn test_smallest_factor() {
        assert_eq!(smallest_factor(&int(35), 4).unwrap(), int(1));
        assert_eq!(smallest_factor(&int(35), 5).unwrap(), int(5));
        assert_eq!(smallest_factor(&int((1 << 32) + 1), DEFAULT_FACTOR_LIMIT).unwrap(), int(641));
        assert_eq!(smallest_factor(&int((1 << 59) - 1), DEFAULT_FACTOR_LIMIT).unwrap(), int(179_951));
        assert_eq!(smallest_factor(&int(13), DEFAULT_FACTOR_LIMIT).unwrap(), int(13));
        assert!(smallest_factor(&int(13), 1 << 32).is_err());
    }

    #[test]
    fn test_smallest_factor_among() {
        assert_eq!(smallest_factor_among(&int(35), 2), int(1));
        assert_eq!(smallest_factor_among(&int(35), 3), int(5));
        assert_eq!(smallest_factor_among(&int(7), 4), int(7));
        assert_eq!(smallest_factor_among(&int(7), 3), int(1));
    }

    #[test]
    fn test_factor_removal() {
        assert_eq!(factor_count(&int(48), &int(4)), 2);
        assert_eq!(factor_count(&int(48), &int(1)), 0);
        assert_eq!(remove_factor(&int(-48), &int(4)), int(3));
        assert_eq!(gcd_rem(&int(630), &int(6)), int(35));
        assert_eq!(gcd_rem(&int(6), &int(15)), int(2));
    }

    #[test]
    fn test_sieve() {
        assert_eq!(primes_up_to(20), vec![2, 3, 5, 7, 11, 13, 17, 19]);
        assert_eq!(next_prime(13), 17);
    }
}
