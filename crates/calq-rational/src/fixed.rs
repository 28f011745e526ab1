//! Binary fixed-point kernel for the transcendental functions.
//!
//! A fixed value `v` at precision `p` stands for `v / 2^p`. Every kernel
//! routine returns a value within a few units of the last place of the
//! exact result; callers add guard bits and round the final value to the
//! requested epsilon.

use dashu::base::{Abs, BitTest, Signed as DashuSigned};
use dashu::integer::IBig;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::trace;

use crate::Rational;

/// Extra bits carried through every kernel evaluation.
pub(crate) const GUARD: usize = 24;

/// Number of argument halvings before a Taylor series is summed.
const HALVINGS: usize = 8;

/// Largest precision computed so far, with its value.
type Cached = Mutex<Option<(usize, IBig)>>;

static PI: Lazy<Cached> = Lazy::new(|| Mutex::new(None));
static LN2: Lazy<Cached> = Lazy::new(|| Mutex::new(None));

pub(crate) fn one(prec: usize) -> IBig {
    IBig::ONE << prec
}

/// Moves a fixed value from precision `from` to precision `to`.
pub(crate) fn rescale(v: IBig, from: usize, to: usize) -> IBig {
    if to >= from {
        v << (to - from)
    } else {
        v >> (from - to)
    }
}

pub(crate) fn mul(a: &IBig, b: &IBig, prec: usize) -> IBig {
    (a * b) >> prec
}

/// Fixed division; `b` must be non-zero.
pub(crate) fn div(a: &IBig, b: &IBig, prec: usize) -> IBig {
    (a.clone() << prec) / b
}

/// Fixed square root of a non-negative value.
pub(crate) fn sqrt(a: &IBig, prec: usize) -> IBig {
    if !a.is_positive() {
        return IBig::ZERO;
    }
    let n = a.clone() << prec;
    let mut x = IBig::ONE << n.bit_len().div_ceil(2);
    loop {
        let y = (&x + &n / &x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Floor of `x * 2^prec`.
pub(crate) fn to_fixed(x: &Rational, prec: usize) -> IBig {
    let num = x.as_inner().numerator().clone() << prec;
    let den = IBig::from(x.as_inner().denominator().clone());
    let q = &num / &den;
    if num.is_negative() && &q * &den != num {
        q - IBig::ONE
    } else {
        q
    }
}

/// The rational `v / 2^prec`.
pub(crate) fn from_fixed(v: IBig, prec: usize) -> Rational {
    Rational::from_rbig(dashu::rational::RBig::from_parts(v, dashu::integer::UBig::ONE << prec))
}

/// Number of bits needed to hold |n|.
pub(crate) fn bits_of(n: i64) -> usize {
    (64 - n.unsigned_abs().leading_zeros()) as usize
}

fn cached(cache: &Cached, prec: usize, compute: fn(usize) -> IBig) -> IBig {
    let mut slot = cache.lock();
    if let Some((have, value)) = slot.as_ref() {
        if *have >= prec {
            return value.clone() >> (*have - prec);
        }
    }
    let value = compute(prec);
    *slot = Some((prec, value.clone()));
    value
}

/// Sum of `(-1)^k / ((2k+1) n^(2k+1))` when `alternate`, else without signs.
fn arctan_series(n: u32, alternate: bool, prec: usize) -> IBig {
    let n = IBig::from(n);
    let n2 = &n * &n;
    let mut power = one(prec) / &n;
    let mut sum = power.clone();
    let mut k = 1u64;
    loop {
        power = power / &n2;
        if power.is_zero() {
            return sum;
        }
        let term = &power / IBig::from(2 * k + 1);
        if alternate && k % 2 == 1 {
            sum -= term;
        } else {
            sum += term;
        }
        k += 1;
    }
}

fn compute_pi(prec: usize) -> IBig {
    trace!(prec, "computing pi");
    let w = prec + GUARD;
    // Machin: pi = 16 atan(1/5) - 4 atan(1/239)
    let pi = arctan_series(5, true, w) * IBig::from(16) - arctan_series(239, true, w) * IBig::from(4);
    pi >> GUARD
}

fn compute_ln2(prec: usize) -> IBig {
    trace!(prec, "computing ln 2");
    let w = prec + GUARD;
    // ln 2 = 2 atanh(1/3)
    (arctan_series(3, false, w) << 1) >> GUARD
}

/// Pi at the given precision, memoized across calls.
pub(crate) fn pi(prec: usize) -> IBig {
    cached(&PI, prec, compute_pi)
}

/// Natural logarithm of 2, memoized across calls.
pub(crate) fn ln2(prec: usize) -> IBig {
    cached(&LN2, prec, compute_ln2)
}

/// Taylor series for e^x, valid for small |x|.
fn exp_series(x: &IBig, prec: usize) -> IBig {
    let mut sum = one(prec);
    let mut term = one(prec);
    let mut k = 1u64;
    loop {
        term = mul(&term, x, prec) / IBig::from(k);
        if term.is_zero() {
            return sum;
        }
        sum += &term;
        k += 1;
    }
}

/// e^x with a relative error of about `2^-prec`, returned at precision
/// `prec`. The argument must be small enough that `x / ln 2` fits an i64.
pub(crate) fn exp_fixed(x: &IBig, prec: usize) -> IBig {
    let lp = prec.max(64);
    let k = i64::try_from(rescale(x.clone(), prec, lp) / ln2(lp)).unwrap_or(0);

    let w = prec + bits_of(k) + GUARD + HALVINGS;
    let r = rescale(x.clone(), prec, w) - ln2(w) * IBig::from(k);
    let mut s = exp_series(&(r >> HALVINGS), w);
    for _ in 0..HALVINGS {
        s = mul(&s, &s, w);
    }
    // result = s * 2^k at precision w
    let shift = k + prec as i64 - w as i64;
    if shift >= 0 {
        s << shift.unsigned_abs() as usize
    } else {
        s >> shift.unsigned_abs() as usize
    }
}

/// Estimate of `x / ln 2`, used to size working precisions.
pub(crate) fn log2_estimate(x: &Rational) -> i64 {
    let v = to_fixed(x, 32);
    let k = (v << 32) / ln2(64);
    let saturated = if k.is_negative() { i64::MIN } else { i64::MAX };
    i64::try_from(k).unwrap_or(saturated)
}

/// e^x for a rational argument, with absolute error about `2^-prec`.
pub(crate) fn exp(x: &Rational, prec: usize) -> IBig {
    let k = log2_estimate(x).max(0) as usize;
    let w = prec + k + 8;
    rescale(exp_fixed(&to_fixed(x, w), w), w, prec)
}

/// atanh series `t + t^3/3 + t^5/5 + ...` for |t| <= 1/3.
fn atanh_series(t: &IBig, prec: usize) -> IBig {
    let t2 = mul(t, t, prec);
    let mut power = t.clone();
    let mut sum = t.clone();
    let mut k = 1u64;
    loop {
        power = mul(&power, &t2, prec);
        let term = &power / IBig::from(2 * k + 1);
        if term.is_zero() {
            return sum;
        }
        sum += term;
        k += 1;
    }
}

/// ln(num / den) for positive integers, absolute error about `2^-prec`.
pub(crate) fn ln_ratio(num: &IBig, den: &IBig, prec: usize) -> IBig {
    let k = num.bit_len() as i64 - den.bit_len() as i64;
    let w = prec + bits_of(k) + GUARD;
    // m = num / (den 2^k) lies in (1/2, 2)
    let m = if k >= 0 {
        (num.clone() << w) / (den.clone() << k.unsigned_abs() as usize)
    } else {
        (num.clone() << (w + k.unsigned_abs() as usize)) / den
    };
    let unit = one(w);
    let t = div(&(&m - &unit), &(&m + &unit), w);
    let ln_m = atanh_series(&t, w) << 1;
    rescale(ln_m + ln2(w) * IBig::from(k), w, prec)
}

/// ln(x) for positive rational x.
pub(crate) fn ln(x: &Rational, prec: usize) -> IBig {
    ln_ratio(x.as_inner().numerator(), &IBig::from(x.as_inner().denominator().clone()), prec)
}

/// ln of a positive fixed value.
pub(crate) fn ln_fixed(v: &IBig, prec: usize) -> IBig {
    ln_ratio(v, &one(prec), prec)
}

/// atan of a fixed value at precision `prec`.
pub(crate) fn atan_fixed(x: &IBig, prec: usize) -> IBig {
    let w = prec + GUARD;
    let unit = one(w);
    let negative = x.is_negative();
    let mut a = rescale(if negative { -x.clone() } else { x.clone() }, prec, w);
    let complement = a > unit;
    if complement {
        a = div(&unit, &a, w);
    }
    // atan(a) = 2 atan(a / (1 + sqrt(1 + a^2)))
    for _ in 0..4 {
        let s = sqrt(&(&unit + &mul(&a, &a, w)), w);
        a = div(&a, &(&unit + &s), w);
    }

    let a2 = mul(&a, &a, w);
    let mut power = a.clone();
    let mut sum = a;
    let mut k = 1u64;
    loop {
        power = mul(&power, &a2, w);
        let term = &power / IBig::from(2 * k + 1);
        if term.is_zero() {
            break;
        }
        if k % 2 == 1 {
            sum -= term;
        } else {
            sum += term;
        }
        k += 1;
    }
    let mut result = sum << 4;
    if complement {
        result = (pi(w) >> 1) - result;
    }
    if negative {
        result = -result;
    }
    rescale(result, w, prec)
}

/// Angle of the point (x, y), in (-pi, pi].
///
/// Divides by whichever coordinate is larger in magnitude.
pub(crate) fn atan2_fixed(y: &IBig, x: &IBig, prec: usize) -> IBig {
    if y.is_zero() {
        return if x.is_negative() { pi(prec) } else { IBig::ZERO };
    }
    let w = prec + GUARD;
    let (yw, xw) = (rescale(y.clone(), prec, w), rescale(x.clone(), prec, w));
    let half_pi = pi(w) >> 1;
    let result = if xw.clone().abs() >= yw.clone().abs() {
        let base = atan_fixed(&div(&yw, &xw, w), w);
        if xw.is_negative() {
            if yw.is_negative() {
                base - pi(w)
            } else {
                base + pi(w)
            }
        } else {
            base
        }
    } else {
        let base = atan_fixed(&div(&xw, &yw, w), w);
        if yw.is_negative() {
            -half_pi - base
        } else {
            half_pi - base
        }
    };
    rescale(result, w, prec)
}

/// atan of a rational.
pub(crate) fn atan(x: &Rational, prec: usize) -> IBig {
    atan_fixed(&to_fixed(x, prec + GUARD), prec + GUARD) >> GUARD
}

/// Sine and cosine of a rational argument.
pub(crate) fn sin_cos(x: &Rational, prec: usize) -> (IBig, IBig) {
    let coarse = to_fixed(x, 64);
    let two_pi = pi(64) << 1;
    let turns = (coarse + pi(64)) / &two_pi;
    let w = prec + turns.bit_len() + GUARD + HALVINGS;

    let r = to_fixed(x, w) - (pi(w) << 1) * &turns;
    let h = r >> HALVINGS;
    let h2 = mul(&h, &h, w);

    let mut s = h.clone();
    let mut term = h;
    let mut k = 1u64;
    loop {
        term = -mul(&term, &h2, w) / IBig::from((2 * k) * (2 * k + 1));
        if term.is_zero() {
            break;
        }
        s += &term;
        k += 1;
    }
    let mut c = one(w);
    let mut term = one(w);
    let mut k = 1u64;
    loop {
        term = -mul(&term, &h2, w) / IBig::from((2 * k - 1) * (2 * k));
        if term.is_zero() {
            break;
        }
        c += &term;
        k += 1;
    }

    for _ in 0..HALVINGS {
        let s2 = mul(&s, &c, w) << 1;
        let c2 = mul(&c, &c, w) - mul(&s, &s, w);
        s = s2;
        c = c2;
    }
    (rescale(s, w, prec), rescale(c, w, prec))
}
