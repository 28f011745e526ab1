//! Property-based tests for big integer arithmetic.

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use proptest::prelude::*;

    use crate::{Integer, Rounding};

    // Strategy for generating small integers
    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    // Strategy for generating non-zero integers
    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    proptest! {
        #[test]
        fn integer_add_commutative(a in small_int(), b in small_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            prop_assert_eq!(&a + &b, &b + &a);
        }

        #[test]
        fn integer_distributive(a in small_int(), b in small_int(), c in small_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let c = Integer::new(c);
            prop_assert_eq!(&a * &(&b + &c), &(&a * &b) + &(&a * &c));
        }

        #[test]
        fn division_reconstructs_dividend(a in small_int(), b in non_zero_int(), bits in 0u32..32) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let (q, r) = a.div_rem_rounded(&b, Rounding::new(bits)).unwrap();
            prop_assert_eq!(&(&q * &b) + &r, a);
            prop_assert!(r.abs() < b.abs());
        }

        #[test]
        fn floor_remainder_has_divisor_sign(a in small_int(), b in non_zero_int()) {
            let (_, r) = Integer::new(a).div_rem_floor(&Integer::new(b)).unwrap();
            prop_assert!(r.is_zero() || r.signum() == Integer::new(b).signum());
        }

        #[test]
        fn nearest_remainder_is_at_most_half(a in small_int(), b in non_zero_int()) {
            let b = Integer::new(b);
            let (_, r) = Integer::new(a).div_rem_rounded(&b, Rounding::NEAREST_EVEN).unwrap();
            prop_assert!(&r.abs() * &Integer::new(2) <= b.abs());
        }

        #[test]
        fn shift_matches_truncated_division(a in small_int(), n in 0i64..12) {
            let a = Integer::new(a);
            let divisor = Integer::new(1 << n);
            prop_assert_eq!(a.shift(-n), &a / &divisor);
            prop_assert_eq!(a.shift(n), &a * &divisor);
        }

        #[test]
        fn isqrt_brackets_root(a in 0i64..1_000_000) {
            let a = Integer::new(a);
            let r = a.isqrt().unwrap();
            let next = &r + &Integer::new(1);
            prop_assert!(&r * &r <= a);
            prop_assert!(&next * &next > a);
        }

        #[test]
        fn gcd_divides_both(a in non_zero_int(), b in non_zero_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let g = a.gcd(&b);
            prop_assert!((&a % &g).is_zero());
            prop_assert!((&b % &g).is_zero());
        }
    }
}
