//! Property-based tests for rational arithmetic and approximation.

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use proptest::prelude::*;

    use crate::{DisplayMode, Integer, Rational, Rounding};

    // Strategy for generating small integers
    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    // Strategy for generating non-zero integers
    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    fn rational() -> impl Strategy<Value = Rational> {
        (small_int(), non_zero_int()).prop_map(|(n, d)| Rational::from_i64_pair(n, d).unwrap())
    }

    fn non_zero_rational() -> impl Strategy<Value = Rational> {
        (non_zero_int(), non_zero_int()).prop_map(|(n, d)| Rational::from_i64_pair(n, d).unwrap())
    }

    proptest! {
        #[test]
        fn pairs_are_reduced(n in small_int(), d in non_zero_int()) {
            let x = Rational::from_i64_pair(n, d).unwrap();
            prop_assert!(x.denominator() > Integer::zero());
            prop_assert_eq!(x.numerator().abs().gcd(&x.denominator()), Integer::new(1));
        }

        #[test]
        fn division_is_exact(a in rational(), b in non_zero_rational()) {
            prop_assert_eq!(&a.checked_div(&b).unwrap() * &b, a);
        }

        #[test]
        fn negation_is_an_involution(a in rational()) {
            prop_assert_eq!(-(-a.clone()), a.clone());
            prop_assert!((&a + &(-a.clone())).is_zero());
        }

        #[test]
        fn quomod_reconstructs(a in rational(), b in non_zero_rational(), bits in 0u32..32) {
            let (q, r) = a.quomod(&b, Rounding::new(bits)).unwrap();
            prop_assert_eq!(&(&b * &Rational::from_integer(q)) + &r, a);
            prop_assert!(r.abs() < b.abs());
        }

        #[test]
        fn fraction_display_round_trips(a in rational()) {
            for mode in [DisplayMode::Fraction, DisplayMode::Hex, DisplayMode::Octal, DisplayMode::Binary] {
                let text = a.to_display_string(mode, 20);
                prop_assert_eq!(text.parse::<Rational>().unwrap(), a.clone());
            }
        }

        #[test]
        fn appr_lands_within_eps(a in rational(), e in 1i64..100, bits in 0u32..32) {
            let eps = Rational::from_i64_pair(e, 100).unwrap();
            let x = a.appr(&eps, Rounding::new(bits));
            prop_assert!((&x - &a).abs() < eps);
            prop_assert!(x.is_multiple_of(&eps));
        }

        #[test]
        fn cfappr_stays_within_eps(a in rational(), e in 1i64..100) {
            let eps = Rational::from_i64_pair(1, e + 1).unwrap();
            let x = a.cfappr(&eps, Rounding::NEAREST_EVEN);
            prop_assert!((&x - &a).abs() <= eps);
            prop_assert!(x.denominator() <= a.denominator());
        }

        #[test]
        fn sqrt_of_square_is_exact(n in small_int(), d in non_zero_int()) {
            let x = Rational::from_i64_pair(n, d).unwrap().abs();
            let eps = Rational::power_of_ten(-6);
            let root = (&x * &x).sqrt(&eps, Rounding::new(Rounding::NEAREST_EVEN.bits() | Rounding::EXACT)).unwrap();
            prop_assert_eq!(root, x);
        }

        #[test]
        fn exp_ln_round_trip(n in 1i64..1000, d in 1i64..100) {
            let x = Rational::from_i64_pair(n, d).unwrap();
            let fine = Rational::power_of_ten(-30);
            let back = x.ln(&fine).unwrap().exp(&fine).unwrap();
            // e^y magnifies the error in y by at most x < 1000
            prop_assert!((&back - &x).abs() < Rational::power_of_ten(-25));
        }

        #[test]
        fn sin_cos_identity(n in small_int(), d in non_zero_int()) {
            let x = Rational::from_i64_pair(n, d).unwrap();
            let eps = Rational::power_of_ten(-25);
            let s = x.sin(&eps).unwrap();
            let c = x.cos(&eps).unwrap();
            let one = &(&s * &s) + &(&c * &c);
            prop_assert!((&one - &Rational::from(1)).abs() < Rational::power_of_ten(-24));
        }

        #[test]
        fn epsilon_monotonicity(n in small_int(), d in non_zero_int(), k in 2i64..20) {
            let x = Rational::from_i64_pair(n, d).unwrap();
            let e1 = Rational::power_of_ten(-k - 5);
            let e2 = Rational::power_of_ten(-k);
            let a = x.atan(&e1).unwrap();
            let b = x.atan(&e2).unwrap();
            prop_assert!((&a - &b).abs() <= &e1 + &e2);
        }
    }
}
