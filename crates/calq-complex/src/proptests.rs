//! Property-based tests for complex arithmetic and functions.

#[cfg(test)]
mod tests {
    use num_traits::{One, Zero};
    use proptest::prelude::*;

    use crate::{Complex, Rational, Rounding};
    use calq_rational::DisplayMode;

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

    fn complex() -> impl Strategy<Value = Complex> {
        (rational(), rational()).prop_map(|(re, im)| Complex::new(re, im))
    }

    fn non_real() -> impl Strategy<Value = Complex> {
        (rational(), non_zero_int(), non_zero_int())
            .prop_map(|(re, n, d)| Complex::new(re, Rational::from_i64_pair(n, d).unwrap()))
    }

    fn within(a: &Complex, b: &Complex, tolerance: &Rational) -> bool {
        (a.re() - b.re()).abs() <= *tolerance && (a.im() - b.im()).abs() <= *tolerance
    }

    proptest! {
        #[test]
        fn division_inverts_multiplication(a in complex(), b in non_real()) {
            prop_assert_eq!((&a * &b).checked_div(&b).unwrap(), a);
        }

        #[test]
        fn norm_is_product_with_conjugate(a in complex()) {
            prop_assert_eq!(&a * &a.conj(), Complex::from(a.norm()));
        }

        #[test]
        fn inverse_is_reciprocal(a in non_real()) {
            prop_assert_eq!(&a * &a.inverse().unwrap(), Complex::one());
        }

        #[test]
        fn fraction_display_round_trips(a in complex()) {
            let text = a.to_display_string(DisplayMode::Fraction, 20);
            prop_assert_eq!(text.parse::<Complex>().unwrap(), a);
        }

        #[test]
        fn parity_needs_a_real_value(a in non_real()) {
            prop_assert!(!a.is_even());
            prop_assert!(!a.is_odd());
        }

        #[test]
        fn cmp_is_antisymmetric(a in complex(), b in complex()) {
            prop_assert_eq!(a.cmp(&b), -b.cmp(&a));
            prop_assert!(a.cmp(&a).is_zero());
        }

        #[test]
        fn square_root_squares_back(a in non_real()) {
            let eps = Rational::power_of_ten(-30);
            let root = a.sqrt(&eps, Rounding::NEAREST_EVEN).unwrap();
            prop_assert!(!root.re().is_negative());
            let back = &root * &root;
            // |root| < 40, so squaring loses under 7 bits
            prop_assert!(within(&back, &a, &Rational::power_of_ten(-27)));
        }

        #[test]
        fn exp_of_ln_returns(a in non_real()) {
            let eps = Rational::power_of_ten(-30);
            let back = a.ln(&eps).unwrap().exp(&eps).unwrap();
            prop_assert!(within(&back, &a, &Rational::power_of_ten(-25)));
        }

        #[test]
        fn sin_cos_identity(re in -20i64..20, im in -20i64..20, d in 1i64..10) {
            let z = Complex::new(Rational::from_i64_pair(re, d).unwrap(), Rational::from_i64_pair(im, d).unwrap());
            let eps = Rational::power_of_ten(-30);
            let s = z.sin(&eps).unwrap();
            let c = z.cos(&eps).unwrap();
            let one = &(&s * &s) + &(&c * &c);
            // sin and cos grow like e^|im|, below 2^30 here
            prop_assert!(within(&one, &Complex::one(), &Rational::power_of_ten(-20)));
        }

        #[test]
        fn results_are_multiples_of_eps(a in non_real(), k in 2i64..25) {
            let eps = Rational::power_of_ten(-k);
            let z = a.atan(&eps);
            prop_assume!(z.is_ok());
            let z = z.unwrap();
            prop_assert!(z.re().is_multiple_of(&eps) && z.im().is_multiple_of(&eps));
        }
    }
}
