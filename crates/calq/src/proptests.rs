//! Property-based tests for the real and complex paths through `Number`.

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use proptest::prelude::*;

    use crate::prelude::*;

    type NumberFn = fn(&Number, Option<&Rational>) -> Result<Number>;
    type ComplexFn = fn(&Complex, &Rational) -> Result<Complex>;

    const FUNCTIONS: [(&str, NumberFn, ComplexFn); 29] = [
        ("exp", Number::exp, Complex::exp),
        ("ln", Number::ln, Complex::ln),
        ("log", Number::log, Complex::log),
        ("sin", Number::sin, Complex::sin),
        ("cos", Number::cos, Complex::cos),
        ("tan", Number::tan, Complex::tan),
        ("cot", Number::cot, Complex::cot),
        ("sec", Number::sec, Complex::sec),
        ("csc", Number::csc, Complex::csc),
        ("sinh", Number::sinh, Complex::sinh),
        ("cosh", Number::cosh, Complex::cosh),
        ("tanh", Number::tanh, Complex::tanh),
        ("coth", Number::coth, Complex::coth),
        ("sech", Number::sech, Complex::sech),
        ("csch", Number::csch, Complex::csch),
        ("asin", Number::asin, Complex::asin),
        ("acos", Number::acos, Complex::acos),
        ("atan", Number::atan, Complex::atan),
        ("acot", Number::acot, Complex::acot),
        ("asec", Number::asec, Complex::asec),
        ("acsc", Number::acsc, Complex::acsc),
        ("asinh", Number::asinh, Complex::asinh),
        ("acosh", Number::acosh, Complex::acosh),
        ("atanh", Number::atanh, Complex::atanh),
        ("acoth", Number::acoth, Complex::acoth),
        ("asech", Number::asech, Complex::asech),
        ("acsch", Number::acsch, Complex::acsch),
        ("gd", Number::gd, Complex::gd),
        ("agd", Number::agd, Complex::agd),
    ];

    // Strategy for generating small rationals
    fn small_rational() -> impl Strategy<Value = Rational> {
        (-40i64..40i64, 1i64..16i64).prop_map(|(n, d)| Rational::from_i64_pair(n, d).unwrap())
    }

    // Strategy for generating rationals in [-1, 1]
    fn unit_rational() -> impl Strategy<Value = Rational> {
        (1i64..64i64).prop_flat_map(|d| (-d..=d, Just(d)))
            .prop_map(|(n, d)| Rational::from_i64_pair(n, d).unwrap())
    }

    fn epsilon() -> impl Strategy<Value = Rational> {
        (1i64..30i64).prop_map(|k| Rational::power_of_ten(-k))
    }

    proptest! {
        #[test]
        fn real_and_complex_paths_agree(x in small_rational(), eps in epsilon()) {
            let real = Number::Real(x.clone());
            let complex = Complex::from(x);
            for (name, on_number, on_complex) in FUNCTIONS {
                let expected = on_complex(&complex, &eps).map(Number::from);
                prop_assert_eq!(on_number(&real, Some(&eps)), expected, "{}", name);
            }
        }

        #[test]
        fn everywhere_defined_functions_stay_real(x in small_rational(), eps in epsilon()) {
            let real = Number::Real(x);
            let functions: [NumberFn; 9] = [
                Number::exp, Number::sin, Number::cos, Number::atan, Number::sinh,
                Number::cosh, Number::tanh, Number::asinh, Number::gd,
            ];
            for f in functions {
                prop_assert!(f(&real, Some(&eps)).unwrap().is_real());
            }
        }

        #[test]
        fn unit_interval_inverses_stay_real(x in unit_rational(), eps in epsilon()) {
            let real = Number::Real(x.clone());
            prop_assert!(real.asin(Some(&eps)).unwrap().is_real());
            prop_assert!(real.acos(Some(&eps)).unwrap().is_real());
            if x.abs() < Rational::from(1) {
                prop_assert!(real.atanh(Some(&eps)).unwrap().is_real());
            } else {
                prop_assert!(real.atanh(Some(&eps)).is_err());
            }
        }

        #[test]
        fn logarithms_of_negatives_carry_pi(x in small_rational(), eps in epsilon()) {
            prop_assume!(x.is_negative());
            let z = Number::Real(x).ln(Some(&eps)).unwrap();
            let pi = Rational::pi(&eps).unwrap();
            prop_assert!((&z.im() - &pi).abs() <= eps.scale(1));
        }

        #[test]
        fn zero_imaginary_part_demotes(re in small_rational()) {
            let n = Number::complex(re.clone(), Rational::zero());
            prop_assert_eq!(n, Number::Real(re));
        }
    }
}
