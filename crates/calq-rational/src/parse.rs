//! Parsing of numeric strings.
//!
//! Accepted forms, each optionally signed: decimal integers and fixed point
//! (`"12"`, `"0.5"`, `".44"`), scientific (`"1.5e-3"`), hexadecimal
//! (`"0x2a"`), binary (`"0b101"`) and octal with a leading zero (`"052"`).
//! A single `/` separates a numerator and denominator in any of those forms.

use num_traits::Zero;
use std::str::FromStr;

use calq_integers::{CalcError, Integer, Result};

use crate::Rational;

/// Decimal exponents beyond this magnitude are rejected.
const EXPONENT_LIMIT: i64 = 1 << 24;

/// Parses a rational from a string.
///
/// # Errors
///
/// Returns [`CalcError::DivideByZero`] for a zero denominator and
/// [`CalcError::Parse`] for anything malformed.
pub fn parse_rational(input: &str) -> Result<Rational> {
    let text = input.trim();
    let mut parts = text.splitn(2, '/');
    let numerator = parse_real(parts.next().unwrap_or(""), input)?;
    match parts.next() {
        None => Ok(numerator),
        Some(den) => {
            let denominator = parse_real(den, input)?;
            if denominator.is_zero() {
                return Err(CalcError::DivideByZero);
            }
            numerator.checked_div(&denominator)
        }
    }
}

fn parse_real(part: &str, input: &str) -> Result<Rational> {
    let part = part.trim();
    let (negative, body) = match part.as_bytes().first() {
        Some(b'-') => (true, &part[1..]),
        Some(b'+') => (false, &part[1..]),
        _ => (false, part),
    };
    if body.is_empty() {
        return Err(CalcError::parse(input));
    }

    let value = if let Some(hex) = strip_prefix_ci(body, "0x") {
        Rational::from_integer(radix_digits(hex, 16, input)?)
    } else if let Some(bin) = strip_prefix_ci(body, "0b") {
        Rational::from_integer(radix_digits(bin, 2, input)?)
    } else if body.len() > 1 && body.starts_with('0') && body.bytes().all(|b| b.is_ascii_digit()) {
        Rational::from_integer(radix_digits(&body[1..], 8, input)?)
    } else {
        parse_decimal(body, input)?
    };
    Ok(if negative { -value } else { value })
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

fn radix_digits(digits: &str, radix: u32, input: &str) -> Result<Integer> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(CalcError::parse(input));
    }
    Integer::from_str_radix(digits, radix).map_err(|_| CalcError::parse(input))
}

fn parse_decimal(body: &str, input: &str) -> Result<Rational> {
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(at) => (&body[..at], Some(&body[at + 1..])),
        None => (body, None),
    };
    let (whole, fraction) = match mantissa.find('.') {
        Some(at) => (&mantissa[..at], &mantissa[at + 1..]),
        None => (mantissa, ""),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(CalcError::parse(input));
    }

    let digits = format!("{whole}{fraction}");
    let significand: Integer = if digits.is_empty() {
        Integer::zero()
    } else {
        digits.parse().map_err(|_| CalcError::parse(input))?
    };

    let mut scale = -i64::try_from(fraction.len()).map_err(|_| CalcError::parse(input))?;
    if let Some(exp) = exponent {
        let (sign, exp_digits) = match exp.as_bytes().first() {
            Some(b'-') => (-1, &exp[1..]),
            Some(b'+') => (1, &exp[1..]),
            _ => (1, exp),
        };
        if exp_digits.is_empty() || !all_digits(exp_digits) {
            return Err(CalcError::parse(input));
        }
        let e: i64 = exp_digits.parse().map_err(|_| CalcError::parse(input))?;
        if e > EXPONENT_LIMIT {
            return Err(CalcError::parse(input));
        }
        scale += sign * e;
    }
    Ok(&Rational::from_integer(significand) * &Rational::power_of_ten(scale))
}

impl FromStr for Rational {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        parse_rational(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calq_integers::ErrorKind;

    fn q(n: i64, d: i64) -> Rational {
        Rational::from_i64_pair(n, d).unwrap()
    }

    #[test]
    fn test_forms() {
        assert_eq!(parse_rational("3/10").unwrap(), q(3, 10));
        assert_eq!(parse_rational("0.5").unwrap(), q(1, 2));
        assert_eq!(parse_rational(".44").unwrap(), q(11, 25));
        assert_eq!(parse_rational("-.1").unwrap(), q(-1, 10));
        assert_eq!(parse_rational("1e-10").unwrap(), Rational::power_of_ten(-10));
        assert_eq!(parse_rational("1.5E3").unwrap(), q(1500, 1));
        assert_eq!(parse_rational("0x2a").unwrap(), q(42, 1));
        assert_eq!(parse_rational("052").unwrap(), q(42, 1));
        assert_eq!(parse_rational("0b101010").unwrap(), q(42, 1));
        assert_eq!(parse_rational("1/0x14").unwrap(), q(1, 20));
        assert_eq!(parse_rational(" -7 ").unwrap(), q(-7, 1));
        assert_eq!(parse_rational("0").unwrap(), q(0, 1));
        assert_eq!(parse_rational("1.").unwrap(), q(1, 1));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_rational("1/0"), Err(CalcError::DivideByZero));
        assert_eq!(parse_rational("1/0.0"), Err(CalcError::DivideByZero));
        for bad in ["", "abc", "1..2", "0x", "09", "1e", "--1", "1/2/3", "."] {
            let err = parse_rational(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ParseError, "{bad}");
        }
    }

    #[test]
    fn test_from_str() {
        let v: Rational = "22/7".parse().unwrap();
        assert_eq!(v, q(22, 7));
    }
}
