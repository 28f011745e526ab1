//! Display and parsing of complex values.
//!
//! A value prints as its real part when the imaginary part is zero, as the
//! imaginary part alone when the real part is zero, and as `re+imi` or
//! `re-imi` otherwise. The `i` goes before the `/` of a fractional
//! imaginary part: `1/5+2i/5`.

use std::fmt;
use std::str::FromStr;

use num_traits::{One, Zero};

use calq_integers::{CalcError, Result};
use calq_rational::config;
use calq_rational::{parse_rational, DisplayMode, Rational};

use crate::Complex;

fn imaginary_text(part: &Rational, mode: DisplayMode, digits: usize) -> String {
    let text = part.to_display_string(mode, digits);
    match text.find('/') {
        Some(slash) => format!("{}i{}", &text[..slash], &text[slash..]),
        None => format!("{text}i"),
    }
}

impl Complex {
    /// Renders the value in the given mode, using `digits` decimal places
    /// for the decimal and scientific modes.
    #[must_use]
    pub fn to_display_string(&self, mode: DisplayMode, digits: usize) -> String {
        if self.is_real() {
            return self.re().to_display_string(mode, digits);
        }
        if self.re().is_zero() {
            return imaginary_text(self.im(), mode, digits);
        }
        let sign = if self.im().is_negative() { '-' } else { '+' };
        format!(
            "{}{sign}{}",
            self.re().to_display_string(mode, digits),
            imaginary_text(&self.im().abs(), mode, digits)
        )
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = config::current();
        f.write_str(&self.to_display_string(config.mode, config.display))
    }
}

/// Index of the sign separating the real and imaginary parts, if any.
fn split_point(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E' | b'/'))
}

fn parse_imaginary(part: &str, input: &str) -> Result<Rational> {
    let part = part.trim();
    let at = part.find(['i', 'I']).ok_or_else(|| CalcError::parse(input))?;
    let (head, tail) = (&part[..at], &part[at + 1..]);
    let magnitude = match head {
        "" | "+" => Rational::one(),
        "-" => -Rational::one(),
        _ => parse_rational(head).map_err(|_| CalcError::parse(input))?,
    };
    if tail.is_empty() {
        return Ok(magnitude);
    }
    let den = tail.strip_prefix('/').ok_or_else(|| CalcError::parse(input))?;
    let den = parse_rational(den).map_err(|_| CalcError::parse(input))?;
    magnitude.checked_div(&den)
}

/// Parses a complex value: `"2"`, `"-3i"`, `"1+2i"`, `"1/5+2i/5"`.
///
/// # Errors
///
/// Returns [`CalcError::DivideByZero`] for a zero denominator and
/// [`CalcError::Parse`] for anything malformed.
pub fn parse_complex(input: &str) -> Result<Complex> {
    let text: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if !text.contains(['i', 'I']) {
        return parse_rational(&text).map(Complex::from);
    }
    match split_point(&text) {
        Some(at) => {
            let re = parse_rational(&text[..at]).map_err(|_| CalcError::parse(input))?;
            Ok(Complex::new(re, parse_imaginary(&text[at..], input)?))
        }
        None => Ok(Complex::new(Rational::zero(), parse_imaginary(&text, input)?)),
    }
}

impl FromStr for Complex {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        parse_complex(s)
    }
}
