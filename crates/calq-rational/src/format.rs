//! Display modes and string rendering.

use num_traits::{One, Zero};
use std::fmt;
use std::str::FromStr;

use calq_integers::{CalcError, Integer, Result, Rounding};

use crate::{config, Rational};

/// How values are rendered as text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// Exact `num/den`.
    Fraction,
    /// Integer part, with `~` when truncated.
    Integer,
    /// Fixed-point decimal.
    #[default]
    Decimal,
    /// Mantissa and decimal exponent.
    Scientific,
    /// Base 16 with `0x` prefix.
    Hex,
    /// Base 8 with leading `0`.
    Octal,
    /// Base 2 with `0b` prefix.
    Binary,
    /// Whatever the process-wide configuration selects.
    Default,
}

impl DisplayMode {
    /// Every accepted name, with the mode it selects.
    pub const NAMES: [(&'static str, DisplayMode); 17] = [
        ("frac", DisplayMode::Fraction),
        ("fraction", DisplayMode::Fraction),
        ("int", DisplayMode::Integer),
        ("integer", DisplayMode::Integer),
        ("real", DisplayMode::Decimal),
        ("float", DisplayMode::Decimal),
        ("decimal", DisplayMode::Decimal),
        ("sci", DisplayMode::Scientific),
        ("scientific", DisplayMode::Scientific),
        ("exp", DisplayMode::Scientific),
        ("hex", DisplayMode::Hex),
        ("hexadecimal", DisplayMode::Hex),
        ("oct", DisplayMode::Octal),
        ("octal", DisplayMode::Octal),
        ("bin", DisplayMode::Binary),
        ("binary", DisplayMode::Binary),
        ("default", DisplayMode::Default),
    ];

    /// Looks a mode up by name or synonym, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Argument`] for an unknown name.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
            .map(|&(_, mode)| mode)
            .ok_or_else(|| CalcError::argument(format!("unknown display mode {name:?}")))
    }

    /// Canonical short name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DisplayMode::Fraction => "frac",
            DisplayMode::Integer => "int",
            DisplayMode::Decimal => "real",
            DisplayMode::Scientific => "sci",
            DisplayMode::Hex => "hex",
            DisplayMode::Octal => "oct",
            DisplayMode::Binary => "bin",
            DisplayMode::Default => "default",
        }
    }

    /// Replaces [`DisplayMode::Default`] with the configured mode.
    #[must_use]
    pub fn resolve(self) -> Self {
        match self {
            DisplayMode::Default => match config::current().mode {
                DisplayMode::Default => DisplayMode::Decimal,
                mode => mode,
            },
            mode => mode,
        }
    }
}

impl FromStr for DisplayMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Renders `|n|` scaled by `10^-places` with trailing zeros removed.
fn fixed_point(n: &Integer, places: usize) -> String {
    let mut digits = n.abs().to_string();
    if places > 0 {
        if digits.len() <= places {
            digits = format!("{}{digits}", "0".repeat(places + 1 - digits.len()));
        }
        let split = digits.len() - places;
        let (whole, fraction) = digits.split_at(split);
        let fraction = fraction.trim_end_matches('0');
        digits = if fraction.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{fraction}")
        };
    }
    if n.is_negative() {
        format!("-{digits}")
    } else {
        digits
    }
}

/// Number of decimal places in a terminating expansion with this
/// denominator, or `None` if it repeats.
fn terminating_places(den: &Integer) -> Option<usize> {
    let two = Integer::new(2);
    let five = Integer::new(5);
    let mut rest = den.clone();
    let (mut twos, mut fives) = (0usize, 0usize);
    while (&rest % &two).is_zero() {
        rest = &rest / &two;
        twos += 1;
    }
    while (&rest % &five).is_zero() {
        rest = &rest / &five;
        fives += 1;
    }
    rest.is_one().then_some(twos.max(fives))
}

fn radix_part(n: &Integer, radix: u32) -> String {
    let small = i64::from(radix.min(10));
    if n.abs() < small {
        return n.to_string();
    }
    let prefix = match radix {
        16 => "0x",
        8 => "0",
        _ => "0b",
    };
    let digits = n.abs().to_radix_string(radix);
    if n.is_negative() {
        format!("-{prefix}{digits}")
    } else {
        format!("{prefix}{digits}")
    }
}

impl Rational {
    /// Renders the value in the given mode, using `digits` decimal places
    /// for the decimal and scientific modes.
    #[must_use]
    pub fn to_display_string(&self, mode: DisplayMode, digits: usize) -> String {
        match mode.resolve() {
            DisplayMode::Fraction => self.to_fraction_string(),
            DisplayMode::Integer => {
                let int = self.int().numerator();
                if self.is_integer() {
                    int.to_string()
                } else {
                    format!("~{int}")
                }
            }
            DisplayMode::Scientific => self.to_scientific_string(digits),
            DisplayMode::Hex => self.to_radix_fraction(16),
            DisplayMode::Octal => self.to_radix_fraction(8),
            DisplayMode::Binary => self.to_radix_fraction(2),
            DisplayMode::Decimal | DisplayMode::Default => self.to_decimal_string(digits),
        }
    }

    fn to_fraction_string(&self) -> String {
        if self.is_integer() {
            self.numerator().to_string()
        } else {
            format!("{}/{}", self.numerator(), self.denominator())
        }
    }

    fn to_radix_fraction(&self, radix: u32) -> String {
        let num = radix_part(&self.numerator(), radix);
        if self.is_integer() {
            num
        } else {
            format!("{num}/{}", radix_part(&self.denominator(), radix))
        }
    }

    /// Decimal rendering; `~` marks a rounded result.
    fn to_decimal_string(&self, digits: usize) -> String {
        if self.is_integer() {
            return self.numerator().to_string();
        }
        if let Some(places) = terminating_places(&self.denominator()).filter(|&p| p <= digits) {
            let scaled = self * &Rational::power_of_ten(places as i64);
            return fixed_point(&scaled.numerator(), places);
        }
        let eps = Rational::power_of_ten(-(digits as i64));
        let rounded = self.appr(&eps, Rounding::NEAREST_EVEN);
        let scaled = &rounded * &Rational::power_of_ten(digits as i64);
        format!("~{}", fixed_point(&scaled.numerator(), digits))
    }

    fn to_scientific_string(&self, digits: usize) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let mut exponent = self.ilog10().unwrap_or(0);
        let mut mantissa = self * &Rational::power_of_ten(-exponent);
        let eps = Rational::power_of_ten(-(digits as i64));
        let mut rounded = mantissa.appr(&eps, Rounding::NEAREST_EVEN);
        if rounded.abs() >= Rational::from(10) {
            exponent += 1;
            mantissa = self * &Rational::power_of_ten(-exponent);
            rounded = mantissa.appr(&eps, Rounding::NEAREST_EVEN);
        }
        let body = rounded.to_decimal_string(digits);
        let marker = if rounded == mantissa { "" } else { "~" };
        if exponent == 0 {
            format!("{marker}{body}")
        } else {
            format!("{marker}{body}e{exponent}")
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = config::current();
        f.write_str(&self.to_display_string(config.mode, config.display))
    }
}
