//! # calq
//!
//! An arbitrary precision numeric engine: exact rationals, complex numbers
//! over rationals, and transcendental functions evaluated to a chosen
//! epsilon without floating point.
//!
//! ## Features
//!
//! - **Exact arithmetic**: big integers and reduced fractions
//! - **Rounding words**: one flag word selects the rounding rule for
//!   quotients, approximations and roots
//! - **Transcendentals**: exponential, logarithmic, circular, hyperbolic and
//!   inverse functions, accurate to any positive epsilon
//! - **Complex continuation**: real functions outside their real domain
//!   return the principal complex value
//!
//! ## Quick Start
//!
//! ```rust
//! use calq::prelude::*;
//!
//! let x: Number = "2".parse().unwrap();
//! let root = x.acos(None).unwrap();
//! assert!(!root.is_real());
//!
//! let third = Rational::from_i64_pair(1, 3).unwrap();
//! assert_eq!(third.to_display_string(DisplayMode::Fraction, 20), "1/3");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod number;

#[cfg(test)]
mod proptests;

pub use calq_complex as complex;
pub use calq_integers as integers;
pub use calq_rational as rational;

pub use calq_integers::{CalcError, ErrorKind, Result};
pub use calq_rational::config;
pub use number::Number;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::Number;
    pub use calq_complex::Complex;
    pub use calq_integers::{CalcError, ErrorKind, Integer, Result, Rounding};
    pub use calq_rational::{Config, ConfigValue, DisplayMode, Rational};
}
