//! # calq-complex
//!
//! Complex numbers whose real and imaginary parts are exact rationals.
//!
//! This crate provides:
//! - `Complex`, a pair of shared `Rational` parts
//! - Exact arithmetic, componentwise rounding and comparison
//! - Complex continuations of every transcendental function in
//!   `calq-rational`, evaluated to a caller-chosen epsilon
//! - Display and parsing in the `"1+2i"` form
//!
//! Functions given a real argument inside the real domain delegate to the
//! `Rational` implementation, so real results stay exactly what the real
//! layer returns.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod complex;
mod format;
mod inverse;
mod trans;

#[cfg(test)]
mod proptests;

pub use calq_integers::{CalcError, ErrorKind, Integer, Result, Rounding};
pub use calq_rational::Rational;
pub use complex::Complex;
pub use format::parse_complex;
