//! # calq-rational
//!
//! Exact rational arithmetic for the calq numeric engine.
//!
//! This crate provides:
//! - `Rational`, a shared handle to a reduced fraction
//! - Parsing and display in fraction, decimal, scientific and radix forms
//! - Rounding, `appr` and continued-fraction approximation
//! - Number theory and combinatorics over integer-valued rationals
//! - Transcendental functions evaluated to a caller-chosen epsilon
//! - The calculator configuration and its process-wide default
//!
//! ## Precision
//!
//! Transcendental functions never use floating point. They are evaluated
//! in binary fixed point on big integers with guard bits past the requested
//! epsilon, then rounded to the nearest multiple of epsilon.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod approx;
mod bernoulli;
pub mod config;
mod fixed;
pub mod format;
mod parse;
pub mod rational;
mod theory;
mod trans;

#[cfg(test)]
mod proptests;

pub use bernoulli::{free_bernoulli, free_euler};
pub use calq_integers::{CalcError, ErrorKind, Integer, Result, Rounding};
pub use config::{Config, ConfigValue};
pub use format::DisplayMode;
pub use parse::parse_rational;
pub use rational::Rational;
