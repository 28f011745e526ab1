//! # calq-integers
//!
//! Arbitrary precision integers for the calq numeric engine: the bignum
//! type, the rounding flag word used by every inexact quotient, integer
//! number theory, and the shared error taxonomy.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod combinatorics;
pub mod error;
pub mod integer;
pub mod modular;
pub mod primes;
pub mod rounding;

#[cfg(test)]
mod proptests;

pub use error::{CalcError, ErrorKind, Result};
pub use integer::Integer;
pub use rounding::Rounding;
