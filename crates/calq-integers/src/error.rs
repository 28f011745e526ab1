//! Error taxonomy shared by every calq crate.
//!
//! Each fallible operation fails with exactly one [`CalcError`]; the coarse
//! classification a caller maps onto its own error idiom is [`ErrorKind`].

use thiserror::Error;

/// Result alias used throughout calq.
pub type Result<T> = std::result::Result<T, CalcError>;

/// Coarse error classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed numeric string.
    ParseError,
    /// Zero denominator or divisor.
    DivideByZero,
    /// Operand outside the valid domain of the operation.
    DomainError,
    /// Value does not fit the requested conversion target.
    RangeError,
    /// Mathematically undefined, or only defined in the complex plane.
    UndefinedResult,
    /// Unknown name or unsupported argument for an operation.
    ArgumentError,
    /// Operand of the wrong numeric shape (fraction where an integer is needed).
    TypeError,
}

/// Errors raised by numeric operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Malformed numeric string.
    #[error("invalid number: {0:?}")]
    Parse(String),

    /// Zero denominator or divisor.
    #[error("division by zero")]
    DivideByZero,

    /// Operand outside the valid domain of the operation.
    #[error("{0}")]
    Domain(String),

    /// Value does not fit the requested conversion target.
    #[error("{0}")]
    Range(String),

    /// The real-valued function has no real result; the complex continuation
    /// of the same function is defined.
    #[error("non-real result for {0}")]
    NonReal(&'static str),

    /// Pole or other mathematically undefined result.
    #[error("{0}")]
    Undefined(String),

    /// Unknown name or unsupported argument.
    #[error("{0}")]
    Argument(String),

    /// Operand of the wrong numeric shape.
    #[error("{0}")]
    Type(String),
}

impl CalcError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::ParseError,
            Self::DivideByZero => ErrorKind::DivideByZero,
            Self::Domain(_) => ErrorKind::DomainError,
            Self::Range(_) => ErrorKind::RangeError,
            Self::NonReal(_) | Self::Undefined(_) => ErrorKind::UndefinedResult,
            Self::Argument(_) => ErrorKind::ArgumentError,
            Self::Type(_) => ErrorKind::TypeError,
        }
    }

    /// Shorthand for a [`CalcError::Domain`] error.
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    /// Shorthand for a [`CalcError::Range`] error.
    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    /// Shorthand for a [`CalcError::Undefined`] error.
    pub fn undefined(msg: impl Into<String>) -> Self {
        Self::Undefined(msg.into())
    }

    /// Shorthand for a [`CalcError::Argument`] error.
    pub fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }

    /// Shorthand for a [`CalcError::Type`] error.
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::Type(msg.into())
    }

    /// Shorthand for a [`CalcError::Parse`] error.
    pub fn parse(input: impl Into<String>) -> Self {
        Self::Parse(input.into())
    }

    /// True when the complex continuation should be tried instead.
    #[must_use]
    pub fn is_non_real(&self) -> bool {
        matches!(self, Self::NonReal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(CalcError::DivideByZero.kind(), ErrorKind::DivideByZero);
        assert_eq!(CalcError::NonReal("acos").kind(), ErrorKind::UndefinedResult);
        assert_eq!(CalcError::undefined("cot(0)").kind(), ErrorKind::UndefinedResult);
        assert_eq!(CalcError::type_error("x").kind(), ErrorKind::TypeError);
        assert!(CalcError::NonReal("ln").is_non_real());
        assert!(!CalcError::domain("x").is_non_real());
    }

    #[test]
    fn test_display() {
        assert_eq!(CalcError::DivideByZero.to_string(), "division by zero");
        assert_eq!(CalcError::NonReal("asin").to_string(), "non-real result for asin");
    }
}
