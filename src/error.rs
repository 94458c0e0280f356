//! The crate's single error enum, covering every recoverable failure kind
//! raised at a public boundary in `BigNumber`, `Rational` or `BitView`.

use thiserror::Error as ThisError;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("division by zero")]
    DivideByZero,

    #[error("invalid digit '{0}' in numeric literal")]
    InvalidDigit(char),

    #[error("unsupported mode: {0}")]
    UnsupportedMode(&'static str),

    #[error("negative exponent is not supported")]
    NegativeExponent,

    #[error("invalid operand: {0}")]
    InvalidOperand(&'static str),

    #[error("result would exceed the configured precision limit of {limit} bits")]
    PrecisionExceeded { limit: u64 },
}
