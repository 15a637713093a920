use thiserror::Error;

pub type RingResult<T> = Result<T, RingError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RingError {
    #[error("Polynomial division by the zero polynomial")]
    DivisionByZeroPolynomial,

    #[error("Coefficient modulus must be positive, got {modulus}")]
    InvalidModulus { modulus: String },

    #[error("Cannot divide coefficients by zero")]
    ZeroDivisor,
}
