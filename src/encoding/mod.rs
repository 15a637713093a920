//! Mapping between vectors of complex slots and integer polynomials.

pub mod canonical;

pub use canonical::Encoder;
use thiserror::Error;

pub type EncodingResult<T> = Result<T, EncodingError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Ring degree {degree} not supported")]
    InvalidRingDegree { degree: usize },

    #[error("Scale {scale} must be finite and positive")]
    InvalidScale { scale: f64 },

    #[error("Embedding matrix for ring degree {degree} is not invertible")]
    SingularEmbedding { degree: usize },

    #[error("Coefficient {value} out of range")]
    CoefficientOutOfRange { value: f64 },
}
