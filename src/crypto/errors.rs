use thiserror::Error;

#[derive(Error, Debug)]
pub enum CkksError {
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Ciphertext at level 0 cannot be rescaled")]
    LevelExhausted,

    #[error("Scale mismatch: expected {expected:.2}, got {actual:.2}")]
    ScaleMismatch { expected: f64, actual: f64 },

    #[error("Modulus mismatch: expected {expected}, got {actual}")]
    ModulusMismatch { expected: String, actual: String },

    #[error("Level mismatch: expected {expected}, got {actual}")]
    LevelMismatch { expected: usize, actual: usize },

    #[error("Scale {scale:.2} is smaller than the rescaling factor {delta:.2}")]
    ScaleUnderflow { scale: f64, delta: f64 },

    #[error("Ring arithmetic failed: {source}")]
    RingError {
        #[from]
        source: crate::rings::RingError,
    },

    #[error("Sampling failed: {source}")]
    SamplingError {
        #[from]
        source: crate::math::SamplingError,
    },

    #[error("Encoding failed: {source}")]
    EncodingError {
        #[from]
        source: crate::encoding::EncodingError,
    },

    #[error("Secret key generation failed: {source}")]
    SecretKeyError {
        #[from]
        source: crate::keys::SecretKeyError,
    },

    #[error("Public key generation failed: {source}")]
    PublicKeyError {
        #[from]
        source: crate::keys::PublicKeyError,
    },

    #[error("Evaluation key generation failed: {source}")]
    EvaluationKeyError {
        #[from]
        source: crate::keys::EvaluationKeyError,
    },
}

pub type CkksResult<T> = Result<T, CkksError>;
