//! The CKKS scheme: parameters, key generation, encryption and
//! homomorphic evaluation.

pub mod builder;
pub mod engine;
pub mod errors;
pub mod operations;
pub mod statistics;
pub mod types;

pub use builder::{CkksParams, CkksParamsBuilder};
pub use engine::CkksEngine;
pub use errors::{CkksError, CkksResult};
pub use operations::SCALE_TOLERANCE;
pub use types::{Ciphertext, Plaintext};
