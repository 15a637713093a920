pub mod evaluation_key;
pub mod public_key;
pub mod secret_key;

pub use evaluation_key::{EvaluationKey, EvaluationKeyError, EvaluationKeyParams};
pub use public_key::{PublicKey, PublicKeyError, PublicKeyParams};
pub use secret_key::{SecretKey, SecretKeyError, SecretKeyParams};
