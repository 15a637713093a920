pub mod crypto;
pub mod encoding;
pub mod keys;
pub mod math;
pub mod rings;

pub use crypto::{
    Ciphertext, CkksEngine, CkksError, CkksParams, CkksParamsBuilder, CkksResult, Plaintext,
};
pub use encoding::{Encoder, EncodingError, EncodingResult};
pub use keys::{
    EvaluationKey, EvaluationKeyError, EvaluationKeyParams, PublicKey, PublicKeyError,
    PublicKeyParams, SecretKey, SecretKeyError, SecretKeyParams,
};
pub use math::{SamplingError, SamplingResult};
pub use rings::{Coefficient, Poly, RingError, RingResult};
