//! Public key (pk): an RLWE sample `(b, a)` with `b = -a·s + e (mod Q)`.
use crate::keys::SecretKey;
use crate::math::{SamplingError, dg, random_pol};
use crate::rings::{Coefficient, Poly, RingError};
use num_bigint::BigInt;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublicKeyError {
    #[error("Public key parameter error: {0}")]
    InvalidParams(String),
    #[error("Secret key validation failed: {0}")]
    InvalidSecretKey(String),
    #[error("Public key sampling failed: {0}")]
    Sampling(#[from] SamplingError),
    #[error("Public key arithmetic failed: {0}")]
    Ring(#[from] RingError),
}

pub struct PublicKeyParams<C: Coefficient = BigInt> {
    pub ring_degree: usize,
    /// Top-level ciphertext modulus Q.
    pub modulus: C,
    pub error_variance: f64,
}

impl<C: Coefficient> PublicKeyParams<C> {
    pub fn validate(&self) -> Result<(), PublicKeyError> {
        if !(self.error_variance.is_finite() && self.error_variance > 0.0) {
            return Err(PublicKeyError::InvalidParams(format!(
                "error variance must be finite and positive, got {}",
                self.error_variance
            )));
        }
        if !self.modulus.is_positive() {
            return Err(PublicKeyError::InvalidParams(format!(
                "modulus must be positive, got {}",
                self.modulus
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PublicKey<C: Coefficient = BigInt> {
    /// "b" component: b = -(a * s) + e
    pub b: Poly<C>,
    /// "a" component: uniformly random
    pub a: Poly<C>,
}

impl<C: Coefficient> PublicKey<C> {
    pub fn generate<R: Rng + ?Sized>(
        secret_key: &SecretKey<C>,
        params: &PublicKeyParams<C>,
        rng: &mut R,
    ) -> Result<Self, PublicKeyError> {
        params.validate()?;
        let n = params.ring_degree;
        if secret_key.s.degree() >= n {
            return Err(PublicKeyError::InvalidSecretKey(format!(
                "secret of degree {} does not fit ring degree {n}",
                secret_key.s.degree()
            )));
        }
        let cyclotomic = Poly::cyclotomic(n);

        let mut a = random_pol(n, &params.modulus, rng)?;
        let e = Poly::from_i64(&dg(n, params.error_variance, &params.modulus, rng)?);

        let mut b = -a.mult_mod(&secret_key.s, &cyclotomic)?;
        b += &e;
        b.take_coef_mod(&params.modulus)?;
        a.take_coef_mod(&params.modulus)?;

        Ok(PublicKey { b, a })
    }
}
