//! Evaluation key (evk) used to relinearize products.
//!
//! Generated at the raised modulus `Q·P`: `b = -a·s + e + P·s²`. During
//! multiplication the `s²` term of a product is replaced by
//! `round(d2·(b, a) / P)`, which decrypts to `d2·s²` plus a small error.
use crate::keys::SecretKey;
use crate::math::{SamplingError, dg, random_pol};
use crate::rings::{Coefficient, Poly, RingError};
use num_bigint::BigInt;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluationKeyError {
    #[error("Evaluation key parameter error: {0}")]
    InvalidParams(String),
    #[error("Secret key validation failed: {0}")]
    InvalidSecretKey(String),
    #[error("Evaluation key sampling failed: {0}")]
    Sampling(#[from] SamplingError),
    #[error("Evaluation key arithmetic failed: {0}")]
    Ring(#[from] RingError),
}

pub struct EvaluationKeyParams<C: Coefficient = BigInt> {
    pub ring_degree: usize,
    /// Top-level ciphertext modulus Q.
    pub modulus: C,
    /// Auxiliary modulus P.
    pub aux_modulus: C,
    pub error_variance: f64,
}

impl<C: Coefficient> EvaluationKeyParams<C> {
    pub fn validate(&self) -> Result<(), EvaluationKeyError> {
        if !(self.error_variance.is_finite() && self.error_variance > 0.0) {
            return Err(EvaluationKeyError::InvalidParams(format!(
                "error variance must be finite and positive, got {}",
                self.error_variance
            )));
        }
        if !self.modulus.is_positive() || !self.aux_modulus.is_positive() {
            return Err(EvaluationKeyError::InvalidParams(format!(
                "moduli must be positive, got Q = {} and P = {}",
                self.modulus, self.aux_modulus
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct EvaluationKey<C: Coefficient = BigInt> {
    /// "b" component: b = -(a * s) + e + P * s^2
    pub b: Poly<C>,
    /// "a" component: uniformly random modulo Q·P
    pub a: Poly<C>,
    /// Q·P, the modulus the key lives at.
    pub modulus: C,
}

impl<C: Coefficient> EvaluationKey<C> {
    pub fn generate<R: Rng + ?Sized>(
        secret_key: &SecretKey<C>,
        params: &EvaluationKeyParams<C>,
        rng: &mut R,
    ) -> Result<Self, EvaluationKeyError> {
        params.validate()?;
        let n = params.ring_degree;
        if secret_key.s.degree() >= n {
            return Err(EvaluationKeyError::InvalidSecretKey(format!(
                "secret of degree {} does not fit ring degree {n}",
                secret_key.s.degree()
            )));
        }
        let cyclotomic = Poly::cyclotomic(n);
        let raised = params.modulus.clone() * &params.aux_modulus;

        let mut a = random_pol(n, &raised, rng)?;
        let e = Poly::from_i64(&dg(n, params.error_variance, &params.modulus, rng)?);
        let s_squared = secret_key.s.mult_mod(&secret_key.s, &cyclotomic)?;

        let mut b = -a.mult_mod(&secret_key.s, &cyclotomic)?;
        b += &e;
        b += &s_squared.scale(&params.aux_modulus);
        b.take_coef_mod(&raised)?;
        a.take_coef_mod(&raised)?;

        Ok(EvaluationKey {
            b,
            a,
            modulus: raised,
        })
    }
}
