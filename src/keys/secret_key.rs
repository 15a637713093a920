//! Secret key (sk): the pair (1, s) where s is a sparse ternary polynomial
//! with exactly `hamming_weight` nonzero coefficients.
use crate::math::{SamplingError, hwt};
use crate::rings::{Coefficient, Poly};
use num_bigint::BigInt;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretKeyError {
    #[error("Hamming weight {0} exceeds ring dimension {1}")]
    InvalidHammingWeight(usize, usize),
    #[error("Secret sampling failed: {0}")]
    Sampling(#[from] SamplingError),
}

pub struct SecretKeyParams {
    pub ring_degree: usize,
    pub hamming_weight: usize,
}

impl SecretKeyParams {
    pub fn new(ring_degree: usize, hamming_weight: usize) -> Result<Self, SecretKeyError> {
        let params = Self {
            ring_degree,
            hamming_weight,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), SecretKeyError> {
        if self.hamming_weight > self.ring_degree {
            Err(SecretKeyError::InvalidHammingWeight(
                self.hamming_weight,
                self.ring_degree,
            ))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone)]
pub struct SecretKey<C: Coefficient = BigInt> {
    /// Constant polynomial 1, pairing with the `b` component of a ciphertext.
    pub one: Poly<C>,
    pub s: Poly<C>,
}

impl<C: Coefficient> SecretKey<C> {
    pub fn generate<R: Rng + ?Sized>(
        params: &SecretKeyParams,
        rng: &mut R,
    ) -> Result<Self, SecretKeyError> {
        params.validate()?;
        let coeffs = hwt(params.ring_degree, params.hamming_weight, rng)?;
        Ok(SecretKey {
            one: Poly::from_i64(&[1]),
            s: Poly::from_i64(&coeffs),
        })
    }
}
