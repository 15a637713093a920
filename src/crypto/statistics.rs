//! Aggregate statistics computed on ciphertexts.
use super::engine::CkksEngine;
use super::types::Ciphertext;
use super::{CkksError, CkksResult};
use crate::keys::{EvaluationKey, PublicKey};
use crate::rings::Coefficient;
use num_complex::Complex64;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, instrument};

impl<C: Coefficient> CkksEngine<C> {
    /// Encrypts `(k, ..., k)` at `scale` and brings it down to `level`.
    pub fn encrypt_constant<R: Rng + ?Sized>(
        &self,
        k: Complex64,
        scale: f64,
        level: usize,
        public_key: &PublicKey<C>,
        rng: &mut R,
    ) -> CkksResult<Ciphertext<C>> {
        let plaintext = self.encoder().const_to_plaintext_with_scale(k, scale)?;
        let ciphertext = self.encrypt(&plaintext, public_key, rng)?;
        self.mod_down_to(&ciphertext, level)
    }

    /// Scale used for the encrypted constant `1/n` in [`CkksEngine::mean`].
    ///
    /// Always a positive integer, so the ratio between the scale of a mean
    /// and the scale of its inputs is an exact integer.
    pub fn mean_constant_scale(&self, n: usize) -> f64 {
        ((n as f64).ln().max(1.0) * self.params.mean_scale_factor).round()
    }

    /// Slot-wise mean of `data`.
    ///
    /// The inputs are summed and multiplied by an encryption of `1/n`. The
    /// result has scale `data_scale * mean_constant_scale(n)` and is not
    /// rescaled; callers rescale when they need the level back.
    #[instrument(skip_all, fields(count = data.len()))]
    pub fn mean<R: Rng + ?Sized>(
        &self,
        data: &[Ciphertext<C>],
        public_key: &PublicKey<C>,
        evaluation_key: &EvaluationKey<C>,
        rng: &mut R,
    ) -> CkksResult<Ciphertext<C>> {
        let (first, rest) = data.split_first().ok_or_else(|| CkksError::InvalidParameter {
            message: "cannot take the mean of no ciphertexts".into(),
        })?;
        let sum = rest
            .iter()
            .try_fold(first.clone(), |acc, ct| self.add(&acc, ct))?;

        let n = data.len();
        let constant = self.encrypt_constant(
            Complex64::new(1.0 / n as f64, 0.0),
            self.mean_constant_scale(n),
            sum.level(),
            public_key,
            rng,
        )?;
        debug!(scale = constant.scale(), "encrypted 1/n");
        self.mult(&constant, &sum, evaluation_key)
    }

    /// Slot-wise population variance of `data`.
    ///
    /// With `m` the mean, each input is lifted to the scale of `m`, turned
    /// into `m - x` and squared, then rescaled by `delta`. The mean of those
    /// squares is rescaled once more, so the result sits two levels below
    /// the inputs.
    #[instrument(skip_all, fields(count = data.len()))]
    pub fn var<R: Rng + ?Sized>(
        &self,
        data: &[Ciphertext<C>],
        public_key: &PublicKey<C>,
        evaluation_key: &EvaluationKey<C>,
        delta: &C,
        rng: &mut R,
    ) -> CkksResult<Ciphertext<C>> {
        let first = data.first().ok_or_else(|| CkksError::InvalidParameter {
            message: "cannot take the variance of no ciphertexts".into(),
        })?;
        if first.level() < 2 {
            return Err(CkksError::LevelExhausted);
        }

        let mean = self.mean(data, public_key, evaluation_key, rng)?;
        let ratio = mean.scale() / first.scale();
        let lift = C::from_f64_rounded(ratio)
            .filter(|r| r.is_positive() && ratio.fract() == 0.0)
            .ok_or(CkksError::ScaleMismatch {
                expected: mean.scale(),
                actual: first.scale(),
            })?;

        let squares = data
            .par_iter()
            .map(|x| {
                let lifted = self.inc_scale(x, &lift)?;
                let deviation = self.add(&mean, &self.negate(&lifted)?)?;
                let square = self.mult(&deviation, &deviation, evaluation_key)?;
                self.rescale_by(&square, delta)
            })
            .collect::<CkksResult<Vec<_>>>()?;
        debug!(count = squares.len(), "squared deviations");

        let mean_square = self.mean(&squares, public_key, evaluation_key, rng)?;
        self.rescale_by(&mean_square, delta)
    }
}
