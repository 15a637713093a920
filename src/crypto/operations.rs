//! Homomorphic operations on ciphertexts.
//!
//! Every operation validates its operands before touching them and returns a
//! new ciphertext; inputs are never modified.
use super::engine::CkksEngine;
use super::types::Ciphertext;
use super::{CkksError, CkksResult};
use crate::keys::EvaluationKey;
use crate::rings::Coefficient;
use tracing::{debug, instrument};

/// Relative tolerance used when comparing tracked scales.
pub const SCALE_TOLERANCE: f64 = 1e-9;

pub(crate) fn scales_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= SCALE_TOLERANCE * a.abs().max(b.abs())
}

impl<C: Coefficient> CkksEngine<C> {
    fn check_modulus_and_level(&self, ct1: &Ciphertext<C>, ct2: &Ciphertext<C>) -> CkksResult<()> {
        if ct1.modulus() != ct2.modulus() {
            return Err(CkksError::ModulusMismatch {
                expected: ct1.modulus().to_string(),
                actual: ct2.modulus().to_string(),
            });
        }
        if ct1.level() != ct2.level() {
            return Err(CkksError::LevelMismatch {
                expected: ct1.level(),
                actual: ct2.level(),
            });
        }
        Ok(())
    }

    fn check_compatible(&self, ct1: &Ciphertext<C>, ct2: &Ciphertext<C>) -> CkksResult<()> {
        self.check_modulus_and_level(ct1, ct2)?;
        if !scales_match(ct1.scale(), ct2.scale()) {
            return Err(CkksError::ScaleMismatch {
                expected: ct1.scale(),
                actual: ct2.scale(),
            });
        }
        Ok(())
    }

    /// Slot-wise sum. Operands must share modulus, level and scale.
    pub fn add(&self, ct1: &Ciphertext<C>, ct2: &Ciphertext<C>) -> CkksResult<Ciphertext<C>> {
        self.check_compatible(ct1, ct2)?;
        let q = ct1.modulus();
        let mut a = ct1.a() + ct2.a();
        a.take_coef_mod(q)?;
        let mut b = ct1.b() + ct2.b();
        b.take_coef_mod(q)?;
        Ok(Ciphertext::new(a, b, q, ct1.scale(), ct1.level()))
    }

    /// Slot-wise difference `ct1 - ct2`.
    pub fn sub(&self, ct1: &Ciphertext<C>, ct2: &Ciphertext<C>) -> CkksResult<Ciphertext<C>> {
        self.check_compatible(ct1, ct2)?;
        let q = ct1.modulus();
        let mut a = ct1.a() - ct2.a();
        a.take_coef_mod(q)?;
        let mut b = ct1.b() - ct2.b();
        b.take_coef_mod(q)?;
        Ok(Ciphertext::new(a, b, q, ct1.scale(), ct1.level()))
    }

    pub fn negate(&self, ct: &Ciphertext<C>) -> CkksResult<Ciphertext<C>> {
        let q = ct.modulus();
        let mut a = -ct.a();
        a.take_coef_mod(q)?;
        let mut b = -ct.b();
        b.take_coef_mod(q)?;
        Ok(Ciphertext::new(a, b, q, ct.scale(), ct.level()))
    }

    /// Slot-wise product with relinearization.
    ///
    /// The tensor `(d0, d1, d2)` decrypts under `(1, s, s²)`; the `d2` term is
    /// switched to `(1, s)` with the evaluation key and divided by `P`. The
    /// result keeps the level and carries scale `scale1 · scale2`.
    #[instrument(skip_all, fields(level = ct1.level()))]
    pub fn mult(
        &self,
        ct1: &Ciphertext<C>,
        ct2: &Ciphertext<C>,
        evaluation_key: &EvaluationKey<C>,
    ) -> CkksResult<Ciphertext<C>> {
        self.check_modulus_and_level(ct1, ct2)?;
        let raised = self.top_modulus().clone() * self.aux_modulus();
        if evaluation_key.modulus != raised {
            return Err(CkksError::ModulusMismatch {
                expected: raised.to_string(),
                actual: evaluation_key.modulus.to_string(),
            });
        }

        let q = ct1.modulus();
        let cyclotomic = self.cyclotomic();

        let mut d0 = ct1.b().mult_mod(ct2.b(), cyclotomic)?;
        d0.take_coef_mod(q)?;
        let mut d1 = ct1.a().mult_mod(ct2.b(), cyclotomic)?;
        d1 += &ct1.b().mult_mod(ct2.a(), cyclotomic)?;
        d1.take_coef_mod(q)?;
        let mut d2 = ct1.a().mult_mod(ct2.a(), cyclotomic)?;
        d2.take_coef_mod(q)?;

        let p = self.aux_modulus();
        let mut b = d2.mult_mod(&evaluation_key.b, cyclotomic)?.scale_div(p)?;
        b += &d0;
        b.take_coef_mod(q)?;
        let mut a = d2.mult_mod(&evaluation_key.a, cyclotomic)?.scale_div(p)?;
        a += &d1;
        a.take_coef_mod(q)?;

        let scale = ct1.scale() * ct2.scale();
        debug!(scale, "multiplied ciphertexts");
        Ok(Ciphertext::new(a, b, q, scale, ct1.level()))
    }

    /// Multiplies both components by the integer `k`. The tracked scale is
    /// left alone, so the decoded message is multiplied by `k`.
    ///
    /// `k` is first reduced into `(-q/2, q/2]`, which keeps every product
    /// below `q²/4` on fixed-width backends.
    pub fn scale(&self, ct: &Ciphertext<C>, k: &C) -> CkksResult<Ciphertext<C>> {
        let q = ct.modulus();
        let k = k.centered_mod(q);
        let mut a = ct.a().scale(&k);
        a.take_coef_mod(q)?;
        let mut b = ct.b().scale(&k);
        b.take_coef_mod(q)?;
        Ok(Ciphertext::new(a, b, q, ct.scale(), ct.level()))
    }

    /// Multiplies both components and the tracked scale by `k > 0`, leaving
    /// the decoded message unchanged.
    pub fn inc_scale(&self, ct: &Ciphertext<C>, k: &C) -> CkksResult<Ciphertext<C>> {
        if !k.is_positive() {
            return Err(CkksError::InvalidParameter {
                message: format!("scale increment must be positive, got {k}"),
            });
        }
        let factor = k.to_f64_lossy();
        let scaled = self.scale(ct, k)?;
        let (a, b) = scaled.into_parts();
        Ok(Ciphertext::new(a, b, ct.modulus(), ct.scale() * factor, ct.level()))
    }

    /// Rescales by the engine's `Δ`.
    pub fn rescale(&self, ct: &Ciphertext<C>) -> CkksResult<Ciphertext<C>> {
        self.rescale_by(ct, self.delta())
    }

    /// Divides components, modulus and scale by `delta` and drops one level.
    #[instrument(skip_all, fields(level = ct.level(), scale = ct.scale()))]
    pub fn rescale_by(&self, ct: &Ciphertext<C>, delta: &C) -> CkksResult<Ciphertext<C>> {
        if ct.level() == 0 {
            return Err(CkksError::LevelExhausted);
        }
        if !delta.is_positive() {
            return Err(CkksError::InvalidParameter {
                message: format!("rescaling factor must be positive, got {delta}"),
            });
        }
        if !(ct.modulus().clone() % delta).is_zero() {
            return Err(CkksError::InvalidParameter {
                message: format!(
                    "rescaling factor {delta} does not divide modulus {}",
                    ct.modulus()
                ),
            });
        }
        let delta_f = delta.to_f64_lossy();
        if ct.scale() < delta_f && !scales_match(ct.scale(), delta_f) {
            return Err(CkksError::ScaleUnderflow {
                scale: ct.scale(),
                delta: delta_f,
            });
        }

        let modulus = ct.modulus().clone() / delta;
        let mut a = ct.a().scale_div(delta)?;
        a.take_coef_mod(&modulus)?;
        let mut b = ct.b().scale_div(delta)?;
        b.take_coef_mod(&modulus)?;

        debug!(new_level = ct.level() - 1, "rescaled ciphertext");
        Ok(Ciphertext::new(
            a,
            b,
            &modulus,
            ct.scale() / delta_f,
            ct.level() - 1,
        ))
    }

    /// Moves a ciphertext down to `level` without changing its scale.
    pub fn mod_down_to(&self, ct: &Ciphertext<C>, level: usize) -> CkksResult<Ciphertext<C>> {
        if level > ct.level() {
            return Err(CkksError::InvalidParameter {
                message: format!(
                    "cannot raise a ciphertext from level {} to {level}",
                    ct.level()
                ),
            });
        }
        let target = self.modulus_at(level)?;
        if !(ct.modulus().clone() % target).is_zero() {
            return Err(CkksError::ModulusMismatch {
                expected: format!("a multiple of {target}"),
                actual: ct.modulus().to_string(),
            });
        }
        let mut a = ct.a().clone();
        a.take_coef_mod(target)?;
        let mut b = ct.b().clone();
        b.take_coef_mod(target)?;
        Ok(Ciphertext::new(a, b, target, ct.scale(), level))
    }
}
