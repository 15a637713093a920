use super::builder::CkksParams;
use super::types::{Ciphertext, Plaintext};
use super::{CkksError, CkksResult};
use crate::encoding::Encoder;
use crate::keys::{
    EvaluationKey, EvaluationKeyParams, PublicKey, PublicKeyParams, SecretKey, SecretKeyParams,
};
use crate::math::{dg, zo};
use crate::rings::{Coefficient, Poly};
use num_bigint::BigInt;
use num_complex::Complex64;
use rand::Rng;
use tracing::{debug, info, instrument};

/// Probability of a nonzero entry in the ephemeral encryption polynomial.
const EPHEMERAL_DENSITY: f64 = 0.5;

/// Leveled CKKS engine over coefficients of type `C`.
///
/// Holds the validated parameters, the modulus chain `Q_0 < ... < Q_L`, the
/// auxiliary modulus `P`, the cyclotomic polynomial `X^N + 1` and an encoder
/// at base scale `Δ`.
#[derive(Debug, Clone)]
pub struct CkksEngine<C: Coefficient = BigInt> {
    pub(crate) params: CkksParams,
    moduli: Vec<C>,
    delta: C,
    aux_modulus: C,
    cyclotomic: Poly<C>,
    encoder: Encoder,
}

impl<C: Coefficient> CkksEngine<C> {
    #[instrument(skip_all, fields(ring_degree = params.ring_degree, levels = params.levels))]
    pub fn new(params: CkksParams) -> CkksResult<Self> {
        params.validate()?;
        params.check_backend::<C>()?;

        let moduli = (0..=params.levels)
            .map(|level| C::pow2(params.modulus_bits(level)))
            .collect();
        let delta = C::pow2(params.scale_bits);
        let aux_modulus = C::pow2(params.aux_bits);
        let cyclotomic = Poly::cyclotomic(params.ring_degree);
        let encoder = Encoder::new(params.ring_degree, params.delta())?;

        info!(
            top_modulus_bits = params.modulus_bits(params.levels),
            aux_bits = params.aux_bits,
            "CKKS engine ready"
        );
        Ok(Self {
            params,
            moduli,
            delta,
            aux_modulus,
            cyclotomic,
            encoder,
        })
    }

    pub fn params(&self) -> &CkksParams {
        &self.params
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn ring_degree(&self) -> usize {
        self.params.ring_degree
    }

    /// Highest level, the level of fresh ciphertexts.
    pub fn max_level(&self) -> usize {
        self.params.levels
    }

    /// `Q_level`.
    pub fn modulus_at(&self, level: usize) -> CkksResult<&C> {
        self.moduli.get(level).ok_or_else(|| CkksError::InvalidParameter {
            message: format!("level {level} is above the top level {}", self.params.levels),
        })
    }

    /// `Q_L`.
    pub fn top_modulus(&self) -> &C {
        &self.moduli[self.moduli.len() - 1]
    }

    /// Rescaling factor `Δ`.
    pub fn delta(&self) -> &C {
        &self.delta
    }

    pub fn aux_modulus(&self) -> &C {
        &self.aux_modulus
    }

    pub(crate) fn cyclotomic(&self) -> &Poly<C> {
        &self.cyclotomic
    }

    pub fn generate_secret_key<R: Rng + ?Sized>(&self, rng: &mut R) -> CkksResult<SecretKey<C>> {
        let sk_params = SecretKeyParams::new(self.params.ring_degree, self.params.hamming_weight)?;
        Ok(SecretKey::generate(&sk_params, rng)?)
    }

    pub fn generate_public_key<R: Rng + ?Sized>(
        &self,
        secret_key: &SecretKey<C>,
        rng: &mut R,
    ) -> CkksResult<PublicKey<C>> {
        let pk_params = PublicKeyParams {
            ring_degree: self.params.ring_degree,
            modulus: self.top_modulus().clone(),
            error_variance: self.params.error_variance,
        };
        Ok(PublicKey::generate(secret_key, &pk_params, rng)?)
    }

    /// Generates the relinearization key at modulus `Q_L·P`.
    pub fn generate_evaluation_key<R: Rng + ?Sized>(
        &self,
        secret_key: &SecretKey<C>,
        rng: &mut R,
    ) -> CkksResult<EvaluationKey<C>> {
        let evk_params = EvaluationKeyParams {
            ring_degree: self.params.ring_degree,
            modulus: self.top_modulus().clone(),
            aux_modulus: self.aux_modulus.clone(),
            error_variance: self.params.error_variance,
        };
        Ok(EvaluationKey::generate(secret_key, &evk_params, rng)?)
    }

    /// Encrypts at the top level.
    ///
    /// With `v ← ZO(0.5)` and `e0, e1 ← DG(σ²)`:
    /// `B = pk_b·v + m + e0`, `A = pk_a·v + e1`, both reduced mod `Q_L`.
    #[instrument(skip_all, fields(scale = plaintext.scale))]
    pub fn encrypt<R: Rng + ?Sized>(
        &self,
        plaintext: &Plaintext<C>,
        public_key: &PublicKey<C>,
        rng: &mut R,
    ) -> CkksResult<Ciphertext<C>> {
        let n = self.params.ring_degree;
        if plaintext.poly.degree() >= n {
            return Err(CkksError::InvalidParameter {
                message: format!(
                    "plaintext degree {} does not fit ring degree {n}",
                    plaintext.poly.degree()
                ),
            });
        }
        let q = self.top_modulus();
        let variance = self.params.error_variance;

        let v = Poly::from_i64(&zo(n, EPHEMERAL_DENSITY, rng)?);
        let e0 = Poly::from_i64(&dg(n, variance, q, rng)?);
        let e1 = Poly::from_i64(&dg(n, variance, q, rng)?);

        let mut b = public_key.b.mult_mod(&v, &self.cyclotomic)?;
        b += &plaintext.poly;
        b += &e0;
        b.take_coef_mod(q)?;

        let mut a = public_key.a.mult_mod(&v, &self.cyclotomic)?;
        a += &e1;
        a.take_coef_mod(q)?;

        debug!("encrypted plaintext");
        Ok(Ciphertext::new(a, b, q, plaintext.scale, self.params.levels))
    }

    /// `B + A·s (mod modulus)`, carrying the ciphertext's scale.
    pub fn decrypt(
        &self,
        ciphertext: &Ciphertext<C>,
        secret_key: &SecretKey<C>,
    ) -> CkksResult<Plaintext<C>> {
        let mut poly = ciphertext.a().mult_mod(&secret_key.s, &self.cyclotomic)?;
        poly += ciphertext.b();
        poly.take_coef_mod(ciphertext.modulus())?;
        Ok(Plaintext::new(poly, ciphertext.scale()))
    }

    pub fn encode(&self, values: &[Complex64]) -> CkksResult<Plaintext<C>> {
        Ok(self.encoder.encode(values)?)
    }

    pub fn decode(&self, plaintext: &Plaintext<C>) -> CkksResult<Vec<Complex64>> {
        Ok(self.encoder.decode(plaintext)?)
    }
}
