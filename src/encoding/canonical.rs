//! Canonical-embedding encoder.
//!
//! A polynomial m(X) in Z[X]/(X^N + 1) is identified with its evaluations at
//! the primitive 2N-th roots of unity ζ^(2i+1), ζ = e^(iπ/N). Because the
//! coefficients are real, the second half of those evaluations are the
//! conjugates of the first half, leaving N/2 usable complex slots.
//!
//! Encoding extends the slot vector with its conjugates, multiplies by the
//! scale, rounds it onto the lattice σ(Z[X]) spanned by the columns of the
//! embedding matrix and maps the result back to integer coefficients.
use crate::crypto::types::Plaintext;
use crate::encoding::{EncodingError, EncodingResult};
use crate::rings::{Coefficient, Poly};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use std::f64::consts::PI;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct Encoder {
    ring_degree: usize,
    base_scale: f64,
    /// V with `V[i][j] = ζ^((2i+1)j)`; maps coefficients to slots.
    embedding: DMatrix<Complex64>,
    /// V⁻¹; maps slots back to coefficients.
    inverse_embedding: DMatrix<Complex64>,
    /// Squared norms of the columns σ(X^k) of V.
    basis_norms: Vec<f64>,
}

impl Encoder {
    /// Builds the embedding matrices for ring degree `ring_degree`.
    ///
    /// The ring degree must be even and nonzero; the scale must be finite
    /// and positive.
    #[instrument(level = "debug")]
    pub fn new(ring_degree: usize, base_scale: f64) -> EncodingResult<Self> {
        if ring_degree == 0 || ring_degree % 2 != 0 {
            return Err(EncodingError::InvalidRingDegree {
                degree: ring_degree,
            });
        }
        check_scale(base_scale)?;

        let two_n = 2 * ring_degree;
        let embedding = DMatrix::from_fn(ring_degree, ring_degree, |i, j| {
            let exponent = ((2 * i + 1) * j) % two_n;
            Complex64::from_polar(1.0, PI * exponent as f64 / ring_degree as f64)
        });
        let inverse_embedding = embedding
            .clone()
            .try_inverse()
            .ok_or(EncodingError::SingularEmbedding {
                degree: ring_degree,
            })?;
        let basis_norms = embedding
            .column_iter()
            .map(|column| column.iter().map(|z| z.norm_sqr()).sum::<f64>())
            .collect();

        debug!(ring_degree, base_scale, "built canonical embedding");
        Ok(Self {
            ring_degree,
            base_scale,
            embedding,
            inverse_embedding,
            basis_norms,
        })
    }

    pub fn ring_degree(&self) -> usize {
        self.ring_degree
    }

    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    /// Number of complex slots, N/2.
    pub fn max_slots(&self) -> usize {
        self.ring_degree / 2
    }

    /// Encodes exactly N/2 slots at the base scale.
    pub fn encode<C: Coefficient>(&self, values: &[Complex64]) -> EncodingResult<Plaintext<C>> {
        self.encode_with_scale(values, self.base_scale)
    }

    #[instrument(skip(self, values), fields(slots = values.len(), degree = self.ring_degree))]
    pub fn encode_with_scale<C: Coefficient>(
        &self,
        values: &[Complex64],
        scale: f64,
    ) -> EncodingResult<Plaintext<C>> {
        let slots = self.max_slots();
        if values.len() != slots {
            return Err(EncodingError::InvalidInput {
                message: format!("expected {slots} slots, got {}", values.len()),
            });
        }
        check_scale(scale)?;

        let mut extended = Vec::with_capacity(self.ring_degree);
        extended.extend(values.iter().map(|&v| v * scale));
        extended.extend(values.iter().rev().map(|v| v.conj() * scale));

        let mut projected = DVector::<Complex64>::zeros(self.ring_degree);
        for (column, norm) in self.embedding.column_iter().zip(&self.basis_norms) {
            let dot: Complex64 = extended
                .iter()
                .zip(column.iter())
                .map(|(&x, b)| x * b.conj())
                .sum();
            let coordinate = (dot.re / norm).round();
            if coordinate != 0.0 {
                projected += column * Complex64::new(coordinate, 0.0);
            }
        }

        let coefficients = &self.inverse_embedding * projected;
        let coeffs = coefficients
            .iter()
            .map(|c| {
                C::from_f64_rounded(c.re)
                    .ok_or(EncodingError::CoefficientOutOfRange { value: c.re })
            })
            .collect::<EncodingResult<Vec<C>>>()?;

        debug!(scale, "encoded plaintext");
        Ok(Plaintext::new(Poly::new(coeffs), scale))
    }

    /// Decodes the first N/2 slots, dividing by the plaintext's scale.
    pub fn decode<C: Coefficient>(&self, plaintext: &Plaintext<C>) -> EncodingResult<Vec<Complex64>> {
        let n = self.ring_degree;
        let degree = plaintext.poly.degree();
        if degree >= n {
            return Err(EncodingError::InvalidInput {
                message: format!("polynomial degree {degree} does not fit ring degree {n}"),
            });
        }
        check_scale(plaintext.scale)?;

        let real = plaintext.poly.to_f64_vec(n);
        if let Some(&value) = real.iter().find(|c| !c.is_finite()) {
            return Err(EncodingError::CoefficientOutOfRange { value });
        }
        let coeffs = DVector::from_iterator(n, real.into_iter().map(|c| Complex64::new(c, 0.0)));
        let slots = &self.embedding * coeffs;
        Ok(slots
            .iter()
            .take(n / 2)
            .map(|&s| s / plaintext.scale)
            .collect())
    }

    /// Real parts of [`Encoder::decode`].
    pub fn decode_real<C: Coefficient>(&self, plaintext: &Plaintext<C>) -> EncodingResult<Vec<f64>> {
        Ok(self.decode(plaintext)?.into_iter().map(|z| z.re).collect())
    }

    /// Encodes `(k, k, ..., k)` at the base scale.
    pub fn const_to_plaintext<C: Coefficient>(&self, k: Complex64) -> EncodingResult<Plaintext<C>> {
        self.const_to_plaintext_with_scale(k, self.base_scale)
    }

    pub fn const_to_plaintext_with_scale<C: Coefficient>(
        &self,
        k: Complex64,
        scale: f64,
    ) -> EncodingResult<Plaintext<C>> {
        self.encode_with_scale(&vec![k; self.max_slots()], scale)
    }
}

fn check_scale(scale: f64) -> EncodingResult<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(EncodingError::InvalidScale { scale })
    }
}
