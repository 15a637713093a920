use super::{CkksError, CkksResult};
use crate::rings::Coefficient;
use tracing::debug;

pub const DEFAULT_ERROR_VARIANCE: f64 = 3.2;
pub const DEFAULT_MEAN_SCALE_FACTOR: f64 = 1e8;

/// Validated scheme parameters.
///
/// The modulus chain is `Q_l = 2^(q0_bits + l * scale_bits)` for
/// `l = 0..=levels`, so rescaling by `Δ = 2^scale_bits` moves a ciphertext
/// exactly one step down the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct CkksParams {
    pub ring_degree: usize,
    pub q0_bits: u64,
    pub scale_bits: u64,
    pub levels: usize,
    pub hamming_weight: usize,
    pub error_variance: f64,
    pub aux_bits: u64,
    pub mean_scale_factor: f64,
}

impl CkksParams {
    pub fn builder() -> CkksParamsBuilder {
        CkksParamsBuilder::new()
    }

    /// Bit length of `Q_l`.
    pub fn modulus_bits(&self, level: usize) -> u64 {
        self.q0_bits + level as u64 * self.scale_bits
    }

    /// `Δ` as a float.
    pub fn delta(&self) -> f64 {
        2f64.powi(self.scale_bits as i32)
    }

    pub fn validate(&self) -> CkksResult<()> {
        if self.ring_degree < 2 || self.ring_degree % 2 != 0 {
            return Err(invalid(format!(
                "ring degree must be even and at least 2, got {}",
                self.ring_degree
            )));
        }
        if self.q0_bits == 0 || self.scale_bits == 0 || self.aux_bits == 0 {
            return Err(invalid("modulus and scale bit lengths must be positive"));
        }
        if self.scale_bits >= 1000 {
            return Err(invalid(format!(
                "scale of 2^{} is not representable as a float",
                self.scale_bits
            )));
        }
        if self.hamming_weight > self.ring_degree {
            return Err(invalid(format!(
                "hamming weight {} exceeds ring degree {}",
                self.hamming_weight, self.ring_degree
            )));
        }
        if !(self.error_variance.is_finite() && self.error_variance > 0.0) {
            return Err(invalid(format!(
                "error variance must be finite and positive, got {}",
                self.error_variance
            )));
        }
        if !(self.mean_scale_factor.is_finite() && self.mean_scale_factor >= 1.0) {
            return Err(invalid(format!(
                "mean scale factor must be finite and at least 1, got {}",
                self.mean_scale_factor
            )));
        }
        Ok(())
    }

    /// Checks that a fixed-width coefficient type can hold every
    /// intermediate product of the scheme.
    ///
    /// Relinearization multiplies a value below `Q_L` by an evaluation key
    /// component below `Q_L·P` and sums N such products, so the widest
    /// intermediate needs about `2·log Q_L + log P + log N + 2` bits.
    pub fn check_backend<C: Coefficient>(&self) -> CkksResult<()> {
        let Some(limit) = C::BIT_LIMIT else {
            return Ok(());
        };
        let top = self.modulus_bits(self.levels);
        let log_n = u64::from(self.ring_degree.ilog2()) + 1;
        let needed = 2 * top + self.aux_bits + log_n + 2;
        if needed > limit {
            return Err(invalid(format!(
                "parameters need {needed} bits per coefficient, backend offers {limit}"
            )));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> CkksError {
    CkksError::InvalidParameter {
        message: message.into(),
    }
}

/// Builder for [`CkksParams`].
///
/// Ring degree, initial modulus bits, scale bits and level count are
/// required. The Gaussian variance defaults to 3.2, the Hamming weight to
/// N/2, the auxiliary modulus to the bit length of the top modulus `Q_L`
/// and the mean scale factor to `1e8`.
#[derive(Debug, Clone, Default)]
pub struct CkksParamsBuilder {
    ring_degree: Option<usize>,
    q0_bits: Option<u64>,
    scale_bits: Option<u64>,
    levels: Option<usize>,
    hamming_weight: Option<usize>,
    error_variance: Option<f64>,
    aux_bits: Option<u64>,
    mean_scale_factor: Option<f64>,
}

impl CkksParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ring_degree(mut self, ring_degree: usize) -> Self {
        self.ring_degree = Some(ring_degree);
        self
    }

    pub fn q0_bits(mut self, bits: u64) -> Self {
        self.q0_bits = Some(bits);
        self
    }

    pub fn scale_bits(mut self, bits: u64) -> Self {
        self.scale_bits = Some(bits);
        self
    }

    pub fn levels(mut self, levels: usize) -> Self {
        self.levels = Some(levels);
        self
    }

    pub fn hamming_weight(mut self, weight: usize) -> Self {
        self.hamming_weight = Some(weight);
        self
    }

    pub fn error_variance(mut self, variance: f64) -> Self {
        self.error_variance = Some(variance);
        self
    }

    pub fn aux_bits(mut self, bits: u64) -> Self {
        self.aux_bits = Some(bits);
        self
    }

    pub fn mean_scale_factor(mut self, factor: f64) -> Self {
        self.mean_scale_factor = Some(factor);
        self
    }

    pub fn build(self) -> CkksResult<CkksParams> {
        let ring_degree = self.ring_degree.ok_or_else(|| invalid("ring degree is required"))?;
        let q0_bits = self.q0_bits.ok_or_else(|| invalid("initial modulus bits are required"))?;
        let scale_bits = self.scale_bits.ok_or_else(|| invalid("scale bits are required"))?;
        let levels = self.levels.ok_or_else(|| invalid("level count is required"))?;

        let params = CkksParams {
            ring_degree,
            q0_bits,
            scale_bits,
            levels,
            hamming_weight: self.hamming_weight.unwrap_or(ring_degree / 2),
            error_variance: self.error_variance.unwrap_or(DEFAULT_ERROR_VARIANCE),
            aux_bits: self
                .aux_bits
                .unwrap_or(q0_bits + levels as u64 * scale_bits),
            mean_scale_factor: self.mean_scale_factor.unwrap_or(DEFAULT_MEAN_SCALE_FACTOR),
        };
        params.validate()?;
        debug!(?params, "built CKKS parameters");
        Ok(params)
    }
}
