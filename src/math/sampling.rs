use crate::rings::{Coefficient, Poly};
use rand::{Rng, seq::SliceRandom};
use rand_distr::{Distribution, Normal};
use thiserror::Error;

/// Upper bound on draws spent on a single value by the rejection samplers.
pub const MAX_REJECTION_ATTEMPTS: usize = 1 << 16;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplingError {
    #[error("Invalid sampling parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Rejection sampling gave up after {attempts} attempts")]
    SamplingExhausted { attempts: usize },
}

pub type SamplingResult<T> = Result<T, SamplingError>;

/// Samples one integer uniformly from `[0, bound)`.
///
/// Draws `bit_length(bound)` random bits from 64-bit words and rejects
/// values at or above `bound`, so each attempt succeeds with probability
/// above one half.
pub fn uniform_below<C: Coefficient, R: Rng + ?Sized>(
    bound: &C,
    rng: &mut R,
) -> SamplingResult<C> {
    if !bound.is_positive() {
        return Err(SamplingError::InvalidParameter {
            message: format!("uniform bound must be positive, got {bound}"),
        });
    }
    let bits = bound.bit_length();
    let words = bits.div_ceil(64);
    let top_bits = bits - (words - 1) * 64;
    let radix = C::pow2(64u64.min(bits));

    for _ in 0..MAX_REJECTION_ATTEMPTS {
        let mut value = C::zero();
        for word_index in 0..words {
            let mut word = rng.random::<u64>();
            if word_index == 0 && top_bits < 64 {
                word &= (1u64 << top_bits) - 1;
            }
            if word_index > 0 {
                value *= &radix;
            }
            value += C::from(word);
        }
        if value < *bound {
            return Ok(value);
        }
    }
    Err(SamplingError::SamplingExhausted {
        attempts: MAX_REJECTION_ATTEMPTS,
    })
}

/// Polynomial of `n` coefficients drawn uniformly from `[0, q)`.
pub fn random_pol<C: Coefficient, R: Rng + ?Sized>(
    n: usize,
    q: &C,
    rng: &mut R,
) -> SamplingResult<Poly<C>> {
    let coeffs = (0..n)
        .map(|_| uniform_below(q, rng))
        .collect::<SamplingResult<Vec<C>>>()?;
    Ok(Poly::new(coeffs))
}

/// Ternary vector of length `n` with exactly `h` entries in `{-1, 1}`.
///
/// The `n - h` zeros and `h` random signs are laid out in order and then
/// shuffled, so every support of size `h` is equally likely.
pub fn hwt<R: Rng + ?Sized>(n: usize, h: usize, rng: &mut R) -> SamplingResult<Vec<i64>> {
    if h > n {
        return Err(SamplingError::InvalidParameter {
            message: format!("hamming weight {h} exceeds length {n}"),
        });
    }
    let mut out = vec![0i64; n];
    for slot in &mut out[n - h..] {
        *slot = if rng.random_bool(0.5) { 1 } else { -1 };
    }
    out.shuffle(rng);
    Ok(out)
}

/// Ternary vector with `P(-1) = P(1) = r / 2` and `P(0) = 1 - r`.
pub fn zo<R: Rng + ?Sized>(n: usize, r: f64, rng: &mut R) -> SamplingResult<Vec<i64>> {
    if !(0.0..=1.0).contains(&r) {
        return Err(SamplingError::InvalidParameter {
            message: format!("zero-one density must lie in [0, 1], got {r}"),
        });
    }
    let half = r / 2.0;
    Ok((0..n)
        .map(|_| {
            let u: f64 = rng.random();
            if u < half {
                -1
            } else if u < r {
                1
            } else {
                0
            }
        })
        .collect())
}

/// Rounded Gaussian samples of variance `variance`, each strictly inside
/// `(-bound, bound)`.
///
/// Out-of-range draws are retried for the same slot; a slot that keeps
/// failing for [`MAX_REJECTION_ATTEMPTS`] draws ends sampling with
/// [`SamplingError::SamplingExhausted`].
pub fn dg<C: Coefficient, R: Rng + ?Sized>(
    n: usize,
    variance: f64,
    bound: &C,
    rng: &mut R,
) -> SamplingResult<Vec<i64>> {
    if !(variance.is_finite() && variance > 0.0) {
        return Err(SamplingError::InvalidParameter {
            message: format!("variance must be finite and positive, got {variance}"),
        });
    }
    if !bound.is_positive() {
        return Err(SamplingError::InvalidParameter {
            message: format!("gaussian bound must be positive, got {bound}"),
        });
    }
    let normal = Normal::new(0.0, variance.sqrt()).map_err(|e| {
        SamplingError::InvalidParameter {
            message: e.to_string(),
        }
    })?;
    let lower = -bound.clone();

    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let mut accepted = None;
        for _ in 0..MAX_REJECTION_ATTEMPTS {
            let sample = normal.sample(rng).round();
            if !sample.is_finite() || sample.abs() >= i64::MAX as f64 {
                continue;
            }
            let value = sample as i64;
            let as_coeff = C::from(value);
            if as_coeff > lower && as_coeff < *bound {
                accepted = Some(value);
                break;
            }
        }
        match accepted {
            Some(value) => out.push(value),
            None => {
                return Err(SamplingError::SamplingExhausted {
                    attempts: MAX_REJECTION_ATTEMPTS,
                });
            }
        }
    }
    Ok(out)
}
