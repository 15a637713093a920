use crate::rings::{Coefficient, Poly};
use num_bigint::BigInt;

/// Encoded message together with the scale it was encoded at.
#[derive(Debug, Clone, PartialEq)]
pub struct Plaintext<C: Coefficient = BigInt> {
    pub poly: Poly<C>,
    pub scale: f64,
}

impl<C: Coefficient> Plaintext<C> {
    pub fn new(poly: Poly<C>, scale: f64) -> Self {
        Self { poly, scale }
    }
}

/// CKKS ciphertext `(a, b)` with `b + a·s ≈ message · scale (mod modulus)`.
///
/// Every ciphertext owns its modulus. Cloning deep-copies it, so rescaling
/// one ciphertext never changes the modulus seen by another.
#[derive(Debug, Clone)]
pub struct Ciphertext<C: Coefficient = BigInt> {
    a: Poly<C>,
    b: Poly<C>,
    modulus: C,
    scale: f64,
    level: usize,
}

impl<C: Coefficient> Ciphertext<C> {
    pub fn new(a: Poly<C>, b: Poly<C>, modulus: &C, scale: f64, level: usize) -> Self {
        Self {
            a,
            b,
            modulus: modulus.clone(),
            scale,
            level,
        }
    }

    pub fn a(&self) -> &Poly<C> {
        &self.a
    }

    pub fn b(&self) -> &Poly<C> {
        &self.b
    }

    pub fn modulus(&self) -> &C {
        &self.modulus
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub(crate) fn into_parts(self) -> (Poly<C>, Poly<C>) {
        (self.a, self.b)
    }
}
