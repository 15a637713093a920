use num_integer::Integer;
use num_traits::{FromPrimitive, NumAssignRef, NumRef, Signed, ToPrimitive};
use std::fmt::{Debug, Display};

/// Signed integer type used for polynomial coefficients.
///
/// Every ring operation in the crate is written against this trait, so the
/// same scheme runs on arbitrary-precision integers (`num_bigint::BigInt`)
/// or on a fixed-width machine integer (`i128`) for small parameter sets.
pub trait Coefficient:
    Clone
    + Debug
    + Display
    + Ord
    + Signed
    + Integer
    + NumRef
    + NumAssignRef
    + FromPrimitive
    + ToPrimitive
    + From<i64>
    + From<u64>
    + Send
    + Sync
    + 'static
{
    /// Largest magnitude bit length an intermediate value may reach, or
    /// `None` when the representation is unbounded.
    const BIT_LIMIT: Option<u64>;

    /// Number of bits needed to represent `|self|`; zero for zero.
    fn bit_length(&self) -> u64;

    /// `2^bits`.
    fn pow2(bits: u64) -> Self {
        let two = Self::one() + Self::one();
        num_traits::pow(two, bits as usize)
    }

    /// Rounds a float to the nearest integer, `None` if it is not finite or
    /// does not fit.
    fn from_f64_rounded(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Self::from_f64(value.round())
    }

    /// Lossy conversion for decoding; out-of-range values become infinities.
    fn to_f64_lossy(&self) -> f64 {
        self.to_f64().unwrap_or(if self.is_negative() {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        })
    }

    /// Division rounded to the nearest integer, ties away from zero.
    ///
    /// # Panics
    ///
    /// Panics if `divisor` is zero.
    fn div_round(&self, divisor: &Self) -> Self {
        let (quotient, remainder) = self.div_rem(divisor);
        let twice = remainder.abs() * (Self::one() + Self::one());
        if twice < divisor.abs() {
            return quotient;
        }
        if self.is_negative() != divisor.is_negative() {
            quotient - Self::one()
        } else {
            quotient + Self::one()
        }
    }

    /// Centered residue of `self` modulo a positive `modulus`, in
    /// `(-modulus/2, modulus/2]`.
    fn centered_mod(&self, modulus: &Self) -> Self {
        let residue = self.mod_floor(modulus);
        if residue.clone() + &residue > *modulus {
            residue - modulus
        } else {
            residue
        }
    }
}
