use crate::rings::Coefficient;

/// Magnitude bits available to the `i128` backend.
pub const FIXED_WIDTH_BITS: u64 = 127;

impl Coefficient for i128 {
    const BIT_LIMIT: Option<u64> = Some(FIXED_WIDTH_BITS);

    fn bit_length(&self) -> u64 {
        u64::from(128 - self.unsigned_abs().leading_zeros())
    }

    fn pow2(bits: u64) -> Self {
        1i128 << bits
    }
}
