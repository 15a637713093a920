use crate::rings::Coefficient;
use num_bigint::BigInt;
use num_traits::One;

impl Coefficient for BigInt {
    const BIT_LIMIT: Option<u64> = None;

    fn bit_length(&self) -> u64 {
        self.bits()
    }

    fn pow2(bits: u64) -> Self {
        BigInt::one() << bits
    }
}
