//! Concrete coefficient representations.
//!
//! `bigint` is the default arbitrary-precision backend; `fixed` runs the
//! same scheme on `i128` when every intermediate fits in 127 bits.

pub mod bigint;
pub mod fixed;

pub use fixed::FIXED_WIDTH_BITS;
