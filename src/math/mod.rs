pub mod sampling;

pub use sampling::{
    MAX_REJECTION_ATTEMPTS, SamplingError, SamplingResult, dg, hwt, random_pol, uniform_below, zo,
};
