pub mod backends;
pub mod errors;
pub mod poly;
pub mod traits;

pub use errors::{RingError, RingResult};
pub use poly::Poly;
pub use traits::Coefficient;
