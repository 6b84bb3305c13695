//! Geographic helpers: great-circle distance and the static coordinate table
//! used as the last resolution tier.

mod capitals;
mod distance;

pub use capitals::*;
pub use distance::*;
