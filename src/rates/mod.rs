//! Carrier rate table.
//!
//! Static pricing and lead-time model for each carrier tier, plus the
//! distance-independent estimates used when an address cannot be located.

mod table;

pub use table::*;
