//! Quote engine.
//!
//! Orchestrates the postal resolver, the distance calculator and the rate
//! table into a sorted list of shipping options. Resolution failures degrade
//! to static estimates; the engine never fails its caller.

mod quote;
mod weight;

pub use quote::*;
pub use weight::*;
