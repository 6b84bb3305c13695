//! Core data models for shipquote.
//!
//! - Addresses and postal codes produced by the resolver
//! - Cart, request and quote types exchanged with checkout
//! - Configuration and the error taxonomy

mod address;
mod config;
mod error;
mod quote;

pub use address::*;
pub use config::*;
pub use error::*;
pub use quote::*;
