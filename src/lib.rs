//! shipquote - Shipping-rate estimation for Brazilian postal codes.
//!
//! ## Architecture
//!
//! A quote request flows leaf-first through:
//! - **Cart Weight Aggregator**: sums item weights, substituting a default for unknown weights
//! - **Postal Resolver**: postal code → address → coordinates (geocoder, then state capital)
//! - **Distance Calculator**: haversine great-circle distance
//! - **Rate Table**: per-tier price and lead time from distance and weight
//! - **Quote Engine**: orchestrates the above and owns the fallback policy
//!
//! ## Failure policy
//!
//! Malformed postal codes are rejected by the resolver. Every external failure
//! (network, timeouts, unknown codes) is absorbed by the engine, which answers
//! with distance-independent estimates flagged `success == false`. Quoting never
//! blocks checkout.

pub mod client;
pub mod engine;
pub mod geo;
pub mod models;
pub mod rates;
pub mod resolver;

// Re-exports for convenience
pub use client::{AddressLookup, GeocodeQuery, Geocoder, NominatimClient, ViaCepClient};
pub use engine::{QuoteEngine, total_weight_grams};
pub use geo::haversine_km;
pub use models::{
    CarrierTierId, CartLineItem, Config, Coordinates, Destination, OrderShipping, PostalAddress,
    PostalCode, QuoteRequest, QuoteResult, Result, ShipquoteError, ShippingOption,
};
pub use rates::{CarrierTier, RateTable};
pub use resolver::PostalResolver;
