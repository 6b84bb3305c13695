//! Shipping quote orchestration.

use super::{grams_to_kg, total_weight_grams};
use crate::geo::haversine_km;
use crate::models::{
    CartLineItem, Config, Coordinates, Destination, PostalAddress, QuoteRequest, QuoteResult,
    QuoteSettings, Result,
};
use crate::rates::RateTable;
use crate::resolver::PostalResolver;
use std::fmt;
use tracing::{debug, warn};

/// Which end of the shipment failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Origin => f.write_str("origin"),
            Self::Destination => f.write_str("destination"),
        }
    }
}

/// Why a quote fell back to static estimates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{endpoint}: {reason}")]
pub struct ResolutionFailure {
    pub endpoint: Endpoint,
    pub reason: String,
    /// Caused by a third-party service or missing geodata rather than caller input
    pub external: bool,
}

/// Computes shipping options for a cart.
#[derive(Clone)]
pub struct QuoteEngine {
    resolver: PostalResolver,
    rates: RateTable,
    settings: QuoteSettings,
}

impl QuoteEngine {
    pub fn new(resolver: PostalResolver, rates: RateTable, settings: QuoteSettings) -> Self {
        Self {
            resolver,
            rates,
            settings,
        }
    }

    /// Engine wired to the public services with the configured rate table.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            PostalResolver::from_config(config)?,
            config.rate_table(),
            config.quote.clone(),
        ))
    }

    pub fn resolver(&self) -> &PostalResolver {
        &self.resolver
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn settings(&self) -> &QuoteSettings {
        &self.settings
    }

    /// Quote a request, using the configured origin when it carries none.
    pub async fn quote(&self, request: &QuoteRequest) -> QuoteResult {
        let origin = request
            .origin
            .as_deref()
            .unwrap_or(&self.settings.origin_postal_code);
        self.calculate_shipping(origin, &request.destination, &request.items)
            .await
    }

    /// Price every carrier tier for shipping `items` from `origin` to `destination`.
    ///
    /// Always yields one option per tier, cheapest first. When either postal
    /// code cannot be located the options are flat estimates and the result is
    /// marked `success == false` with the reason in `error`.
    pub async fn calculate_shipping(
        &self,
        origin: &str,
        destination: &Destination,
        items: &[CartLineItem],
    ) -> QuoteResult {
        let total_weight_kg =
            grams_to_kg(total_weight_grams(items, self.settings.default_item_weight_grams));

        match self.locate(origin, &destination.postal_code).await {
            Ok((from, to)) => {
                let distance_km = haversine_km(from, to);
                debug!(
                    origin = origin,
                    destination = %destination.postal_code,
                    distance_km = distance_km,
                    weight_kg = total_weight_kg,
                    "Quoting by distance"
                );
                QuoteResult::precise(self.rates.precise_options(distance_km, total_weight_kg))
            }
            Err(failure) => {
                if failure.external {
                    warn!(
                        origin = origin,
                        destination = %destination.postal_code,
                        weight_kg = total_weight_kg,
                        error = %failure,
                        "Falling back to estimated shipping"
                    );
                } else {
                    debug!(
                        origin = origin,
                        destination = %destination.postal_code,
                        error = %failure,
                        "Rejected postal code, quoting estimates"
                    );
                }
                QuoteResult::estimated(
                    self.rates.fallback_options(total_weight_kg),
                    failure.to_string(),
                )
            }
        }
    }

    /// Resolve both ends concurrently.
    async fn locate(
        &self,
        origin: &str,
        destination: &str,
    ) -> std::result::Result<(Coordinates, Coordinates), ResolutionFailure> {
        let (from, to) = tokio::join!(
            self.resolver.resolve(origin),
            self.resolver.resolve(destination)
        );
        Ok((
            coordinates_of(Endpoint::Origin, from)?,
            coordinates_of(Endpoint::Destination, to)?,
        ))
    }
}

fn coordinates_of(
    endpoint: Endpoint,
    resolved: Result<PostalAddress>,
) -> std::result::Result<Coordinates, ResolutionFailure> {
    match resolved {
        Ok(address) => address.coordinates.ok_or_else(|| ResolutionFailure {
            endpoint,
            reason: format!("no coordinates for postal code {}", address.postal_code),
            external: true,
        }),
        Err(e) => Err(ResolutionFailure {
            endpoint,
            reason: e.to_string(),
            external: e.is_external(),
        }),
    }
}
