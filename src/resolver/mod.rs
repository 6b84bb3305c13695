//! Postal resolver.
//!
//! Turns a postal code into a normalized address with coordinates, trying in
//! order:
//! 1. the address lookup service (required; its failures propagate)
//! 2. free-text geocoding of postal code, city and state
//! 3. the static state-capital table
//!
//! When all coordinate tiers fail the address is returned without
//! coordinates. Callers that need a distance must check for that.

use crate::client::{AddressLookup, GeocodeQuery, Geocoder, NominatimClient, ViaCepClient};
use crate::geo::capital_coordinates;
use crate::models::{Config, CoordinatesSource, PostalAddress, PostalCode, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves postal codes through the injected lookup and geocoding services.
#[derive(Clone)]
pub struct PostalResolver {
    lookup: Arc<dyn AddressLookup>,
    geocoder: Arc<dyn Geocoder>,
}

impl PostalResolver {
    pub fn new(lookup: Arc<dyn AddressLookup>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { lookup, geocoder }
    }

    /// Resolver backed by the public ViaCEP and Nominatim services.
    pub fn from_config(config: &Config) -> Result<Self> {
        let lookup = ViaCepClient::from_config(&config.address_lookup)?;
        let geocoder = NominatimClient::from_config(&config.geocoding)?;
        Ok(Self::new(Arc::new(lookup), Arc::new(geocoder)))
    }

    /// Resolve a postal code given in any formatting.
    ///
    /// Fails with `InvalidPostalCode` when the input does not hold exactly
    /// 8 digits and with `PostalCodeNotFound` when the lookup service does not
    /// know the code. Geocoding failures never fail the call.
    pub async fn resolve(&self, raw: &str) -> Result<PostalAddress> {
        let postal_code = PostalCode::parse(raw)?;
        self.resolve_code(postal_code).await
    }

    /// Resolve an already validated postal code.
    pub async fn resolve_code(&self, postal_code: PostalCode) -> Result<PostalAddress> {
        let record = self.lookup.lookup(&postal_code).await?;
        let address = PostalAddress::from_record(postal_code, record);
        Ok(self.enrich(address).await)
    }

    async fn enrich(&self, address: PostalAddress) -> PostalAddress {
        let query = GeocodeQuery::new(
            address.postal_code.clone(),
            address.city.clone(),
            address.state_code.clone(),
        );

        match self.geocoder.geocode(&query).await {
            Ok(Some(coordinates)) => {
                debug!(
                    postal_code = %address.postal_code,
                    lat = coordinates.lat,
                    lng = coordinates.lng,
                    "Geocoded address"
                );
                return address.with_coordinates(coordinates, CoordinatesSource::Geocoder);
            }
            Ok(None) => {
                debug!(postal_code = %address.postal_code, "Geocoder returned no match");
            }
            Err(e) => {
                debug!(postal_code = %address.postal_code, error = %e, "Geocoding failed");
            }
        }

        match capital_coordinates(&address.state_code) {
            Some(coordinates) => {
                debug!(
                    postal_code = %address.postal_code,
                    state = %address.state_code,
                    "Using state capital coordinates"
                );
                address.with_coordinates(coordinates, CoordinatesSource::StateCapital)
            }
            None => {
                warn!(
                    postal_code = %address.postal_code,
                    state = %address.state_code,
                    "No coordinates available for address"
                );
                address
            }
        }
    }
}
