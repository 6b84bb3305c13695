//! Service seams used by the postal resolver.

use crate::models::{AddressRecord, Coordinates, PostalCode, Result};
use async_trait::async_trait;
use std::fmt;

/// Postal-code to address lookup.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// Look up the address for a postal code.
    ///
    /// Fails with `PostalCodeNotFound` when the service flags the code as
    /// unknown.
    async fn lookup(&self, postal_code: &PostalCode) -> Result<AddressRecord>;
}

/// Free-text geocoding.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Coordinates of the best match, or `None` when nothing matched.
    async fn geocode(&self, query: &GeocodeQuery) -> Result<Option<Coordinates>>;
}

/// Country name appended to every geocoding query.
pub const GEOCODE_COUNTRY: &str = "Brazil";

/// Structured geocoding query for a looked-up address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery {
    pub postal_code: PostalCode,
    pub city: String,
    pub state_code: String,
}

impl GeocodeQuery {
    pub fn new(
        postal_code: PostalCode,
        city: impl Into<String>,
        state_code: impl Into<String>,
    ) -> Self {
        Self {
            postal_code,
            city: city.into(),
            state_code: state_code.into(),
        }
    }
}

impl fmt::Display for GeocodeQuery {
    /// `"<postal code>, <city>, <state>, Brazil"`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {GEOCODE_COUNTRY}",
            self.postal_code, self.city, self.state_code
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_text() {
        let query = GeocodeQuery::new(PostalCode::parse("01310100").unwrap(), "São Paulo", "SP");
        assert_eq!(query.to_string(), "01310-100, São Paulo, SP, Brazil");
    }
}
