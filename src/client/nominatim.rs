//! Nominatim (OpenStreetMap) geocoding client.

use crate::client::{GeocodeQuery, Geocoder};
use crate::models::{Coordinates, GeocodingConfig, Result, ShipquoteError, expand_env_vars};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const SERVICE: &str = "nominatim";

/// One search hit. Nominatim sends coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Parse a Nominatim search body, taking the first hit.
pub fn parse_nominatim_body(body: &str) -> Result<Option<Coordinates>> {
    let places: Vec<NominatimPlace> = serde_json::from_str(body).map_err(|e| {
        ShipquoteError::ParseError(format!("Failed to parse {SERVICE} response: {e}"))
    })?;

    let Some(place) = places.first() else {
        return Ok(None);
    };

    let parse = |field: &str, value: &str| {
        value.trim().parse::<f64>().map_err(|e| {
            ShipquoteError::ParseError(format!("Invalid {field} '{value}' from {SERVICE}: {e}"))
        })
    };

    Ok(Some(Coordinates::new(
        parse("lat", &place.lat)?,
        parse("lon", &place.lon)?,
    )))
}

/// Nominatim search client.
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
    country_code: String,
    timeout: Duration,
}

impl NominatimClient {
    /// Create a new Nominatim client.
    pub fn new(
        base_url: Option<String>,
        user_agent: &str,
        country_code: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(5));

        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(user_agent).map_err(|e| {
            ShipquoteError::InvalidInput(format!(
                "Invalid geocoding user agent '{user_agent}': {e}"
            ))
        })?;
        headers.insert(USER_AGENT, agent);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(ShipquoteError::Network)?;

        let base_url =
            base_url.unwrap_or_else(|| "https://nominatim.openstreetmap.org".to_string());

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            country_code: country_code.unwrap_or_else(|| "br".to_string()),
            timeout,
        })
    }

    pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
        Self::new(
            Some(expand_env_vars(&config.base_url)),
            &expand_env_vars(&config.user_agent),
            Some(config.country_code.clone()),
            Some(config.timeout_secs),
        )
    }

    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &GeocodeQuery) -> Result<Option<Coordinates>> {
        let text = query.to_string();
        debug!(query = %text, "Geocoding address");

        let response = self
            .client
            .get(self.search_url())
            .query(&[
                ("q", text.as_str()),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", self.country_code.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ShipquoteError::from_transport(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ShipquoteError::Service {
                service: SERVICE,
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ShipquoteError::from_transport(e, self.timeout))?;

        parse_nominatim_body(&body)
    }
}
