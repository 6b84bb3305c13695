//! ViaCEP postal-code lookup client.
//!
//! `GET {base_url}/ws/{cep}/json/` returns the street-level address for a
//! CEP. Unknown codes answer 200 with an `erro` flag instead of a 404.

use crate::client::AddressLookup;
use crate::models::{
    AddressLookupConfig, AddressRecord, PostalCode, Result, ShipquoteError, expand_env_vars,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const SERVICE: &str = "viacep";

/// ViaCEP response body.
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    /// `true` for unknown codes; newer deployments send the string `"true"`
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// Parse a ViaCEP body into an address record.
pub fn parse_viacep_body(postal_code: &PostalCode, body: &str) -> Result<AddressRecord> {
    let response: ViaCepResponse = serde_json::from_str(body).map_err(|e| {
        ShipquoteError::ParseError(format!("Failed to parse {SERVICE} response: {e}"))
    })?;

    if response.is_not_found() {
        return Err(ShipquoteError::PostalCodeNotFound(postal_code.to_string()));
    }

    Ok(AddressRecord {
        street: response.logradouro,
        neighborhood: response.bairro,
        city: response.localidade,
        state_code: response.uf.to_ascii_uppercase(),
    })
}

/// ViaCEP API client.
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ViaCepClient {
    /// Create a new ViaCEP client.
    pub fn new(base_url: Option<String>, timeout_secs: Option<u64>) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(5));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ShipquoteError::Network)?;

        let base_url = base_url.unwrap_or_else(|| "https://viacep.com.br".to_string());

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &AddressLookupConfig) -> Result<Self> {
        Self::new(
            Some(expand_env_vars(&config.base_url)),
            Some(config.timeout_secs),
        )
    }

    /// Endpoint for a postal code.
    pub fn url_for(&self, postal_code: &PostalCode) -> String {
        format!("{}/ws/{}/json/", self.base_url, postal_code.as_str())
    }
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    async fn lookup(&self, postal_code: &PostalCode) -> Result<AddressRecord> {
        let url = self.url_for(postal_code);
        debug!(url = %url, "Looking up postal code");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ShipquoteError::from_transport(e, self.timeout))?;

        let status = response.status();

        // ViaCEP answers 400 for codes it considers malformed
        if status.as_u16() == 400 {
            return Err(ShipquoteError::PostalCodeNotFound(postal_code.to_string()));
        }

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

        parse_viacep_body(postal_code, &body)
    }
}
