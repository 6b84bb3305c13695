//! Configuration models for shipquote.
//!
//! Every tunable of the engine is parameterized here and resolved at runtime
//! from a TOML file. All sections have defaults, so an empty file is valid.

use super::PostalCode;
use crate::engine::DEFAULT_ITEM_WEIGHT_GRAMS;
use crate::rates::{CarrierTier, RateTable};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Top-level configuration for shipquote.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Postal-code lookup service (ViaCEP)
    #[serde(default)]
    pub address_lookup: AddressLookupConfig,

    /// Geocoding service (Nominatim)
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Quote engine parameters
    #[serde(default)]
    pub quote: QuoteSettings,

    /// Per-tier overrides of the built-in rate table
    #[serde(default)]
    pub tiers: TierOverrides,
}

/// Postal-code lookup service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressLookupConfig {
    /// Base URL, `/ws/<cep>/json/` is appended
    #[serde(default = "default_lookup_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_lookup_base_url() -> String {
    "https://viacep.com.br".to_string()
}

fn default_timeout() -> u64 {
    5
}

impl Default for AddressLookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_lookup_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Geocoding service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL, `/search` is appended
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User-Agent sent with every request.
    /// Nominatim's usage policy requires an identifying agent.
    /// Values can contain ${ENV_VAR} for environment variable expansion
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Country filter passed as `countrycodes`
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    concat!("shipquote/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_country_code() -> String {
    "br".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            country_code: default_country_code(),
        }
    }
}

/// Quote engine parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSettings {
    /// Store origin used when a request does not carry one
    #[serde(default = "default_origin")]
    pub origin_postal_code: String,

    /// Weight assumed for items without weight data
    #[serde(default = "default_item_weight")]
    pub default_item_weight_grams: f64,
}

fn default_origin() -> String {
    "01310-100".to_string()
}

fn default_item_weight() -> f64 {
    DEFAULT_ITEM_WEIGHT_GRAMS
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            origin_postal_code: default_origin(),
            default_item_weight_grams: default_item_weight(),
        }
    }
}

/// Optional overrides for each carrier tier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub economy: Option<TierOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<TierOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub express: Option<TierOverride>,
}

/// Field-level override of a built-in carrier tier. Absent fields keep the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierOverride {
    pub display_name: Option<String>,
    pub carrier_label: Option<String>,
    pub base_price: Option<f64>,
    pub price_per_km: Option<f64>,
    pub price_per_kg: Option<f64>,
    pub base_lead_days: Option<u32>,
    pub extra_lead_days_per_km: Option<f64>,
    pub description: Option<String>,
    pub fallback_price: Option<f64>,
    pub fallback_lead_time: Option<String>,
}

impl TierOverride {
    fn apply(&self, tier: &mut CarrierTier) {
        if let Some(v) = &self.display_name {
            tier.display_name = v.clone();
        }
        if let Some(v) = &self.carrier_label {
            tier.carrier_label = v.clone();
        }
        if let Some(v) = self.base_price {
            tier.base_price = v;
        }
        if let Some(v) = self.price_per_km {
            tier.price_per_km = v;
        }
        if let Some(v) = self.price_per_kg {
            tier.price_per_kg = v;
        }
        if let Some(v) = self.base_lead_days {
            tier.base_lead_days = v;
        }
        if let Some(v) = self.extra_lead_days_per_km {
            tier.extra_lead_days_per_km = v;
        }
        if let Some(v) = &self.description {
            tier.description = v.clone();
        }
        if let Some(v) = self.fallback_price {
            tier.fallback_price = v;
        }
        if let Some(v) = &self.fallback_lead_time {
            tier.fallback_lead_time = v.clone();
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })
    }

    /// Load configuration, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check values serde cannot express as types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        PostalCode::parse(&self.quote.origin_postal_code).map_err(|_| {
            ConfigError::Invalid(format!(
                "quote.origin_postal_code '{}' is not an 8-digit postal code",
                self.quote.origin_postal_code
            ))
        })?;

        let weight = self.quote.default_item_weight_grams;
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "quote.default_item_weight_grams must be positive, got {weight}"
            )));
        }

        if self.address_lookup.timeout_secs == 0 || self.geocoding.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        let table = self.rate_table();
        for (id, tier) in table.iter() {
            let numbers = [
                tier.base_price,
                tier.price_per_km,
                tier.price_per_kg,
                tier.extra_lead_days_per_km,
                tier.fallback_price,
            ];
            if numbers.iter().any(|n| !n.is_finite() || *n < 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "tiers.{id} has a negative or non-finite rate"
                )));
            }
        }

        Ok(())
    }

    /// Built-in rate table with configured overrides applied.
    pub fn rate_table(&self) -> RateTable {
        let mut table = RateTable::default();
        let overrides = [
            (&self.tiers.economy, &mut table.economy),
            (&self.tiers.standard, &mut table.standard),
            (&self.tiers.express, &mut table.express),
        ];
        for (over, tier) in overrides {
            if let Some(over) = over {
                over.apply(tier);
            }
        }
        table
    }
}

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern compiles"));

/// Expand environment variables in a string.
///
/// Supports ${VAR_NAME} syntax.
/// If the variable is not set, the placeholder is left unchanged.
pub fn expand_env_vars(s: &str) -> String {
    let mut result = s.to_string();

    for cap in ENV_VAR_PATTERN.captures_iter(s) {
        let var_name = &cap[1];
        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CarrierTierId;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.address_lookup.base_url, "https://viacep.com.br");
        assert_eq!(config.geocoding.timeout_secs, 5);
        assert_eq!(config.geocoding.country_code, "br");
        assert_eq!(config.quote.origin_postal_code, "01310-100");
        assert_eq!(config.quote.default_item_weight_grams, 200.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tier_overrides_apply_per_field() {
        let config: Config = toml::from_str(
            r#"
            [tiers.express]
            base_price = 39.9
            carrier_label = "Loggi"
            "#,
        )
        .unwrap();

        let table = config.rate_table();
        let defaults = RateTable::default();
        let express = table.get(CarrierTierId::Express);
        assert_eq!(express.base_price, 39.9);
        assert_eq!(express.carrier_label, "Loggi");
        assert_eq!(express.price_per_km, defaults.express.price_per_km);
        assert_eq!(table.economy, defaults.economy);
    }

    #[test]
    fn test_unknown_override_field_rejected() {
        let parsed = toml::from_str::<Config>(
            r#"
            [tiers.economy]
            base_prize = 10.0
            "#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.quote.origin_postal_code = "123".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.quote.default_item_weight_grams = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.geocoding.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.tiers.standard = Some(TierOverride {
            price_per_km: Some(-0.01),
            ..TierOverride::default()
        });
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_file_and_missing_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[quote]\norigin_postal_code = \"20040-020\"\ndefault_item_weight_grams = 350.0"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.quote.origin_postal_code, "20040-020");
        assert_eq!(config.quote.default_item_weight_grams, 350.0);

        let missing = file.path().with_extension("missing.toml");
        assert!(matches!(
            Config::from_file(&missing),
            Err(ConfigError::FileRead { .. })
        ));
        let config = Config::load_or_default(&missing).unwrap();
        assert_eq!(config.quote.origin_postal_code, "01310-100");
    }

    #[test]
    fn test_parse_error_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[quote\norigin_postal_code = ").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_expand_env_vars_leaves_unknown_placeholders() {
        assert_eq!(
            expand_env_vars("shipquote (${SHIPQUOTE_TEST_UNSET_VAR})"),
            "shipquote (${SHIPQUOTE_TEST_UNSET_VAR})"
        );
        assert_eq!(expand_env_vars("no placeholders"), "no placeholders");
    }
}
