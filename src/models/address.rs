//! Postal code and address types.

use super::{Result, ShipquoteError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of digits in a Brazilian postal code (CEP).
pub const POSTAL_CODE_LEN: usize = 8;

/// A validated 8-digit postal code.
///
/// Parsing strips every non-digit character, so `"01310-100"` and
/// `"01310100"` produce the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Parse a postal code from free-form user input.
    pub fn parse(raw: &str) -> Result<Self> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != POSTAL_CODE_LEN {
            return Err(ShipquoteError::InvalidPostalCode(raw.to_string()));
        }
        Ok(Self(digits))
    }

    /// The bare 8 digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", &self.0[..5], &self.0[5..])
    }
}

impl FromStr for PostalCode {
    type Err = ShipquoteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = ShipquoteError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.0
    }
}

/// Latitude/longitude pair in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Which resolution tier produced a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatesSource {
    /// Free-text geocoding of postal code, city and state
    Geocoder,
    /// Approximate position of the state's capital city
    StateCapital,
}

/// Address as returned by the postal-code lookup service, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressRecord {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state_code: String,
}

/// Normalized address with optional coordinates.
///
/// `coordinates` is `None` only when every fallback tier failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub postal_code: PostalCode,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates_source: Option<CoordinatesSource>,
}

impl PostalAddress {
    /// Build an address without coordinates from a lookup record.
    pub fn from_record(postal_code: PostalCode, record: AddressRecord) -> Self {
        Self {
            postal_code,
            street: record.street,
            neighborhood: record.neighborhood,
            city: record.city,
            state_code: record.state_code,
            coordinates: None,
            coordinates_source: None,
        }
    }

    /// Attach coordinates along with the tier that produced them.
    pub fn with_coordinates(mut self, coordinates: Coordinates, source: CoordinatesSource) -> Self {
        self.coordinates = Some(coordinates);
        self.coordinates_source = Some(source);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_formatting() {
        let code = PostalCode::parse("01310-100").unwrap();
        assert_eq!(code.as_str(), "01310100");
        assert_eq!(code.to_string(), "01310-100");

        let code = PostalCode::parse(" 20040.020 ").unwrap();
        assert_eq!(code.as_str(), "20040020");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        for raw in ["", "123", "0131010", "013101000", "abcdefgh", "01310-10a"] {
            let err = PostalCode::parse(raw).unwrap_err();
            assert!(
                matches!(err, ShipquoteError::InvalidPostalCode(ref s) if s == raw),
                "expected InvalidPostalCode for {raw:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_serde_uses_bare_digits() {
        let code: PostalCode = serde_json::from_str(r#""01310-100""#).unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), r#""01310100""#);
        assert!(serde_json::from_str::<PostalCode>(r#""123""#).is_err());
    }

    #[test]
    fn test_with_coordinates_records_source() {
        let address = PostalAddress::from_record(
            PostalCode::parse("01310100").unwrap(),
            AddressRecord {
                street: "Avenida Paulista".into(),
                neighborhood: "Bela Vista".into(),
                city: "São Paulo".into(),
                state_code: "SP".into(),
            },
        );
        assert!(address.coordinates.is_none());

        let address =
            address.with_coordinates(Coordinates::new(-23.56, -46.65), CoordinatesSource::Geocoder);
        assert_eq!(address.coordinates, Some(Coordinates::new(-23.56, -46.65)));
        assert_eq!(address.coordinates_source, Some(CoordinatesSource::Geocoder));
    }
}
