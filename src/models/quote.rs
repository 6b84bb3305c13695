//! Quote request and result types.
//!
//! These types are the public surface of the quote engine and travel as JSON
//! between checkout and this crate.

use super::{Result, ShipquoteError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One line of the customer's cart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Unit weight in grams. Zero means unknown.
    #[serde(rename = "weight", default)]
    pub weight_grams: f64,

    /// Number of units
    pub quantity: u32,
}

impl CartLineItem {
    pub fn new(weight_grams: f64, quantity: u32) -> Self {
        Self {
            weight_grams,
            quantity,
        }
    }
}

/// Shipping destination as captured at checkout.
///
/// Only `postal_code` drives resolution; the remaining fields are carried
/// through for the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Destination {
    pub fn new(postal_code: impl Into<String>) -> Self {
        Self {
            postal_code: postal_code.into(),
            ..Self::default()
        }
    }
}

/// Input to the quote engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Origin postal code; the configured store origin is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    pub destination: Destination,

    pub items: Vec<CartLineItem>,
}

impl QuoteRequest {
    /// Reject carts the engine should never be asked to quote.
    ///
    /// The engine itself accepts anything; this is the upstream check callers
    /// run before quoting.
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(ShipquoteError::InvalidInput("cart has no items".to_string()));
        }

        for (idx, item) in self.items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(ShipquoteError::InvalidInput(format!(
                    "item {idx} has zero quantity"
                )));
            }
            if !item.weight_grams.is_finite() || item.weight_grams < 0.0 {
                return Err(ShipquoteError::InvalidInput(format!(
                    "item {idx} has invalid weight {}",
                    item.weight_grams
                )));
            }
        }

        Ok(())
    }
}

/// Carrier service level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarrierTierId {
    Economy,
    Standard,
    Express,
}

impl CarrierTierId {
    /// Every tier, in table order.
    pub const ALL: [CarrierTierId; 3] = [Self::Economy, Self::Standard, Self::Express];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::Standard => "standard",
            Self::Express => "express",
        }
    }
}

impl fmt::Display for CarrierTierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A priced shipping choice shown at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    pub id: CarrierTierId,
    pub name: String,
    pub carrier: String,
    /// Price rounded to 2 decimal places
    pub price: f64,
    pub lead_time_label: String,
    pub description: String,
}

/// Outcome of a quote request.
///
/// `success == false` marks an estimated response; `options` is still
/// populated and sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub success: bool,
    pub options: Vec<ShippingOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QuoteResult {
    /// Result computed from resolved coordinates.
    pub fn precise(options: Vec<ShippingOption>) -> Self {
        Self {
            success: true,
            options,
            error: None,
        }
    }

    /// Result built from static estimates after a resolution failure.
    pub fn estimated(options: Vec<ShippingOption>, reason: impl Into<String>) -> Self {
        Self {
            success: false,
            options,
            error: Some(reason.into()),
        }
    }

    /// Cheapest option, if any.
    pub fn cheapest(&self) -> Option<&ShippingOption> {
        self.options.first()
    }

    /// Turn the customer's pick into the record stored on the order.
    pub fn select(&self, id: CarrierTierId) -> Option<OrderShipping> {
        self.options
            .iter()
            .find(|o| o.id == id)
            .map(|o| OrderShipping::from_option(o, !self.success))
    }
}

/// Shipping choice as persisted on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderShipping {
    pub tier: CarrierTierId,
    /// Modality name shown to the customer
    pub modality: String,
    pub carrier: String,
    pub price: f64,
    pub lead_time: String,
    /// True when the price came from the static fallback
    pub estimated: bool,
    pub selected_at: DateTime<Utc>,
}

impl OrderShipping {
    pub fn from_option(option: &ShippingOption, estimated: bool) -> Self {
        Self {
            tier: option.id,
            modality: option.name.clone(),
            carrier: option.carrier.clone(),
            price: option.price,
            lead_time: option.lead_time_label.clone(),
            estimated,
            selected_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: CarrierTierId, price: f64) -> ShippingOption {
        ShippingOption {
            id,
            name: id.to_string(),
            carrier: "Carrier".to_string(),
            price,
            lead_time_label: "3 dias úteis".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_request_wire_format() {
        let json = r#"{
            "origin": "01310-100",
            "destination": {"postalCode": "20040-020", "city": "Rio de Janeiro", "state": "RJ"},
            "items": [{"weight": 800, "quantity": 1}, {"quantity": 2}]
        }"#;
        let request: QuoteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.origin.as_deref(), Some("01310-100"));
        assert_eq!(request.destination.postal_code, "20040-020");
        assert_eq!(request.destination.state.as_deref(), Some("RJ"));
        assert_eq!(request.items[0], CartLineItem::new(800.0, 1));
        assert_eq!(request.items[1], CartLineItem::new(0.0, 2));
    }

    #[test]
    fn test_validate() {
        let mut request = QuoteRequest {
            origin: None,
            destination: Destination::new("20040020"),
            items: vec![CartLineItem::new(0.0, 1)],
        };
        assert!(request.validate().is_ok());

        request.items = vec![];
        assert!(matches!(request.validate(), Err(ShipquoteError::InvalidInput(_))));

        request.items = vec![CartLineItem::new(100.0, 0)];
        assert!(matches!(request.validate(), Err(ShipquoteError::InvalidInput(_))));

        request.items = vec![CartLineItem::new(-5.0, 1)];
        assert!(matches!(request.validate(), Err(ShipquoteError::InvalidInput(_))));

        request.items = vec![CartLineItem::new(f64::NAN, 1)];
        assert!(matches!(request.validate(), Err(ShipquoteError::InvalidInput(_))));
    }

    #[test]
    fn test_result_serialization_omits_missing_error() {
        let result = QuoteResult::precise(vec![option(CarrierTierId::Economy, 20.0)]);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], true);
        assert!(value.get("error").is_none());
        assert_eq!(value["options"][0]["id"], "economy");
        assert_eq!(value["options"][0]["leadTimeLabel"], "3 dias úteis");

        let result = QuoteResult::estimated(vec![], "origin: timeout");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "origin: timeout");
    }

    #[test]
    fn test_select_marks_estimates() {
        let options = vec![
            option(CarrierTierId::Economy, 25.0),
            option(CarrierTierId::Express, 55.0),
        ];

        let precise = QuoteResult::precise(options.clone());
        let chosen = precise.select(CarrierTierId::Express).unwrap();
        assert_eq!(chosen.tier, CarrierTierId::Express);
        assert_eq!(chosen.price, 55.0);
        assert!(!chosen.estimated);

        let fallback = QuoteResult::estimated(options, "destination: not found");
        assert!(fallback.select(CarrierTierId::Economy).unwrap().estimated);
        assert!(fallback.select(CarrierTierId::Standard).is_none());
        assert_eq!(fallback.cheapest().unwrap().id, CarrierTierId::Economy);
    }
}
