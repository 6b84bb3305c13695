//! Per-tier pricing formulas.

use crate::models::{CarrierTierId, ShippingOption};
use serde::{Deserialize, Serialize};

/// Weight included in every tier's base price.
pub const INCLUDED_WEIGHT_KG: f64 = 1.0;

/// Pricing and lead-time parameters of one carrier tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierTier {
    /// Modality name shown to the customer
    pub display_name: String,
    /// Carrier that performs the delivery
    pub carrier_label: String,
    /// Price floor, covers the first kilogram
    pub base_price: f64,
    pub price_per_km: f64,
    /// Charged per kilogram above [`INCLUDED_WEIGHT_KG`]
    pub price_per_kg: f64,
    pub base_lead_days: u32,
    pub extra_lead_days_per_km: f64,
    pub description: String,
    /// Flat price used when distance is unknown, scaled by whole kilograms
    pub fallback_price: f64,
    /// Lead time shown when distance is unknown
    pub fallback_lead_time: String,
}

/// Price and lead time computed from distance and weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateQuote {
    pub price: f64,
    pub lead_days: u32,
}

/// Estimate used when distance is unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackQuote {
    pub price: f64,
    pub lead_time: String,
}

impl CarrierTier {
    /// Distance- and weight-based price.
    pub fn price_for(&self, distance_km: f64, total_weight_kg: f64) -> RateQuote {
        let extra_weight_kg = (total_weight_kg - INCLUDED_WEIGHT_KG).max(0.0);
        let price = (self.base_price
            + distance_km * self.price_per_km
            + extra_weight_kg * self.price_per_kg)
            .max(self.base_price);
        let lead_days =
            (f64::from(self.base_lead_days) + distance_km * self.extra_lead_days_per_km).ceil();

        RateQuote {
            price: round_price(price),
            lead_days: lead_days as u32,
        }
    }

    /// Flat estimate: `fallback_price * max(1, ceil(kg))`.
    ///
    /// A step function in whole kilograms, unlike the continuous per-kg
    /// charge of [`CarrierTier::price_for`].
    pub fn fallback_for(&self, total_weight_kg: f64) -> FallbackQuote {
        let multiplier = total_weight_kg.ceil().max(1.0);
        FallbackQuote {
            price: round_price(self.fallback_price * multiplier),
            lead_time: self.fallback_lead_time.clone(),
        }
    }

    fn option(&self, id: CarrierTierId, price: f64, lead_time_label: String) -> ShippingOption {
        ShippingOption {
            id,
            name: self.display_name.clone(),
            carrier: self.carrier_label.clone(),
            price,
            lead_time_label,
            description: self.description.clone(),
        }
    }
}

/// One [`CarrierTier`] per [`CarrierTierId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub economy: CarrierTier,
    pub standard: CarrierTier,
    pub express: CarrierTier,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            economy: CarrierTier {
                display_name: "Econômico".to_string(),
                carrier_label: "Correios PAC".to_string(),
                base_price: 15.0,
                price_per_km: 0.015,
                price_per_kg: 2.5,
                base_lead_days: 5,
                extra_lead_days_per_km: 0.004,
                description: "Entrega econômica com o melhor custo-benefício".to_string(),
                fallback_price: 25.0,
                fallback_lead_time: "8 a 12 dias úteis".to_string(),
            },
            standard: CarrierTier {
                display_name: "Padrão".to_string(),
                carrier_label: "Jadlog .Package".to_string(),
                base_price: 22.0,
                price_per_km: 0.025,
                price_per_kg: 3.5,
                base_lead_days: 3,
                extra_lead_days_per_km: 0.002,
                description: "Entrega padrão com rastreamento".to_string(),
                fallback_price: 35.0,
                fallback_lead_time: "5 a 8 dias úteis".to_string(),
            },
            express: CarrierTier {
                display_name: "Expresso".to_string(),
                carrier_label: "Correios SEDEX".to_string(),
                base_price: 35.0,
                price_per_km: 0.04,
                price_per_kg: 5.0,
                base_lead_days: 1,
                extra_lead_days_per_km: 0.001,
                description: "Entrega prioritária".to_string(),
                fallback_price: 55.0,
                fallback_lead_time: "2 a 4 dias úteis".to_string(),
            },
        }
    }
}

impl RateTable {
    pub fn get(&self, id: CarrierTierId) -> &CarrierTier {
        match id {
            CarrierTierId::Economy => &self.economy,
            CarrierTierId::Standard => &self.standard,
            CarrierTierId::Express => &self.express,
        }
    }

    /// Tiers in table order.
    pub fn iter(&self) -> impl Iterator<Item = (CarrierTierId, &CarrierTier)> {
        CarrierTierId::ALL.into_iter().map(|id| (id, self.get(id)))
    }

    pub fn price_for(
        &self,
        id: CarrierTierId,
        distance_km: f64,
        total_weight_kg: f64,
    ) -> RateQuote {
        self.get(id).price_for(distance_km, total_weight_kg)
    }

    pub fn fallback_for(&self, id: CarrierTierId, total_weight_kg: f64) -> FallbackQuote {
        self.get(id).fallback_for(total_weight_kg)
    }

    /// All tiers priced by distance and weight, cheapest first.
    pub fn precise_options(&self, distance_km: f64, total_weight_kg: f64) -> Vec<ShippingOption> {
        let options = self
            .iter()
            .map(|(id, tier)| {
                let quote = tier.price_for(distance_km, total_weight_kg);
                tier.option(id, quote.price, lead_time_label(quote.lead_days))
            })
            .collect();
        sorted_by_price(options)
    }

    /// All tiers priced by the flat estimate, cheapest first.
    pub fn fallback_options(&self, total_weight_kg: f64) -> Vec<ShippingOption> {
        let options = self
            .iter()
            .map(|(id, tier)| {
                let quote = tier.fallback_for(total_weight_kg);
                tier.option(id, quote.price, quote.lead_time)
            })
            .collect();
        sorted_by_price(options)
    }
}

/// Round to cents, halves away from zero.
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Business-day label for a lead time.
pub fn lead_time_label(days: u32) -> String {
    if days == 1 {
        "1 dia útil".to_string()
    } else {
        format!("{days} dias úteis")
    }
}

// Stable, so equal prices keep table order.
fn sorted_by_price(mut options: Vec<ShippingOption>) -> Vec<ShippingOption> {
    options.sort_by(|a, b| a.price.total_cmp(&b.price));
    options
}
