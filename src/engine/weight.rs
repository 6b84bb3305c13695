//! Cart weight aggregation.

use crate::models::CartLineItem;

/// Weight assumed for an item without weight data.
pub const DEFAULT_ITEM_WEIGHT_GRAMS: f64 = 200.0;

/// Weight of one unit, substituting `default_weight_grams` when unknown.
pub fn effective_weight_grams(item: &CartLineItem, default_weight_grams: f64) -> f64 {
    if item.weight_grams > 0.0 {
        item.weight_grams
    } else {
        default_weight_grams
    }
}

/// Sum of `effective weight * quantity` over the cart. Empty carts weigh 0.
pub fn total_weight_grams(items: &[CartLineItem], default_weight_grams: f64) -> f64 {
    items
        .iter()
        .map(|item| effective_weight_grams(item, default_weight_grams) * f64::from(item.quantity))
        .sum()
}

pub fn grams_to_kg(grams: f64) -> f64 {
    grams / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cart() {
        assert_eq!(total_weight_grams(&[], DEFAULT_ITEM_WEIGHT_GRAMS), 0.0);
    }

    #[test]
    fn test_default_weight_for_missing_data() {
        let items = [CartLineItem::new(0.0, 3)];
        assert_eq!(total_weight_grams(&items, DEFAULT_ITEM_WEIGHT_GRAMS), 600.0);

        let items = [CartLineItem::new(-10.0, 1)];
        assert_eq!(total_weight_grams(&items, DEFAULT_ITEM_WEIGHT_GRAMS), 200.0);
    }

    #[test]
    fn test_mixed_cart() {
        let items = [
            CartLineItem::new(800.0, 1),
            CartLineItem::new(500.0, 2),
            CartLineItem::new(0.0, 1),
        ];
        assert_eq!(total_weight_grams(&items, DEFAULT_ITEM_WEIGHT_GRAMS), 2000.0);
        assert_eq!(total_weight_grams(&items, 50.0), 1850.0);
    }

    #[test]
    fn test_zero_quantity_contributes_nothing() {
        let items = [CartLineItem::new(0.0, 0), CartLineItem::new(300.0, 0)];
        assert_eq!(total_weight_grams(&items, DEFAULT_ITEM_WEIGHT_GRAMS), 0.0);
    }

    #[test]
    fn test_grams_to_kg() {
        assert_eq!(grams_to_kg(1800.0), 1.8);
    }
}
