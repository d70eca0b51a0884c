//! Per-item unit price composition.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use teamorder_core::{LineItem, PricingConfig, ProductColorKey, TierId, TierList};

use crate::aggregate::Counts;
use crate::error::PricingError;
use crate::normalize::combination_key;
use crate::tiers::resolve_tier;

/// Resolved tier per eligible combination.
pub type TierMap = BTreeMap<ProductColorKey, TierId>;

/// A line item with its resolved tier and composed unit price, in currency
/// units (not cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedItem {
    pub item: LineItem,
    pub key: ProductColorKey,
    pub tier: TierId,
    pub unit_price: Decimal,
}

/// Resolves one tier per eligible combination. Excluded combinations must
/// not be passed in; they never appear in the map.
#[must_use]
pub fn build_tier_map(eligible: &Counts, tiers: &TierList) -> TierMap {
    eligible
        .iter()
        .map(|(key, &count)| (key.clone(), resolve_tier(count, tiers)))
        .collect()
}

/// Composes the unit price of `item`: base price at its combination's tier,
/// plus the embroidery fee when a name is embroidered, plus the logo and
/// folding fees when configured.
///
/// A combination missing from `tier_map` is priced at the floor tier.
///
/// # Errors
///
/// Returns [`PricingError::UnknownProduct`] when the product has no price
/// table, or [`PricingError::MissingTierPrice`] when the table lacks the
/// resolved tier.
pub fn price_item(
    item: &LineItem,
    tier_map: &TierMap,
    config: &PricingConfig,
) -> Result<PricedItem, PricingError> {
    let table = config
        .price_table(&item.product)
        .ok_or_else(|| PricingError::UnknownProduct {
            product: item.product.clone(),
        })?;

    let key = combination_key(&item.product, &item.color, &config.color_groups);
    let tier = tier_map
        .get(&key)
        .copied()
        .unwrap_or_else(|| config.tiers.floor().min_qty);

    let base = table
        .get(&tier)
        .copied()
        .ok_or_else(|| PricingError::MissingTierPrice {
            product: item.product.clone(),
            tier,
        })?;

    let mut unit_price = base;
    if item.embroidery().is_some() {
        unit_price += config.embroidery_fee.unwrap_or_default();
    }
    unit_price += config.logo_fee.unwrap_or_default();
    unit_price += config.folding_fee.unwrap_or_default();

    Ok(PricedItem {
        item: item.clone(),
        key,
        tier,
        unit_price,
    })
}

/// Converts a currency amount to the smallest currency unit, rounding
/// `value * 100` half-up. Saturates at the `i64` range.
#[must_use]
pub fn to_minor_units(value: Decimal) -> i64 {
    let cents = (value * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    cents.to_i64().unwrap_or(if cents.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

#[cfg(test)]
mod tests {
    use teamorder_core::pricing::ColorGroups;

    use super::*;
    use crate::aggregate::count_by_product_color;
    use crate::test_support::{dec, embroidered, item, pricing, pricing_without_fees, row};

    fn map_with(key: ProductColorKey, tier: TierId) -> TierMap {
        let mut map = TierMap::new();
        map.insert(key, tier);
        map
    }

    #[test]
    fn embroidered_item_at_tier_18_sums_all_fees() {
        let cfg = pricing();
        let jacket = embroidered("Jacket", "Black", "DANA", "Gold");
        let map = map_with(ProductColorKey::new("Jacket", "Black"), 18);
        let priced = price_item(&jacket, &map, &cfg).unwrap();
        assert_eq!(priced.tier, 18);
        assert_eq!(priced.unit_price, dec("192.33"));
    }

    #[test]
    fn plain_item_skips_embroidery_fee() {
        let cfg = pricing();
        let map = map_with(ProductColorKey::new("Jacket", "Black"), 18);
        let priced = price_item(&item("Jacket", "Black"), &map, &cfg).unwrap();
        assert_eq!(priced.unit_price, dec("184.33"));
    }

    #[test]
    fn whitespace_name_is_not_embroidered() {
        let cfg = pricing();
        let jacket = embroidered("Jacket", "Black", "   ", "Gold");
        let map = map_with(ProductColorKey::new("Jacket", "Black"), 18);
        let priced = price_item(&jacket, &map, &cfg).unwrap();
        assert_eq!(priced.unit_price, dec("184.33"));
    }

    #[test]
    fn unconfigured_fees_add_nothing() {
        let cfg = pricing_without_fees();
        let jacket = embroidered("Jacket", "Black", "DANA", "Gold");
        let map = map_with(ProductColorKey::new("Jacket", "Black"), 36);
        let priced = price_item(&jacket, &map, &cfg).unwrap();
        assert_eq!(priced.unit_price, dec("168.00"));
    }

    #[test]
    fn missing_tier_map_entry_uses_floor_tier() {
        let cfg = pricing_without_fees();
        let priced = price_item(&item("Vest", "Navy"), &TierMap::new(), &cfg).unwrap();
        assert_eq!(priced.tier, 6);
        assert_eq!(priced.unit_price, dec("120.00"));
    }

    #[test]
    fn unknown_product_is_reported() {
        let cfg = pricing();
        let err = price_item(&item("Beanie", "Black"), &TierMap::new(), &cfg).unwrap_err();
        assert_eq!(
            err,
            PricingError::UnknownProduct {
                product: "Beanie".to_owned()
            }
        );
    }

    #[test]
    fn missing_tier_price_is_reported() {
        let mut cfg = pricing();
        cfg.products.get_mut("Jacket").unwrap().remove(&18);
        let map = map_with(ProductColorKey::new("Jacket", "Black"), 18);
        let err = price_item(&item("Jacket", "Black"), &map, &cfg).unwrap_err();
        assert!(matches!(err, PricingError::MissingTierPrice { tier: 18, .. }));
    }

    #[test]
    fn gray_variants_share_tier_and_price() {
        let cfg = pricing();
        let mut rows = Vec::new();
        for _ in 0..5 {
            rows.push(row("a@example.com", "Jacket", "Birch White"));
            rows.push(row("b@example.com", "Jacket", "Stonewash"));
        }
        let counts = count_by_product_color(&rows, &ColorGroups::default());
        assert_eq!(counts[&ProductColorKey::new("Jacket", "Gray")], 10);

        let map = build_tier_map(&counts, &cfg.tiers);
        let birch = price_item(&item("Jacket", "Birch White"), &map, &cfg).unwrap();
        let stone = price_item(&item("Jacket", "Stonewash"), &map, &cfg).unwrap();
        assert_eq!(birch.tier, stone.tier);
        assert_eq!(birch.unit_price, stone.unit_price);
        assert_eq!(birch.key, ProductColorKey::new("Jacket", "Gray"));
    }

    #[test]
    fn tier_map_ids_never_exceed_counts() {
        let cfg = pricing();
        let mut counts = Counts::new();
        counts.insert(ProductColorKey::new("Jacket", "Black"), 40);
        counts.insert(ProductColorKey::new("Jacket", "Navy"), 20);
        counts.insert(ProductColorKey::new("Vest", "Black"), 6);
        let map = build_tier_map(&counts, &cfg.tiers);
        assert_eq!(map.len(), counts.len());
        for (key, tier) in &map {
            assert!(*tier <= counts[key], "{key} tier {tier} > {}", counts[key]);
        }
        assert_eq!(map[&ProductColorKey::new("Jacket", "Black")], 36);
        assert_eq!(map[&ProductColorKey::new("Jacket", "Navy")], 18);
    }

    #[test]
    fn minor_units_round_half_up() {
        assert_eq!(to_minor_units(dec("192.33")), 19233);
        assert_eq!(to_minor_units(dec("9.63075")), 963);
        assert_eq!(to_minor_units(dec("0.125")), 13);
        assert_eq!(to_minor_units(dec("0.124")), 12);
        assert_eq!(to_minor_units(Decimal::ZERO), 0);
    }
}
