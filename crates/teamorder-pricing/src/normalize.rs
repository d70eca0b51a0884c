//! Color normalization into pricing groups.
//!
//! Aggregation and per-item pricing both build their map keys through
//! [`combination_key`]; a divergence between the two would price items at
//! the wrong tier.

use teamorder_core::pricing::ColorGroups;
use teamorder_core::ProductColorKey;

/// Returns the canonical group label when `raw` is a configured synonym,
/// otherwise `raw` unchanged.
#[must_use]
pub fn normalize_color(raw: &str, groups: &ColorGroups) -> String {
    groups
        .canonical_for(raw)
        .map_or_else(|| raw.to_string(), str::to_string)
}

/// The tier-assignment key for a product in a raw color.
#[must_use]
pub fn combination_key(product: &str, raw_color: &str, groups: &ColorGroups) -> ProductColorKey {
    ProductColorKey::new(product.trim(), normalize_color(raw_color.trim(), groups))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn default_groups_merge_gray_shades() {
        let groups = ColorGroups::default();
        assert_eq!(normalize_color("Birch White", &groups), "Gray");
        assert_eq!(normalize_color("Stonewash", &groups), "Gray");
    }

    #[test]
    fn unlisted_colors_pass_through() {
        let groups = ColorGroups::default();
        assert_eq!(normalize_color("Black", &groups), "Black");
        assert_eq!(normalize_color("", &groups), "");
    }

    #[test]
    fn matching_is_exact() {
        let groups = ColorGroups::default();
        assert_eq!(normalize_color("stonewash", &groups), "stonewash");
    }

    #[test]
    fn combination_key_trims_and_normalizes() {
        let groups = ColorGroups::default();
        let key = combination_key(" Jacket ", " Stonewash", &groups);
        assert_eq!(key, ProductColorKey::new("Jacket", "Gray"));
    }

    #[test]
    fn custom_groups_are_honored() {
        let mut map = BTreeMap::new();
        map.insert(
            "Navy".to_string(),
            vec!["Midnight".to_string(), "Navy".to_string()],
        );
        let groups = ColorGroups::new(map).unwrap();
        assert_eq!(normalize_color("Midnight", &groups), "Navy");
        assert_eq!(normalize_color("Navy", &groups), "Navy");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(raw in prop_oneof![
            Just("Birch White".to_string()),
            Just("Stonewash".to_string()),
            Just("Gray".to_string()),
            "[A-Za-z ]{0,16}",
        ]) {
            let groups = ColorGroups::default();
            let once = normalize_color(&raw, &groups);
            let twice = normalize_color(&once, &groups);
            prop_assert_eq!(once, twice);
        }
    }
}
