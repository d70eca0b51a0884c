//! Volume tier lookup.

use teamorder_core::{TierId, TierList};

/// Returns the id of the highest tier whose minimum is at most `quantity`.
///
/// Quantities below every threshold fall into the floor tier; there is no
/// "no tier" outcome.
#[must_use]
pub fn resolve_tier(quantity: u32, tiers: &TierList) -> TierId {
    tiers
        .iter()
        .find(|tier| tier.min_qty <= quantity)
        .unwrap_or_else(|| tiers.floor())
        .min_qty
}

/// Human-readable label for `id`, or the id itself when no tier matches.
#[must_use]
pub fn tier_label(id: TierId, tiers: &TierList) -> String {
    tiers
        .iter()
        .find(|tier| tier.min_qty == id)
        .map_or_else(|| id.to_string(), |tier| tier.label.clone())
}
