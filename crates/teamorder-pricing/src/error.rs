use thiserror::Error;

use teamorder_core::TierId;

/// Per-item pricing failures. Never fatal to a run: the item is skipped and
/// the rest of the customer's order is still priced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("no price table for product '{product}'")]
    UnknownProduct { product: String },

    #[error("product '{product}' has no price at tier {tier}")]
    MissingTierPrice { product: String, tier: TierId },
}
