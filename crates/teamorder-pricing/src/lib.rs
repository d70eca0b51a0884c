//! Volume-tier pricing engine.
//!
//! Pure functions only: order rows and a [`PricingConfig`] go in, an
//! [`InvoicePlan`] comes out. Tiers are resolved per (product, normalized
//! color) combination over the whole batch, so the plan must be built from
//! the complete set of rows before any customer is invoiced.
//!
//! [`PricingConfig`]: teamorder_core::PricingConfig

pub mod aggregate;
pub mod compose;
pub mod describe;
pub mod eligibility;
pub mod error;
pub mod normalize;
pub mod plan;
pub mod tiers;
pub mod totals;

pub use aggregate::{count_by_product_color, group_by_email, Counts};
pub use compose::{build_tier_map, price_item, to_minor_units, PricedItem, TierMap};
pub use describe::format_item_description;
pub use eligibility::{filter_by_minimum, MinimumPolicy, Partition};
pub use error::PricingError;
pub use normalize::{combination_key, normalize_color};
pub use plan::{
    plan_invoices, CombinationSummary, ExcludedItem, InvoicePlan, InvoiceRequest,
    LineItemRequest, SkippedItem,
};
pub use tiers::{resolve_tier, tier_label};
pub use totals::{calculate_processing_fee, calculate_tax, OrderTotals};

#[cfg(test)]
pub(crate) mod test_support;
