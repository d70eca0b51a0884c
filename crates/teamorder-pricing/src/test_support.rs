use rust_decimal::Decimal;
use teamorder_core::{LineItem, OrderRow, PricingConfig};

pub(crate) fn dec(s: &str) -> Decimal {
    s.parse().expect("test decimal literal")
}

pub(crate) fn row(email: &str, product: &str, color: &str) -> OrderRow {
    OrderRow {
        name: "Test Customer".to_owned(),
        phone: "555-0100".to_owned(),
        email: email.to_owned(),
        product: product.to_owned(),
        style: "Softshell".to_owned(),
        size: "M".to_owned(),
        color: color.to_owned(),
        logo: "Left Chest".to_owned(),
        embroidered_name: None,
        thread_color: None,
    }
}

pub(crate) fn item(product: &str, color: &str) -> LineItem {
    LineItem::from(&row("x@example.com", product, color))
}

pub(crate) fn embroidered(product: &str, color: &str, name: &str, thread: &str) -> LineItem {
    let mut item = item(product, color);
    item.embroidered_name = Some(name.to_owned());
    item.thread_color = Some(thread.to_owned());
    item
}

pub(crate) const PRICING_YAML: &str = r#"
currency: usd
tax_rate: "0.0725"
minimum_quantity: 6
embroidery_fee: "8.00"
logo_fee: "10.00"
folding_fee: "0.75"
tiers:
  - { min_qty: 6, label: "6-17 units" }
  - { min_qty: 18, label: "18-35 units" }
  - { min_qty: 36, label: "36+ units" }
products:
  Jacket: { 6: "175.00", 18: "173.58", 36: "168.00" }
  Vest: { 6: "120.00", 18: "115.00", 36: "110.00" }
"#;

pub(crate) fn pricing() -> PricingConfig {
    teamorder_core::parse_pricing(PRICING_YAML).expect("fixture pricing must parse")
}

/// Same tiers and prices without any flat fees.
pub(crate) fn pricing_without_fees() -> PricingConfig {
    let mut cfg = pricing();
    cfg.embroidery_fee = None;
    cfg.logo_fee = None;
    cfg.folding_fee = None;
    cfg
}
