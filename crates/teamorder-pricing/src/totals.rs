//! Per-customer subtotal, tax, and payment-processing fee.
//!
//! Everything stays in unrounded currency units; rounding to cents happens
//! only when line items are emitted.

use rust_decimal::Decimal;
use serde::Serialize;
use teamorder_core::{PricingConfig, ProcessingFee};

#[must_use]
pub fn calculate_tax(subtotal: Decimal, rate: Decimal) -> Decimal {
    subtotal * rate
}

/// Percentage-plus-flat processing charge on `amount`.
#[must_use]
pub fn calculate_processing_fee(amount: Decimal, fee: &ProcessingFee) -> Decimal {
    amount * fee.percent + fee.flat
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    /// Tax on the subtotal only.
    pub tax: Decimal,
    /// Charged on subtotal plus tax; never taxed itself.
    pub processing_fee: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Totals for a customer's eligible unit prices.
    pub fn from_unit_prices<I>(prices: I, config: &PricingConfig) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        let subtotal: Decimal = prices.into_iter().sum();
        let tax = calculate_tax(subtotal, config.tax_rate);
        let processing_fee = calculate_processing_fee(subtotal + tax, &config.processing_fee);
        Self {
            subtotal,
            tax,
            processing_fee,
            total: subtotal + tax + processing_fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dec, pricing};

    #[test]
    fn tax_on_subtotal() {
        assert_eq!(calculate_tax(dec("300.00"), dec("0.0725")), dec("21.75"));
    }

    #[test]
    fn processing_fee_is_unrounded() {
        let fee = calculate_processing_fee(dec("321.75"), &ProcessingFee::default());
        assert_eq!(fee, dec("9.63075"));
    }

    #[test]
    fn processing_fee_on_zero_is_flat_part() {
        let fee = calculate_processing_fee(Decimal::ZERO, &ProcessingFee::default());
        assert_eq!(fee, dec("0.30"));
    }

    #[test]
    fn configurable_processing_fee() {
        let fee = ProcessingFee {
            percent: dec("0.03"),
            flat: Decimal::ZERO,
        };
        assert_eq!(calculate_processing_fee(dec("100"), &fee), dec("3"));
    }

    #[test]
    fn totals_compose_in_order() {
        let cfg = pricing();
        let totals =
            OrderTotals::from_unit_prices([dec("100.00"), dec("150.00"), dec("50.00")], &cfg);
        assert_eq!(totals.subtotal, dec("300.00"));
        assert_eq!(totals.tax, dec("21.75"));
        assert_eq!(totals.processing_fee, dec("9.63075"));
        assert_eq!(totals.total, dec("331.38075"));
    }
}
