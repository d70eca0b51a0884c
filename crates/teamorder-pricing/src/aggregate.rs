//! Batch-wide counting and per-customer grouping of order rows.

use std::collections::{BTreeMap, HashMap};

use teamorder_core::pricing::ColorGroups;
use teamorder_core::{Customer, LineItem, OrderRow, ProductColorKey};

use crate::normalize::combination_key;

/// Units ordered per combination across the whole batch.
pub type Counts = BTreeMap<ProductColorKey, u32>;

/// Counts rows by (product, normalized color). Rows without a product are
/// skipped.
#[must_use]
pub fn count_by_product_color(rows: &[OrderRow], groups: &ColorGroups) -> Counts {
    let mut counts = Counts::new();
    for (idx, row) in rows.iter().enumerate() {
        let Some(product) = row.product_name() else {
            tracing::debug!(row = idx, email = %row.email, "skipping row without product");
            continue;
        };
        let key = combination_key(product, &row.color, groups);
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Groups rows into customers keyed by lower-cased email, preserving the
/// order in which customers and their items first appear. Rows without an
/// email never create a customer; rows without a product never become items.
#[must_use]
pub fn group_by_email(rows: &[OrderRow]) -> Vec<Customer> {
    let mut customers: Vec<Customer> = Vec::new();
    let mut index_by_email: HashMap<String, usize> = HashMap::new();

    for (idx, row) in rows.iter().enumerate() {
        let Some(email) = row.email_identity() else {
            tracing::debug!(row = idx, product = %row.product, "skipping row without email");
            continue;
        };
        if row.product_name().is_none() {
            tracing::debug!(row = idx, email = %email, "skipping row without product");
            continue;
        }

        let position = *index_by_email.entry(email.clone()).or_insert_with(|| {
            customers.push(Customer {
                email,
                name: row.name.trim().to_string(),
                phone: row.phone.trim().to_string(),
                items: Vec::new(),
            });
            customers.len() - 1
        });

        if let Some(customer) = customers.get_mut(position) {
            customer.items.push(LineItem::from(row));
        }
    }

    customers
}
