//! The pricing file: volume tiers, per-product price tables, flat fees,
//! tax and processing-fee parameters, and color groups.
//!
//! Loaded once per run and passed by reference into every pricing function.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A tier is identified by its minimum quantity.
pub type TierId = u32;

/// Unit price per tier for one product.
pub type PriceTable = BTreeMap<TierId, Decimal>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub min_qty: TierId,
    pub label: String,
}

/// Non-empty list of tiers, sorted by descending `min_qty`, with unique
/// minimums. The last entry is the floor tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierList {
    tiers: Vec<Tier>,
    floor: Tier,
}

impl TierList {
    /// Sorts `tiers` descending and validates them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the list is empty or two tiers
    /// share a minimum quantity.
    pub fn new(mut tiers: Vec<Tier>) -> Result<Self, ConfigError> {
        tiers.sort_by(|a, b| b.min_qty.cmp(&a.min_qty));

        let mut seen = HashSet::new();
        for tier in &tiers {
            if !seen.insert(tier.min_qty) {
                return Err(ConfigError::Validation(format!(
                    "duplicate tier min_qty {}",
                    tier.min_qty
                )));
            }
        }

        let floor = tiers
            .last()
            .cloned()
            .ok_or_else(|| ConfigError::Validation("at least one tier is required".to_string()))?;

        Ok(Self { tiers, floor })
    }

    /// Tiers in descending `min_qty` order.
    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter()
    }

    /// The tier with the smallest minimum; applies below every threshold.
    #[must_use]
    pub fn floor(&self) -> &Tier {
        &self.floor
    }

    pub fn ids(&self) -> impl Iterator<Item = TierId> + '_ {
        self.tiers.iter().map(|t| t.min_qty)
    }
}

/// Canonical color label → raw color synonyms that price as that label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorGroups {
    groups: BTreeMap<String, Vec<String>>,
    #[serde(skip)]
    canonical_by_raw: HashMap<String, String>,
}

impl ColorGroups {
    /// Builds the reverse index and checks that normalization stays
    /// idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if a canonical label is blank, a
    /// synonym belongs to two groups, or a canonical label is listed as a
    /// synonym of another group.
    pub fn new(groups: BTreeMap<String, Vec<String>>) -> Result<Self, ConfigError> {
        let mut canonical_by_raw = HashMap::new();
        for (canonical, synonyms) in &groups {
            if canonical.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "color group name must be non-empty".to_string(),
                ));
            }
            for raw in synonyms {
                if let Some(previous) = canonical_by_raw.insert(raw.clone(), canonical.clone()) {
                    if previous != *canonical {
                        return Err(ConfigError::Validation(format!(
                            "color '{raw}' is listed in both '{previous}' and '{canonical}'"
                        )));
                    }
                }
            }
        }

        for canonical in groups.keys() {
            if let Some(target) = canonical_by_raw.get(canonical) {
                if target != canonical {
                    return Err(ConfigError::Validation(format!(
                        "color group '{canonical}' is itself a synonym of '{target}'"
                    )));
                }
            }
        }

        Ok(Self {
            groups,
            canonical_by_raw,
        })
    }

    /// Canonical label for `raw`, if `raw` is a listed synonym.
    #[must_use]
    pub fn canonical_for(&self, raw: &str) -> Option<&str> {
        self.canonical_by_raw.get(raw).map(String::as_str)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.groups.iter()
    }
}

impl Default for ColorGroups {
    /// Light heathered shades are cut from the same blank and price as one
    /// "Gray" group.
    fn default() -> Self {
        let mut canonical_by_raw = HashMap::new();
        let synonyms = vec!["Birch White".to_string(), "Stonewash".to_string()];
        for raw in &synonyms {
            canonical_by_raw.insert(raw.clone(), "Gray".to_string());
        }
        let mut groups = BTreeMap::new();
        groups.insert("Gray".to_string(), synonyms);
        Self {
            groups,
            canonical_by_raw,
        }
    }
}

/// Percentage-plus-flat payment processing charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingFee {
    pub percent: Decimal,
    pub flat: Decimal,
}

impl Default for ProcessingFee {
    fn default() -> Self {
        Self {
            percent: Decimal::new(29, 3),
            flat: Decimal::new(30, 2),
        }
    }
}

/// Validated pricing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingConfig {
    /// Lower-case ISO 4217 code, e.g. `"usd"`.
    pub currency: String,
    pub tax_rate: Decimal,
    /// Batch-wide count a combination needs before it is invoiced at all.
    pub minimum_quantity: u32,
    pub embroidery_fee: Option<Decimal>,
    pub logo_fee: Option<Decimal>,
    pub folding_fee: Option<Decimal>,
    pub processing_fee: ProcessingFee,
    /// Invoicing-side tax rate attached to taxable lines. When unset, tax is
    /// billed as its own line.
    pub tax_rate_id: Option<String>,
    pub color_groups: ColorGroups,
    pub tiers: TierList,
    pub products: BTreeMap<String, PriceTable>,
}

impl PricingConfig {
    #[must_use]
    pub fn price_table(&self, product: &str) -> Option<&PriceTable> {
        self.products.get(product)
    }
}

/// Tier keys may be written as bare integers (YAML) or strings (JSON).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
enum RawTierKey {
    Int(u32),
    Str(String),
}

#[derive(Debug, Deserialize)]
struct PricingFile {
    currency: String,
    tax_rate: Decimal,
    minimum_quantity: Option<u32>,
    embroidery_fee: Option<Decimal>,
    logo_fee: Option<Decimal>,
    folding_fee: Option<Decimal>,
    processing_fee: Option<ProcessingFee>,
    tax_rate_id: Option<String>,
    color_groups: Option<BTreeMap<String, Vec<String>>>,
    tiers: Vec<Tier>,
    products: BTreeMap<String, BTreeMap<RawTierKey, Decimal>>,
}

/// Load and validate the pricing configuration from a YAML (or JSON) file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_pricing(path: &Path) -> Result<PricingConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PricingFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_pricing(&content)
}

/// Parse and validate pricing configuration text.
///
/// # Errors
///
/// Returns [`ConfigError::PricingFileParse`] for malformed YAML and
/// [`ConfigError::Validation`] for semantically invalid values.
pub fn parse_pricing(content: &str) -> Result<PricingConfig, ConfigError> {
    let file: PricingFile = serde_yaml::from_str(content)?;
    validate_pricing(file)
}

fn validate_pricing(file: PricingFile) -> Result<PricingConfig, ConfigError> {
    let currency = file.currency.trim().to_lowercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::Validation(format!(
            "currency '{}' must be a three-letter ISO code",
            file.currency
        )));
    }

    non_negative("tax_rate", file.tax_rate)?;
    for (name, fee) in [
        ("embroidery_fee", file.embroidery_fee),
        ("logo_fee", file.logo_fee),
        ("folding_fee", file.folding_fee),
    ] {
        if let Some(fee) = fee {
            non_negative(name, fee)?;
        }
    }

    let processing_fee = file.processing_fee.unwrap_or_default();
    non_negative("processing_fee.percent", processing_fee.percent)?;
    non_negative("processing_fee.flat", processing_fee.flat)?;

    let tiers = TierList::new(file.tiers)?;
    let minimum_quantity = file.minimum_quantity.unwrap_or(tiers.floor().min_qty);

    let color_groups = match file.color_groups {
        Some(groups) => ColorGroups::new(groups)?,
        None => ColorGroups::default(),
    };

    if file.products.is_empty() {
        return Err(ConfigError::Validation(
            "at least one product price table is required".to_string(),
        ));
    }

    let mut products = BTreeMap::new();
    for (name, raw_table) in file.products {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "product name must be non-empty".to_string(),
            ));
        }
        let table = price_table(&name, raw_table, &tiers)?;
        if products.insert(name.clone(), table).is_some() {
            return Err(ConfigError::Validation(format!(
                "duplicate product: '{name}'"
            )));
        }
    }

    let tax_rate_id = file
        .tax_rate_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());

    Ok(PricingConfig {
        currency,
        tax_rate: file.tax_rate,
        minimum_quantity,
        embroidery_fee: file.embroidery_fee,
        logo_fee: file.logo_fee,
        folding_fee: file.folding_fee,
        processing_fee,
        tax_rate_id,
        color_groups,
        tiers,
        products,
    })
}

fn price_table(
    product: &str,
    raw: BTreeMap<RawTierKey, Decimal>,
    tiers: &TierList,
) -> Result<PriceTable, ConfigError> {
    let mut table = PriceTable::new();
    for (key, price) in raw {
        let tier_id = match key {
            RawTierKey::Int(id) => id,
            RawTierKey::Str(s) => s.trim().parse::<TierId>().map_err(|_| {
                ConfigError::Validation(format!(
                    "product '{product}' has non-numeric tier key '{s}'"
                ))
            })?,
        };
        if !tiers.ids().any(|id| id == tier_id) {
            return Err(ConfigError::Validation(format!(
                "product '{product}' prices unknown tier {tier_id}"
            )));
        }
        non_negative(&format!("{product} price at tier {tier_id}"), price)?;
        table.insert(tier_id, price);
    }

    if let Some(missing) = tiers.ids().find(|id| !table.contains_key(id)) {
        return Err(ConfigError::Validation(format!(
            "product '{product}' has no price for tier {missing}"
        )));
    }

    Ok(table)
}

fn non_negative(field: &str, value: Decimal) -> Result<(), ConfigError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ConfigError::Validation(format!(
            "{field} must not be negative (got {value})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "pricing_test.rs"]
mod tests;
