use serde::{Deserialize, Serialize};

/// One purchased unit as exported by the order form. Customer fields repeat
/// on every row the customer submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    /// Free-form; identity is the trimmed, lower-cased value.
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Style")]
    pub style: String,
    #[serde(rename = "Size")]
    pub size: String,
    /// Color exactly as the customer picked it, before normalization.
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "Logo")]
    pub logo: String,
    #[serde(rename = "Embroidered Name")]
    pub embroidered_name: Option<String>,
    #[serde(rename = "Thread Color")]
    pub thread_color: Option<String>,
}

impl OrderRow {
    /// Lower-cased, trimmed email, or `None` when the row carries no email.
    #[must_use]
    pub fn email_identity(&self) -> Option<String> {
        let email = self.email.trim();
        if email.is_empty() {
            None
        } else {
            Some(email.to_lowercase())
        }
    }

    /// Trimmed product name, or `None` when blank.
    #[must_use]
    pub fn product_name(&self) -> Option<&str> {
        let product = self.product.trim();
        (!product.is_empty()).then_some(product)
    }
}

/// A single billable unit on a customer's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product: String,
    pub style: String,
    pub size: String,
    pub color: String,
    pub logo: String,
    pub embroidered_name: Option<String>,
    pub thread_color: Option<String>,
}

impl LineItem {
    /// The embroidered name with surrounding whitespace removed, or `None`
    /// when absent or blank.
    #[must_use]
    pub fn embroidery(&self) -> Option<&str> {
        non_blank(self.embroidered_name.as_deref())
    }

    #[must_use]
    pub fn thread(&self) -> Option<&str> {
        non_blank(self.thread_color.as_deref())
    }
}

impl From<&OrderRow> for LineItem {
    fn from(row: &OrderRow) -> Self {
        Self {
            product: row.product.trim().to_string(),
            style: row.style.trim().to_string(),
            size: row.size.trim().to_string(),
            color: row.color.trim().to_string(),
            logo: row.logo.trim().to_string(),
            embroidered_name: row.embroidered_name.clone(),
            thread_color: row.thread_color.clone(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// All rows sharing one email identity, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Lower-cased, trimmed email.
    pub email: String,
    pub name: String,
    pub phone: String,
    pub items: Vec<LineItem>,
}

/// The unit of tier assignment: a product in one normalized color group.
///
/// Two items with the same product but different groups are priced
/// independently; two raw colors collapsing to one group share a tier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductColorKey {
    pub product: String,
    /// Normalized (canonical) color.
    pub color: String,
}

impl ProductColorKey {
    #[must_use]
    pub fn new(product: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            color: color.into(),
        }
    }
}

/// Renders as `product|color`. Only used for logs and reports; maps key on
/// the struct itself.
impl std::fmt::Display for ProductColorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.product, self.color)
    }
}
