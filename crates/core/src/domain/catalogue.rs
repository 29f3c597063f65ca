use serde::{Deserialize, Serialize};

use super::customer::CustomerId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogueItemId(pub String);

impl CatalogueItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CatalogueItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CatalogueItemId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// A customer-specific product formulation with its ingredient descriptors.
///
/// `ingredients` holds the raw semicolon-separated entries from the source
/// data; each entry may itself be a comma-joined list and is tokenized by
/// the matcher, not here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogueItem {
    pub id: CatalogueItemId,
    pub customer_id: CustomerId,
    pub product_name: String,
    pub quantity_required: i64,
    pub category: String,
    pub description: String,
    pub ingredients: Vec<String>,
}
