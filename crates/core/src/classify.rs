//! Customer tier classification from sales volume and store count.

use serde::Serialize;

use crate::catalog::CatalogSnapshot;
use crate::domain::CustomerId;

const LARGE_STORE_COUNT: usize = 50;
const LARGE_TOTAL_QUANTITY: i64 = 200_000;
const MEDIUM_STORE_COUNT_MIN: usize = 25;
const MEDIUM_TOTAL_QUANTITY_MIN: i64 = 50_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CustomerTier {
    LargeScale,
    MediumScale,
    SmallScale,
}

impl CustomerTier {
    /// The business label the downstream report layer expects.
    pub fn label(&self) -> &'static str {
        match self {
            Self::LargeScale => "CHG Own Sales Customer",
            Self::MediumScale => "Distributor Customer",
            Self::SmallScale => "Small Customer",
        }
    }
}

/// Audit flags showing which rule inputs fired, regardless of which rule won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ClassificationCriteria {
    #[serde(rename = "StoresGreaterThan50")]
    pub stores_greater_than_50: bool,
    #[serde(rename = "QuantityGreaterThan200K")]
    pub quantity_greater_than_200k: bool,
    #[serde(rename = "StoresBetween25And50")]
    pub stores_between_25_and_50: bool,
    #[serde(rename = "QuantityBetween50KAnd200K")]
    pub quantity_between_50k_and_200k: bool,
}

/// Result of classifying one customer. Pure function of the snapshot;
/// recomputed on every request, never persisted, and serialize-only: the
/// skipped `tier` makes a deserialized value lossy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Classification {
    #[serde(skip)]
    pub tier: CustomerTier,
    #[serde(rename = "CustomerType")]
    pub customer_type: String,
    #[serde(rename = "TotalQuantitySold")]
    pub total_quantity: i64,
    #[serde(rename = "NumberOfStores")]
    pub store_count: usize,
    #[serde(rename = "ClassificationCriteria")]
    pub criteria: ClassificationCriteria,
}

/// Classify a customer. Returns `None` only when the customer id is not in
/// the snapshot; the caller maps that to an empty report, not an error.
pub fn classify(snapshot: &CatalogSnapshot, customer_id: &CustomerId) -> Option<Classification> {
    snapshot.customer(customer_id)?;

    let total_quantity = snapshot.total_sales_quantity(customer_id);
    let store_count = snapshot.store_count(customer_id);

    Some(classify_measures(total_quantity, store_count))
}

/// Decision rule, evaluated in fixed priority order; first match wins, so
/// ties on a boundary resolve toward the higher tier rule that uses strict
/// comparison.
pub fn classify_measures(total_quantity: i64, store_count: usize) -> Classification {
    let criteria = ClassificationCriteria {
        stores_greater_than_50: store_count > LARGE_STORE_COUNT,
        quantity_greater_than_200k: total_quantity > LARGE_TOTAL_QUANTITY,
        stores_between_25_and_50: (MEDIUM_STORE_COUNT_MIN..=LARGE_STORE_COUNT)
            .contains(&store_count),
        quantity_between_50k_and_200k: total_quantity > MEDIUM_TOTAL_QUANTITY_MIN
            && total_quantity <= LARGE_TOTAL_QUANTITY,
    };

    let tier = if criteria.stores_greater_than_50 || criteria.quantity_greater_than_200k {
        CustomerTier::LargeScale
    } else if criteria.stores_between_25_and_50 || criteria.quantity_between_50k_and_200k {
        CustomerTier::MediumScale
    } else {
        CustomerTier::SmallScale
    };

    Classification {
        tier,
        customer_type: tier.label().to_string(),
        total_quantity,
        store_count,
        criteria,
    }
}
