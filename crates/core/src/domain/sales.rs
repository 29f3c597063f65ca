use serde::{Deserialize, Serialize};

use super::customer::CustomerId;
use super::product::ProductId;

/// A single sales line. Consumed only in aggregate: quantity sums for
/// classification and product-id set membership for purchase dedup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: i64,
}

/// One physical store operated by a customer. Only counted, never inspected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub customer_id: CustomerId,
    pub store_id: String,
}
