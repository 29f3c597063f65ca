//! The assembled recommendation report.
//!
//! This is the stable contract consumed by the API and report layers; field
//! names are part of that contract and must not be renamed or restructured.

use serde::Serialize;

use crate::classify::Classification;
use crate::domain::{CatalogueItemId, CustomerId, ProductId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RecommendationStatus {
    Accepted,
    Rejected,
    #[serde(rename = "Already Purchased")]
    AlreadyPurchased,
}

/// One cross-sell lead: an ingredient the customer formulates with, matched
/// to a catalog product, with the oracle's reasoning attached.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrossSellEntry {
    #[serde(rename = "Ingredient")]
    pub ingredient: String,
    #[serde(rename = "SuggestedProduct")]
    pub suggested_product: String,
    #[serde(rename = "ProductID")]
    pub product_id: ProductId,
    #[serde(rename = "Similarity")]
    pub similarity: f64,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "AIReasoning")]
    pub reasoning: String,
    #[serde(rename = "Status")]
    pub status: RecommendationStatus,
}

/// Catalogue-item fields repeated at the head of every per-item group.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ItemHeader {
    #[serde(rename = "CustomerCatalogueItemID")]
    pub item_id: CatalogueItemId,
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "QuantityRequired")]
    pub quantity_required: i64,
    #[serde(rename = "Ingredients")]
    pub ingredients: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AcceptedItem {
    #[serde(flatten)]
    pub header: ItemHeader,
    #[serde(rename = "CrossSell")]
    pub cross_sell: Vec<CrossSellEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RejectedItem {
    #[serde(flatten)]
    pub header: ItemHeader,
    #[serde(rename = "RejectedCrossSell")]
    pub rejected_cross_sell: Vec<CrossSellEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlreadyPurchasedItem {
    #[serde(flatten)]
    pub header: ItemHeader,
    #[serde(rename = "AlreadyPurchasedCrossSell")]
    pub already_purchased_cross_sell: Vec<CrossSellEntry>,
}

/// Summary counts, one per catalogue-item group in each collection (not
/// per nested entry). Up-sell analysis is disabled upstream, so its count
/// is always zero and total recommendations equals the cross-sell count.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    #[serde(rename = "TotalUpSell")]
    pub total_up_sell: usize,
    #[serde(rename = "TotalCrossSell")]
    pub total_cross_sell: usize,
    #[serde(rename = "TotalRejected")]
    pub total_rejected: usize,
    #[serde(rename = "TotalAlreadyPurchased")]
    pub total_already_purchased: usize,
    #[serde(rename = "TotalRecommendations")]
    pub total_recommendations: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerInfo {
    #[serde(rename = "CustomerID")]
    pub customer_id: CustomerId,
    #[serde(rename = "CustomerName")]
    pub customer_name: String,
}

/// The four-part result returned to the caller. Always well-formed: unknown
/// customers get empty collections and a null classification rather than an
/// error, so callers distinguish "no recommendations" from "unknown
/// customer" by checking [`RecommendationReport::is_classified`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendationReport {
    #[serde(rename = "CustomerInfo")]
    pub customer_info: CustomerInfo,
    #[serde(rename = "CustomerClassification")]
    pub classification: Option<Classification>,
    #[serde(rename = "AcceptedRecommendations")]
    pub accepted: Vec<AcceptedItem>,
    #[serde(rename = "RejectedRecommendations")]
    pub rejected: Vec<RejectedItem>,
    #[serde(rename = "AlreadyPurchasedRecommendations")]
    pub already_purchased: Vec<AlreadyPurchasedItem>,
    #[serde(rename = "Summary")]
    pub summary: Summary,
}

impl RecommendationReport {
    /// An all-empty report for an unknown customer id.
    pub fn empty(customer_info: CustomerInfo) -> Self {
        Self {
            customer_info,
            classification: None,
            accepted: Vec::new(),
            rejected: Vec::new(),
            already_purchased: Vec::new(),
            summary: Summary::default(),
        }
    }

    pub fn is_classified(&self) -> bool {
        self.classification.is_some()
    }
}

/// Similarity scores are reported to three decimal places.
pub fn round_similarity(similarity: f32) -> f64 {
    (f64::from(similarity) * 1000.0).round() / 1000.0
}
