//! The recommendation engine: classification, ingredient matching, oracle
//! confirmation, purchase dedup, and report assembly.

use std::sync::Arc;

use crate::catalog::CatalogSnapshot;
use crate::classify::classify;
use crate::domain::{CatalogueItem, Customer, CustomerId};
use crate::embedding::{EmbeddingCache, EmbeddingProvider};
use crate::errors::ApplicationError;
use crate::matcher::{candidates_for_token, clean_ingredient_tokens};
use crate::oracle::{ConfirmationOracle, ConfirmationRequest};
use crate::report::{
    round_similarity, AcceptedItem, AlreadyPurchasedItem, CrossSellEntry, CustomerInfo,
    ItemHeader, RecommendationReport, RecommendationStatus, RejectedItem, Summary,
};

/// Owns the catalog snapshot and both embedding caches for its lifetime.
///
/// Execution is sequential per request; the candidate loop blocks on each
/// oracle call, so end-to-end latency grows linearly with candidate count.
/// The ingredient cache is interior-mutable, which makes a shared engine
/// safe to call from one request at a time per instance (or behind the
/// server's shared state) without extra locking by the caller.
pub struct RecommendationEngine {
    snapshot: CatalogSnapshot,
    embeddings: EmbeddingCache,
    oracle: Arc<dyn ConfirmationOracle>,
}

impl RecommendationEngine {
    /// Build the engine and precompute product embeddings for the whole
    /// catalog. Fails only if the embedding provider cannot embed a product
    /// name, which is fatal at startup.
    pub fn new(
        snapshot: CatalogSnapshot,
        provider: Arc<dyn EmbeddingProvider>,
        oracle: Arc<dyn ConfirmationOracle>,
    ) -> Result<Self, ApplicationError> {
        let embeddings = EmbeddingCache::new(provider, snapshot.products())?;
        Ok(Self { snapshot, embeddings, oracle })
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn customers(&self) -> &[Customer] {
        self.snapshot.customers()
    }

    pub fn classify(&self, customer_id: &CustomerId) -> Option<crate::classify::Classification> {
        classify(&self.snapshot, customer_id)
    }

    /// Drop all memoized ingredient embeddings. Product embeddings stay:
    /// they are a pure function of the immutable catalog.
    pub fn reset_ingredient_cache(&self) {
        self.embeddings.reset_ingredient_cache();
    }

    pub fn ingredient_cache_len(&self) -> usize {
        self.embeddings.ingredient_cache_len()
    }

    /// Generate the full four-part recommendation report for one customer.
    ///
    /// Unknown customers yield an all-empty report with a null
    /// classification rather than an error; an empty catalogue yields the
    /// classification with empty collections.
    pub async fn recommend(
        &self,
        customer_id: &CustomerId,
    ) -> Result<RecommendationReport, ApplicationError> {
        let Some(customer) = self.snapshot.customer(customer_id) else {
            tracing::warn!(
                event_name = "engine.customer.unknown",
                customer_id = %customer_id,
                "customer not found in snapshot; returning empty report"
            );
            return Ok(RecommendationReport::empty(CustomerInfo {
                customer_id: customer_id.clone(),
                customer_name: "Unknown".to_string(),
            }));
        };

        let classification = classify(&self.snapshot, customer_id);
        let purchased = self.snapshot.purchased_product_ids(customer_id);
        let items = self.snapshot.catalogue_for(customer_id);

        tracing::info!(
            event_name = "engine.recommend.start",
            customer_id = %customer_id,
            catalogue_items = items.len(),
            purchased_products = purchased.len(),
            cross_sell_pool = self.snapshot.unsold_products(customer_id).len(),
            "generating recommendations"
        );

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        let mut already_purchased = Vec::new();

        for item in items {
            let buckets = self.analyze_item(item, &purchased).await?;

            let header = ItemHeader {
                item_id: item.id.clone(),
                product_name: item.product_name.clone(),
                quantity_required: item.quantity_required,
                ingredients: item.ingredients.clone(),
            };

            // Items with no entries of a kind are omitted from that
            // collection entirely, never emitted as empty placeholders.
            if !buckets.accepted.is_empty() {
                accepted
                    .push(AcceptedItem { header: header.clone(), cross_sell: buckets.accepted });
            }
            if !buckets.rejected.is_empty() {
                rejected.push(RejectedItem {
                    header: header.clone(),
                    rejected_cross_sell: buckets.rejected,
                });
            }
            if !buckets.already_purchased.is_empty() {
                already_purchased.push(AlreadyPurchasedItem {
                    header,
                    already_purchased_cross_sell: buckets.already_purchased,
                });
            }
        }

        let summary = summarize(&accepted, &rejected, &already_purchased);

        tracing::info!(
            event_name = "engine.recommend.done",
            customer_id = %customer_id,
            total_cross_sell = summary.total_cross_sell,
            total_rejected = summary.total_rejected,
            total_already_purchased = summary.total_already_purchased,
            "recommendation run complete"
        );

        Ok(RecommendationReport {
            customer_info: CustomerInfo {
                customer_id: customer.id.clone(),
                customer_name: customer.name.clone(),
            },
            classification,
            accepted,
            rejected,
            already_purchased,
            summary,
        })
    }

    /// Run the ingredient x product scan for one catalogue item and route
    /// every confirmed/rejected outcome into its bucket.
    async fn analyze_item(
        &self,
        item: &CatalogueItem,
        purchased: &std::collections::HashSet<crate::domain::ProductId>,
    ) -> Result<ItemBuckets, ApplicationError> {
        let mut buckets = ItemBuckets::default();

        let tokens = clean_ingredient_tokens(&item.ingredients);
        if tokens.is_empty() {
            return Ok(buckets);
        }

        tracing::debug!(
            event_name = "engine.item.tokens",
            item_id = %item.id,
            token_count = tokens.len(),
            "processing cleaned ingredient tokens"
        );

        let ingredient_text = item.ingredients.join("; ");

        for token in &tokens {
            for candidate in candidates_for_token(&self.embeddings, token)? {
                // A candidate whose product id resolves to no catalog row is
                // malformed upstream data and is skipped silently.
                let Some(product) = self.snapshot.product(&candidate.product_id) else {
                    continue;
                };

                let request = ConfirmationRequest {
                    ingredient: candidate.ingredient.clone(),
                    candidate_product: product.name.clone(),
                    catalogue_item_name: item.product_name.clone(),
                    category: item.category.clone(),
                    description: item.description.clone(),
                    ingredient_text: ingredient_text.clone(),
                };

                // One synchronous oracle call per candidate; never cached.
                let outcome = self.oracle.confirm(&request).await;

                let status = if !outcome.confirmed {
                    RecommendationStatus::Rejected
                } else if purchased.contains(&product.id) {
                    RecommendationStatus::AlreadyPurchased
                } else {
                    RecommendationStatus::Accepted
                };

                let entry = CrossSellEntry {
                    ingredient: candidate.ingredient.clone(),
                    suggested_product: product.name.clone(),
                    product_id: product.id.clone(),
                    similarity: round_similarity(candidate.similarity),
                    category: product.category.clone(),
                    price: product.price,
                    reasoning: outcome.reasoning,
                    status,
                };

                match status {
                    RecommendationStatus::Accepted => buckets.accepted.push(entry),
                    RecommendationStatus::Rejected => buckets.rejected.push(entry),
                    RecommendationStatus::AlreadyPurchased => {
                        buckets.already_purchased.push(entry)
                    }
                }
            }
        }

        Ok(buckets)
    }
}

#[derive(Debug, Default)]
struct ItemBuckets {
    accepted: Vec<CrossSellEntry>,
    rejected: Vec<CrossSellEntry>,
    already_purchased: Vec<CrossSellEntry>,
}

// Summary counts are per catalogue-item group, not per nested entry: an
// item with three accepted leads still contributes one to TotalCrossSell.
fn summarize(
    accepted: &[AcceptedItem],
    rejected: &[RejectedItem],
    already_purchased: &[AlreadyPurchasedItem],
) -> Summary {
    Summary {
        total_up_sell: 0,
        total_cross_sell: accepted.len(),
        total_rejected: rejected.len(),
        total_already_purchased: already_purchased.len(),
        total_recommendations: accepted.len(),
    }
}
