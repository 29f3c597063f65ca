//! Cross-sell recommendation pipeline: customer classification,
//! embedding-based ingredient matching with process-lifetime caching,
//! external semantic confirmation, purchase dedup, and report assembly.

pub mod catalog;
pub mod classify;
pub mod config;
pub mod domain;
pub mod embedding;
pub mod engine;
pub mod errors;
pub mod matcher;
pub mod oracle;
pub mod report;

pub use catalog::CatalogSnapshot;
pub use classify::{classify, Classification, ClassificationCriteria, CustomerTier};
pub use domain::{
    CatalogueItem, CatalogueItemId, Customer, CustomerId, Product, ProductId, SalesRecord,
    StoreRecord,
};
pub use embedding::{
    cosine_similarity, CharFrequencyEmbedder, Embedding, EmbeddingCache, EmbeddingError,
    EmbeddingProvider,
};
pub use engine::RecommendationEngine;
pub use errors::ApplicationError;
pub use matcher::{clean_ingredient_tokens, MatchCandidate, SIMILARITY_THRESHOLD};
pub use oracle::{
    parse_reply, ConfirmationOracle, ConfirmationOutcome, ConfirmationRequest, FailPolicy,
};
pub use report::{
    AcceptedItem, AlreadyPurchasedItem, CrossSellEntry, CustomerInfo, ItemHeader,
    RecommendationReport, RecommendationStatus, RejectedItem, Summary,
};
