//! Ingredient tokenization and embedding-based candidate matching.

use crate::domain::ProductId;
use crate::embedding::{cosine_similarity, EmbeddingCache, EmbeddingError};

/// Candidates must score strictly above this cosine similarity.
pub const SIMILARITY_THRESHOLD: f32 = 0.70;

/// Commodity ingredients that never make useful cross-sell leads.
const STOP_LIST: &[&str] = &["water", "salt", "sugar"];

/// Strict comparison: a score sitting exactly on the threshold is excluded.
pub fn clears_threshold(similarity: f32) -> bool {
    similarity > SIMILARITY_THRESHOLD
}

/// An (ingredient, product) pair that cleared the similarity threshold and
/// awaits oracle confirmation. Ephemeral; one is produced per surviving
/// ingredient x product combination.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchCandidate {
    pub ingredient: String,
    pub product_id: ProductId,
    pub similarity: f32,
}

/// Split raw ingredient entries into cleaned tokens.
///
/// Each entry may itself be a comma-joined list. Tokens are trimmed, empties
/// and stop-list words dropped (case-insensitively), and duplicates within
/// one catalogue item removed while preserving first-seen order, so the
/// oracle is consulted once per distinct token per item.
pub fn clean_ingredient_tokens(raw_entries: &[String]) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    for entry in raw_entries {
        for part in entry.split(',') {
            let cleaned = part.trim();
            if cleaned.is_empty() {
                continue;
            }
            let lowered = cleaned.to_lowercase();
            if STOP_LIST.contains(&lowered.as_str()) {
                continue;
            }
            if tokens.iter().any(|existing| existing.eq_ignore_ascii_case(cleaned)) {
                continue;
            }
            tokens.push(cleaned.to_owned());
        }
    }

    tokens
}

/// Scan every product embedding (catalog insertion order) against one
/// ingredient token and keep the pairs above [`SIMILARITY_THRESHOLD`].
pub fn candidates_for_token(
    cache: &EmbeddingCache,
    token: &str,
) -> Result<Vec<MatchCandidate>, EmbeddingError> {
    let ingredient_embedding = cache.ingredient_embedding(token)?;

    let mut candidates = Vec::new();
    for (product_id, product_embedding) in cache.product_embeddings() {
        let similarity = cosine_similarity(&ingredient_embedding, product_embedding);
        if clears_threshold(similarity) {
            candidates.push(MatchCandidate {
                ingredient: token.to_owned(),
                product_id: product_id.clone(),
                similarity,
            });
        }
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::Product;
    use crate::embedding::{Embedding, EmbeddingProvider};

    #[test]
    fn stop_list_words_are_dropped_case_insensitively() {
        let tokens = clean_ingredient_tokens(&["Water, Flour, Salt".to_string()]);
        assert_eq!(tokens, vec!["Flour".to_string()]);

        let tokens = clean_ingredient_tokens(&["SUGAR, water".to_string()]);
        assert!(tokens.is_empty());
    }

    #[test]
    fn tokens_are_trimmed_and_empties_skipped() {
        let tokens =
            clean_ingredient_tokens(&["  Cocoa Powder ,, Vanilla ".to_string(), String::new()]);
        assert_eq!(tokens, vec!["Cocoa Powder".to_string(), "Vanilla".to_string()]);
    }

    #[test]
    fn duplicate_tokens_within_an_item_are_deduplicated_in_order() {
        let tokens = clean_ingredient_tokens(&[
            "Flour, Butter".to_string(),
            "flour, Milk".to_string(),
            "Butter".to_string(),
        ]);
        assert_eq!(
            tokens,
            vec!["Flour".to_string(), "Butter".to_string(), "Milk".to_string()]
        );
    }

    /// Embeds every product to a fixed direction and lets the test pick the
    /// similarity each ingredient scores against it.
    struct ScriptedProvider;

    impl EmbeddingProvider for ScriptedProvider {
        fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
            // Unit vectors at a chosen angle from the product axis (1, 0).
            let cos = match text {
                "far-off" => 0.30,
                "strong" => 0.95,
                _ => 1.0, // products and anything else sit on the axis
            };
            let sin = (1.0f32 - cos * cos).max(0.0).sqrt();
            Ok(vec![cos, sin])
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    fn cache() -> EmbeddingCache {
        let products = vec![Product {
            id: "P001".into(),
            name: "Axis Product".to_string(),
            category: "Test".to_string(),
            price: 1.0,
        }];
        EmbeddingCache::new(Arc::new(ScriptedProvider), &products).expect("cache")
    }

    #[test]
    fn threshold_boundary_is_strict() {
        assert!(!clears_threshold(0.70));
        assert!(clears_threshold(0.7001));
        assert!(!clears_threshold(0.69));
    }

    #[test]
    fn low_similarity_token_yields_no_candidates() {
        let candidates = candidates_for_token(&cache(), "far-off").expect("scan");
        assert!(candidates.is_empty());
    }

    #[test]
    fn strong_match_carries_token_and_score() {
        let candidates = candidates_for_token(&cache(), "strong").expect("scan");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].ingredient, "strong");
        assert!((candidates[0].similarity - 0.95).abs() < 1e-3);
    }
}
