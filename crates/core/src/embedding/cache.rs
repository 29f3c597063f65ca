//! Process-lifetime embedding memoization.
//!
//! Product embeddings are computed once, up front, for the whole catalog and
//! kept in catalog insertion order. Ingredient embeddings are computed on
//! first use and memoized by exact cleaned token. Both sides are unbounded;
//! that is acceptable for the small fixed catalogs this pipeline targets and
//! documented as unsafe for unbounded vocabularies.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::{Product, ProductId};

use super::{Embedding, EmbeddingError, EmbeddingProvider};

pub struct EmbeddingCache {
    provider: Arc<dyn EmbeddingProvider>,
    // Insertion order matters: the matcher scans products in catalog order.
    products: Vec<(ProductId, Embedding)>,
    ingredients: Mutex<HashMap<String, Embedding>>,
}

impl EmbeddingCache {
    /// Build the cache and precompute an embedding for every catalog product,
    /// keyed by product id so duplicate product names cannot silently collide.
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        products: &[Product],
    ) -> Result<Self, EmbeddingError> {
        let mut product_embeddings = Vec::with_capacity(products.len());
        for product in products {
            let embedding = provider.embed(&product.name)?;
            product_embeddings.push((product.id.clone(), embedding));
        }

        tracing::debug!(
            event_name = "embedding.cache.products_precomputed",
            product_count = product_embeddings.len(),
            "precomputed product embeddings"
        );

        Ok(Self { provider, products: product_embeddings, ingredients: Mutex::new(HashMap::new()) })
    }

    /// All product embeddings in catalog insertion order.
    pub fn product_embeddings(&self) -> &[(ProductId, Embedding)] {
        &self.products
    }

    /// Fetch or compute the embedding for a cleaned ingredient token.
    /// Repeated requests for the same token hit the memo and perform exactly
    /// one provider call in total.
    pub fn ingredient_embedding(&self, token: &str) -> Result<Embedding, EmbeddingError> {
        {
            let cache = self.ingredients.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = cache.get(token) {
                return Ok(cached.clone());
            }
        }

        // Provider call happens outside the lock; a racing duplicate insert
        // writes the same value, so last-writer-wins is harmless.
        let embedding = self.provider.embed(token)?;
        self.ingredients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.to_owned(), embedding.clone());

        Ok(embedding)
    }

    pub fn ingredient_cache_len(&self) -> usize {
        self.ingredients.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Explicit lifecycle escape hatch: drop every memoized ingredient
    /// embedding. Product embeddings are a pure function of the immutable
    /// catalog and are kept.
    pub fn reset_ingredient_cache(&self) {
        self.ingredients.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl std::fmt::Debug for EmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCache")
            .field("product_count", &self.products.len())
            .field("ingredient_cache_len", &self.ingredient_cache_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Counts provider calls so tests can assert memoization behavior.
    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl EmbeddingProvider for CountingProvider {
        fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f32, 1.0])
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    fn products() -> Vec<Product> {
        vec![
            Product {
                id: "P001".into(),
                name: "Wheat Flour".to_string(),
                category: "Baking".to_string(),
                price: 12.5,
            },
            Product {
                id: "P002".into(),
                name: "Olive Oil".to_string(),
                category: "Oils".to_string(),
                price: 30.0,
            },
        ]
    }

    #[test]
    fn product_embeddings_are_precomputed_in_catalog_order() {
        let provider = Arc::new(CountingProvider::default());
        let cache = EmbeddingCache::new(provider.clone(), &products()).expect("cache");

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        let ids: Vec<&str> =
            cache.product_embeddings().iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["P001", "P002"]);
    }

    #[test]
    fn repeated_ingredient_lookup_embeds_exactly_once() {
        let provider = Arc::new(CountingProvider::default());
        let cache = EmbeddingCache::new(provider.clone(), &[]).expect("cache");

        let first = cache.ingredient_embedding("Cocoa Powder").expect("embed");
        let second = cache.ingredient_embedding("Cocoa Powder").expect("embed");

        assert_eq!(first, second);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.ingredient_cache_len(), 1);
    }

    #[test]
    fn distinct_tokens_are_cached_separately() {
        let provider = Arc::new(CountingProvider::default());
        let cache = EmbeddingCache::new(provider.clone(), &[]).expect("cache");

        cache.ingredient_embedding("Flour").expect("embed");
        cache.ingredient_embedding("flour").expect("embed");

        // Keys are exact cleaned tokens; casing differences are distinct.
        assert_eq!(cache.ingredient_cache_len(), 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn reset_clears_ingredients_but_keeps_products() {
        let provider = Arc::new(CountingProvider::default());
        let cache = EmbeddingCache::new(provider.clone(), &products()).expect("cache");

        cache.ingredient_embedding("Yeast").expect("embed");
        assert_eq!(cache.ingredient_cache_len(), 1);

        cache.reset_ingredient_cache();
        assert_eq!(cache.ingredient_cache_len(), 0);
        assert_eq!(cache.product_embeddings().len(), 2);

        // Next lookup recomputes.
        cache.ingredient_embedding("Yeast").expect("embed");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    }
}
