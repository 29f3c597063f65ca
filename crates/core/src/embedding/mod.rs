//! Embedding provider seam and vector similarity.
//!
//! The model itself is an external collaborator: anything that maps text to
//! a fixed-length vector comparable by cosine similarity can sit behind
//! [`EmbeddingProvider`].

pub mod cache;

pub use cache::EmbeddingCache;

use thiserror::Error;

/// Fixed-length vector representation of a piece of text.
pub type Embedding = Vec<f32>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EmbeddingError {
    #[error("embedding provider failure: {0}")]
    Provider(String),
}

/// Maps text into vector space. Implementations may call a local model or a
/// remote embedding API; the pipeline only assumes determinism within a run.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Dimensionality of the vectors this provider produces.
    fn dimensions(&self) -> usize;
}

/// Cosine similarity in [-1.0, 1.0]. Returns 0.0 for mismatched lengths or
/// zero-magnitude vectors rather than dividing by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

/// Deterministic character-frequency embedder.
///
/// Stands in when no real sentence-embedding model is wired up: similar
/// strings land near each other, identical strings embed identically, and no
/// network or model weights are involved. Not a substitute for a trained
/// model in production matching quality.
#[derive(Clone, Debug)]
pub struct CharFrequencyEmbedder {
    dims: usize,
}

impl CharFrequencyEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims: dims.max(1) }
    }
}

impl Default for CharFrequencyEmbedder {
    fn default() -> Self {
        Self::new(128)
    }
}

impl EmbeddingProvider for CharFrequencyEmbedder {
    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let normalized = text.to_lowercase();
        let mut vector = vec![0.0f32; self.dims];

        for (position, byte) in normalized.bytes().enumerate() {
            let index = (byte as usize + position) % self.dims;
            vector[index] += 1.0;
        }

        let magnitude: f32 = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }

        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let vector = vec![0.4, 0.2, 0.9];
        assert!((cosine_similarity(&vector, &vector) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_of_opposite_vectors_is_negative_one() {
        let similarity = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]);
        assert!((similarity + 1.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_lengths_and_zero_vectors_yield_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn char_frequency_embedder_is_deterministic_and_case_insensitive() {
        let embedder = CharFrequencyEmbedder::default();
        let first = embedder.embed("Wheat Flour").expect("embed");
        let second = embedder.embed("wheat flour").expect("embed");

        assert_eq!(first.len(), embedder.dimensions());
        assert_eq!(first, second);
    }

    #[test]
    fn char_frequency_embedder_produces_unit_vectors() {
        let embedder = CharFrequencyEmbedder::new(64);
        let vector = embedder.embed("ingredient").expect("embed");
        let magnitude: f32 = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-5);
    }
}
