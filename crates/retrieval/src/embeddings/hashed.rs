//! Feature-hashed embedding provider.
//!
//! Deterministic, offline embeddings built from hashed word and character
//! trigram features. Not semantically deep like a neural model, but stable
//! across runs and content-dependent: similar wording lands on similar
//! vectors, which is what the retrieval layer needs when no model server is
//! available.

use super::{normalize, EmbeddingProvider};
use verdict_core::AppResult;

/// Local feature-hashing embedder.
pub struct HashedProvider {
    dimensions: usize,
}

impl HashedProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        let lower = text.to_lowercase();

        for word in lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 1)
        {
            // Whole-word feature.
            self.accumulate(&mut vector, word.as_bytes(), 1.0);

            // Character trigram features smooth over inflection and typos.
            let bytes = word.as_bytes();
            for window in bytes.windows(3) {
                self.accumulate(&mut vector, window, 0.5);
            }
        }

        normalize(&mut vector);
        vector
    }

    /// Add a feature into the vector. The hash picks the dimension; one of
    /// its bits picks the sign, which keeps colliding features from only
    /// ever reinforcing each other.
    fn accumulate(&self, vector: &mut [f32], feature: &[u8], weight: f32) {
        let hash = fnv1a(feature);
        let dim = (hash as usize) % self.dimensions;
        let sign = if hash & (1 << 63) == 0 { 1.0 } else { -1.0 };
        vector[dim] += sign * weight;
    }
}

/// FNV-1a over a byte slice.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashedProvider {
    fn provider_name(&self) -> &str {
        "hashed"
    }

    fn model_name(&self) -> &str {
        "hashed-trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dimensions_and_names() {
        let provider = HashedProvider::new(256);
        assert_eq!(provider.dimensions(), 256);
        assert_eq!(provider.provider_name(), "hashed");
        assert_eq!(provider.model_name(), "hashed-trigram-v1");
    }

    #[tokio::test]
    async fn test_vectors_are_unit_length() {
        let provider = HashedProvider::new(384);
        let vector = provider.embed("dental treatment is covered").await.unwrap();

        assert_eq!(vector.len(), 384);
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_deterministic() {
        let provider = HashedProvider::new(384);
        let a = provider.embed("waiting period of six months").await.unwrap();
        let b = provider.embed("waiting period of six months").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_different_texts_differ() {
        let provider = HashedProvider::new(384);
        let a = provider.embed("knee surgery is covered").await.unwrap();
        let b = provider.embed("cosmetic surgery is excluded").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_similar_texts_score_higher_than_unrelated() {
        let provider = HashedProvider::new(384);
        let query = provider.embed("is dental treatment covered").await.unwrap();
        let near = provider
            .embed("dental treatment is covered after a waiting period")
            .await
            .unwrap();
        let far = provider
            .embed("the quarterly revenue grew by twelve percent")
            .await
            .unwrap();

        let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };
        assert!(dot(&query, &near) > dot(&query, &far));
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let provider = HashedProvider::new(384);
        let vector = provider.embed("").await.unwrap();
        assert!(vector.iter().all(|&v| v == 0.0));
    }

    #[tokio::test]
    async fn test_batch_order_matches_input() {
        let provider = HashedProvider::new(64);
        let texts = vec!["first".to_string(), "second".to_string()];
        let batch = provider.embed_batch(&texts).await.unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], provider.embed("first").await.unwrap());
        assert_eq!(batch[1], provider.embed("second").await.unwrap());
    }
}
