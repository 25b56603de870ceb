//! Sentence-embedding backend used by the semantic skill matcher.
//!
//! The real model (all-MiniLM-L6-v2 via `rust-bert`) is only compiled with the
//! `semantic` feature. Without it the default factory reports the backend as
//! unavailable and the normalizer falls back to string similarity.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("semantic backend unavailable: {0}")]
    Unavailable(String),

    #[error("embedding inference failed: {0}")]
    Inference(String),

    #[error("embedder returned {got} vectors for {expected} inputs")]
    Shape { expected: usize, got: usize },
}

/// Encodes text into dense vectors in a shared semantic space.
pub trait Embedder: Send + Sync {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Deferred constructor for the embedder; invoked at most once per normalizer.
pub type EmbedderFactory = Box<dyn Fn() -> Result<Box<dyn Embedder>, EmbeddingError> + Send + Sync>;

/// Encodes `texts` and checks that one vector came back per input.
pub fn encode_checked(
    embedder: &dyn Embedder,
    texts: &[&str],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    let vectors = embedder.encode(texts)?;
    if vectors.len() != texts.len() {
        return Err(EmbeddingError::Shape {
            expected: texts.len(),
            got: vectors.len(),
        });
    }
    Ok(vectors)
}

/// Cosine similarity of two dense vectors; 0.0 for zero-magnitude or mismatched inputs.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0_f32, 0.0_f32, 0.0_f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if similarity.is_nan() {
        0.0
    } else {
        similarity
    }
}

#[cfg(feature = "semantic")]
pub fn default_factory() -> EmbedderFactory {
    Box::new(|| Ok(Box::new(minilm::MiniLmEmbedder::load()?) as Box<dyn Embedder>))
}

#[cfg(not(feature = "semantic"))]
pub fn default_factory() -> EmbedderFactory {
    Box::new(|| {
        Err(EmbeddingError::Unavailable(
            "built without the `semantic` feature".to_string(),
        ))
    })
}

#[cfg(feature = "semantic")]
mod minilm {
    use std::sync::Mutex;

    use rust_bert::pipelines::sentence_embeddings::{
        SentenceEmbeddingsBuilder, SentenceEmbeddingsModel, SentenceEmbeddingsModelType,
    };
    use tracing::info;

    use super::{Embedder, EmbeddingError};

    /// all-MiniLM-L6-v2, downloaded and cached by rust-bert on first load.
    pub struct MiniLmEmbedder {
        model: Mutex<SentenceEmbeddingsModel>,
    }

    impl MiniLmEmbedder {
        pub fn load() -> Result<Self, EmbeddingError> {
            info!("loading sentence-embedding model all-MiniLM-L6-v2");
            let model = SentenceEmbeddingsBuilder::remote(SentenceEmbeddingsModelType::AllMiniLmL6V2)
                .create_model()
                .map_err(|e| EmbeddingError::Unavailable(e.to_string()))?;
            Ok(Self {
                model: Mutex::new(model),
            })
        }
    }

    impl Embedder for MiniLmEmbedder {
        fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            let model = self
                .model
                .lock()
                .map_err(|_| EmbeddingError::Inference("model lock poisoned".to_string()))?;
            model
                .encode(texts)
                .map_err(|e| EmbeddingError::Inference(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Embedder for Broken {
        fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(vec![vec![1.0]; texts.len().saturating_sub(1)])
        }
    }

    #[test]
    fn test_cosine_identical_vectors_is_one() {
        let v = [0.3_f32, 0.4, 0.5];
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        assert_eq!(cosine(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_zero_magnitude_is_zero() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_length_mismatch_is_zero() {
        assert_eq!(cosine(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_encode_checked_rejects_wrong_vector_count() {
        let err = encode_checked(&Broken, &["a", "b"]).unwrap_err();
        assert!(matches!(err, EmbeddingError::Shape { expected: 2, got: 1 }));
    }

    #[test]
    fn test_encode_checked_skips_empty_batch() {
        assert!(encode_checked(&Broken, &[]).unwrap().is_empty());
    }

    #[cfg(not(feature = "semantic"))]
    #[test]
    fn test_default_factory_unavailable_without_feature() {
        let result = default_factory()();
        assert!(matches!(result, Err(EmbeddingError::Unavailable(_))));
    }
}
