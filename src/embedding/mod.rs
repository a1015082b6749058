//! Embedding provider abstraction
//!
//! The scoring engine treats text embedding as an opaque capability: one
//! batch in, one fixed-length vector per input out, same order. The remote
//! client talks to the Hugging Face Inference API; tests swap in the
//! deterministic [`mock::MockEmbeddingProvider`].

pub mod mock;
pub mod remote;
pub mod similarity;

pub use mock::MockEmbeddingProvider;
pub use remote::HfInferenceClient;
pub use similarity::cosine;

use crate::error::{MatcherError, Result};
use async_trait::async_trait;

/// A batch text-embedding capability.
///
/// Implementations must return exactly one vector per input string, in input
/// order, and must not cache or mutate results between calls.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Reject batches the provider contract does not cover: empty batches and
/// empty or whitespace-only strings.
pub fn validate_batch(texts: &[String]) -> Result<()> {
    if texts.is_empty() {
        return Err(MatcherError::Validation(
            "embedding input batch is empty".to_string(),
        ));
    }
    if let Some(idx) = texts.iter().position(|t| t.trim().is_empty()) {
        return Err(MatcherError::Validation(format!(
            "embedding input at index {} is empty",
            idx
        )));
    }
    Ok(())
}

/// Check that a provider response carries one vector per input. A short or
/// oversized batch is a provider fault and must never reach the scorers.
pub fn validate_response(texts: &[String], vectors: &[Vec<f32>]) -> Result<()> {
    if vectors.len() != texts.len() {
        return Err(MatcherError::Provider(format!(
            "embedding provider returned {} vector(s) for {} input(s)",
            vectors.len(),
            texts.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_batch() {
        assert!(validate_batch(&[]).is_err());
    }

    #[test]
    fn test_validate_rejects_blank_string() {
        let texts = vec!["ok".to_string(), "   ".to_string()];
        let err = validate_batch(&texts).unwrap_err();
        assert!(matches!(err, MatcherError::Validation(_)));
    }

    #[test]
    fn test_validate_accepts_non_empty() {
        let texts = vec!["software engineer".to_string()];
        assert!(validate_batch(&texts).is_ok());
    }

    #[test]
    fn test_response_must_match_input_count() {
        let texts = vec!["a".to_string(), "b".to_string()];
        let short = vec![vec![1.0, 0.0]];
        let err = validate_response(&texts, &short).unwrap_err();
        assert!(matches!(err, MatcherError::Provider(_)));

        let full = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert!(validate_response(&texts, &full).is_ok());
    }
}
