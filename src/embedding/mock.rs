//! Deterministic mock embedding provider for tests
//!
//! Returns fixed vectors for registered texts and a stable hash-derived
//! vector for everything else, so scoring tests are reproducible without a
//! network. Also counts calls, letting tests assert on batching behavior.

use crate::embedding::{validate_batch, EmbeddingProvider};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct MockEmbeddingProvider {
    dimension: usize,
    fixed: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self {
            dimension: 8,
            fixed: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Register a fixed vector for an exact input text.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.fixed.insert(text.into(), vector);
        self
    }

    /// Number of embed calls issued so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        if let Some(v) = self.fixed.get(text) {
            return v.clone();
        }

        // Stable pseudo-embedding: seed a per-component hash from the text.
        let mut vector = Vec::with_capacity(self.dimension);
        for component in 0..self.dimension {
            let mut hasher = DefaultHasher::new();
            text.hash(&mut hasher);
            component.hash(&mut hasher);
            let raw = hasher.finish() as f64 / u64::MAX as f64;
            vector.push((raw * 2.0 - 1.0) as f32);
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        validate_batch(texts)?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}
