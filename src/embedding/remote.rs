//! Hugging Face Inference API embedding client

use crate::config::EmbeddingConfig;
use crate::embedding::{validate_batch, validate_response, EmbeddingProvider};
use crate::error::{MatcherError, Result};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Serialize;
use std::time::{Duration, Instant};

const HF_ROUTER_BASE: &str = "https://router.huggingface.co/hf-inference/models";

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [String],
}

/// Remote embedding client for the Hugging Face Inference router.
///
/// Issues one POST per batch; callers are expected to pre-batch their
/// strings. Responses are either a flat vector (a length-1 batch the
/// provider ungrouped) or a list of vectors; anything else is a provider
/// format error.
#[derive(Debug)]
pub struct HfInferenceClient {
    client: Client,
    api_url: String,
    api_key: String,
    timeout: Duration,
}

impl HfInferenceClient {
    /// Build a client from embedding configuration. Fails when no API
    /// credential is configured.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            MatcherError::Configuration(
                "HUGGINGFACE_API_KEY is not set; an embedding credential is required".to_string(),
            )
        })?;

        Ok(Self {
            client: Client::new(),
            api_url: format!("{}/{}", HF_ROUTER_BASE, config.model),
            api_key,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Override the endpoint URL (used by tests against a local server).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    fn parse_response(value: serde_json::Value) -> Result<Vec<Vec<f32>>> {
        let rows = match value {
            serde_json::Value::Array(items) if items.iter().all(|i| i.is_number()) && !items.is_empty() => {
                // Single flat vector: a length-1 batch the provider ungrouped.
                vec![serde_json::Value::Array(items)]
            }
            serde_json::Value::Array(items) => items,
            other => {
                return Err(MatcherError::Provider(format!(
                    "unexpected embedding response shape: {}",
                    summarize(&other)
                )))
            }
        };

        rows.into_iter()
            .map(|row| {
                serde_json::from_value::<Vec<f32>>(row).map_err(|e| {
                    MatcherError::Provider(format!("embedding row is not a numeric vector: {}", e))
                })
            })
            .collect()
    }
}

fn summarize(value: &serde_json::Value) -> String {
    let raw = value.to_string();
    match raw.char_indices().nth(120) {
        Some((idx, _)) => format!("{}...", &raw[..idx]),
        None => raw,
    }
}

#[async_trait]
impl EmbeddingProvider for HfInferenceClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        validate_batch(texts)?;

        let start = Instant::now();
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&EmbedRequest { inputs: texts })
            .send()
            .await
            .map_err(|e| MatcherError::Provider(format!("embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("embedding API returned {}: {}", status, body);
            return Err(MatcherError::Provider(format!(
                "embedding API returned {}: {}",
                status, body
            )));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MatcherError::Provider(format!("failed to parse response: {}", e)))?;

        let vectors = Self::parse_response(value)?;
        validate_response(texts, &vectors)?;
        debug!(
            "embedded {} text(s) in {}ms",
            texts.len(),
            start.elapsed().as_millis()
        );
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_credential_is_configuration_error() {
        let config = EmbeddingConfig {
            api_key: None,
            model: "BAAI/bge-small-en-v1.5".to_string(),
            timeout_secs: 30,
        };
        let err = HfInferenceClient::new(&config).unwrap_err();
        assert!(matches!(err, MatcherError::Configuration(_)));
    }

    #[test]
    fn test_parse_batch_response() {
        let value = json!([[0.1, 0.2], [0.3, 0.4]]);
        let vectors = HfInferenceClient::parse_response(value).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], vec![0.1, 0.2]);
    }

    #[test]
    fn test_parse_flat_vector_wraps_single_row() {
        let value = json!([0.5, 0.6, 0.7]);
        let vectors = HfInferenceClient::parse_response(value).unwrap();
        assert_eq!(vectors.len(), 1);
        assert_eq!(vectors[0].len(), 3);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = HfInferenceClient::parse_response(json!({"error": "loading"})).unwrap_err();
        assert!(matches!(err, MatcherError::Provider(_)));
    }

    #[test]
    fn test_parse_rejects_mixed_rows() {
        let err = HfInferenceClient::parse_response(json!([[0.1], "oops"])).unwrap_err();
        assert!(matches!(err, MatcherError::Provider(_)));
    }

    #[test]
    fn test_summarize_truncates_on_char_boundary() {
        let long = "é".repeat(200);
        let summary = summarize(&json!(long));
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() <= 124);

        let short = summarize(&json!({"error": "loading"}));
        assert!(!short.ends_with("..."));
    }
}
