//! Configuration for the matching engine
//!
//! All knobs are read once from the environment into an explicit struct that
//! is passed by reference into the engine. Nothing here is global or mutable
//! after startup.

use crate::error::{MatcherError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    pub weights: DimensionWeights,
    pub skill_weights: SkillCategoryWeights,
    pub thresholds: StatusThresholds,
    pub embedding: EmbeddingConfig,
}

/// Per-dimension weights for the final weighted sum.
///
/// Not required to sum to 1; the final score is clamped to [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionWeights {
    pub title: f32,
    pub responsibilities: f32,
    pub experience: f32,
    pub education: f32,
    pub skills: f32,
    pub location: f32,
}

/// Weights applied to skill-category presence ratios in the weighted
/// skills scorer. Categories other than the three named tiers get a
/// fixed 0.1 weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategoryWeights {
    pub critical: f32,
    pub important: f32,
    pub desired: f32,
    pub base_score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusThresholds {
    /// Skills score at or above which the candidate passes.
    pub pass_min: f32,
    /// Skills score below which the candidate is rejected.
    pub reject_below: f32,
    /// Minimum critical-category presence, in percent, for weighted matches.
    pub critical_min_percent: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Bearer credential for the inference API. Required for remote calls.
    pub api_key: Option<String>,
    /// Model identifier on the inference router.
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            weights: DimensionWeights {
                title: 0.20,
                responsibilities: 0.25,
                experience: 0.20,
                education: 0.20,
                skills: 0.15,
                location: 0.0,
            },
            skill_weights: SkillCategoryWeights {
                critical: 0.4,
                important: 0.3,
                desired: 0.2,
                base_score: 0.1,
            },
            thresholds: StatusThresholds {
                pass_min: 0.7,
                reject_below: 0.4,
                critical_min_percent: 70.0,
            },
            embedding: EmbeddingConfig {
                api_key: None,
                model: "BAAI/bge-small-en-v1.5".to_string(),
                timeout_secs: 30,
            },
        }
    }
}

impl MatchConfig {
    /// Build a configuration from environment variables, falling back to
    /// the documented defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            weights: DimensionWeights {
                title: env_f32("MATCHING_TITLE_WEIGHT", defaults.weights.title)?,
                responsibilities: env_f32(
                    "MATCHING_RESPONSIBILITIES_WEIGHT",
                    defaults.weights.responsibilities,
                )?,
                experience: env_f32("MATCHING_EXPERIENCE_WEIGHT", defaults.weights.experience)?,
                education: env_f32("MATCHING_EDUCATION_WEIGHT", defaults.weights.education)?,
                skills: env_f32("MATCHING_SKILLS_WEIGHT", defaults.weights.skills)?,
                location: env_f32("MATCHING_LOCATION_WEIGHT", defaults.weights.location)?,
            },
            skill_weights: SkillCategoryWeights {
                critical: env_f32("CRITICAL_SKILLS_WEIGHT", defaults.skill_weights.critical)?,
                important: env_f32("IMPORTANT_SKILLS_WEIGHT", defaults.skill_weights.important)?,
                desired: env_f32("DESIRED_SKILLS_WEIGHT", defaults.skill_weights.desired)?,
                base_score: env_f32("BASE_SKILL_SCORE", defaults.skill_weights.base_score)?,
            },
            thresholds: StatusThresholds {
                pass_min: env_f32("MATCHING_PASS_THRESHOLD", defaults.thresholds.pass_min)?,
                reject_below: env_f32(
                    "MATCHING_REJECT_THRESHOLD",
                    defaults.thresholds.reject_below,
                )?,
                critical_min_percent: env_f32(
                    "CRITICAL_SKILLS_MIN_PERCENT",
                    defaults.thresholds.critical_min_percent,
                )?,
            },
            embedding: EmbeddingConfig {
                api_key: std::env::var("HUGGINGFACE_API_KEY").ok(),
                model: std::env::var("HUGGINGFACE_MODEL")
                    .unwrap_or(defaults.embedding.model),
                timeout_secs: env_u64("EMBEDDING_TIMEOUT_SECS", defaults.embedding.timeout_secs)?,
            },
        })
    }
}

fn env_f32(key: &str, default: f32) -> Result<f32> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            MatcherError::Configuration(format!("{} is not a valid number: {:?}", key, raw))
        }),
        Err(_) => Ok(default),
    }
}

fn env_u64(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            MatcherError::Configuration(format!("{} is not a valid integer: {:?}", key, raw))
        }),
        Err(_) => Ok(default),
    }
}
