//! Value records exchanged with the matching engine
//!
//! Field names follow the JSON shapes produced by the upstream extraction
//! service (camelCase on the wire), so JD and CV files round-trip unchanged.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Employer-side input record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescription {
    pub job_title: String,
    #[serde(default)]
    pub key_responsibilities: Vec<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub education_required: Vec<String>,
    #[serde(default)]
    pub qualifications: Qualifications,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Qualifications {
    #[serde(default)]
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub remote_status: Option<String>,
}

/// Candidate-side input record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub location: Location,
    /// Role label suggested by upstream analytics, when available.
    #[serde(default)]
    pub suggested_role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default)]
    pub job_title: Option<String>,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Same forms as `start_date`, or the literal "present"; absent means ongoing.
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub skill_name: String,
}

/// Category name ("critical"/"important"/"extra"/other) → skill names.
pub type SkillCategories = HashMap<String, Vec<String>>;

/// Skill name → confirmed present in the CV.
pub type SkillPresence = HashMap<String, bool>;

/// Which skills-matching path produced the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillsMatchType {
    Weighted,
    Semantic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Pass,
    Rejected,
    Pending,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "Pass"),
            Self::Rejected => write!(f, "Rejected"),
            Self::Pending => write!(f, "Pending"),
        }
    }
}

/// Per-category detail emitted by the weighted skills scorer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub present: Vec<String>,
    pub absent: Vec<String>,
    pub total: usize,
    pub present_count: usize,
    pub score: f32,
    pub presence_ratio: f32,
}

/// Full match output: composite score plus the per-dimension breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub score: f32,
    pub details: MatchDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDetails {
    pub job_title_similarity: f32,
    pub responsibilities_similarity: f32,
    pub experience_suitability: f32,
    pub education_relevance: f32,
    pub skills_match: f32,
    pub skills_match_type: SkillsMatchType,
    pub skills_details: HashMap<String, CategoryBreakdown>,
    pub location_compatibility: f32,
    pub role_relevance: f32,
    pub candidate_exp_years: f32,
    pub required_exp_years: f32,
    pub suggested_role: Option<String>,
    pub status: MatchStatus,
    pub match_summary: String,
}
