//! Pass/reject/pending derivation and the human-readable summary

use crate::config::StatusThresholds;
use crate::models::{CategoryBreakdown, MatchStatus, SkillsMatchType};
use std::collections::HashMap;

/// Derive the screening status from the skills score.
///
/// Weighted matches gate on the critical category first: too few critical
/// skills rejects the candidate regardless of the total. After that the
/// skills score alone decides pass, reject or pending.
pub fn calculate_match_status(
    skills_match: f32,
    skills_details: &HashMap<String, CategoryBreakdown>,
    match_type: SkillsMatchType,
    thresholds: &StatusThresholds,
) -> MatchStatus {
    if match_type == SkillsMatchType::Weighted {
        if let Some(critical) = skills_details.get("critical") {
            if critical.presence_ratio * 100.0 < thresholds.critical_min_percent {
                return MatchStatus::Rejected;
            }
        }
    }

    if skills_match >= thresholds.pass_min {
        MatchStatus::Pass
    } else if skills_match < thresholds.reject_below {
        MatchStatus::Rejected
    } else {
        MatchStatus::Pending
    }
}

/// Coarse banding of the final score, used by the console report.
pub fn get_match_level(score: f32) -> &'static str {
    if score >= 0.8 {
        "Excellent"
    } else if score >= 0.65 {
        "Good"
    } else if score >= 0.5 {
        "Moderate"
    } else {
        "Poor"
    }
}

/// Inputs the summary generator cares about, pre-rounding.
pub struct SummaryInputs {
    pub experience_suitability: f32,
    pub education_relevance: f32,
    pub location_compatibility: f32,
    pub role_relevance: f32,
    pub candidate_exp_years: f32,
    pub required_exp_years: f32,
}

/// Assemble the "Strengths: ... | Concerns: ..." summary line.
pub fn generate_match_summary(inputs: &SummaryInputs) -> String {
    let mut strengths = Vec::new();
    if inputs.experience_suitability > 0.8 {
        strengths.push(format!(
            "Strong experience fit ({:.1} yrs vs req {:.1} yrs)",
            inputs.candidate_exp_years, inputs.required_exp_years
        ));
    }
    if inputs.role_relevance > 0.8 {
        strengths.push("Highly relevant background".to_string());
    }

    let mut concerns = Vec::new();
    if inputs.experience_suitability < 0.5 {
        concerns.push(format!(
            "Experience gap ({:.1} yrs vs req {:.1} yrs)",
            inputs.candidate_exp_years, inputs.required_exp_years
        ));
    }
    if inputs.education_relevance < 0.4 {
        concerns.push("Education mismatch".to_string());
    }
    if inputs.location_compatibility < 0.5 {
        concerns.push("Location incompatibility".to_string());
    }
    if inputs.role_relevance < 0.4 {
        concerns.push("Role relevance concerns".to_string());
    }

    let mut summary = String::new();
    if !strengths.is_empty() {
        summary = format!("Strengths: {}", strengths.join(", "));
    }
    if !concerns.is_empty() {
        if summary.is_empty() {
            summary = format!("Concerns: {}", concerns.join(", "));
        } else {
            summary = format!("{} | Concerns: {}", summary, concerns.join(", "));
        }
    }

    if summary.is_empty() {
        "No significant strengths or concerns identified".to_string()
    } else {
        summary
    }
}
