//! Weighted skill-category scoring

use crate::config::SkillCategoryWeights;
use crate::models::{CategoryBreakdown, SkillCategories, SkillPresence};
use std::collections::HashMap;

/// Weight applied to categories outside the three named tiers.
const UNKNOWN_CATEGORY_WEIGHT: f32 = 0.1;

/// Score categorized skills against a presence map.
///
/// Each category contributes its presence ratio times the category weight;
/// the configured base score is added on top and the total clamped to
/// [0, 1]. Also returns a per-category breakdown for reporting. Empty
/// inputs yield `(0.0, {})`.
pub fn calculate_weighted_skills_match(
    categories: &SkillCategories,
    presence: &SkillPresence,
    weights: &SkillCategoryWeights,
) -> (f32, HashMap<String, CategoryBreakdown>) {
    if categories.is_empty() || presence.is_empty() {
        return (0.0, HashMap::new());
    }

    let mut details = HashMap::new();
    let mut total = 0.0;

    for (category, skills) in categories {
        if skills.is_empty() {
            details.insert(category.clone(), CategoryBreakdown::default());
            continue;
        }

        let (present, absent): (Vec<String>, Vec<String>) = skills
            .iter()
            .cloned()
            .partition(|skill| presence.get(skill).copied().unwrap_or(false));

        let presence_ratio = present.len() as f32 / skills.len() as f32;
        let weight = match category.as_str() {
            "critical" => weights.critical,
            "important" => weights.important,
            "extra" => weights.desired,
            _ => UNKNOWN_CATEGORY_WEIGHT,
        };
        let score = presence_ratio * weight;
        total += score;

        details.insert(
            category.clone(),
            CategoryBreakdown {
                total: skills.len(),
                present_count: present.len(),
                present,
                absent,
                score,
                presence_ratio,
            },
        );
    }

    let total = (total + weights.base_score).clamp(0.0, 1.0);
    (total, details)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_weights() -> SkillCategoryWeights {
        SkillCategoryWeights {
            critical: 0.4,
            important: 0.3,
            desired: 0.2,
            base_score: 0.1,
        }
    }

    fn categories(entries: &[(&str, &[&str])]) -> SkillCategories {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    fn presence(entries: &[(&str, bool)]) -> SkillPresence {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_worked_example() {
        let cats = categories(&[
            ("critical", &["a", "b"][..]),
            ("important", &["c"][..]),
            ("extra", &[][..]),
        ]);
        let pres = presence(&[("a", true), ("b", false), ("c", true)]);

        let (score, details) = calculate_weighted_skills_match(&cats, &pres, &default_weights());
        // critical 0.5×0.4 + important 1.0×0.3 + extra 0 + base 0.1
        assert!((score - 0.6).abs() < 1e-6);

        let critical = &details["critical"];
        assert_eq!(critical.present, vec!["a"]);
        assert_eq!(critical.absent, vec!["b"]);
        assert_eq!(critical.present_count, 1);
        assert_eq!(critical.total, 2);
        assert!((critical.presence_ratio - 0.5).abs() < 1e-6);

        let extra = &details["extra"];
        assert_eq!(extra.total, 0);
        assert_eq!(extra.score, 0.0);
    }

    #[test]
    fn test_empty_inputs() {
        let (score, details) =
            calculate_weighted_skills_match(&SkillCategories::new(), &SkillPresence::new(), &default_weights());
        assert_eq!(score, 0.0);
        assert!(details.is_empty());

        let cats = categories(&[("critical", &["a"][..])]);
        let (score, details) =
            calculate_weighted_skills_match(&cats, &SkillPresence::new(), &default_weights());
        assert_eq!(score, 0.0);
        assert!(details.is_empty());
    }

    #[test]
    fn test_unknown_category_gets_default_weight() {
        let cats = categories(&[("nice_to_have", &["a", "b"][..])]);
        let pres = presence(&[("a", true), ("b", true)]);
        let (score, _) = calculate_weighted_skills_match(&cats, &pres, &default_weights());
        // 1.0×0.1 + base 0.1
        assert!((score - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_skill_missing_from_presence_counts_absent() {
        let cats = categories(&[("critical", &["a", "b"][..])]);
        let pres = presence(&[("a", true)]);
        let (_, details) = calculate_weighted_skills_match(&cats, &pres, &default_weights());
        assert_eq!(details["critical"].absent, vec!["b"]);
    }

    #[test]
    fn test_total_clamped_to_one() {
        let weights = SkillCategoryWeights {
            critical: 0.9,
            important: 0.9,
            desired: 0.2,
            base_score: 0.1,
        };
        let cats = categories(&[("critical", &["a"][..]), ("important", &["b"][..])]);
        let pres = presence(&[("a", true), ("b", true)]);
        let (score, _) = calculate_weighted_skills_match(&cats, &pres, &weights);
        assert_eq!(score, 1.0);
    }
}
