//! Required-years extraction and the experience scoring curve

use once_cell::sync::Lazy;
use regex::Regex;

static DASH_VARIANTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[–—−]").expect("static regex"));

/// Year-requirement phrasings, most specific first. Ranges yield their
/// lower bound.
static YEAR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\d+)\s*-\s*(\d+)\s*years?",
        r"(\d+)\s*to\s*(\d+)\s*years?",
        r"(\d+)\+\s*years?",
        r"minimum\s*(\d+)\s*years?",
        r"at least\s*(\d+)\s*years?",
        r"(\d+)\s*years?\s*experience",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static year regex"))
    .collect()
});

/// Pull a years-of-experience figure out of a requirement sentence.
///
/// Unicode dash variants are normalized first; the ordered patterns stop at
/// the first match. Returns 0.0 when no phrasing matches.
pub fn extract_years_from_sentence(sentence: &str) -> f32 {
    let lowered = sentence.to_lowercase();
    let normalized = DASH_VARIANTS.replace_all(&lowered, "-");

    for pattern in YEAR_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&normalized) {
            if let Ok(years) = caps[1].parse::<f32>() {
                return years;
            }
        }
    }
    0.0
}

/// Experience suitability given candidate years, required years and how
/// well the candidate's roles fit the job.
///
/// No stated requirement scores a flat 0.8. A weak role fit caps the score
/// even when the years are there; a good fit rewards surplus years up to a
/// bounded bonus.
pub fn calculate_experience_match(cv_years: f32, required_years: f32, role_relevance: f32) -> f32 {
    if required_years == 0.0 {
        return 0.8;
    }

    let ratio = cv_years / required_years;
    if role_relevance < 0.5 {
        if cv_years >= required_years {
            (0.4 + ratio * 0.2).min(0.6)
        } else {
            (ratio * 0.3).max(0.2)
        }
    } else if cv_years >= required_years {
        let bonus = ((cv_years - required_years) * 0.1).min(0.2);
        (0.8 + bonus).min(1.0)
    } else {
        (ratio * 0.7).max(0.3)
    }
}
