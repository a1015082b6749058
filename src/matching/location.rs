//! City aliasing and location compatibility scoring

use crate::models::Location;
use strsim::normalized_levenshtein;

/// Known equivalent city-name pairs, matched in both directions.
const CITY_ALIASES: &[(&str, &str)] = &[
    ("gurgaon", "gurugram"),
    ("bengaluru", "bangalore"),
    ("mumbai", "bombay"),
    ("delhi", "new delhi"),
    ("kolkata", "calcutta"),
    ("chennai", "madras"),
    ("hyderabad", "secunderabad"),
    ("pune", "poona"),
];

const FUZZY_CITY_THRESHOLD: f64 = 0.7;

/// Similarity of two city names in [0, 1].
///
/// Exact (case-insensitive) matches and known alias pairs score 1.0.
/// Otherwise the character-sequence ratio is returned, but only when it
/// clears the 0.7 threshold; weaker resemblance scores 0.0.
pub fn fuzzy_match_cities(city1: &str, city2: &str) -> f32 {
    let a = city1.trim().to_lowercase();
    let b = city2.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let aliased = CITY_ALIASES.iter().any(|(x, y)| {
        (a == *x && b == *y) || (a == *y && b == *x)
    });
    if aliased {
        return 1.0;
    }

    let ratio = normalized_levenshtein(&a, &b);
    if ratio > FUZZY_CITY_THRESHOLD {
        ratio as f32
    } else {
        0.0
    }
}

/// Location compatibility between a candidate and a job.
///
/// Remote roles are always compatible. Otherwise the score steps down a
/// ladder: same or aliased city, near-miss city spelling, same state, same
/// country, then a 0.3 floor for everything else.
pub fn calculate_location_match(cv: &Location, jd: &Location) -> f32 {
    if let Some(remote) = &jd.remote_status {
        if remote.to_lowercase().contains("remote") {
            return 1.0;
        }
    }

    let cv_city = cv.city.as_deref().unwrap_or("");
    let jd_city = jd.city.as_deref().unwrap_or("");
    let city_score = fuzzy_match_cities(cv_city, jd_city);
    if city_score >= 0.8 {
        return 1.0;
    }
    if city_score >= 0.7 {
        return 0.9;
    }

    let cv_state = normalize(cv.state.as_deref());
    let jd_state = normalize(jd.state.as_deref());
    if !cv_state.is_empty() && cv_state == jd_state {
        return 0.8;
    }

    let cv_country = normalize(cv.country.as_deref());
    let jd_country = normalize(jd.country.as_deref());
    if !cv_country.is_empty() && cv_country == jd_country {
        return 0.6;
    }

    0.3
}

fn normalize(value: Option<&str>) -> String {
    value.unwrap_or("").trim().to_lowercase()
}
