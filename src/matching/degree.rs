//! Degree-level classification and field-of-study extraction
//!
//! Both tables are small rule engines: ordered (pattern, result) lists
//! evaluated for best or first match, so individual rows stay testable
//! and extensible.

use once_cell::sync::Lazy;
use regex::Regex;

/// Degree tiers, highest first. The level of a text is the maximum tier
/// whose pattern matches; -1 when nothing matches.
static DEGREE_TIERS: Lazy<Vec<(Regex, i32)>> = Lazy::new(|| {
    [
        (r"(?i)\bph\.?d\b|\bdoctor(?:ate)?\b|\bd\.?phil\b", 4),
        (
            r"(?i)\bmaster\b|\bms\b|\bm\.?sc?\b|\bm\.?a\b|\bm\.?com\b|\bm\.?tech\b|\bmba\b|\bmca\b|\bl\.?l\.?m\b",
            3,
        ),
        (
            r"(?i)\bbachelor\b|\bbs\b|\bb\.?sc?\b|\bb\.?a\b|\bb\.?com\b|\bb\.?tech\b|\bbca\b|\bbba\b|\bbe\b|\bl\.?l\.?b\b|\bundergrad\b",
            2,
        ),
        (r"(?i)\bdiploma\b|\bcertificate\b|\bassociate\b|\badvance diploma\b", 1),
        (
            r"(?i)\bhigh school\b|\bhsc\b|\bssc\b|\bsecondary\b|\bcbse\b|\bicse\b|\bgcse\b",
            0,
        ),
    ]
    .iter()
    .map(|(pattern, level)| (Regex::new(pattern).expect("static degree regex"), *level))
    .collect()
});

/// Degree-abbreviation → canonical field name, checked as case-insensitive
/// substrings in listed order.
const FIELD_ABBREVIATIONS: &[(&str, &str)] = &[
    ("b.b.a", "business administration"),
    ("bba", "business administration"),
    ("m.b.a", "business administration"),
    ("mba", "business administration"),
    ("b.tech", "engineering"),
    ("btech", "engineering"),
    ("m.tech", "engineering"),
    ("mtech", "engineering"),
    ("b.sc", "science"),
    ("bsc", "science"),
    ("m.sc", "science"),
    ("msc", "science"),
    ("b.a", "arts"),
    ("ba", "arts"),
    ("m.a", "arts"),
    ("ma", "arts"),
    ("b.com", "commerce"),
    ("bcom", "commerce"),
    ("m.com", "commerce"),
    ("mcom", "commerce"),
    ("bca", "computer applications"),
    ("mca", "computer applications"),
    ("phd", "research"),
    ("ph.d", "research"),
    ("d.phil", "research"),
];

static IN_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"in\s+([a-zA-Z\s]+?)(?:\s+from|\s*$|,|\(|\))").expect("static regex"));
static PARENTHESES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]+)\)").expect("static regex"));
static PREFERABLY_IN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"preferably\s+in\s+([a-zA-Z\s,]+?)(?:\s+or|\s*$|,|\(|\))").expect("static regex")
});
static DEGREE_STOPWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(bachelor|master|degree|preferably|related|field|or)\b").expect("static regex")
});
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("static regex"));
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Highest degree tier mentioned in free text, or -1 when none is found.
pub fn extract_highest_degree_level(text: &str) -> i32 {
    if text.trim().is_empty() {
        return -1;
    }
    DEGREE_TIERS
        .iter()
        .filter(|(pattern, _)| pattern.is_match(text))
        .map(|(_, level)| *level)
        .max()
        .unwrap_or(-1)
}

/// Extract a field of study from a degree or requirement string.
///
/// Tries, in order: the abbreviation table, an "in <field>" phrase,
/// parenthesized text, a "preferably in <field>" phrase, and finally the
/// input stripped of degree stopwords and punctuation. May return an empty
/// string when nothing survives.
pub fn extract_field(text: &str) -> String {
    let text_lower = text.to_lowercase().trim().to_string();
    if text_lower.is_empty() {
        return String::new();
    }

    for (abbrev, field) in FIELD_ABBREVIATIONS {
        if text_lower.contains(abbrev) {
            return (*field).to_string();
        }
    }

    for pattern in [&*IN_FIELD, &*PARENTHESES, &*PREFERABLY_IN] {
        if let Some(caps) = pattern.captures(&text_lower) {
            let field = caps[1].trim().to_string();
            if field.len() > 2 {
                return field;
            }
        }
    }

    let cleaned = DEGREE_STOPWORDS.replace_all(&text_lower, "");
    let cleaned = NON_WORD.replace_all(&cleaned, " ");
    let cleaned = MULTI_SPACE.replace_all(&cleaned, " ");
    cleaned.trim().to_string()
}
