//! CV-to-JD matching: heuristic scorers plus the embedding-backed engine

pub mod dates;
pub mod degree;
pub mod engine;
pub mod experience;
pub mod location;
pub mod skills;
pub mod status;

pub use dates::{calculate_experience_years, parse_date};
pub use degree::{extract_field, extract_highest_degree_level};
pub use engine::MatchEngine;
pub use experience::{calculate_experience_match, extract_years_from_sentence};
pub use location::calculate_location_match;
pub use skills::calculate_weighted_skills_match;
pub use status::{calculate_match_status, generate_match_summary, get_match_level};
