//! Lenient date parsing and total-experience computation

use crate::models::Experience;
use chrono::{Local, NaiveDate};
use log::warn;

/// Parse a `YYYY`, `YYYY-MM` or `YYYY-MM-DD` date string.
///
/// "present", a missing value, or anything unparsable maps to today.
/// The unparsable case stays lenient but logs a diagnostic, since
/// silently treating a typo as "now" can distort the experience total.
pub fn parse_date(date_str: Option<&str>) -> NaiveDate {
    let today = Local::now().date_naive();
    let raw = match date_str {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return today,
    };
    if raw.eq_ignore_ascii_case("present") {
        return today;
    }

    let parsed = match raw.len() {
        4 => format!("{}-01-01", raw).parse::<NaiveDate>(),
        7 => format!("{}-01", raw).parse::<NaiveDate>(),
        _ => raw.parse::<NaiveDate>(),
    };

    match parsed {
        Ok(date) => date,
        Err(_) => {
            warn!("unparsable date {:?}, falling back to today", raw);
            today
        }
    }
}

/// Total years of experience across all entries with a start date.
///
/// Day spans are summed (an entry with no end date counts as ongoing),
/// divided by 365, floored at zero and rounded to one decimal.
pub fn calculate_experience_years(experiences: &[Experience]) -> f32 {
    let mut total_days: i64 = 0;
    for exp in experiences {
        if exp.start_date.as_deref().map_or(true, |s| s.trim().is_empty()) {
            continue;
        }
        let start = parse_date(exp.start_date.as_deref());
        let end = parse_date(exp.end_date.as_deref());
        total_days += (end - start).num_days();
    }

    let years = (total_days as f32 / 365.0).max(0.0);
    (years * 10.0).round() / 10.0
}
