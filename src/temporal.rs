use chrono::{Datelike, NaiveDate};

/// Parse a year key the way `%y` does: two-digit years 69-99 land in the
/// 1900s and 00-68 in the 2000s. Four-digit years pass through. The result is
/// January 1st of that year.
pub fn parse_year(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let raw: i32 = trimmed.parse().ok()?;
    let year = match trimmed.len() {
        1 | 2 if raw >= 69 => 1900 + raw,
        1 | 2 => 2000 + raw,
        4 => raw,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Human-readable year for a raw key, e.g. `"82"` -> `"1982"`.
pub fn year_label(text: &str) -> String {
    match parse_year(text) {
        Some(date) => date.year().to_string(),
        None => text.to_string(),
    }
}

/// Days since the common era, used as the linear coordinate of a date.
pub fn ordinal_days(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

pub fn from_ordinal_days(days: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.round() as i32)
}

/// `%m/%d/%Y`, matching the locale-neutral date format used in tooltips.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}
