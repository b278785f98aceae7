use chrono::{Datelike, NaiveDate};

/// Year the ledger tabs nominally carry. Source data is known to label the
/// season with the previous calendar year, so any date parsed into this year
/// is remapped to [`SEASON_YEAR`].
pub const NOMINAL_SEASON_YEAR: i32 = 2025;

/// Actual calendar year of the travel season being reconciled.
pub const SEASON_YEAR: i32 = 2026;

/// Candidate formats tried in order. Covers the day-month-year variants seen
/// across the ledger tabs: 2- and 4-digit years, numeric and named months,
/// slash and hyphen separators.
const DATE_FORMATS: &[&str] = &[
    "%d-%b-%y",
    "%d-%b-%Y",
    "%d/%m/%Y",
    "%d/%m/%y",
    "%Y-%m-%d",
    "%d %b %Y",
    "%d %b %y",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%d-%B-%y",
    "%d-%B-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Parses a loosely-formatted ledger cell into a calendar date.
///
/// Returns `None` when no candidate format matches; callers treat that as
/// "not a date", never as an error.
pub fn parse_ledger_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(normalize_season_year(parsed));
        }
    }

    None
}

/// Applies the fixed year corrections: two-digit years below 100 are promoted
/// into the 2000s, and the nominal season year is remapped to the actual one.
fn normalize_season_year(date: NaiveDate) -> NaiveDate {
    let mut date = date;
    if date.year() < 100 {
        date = date.with_year(date.year() + 2000).unwrap_or(date);
    }
    if date.year() == NOMINAL_SEASON_YEAR {
        date = date.with_year(SEASON_YEAR).unwrap_or(date);
    }
    date
}
