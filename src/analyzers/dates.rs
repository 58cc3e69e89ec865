//! Width-based parsing of `BGN_DATE` strings.
//!
//! Source values look like `"4/18/1950 0:00:00"`: a month/day/year date
//! followed by a `" 0:00:00"` time suffix. Month and day carry no leading
//! zeros, so the date part is 8, 9 or 10 characters wide and the whole
//! string's length decides where to cut.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analyzers::types::StormRecord;

/// Returns the leading date part of a raw `BGN_DATE` value.
///
/// | length | prefix |
/// |--------|--------|
/// | 16     | 8      |
/// | 17     | 9      |
/// | other  | 10     |
///
/// Strings shorter than the chosen prefix are returned whole. `None` when
/// the cut would split a multi-byte character.
pub fn date_prefix(raw: &str) -> Option<&str> {
    let width = match raw.len() {
        16 => 8,
        17 => 9,
        _ => 10,
    };
    raw.get(..width.min(raw.len()))
}

/// Parses a raw `BGN_DATE` value, `None` marking a missing date.
///
/// Trailing whitespace left by the width cut is ignored, so a two-digit
/// hour suffix (`"4/18/1950 12:00:00"`) still yields the date.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_prefix(raw)?.trim_end(), "%m/%d/%Y").ok()
}

/// How many begin dates could be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateCoverage {
    pub parsed: usize,
    pub missing: usize,
}

pub fn date_coverage(records: &[StormRecord]) -> DateCoverage {
    records
        .iter()
        .fold(DateCoverage::default(), |mut acc, record| {
            if normalize_date(&record.begin_date).is_some() {
                acc.parsed += 1;
            } else {
                acc.missing += 1;
            }
            acc
        })
}
