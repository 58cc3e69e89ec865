//! Damage-over-time series for the trend check.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::analyzers::dates::normalize_date;
use crate::analyzers::frequency::FilteredRecordSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamagePoint {
    pub date: NaiveDate,
    pub total_damage: f64,
}

/// Property plus crop damage summed per begin date, ascending by date.
///
/// Records whose begin date cannot be parsed are skipped here only; they
/// still take part in the group means. Missing damage values add nothing.
pub fn damage_series(set: &FilteredRecordSet) -> Vec<DamagePoint> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in set.records() {
        let Some(date) = normalize_date(&record.begin_date) else {
            skipped += 1;
            continue;
        };
        let damage =
            record.property_damage.unwrap_or_default() + record.crop_damage.unwrap_or_default();
        *by_date.entry(date).or_default() += damage;
    }

    debug!(points = by_date.len(), skipped, "Damage series built");

    by_date
        .into_iter()
        .map(|(date, total_damage)| DamagePoint { date, total_damage })
        .collect()
}

/// Collapses a damage series into `(year, total)` pairs.
pub fn yearly_totals(series: &[DamagePoint]) -> Vec<(i32, f64)> {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for point in series {
        *by_year.entry(point.date.year()).or_default() += point.total_damage;
    }
    by_year.into_iter().collect()
}
