//! Event-type frequency counting and rare-category filtering.
//!
//! Event types are compared as exact raw strings. No case folding, trimming
//! or synonym merging is applied, so `"TSTM WIND"` and `" TSTM WIND"` are
//! counted as different categories.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::StormRecord;

/// Default minimum count an event type must exceed to be retained.
pub const DEFAULT_FREQUENCY_THRESHOLD: u64 = 150;

/// Occurrence count per event type, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrequencyTable {
    counts: Vec<(String, u64)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn from_records(records: &[StormRecord]) -> Self {
        let mut table = FrequencyTable::default();
        for record in records {
            table.observe(&record.event_type);
        }
        table
    }

    fn observe(&mut self, event_type: &str) {
        match self.index.get(event_type) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(event_type.to_string(), self.counts.len());
                self.counts.push((event_type.to_string(), 1));
            }
        }
    }

    /// Number of records seen for `event_type`, zero if never seen.
    pub fn count(&self, event_type: &str) -> u64 {
        self.index
            .get(event_type)
            .map_or(0, |&slot| self.counts[slot].1)
    }

    /// Sum of all counts, equal to the number of records counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    /// Number of distinct event types.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, c)| (k.as_str(), *c))
    }

    /// The `n` most frequent event types, ties kept in first-seen order.
    pub fn most_common(&self, n: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

/// Records whose event type occurred more often than the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRecordSet {
    records: Vec<StormRecord>,
    threshold: u64,
}

impl FilteredRecordSet {
    pub fn records(&self) -> &[StormRecord] {
        &self.records
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct event types left after filtering, in first-seen order.
    pub fn retained_event_types(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.event_type.as_str())
            .filter(|kind| seen.insert(*kind))
            .collect()
    }
}

/// Counts event types over all records and keeps those with count > `threshold`.
///
/// A threshold at or above the largest count yields an empty set, which is a
/// valid outcome. The input is left untouched.
#[tracing::instrument(skip(records), fields(records = records.len()))]
pub fn filter_by_frequency(
    records: &[StormRecord],
    threshold: u64,
) -> (FrequencyTable, FilteredRecordSet) {
    let table = FrequencyTable::from_records(records);

    let retained: Vec<StormRecord> = records
        .iter()
        .filter(|r| table.count(&r.event_type) > threshold)
        .cloned()
        .collect();

    let kept_types = table.iter().filter(|(_, c)| *c > threshold).count();
    debug!(
        distinct = table.len(),
        kept_types, "Event type frequencies counted"
    );
    info!(
        threshold,
        retained = retained.len(),
        dropped = records.len() - retained.len(),
        "Rare event types filtered"
    );

    (
        table,
        FilteredRecordSet {
            records: retained,
            threshold,
        },
    )
}
