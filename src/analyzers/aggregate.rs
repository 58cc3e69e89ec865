use crate::analyzers::frequency::FilteredRecordSet;
use crate::analyzers::types::{Field, StormRecord};
use crate::analyzers::utility::{mean, stddev};
use serde::Serialize;
use std::collections::HashMap;

/// Per-event-type mean of one numeric field.
///
/// Entries iterate in the order their event type first appears in the
/// filtered set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupSummary {
    field: Option<Field>,
    means: Vec<(String, f64)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl GroupSummary {
    fn with_means(field: Option<Field>, means: Vec<(String, f64)>) -> Self {
        let index = means
            .iter()
            .enumerate()
            .map(|(slot, (k, _))| (k.clone(), slot))
            .collect();
        GroupSummary {
            field,
            means,
            index,
        }
    }

    /// Builds a summary from `(event_type, mean)` pairs, keeping their order.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self::with_means(
            None,
            pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )
    }

    pub fn field(&self) -> Option<Field> {
        self.field
    }

    pub fn get(&self, event_type: &str) -> Option<f64> {
        self.index.get(event_type).map(|&slot| self.means[slot].1)
    }

    pub fn contains(&self, event_type: &str) -> bool {
        self.index.contains_key(event_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.means.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }
}

/// Descriptive statistics for one field within one event-type group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub event_type: String,
    /// Records with a present value for the field.
    pub count: usize,
    /// Records with a missing value for the field.
    pub missing: usize,
    pub mean: f64,
    pub stddev: f64,
    pub total: f64,
}

/// Present values of `field` per event type, in first-seen group order.
///
/// Groups with no present values still get an (empty) series so callers
/// can report them as missing.
fn field_series(records: &[StormRecord], field: Field) -> Vec<(&str, Vec<f64>, usize)> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut series: Vec<(&str, Vec<f64>, usize)> = Vec::new();

    for record in records {
        let slot = *slots.entry(record.event_type.as_str()).or_insert_with(|| {
            series.push((record.event_type.as_str(), Vec::new(), 0));
            series.len() - 1
        });

        match field.value(record) {
            Some(v) => series[slot].1.push(v),
            None => series[slot].2 += 1,
        }
    }

    series
}

/// Groups the filtered records by exact event type and averages `field`.
///
/// Missing values are left out of both the sum and the count. A group where
/// every value is missing has no mean and is left out of the summary.
pub fn group_means(set: &FilteredRecordSet, field: Field) -> GroupSummary {
    let means = field_series(set.records(), field)
        .into_iter()
        .filter(|(_, values, _)| !values.is_empty())
        .map(|(kind, values, _)| (kind.to_string(), mean(&values)))
        .collect();

    GroupSummary::with_means(Some(field), means)
}

/// Per-group count, mean, standard deviation and total for `field`.
pub fn group_stats(set: &FilteredRecordSet, field: Field) -> Vec<GroupStats> {
    field_series(set.records(), field)
        .into_iter()
        .map(|(kind, values, missing)| {
            let avg = mean(&values);
            GroupStats {
                event_type: kind.to_string(),
                count: values.len(),
                missing,
                mean: avg,
                stddev: stddev(&values, avg),
                total: values.iter().sum(),
            }
        })
        .collect()
}
