//! Weighted ranking of event types from two group summaries.

use std::collections::HashSet;

use serde::Serialize;

use crate::analyzers::aggregate::GroupSummary;

/// Default multiplier applied to mean fatalities in the health score.
pub const DEFAULT_FATALITY_WEIGHT: f64 = 2.0;

/// Default number of ranked entries surfaced to the caller.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub event_type: String,
    pub score: f64,
}

/// Event types sorted by descending score; equal scores keep join order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedList {
    entries: Vec<RankedEntry>,
}

impl RankedList {
    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    /// The first `n` entries, or all of them when fewer exist.
    pub fn top(&self, n: usize) -> &[RankedEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Full outer join of two summaries scored as `weight * primary + secondary`.
///
/// The key domain is the union of both summaries, walked in `group_order`
/// (first-seen order of the event types). Keys missing from `group_order`
/// follow in summary order. A key absent from one side contributes 0 from
/// that side.
pub fn weighted_union(
    group_order: &[&str],
    primary: &GroupSummary,
    secondary: &GroupSummary,
    weight: f64,
) -> RankedList {
    let mut seen = HashSet::new();
    let keys: Vec<&str> = group_order
        .iter()
        .copied()
        .filter(|k| primary.contains(k) || secondary.contains(k))
        .chain(primary.iter().chain(secondary.iter()).map(|(k, _)| k))
        .filter(|k| seen.insert(*k))
        .collect();

    let mut entries: Vec<RankedEntry> = keys
        .into_iter()
        .map(|kind| RankedEntry {
            event_type: kind.to_string(),
            score: weight * primary.get(kind).unwrap_or(0.0) + secondary.get(kind).unwrap_or(0.0),
        })
        .collect();

    // sort_by is stable
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));

    RankedList { entries }
}

/// Ranks event types by `fatality_weight * mean fatalities + mean injuries`.
pub fn health_ranking(
    group_order: &[&str],
    fatalities: &GroupSummary,
    injuries: &GroupSummary,
    fatality_weight: f64,
) -> RankedList {
    weighted_union(group_order, fatalities, injuries, fatality_weight)
}

/// Ranks event types by `mean property damage + mean crop damage`.
pub fn economic_ranking(
    group_order: &[&str],
    property: &GroupSummary,
    crop: &GroupSummary,
) -> RankedList {
    weighted_union(group_order, property, crop, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(list: &RankedList) -> Vec<(&str, f64)> {
        list.entries()
            .iter()
            .map(|e| (e.event_type.as_str(), e.score))
            .collect()
    }

    #[test]
    fn test_health_score_weights_fatalities_twice() {
        let fatalities = GroupSummary::from_pairs([("HEAT", 1.25), ("TORNADO", 0.5)]);
        let injuries = GroupSummary::from_pairs([("HEAT", 2.0), ("TORNADO", 4.0)]);

        let ranked = health_ranking(
            &["HEAT", "TORNADO"],
            &fatalities,
            &injuries,
            DEFAULT_FATALITY_WEIGHT,
        );
        assert_eq!(scores(&ranked), vec![("TORNADO", 5.0), ("HEAT", 4.5)]);
    }

    #[test]
    fn test_one_sided_keys_count_absent_side_as_zero() {
        let fatalities = GroupSummary::from_pairs([("HEAT", 3.0)]);
        let injuries = GroupSummary::from_pairs([("HAIL", 1.0)]);

        let ranked = health_ranking(&["HAIL", "HEAT"], &fatalities, &injuries, 2.0);
        assert_eq!(scores(&ranked), vec![("HEAT", 6.0), ("HAIL", 1.0)]);
    }

    #[test]
    fn test_economic_score_is_plain_sum() {
        let property = GroupSummary::from_pairs([("FLOOD", 100.0), ("HAIL", 10.0)]);
        let crop = GroupSummary::from_pairs([("HAIL", 200.0), ("DROUGHT", 50.0)]);

        let ranked = economic_ranking(&["FLOOD", "HAIL", "DROUGHT"], &property, &crop);
        assert_eq!(
            scores(&ranked),
            vec![("HAIL", 210.0), ("FLOOD", 100.0), ("DROUGHT", 50.0)]
        );
    }

    #[test]
    fn test_ties_keep_join_order() {
        let fatalities = GroupSummary::from_pairs([("B", 1.0), ("A", 1.0), ("C", 2.0)]);
        let injuries = GroupSummary::from_pairs([("D", 2.0)]);

        let ranked = health_ranking(&["B", "A", "C", "D"], &fatalities, &injuries, 2.0);
        assert_eq!(
            scores(&ranked),
            vec![("C", 4.0), ("B", 2.0), ("A", 2.0), ("D", 2.0)]
        );
    }

    #[test]
    fn test_ties_follow_first_seen_order_across_summaries() {
        // X has no fatality mean but was seen before Y.
        let fatalities = GroupSummary::from_pairs([("Y", 0.0)]);
        let injuries = GroupSummary::from_pairs([("X", 2.0), ("Y", 2.0)]);

        let ranked = health_ranking(&["X", "Y"], &fatalities, &injuries, 2.0);
        assert_eq!(scores(&ranked), vec![("X", 2.0), ("Y", 2.0)]);
    }

    #[test]
    fn test_keys_outside_group_order_are_still_joined() {
        let property = GroupSummary::from_pairs([("A", 1.0)]);
        let crop = GroupSummary::from_pairs([("B", 1.0)]);

        let ranked = economic_ranking(&["GONE", "B"], &property, &crop);
        assert_eq!(scores(&ranked), vec![("B", 1.0), ("A", 1.0)]);
    }

    #[test]
    fn test_empty_summaries_rank_nothing() {
        let ranked = health_ranking(&[], &GroupSummary::default(), &GroupSummary::default(), 2.0);
        assert!(ranked.is_empty());
        assert!(ranked.top(5).is_empty());
    }

    #[test]
    fn test_top_truncates() {
        let property = GroupSummary::from_pairs([("A", 3.0), ("B", 2.0), ("C", 1.0)]);
        let ranked = economic_ranking(&["A", "B", "C"], &property, &GroupSummary::default());

        assert_eq!(ranked.top(2).len(), 2);
        assert_eq!(ranked.top(10).len(), 3);
        assert_eq!(ranked.top(1)[0].event_type, "A");
    }
}
