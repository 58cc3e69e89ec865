use crate::analyzers::aggregate::{GroupStats, GroupSummary, group_means, group_stats};
use crate::analyzers::dates::{DateCoverage, date_coverage};
use crate::analyzers::frequency::{FrequencyTable, filter_by_frequency};
use crate::analyzers::scoring::{RankedEntry, RankedList, economic_ranking, health_ranking};
use crate::analyzers::trend::{DamagePoint, damage_series, yearly_totals};
use crate::analyzers::types::{Field, StormRecord};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::parser::load_records;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Number of most frequent event types listed in a report.
const REPORT_TOP_CATEGORIES: usize = 20;

/// Everything one run derives from a record set.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub config: AnalysisConfig,
    pub frequencies: FrequencyTable,
    pub total_records: usize,
    pub retained_records: usize,
    pub means: Vec<GroupSummary>,
    pub stats: Vec<(Field, Vec<GroupStats>)>,
    pub health: RankedList,
    pub economic: RankedList,
    pub damage: Vec<DamagePoint>,
    pub dates: DateCoverage,
}

impl Analysis {
    /// Filters, aggregates and ranks `records` under `config`.
    ///
    /// Every stage builds a new structure from the previous one; `records`
    /// is only read.
    #[tracing::instrument(skip_all, fields(records = records.len()))]
    pub fn run(records: &[StormRecord], config: &AnalysisConfig) -> Self {
        let (frequencies, filtered) = filter_by_frequency(records, config.frequency_threshold);

        let fatalities = group_means(&filtered, Field::Fatalities);
        let injuries = group_means(&filtered, Field::Injuries);
        let property = group_means(&filtered, Field::PropertyDamage);
        let crop = group_means(&filtered, Field::CropDamage);

        let order = filtered.retained_event_types();
        let health = health_ranking(&order, &fatalities, &injuries, config.fatality_weight);
        let economic = economic_ranking(&order, &property, &crop);

        let stats = Field::ALL
            .iter()
            .map(|&field| (field, group_stats(&filtered, field)))
            .collect();

        let dates = date_coverage(filtered.records());
        let damage = damage_series(&filtered);

        info!(
            retained = filtered.len(),
            groups = health.len(),
            missing_dates = dates.missing,
            "Analysis complete"
        );

        Analysis {
            config: config.clone(),
            frequencies,
            total_records: records.len(),
            retained_records: filtered.len(),
            means: vec![fatalities, injuries, property, crop],
            stats,
            health,
            economic,
            damage,
            dates,
        }
    }

    pub fn summary(&self, field: Field) -> Option<&GroupSummary> {
        self.means.iter().find(|s| s.field() == Some(field))
    }

    pub fn top_health(&self) -> &[RankedEntry] {
        self.health.top(self.config.top_n)
    }

    pub fn top_economic(&self) -> &[RankedEntry] {
        self.economic.top(self.config.top_n)
    }

    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            generated_at: Utc::now(),
            frequency_threshold: self.config.frequency_threshold,
            fatality_weight: self.config.fatality_weight,
            total_records: self.total_records,
            retained_records: self.retained_records,
            health: self.top_health().to_vec(),
            economic: self.top_economic().to_vec(),
            top_categories: self
                .frequencies
                .most_common(REPORT_TOP_CATEGORIES)
                .into_iter()
                .map(|(k, c)| (k.to_string(), c))
                .collect(),
            dates: self.dates,
            yearly_damage: yearly_totals(&self.damage),
        }
    }
}

/// Serializable snapshot of an [`Analysis`].
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub frequency_threshold: u64,
    pub fatality_weight: f64,
    pub total_records: usize,
    pub retained_records: usize,
    pub health: Vec<RankedEntry>,
    pub economic: Vec<RankedEntry>,
    pub top_categories: Vec<(String, u64)>,
    pub dates: DateCoverage,
    pub yearly_damage: Vec<(i32, f64)>,
}

/// Loads `path` and runs the analysis over it.
///
/// # Errors
///
/// Fails on I/O or CSV errors and on a schema violation; nothing else in
/// the run is fatal.
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;
    let records = load_records(path)?;
    Ok(Analysis::run(&records, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_with_small_threshold() {
        let records = vec![
            StormRecord::new("TORNADO", "4/18/1950 0:00:00", 1.0, 10.0, 25.0, 0.0),
            StormRecord::new("TORNADO", "4/18/1950 0:00:00", 3.0, 0.0, 5.0, 0.0),
            StormRecord::new("HAIL", "5/1/1951 0:00:00", 0.0, 2.0, 1.0, 9.0),
        ];
        let config = AnalysisConfig {
            frequency_threshold: 1,
            ..Default::default()
        };

        let analysis = Analysis::run(&records, &config);

        assert_eq!(analysis.total_records, 3);
        assert_eq!(analysis.retained_records, 2);
        assert_eq!(analysis.top_health()[0].event_type, "TORNADO");
        assert_eq!(analysis.top_health()[0].score, 2.0 * 2.0 + 5.0);
        assert_eq!(analysis.top_economic()[0].score, 15.0);
        assert_eq!(
            analysis.summary(Field::Fatalities).and_then(|s| s.get("TORNADO")),
            Some(2.0)
        );
        assert_eq!(analysis.damage.len(), 1);
    }

    #[test]
    fn test_report_snapshot() {
        let records = vec![StormRecord::new("HAIL", "5/1/1951 0:00:00", 0.0, 2.0, 1.0, 9.0)];
        let config = AnalysisConfig {
            frequency_threshold: 0,
            top_n: 1,
            ..Default::default()
        };

        let report = Analysis::run(&records, &config).report();
        assert_eq!(report.health.len(), 1);
        assert_eq!(report.top_categories, vec![("HAIL".to_string(), 1)]);
        assert_eq!(report.yearly_damage, vec![(1951, 10.0)]);
    }

    #[test]
    fn test_tied_health_scores_keep_first_seen_event_order() {
        let mut first = StormRecord::new("X", "1/1/2000 0:00:00", 0.0, 2.0, 0.0, 0.0);
        first.fatalities = None;
        let records = vec![
            first,
            StormRecord::new("Y", "1/1/2000 0:00:00", 0.0, 2.0, 0.0, 0.0),
        ];
        let config = AnalysisConfig {
            frequency_threshold: 0,
            ..Default::default()
        };

        let analysis = Analysis::run(&records, &config);
        let order: Vec<_> = analysis
            .health
            .entries()
            .iter()
            .map(|e| (e.event_type.as_str(), e.score))
            .collect();
        assert_eq!(order, vec![("X", 2.0), ("Y", 2.0)]);
    }
}
