use serde::{Deserialize, Serialize};

use crate::analyzers::frequency::DEFAULT_FREQUENCY_THRESHOLD;
use crate::analyzers::scoring::{DEFAULT_FATALITY_WEIGHT, DEFAULT_TOP_N};
use crate::error::{PipelineError, Result};

/// Tunables for one analysis run.
///
/// Stored as a JSON object on disk; absent keys take their defaults:
/// ```json
/// {
///   "frequency_threshold": 150,
///   "fatality_weight": 2.0,
///   "top_n": 5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Event types must occur more often than this to be analysed.
    pub frequency_threshold: u64,
    /// Multiplier on mean fatalities in the health score.
    pub fatality_weight: f64,
    /// Ranked entries surfaced per question.
    pub top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            frequency_threshold: DEFAULT_FREQUENCY_THRESHOLD,
            fatality_weight: DEFAULT_FATALITY_WEIGHT,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl AnalysisConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&content)
            .map_err(|e| PipelineError::Config(format!("{path}: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fatality_weight.is_finite() || self.fatality_weight < 0.0 {
            return Err(PipelineError::Config(format!(
                "fatality_weight must be a finite non-negative number, got {}",
                self.fatality_weight
            )));
        }
        if self.top_n == 0 {
            return Err(PipelineError::Config("top_n must be at least 1".into()));
        }
        Ok(())
    }
}
