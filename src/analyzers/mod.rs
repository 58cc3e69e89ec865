//! Storm event cleaning, aggregation and ranking.
//!
//! Records are filtered by event-type frequency, averaged per event type for
//! each numeric field, and combined into health and economic rankings. Begin
//! dates are normalized separately for the damage trend series.

pub mod aggregate;
pub mod analyzer;
pub mod dates;
pub mod frequency;
pub mod scoring;
pub mod trend;
pub mod types;
pub mod utility;
