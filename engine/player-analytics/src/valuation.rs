//! Single scalar value per player, used to weigh trades

use tracing::debug;

use crate::analyzer::{AnalysisOutcome, PlayerAnalysis, PlayerAnalyzer};
use crate::error::Result;
use crate::stats::round2;

/// Weight on average points
const AVERAGE_WEIGHT: f64 = 0.6;
/// Consistency bonus per point of average
const CONSISTENCY_WEIGHT: f64 = 0.002;
/// Weight on the trend slope
const TREND_WEIGHT: f64 = 0.2;

/// Value of an analysed player, floored at zero.
///
/// Consistency scales with the average, so reliability counts for more on
/// high scorers.
pub fn player_value(analysis: &PlayerAnalysis) -> f64 {
    let value = analysis.avg_points * AVERAGE_WEIGHT
        + analysis.consistency * CONSISTENCY_WEIGHT * analysis.avg_points
        + analysis.trend_value * TREND_WEIGHT;

    round2(value.max(0.0))
}

/// Value of any outcome; players that are unknown or have no stats are worth 0
pub fn outcome_value(outcome: &AnalysisOutcome) -> f64 {
    outcome.analysis().map_or(0.0, player_value)
}

impl PlayerAnalyzer {
    /// Value of a player by identifier
    pub fn player_value(&self, player_id: &str) -> Result<f64> {
        let value = outcome_value(&self.analyze(player_id)?);
        debug!("Value of {}: {:.2}", player_id, value);
        Ok(value)
    }
}
