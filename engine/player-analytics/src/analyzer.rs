//! Trend and consistency analysis over a player's recent weeks

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::{AnalyticsError, Result};
use crate::models::{ChronologicalSeries, Player, Position, RecentWindow, WeeklyStatLine};
use crate::source::PlayerDataSource;
use crate::stats::{linear_slope, mean, population_std_dev, round2};

/// Slope magnitude (points per week) separating a trend from noise
const TREND_SLOPE_THRESHOLD: f64 = 2.0;

/// Direction of a player's scoring over the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
    /// Fewer than two games in the window
    InsufficientData,
    /// No stat lines at all
    NoData,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Declining => "declining",
            TrendDirection::Stable => "stable",
            TrendDirection::InsufficientData => "insufficient_data",
            TrendDirection::NoData => "no_data",
        };
        f.write_str(label)
    }
}

/// Trend classification plus fitted slope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// Least-squares slope in points per week, rounded to two decimals
    pub slope: f64,
}

/// Mean fantasy points over the window, 0 when empty
pub fn average_points(window: &RecentWindow) -> f64 {
    round2(mean(&window.points()))
}

/// Consistency score from 0 to 100; 100 means zero relative variance
pub fn consistency_score(window: &RecentWindow) -> f64 {
    let points = window.points();
    if points.len() < 2 {
        return 0.0;
    }

    let avg = mean(&points);
    if avg == 0.0 {
        return 0.0;
    }

    // Negative means (turnover-heavy weeks) use the magnitude so the score stays in 0..=100
    let coefficient_of_variation = population_std_dev(&points) / avg.abs() * 100.0;
    round2((100.0 - coefficient_of_variation).clamp(0.0, 100.0))
}

/// Linear trend over an oldest-first series
pub fn trend(series: &ChronologicalSeries) -> Trend {
    if series.len() < 2 {
        return Trend { direction: TrendDirection::InsufficientData, slope: 0.0 };
    }

    let slope = linear_slope(series.points());
    let direction = if slope > TREND_SLOPE_THRESHOLD {
        TrendDirection::Improving
    } else if slope < -TREND_SLOPE_THRESHOLD {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    Trend { direction, slope: round2(slope) }
}

/// Recent (two newest games) and earlier (the rest) averages.
///
/// With fewer than two games recent is 0; with fewer than three, earlier
/// equals recent.
pub fn recent_split(window: &RecentWindow) -> (f64, f64) {
    let points = window.points();
    let recent = if points.len() >= 2 { mean(&points[..2]) } else { 0.0 };
    let earlier = if points.len() > 2 { mean(&points[2..]) } else { recent };
    (round2(recent), round2(earlier))
}

/// Full analysis of one player's window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerAnalysis {
    pub player: Player,
    pub avg_points: f64,
    pub consistency: f64,
    pub trend: TrendDirection,
    pub trend_value: f64,
    pub recent_avg: f64,
    pub earlier_avg: f64,
    /// Up to four most recent stat lines, newest first
    pub recent_stats: Vec<WeeklyStatLine>,
    pub games_played: usize,
    pub total_points: f64,
}

impl PlayerAnalysis {
    /// Analyse a non-empty window
    pub fn from_window(player: Player, window: &RecentWindow) -> Self {
        let trend = trend(&window.chronological());
        let (recent_avg, earlier_avg) = recent_split(window);

        Self {
            avg_points: average_points(window),
            consistency: consistency_score(window),
            trend: trend.direction,
            trend_value: trend.slope,
            recent_avg,
            earlier_avg,
            recent_stats: window.newest(4).to_vec(),
            games_played: window.len(),
            total_points: round2(window.points().iter().sum()),
            player,
        }
    }
}

/// Result of analysing a player identifier.
///
/// `NotFound` and `NoStats` are separate tags so callers can show different
/// messages; only `Analyzed` carries derived numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Analyzed(Box<PlayerAnalysis>),
    NoStats { player: Player },
    NotFound { player_id: String },
}

impl AnalysisOutcome {
    pub fn analysis(&self) -> Option<&PlayerAnalysis> {
        match self {
            AnalysisOutcome::Analyzed(analysis) => Some(analysis),
            _ => None,
        }
    }

    /// Player record, present unless the identifier was unknown
    pub fn player(&self) -> Option<&Player> {
        match self {
            AnalysisOutcome::Analyzed(analysis) => Some(&analysis.player),
            AnalysisOutcome::NoStats { player } => Some(player),
            AnalysisOutcome::NotFound { .. } => None,
        }
    }

    pub fn avg_points(&self) -> f64 {
        self.analysis().map_or(0.0, |a| a.avg_points)
    }

    pub fn consistency(&self) -> f64 {
        self.analysis().map_or(0.0, |a| a.consistency)
    }

    pub fn trend_value(&self) -> f64 {
        self.analysis().map_or(0.0, |a| a.trend_value)
    }

    pub fn trend(&self) -> TrendDirection {
        self.analysis().map_or(TrendDirection::NoData, |a| a.trend)
    }

    /// Convert into the analysis, mapping the other tags onto their errors
    pub fn into_analysis(self) -> Result<PlayerAnalysis> {
        match self {
            AnalysisOutcome::Analyzed(analysis) => Ok(*analysis),
            AnalysisOutcome::NoStats { player } => Err(AnalyticsError::NoStats(player.player_id)),
            AnalysisOutcome::NotFound { player_id } => {
                Err(AnalyticsError::PlayerNotFound(player_id))
            }
        }
    }
}

/// One row of a position ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRanking {
    pub player: Player,
    pub avg_points: f64,
    pub consistency: f64,
}

/// Which side of a comparison is ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    First,
    Second,
    Tie,
}

impl Winner {
    fn from_difference(difference: f64) -> Self {
        if difference > 0.0 {
            Winner::First
        } else if difference < 0.0 {
            Winner::Second
        } else {
            Winner::Tie
        }
    }
}

/// Side-by-side comparison of two analysed players
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerComparison {
    pub first: PlayerAnalysis,
    pub second: PlayerAnalysis,
    pub points_difference: f64,
    pub points_winner: Winner,
    pub consistency_difference: f64,
    pub consistency_winner: Winner,
}

impl PlayerComparison {
    /// Name of the player ahead on points, `None` on a tie
    pub fn points_leader(&self) -> Option<&str> {
        self.leader(self.points_winner)
    }

    /// Name of the more consistent player, `None` on a tie
    pub fn consistency_leader(&self) -> Option<&str> {
        self.leader(self.consistency_winner)
    }

    fn leader(&self, winner: Winner) -> Option<&str> {
        match winner {
            Winner::First => Some(&self.first.player.name),
            Winner::Second => Some(&self.second.player.name),
            Winner::Tie => None,
        }
    }
}

/// Analyses players pulled from a data source
#[derive(Clone)]
pub struct PlayerAnalyzer {
    source: Arc<dyn PlayerDataSource>,
    config: AnalysisConfig,
}

impl PlayerAnalyzer {
    /// Create a new analyzer
    pub fn new(source: Arc<dyn PlayerDataSource>, config: AnalysisConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn source(&self) -> &Arc<dyn PlayerDataSource> {
        &self.source
    }

    /// Recent window for a player, `weeks` overriding the configured size
    pub fn window(&self, player_id: &str, weeks: Option<usize>) -> Result<RecentWindow> {
        let size = weeks.unwrap_or(self.config.window_size);
        self.source.recent_stats(player_id, size)
    }

    /// Analyse one player over the configured window
    pub fn analyze(&self, player_id: &str) -> Result<AnalysisOutcome> {
        let Some(player) = self.source.player(player_id)? else {
            debug!("Player {} not found", player_id);
            return Ok(AnalysisOutcome::NotFound { player_id: player_id.to_string() });
        };

        let window = self.window(player_id, None)?;
        if window.is_empty() {
            debug!("No stats for {} ({})", player.name, player_id);
            return Ok(AnalysisOutcome::NoStats { player });
        }

        let analysis = PlayerAnalysis::from_window(player, &window);
        debug!(
            "Analysed {}: avg {:.2}, consistency {:.2}, trend {} ({:+.2})",
            analysis.player.name,
            analysis.avg_points,
            analysis.consistency,
            analysis.trend,
            analysis.trend_value
        );

        Ok(AnalysisOutcome::Analyzed(Box::new(analysis)))
    }

    /// Players at a position with stats, best average first
    pub fn rank_position(
        &self,
        position: Position,
        weeks: Option<usize>,
    ) -> Result<Vec<PositionRanking>> {
        let mut rankings = Vec::new();

        for player in self.source.list_players(Some(position))? {
            let window = self.window(&player.player_id, weeks)?;
            let avg_points = average_points(&window);

            if avg_points > 0.0 {
                rankings.push(PositionRanking {
                    consistency: consistency_score(&window),
                    avg_points,
                    player,
                });
            }
        }

        rankings.sort_by(|a, b| b.avg_points.total_cmp(&a.avg_points));
        Ok(rankings)
    }

    /// Compare two players; both must exist and have stats
    pub fn compare(&self, first_id: &str, second_id: &str) -> Result<PlayerComparison> {
        let first = self.analyze(first_id)?.into_analysis()?;
        let second = self.analyze(second_id)?.into_analysis()?;

        let points_difference = round2(first.avg_points - second.avg_points);
        let consistency_difference = round2(first.consistency - second.consistency);

        Ok(PlayerComparison {
            points_winner: Winner::from_difference(points_difference),
            consistency_winner: Winner::from_difference(consistency_difference),
            points_difference,
            consistency_difference,
            first,
            second,
        })
    }
}
