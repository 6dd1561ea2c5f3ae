use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::AnalyticsError;
use crate::models::{PointsSource, RawStats, WeeklyStatLine};
use crate::stats::round2;

/// Reception bonus scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringMode {
    /// One point per reception
    #[default]
    #[serde(rename = "PPR", alias = "ppr", alias = "full_ppr")]
    FullPpr,
    /// Half a point per reception
    #[serde(rename = "Half-PPR", alias = "half_ppr", alias = "half-ppr")]
    HalfPpr,
    /// No reception bonus
    #[serde(rename = "Standard", alias = "standard")]
    Standard,
}

impl ScoringMode {
    pub fn reception_bonus(self) -> f64 {
        match self {
            ScoringMode::FullPpr => 1.0,
            ScoringMode::HalfPpr => 0.5,
            ScoringMode::Standard => 0.0,
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringMode::FullPpr => write!(f, "PPR"),
            ScoringMode::HalfPpr => write!(f, "Half-PPR"),
            ScoringMode::Standard => write!(f, "Standard"),
        }
    }
}

impl FromStr for ScoringMode {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "ppr" | "full-ppr" => Ok(ScoringMode::FullPpr),
            "half-ppr" | "half" => Ok(ScoringMode::HalfPpr),
            "standard" | "std" => Ok(ScoringMode::Standard),
            other => Err(AnalyticsError::config(format!("Unknown scoring format: {other}"))),
        }
    }
}

/// Fantasy points for a raw stat line, rounded to two decimals
pub fn fantasy_points(stats: &RawStats, mode: ScoringMode) -> f64 {
    let mut points = 0.0;

    // Passing: 1 point per 25 yards
    points += stats.passing_yards * 0.04;
    points += stats.passing_tds as f64 * 4.0;
    points -= stats.interceptions as f64 * 2.0;

    // Rushing and receiving: 1 point per 10 yards
    points += stats.rushing_yards * 0.1;
    points += stats.rushing_tds as f64 * 6.0;
    points += stats.receiving_yards * 0.1;
    points += stats.receiving_tds as f64 * 6.0;

    points += stats.receptions as f64 * mode.reception_bonus();
    points -= stats.fumbles_lost as f64 * 2.0;

    round2(points)
}

/// Scores stat lines under a fixed scoring mode
#[derive(Debug, Clone, Copy, Default)]
pub struct PointsCalculator {
    mode: ScoringMode,
}

impl PointsCalculator {
    /// Create a new points calculator
    pub fn new(mode: ScoringMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    pub fn calculate(&self, stats: &RawStats) -> f64 {
        fantasy_points(stats, self.mode)
    }

    /// Build a stat line whose points are derived from the raw stats
    pub fn score_line(
        &self,
        player_id: impl Into<String>,
        week: u32,
        season: i32,
        stats: RawStats,
    ) -> WeeklyStatLine {
        let player_id = player_id.into();
        let fantasy_points = self.calculate(&stats);

        debug!(
            "Scored {} week {} ({}): {:.2} pts ({})",
            player_id, week, season, fantasy_points, self.mode
        );

        WeeklyStatLine {
            player_id,
            week,
            season,
            stats,
            fantasy_points,
            points_source: PointsSource::Computed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide_receiver_game() -> RawStats {
        RawStats {
            receptions: 8,
            receiving_yards: 112.0,
            receiving_tds: 1,
            rushing_yards: 6.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_stats_score_zero_in_every_mode() {
        let stats = RawStats::default();
        for mode in [ScoringMode::FullPpr, ScoringMode::HalfPpr, ScoringMode::Standard] {
            assert_eq!(fantasy_points(&stats, mode), 0.0);
        }
    }

    #[test]
    fn test_reception_bonus_by_mode() {
        let stats = wide_receiver_game();
        // 11.2 + 6 + 0.6 = 17.8 before receptions
        assert_eq!(fantasy_points(&stats, ScoringMode::Standard), 17.8);
        assert_eq!(fantasy_points(&stats, ScoringMode::HalfPpr), 21.8);
        assert_eq!(fantasy_points(&stats, ScoringMode::FullPpr), 25.8);
    }

    #[test]
    fn test_quarterback_scoring_with_turnovers() {
        let stats = RawStats {
            passing_yards: 287.0,
            passing_tds: 2,
            interceptions: 1,
            rushing_yards: 23.0,
            fumbles_lost: 1,
            ..Default::default()
        };
        // 11.48 + 8 - 2 + 2.3 - 2 = 17.78
        assert_eq!(fantasy_points(&stats, ScoringMode::FullPpr), 17.78);
    }

    #[test]
    fn test_score_line_marks_computed_points() {
        let calculator = PointsCalculator::new(ScoringMode::HalfPpr);
        let line = calculator.score_line("6794", 5, 2024, wide_receiver_game());

        assert_eq!(line.fantasy_points, 21.8);
        assert_eq!(line.points_source, PointsSource::Computed);
    }

    #[test]
    fn test_scoring_mode_parsing() {
        assert_eq!("PPR".parse::<ScoringMode>().unwrap(), ScoringMode::FullPpr);
        assert_eq!("Half-PPR".parse::<ScoringMode>().unwrap(), ScoringMode::HalfPpr);
        assert_eq!("half_ppr".parse::<ScoringMode>().unwrap(), ScoringMode::HalfPpr);
        assert_eq!("Standard".parse::<ScoringMode>().unwrap(), ScoringMode::Standard);
        assert!("superflex".parse::<ScoringMode>().is_err());
    }
}
