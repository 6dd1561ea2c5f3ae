//! # Configuration Management
//!
//! Scoring mode, analysis windows, screen thresholds and roster caps. The
//! whole structure is passed into each component at construction.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::calculator::ScoringMode;
use crate::error::{AnalyticsError, Result};
use crate::models::{PositionTable, RosterLimits};

/// Main configuration for player analytics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Reception bonus scheme used when scoring raw stats
    pub scoring: ScoringMode,
    /// Lookback window configuration
    pub analysis: AnalysisConfig,
    /// Candidate screen thresholds
    pub screens: ScreenConfig,
    /// Maximum roster spots per position
    pub roster: RosterLimits,
    /// Per-position averages used to grade the roster
    pub team: TeamThresholds,
}

/// Lookback window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of recent weeks considered for trends
    pub window_size: usize,
    /// Minimum games in the window to qualify for screens
    pub min_games: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { window_size: 4, min_games: 2 }
    }
}

/// Candidate screen thresholds and result caps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Minimum trend slope for a breakout candidate
    pub breakout_min_slope: f64,
    pub breakout_limit: usize,
    /// Minimum window average for a buy-low candidate
    pub buy_low_min_avg: f64,
    pub buy_low_limit: usize,
    /// Recent average must exceed earlier average by this factor to sell high
    pub sell_high_ratio: f64,
    pub sell_high_limit: usize,
    /// Available player value must reach weakest roster value times this factor
    pub upgrade_gain_ratio: f64,
    pub upgrade_limit: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            breakout_min_slope: 3.0,
            breakout_limit: 20,
            buy_low_min_avg: 10.0,
            buy_low_limit: 15,
            sell_high_ratio: 1.2,
            sell_high_limit: 15,
            upgrade_gain_ratio: 1.2,
            upgrade_limit: 10,
        }
    }
}

/// Per-player average points that mark a position group strong or weak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamThresholds {
    pub strong: PositionTable<f64>,
    pub weak: PositionTable<f64>,
}

impl Default for TeamThresholds {
    fn default() -> Self {
        Self {
            strong: PositionTable { qb: 20.0, rb: 15.0, wr: 15.0, te: 10.0, k: 8.0, def: 8.0 },
            weak: PositionTable { qb: 15.0, rb: 10.0, wr: 10.0, te: 6.0, k: 5.0, def: 5.0 },
        }
    }
}

impl AnalyticsConfig {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `FANTASY_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(format) = std::env::var("FANTASY_SCORING_FORMAT") {
            self.scoring = format.parse()?;
        }

        if let Ok(weeks) = std::env::var("FANTASY_WEEKS_TO_ANALYZE") {
            self.analysis.window_size = weeks.parse().map_err(|_| {
                AnalyticsError::config(format!("Invalid FANTASY_WEEKS_TO_ANALYZE: {weeks}"))
            })?;
        }

        if let Ok(games) = std::env::var("FANTASY_MIN_GAMES_PLAYED") {
            self.analysis.min_games = games.parse().map_err(|_| {
                AnalyticsError::config(format!("Invalid FANTASY_MIN_GAMES_PLAYED: {games}"))
            })?;
        }

        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AnalyticsConfig =
            toml::from_str(&content).map_err(|e| AnalyticsError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| AnalyticsError::config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject configurations the analyzers cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.analysis.window_size == 0 {
            return Err(AnalyticsError::config("window_size must be at least 1"));
        }

        if self.analysis.min_games > self.analysis.window_size {
            return Err(AnalyticsError::config(format!(
                "min_games ({}) cannot exceed window_size ({})",
                self.analysis.min_games, self.analysis.window_size
            )));
        }

        if self.screens.sell_high_ratio <= 0.0 || self.screens.upgrade_gain_ratio <= 0.0 {
            return Err(AnalyticsError::config("screen ratios must be positive"));
        }

        Ok(())
    }
}
