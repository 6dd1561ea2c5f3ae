//! Batch scans over the player pool that surface actionable subsets
//!
//! Every screen skips unknown players and players without stats, then sorts
//! and caps its result. Screens only read from the data source.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

use crate::analyzer::{PlayerAnalysis, PlayerAnalyzer, TrendDirection};
use crate::config::ScreenConfig;
use crate::error::Result;
use crate::models::{Player, Position};
use crate::stats::round2;
use crate::valuation::player_value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakoutCandidate {
    pub player: Player,
    pub trend_value: f64,
    pub avg_points: f64,
    pub recent_games: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyLowCandidate {
    pub player: Player,
    pub avg_points: f64,
    pub recent_avg: f64,
    pub earlier_avg: f64,
    /// Earlier average minus recent average
    pub dip: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellHighCandidate {
    pub player: Player,
    pub avg_points: f64,
    pub recent_avg: f64,
    pub earlier_avg: f64,
    /// Recent average minus earlier average
    pub spike: f64,
}

/// An available player worth more than the weakest roster player at a position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeCandidate {
    pub position: Position,
    pub upgrade_from: Player,
    pub upgrade_to: Player,
    pub value_gain: f64,
    pub target_analysis: PlayerAnalysis,
}

/// Runs the candidate screens with one set of thresholds
#[derive(Clone)]
pub struct CandidateScreens {
    analyzer: PlayerAnalyzer,
    config: ScreenConfig,
}

impl CandidateScreens {
    pub fn new(analyzer: PlayerAnalyzer, config: ScreenConfig) -> Self {
        Self { analyzer, config }
    }

    /// Analyses for every player with stats, optionally at one position
    fn analysed_pool(&self, position: Option<Position>) -> Result<Vec<PlayerAnalysis>> {
        let mut pool = Vec::new();
        for player in self.analyzer.source().list_players(position)? {
            match self.analyzer.analyze(&player.player_id)?.analysis() {
                Some(analysis) => pool.push(analysis.clone()),
                None => debug!("Skipping {} in screen, no stats", player.player_id),
            }
        }
        Ok(pool)
    }

    /// Improving players with a steep slope and enough games, steepest first
    pub fn breakouts(&self, position: Option<Position>) -> Result<Vec<BreakoutCandidate>> {
        let min_games = self.analyzer.config().min_games;

        let mut candidates: Vec<BreakoutCandidate> = self
            .analysed_pool(position)?
            .into_iter()
            .filter(|a| {
                a.trend == TrendDirection::Improving
                    && a.trend_value >= self.config.breakout_min_slope
                    && a.games_played >= min_games
            })
            .map(|a| BreakoutCandidate {
                trend_value: a.trend_value,
                avg_points: a.avg_points,
                recent_games: a.games_played,
                player: a.player,
            })
            .collect();

        candidates.sort_by(|a, b| b.trend_value.total_cmp(&a.trend_value));
        candidates.truncate(self.config.breakout_limit);
        info!("Breakout screen found {} candidates", candidates.len());
        Ok(candidates)
    }

    /// Solid scorers in a recent dip that are not trending down
    pub fn buy_low(&self, position: Option<Position>) -> Result<Vec<BuyLowCandidate>> {
        let mut candidates: Vec<BuyLowCandidate> = self
            .analysed_pool(position)?
            .into_iter()
            .filter(|a| {
                a.avg_points > self.config.buy_low_min_avg
                    && a.recent_avg < a.earlier_avg
                    && a.trend != TrendDirection::Declining
            })
            .map(|a| BuyLowCandidate {
                dip: round2(a.earlier_avg - a.recent_avg),
                avg_points: a.avg_points,
                recent_avg: a.recent_avg,
                earlier_avg: a.earlier_avg,
                player: a.player,
            })
            .collect();

        candidates.sort_by(|a, b| b.avg_points.total_cmp(&a.avg_points));
        candidates.truncate(self.config.buy_low_limit);
        info!("Buy-low screen found {} candidates", candidates.len());
        Ok(candidates)
    }

    /// Recent hot streaks on players whose trend is flat or falling
    pub fn sell_high(&self, position: Option<Position>) -> Result<Vec<SellHighCandidate>> {
        let mut candidates: Vec<SellHighCandidate> = self
            .analysed_pool(position)?
            .into_iter()
            .filter(|a| {
                a.recent_avg > a.earlier_avg * self.config.sell_high_ratio
                    && matches!(a.trend, TrendDirection::Declining | TrendDirection::Stable)
            })
            .map(|a| SellHighCandidate {
                spike: round2(a.recent_avg - a.earlier_avg),
                avg_points: a.avg_points,
                recent_avg: a.recent_avg,
                earlier_avg: a.earlier_avg,
                player: a.player,
            })
            .collect();

        candidates.sort_by(|a, b| b.spike.total_cmp(&a.spike));
        candidates.truncate(self.config.sell_high_limit);
        info!("Sell-high screen found {} candidates", candidates.len());
        Ok(candidates)
    }

    /// Available players clearly better than the weakest roster player at
    /// their position, biggest gain first
    pub fn upgrades(&self, position: Option<Position>) -> Result<Vec<UpgradeCandidate>> {
        let roster = self.analyzer.source().roster()?;
        let rostered: HashSet<&str> = roster.iter().map(|p| p.player_id.as_str()).collect();
        let min_games = self.analyzer.config().min_games;

        // Weakest roster player and their value per position
        let mut weakest: BTreeMap<Position, (&Player, f64)> = BTreeMap::new();
        for player in roster.iter().filter(|p| position.map_or(true, |pos| p.position == pos)) {
            let value = self.analyzer.player_value(&player.player_id)?;
            let entry = weakest.entry(player.position).or_insert((player, value));
            if value < entry.1 {
                *entry = (player, value);
            }
        }

        let mut candidates = Vec::new();
        for (&pos, &(weakest_player, weakest_value)) in &weakest {
            for analysis in self.analysed_pool(Some(pos))? {
                if rostered.contains(analysis.player.player_id.as_str()) {
                    continue;
                }

                let value = player_value(&analysis);
                if value > weakest_value
                    && value >= weakest_value * self.config.upgrade_gain_ratio
                    && analysis.games_played >= min_games
                {
                    candidates.push(UpgradeCandidate {
                        position: pos,
                        upgrade_from: weakest_player.clone(),
                        upgrade_to: analysis.player.clone(),
                        value_gain: round2(value - weakest_value),
                        target_analysis: analysis,
                    });
                }
            }
        }

        candidates.sort_by(|a, b| b.value_gain.total_cmp(&a.value_gain));
        candidates.truncate(self.config.upgrade_limit);
        info!("Upgrade screen found {} candidates", candidates.len());
        Ok(candidates)
    }
}
