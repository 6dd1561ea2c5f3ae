//! In-memory data source used by the unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::analyzer::PlayerAnalyzer;
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::models::{Player, Position, RawStats, RecentWindow, WeeklyStatLine};
use crate::source::PlayerDataSource;
use crate::trade::TradeAuditRecord;

#[derive(Default)]
struct FixtureState {
    players: Vec<Player>,
    stats: HashMap<String, Vec<WeeklyStatLine>>,
    roster: Vec<String>,
    audit: Vec<TradeAuditRecord>,
}

#[derive(Clone, Default)]
pub(crate) struct FixtureSource {
    state: Arc<Mutex<FixtureState>>,
}

impl FixtureSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stat lines for `points`, newest first, in consecutive 2024 weeks
    pub(crate) fn lines(player_id: &str, points_newest_first: &[f64]) -> Vec<WeeklyStatLine> {
        let count = points_newest_first.len() as u32;
        points_newest_first
            .iter()
            .enumerate()
            .map(|(i, points)| {
                WeeklyStatLine::reported(
                    player_id,
                    count - i as u32,
                    2024,
                    RawStats::default(),
                    *points,
                )
            })
            .collect()
    }

    pub(crate) fn window(&self, player_id: &str, points_newest_first: &[f64]) -> RecentWindow {
        RecentWindow::new(Self::lines(player_id, points_newest_first), points_newest_first.len())
    }

    pub(crate) fn add_player(&self, id: &str, name: &str, position: Position, points: &[f64]) {
        let mut state = self.state.lock().unwrap();
        state.players.push(Player::new(id, name, "TST", position));
        state.stats.insert(id.to_string(), Self::lines(id, points));
    }

    pub(crate) fn add_rostered(&self, id: &str, name: &str, position: Position, points: &[f64]) {
        self.add_player(id, name, position, points);
        self.state.lock().unwrap().roster.push(id.to_string());
    }

    pub(crate) fn audit_log(&self) -> Vec<TradeAuditRecord> {
        self.state.lock().unwrap().audit.clone()
    }

    pub(crate) fn shared(&self) -> Arc<dyn PlayerDataSource> {
        Arc::new(self.clone())
    }

    pub(crate) fn analyzer(&self) -> PlayerAnalyzer {
        PlayerAnalyzer::new(self.shared(), AnalyticsConfig::default().analysis)
    }
}

impl PlayerDataSource for FixtureSource {
    fn player(&self, player_id: &str) -> Result<Option<Player>> {
        let state = self.state.lock().unwrap();
        Ok(state.players.iter().find(|p| p.player_id == player_id).cloned())
    }

    fn recent_stats(&self, player_id: &str, window: usize) -> Result<RecentWindow> {
        let state = self.state.lock().unwrap();
        let lines = state.stats.get(player_id).cloned().unwrap_or_default();
        Ok(RecentWindow::new(lines, window))
    }

    fn list_players(&self, position: Option<Position>) -> Result<Vec<Player>> {
        let state = self.state.lock().unwrap();
        let mut players: Vec<Player> = state
            .players
            .iter()
            .filter(|p| position.map_or(true, |pos| p.position == pos))
            .cloned()
            .collect();
        players.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(players)
    }

    fn roster(&self) -> Result<Vec<Player>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .roster
            .iter()
            .filter_map(|id| state.players.iter().find(|p| &p.player_id == id).cloned())
            .collect())
    }

    fn record_trade_audit(&self, record: &TradeAuditRecord) {
        self.state.lock().unwrap().audit.push(record.clone());
    }
}
