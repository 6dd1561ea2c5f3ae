use parking_lot::{Mutex, RwLock};
use player_analytics::{
    Player, PlayerDataSource, PointsCalculator, PointsSource, Position, RawStats,
    RecentWindow, RosterLimits, ScoringMode, TradeAuditRecord, WeeklyStatLine,
};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::audit::AuditLog;
use crate::roster::Roster;
use crate::types::{
    LoadSummary, RegistryError, RegistrySnapshot, Result, SnapshotPlayer, SnapshotStatLine,
    TradeAuditEntry,
};

/// Maximum number of results from a name search
const MAX_SEARCH_RESULTS: usize = 20;

/// Player Registry - in-memory store behind the analytics data source
///
/// Stat lines are keyed by `(season, week)` per player, so re-ingesting the
/// same week replaces the earlier line. Roster mutations take the roster lock
/// before the player map.
pub struct PlayerRegistry {
    calculator: PointsCalculator,

    /// Map from player ID to player record
    players: RwLock<HashMap<String, Player>>,

    /// Stat lines per player, keyed by (season, week)
    stats: RwLock<HashMap<String, BTreeMap<(i32, u32), WeeklyStatLine>>>,

    roster: Mutex<Roster>,

    audit: AuditLog,
}

impl PlayerRegistry {
    /// Create a new empty registry
    pub fn new(scoring: ScoringMode, limits: RosterLimits) -> Self {
        Self::with_audit_log(scoring, limits, AuditLog::new())
    }

    /// Create a registry recording trade evaluations into `audit`
    pub fn with_audit_log(scoring: ScoringMode, limits: RosterLimits, audit: AuditLog) -> Self {
        Self {
            calculator: PointsCalculator::new(scoring),
            players: RwLock::new(HashMap::new()),
            stats: RwLock::new(HashMap::new()),
            roster: Mutex::new(Roster::new(limits)),
            audit,
        }
    }

    pub fn calculator(&self) -> &PointsCalculator {
        &self.calculator
    }

    /// Insert or replace a player record.
    ///
    /// A rostered player whose position changes moves to the new position's
    /// count; if that position is already full the player is released.
    pub fn upsert_player(&self, player: Player) {
        debug!("Upserting player {} ({})", player.name, player.player_id);
        let mut roster = self.roster.lock();
        if let Err(e) = roster.reposition(&player.player_id, player.position) {
            if roster.remove(&player.player_id).is_ok() {
                warn!("Released {} ({}) from roster: {}", player.name, player.player_id, e);
            }
        }
        self.players.write().insert(player.player_id.clone(), player);
    }

    /// Store a stat line scored from raw stats with the registry's scoring mode
    pub fn ingest_stats(
        &self,
        player_id: &str,
        week: u32,
        season: i32,
        stats: RawStats,
    ) -> Result<WeeklyStatLine> {
        self.ensure_player(player_id)?;
        let line = self.calculator.score_line(player_id, week, season, stats);
        Ok(self.store_line(line))
    }

    /// Store a stat line with externally reported points
    pub fn ingest_reported(
        &self,
        player_id: &str,
        week: u32,
        season: i32,
        stats: RawStats,
        points: f64,
    ) -> Result<WeeklyStatLine> {
        self.ensure_player(player_id)?;
        let line = WeeklyStatLine::reported(player_id, week, season, stats, points);
        Ok(self.store_line(line))
    }

    fn ensure_player(&self, player_id: &str) -> Result<()> {
        if self.players.read().contains_key(player_id) {
            Ok(())
        } else {
            Err(RegistryError::PlayerNotFound(player_id.to_string()))
        }
    }

    fn store_line(&self, line: WeeklyStatLine) -> WeeklyStatLine {
        let mut stats = self.stats.write();
        let previous = stats
            .entry(line.player_id.clone())
            .or_default()
            .insert(line.period(), line.clone());

        if previous.is_some() {
            debug!("Replaced {} week {} ({})", line.player_id, line.week, line.season);
        }
        line
    }

    /// Get a player by ID
    pub fn get_player(&self, player_id: &str) -> Option<Player> {
        self.players.read().get(player_id).cloned()
    }

    /// Most recent `window` stat lines, newest first
    pub fn recent_stats(&self, player_id: &str, window: usize) -> RecentWindow {
        let stats = self.stats.read();
        let lines: Vec<WeeklyStatLine> = stats
            .get(player_id)
            .map(|by_period| by_period.values().rev().take(window).cloned().collect())
            .unwrap_or_default();
        RecentWindow::new(lines, window)
    }

    /// All players, optionally at one position, sorted by name
    pub fn list_players(&self, position: Option<Position>) -> Vec<Player> {
        let mut players: Vec<Player> = self
            .players
            .read()
            .values()
            .filter(|p| position.map_or(true, |pos| p.position == pos))
            .cloned()
            .collect();
        players.sort_by(|a, b| a.name.cmp(&b.name));
        players
    }

    /// Search for players by partial name match
    pub fn search_players(&self, query: &str) -> Vec<Player> {
        let query_lower = query.to_lowercase();
        let mut matches: Vec<Player> = self
            .players
            .read()
            .values()
            .filter(|p| p.name.to_lowercase().contains(&query_lower))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches.truncate(MAX_SEARCH_RESULTS);
        matches
    }

    pub fn player_count(&self) -> usize {
        self.players.read().len()
    }

    pub fn stat_line_count(&self) -> usize {
        self.stats.read().values().map(BTreeMap::len).sum()
    }

    /// Add a player to the roster; the cap check and insert are atomic
    pub fn add_to_roster(&self, player_id: &str) -> Result<Player> {
        let mut roster = self.roster.lock();
        let player = self
            .get_player(player_id)
            .ok_or_else(|| RegistryError::PlayerNotFound(player_id.to_string()))?;

        roster.add(&player)?;
        info!("Added {} ({}) to roster", player.name, player.position);
        Ok(player)
    }

    pub fn remove_from_roster(&self, player_id: &str) -> Result<()> {
        let mut roster = self.roster.lock();
        if !self.players.read().contains_key(player_id) {
            return Err(RegistryError::PlayerNotFound(player_id.to_string()));
        }

        roster.remove(player_id)?;
        info!("Removed {} from roster", player_id);
        Ok(())
    }

    /// Roster players sorted by position, then name
    pub fn roster(&self) -> Vec<Player> {
        let roster = self.roster.lock();
        let players = self.players.read();

        let mut rostered: Vec<Player> =
            roster.player_ids().filter_map(|id| players.get(id).cloned()).collect();
        rostered.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.name.cmp(&b.name)));
        rostered
    }

    /// Every recorded trade evaluation, oldest first
    pub fn trade_history(&self) -> Vec<TradeAuditEntry> {
        self.audit.entries()
    }

    /// Load players, stat lines and roster ids from a JSON snapshot.
    ///
    /// Stat lines carrying `fantasy_points` keep them; the rest are scored.
    pub async fn load_from_file<P: AsRef<Path>>(&self, file_path: P) -> Result<LoadSummary> {
        info!("Loading registry snapshot from: {:?}", file_path.as_ref());

        let json_content = tokio::fs::read_to_string(&file_path).await?;
        let snapshot: RegistrySnapshot = serde_json::from_str(&json_content)?;

        let mut summary = LoadSummary::default();
        for player in snapshot.players {
            self.upsert_player(player.into_player()?);
            summary.players += 1;
        }

        for line in snapshot.stats {
            match line.fantasy_points {
                Some(points) => self.ingest_reported(
                    &line.player_id,
                    line.week,
                    line.season,
                    line.stats,
                    points,
                )?,
                None => self.ingest_stats(&line.player_id, line.week, line.season, line.stats)?,
            };
            summary.stat_lines += 1;
        }

        for player_id in &snapshot.roster {
            match self.add_to_roster(player_id) {
                Ok(_) => summary.rostered += 1,
                Err(RegistryError::AlreadyOnRoster(_)) => {
                    warn!("Duplicate roster entry {} in snapshot", player_id)
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Loaded {} players, {} stat lines, {} rostered",
            summary.players, summary.stat_lines, summary.rostered
        );
        Ok(summary)
    }

    /// Current contents in snapshot form
    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut players: Vec<SnapshotPlayer> =
            self.list_players(None).iter().map(SnapshotPlayer::from).collect();
        players.sort_by(|a, b| a.player_id.cmp(&b.player_id));

        let mut stats: Vec<SnapshotStatLine> = self
            .stats
            .read()
            .values()
            .flat_map(|by_period| by_period.values())
            .map(|line| SnapshotStatLine {
                player_id: line.player_id.clone(),
                week: line.week,
                season: line.season,
                stats: line.stats,
                fantasy_points: match line.points_source {
                    PointsSource::Reported => Some(line.fantasy_points),
                    PointsSource::Computed => None,
                },
            })
            .collect();
        stats.sort_by(|a, b| {
            a.player_id.cmp(&b.player_id).then((a.season, a.week).cmp(&(b.season, b.week)))
        });

        let roster = self.roster.lock().player_ids().map(str::to_string).collect();

        RegistrySnapshot { players, stats, roster }
    }

    /// Write the current contents as a pretty-printed JSON snapshot
    pub async fn save_to_file<P: AsRef<Path>>(&self, file_path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        tokio::fs::write(&file_path, json).await?;
        info!("Saved registry snapshot to {:?}", file_path.as_ref());
        Ok(())
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new(ScoringMode::default(), RosterLimits::default())
    }
}

impl PlayerDataSource for PlayerRegistry {
    fn player(&self, player_id: &str) -> player_analytics::Result<Option<Player>> {
        Ok(self.get_player(player_id))
    }

    fn recent_stats(
        &self,
        player_id: &str,
        window: usize,
    ) -> player_analytics::Result<RecentWindow> {
        Ok(PlayerRegistry::recent_stats(self, player_id, window))
    }

    fn list_players(&self, position: Option<Position>) -> player_analytics::Result<Vec<Player>> {
        Ok(PlayerRegistry::list_players(self, position))
    }

    fn roster(&self) -> player_analytics::Result<Vec<Player>> {
        Ok(PlayerRegistry::roster(self))
    }

    fn record_trade_audit(&self, record: &TradeAuditRecord) {
        if let Err(e) = self.audit.append(record.clone()) {
            warn!("Failed to record trade audit entry: {}", e);
        }
    }
}
