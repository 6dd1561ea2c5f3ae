use chrono::{DateTime, Utc};
use player_analytics::{AnalyticsError, Player, Position, RawStats, TradeAuditRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur while reading or mutating the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Player not found in registry
    #[error("Player '{0}' not found in registry")]
    PlayerNotFound(String),

    #[error("Player '{0}' is already on the roster")]
    AlreadyOnRoster(String),

    #[error("Player '{0}' is not on the roster")]
    NotOnRoster(String),

    /// Roster already holds the maximum number of players at this position
    #[error("Roster is full at {position} ({limit} max)")]
    PositionLimitReached { position: Position, limit: usize },

    /// Snapshot or journal file errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot player with a position we do not track
    #[error("Invalid position '{position}' for player '{player_id}'")]
    InvalidPosition { player_id: String, position: String },
}

impl From<RegistryError> for AnalyticsError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::PlayerNotFound(player_id) => AnalyticsError::PlayerNotFound(player_id),
            other => AnalyticsError::data_source(other.to_string()),
        }
    }
}

/// A trade evaluation as stored in the audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeAuditEntry {
    /// Unique identifier for this entry
    pub id: Uuid,

    /// When the evaluation was recorded
    pub timestamp: DateTime<Utc>,

    #[serde(flatten)]
    pub record: TradeAuditRecord,
}

impl TradeAuditEntry {
    pub fn new(record: TradeAuditRecord) -> Self {
        Self { id: Uuid::new_v4(), timestamp: Utc::now(), record }
    }
}

/// Player as written in a snapshot file; the position is validated on load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPlayer {
    pub player_id: String,
    pub name: String,
    #[serde(default)]
    pub team: String,
    pub position: String,
}

impl SnapshotPlayer {
    pub fn into_player(self) -> Result<Player> {
        let position = self.position.parse::<Position>().map_err(|_| {
            RegistryError::InvalidPosition {
                player_id: self.player_id.clone(),
                position: self.position.clone(),
            }
        })?;
        Ok(Player::new(self.player_id, self.name, self.team, position))
    }
}

impl From<&Player> for SnapshotPlayer {
    fn from(player: &Player) -> Self {
        Self {
            player_id: player.player_id.clone(),
            name: player.name.clone(),
            team: player.team.clone(),
            position: player.position.to_string(),
        }
    }
}

/// Stat line as written in a snapshot file.
///
/// Lines with `fantasy_points` keep the reported value; lines without are
/// scored from the raw stats with the registry's scoring mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotStatLine {
    pub player_id: String,
    pub week: u32,
    pub season: i32,
    #[serde(default)]
    pub stats: RawStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fantasy_points: Option<f64>,
}

/// Full registry contents as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(default)]
    pub players: Vec<SnapshotPlayer>,
    #[serde(default)]
    pub stats: Vec<SnapshotStatLine>,
    /// Player ids on the user's roster
    #[serde(default)]
    pub roster: Vec<String>,
}

/// Counts reported after loading a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub players: usize,
    pub stat_lines: usize,
    pub rostered: usize,
}
