//! Data-access seam between the analytics core and whatever stores players

use crate::error::Result;
use crate::models::{Player, Position, RecentWindow};
use crate::trade::TradeAuditRecord;

/// Read access to players, their recent stats and the user's roster.
///
/// Calls may block on storage or network; timeouts and retries belong to the
/// implementation. The core never retries a failed call.
pub trait PlayerDataSource: Send + Sync {
    /// Look up a player by identifier
    fn player(&self, player_id: &str) -> Result<Option<Player>>;

    /// The most recent `window` stat lines for a player, newest first.
    /// Unknown players and players without stats yield an empty window.
    fn recent_stats(&self, player_id: &str, window: usize) -> Result<RecentWindow>;

    /// All known players, optionally restricted to one position
    fn list_players(&self, position: Option<Position>) -> Result<Vec<Player>>;

    /// Players currently on the user's roster
    fn roster(&self) -> Result<Vec<Player>>;

    /// Append a trade evaluation to the audit log. Never fails the caller;
    /// implementations log their own write errors.
    fn record_trade_audit(&self, record: &TradeAuditRecord);
}
