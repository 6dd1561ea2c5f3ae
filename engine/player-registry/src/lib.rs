//! Player Registry - in-memory store for players, stat lines and the roster
//!
//! Implements the analytics [`PlayerDataSource`](player_analytics::PlayerDataSource)
//! trait, loads and saves JSON snapshots, and keeps the trade audit log.

pub mod audit;
pub mod registry;
pub mod roster;
pub mod types;

pub use audit::AuditLog;
pub use registry::PlayerRegistry;
pub use roster::Roster;
pub use types::{LoadSummary, RegistryError, RegistrySnapshot, TradeAuditEntry};
