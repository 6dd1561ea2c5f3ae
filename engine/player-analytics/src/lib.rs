//! Player Analytics
//!
//! Scores weekly stat lines, analyses each player's recent trend and
//! consistency, values players and trades, grades the user's roster and runs
//! candidate screens over the whole player pool. Storage lives behind the
//! [`PlayerDataSource`] trait; everything here is computed on demand.

pub mod analyzer;
pub mod calculator;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod screens;
pub mod source;
pub mod stats;
pub mod team;
pub mod trade;
pub mod valuation;

#[cfg(test)]
mod testing;

pub use analyzer::{AnalysisOutcome, PlayerAnalysis, PlayerAnalyzer, TrendDirection};
pub use calculator::{PointsCalculator, ScoringMode};
pub use config::AnalyticsConfig;
pub use engine::FantasyEngine;
pub use error::{AnalyticsError, Result};
pub use models::*;
pub use screens::CandidateScreens;
pub use source::PlayerDataSource;
pub use team::TeamAnalyzer;
pub use trade::{Recommendation, TradeAuditRecord, TradeEvaluator, TradeProposal};
