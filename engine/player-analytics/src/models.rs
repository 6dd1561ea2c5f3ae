use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyticsError;

/// Roster position of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Qb,
    #[serde(rename = "RB")]
    Rb,
    #[serde(rename = "WR")]
    Wr,
    #[serde(rename = "TE")]
    Te,
    #[serde(rename = "K")]
    K,
    #[serde(rename = "DEF", alias = "DST")]
    Def,
}

impl Position {
    /// Every position in roster display order
    pub const ALL: [Position; 6] =
        [Position::Qb, Position::Rb, Position::Wr, Position::Te, Position::K, Position::Def];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Wr => "WR",
            Position::Te => "TE",
            Position::K => "K",
            Position::Def => "DEF",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QB" => Ok(Position::Qb),
            "RB" => Ok(Position::Rb),
            "WR" => Ok(Position::Wr),
            "TE" => Ok(Position::Te),
            "K" => Ok(Position::K),
            "DEF" | "DST" => Ok(Position::Def),
            other => Err(AnalyticsError::validation(format!("Unknown position: {other}"))),
        }
    }
}

/// A tracked NFL player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Provider player ID (e.g., Sleeper "4046")
    pub player_id: String,

    /// Player name (e.g., "Patrick Mahomes")
    pub name: String,

    /// Team abbreviation (e.g., "KC"), "FA" for free agents
    pub team: String,

    /// Roster position
    pub position: Position,
}

impl Player {
    /// Create a new player record
    pub fn new(
        player_id: impl Into<String>,
        name: impl Into<String>,
        team: impl Into<String>,
        position: Position,
    ) -> Self {
        Self { player_id: player_id.into(), name: name.into(), team: team.into(), position }
    }
}

/// Raw per-game counting stats. Missing fields deserialize as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStats {
    pub passing_yards: f64,
    pub passing_tds: u32,
    pub interceptions: u32,
    pub rushing_yards: f64,
    pub rushing_tds: u32,
    pub receptions: u32,
    pub receiving_yards: f64,
    pub receiving_tds: u32,
    pub fumbles_lost: u32,
}

/// Where a stat line's fantasy points came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsSource {
    /// Derived from the raw stats with the configured scoring mode
    Computed,
    /// Supplied by an external source; takes precedence over recomputation
    Reported,
}

/// One player's stats for one week of one season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStatLine {
    pub player_id: String,
    pub week: u32,
    pub season: i32,
    pub stats: RawStats,
    pub fantasy_points: f64,
    pub points_source: PointsSource,
}

impl WeeklyStatLine {
    /// A stat line carrying externally reported points, kept as-is
    pub fn reported(
        player_id: impl Into<String>,
        week: u32,
        season: i32,
        stats: RawStats,
        points: f64,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            week,
            season,
            stats,
            fantasy_points: points,
            points_source: PointsSource::Reported,
        }
    }

    /// Upsert key: one line per (player, week, season)
    pub fn key(&self) -> (&str, u32, i32) {
        (&self.player_id, self.week, self.season)
    }

    /// Chronological sort key within a single player's history
    pub fn period(&self) -> (i32, u32) {
        (self.season, self.week)
    }
}

/// The most recent stat lines for one player, newest first.
///
/// Construction sorts by (season, week) descending and keeps at most
/// `window` lines, so holders can rely on the ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecentWindow {
    lines: Vec<WeeklyStatLine>,
}

impl RecentWindow {
    pub fn new(mut lines: Vec<WeeklyStatLine>, window: usize) -> Self {
        lines.sort_by(|a, b| b.period().cmp(&a.period()));
        lines.truncate(window);
        Self { lines }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines, newest first
    pub fn lines(&self) -> &[WeeklyStatLine] {
        &self.lines
    }

    /// Fantasy points, newest first
    pub fn points(&self) -> Vec<f64> {
        self.lines.iter().map(|l| l.fantasy_points).collect()
    }

    /// The `n` most recent lines
    pub fn newest(&self, n: usize) -> &[WeeklyStatLine] {
        &self.lines[..n.min(self.lines.len())]
    }

    /// Reverse into oldest-first order for regression
    pub fn chronological(&self) -> ChronologicalSeries {
        ChronologicalSeries { points: self.lines.iter().rev().map(|l| l.fantasy_points).collect() }
    }
}

/// Fantasy points ordered oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChronologicalSeries {
    points: Vec<f64>,
}

impl ChronologicalSeries {
    pub fn from_oldest_first(points: Vec<f64>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One value per roster position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionTable<T> {
    pub qb: T,
    pub rb: T,
    pub wr: T,
    pub te: T,
    pub k: T,
    pub def: T,
}

impl<T: Copy> PositionTable<T> {
    pub fn get(&self, position: Position) -> T {
        match position {
            Position::Qb => self.qb,
            Position::Rb => self.rb,
            Position::Wr => self.wr,
            Position::Te => self.te,
            Position::K => self.k,
            Position::Def => self.def,
        }
    }
}

/// Maximum roster spots per position
pub type RosterLimits = PositionTable<usize>;

impl Default for RosterLimits {
    fn default() -> Self {
        Self { qb: 2, rb: 4, wr: 4, te: 2, k: 1, def: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(week: u32, season: i32, points: f64) -> WeeklyStatLine {
        WeeklyStatLine::reported("p1", week, season, RawStats::default(), points)
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("qb".parse::<Position>().unwrap(), Position::Qb);
        assert_eq!(" WR ".parse::<Position>().unwrap(), Position::Wr);
        assert_eq!("DST".parse::<Position>().unwrap(), Position::Def);
        assert!("LB".parse::<Position>().is_err());
        assert_eq!(Position::Def.to_string(), "DEF");
    }

    #[test]
    fn test_recent_window_orders_newest_first() {
        let lines =
            vec![line(1, 2024, 5.0), line(3, 2024, 15.0), line(17, 2023, 1.0), line(2, 2024, 10.0)];
        let window = RecentWindow::new(lines, 3);

        assert_eq!(window.len(), 3);
        assert_eq!(window.points(), vec![15.0, 10.0, 5.0]);
        assert_eq!(window.newest(2).len(), 2);
        assert_eq!(window.newest(10).len(), 3);
    }

    #[test]
    fn test_chronological_reverses_window() {
        let lines =
            vec![line(4, 2024, 20.0), line(3, 2024, 15.0), line(2, 2024, 10.0), line(1, 2024, 5.0)];
        let series = RecentWindow::new(lines, 4).chronological();

        assert_eq!(series.points(), &[5.0, 10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_reported_line_keeps_points() {
        let stats = RawStats { receptions: 8, receiving_yards: 112.0, ..RawStats::default() };
        let line = WeeklyStatLine::reported("6794", 5, 2024, stats, 30.5);

        assert_eq!(line.fantasy_points, 30.5);
        assert_eq!(line.points_source, PointsSource::Reported);
        assert_eq!(line.key(), ("6794", 5, 2024));
    }

    #[test]
    fn test_raw_stats_missing_fields_default_to_zero() {
        let stats: RawStats = serde_json::from_str(r#"{"receptions": 7}"#).unwrap();
        assert_eq!(stats.receptions, 7);
        assert_eq!(stats.passing_yards, 0.0);
        assert_eq!(stats.fumbles_lost, 0);
    }

    #[test]
    fn test_roster_limit_defaults() {
        let limits = RosterLimits::default();
        assert_eq!(limits.get(Position::Qb), 2);
        assert_eq!(limits.get(Position::Rb), 4);
        assert_eq!(limits.get(Position::Def), 1);
    }
}
