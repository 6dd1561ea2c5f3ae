//! Roster-level analysis: position groups, strengths, weaknesses and depth

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

use crate::analyzer::{PlayerAnalysis, PlayerAnalyzer, TrendDirection};
use crate::config::TeamThresholds;
use crate::error::Result;
use crate::models::{Position, RosterLimits};
use crate::stats::round2;

/// Maximum number of improvement suggestions returned
const MAX_SUGGESTIONS: usize = 10;

/// Average above which a depth player counts as a reliable starter
const STARTER_AVERAGE: f64 = 10.0;

/// Roster players at one position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionGroup {
    pub position: Position,
    /// Rostered players at the position, with or without stats
    pub roster_count: usize,
    /// Analyses for the rostered players that have stats
    pub players: Vec<PlayerAnalysis>,
    pub total_avg: f64,
    pub avg_per_player: f64,
}

/// A position group scoring above its strength threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strength {
    pub position: Position,
    pub avg_per_player: f64,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Strong {} position (avg {} pts)", self.position, self.avg_per_player)
    }
}

/// A gap in the roster
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Weakness {
    /// Nobody rostered at the position
    Unfilled { position: Position },
    /// Fewer players than the roster allows
    Underfilled { position: Position, count: usize, limit: usize },
    /// Rostered players average below the weakness threshold
    LowScoring { position: Position, avg_per_player: f64 },
}

impl Weakness {
    pub fn position(&self) -> Position {
        match self {
            Weakness::Unfilled { position }
            | Weakness::Underfilled { position, .. }
            | Weakness::LowScoring { position, .. } => *position,
        }
    }
}

impl fmt::Display for Weakness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weakness::Unfilled { position } => write!(f, "No {position} on roster"),
            Weakness::Underfilled { position, count, limit } => {
                write!(f, "Only {count}/{limit} {position} positions filled")
            }
            Weakness::LowScoring { position, avg_per_player } => {
                write!(f, "Weak {position} position (avg {avg_per_player} pts)")
            }
        }
    }
}

/// Snapshot of the whole roster
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamAnalysis {
    pub team_size: usize,
    /// Sum of per-player window averages
    pub total_projected_points: f64,
    pub by_position: BTreeMap<Position, PositionGroup>,
    pub strengths: Vec<Strength>,
    pub weaknesses: Vec<Weakness>,
}

impl TeamAnalysis {
    /// Rostered headcount at a position
    pub fn roster_count(&self, position: Position) -> usize {
        self.by_position.get(&position).map_or(0, |g| g.roster_count)
    }

    pub fn has_weakness_at(&self, position: Position) -> bool {
        self.weaknesses.iter().any(|w| w.position() == position)
    }

    /// Every analysed roster player
    pub fn analyses(&self) -> impl Iterator<Item = &PlayerAnalysis> {
        self.by_position.values().flat_map(|g| g.players.iter())
    }
}

/// Qualitative depth at a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DepthGrade {
    None,
    Shallow,
    Adequate,
    Good,
    Excellent,
}

impl DepthGrade {
    /// Grade from analyses sorted by average, best first
    fn from_sorted(analyses: &[PlayerAnalysis]) -> Self {
        let starters = |n: usize| analyses.iter().take(n).all(|a| a.avg_points > STARTER_AVERAGE);

        match analyses.len() {
            0 => DepthGrade::None,
            1 => DepthGrade::Shallow,
            2 if starters(2) => DepthGrade::Good,
            2 => DepthGrade::Adequate,
            _ if starters(2) => DepthGrade::Excellent,
            _ => DepthGrade::Good,
        }
    }
}

/// Depth report for one position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionDepth {
    pub position: Position,
    pub count: usize,
    pub max_allowed: usize,
    /// Analysed players, best average first
    pub players: Vec<PlayerAnalysis>,
    pub depth: DepthGrade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

/// What an improvement suggestion asks the user to do
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SuggestionAction {
    AddPosition { position: Position },
    UpgradePosition { position: Position },
    TradeAway { player_id: String, name: String },
}

impl SuggestionAction {
    /// Position the action wants to acquire, if any
    pub fn target_position(&self) -> Option<Position> {
        match self {
            SuggestionAction::AddPosition { position }
            | SuggestionAction::UpgradePosition { position } => Some(*position),
            SuggestionAction::TradeAway { .. } => None,
        }
    }
}

impl fmt::Display for SuggestionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionAction::AddPosition { position } => {
                write!(f, "Add a {position} player to your roster")
            }
            SuggestionAction::UpgradePosition { position } => {
                write!(f, "Upgrade your {position} position")
            }
            SuggestionAction::TradeAway { name, .. } => write!(f, "Consider trading {name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub priority: Priority,
    pub action: SuggestionAction,
    pub reason: String,
}

/// Analyses the user's roster as a whole
#[derive(Clone)]
pub struct TeamAnalyzer {
    analyzer: PlayerAnalyzer,
    limits: RosterLimits,
    thresholds: TeamThresholds,
}

impl TeamAnalyzer {
    pub fn new(analyzer: PlayerAnalyzer, limits: RosterLimits, thresholds: TeamThresholds) -> Self {
        Self { analyzer, limits, thresholds }
    }

    pub fn limits(&self) -> &RosterLimits {
        &self.limits
    }

    /// Group the roster by position and grade each group.
    ///
    /// An empty roster yields an empty analysis with no weaknesses.
    pub fn team_analysis(&self) -> Result<TeamAnalysis> {
        let roster = self.analyzer.source().roster()?;
        if roster.is_empty() {
            debug!("Roster is empty, nothing to analyse");
            return Ok(TeamAnalysis::default());
        }

        let mut by_position: BTreeMap<Position, PositionGroup> = BTreeMap::new();
        for player in &roster {
            let outcome = self.analyzer.analyze(&player.player_id)?;
            let group = by_position.entry(player.position).or_insert_with(|| PositionGroup {
                position: player.position,
                roster_count: 0,
                players: Vec::new(),
                total_avg: 0.0,
                avg_per_player: 0.0,
            });

            group.roster_count += 1;
            if let Some(analysis) = outcome.analysis() {
                group.total_avg += analysis.avg_points;
                group.players.push(analysis.clone());
            }
        }

        for group in by_position.values_mut() {
            group.total_avg = round2(group.total_avg);
            if !group.players.is_empty() {
                group.avg_per_player = round2(group.total_avg / group.players.len() as f64);
            }
        }

        let total_projected_points = round2(by_position.values().map(|g| g.total_avg).sum());
        let strengths = self.identify_strengths(&by_position);
        let weaknesses = self.identify_weaknesses(&by_position);

        info!(
            "Team analysis: {} players, {:.2} projected pts, {} strengths, {} weaknesses",
            roster.len(),
            total_projected_points,
            strengths.len(),
            weaknesses.len()
        );

        Ok(TeamAnalysis {
            team_size: roster.len(),
            total_projected_points,
            by_position,
            strengths,
            weaknesses,
        })
    }

    fn identify_strengths(&self, groups: &BTreeMap<Position, PositionGroup>) -> Vec<Strength> {
        groups
            .values()
            .filter(|g| g.avg_per_player > self.thresholds.strong.get(g.position))
            .map(|g| Strength { position: g.position, avg_per_player: g.avg_per_player })
            .collect()
    }

    fn identify_weaknesses(&self, groups: &BTreeMap<Position, PositionGroup>) -> Vec<Weakness> {
        let mut weaknesses = Vec::new();

        for position in Position::ALL {
            let limit = self.limits.get(position);
            if limit == 0 {
                continue;
            }

            let count = groups.get(&position).map_or(0, |g| g.roster_count);
            if count == 0 {
                weaknesses.push(Weakness::Unfilled { position });
            } else if count < limit {
                weaknesses.push(Weakness::Underfilled { position, count, limit });
            }
        }

        for group in groups.values() {
            let avg = group.avg_per_player;
            if avg > 0.0 && avg < self.thresholds.weak.get(group.position) {
                weaknesses
                    .push(Weakness::LowScoring { position: group.position, avg_per_player: avg });
            }
        }

        weaknesses
    }

    /// Depth at one position, best players first
    pub fn position_depth(&self, position: Position) -> Result<PositionDepth> {
        let roster = self.analyzer.source().roster()?;
        let at_position: Vec<_> = roster.iter().filter(|p| p.position == position).collect();

        let mut players = Vec::new();
        for player in &at_position {
            if let Some(analysis) = self.analyzer.analyze(&player.player_id)?.analysis() {
                players.push(analysis.clone());
            }
        }
        players.sort_by(|a, b| b.avg_points.total_cmp(&a.avg_points));

        Ok(PositionDepth {
            position,
            count: at_position.len(),
            max_allowed: self.limits.get(position),
            depth: DepthGrade::from_sorted(&players),
            players,
        })
    }

    /// Prioritised actions derived from weaknesses and declining players
    pub fn suggest_improvements(&self) -> Result<Vec<Suggestion>> {
        let analysis = self.team_analysis()?;
        Ok(Self::suggestions_for(&analysis))
    }

    pub(crate) fn suggestions_for(analysis: &TeamAnalysis) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        for weakness in &analysis.weaknesses {
            match weakness {
                Weakness::Unfilled { position } => suggestions.push(Suggestion {
                    priority: Priority::High,
                    action: SuggestionAction::AddPosition { position: *position },
                    reason: "Position not filled".to_string(),
                }),
                Weakness::LowScoring { position, .. } => suggestions.push(Suggestion {
                    priority: Priority::Medium,
                    action: SuggestionAction::UpgradePosition { position: *position },
                    reason: "Below average performance".to_string(),
                }),
                Weakness::Underfilled { .. } => {}
            }
        }

        for player in analysis.analyses().filter(|a| a.trend == TrendDirection::Declining) {
            suggestions.push(Suggestion {
                priority: Priority::Medium,
                action: SuggestionAction::TradeAway {
                    player_id: player.player.player_id.clone(),
                    name: player.player.name.clone(),
                },
                reason: "Performance declining".to_string(),
            });
        }

        suggestions.truncate(MAX_SUGGESTIONS);
        suggestions
    }
}
