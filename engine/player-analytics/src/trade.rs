//! Trade evaluation, trade suggestions and acquisition targets

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::{debug, info};

use crate::analyzer::{PlayerAnalyzer, TrendDirection};
use crate::error::{AnalyticsError, Result};
use crate::models::{Player, Position};
use crate::stats::round2;
use crate::team::{TeamAnalysis, TeamAnalyzer};
use crate::valuation::{outcome_value, player_value};

/// Maximum relative value gap for a suggested 1-for-1 trade
const FAIR_VALUE_GAP: f64 = 0.2;
const MAX_TRADE_SUGGESTIONS: usize = 5;
/// Ranked players considered per needed position
const TARGETS_PER_POSITION: usize = 5;
/// Recent average over earlier average that marks a roster player to shop
const SHOP_SPIKE_RATIO: f64 = 1.3;
/// Players at a position below which losing one weakens depth
const MIN_POSITION_DEPTH: usize = 2;

/// Verdict for a trade, from the percentage change in value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "STRONG ACCEPT")]
    StrongAccept,
    #[serde(rename = "ACCEPT")]
    Accept,
    #[serde(rename = "FAIR TRADE")]
    FairTrade,
    #[serde(rename = "DECLINE")]
    Decline,
    #[serde(rename = "STRONG DECLINE")]
    StrongDecline,
}

impl Recommendation {
    pub fn from_percent_change(percent_change: f64) -> Self {
        if percent_change > 15.0 {
            Recommendation::StrongAccept
        } else if percent_change > 5.0 {
            Recommendation::Accept
        } else if percent_change > -5.0 {
            Recommendation::FairTrade
        } else if percent_change > -15.0 {
            Recommendation::Decline
        } else {
            Recommendation::StrongDecline
        }
    }

    fn reason(self, percent_change: f64) -> String {
        match self {
            Recommendation::StrongAccept => {
                format!("Excellent value gain of {:.1}%", percent_change.abs())
            }
            Recommendation::Accept => format!("Good value gain of {:.1}%", percent_change),
            Recommendation::FairTrade => "Values are relatively equal".to_string(),
            Recommendation::Decline => format!("Losing {:.1}% value", percent_change.abs()),
            Recommendation::StrongDecline => {
                format!("Significant value loss of {:.1}%", percent_change.abs())
            }
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recommendation::StrongAccept => "STRONG ACCEPT",
            Recommendation::Accept => "ACCEPT",
            Recommendation::FairTrade => "FAIR TRADE",
            Recommendation::Decline => "DECLINE",
            Recommendation::StrongDecline => "STRONG DECLINE",
        };
        f.write_str(label)
    }
}

/// What gets written to the trade audit log for every evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeAuditRecord {
    pub given: Vec<String>,
    pub received: Vec<String>,
    pub recommendation: Recommendation,
    pub value_delta: f64,
}

/// One known player on a side of the trade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradePlayerDetail {
    pub player: Player,
    pub value: f64,
    pub avg_points: f64,
    pub trend: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeEvaluation {
    pub giving: Vec<TradePlayerDetail>,
    pub receiving: Vec<TradePlayerDetail>,
    pub value_giving: f64,
    pub value_receiving: f64,
    /// Received minus given value
    pub value_difference: f64,
    pub percent_change: f64,
    pub recommendation: Recommendation,
    /// Band text followed by any positional notes
    pub reason: String,
    pub positional_notes: Vec<String>,
}

/// A trade scenario: player ids given away and received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeProposal {
    pub given: Vec<String>,
    pub received: Vec<String>,
}

impl TradeProposal {
    pub fn new<S: Into<String>>(
        given: impl IntoIterator<Item = S>,
        received: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            given: given.into_iter().map(Into::into).collect(),
            received: received.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result for one scenario of a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Evaluated(Box<TradeEvaluation>),
    Rejected { proposal: TradeProposal, error: String },
}

impl BatchOutcome {
    pub fn evaluation(&self) -> Option<&TradeEvaluation> {
        match self {
            BatchOutcome::Evaluated(evaluation) => Some(evaluation),
            BatchOutcome::Rejected { .. } => None,
        }
    }
}

/// A roster player whose value is close to a target's
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSuggestion {
    pub your_player: Player,
    pub target_player: Player,
    pub evaluation: TradeEvaluation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeTarget {
    pub player: Player,
    pub reason: String,
    pub value: f64,
    pub avg_points: f64,
}

/// Players worth acquiring and roster players worth shopping
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradeTargets {
    pub to_acquire: Vec<TradeTarget>,
    pub to_trade_away: Vec<TradeTarget>,
}

/// Values trades by comparing the summed player value on each side
#[derive(Clone)]
pub struct TradeEvaluator {
    analyzer: PlayerAnalyzer,
    team: TeamAnalyzer,
}

impl TradeEvaluator {
    pub fn new(analyzer: PlayerAnalyzer, team: TeamAnalyzer) -> Self {
        Self { analyzer, team }
    }

    pub fn player_value(&self, player_id: &str) -> Result<f64> {
        self.analyzer.player_value(player_id)
    }

    /// Evaluate giving away `given` for `received` and log it to the audit trail.
    ///
    /// Fails with a validation error when either side is empty or a player
    /// appears on both sides. Unknown players count as zero value.
    pub fn evaluate_trade<S: AsRef<str>>(
        &self,
        given: &[S],
        received: &[S],
    ) -> Result<TradeEvaluation> {
        let given: Vec<&str> = given.iter().map(AsRef::as_ref).collect();
        let received: Vec<&str> = received.iter().map(AsRef::as_ref).collect();

        if given.is_empty() || received.is_empty() {
            return Err(AnalyticsError::validation(
                "A trade needs at least one player on each side",
            ));
        }
        if let Some(both) = given.iter().find(|id| received.contains(*id)) {
            return Err(AnalyticsError::validation(format!(
                "Player {both} appears on both sides of the trade"
            )));
        }

        let (giving, value_giving) = self.side(&given)?;
        let (receiving, value_receiving) = self.side(&received)?;

        let value_difference = round2(value_receiving - value_giving);
        let percent_change = if value_giving > 0.0 {
            (value_receiving - value_giving) / value_giving * 100.0
        } else {
            0.0
        };
        let recommendation = Recommendation::from_percent_change(percent_change);

        let team = self.team.team_analysis()?;
        let positional_notes = positional_notes(&giving, &receiving, &team);

        let mut reason = recommendation.reason(percent_change);
        if !positional_notes.is_empty() {
            reason = format!("{}. {}", reason, positional_notes.join(" "));
        }

        info!(
            "Trade {:?} for {:?}: {} ({:+.2} value, {:+.2}%)",
            given, received, recommendation, value_difference, percent_change
        );

        self.analyzer.source().record_trade_audit(&TradeAuditRecord {
            given: given.iter().map(|id| id.to_string()).collect(),
            received: received.iter().map(|id| id.to_string()).collect(),
            recommendation,
            value_delta: value_difference,
        });

        Ok(TradeEvaluation {
            giving,
            receiving,
            value_giving: round2(value_giving),
            value_receiving: round2(value_receiving),
            value_difference,
            percent_change: round2(percent_change),
            recommendation,
            reason,
            positional_notes,
        })
    }

    /// Known players on one side and the side's total value
    fn side(&self, ids: &[&str]) -> Result<(Vec<TradePlayerDetail>, f64)> {
        let mut details = Vec::new();
        let mut total = 0.0;

        for id in ids {
            let outcome = self.analyzer.analyze(id)?;
            let value = outcome_value(&outcome);
            total += value;

            match outcome.player() {
                Some(player) => details.push(TradePlayerDetail {
                    player: player.clone(),
                    value,
                    avg_points: outcome.avg_points(),
                    trend: outcome.trend(),
                }),
                None => debug!("Unknown player {} counted as zero value", id),
            }
        }

        Ok((details, total))
    }

    /// Roster players within 20% of the target's value, each evaluated as a
    /// 1-for-1 trade, closest values first
    pub fn suggest_trades_for(&self, target_id: &str) -> Result<Vec<TradeSuggestion>> {
        let target = self
            .analyzer
            .source()
            .player(target_id)?
            .ok_or_else(|| AnalyticsError::PlayerNotFound(target_id.to_string()))?;
        let target_value = self.analyzer.player_value(target_id)?;

        let mut suggestions = Vec::new();
        for player in self.analyzer.source().roster()? {
            if player.player_id == target_id {
                continue;
            }

            let my_value = self.analyzer.player_value(&player.player_id)?;
            let larger = my_value.max(target_value);
            if larger <= 0.0 || (target_value - my_value).abs() / larger >= FAIR_VALUE_GAP {
                continue;
            }

            let evaluation = self.evaluate_trade(&[player.player_id.as_str()], &[target_id])?;
            suggestions.push(TradeSuggestion {
                your_player: player,
                target_player: target.clone(),
                evaluation,
            });
        }

        suggestions.sort_by(|a, b| {
            a.evaluation
                .value_difference
                .abs()
                .total_cmp(&b.evaluation.value_difference.abs())
        });
        suggestions.truncate(MAX_TRADE_SUGGESTIONS);
        Ok(suggestions)
    }

    /// Evaluate many scenarios, best value difference first.
    ///
    /// Invalid scenarios are kept as `Rejected` after the evaluated ones;
    /// data-source failures abort the whole batch.
    pub fn batch_evaluate(&self, proposals: &[TradeProposal]) -> Result<Vec<BatchOutcome>> {
        let mut outcomes = Vec::with_capacity(proposals.len());

        for proposal in proposals {
            match self.evaluate_trade(&proposal.given, &proposal.received) {
                Ok(evaluation) => outcomes.push(BatchOutcome::Evaluated(Box::new(evaluation))),
                Err(AnalyticsError::Validation(error)) => outcomes.push(BatchOutcome::Rejected {
                    proposal: proposal.clone(),
                    error,
                }),
                Err(e) => return Err(e),
            }
        }

        outcomes.sort_by(|a, b| match (a.evaluation(), b.evaluation()) {
            (Some(a), Some(b)) => b.value_difference.total_cmp(&a.value_difference),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        info!("Evaluated {} trade scenarios", outcomes.len());
        Ok(outcomes)
    }

    /// Acquisition targets for positions the roster needs, plus roster
    /// players that are declining or spiking
    pub fn find_trade_targets(&self) -> Result<TradeTargets> {
        let team = self.team.team_analysis()?;
        let suggestions = TeamAnalyzer::suggestions_for(&team);
        let roster = self.analyzer.source().roster()?;
        let rostered: HashSet<&str> = roster.iter().map(|p| p.player_id.as_str()).collect();

        let mut targets = TradeTargets::default();

        for suggestion in &suggestions {
            let Some(position) = suggestion.action.target_position() else {
                continue;
            };

            let rankings = self.analyzer.rank_position(position, None)?;
            for ranking in rankings
                .into_iter()
                .filter(|r| !rostered.contains(r.player.player_id.as_str()))
                .take(TARGETS_PER_POSITION)
            {
                targets.to_acquire.push(TradeTarget {
                    value: self.analyzer.player_value(&ranking.player.player_id)?,
                    reason: suggestion.action.to_string(),
                    avg_points: ranking.avg_points,
                    player: ranking.player,
                });
            }
        }

        for analysis in team.analyses() {
            let spiking = analysis.recent_avg > analysis.earlier_avg * SHOP_SPIKE_RATIO;
            if analysis.trend == TrendDirection::Declining || spiking {
                targets.to_trade_away.push(TradeTarget {
                    player: analysis.player.clone(),
                    reason: format!("Trending {}", analysis.trend),
                    value: player_value(analysis),
                    avg_points: analysis.avg_points,
                });
            }
        }

        info!(
            "Trade targets: {} to acquire, {} to trade away",
            targets.to_acquire.len(),
            targets.to_trade_away.len()
        );
        Ok(targets)
    }
}

/// Depth and weakness notes for the positions a trade touches
fn positional_notes(
    giving: &[TradePlayerDetail],
    receiving: &[TradePlayerDetail],
    team: &TeamAnalysis,
) -> Vec<String> {
    let count = |side: &[TradePlayerDetail]| {
        let mut counts: BTreeMap<Position, usize> = BTreeMap::new();
        for detail in side {
            *counts.entry(detail.player.position).or_default() += 1;
        }
        counts
    };
    let out = count(giving);
    let incoming = count(receiving);

    let mut notes = Vec::new();
    for (&position, &given) in &out {
        let gained = incoming.get(&position).copied().unwrap_or(0);
        if given > gained {
            let net_loss = given - gained;
            if team.roster_count(position).saturating_sub(net_loss) < MIN_POSITION_DEPTH {
                notes.push(format!("Weakens {position} depth"));
            }
        }
    }

    for &position in incoming.keys() {
        if team.has_weakness_at(position) {
            notes.push(format!("Addresses {position} weakness"));
        }
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use crate::testing::FixtureSource;

    fn evaluator(fixture: &FixtureSource) -> TradeEvaluator {
        let config = AnalyticsConfig::default();
        let analyzer = fixture.analyzer();
        let team = TeamAnalyzer::new(analyzer.clone(), config.roster, config.team);
        TradeEvaluator::new(analyzer, team)
    }

    #[test]
    fn test_recommendation_bands() {
        assert_eq!(Recommendation::from_percent_change(20.0), Recommendation::StrongAccept);
        assert_eq!(Recommendation::from_percent_change(15.0), Recommendation::Accept);
        assert_eq!(Recommendation::from_percent_change(5.0), Recommendation::FairTrade);
        assert_eq!(Recommendation::from_percent_change(-5.0), Recommendation::Decline);
        assert_eq!(Recommendation::from_percent_change(-15.0), Recommendation::StrongDecline);
        assert_eq!(Recommendation::StrongAccept.to_string(), "STRONG ACCEPT");
        assert_eq!(
            serde_json::to_string(&Recommendation::FairTrade).unwrap(),
            "\"FAIR TRADE\""
        );
    }

    #[test]
    fn test_twenty_percent_gain_is_strong_accept() {
        let fixture = FixtureSource::new();
        // value 10.0 and 12.0
        fixture.add_rostered("mine", "My WR", Position::Wr, &[12.5, 12.5, 12.5, 12.5]);
        fixture.add_player("theirs", "Their WR", Position::Wr, &[15.0, 15.0, 15.0, 15.0]);

        let evaluation = evaluator(&fixture).evaluate_trade(&["mine"], &["theirs"]).unwrap();

        assert_eq!(evaluation.value_giving, 10.0);
        assert_eq!(evaluation.value_receiving, 12.0);
        assert_eq!(evaluation.value_difference, 2.0);
        assert_eq!(evaluation.percent_change, 20.0);
        assert_eq!(evaluation.recommendation, Recommendation::StrongAccept);
        assert!(evaluation.reason.starts_with("Excellent value gain of 20.0%"));
        assert_eq!(evaluation.giving[0].player.name, "My WR");
    }

    #[test]
    fn test_zero_given_value_is_fair_trade() {
        let fixture = FixtureSource::new();
        fixture.add_player("bench", "Bench RB", Position::Rb, &[]);
        fixture.add_player("star", "Star RB", Position::Rb, &[20.0, 20.0]);

        let evaluation = evaluator(&fixture).evaluate_trade(&["bench"], &["star"]).unwrap();

        assert_eq!(evaluation.value_giving, 0.0);
        assert_eq!(evaluation.percent_change, 0.0);
        assert_eq!(evaluation.recommendation, Recommendation::FairTrade);
        assert_eq!(evaluation.giving[0].trend, TrendDirection::NoData);
    }

    #[test]
    fn test_unknown_players_count_as_zero() {
        let fixture = FixtureSource::new();
        fixture.add_player("star", "Star RB", Position::Rb, &[20.0, 20.0]);

        let evaluation = evaluator(&fixture).evaluate_trade(&["star"], &["ghost"]).unwrap();

        assert!(evaluation.receiving.is_empty());
        assert_eq!(evaluation.value_receiving, 0.0);
        assert_eq!(evaluation.percent_change, -100.0);
        assert_eq!(evaluation.recommendation, Recommendation::StrongDecline);
    }

    #[test]
    fn test_invalid_trades_are_rejected() {
        let fixture = FixtureSource::new();
        fixture.add_player("a", "A", Position::Qb, &[10.0]);
        let evaluator = evaluator(&fixture);
        let none: [&str; 0] = [];

        assert!(matches!(
            evaluator.evaluate_trade(&none, &["a"]),
            Err(AnalyticsError::Validation(_))
        ));
        assert!(matches!(
            evaluator.evaluate_trade(&["a"], &none),
            Err(AnalyticsError::Validation(_))
        ));
        assert!(matches!(
            evaluator.evaluate_trade(&["a"], &["a"]),
            Err(AnalyticsError::Validation(_))
        ));
        assert!(fixture.audit_log().is_empty());
    }

    #[test]
    fn test_evaluation_is_audited() {
        let fixture = FixtureSource::new();
        fixture.add_rostered("mine", "My WR", Position::Wr, &[12.5, 12.5]);
        fixture.add_player("theirs", "Their WR", Position::Wr, &[15.0, 15.0]);

        evaluator(&fixture).evaluate_trade(&["mine"], &["theirs"]).unwrap();

        let audit = fixture.audit_log();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].given, vec!["mine".to_string()]);
        assert_eq!(audit[0].received, vec!["theirs".to_string()]);
        assert_eq!(audit[0].recommendation, Recommendation::StrongAccept);
        assert_eq!(audit[0].value_delta, 2.0);
    }

    #[test]
    fn test_positional_notes() {
        let fixture = FixtureSource::new();
        fixture.add_rostered("qb1", "Only QB", Position::Qb, &[20.0, 20.0]);
        fixture.add_player("te1", "Free TE", Position::Te, &[12.0, 12.0]);

        let evaluation = evaluator(&fixture).evaluate_trade(&["qb1"], &["te1"]).unwrap();

        assert_eq!(
            evaluation.positional_notes,
            vec!["Weakens QB depth".to_string(), "Addresses TE weakness".to_string()]
        );
        assert!(evaluation.reason.ends_with(". Weakens QB depth Addresses TE weakness"));
    }

    #[test]
    fn test_suggest_trades_for_target() {
        let fixture = FixtureSource::new();
        // values 12.0, 10.0 and 4.0
        fixture.add_rostered("close", "Close WR", Position::Wr, &[15.0, 15.0]);
        fixture.add_rostered("near", "Near WR", Position::Wr, &[12.5, 12.5]);
        fixture.add_rostered("far", "Far WR", Position::Wr, &[5.0, 5.0]);
        fixture.add_player("target", "Target WR", Position::Wr, &[14.0, 14.0]);

        let suggestions = evaluator(&fixture).suggest_trades_for("target").unwrap();

        // target value 11.2: close differs by 0.8, near by 1.2, far is out of range
        let ids: Vec<_> = suggestions.iter().map(|s| s.your_player.player_id.as_str()).collect();
        assert_eq!(ids, vec!["close", "near"]);
        assert_eq!(suggestions[0].target_player.player_id, "target");
        assert_eq!(fixture.audit_log().len(), 2);

        assert!(matches!(
            evaluator(&fixture).suggest_trades_for("ghost"),
            Err(AnalyticsError::PlayerNotFound(_))
        ));
    }

    #[test]
    fn test_batch_evaluate_orders_and_rejects() {
        let fixture = FixtureSource::new();
        fixture.add_player("a", "A", Position::Wr, &[12.5, 12.5]);
        fixture.add_player("b", "B", Position::Wr, &[15.0, 15.0]);
        fixture.add_player("c", "C", Position::Wr, &[5.0, 5.0]);

        let proposals = vec![
            TradeProposal::new(["a"], ["c"]),
            TradeProposal::new(["a"], ["a"]),
            TradeProposal::new(["a"], ["b"]),
        ];
        let outcomes = evaluator(&fixture).batch_evaluate(&proposals).unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].evaluation().unwrap().value_difference, 2.0);
        assert_eq!(outcomes[1].evaluation().unwrap().value_difference, -6.0);
        assert!(matches!(
            &outcomes[2],
            BatchOutcome::Rejected { proposal, .. } if proposal.given == vec!["a"]
        ));
    }

    #[test]
    fn test_find_trade_targets() {
        let fixture = FixtureSource::new();
        fixture.add_rostered("qb1", "Starting QB", Position::Qb, &[20.0, 20.0]);
        fixture.add_rostered("rb1", "Fading RB", Position::Rb, &[5.0, 10.0, 15.0, 20.0]);
        fixture.add_rostered("wr1", "Hot WR", Position::Wr, &[20.0, 20.0, 10.0, 10.0]);
        fixture.add_player("te1", "Top TE", Position::Te, &[14.0, 14.0]);
        fixture.add_player("te2", "Other TE", Position::Te, &[8.0, 8.0]);

        let targets = evaluator(&fixture).find_trade_targets().unwrap();

        let te_targets: Vec<_> = targets
            .to_acquire
            .iter()
            .filter(|t| t.player.position == Position::Te)
            .collect();
        assert_eq!(te_targets.len(), 2);
        assert_eq!(te_targets[0].player.player_id, "te1");
        assert_eq!(te_targets[0].reason, "Add a TE player to your roster");
        assert!(targets.to_acquire.iter().all(|t| t.player.player_id != "qb1"));

        let shop: Vec<_> =
            targets.to_trade_away.iter().map(|t| t.player.player_id.as_str()).collect();
        assert!(shop.contains(&"rb1"));
        assert!(shop.contains(&"wr1"));
        assert!(!shop.contains(&"qb1"));
        let rb = targets.to_trade_away.iter().find(|t| t.player.player_id == "rb1").unwrap();
        assert_eq!(rb.reason, "Trending declining");
    }
}
