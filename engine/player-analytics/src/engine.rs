//! Single entry point wiring the analyzers to one data source and config

use std::sync::Arc;
use tracing::info;

use crate::analyzer::{AnalysisOutcome, PlayerAnalyzer, PlayerComparison, PositionRanking};
use crate::calculator::PointsCalculator;
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::models::Position;
use crate::screens::{
    BreakoutCandidate, BuyLowCandidate, CandidateScreens, SellHighCandidate, UpgradeCandidate,
};
use crate::source::PlayerDataSource;
use crate::team::TeamAnalyzer;
use crate::trade::{TradeEvaluation, TradeEvaluator};

/// Owns every analytics component built from one [`AnalyticsConfig`]
#[derive(Clone)]
pub struct FantasyEngine {
    config: AnalyticsConfig,
    calculator: PointsCalculator,
    analyzer: PlayerAnalyzer,
    team: TeamAnalyzer,
    trades: TradeEvaluator,
    screens: CandidateScreens,
}

impl FantasyEngine {
    /// Validate `config` and build the components over `source`
    pub fn new(config: AnalyticsConfig, source: Arc<dyn PlayerDataSource>) -> Result<Self> {
        config.validate()?;

        let calculator = PointsCalculator::new(config.scoring);
        let analyzer = PlayerAnalyzer::new(source, config.analysis.clone());
        let team = TeamAnalyzer::new(analyzer.clone(), config.roster.clone(), config.team.clone());
        let trades = TradeEvaluator::new(analyzer.clone(), team.clone());
        let screens = CandidateScreens::new(analyzer.clone(), config.screens.clone());

        info!(
            "Fantasy engine ready ({} scoring, {}-week window)",
            config.scoring, config.analysis.window_size
        );

        Ok(Self { config, calculator, analyzer, team, trades, screens })
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn calculator(&self) -> &PointsCalculator {
        &self.calculator
    }

    pub fn analyzer(&self) -> &PlayerAnalyzer {
        &self.analyzer
    }

    pub fn team(&self) -> &TeamAnalyzer {
        &self.team
    }

    pub fn trades(&self) -> &TradeEvaluator {
        &self.trades
    }

    pub fn screens(&self) -> &CandidateScreens {
        &self.screens
    }

    pub fn analyze(&self, player_id: &str) -> Result<AnalysisOutcome> {
        self.analyzer.analyze(player_id)
    }

    pub fn rank_position(
        &self,
        position: Position,
        weeks: Option<usize>,
    ) -> Result<Vec<PositionRanking>> {
        self.analyzer.rank_position(position, weeks)
    }

    pub fn compare(&self, first_id: &str, second_id: &str) -> Result<PlayerComparison> {
        self.analyzer.compare(first_id, second_id)
    }

    pub fn evaluate_trade<S: AsRef<str>>(
        &self,
        given: &[S],
        received: &[S],
    ) -> Result<TradeEvaluation> {
        self.trades.evaluate_trade(given, received)
    }

    pub fn screen_breakouts(&self, position: Option<Position>) -> Result<Vec<BreakoutCandidate>> {
        self.screens.breakouts(position)
    }

    pub fn screen_buy_low(&self, position: Option<Position>) -> Result<Vec<BuyLowCandidate>> {
        self.screens.buy_low(position)
    }

    pub fn screen_sell_high(&self, position: Option<Position>) -> Result<Vec<SellHighCandidate>> {
        self.screens.sell_high(position)
    }

    pub fn screen_upgrades(&self, position: Option<Position>) -> Result<Vec<UpgradeCandidate>> {
        self.screens.upgrades(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::TrendDirection;
    use crate::error::AnalyticsError;
    use crate::testing::FixtureSource;

    #[test]
    fn test_rejects_invalid_config() {
        let fixture = FixtureSource::new();
        let mut config = AnalyticsConfig::default();
        config.analysis.window_size = 0;

        assert!(matches!(
            FantasyEngine::new(config, fixture.shared()),
            Err(AnalyticsError::Config(_))
        ));
    }

    #[test]
    fn test_engine_end_to_end() {
        let fixture = FixtureSource::new();
        fixture.add_rostered("mine", "My WR", Position::Wr, &[12.5, 12.5, 12.5, 12.5]);
        fixture.add_player("theirs", "Their WR", Position::Wr, &[15.0, 15.0, 15.0, 15.0]);
        fixture.add_player("riser", "Riser", Position::Wr, &[20.0, 15.0, 10.0, 5.0]);

        let engine = FantasyEngine::new(AnalyticsConfig::default(), fixture.shared()).unwrap();

        assert_eq!(engine.analyze("riser").unwrap().trend(), TrendDirection::Improving);
        assert!(matches!(engine.analyze("ghost").unwrap(), AnalysisOutcome::NotFound { .. }));
        assert_eq!(engine.rank_position(Position::Wr, None).unwrap()[0].player.player_id, "theirs");
        assert_eq!(engine.compare("theirs", "mine").unwrap().points_leader(), Some("Their WR"));

        let trade = engine.evaluate_trade(&["mine"], &["theirs"]).unwrap();
        assert_eq!(trade.percent_change, 20.0);

        assert_eq!(engine.screen_breakouts(None).unwrap().len(), 1);
        let upgrades = engine.screen_upgrades(Some(Position::Wr)).unwrap();
        assert_eq!(upgrades[0].upgrade_to.player_id, "theirs");
        assert!(engine.screen_buy_low(None).unwrap().is_empty());
        assert!(engine.screen_sell_high(None).unwrap().is_empty());
    }
}
