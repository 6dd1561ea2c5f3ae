//! # Command Line Interface
//!
//! Every command prints its report as pretty JSON on stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use player_analytics::{AnalysisOutcome, Position, TradeProposal};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::service::AgentService;

/// Fantasy football analysis agent
#[derive(Parser, Debug)]
#[command(name = "fantasy-agent", version)]
#[command(about = "Player trends, trade evaluation and roster analysis for fantasy football")]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Registry snapshot file, overriding the configured one
    #[arg(short, long)]
    pub data_file: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Analyse one player's recent weeks
    Analyze { player_id: String },
    /// Rank players at a position by average points
    Rank {
        position: Position,
        /// Weeks to look back, defaults to the configured window
        #[arg(long)]
        weeks: Option<usize>,
    },
    /// Compare two players side by side
    Compare { first: String, second: String },
    /// Evaluate a trade
    Trade {
        /// Player ids you give away
        #[arg(long, required = true, num_args = 1..)]
        give: Vec<String>,
        /// Player ids you receive
        #[arg(long, required = true, num_args = 1..)]
        get: Vec<String>,
    },
    /// Roster players you could offer for a target player
    SuggestTrades { target_id: String },
    /// Evaluate a JSON file of trade proposals
    Batch { file: PathBuf },
    /// Players to acquire and roster players to shop
    Targets,
    /// Players with a steep upward trend
    Breakouts {
        #[arg(long)]
        position: Option<Position>,
    },
    /// Good players in a recent dip
    BuyLow {
        #[arg(long)]
        position: Option<Position>,
    },
    /// Hot streaks on flat or falling trends
    SellHigh {
        #[arg(long)]
        position: Option<Position>,
    },
    /// Available players better than your weakest starters
    Upgrades {
        #[arg(long)]
        position: Option<Position>,
    },
    /// Strengths and weaknesses of your roster
    Team,
    /// Depth at one position
    Depth { position: Position },
    /// Prioritised roster improvements
    Improve,
    /// Show or edit your roster
    Roster {
        #[command(subcommand)]
        action: Option<RosterCommand>,
    },
    /// Search players by name
    Search { query: String },
    /// Previously evaluated trades
    History,
    /// Print the effective configuration as TOML
    ShowConfig,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RosterCommand {
    Show,
    Add { player_id: String },
    Remove { player_id: String },
}

/// CLI handler
pub struct CliHandler {
    service: AgentService,
}

impl CliHandler {
    pub fn new(service: AgentService) -> Self {
        Self { service }
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        if let Commands::ShowConfig = command {
            print!("{}", toml::to_string_pretty(&self.service.config)?);
            return Ok(());
        }

        let report = self.execute(command).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }

    /// Run a command and return its report
    pub async fn execute(&self, command: Commands) -> Result<Value> {
        let engine = &self.service.engine;
        let registry = &self.service.registry;

        let report = match command {
            Commands::Analyze { player_id } => {
                let outcome = engine.analyze(&player_id)?;
                if let AnalysisOutcome::NotFound { .. } = outcome {
                    anyhow::bail!("Player not found: {}", player_id);
                }
                to_value(&outcome)?
            }
            Commands::Rank { position, weeks } => {
                to_value(&engine.rank_position(position, weeks)?)?
            }
            Commands::Compare { first, second } => to_value(
                &engine
                    .compare(&first, &second)
                    .with_context(|| format!("Cannot compare {} and {}", first, second))?,
            )?,
            Commands::Trade { give, get } => to_value(&engine.evaluate_trade(&give, &get)?)?,
            Commands::SuggestTrades { target_id } => {
                to_value(&engine.trades().suggest_trades_for(&target_id)?)?
            }
            Commands::Batch { file } => {
                let content = tokio::fs::read_to_string(&file)
                    .await
                    .with_context(|| format!("Failed to read trade scenarios: {:?}", file))?;
                let proposals: Vec<TradeProposal> = serde_json::from_str(&content)
                    .with_context(|| format!("Invalid trade scenarios in {:?}", file))?;
                to_value(&engine.trades().batch_evaluate(&proposals)?)?
            }
            Commands::Targets => to_value(&engine.trades().find_trade_targets()?)?,
            Commands::Breakouts { position } => to_value(&engine.screen_breakouts(position)?)?,
            Commands::BuyLow { position } => to_value(&engine.screen_buy_low(position)?)?,
            Commands::SellHigh { position } => to_value(&engine.screen_sell_high(position)?)?,
            Commands::Upgrades { position } => to_value(&engine.screen_upgrades(position)?)?,
            Commands::Team => to_value(&engine.team().team_analysis()?)?,
            Commands::Depth { position } => to_value(&engine.team().position_depth(position)?)?,
            Commands::Improve => to_value(&engine.team().suggest_improvements()?)?,
            Commands::Roster { action } => match action.unwrap_or(RosterCommand::Show) {
                RosterCommand::Show => to_value(&registry.roster())?,
                RosterCommand::Add { player_id } => {
                    let player = registry.add_to_roster(&player_id)?;
                    self.service.persist().await?;
                    json!({ "added": player })
                }
                RosterCommand::Remove { player_id } => {
                    registry.remove_from_roster(&player_id)?;
                    self.service.persist().await?;
                    json!({ "removed": player_id })
                }
            },
            Commands::Search { query } => to_value(&registry.search_players(&query))?,
            Commands::History => to_value(&registry.trade_history())?,
            Commands::ShowConfig => to_value(&self.service.config)?,
        };

        Ok(report)
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to serialize report")
}
