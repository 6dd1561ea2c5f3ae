//! Fantasy Agent Service Library
//!
//! Configuration loading, logging setup, service initialization and the
//! command-line handler behind the `fantasy-agent` binary.

use anyhow::{Context, Result};
use std::path::Path;

pub mod cli;
pub mod config;
pub mod logging;
pub mod service;

pub use cli::{Cli, CliHandler, Commands};
pub use config::ServiceConfig;
pub use logging::initialize_logging;
pub use service::AgentService;

/// Load configuration from an optional file and environment variables
pub fn load_configuration(config_file: Option<&Path>) -> Result<ServiceConfig> {
    config::load_config(config_file).context("Failed to load service configuration")
}
