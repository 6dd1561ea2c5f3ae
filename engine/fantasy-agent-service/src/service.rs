//! Service state: the registry and the analytics engine built on top of it

use anyhow::{Context, Result};
use player_analytics::FantasyEngine;
use player_registry::{AuditLog, PlayerRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ServiceConfig;

/// Initialized components shared by every command
pub struct AgentService {
    /// Service configuration
    pub config: ServiceConfig,

    /// Player, stat line and roster store
    pub registry: Arc<PlayerRegistry>,

    /// Analytics over the registry
    pub engine: FantasyEngine,
}

impl AgentService {
    /// Create the registry, load the snapshot if it exists and build the engine
    pub async fn new(config: ServiceConfig) -> Result<Self> {
        info!("Initializing fantasy agent components...");

        let audit = match &config.data.audit_journal {
            Some(path) => {
                ensure_parent_dir(path)?;
                AuditLog::with_journal(path)
                    .with_context(|| format!("Failed to open trade journal: {:?}", path))?
            }
            None => AuditLog::new(),
        };

        let analytics = &config.analytics;
        let registry =
            Arc::new(PlayerRegistry::with_audit_log(analytics.scoring, analytics.roster, audit));

        let data_file = &config.data.data_file;
        if data_file.exists() {
            let summary = registry
                .load_from_file(data_file)
                .await
                .with_context(|| format!("Failed to load snapshot: {:?}", data_file))?;
            info!("Registry ready with {} players", summary.players);
        } else {
            warn!("Snapshot {:?} not found, starting with an empty registry", data_file);
        }

        let engine = FantasyEngine::new(config.analytics.clone(), registry.clone())
            .context("Failed to build analytics engine")?;

        Ok(Self { config, registry, engine })
    }

    pub fn data_file(&self) -> &PathBuf {
        &self.config.data.data_file
    }

    /// Write the registry back to the snapshot file
    pub async fn persist(&self) -> Result<()> {
        ensure_parent_dir(self.data_file())?;
        self.registry
            .save_to_file(self.data_file())
            .await
            .with_context(|| format!("Failed to save snapshot: {:?}", self.data_file()))
    }
}

fn ensure_parent_dir(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {:?}", parent))?;
        }
    }
    Ok(())
}
