//! Append-only trade audit log with an optional JSON-lines journal

use parking_lot::Mutex;
use player_analytics::TradeAuditRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::types::{Result, TradeAuditEntry};

/// Trade evaluations in the order they were recorded
#[derive(Default)]
pub struct AuditLog {
    entries: Mutex<Vec<TradeAuditEntry>>,
    journal: Option<Mutex<BufWriter<File>>>,
}

impl AuditLog {
    /// In-memory log only
    pub fn new() -> Self {
        Self::default()
    }

    /// Log backed by a journal file. Existing entries are read back first and
    /// new entries are appended one JSON object per line. Lines that do not
    /// parse (e.g. a write torn by a crash) are skipped.
    pub fn with_journal(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut entries = Vec::new();
        let mut needs_newline = false;

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            for (index, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<TradeAuditEntry>(line) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => {
                        warn!("Skipping unreadable audit entry at {:?}:{}: {}", path, index + 1, e)
                    }
                }
            }
            needs_newline = !content.is_empty() && !content.ends_with('\n');
            info!("Loaded {} trade audit entries from {:?}", entries.len(), path);
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        // Start new entries on a fresh line after a torn tail
        if needs_newline {
            writeln!(file)?;
        }

        Ok(Self { entries: Mutex::new(entries), journal: Some(Mutex::new(BufWriter::new(file))) })
    }

    /// Record an evaluation. The entry is kept in memory even when the
    /// journal write fails; the error is returned so the caller can log it.
    pub fn append(&self, record: TradeAuditRecord) -> Result<TradeAuditEntry> {
        let entry = TradeAuditEntry::new(record);
        self.entries.lock().push(entry.clone());

        if let Some(journal) = &self.journal {
            let line = serde_json::to_string(&entry)?;
            let mut writer = journal.lock();
            writeln!(writer, "{line}")?;
            writer.flush()?;
        }

        debug!("Recorded trade audit entry {}", entry.id);
        Ok(entry)
    }

    pub fn entries(&self) -> Vec<TradeAuditEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
