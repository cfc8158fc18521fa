//! Subcommand implementations.

pub mod config;
pub mod prefs;
pub mod rank;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;
use taskrank_core::task::parse_deadline;
use taskrank_core::{Config, Snapshot};

/// Where to read tasks and preferences from, and for whom.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// User id or username
    #[arg(long, short)]
    pub user: String,
    /// Snapshot file (default: data.snapshot_path from config)
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

impl SourceArgs {
    pub fn snapshot_path(&self, config: &Config) -> Result<PathBuf, Box<dyn std::error::Error>> {
        match &self.snapshot {
            Some(path) => Ok(path.clone()),
            None => Ok(config.snapshot_path()?),
        }
    }

    /// Load the snapshot and resolve the user to an id.
    pub fn open(&self, config: &Config) -> Result<(Snapshot, String), Box<dyn std::error::Error>> {
        let path = self.snapshot_path(config)?;
        let snapshot = Snapshot::load(&path)
            .map_err(|e| format!("cannot read snapshot {}: {e}", path.display()))?;
        let user_id = snapshot.resolve_user(&self.user)?;
        Ok((snapshot, user_id))
    }
}

/// Parse `--now`, defaulting to the current time.
pub fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    match raw {
        Some(s) => parse_deadline(s).ok_or_else(|| format!("invalid --now timestamp: {s}").into()),
        None => Ok(Utc::now()),
    }
}
