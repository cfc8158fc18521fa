mod config;
pub mod snapshot;

pub use config::{Config, DataConfig, OutputConfig, RankingConfig};
pub use snapshot::{Snapshot, User};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/taskrank[-dev]/` based on TASKRANK_ENV.
///
/// Set TASKRANK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TASKRANK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("taskrank-dev")
    } else {
        base_dir.join("taskrank")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
