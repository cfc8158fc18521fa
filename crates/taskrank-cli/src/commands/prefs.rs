//! Preference commands for CLI.

use clap::Subcommand;
use serde::Serialize;
use taskrank_core::{
    Config, PreferenceResolver, PreferenceSet, PreferenceSource, PreferenceStore, StoredPreferences,
};

use super::SourceArgs;

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Show the weights a user is ranked with
    Show {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Check the user's weights lie within [0, 2]
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Create a default preference row if the user has none
    Init {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Update influence weights in the snapshot
    Set {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        fun: Option<f64>,
        #[arg(long)]
        difficulty: Option<f64>,
        #[arg(long)]
        importance: Option<f64>,
        #[arg(long)]
        time: Option<f64>,
        #[arg(long)]
        deadline: Option<f64>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrefsReport {
    user_id: String,
    stored: bool,
    #[serde(flatten)]
    preferences: PreferenceSet,
}

pub fn run(action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let fallback = config.ranking.default_preferences;

    match action {
        PrefsAction::Show { source } => {
            let (snapshot, user_id) = source.open(&config)?;
            let report = PrefsReport {
                stored: snapshot.stored_preferences(&user_id)?.is_some(),
                preferences: PreferenceResolver::with_fallback(&snapshot, fallback).resolve(&user_id),
                user_id,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        PrefsAction::Check { source } => {
            let (snapshot, user_id) = source.open(&config)?;
            PreferenceResolver::with_fallback(&snapshot, fallback)
                .resolve(&user_id)
                .validate()?;
            println!("ok");
        }
        PrefsAction::Init { source } => {
            let path = source.snapshot_path(&config)?;
            let (mut snapshot, user_id) = source.open(&config)?;
            if snapshot.ensure_preferences(&user_id)? {
                snapshot.save(&path)?;
                println!("Preferences created for user {user_id}");
            } else {
                println!("Preferences already exist for user {user_id}");
            }
        }
        PrefsAction::Set {
            source,
            fun,
            difficulty,
            importance,
            time,
            deadline,
        } => {
            let path = source.snapshot_path(&config)?;
            let (mut snapshot, user_id) = source.open(&config)?;
            let mut row = snapshot
                .stored_preferences(&user_id)?
                .unwrap_or_else(|| StoredPreferences::defaults_for(user_id.clone()));

            if let Some(v) = fun {
                row.fun_influence = Some(v);
            }
            if let Some(v) = difficulty {
                row.difficulty_influence = Some(v);
            }
            if let Some(v) = importance {
                row.importance_influence = Some(v);
            }
            if let Some(v) = time {
                row.time_influence = Some(v);
            }
            if let Some(v) = deadline {
                row.deadline_influence = Some(v);
            }

            let resolved = row.resolve_with(&fallback);
            resolved.validate()?;
            snapshot.insert_preferences(row)?;
            snapshot.save(&path)?;
            println!("Preferences updated:");
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
    }
    Ok(())
}
