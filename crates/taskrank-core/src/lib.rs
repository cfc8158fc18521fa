//! # taskrank Core Library
//!
//! This library ranks a user's unfinished tasks for display. Each task gets a
//! priority score blending the user's influence weights with the task's
//! fun, difficulty, importance, time and deadline proximity; tasks are then
//! ordered pinned-first and by descending score.
//!
//! ## Architecture
//!
//! - **Task model**: read-only task records with lenient categorical levels
//!   and deadline parsing
//! - **Preferences**: per-user influence weights resolved with 1.0 defaults
//! - **Ranking**: pure scorer and stable ranker, plus a per-user service over
//!   injected sources and a clock
//! - **Storage**: TOML configuration and JSON snapshots of a task store
//!
//! ## Key Components
//!
//! - [`rank_tasks`]: score and order a task list at a given instant
//! - [`resolve_preferences`]: user id to complete influence weights
//! - [`RankingService`]: ranking for a user from a [`TaskSource`] and [`PreferenceSource`]
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod preferences;
pub mod ranking;
pub mod source;
pub mod storage;
pub mod task;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, Result, SourceError, ValidationError};
pub use preferences::{resolve_preferences, PreferenceResolver, PreferenceSet, StoredPreferences};
pub use ranking::{
    explain_task, rank_tasks, score_task, PriorityCalculator, RankingService, ScoreBreakdown,
    ScoredTask,
};
pub use source::{PreferenceSource, PreferenceStore, TaskSource};
pub use storage::{Config, Snapshot, User};
pub use task::{Category, Level, Task};
