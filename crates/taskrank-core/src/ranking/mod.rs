//! Priority scoring and display ordering of tasks.
//!
//! - [`priority`]: per-task score from attribute levels, weights and deadline urgency
//! - [`ranker`]: pinned-first, score-descending stable ordering
//! - [`service`]: per-user ranking over injected sources and a clock

pub mod priority;
pub mod ranker;
pub mod service;

pub use priority::{
    days_until, explain_task, round_score, score_task, urgency_level, PriorityCalculator,
    ScoreBreakdown, ScoreTerm,
};
pub use ranker::{display_order, rank_tasks, sort_ranked, ScoredTask};
pub use service::RankingService;
