//! Display ordering of scored tasks.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use super::priority::PriorityCalculator;
use crate::preferences::PreferenceSet;
use crate::task::Task;

/// A task with the score it was ranked by. Recomputed on every ranking call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: Task,
    pub priority_score: f64,
}

/// Pinned before unpinned, then higher score first.
///
/// Scores compare with `total_cmp`, so even NaN scores order deterministically.
pub fn display_order(a: &ScoredTask, b: &ScoredTask) -> Ordering {
    b.task
        .is_pinned
        .cmp(&a.task.is_pinned)
        .then_with(|| b.priority_score.total_cmp(&a.priority_score))
}

/// Stable sort into display order; ties keep their relative order.
pub fn sort_ranked(tasks: &mut [ScoredTask]) {
    tasks.sort_by(display_order);
}

/// Score every task and return them in display order.
pub fn rank_tasks(tasks: Vec<Task>, preferences: &PreferenceSet, now: DateTime<Utc>) -> Vec<ScoredTask> {
    let calculator = PriorityCalculator::new(*preferences, now);
    let mut scored: Vec<ScoredTask> = tasks
        .into_iter()
        .map(|task| {
            let priority_score = calculator.calculate_priority(&task);
            ScoredTask { task, priority_score }
        })
        .collect();
    sort_ranked(&mut scored);
    scored
}
