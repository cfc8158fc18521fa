//! Task priority score calculation.
//!
//! A task's score is a weighted sum over four attribute factors plus, when
//! the task has a deadline, a deadline-urgency factor:
//! - Fun (more fun = higher priority)
//! - Difficulty (easier = higher priority, favors quick wins)
//! - Importance (more important = higher priority)
//! - Time required (shorter = higher priority)
//! - Deadline proximity (closer or overdue = higher priority)
//!
//! Each factor is multiplied by the user's influence weight for it. The
//! result is unbounded and rounded to two decimals.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::preferences::PreferenceSet;
use crate::task::Task;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Top of the 100-point attribute scale.
const SCALE_MAX: f64 = 100.0;

/// Fractional days from `now` until `deadline`; negative when overdue.
pub fn days_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let delta = deadline.signed_duration_since(now);
    if let Some(ns) = delta.num_nanoseconds() {
        ns as f64 / 1_000_000_000.0 / SECONDS_PER_DAY
    } else if let Some(us) = delta.num_microseconds() {
        us as f64 / 1_000_000.0 / SECONDS_PER_DAY
    } else {
        delta.num_seconds() as f64 / SECONDS_PER_DAY
    }
}

/// Map days until deadline to an urgency level.
///
/// | days       | urgency |
/// |------------|---------|
/// | < 0        | 100     |
/// | [0, 1)     | 90      |
/// | [1, 3)     | 70      |
/// | [3, 7)     | 50      |
/// | [7, 14)    | 30      |
/// | >= 14      | 10      |
pub fn urgency_level(days_until_deadline: f64) -> f64 {
    if days_until_deadline < 0.0 {
        100.0
    } else if days_until_deadline < 1.0 {
        90.0
    } else if days_until_deadline < 3.0 {
        70.0
    } else if days_until_deadline < 7.0 {
        50.0
    } else if days_until_deadline < 14.0 {
        30.0
    } else {
        10.0
    }
}

/// Digits kept when snapping `score * 100` before the final rounding.
const PRE_ROUND_FACTOR: f64 = 1e6;

/// Round half away from zero to two decimals. Never yields `-0.0`.
///
/// `score * 100` is first snapped to six decimals so that halves which are
/// inexact in binary (`1.005 * 100 == 100.49999999999999`) still round up.
pub fn round_score(score: f64) -> f64 {
    let cents = (score * 100.0 * PRE_ROUND_FACTOR).round() / PRE_ROUND_FACTOR;
    cents.round() / 100.0 + 0.0
}

/// One weighted factor of a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTerm {
    pub name: &'static str,
    /// Value on the 100-point scale after inversion for difficulty and time
    pub factor: f64,
    pub weight: f64,
    pub contribution: f64,
}

impl ScoreTerm {
    fn new(name: &'static str, factor: f64, weight: f64) -> Self {
        Self {
            name,
            factor,
            weight,
            contribution: factor * weight,
        }
    }
}

/// Per-factor explanation of a task's score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub task_id: String,
    pub terms: Vec<ScoreTerm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_deadline: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<f64>,
    /// Rounded sum of all contributions; equals the task's priority score
    pub total: f64,
}

impl ScoreBreakdown {
    /// The term contributing the most, if any.
    pub fn top_term(&self) -> Option<&ScoreTerm> {
        self.terms
            .iter()
            .max_by(|a, b| a.contribution.total_cmp(&b.contribution))
    }
}

/// Scores tasks against one user's weights at one instant.
#[derive(Debug, Clone, Copy)]
pub struct PriorityCalculator {
    preferences: PreferenceSet,
    now: DateTime<Utc>,
}

impl PriorityCalculator {
    pub fn new(preferences: PreferenceSet, now: DateTime<Utc>) -> Self {
        Self { preferences, now }
    }

    pub fn preferences(&self) -> &PreferenceSet {
        &self.preferences
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Calculate the rounded priority score for a task.
    pub fn calculate_priority(&self, task: &Task) -> f64 {
        let p = &self.preferences;
        let mut score = task.fun.value() * p.fun_influence;
        score += (SCALE_MAX - task.difficulty.value()) * p.difficulty_influence;
        score += task.importance.value() * p.importance_influence;
        score += (SCALE_MAX - task.time.value()) * p.time_influence;

        if let Some(urgency) = self.urgency(task) {
            score += urgency * p.deadline_influence;
        }

        round_score(score)
    }

    /// Deadline urgency level, or `None` when the task has no deadline.
    pub fn urgency(&self, task: &Task) -> Option<f64> {
        task.deadline
            .map(|deadline| urgency_level(days_until(deadline, self.now)))
    }

    /// Break a task's score down by factor.
    pub fn explain(&self, task: &Task) -> ScoreBreakdown {
        let p = &self.preferences;
        let mut terms = vec![
            ScoreTerm::new("fun", task.fun.value(), p.fun_influence),
            ScoreTerm::new("difficulty", SCALE_MAX - task.difficulty.value(), p.difficulty_influence),
            ScoreTerm::new("importance", task.importance.value(), p.importance_influence),
            ScoreTerm::new("time", SCALE_MAX - task.time.value(), p.time_influence),
        ];

        let days = task.deadline.map(|deadline| days_until(deadline, self.now));
        let urgency = days.map(urgency_level);
        if let Some(urgency) = urgency {
            terms.push(ScoreTerm::new("deadline", urgency, p.deadline_influence));
        }

        let raw = terms
            .iter()
            .skip(1)
            .fold(terms[0].contribution, |acc, term| acc + term.contribution);

        ScoreBreakdown {
            task_id: task.id.clone(),
            terms,
            days_until_deadline: days,
            urgency,
            total: round_score(raw),
        }
    }
}

/// Score a single task.
pub fn score_task(task: &Task, preferences: &PreferenceSet, now: DateTime<Utc>) -> f64 {
    PriorityCalculator::new(*preferences, now).calculate_priority(task)
}

/// Explain a single task's score.
pub fn explain_task(task: &Task, preferences: &PreferenceSet, now: DateTime<Utc>) -> ScoreBreakdown {
    PriorityCalculator::new(*preferences, now).explain(task)
}
