//! Per-user ranking over injected collaborators.

use super::priority::{PriorityCalculator, ScoreBreakdown};
use super::ranker::{rank_tasks, ScoredTask};
use crate::clock::Clock;
use crate::error::Result;
use crate::preferences::{PreferenceResolver, PreferenceSet};
use crate::source::{PreferenceSource, TaskSource};
use crate::task::Task;

/// Ranks a user's tasks using a task source, a preference source and a clock.
pub struct RankingService<T, P, C> {
    tasks: T,
    preferences: P,
    clock: C,
    fallback: PreferenceSet,
}

impl<T, P, C> RankingService<T, P, C>
where
    T: TaskSource,
    P: PreferenceSource,
    C: Clock,
{
    pub fn new(tasks: T, preferences: P, clock: C) -> Self {
        Self {
            tasks,
            preferences,
            clock,
            fallback: PreferenceSet::default(),
        }
    }

    /// Weights used for users with no stored preferences.
    pub fn with_fallback_preferences(mut self, fallback: PreferenceSet) -> Self {
        self.fallback = fallback;
        self
    }

    /// Resolve the user's weights. Never fails.
    pub fn preferences_for(&self, user_id: &str) -> PreferenceSet {
        PreferenceResolver::with_fallback(&self.preferences, self.fallback).resolve(user_id)
    }

    fn open_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let mut tasks = self.tasks.unfinished_tasks(user_id)?;
        let before = tasks.len();
        tasks.retain(|t| !t.is_finished);
        if tasks.len() != before {
            tracing::debug!(
                user_id,
                dropped = before - tasks.len(),
                "task source returned finished tasks"
            );
        }
        Ok(tasks)
    }

    /// Rank every unfinished task of `user_id`.
    ///
    /// # Errors
    /// Returns an error if the task source fails.
    pub fn rank_for_user(&self, user_id: &str) -> Result<Vec<ScoredTask>> {
        let tasks = self.open_tasks(user_id)?;
        self.rank(user_id, tasks)
    }

    /// Rank the unfinished tasks of `user_id` that belong to `category_id`.
    ///
    /// # Errors
    /// Returns an error if the task source fails.
    pub fn rank_for_user_in_category(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> Result<Vec<ScoredTask>> {
        let mut tasks = self.open_tasks(user_id)?;
        tasks.retain(|t| t.category_id.as_deref() == Some(category_id));
        self.rank(user_id, tasks)
    }

    /// Explain the score of one of the user's unfinished tasks.
    ///
    /// Returns `Ok(None)` when the task is not among them.
    ///
    /// # Errors
    /// Returns an error if the task source fails.
    pub fn explain_for_user(&self, user_id: &str, task_id: &str) -> Result<Option<ScoreBreakdown>> {
        let tasks = self.open_tasks(user_id)?;
        let Some(task) = tasks.iter().find(|t| t.id == task_id) else {
            return Ok(None);
        };
        let calculator = PriorityCalculator::new(self.preferences_for(user_id), self.clock.now());
        Ok(Some(calculator.explain(task)))
    }

    fn rank(&self, user_id: &str, tasks: Vec<Task>) -> Result<Vec<ScoredTask>> {
        let preferences = self.preferences_for(user_id);
        let now = self.clock.now();
        tracing::debug!(user_id, count = tasks.len(), %now, "ranking tasks");
        Ok(rank_tasks(tasks, &preferences, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::SourceError;
    use crate::preferences::StoredPreferences;
    use crate::task::Level;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    struct FakeTasks(Vec<Task>);

    impl TaskSource for FakeTasks {
        fn unfinished_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
            Ok(self
                .0
                .iter()
                .filter(|t| t.user_id.as_deref() == Some(user_id))
                .cloned()
                .collect())
        }
    }

    struct FailingTasks;

    impl TaskSource for FailingTasks {
        fn unfinished_tasks(&self, _user_id: &str) -> Result<Vec<Task>> {
            Err(SourceError::Unavailable("disk on fire".into()).into())
        }
    }

    struct FakePrefs(Option<StoredPreferences>);

    impl PreferenceSource for FakePrefs {
        fn stored_preferences(&self, _user_id: &str) -> Result<Option<StoredPreferences>> {
            Ok(self.0.clone())
        }
    }

    fn fixture() -> FakeTasks {
        FakeTasks(vec![
            Task::new("1", "Laundry").for_user("u1").in_category("home"),
            Task::new("2", "Tax return")
                .for_user("u1")
                .in_category("admin")
                .with_deadline(now() - Duration::days(1))
                .with_levels(Level::Low, Level::High, Level::High, Level::High),
            Task::new("3", "Other user").for_user("u2"),
            Task::new("4", "Done already").for_user("u1").finished(true),
            Task::new("5", "Pinned chore").for_user("u1").in_category("home").pinned(true),
        ])
    }

    #[test]
    fn test_rank_for_user_orders_and_filters() {
        let service = RankingService::new(fixture(), FakePrefs(None), FixedClock(now()));
        let ranked = service.rank_for_user("u1").unwrap();
        let ids: Vec<_> = ranked.iter().map(|t| t.task.id.as_str()).collect();
        // 2: 33 + 0 + 100 + 0 + 100 = 233; 1: 66 + 34 + 66 + 34 = 200
        assert_eq!(ids, vec!["5", "2", "1"]);
        assert_eq!(ranked[1].priority_score, 233.0);
        assert_eq!(ranked[2].priority_score, 200.0);
    }

    #[test]
    fn test_rank_in_category() {
        let service = RankingService::new(fixture(), FakePrefs(None), FixedClock(now()));
        let ranked = service.rank_for_user_in_category("u1", "home").unwrap();
        let ids: Vec<_> = ranked.iter().map(|t| t.task.id.as_str()).collect();
        assert_eq!(ids, vec!["5", "1"]);
    }

    #[test]
    fn test_stored_weights_are_applied() {
        let stored = StoredPreferences {
            user_id: "u1".into(),
            deadline_influence: Some(0.0),
            importance_influence: Some(0.0),
            ..Default::default()
        };
        let service = RankingService::new(fixture(), FakePrefs(Some(stored)), FixedClock(now()));
        let ranked = service.rank_for_user("u1").unwrap();
        // 2: 33 + 0 + 0 + 0 = 33; 1: 66 + 34 + 0 + 34 = 134
        let ids: Vec<_> = ranked.iter().map(|t| t.task.id.as_str()).collect();
        assert_eq!(ids, vec!["5", "1", "2"]);
    }

    #[test]
    fn test_fallback_preferences_used_without_row() {
        let service = RankingService::new(fixture(), FakePrefs(None), FixedClock(now()))
            .with_fallback_preferences(PreferenceSet::uniform(2.0));
        assert_eq!(service.preferences_for("u1"), PreferenceSet::uniform(2.0));
        let ranked = service.rank_for_user("u1").unwrap();
        assert_eq!(ranked.last().map(|t| t.priority_score), Some(400.0));
    }

    #[test]
    fn test_task_source_error_propagates() {
        let service = RankingService::new(FailingTasks, FakePrefs(None), FixedClock(now()));
        assert!(service.rank_for_user("u1").is_err());
    }

    #[test]
    fn test_explain_for_user() {
        let service = RankingService::new(fixture(), FakePrefs(None), FixedClock(now()));
        let breakdown = service.explain_for_user("u1", "2").unwrap().unwrap();
        assert_eq!(breakdown.total, 233.0);
        assert_eq!(breakdown.urgency, Some(100.0));
        assert!(service.explain_for_user("u1", "3").unwrap().is_none());
        assert!(service.explain_for_user("u1", "4").unwrap().is_none());
    }
}
