use crate::error::Result;
use crate::preferences::StoredPreferences;
use crate::task::Task;

/// Supplies a user's unfinished tasks.
///
/// Filtering finished or deleted tasks is the source's job.
pub trait TaskSource: Send + Sync {
    fn unfinished_tasks(&self, user_id: &str) -> Result<Vec<Task>>;
}

/// Supplies the stored preference row for a user, if any.
pub trait PreferenceSource: Send + Sync {
    fn stored_preferences(&self, user_id: &str) -> Result<Option<StoredPreferences>>;
}

/// A preference source that can also create rows.
pub trait PreferenceStore: PreferenceSource {
    fn insert_preferences(&mut self, prefs: StoredPreferences) -> Result<()>;

    /// Create an all-default row for `user_id` unless one exists.
    ///
    /// Returns `true` when a row was created.
    fn ensure_preferences(&mut self, user_id: &str) -> Result<bool> {
        if self.stored_preferences(user_id)?.is_some() {
            return Ok(false);
        }
        self.insert_preferences(StoredPreferences::defaults_for(user_id))?;
        Ok(true)
    }
}

impl<T: TaskSource + ?Sized> TaskSource for &T {
    fn unfinished_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        (**self).unfinished_tasks(user_id)
    }
}

impl<P: PreferenceSource + ?Sized> PreferenceSource for &P {
    fn stored_preferences(&self, user_id: &str) -> Result<Option<StoredPreferences>> {
        (**self).stored_preferences(user_id)
    }
}
