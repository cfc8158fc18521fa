//! JSON snapshot of a task store.
//!
//! A snapshot holds users, categories, tasks and preference rows exported
//! from the task manager. It serves as the task and preference source for
//! the CLI and for tests.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SourceError};
use crate::preferences::StoredPreferences;
use crate::source::{PreferenceSource, PreferenceStore, TaskSource};
use crate::task::{deserialize_id, Category, Task};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub preferences: Vec<StoredPreferences>,
}

impl Snapshot {
    /// Read a snapshot file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid snapshot JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            tasks = snapshot.tasks.len(),
            users = snapshot.users.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Write the snapshot as pretty JSON.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Map a user id or username to a user id.
    ///
    /// Snapshots without a user list accept any key as an id.
    ///
    /// # Errors
    /// Returns `SourceError::UserNotFound` if the user list is present and
    /// nothing matches.
    pub fn resolve_user(&self, key: &str) -> Result<String> {
        if self.users.is_empty() {
            return Ok(key.to_string());
        }
        self.users
            .iter()
            .find(|u| u.id == key)
            .or_else(|| self.users.iter().find(|u| u.username == key))
            .map(|u| u.id.clone())
            .ok_or_else(|| {
                SourceError::UserNotFound {
                    user_id: key.to_string(),
                }
                .into()
            })
    }

    /// Categories owned by `user_id`.
    pub fn categories_for(&self, user_id: &str) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| c.user_id == user_id)
            .collect()
    }

    /// Look up a category of `user_id` by id or name.
    pub fn find_category(&self, user_id: &str, key: &str) -> Option<&Category> {
        let owned = self.categories_for(user_id);
        owned
            .iter()
            .find(|c| c.id == key)
            .or_else(|| owned.iter().find(|c| c.name.eq_ignore_ascii_case(key)))
            .copied()
    }
}

impl TaskSource for Snapshot {
    /// Unfinished tasks of the user, earliest deadline first and undated last,
    /// keeping snapshot order among equal deadlines.
    ///
    /// Tasks without a `userId` belong to whoever asks only when the snapshot
    /// has no user list; otherwise they belong to nobody.
    fn unfinished_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let single_user = self.users.is_empty();
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| !t.is_finished)
            .filter(|t| t.user_id.as_deref().map_or(single_user, |owner| owner == user_id))
            .cloned()
            .collect();
        tasks.sort_by_key(|t| (t.deadline.is_none(), t.deadline));
        Ok(tasks)
    }
}

impl PreferenceSource for Snapshot {
    fn stored_preferences(&self, user_id: &str) -> Result<Option<StoredPreferences>> {
        Ok(self
            .preferences
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }
}

impl PreferenceStore for Snapshot {
    fn insert_preferences(&mut self, prefs: StoredPreferences) -> Result<()> {
        match self.preferences.iter_mut().find(|p| p.user_id == prefs.user_id) {
            Some(existing) => *existing = prefs,
            None => self.preferences.push(prefs),
        }
        Ok(())
    }
}
