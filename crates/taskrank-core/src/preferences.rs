//! Per-user influence weights.
//!
//! Each weight scales one scoring factor. Writers keep them within
//! [`INFLUENCE_MIN`, `INFLUENCE_MAX`]; the scorer multiplies whatever it is
//! given. A user without a stored row ranks with every weight at 1.0.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::source::PreferenceSource;
use crate::task::deserialize_id;

pub const INFLUENCE_MIN: f64 = 0.0;
pub const INFLUENCE_MAX: f64 = 2.0;
pub const DEFAULT_INFLUENCE: f64 = 1.0;

/// Fully populated influence weights for one user.
///
/// Fields missing when deserializing take the default weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferenceSet {
    pub fun_influence: f64,
    pub difficulty_influence: f64,
    pub importance_influence: f64,
    pub time_influence: f64,
    pub deadline_influence: f64,
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self::uniform(DEFAULT_INFLUENCE)
    }
}

impl PreferenceSet {
    /// Every weight set to `weight`.
    pub fn uniform(weight: f64) -> Self {
        Self {
            fun_influence: weight,
            difficulty_influence: weight,
            importance_influence: weight,
            time_influence: weight,
            deadline_influence: weight,
        }
    }

    /// Named weights in scoring order.
    pub fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("funInfluence", self.fun_influence),
            ("difficultyInfluence", self.difficulty_influence),
            ("importanceInfluence", self.importance_influence),
            ("timeInfluence", self.time_influence),
            ("deadlineInfluence", self.deadline_influence),
        ]
    }

    /// Check every weight lies in [0, 2].
    ///
    /// For writers of preference rows. Ranking never calls this.
    ///
    /// # Errors
    /// Returns the first out-of-range or non-finite weight.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in self.fields() {
            if !value.is_finite() || !(INFLUENCE_MIN..=INFLUENCE_MAX).contains(&value) {
                return Err(ValidationError::InfluenceOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

/// A preference row as a store returns it; any weight may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPreferences {
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub fun_influence: Option<f64>,
    #[serde(default)]
    pub difficulty_influence: Option<f64>,
    #[serde(default)]
    pub importance_influence: Option<f64>,
    #[serde(default)]
    pub time_influence: Option<f64>,
    #[serde(default)]
    pub deadline_influence: Option<f64>,
}

impl StoredPreferences {
    /// An all-default row for `user_id`.
    pub fn defaults_for(user_id: impl Into<String>) -> Self {
        let d = PreferenceSet::default();
        Self {
            user_id: user_id.into(),
            bio: None,
            fun_influence: Some(d.fun_influence),
            difficulty_influence: Some(d.difficulty_influence),
            importance_influence: Some(d.importance_influence),
            time_influence: Some(d.time_influence),
            deadline_influence: Some(d.deadline_influence),
        }
    }

    /// Fill missing weights from `fallback`.
    pub fn resolve_with(&self, fallback: &PreferenceSet) -> PreferenceSet {
        PreferenceSet {
            fun_influence: self.fun_influence.unwrap_or(fallback.fun_influence),
            difficulty_influence: self
                .difficulty_influence
                .unwrap_or(fallback.difficulty_influence),
            importance_influence: self
                .importance_influence
                .unwrap_or(fallback.importance_influence),
            time_influence: self.time_influence.unwrap_or(fallback.time_influence),
            deadline_influence: self.deadline_influence.unwrap_or(fallback.deadline_influence),
        }
    }

    /// Fill missing weights with 1.0.
    pub fn resolve(&self) -> PreferenceSet {
        self.resolve_with(&PreferenceSet::default())
    }
}

/// Resolves a user id to a complete [`PreferenceSet`].
///
/// Never fails: a missing row, missing fields, or a failing source all fall
/// back to the resolver's defaults.
pub struct PreferenceResolver<'a, P: PreferenceSource + ?Sized> {
    source: &'a P,
    fallback: PreferenceSet,
}

impl<'a, P: PreferenceSource + ?Sized> PreferenceResolver<'a, P> {
    pub fn new(source: &'a P) -> Self {
        Self {
            source,
            fallback: PreferenceSet::default(),
        }
    }

    /// Use `fallback` instead of all-1.0 for users without stored weights.
    pub fn with_fallback(source: &'a P, fallback: PreferenceSet) -> Self {
        Self { source, fallback }
    }

    pub fn resolve(&self, user_id: &str) -> PreferenceSet {
        match self.source.stored_preferences(user_id) {
            Ok(Some(stored)) => stored.resolve_with(&self.fallback),
            Ok(None) => {
                tracing::debug!(user_id, "no stored preferences, using defaults");
                self.fallback
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "preference lookup failed, using defaults");
                self.fallback
            }
        }
    }
}

/// Resolve `user_id` against `source` with all-1.0 defaults.
pub fn resolve_preferences<P: PreferenceSource + ?Sized>(source: &P, user_id: &str) -> PreferenceSet {
    PreferenceResolver::new(source).resolve(user_id)
}
