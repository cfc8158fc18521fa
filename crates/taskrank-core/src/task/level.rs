//! Three-tier categorical levels for fun, difficulty, importance and time.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative rating a user attaches to a task attribute.
///
/// The time attribute is also written as `short`/`long`; those labels map
/// onto `Low`/`High`. Anything unrecognized is read as `Medium`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    /// Numeric weight of the level on the 100-point scale.
    pub fn value(self) -> f64 {
        match self {
            Level::Low => 33.0,
            Level::Medium => 66.0,
            Level::High => 100.0,
        }
    }

    /// Parse a stored label, falling back to `Medium` for anything unknown.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" | "short" => Level::Low,
            "high" | "long" => Level::High,
            _ => Level::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Medium
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<&str>> for Level {
    fn from(label: Option<&str>) -> Self {
        label.map(Level::from_label).unwrap_or_default()
    }
}

struct LevelVisitor;

impl<'de> Visitor<'de> for LevelVisitor {
    type Value = Level;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a level label such as \"low\", \"medium\" or \"high\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Level, E> {
        Ok(Level::from_label(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Level, E> {
        Ok(Level::Medium)
    }

    fn visit_none<E: de::Error>(self) -> Result<Level, E> {
        Ok(Level::Medium)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Level, D::Error> {
        d.deserialize_any(LevelVisitor)
    }

    // Non-string scalars are not labels; they read as the default.
    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Level, E> {
        Ok(Level::Medium)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Level, E> {
        Ok(Level::Medium)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Level, E> {
        Ok(Level::Medium)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Level, E> {
        Ok(Level::Medium)
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LevelVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_to_fixed_values() {
        assert_eq!(Level::from_label("low").value(), 33.0);
        assert_eq!(Level::from_label("medium").value(), 66.0);
        assert_eq!(Level::from_label("high").value(), 100.0);
        assert_eq!(Level::from_label("short").value(), 33.0);
        assert_eq!(Level::from_label("long").value(), 100.0);
    }

    #[test]
    fn unknown_labels_read_as_medium() {
        assert_eq!(Level::from_label("urgent"), Level::Medium);
        assert_eq!(Level::from_label(""), Level::Medium);
        assert_eq!(Level::from(None), Level::Medium);
    }

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(Level::from_label("HIGH"), Level::High);
        assert_eq!(Level::from_label(" Short "), Level::Low);
    }

    #[test]
    fn deserialize_tolerates_null_and_numbers() {
        let levels: Vec<Level> =
            serde_json::from_str(r#"["high", null, 3, "long", "bogus", true]"#).unwrap();
        assert_eq!(
            levels,
            vec![
                Level::High,
                Level::Medium,
                Level::Medium,
                Level::High,
                Level::Medium,
                Level::Medium
            ]
        );
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Level::Low).unwrap(), "\"low\"");
    }
}
