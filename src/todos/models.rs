//! Model types for tasks and categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority (default).
    #[default]
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Numeric rank used for sorting: low=1, medium=2, high=3.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Parse a priority from a string, defaulting to `Medium` on
    /// unrecognized input.
    ///
    /// Unrecognized values are never an error; they fall back to the
    /// default per the store/pipeline boundary policy.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }

    /// Get the string representation of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A to-do item.
///
/// Serialized field names follow the persisted JSON layout:
/// `{"id","text","completed","createdAt","priority","categoryId"}`, with
/// `createdAt` as an RFC 3339 string that is revived into a timestamp on
/// load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique identifier, immutable after creation.
    pub id: String,
    /// Display text. Non-empty; the store rejects empty text at creation.
    pub text: String,
    /// Whether the task is done.
    pub completed: bool,
    /// Creation timestamp, immutable. Used for default sort ordering.
    pub created_at: DateTime<Utc>,
    /// Priority level.
    pub priority: Priority,
    /// Id of the category this task belongs to. Always resolves to a live
    /// category; category deletion reassigns before removing.
    pub category_id: String,
}

/// A task category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Opaque unique identifier, immutable.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display color (opaque to the core, e.g. `#3B82F6`).
    pub color: String,
}

/// Fields that can be updated on a task.
///
/// `id` and `created_at` are never mutable through an update.
#[derive(Debug, Default, Clone)]
pub struct TaskUpdate {
    /// New text (if Some).
    pub text: Option<String>,
    /// New completion state (if Some).
    pub completed: Option<bool>,
    /// New priority (if Some).
    pub priority: Option<Priority>,
    /// New category id (if Some). Must resolve to a live category or the
    /// whole update is a no-op.
    pub category_id: Option<String>,
}

impl TaskUpdate {
    /// Check if any fields are set for update.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.category_id.is_none()
    }
}

/// Fields that can be updated on a category.
#[derive(Debug, Default, Clone)]
pub struct CategoryUpdate {
    /// New name (if Some).
    pub name: Option<String>,
    /// New color (if Some).
    pub color: Option<String>,
}

impl CategoryUpdate {
    /// Check if any fields are set for update.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }
}
