//! Pure derivation of the visible task sequence.
//!
//! Given a read-only slice of the task collection and the transient view
//! parameters (category filter, status filter, search text, sort key and
//! direction), [`visible_tasks`] produces the ordered subset to display.
//! Nothing here mutates or caches; the result is recomputed from scratch on
//! every call.
//!
//! String parsing for the filter and sort enums is deliberately forgiving:
//! an unrecognized value falls back to the default rather than erroring, so
//! a stale or garbled UI selection can never take the list down.

use crate::todos::models::Task;

/// Which category's tasks to show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Show tasks from every category.
    #[default]
    All,
    /// Show only tasks belonging to the category with this id.
    Category(String),
}

impl CategoryFilter {
    /// Parse a filter from a string. `"all"` (any case) means every
    /// category; anything else is taken as a category id.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Category(s.to_string())
        }
    }

    fn keeps(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Category(id) => &task.category_id == id,
        }
    }
}

/// Completion-status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Show all tasks regardless of completion.
    #[default]
    All,
    /// Show only incomplete tasks.
    Active,
    /// Show only completed tasks.
    Completed,
}

impl StatusFilter {
    /// Parse a status filter, defaulting to `All` on unrecognized input.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::All,
        }
    }

    /// Get the string representation of the filter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    const fn keeps(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

/// Which task field the visible sequence is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Order by creation time (the default).
    #[default]
    CreatedAt,
    /// Order by priority rank (low=1, medium=2, high=3).
    Priority,
}

impl SortKey {
    /// Parse a sort key, defaulting to `CreatedAt` on unrecognized input.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "priority" => Self::Priority,
            _ => Self::CreatedAt,
        }
    }

    /// Get the string representation of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Priority => "priority",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest key first.
    Ascending,
    /// Largest key first (the default: newest tasks on top).
    #[default]
    Descending,
}

impl SortDirection {
    /// Parse a direction, defaulting to `Descending` on unrecognized input.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Self::Ascending,
            _ => Self::Descending,
        }
    }
}

/// The transient view parameters the pipeline derives from.
///
/// The default shows everything, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewOptions {
    /// Category filter.
    pub category: CategoryFilter,
    /// Completion-status filter.
    pub status: StatusFilter,
    /// Case-insensitive substring search; empty matches everything.
    pub search: String,
    /// Sort key.
    pub sort_key: SortKey,
    /// Sort direction.
    pub direction: SortDirection,
}

/// Derive the visible, ordered task sequence.
///
/// Stages run in order: category filter, status filter, search filter,
/// then a stable sort by the chosen key and direction. Tasks with equal
/// sort keys keep their relative order from the input slice, so the output
/// is deterministic for identical inputs.
#[must_use]
pub fn visible_tasks<'a>(tasks: &'a [Task], options: &ViewOptions) -> Vec<&'a Task> {
    let needle = options.search.to_lowercase();
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|task| options.category.keeps(task))
        .filter(|task| options.status.keeps(task))
        .filter(|task| needle.is_empty() || task.text.to_lowercase().contains(&needle))
        .collect();

    // slice::sort_by is stable, which the determinism guarantee relies on.
    visible.sort_by(|a, b| {
        let ordering = match options.sort_key {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
        };
        match options.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    visible
}
