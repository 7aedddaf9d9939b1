//! The canonical task and category store.
//!
//! [`TodoStore`] owns both collections, exposes every mutation, and writes a
//! full JSON snapshot of the changed collection back to storage after each
//! mutation. It is the single source of truth: the view pipeline only ever
//! sees read-only slices borrowed from it.
//!
//! Invalid input (empty text, unknown ids, deleting the last category) is a
//! silent no-op, never an error. Persistence failures are logged and do not
//! roll back the in-memory mutation; in-memory state is authoritative for
//! the running session.

use crate::storage::{keys, Storage};
use crate::todos::id::{generate_category_id, generate_task_id};
use crate::todos::models::{Category, CategoryUpdate, Priority, Task, TaskUpdate};
use chrono::Utc;

/// The default category set used when no categories have been persisted.
fn default_categories() -> Vec<Category> {
    vec![
        Category {
            id: "personal".to_string(),
            name: "Personal".to_string(),
            color: "#3B82F6".to_string(),
        },
        Category { id: "work".to_string(), name: "Work".to_string(), color: "#EC4899".to_string() },
        Category {
            id: "shopping".to_string(),
            name: "Shopping".to_string(),
            color: "#10B981".to_string(),
        },
    ]
}

/// Canonical store for tasks and categories.
///
/// Constructed once at process start via [`TodoStore::load`]; all mutation
/// flows through its methods. Single-threaded and synchronous: every
/// operation runs to completion before the next begins.
pub struct TodoStore {
    tasks: Vec<Task>,
    categories: Vec<Category>,
    storage: Box<dyn Storage>,
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("tasks", &self.tasks.len())
            .field("categories", &self.categories.len())
            .finish_non_exhaustive()
    }
}

impl TodoStore {
    /// Load a store from durable storage.
    ///
    /// Never fails: missing or malformed persisted data degrades to an
    /// empty task collection and the default category set, with a logged
    /// diagnostic. Corruption is non-fatal and self-healing - the next
    /// mutation overwrites the bad snapshot.
    pub fn load(storage: impl Storage + 'static) -> Self {
        let tasks: Vec<Task> = Self::load_collection(&storage, keys::TODOS).unwrap_or_default();
        let categories = Self::load_collection(&storage, keys::CATEGORIES)
            .filter(|cats: &Vec<Category>| !cats.is_empty())
            .unwrap_or_else(default_categories);

        let mut store = Self { tasks, categories, storage: Box::new(storage) };
        store.repair_dangling_references();
        store
    }

    /// Read and parse one collection snapshot. `None` means the key was
    /// absent, unreadable, or unparseable; the caller substitutes defaults.
    fn load_collection<T: serde::de::DeserializeOwned>(
        storage: &impl Storage,
        key: &str,
    ) -> Option<Vec<T>> {
        let raw = match storage.read(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read snapshot, using defaults");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(key, error = %e, "malformed snapshot, using defaults");
                None
            }
        }
    }

    /// Reassign any task whose category no longer exists to the first
    /// category. Keeps the foreign-key invariant even when the two
    /// snapshots were persisted inconsistently.
    fn repair_dangling_references(&mut self) {
        let fallback = self.categories[0].id.clone();
        let mut repaired = false;
        for task in &mut self.tasks {
            if !self.categories.iter().any(|c| c.id == task.category_id) {
                tracing::warn!(
                    task_id = %task.id,
                    category_id = %task.category_id,
                    "task referenced a missing category, reassigning"
                );
                task.category_id.clone_from(&fallback);
                repaired = true;
            }
        }
        if repaired {
            self.persist_tasks();
        }
    }

    /// The current task collection, in insertion order.
    ///
    /// Display order is always derived by the view pipeline; this order is
    /// only the stable input it ties on.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The current category collection, in insertion order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Look up a category by id.
    #[must_use]
    pub fn get_category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Add a new task.
    ///
    /// Returns the created task, or `None` if `text` is empty after
    /// trimming or `category_id` does not resolve to a live category.
    pub fn add_task(&mut self, text: &str, category_id: &str, priority: Priority) -> Option<Task> {
        if text.trim().is_empty() || self.get_category(category_id).is_none() {
            return None;
        }
        let task = Task {
            id: generate_task_id(),
            text: text.to_string(),
            completed: false,
            created_at: Utc::now(),
            priority,
            category_id: category_id.to_string(),
        };
        self.tasks.push(task.clone());
        self.persist_tasks();
        Some(task)
    }

    /// Flip the completion state of the task with the given id.
    /// No-op if the id is not found.
    pub fn toggle_task(&mut self, id: &str) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        task.completed = !task.completed;
        self.persist_tasks();
    }

    /// Apply a partial update to the task with the given id.
    ///
    /// `id` and `created_at` are never mutable. The whole update is a
    /// no-op if the id is not found, the new text is empty after trimming,
    /// or the new category id does not resolve.
    pub fn update_task(&mut self, id: &str, update: TaskUpdate) {
        if update.is_empty() {
            return;
        }
        if update.text.as_ref().is_some_and(|t| t.trim().is_empty()) {
            return;
        }
        if update
            .category_id
            .as_ref()
            .is_some_and(|c| !self.categories.iter().any(|cat| &cat.id == c))
        {
            return;
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        if let Some(text) = update.text {
            task.text = text;
        }
        if let Some(completed) = update.completed {
            task.completed = completed;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(category_id) = update.category_id {
            task.category_id = category_id;
        }
        self.persist_tasks();
    }

    /// Remove the task with the given id. No-op if absent.
    pub fn delete_task(&mut self, id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() != before {
            self.persist_tasks();
        }
    }

    /// Add a new category.
    ///
    /// Returns the created category so callers may immediately select it,
    /// or `None` if `name` is empty after trimming.
    pub fn add_category(&mut self, name: &str, color: &str) -> Option<Category> {
        if name.trim().is_empty() {
            return None;
        }
        let category = Category {
            id: generate_category_id(),
            name: name.to_string(),
            color: color.to_string(),
        };
        self.categories.push(category.clone());
        self.persist_categories();
        Some(category)
    }

    /// Apply a partial update to the category with the given id.
    ///
    /// `id` is immutable. No-op if the id is not found or the new name is
    /// empty after trimming.
    pub fn update_category(&mut self, id: &str, update: CategoryUpdate) {
        if update.is_empty() {
            return;
        }
        if update.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            return;
        }
        let Some(category) = self.categories.iter_mut().find(|c| c.id == id) else {
            return;
        };
        if let Some(name) = update.name {
            category.name = name;
        }
        if let Some(color) = update.color {
            category.color = color;
        }
        self.persist_categories();
    }

    /// Remove the category with the given id, reassigning its tasks.
    ///
    /// Every task referencing the deleted category moves to the fallback
    /// category: the earliest category in insertion order whose id differs
    /// from the deleted one. Insertion order is persisted verbatim, so the
    /// fallback choice is deterministic across sessions.
    ///
    /// No-op if the id is not found or this is the only remaining category.
    pub fn delete_category(&mut self, id: &str) {
        if self.categories.len() <= 1 || self.get_category(id).is_none() {
            return;
        }
        // Reassign before removing, so the foreign-key invariant holds at
        // every observable instant.
        let fallback = self
            .categories
            .iter()
            .find(|c| c.id != id)
            .map(|c| c.id.clone())
            .unwrap_or_default();
        for task in self.tasks.iter_mut().filter(|t| t.category_id == id) {
            task.category_id.clone_from(&fallback);
        }
        self.categories.retain(|c| c.id != id);
        self.persist_tasks();
        self.persist_categories();
    }

    /// Rewrite both snapshots, surfacing any storage error.
    ///
    /// Routine persistence is best-effort; call this at shutdown when a
    /// failed write should be visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if either snapshot cannot be serialized or written.
    pub fn flush(&self) -> crate::error::Result<()> {
        self.storage.write(keys::TODOS, &serde_json::to_string(&self.tasks)?)?;
        self.storage.write(keys::CATEGORIES, &serde_json::to_string(&self.categories)?)?;
        Ok(())
    }

    fn persist_tasks(&self) {
        Self::persist(self.storage.as_ref(), keys::TODOS, &self.tasks);
    }

    fn persist_categories(&self) {
        Self::persist(self.storage.as_ref(), keys::CATEGORIES, &self.categories);
    }

    /// Best-effort full-snapshot write. A failure leaves the in-memory
    /// state authoritative for the session.
    fn persist<T: serde::Serialize>(storage: &dyn Storage, key: &str, collection: &[T]) {
        let snapshot = match serde_json::to_string(collection) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to serialize snapshot");
                return;
            }
        };
        if let Err(e) = storage.write(key, &snapshot) {
            tracing::warn!(key, error = %e, "failed to persist snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::rc::Rc;

    fn empty_store() -> TodoStore {
        TodoStore::load(MemoryStorage::new())
    }

    #[test]
    fn test_load_empty_storage_uses_defaults() {
        let store = empty_store();
        assert!(store.tasks().is_empty());
        let names: Vec<&str> = store.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Personal", "Work", "Shopping"]);
    }

    #[test]
    fn test_load_malformed_snapshots_is_non_fatal() {
        let storage = MemoryStorage::new();
        storage.seed(keys::TODOS, "not json at all");
        storage.seed(keys::CATEGORIES, "{\"truncated\":");

        let store = TodoStore::load(storage);
        assert!(store.tasks().is_empty());
        assert_eq!(store.categories().len(), 3);
    }

    #[test]
    fn test_load_empty_category_array_restores_defaults() {
        // An empty persisted category collection would violate the
        // "at least one category" invariant, so it reads as absent.
        let storage = MemoryStorage::new();
        storage.seed(keys::CATEGORIES, "[]");

        let store = TodoStore::load(storage);
        assert_eq!(store.categories().len(), 3);
    }

    #[test]
    fn test_load_repairs_dangling_category_reference() {
        let storage = MemoryStorage::new();
        storage.seed(
            keys::TODOS,
            r#"[{"id":"task-1","text":"Orphaned","completed":false,
                "createdAt":"2024-01-01T00:00:00Z","priority":"low",
                "categoryId":"deleted-elsewhere"}]"#,
        );

        let store = TodoStore::load(storage);
        assert_eq!(store.tasks()[0].category_id, "personal");
    }

    #[test]
    fn test_add_task() {
        let mut store = empty_store();
        let task = store.add_task("Buy milk", "shopping", Priority::Low).unwrap();

        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.category_id, "shopping");
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.get_task(&task.id).unwrap(), &task);
    }

    #[test]
    fn test_add_task_rejects_empty_text() {
        let mut store = empty_store();
        assert!(store.add_task("", "shopping", Priority::Medium).is_none());
        assert!(store.add_task("   ", "shopping", Priority::Medium).is_none());
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_add_task_rejects_unknown_category() {
        let mut store = empty_store();
        assert!(store.add_task("Stray", "no-such-category", Priority::Medium).is_none());
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_toggle_task_pair_is_idempotent() {
        let mut store = empty_store();
        let task = store.add_task("Water plants", "personal", Priority::Medium).unwrap();

        store.toggle_task(&task.id);
        assert!(store.get_task(&task.id).unwrap().completed);

        store.toggle_task(&task.id);
        let after = store.get_task(&task.id).unwrap();
        assert_eq!(after, &task);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let mut store = empty_store();
        store.add_task("Task", "work", Priority::Medium).unwrap();
        store.toggle_task("nonexistent");
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn test_update_task_partial_fields() {
        let mut store = empty_store();
        let task = store.add_task("Draft report", "work", Priority::Medium).unwrap();

        store.update_task(
            &task.id,
            TaskUpdate {
                text: Some("Draft quarterly report".to_string()),
                priority: Some(Priority::High),
                ..Default::default()
            },
        );

        let updated = store.get_task(&task.id).unwrap();
        assert_eq!(updated.text, "Draft quarterly report");
        assert_eq!(updated.priority, Priority::High);
        // Untouched fields and immutable fields survive
        assert!(!updated.completed);
        assert_eq!(updated.id, task.id);
        assert_eq!(updated.created_at, task.created_at);
    }

    #[test]
    fn test_update_task_moves_between_categories() {
        let mut store = empty_store();
        let task = store.add_task("Errand", "personal", Priority::Medium).unwrap();

        store.update_task(
            &task.id,
            TaskUpdate { category_id: Some("shopping".to_string()), ..Default::default() },
        );
        assert_eq!(store.get_task(&task.id).unwrap().category_id, "shopping");
    }

    #[test]
    fn test_update_task_rejects_unknown_category() {
        let mut store = empty_store();
        let task = store.add_task("Errand", "personal", Priority::Medium).unwrap();

        store.update_task(
            &task.id,
            TaskUpdate {
                text: Some("Changed".to_string()),
                category_id: Some("ghost".to_string()),
                ..Default::default()
            },
        );

        // The whole update is rejected, not just the bad field
        let unchanged = store.get_task(&task.id).unwrap();
        assert_eq!(unchanged.text, "Errand");
        assert_eq!(unchanged.category_id, "personal");
    }

    #[test]
    fn test_update_task_rejects_empty_text() {
        let mut store = empty_store();
        let task = store.add_task("Keep me", "personal", Priority::Medium).unwrap();

        store.update_task(
            &task.id,
            TaskUpdate { text: Some("  ".to_string()), ..Default::default() },
        );
        assert_eq!(store.get_task(&task.id).unwrap().text, "Keep me");
    }

    #[test]
    fn test_update_unknown_task_is_noop() {
        let mut store = empty_store();
        store.update_task(
            "nonexistent",
            TaskUpdate { completed: Some(true), ..Default::default() },
        );
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_delete_task() {
        let mut store = empty_store();
        let task = store.add_task("Ephemeral", "work", Priority::Medium).unwrap();

        store.delete_task(&task.id);
        assert!(store.tasks().is_empty());

        // Deleting again is a no-op
        store.delete_task(&task.id);
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn test_add_category_returns_created() {
        let mut store = empty_store();
        let category = store.add_category("Garden", "#22C55E").unwrap();

        assert_eq!(category.name, "Garden");
        assert_eq!(store.get_category(&category.id).unwrap(), &category);
        assert_eq!(store.categories().len(), 4);
    }

    #[test]
    fn test_add_category_rejects_empty_name() {
        let mut store = empty_store();
        assert!(store.add_category("  ", "#FFFFFF").is_none());
        assert_eq!(store.categories().len(), 3);
    }

    #[test]
    fn test_update_category() {
        let mut store = empty_store();
        store.update_category(
            "work",
            CategoryUpdate { name: Some("Office".to_string()), color: Some("#000000".to_string()) },
        );

        let updated = store.get_category("work").unwrap();
        assert_eq!(updated.name, "Office");
        assert_eq!(updated.color, "#000000");
    }

    #[test]
    fn test_update_category_rejects_empty_name() {
        let mut store = empty_store();
        store.update_category(
            "work",
            CategoryUpdate { name: Some(String::new()), ..Default::default() },
        );
        assert_eq!(store.get_category("work").unwrap().name, "Work");
    }

    #[test]
    fn test_delete_category_cascades_to_fallback() {
        let mut store = empty_store();
        let a = store.add_task("One", "work", Priority::Medium).unwrap();
        let b = store.add_task("Two", "work", Priority::High).unwrap();
        let untouched = store.add_task("Three", "shopping", Priority::Low).unwrap();

        store.delete_category("work");

        // Fallback is the earliest remaining category: "personal"
        assert_eq!(store.get_task(&a.id).unwrap().category_id, "personal");
        assert_eq!(store.get_task(&b.id).unwrap().category_id, "personal");
        assert_eq!(store.get_task(&untouched.id).unwrap().category_id, "shopping");
        assert_eq!(store.tasks().len(), 3);
        assert!(store.get_category("work").is_none());
    }

    #[test]
    fn test_delete_first_category_falls_back_to_next() {
        let mut store = empty_store();
        let task = store.add_task("Call dentist", "personal", Priority::Medium).unwrap();

        store.delete_category("personal");
        assert_eq!(store.get_task(&task.id).unwrap().category_id, "work");
    }

    #[test]
    fn test_cascade_with_two_categories_leaves_the_other() {
        let mut store = empty_store();
        store.delete_category("shopping");
        let task = store.add_task("Lonely", "personal", Priority::Medium).unwrap();

        store.delete_category("personal");

        assert_eq!(store.get_task(&task.id).unwrap().category_id, "work");
        let ids: Vec<&str> = store.categories().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["work"]);
    }

    #[test]
    fn test_delete_last_category_is_rejected() {
        let mut store = empty_store();
        store.delete_category("personal");
        store.delete_category("work");
        assert_eq!(store.categories().len(), 1);

        // Singleton collection: deletion is a no-op
        store.delete_category("shopping");
        assert_eq!(store.categories().len(), 1);
        assert_eq!(store.categories()[0].id, "shopping");
    }

    #[test]
    fn test_delete_unknown_category_is_noop() {
        let mut store = empty_store();
        store.delete_category("nonexistent");
        assert_eq!(store.categories().len(), 3);
    }

    #[test]
    fn test_every_mutation_persists_a_snapshot() {
        let storage = Rc::new(MemoryStorage::new());
        let mut store = TodoStore::load(Rc::clone(&storage));

        let task = store.add_task("Persist me", "personal", Priority::Medium).unwrap();
        let raw = storage.read(keys::TODOS).unwrap().unwrap();
        assert!(raw.contains("Persist me"));

        store.toggle_task(&task.id);
        let raw = storage.read(keys::TODOS).unwrap().unwrap();
        assert!(raw.contains("\"completed\":true"));

        store.add_category("Hobby", "#A855F7").unwrap();
        let raw = storage.read(keys::CATEGORIES).unwrap().unwrap();
        assert!(raw.contains("Hobby"));
    }

    #[test]
    fn test_flush_writes_both_snapshots() {
        let storage = Rc::new(MemoryStorage::new());
        let store = TodoStore::load(Rc::clone(&storage));

        store.flush().unwrap();
        assert_eq!(storage.read(keys::TODOS).unwrap().as_deref(), Some("[]"));
        assert!(storage.read(keys::CATEGORIES).unwrap().unwrap().contains("Personal"));
    }

    #[test]
    fn test_foreign_key_invariant_holds_after_mixed_operations() {
        let mut store = empty_store();
        let extra = store.add_category("Extra", "#F59E0B").unwrap();
        store.add_task("a", "personal", Priority::Low).unwrap();
        store.add_task("b", &extra.id, Priority::High).unwrap();
        store.delete_category(&extra.id);
        store.delete_category("personal");

        for task in store.tasks() {
            assert!(store.get_category(&task.category_id).is_some());
        }
    }
}
