//! Command-line frontend for the task store.
//!
//! The binary is a thin wrapper: everything here takes the store by
//! reference and returns the text to print, so the whole surface is
//! testable without a terminal. Filter and sort arguments are plain
//! strings handed to the pipeline's forgiving parsers; a typo shows the
//! default view instead of failing.

use crate::todos::{
    visible_tasks, CategoryFilter, CategoryUpdate, Priority, SortDirection, SortKey, StatusFilter,
    TaskUpdate, TodoStore, ViewOptions,
};
use clap::{Parser, Subcommand};

/// Categorized, prioritized to-dos with local persistence.
#[derive(Debug, Parser)]
#[command(name = "taskdeck", version)]
pub struct Cli {
    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new task.
    Add {
        /// The task text.
        text: String,
        /// Category id (defaults to the first category).
        #[arg(long)]
        category: Option<String>,
        /// Priority: low, medium, or high.
        #[arg(long, default_value = "medium")]
        priority: String,
    },
    /// List tasks, filtered and sorted.
    List {
        /// Category id, or "all".
        #[arg(long, default_value = "all")]
        category: String,
        /// Status: all, active, or completed.
        #[arg(long, default_value = "all")]
        status: String,
        /// Case-insensitive substring to search for.
        #[arg(long, default_value = "")]
        search: String,
        /// Sort key: createdAt or priority.
        #[arg(long, default_value = "createdAt")]
        sort: String,
        /// Sort ascending instead of the default descending.
        #[arg(long)]
        asc: bool,
    },
    /// Toggle a task's completion state.
    Toggle {
        /// The task id.
        id: String,
    },
    /// Edit a task's fields.
    Edit {
        /// The task id.
        id: String,
        /// New text.
        #[arg(long)]
        text: Option<String>,
        /// New priority: low, medium, or high.
        #[arg(long)]
        priority: Option<String>,
        /// New category id.
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a task.
    Rm {
        /// The task id.
        id: String,
    },
    /// Manage categories.
    #[command(subcommand)]
    Category(CategoryCommand),
}

/// Category management commands.
#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// List categories.
    List,
    /// Add a new category.
    Add {
        /// Display name.
        name: String,
        /// Display color.
        #[arg(long, default_value = "#3B82F6")]
        color: String,
    },
    /// Rename a category.
    Rename {
        /// The category id.
        id: String,
        /// The new name.
        name: String,
    },
    /// Change a category's color.
    Recolor {
        /// The category id.
        id: String,
        /// The new color.
        color: String,
    },
    /// Delete a category, moving its tasks to the first remaining one.
    Rm {
        /// The category id.
        id: String,
    },
}

/// Execute a command against the store and return the text to print.
#[must_use]
pub fn run(command: Command, store: &mut TodoStore) -> String {
    match command {
        Command::Add { text, category, priority } => {
            let category = category
                .unwrap_or_else(|| store.categories()[0].id.clone());
            let priority = Priority::parse_or_default(&priority);
            store.add_task(&text, &category, priority).map_or_else(
                || "nothing added (empty text or unknown category)".to_string(),
                |task| format!("added {}", task.id),
            )
        }
        Command::List { category, status, search, sort, asc } => {
            let options = ViewOptions {
                category: CategoryFilter::parse(&category),
                status: StatusFilter::parse_or_default(&status),
                search,
                sort_key: SortKey::parse_or_default(&sort),
                direction: if asc { SortDirection::Ascending } else { SortDirection::Descending },
            };
            render_list(store, &options)
        }
        Command::Toggle { id } => {
            store.toggle_task(&id);
            store.get_task(&id).map_or_else(
                || format!("no task with id {id}"),
                |task| {
                    format!("{} is now {}", task.id, if task.completed { "done" } else { "open" })
                },
            )
        }
        Command::Edit { id, text, priority, category } => {
            let update = TaskUpdate {
                text,
                completed: None,
                priority: priority.as_deref().map(Priority::parse_or_default),
                category_id: category,
            };
            let before = store.get_task(&id).cloned();
            store.update_task(&id, update);
            match (before, store.get_task(&id)) {
                (Some(before), Some(after)) if *after != before => format!("updated {}", after.id),
                (Some(_), Some(_)) => {
                    "nothing updated (empty text, unknown category, or no changes)".to_string()
                }
                _ => format!("no task with id {id}"),
            }
        }
        Command::Rm { id } => {
            store.delete_task(&id);
            format!("removed {id}")
        }
        Command::Category(command) => run_category(command, store),
    }
}

fn run_category(command: CategoryCommand, store: &mut TodoStore) -> String {
    match command {
        CategoryCommand::List => {
            let mut out = String::new();
            for category in store.categories() {
                out.push_str(&format!("{}  {}  {}\n", category.id, category.color, category.name));
            }
            out
        }
        CategoryCommand::Add { name, color } => store.add_category(&name, &color).map_or_else(
            || "nothing added (empty name)".to_string(),
            |category| format!("added {}", category.id),
        ),
        CategoryCommand::Rename { id, name } => {
            store.update_category(&id, CategoryUpdate { name: Some(name), color: None });
            format!("renamed {id}")
        }
        CategoryCommand::Recolor { id, color } => {
            store.update_category(&id, CategoryUpdate { name: None, color: Some(color) });
            format!("recolored {id}")
        }
        CategoryCommand::Rm { id } => {
            let before = store.categories().len();
            store.delete_category(&id);
            if store.categories().len() == before {
                format!("{id} not deleted (unknown id, or it is the last category)")
            } else {
                format!("deleted {id}")
            }
        }
    }
}

fn render_list(store: &TodoStore, options: &ViewOptions) -> String {
    let visible = visible_tasks(store.tasks(), options);
    if visible.is_empty() {
        return "no tasks found".to_string();
    }
    let mut out = String::new();
    for task in visible {
        let mark = if task.completed { 'x' } else { ' ' };
        let category =
            store.get_category(&task.category_id).map_or("?", |c| c.name.as_str());
        out.push_str(&format!(
            "[{mark}] {}  {:<6}  {}  {}\n",
            task.id,
            task.priority.as_str(),
            category,
            task.text
        ));
    }
    out
}
