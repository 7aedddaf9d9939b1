//! Task and category management: models, the canonical store, and the
//! pure view pipeline.

pub mod id;
pub mod models;
pub mod store;
pub mod view;

pub use models::{Category, CategoryUpdate, Priority, Task, TaskUpdate};
pub use store::TodoStore;
pub use view::{visible_tasks, CategoryFilter, SortDirection, SortKey, StatusFilter, ViewOptions};
