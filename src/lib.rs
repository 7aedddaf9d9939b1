//! # `taskdeck`
//!
//! Single-user task management core: categorized, prioritized to-dos with
//! JSON snapshot persistence and a pure filter/search/sort view pipeline.
//!
//! The [`todos::TodoStore`] owns the canonical task and category
//! collections and persists them after every mutation;
//! [`todos::visible_tasks`] derives the display order from read-only
//! snapshots. Frontends consume only these two surfaces.

pub mod error;
pub mod paths;
pub mod storage;
pub mod todos;

#[cfg(feature = "cli")]
pub mod cli;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
