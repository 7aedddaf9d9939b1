//! Path utilities for determining where taskdeck stores its data.
//!
//! Collections are persisted as JSON files in `~/.taskdeck/`.

use std::path::PathBuf;

/// The base directory name for taskdeck data.
const DATA_DIR_NAME: &str = ".taskdeck";

/// Get the base data directory for taskdeck.
///
/// Returns `~/.taskdeck/` or `None` if the home directory cannot be
/// determined.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}
