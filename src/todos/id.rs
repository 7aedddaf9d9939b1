//! Opaque unique identifier generation for tasks and categories.
//!
//! Identifiers are a short prefix plus eight hex characters derived from a
//! time-seeded hash mixed with a process-wide counter. The counter guarantees
//! uniqueness within a session even when two ids are generated in the same
//! clock tick; the time seed keeps ids distinct across sessions.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Process-wide counter mixed into every id.
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Whether to use deterministic IDs (for testing).
static USE_DETERMINISTIC_IDS: AtomicBool = AtomicBool::new(false);

/// Enable deterministic ID generation for testing.
///
/// When enabled, ids use the bare counter instead of a time-seeded hash,
/// so the first generated id is `<prefix>-00000000`, the next
/// `<prefix>-00000001`, and so on.
pub fn enable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.store(true, Ordering::SeqCst);
    ID_COUNTER.store(0, Ordering::SeqCst);
}

/// Disable deterministic ID generation.
pub fn disable_deterministic_ids() {
    USE_DETERMINISTIC_IDS.store(false, Ordering::SeqCst);
}

/// Generate an eight-character hex suffix.
#[allow(clippy::cast_possible_truncation)]
fn hex_suffix() -> String {
    let count = ID_COUNTER.fetch_add(1, Ordering::SeqCst);
    if USE_DETERMINISTIC_IDS.load(Ordering::SeqCst) {
        return format!("{count:08x}");
    }

    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let state = RandomState::new();
    let mut hasher = state.build_hasher();
    // Truncation is intentional - we only need entropy, not precision
    hasher.write_u64(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64),
    );
    hasher.write_u64(count);
    format!("{:08x}", hasher.finish() & 0xFFFF_FFFF)
}

/// Generate a unique task id.
#[must_use]
pub fn generate_task_id() -> String {
    format!("task-{}", hex_suffix())
}

/// Generate a unique category id.
#[must_use]
pub fn generate_category_id() -> String {
    format!("cat-{}", hex_suffix())
}
