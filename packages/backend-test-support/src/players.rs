//! Unique player identifiers for tests that share a store.

use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Build a player id that is unique within the test process.
///
/// The prefix keeps log output readable: `player_id("tank")` → `tank-17`.
pub fn player_id(prefix: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{n}")
}
