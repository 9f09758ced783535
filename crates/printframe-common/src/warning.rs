//! Deduplicated warnings.
//!
//! Provides deduplication to avoid spamming the same warning multiple times,
//! e.g. one cross-origin stylesheet skipped on every print of a page.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a non-fatal condition (emits once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("styles", "skipping cross-origin stylesheet https://cdn.example/a.css");
/// ```
///
/// Returns `true` when the warning was emitted, `false` when it was a duplicate.
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
    should_emit
}

/// Clear all recorded warnings (call when a new print session starts)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_warnings_are_suppressed() {
        let message = "duplicate_warnings_are_suppressed";
        assert!(warn_once("test", message));
        assert!(!warn_once("test", message));
        assert!(warn_once("other", message));
    }
}
