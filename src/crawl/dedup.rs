//! Process-wide fragment deduplication
//!
//! A single shared set of `(source URL, fragment text)` pairs scoped to one
//! run. Every extracted block consults it before becoming a fragment, which
//! enforces the run's one strict consistency invariant: no two emitted
//! fragments share both URL and text.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Shared seen-set for `(source URL, text)` pairs.
///
/// Callers hold the internal lock only for the insert itself; there is no
/// await point while it is held.
#[derive(Debug, Default)]
pub struct FragmentDeduplicator {
    seen: Mutex<HashSet<(String, String)>>,
    duplicates: AtomicU64,
}

impl FragmentDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-and-mark in one step. Returns `true` if the pair was already
    /// seen; otherwise records it and returns `false`. Two concurrent callers
    /// presenting the same key cannot both observe "not seen".
    pub fn seen_or_mark(&self, source_url: &str, text: &str) -> bool {
        let inserted = self
            .lock()
            .insert((source_url.to_string(), text.to_string()));
        if !inserted {
            self.duplicates.fetch_add(1, Ordering::Relaxed);
        }
        !inserted
    }

    /// Number of distinct pairs recorded so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of suppressed duplicate blocks.
    pub fn duplicates_skipped(&self) -> u64 {
        self.duplicates.load(Ordering::Relaxed)
    }

    // A panicking page task must never wedge the set for its siblings, so a
    // poisoned lock is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, HashSet<(String, String)>> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_seen_then_duplicate() {
        let dedup = FragmentDeduplicator::new();

        assert!(!dedup.seen_or_mark("https://example.com/a", "Hello world"));
        assert!(dedup.seen_or_mark("https://example.com/a", "Hello world"));
        assert_eq!(dedup.len(), 1);
        assert_eq!(dedup.duplicates_skipped(), 1);
    }

    #[test]
    fn test_key_includes_source_url() {
        let dedup = FragmentDeduplicator::new();

        assert!(!dedup.seen_or_mark("https://example.com/a", "Hello world"));
        // Same text on a different page is not a duplicate
        assert!(!dedup.seen_or_mark("https://example.com/b", "Hello world"));
        assert_eq!(dedup.len(), 2);
        assert_eq!(dedup.duplicates_skipped(), 0);
    }

    #[test]
    fn test_exactly_one_winner_under_contention() {
        let dedup = Arc::new(FragmentDeduplicator::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let dedup = Arc::clone(&dedup);
                std::thread::spawn(move || dedup.seen_or_mark("https://example.com", "same text"))
            })
            .collect();

        let already_seen: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners = already_seen.iter().filter(|seen| !**seen).count();
        assert_eq!(winners, 1, "exactly one caller must win the insert");
        assert_eq!(dedup.len(), 1);
        assert_eq!(dedup.duplicates_skipped(), 15);
    }
}
