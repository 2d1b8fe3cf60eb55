//! Request cache shared by the pages.
//!
//! Reads are cached per [`QueryKey`]; a mutation invalidates a whole
//! [`QueryFamily`] so the next read of any key in it goes back to the server.
//! Timestamps are milliseconds supplied by the caller.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Entries younger than this are served without refetching.
pub const DEFAULT_STALE_TIME_MS: u64 = 5 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryFamily {
    Patients,
    Medications,
    Reconciliations,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKey {
    Patients,
    /// Medication list, optionally narrowed to one patient.
    Medications(Option<i64>),
    Reconciliations,
    Reconciliation(i64),
    CurrentUser,
}

impl QueryKey {
    pub fn family(&self) -> QueryFamily {
        match self {
            QueryKey::Patients => QueryFamily::Patients,
            QueryKey::Medications(_) => QueryFamily::Medications,
            QueryKey::Reconciliations | QueryKey::Reconciliation(_) => QueryFamily::Reconciliations,
            QueryKey::CurrentUser => QueryFamily::User,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    fetched_at: u64,
    invalidated: bool,
}

#[derive(Debug, Clone)]
pub struct QueryCache<V> {
    entries: HashMap<QueryKey, Entry<V>>,
    stale_time_ms: u64,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> QueryCache<V> {
    pub fn new() -> Self {
        Self::with_stale_time(DEFAULT_STALE_TIME_MS)
    }

    pub fn with_stale_time(stale_time_ms: u64) -> Self {
        Self {
            entries: HashMap::new(),
            stale_time_ms,
        }
    }

    /// The cached value if it is neither invalidated nor older than the stale time.
    pub fn get_fresh(&self, key: &QueryKey, now_ms: u64) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|e| !e.invalidated && now_ms.saturating_sub(e.fetched_at) < self.stale_time_ms)
            .map(|e| &e.value)
    }

    /// The cached value regardless of freshness, for rendering while a refetch runs.
    pub fn get(&self, key: &QueryKey) -> Option<&V> {
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn needs_fetch(&self, key: &QueryKey, now_ms: u64) -> bool {
        self.get_fresh(key, now_ms).is_none()
    }

    pub fn insert(&mut self, key: QueryKey, value: V, now_ms: u64) {
        self.entries.insert(
            key,
            Entry {
                value,
                fetched_at: now_ms,
                invalidated: false,
            },
        );
    }

    /// Marks every entry of `family` stale and returns how many were affected.
    pub fn invalidate(&mut self, family: QueryFamily) -> usize {
        let mut touched = 0;
        for (key, entry) in self.entries.iter_mut() {
            if key.family() == family {
                entry.invalidated = true;
                touched += 1;
            }
        }
        touched
    }

    /// Dropped wholesale on logout.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Read,
    Mutation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub read_retries: u32,
    pub mutation_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            read_retries: 1,
            mutation_retries: 0,
        }
    }
}

impl RetryPolicy {
    /// Total number of attempts, the first one included.
    pub fn attempts(&self, kind: RequestKind) -> u32 {
        1 + match kind {
            RequestKind::Read => self.read_retries,
            RequestKind::Mutation => self.mutation_retries,
        }
    }

    /// Whether a failed `attempt` (1-based) may be repeated.
    pub fn should_retry(&self, kind: RequestKind, attempt: u32) -> bool {
        attempt < self.attempts(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_until_stale_time_elapses() {
        let mut cache = QueryCache::with_stale_time(1_000);
        cache.insert(QueryKey::Patients, vec![1, 2], 10_000);

        assert_eq!(cache.get_fresh(&QueryKey::Patients, 10_999), Some(&vec![1, 2]));
        assert!(cache.needs_fetch(&QueryKey::Patients, 11_000));
        assert_eq!(cache.get(&QueryKey::Patients), Some(&vec![1, 2]));
    }

    #[test]
    fn deleting_a_patient_refetches_the_patient_list() {
        let mut cache = QueryCache::new();
        cache.insert(QueryKey::Patients, "list", 0);
        cache.insert(QueryKey::Medications(Some(3)), "meds", 0);

        assert_eq!(cache.invalidate(QueryFamily::Patients), 1);
        assert!(cache.needs_fetch(&QueryKey::Patients, 1));
        assert!(!cache.needs_fetch(&QueryKey::Medications(Some(3)), 1));

        cache.insert(QueryKey::Patients, "refetched", 2);
        assert_eq!(cache.get_fresh(&QueryKey::Patients, 3), Some(&"refetched"));
    }

    #[test]
    fn filtered_medication_lists_share_a_family() {
        let mut cache = QueryCache::new();
        cache.insert(QueryKey::Medications(None), "all", 0);
        cache.insert(QueryKey::Medications(Some(1)), "one patient", 0);
        assert_eq!(cache.invalidate(QueryFamily::Medications), 2);
        assert_eq!(QueryKey::Medications(None).family(), QueryKey::Medications(Some(1)).family());
        assert_ne!(QueryKey::Medications(Some(1)), QueryKey::Medications(None));
    }

    #[test]
    fn reads_retry_once_mutations_never() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(RequestKind::Read, 1));
        assert!(!policy.should_retry(RequestKind::Read, 2));
        assert!(!policy.should_retry(RequestKind::Mutation, 1));
    }
}
