use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Counter names used by the store and the load pipeline.
pub mod names {
    pub const LOOKUPS: &str = "store.lookups";
    pub const LOOKUP_HITS: &str = "store.lookup_hits";
    pub const LOOKUP_MISSES: &str = "store.lookup_misses";
    pub const GET_ALL: &str = "store.get_all";
    pub const FILTERS: &str = "store.filters";
    pub const FILTERED_USERS: &str = "store.filtered_users";
    pub const SNAPSHOTS: &str = "store.snapshots";
    pub const USERS_LOADED: &str = "store.users_loaded";

    pub const VALIDATION_PASSED: &str = "validation.passed";
    pub const VALIDATION_AUTO_FIXED: &str = "validation.auto_fixed";
    pub const VALIDATION_SKIPPED: &str = "validation.skipped";
    pub const VALIDATION_ERRORS: &str = "validation.errors";

    pub const DISPLAY_OPERATIONS: &str = "display_operations";
    pub const ID_LOOKUP_OPERATIONS: &str = "id_lookup_operations";
    pub const FILTER_OPERATIONS: &str = "filter_operations";
    pub const EXPORT_OPERATIONS: &str = "export_operations";
}

/// Named operation counters.
///
/// Counters spring into existence on first increment; reading an unknown
/// counter returns zero.
///
/// # Examples
///
/// ```
/// use userdir_core::Metrics;
///
/// let metrics = Metrics::new();
/// metrics.increment("store.lookups", 2);
/// metrics.increment("store.lookups", 1);
/// assert_eq!(metrics.get("store.lookups"), 3);
/// assert_eq!(metrics.get("never.touched"), 0);
/// ```
#[derive(Debug, Default)]
pub struct Metrics {
    counters: DashMap<String, u64>,
}

static GLOBAL_METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| Arc::new(Metrics::new()));

/// The process-wide metrics instance shared by stores created with metrics enabled.
pub fn global() -> Arc<Metrics> {
    Arc::clone(&GLOBAL_METRICS)
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, name: &str, n: u64) {
        if let Some(mut counter) = self.counters.get_mut(name) {
            *counter += n;
            return;
        }
        *self.counters.entry(name.to_string()).or_insert(0) += n;
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters.get(name).map(|c| *c).unwrap_or(0)
    }

    /// A point-in-time copy of every counter, sorted by name.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counters
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    /// Removes every counter.
    pub fn reset(&self) {
        self.counters.clear();
    }
}
