use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::metrics::{self, names};
use crate::validation::validate_all;
use crate::{
    formatter_for, CacheableKey, Criteria, DirectoryConfig, FilterCache, Formatter, LoadReport,
    Metrics, RenderOptions, Result, User, UserFilter,
};

#[cfg(feature = "stats")]
use crate::CacheStats;

/// The record list and its id index. Always mutated together under one lock.
#[derive(Clone, Debug, Default)]
struct Records {
    users: Vec<User>,
    index: HashMap<i64, usize>,
}

impl Records {
    /// Inserts or replaces by id. Returns the replaced user.
    fn upsert(&mut self, user: User) -> Option<User> {
        match self.index.get(&user.id) {
            Some(&pos) => {
                tracing::warn!(id = user.id, "duplicate id, later record replaces earlier");
                Some(std::mem::replace(&mut self.users[pos], user))
            }
            None => {
                self.index.insert(user.id, self.users.len());
                self.users.push(user);
                None
            }
        }
    }

    fn remove(&mut self, id: i64) -> Option<User> {
        let pos = self.index.remove(&id)?;
        let removed = self.users.remove(pos);
        for (offset, user) in self.users[pos..].iter().enumerate() {
            self.index.insert(user.id, pos + offset);
        }
        Some(removed)
    }

    fn get(&self, id: i64) -> Option<&User> {
        self.index.get(&id).and_then(|&pos| self.users.get(pos))
    }
}

/// Thread-safe in-memory user directory with O(1) id lookup.
///
/// # Structure
///
/// - the record list and a `HashMap<i64, usize>` id index, guarded together by
///   one `parking_lot::RwLock`
/// - a [`FilterCache`] of criteria results keyed by [`Criteria::to_cache_key`]
/// - an optional [`Metrics`] handle (the global instance by default)
///
/// # Invariants
///
/// - every id appears once; loading or inserting an existing id replaces the
///   earlier record in place
/// - the filter cache is cleared under the write lock by every mutation, so a
///   cached result never describes an older list
/// - readers receive copies: [`get_all`](Self::get_all), [`iter`](Self::iter)
///   and every filter operate on or return snapshots
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use userdir_core::{Criteria, DirectoryConfig, Field, UserStore};
///
/// let store = UserStore::from_records(
///     &[
///         json!({"id": 1, "name": "Alice", "email": "alice@test.com", "role": "Admin", "status": "Active"}),
///         json!({"id": 2, "name": "Bob", "email": "bob@test.com", "role": "User", "status": "Active"}),
///     ],
///     DirectoryConfig::default(),
/// )
/// .unwrap();
///
/// assert_eq!(store.get_by_id(2).unwrap().name, "Bob");
/// let admins = store.filter_by(&Criteria::new().with(Field::Role, "Admin"));
/// assert_eq!(admins.len(), 1);
/// ```
pub struct UserStore {
    records: RwLock<Records>,
    cache: FilterCache<Arc<Vec<User>>>,
    config: DirectoryConfig,
    metrics: Option<Arc<Metrics>>,
}

impl UserStore {
    /// An empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DirectoryConfig::default())
    }

    /// An empty store. Metrics go to the global instance when enabled.
    pub fn with_config(config: DirectoryConfig) -> Self {
        let metrics = config.enable_metrics.then(metrics::global);
        Self::build(config, metrics, Records::default())
    }

    /// An empty store counting into its own metrics instance.
    pub fn with_metrics(config: DirectoryConfig, metrics: Arc<Metrics>) -> Self {
        Self::build(config, Some(metrics), Records::default())
    }

    fn build(config: DirectoryConfig, metrics: Option<Arc<Metrics>>, records: Records) -> Self {
        Self {
            records: RwLock::new(records),
            cache: FilterCache::from_config(&config.cache),
            config,
            metrics,
        }
    }

    /// Builds a store and loads `records` into it.
    pub fn from_records(records: &[Value], config: DirectoryConfig) -> Result<Self> {
        let store = Self::with_config(config);
        store.load(records)?;
        Ok(store)
    }

    /// Builds a store from a JSON array of records.
    pub fn from_json(json: &str, config: DirectoryConfig) -> Result<Self> {
        let store = Self::with_config(config);
        store.load_json(json)?;
        Ok(store)
    }

    fn count(&self, name: &str, n: u64) {
        if let Some(metrics) = &self.metrics {
            metrics.increment(name, n);
        }
    }

    /// Replaces the store contents with the validated `records`.
    ///
    /// Under `ValidationPolicy::Strict` a rejected record aborts the load and
    /// leaves the store untouched.
    pub fn load(&self, records: &[Value]) -> Result<LoadReport> {
        let (users, mut report) =
            validate_all(records, 0, &self.config, self.metrics.as_deref())?;

        let mut fresh = Records::default();
        report.loaded = distinct_ids(&users);
        for user in users {
            if fresh.upsert(user).is_some() {
                report.duplicates += 1;
            }
        }

        {
            let mut guard = self.records.write();
            *guard = fresh;
            self.cache.clear();
        }

        tracing::info!(
            loaded = report.loaded,
            received = report.received,
            skipped = report.skipped,
            auto_fixed = report.auto_fixed,
            "loaded users"
        );
        self.count(names::USERS_LOADED, report.loaded as u64);
        Ok(report)
    }

    /// Parses a JSON array and [`load`](Self::load)s it.
    pub fn load_json(&self, json: &str) -> Result<LoadReport> {
        let records: Vec<Value> = serde_json::from_str(json)?;
        self.load(&records)
    }

    /// Validates and adds one record. The record index used for id repair is
    /// the current store length.
    ///
    /// Returns the stored user, or `None` if the record was skipped.
    pub fn add_record(&self, record: &Value) -> Result<Option<User>> {
        let index = self.len();
        let (mut users, _) = validate_all(
            std::slice::from_ref(record),
            index,
            &self.config,
            self.metrics.as_deref(),
        )?;

        match users.pop() {
            Some(user) => {
                self.insert(user.clone());
                self.count(names::USERS_LOADED, 1);
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Validates `records` and appends them, keeping the current contents.
    ///
    /// `loaded` counts the distinct ids the batch left in the store, as for
    /// [`load`](Self::load); `duplicates` counts every replacement, whether of
    /// an existing user or of an earlier record in the same batch.
    pub fn add_records(&self, records: &[Value]) -> Result<LoadReport> {
        let first_index = self.len();
        let (users, mut report) =
            validate_all(records, first_index, &self.config, self.metrics.as_deref())?;
        report.loaded = distinct_ids(&users);

        {
            let mut guard = self.records.write();
            for user in users {
                if guard.upsert(user).is_some() {
                    report.duplicates += 1;
                }
            }
            self.cache.clear();
        }

        self.count(names::USERS_LOADED, report.loaded as u64);
        Ok(report)
    }

    /// Inserts a typed user, replacing any user with the same id.
    pub fn insert(&self, user: User) -> Option<User> {
        let mut guard = self.records.write();
        let replaced = guard.upsert(user);
        self.cache.clear();
        replaced
    }

    pub fn remove(&self, id: i64) -> Option<User> {
        let mut guard = self.records.write();
        let removed = guard.remove(id);
        if removed.is_some() {
            self.cache.clear();
        }
        removed
    }

    /// Removes every user.
    pub fn clear(&self) {
        let mut guard = self.records.write();
        *guard = Records::default();
        self.cache.clear();
    }

    /// Looks a user up by id in O(1). Returns a copy.
    pub fn get_by_id(&self, id: i64) -> Option<User> {
        self.count(names::LOOKUPS, 1);
        let found = self.records.read().get(id).cloned();
        if found.is_some() {
            self.count(names::LOOKUP_HITS, 1);
        } else {
            self.count(names::LOOKUP_MISSES, 1);
        }
        found
    }

    pub fn contains(&self, id: i64) -> bool {
        self.records.read().index.contains_key(&id)
    }

    /// A snapshot of every user in store order.
    pub fn get_all(&self) -> Vec<User> {
        self.count(names::GET_ALL, 1);
        self.records.read().users.clone()
    }

    /// Iterates over a snapshot; later mutations of the store are not observed.
    pub fn iter(&self) -> std::vec::IntoIter<User> {
        self.records.read().users.clone().into_iter()
    }

    /// Users matching an arbitrary predicate. Not cached.
    pub fn filter<F>(&self, filter: &F) -> Vec<User>
    where
        F: UserFilter + ?Sized,
    {
        self.count(names::FILTERS, 1);
        let result: Vec<User> = self
            .records
            .read()
            .users
            .iter()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        self.count(names::FILTERED_USERS, result.len() as u64);
        result
    }

    /// Users matching `criteria`, served from the filter cache when possible.
    ///
    /// Lookup and fill both happen under the read lock, which writers need
    /// exclusively before they clear the cache.
    pub fn filter_by(&self, criteria: &Criteria) -> Vec<User> {
        self.count(names::FILTERS, 1);
        if !self.config.cache.enabled {
            let result: Vec<User> = self
                .records
                .read()
                .users
                .iter()
                .filter(|u| criteria.matches(u))
                .cloned()
                .collect();
            self.count(names::FILTERED_USERS, result.len() as u64);
            return result;
        }

        let key = criteria.to_cache_key();
        let guard = self.records.read();
        if let Some(hit) = self.cache.get(&key) {
            tracing::trace!(%key, "filter cache hit");
            self.count(names::FILTERED_USERS, hit.len() as u64);
            return hit.to_vec();
        }

        let result: Vec<User> = guard
            .users
            .iter()
            .filter(|u| criteria.matches(u))
            .cloned()
            .collect();
        self.cache.insert(&key, Arc::new(result.clone()));
        drop(guard);

        tracing::trace!(%key, matched = result.len(), "filter cache miss");
        self.count(names::FILTERED_USERS, result.len() as u64);
        result
    }

    /// Renders every user in the configured `default_format`.
    pub fn render(&self, options: &RenderOptions) -> String {
        let users = self.get_all();
        formatter_for(self.config.default_format).format_users(&users, options)
    }

    /// Empty criteria carrying the store's configured case sensitivity.
    pub fn criteria(&self) -> Criteria {
        Criteria::new().case_sensitive(self.config.case_sensitive)
    }

    /// A deep, independent copy. The copy starts with an empty cache and
    /// shares the metrics handle.
    pub fn snapshot(&self) -> UserStore {
        self.count(names::SNAPSHOTS, 1);
        let records = self.records.read().clone();
        Self::build(self.config.clone(), self.metrics.clone(), records)
    }

    pub fn len(&self) -> usize {
        self.records.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().users.is_empty()
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    pub fn metrics(&self) -> Option<&Arc<Metrics>> {
        self.metrics.as_ref()
    }

    /// Number of cached filter results.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    #[cfg(feature = "stats")]
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }
}

fn distinct_ids(users: &[User]) -> usize {
    users.iter().map(|u| u.id).collect::<HashSet<_>>().len()
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UserStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserStore")
            .field("len", &self.len())
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}

impl<'a> IntoIterator for &'a UserStore {
    type Item = User;
    type IntoIter = std::vec::IntoIter<User>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
