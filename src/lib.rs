//! # Userdir
//!
//! An in-memory user directory: load and validate raw records, look users up
//! by id, filter them by criteria and render them as text or JSON.
//!
//! ## Features
//!
//! - **Validated loading**: strict, skip or auto-fix handling of incomplete records
//! - **O(1) lookup**: a hash index from id to position
//! - **Cached filtering**: criteria results are cached with FIFO, LRU, Random
//!   or Clear eviction, and the cache is dropped on every mutation
//! - **Thread-safe**: one `RwLock` guards the record list and its index; reads
//!   return snapshots
//! - **Formatting**: compact, verbose, JSON, table and export renderings
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use userdir::{Criteria, DirectoryConfig, Field, FormatMode, RenderOptions, UserStore};
//!
//! let records = vec![
//!     json!({"id": 1, "name": "John Doe", "email": "john@example.com", "role": "Admin",
//!            "status": "Active", "join_date": "2023-01-15", "last_login": "2025-11-26"}),
//!     json!({"id": 2, "name": "Jane Smith", "email": "jane@example.com", "role": "User",
//!            "status": "Active", "join_date": "2023-03-10", "last_login": "2025-11-25"}),
//! ];
//!
//! let store = UserStore::from_records(&records, DirectoryConfig::default()).unwrap();
//! assert_eq!(store.get_by_id(2).unwrap().name, "Jane Smith");
//!
//! let admins = store.filter_by(&Criteria::new().with(Field::Role, "Admin"));
//! let text = userdir::render(&admins, FormatMode::Compact, &RenderOptions::default().with_total(false));
//! assert!(text.starts_with("ID: 1 | Name: John Doe"));
//! ```
//!
//! ## Compatibility Functions
//!
//! [`display_users`], [`get_user_by_id`], [`filter_users`] and
//! [`export_users_to_string`] take raw records and rebuild a store on every
//! call. Long-lived callers should hold a [`UserStore`] (or use
//! [`global_store`]) instead.
//!
//! ## Logging
//!
//! The crate emits `tracing` events and installs no subscriber.

use once_cell::sync::Lazy;
use serde_json::Value;

pub use userdir_core::*;

use userdir_core::metrics::names;

static GLOBAL_STORE: Lazy<UserStore> = Lazy::new(UserStore::new);

/// The process-wide store, created empty on first use.
///
/// # Examples
///
/// ```
/// use userdir::{global_store, User};
///
/// global_store().insert(User::new(7001, "Doc Example", "doc@example.com"));
/// assert!(global_store().contains(7001));
/// global_store().remove(7001);
/// ```
pub fn global_store() -> &'static UserStore {
    &GLOBAL_STORE
}

fn fresh_store(records: &[Value]) -> Result<UserStore> {
    UserStore::from_records(records, DirectoryConfig::default())
}

/// Renders every record on one compact line each.
///
/// With `show_all` the output ends with `Total users processed: N`. With
/// `verbose` every processed id is logged at info level.
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let records = vec![json!({"id": 1, "name": "Ann", "email": "ann@test.com", "role": "User",
///                           "status": "Active", "join_date": "2024-01-01", "last_login": "2025-01-01"})];
/// let out = userdir::display_users(&records, true, false).unwrap();
/// assert!(out.ends_with("Total users processed: 1"));
/// ```
pub fn display_users(records: &[Value], show_all: bool, verbose: bool) -> Result<String> {
    let store = fresh_store(records)?;
    let users = store.get_all();

    if verbose {
        for user in &users {
            tracing::info!(id = user.id, "processing user");
        }
    }

    let out = store.render(&RenderOptions::default().with_total(show_all));

    metrics::global().increment(names::DISPLAY_OPERATIONS, 1);
    tracing::debug!(users = users.len(), "displayed users");
    Ok(out)
}

/// Looks up one record by id.
pub fn get_user_by_id(records: &[Value], id: i64) -> Result<Option<User>> {
    let store = fresh_store(records)?;
    metrics::global().increment(names::ID_LOOKUP_OPERATIONS, 1);
    Ok(store.get_by_id(id))
}

/// Returns the records matching `criteria`, in input order.
pub fn filter_users(records: &[Value], criteria: &Criteria) -> Result<Vec<User>> {
    let store = fresh_store(records)?;
    let filtered = store.filter_by(criteria);
    metrics::global().increment(names::FILTER_OPERATIONS, 1);
    tracing::debug!(matched = filtered.len(), criteria = criteria.len(), "filtered users");
    Ok(filtered)
}

/// Renders every record in the framed export layout.
pub fn export_users_to_string(records: &[Value]) -> Result<String> {
    let store = fresh_store(records)?;
    let out = ExportFormatter::default().format_users(&store.get_all(), &RenderOptions::default());
    metrics::global().increment(names::EXPORT_OPERATIONS, 1);
    Ok(out)
}
