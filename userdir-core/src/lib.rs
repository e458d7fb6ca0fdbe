//! # Userdir Core
//!
//! Core types and the indexed store behind the `userdir` crate.
//!
//! ## Features
//!
//! - **Validated Loading**: raw JSON records are checked against a configurable
//!   set of required fields under a strict, skip or auto-fix policy
//! - **O(1) Lookup**: users are indexed by id
//! - **Criteria Filtering**: exact and substring field matching, composable filters
//! - **Filter Cache**: thread-safe cache of filter results with FIFO, LRU, Random
//!   or Clear eviction and optional TTL
//! - **Formatting**: compact, verbose, JSON, table and export renderings
//! - **Metrics**: named operation counters
//!
//! ## Module Organization
//!
//! - [`user`] - the `User` record and its `Field`s
//! - [`validation`] - the load pipeline
//! - [`store`] - `UserStore`, the indexed in-memory directory
//! - [`filters`] - filter predicates and `Criteria`
//! - [`filter_cache`] - the filter-result cache
//! - [`eviction_policy`] - FIFO, LRU, Random and Clear strategies
//! - [`formatters`] - text and JSON renderings
//! - [`metrics`] - operation counters
//!
mod cache_entry;
mod config;
mod error;
mod eviction_policy;
mod filter_cache;
mod keys;

pub mod filters;
pub mod formatters;
pub mod metrics;
pub mod store;
pub mod user;
pub mod utils;
pub mod validation;

#[cfg(feature = "stats")]
mod stats;

pub use cache_entry::CacheEntry;
pub use config::{CacheConfig, DirectoryConfig, ValidationPolicy};
pub use error::{DirectoryError, Result};
pub use eviction_policy::EvictionPolicy;
pub use filter_cache::FilterCache;
pub use filters::{Composite, Criteria, FieldMatch, MatchMode, SubstringMatch, UserFilter};
pub use formatters::{
    formatter_for, render, to_json_document, CompactFormatter, ExportFormatter, FieldSelection,
    FormatMode, Formatter, JsonFormatter, RenderOptions, TableFormatter, VerboseFormatter,
};
pub use keys::CacheableKey;
pub use metrics::Metrics;
pub use store::UserStore;
pub use user::{Field, FieldSet, User};
pub use validation::{validate_record, LoadReport, Validated};

#[cfg(feature = "stats")]
pub use stats::CacheStats;
