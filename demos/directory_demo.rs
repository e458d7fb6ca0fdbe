//! Walks through loading, lookup, filtering and rendering.
//!
//! Run with `RUST_LOG=userdir_core=debug` to see the load pipeline's events.

use serde_json::json;
use tracing_subscriber::EnvFilter;
use userdir::{
    display_users, export_users_to_string, metrics, render, Criteria, DirectoryConfig,
    EvictionPolicy, Field, FieldSelection, FormatMode, RenderOptions, UserStore,
};

fn main() -> userdir::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let records = vec![
        json!({"id": 1, "name": "John Doe", "email": "john@example.com", "role": "Admin",
               "status": "Active", "join_date": "2023-01-15", "last_login": "2025-11-26"}),
        json!({"id": 2, "name": "Jane Smith", "email": "jane@example.com", "role": "User",
               "status": "Active", "join_date": "2023-03-10", "last_login": "2025-11-25"}),
        json!({"id": 3, "name": "Bob Johnson", "email": "bob@example.com", "role": "User",
               "status": "Inactive", "join_date": "2023-06-20", "last_login": "2025-10-15"}),
        json!({"id": 4, "name": "Alice Williams", "email": "alice@example.com", "role": "Moderator",
               "status": "Active", "join_date": "2023-08-05", "last_login": "2025-11-27"}),
        json!({"id": "5", "name": "Partial Record"}),
    ];

    println!("=== Compatibility display ===\n");
    println!("{}\n", display_users(&records, true, true)?);

    let config = DirectoryConfig::default().with_cache_limit(Some(2), EvictionPolicy::LRU);
    let store = UserStore::from_records(&records, config)?;

    println!("=== Lookup ===\n");
    match store.get_by_id(3) {
        Some(user) => println!("Found: {} <{}>\n", user.name, user.email),
        None => println!("User 3 not found\n"),
    }

    println!("=== Filtering (second call served from cache) ===\n");
    let active_users = Criteria::new()
        .with(Field::Role, "User")
        .with(Field::Status, "Active");
    for _ in 0..2 {
        let found = store.filter_by(&active_users);
        println!("{} active user(s)", found.len());
    }
    #[cfg(feature = "stats")]
    println!(
        "cache hits: {}, misses: {}\n",
        store.cache_stats().hits(),
        store.cache_stats().misses()
    );

    let everyone = store.get_all();
    let brief = RenderOptions::default()
        .with_fields(FieldSelection::only([Field::Id, Field::Name, Field::Role]))
        .with_total(false);

    for mode in [FormatMode::Table, FormatMode::Json, FormatMode::Verbose] {
        println!("=== {} ===\n", mode);
        println!("{}\n", render(&everyone, mode, &brief));
    }

    println!("=== Export ===\n");
    print!("{}", export_users_to_string(&records[..2])?);

    println!("\n=== Metrics ===\n");
    for (name, value) in metrics::global().snapshot() {
        println!("{:<28} {}", name, value);
    }

    Ok(())
}
