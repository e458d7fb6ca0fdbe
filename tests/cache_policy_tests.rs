use std::sync::Arc;
use userdir::{
    CacheConfig, CacheableKey, Criteria, DirectoryConfig, EvictionPolicy, Field, Metrics, User,
    UserStore,
};

fn store_with_cache(cache: CacheConfig) -> UserStore {
    let store = UserStore::with_metrics(
        DirectoryConfig::default().with_cache(cache),
        Arc::new(Metrics::new()),
    );
    for (id, role) in [(1, "Admin"), (2, "User"), (3, "Moderator"), (4, "Guest")] {
        store.insert(User::new(id, format!("U{}", id), "u@example.com").with_role(role));
    }
    store
}

fn role(r: &str) -> Criteria {
    Criteria::new().with(Field::Role, r)
}

#[test]
fn test_fifo_through_store() {
    let store = store_with_cache(CacheConfig {
        limit: Some(2),
        policy: EvictionPolicy::FIFO,
        ..CacheConfig::default()
    });

    store.filter_by(&role("Admin"));
    store.filter_by(&role("User"));
    store.filter_by(&role("Admin"));
    store.filter_by(&role("Moderator"));
    assert_eq!(store.cache_len(), 2);

    #[cfg(feature = "stats")]
    {
        assert_eq!(store.cache_stats().hits(), 1);
        assert_eq!(store.cache_stats().misses(), 3);
        assert_eq!(store.cache_stats().evictions(), 1);
    }

    // "Admin" was first in, so it is gone despite the hit.
    store.filter_by(&role("Admin"));
    #[cfg(feature = "stats")]
    assert_eq!(store.cache_stats().misses(), 4);
}

#[test]
fn test_lru_through_store() {
    let store = store_with_cache(CacheConfig {
        limit: Some(2),
        policy: EvictionPolicy::LRU,
        ..CacheConfig::default()
    });

    store.filter_by(&role("Admin"));
    store.filter_by(&role("User"));
    store.filter_by(&role("Admin"));
    store.filter_by(&role("Moderator"));

    store.filter_by(&role("Admin"));
    #[cfg(feature = "stats")]
    assert_eq!(store.cache_stats().hits(), 2);
}

#[test]
fn test_clear_policy_through_store() {
    let store = store_with_cache(CacheConfig {
        limit: Some(3),
        policy: EvictionPolicy::Clear,
        ..CacheConfig::default()
    });

    for r in ["Admin", "User", "Moderator"] {
        store.filter_by(&role(r));
    }
    assert_eq!(store.cache_len(), 3);

    store.filter_by(&role("Guest"));
    assert_eq!(store.cache_len(), 0);
}

#[test]
fn test_random_policy_respects_limit() {
    let store = store_with_cache(CacheConfig {
        limit: Some(2),
        policy: EvictionPolicy::Random,
        ..CacheConfig::default()
    });

    for r in ["Admin", "User", "Moderator", "Guest", "Nobody"] {
        store.filter_by(&role(r));
        assert!(store.cache_len() <= 2);
    }
}

#[test]
fn test_unbounded_cache() {
    let store = store_with_cache(CacheConfig {
        limit: None,
        ..CacheConfig::default()
    });

    for id in 0..50 {
        store.filter_by(&Criteria::new().with(Field::Id, id.to_string()));
    }
    assert_eq!(store.cache_len(), 50);
}

#[test]
fn test_case_flag_separates_cache_entries() {
    let store = store_with_cache(CacheConfig::default());
    let insensitive = Criteria::new().with(Field::Name, "u1");
    let sensitive = insensitive.clone().case_sensitive(true);
    assert_ne!(insensitive.to_cache_key(), sensitive.to_cache_key());

    assert_eq!(store.filter_by(&insensitive).len(), 1);
    assert!(store.filter_by(&sensitive).is_empty());
    assert_eq!(store.cache_len(), 2);
}

#[test]
fn test_cached_results_are_copies() {
    let store = store_with_cache(CacheConfig::default());
    let mut first = store.filter_by(&role("Admin"));
    first[0].name = "Changed".to_string();

    let second = store.filter_by(&role("Admin"));
    assert_eq!(second[0].name, "U1");
}

#[test]
fn test_ttl_expires_results() {
    let store = store_with_cache(CacheConfig {
        ttl: Some(0),
        ..CacheConfig::default()
    });
    store.filter_by(&role("Admin"));
    store.filter_by(&role("Admin"));

    #[cfg(feature = "stats")]
    {
        assert_eq!(store.cache_stats().hits(), 0);
        assert_eq!(store.cache_stats().misses(), 2);
    }
}
