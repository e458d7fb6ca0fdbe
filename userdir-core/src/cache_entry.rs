use std::time::Instant;

/// Internal wrapper that tracks when a filter result was cached.
/// Used for TTL expiration support.
///
/// # Examples
///
/// ```
/// use userdir_core::CacheEntry;
///
/// let entry = CacheEntry::new(vec![1, 2, 3]);
/// assert_eq!(entry.value, vec![1, 2, 3]);
///
/// // Check if expired (TTL of 60 seconds)
/// assert!(!entry.is_expired(Some(60)));
/// ```
#[derive(Clone, Debug)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    /// Creates a new cache entry stamped with `Instant::now()`.
    pub fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    /// Returns true if the entry age reached the provided TTL (in seconds).
    /// `None` means the entry never expires.
    pub fn is_expired(&self, ttl: Option<u64>) -> bool {
        if let Some(ttl_secs) = ttl {
            self.inserted_at.elapsed().as_secs() >= ttl_secs
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_new_entry_not_expired() {
        let entry = CacheEntry::new(42);
        assert_eq!(entry.value, 42);
        assert!(!entry.is_expired(Some(10)));
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let entry = CacheEntry::new("data");
        assert!(entry.is_expired(Some(0)));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("data");
        thread::sleep(Duration::from_millis(1100));
        assert!(entry.is_expired(Some(1)));
        assert!(!entry.is_expired(Some(3)));
    }

    #[test]
    fn test_no_ttl_never_expires() {
        let entry = CacheEntry::new(100);
        thread::sleep(Duration::from_millis(50));
        assert!(!entry.is_expired(None));
    }
}
