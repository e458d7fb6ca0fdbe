use serde::{Deserialize, Serialize};

/// Represents the policy used for evicting filter results from the cache when it reaches its limit.
///
/// # Variants
///
/// * `FIFO` - **First In, First Out** (default)
///   - Results are evicted in the order they were cached
///   - A cache hit does NOT change the entry's position
///   - O(1) eviction
///
/// * `LRU` - **Least Recently Used**
///   - The least recently read result is evicted first
///   - A cache hit moves the entry to the "most recent" position (O(n))
///
/// * `Random` - **Random replacement**
///   - A uniformly chosen entry is evicted
///   - No bookkeeping on hits
///
/// * `Clear` - **Unbounded, then clear**
///   - Entries accumulate until the limit is crossed, then the whole cache is dropped
///
/// # Examples
///
/// ```
/// use userdir_core::EvictionPolicy;
///
/// let policy: EvictionPolicy = "lru".into();
/// assert_eq!(policy, EvictionPolicy::LRU);
///
/// let default_policy = EvictionPolicy::default();
/// assert_eq!(default_policy, EvictionPolicy::FIFO);
/// ```
///
/// # Performance Characteristics
///
/// | Policy | Eviction | Cache Hit |
/// |--------|----------|-----------|
/// | FIFO   | O(1)     | O(1)      |
/// | LRU    | O(1)     | O(n)      |
/// | Random | O(n)     | O(1)      |
/// | Clear  | O(n)     | O(1)      |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    FIFO,
    LRU,
    Random,
    Clear,
}

impl EvictionPolicy {
    /// Returns the default eviction policy (FIFO).
    pub const fn default() -> Self {
        EvictionPolicy::FIFO
    }
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        EvictionPolicy::default()
    }
}

/// Converts a string slice to an `EvictionPolicy`.
///
/// The conversion is case-insensitive and defaults to FIFO for unrecognized values.
///
/// ```
/// use userdir_core::EvictionPolicy;
///
/// assert_eq!(EvictionPolicy::from("CLEAR"), EvictionPolicy::Clear);
/// assert_eq!(EvictionPolicy::from("random"), EvictionPolicy::Random);
/// assert_eq!(EvictionPolicy::from("mru"), EvictionPolicy::FIFO);
/// ```
impl From<&str> for EvictionPolicy {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "lru" => EvictionPolicy::LRU,
            "random" => EvictionPolicy::Random,
            "clear" => EvictionPolicy::Clear,
            _ => EvictionPolicy::FIFO,
        }
    }
}
