use std::collections::{HashMap, VecDeque};

use crate::CacheEntry;

/// Moves a key to the end of the order queue (marks it as most recently used).
///
/// If the key is not queued the queue is left unchanged. O(n).
///
/// ```
/// use std::collections::VecDeque;
/// use userdir_core::utils::move_key_to_end;
///
/// let mut order = VecDeque::from(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
/// move_key_to_end(&mut order, "a");
/// assert_eq!(order, ["b", "c", "a"]);
///
/// move_key_to_end(&mut order, "zzz");
/// assert_eq!(order.len(), 3);
/// ```
pub fn move_key_to_end(order: &mut VecDeque<String>, key: &str) {
    if let Some(pos) = order.iter().position(|k| k == key) {
        if let Some(k) = order.remove(pos) {
            order.push_back(k);
        }
    }
}

/// Removes a key from both the cache map and the order queue.
///
/// Returns `true` if the map held the key.
pub fn remove_key<V>(
    map: &mut HashMap<String, CacheEntry<V>>,
    order: &mut VecDeque<String>,
    key: &str,
) -> bool {
    if let Some(pos) = order.iter().position(|k| k == key) {
        order.remove(pos);
    }
    map.remove(key).is_some()
}

/// Pops keys off the front of the queue until one that is still present in
/// the map has been removed. Orphaned queue keys are discarded on the way.
///
/// Returns the evicted key, if any.
pub fn evict_front<V>(
    map: &mut HashMap<String, CacheEntry<V>>,
    order: &mut VecDeque<String>,
) -> Option<String> {
    while let Some(key) = order.pop_front() {
        if map.remove(&key).is_some() {
            return Some(key);
        }
    }
    None
}
