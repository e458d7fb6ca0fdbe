/// Produces the string under which a filter result is cached.
///
/// Two values that select the same records must produce the same key, and
/// two values that may select different records must not.
pub trait CacheableKey {
    fn to_cache_key(&self) -> String;
}

impl CacheableKey for str {
    fn to_cache_key(&self) -> String {
        self.to_string()
    }
}

impl CacheableKey for String {
    fn to_cache_key(&self) -> String {
        self.clone()
    }
}
