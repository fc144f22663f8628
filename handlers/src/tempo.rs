use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Set of keys that expire after a per-key TTL. Clones share the same keys.
///
/// Expired keys are only removed when looked up, so this suits small key spaces such as
/// per-channel rate limits.
///
/// ```
/// use handlers::Tempo;
/// use std::time::Duration;
///
/// let tempo = Tempo::new();
/// assert!(!tempo.exists(&"try"));
///
/// tempo.set("try", Duration::from_secs(60));
/// assert!(tempo.exists(&"try"));
///
/// let shared = tempo.clone();
/// tempo.set("cloned", Duration::from_secs(60));
/// assert!(shared.exists(&"cloned"));
/// ```
#[derive(Debug)]
pub struct Tempo<K> {
    keys: Arc<Mutex<HashMap<K, Instant>>>,
}

impl<K> Clone for Tempo<K> {
    fn clone(&self) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
        }
    }
}

impl<K: Hash + Eq> Default for Tempo<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq> Tempo<K> {
    pub fn new() -> Self {
        Self {
            keys: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Sets or refreshes `key` for `ttl`.
    pub fn set(&self, key: K, ttl: Duration) {
        self.lock().insert(key, Instant::now() + ttl);
    }

    /// Whether `key` is set and not expired.
    pub fn exists(&self, key: &K) -> bool {
        let mut keys = self.lock();
        Self::live(&mut keys, key)
    }

    /// Sets `key` for `ttl` unless it is already live. Returns `true` if it was set.
    ///
    /// Check and set happen under one lock, so concurrent callers cannot both win.
    pub fn try_set(&self, key: K, ttl: Duration) -> bool {
        let mut keys = self.lock();
        if Self::live(&mut keys, &key) {
            return false;
        }
        keys.insert(key, Instant::now() + ttl);
        true
    }

    fn live(keys: &mut HashMap<K, Instant>, key: &K) -> bool {
        match keys.get(key) {
            Some(expires_at) if *expires_at > Instant::now() => true,
            Some(_) => {
                keys.remove(key);
                false
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Instant>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
