//! In-memory LRU cache implementation.

use super::{Cache, CacheError};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// What: Cache entry with value and expiration timestamp.
///
/// Inputs: None (created internally)
///
/// Output:
/// - `CacheEntry<V>` containing cached value and expiration time
///
/// Details:
/// - Stores the cached value along with when it expires
/// - Used internally by `MemoryCache`
struct CacheEntry<V> {
    /// Cached value.
    value: V,
    /// Expiration timestamp.
    expires_at: Instant,
}

/// What: In-memory LRU cache with TTL expiration.
///
/// Inputs: None (created via `MemoryCache::new()`)
///
/// Output:
/// - `MemoryCache` instance ready for use
///
/// Details:
/// - Uses LRU eviction when cache is full
/// - Supports TTL-based expiration
/// - Thread-safe via `Arc<Mutex<>>`
/// - Generic over value type
#[derive(Debug)]
pub struct MemoryCache {
    /// Internal LRU cache wrapped in mutex for thread safety.
    cache: Arc<Mutex<LruCache<String, CacheEntry<Vec<u8>>>>>,
}

impl MemoryCache {
    /// What: Create a new memory cache with specified capacity.
    ///
    /// Inputs:
    /// - `capacity`: Maximum number of entries in cache
    ///
    /// Output:
    /// - `MemoryCache` instance
    ///
    /// Details:
    /// - Creates LRU cache with specified capacity
    /// - Wraps in `Arc<Mutex<>>` for thread safety
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(
                std::num::NonZeroUsize::new(capacity.max(1))
                    .expect("capacity.max(1) should always be >= 1"),
            ))),
        }
    }

    /// What: Clean up expired entries from cache.
    ///
    /// Inputs: None
    ///
    /// Output: None
    ///
    /// Details:
    /// - Removes all expired entries
    /// - Called automatically during get operations
    /// - May be called manually for cleanup
    fn cleanup_expired(&self) {
        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let now = Instant::now();
        let keys_to_remove: Vec<String> = cache
            .iter()
            .filter(|(_, entry)| entry.expires_at < now)
            .map(|(key, _)| key.clone())
            .collect();

        for key in keys_to_remove {
            cache.pop(&key);
        }
    }
}

impl<K, V> Cache<K, V> for MemoryCache
where
    K: AsRef<str>,
    V: Clone + Serialize + for<'de> Deserialize<'de>,
{
    /// What: Get a value from the cache.
    ///
    /// Inputs:
    /// - `key`: Cache key to look up
    ///
    /// Output:
    /// - `Option<V>` containing cached value if found and not expired, `None` otherwise
    ///
    /// Details:
    /// - Checks if entry exists and is not expired
    /// - Returns `None` if expired or not found
    /// - Automatically cleans up expired entries
    fn get(&self, key: &K) -> Option<V> {
        self.cleanup_expired();

        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let key_str = key.as_ref();
        let entry = cache.get(key_str)?;

        // Check if expired
        if entry.expires_at < Instant::now() {
            cache.pop(key_str);
            return None;
        }

        // Clone the serialized value before dropping the guard
        let value = entry.value.clone();
        drop(cache); // Early drop of guard

        // Deserialize value
        serde_json::from_slice(&value).ok()
    }

    /// What: Store a value in the cache.
    ///
    /// Inputs:
    /// - `key`: Cache key
    /// - `value`: Value to cache
    /// - `ttl`: Time-to-live duration
    ///
    /// Output:
    /// - `Result<(), CacheError>` indicating success or failure
    ///
    /// Details:
    /// - Serializes value to JSON bytes
    /// - Stores with expiration timestamp
    /// - May evict least recently used entry if cache is full
    fn set(&self, key: &K, value: &V, ttl: Duration) -> Result<(), CacheError> {
        let serialized =
            serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))?;

        let expires_at = Instant::now() + ttl;
        let entry = CacheEntry {
            value: serialized,
            expires_at,
        };
        let key_string = key.as_ref().to_string();

        {
            let mut cache = match self.cache.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            cache.put(key_string, entry);
        }
        Ok(())
    }

    /// What: Invalidate a specific cache entry.
    ///
    /// Inputs:
    /// - `key`: Cache key to invalidate
    ///
    /// Output:
    /// - `Result<(), CacheError>` indicating success or failure
    ///
    /// Details:
    /// - Removes the entry from cache
    /// - Safe to call if key doesn't exist
    fn invalidate(&self, key: &K) -> Result<(), CacheError> {
        let key_str = key.as_ref();
        {
            let mut cache = match self.cache.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            cache.pop(key_str);
        }
        Ok(())
    }

    /// What: Clear all entries from the cache.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - `Result<(), CacheError>` indicating success or failure
    ///
    /// Details:
    /// - Removes all entries from cache
    fn clear(&self) -> Result<(), CacheError> {
        {
            let mut cache = match self.cache.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            cache.clear();
        }
        Ok(())
    }
}
