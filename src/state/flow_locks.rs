//! Keyed mutual exclusion for deployment flows
//!
//! The stage/classify/build/launch sequence is not atomic: two concurrent
//! flows for the same name (or the same port) can interleave destructively,
//! one's `stage` wiping a workspace the other just classified. Each flow
//! therefore holds the lock for its deployment name for the whole flow, and
//! the lock for its target port across release-port + launch.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// A map of async mutexes, one per key, created on first use.
///
/// Entries are never removed; the map is bounded by the number of distinct
/// deployment names / ports seen over the process lifetime.
#[derive(Debug, Default)]
pub struct KeyedLocks<K> {
    inner: RwLock<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Acquire the lock for `key`, waiting if another flow holds it.
    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.write().await;
            map.entry(key).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
        };
        lock.lock_owned().await
    }
}
