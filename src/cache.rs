//! Lazy, process-lifetime dataset cache.
//!
//! Each provider adapter owns its own cache instance; entries live until
//! process exit. Only successful fetches are memoized: an upstream failure
//! leaves the key absent so the next call retries. Concurrent misses may
//! fetch redundantly; fetches are idempotent so correctness does not depend
//! on single-flight behavior.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;

pub struct DatasetCache<T> {
    entries: Arc<RwLock<HashMap<String, Arc<Vec<T>>>>>,
}

impl<T> DatasetCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Return the cached dataset for `key`, populating it via `fetch` on the
    /// first successful access. An empty success is cached (the provider
    /// confirmed empty); a failed fetch is not.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<Arc<Vec<T>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        if let Some(items) = self.entries.read().await.get(key) {
            return Ok(Arc::clone(items));
        }

        let items = Arc::new(fetch().await?);
        debug!(key, count = items.len(), "dataset cache populated");

        let mut entries = self.entries.write().await;
        // A concurrent fetch may have landed first; keep the existing entry
        // so all readers of this key see one sequence.
        Ok(Arc::clone(
            entries.entry(key.to_string()).or_insert(items),
        ))
    }

    /// Whether a dataset is already cached for `key`
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

impl<T> Default for DatasetCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for DatasetCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoutError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn second_get_serves_from_cache() {
        let cache = DatasetCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_fetch("all", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![1, 2, 3])
            })
            .await
            .unwrap();
        let second = cache
            .get_or_fetch("all", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![9, 9, 9])
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*first, vec![1, 2, 3]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let cache: DatasetCache<u32> = DatasetCache::new();
        let calls = AtomicUsize::new(0);

        let err = cache
            .get_or_fetch("all", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ScoutError::Upstream("boom".to_string()))
            })
            .await;
        assert!(err.is_err());
        assert!(!cache.contains("all").await);

        let ok = cache
            .get_or_fetch("all", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![7])
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*ok, vec![7]);
    }

    #[tokio::test]
    async fn empty_success_is_cached() {
        let cache: DatasetCache<u32> = DatasetCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let items = cache
                .get_or_fetch("roster-22", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Vec::new())
                })
                .await
                .unwrap();
            assert!(items.is_empty());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let cache = DatasetCache::new();
        cache
            .get_or_fetch("roster-12", || async { Ok(vec!["a"]) })
            .await
            .unwrap();
        assert!(cache.contains("roster-12").await);
        assert!(!cache.contains("roster-13").await);
    }
}
