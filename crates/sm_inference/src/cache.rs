use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use sm_core::{ModelLoader, Result, SummaryModel};
use tokio::sync::{Mutex, OnceCell};

type ModelCell = Arc<OnceCell<Arc<dyn SummaryModel>>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub evictions: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    loads: AtomicU64,
    evictions: AtomicU64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, ModelCell>,
    /// Least recently used at the front.
    lru_order: VecDeque<String>,
}

impl CacheState {
    fn touch(&mut self, model_id: &str) {
        self.lru_order.retain(|id| id != model_id);
        self.lru_order.push_back(model_id.to_string());
    }

    fn remove(&mut self, model_id: &str) -> bool {
        self.lru_order.retain(|id| id != model_id);
        self.entries.remove(model_id).is_some()
    }
}

/// Keeps loaded models keyed by pretrained id.
///
/// Each id is loaded at most once while it stays cached, even when several
/// requests ask for it concurrently. When more than `capacity` ids are held
/// the least recently used one is dropped.
pub struct CachedLoader {
    inner: Arc<dyn ModelLoader>,
    capacity: usize,
    state: Mutex<CacheState>,
    counters: Arc<Counters>,
}

impl CachedLoader {
    pub fn new(inner: Arc<dyn ModelLoader>, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            state: Mutex::new(CacheState::default()),
            counters: Arc::new(Counters::default()),
        }
    }

    async fn cell_for(&self, model_id: &str) -> ModelCell {
        let mut state = self.state.lock().await;
        let cell = state
            .entries
            .entry(model_id.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();
        state.touch(model_id);

        while state.entries.len() > self.capacity {
            let Some(oldest) = state.lru_order.pop_front() else {
                break;
            };
            state.entries.remove(&oldest);
            self.counters.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::info!("🧹 Evicted {} from the model cache", oldest);
        }

        if cell.initialized() {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
        }
        cell
    }

    /// Drops a cached model. Returns whether it was present.
    pub async fn evict(&self, model_id: &str) -> bool {
        let removed = self.state.lock().await.remove(model_id);
        if removed {
            self.counters.evictions.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        let count = state.entries.len() as u64;
        state.entries.clear();
        state.lru_order.clear();
        self.counters.evictions.fetch_add(count, Ordering::Relaxed);
    }

    /// Ids currently held, least recently used first.
    pub async fn cached_ids(&self) -> Vec<String> {
        self.state.lock().await.lru_order.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            loads: self.counters.loads.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl ModelLoader for CachedLoader {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn load(&self, model_id: &str) -> Result<Arc<dyn SummaryModel>> {
        let cell = self.cell_for(model_id).await;
        let result = cell
            .get_or_try_init(|| async {
                self.counters.loads.fetch_add(1, Ordering::Relaxed);
                tracing::info!("🧠 Loading {} with the {} backend", model_id, self.inner.name());
                self.inner.load(model_id).await
            })
            .await
            .cloned();

        if result.is_err() {
            // A failed load must not pin a slot; the next request retries.
            let mut state = self.state.lock().await;
            if state
                .entries
                .get(model_id)
                .is_some_and(|current| Arc::ptr_eq(current, &cell))
            {
                state.remove(model_id);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeadModel;
    use sm_core::Error;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct CountingLoader {
        loads: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ModelLoader for CountingLoader {
        fn name(&self) -> &str {
            "counting"
        }

        async fn load(&self, model_id: &str) -> Result<Arc<dyn SummaryModel>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            if self.fail {
                return Err(Error::Model(format!("weights for {} not found", model_id)));
            }
            Ok(Arc::new(LeadModel::new(model_id)))
        }
    }

    #[tokio::test]
    async fn test_loads_each_model_once() {
        let inner = Arc::new(CountingLoader::default());
        let cache = CachedLoader::new(inner.clone(), 2);

        let first = cache.load("google/pegasus-xsum").await.unwrap();
        let second = cache.load("google/pegasus-xsum").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(inner.loads.load(Ordering::SeqCst), 1);

        let stats = cache.stats();
        assert_eq!(stats.loads, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_load() {
        let inner = Arc::new(CountingLoader::default());
        let cache = CachedLoader::new(inner.clone(), 2);

        let (a, b, c) = tokio::join!(
            cache.load("google/pegasus-large"),
            cache.load("google/pegasus-large"),
            cache.load("google/pegasus-large"),
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(inner.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_used() {
        let inner = Arc::new(CountingLoader::default());
        let cache = CachedLoader::new(inner.clone(), 2);

        cache.load("a").await.unwrap();
        cache.load("b").await.unwrap();
        cache.load("a").await.unwrap();
        cache.load("c").await.unwrap();

        assert_eq!(cache.cached_ids().await, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(cache.stats().evictions, 1);

        cache.load("b").await.unwrap();
        assert_eq!(inner.loads.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_evict_and_clear() {
        let inner = Arc::new(CountingLoader::default());
        let cache = CachedLoader::new(inner.clone(), 2);

        cache.load("a").await.unwrap();
        assert!(cache.evict("a").await);
        assert!(!cache.evict("a").await);
        cache.load("a").await.unwrap();
        assert_eq!(inner.loads.load(Ordering::SeqCst), 2);

        cache.load("b").await.unwrap();
        cache.clear().await;
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let inner = Arc::new(CountingLoader {
            fail: true,
            ..CountingLoader::default()
        });
        let cache = CachedLoader::new(inner.clone(), 2);

        assert!(cache.load("missing").await.is_err());
        assert!(cache.load("missing").await.is_err());
        assert_eq!(inner.loads.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().await, 0);
    }
}
