//! Keyed query cache with a freshness window.
//!
//! Contract:
//! - concurrent fetches of the same key collapse into one request
//! - a fresh entry is served without fetching
//! - a successful refetch replaces a stale entry
//! - a disabled query never fetches and reports `Idle`
//! - a failed fetch leaves the previous entry in place and surfaces the error
//! - entries unused for the gc window (never shorter than the freshness
//!   window) are swept when a new key is inserted

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<V> {
    /// The query's precondition is not met yet
    Idle,
    Ready(Arc<V>),
}

impl<V> QueryState<V> {
    pub fn data(&self) -> Option<&V> {
        match self {
            QueryState::Idle => None,
            QueryState::Ready(value) => Some(value),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, QueryState::Idle)
    }
}

#[derive(Debug)]
struct Entry<V> {
    value: Arc<V>,
    fetched_at: Instant,
}

type Slot<V> = Arc<tokio::sync::Mutex<Option<Entry<V>>>>;

pub const DEFAULT_GC_AFTER: Duration = Duration::from_secs(10 * 60);

#[derive(Debug)]
pub struct QueryCache<K, V> {
    name: &'static str,
    stale_after: Duration,
    gc_after: Duration,
    slots: Mutex<HashMap<K, Slot<V>>>,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn new(name: &'static str, stale_after: Duration) -> Self {
        Self {
            name,
            stale_after,
            gc_after: DEFAULT_GC_AFTER,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_gc_after(mut self, gc_after: Duration) -> Self {
        self.gc_after = gc_after;
        self
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Serve `key` from cache or run `fetch`.
    ///
    /// Callers racing on one key wait for the first caller's fetch and then
    /// see its result as a fresh entry.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: K,
        enabled: bool,
        fetch: F,
    ) -> Result<QueryState<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if !enabled {
            tracing::debug!("{} query {:?} disabled", self.name, key);
            return Ok(QueryState::Idle);
        }

        let slot = self.slot(&key);
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if cached.fetched_at.elapsed() < self.stale_after {
                tracing::debug!("{} cache hit for {:?}", self.name, key);
                return Ok(QueryState::Ready(Arc::clone(&cached.value)));
            }
            tracing::debug!("{} entry for {:?} is stale, refetching", self.name, key);
        }

        let value = Arc::new(fetch().await?);
        *entry = Some(Entry {
            value: Arc::clone(&value),
            fetched_at: Instant::now(),
        });
        Ok(QueryState::Ready(value))
    }

    /// Cached value for `key` if present and fresh. Does not wait on an
    /// in-flight fetch.
    pub fn peek_fresh(&self, key: &K) -> Option<Arc<V>> {
        let slot = self.slots.lock().get(key).cloned()?;
        let entry = slot.try_lock().ok()?;
        entry
            .as_ref()
            .filter(|e| e.fetched_at.elapsed() < self.stale_after)
            .map(|e| Arc::clone(&e.value))
    }

    /// Drop the entry so the next read fetches.
    pub fn invalidate(&self, key: &K) {
        self.slots.lock().remove(key);
    }

    pub fn clear(&self) {
        self.slots.lock().clear();
    }

    fn slot(&self, key: &K) -> Slot<V> {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get(key) {
            return Arc::clone(slot);
        }
        self.sweep(&mut slots);
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    /// Drop slots nobody holds whose entry is missing or older than the gc
    /// window. Runs under the map lock, so an unshared slot cannot be
    /// picked up concurrently.
    fn sweep(&self, slots: &mut HashMap<K, Slot<V>>) {
        let retain_for = self.gc_after.max(self.stale_after);
        let before = slots.len();
        slots.retain(|_, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(entry) => entry
                    .as_ref()
                    .is_some_and(|e| e.fetched_at.elapsed() < retain_for),
                Err(_) => true,
            }
        });
        let swept = before - slots.len();
        if swept > 0 {
            tracing::debug!("{} cache swept {} unused entries", self.name, swept);
        }
    }
}
