//! Keyed cache with request coalescing.
//!
//! Each key is in one of three states: absent, pending (one provider call in
//! flight, any number of waiters attached), or ready (value stored). The
//! check-and-insert that moves a key from absent to pending happens under the
//! state lock, so at most one provider call per key is ever in flight.
//!
//! Provider calls run on spawned tasks. A caller that stops awaiting does not
//! cancel the call; the task still resolves the other waiters and fills the
//! cache. Failures are handed to every waiter and never stored.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::application::ports::ProviderError;

type SharedFetch<V> = Shared<BoxFuture<'static, Result<Arc<V>, ProviderError>>>;

/// Eviction settings for one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    /// Entry lifetime. `None` keeps entries until evicted by capacity or
    /// invalidation, which can serve stale data in long-lived processes.
    pub ttl: Option<Duration>,
    /// Maximum ready entries. The oldest-inserted entry is evicted first.
    pub max_entries: Option<usize>,
}

/// How a lookup was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Served from a ready entry.
    Hit,
    /// Started a provider call.
    Miss,
    /// Attached to a provider call already in flight.
    Coalesced,
}

impl Lookup {
    /// Metric label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Coalesced => "coalesced",
        }
    }
}

struct Entry<V> {
    value: Arc<V>,
    inserted_at: Instant,
}

struct State<V> {
    ready: HashMap<String, Entry<V>>,
    in_flight: HashMap<String, SharedFetch<V>>,
}

impl<V> State<V> {
    fn fresh(&mut self, key: &str, ttl: Option<Duration>) -> Option<Arc<V>> {
        let entry = self.ready.get(key)?;
        if ttl.is_some_and(|ttl| entry.inserted_at.elapsed() >= ttl) {
            self.ready.remove(key);
            return None;
        }
        Some(Arc::clone(&entry.value))
    }

    fn store(&mut self, key: String, value: Arc<V>, max_entries: Option<usize>) {
        if let Some(max) = max_entries {
            while self.ready.len() >= max.max(1) && !self.ready.contains_key(&key) {
                let Some(oldest) = self
                    .ready
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted_at)
                    .map(|(key, _)| key.clone())
                else {
                    break;
                };
                tracing::debug!(key = %oldest, "Evicting oldest cache entry");
                self.ready.remove(&oldest);
            }
        }
        self.ready.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }
}

/// Cache plus in-flight map for one kind of value.
pub struct CoalescingCache<V> {
    state: Arc<Mutex<State<V>>>,
    policy: CachePolicy,
}

impl<V> std::fmt::Debug for CoalescingCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CoalescingCache")
            .field("ready", &state.ready.len())
            .field("in_flight", &state.in_flight.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl<V: Send + Sync + 'static> CoalescingCache<V> {
    /// Create an empty cache.
    #[must_use]
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                ready: HashMap::new(),
                in_flight: HashMap::new(),
            })),
            policy,
        }
    }

    /// Return the cached value for `key`, join the in-flight call for it, or
    /// start `fetch` and cache its success.
    ///
    /// `fetch` is only invoked on a miss.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        fetch: F,
    ) -> (Result<Arc<V>, ProviderError>, Lookup)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ProviderError>> + Send + 'static,
    {
        let (pending, lookup) = {
            let mut state = self.state.lock();
            if let Some(value) = state.fresh(key, self.policy.ttl) {
                return (Ok(value), Lookup::Hit);
            }
            if let Some(pending) = state.in_flight.get(key) {
                (pending.clone(), Lookup::Coalesced)
            } else {
                let pending = self.spawn_fetch(key, fetch());
                state.in_flight.insert(key.to_string(), pending.clone());
                (pending, Lookup::Miss)
            }
        };

        (pending.await, lookup)
    }

    /// Spawn the provider call. Must be called with the state lock held so
    /// the task cannot resolve before its in-flight entry exists.
    fn spawn_fetch<Fut>(&self, key: &str, fetch: Fut) -> SharedFetch<V>
    where
        Fut: Future<Output = Result<V, ProviderError>> + Send + 'static,
    {
        let task_state = Arc::clone(&self.state);
        let task_key = key.to_string();
        let max_entries = self.policy.max_entries;

        let handle = tokio::spawn(async move {
            let result = fetch.await.map(Arc::new);
            let mut state = task_state.lock();
            state.in_flight.remove(&task_key);
            if let Ok(value) = &result {
                state.store(task_key, Arc::clone(value), max_entries);
            }
            result
        });

        let join_state = Arc::clone(&self.state);
        let join_key = key.to_string();
        async move {
            match handle.await {
                Ok(result) => result,
                Err(join_error) => {
                    // The task never reached its own cleanup
                    join_state.lock().in_flight.remove(&join_key);
                    Err(ProviderError::TaskFailed {
                        message: join_error.to_string(),
                    })
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Drop a ready entry. In-flight calls are unaffected.
    pub fn invalidate(&self, key: &str) -> bool {
        self.state.lock().ready.remove(key).is_some()
    }

    /// Drop every ready entry.
    pub fn clear(&self) {
        self.state.lock().ready.clear();
    }

    /// Number of ready entries (expired ones included until next lookup).
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().ready.len()
    }

    /// Whether no entries are ready.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of provider calls in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counted(
        calls: &Arc<AtomicUsize>,
        result: Result<u32, ProviderError>,
    ) -> impl Future<Output = Result<u32, ProviderError>> + Send + 'static {
        let calls = Arc::clone(calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            result
        }
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_call() {
        let cache = Arc::new(CoalescingCache::<u32>::new(CachePolicy::default()));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_fetch("quote:SPY", || counted(&calls, Ok(42)))
                        .await
                })
            })
            .collect();

        let mut lookups = Vec::new();
        for task in tasks {
            let (result, lookup) = task.await.unwrap();
            assert_eq!(*result.unwrap(), 42);
            lookups.push(lookup);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(lookups.iter().filter(|l| **l == Lookup::Miss).count(), 1);
        assert_eq!(cache.in_flight(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn ready_value_is_a_hit() {
        let cache = CoalescingCache::<u32>::new(CachePolicy::default());
        let calls = Arc::new(AtomicUsize::new(0));

        cache.get_or_fetch("k", || counted(&calls, Ok(1))).await.0.unwrap();
        let (value, lookup) = cache.get_or_fetch("k", || counted(&calls, Ok(2))).await;

        assert_eq!(*value.unwrap(), 1);
        assert_eq!(lookup, Lookup::Hit);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_shared_and_not_cached() {
        let cache = Arc::new(CoalescingCache::<u32>::new(CachePolicy::default()));
        let calls = Arc::new(AtomicUsize::new(0));
        let err = ProviderError::Transport {
            message: "reset".into(),
        };

        let (a, b) = tokio::join!(
            cache.get_or_fetch("k", || counted(&calls, Err(err.clone()))),
            cache.get_or_fetch("k", || counted(&calls, Err(err.clone()))),
        );
        assert_eq!(a.0.unwrap_err(), err);
        assert_eq!(b.0.unwrap_err(), err);
        assert_eq!(b.1, Lookup::Coalesced);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_empty());

        let (retry, lookup) = cache.get_or_fetch("k", || counted(&calls, Ok(7))).await;
        assert_eq!(*retry.unwrap(), 7);
        assert_eq!(lookup, Lookup::Miss);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dropped_caller_still_fills_cache() {
        let cache = CoalescingCache::<u32>::new(CachePolicy::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let abandoned = tokio::time::timeout(
            Duration::from_millis(1),
            cache.get_or_fetch("k", || counted(&calls, Ok(5))),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(50)).await;
        let (value, lookup) = cache.get_or_fetch("k", || counted(&calls, Ok(6))).await;
        assert_eq!(*value.unwrap(), 5);
        assert_eq!(lookup, Lookup::Hit);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panicking_fetch_becomes_task_failed() {
        let cache = CoalescingCache::<u32>::new(CachePolicy::default());

        async fn exploding() -> Result<u32, ProviderError> {
            panic!("provider exploded")
        }

        let (result, _) = cache.get_or_fetch("k", exploding).await;
        assert!(matches!(result, Err(ProviderError::TaskFailed { .. })));
        assert_eq!(cache.in_flight(), 0);

        let (result, lookup) = cache
            .get_or_fetch("k", || async { Ok::<u32, ProviderError>(3) })
            .await;
        assert_eq!(*result.unwrap(), 3);
        assert_eq!(lookup, Lookup::Miss);
    }

    #[tokio::test(start_paused = true)]
    async fn ttl_expires_entries() {
        let cache = CoalescingCache::<u32>::new(CachePolicy {
            ttl: Some(Duration::from_secs(30)),
            max_entries: None,
        });
        let calls = Arc::new(AtomicUsize::new(0));

        cache.get_or_fetch("k", || counted(&calls, Ok(1))).await.0.unwrap();
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(cache.get_or_fetch("k", || counted(&calls, Ok(2))).await.1, Lookup::Hit);

        tokio::time::advance(Duration::from_secs(30)).await;
        let (value, lookup) = cache.get_or_fetch("k", || counted(&calls, Ok(2))).await;
        assert_eq!(*value.unwrap(), 2);
        assert_eq!(lookup, Lookup::Miss);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn capacity_evicts_oldest() {
        let cache = CoalescingCache::<u32>::new(CachePolicy {
            ttl: None,
            max_entries: Some(2),
        });
        let calls = Arc::new(AtomicUsize::new(0));

        for (i, key) in ["a", "b", "c"].into_iter().enumerate() {
            let value = u32::try_from(i).unwrap();
            cache.get_or_fetch(key, || counted(&calls, Ok(value))).await.0.unwrap();
            tokio::time::advance(Duration::from_secs(1)).await;
        }

        assert_eq!(cache.len(), 2);
        assert!(!cache.invalidate("a"));
        assert!(cache.invalidate("b"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
