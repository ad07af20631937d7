//! Completion cache with at-most-one computation in flight per key.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::debug;

use standardgpt_core::errors::CompletionError;
use standardgpt_core::prompts::OperationKind;

use crate::key::{cache_key, short_key};
use crate::stats::{CacheStats, EntrySummary};
use crate::ttl_table::TtlTable;

type Flight = Arc<OnceCell<Result<String, CompletionError>>>;

/// Unregisters a flight when its last waiter leaves, whether the
/// computation finished or the waiting future was dropped.
struct FlightGuard<'a> {
    in_flight: &'a DashMap<String, Flight>,
    key: &'a str,
    flight: Flight,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        // Held by the map and by this guard only: nobody else is waiting.
        self.in_flight.remove_if(self.key, |_, current| {
            Arc::ptr_eq(current, &self.flight) && Arc::strong_count(current) <= 2
        });
    }
}

/// Process-wide completion cache. Construct once and share behind an `Arc`.
pub struct CompletionCache {
    table: Mutex<TtlTable<String>>,
    in_flight: DashMap<String, Flight>,
    coalesced: AtomicU64,
}

impl CompletionCache {
    pub fn new(max_entries: usize, purge_interval: Duration) -> Self {
        Self {
            table: Mutex::new(TtlTable::new(max_entries, purge_interval)),
            in_flight: DashMap::new(),
            coalesced: AtomicU64::new(0),
        }
    }

    fn table(&self) -> MutexGuard<'_, TtlTable<String>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the cached value for `(kind, payload)` or run `compute` once.
    ///
    /// Concurrent callers for the same key share one computation and its
    /// result, success or failure. Failures are not cached.
    pub async fn get_or_compute<F, Fut>(
        &self,
        kind: OperationKind,
        payload: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<String, CompletionError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, CompletionError>>,
    {
        let key = cache_key(kind.as_str(), payload);

        let cached = self.table().lookup(&key, Instant::now());
        if let Some(value) = cached {
            debug!(kind = kind.as_str(), key = short_key(&key), "completion cache hit");
            return Ok(value);
        }

        let flight: Flight = match self.in_flight.entry(key.clone()) {
            Entry::Occupied(e) if !e.get().initialized() => {
                self.coalesced.fetch_add(1, Ordering::Relaxed);
                e.get().clone()
            }
            // A settled flight nobody cleaned up; its result is stale.
            Entry::Occupied(mut e) => {
                let fresh = Arc::new(OnceCell::new());
                e.insert(Arc::clone(&fresh));
                fresh
            }
            Entry::Vacant(e) => e.insert(Arc::new(OnceCell::new())).clone(),
        };
        let guard = FlightGuard {
            in_flight: &self.in_flight,
            key: &key,
            flight,
        };

        let result = guard
            .flight
            .get_or_init(|| async {
                // Another flight may have finished between the lookup and now.
                let settled = self.table().peek(&key, Instant::now());
                if let Some(value) = settled {
                    return Ok(value);
                }
                debug!(kind = kind.as_str(), key = short_key(&key), "completion cache miss");
                let result = compute().await;
                if let Ok(value) = &result {
                    let evicted =
                        self.table()
                            .insert(key.clone(), value.clone(), ttl, Instant::now());
                    if evicted > 0 {
                        debug!(evicted, "completion cache over capacity");
                    }
                }
                result
            })
            .await
            .clone();
        result
    }

    /// Keys with a computation currently registered.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Hit count of the entry for `(kind, payload)`, if cached.
    pub fn hit_count(&self, kind: OperationKind, payload: &str) -> Option<u64> {
        self.table().hit_count(&cache_key(kind.as_str(), payload))
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.table().stats();
        stats.coalesced = self.coalesced.load(Ordering::Relaxed);
        stats
    }

    pub fn purge_expired(&self) -> usize {
        self.table().purge_expired(Instant::now())
    }

    /// Drop all entries and reset counters. In-flight computations still finish.
    pub fn clear(&self) {
        self.table().clear();
        self.coalesced.store(0, Ordering::Relaxed);
    }

    pub fn clear_older_than(&self, age: Duration) -> usize {
        self.table().clear_older_than(age, Instant::now())
    }

    pub fn top_entries(&self, n: usize) -> Vec<EntrySummary> {
        self.table().top_entries(n, Instant::now())
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }
}
