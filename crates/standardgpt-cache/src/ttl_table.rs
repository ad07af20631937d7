//! TTL table shared by both caches.
//!
//! The table itself is not synchronized; owners wrap it in a mutex and keep
//! every critical section O(1) (amortized for the throttled purge sweep).

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tokio::time::Instant;

use crate::key::short_key;
use crate::stats::{CacheStats, EntrySummary};

/// One cached value. Never mutated in place except for its hit counter.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub created_at: Instant,
    pub ttl: Duration,
    pub hit_count: u64,
    seq: u64,
}

impl<V> CacheEntry<V> {
    /// Valid iff `now - created_at < ttl`.
    pub fn is_valid(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < self.ttl
    }
}

/// Key → entry table with TTL expiry, a hard entry cap with oldest-created
/// eviction, and hit/miss/eviction counters.
#[derive(Debug)]
pub struct TtlTable<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Insertion order. Records whose seq no longer matches the live entry are stale.
    order: VecDeque<(u64, String)>,
    next_seq: u64,
    max_entries: usize,
    purge_interval: Duration,
    last_purge: Instant,
    hits: u64,
    misses: u64,
    expired_evictions: u64,
    capacity_evictions: u64,
}

impl<V: Clone> TtlTable<V> {
    pub fn new(max_entries: usize, purge_interval: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            next_seq: 0,
            max_entries: max_entries.max(1),
            purge_interval,
            last_purge: Instant::now(),
            hits: 0,
            misses: 0,
            expired_evictions: 0,
            capacity_evictions: 0,
        }
    }

    /// Counted lookup. An expired entry is removed and reported as a miss.
    pub fn lookup(&mut self, key: &str, now: Instant) -> Option<V> {
        self.maybe_purge(now);
        match self.entries.get_mut(key) {
            Some(entry) if entry.is_valid(now) => {
                entry.hit_count += 1;
                self.hits += 1;
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.expired_evictions += 1;
                self.misses += 1;
                None
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Uncounted read of a valid entry.
    pub fn peek(&self, key: &str, now: Instant) -> Option<V> {
        self.entries
            .get(key)
            .filter(|e| e.is_valid(now))
            .map(|e| e.value.clone())
    }

    /// Insert or overwrite. Returns the number of entries evicted for capacity.
    pub fn insert(&mut self, key: String, value: V, ttl: Duration, now: Instant) -> usize {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.push_back((seq, key.clone()));
        self.entries.insert(
            key,
            CacheEntry {
                value,
                created_at: now,
                ttl,
                hit_count: 0,
                seq,
            },
        );

        let mut evicted = 0;
        while self.entries.len() > self.max_entries {
            let Some((seq, key)) = self.order.pop_front() else {
                break;
            };
            if self.entries.get(&key).is_some_and(|e| e.seq == seq) {
                self.entries.remove(&key);
                self.capacity_evictions += 1;
                evicted += 1;
            }
        }
        evicted
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Sweep every expired entry. Returns how many were removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.is_valid(now));
        let removed = before - self.entries.len();
        self.expired_evictions += removed as u64;
        self.compact_order();
        self.last_purge = now;
        removed
    }

    fn maybe_purge(&mut self, now: Instant) {
        if now.saturating_duration_since(self.last_purge) >= self.purge_interval {
            self.purge_expired(now);
        }
    }

    fn compact_order(&mut self) {
        let entries = &self.entries;
        self.order
            .retain(|(seq, key)| entries.get(key).is_some_and(|e| e.seq == *seq));
    }

    /// Drop every entry and reset counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
        self.expired_evictions = 0;
        self.capacity_evictions = 0;
    }

    /// Remove entries created more than `age` ago. Counters are kept.
    pub fn clear_older_than(&mut self, age: Duration, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.created_at) < age);
        self.compact_order();
        before - self.entries.len()
    }

    /// Valid entries with the highest hit counts, most used first.
    pub fn top_entries(&self, n: usize, now: Instant) -> Vec<EntrySummary> {
        let mut rows: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, e)| e.is_valid(now))
            .map(|(k, e)| EntrySummary {
                key: short_key(k).to_string(),
                hit_count: e.hit_count,
                age_secs: now.saturating_duration_since(e.created_at).as_secs(),
            })
            .collect();
        rows.sort_by(|a, b| b.hit_count.cmp(&a.hit_count).then_with(|| a.key.cmp(&b.key)));
        rows.truncate(n);
        rows
    }

    pub fn hit_count(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|e| e.hit_count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            expired_evictions: self.expired_evictions,
            capacity_evictions: self.capacity_evictions,
            coalesced: 0,
            size: self.entries.len(),
            max_entries: self.max_entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(10);
    const NO_SWEEP: Duration = Duration::from_secs(3600);

    #[tokio::test(start_paused = true)]
    async fn hit_increments_entry_and_counter() {
        let mut table = TtlTable::new(10, NO_SWEEP);
        let now = Instant::now();
        table.insert("k".into(), 1, TTL, now);
        assert_eq!(table.lookup("k", now), Some(1));
        assert_eq!(table.lookup("k", now), Some(1));
        assert_eq!(table.hit_count("k"), Some(2));
        assert_eq!(table.stats().hits, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_is_a_miss_and_removed() {
        let mut table = TtlTable::new(10, NO_SWEEP);
        let now = Instant::now();
        table.insert("k".into(), 1, TTL, now);
        assert_eq!(table.lookup("k", now + TTL), None);
        let stats = table.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expired_evictions, 1);
        assert_eq!(stats.size, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cap_evicts_oldest_created() {
        let mut table = TtlTable::new(2, NO_SWEEP);
        let now = Instant::now();
        table.insert("a".into(), 1, TTL, now);
        table.insert("b".into(), 2, TTL, now);
        assert_eq!(table.insert("c".into(), 3, TTL, now), 1);
        assert_eq!(table.peek("a", now), None);
        assert_eq!(table.peek("b", now), Some(2));
        assert_eq!(table.peek("c", now), Some(3));
        assert_eq!(table.stats().capacity_evictions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn overwrite_refreshes_eviction_position() {
        let mut table = TtlTable::new(2, NO_SWEEP);
        let now = Instant::now();
        table.insert("a".into(), 1, TTL, now);
        table.insert("b".into(), 2, TTL, now);
        table.insert("a".into(), 10, TTL, now);
        table.insert("c".into(), 3, TTL, now);
        assert_eq!(table.peek("a", now), Some(10));
        assert_eq!(table.peek("b", now), None);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_runs_after_purge_interval() {
        let mut table = TtlTable::new(10, Duration::from_secs(5));
        let start = Instant::now();
        table.insert("old".into(), 1, Duration::from_secs(1), start);
        table.insert("new".into(), 2, TTL, start);
        let later = start + Duration::from_secs(6);
        assert_eq!(table.lookup("new", later), Some(2));
        assert_eq!(table.len(), 1);
        assert_eq!(table.stats().expired_evictions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_older_than_keeps_recent() {
        let mut table = TtlTable::new(10, NO_SWEEP);
        let start = Instant::now();
        table.insert("old".into(), 1, TTL, start);
        let later = start + Duration::from_secs(5);
        table.insert("new".into(), 2, TTL, later);
        assert_eq!(table.clear_older_than(Duration::from_secs(3), later), 1);
        assert_eq!(table.peek("new", later), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn top_entries_orders_by_hits() {
        let mut table = TtlTable::new(10, NO_SWEEP);
        let now = Instant::now();
        table.insert("aaaaaaaaaaaa".into(), 1, TTL, now);
        table.insert("bbbbbbbbbbbb".into(), 2, TTL, now);
        table.lookup("bbbbbbbbbbbb", now);
        let top = table.top_entries(1, now);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].key, "bbbbbbbb");
        assert_eq!(top[0].hit_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_resets_counters() {
        let mut table = TtlTable::new(10, NO_SWEEP);
        let now = Instant::now();
        table.insert("k".into(), 1, TTL, now);
        table.lookup("k", now);
        table.lookup("x", now);
        table.clear();
        assert_eq!(table.stats(), TtlTable::<i32>::new(10, NO_SWEEP).stats());
    }
}
