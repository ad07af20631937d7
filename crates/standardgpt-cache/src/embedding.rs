//! Embedding cache: single TTL, bounded size, batched resolution of misses.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use standardgpt_core::errors::{CacheError, EmbeddingError, StandardGptError};
use standardgpt_core::traits::IEmbeddingProvider;

use crate::key::{cache_key, short_key};
use crate::stats::{CacheStats, EntrySummary};
use crate::ttl_table::TtlTable;

const EMBEDDING_KIND: &str = "embedding";

pub struct EmbeddingCache {
    table: Mutex<TtlTable<Vec<f32>>>,
    dimensions: usize,
    ttl: Duration,
}

impl EmbeddingCache {
    pub fn new(dimensions: usize, ttl: Duration, max_entries: usize, purge_interval: Duration) -> Self {
        Self {
            table: Mutex::new(TtlTable::new(max_entries, purge_interval)),
            dimensions,
            ttl,
        }
    }

    fn table(&self) -> MutexGuard<'_, TtlTable<Vec<f32>>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub async fn embed<P: IEmbeddingProvider>(
        &self,
        provider: &P,
        text: &str,
    ) -> Result<Vec<f32>, StandardGptError> {
        let mut vectors = self.embed_batch(provider, &[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| {
            EmbeddingError::CountMismatch {
                expected: 1,
                actual: 0,
            }
            .into()
        })
    }

    /// Resolve each text against the cache, then embed all misses in one
    /// upstream call. Output order always matches `texts`.
    ///
    /// A vector whose length differs from the configured dimensionality is a
    /// [`CacheError::IntegrityViolation`], whether it was cached or fresh.
    pub async fn embed_batch<P: IEmbeddingProvider>(
        &self,
        provider: &P,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, StandardGptError> {
        let keys: Vec<String> = texts.iter().map(|t| cache_key(EMBEDDING_KIND, t)).collect();
        let mut resolved: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());

        {
            let mut table = self.table();
            let now = Instant::now();
            for key in &keys {
                let hit = table.lookup(key, now);
                if let Some(vector) = &hit {
                    if vector.len() != self.dimensions {
                        table.remove(key);
                        return Err(self.integrity_violation(key, vector.len()).into());
                    }
                }
                resolved.push(hit);
            }
        }

        // Distinct missing keys in first-mention order, with every slot they fill.
        let mut pending: Vec<(&String, &String)> = Vec::new();
        let mut slots: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, slot) in resolved.iter().enumerate() {
            if slot.is_none() {
                let positions = slots.entry(keys[i].as_str()).or_default();
                if positions.is_empty() {
                    pending.push((&keys[i], &texts[i]));
                }
                positions.push(i);
            }
        }

        if !pending.is_empty() {
            let batch: Vec<String> = pending.iter().map(|(_, t)| (*t).clone()).collect();
            debug!(
                misses = batch.len(),
                total = texts.len(),
                provider = provider.name(),
                "embedding cache batch miss"
            );
            let vectors = provider.embed_batch(&batch).await?;
            if vectors.len() != batch.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: batch.len(),
                    actual: vectors.len(),
                }
                .into());
            }
            if let Some(((key, _), bad)) = pending
                .iter()
                .zip(&vectors)
                .find(|(_, v)| v.len() != self.dimensions)
            {
                return Err(self.integrity_violation(key, bad.len()).into());
            }

            let mut table = self.table();
            let now = Instant::now();
            for ((key, _), vector) in pending.iter().zip(vectors) {
                if let Some(positions) = slots.get(key.as_str()) {
                    for &i in positions {
                        resolved[i] = Some(vector.clone());
                    }
                }
                table.insert((*key).clone(), vector, self.ttl, now);
            }
        }

        Ok(resolved.into_iter().flatten().collect())
    }

    fn integrity_violation(&self, key: &str, actual: usize) -> CacheError {
        warn!(
            key = short_key(key),
            expected = self.dimensions,
            actual,
            "embedding dimensionality mismatch"
        );
        CacheError::IntegrityViolation {
            key: short_key(key).to_string(),
            expected: self.dimensions,
            actual,
        }
    }

    /// Hit count of the cached vector for `text`, if any.
    pub fn hit_count(&self, text: &str) -> Option<u64> {
        self.table().hit_count(&cache_key(EMBEDDING_KIND, text))
    }

    pub fn stats(&self) -> CacheStats {
        self.table().stats()
    }

    pub fn purge_expired(&self) -> usize {
        self.table().purge_expired(Instant::now())
    }

    pub fn clear(&self) {
        self.table().clear();
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

    /// Seed a vector from an external warm-up source. Stored as given; its
    /// length is checked when it is read back.
    pub fn warm(&self, text: &str, vector: Vec<f32>) {
        let key = cache_key(EMBEDDING_KIND, text);
        self.table().insert(key, vector, self.ttl, Instant::now());
    }
}
