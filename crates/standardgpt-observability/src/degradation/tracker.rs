//! Record every audit raised by a fallback: kind, component, detail, timestamp.

use std::collections::{BTreeMap, VecDeque};

use chrono::Utc;

use standardgpt_core::models::{AuditKind, AuditRecord};

use crate::tracing_setup::events;

const DEFAULT_RETAINED: usize = 10_000;

/// Bounded log of audit records plus lifetime counts per kind.
#[derive(Debug, Clone)]
pub struct DegradationTracker {
    recent: VecDeque<AuditRecord>,
    counts: BTreeMap<&'static str, u64>,
    max_retained: usize,
}

impl Default for DegradationTracker {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RETAINED)
    }
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_retained: usize) -> Self {
        Self {
            recent: VecDeque::new(),
            counts: BTreeMap::new(),
            max_retained: max_retained.max(1),
        }
    }

    /// Record one audit and emit the matching event.
    pub fn record(&mut self, audit: AuditRecord) {
        match audit.kind {
            AuditKind::ClassificationAmbiguous => events::classification_ambiguous(&audit.detail),
            kind => events::degradation_triggered(&audit.component, kind.as_str(), &audit.detail),
        }
        *self.counts.entry(audit.kind.as_str()).or_default() += 1;
        self.recent.push_back(audit);
        while self.recent.len() > self.max_retained {
            self.recent.pop_front();
        }
    }

    pub fn record_all(&mut self, audits: impl IntoIterator<Item = AuditRecord>) {
        for audit in audits {
            self.record(audit);
        }
    }

    /// Lifetime count for one kind, including records no longer retained.
    pub fn count(&self, kind: AuditKind) -> u64 {
        self.counts.get(kind.as_str()).copied().unwrap_or(0)
    }

    /// Lifetime counts keyed by kind name.
    pub fn counts(&self) -> &BTreeMap<&'static str, u64> {
        &self.counts
    }

    /// Retained records, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &AuditRecord> {
        self.recent.iter()
    }

    /// Retained records of `kind` raised within the last `window_secs`.
    pub fn count_recent(&self, kind: AuditKind, window_secs: i64) -> usize {
        let cutoff = Utc::now() - chrono::Duration::seconds(window_secs);
        self.recent
            .iter()
            .filter(|a| a.kind == kind && a.timestamp > cutoff)
            .count()
    }

    pub fn clear(&mut self) {
        self.recent.clear();
        self.counts.clear();
    }
}
