use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    pages_fetched: AtomicU64,
    records_fetched: AtomicU64,
    documents_fetched: AtomicU64,
    fetch_failures: AtomicU64,
}

/// Request counters shared by every stage of one query.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub pages_fetched: u64,
    pub records_fetched: u64,
    pub documents_fetched: u64,
    pub fetch_failures: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_pages(&self, count: u64) {
        self.inner.pages_fetched.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_records(&self, count: u64) {
        self.inner
            .records_fetched
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_documents(&self, count: u64) {
        self.inner
            .documents_fetched
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_failures(&self, count: u64) {
        self.inner.fetch_failures.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pages_fetched: self.inner.pages_fetched.load(Ordering::Relaxed),
            records_fetched: self.inner.records_fetched.load(Ordering::Relaxed),
            documents_fetched: self.inner.documents_fetched.load(Ordering::Relaxed),
            fetch_failures: self.inner.fetch_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
