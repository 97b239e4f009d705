use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct SummaryMetrics {
    documents_summarized: AtomicU64,
    chunks_summarized: AtomicU64,
    second_passes: AtomicU64,
    failures: AtomicU64,
}

impl SummaryMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed document, the number of chunks it produced, and whether a second
    /// reduction pass was needed.
    pub fn record_summary(&self, chunk_count: u64, second_pass: bool) {
        self.documents_summarized.fetch_add(1, Ordering::Relaxed);
        self.chunks_summarized
            .fetch_add(chunk_count, Ordering::Relaxed);
        if second_pass {
            self.second_passes.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a request that ended in a typed failure.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_summarized: self.documents_summarized.load(Ordering::Relaxed),
            chunks_summarized: self.chunks_summarized.load(Ordering::Relaxed),
            second_passes: self.second_passes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of summarization counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents summarized since startup.
    pub documents_summarized: u64,
    /// Total chunk count produced across all summarized documents.
    pub chunks_summarized: u64,
    /// Number of documents whose combined summary needed a second pass.
    pub second_passes: u64,
    /// Number of requests that failed.
    pub failures: u64,
}
