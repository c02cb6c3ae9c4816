//! Metrics registry for quilldb
//!
//! - Counters only, monotonic
//! - Reset only when the registry is created
//! - Thread-safe via relaxed atomics

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one content service
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    posts_created: AtomicU64,
    posts_updated: AtomicU64,
    posts_deleted: AtomicU64,
    categories_created: AtomicU64,
    categories_deleted: AtomicU64,
    writes_rejected: AtomicU64,
    queries_executed: AtomicU64,
    storage_failures: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_posts_created(&self) {
        self.posts_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_posts_updated(&self) {
        self.posts_updated.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds `count` deleted posts (cascades delete several at once)
    pub fn add_posts_deleted(&self, count: u64) {
        self.posts_deleted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_categories_created(&self) {
        self.categories_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_categories_deleted(&self) {
        self.categories_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_writes_rejected(&self) {
        self.writes_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_storage_failures(&self) {
        self.storage_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            posts_created: self.posts_created.load(Ordering::Relaxed),
            posts_updated: self.posts_updated.load(Ordering::Relaxed),
            posts_deleted: self.posts_deleted.load(Ordering::Relaxed),
            categories_created: self.categories_created.load(Ordering::Relaxed),
            categories_deleted: self.categories_deleted.load(Ordering::Relaxed),
            writes_rejected: self.writes_rejected.load(Ordering::Relaxed),
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            storage_failures: self.storage_failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub posts_created: u64,
    pub posts_updated: u64,
    pub posts_deleted: u64,
    pub categories_created: u64,
    pub categories_deleted: u64,
    pub writes_rejected: u64,
    pub queries_executed: u64,
    pub storage_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        assert_eq!(MetricsRegistry::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_posts_created();
        registry.increment_posts_created();
        registry.add_posts_deleted(3);
        registry.increment_writes_rejected();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.posts_created, 2);
        assert_eq!(snapshot.posts_deleted, 3);
        assert_eq!(snapshot.writes_rejected, 1);
        assert_eq!(snapshot.queries_executed, 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_queries_executed();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().queries_executed, 1000);
    }
}
