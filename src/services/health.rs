//! Mirror instance health tracking.
//!
//! Equivalent upstream instances serve the same identities; a mirror
//! that keeps failing is dropped from the pool for the rest of the
//! process so later identities in the run skip it. Failure counts are
//! monotonic and never persisted — the next invocation trusts every
//! configured mirror again.

use std::sync::{Mutex, MutexGuard};

/// A mirror instance with its running failure count.
#[derive(Debug, Clone)]
struct MirrorHealth {
    base_url: String,
    failure_count: u32,
}

/// Shared pool of active mirror instances in priority order.
///
/// Fetches for distinct identities run concurrently and share one
/// pool, so state lives behind a mutex.
#[derive(Debug)]
pub struct MirrorPool {
    instances: Mutex<Vec<MirrorHealth>>,
    fail_threshold: u32,
}

impl MirrorPool {
    /// Build a pool from the configured instance list.
    pub fn new(instances: &[String], fail_threshold: u32) -> Self {
        let instances = instances
            .iter()
            .map(|base_url| MirrorHealth {
                base_url: base_url.trim_end_matches('/').to_string(),
                failure_count: 0,
            })
            .collect();
        Self {
            instances: Mutex::new(instances),
            fail_threshold: fail_threshold.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MirrorHealth>> {
        self.instances.lock().expect("mirror pool mutex poisoned")
    }

    /// Snapshot of the active instance URLs in priority order.
    pub fn active(&self) -> Vec<String> {
        self.lock().iter().map(|m| m.base_url.clone()).collect()
    }

    /// Record one failure for an instance, removing it once the
    /// threshold is reached.
    pub fn record_failure(&self, base_url: &str) {
        let mut instances = self.lock();
        let Some(pos) = instances.iter().position(|m| m.base_url == base_url) else {
            return;
        };

        instances[pos].failure_count += 1;
        let count = instances[pos].failure_count;
        if count >= self.fail_threshold {
            instances.remove(pos);
            log::warn!(
                "mirror {} removed from pool after {} failures",
                base_url,
                count
            );
        }
    }

    /// Number of instances still in the pool.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether every instance has been removed.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_pool() -> MirrorPool {
        MirrorPool::new(
            &[
                "https://nitter.net".to_string(),
                "https://nitter.example.org/".to_string(),
            ],
            3,
        )
    }

    #[test]
    fn test_active_preserves_order_and_trims_slashes() {
        let pool = make_pool();
        assert_eq!(
            pool.active(),
            vec!["https://nitter.net", "https://nitter.example.org"]
        );
    }

    #[test]
    fn test_below_threshold_stays_in_pool() {
        let pool = make_pool();
        pool.record_failure("https://nitter.net");
        pool.record_failure("https://nitter.net");
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_threshold_removes_instance() {
        let pool = make_pool();
        for _ in 0..3 {
            pool.record_failure("https://nitter.net");
        }
        assert_eq!(pool.active(), vec!["https://nitter.example.org"]);
    }

    #[test]
    fn test_removal_visible_to_subsequent_callers() {
        let pool = make_pool();
        for _ in 0..3 {
            pool.record_failure("https://nitter.net");
        }
        // A later identity iterating the pool never sees the dead mirror.
        assert!(!pool.active().contains(&"https://nitter.net".to_string()));
    }

    #[test]
    fn test_unknown_instance_ignored() {
        let pool = make_pool();
        pool.record_failure("https://unknown.example.com");
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_pool_can_drain_completely() {
        let pool = make_pool();
        for url in pool.active() {
            for _ in 0..3 {
                pool.record_failure(&url);
            }
        }
        assert!(pool.is_empty());
    }
}
