// Serving statistics: cache hits, network traffic, offline fallbacks.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub requests: u64,
    pub cache_hits: u64,
    pub network_fetches: u64,
    pub network_failures: u64,
    pub stored_responses: u64,
    pub fallbacks_served: u64,
    pub cache_hit_rate: f64,
}

pub struct StatsCollector {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    network_fetches: AtomicU64,
    network_failures: AtomicU64,
    stored_responses: AtomicU64,
    fallbacks_served: AtomicU64,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            network_fetches: AtomicU64::new(0),
            network_failures: AtomicU64::new(0),
            stored_responses: AtomicU64::new(0),
            fallbacks_served: AtomicU64::new(0),
        }
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_network_fetch(&self) {
        self.network_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_network_failure(&self) {
        self.network_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stored(&self) {
        self.stored_responses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let requests = self.requests.load(Ordering::Relaxed);
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let cache_hit_rate = if requests > 0 {
            cache_hits as f64 / requests as f64
        } else {
            0.0
        };

        StatsSnapshot {
            requests,
            cache_hits,
            network_fetches: self.network_fetches.load(Ordering::Relaxed),
            network_failures: self.network_failures.load(Ordering::Relaxed),
            stored_responses: self.stored_responses.load(Ordering::Relaxed),
            fallbacks_served: self.fallbacks_served.load(Ordering::Relaxed),
            cache_hit_rate,
        }
    }
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}
