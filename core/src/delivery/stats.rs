// Delivery counters — running totals across resolved requests

use super::resolver::{CacheStatus, Delivery, RequestError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryStats {
    /// Every request, successful or not
    pub requests: u64,
    pub hits: u64,
    pub misses: u64,
    /// Requests that ended in a `RequestError`
    pub failures: u64,
    /// Cache entries pushed out by misses
    pub evictions: u64,
}

impl DeliveryStats {
    /// Fold one request outcome into the totals
    pub fn record(&mut self, outcome: &Result<Delivery, RequestError>) {
        self.requests += 1;
        match outcome {
            Ok(delivery) => {
                match delivery.status {
                    CacheStatus::Hit => self.hits += 1,
                    CacheStatus::Miss => self.misses += 1,
                }
                if delivery.evicted.is_some() {
                    self.evictions += 1;
                }
            }
            Err(_) => self.failures += 1,
        }
    }

    /// Hits over served requests (0.0 when nothing was served)
    pub fn hit_ratio(&self) -> f64 {
        let served = self.hits + self.misses;
        if served == 0 {
            return 0.0;
        }
        self.hits as f64 / served as f64
    }
}
