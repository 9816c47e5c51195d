use crate::{
    error::Result,
    functions::SMA,
    types::MaValue,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Moving-average series keyed by period, for a single price series.
///
/// Values are produced by [`SMA::calculate`], so a cached series is
/// bit-identical to a fresh computation. Every period longer than the
/// series yields the same all-`Pending` line, so those periods share one
/// entry.
pub struct MovingAverageCache {
    data: Mutex<HashMap<usize, Arc<Vec<MaValue>>>>,
    capacity: usize,
}

impl MovingAverageCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, period: usize) -> Option<Arc<Vec<MaValue>>> {
        self.lock().get(&period).cloned()
    }

    pub fn set(&self, period: usize, value: Arc<Vec<MaValue>>) {
        let mut data = self.lock();
        if data.len() >= self.capacity {
            // A simple eviction strategy: clear the cache when full.
            data.clear();
        }
        data.insert(period, value);
    }

    /// Fetch the series for `period`, computing it on a miss.
    ///
    /// The lock is not held while computing; two workers racing on the
    /// same period both compute and the later insert wins, which is
    /// harmless because the values are identical.
    pub fn get_or_compute(&self, prices: &[f64], period: usize) -> Result<Arc<Vec<MaValue>>> {
        let sma = SMA::new(period)?;
        let key = period.min(prices.len().saturating_add(1));
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        let series = Arc::new(sma.calculate(prices));
        self.set(key, Arc::clone(&series));
        Ok(series)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<usize, Arc<Vec<MaValue>>>> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
