//! Process-local cache slot with an expiration window
//!
//! A single value plus the time it was stored. Entries past the window are
//! reported as stale but still handed out, so callers can use them as a
//! degraded fallback.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Source of the current time in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Age classification of a cached value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Stored less than one expiration window ago
    Fresh,
    /// Expired, usable only as a fallback
    Stale,
}

/// Cache slot contents. `data` is `None` until the first successful store.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub data: Option<T>,
    pub timestamp: i64,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            data: None,
            timestamp: 0,
        }
    }
}

/// Single-slot cache, last writer wins
pub struct TimedCache<T> {
    entry: RwLock<CacheEntry<T>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<T: Clone + Send + Sync> TimedCache<T> {
    /// Empty cache on the wall clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Empty cache on a custom clock
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entry: RwLock::new(CacheEntry::default()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached value and its freshness, if anything has been stored
    pub async fn get(&self) -> Option<(T, Freshness)> {
        let entry = self.entry.read().await;
        let data = entry.data.as_ref()?;

        let age = self.clock.now_millis() - entry.timestamp;
        let freshness = if age < self.ttl.as_millis() as i64 {
            Freshness::Fresh
        } else {
            Freshness::Stale
        };

        Some((data.clone(), freshness))
    }

    /// Cached value only if it is still fresh
    pub async fn get_fresh(&self) -> Option<T> {
        match self.get().await {
            Some((value, Freshness::Fresh)) => Some(value),
            _ => None,
        }
    }

    /// Replace the slot and stamp it with the current time
    pub async fn set(&self, value: T) {
        let mut entry = self.entry.write().await;
        *entry = CacheEntry {
            data: Some(value),
            timestamp: self.clock.now_millis(),
        };
    }

    /// Time of the last store, if any
    pub async fn timestamp(&self) -> Option<i64> {
        let entry = self.entry.read().await;
        entry.data.as_ref().map(|_| entry.timestamp)
    }

    /// Copy of the raw slot
    pub async fn snapshot(&self) -> CacheEntry<T> {
        self.entry.read().await.clone()
    }
}
