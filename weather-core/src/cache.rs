//! Short-lived in-memory response cache.
//!
//! Entries expire by elapsed time only. Time comes from a [`Clock`] so tests
//! can advance it by hand.

use parking_lot::Mutex;
use std::{
    collections::HashMap,
    fmt::Debug,
    hash::Hash,
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{model::Endpoint, units::UnitSystem};

pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { now: Mutex::new(Instant::now()) }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

/// Full request identity. Location text is normalized so `London` and
/// ` london ` share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub endpoint: Endpoint,
    pub location: String,
    pub units: UnitSystem,
}

impl CacheKey {
    pub fn new(endpoint: Endpoint, location: &str, units: UnitSystem) -> Self {
        Self { endpoint, location: location.trim().to_lowercase(), units }
    }
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { ttl, clock, entries: Mutex::new(HashMap::new()) }
    }

    /// Fresh value for `key`, if any. Expired entries are dropped on the way.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get(key) {
            if now.duration_since(entry.stored_at) < self.ttl {
                return Some(entry.value.clone());
            }
            entries.remove(key);
        }
        None
    }

    /// Store `value`, dropping every entry that has already expired.
    pub fn insert(&self, key: K, value: V) {
        let now = self.clock.now();
        let ttl = self.ttl;
        let mut entries = self.entries.lock();
        entries.retain(|_, e| now.duration_since(e.stored_at) < ttl);
        entries.insert(key, Entry { value, stored_at: now });
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
