//! Bounded key/value store whose entries expire a fixed interval after insertion.

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Source of the current time for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut guard = self.now.write();
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Longest ttl a store accepts (100 years).
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TtlStoreError {
    #[error("ttl must be greater than zero")]
    ZeroTtl,
    #[error("ttl {0:?} exceeds the maximum of {max:?}", max = MAX_TTL)]
    TtlOutOfRange(Duration),
    #[error("capacity must be greater than zero")]
    ZeroCapacity,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

impl<V> Entry<V> {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug)]
pub struct TtlStore<K, V, C = SystemClock> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    ttl: TimeDelta,
    capacity: usize,
    clock: C,
}

impl<K, V, C> TtlStore<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    pub fn new(ttl: Duration, capacity: usize, clock: C) -> Result<Self, TtlStoreError> {
        if ttl.is_zero() {
            return Err(TtlStoreError::ZeroTtl);
        }
        if capacity == 0 {
            return Err(TtlStoreError::ZeroCapacity);
        }
        if ttl > MAX_TTL {
            return Err(TtlStoreError::TtlOutOfRange(ttl));
        }
        let ttl = TimeDelta::from_std(ttl).map_err(|_| TtlStoreError::TtlOutOfRange(ttl))?;
        Ok(Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            capacity,
            clock,
        })
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Inserts or replaces `key`, restarting its ttl.
    ///
    /// Expired entries are dropped first. If the store is still full, the entry
    /// closest to expiry is evicted and its key returned.
    pub fn put(&self, key: K, value: V) -> Option<K> {
        self.put_with(key, |_, _| value).1
    }

    /// Like [`TtlStore::put`], but builds the value from the insertion time
    /// and the expiry assigned to the entry. Returns a clone of the stored
    /// value and the evicted key, if any.
    pub fn put_with<F>(&self, key: K, build: F) -> (V, Option<K>)
    where
        F: FnOnce(DateTime<Utc>, DateTime<Utc>) -> V,
    {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        entries.retain(|_, entry| entry.is_live(now));

        let mut evicted = None;
        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
                debug!(capacity = self.capacity, "ttl store full, evicted oldest entry");
                evicted = Some(oldest);
            }
        }

        let expires_at = now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let value = build(now, expires_at);
        entries.insert(
            key,
            Entry {
                value: value.clone(),
                expires_at,
            },
        );
        (value, evicted)
    }

    /// Returns a clone of the live value for `key`. Expired entries are removed.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let now = self.clock.now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if entry.is_live(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        None
    }

    pub fn expires_at<Q>(&self, key: &Q) -> Option<DateTime<Utc>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let now = self.clock.now();
        self.entries
            .read()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.expires_at)
    }

    /// Removes `key`, returning its value only if it had not yet expired.
    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let now = self.clock.now();
        self.entries
            .write()
            .remove(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value)
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, "purged expired ttl store entries");
        }
        purged
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .read()
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
