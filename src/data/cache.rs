use std::collections::HashMap;
use std::time::Duration;

use crate::utils::app_time::{AppInstant, now};

/// Last close seen per `EXCHANGE:SYMBOL`.
///
/// An explicit object owned by the caller and handed to the fetch layer.
/// Entries older than `ttl` are treated as missing; when `capacity` is
/// reached the oldest entry is evicted before inserting.
#[derive(Debug, Clone)]
pub struct LastPriceCache {
    ttl: Duration,
    capacity: usize,
    entries: HashMap<String, CachedPrice>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedPrice {
    pub price: f64,
    pub stored_at: AppInstant,
}

impl LastPriceCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.get_at(key, now())
    }

    pub fn get_at(&self, key: &str, at: AppInstant) -> Option<f64> {
        let hit = self.entries.get(key)?;
        (at.duration_since(hit.stored_at) <= self.ttl).then_some(hit.price)
    }

    pub fn insert(&mut self, key: impl Into<String>, price: f64) {
        self.insert_at(key, price, now());
    }

    pub fn insert_at(&mut self, key: impl Into<String>, price: f64, at: AppInstant) {
        let key = key.into();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_expired(at);
            if self.entries.len() >= self.capacity {
                self.evict_oldest();
            }
        }
        self.entries.insert(
            key,
            CachedPrice {
                price,
                stored_at: at,
            },
        );
    }

    pub fn invalidate(&mut self, key: &str) -> Option<f64> {
        self.entries.remove(key).map(|c| c.price)
    }

    /// Drops every entry past its TTL; returns how many went.
    pub fn evict_expired(&mut self, at: AppInstant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, c| at.duration_since(c.stored_at) <= ttl);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn evict_oldest(&mut self) {
        if let Some(oldest) = self
            .entries
            .iter()
            .min_by_key(|(_, c)| c.stored_at)
            .map(|(k, _)| k.clone())
        {
            self.entries.remove(&oldest);
        }
    }
}
