use crate::core::TradingPair;
use chrono::Utc;
use dashmap::DashMap;
use std::fmt;
use std::time::Duration;

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Cache key of a directional pair: `"<input>_<output>"` in base58
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&TradingPair> for CacheKey {
    fn from(pair: &TradingPair) -> Self {
        CacheKey(format!("{}_{}", pair.input_mint, pair.output_mint))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cached value stamped with its creation time
#[derive(Debug, Clone)]
pub struct TimedEntry<T> {
    pub created_at_ms: i64,
    pub payload: T,
}

impl<T> TimedEntry<T> {
    pub fn new(payload: T) -> Self {
        Self::with_timestamp(payload, now_ms())
    }

    pub fn with_timestamp(payload: T, created_at_ms: i64) -> Self {
        Self {
            created_at_ms,
            payload,
        }
    }

    /// Valid iff `0 <= now - created_at <= ttl`. A creation time in the
    /// future is stale.
    pub fn is_fresh(&self, ttl: Duration, now_ms: i64) -> bool {
        let age = now_ms.saturating_sub(self.created_at_ms);
        (0..=ttl.as_millis() as i64).contains(&age)
    }
}

/// In-memory pair-keyed map whose entries expire on read.
///
/// Stale entries are never swept; they stay until overwritten.
pub struct TtlMap<V> {
    entries: DashMap<CacheKey, TimedEntry<V>>,
    ttl: Duration,
}

impl<V: Clone> TtlMap<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, pair: &TradingPair) -> Option<V> {
        let entry = self.entries.get(&CacheKey::from(pair))?;
        if entry.is_fresh(self.ttl, now_ms()) {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    pub fn put(&self, pair: &TradingPair, value: V) {
        self.put_with_timestamp(pair, value, now_ms());
    }

    /// Store an entry with an explicit creation time (ms since epoch)
    pub fn put_with_timestamp(&self, pair: &TradingPair, value: V, created_at_ms: i64) {
        self.entries.insert(
            CacheKey::from(pair),
            TimedEntry::with_timestamp(value, created_at_ms),
        );
    }

    /// Stored entries, stale ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
