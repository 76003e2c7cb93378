//! Freshness of derived player attributes.
//!
//! The only staleness signal a player record carries is its `generated_at`
//! recency marker. The analysis process recomputes a record when the marker
//! says it is stale; the invalidator forces that by rewinding the marker.

use chrono::{DateTime, Duration, Utc};

use crate::config::CacheConfig;

/// Recency marker of one record's derived attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    generated_at: DateTime<Utc>,
}

impl Freshness {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self { generated_at }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Returns true if the attributes were generated at or before `now - threshold`
    pub fn is_stale(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        match now.checked_sub_signed(threshold) {
            Some(cutoff) => self.generated_at <= cutoff,
            None => false,
        }
    }

    /// Returns true if the record was ever analyzed, i.e. its marker is past the sentinel
    pub fn is_analyzed(&self, sentinel: DateTime<Utc>) -> bool {
        self.generated_at > sentinel
    }

    /// Time elapsed since generation, zero if the marker is in the future
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        if now > self.generated_at {
            now - self.generated_at
        } else {
            Duration::zero()
        }
    }
}

/// Threshold and sentinel that together decide whether a record must be recomputed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessPolicy {
    pub threshold: Duration,
    pub sentinel: DateTime<Utc>,
}

impl StalenessPolicy {
    pub fn new(threshold: Duration, sentinel: DateTime<Utc>) -> Self {
        Self {
            threshold,
            sentinel,
        }
    }

    /// A record is stale when it was never analyzed or is older than the threshold
    pub fn is_stale(&self, freshness: &Freshness, now: DateTime<Utc>) -> bool {
        !freshness.is_analyzed(self.sentinel) || freshness.is_stale(now, self.threshold)
    }
}

impl From<&CacheConfig> for StalenessPolicy {
    fn from(config: &CacheConfig) -> Self {
        let threshold = i64::try_from(config.stale_after_hours)
            .ok()
            .and_then(Duration::try_hours)
            .unwrap_or(Duration::MAX);
        Self::new(threshold, config.sentinel_epoch)
    }
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}
