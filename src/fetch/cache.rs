// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TTL cache for the most recent carousel listing.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::response::GatewayListing;

/// The most recent listing, when it was fetched, and how long it stays fresh.
///
/// Invalidation only forgets the timestamp: the data stays readable through
/// [`StatusCache::data`] so it can still back a timeout fallback. Every
/// invalidation also bumps a generation counter; a fetch started under an
/// older generation may store its data but never makes it fresh.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use tokio::time::Instant;
/// use tcpbulb_lib::fetch::StatusCache;
/// use tcpbulb_lib::response::GatewayListing;
///
/// let mut cache = StatusCache::new(Duration::from_millis(100));
/// let now = Instant::now();
///
/// cache.store(Arc::new(GatewayListing::default()), now);
/// assert!(cache.is_valid(now + Duration::from_millis(99)));
/// assert!(!cache.is_valid(now + Duration::from_millis(100)));
///
/// cache.invalidate();
/// assert!(!cache.is_valid(now));
/// assert!(cache.data().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct StatusCache {
    timestamp: Option<Instant>,
    data: Option<Arc<GatewayListing>>,
    ttl: Duration,
    generation: u64,
}

impl StatusCache {
    /// Creates an empty cache. A zero `ttl` disables caching.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            timestamp: None,
            data: None,
            ttl,
            generation: 0,
        }
    }

    /// Returns the configured time-to-live.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the invalidation generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true if a listing was stored less than `ttl` before `now`.
    #[must_use]
    pub fn is_valid(&self, now: Instant) -> bool {
        match self.timestamp {
            Some(stored_at) if self.data.is_some() => {
                now.saturating_duration_since(stored_at) < self.ttl
            }
            _ => false,
        }
    }

    /// Returns the cached listing if it is still valid at `now`.
    #[must_use]
    pub fn fresh(&self, now: Instant) -> Option<Arc<GatewayListing>> {
        if self.is_valid(now) {
            self.data.clone()
        } else {
            None
        }
    }

    /// Returns the cached listing regardless of its age.
    #[must_use]
    pub fn data(&self) -> Option<Arc<GatewayListing>> {
        self.data.clone()
    }

    /// Returns how long ago the cached listing was stored, if it is still timestamped.
    #[must_use]
    pub fn age(&self, now: Instant) -> Option<Duration> {
        self.timestamp
            .map(|stored_at| now.saturating_duration_since(stored_at))
    }

    /// Stores a listing fetched at `now`.
    pub fn store(&mut self, data: Arc<GatewayListing>, now: Instant) {
        self.timestamp = Some(now);
        self.data = Some(data);
    }

    /// Stores a listing fetched under `generation`.
    ///
    /// The listing only becomes fresh if no invalidation happened since
    /// `generation` was read; otherwise it is kept for [`StatusCache::data`]
    /// only. Returns true if the listing was stamped fresh.
    pub fn store_if_current(
        &mut self,
        data: Arc<GatewayListing>,
        now: Instant,
        generation: u64,
    ) -> bool {
        if generation == self.generation {
            self.store(data, now);
            true
        } else {
            self.timestamp = None;
            self.data = Some(data);
            false
        }
    }

    /// Marks the cached listing stale without discarding it.
    pub fn invalidate(&mut self) {
        self.timestamp = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Arc<GatewayListing> {
        Arc::new(GatewayListing::default())
    }

    #[test]
    fn empty_cache_is_invalid() {
        let cache = StatusCache::new(Duration::from_secs(1));
        assert!(!cache.is_valid(Instant::now()));
        assert!(cache.fresh(Instant::now()).is_none());
    }

    #[test]
    fn valid_strictly_within_ttl() {
        let mut cache = StatusCache::new(Duration::from_millis(100));
        let t0 = Instant::now();
        cache.store(listing(), t0);

        assert!(cache.is_valid(t0));
        assert!(cache.is_valid(t0 + Duration::from_millis(99)));
        assert!(!cache.is_valid(t0 + Duration::from_millis(100)));
        assert!(!cache.is_valid(t0 + Duration::from_millis(150)));
    }

    #[test]
    fn zero_ttl_is_never_valid() {
        let mut cache = StatusCache::new(Duration::ZERO);
        let t0 = Instant::now();
        cache.store(listing(), t0);

        assert!(!cache.is_valid(t0));
        assert!(cache.data().is_some());
    }

    #[test]
    fn invalidate_keeps_data() {
        let mut cache = StatusCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        let stored = listing();
        cache.store(Arc::clone(&stored), t0);

        cache.invalidate();

        assert!(!cache.is_valid(t0));
        assert!(cache.age(t0).is_none());
        assert!(Arc::ptr_eq(&cache.data().unwrap(), &stored));
    }

    #[test]
    fn store_from_before_invalidation_is_never_fresh() {
        let mut cache = StatusCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        let started_under = cache.generation();

        cache.invalidate();
        let stored = listing();
        let fresh = cache.store_if_current(Arc::clone(&stored), t0, started_under);

        assert!(!fresh);
        assert!(!cache.is_valid(t0));
        assert!(Arc::ptr_eq(&cache.data().unwrap(), &stored));
    }

    #[test]
    fn store_under_current_generation_is_fresh() {
        let mut cache = StatusCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.invalidate();
        let generation = cache.generation();

        assert!(cache.store_if_current(listing(), t0, generation));
        assert!(cache.is_valid(t0));
    }

    #[test]
    fn store_after_invalidate_is_valid_again() {
        let mut cache = StatusCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.store(listing(), t0);
        cache.invalidate();
        cache.store(listing(), t0);

        assert!(cache.is_valid(t0));
    }
}
