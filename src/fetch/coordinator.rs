// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-flight carousel fetching.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::command::RoomGetCarouselCommand;
use crate::error::GatewayError;
use crate::protocol::{Transport, send_with_timeout};
use crate::response::GatewayListing;

use super::StatusCache;

/// Result of one carousel fetch, shared by every caller that waited on it.
pub type FetchResult = Result<Arc<GatewayListing>, GatewayError>;

type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

/// The outstanding fetch and the cache generation it was started under.
struct PendingFetch {
    generation: u64,
    result: SharedFetch,
}

/// In-flight bookkeeping: a fetch is in progress exactly when `pending` is set.
#[derive(Default)]
struct FetchState {
    pending: Option<PendingFetch>,
}

impl fmt::Debug for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchState")
            .field("in_progress", &self.pending.is_some())
            .finish()
    }
}

/// Coalesces carousel requests so the gateway sees at most one at a time.
///
/// The gateway silently drops rapid repeated requests, so every caller asking
/// for the listing while a fetch is outstanding joins that fetch instead of
/// issuing its own. Fresh cached listings are served without any request.
///
/// Each fetch runs as its own tokio task: it completes, updates the cache and
/// frees the in-progress slot even if every caller stops waiting. A fetch
/// that was outstanding when the cache got invalidated (a write landed) is
/// not joined by later callers; they wait for it to finish and then fetch
/// again, so a read that follows a write never sees pre-write data.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use parking_lot::Mutex;
/// use tcpbulb_lib::GatewayConfig;
/// use tcpbulb_lib::fetch::{FetchCoordinator, StatusCache};
/// use tcpbulb_lib::protocol::HttpTransport;
///
/// # async fn example() -> Result<(), tcpbulb_lib::GatewayError> {
/// let config = GatewayConfig::new("192.168.1.20", "token");
/// let cache = Arc::new(Mutex::new(StatusCache::new(config.cache_ttl())));
/// let coordinator = FetchCoordinator::new(
///     Arc::new(HttpTransport::new(&config)?),
///     cache,
///     config.request_timeout(),
/// );
///
/// let (a, b) = tokio::join!(coordinator.fetch(), coordinator.fetch());
/// assert!(Arc::ptr_eq(&a?, &b?));
/// # Ok(())
/// # }
/// ```
pub struct FetchCoordinator<T: Transport> {
    transport: Arc<T>,
    cache: Arc<Mutex<StatusCache>>,
    state: Arc<Mutex<FetchState>>,
    timeout: Duration,
}

impl<T: Transport> FetchCoordinator<T> {
    /// Creates a coordinator fetching through `transport` into `cache`.
    #[must_use]
    pub fn new(transport: Arc<T>, cache: Arc<Mutex<StatusCache>>, timeout: Duration) -> Self {
        Self {
            transport,
            cache,
            state: Arc::new(Mutex::new(FetchState::default())),
            timeout,
        }
    }

    /// Returns the shared cache handle.
    #[must_use]
    pub fn cache(&self) -> &Arc<Mutex<StatusCache>> {
        &self.cache
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns true while a carousel request is outstanding.
    #[must_use]
    pub fn is_fetch_in_progress(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    /// Returns the current listing.
    ///
    /// Serves the cache while it is fresh, otherwise joins the outstanding
    /// fetch or starts a new one. Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the fetch's `GatewayError`. A timeout is only reported when no
    /// fresh listing is cached at the moment it fires.
    pub async fn fetch(&self) -> FetchResult {
        loop {
            let (result, outdated) = {
                let mut state = self.state.lock();
                let cache = self.cache.lock();
                let now = Instant::now();

                if let Some(listing) = cache.fresh(now) {
                    tracing::debug!(
                        age_ms = cache.age(now).map_or(0, |age| age.as_millis()),
                        ttl_ms = cache.ttl().as_millis(),
                        "Using cached carousel"
                    );
                    return Ok(listing);
                }

                if let Some(pending) = &state.pending {
                    let outdated = pending.generation != cache.generation();
                    (pending.result.clone(), outdated)
                } else {
                    let pending = self.start_fetch(cache.generation());
                    let result = pending.result.clone();
                    state.pending = Some(pending);
                    (result, false)
                }
            };

            if !outdated {
                return result.await;
            }
            tracing::debug!("In-flight carousel fetch predates invalidation, waiting to refetch");
            let _ = result.await;
        }
    }

    fn start_fetch(&self, generation: u64) -> PendingFetch {
        let transport = Arc::clone(&self.transport);
        let cache = Arc::clone(&self.cache);
        let state = Arc::clone(&self.state);
        let timeout = self.timeout;

        tracing::debug!(timeout_ms = timeout.as_millis(), "Fetching carousel");

        let task = tokio::spawn(async move {
            let outcome = send_with_timeout(&*transport, &RoomGetCarouselCommand, timeout)
                .await
                .and_then(|response| GatewayListing::from_response(&response));

            let now = Instant::now();
            let mut state = state.lock();
            let mut cache = cache.lock();
            state.pending = None;

            match outcome {
                Ok(listing) => {
                    let listing = Arc::new(listing);
                    if cache.store_if_current(Arc::clone(&listing), now, generation) {
                        tracing::debug!(devices = listing.len(), "Carousel fetched");
                    } else {
                        tracing::debug!(
                            devices = listing.len(),
                            "Carousel fetched across an invalidation, not caching as fresh"
                        );
                    }
                    Ok(listing)
                }
                Err(GatewayError::Timeout(ms)) => {
                    if let Some(listing) = cache.fresh(now) {
                        tracing::debug!(timeout_ms = ms, "Carousel timed out, using cache");
                        Ok(listing)
                    } else {
                        tracing::warn!(timeout_ms = ms, "Carousel timed out with no recent cache");
                        Err(GatewayError::Timeout(ms))
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Carousel fetch failed");
                    Err(err)
                }
            }
        });

        let state = Arc::clone(&self.state);
        let result = task
            .map(move |joined| {
                joined.unwrap_or_else(|err| {
                    // The task never reached its own cleanup.
                    state.lock().pending = None;
                    tracing::warn!(error = %err, "Carousel fetch task failed");
                    Err(GatewayError::ConnectionFailed(err.to_string()))
                })
            })
            .boxed()
            .shared();

        PendingFetch { generation, result }
    }
}

impl<T: Transport> fmt::Debug for FetchCoordinator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchCoordinator")
            .field("state", &*self.state.lock())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
