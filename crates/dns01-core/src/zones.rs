//! Zone inventory: paginated listing and a time-bounded cache
//!
//! Listing every zone of an account is one of the most expensive calls a
//! provider offers, so clients keep the result for a fixed TTL. The cache is
//! only ever invalidated by time; nothing in this system creates or deletes
//! zones.
//!
//! ```text
//! get_or_refresh ──► cached && age < ttl ? ──yes──► cached zones
//!                              │ no
//!                              ▼
//!                      fetch_all_zones: page 1, 2, ... until
//!                      empty page or fetched >= total
//! ```

use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::ZonePager;

/// Zones requested per page
pub const ZONE_PAGE_SIZE: u32 = 100;

/// How long a zone listing is served from cache
pub const ZONE_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Walk every page of the zone listing
///
/// Pages are numbered from 1. Fetching stops when a page comes back empty
/// or when the number of zones received reaches the total the provider
/// reports. A failing page fails the whole listing.
///
/// The result is de-duplicated, keeping first-seen order.
pub async fn fetch_all_zones<P>(pager: &P, page_size: u32) -> Result<Vec<String>>
where
    P: ZonePager + ?Sized,
{
    let mut zones = Vec::new();
    let mut seen = HashSet::new();
    let mut received = 0usize;
    let mut page = 1u32;

    loop {
        let response = pager
            .fetch_zone_page(page, page_size)
            .await
            .map_err(|e| Error::zone_page(page, e))?;

        let count = response.zones.len();
        received += count;
        debug!(
            "Zone page {}: {} zone(s), {}/{} received",
            page, count, received, response.total
        );

        for zone in response.zones {
            if seen.insert(zone.clone()) {
                zones.push(zone);
            }
        }

        if count == 0 || received >= response.total {
            break;
        }
        page += 1;
    }

    Ok(zones)
}

struct CachedZones {
    zones: Vec<String>,
    fetched_at: Instant,
}

/// Time-bounded cache over [`fetch_all_zones`]
///
/// A single async mutex guards the whole read-check-refresh-write sequence,
/// so concurrent callers that find the cache expired wait for one refresh
/// instead of each issuing their own.
///
/// Failed refreshes are not cached.
pub struct ZoneCache {
    ttl: Duration,
    page_size: u32,
    state: Mutex<Option<CachedZones>>,
}

impl ZoneCache {
    /// Create an empty cache with the given TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            page_size: ZONE_PAGE_SIZE,
            state: Mutex::new(None),
        }
    }

    /// Override the page size used on refresh
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return cached zones, refreshing through `pager` when absent or expired
    pub async fn get_or_refresh<P>(&self, pager: &P) -> Result<Vec<String>>
    where
        P: ZonePager + ?Sized,
    {
        let mut guard = self.state.lock().await;

        if let Some(cached) = guard.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                debug!("Serving {} zone(s) from cache", cached.zones.len());
                return Ok(cached.zones.clone());
            }
            debug!("Zone cache expired, refreshing");
        }

        let zones = fetch_all_zones(pager, self.page_size).await?;
        *guard = Some(CachedZones {
            zones: zones.clone(),
            fetched_at: Instant::now(),
        });

        Ok(zones)
    }
}

impl Default for ZoneCache {
    fn default() -> Self {
        Self::new(ZONE_CACHE_TTL)
    }
}

impl std::fmt::Debug for ZoneCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneCache")
            .field("ttl", &self.ttl)
            .field("page_size", &self.page_size)
            .finish()
    }
}
