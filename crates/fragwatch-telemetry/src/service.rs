//! The telemetry service facade.
//!
//! One explicitly constructed object owns every piece of shared mutable
//! state in this layer — both TTL caches, the browser session, and the
//! single-flight registry — so tests instantiate isolated services instead
//! of sharing process-wide singletons. Within any fetch, the cache check
//! always precedes network/browser work, and the cache write follows only
//! successful completion.

use std::time::Duration;

use chrono::Utc;

use fragwatch_browser::{BrowserSession, RegionScraper, RegionSnapshot};
use fragwatch_core::{
    AppConfig, CacheStats, EnhancedPlayer, MergedServerView, ServerRecord, TtlCache,
};
use fragwatch_stats::{StatsClient, StatsError};

use crate::error::TelemetryError;
use crate::merge::merge_players;
use crate::single_flight::KeyedLock;

/// Cache key for the scraped region list.
const REGION_CACHE_KEY: &str = "region:servers";

fn stats_cache_key(address: &str) -> String {
    format!("stats:{address}")
}

pub struct TelemetryService {
    region_cache: TtlCache<RegionSnapshot>,
    stats_cache: TtlCache<Vec<EnhancedPlayer>>,
    session: BrowserSession,
    scraper: RegionScraper,
    stats: StatsClient,
    flight: KeyedLock,
}

impl TelemetryService {
    /// Builds a service from config. Cache TTLs are read here, once; the
    /// browser process is not launched until the first scrape needs it.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Stats`] if the HTTP client cannot be
    /// constructed or the configured stats base URL does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, TelemetryError> {
        Ok(Self {
            region_cache: TtlCache::new(Duration::from_secs(config.region_cache_minutes * 60)),
            stats_cache: TtlCache::new(Duration::from_secs(config.stats_cache_minutes * 60)),
            session: BrowserSession::new(),
            scraper: RegionScraper::from_config(config),
            stats: StatsClient::with_base_url(config.stats_timeout_ms, &config.stats_api_base_url)?,
            flight: KeyedLock::new(),
        })
    }

    /// The in-region server list, cache-checked.
    ///
    /// # Errors
    ///
    /// Propagates scrape failures — a structural failure to reach the
    /// listing leaves nothing usable, and the caller decides about retries.
    pub async fn fetch_region_servers(&self) -> Result<Vec<ServerRecord>, TelemetryError> {
        Ok(self.fetch_region_snapshot().await?.servers)
    }

    /// Same path as [`Self::fetch_region_servers`], exposing the parse
    /// health alongside the records so operators can tell a quiet region
    /// from upstream layout drift.
    ///
    /// # Errors
    ///
    /// Propagates scrape failures.
    pub async fn fetch_region_snapshot(&self) -> Result<RegionSnapshot, TelemetryError> {
        if let Some(snapshot) = self.region_cache.get(REGION_CACHE_KEY) {
            return Ok(snapshot);
        }

        let _guard = self.flight.acquire(REGION_CACHE_KEY).await;
        // A concurrent caller may have completed the scrape while we queued.
        if let Some(snapshot) = self.region_cache.get(REGION_CACHE_KEY) {
            return Ok(snapshot);
        }

        let snapshot = self.scraper.fetch_region_servers(&self.session).await?;
        self.region_cache.set(REGION_CACHE_KEY, snapshot.clone());
        Ok(snapshot)
    }

    /// Looks one server up in the region list by address.
    ///
    /// # Errors
    ///
    /// Propagates scrape failures from the underlying list fetch.
    pub async fn get_server_details(
        &self,
        address: &str,
    ) -> Result<Option<ServerRecord>, TelemetryError> {
        let servers = self.fetch_region_servers().await?;
        Ok(servers
            .into_iter()
            .find(|server| server.address.eq_ignore_ascii_case(address)))
    }

    /// The rating-enhanced player list for one server, cache-checked.
    ///
    /// `Ok(None)` means the statistics source is unavailable right now —
    /// connection failure, timeout, bad status, or a body that no longer
    /// matches the expected shape. The causes are logged distinctly but the
    /// caller contract is uniform, and an unavailable result is never
    /// cached.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Stats`] only for the empty-address caller
    /// contract violation.
    pub async fn fetch_enhanced_players(
        &self,
        address: &str,
    ) -> Result<Option<Vec<EnhancedPlayer>>, TelemetryError> {
        if address.trim().is_empty() {
            return Err(StatsError::EmptyAddress.into());
        }

        let key = stats_cache_key(address);
        if let Some(players) = self.stats_cache.get(&key) {
            return Ok(Some(players));
        }

        let _guard = self.flight.acquire(&key).await;
        if let Some(players) = self.stats_cache.get(&key) {
            return Ok(Some(players));
        }

        match self.stats.fetch_server_players(address).await {
            Ok(players) => {
                self.stats_cache.set(&key, players.clone());
                Ok(Some(players))
            }
            Err(err @ StatsError::EmptyAddress) => Err(err.into()),
            Err(err) => {
                warn_source_unavailable(address, &err);
                Ok(None)
            }
        }
    }

    /// Composes the stats fetch with the fusion engine.
    ///
    /// This never fails: a stats failure or a missing basic view degrades
    /// to `enhanced: false` with the basic players passed through (or an
    /// empty list), and the absorbed failure is reported via the view's
    /// `error` field.
    pub async fn get_enhanced_server_data(
        &self,
        address: &str,
        basic_view: Option<&ServerRecord>,
    ) -> MergedServerView {
        let fetched = self.fetch_enhanced_players(address).await;
        let last_updated = Utc::now();

        match (fetched, basic_view) {
            (Ok(Some(enhanced)), Some(basic)) => MergedServerView {
                server_address: address.to_owned(),
                merged_players: merge_players(&basic.players, &enhanced),
                basic_view: Some(basic.clone()),
                enhanced_view: Some(enhanced),
                enhanced: true,
                last_updated,
                error: None,
            },
            (Ok(Some(enhanced)), None) => MergedServerView {
                server_address: address.to_owned(),
                merged_players: Vec::new(),
                basic_view: None,
                enhanced_view: Some(enhanced),
                enhanced: false,
                last_updated,
                error: None,
            },
            (Ok(None), basic) => MergedServerView {
                server_address: address.to_owned(),
                merged_players: passthrough(basic),
                basic_view: basic.cloned(),
                enhanced_view: None,
                enhanced: false,
                last_updated,
                error: Some("statistics source unavailable".to_owned()),
            },
            (Err(err), basic) => MergedServerView {
                server_address: address.to_owned(),
                merged_players: passthrough(basic),
                basic_view: basic.cloned(),
                enhanced_view: None,
                enhanced: false,
                last_updated,
                error: Some(err.to_string()),
            },
        }
    }

    pub fn clear_cache(&self) {
        self.region_cache.clear();
        self.stats_cache.clear();
    }

    /// Combined occupancy of both caches. Keys are namespaced
    /// (`region:…`/`stats:…`) so the merged listing stays unambiguous.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        let region = self.region_cache.stats();
        let stats = self.stats_cache.stats();

        let mut keys = region.keys;
        keys.extend(stats.keys);
        keys.sort();

        CacheStats {
            size: region.size + stats.size,
            keys,
            oldest_fetched_at: match (region.oldest_fetched_at, stats.oldest_fetched_at) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
        }
    }

    /// Idempotent; wired to the host process's termination-signal handlers
    /// so no browser process is ever orphaned.
    pub async fn close_browser_session(&self) {
        self.session.close().await;
    }

    /// Whether the browser process is currently live.
    pub async fn browser_ready(&self) -> bool {
        self.session.is_ready().await
    }
}

/// The degraded merge result: basic players unmodified, or nothing at all.
fn passthrough(basic_view: Option<&ServerRecord>) -> Vec<fragwatch_core::MergedPlayer> {
    basic_view
        .map(|basic| merge_players(&basic.players, &[]))
        .unwrap_or_default()
}

fn warn_source_unavailable(address: &str, err: &StatsError) {
    match err {
        StatsError::Http(e) if e.is_timeout() => {
            tracing::warn!(address, "statistics request timed out");
        }
        StatsError::Http(e) if e.is_connect() => {
            tracing::warn!(address, error = %e, "could not reach the statistics API");
        }
        other => {
            tracing::warn!(address, error = %other, "statistics source unavailable");
        }
    }
}
