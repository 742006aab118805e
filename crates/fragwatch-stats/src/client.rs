//! HTTP client for the player-statistics API.
//!
//! Wraps `reqwest` with a bounded timeout, browser-like headers (the API
//! sits behind the same anti-bot frontend as the rest of the site), and
//! strict envelope checking. All failures are typed; the service layer
//! above decides which of them degrade to "source unavailable".

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Url};

use fragwatch_core::EnhancedPlayer;

use crate::error::StatsError;
use crate::normalize::normalize_player;
use crate::types::PlayersEnvelope;

const DEFAULT_BASE_URL: &str = "https://qlstats.net/api";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Client for the per-server player-statistics endpoint.
///
/// Use [`StatsClient::new`] for production or [`StatsClient::with_base_url`]
/// to point at a mock server in tests.
pub struct StatsClient {
    client: Client,
    base_url: Url,
}

impl StatsClient {
    /// Creates a client pointed at the production statistics API.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_ms: u64) -> Result<Self, StatsError> {
        Self::with_base_url(timeout_ms, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Http`] if the client cannot be constructed, or
    /// [`StatsError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(timeout_ms: u64, base_url: &str) -> Result<Self, StatsError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .build()?;

        // Normalise: exactly one trailing slash so joined paths land under
        // the base rather than replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| StatsError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches and normalizes the player list for one server address.
    ///
    /// # Errors
    ///
    /// - [`StatsError::EmptyAddress`] — caller contract violation, raised
    ///   before any I/O.
    /// - [`StatsError::Http`] — connection failure or timeout.
    /// - [`StatsError::UnexpectedStatus`] — non-2xx response.
    /// - [`StatsError::Deserialize`] — body is not valid JSON.
    /// - [`StatsError::UnexpectedShape`] — valid JSON without the expected
    ///   `ok`/`players` envelope.
    pub async fn fetch_server_players(
        &self,
        address: &str,
    ) -> Result<Vec<EnhancedPlayer>, StatsError> {
        if address.trim().is_empty() {
            return Err(StatsError::EmptyAddress);
        }

        let url = self.players_url(address)?;
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let envelope: PlayersEnvelope =
            serde_json::from_str(&body).map_err(|e| StatsError::Deserialize {
                context: format!("players for {address}"),
                source: e,
            })?;

        if !envelope.ok {
            return Err(StatsError::UnexpectedShape {
                address: address.to_owned(),
            });
        }
        let Some(players) = envelope.players else {
            return Err(StatsError::UnexpectedShape {
                address: address.to_owned(),
            });
        };

        tracing::debug!(address, count = players.len(), "fetched player statistics");
        Ok(players.into_iter().map(normalize_player).collect())
    }

    fn players_url(&self, address: &str) -> Result<Url, StatsError> {
        let raw = format!("{}server/{address}/players", self.base_url);
        Url::parse(&raw).map_err(|e| StatsError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }
}
