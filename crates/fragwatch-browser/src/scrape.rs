//! Region scraper: drives the browser session to render the listing page
//! and turns the result into filtered server records.

use std::sync::Arc;
use std::time::Duration;

use fragwatch_core::{AppConfig, ServerRecord};
use headless_chrome::{Browser, Tab};

use crate::error::ScrapeError;
use crate::rows::{matches_region, parse_server_table, TABLE_SELECTOR};
use crate::session::BrowserSession;

/// One scrape cycle's output.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSnapshot {
    pub servers: Vec<ServerRecord>,
    /// True when the table matched its selector and produced rows but none
    /// parsed into a record — upstream layout drift, not a quiet region.
    /// A legitimately empty filtered result keeps this false.
    pub degraded: bool,
    pub rows_seen: usize,
    pub rows_discarded: usize,
}

impl RegionSnapshot {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            servers: Vec::new(),
            degraded: false,
            rows_seen: 0,
            rows_discarded: 0,
        }
    }
}

/// Page-interaction settings captured once from config.
#[derive(Clone)]
struct PageSettings {
    list_url: String,
    user_agent: String,
    nav_timeout: Duration,
    settle: Duration,
}

pub struct RegionScraper {
    enabled: bool,
    page_diagnostics: bool,
    page: PageSettings,
}

impl RegionScraper {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            enabled: config.scraping_enabled,
            page_diagnostics: config.page_diagnostics,
            page: PageSettings {
                list_url: config.browser_list_url.clone(),
                user_agent: config.browser_user_agent.clone(),
                nav_timeout: Duration::from_secs(config.nav_timeout_secs),
                settle: Duration::from_millis(config.table_settle_ms),
            },
        }
    }

    /// Renders the listing page and returns the in-region server records.
    ///
    /// When scraping is administratively disabled this returns an empty
    /// snapshot without touching the session manager at all — an escape
    /// hatch, not a failure.
    ///
    /// # Errors
    ///
    /// Launch, navigation, selector-timeout, and capture failures all
    /// propagate; there is no usable partial result on those paths. The
    /// page is released on every path, success or failure.
    pub async fn fetch_region_servers(
        &self,
        session: &BrowserSession,
    ) -> Result<RegionSnapshot, ScrapeError> {
        if !self.enabled {
            tracing::debug!("scraping administratively disabled; returning empty server list");
            return Ok(RegionSnapshot::empty());
        }

        let browser = session.acquire().await?;
        let page = self.page.clone();
        let html = tokio::task::spawn_blocking(move || render_listing(&browser, &page)).await??;

        let parsed = parse_server_table(&html);
        if self.page_diagnostics {
            tracing::debug!(
                html_bytes = html.len(),
                rows_seen = parsed.rows_seen,
                rows_discarded = parsed.rows_discarded,
                "listing page structure diagnostics"
            );
        }

        let degraded = parsed.rows_seen > 0 && parsed.records.is_empty();
        if degraded {
            tracing::warn!(
                rows_seen = parsed.rows_seen,
                "server table rows no longer parse; upstream layout likely changed"
            );
        }

        let total = parsed.records.len();
        let servers: Vec<ServerRecord> = parsed
            .records
            .into_iter()
            .filter(matches_region)
            .collect();
        tracing::debug!(
            total,
            in_region = servers.len(),
            "scraped server listing"
        );

        Ok(RegionSnapshot {
            servers,
            degraded,
            rows_seen: parsed.rows_seen,
            rows_discarded: parsed.rows_discarded,
        })
    }
}

fn render_listing(browser: &Browser, page: &PageSettings) -> Result<String, ScrapeError> {
    let tab = browser.new_tab().map_err(|e| ScrapeError::Page {
        reason: format!("{e:#}"),
    })?;

    let result = drive_listing(&tab, page);

    // Release the page whether the drive succeeded or not; a leaked tab
    // accumulates in the long-lived browser process.
    if let Err(e) = tab.close(true) {
        tracing::debug!(error = %e, "failed to close scrape tab");
    }

    result
}

fn drive_listing(tab: &Arc<Tab>, page: &PageSettings) -> Result<String, ScrapeError> {
    // Bounds navigation and element waits alike; a hung page resolves to a
    // typed error instead of stalling the scrape indefinitely.
    tab.set_default_timeout(page.nav_timeout);

    tab.set_user_agent(&page.user_agent, None, None)
        .map_err(|e| ScrapeError::Page {
            reason: format!("{e:#}"),
        })?;

    tab.navigate_to(&page.list_url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|e| ScrapeError::Navigation {
            url: page.list_url.clone(),
            reason: format!("{e:#}"),
        })?;

    tab.wait_for_element_with_custom_timeout(TABLE_SELECTOR, page.nav_timeout)
        .map_err(|e| ScrapeError::MissingTable {
            selector: TABLE_SELECTOR.to_owned(),
            reason: format!("{e:#}"),
        })?;

    // The table element exists before the client-side fetch fills it in;
    // give the page a fixed beat to populate rows.
    std::thread::sleep(page.settle);

    tab.get_content().map_err(|e| ScrapeError::Page {
        reason: format!("{e:#}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fragwatch_core::config::load_app_config_from_env;

    fn disabled_scraper() -> RegionScraper {
        let mut config = load_app_config_from_env().unwrap();
        config.scraping_enabled = false;
        RegionScraper::from_config(&config)
    }

    #[tokio::test]
    async fn disabled_scraper_returns_empty_without_launching() {
        let session = BrowserSession::new();
        let snapshot = disabled_scraper()
            .fetch_region_servers(&session)
            .await
            .unwrap();

        assert_eq!(snapshot, RegionSnapshot::empty());
        // The escape hatch must never touch the browser.
        assert!(!session.is_ready().await);
    }
}
