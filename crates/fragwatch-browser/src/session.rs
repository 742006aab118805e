//! Reusable headless-browser session.
//!
//! Launching Chrome is by far the most expensive operation in this system,
//! so the process is created lazily on the first scrape and reused until it
//! dies or is explicitly closed. At most one process exists per session at
//! any time; the async mutex below is what serializes concurrent launch
//! attempts, so two cold callers share one launch instead of racing to
//! start two browsers.

use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions};
use tokio::sync::Mutex;

use crate::error::ScrapeError;

/// Chrome flag set applied to every launch. Sandboxing is disabled for
/// container compatibility; GPU and background throttling are disabled so
/// a backgrounded tab keeps rendering the server table at full rate.
const LAUNCH_FLAGS: &[&str] = &[
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-renderer-backgrounding",
    "--mute-audio",
];

/// How long the driver keeps an idle browser alive before reaping it.
/// A reaped process is caught by the liveness probe in [`BrowserSession::acquire`]
/// and replaced with a fresh launch.
const IDLE_BROWSER_TIMEOUT_SECS: u64 = 3600;

/// Owns the single reusable headless-browser process.
///
/// Closed and ready states are the slot being `None`/`Some`; launching is
/// the window where a caller holds the lock with the slot still empty, so
/// every other `acquire` naturally queues behind the launch in progress.
pub struct BrowserSession {
    slot: Mutex<Option<Arc<Browser>>>,
}

impl BrowserSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Returns the live browser handle, launching the process if needed.
    ///
    /// Fast path: the current process still answers a CDP version probe and
    /// is returned as-is. Otherwise (first use, or the process died / was
    /// reaped by the idle timeout) a new process is launched on the blocking
    /// pool and stored.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Launch`] if Chrome cannot be started; the
    /// session is left closed in that case.
    pub async fn acquire(&self) -> Result<Arc<Browser>, ScrapeError> {
        let mut slot = self.slot.lock().await;

        if let Some(browser) = slot.as_ref() {
            let probe = Arc::clone(browser);
            let alive = tokio::task::spawn_blocking(move || probe.get_version().is_ok()).await?;
            if alive {
                return Ok(Arc::clone(browser));
            }
            tracing::warn!("headless browser no longer responding; relaunching");
            *slot = None;
        }

        let browser = Arc::new(tokio::task::spawn_blocking(launch_browser).await??);
        tracing::info!("headless browser launched");
        *slot = Some(Arc::clone(&browser));
        Ok(browser)
    }

    /// Closes the browser process. Idempotent: closing an already-closed
    /// session is a no-op, so this is safe to wire straight into
    /// termination-signal handlers.
    pub async fn close(&self) {
        let taken = self.slot.lock().await.take();
        if let Some(browser) = taken {
            tracing::info!("closing headless browser session");
            // Dropping the last handle kills the child process; do it off
            // the async runtime since the kill waits on the process.
            let _ = tokio::task::spawn_blocking(move || drop(browser)).await;
        }
    }

    /// Whether a browser process is currently held. Used by callers for
    /// observability and by tests to assert the disabled scrape path never
    /// launches anything.
    pub async fn is_ready(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

impl Default for BrowserSession {
    fn default() -> Self {
        Self::new()
    }
}

fn launch_browser() -> Result<Browser, ScrapeError> {
    let args: Vec<&OsStr> = LAUNCH_FLAGS.iter().map(OsStr::new).collect();
    let options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false)
        .args(args)
        .idle_browser_timeout(Duration::from_secs(IDLE_BROWSER_TIMEOUT_SECS))
        .build()
        .map_err(|e| ScrapeError::Launch {
            reason: e.to_string(),
        })?;

    Browser::new(options).map_err(|e| ScrapeError::Launch {
        reason: format!("{e:#}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_session_starts_closed() {
        let session = BrowserSession::new();
        assert!(!session.is_ready().await);
    }

    #[tokio::test]
    async fn close_is_idempotent_without_a_launch() {
        let session = BrowserSession::new();
        session.close().await;
        session.close().await;
        assert!(!session.is_ready().await);
    }
}
