use thiserror::Error;

/// Errors from the browser session and the region scrape path.
///
/// Every variant is fatal to the scrape call that raised it: a failure to
/// reach the listing data at all must be visible to the caller, which is
/// the one deciding whether to retry later. Nothing here retries.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The headless browser process could not be started.
    #[error("failed to launch headless browser: {reason}")]
    Launch { reason: String },

    /// Tab creation, user-agent setup, or content capture failed.
    #[error("browser page error: {reason}")]
    Page { reason: String },

    /// Navigation did not complete (includes navigation timeouts).
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// The expected server table never appeared — either the wait timed out
    /// or the page structure changed underneath us.
    #[error("server table \"{selector}\" did not appear: {reason}")]
    MissingTable { selector: String, reason: String },

    /// The blocking task driving the browser panicked or was cancelled.
    #[error("browser task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
