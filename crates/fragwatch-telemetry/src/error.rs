use thiserror::Error;

/// Errors surfaced through the service's external interface.
///
/// Failures that leave a usable (even if degraded) result never reach this
/// type — they are absorbed inside the service and reported through the
/// returned data instead. What remains is the scrape path (no usable data
/// at all) and caller contract violations from the stats path.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("region scrape failed: {0}")]
    Scrape(#[from] fragwatch_browser::ScrapeError),

    #[error("statistics client error: {0}")]
    Stats(#[from] fragwatch_stats::StatsError),
}
