use thiserror::Error;

/// Errors returned by the statistics API client.
///
/// Only [`StatsError::EmptyAddress`] is a caller bug; everything else is
/// the upstream source misbehaving, and the service layer above absorbs
/// those into a uniform "source unavailable" result.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Caller contract violation: the per-server endpoint needs an address.
    /// Raised before any I/O happens.
    #[error("server address must not be empty")]
    EmptyAddress,

    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the statistics API.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body is not valid JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A 200 response whose body lacks the expected envelope — `ok` true
    /// with a list under `players`.
    #[error("statistics response for {address} did not match the expected shape")]
    UnexpectedShape { address: String },

    /// A URL could not be built from the configured base and the address.
    #[error("invalid statistics URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
