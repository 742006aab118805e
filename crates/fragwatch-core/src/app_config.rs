#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide configuration, read once at startup.
///
/// Every field has a default so the service can start from a bare
/// environment; see `config.rs` for the variable names and parsing rules.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// DOM-rendered server-browser listing page. Only reachable through a
    /// full browser engine; the table is populated client-side.
    pub browser_list_url: String,
    /// Base URL of the JSON statistics API (per-server player endpoint
    /// lives under `server/<address>/players`).
    pub stats_api_base_url: String,
    pub region_cache_minutes: u64,
    pub stats_cache_minutes: u64,
    pub stats_timeout_ms: u64,
    /// Administrative off-switch for the browser scrape path. When false,
    /// the region list is reported empty and no browser is ever launched.
    pub scraping_enabled: bool,
    /// Gates verbose page-structure diagnostics (row counts, payload sizes)
    /// on the scrape path.
    pub page_diagnostics: bool,
    pub browser_user_agent: String,
    pub nav_timeout_secs: u64,
    /// Settle interval after the server table first matches its selector;
    /// the listing page keeps filling rows in after that point.
    pub table_settle_ms: u64,
}
