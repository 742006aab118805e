use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got \"{other}\""),
            }),
        }
    };

    let env = parse_environment(&or_default("FRAGWATCH_ENV", "development"));
    let log_level = or_default("FRAGWATCH_LOG_LEVEL", "info");

    let browser_list_url = or_default("FRAGWATCH_BROWSER_LIST_URL", "https://ql.syncore.org/");
    let stats_api_base_url =
        or_default("FRAGWATCH_STATS_API_BASE_URL", "https://qlstats.net/api");

    let region_cache_minutes = parse_u64("FRAGWATCH_REGION_CACHE_MINUTES", "5")?;
    let stats_cache_minutes = parse_u64("FRAGWATCH_STATS_CACHE_MINUTES", "2")?;
    let stats_timeout_ms = parse_u64("FRAGWATCH_STATS_TIMEOUT_MS", "7000")?;

    let scraping_enabled = parse_bool("FRAGWATCH_SCRAPING_ENABLED", "true")?;
    let page_diagnostics = parse_bool("FRAGWATCH_PAGE_DIAGNOSTICS", "false")?;

    let browser_user_agent = or_default(
        "FRAGWATCH_BROWSER_USER_AGENT",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    );
    let nav_timeout_secs = parse_u64("FRAGWATCH_NAV_TIMEOUT_SECS", "30")?;
    let table_settle_ms = parse_u64("FRAGWATCH_TABLE_SETTLE_MS", "1500")?;

    Ok(AppConfig {
        env,
        log_level,
        browser_list_url,
        stats_api_base_url,
        region_cache_minutes,
        stats_cache_minutes,
        stats_timeout_ms,
        scraping_enabled,
        page_diagnostics,
        browser_user_agent,
        nav_timeout_secs,
        table_settle_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
