pub mod app_config;
pub mod cache;
pub mod config;
pub mod names;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use cache::{CacheStats, TtlCache};
pub use config::{load_app_config, load_app_config_from_env};
pub use names::{clean_player_name, normalized_identity};
pub use types::{
    EnhancedPlayer, MergedPlayer, MergedServerView, ScrapedPlayer, ServerRecord, TeamName,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
