pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::StatsClient;
pub use error::StatsError;
pub use normalize::normalize_player;
pub use types::{PlayersEnvelope, UpstreamPlayer};
