pub mod error;
pub mod merge;
pub mod service;

mod single_flight;

pub use error::TelemetryError;
pub use merge::merge_players;
pub use service::TelemetryService;
