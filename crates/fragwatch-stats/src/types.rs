//! Statistics API response types for the per-server players endpoint.
//!
//! ## Observed shape
//!
//! The endpoint wraps its payload in a `{ "ok": bool, "players": [...] }`
//! envelope. `ok: false` comes back with HTTP 200 when the tracker has no
//! live data for the address, so the envelope flag — not the status code —
//! is the success signal.
//!
//! Player entries are uneven: `steamid` is a decimal string but is omitted
//! for anonymous players, `rating`/`rd` are absent for unrated players, and
//! `name` still carries in-game color codes. Every field is therefore
//! decoded tolerantly; only the envelope itself is checked strictly.

use serde::Deserialize;

/// Top-level response from `GET /server/<address>/players`.
#[derive(Debug, Deserialize)]
pub struct PlayersEnvelope {
    #[serde(default)]
    pub ok: bool,
    /// Absent entirely on some error payloads even when `ok` is true;
    /// treated as a shape mismatch by the client.
    #[serde(default)]
    pub players: Option<Vec<UpstreamPlayer>>,
}

/// One player as reported by the statistics API.
#[derive(Debug, Deserialize)]
pub struct UpstreamPlayer {
    #[serde(default)]
    pub steamid: Option<String>,

    /// Raw in-game name; may carry `^`-digit color codes.
    #[serde(default)]
    pub name: Option<String>,

    /// Team id: 1 red, 2 blue, 3 spectator, anything else free-for-all.
    #[serde(default)]
    pub team: Option<i64>,

    /// Glicko-style rating; absent for unrated players.
    #[serde(default)]
    pub rating: Option<f64>,

    /// Rating deviation paired with `rating`.
    #[serde(default)]
    pub rd: Option<f64>,
}
