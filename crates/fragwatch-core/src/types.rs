//! Domain model shared across the scrape, stats, and fusion layers.
//!
//! ## Observed upstream shapes
//!
//! ### Server browser rows
//! The listing table is rendered client-side; columns are positional
//! (favorite flag, location, name, map, player count, game mode, address).
//! The player-count column is a display string like `"12/16"` and is kept
//! raw — the two sides of the slash disagree with the stats API often
//! enough that parsing it buys nothing.
//!
//! ### Statistics API players
//! `team` is a small integer (1 red, 2 blue, 3 spectator, anything else
//! free-for-all). `rating`/`rd` are Glicko-style values and may be absent
//! for unrated players; both are modeled as `Option<f64>` and passed
//! through as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Team slot derived from the statistics API's numeric team id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamName {
    Red,
    Blue,
    Spectator,
    Free,
}

impl TeamName {
    /// Maps the upstream team id: 1 → red, 2 → blue, 3 → spectator,
    /// everything else (including absent) → free.
    #[must_use]
    pub fn from_team_id(team: Option<i64>) -> Self {
        match team {
            Some(1) => TeamName::Red,
            Some(2) => TeamName::Blue,
            Some(3) => TeamName::Spectator,
            _ => TeamName::Free,
        }
    }
}

impl std::fmt::Display for TeamName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamName::Red => write!(f, "red"),
            TeamName::Blue => write!(f, "blue"),
            TeamName::Spectator => write!(f, "spectator"),
            TeamName::Free => write!(f, "free"),
        }
    }
}

/// A player as scraped from the server browser. May be incomplete; the
/// listing page only reliably carries a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPlayer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

/// A player as reported by the statistics API, normalized into the domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedPlayer {
    pub steam_id: String,
    /// Raw name as reported upstream (may still carry color codes).
    pub name: String,
    /// Color codes stripped; the identity key is this, lowercased.
    pub cleaned_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_deviation: Option<f64>,
    pub team_name: TeamName,
}

/// One server-browser row that qualified as a full record.
///
/// `address` and `name` are required non-empty — a row lacking either is
/// discarded at parse time, never emitted as a partial record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub address: String,
    pub name: String,
    pub map: String,
    pub game_mode: String,
    /// Display string straight from the player-count column, e.g. `"12/16"`.
    pub player_count_raw: String,
    pub location: String,
    /// Empty when built from the listing page; the list carries counts, not
    /// rosters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub players: Vec<ScrapedPlayer>,
}

/// Union of scraped and enhanced player fields, annotated with provenance.
///
/// `has_enhanced_data` is `None` only on the pure-passthrough path (no
/// enhanced source consulted at all) and is omitted from serialized output
/// there, so a passthrough list serializes identically to its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedPlayer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaned_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steam_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_deviation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<TeamName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_enhanced_data: Option<bool>,
}

impl MergedPlayer {
    /// A merged record carrying only scraped fields. Provenance is left
    /// unset; the caller decides whether a merge was attempted at all.
    #[must_use]
    pub fn from_basic(basic: &ScrapedPlayer) -> Self {
        Self {
            name: basic.name.clone(),
            cleaned_name: None,
            team: basic.team,
            score: basic.score,
            steam_id: None,
            rating: None,
            rating_deviation: None,
            team_name: None,
            has_enhanced_data: None,
        }
    }
}

/// The combined view handed back to the bot/dashboard for one server.
///
/// `enhanced` is true only when the stats fetch succeeded AND a basic view
/// was supplied; any other combination degrades to the basic player list
/// with the absorbed failure (if any) reported in `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedServerView {
    pub server_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_view: Option<ServerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_view: Option<Vec<EnhancedPlayer>>,
    pub merged_players: Vec<MergedPlayer>,
    pub enhanced: bool,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_id_mapping() {
        assert_eq!(TeamName::from_team_id(Some(1)), TeamName::Red);
        assert_eq!(TeamName::from_team_id(Some(2)), TeamName::Blue);
        assert_eq!(TeamName::from_team_id(Some(3)), TeamName::Spectator);
        assert_eq!(TeamName::from_team_id(Some(0)), TeamName::Free);
        assert_eq!(TeamName::from_team_id(Some(99)), TeamName::Free);
        assert_eq!(TeamName::from_team_id(None), TeamName::Free);
    }

    #[test]
    fn team_name_display_is_lowercase() {
        assert_eq!(TeamName::Spectator.to_string(), "spectator");
        assert_eq!(TeamName::Free.to_string(), "free");
    }

    #[test]
    fn passthrough_player_serializes_without_provenance() {
        let merged = MergedPlayer::from_basic(&ScrapedPlayer {
            name: "Bar".to_owned(),
            team: None,
            score: None,
        });
        let json = serde_json::to_value(&merged).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Bar" }));
    }

    #[test]
    fn from_basic_carries_team_and_score() {
        let merged = MergedPlayer::from_basic(&ScrapedPlayer {
            name: "Foo".to_owned(),
            team: Some(2),
            score: Some(17),
        });
        assert_eq!(merged.team, Some(2));
        assert_eq!(merged.score, Some(17));
        assert_eq!(merged.has_enhanced_data, None);
    }
}
