//! Normalization from raw statistics API shapes to
//! [`fragwatch_core::EnhancedPlayer`].

use fragwatch_core::{clean_player_name, EnhancedPlayer, TeamName};

use crate::types::UpstreamPlayer;

/// Normalizes one upstream player entry.
///
/// Missing identifiers degrade to empty strings rather than discarding the
/// player; the fusion layer matches on the cleaned name, so a player with
/// no steam id is still mergeable.
#[must_use]
pub fn normalize_player(upstream: UpstreamPlayer) -> EnhancedPlayer {
    let name = upstream.name.unwrap_or_default();
    EnhancedPlayer {
        steam_id: upstream.steamid.unwrap_or_default(),
        cleaned_name: clean_player_name(&name),
        team: upstream.team,
        rating: upstream.rating,
        rating_deviation: upstream.rd,
        team_name: TeamName::from_team_id(upstream.team),
        name,
    }
}
