//! Fusion of scraped player lists with the rating-enhanced roster.
//!
//! Records from the two sources share no identifier; the join key is the
//! normalized name (color codes stripped, lowercased). Enhanced values win
//! on conflict, basic fields fill the gaps, and a basic player is never
//! dropped for lacking a match — only that one player's detail degrades.

use std::collections::HashMap;

use fragwatch_core::{normalized_identity, EnhancedPlayer, MergedPlayer, ScrapedPlayer};

/// Merges a scraped player list with the enhanced roster.
///
/// An empty enhanced list is a pure passthrough: the basic players come
/// back field-for-field with the provenance flag left unset (and therefore
/// absent from serialized output). Once any enhanced data is present,
/// every returned record carries an explicit `has_enhanced_data`.
#[must_use]
pub fn merge_players(basic: &[ScrapedPlayer], enhanced: &[EnhancedPlayer]) -> Vec<MergedPlayer> {
    if enhanced.is_empty() {
        return basic.iter().map(MergedPlayer::from_basic).collect();
    }

    let lookup: HashMap<String, &EnhancedPlayer> = enhanced
        .iter()
        .map(|player| (player.cleaned_name.to_lowercase(), player))
        .collect();

    basic
        .iter()
        .map(|player| match lookup.get(normalized_identity(&player.name).as_str()) {
            Some(enhanced) => fuse(player, enhanced),
            None => {
                let mut merged = MergedPlayer::from_basic(player);
                merged.has_enhanced_data = Some(false);
                merged
            }
        })
        .collect()
}

fn fuse(basic: &ScrapedPlayer, enhanced: &EnhancedPlayer) -> MergedPlayer {
    MergedPlayer {
        // The raw scraped name is what the caller displays; the cleaned
        // form rides along for anyone matching downstream.
        name: basic.name.clone(),
        cleaned_name: Some(enhanced.cleaned_name.clone()),
        team: enhanced.team.or(basic.team),
        score: basic.score,
        steam_id: (!enhanced.steam_id.is_empty()).then(|| enhanced.steam_id.clone()),
        rating: enhanced.rating,
        rating_deviation: enhanced.rating_deviation,
        team_name: Some(enhanced.team_name),
        has_enhanced_data: Some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fragwatch_core::TeamName;

    fn basic(name: &str) -> ScrapedPlayer {
        ScrapedPlayer {
            name: name.to_owned(),
            team: None,
            score: None,
        }
    }

    fn enhanced(name: &str) -> EnhancedPlayer {
        EnhancedPlayer {
            steam_id: String::new(),
            name: name.to_owned(),
            cleaned_name: fragwatch_core::clean_player_name(name),
            team: None,
            rating: None,
            rating_deviation: None,
            team_name: TeamName::Free,
        }
    }

    #[test]
    fn matched_player_takes_enhanced_values() {
        let mut foo = enhanced("Foo");
        foo.steam_id = "S1".to_owned();
        foo.rating = Some(1500.0);

        let merged = merge_players(&[basic("^1Foo")], &[foo]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].rating, Some(1500.0));
        assert_eq!(merged[0].steam_id.as_deref(), Some("S1"));
        assert_eq!(merged[0].has_enhanced_data, Some(true));
        // Raw scraped name survives for display.
        assert_eq!(merged[0].name, "^1Foo");
    }

    #[test]
    fn empty_enhanced_list_is_a_pure_passthrough() {
        let merged = merge_players(&[basic("Bar")], &[]);
        let json = serde_json::to_value(&merged).unwrap();
        assert_eq!(json, serde_json::json!([{ "name": "Bar" }]));
    }

    #[test]
    fn unmatched_player_is_kept_and_flagged() {
        let mut other = enhanced("SomeoneElse");
        other.rating = Some(2000.0);

        let mut scraped = basic("Bar");
        scraped.team = Some(2);
        scraped.score = Some(12);

        let merged = merge_players(&[scraped], &[other]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].has_enhanced_data, Some(false));
        assert_eq!(merged[0].team, Some(2));
        assert_eq!(merged[0].score, Some(12));
        assert_eq!(merged[0].rating, None);
    }

    #[test]
    fn matching_ignores_case_and_color_codes_on_both_sides() {
        let merged = merge_players(&[basic("^4ROCKETBOY^7")], &[enhanced("^1rocketboy")]);
        assert_eq!(merged[0].has_enhanced_data, Some(true));
    }

    #[test]
    fn enhanced_team_overrides_basic_team() {
        let mut scraped = basic("Foo");
        scraped.team = Some(2);
        scraped.score = Some(5);

        let mut rated = enhanced("Foo");
        rated.team = Some(1);
        rated.team_name = TeamName::Red;

        let merged = merge_players(&[scraped], &[rated]);
        assert_eq!(merged[0].team, Some(1));
        assert_eq!(merged[0].team_name, Some(TeamName::Red));
        // Basic-only fields fill the gaps.
        assert_eq!(merged[0].score, Some(5));
    }

    #[test]
    fn basic_team_fills_gap_when_enhanced_has_none() {
        let mut scraped = basic("Foo");
        scraped.team = Some(3);

        let merged = merge_players(&[scraped], &[enhanced("Foo")]);
        assert_eq!(merged[0].team, Some(3));
    }

    #[test]
    fn no_basic_player_is_ever_dropped() {
        let basics = vec![basic("a"), basic("b"), basic("c")];
        let merged = merge_players(&basics, &[enhanced("b")]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].has_enhanced_data, Some(false));
        assert_eq!(merged[1].has_enhanced_data, Some(true));
        assert_eq!(merged[2].has_enhanced_data, Some(false));
    }

    #[test]
    fn empty_steam_id_stays_absent_after_fusion() {
        let merged = merge_players(&[basic("Foo")], &[enhanced("Foo")]);
        assert_eq!(merged[0].steam_id, None);
    }
}
