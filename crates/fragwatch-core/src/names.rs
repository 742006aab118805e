//! Player-name identity normalization.
//!
//! Server browser rows and the statistics API render the same player with
//! different raw formatting: the in-game name carries `^`-digit color codes
//! (`^1PlayerName^7`) while the API may report it stripped or partially
//! stripped. Cleaning both sides to the same form is what lets the fusion
//! layer correlate records across sources.
//!
//! Manual byte scanning rather than `regex`; the pattern is two characters
//! wide and fixed.

/// Strips `^`-digit color codes from a raw player name.
///
/// A `^` followed by an ASCII digit is removed together with the digit; a
/// `^` followed by anything else is kept verbatim (some players use bare
/// carets in their names).
#[must_use]
pub fn clean_player_name(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '^' {
            if let Some(next) = chars.peek() {
                if next.is_ascii_digit() {
                    chars.next();
                    continue;
                }
            }
        }
        cleaned.push(c);
    }
    cleaned
}

/// The key two records must share to be considered the same player:
/// color codes stripped, then lowercased. Raw formatting differences
/// (colors, case) never split an identity.
#[must_use]
pub fn normalized_identity(raw: &str) -> String {
    clean_player_name(raw).to_lowercase()
}
