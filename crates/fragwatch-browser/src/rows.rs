//! Positional row parser for the rendered server-browser table.
//!
//! This is the one adapter that knows the listing page's column layout; a
//! site redesign should land here and nowhere else. It is a pure function
//! over already-rendered HTML so the column contract can be unit-tested
//! without a browser in the loop.
//!
//! ## Expected column contract
//!
//! | index | column |
//! |-------|--------------------|
//! | 0     | favorite flag      |
//! | 1     | location           |
//! | 2     | server name        |
//! | 3     | map                |
//! | 4     | player count (raw) |
//! | 5     | game mode          |
//! | 6     | address            |
//!
//! A row with fewer than [`MIN_COLUMNS`] cells, or with an empty name or
//! address, is discarded whole — partial records are never emitted.

use fragwatch_core::ServerRecord;
use scraper::{Html, Selector};

/// Selector the scraper waits on before capturing the page.
pub(crate) const TABLE_SELECTOR: &str = "table#serverlist";

const ROW_SELECTOR: &str = "table#serverlist tbody tr";
const CELL_SELECTOR: &str = "td";

/// Minimum cells for a row to qualify as a [`ServerRecord`].
const MIN_COLUMNS: usize = 7;

const COL_LOCATION: usize = 1;
const COL_NAME: usize = 2;
const COL_MAP: usize = 3;
const COL_PLAYERS: usize = 4;
const COL_MODE: usize = 5;
const COL_ADDRESS: usize = 6;

/// Substrings that place a server in the target region, matched
/// case-insensitively against both the location column and the server name
/// (operators often tag the region in the name when the location column is
/// a bare flag icon).
const REGION_MARKERS: &[&str] = &[
    "oceania",
    "australia",
    "sydney",
    "brisbane",
    "new zealand",
    "auckland",
];

/// Outcome of one parse pass over the rendered table.
///
/// `rows_seen`/`rows_discarded` let the caller tell a quiet region apart
/// from a table whose rows no longer parse at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub records: Vec<ServerRecord>,
    pub rows_seen: usize,
    pub rows_discarded: usize,
}

/// Extracts server records from the rendered listing-page HTML.
#[must_use]
pub fn parse_server_table(html: &str) -> ParsedTable {
    let document = Html::parse_document(html);
    let rows = selector(ROW_SELECTOR);
    let cells = selector(CELL_SELECTOR);

    let mut records = Vec::new();
    let mut rows_seen = 0usize;
    let mut rows_discarded = 0usize;

    for row in document.select(&rows) {
        rows_seen += 1;
        let columns: Vec<String> = row
            .select(&cells)
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect();

        match record_from_columns(&columns) {
            Some(record) => records.push(record),
            None => rows_discarded += 1,
        }
    }

    ParsedTable {
        records,
        rows_seen,
        rows_discarded,
    }
}

/// True when the record's location or name carries one of the fixed
/// region markers. A pure predicate: selects, never mutates.
#[must_use]
pub fn matches_region(record: &ServerRecord) -> bool {
    let location = record.location.to_lowercase();
    let name = record.name.to_lowercase();
    REGION_MARKERS
        .iter()
        .any(|marker| location.contains(marker) || name.contains(marker))
}

fn record_from_columns(columns: &[String]) -> Option<ServerRecord> {
    if columns.len() < MIN_COLUMNS {
        return None;
    }

    let name = columns[COL_NAME].clone();
    let address = columns[COL_ADDRESS].clone();
    if name.is_empty() || address.is_empty() {
        return None;
    }

    Some(ServerRecord {
        address,
        name,
        map: columns[COL_MAP].clone(),
        game_mode: columns[COL_MODE].clone(),
        player_count_raw: columns[COL_PLAYERS].clone(),
        location: columns[COL_LOCATION].clone(),
        players: Vec::new(),
    })
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("selector literal is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> String {
        let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
        format!("<tr>{tds}</tr>")
    }

    fn page(rows: &[String]) -> String {
        format!(
            "<html><body><table id=\"serverlist\"><tbody>{}</tbody></table></body></html>",
            rows.concat()
        )
    }

    #[test]
    fn parses_a_full_row() {
        let html = page(&[row(&[
            "★",
            "Sydney, Australia",
            "Rocket Arena 24/7",
            "bloodrun",
            "9/16",
            "Clan Arena",
            "103.1.2.3:27960",
        ])]);
        let parsed = parse_server_table(&html);
        assert_eq!(parsed.rows_seen, 1);
        assert_eq!(parsed.rows_discarded, 0);
        assert_eq!(parsed.records.len(), 1);

        let record = &parsed.records[0];
        assert_eq!(record.address, "103.1.2.3:27960");
        assert_eq!(record.name, "Rocket Arena 24/7");
        assert_eq!(record.map, "bloodrun");
        assert_eq!(record.game_mode, "Clan Arena");
        assert_eq!(record.player_count_raw, "9/16");
        assert_eq!(record.location, "Sydney, Australia");
        assert!(record.players.is_empty());
    }

    #[test]
    fn trims_cell_whitespace() {
        let html = page(&[row(&[
            "",
            "  Auckland ",
            " Duel Haven\n",
            "aerowalk",
            "2/2",
            "Duel",
            " 121.9.8.7:27960 ",
        ])]);
        let parsed = parse_server_table(&html);
        assert_eq!(parsed.records[0].name, "Duel Haven");
        assert_eq!(parsed.records[0].address, "121.9.8.7:27960");
    }

    #[test]
    fn discards_short_rows() {
        let html = page(&[row(&["", "Sydney", "Half a row"])]);
        let parsed = parse_server_table(&html);
        assert_eq!(parsed.rows_seen, 1);
        assert_eq!(parsed.rows_discarded, 1);
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn discards_rows_missing_name_or_address() {
        let missing_address = row(&["", "Sydney", "No Address", "dm6", "0/8", "FFA", ""]);
        let missing_name = row(&["", "Sydney", "", "dm6", "0/8", "FFA", "1.2.3.4:27960"]);
        let html = page(&[missing_address, missing_name]);
        let parsed = parse_server_table(&html);
        assert_eq!(parsed.rows_seen, 2);
        assert_eq!(parsed.rows_discarded, 2);
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn tolerates_extra_columns() {
        let html = page(&[row(&[
            "",
            "Brisbane",
            "CTF Central",
            "courtyard",
            "10/12",
            "CTF",
            "45.6.7.8:27960",
            "ping: 12",
        ])]);
        let parsed = parse_server_table(&html);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].address, "45.6.7.8:27960");
    }

    #[test]
    fn no_table_means_no_rows_seen() {
        let parsed = parse_server_table("<html><body><p>maintenance</p></body></html>");
        assert_eq!(parsed.rows_seen, 0);
        assert_eq!(parsed.rows_discarded, 0);
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn region_match_on_location_is_case_insensitive() {
        let record = ServerRecord {
            address: "1.2.3.4:27960".into(),
            name: "Some Server".into(),
            map: String::new(),
            game_mode: String::new(),
            player_count_raw: String::new(),
            location: "SYDNEY, AUSTRALIA".into(),
            players: Vec::new(),
        };
        assert!(matches_region(&record));
    }

    #[test]
    fn region_match_falls_back_to_server_name() {
        let record = ServerRecord {
            address: "1.2.3.4:27960".into(),
            name: "Auckland FFA #2".into(),
            map: String::new(),
            game_mode: String::new(),
            player_count_raw: String::new(),
            location: "??".into(),
            players: Vec::new(),
        };
        assert!(matches_region(&record));
    }

    #[test]
    fn out_of_region_record_is_rejected() {
        let record = ServerRecord {
            address: "1.2.3.4:27960".into(),
            name: "Frankfurt Duel".into(),
            map: String::new(),
            game_mode: String::new(),
            player_count_raw: String::new(),
            location: "Frankfurt, Germany".into(),
            players: Vec::new(),
        };
        assert!(!matches_region(&record));
    }
}
