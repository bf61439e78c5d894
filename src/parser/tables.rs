use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

static TR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static TH_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());

// Bracketed footnote markers like [1] or [a]
static FOOTNOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]+\]").unwrap());

pub const COL_COORDINATES: &str = "Współrzędne";
pub const COL_NAME: &str = "Imię";
pub const COL_ADDRESS: &str = "Adres";
pub const COL_AUTHOR: &str = "Autor";
pub const COL_LOCATION: &str = "Lokalizacja";
pub const COL_IMAGE: &str = "Zdjęcie";

/// All six labels must be present in a header row for the table to match.
pub const TARGET_COLUMNS: [&str; 6] = [
    COL_COORDINATES,
    COL_NAME,
    COL_ADDRESS,
    COL_AUTHOR,
    COL_LOCATION,
    COL_IMAGE,
];

/// Column label → position among the header row's `<th>` cells.
/// Duplicate labels resolve to the last occurrence.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn get(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }
}

/// A matched table: its column index plus the rows after the header.
pub struct TableMatch<'a> {
    pub index: ColumnIndex,
    pub data_rows: Vec<ElementRef<'a>>,
}

/// Scan a table's rows top-to-bottom for the first `<th>` row whose
/// normalized labels contain all six target columns. Tables without one
/// simply don't match; that is not an error.
pub fn locate(table: ElementRef<'_>) -> Option<TableMatch<'_>> {
    let all_rows: Vec<ElementRef> = table.select(&TR_SEL).collect();

    for (row_idx, row) in all_rows.iter().enumerate() {
        let headers: Vec<String> = row
            .select(&TH_SEL)
            .map(|th| clean_header_text(&th.text().collect::<String>()))
            .collect();
        if headers.is_empty() {
            continue;
        }
        if !TARGET_COLUMNS.iter().all(|col| headers.iter().any(|h| h == col)) {
            continue;
        }

        let positions = headers
            .into_iter()
            .enumerate()
            .map(|(i, h)| (h, i))
            .collect();
        return Some(TableMatch {
            index: ColumnIndex { positions },
            data_rows: all_rows[row_idx + 1..].to_vec(),
        });
    }

    None
}

/// Normalize a header label: drop footnote markers, collapse all
/// whitespace (including NBSP) to single spaces, trim.
fn clean_header_text(raw: &str) -> String {
    let without_refs = FOOTNOTE_RE.replace_all(raw, "");
    without_refs.split_whitespace().collect::<Vec<_>>().join(" ")
}
