pub mod images;
pub mod rows;
pub mod status;
pub mod tables;

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::record::FigurineRecord;
use crate::wiki;

static WIKITABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.wikitable").unwrap());

/// Extraction knobs. The extended variant turns on both `classify_status`
/// and `canonical_images`; they are kept separate so neither implies the
/// other.
#[derive(Debug, Clone)]
pub struct Options {
    pub classify_status: bool,
    pub canonical_images: bool,
    /// Origin used to absolutize path-relative URLs.
    pub base_origin: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            classify_status: false,
            canonical_images: false,
            base_origin: wiki::origin(wiki::DEFAULT_LANG),
        }
    }
}

/// Extract one record per data row of every wikitable whose header row
/// matches the catalog schema. Tables and rows that do not match are
/// skipped silently; this never fails on malformed markup.
pub fn extract_records(html: &str, opts: &Options) -> Vec<FigurineRecord> {
    let doc = Html::parse_document(html);
    let mut records = Vec::new();

    for table in doc.select(&WIKITABLE_SEL) {
        let Some(found) = tables::locate(table) else {
            continue;
        };
        for row in found.data_rows {
            if let Some(record) = rows::extract_record(row, &found.index, opts) {
                records.push(record);
            }
        }
    }

    records
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Status;

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/krasnale.html").unwrap()
    }

    fn extended() -> Options {
        Options {
            classify_status: true,
            canonical_images: true,
            ..Options::default()
        }
    }

    #[test]
    fn catalog_rows_extracted_in_order() {
        let records = extract_records(&fixture(), &Options::default());
        assert_eq!(records.len(), 6);
        assert_eq!(records[0].name, "Papa Krasnal");
        assert_eq!(records[0].coordinates, "51.1079, 17.0385");
        assert_eq!(records[0].address, "ul. Świdnicka 12");
        assert_eq!(records[0].author, "Tomasz Moczek");
        // Internal whitespace collapsed
        assert_eq!(records[0].location, "przy wejściu do przejścia");
    }

    #[test]
    fn legend_and_infobox_tables_contribute_nothing() {
        // Fixture has a legend wikitable (wrong headers) and an infobox
        // (no wikitable class); only the catalog table yields records.
        let records = extract_records(&fixture(), &Options::default());
        assert!(records.iter().all(|r| r.name != "czerwony"));
    }

    #[test]
    fn base_variant_keeps_thumbnails_and_omits_status() {
        let records = extract_records(&fixture(), &Options::default());
        assert!(records.iter().all(|r| r.status.is_none()));
        // img thumbnail and the anchor's original URL both survive
        assert_eq!(
            records[0].images,
            vec![
                "https://upload.wikimedia.org/wikipedia/commons/1/1b/Foo.jpg".to_string(),
                "https://upload.wikimedia.org/wikipedia/commons/thumb/1/1b/Foo.jpg/60px-Foo.jpg"
                    .to_string(),
            ]
        );
        let json = serde_json::to_string(&records).unwrap();
        assert!(!json.contains("\"status\""));
    }

    #[test]
    fn extended_variant_statuses() {
        let records = extract_records(&fixture(), &extended());
        let statuses: Vec<Status> = records.iter().map(|r| r.status.unwrap()).collect();
        assert_eq!(
            statuses,
            vec![
                Status::Normal,
                Status::Missing,
                Status::NotInWroclaw,
                Status::NoImage,
                Status::Normal,
                Status::NoImage,
            ]
        );
    }

    #[test]
    fn extended_variant_collapses_thumbnails() {
        let records = extract_records(&fixture(), &extended());
        // Thumbnail and original-file anchor dedupe to one canonical URL
        assert_eq!(
            records[0].images,
            vec!["https://upload.wikimedia.org/wikipedia/commons/1/1b/Foo.jpg".to_string()]
        );
    }

    #[test]
    fn short_row_degrades_to_empty_fields() {
        let records = extract_records(&fixture(), &extended());
        let short = &records[5];
        assert_eq!(short.name, "Krasnal Bez Adresu");
        assert_eq!(short.address, "");
        assert_eq!(short.author, "");
        assert_eq!(short.location, "");
        assert!(short.images.is_empty());
        assert_eq!(short.status, Some(Status::NoImage));
    }

    #[test]
    fn json_round_trip() {
        let records = extract_records(&fixture(), &extended());
        let json = serde_json::to_string_pretty(&records).unwrap();
        let parsed: Vec<FigurineRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }
}
