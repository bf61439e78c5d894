use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use super::images;
use super::status;
use super::tables::{
    ColumnIndex, COL_ADDRESS, COL_AUTHOR, COL_COORDINATES, COL_IMAGE, COL_LOCATION, COL_NAME,
};
use super::Options;
use crate::record::FigurineRecord;

static CELL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td, th").unwrap());

/// Build one record from a data row. Returns `None` only for rows with no
/// cells at all; missing or out-of-range columns degrade to empty values.
pub fn extract_record(
    row: ElementRef<'_>,
    index: &ColumnIndex,
    opts: &Options,
) -> Option<FigurineRecord> {
    let cells = row_cells(row);
    if cells.is_empty() {
        return None;
    }

    let image_cell = index.get(COL_IMAGE).and_then(|i| cells.get(i).copied());
    let images = images::collect(image_cell, opts);
    let status = opts
        .classify_status
        .then(|| status::classify(row, &images));

    Some(FigurineRecord {
        coordinates: cell_text(&cells, index, COL_COORDINATES),
        name: cell_text(&cells, index, COL_NAME),
        address: cell_text(&cells, index, COL_ADDRESS),
        author: cell_text(&cells, index, COL_AUTHOR),
        location: cell_text(&cells, index, COL_LOCATION),
        images,
        status,
    })
}

/// Direct `<td>`/`<th>` children of a row.
pub(crate) fn direct_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .collect()
}

/// Cells of a data row: direct children, falling back to all descendant
/// cells for rows restructured by row-spanning.
fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let cells = direct_cells(row);
    if !cells.is_empty() {
        return cells;
    }
    row.select(&CELL_SEL).collect()
}

fn cell_text(cells: &[ElementRef<'_>], index: &ColumnIndex, label: &str) -> String {
    index
        .get(label)
        .and_then(|i| cells.get(i))
        .map(|cell| collapsed_text(*cell))
        .unwrap_or_default()
}

/// Visible text with all internal whitespace collapsed to single spaces.
pub(crate) fn collapsed_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());

    #[test]
    fn text_whitespace_is_collapsed() {
        let doc = Html::parse_document(
            "<table><tr><td>  ul.\n  Świdnicka \u{a0} 12 <b>a</b></td></tr></table>",
        );
        let row = doc.select(&TR).next().unwrap();
        let cells = direct_cells(row);
        assert_eq!(collapsed_text(cells[0]), "ul. Świdnicka 12 a");
    }

    #[test]
    fn direct_cells_count_both_td_and_th() {
        let doc = Html::parse_document("<table><tr><th>h</th><td>a</td><td>b</td></tr></table>");
        let row = doc.select(&TR).next().unwrap();
        assert_eq!(direct_cells(row).len(), 3);
    }

    #[test]
    fn empty_row_has_no_cells() {
        let doc = Html::parse_document("<table><tr></tr></table>");
        let row = doc.select(&TR).next().unwrap();
        assert!(row_cells(row).is_empty());
    }
}
