// src/specs/table.rs
//
// Table Parser: grid -> ExtractedTable.
//
// Column shape:
// - one header row: labels as written, empty ones become `Unnamed: {i}`
// - several header rows: each column's labels joined with a space
//   (empties, placeholders and row-spanned repeats left out)
// - no header rows: columns named `0`, `1`, ...
// Placeholder columns are dropped afterwards, duplicates get `.1`, `.2`, ...

use std::collections::{HashMap, HashSet};

use scraper::{ElementRef, Html};

use crate::config::options::MatchOptions;
use crate::core::grid::{read_grid, Grid};
use crate::core::html::select_table;
use crate::core::sanitize::{is_placeholder, placeholder};
use crate::data::{infer_column, Column, ExtractedTable, InferOptions};
use crate::error::{DataError, Error, ExtractError};

/// Page cells may carry `,` thousands separators.
const PAGE_INFER: InferOptions = InferOptions { thousands: Some(',') };

/// Match and parse in one go, from raw markup.
pub fn extract_from_html(markup: &str, opts: &MatchOptions) -> Result<ExtractedTable, Error> {
    let doc = Html::parse_document(markup);
    let selection = select_table(&doc, opts)?;
    parse_table(selection.table.element)
}

/// Parse one `<table>` element.
pub fn parse_table(table: ElementRef<'_>) -> Result<ExtractedTable, Error> {
    let grid = read_grid(table);
    if grid.is_empty() {
        return Err(ExtractError::ParseFailed.into());
    }
    Ok(from_grid(grid)?)
}

/// Header handling and cleanup over an already expanded grid.
pub fn from_grid(grid: Grid) -> Result<ExtractedTable, DataError> {
    let width = grid.width();
    let names = column_names(&grid.header, width);
    logd!(levels = header_levels(&grid.header).len(), width, rows = grid.body.len(), "parsed table grid");

    let mut raw_cols: Vec<Vec<String>> = vec![Vec::with_capacity(grid.body.len()); width];
    for row in grid.body {
        let mut cells = row.into_iter();
        for col in raw_cols.iter_mut() {
            col.push(cells.next().unwrap_or_default());
        }
    }

    let (kept, dropped): (Vec<_>, Vec<_>) = names
        .into_iter()
        .zip(raw_cols)
        .partition(|(name, _)| !is_placeholder(name));
    if !dropped.is_empty() {
        logf!("dropped {} unnamed column(s)", dropped.len());
    }

    let (names, raws): (Vec<String>, Vec<Vec<String>>) = kept.into_iter().unzip();
    let columns = dedupe_names(names)
        .into_iter()
        .zip(raws)
        .map(|(name, raw)| Column::new(name, infer_column(raw, PAGE_INFER)))
        .collect();
    ExtractedTable::new(columns)
}

/// Header rows that carry any text. Empty rows are not header levels.
fn header_levels(header: &[Vec<String>]) -> Vec<&Vec<String>> {
    header.iter().filter(|r| r.iter().any(|t| !t.is_empty())).collect()
}

/// One trimmed name per grid column, placeholders for unlabeled ones.
pub fn column_names(header: &[Vec<String>], width: usize) -> Vec<String> {
    let levels = header_levels(header);
    match levels.len() {
        0 => (0..width).map(|i| i.to_string()).collect(),
        1 => (0..width)
            .map(|i| match levels[0].get(i).map(|s| s.trim()) {
                Some(label) if !label.is_empty() => s!(label),
                _ => placeholder(i, None),
            })
            .collect(),
        _ => (0..width).map(|i| flatten_column(&levels, i)).collect(),
    }
}

/// Join one column's labels across header levels.
fn flatten_column(levels: &[&Vec<String>], col: usize) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(levels.len());
    for level in levels {
        let label = level.get(col).map_or("", |s| s.trim());
        if label.is_empty() || is_placeholder(label) {
            continue;
        }
        if parts.last() != Some(&label) {
            parts.push(label);
        }
    }
    if parts.is_empty() {
        placeholder(col, None)
    } else {
        parts.join(" ")
    }
}

/// `a, b, a, a` -> `a, b, a.1, a.2`.
pub fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                return name;
            }
            let mut k = *count - 1;
            loop {
                let candidate = format!("{name}.{k}");
                if taken.insert(candidate.clone()) {
                    return candidate;
                }
                k += 1;
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::data::Cell;

    fn rows(v: &[&[&str]]) -> Vec<Vec<String>> {
        v.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect()
    }

    fn names(t: &ExtractedTable) -> Vec<&str> {
        t.column_names().collect()
    }

    #[test]
    fn single_level_placeholders_are_dropped() {
        let grid = Grid {
            header: rows(&[&["Rnd", "", "Player"]]),
            body: rows(&[&["1", "x", "Cam Ward"], &["1", "", "Travis Hunter"]]),
        };
        let t = from_grid(grid).unwrap();
        assert_eq!(names(&t), vec!["Rnd", "Player"]);
        assert_eq!(t.columns()[0].cells, vec![Cell::Int(1), Cell::Int(1)]);
    }

    #[test]
    fn multi_level_flattening() {
        let header = rows(&[&["Player", "Pos", "Pos", ""], &["", "2025", "2024", ""]]);
        assert_eq!(
            column_names(&header, 4),
            vec!["Player", "Pos 2025", "Pos 2024", "Unnamed: 3"]
        );
    }

    #[test]
    fn row_spanned_labels_appear_once() {
        let header = rows(&[&["Player", "Stats"], &["Player", "Yds"]]);
        assert_eq!(column_names(&header, 2), vec!["Player", "Stats Yds"]);
    }

    #[test]
    fn empty_header_rows_are_not_levels() {
        let header = rows(&[&["", ""], &["A", "B"]]);
        assert_eq!(column_names(&header, 2), vec!["A", "B"]);
    }

    #[test]
    fn no_header_gives_positional_names() {
        assert_eq!(column_names(&[], 3), vec!["0", "1", "2"]);
    }

    #[test]
    fn short_header_pads_with_placeholders() {
        let grid = Grid {
            header: rows(&[&["A"]]),
            body: rows(&[&["1", "2"]]),
        };
        let t = from_grid(grid).unwrap();
        assert_eq!(names(&t), vec!["A"]);
    }

    #[test]
    fn duplicate_names_get_suffixes() {
        let out = dedupe_names(vec![s!("a"), s!("b"), s!("a"), s!("a.1"), s!("a")]);
        assert_eq!(out, vec!["a", "b", "a.2", "a.1", "a.3"]);
    }

    #[test]
    fn header_only_table_has_zero_rows() {
        let grid = Grid { header: rows(&[&["A", "B"]]), body: vec![] };
        let t = from_grid(grid).unwrap();
        assert_eq!(t.row_count(), 0);
        assert_eq!(t.column_count(), 2);
    }

    #[test]
    fn table_of_empty_rows_fails_to_parse() {
        let err = extract_from_html(
            "<table class=\"wikitable\"><tr></tr><tr></tr></table>",
            &MatchOptions { required: vec![s!("wikitable")], ..MatchOptions::default() },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Extract(ExtractError::ParseFailed)));
    }

    #[test]
    fn empty_table_fails_to_parse() {
        let err = extract_from_html(
            "<table class=\"wikitable\"></table>",
            &MatchOptions { required: vec![s!("wikitable")], ..MatchOptions::default() },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Extract(ExtractError::ParseFailed)));
    }
}
