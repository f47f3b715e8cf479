// src/data.rs
//
// Column-oriented table produced by extraction and consumed by the writers
// and the importer.
//
// - Cell: one scalar, tagged (text / int / float / missing).
// - Column: a name plus its cells, top to bottom.
// - ExtractedTable: columns of equal length with unique names. The
//   constructor is the only way in, so both hold for every instance.

use std::collections::HashSet;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::core::sanitize::{is_missing_token, parse_float, parse_int, strip_thousands};
use crate::error::DataError;

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
    Missing,
}

/// Text form used in CSV and the preview. Missing is empty; whole floats
/// keep a `.0` so they read back as floats.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Int(n) => write!(f, "{n}"),
            Cell::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{x:.1}"),
            Cell::Float(x) => write!(f, "{x}"),
            Cell::Missing => Ok(()),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Int(n) => serializer.serialize_i64(*n),
            Cell::Float(x) if x.is_finite() => serializer.serialize_f64(*x),
            Cell::Float(_) | Cell::Missing => serializer.serialize_none(),
        }
    }
}

/// Storage class a column settled on after inference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Float,
    Text,
    /// Every cell missing.
    Empty,
}

/// Knobs for turning raw strings into cells.
#[derive(Clone, Copy, Debug, Default)]
pub struct InferOptions {
    pub thousands: Option<char>,
}

/// Type one column of raw strings. All-int stays int, int/float mixes
/// become float, anything else keeps its text.
pub fn infer_column(raw: Vec<String>, opts: InferOptions) -> Vec<Cell> {
    let numeric_form = |s: &str| match opts.thousands {
        Some(sep) => strip_thousands(s, sep).into_owned(),
        None => s.to_string(),
    };

    let mut all_int = true;
    let mut all_float = true;
    for v in raw.iter().filter(|v| !is_missing_token(v)) {
        let n = numeric_form(v);
        if all_int && parse_int(&n).is_none() {
            all_int = false;
        }
        if !all_int && parse_float(&n).is_none() {
            all_float = false;
            break;
        }
    }

    raw.into_iter()
        .map(|v| {
            if is_missing_token(&v) {
                return Cell::Missing;
            }
            let n = numeric_form(&v);
            if all_int {
                parse_int(&n).map_or(Cell::Text(v), Cell::Int)
            } else if all_float {
                parse_float(&n).map_or(Cell::Text(v), Cell::Float)
            } else {
                Cell::Text(v)
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self { name: name.into(), cells }
    }

    pub fn kind(&self) -> ColumnKind {
        let mut kind = ColumnKind::Empty;
        for c in &self.cells {
            kind = match (kind, c) {
                (_, Cell::Missing) => kind,
                (_, Cell::Text(_)) | (ColumnKind::Text, _) => return ColumnKind::Text,
                (ColumnKind::Empty | ColumnKind::Int, Cell::Int(_)) => ColumnKind::Int,
                (_, Cell::Float(_)) | (ColumnKind::Float, Cell::Int(_)) => ColumnKind::Float,
            };
        }
        kind
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct ExtractedTable {
    columns: Vec<Column>,
}

impl ExtractedTable {
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for c in &columns {
            if !seen.insert(c.name.as_str()) {
                return Err(DataError::DuplicateColumn(c.name.clone()));
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.cells.len();
            if let Some(bad) = columns.iter().find(|c| c.cells.len() != expected) {
                return Err(DataError::Ragged {
                    name: bad.name.clone(),
                    expected,
                    found: bad.cells.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Build from header names plus row-major raw strings, inferring cell types.
    /// Short rows are padded with missing values.
    pub fn from_raw_rows(
        names: Vec<String>,
        rows: Vec<Vec<String>>,
        opts: InferOptions,
    ) -> Result<Self, DataError> {
        let mut raw_cols: Vec<Vec<String>> = vec![Vec::with_capacity(rows.len()); names.len()];
        for row in rows {
            let mut it = row.into_iter();
            for col in raw_cols.iter_mut() {
                col.push(it.next().unwrap_or_default());
            }
        }
        let columns = names
            .into_iter()
            .zip(raw_cols)
            .map(|(name, raw)| Column::new(name, infer_column(raw, opts)))
            .collect();
        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn row(&self, i: usize) -> Row<'_> {
        Row { table: self, index: i }
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.row_count()).map(|i| self.row(i))
    }

    /// First `n` rows as an aligned text grid with a leading row index.
    pub fn preview(&self, n: usize) -> String {
        let shown = n.min(self.row_count());
        let mut grid: Vec<Vec<String>> = Vec::with_capacity(shown + 1);

        let mut header = vec![s!()];
        header.extend(self.column_names().map(String::from));
        grid.push(header);
        for row in self.rows().take(shown) {
            let mut line = vec![row.index().to_string()];
            line.extend(row.cells().map(|c| c.to_string()));
            grid.push(line);
        }

        let widths: Vec<usize> = (0..grid[0].len())
            .map(|j| grid.iter().map(|r| r[j].chars().count()).max().unwrap_or(0))
            .collect();

        let mut out = s!();
        for line in &grid {
            let padded: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:<w$}"))
                .collect();
            out.push_str(padded.join("  ").trim_end());
            out.push('\n');
        }
        if self.row_count() > shown {
            out.push_str(&format!("... ({} rows x {} columns)\n", self.row_count(), self.column_count()));
        }
        out
    }
}

/// Borrowed view of one record.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    table: &'a ExtractedTable,
    index: usize,
}

impl<'a> Row<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn cells(&self) -> impl Iterator<Item = &'a Cell> + use<'a> {
        let (table, i) = (self.table, self.index);
        table.columns.iter().map(move |c| &c.cells[i])
    }
}

/// A row serializes as an object keyed by column name, in column order.
impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.table.column_count()))?;
        for col in &self.table.columns {
            map.serialize_entry(&col.name, &col.cells[self.index])?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn infers_int_float_text_and_missing() {
        let ints = infer_column(raw(&["1", "", "32"]), InferOptions::default());
        assert_eq!(ints, vec![Cell::Int(1), Cell::Missing, Cell::Int(32)]);

        let floats = infer_column(raw(&["1", "2.5", "NaN"]), InferOptions::default());
        assert_eq!(floats, vec![Cell::Float(1.0), Cell::Float(2.5), Cell::Missing]);

        let text = infer_column(raw(&["7", "QB", "N/A"]), InferOptions::default());
        assert_eq!(text, vec![Cell::Text(s!("7")), Cell::Text(s!("QB")), Cell::Missing]);
    }

    #[test]
    fn thousands_only_when_asked() {
        let page = infer_column(raw(&["1,234", "56"]), InferOptions { thousands: Some(',') });
        assert_eq!(page, vec![Cell::Int(1234), Cell::Int(56)]);

        let csv = infer_column(raw(&["1,234", "56"]), InferOptions::default());
        assert_eq!(csv[0], Cell::Text(s!("1,234")));
    }

    #[test]
    fn column_kind_follows_cells() {
        assert_eq!(Column::new("a", vec![Cell::Missing]).kind(), ColumnKind::Empty);
        assert_eq!(Column::new("a", vec![Cell::Int(1), Cell::Missing]).kind(), ColumnKind::Int);
        assert_eq!(Column::new("a", vec![Cell::Int(1), Cell::Float(0.5)]).kind(), ColumnKind::Float);
        assert_eq!(Column::new("a", vec![Cell::Float(0.5), Cell::Text(s!("x"))]).kind(), ColumnKind::Text);
    }

    #[test]
    fn constructor_rejects_ragged_and_duplicates() {
        let ragged = ExtractedTable::new(vec![
            Column::new("a", vec![Cell::Int(1), Cell::Int(2)]),
            Column::new("b", vec![Cell::Int(1)]),
        ]);
        assert!(matches!(ragged, Err(DataError::Ragged { expected: 2, found: 1, .. })));

        let dup = ExtractedTable::new(vec![
            Column::new("a", vec![]),
            Column::new("a", vec![]),
        ]);
        assert_eq!(dup, Err(DataError::DuplicateColumn(s!("a"))));
    }

    #[test]
    fn from_raw_rows_pads_short_rows() {
        let t = ExtractedTable::from_raw_rows(
            raw(&["Player", "Pick"]),
            vec![raw(&["A", "1"]), raw(&["B"])],
            InferOptions::default(),
        )
        .unwrap();
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.columns()[1].cells, vec![Cell::Int(1), Cell::Missing]);
    }

    #[test]
    fn display_keeps_float_marker() {
        assert_eq!(Cell::Float(3.0).to_string(), "3.0");
        assert_eq!(Cell::Float(2.25).to_string(), "2.25");
        assert_eq!(Cell::Missing.to_string(), "");
    }

    #[test]
    fn row_serializes_in_column_order() {
        let t = ExtractedTable::new(vec![
            Column::new("z", vec![Cell::Text(s!("x"))]),
            Column::new("a", vec![Cell::Missing]),
        ])
        .unwrap();
        let json = serde_json::to_string(&t.row(0)).unwrap();
        assert_eq!(json, r#"{"z":"x","a":null}"#);
    }

    #[test]
    fn preview_limits_rows() {
        let t = ExtractedTable::from_raw_rows(
            raw(&["n"]),
            (0..12).map(|i| vec![i.to_string()]).collect(),
            InferOptions::default(),
        )
        .unwrap();
        let p = t.preview(10);
        assert_eq!(p.lines().count(), 12); // header + 10 rows + footer
        assert!(p.ends_with("... (12 rows x 1 columns)\n"));
    }
}
