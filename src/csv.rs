// src/csv.rs
use std::io::{Read, Write};

use crate::data::{ExtractedTable, InferOptions};
use crate::error::ImportError;
use crate::specs::table::dedupe_names;

/* ---------------- Writing ---------------- */

/// Header row, then one record per row. No index column; missing cells are empty.
pub fn write_table<W: Write>(w: W, table: &ExtractedTable) -> ::csv::Result<()> {
    let mut out = ::csv::Writer::from_writer(w);
    out.write_record(table.column_names())?;
    for row in table.rows() {
        out.write_record(row.cells().map(|c| c.to_string()))?;
    }
    out.flush()?;
    Ok(())
}

/// Whole table as a CSV string.
pub fn to_csv_string(table: &ExtractedTable) -> ::csv::Result<String> {
    let mut buf = Vec::new();
    write_table(&mut buf, table)?;
    Ok(match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    })
}

/* ---------------- Parsing ---------------- */

/// Read a CSV whose first row names the columns.
///
/// Short rows are padded with missing values; long rows are an error.
/// Repeated names get `.1`, `.2` suffixes. Types are inferred per column
/// without thousands separators. Empty input gives a table with no columns.
pub fn read_table<R: Read>(r: R) -> Result<ExtractedTable, ImportError> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(r);

    let names: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
    if names.is_empty() {
        return Ok(ExtractedTable::default());
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.len() > names.len() {
            return Err(ImportError::RaggedRow {
                line: record.position().map_or(0, |p| p.line()),
                expected: names.len(),
                found: record.len(),
            });
        }
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(ExtractedTable::from_raw_rows(dedupe_names(names), rows, InferOptions::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Cell, Column};

    #[test]
    fn writes_header_then_rows_with_quoting() {
        let t = ExtractedTable::new(vec![
            Column::new("Player", vec![Cell::Text(s!("Ward, Cam")), Cell::Text(s!("Hunter"))]),
            Column::new("Pick", vec![Cell::Int(1), Cell::Missing]),
        ])
        .unwrap();
        let s = to_csv_string(&t).unwrap();
        assert_eq!(s, "Player,Pick\n\"Ward, Cam\",1\nHunter,\n");
    }

    #[test]
    fn reads_types_and_pads_short_rows() {
        let t = read_table("a,b,c\n1,x,2.5\n2,y\n".as_bytes()).unwrap();
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.columns()[0].cells, vec![Cell::Int(1), Cell::Int(2)]);
        assert_eq!(t.columns()[2].cells, vec![Cell::Float(2.5), Cell::Missing]);
    }

    #[test]
    fn long_rows_are_rejected() {
        let err = read_table("a,b\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::RaggedRow { line: 2, expected: 2, found: 3 }));
    }

    #[test]
    fn repeated_headers_are_made_unique() {
        let t = read_table("x,x\n1,2\n".as_bytes()).unwrap();
        assert_eq!(t.column_names().collect::<Vec<_>>(), vec!["x", "x.1"]);
    }

    #[test]
    fn empty_input_has_no_columns() {
        let t = read_table("".as_bytes()).unwrap();
        assert_eq!(t.column_count(), 0);
    }
}
