// src/store.rs
//
// Importer: load a CSV produced by the scraper into one SQLite table,
// dropping and recreating that table on every run.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection};

use crate::config::options::ImportOptions;
use crate::data::{Cell, ColumnKind, ExtractedTable};
use crate::error::ImportError;
use crate::file::ensure_directory;

/// What one import run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows: usize,
    pub columns: usize,
}

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Cell::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Cell::Int(n) => ToSqlOutput::Owned(Value::Integer(*n)),
            Cell::Float(x) if x.is_nan() => ToSqlOutput::Owned(Value::Null),
            Cell::Float(x) => ToSqlOutput::Owned(Value::Real(*x)),
            Cell::Missing => ToSqlOutput::Owned(Value::Null),
        })
    }
}

/// SQLite column type for an inferred column.
pub fn sql_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Int => "INTEGER",
        ColumnKind::Float | ColumnKind::Empty => "REAL",
        ColumnKind::Text => "TEXT",
    }
}

/// Double-quote an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    join!("\"", &name.replace('"', "\"\""), "\"")
}

/// Read `opts.csv` and replace `opts.table` in `opts.db` with its contents.
pub fn import_csv(opts: &ImportOptions) -> Result<ImportSummary, ImportError> {
    if !opts.csv.exists() {
        return Err(ImportError::SourceNotFound(opts.csv.clone()));
    }
    let table = crate::csv::read_table(BufReader::new(File::open(&opts.csv)?))?;
    if table.column_count() == 0 {
        return Err(ImportError::EmptySource(opts.csv.clone()));
    }

    if let Some(parent) = opts.db.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let mut conn = Connection::open(&opts.db)?;
    replace_table(&mut conn, &opts.table, &table)?;
    logf!("imported {} rows into {}:{}", table.row_count(), opts.db.display(), opts.table);

    Ok(ImportSummary { rows: table.row_count(), columns: table.column_count() })
}

/// Drop `name` if present, recreate it from the table's columns, insert every row.
pub fn replace_table(conn: &mut Connection, name: &str, table: &ExtractedTable) -> Result<(), ImportError> {
    let ident = quote_ident(name);
    let column_defs: Vec<String> = table
        .columns()
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), sql_type(c.kind())))
        .collect();

    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {ident};\nCREATE TABLE {ident} ({});",
        column_defs.join(", ")
    ))?;
    logd!(table = name, columns = column_defs.len(), "recreated table");

    {
        let placeholders = vec!["?"; table.column_count()].join(", ");
        let mut stmt = tx.prepare(&format!("INSERT INTO {ident} VALUES ({placeholders})"))?;
        for row in table.rows() {
            stmt.execute(params_from_iter(row.cells()))?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Row count of `name` in `db`.
pub fn count_rows(db: &Path, name: &str) -> Result<usize, ImportError> {
    let conn = Connection::open(db)?;
    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", quote_ident(name)), [], |r| r.get(0))?;
    Ok(usize::try_from(n).unwrap_or(0))
}
