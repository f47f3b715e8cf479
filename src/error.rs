// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Fetcher failures. Retried by the caller's policy, surfaced once exhausted.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

/// Table Matcher / Table Parser failures. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No matching tables found on the page.")]
    NoMatchingTable,

    #[error("table_index {index} out of range; found {count} matching tables")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Failed to parse table into rows and columns.")]
    ParseFailed,
}

/// Shape guards on `ExtractedTable`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("column '{name}' has {found} values; expected {expected}")]
    Ragged { name: String, expected: usize, found: usize },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("{}: {source}", .path.display())]
    Csv { path: PathBuf, #[source] source: csv::Error },

    #[error("{}: {source}", .path.display())]
    Json { path: PathBuf, #[source] source: serde_json::Error },

    #[error("Path exists but is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("CSV not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("CSV has no header row: {}", .0.display())]
    EmptySource(PathBuf),

    #[error("line {line}: expected {expected} fields, saw {found}")]
    RaggedRow { line: u64, expected: usize, found: usize },

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Crate-level error; what the entry points print.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Import(#[from] ImportError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
