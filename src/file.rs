// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::config::options::OutputTargets;
use crate::data::ExtractedTable;
use crate::error::WriteError;

/// Write the table to every configured target, creating parent directories.
/// Returns the paths written, CSV first. No targets, no writes.
pub fn write_outputs(table: &ExtractedTable, targets: &OutputTargets) -> Result<Vec<PathBuf>, WriteError> {
    let mut written = Vec::with_capacity(2);
    if let Some(path) = &targets.csv {
        write_csv(path, table)?;
        written.push(path.clone());
    }
    if let Some(path) = &targets.json {
        write_json(path, table)?;
        written.push(path.clone());
    }
    Ok(written)
}

/// Create/truncate `path` and write the table as CSV.
pub fn write_csv(path: &Path, table: &ExtractedTable) -> Result<(), WriteError> {
    let out = create_with_parents(path)?;
    crate::csv::write_table(out, table).map_err(|source| WriteError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    logf!("wrote {} rows to {}", table.row_count(), path.display());
    Ok(())
}

/// Create/truncate `path` and write the table as a pretty JSON array of row objects.
pub fn write_json(path: &Path, table: &ExtractedTable) -> Result<(), WriteError> {
    let mut out = create_with_parents(path)?;
    let rows: Vec<_> = table.rows().collect();
    serde_json::to_writer_pretty(&mut out, &rows).map_err(|source| WriteError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    out.write_all(b"\n")
        .and_then(|_| out.flush())
        .map_err(|source| WriteError::Io { path: path.to_path_buf(), source })?;
    logf!("wrote {} rows to {}", table.row_count(), path.display());
    Ok(())
}

fn create_with_parents(path: &Path) -> Result<BufWriter<File>, WriteError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let file = File::create(path).map_err(|source| WriteError::Io { path: path.to_path_buf(), source })?;
    Ok(BufWriter::new(file))
}

pub fn ensure_directory(dir: &Path) -> Result<(), WriteError> {
    if dir.exists() && !dir.is_dir() {
        return Err(WriteError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| WriteError::Io { path: dir.to_path_buf(), source })?;
    }
    Ok(())
}
