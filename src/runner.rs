// src/runner.rs
use std::fmt;
use std::path::PathBuf;

use scraper::Html;

use crate::config::consts::PREVIEW_ROWS;
use crate::config::options::ScrapeOptions;
use crate::core::html::select_table;
use crate::core::net::{Fetcher, PageSource};
use crate::data::ExtractedTable;
use crate::error::Result;
use crate::file::write_outputs;
use crate::specs::table::parse_table;

/// Summary of what was produced.
#[derive(Debug)]
pub struct RunSummary {
    pub rows: usize,
    pub columns: usize,
    pub csv: Option<PathBuf>,
    pub json: Option<PathBuf>,
    /// The table came from the fallback class rather than the full class set.
    pub via_fallback: bool,
    /// Rendered first rows, when a preview was asked for.
    pub preview: Option<String>,
    pub table: ExtractedTable,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let saved = |p: &Option<PathBuf>| match p {
            Some(p) => p.display().to_string(),
            None => s!("no"),
        };
        write!(
            f,
            "Done. Rows: {} | Columns: {} | Saved: CSV={} | JSON={}",
            self.rows,
            self.columns,
            saved(&self.csv),
            saved(&self.json)
        )
    }
}

/// Fetch over HTTP, then run the pipeline.
pub fn scrape(opts: &ScrapeOptions) -> Result<RunSummary> {
    let fetcher = Fetcher::new(&opts.fetch)?;
    scrape_with(&fetcher, opts)
}

/// Fetch -> match -> parse -> write, with any page source.
pub fn scrape_with(source: &dyn PageSource, opts: &ScrapeOptions) -> Result<RunSummary> {
    let markup = source.fetch(&opts.url)?;
    logd!(bytes = markup.len(), "fetched page");

    let doc = Html::parse_document(&markup);
    let selection = select_table(&doc, &opts.matching)?;
    let via_fallback = selection.via_fallback;
    let table = parse_table(selection.table.element)?;

    let written = write_outputs(&table, &opts.output)?;
    logd!(files = written.len(), "outputs written");

    let preview = opts.preview.then(|| table.preview(PREVIEW_ROWS));
    Ok(RunSummary {
        rows: table.row_count(),
        columns: table.column_count(),
        csv: opts.output.csv.clone(),
        json: opts.output.json.clone(),
        via_fallback,
        preview,
        table,
    })
}
