// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::config::consts::*;
use crate::config::options::{FetchOptions, ImportOptions, MatchOptions, OutputTargets, ScrapeOptions};
use crate::error::Result;

#[derive(Debug, Parser)]
#[command(name = "scrape")]
#[command(about = "Fetch a web page and save one of its HTML tables as CSV/JSON")]
pub struct ScrapeArgs {
    /// Page to fetch
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Space-separated classes the table must carry
    #[arg(long = "class", default_value = DEFAULT_CLASS)]
    pub class_str: String,

    /// Which matching table to take (0-based)
    #[arg(long, default_value_t = 0)]
    pub table_index: usize,

    /// CSV output path
    #[arg(long, default_value = DEFAULT_OUT_CSV)]
    pub out_csv: PathBuf,

    /// Also write JSON (array of row objects)
    #[arg(long)]
    pub out_json: Option<PathBuf>,

    /// Skip the CSV file
    #[arg(long)]
    pub no_csv: bool,

    /// Print the first rows to stdout
    #[arg(long)]
    pub preview: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Attempts before giving up
    #[arg(long, default_value_t = DEFAULT_RETRIES)]
    pub retries: u32,

    /// Base of the exponential delay between attempts, in seconds
    #[arg(long, default_value_t = DEFAULT_BACKOFF, value_parser = parse_backoff)]
    pub backoff: f64,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Parser)]
#[command(name = "import")]
#[command(about = "Load a scraped CSV into a SQLite table, replacing it")]
pub struct ImportArgs {
    /// Source CSV
    #[arg(long, default_value = DEFAULT_OUT_CSV)]
    pub csv: PathBuf,

    /// SQLite database file
    #[arg(long, default_value = DEFAULT_DB)]
    pub db: PathBuf,

    /// Destination table (dropped and recreated)
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_backoff(s: &str) -> std::result::Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("backoff must be a finite number >= 0, got {s}"));
    }
    Ok(v)
}

impl From<ScrapeArgs> for ScrapeOptions {
    fn from(a: ScrapeArgs) -> Self {
        Self {
            url: a.url,
            fetch: FetchOptions {
                timeout: Duration::from_secs(a.timeout),
                retries: a.retries,
                backoff: a.backoff,
                ..FetchOptions::default()
            },
            matching: MatchOptions {
                required: MatchOptions::parse_classes(&a.class_str),
                table_index: a.table_index,
                ..MatchOptions::default()
            },
            output: OutputTargets {
                csv: (!a.no_csv).then_some(a.out_csv),
                json: a.out_json,
            },
            preview: a.preview,
        }
    }
}

impl From<ImportArgs> for ImportOptions {
    fn from(a: ImportArgs) -> Self {
        Self { csv: a.csv, db: a.db, table: a.table }
    }
}

/// `scrape` entry point: parse args, run, print the summary (and preview).
pub fn run_scrape() -> Result<()> {
    let args = ScrapeArgs::parse();
    crate::log::init(args.verbose);
    let opts = ScrapeOptions::from(args);

    let summary = crate::runner::scrape(&opts)?;
    if let Some(preview) = &summary.preview {
        println!("{preview}");
    }
    println!("{summary}");
    Ok(())
}

/// `import` entry point.
pub fn run_import() -> Result<()> {
    let args = ImportArgs::parse();
    crate::log::init(args.verbose);
    let opts = ImportOptions::from(args);

    let summary = crate::store::import_csv(&opts)?;
    println!(
        "Imported {} into {} as table '{}' ({} rows).",
        opts.csv.display(),
        opts.db.display(),
        opts.table,
        summary.rows
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrape_defaults_match_consts() {
        let opts = ScrapeOptions::from(ScrapeArgs::try_parse_from(["scrape"]).unwrap());
        assert_eq!(opts, ScrapeOptions::default());
    }

    #[test]
    fn scrape_flags_flow_into_options() {
        let args = ScrapeArgs::try_parse_from([
            "scrape", "--class", "wikitable sortable", "--table-index", "2",
            "--out-json", "out/t.json", "--no-csv", "--retries", "5", "--backoff", "0", "-vv",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        let opts = ScrapeOptions::from(args);
        assert_eq!(opts.matching.required, vec!["wikitable", "sortable"]);
        assert_eq!(opts.matching.table_index, 2);
        assert_eq!(opts.output.csv, None);
        assert_eq!(opts.output.json, Some(PathBuf::from("out/t.json")));
        assert_eq!(opts.fetch.retries, 5);
        assert_eq!(opts.fetch.backoff, 0.0);
    }

    #[test]
    fn bad_backoff_and_negative_index_are_usage_errors() {
        assert!(ScrapeArgs::try_parse_from(["scrape", "--backoff", "-1"]).is_err());
        assert!(ScrapeArgs::try_parse_from(["scrape", "--backoff", "NaN"]).is_err());
        assert!(ScrapeArgs::try_parse_from(["scrape", "--table-index", "-1"]).is_err());
    }

    #[test]
    fn import_defaults() {
        let opts = ImportOptions::from(ImportArgs::try_parse_from(["import"]).unwrap());
        assert_eq!(opts, ImportOptions::default());
    }
}
