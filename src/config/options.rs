// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

/// Everything one `scrape` run needs, passed explicitly into the runner.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrapeOptions {
    pub url: String,
    pub fetch: FetchOptions,
    pub matching: MatchOptions,
    pub output: OutputTargets,
    pub preview: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            url: s!(DEFAULT_URL),
            fetch: FetchOptions::default(),
            matching: MatchOptions::default(),
            output: OutputTargets::default(),
            preview: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub retries: u32,
    pub backoff: f64,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retries: DEFAULT_RETRIES,
            backoff: DEFAULT_BACKOFF,
            user_agent: s!(USER_AGENT),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchOptions {
    /// Class tokens a table must carry (all of them, any order).
    pub required: Vec<String>,
    /// Single class used when nothing carries the full set. `None` disables the fallback.
    pub fallback_class: Option<String>,
    /// Zero-based pick among the candidates.
    pub table_index: usize,
}

impl MatchOptions {
    /// Split a space-separated class string into tokens.
    pub fn parse_classes(class_str: &str) -> Vec<String> {
        class_str
            .split_ascii_whitespace()
            .map(String::from)
            .collect()
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            required: Self::parse_classes(DEFAULT_CLASS),
            fallback_class: Some(s!(FALLBACK_CLASS)),
            table_index: 0,
        }
    }
}

/// Where the Writer puts the table. Both `None` means preview only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputTargets {
    pub csv: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

impl Default for OutputTargets {
    fn default() -> Self {
        Self {
            csv: Some(PathBuf::from(DEFAULT_OUT_CSV)),
            json: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportOptions {
    pub csv: PathBuf,
    pub db: PathBuf,
    pub table: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            csv: PathBuf::from(DEFAULT_OUT_CSV),
            db: PathBuf::from(DEFAULT_DB),
            table: s!(DEFAULT_TABLE),
        }
    }
}
