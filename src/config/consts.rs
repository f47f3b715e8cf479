// src/config/consts.rs

// Net config
pub const DEFAULT_URL: &str = "https://en.wikipedia.org/wiki/2025_NFL_draft";
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF: f64 = 1.5;

// Matching
pub const DEFAULT_CLASS: &str = "wikitable sortable plainrowheaders jquery-tablesorter";
pub const FALLBACK_CLASS: &str = "wikitable";

// Parsing
pub const PLACEHOLDER_PREFIX: &str = "Unnamed";
pub const MAX_COLSPAN: usize = 1000;
pub const MAX_ROWSPAN: usize = 65534;

// Export
pub const DEFAULT_OUT_CSV: &str = "data/2025_nfl_draft_table.csv";
pub const PREVIEW_ROWS: usize = 10;

// Import
pub const DEFAULT_DB: &str = "data/draft.sql";
pub const DEFAULT_TABLE: &str = "draft";
