// src/core/sanitize.rs
use crate::config::consts::PLACEHOLDER_PREFIX;

/// Tokens read as a missing value rather than text.
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan",
    "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a",
    "nan", "null",
];

/// Collapse runs of whitespace (including NBSP) into one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

pub fn is_missing_token(s: &str) -> bool {
    MISSING_TOKENS.contains(&s)
}

/// Label given to a header cell that had no text.
pub fn placeholder(col: usize, level: Option<usize>) -> String {
    match level {
        None => format!("{PLACEHOLDER_PREFIX}: {col}"),
        Some(l) => format!("{PLACEHOLDER_PREFIX}: {col}_level_{l}"),
    }
}

/// Case-insensitive check for the placeholder prefix.
pub fn is_placeholder(name: &str) -> bool {
    let prefix = PLACEHOLDER_PREFIX.len();
    name.len() >= prefix
        && name.is_char_boundary(prefix)
        && name[..prefix].eq_ignore_ascii_case(PLACEHOLDER_PREFIX)
}

/// Remove `sep` thousands separators, but only when every group after the
/// first has exactly three digits (`1,234,567.5`). Anything else is returned as is.
pub fn strip_thousands(s: &str, sep: char) -> std::borrow::Cow<'_, str> {
    if !s.contains(sep) {
        return s.into();
    }
    let unsigned = s.trim_start_matches(['+', '-']);
    let int_part = unsigned.split(['.', 'e', 'E']).next().unwrap_or("");
    let mut groups = int_part.split(sep);
    let head_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()));
    let rest_ok = groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()));
    // separators may only appear in the integer part
    let tail_clean = !unsigned[int_part.len()..].contains(sep);
    if head_ok && rest_ok && tail_clean {
        s.replace(sep, "").into()
    } else {
        s.into()
    }
}

pub fn parse_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

pub fn parse_float(s: &str) -> Option<f64> {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    let lower = body.to_ascii_lowercase();
    if lower == "inf" || lower == "infinity" {
        return s.parse().ok();
    }
    if !body.bytes().any(|b| b.is_ascii_digit())
        || !body.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }
    s.parse().ok()
}
