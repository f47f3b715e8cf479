// src/core/html.rs
//
// Table Matcher: find the `<table>` elements whose class attribute carries a
// required set of tokens, fall back to a single generic class when none do,
// and pick one by index.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::config::options::MatchOptions;
use crate::error::ExtractError;

static SELECTOR_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));

/// Required class tokens. Order and repeats in the source string do not matter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassSet(BTreeSet<String>);

impl ClassSet {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn parse(class_str: &str) -> Self {
        Self::new(class_str.split_ascii_whitespace())
    }

    /// Every required token is present on the candidate. Exact, case-sensitive.
    pub fn is_subset_of(&self, classes: &BTreeSet<&str>) -> bool {
        self.0.iter().all(|c| classes.contains(c.as_str()))
    }
}

/// A `<table>` in the document with its class tokens as written.
#[derive(Clone, Debug)]
pub struct TableCandidate<'a> {
    pub element: ElementRef<'a>,
    pub classes: BTreeSet<&'a str>,
}

impl<'a> TableCandidate<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element, classes: element.value().classes().collect() }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// Outcome of matching: the chosen table plus how it was found.
#[derive(Clone, Debug)]
pub struct Selection<'a> {
    pub table: TableCandidate<'a>,
    pub index: usize,
    pub candidates: usize,
    pub via_fallback: bool,
}

/// Every table in document order (nested tables included).
pub fn all_tables(doc: &Html) -> Vec<TableCandidate<'_>> {
    doc.select(&SELECTOR_TABLE).map(TableCandidate::new).collect()
}

/// Tables whose classes are a superset of `required`.
pub fn matching_tables<'a>(doc: &'a Html, required: &ClassSet) -> Vec<TableCandidate<'a>> {
    all_tables(doc)
        .into_iter()
        .filter(|t| required.is_subset_of(&t.classes))
        .collect()
}

/// Tables carrying the single `class` token.
pub fn tables_with_class<'a>(doc: &'a Html, class: &str) -> Vec<TableCandidate<'a>> {
    all_tables(doc)
        .into_iter()
        .filter(|t| t.has_class(class))
        .collect()
}

/// Run the match: exact set first, then the fallback class, then index selection.
pub fn select_table<'a>(doc: &'a Html, opts: &MatchOptions) -> Result<Selection<'a>, ExtractError> {
    let required = ClassSet::new(opts.required.iter().map(String::as_str));

    let mut candidates = matching_tables(doc, &required);
    let mut via_fallback = false;
    logd!(required = ?required, count = candidates.len(), "tables matching required classes");

    if candidates.is_empty() {
        if let Some(fallback) = opts.fallback_class.as_deref() {
            candidates = tables_with_class(doc, fallback);
            via_fallback = true;
            logw!(
                "no table carries all of {:?}; falling back to class '{}' ({} found)",
                opts.required, fallback, candidates.len()
            );
        }
    }

    if candidates.is_empty() {
        return Err(ExtractError::NoMatchingTable);
    }

    let count = candidates.len();
    let index = opts.table_index;
    if index >= count {
        return Err(ExtractError::IndexOutOfRange { index, count });
    }

    let table = candidates.swap_remove(index);
    logf!("selected table {} of {} candidates", index, count);
    Ok(Selection { table, index, candidates: count, via_fallback })
}
