// src/core/grid.rs
//
// Table element -> rectangular text grid.
//
// Reads only the rows that belong to this table (not nested ones), splits
// them into header and body sections, expands rowspan/colspan so every slot
// holds its text, and extracts visible cell text.

use std::collections::VecDeque;

use scraper::{ElementRef, Node};

use crate::config::consts::{MAX_COLSPAN, MAX_ROWSPAN};
use crate::core::sanitize::normalize_ws;

/// One `<td>`/`<th>` before span expansion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawCell {
    pub text: String,
    pub is_header: bool,
    pub rowspan: usize,
    pub colspan: usize,
}

/// Expanded rows of one table, split by section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    pub header: Vec<Vec<String>>,
    pub body: Vec<Vec<String>>,
}

impl Grid {
    /// No cells in any row.
    pub fn is_empty(&self) -> bool {
        self.width() == 0
    }

    /// Widest row across both sections.
    pub fn width(&self) -> usize {
        self.header
            .iter()
            .chain(&self.body)
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }
}

/// Build the grid for `table`.
///
/// Header rows are every `<thead>` row; without a `<thead>`, the leading
/// rows made only of `<th>` cells (an empty row counts). `<tfoot>` rows are
/// expanded on their own and appended to the body. Elements styled
/// `display:none` are left out entirely.
pub fn read_grid(table: ElementRef<'_>) -> Grid {
    let mut thead = Vec::new();
    let mut tbody = Vec::new();
    let mut tfoot = Vec::new();

    for child in table.children().filter_map(ElementRef::wrap).filter(is_shown) {
        match child.value().name() {
            "thead" => thead.extend(section_rows(child)),
            "tbody" => tbody.extend(section_rows(child)),
            "tfoot" => tfoot.extend(section_rows(child)),
            "tr" => tbody.push(row_cells(child)),
            _ => {}
        }
    }

    if thead.is_empty() {
        let lead = tbody
            .iter()
            .take_while(|r: &&Vec<RawCell>| r.iter().all(|c| c.is_header))
            .count();
        thead = tbody.drain(..lead).collect();
    }

    let body = expand_spans(&tbody)
        .into_iter()
        .chain(expand_spans(&tfoot))
        .filter(|r| !(r.is_empty() || (r.len() == 1 && r[0].is_empty())))
        .collect();

    Grid { header: expand_spans(&thead), body }
}

fn section_rows(section: ElementRef<'_>) -> impl Iterator<Item = Vec<RawCell>> + '_ {
    section
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "tr" && is_shown(e))
        .map(row_cells)
}

fn row_cells(tr: ElementRef<'_>) -> Vec<RawCell> {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "td" | "th") && is_shown(e))
        .map(|cell| RawCell {
            text: visible_text(cell),
            is_header: cell.value().name() == "th",
            rowspan: span_attr(cell, "rowspan", MAX_ROWSPAN),
            colspan: span_attr(cell, "colspan", MAX_COLSPAN),
        })
        .collect()
}

/// Unparseable or zero spans count as 1.
fn span_attr(cell: ElementRef<'_>, name: &str, max: usize) -> usize {
    cell.value()
        .attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(max))
}

/// Text a reader would see: hidden elements skipped, `<br>` as a space,
/// whitespace collapsed.
pub fn visible_text(el: ElementRef<'_>) -> String {
    let mut buf = s!();
    collect_text(el, &mut buf);
    normalize_ws(&buf)
}

fn collect_text(el: ElementRef<'_>, buf: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(t) => buf.push_str(t),
            Node::Element(e) => {
                if e.name() == "br" {
                    buf.push(' ');
                } else if !is_hidden(e.attr("style")) && !matches!(e.name(), "style" | "script") {
                    if let Some(inner) = ElementRef::wrap(child) {
                        collect_text(inner, buf);
                    }
                }
            }
            _ => {}
        }
    }
}

fn is_shown(el: &ElementRef<'_>) -> bool {
    !is_hidden(el.value().attr("style"))
}

fn is_hidden(style: Option<&str>) -> bool {
    style.is_some_and(|s| {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        compact.to_ascii_lowercase().contains("display:none")
    })
}

/// Expand rowspan/colspan into a plain text grid.
///
/// A cell spanning `c` columns fills `c` slots of its row; one spanning `r`
/// rows is carried down into the same slot of the next `r - 1` rows, ahead of
/// whatever cell would otherwise sit there. Spans running past the last row
/// produce rows of their own.
pub fn expand_spans(rows: &[Vec<RawCell>]) -> Vec<Vec<String>> {
    // (column index, text, rows still to fill)
    let mut carried: VecDeque<(usize, String, usize)> = VecDeque::new();
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        let mut texts = Vec::new();
        let mut next = VecDeque::new();
        let mut index = 0usize;

        for cell in row {
            while carried.front().is_some_and(|&(i, _, _)| i <= index) {
                if let Some((i, text, left)) = carried.pop_front() {
                    texts.push(text.clone());
                    if left > 1 {
                        next.push_back((i, text, left - 1));
                    }
                    index += 1;
                }
            }
            for _ in 0..cell.colspan {
                texts.push(cell.text.clone());
                if cell.rowspan > 1 {
                    next.push_back((index, cell.text.clone(), cell.rowspan - 1));
                }
                index += 1;
            }
        }
        // carried spans to the right of the last real cell
        for (i, text, left) in carried.drain(..) {
            texts.push(text.clone());
            if left > 1 {
                next.push_back((i, text, left - 1));
            }
        }
        out.push(texts);
        carried = next;
    }

    while !carried.is_empty() {
        let mut texts = Vec::with_capacity(carried.len());
        let mut next = VecDeque::new();
        for (i, text, left) in carried.drain(..) {
            texts.push(text.clone());
            if left > 1 {
                next.push_back((i, text, left - 1));
            }
        }
        out.push(texts);
        carried = next;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first_table(html: &str) -> Grid {
        let doc = Html::parse_document(html);
        let sel = Selector::parse("table").unwrap();
        read_grid(doc.select(&sel).next().unwrap())
    }

    fn cell(text: &str, rowspan: usize, colspan: usize) -> RawCell {
        RawCell { text: s!(text), is_header: false, rowspan, colspan }
    }

    #[test]
    fn colspan_repeats_text() {
        let out = expand_spans(&[vec![cell("a", 1, 2), cell("b", 1, 1)]]);
        assert_eq!(out, vec![vec!["a", "a", "b"]]);
    }

    #[test]
    fn rowspan_carries_into_same_slot() {
        let rows = vec![
            vec![cell("1", 2, 1), cell("x", 1, 1), cell("y", 1, 1)],
            vec![cell("p", 1, 1), cell("q", 1, 1)],
        ];
        let out = expand_spans(&rows);
        assert_eq!(out, vec![vec!["1", "x", "y"], vec!["1", "p", "q"]]);
    }

    #[test]
    fn rowspan_in_last_column_and_past_end() {
        let rows = vec![
            vec![cell("a", 1, 1), cell("z", 3, 1)],
            vec![cell("b", 1, 1)],
        ];
        let out = expand_spans(&rows);
        assert_eq!(out, vec![vec!["a", "z"], vec!["b", "z"], vec!["z"]]);
    }

    #[test]
    fn th_rows_without_thead_become_header() {
        let g = first_table(
            "<table><tr><th>A</th><th>B</th></tr><tr><th>r</th><td>1</td></tr></table>",
        );
        assert_eq!(g.header, vec![vec!["A", "B"]]);
        assert_eq!(g.body, vec![vec!["r", "1"]]);
    }

    #[test]
    fn thead_tbody_tfoot_sections() {
        let g = first_table(
            "<table><thead><tr><td>H</td></tr></thead>\
             <tfoot><tr><td>F</td></tr></tfoot>\
             <tbody><tr><td>B</td></tr></tbody></table>",
        );
        assert_eq!(g.header, vec![vec!["H"]]);
        assert_eq!(g.body, vec![vec!["B"], vec!["F"]]);
    }

    #[test]
    fn nested_table_rows_are_not_outer_rows() {
        let g = first_table(
            "<table><tr><td>outer <table><tr><td>inner</td></tr></table></td></tr></table>",
        );
        assert_eq!(g.body.len(), 1);
        assert_eq!(g.body[0], vec!["outer inner"]);
    }

    #[test]
    fn hidden_text_and_breaks() {
        let g = first_table(
            r#"<table><tr><td><span style="display: none">0042</span>Cam<br>Ward</td></tr></table>"#,
        );
        assert_eq!(g.body[0], vec!["Cam Ward"]);
    }

    #[test]
    fn hidden_cells_and_rows_are_left_out() {
        let g = first_table(
            r#"<table>
                <tr><td style="display:none">hidden</td><td>1</td><td>2</td></tr>
                <tr style="display: none"><td>ghost</td><td>9</td></tr>
                <tr><td>x</td><td>3</td></tr>
            </table>"#,
        );
        assert_eq!(g.body, vec![vec!["1", "2"], vec!["x", "3"]]);
    }

    #[test]
    fn body_rowspan_stops_at_footer() {
        let g = first_table(
            "<table><tbody><tr><td rowspan=\"3\">a</td><td>1</td></tr></tbody>\
             <tfoot><tr><td>total</td><td>9</td></tr></tfoot></table>",
        );
        assert_eq!(g.body, vec![vec!["a", "1"], vec!["a"], vec!["a"], vec!["total", "9"]]);
    }

    #[test]
    fn leading_empty_row_counts_as_header() {
        let g = first_table("<table><tr></tr><tr><th>A</th></tr><tr><td>1</td></tr></table>");
        assert_eq!(g.header, vec![Vec::<String>::new(), vec![s!("A")]]);
        assert_eq!(g.body, vec![vec!["1"]]);
    }

    #[test]
    fn bad_spans_count_as_one() {
        let g = first_table(
            r#"<table><tr><td colspan="0">a</td><td colspan="x">b</td><td rowspan="-2">c</td></tr></table>"#,
        );
        assert_eq!(g.body, vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn blank_single_cell_rows_dropped() {
        let g = first_table("<table><tr><td>a</td></tr><tr><td> </td></tr><tr></tr></table>");
        assert_eq!(g.body, vec![vec!["a"]]);
    }
}
