use crate::extraction::RawTable;
use crate::model::{Cell, Row};

/// Split `pdftotext` output into per-page text on form feeds.
pub fn split_pages(text: &str) -> Vec<&str> {
    let mut pages: Vec<&str> = text.split('\x0c').collect();
    if pages.last().is_some_and(|p| p.trim().is_empty()) && pages.len() > 1 {
        pages.pop();
    }
    pages
}

/// A cell of a layout line with its character offsets `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl CellSpan {
    fn overlap(&self, other: &CellSpan) -> usize {
        self.end.min(other.end).saturating_sub(self.start.max(other.start))
    }

    /// Twice the center offset, kept integral.
    fn center2(&self) -> usize {
        self.start + self.end
    }
}

/// Reconstruct tables from one page of `pdftotext -layout` text.
///
/// Each maximal run of non-blank lines is one table. The line with the most
/// cells fixes the columns; every other line places its cells by horizontal
/// position, so a blank gap under a column becomes a missing cell instead of
/// shifting later values left.
pub fn tables_from_layout(page_text: &str) -> Vec<RawTable> {
    let mut tables = Vec::new();
    let mut current: Vec<Vec<CellSpan>> = Vec::new();

    for line in page_text.lines() {
        let spans = split_line_into_spans(line);
        if spans.is_empty() {
            if !current.is_empty() {
                tables.push(finish_table(std::mem::take(&mut current)));
            }
            continue;
        }
        current.push(spans);
    }

    if !current.is_empty() {
        tables.push(finish_table(current));
    }

    tables
}

fn finish_table(lines: Vec<Vec<CellSpan>>) -> RawTable {
    // First line wins among equally wide ones, which favors the header.
    let reference = lines
        .iter()
        .fold(None::<&Vec<CellSpan>>, |best, line| match best {
            Some(b) if b.len() >= line.len() => Some(b),
            _ => Some(line),
        })
        .cloned()
        .unwrap_or_default();

    let rows = lines
        .into_iter()
        .map(|spans| place_cells(spans, &reference))
        .collect();
    RawTable { rows }
}

fn place_cells(spans: Vec<CellSpan>, columns: &[CellSpan]) -> Row {
    let mut row: Row = vec![Cell::Missing; columns.len()];

    for span in spans {
        let Some(idx) = column_for(&span, columns) else {
            continue;
        };
        row[idx] = match std::mem::replace(&mut row[idx], Cell::Missing) {
            Cell::Text(prev) => Cell::Text(format!("{prev} {}", span.text)),
            _ => Cell::Text(span.text),
        };
    }

    row
}

/// Column with the largest horizontal overlap, else the nearest by center.
fn column_for(span: &CellSpan, columns: &[CellSpan]) -> Option<usize> {
    let best_overlap = columns
        .iter()
        .enumerate()
        .map(|(i, col)| (i, span.overlap(col)))
        .filter(|(_, overlap)| *overlap > 0)
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)));
    if let Some((idx, _)) = best_overlap {
        return Some(idx);
    }

    columns
        .iter()
        .enumerate()
        .min_by_key(|(_, col)| col.center2().abs_diff(span.center2()))
        .map(|(i, _)| i)
}

/// Split a layout line into cells at tabs and at runs of two or more
/// whitespace characters, keeping each cell's character offsets.
pub fn split_line_into_spans(line: &str) -> Vec<CellSpan> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut start = 0_usize;
    let mut whitespace_run = 0_usize;

    for (pos, ch) in line.chars().enumerate() {
        if ch == '\t' || (ch.is_whitespace() && whitespace_run >= 1) {
            push_span(&mut spans, &mut current, start);
            whitespace_run += 1;
            continue;
        }

        if ch.is_whitespace() {
            whitespace_run += 1;
            current.push(' ');
            continue;
        }

        if current.trim().is_empty() {
            current.clear();
            start = pos;
        }
        whitespace_run = 0;
        current.push(ch);
    }

    push_span(&mut spans, &mut current, start);
    spans
}

/// Cell texts of a layout line, without offsets.
pub fn split_line_into_cells(line: &str) -> Vec<String> {
    split_line_into_spans(line)
        .into_iter()
        .map(|span| span.text)
        .collect()
}

fn push_span(spans: &mut Vec<CellSpan>, current: &mut String, start: usize) {
    let text = current.trim();
    if !text.is_empty() {
        spans.push(CellSpan {
            start,
            end: start + text.chars().count(),
            text: text.to_string(),
        });
    }
    current.clear();
}
