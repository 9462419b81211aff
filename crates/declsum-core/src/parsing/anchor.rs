use crate::model::Row;
use crate::options::ExtractOptions;
use std::ops::Range;

/// Index of the first row with a cell whose text contains `marker`.
pub fn find_marker_row(rows: &[Row], marker: &str) -> Option<usize> {
    rows.iter().position(|row| {
        row.iter().any(|cell| {
            cell.as_match_text()
                .is_some_and(|text| text.contains(marker))
        })
    })
}

/// Locate the data region between the start and end markers.
///
/// The region begins on the row after the first start-marker row and ends
/// (exclusive) at the first end-marker row. The fallback end marker is only
/// consulted when the primary end marker appears nowhere in the document;
/// the start marker has no fallback.
pub fn locate_region(rows: &[Row], options: &ExtractOptions) -> Option<Range<usize>> {
    let start = find_marker_row(rows, &options.start_marker)? + 1;
    let end = find_marker_row(rows, &options.end_marker)
        .or_else(|| find_marker_row(rows, &options.end_marker_fallback))?;

    if start > end {
        return None;
    }
    Some(start..end)
}
