pub mod anchor;
pub mod header;
pub mod values;

use crate::extraction::PageTables;
use crate::model::{Cell, Row, TypedRow};
use crate::options::ExtractOptions;
use anchor::locate_region;
use header::{project_required, promote_header};
use values::coerce_numeric;

/// Why a document contributed no rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("start or end marker row not found")]
    NoAnchorFound,

    #[error("table region between markers is empty")]
    EmptyRegion,

    #[error("first row has no valid column names")]
    InvalidHeader,

    #[error("missing required columns: {}", .0.join(", "))]
    MissingRequiredColumns(Vec<String>),
}

/// Flatten every table of every page into one document table, in
/// (page, table, row) order, removing embedded line breaks from text cells.
///
/// Every row is padded with missing cells to the width of the widest row in
/// the document, so a header narrower than its data is never complete.
pub fn flatten_tables(pages: Vec<PageTables>) -> Vec<Row> {
    let mut rows: Vec<Row> = pages
        .into_iter()
        .flat_map(|page| page.tables)
        .flat_map(|table| table.rows)
        .map(clean_row)
        .collect();

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, Cell::Missing);
    }
    rows
}

fn clean_row(row: Row) -> Row {
    row.into_iter()
        .map(|cell| match cell {
            Cell::Text(s) if s.contains('\n') => {
                Cell::Text(s.replace("\r\n", "").replace('\n', ""))
            }
            other => other,
        })
        .collect()
}

/// Turn one document table into typed rows.
pub fn parse_document(rows: &[Row], options: &ExtractOptions) -> Result<Vec<TypedRow>, Rejection> {
    let region = locate_region(rows, options).ok_or(Rejection::NoAnchorFound)?;
    let (names, data) = promote_header(&rows[region])?;
    let projected = project_required(&names, data, &options.required_columns)?;

    Ok(projected
        .iter()
        .map(|[key, qty, value]| TypedRow {
            sequence_no: coerce_numeric(key),
            quantity: coerce_numeric(qty),
            total_value: coerce_numeric(value),
        })
        .collect())
}
