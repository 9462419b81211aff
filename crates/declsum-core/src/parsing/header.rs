use crate::model::{Cell, Row};
use crate::options::RequiredColumns;
use crate::parsing::Rejection;

/// Split a region into its header names and data rows.
///
/// The first row becomes the header only if none of its cells is missing.
pub fn promote_header(region: &[Row]) -> Result<(Vec<String>, &[Row]), Rejection> {
    let (first, data) = region.split_first().ok_or(Rejection::EmptyRegion)?;

    if first.iter().any(Cell::is_missing) {
        return Err(Rejection::InvalidHeader);
    }

    let names = first.iter().map(|cell| cell.to_string()).collect();
    Ok((names, data))
}

/// Keep only the required columns, in required order.
///
/// When a name repeats in the header, the leftmost column is used.
pub fn project_required(
    header: &[String],
    data: &[Row],
    required: &RequiredColumns,
) -> Result<Vec<[Cell; 3]>, Rejection> {
    let names = required.names();
    let positions: Vec<Option<usize>> = names
        .iter()
        .map(|name| header.iter().position(|h| h == name))
        .collect();

    let missing: Vec<String> = names
        .iter()
        .zip(&positions)
        .filter(|(_, pos)| pos.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Rejection::MissingRequiredColumns(missing));
    }

    let cell_at = |row: &Row, pos: Option<usize>| {
        pos.and_then(|i| row.get(i))
            .cloned()
            .unwrap_or(Cell::Missing)
    };

    Ok(data
        .iter()
        .map(|row| {
            [
                cell_at(row, positions[0]),
                cell_at(row, positions[1]),
                cell_at(row, positions[2]),
            ]
        })
        .collect())
}
