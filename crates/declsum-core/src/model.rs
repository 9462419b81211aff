use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Output column names of the combined table, in order.
pub const COLUMNS: [&str; 5] = [
    "备案序号",
    "申报数量",
    "申报总价",
    "累计申报数量",
    "累计申报总价",
];

/// A single table cell as delivered by an extraction backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),
    Number(Decimal),
    Missing,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Cell {
        Cell::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// String form used for marker matching. Missing cells never match.
    pub fn as_match_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Missing => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Missing => Ok(()),
        }
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(s) => Cell::Text(s.to_string()),
            None => Cell::Missing,
        }
    }
}

pub type Row = Vec<Cell>;

/// A PDF to process, paired with the name used in warnings and the no-table list.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        SourceDocument {
            name: name.into(),
            bytes,
        }
    }
}

/// The three required columns of one data row after numeric coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedRow {
    pub sequence_no: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub total_value: Option<Decimal>,
}

/// One record of the combined table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationRow {
    #[serde(rename = "备案序号")]
    pub sequence_no: Option<Decimal>,
    #[serde(rename = "申报数量")]
    pub quantity: Option<Decimal>,
    #[serde(rename = "申报总价")]
    pub total_value: Option<Decimal>,
    /// Missing when the group sum overflows.
    #[serde(rename = "累计申报数量")]
    pub cumulative_quantity: Option<Decimal>,
    #[serde(rename = "累计申报总价")]
    pub cumulative_total_value: Option<Decimal>,
}

/// Per-item totals, one entry per distinct 备案序号.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTotal {
    #[serde(rename = "备案序号")]
    pub sequence_no: Option<Decimal>,
    #[serde(rename = "累计申报数量")]
    pub cumulative_quantity: Option<Decimal>,
    #[serde(rename = "累计申报总价")]
    pub cumulative_total_value: Option<Decimal>,
    /// Number of rows in the group.
    pub rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedTable {
    pub rows: Vec<DeclarationRow>,
}

impl CombinedTable {
    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Collapse the table to one row per item, in order of first appearance.
    ///
    /// Rows without a 备案序号 are never merged with each other.
    pub fn group_totals(&self) -> Vec<GroupTotal> {
        let mut out: Vec<GroupTotal> = Vec::new();
        let mut seen: HashMap<Decimal, usize> = HashMap::new();

        for row in &self.rows {
            if let Some(key) = row.sequence_no {
                if let Some(&idx) = seen.get(&key) {
                    out[idx].rows += 1;
                    continue;
                }
                seen.insert(key, out.len());
            }
            out.push(GroupTotal {
                sequence_no: row.sequence_no,
                cumulative_quantity: row.cumulative_quantity,
                cumulative_total_value: row.cumulative_total_value,
                rows: 1,
            });
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(key: Option<Decimal>, qty: Decimal, cum: Decimal) -> DeclarationRow {
        DeclarationRow {
            sequence_no: key,
            quantity: Some(qty),
            total_value: None,
            cumulative_quantity: Some(cum),
            cumulative_total_value: Some(Decimal::ZERO),
        }
    }

    #[test]
    fn group_totals_keeps_first_appearance_order() {
        let table = CombinedTable {
            rows: vec![
                row(Some(dec!(7)), dec!(1), dec!(3)),
                row(Some(dec!(3)), dec!(4), dec!(4)),
                row(Some(dec!(7)), dec!(2), dec!(3)),
            ],
        };
        let totals = table.group_totals();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].sequence_no, Some(dec!(7)));
        assert_eq!(totals[0].rows, 2);
        assert_eq!(totals[0].cumulative_quantity, Some(dec!(3)));
        assert_eq!(totals[1].sequence_no, Some(dec!(3)));
    }

    #[test]
    fn group_totals_does_not_merge_missing_keys() {
        let table = CombinedTable {
            rows: vec![
                row(None, dec!(1), dec!(1)),
                row(None, dec!(2), dec!(2)),
            ],
        };
        assert_eq!(table.group_totals().len(), 2);
    }

    #[test]
    fn serializes_with_chinese_column_names() {
        let r = row(Some(dec!(101)), dec!(5), dec!(12));
        let json = serde_json::to_value(&r).unwrap();
        let obj = json.as_object().unwrap();
        for col in COLUMNS {
            assert!(obj.contains_key(col), "missing column {col}");
        }
    }

    #[test]
    fn missing_cell_has_no_match_text() {
        assert_eq!(Cell::Missing.as_match_text(), None);
        assert_eq!(Cell::Number(dec!(1.5)).as_match_text().as_deref(), Some("1.5"));
    }
}
