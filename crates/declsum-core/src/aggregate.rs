use crate::model::{CombinedTable, DeclarationRow, TypedRow};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Running group sums. `None` once a sum has overflowed.
#[derive(Debug, Clone, Copy)]
struct Sums {
    quantity: Option<Decimal>,
    total_value: Option<Decimal>,
}

impl Default for Sums {
    fn default() -> Self {
        Sums {
            quantity: Some(Decimal::ZERO),
            total_value: Some(Decimal::ZERO),
        }
    }
}

impl Sums {
    fn add(&mut self, row: &TypedRow) {
        self.quantity = checked_sum(self.quantity, row.quantity);
        self.total_value = checked_sum(self.total_value, row.total_value);
    }
}

fn checked_sum(acc: Option<Decimal>, value: Option<Decimal>) -> Option<Decimal> {
    acc?.checked_add(value.unwrap_or_default())
}

/// Concatenate accepted documents in input order and attach per-item totals.
///
/// Returns `None` when no document was accepted. Missing values are skipped
/// when summing, so a group with no quantities totals zero. A sum that
/// overflows the decimal range is reported as missing. A row whose
/// 备案序号 is missing forms a group of its own.
pub fn combine(documents: Vec<Vec<TypedRow>>) -> Option<CombinedTable> {
    if documents.is_empty() {
        return None;
    }

    let rows: Vec<TypedRow> = documents.into_iter().flatten().collect();

    let mut groups: HashMap<Decimal, Sums> = HashMap::new();
    for row in &rows {
        if let Some(key) = row.sequence_no {
            groups.entry(key).or_default().add(row);
        }
    }

    let rows = rows
        .into_iter()
        .map(|row| {
            let sums = match row.sequence_no {
                Some(key) => groups.get(&key).copied().unwrap_or_default(),
                None => {
                    let mut own = Sums::default();
                    own.add(&row);
                    own
                }
            };
            DeclarationRow {
                sequence_no: row.sequence_no,
                quantity: row.quantity,
                total_value: row.total_value,
                cumulative_quantity: sums.quantity,
                cumulative_total_value: sums.total_value,
            }
        })
        .collect();

    Some(CombinedTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn typed(key: Option<Decimal>, qty: Option<Decimal>, value: Option<Decimal>) -> TypedRow {
        TypedRow {
            sequence_no: key,
            quantity: qty,
            total_value: value,
        }
    }

    #[test]
    fn no_documents_is_absent() {
        assert!(combine(vec![]).is_none());
    }

    #[test]
    fn accepted_but_empty_documents_give_empty_table() {
        let table = combine(vec![vec![]]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn sums_broadcast_to_every_row_of_group() {
        let table = combine(vec![
            vec![
                typed(Some(dec!(101)), Some(dec!(5)), Some(dec!(50.0))),
                typed(Some(dec!(102)), Some(dec!(1)), Some(dec!(9.5))),
            ],
            vec![typed(Some(dec!(101)), Some(dec!(7)), Some(dec!(70.0)))],
        ])
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0].cumulative_quantity, Some(dec!(12)));
        assert_eq!(table.rows[0].cumulative_total_value, Some(dec!(120.0)));
        assert_eq!(table.rows[1].cumulative_quantity, Some(dec!(1)));
        assert_eq!(table.rows[2].cumulative_quantity, Some(dec!(12)));
        // input order is preserved across documents
        assert_eq!(table.rows[2].quantity, Some(dec!(7)));
    }

    #[test]
    fn keys_compare_numerically() {
        let table = combine(vec![vec![
            typed(Some(dec!(101)), Some(dec!(1)), None),
            typed(Some(dec!(101.0)), Some(dec!(2)), None),
        ]])
        .unwrap();
        assert_eq!(table.rows[0].cumulative_quantity, Some(dec!(3)));
        assert_eq!(table.rows[1].cumulative_quantity, Some(dec!(3)));
    }

    #[test]
    fn missing_values_are_skipped() {
        let table = combine(vec![vec![
            typed(Some(dec!(1)), None, Some(dec!(2))),
            typed(Some(dec!(1)), Some(dec!(3)), None),
            typed(Some(dec!(2)), None, None),
        ]])
        .unwrap();
        assert_eq!(table.rows[0].cumulative_quantity, Some(dec!(3)));
        assert_eq!(table.rows[0].cumulative_total_value, Some(dec!(2)));
        assert_eq!(table.rows[2].cumulative_quantity, Some(Decimal::ZERO));
    }

    #[test]
    fn missing_keys_are_singleton_groups() {
        let table = combine(vec![vec![
            typed(None, Some(dec!(4)), Some(dec!(40))),
            typed(None, Some(dec!(6)), Some(dec!(60))),
        ]])
        .unwrap();
        assert_eq!(table.rows[0].cumulative_quantity, Some(dec!(4)));
        assert_eq!(table.rows[1].cumulative_quantity, Some(dec!(6)));
        assert_eq!(table.rows[1].cumulative_total_value, Some(dec!(60)));
    }

    #[test]
    fn overflowing_sum_is_missing_not_a_panic() {
        let table = combine(vec![vec![
            typed(Some(dec!(1)), Some(Decimal::MAX), Some(dec!(1))),
            typed(Some(dec!(1)), Some(Decimal::MAX), Some(dec!(2))),
            typed(Some(dec!(2)), Some(Decimal::MAX), None),
        ]])
        .unwrap();
        assert_eq!(table.rows[0].cumulative_quantity, None);
        assert_eq!(table.rows[1].cumulative_quantity, None);
        assert_eq!(table.rows[0].cumulative_total_value, Some(dec!(3)));
        assert_eq!(table.rows[2].cumulative_quantity, Some(Decimal::MAX));
    }
}
