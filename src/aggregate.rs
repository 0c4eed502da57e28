use crate::schema::{AggregateRow, StatementKind, TransactionRecord};
use chrono::Datelike;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Groups records by (account, calendar month) under the date regime of the
/// given statement kind and sums their net amounts.
///
/// Records whose regime date is null cannot be bucketed and are excluded
/// entirely, as are records without an account label. Null net amounts
/// contribute zero to their group instead of poisoning the sum.
///
/// The year is not part of the grouping key: January rows from different
/// years land in the same bucket. Output is sorted ascending by
/// (account, month) and contains at most one row per pair.
pub fn aggregate_by_account_month(
    records: &[TransactionRecord],
    kind: StatementKind,
) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<(String, u32), Decimal> = BTreeMap::new();

    for record in records {
        let Some(date) = kind.bucket_date(record) else {
            continue;
        };
        let Some(account) = record.account.as_deref() else {
            continue;
        };

        let amount = record.net_amount.unwrap_or(Decimal::ZERO);
        *groups
            .entry((account.to_string(), date.month()))
            .or_insert(Decimal::ZERO) += amount;
    }

    groups
        .into_iter()
        .map(|((account, month), net_amount)| AggregateRow {
            account,
            month,
            net_amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(
        id: &str,
        account: Option<&str>,
        accrual: Option<(i32, u32, u32)>,
        settlement: Option<(i32, u32, u32)>,
        net: Option<Decimal>,
    ) -> TransactionRecord {
        TransactionRecord {
            record_id: id.to_string(),
            account: account.map(|name| name.to_string()),
            accrual_date: accrual.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            settlement_date: settlement.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            net_amount: net,
            ..TransactionRecord::default()
        }
    }

    #[test]
    fn test_regime_selects_the_bucketing_date() {
        let records = vec![
            record("1", Some("Receita"), Some((2024, 1, 15)), None, Some(dec!(100))),
            record(
                "2",
                Some("Receita"),
                Some((2024, 2, 1)),
                Some((2024, 2, 10)),
                Some(dec!(50)),
            ),
        ];

        let accrual = aggregate_by_account_month(&records, StatementKind::Accrual);
        assert_eq!(
            accrual,
            vec![
                AggregateRow {
                    account: "Receita".to_string(),
                    month: 1,
                    net_amount: dec!(100),
                },
                AggregateRow {
                    account: "Receita".to_string(),
                    month: 2,
                    net_amount: dec!(50),
                },
            ]
        );

        // Record 1 has no settlement date, so the cash regime only sees record 2.
        let cash = aggregate_by_account_month(&records, StatementKind::Cash);
        assert_eq!(
            cash,
            vec![AggregateRow {
                account: "Receita".to_string(),
                month: 2,
                net_amount: dec!(50),
            }]
        );
    }

    #[test]
    fn test_same_account_month_is_summed_once() {
        let records = vec![
            record("1", Some("Despesas"), Some((2024, 3, 1)), None, Some(dec!(10))),
            record("2", Some("Despesas"), Some((2024, 3, 20)), None, Some(dec!(15))),
            record("3", Some("Despesas"), Some((2024, 3, 31)), None, Some(dec!(-5))),
        ];

        let rows = aggregate_by_account_month(&records, StatementKind::Accrual);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].net_amount, dec!(20));
    }

    #[test]
    fn test_null_net_amount_contributes_zero() {
        let records = vec![
            record("1", Some("Receita"), Some((2024, 1, 1)), None, None),
            record("2", Some("Receita"), Some((2024, 1, 2)), None, Some(dec!(7))),
        ];

        let rows = aggregate_by_account_month(&records, StatementKind::Accrual);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].net_amount, dec!(7));
    }

    #[test]
    fn test_records_without_account_are_excluded() {
        let records = vec![
            record("1", None, Some((2024, 1, 1)), None, Some(dec!(100))),
            record("2", Some("Receita"), Some((2024, 1, 1)), None, Some(dec!(1))),
        ];

        let rows = aggregate_by_account_month(&records, StatementKind::Accrual);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].account, "Receita");
        assert_eq!(rows[0].net_amount, dec!(1));
    }

    #[test]
    fn test_month_grouping_ignores_year() {
        let records = vec![
            record("1", Some("Receita"), Some((2023, 1, 10)), None, Some(dec!(40))),
            record("2", Some("Receita"), Some((2024, 1, 10)), None, Some(dec!(60))),
        ];

        let rows = aggregate_by_account_month(&records, StatementKind::Accrual);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].month, 1);
        assert_eq!(rows[0].net_amount, dec!(100));
    }

    #[test]
    fn test_row_count_bounded_by_dated_records() {
        let records = vec![
            record("1", Some("A"), Some((2024, 1, 1)), None, Some(dec!(1))),
            record("2", Some("B"), Some((2024, 1, 1)), None, Some(dec!(1))),
            record("3", Some("A"), None, Some((2024, 2, 1)), Some(dec!(1))),
        ];

        let dated = records
            .iter()
            .filter(|r| StatementKind::Accrual.bucket_date(r).is_some())
            .count();
        let rows = aggregate_by_account_month(&records, StatementKind::Accrual);
        assert!(rows.len() <= dated);
    }
}
