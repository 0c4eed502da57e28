use crate::schema::{AggregateRow, StatementKind};
use crate::utils::month_name;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One account row of a pivoted statement. `values` is aligned with the
/// statement's `months`; every cell is a real sum or exactly zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    pub account: String,
    pub values: Vec<Decimal>,
    pub total: Decimal,
}

/// An account-by-month matrix for one statement kind.
///
/// Months are the calendar months actually present in the aggregates, in
/// ascending order; months with no data are omitted as columns rather than
/// zero-filled. Rows are sorted ascending by account name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotedStatement {
    pub kind: StatementKind,
    pub months: Vec<u32>,
    pub rows: Vec<PivotRow>,
}

impl PivotedStatement {
    /// Portuguese header labels for the present months.
    pub fn month_labels(&self) -> Vec<&'static str> {
        self.months
            .iter()
            .map(|month| month_name(*month).unwrap_or(""))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("Plano de Contas");
        for label in self.month_labels() {
            output.push(',');
            output.push_str(label);
        }
        output.push_str(",Total\n");

        for row in &self.rows {
            output.push_str(&row.account);
            for value in &row.values {
                output.push(',');
                output.push_str(&value.to_string());
            }
            output.push(',');
            output.push_str(&row.total.to_string());
            output.push('\n');
        }

        output
    }
}

/// Reshapes long-form aggregates into the wide account-by-month matrix with a
/// trailing Total column.
///
/// Zero aggregates produce an empty statement (no months, no rows), which is
/// valid output, not an error. Duplicate account strings are kept distinct.
pub fn pivot_statement(aggregates: &[AggregateRow], kind: StatementKind) -> PivotedStatement {
    let months: Vec<u32> = aggregates
        .iter()
        .map(|row| row.month)
        .collect::<BTreeSet<u32>>()
        .into_iter()
        .collect();

    let mut accounts: BTreeMap<&str, BTreeMap<u32, Decimal>> = BTreeMap::new();
    for aggregate in aggregates {
        *accounts
            .entry(&aggregate.account)
            .or_default()
            .entry(aggregate.month)
            .or_insert(Decimal::ZERO) += aggregate.net_amount;
    }

    let rows = accounts
        .into_iter()
        .map(|(account, cells)| {
            let values: Vec<Decimal> = months
                .iter()
                .map(|month| cells.get(month).copied().unwrap_or(Decimal::ZERO))
                .collect();
            let total = values.iter().copied().sum();
            PivotRow {
                account: account.to_string(),
                values,
                total,
            }
        })
        .collect();

    PivotedStatement { kind, months, rows }
}
