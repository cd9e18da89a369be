use rust_decimal::Decimal;
use tracing::debug;

use crate::aggregate::{
    category_totals, class_totals, percent_of, sum_amounts, CategoryTotal, ClassTotal,
};
use crate::normalize::{normalize_balances, BalanceRow};
use crate::records::RawRecord;

/// Balance-sheet view: detail rows, per-category totals, class overview
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BalanceReport {
    pub rows: Vec<BalanceRow>,
    pub totals: Vec<CategoryTotal>,
    pub class_totals: Vec<ClassTotal>,
}

impl BalanceReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of every balance row, clamped to the `Decimal` range
    pub fn grand_total(&self) -> Decimal {
        sum_amounts(self.rows.iter().map(|row| row.value))
    }

    /// Share of each category in the grand total, in category order.
    /// `None` shares when the grand total is zero.
    pub fn category_shares(&self) -> Vec<(String, Option<Decimal>)> {
        let grand_total = self.grand_total();
        self.totals
            .iter()
            .map(|t| (t.category.clone(), percent_of(t.total, grand_total)))
            .collect()
    }
}

pub fn build_balance(records: &[RawRecord]) -> BalanceReport {
    let rows = normalize_balances(records);
    let totals = category_totals(&rows);
    let class_totals = class_totals(&rows);

    debug!(
        "Built balance sheet with {} rows in {} categories",
        rows.len(),
        totals.len()
    );

    BalanceReport {
        rows,
        totals,
        class_totals,
    }
}
