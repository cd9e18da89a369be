use rust_decimal::Decimal;
use tracing::debug;

use crate::aggregate::{
    add_amounts, find_item, latest_margins, year_over_year, IncomeMargins, YearOverYear, TREND_ITEMS,
};
use crate::normalize::{normalize_incomes, statement_years, year_label, IncomeRow, YearWindow};
use crate::records::RawRecord;

/// Income-statement view pivoted item × year
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IncomeReport {
    /// One row per item, first-occurrence order, every row carrying all `years`
    pub rows: Vec<IncomeRow>,
    /// Year labels, most recent first
    pub years: Vec<String>,
    /// Margins for the most recent year; `None` when there are no years
    pub margins: Option<IncomeMargins>,
    pub year_over_year: Vec<YearOverYear>,
}

impl IncomeReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Pivoted amount for an item and year; absent pairs are zero
    pub fn amount(&self, item: &str, year: &str) -> Decimal {
        self.rows
            .iter()
            .find(|row| row.name == item)
            .and_then(|row| row.amount(year))
            .unwrap_or(Decimal::ZERO)
    }

    /// Headline rows (revenue, operating income, net income) that are present
    pub fn trend_rows(&self) -> Vec<&IncomeRow> {
        TREND_ITEMS
            .iter()
            .filter_map(|item| find_item(&self.rows, &[*item]))
            .collect()
    }

    pub fn latest_year(&self) -> Option<&str> {
        self.years.first().map(String::as_str)
    }
}

/// Build the income pivot. Input row order only decides the item order;
/// amounts for the same item and year are summed. Margins only use cells the
/// input reported; the zero fill is for display.
pub fn build_income(records: &[RawRecord], window: YearWindow) -> IncomeReport {
    let years: Vec<String> = statement_years(records, window)
        .into_iter()
        .map(year_label)
        .collect();

    // Cells stay `None` until some input row reports them
    let mut pivot: Vec<(String, Vec<Option<Decimal>>)> = Vec::new();
    for row in normalize_incomes(records) {
        let idx = match pivot.iter().position(|(name, _)| *name == row.name) {
            Some(idx) => idx,
            None => {
                pivot.push((row.name.clone(), vec![None; years.len()]));
                pivot.len() - 1
            }
        };

        for (label, amount) in &row.by_year {
            if let Some(col) = years.iter().position(|y| y == label) {
                let cell = &mut pivot[idx].1[col];
                *cell = Some(match *cell {
                    Some(sum) => add_amounts(sum, *amount),
                    None => *amount,
                });
            }
        }
    }

    let reported: Vec<IncomeRow> = pivot
        .iter()
        .map(|(name, cells)| IncomeRow {
            name: name.clone(),
            by_year: years
                .iter()
                .zip(cells)
                .filter_map(|(year, cell)| cell.map(|amount| (year.clone(), amount)))
                .collect(),
        })
        .collect();
    let margins = latest_margins(&reported, &years);

    let rows: Vec<IncomeRow> = pivot
        .into_iter()
        .map(|(name, cells)| IncomeRow {
            name,
            by_year: years
                .iter()
                .cloned()
                .zip(cells.into_iter().map(|cell| cell.unwrap_or(Decimal::ZERO)))
                .collect(),
        })
        .collect();

    let year_over_year = year_over_year(&rows, &years);

    debug!(
        "Built income statement: {} items over {} years",
        rows.len(),
        years.len()
    );

    IncomeReport {
        rows,
        years,
        margins,
        year_over_year,
    }
}
