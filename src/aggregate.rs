//! Aggregates derived from normalized rows
//!
//! Category totals for the balance sheet, asset/liability/equity
//! classification, margin ratios and year-over-year change for the income
//! statement. Every ratio is guarded against a zero denominator and reported
//! as `None` instead.

use rust_decimal::Decimal;
use tracing::warn;

use crate::normalize::{BalanceRow, IncomeRow, OTHER_CATEGORY};

/// Item names recognized as revenue, most specific first
pub const REVENUE_ITEMS: &[&str] = &["매출액", "매출", "revenue", "sales"];
pub const OPERATING_INCOME_ITEMS: &[&str] = &["영업이익", "operating income"];
pub const NET_INCOME_ITEMS: &[&str] = &["순이익", "당기순이익", "net income"];

/// Headline items plotted in the income trend chart
pub const TREND_ITEMS: &[&str] = &["매출액", "영업이익", "순이익"];

/// Total of one balance-sheet category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// Balance-sheet class derived from category or item name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceClass {
    Asset,
    Liability,
    Equity,
    Other,
}

impl BalanceClass {
    /// Classes in overview order
    pub const PRIMARY: [BalanceClass; 3] =
        [BalanceClass::Asset, BalanceClass::Liability, BalanceClass::Equity];

    pub fn label(&self) -> &'static str {
        match self {
            BalanceClass::Asset => "자산",
            BalanceClass::Liability => "부채",
            BalanceClass::Equity => "자본",
            BalanceClass::Other => OTHER_CATEGORY,
        }
    }

    /// Heading used on the overview cards
    pub fn total_label(&self) -> String {
        format!("총 {}", self.label())
    }
}

/// Total for one balance class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassTotal {
    pub class: BalanceClass,
    pub total: Decimal,
}

/// Margin ratios for one year
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeMargins {
    pub year: String,
    pub operating_margin: Option<Decimal>,
    pub net_margin: Option<Decimal>,
}

/// Change of one income item between the two most recent years
#[derive(Debug, Clone, PartialEq)]
pub struct YearOverYear {
    pub name: String,
    pub current_year: String,
    pub previous_year: String,
    pub current: Decimal,
    pub previous: Decimal,
    pub change_percent: Option<Decimal>,
}

/// Classify by substring: 자산, then 부채, then 자본
pub fn classify(text: &str) -> BalanceClass {
    if text.contains("자산") {
        BalanceClass::Asset
    } else if text.contains("부채") {
        BalanceClass::Liability
    } else if text.contains("자본") {
        BalanceClass::Equity
    } else {
        BalanceClass::Other
    }
}

/// Class of a row: its explicit category when that classifies, else its name
pub fn classify_row(row: &BalanceRow) -> BalanceClass {
    match classify(&row.category) {
        BalanceClass::Other => classify(&row.name),
        class => class,
    }
}

/// `a + b` clamped to the `Decimal` range
pub fn add_amounts(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| {
        warn!("Amount sum {} + {} is out of range, clamping", a, b);
        a.saturating_add(b)
    })
}

/// Sum of `values`, clamped to the `Decimal` range
pub fn sum_amounts<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, add_amounts)
}

/// Sum values per category, categories in order of first occurrence
pub fn category_totals(rows: &[BalanceRow]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for row in rows {
        let category = match row.category.trim() {
            "" => OTHER_CATEGORY,
            c => c,
        };
        match totals.iter_mut().find(|t| t.category == category) {
            Some(total) => total.total = add_amounts(total.total, row.value),
            None => totals.push(CategoryTotal {
                category: category.to_string(),
                total: row.value,
            }),
        }
    }

    totals
}

/// Totals for asset, liability and equity, always in that order
pub fn class_totals(rows: &[BalanceRow]) -> Vec<ClassTotal> {
    BalanceClass::PRIMARY
        .iter()
        .map(|class| ClassTotal {
            class: *class,
            total: sum_amounts(
                rows.iter()
                    .filter(|row| classify_row(row) == *class)
                    .map(|row| row.value),
            ),
        })
        .collect()
}

/// `part / whole * 100`, `None` when whole is zero or the result is out of range
pub fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return None;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}

/// First row whose name matches one of the candidate item names
pub fn find_item<'a>(rows: &'a [IncomeRow], candidates: &[&str]) -> Option<&'a IncomeRow> {
    candidates.iter().find_map(|candidate| {
        rows.iter()
            .find(|row| row.name.trim().eq_ignore_ascii_case(candidate))
    })
}

/// Operating and net margin for a year.
///
/// A margin is omitted when revenue is missing or zero for the year, or when
/// its numerator row has no amount for the year.
pub fn income_margins(rows: &[IncomeRow], year: &str) -> IncomeMargins {
    let amount = |candidates: &[&str]| find_item(rows, candidates).and_then(|row| row.amount(year));

    let revenue = amount(REVENUE_ITEMS).filter(|r| !r.is_zero());
    let ratio = |numerator: Option<Decimal>| match (numerator, revenue) {
        (Some(n), Some(r)) => percent_of(n, r),
        _ => None,
    };

    IncomeMargins {
        year: year.to_string(),
        operating_margin: ratio(amount(OPERATING_INCOME_ITEMS)),
        net_margin: ratio(amount(NET_INCOME_ITEMS)),
    }
}

/// Margins for the most recent year in the dataset; `None` without years
pub fn latest_margins(rows: &[IncomeRow], years: &[String]) -> Option<IncomeMargins> {
    years.first().map(|year| income_margins(rows, year))
}

/// Change from the previous to the most recent year for every item.
///
/// Empty when the statement has fewer than two years. The change is relative
/// to the magnitude of the previous amount so a loss shrinking reads as growth.
/// A change outside the `Decimal` range is `None`.
pub fn year_over_year(rows: &[IncomeRow], years: &[String]) -> Vec<YearOverYear> {
    let (Some(current_year), Some(previous_year)) = (years.first(), years.get(1)) else {
        return Vec::new();
    };

    rows.iter()
        .map(|row| {
            let current = row.amount(current_year).unwrap_or(Decimal::ZERO);
            let previous = row.amount(previous_year).unwrap_or(Decimal::ZERO);
            YearOverYear {
                name: row.name.clone(),
                current_year: current_year.clone(),
                previous_year: previous_year.clone(),
                current,
                previous,
                change_percent: current
                    .checked_sub(previous)
                    .and_then(|delta| percent_of(delta, previous.abs())),
            }
        })
        .collect()
}
