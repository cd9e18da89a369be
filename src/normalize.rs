//! Row normalizer
//!
//! Turns heterogeneous records into canonical rows. Every canonical field is
//! resolved through a fixed, prioritized key table: the Korean column name
//! first, then the English fallback (matched case-insensitively), then the
//! field default. Nothing in here fails; unreadable numbers become zero and
//! missing fields take their defaults.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::records::{RawRecord, RawValue};

pub const NAME_KEYS: &[&str] = &["항목", "name"];
pub const VALUE_KEYS: &[&str] = &["값", "value", "금액", "amount"];
pub const UNIT_KEYS: &[&str] = &["단위", "unit"];
pub const CHANGE_KEYS: &[&str] = &["변동률", "change"];
pub const CATEGORY_KEYS: &[&str] = &["분류", "category"];
/// Year column of long-format income rows (`항목`, `연도`, `금액`)
pub const YEAR_KEYS: &[&str] = &["연도", "year"];

/// Catch-all balance category
pub const OTHER_CATEGORY: &str = "기타";

/// Name used when a row carries no item name at all
pub const UNNAMED_ITEM: &str = "(미지정)";

/// Marker appended to canonical year labels
pub const YEAR_MARKER: &str = "년";

static YEAR_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})년?$").expect("year pattern is valid")
});

/// Suffixes stripped from numeric strings before parsing
const NUMERIC_SUFFIXES: &[&str] = &["원", "KRW", "krw", "₩", "%"];

/// A summary metric
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub name: String,
    pub value: Decimal,
    pub unit: String,
    pub change: Option<Decimal>,
}

/// One income-statement line with its amounts by year label, most recent first
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeRow {
    pub name: String,
    pub by_year: Vec<(String, Decimal)>,
}

impl IncomeRow {
    pub fn amount(&self, year_label: &str) -> Option<Decimal> {
        self.by_year
            .iter()
            .find(|(label, _)| label == year_label)
            .map(|(_, amount)| *amount)
    }
}

/// A balance-sheet line
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceRow {
    pub name: String,
    pub value: Decimal,
    pub category: String,
}

/// Which subset of the year set a caller wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearWindow {
    #[default]
    All,
    /// The n most recent years
    Recent(usize),
}

// ============ Key resolution ============

/// First non-blank value among the candidate keys, in priority order
pub fn resolve<'a>(record: &'a RawRecord, keys: &[&str]) -> Option<&'a RawValue> {
    keys.iter().find_map(|key| {
        let value = if key.is_ascii() {
            record.get_ignore_case(key)
        } else {
            record.get(key)
        };
        value.filter(|v| !v.is_blank())
    })
}

fn is_any_key(key: &str, keys: &[&str]) -> bool {
    keys.iter()
        .any(|candidate| key == *candidate || (candidate.is_ascii() && key.eq_ignore_ascii_case(candidate)))
}

fn resolve_text(record: &RawRecord, keys: &[&str]) -> Option<String> {
    resolve(record, keys)
        .and_then(RawValue::as_text)
        .filter(|s| !s.is_empty())
}

// ============ Numbers ============

/// Parse a numeric string: thousands separators, whitespace and trailing
/// currency suffixes are removed; `(1,000)` is read as a negative amount.
pub fn clean_numeric(text: &str) -> Option<Decimal> {
    let mut cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    let mut stripped = true;
    while stripped {
        stripped = false;
        for suffix in NUMERIC_SUFFIXES {
            if let Some(rest) = cleaned.strip_suffix(suffix) {
                cleaned = rest.to_string();
                stripped = true;
            }
        }
    }
    if let Some(rest) = cleaned.strip_prefix('₩') {
        cleaned = rest.to_string();
    }

    let negative = cleaned.starts_with('(') && cleaned.ends_with(')');
    if negative {
        cleaned = cleaned[1..cleaned.len() - 1].to_string();
    }

    let parsed = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;
    Some(if negative { -parsed } else { parsed })
}

/// Numeric value of a cell; anything unreadable is zero
pub fn to_amount(value: &RawValue) -> Decimal {
    to_optional_amount(value).unwrap_or(Decimal::ZERO)
}

/// Numeric value of a cell, `None` when blank. Unreadable text is zero.
pub fn to_optional_amount(value: &RawValue) -> Option<Decimal> {
    match value {
        RawValue::Null => None,
        RawValue::Number(n) => Some(*n),
        RawValue::Text(s) if s.trim().is_empty() => None,
        RawValue::Text(s) => Some(clean_numeric(s).unwrap_or(Decimal::ZERO)),
        RawValue::Bool(_) => Some(Decimal::ZERO),
    }
}

// ============ Years ============

/// Year denoted by a key such as `2024`, `"2024년"` or `"2024 년"`
pub fn parse_year_key(key: &str) -> Option<i32> {
    let compact: String = key.chars().filter(|c| !c.is_whitespace()).collect();
    YEAR_KEY
        .captures(&compact)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Canonical label for a year
pub fn year_label(year: i32) -> String {
    format!("{}{}", year, YEAR_MARKER)
}

/// Year/amount pairs of one income record, in record order.
///
/// Wide rows contribute every year-like column; long rows contribute their
/// `연도` value paired with their amount.
pub fn income_cells(record: &RawRecord) -> Vec<(i32, Decimal)> {
    let mut cells = Vec::new();

    for (key, value) in record.fields() {
        if is_any_key(key, NAME_KEYS) {
            continue;
        }
        if let Some(year) = parse_year_key(key) {
            cells.push((year, to_amount(value)));
        }
    }

    let long_year = resolve(record, YEAR_KEYS)
        .and_then(RawValue::as_text)
        .and_then(|text| parse_year_key(&text));
    if let Some(year) = long_year {
        let amount = resolve(record, VALUE_KEYS).map(to_amount).unwrap_or(Decimal::ZERO);
        cells.push((year, amount));
    }

    cells
}

/// Union of all years across the statement, deduplicated, most recent first
pub fn statement_years(records: &[RawRecord], window: YearWindow) -> Vec<i32> {
    let mut years: Vec<i32> = records
        .iter()
        .flat_map(|record| income_cells(record).into_iter().map(|(year, _)| year))
        .collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();

    if let YearWindow::Recent(n) = window {
        years.truncate(n);
    }
    years
}

/// Year labels of the statement, most recent first
pub fn statement_year_labels(records: &[RawRecord], window: YearWindow) -> Vec<String> {
    statement_years(records, window).into_iter().map(year_label).collect()
}

// ============ Rows ============

pub fn normalize_metric(record: &RawRecord) -> MetricRow {
    MetricRow {
        name: resolve_text(record, NAME_KEYS).unwrap_or_else(|| UNNAMED_ITEM.to_string()),
        value: resolve(record, VALUE_KEYS).map(to_amount).unwrap_or(Decimal::ZERO),
        unit: resolve_text(record, UNIT_KEYS).unwrap_or_default(),
        change: resolve(record, CHANGE_KEYS).and_then(to_optional_amount),
    }
}

pub fn normalize_balance(record: &RawRecord) -> BalanceRow {
    BalanceRow {
        name: resolve_text(record, NAME_KEYS).unwrap_or_else(|| UNNAMED_ITEM.to_string()),
        value: resolve(record, VALUE_KEYS).map(to_amount).unwrap_or(Decimal::ZERO),
        category: resolve_text(record, CATEGORY_KEYS)
            .unwrap_or_else(|| OTHER_CATEGORY.to_string()),
    }
}

/// Normalize one income record. Duplicate years within the record keep the
/// last value; `by_year` is ordered most recent first.
pub fn normalize_income(record: &RawRecord) -> IncomeRow {
    let mut cells = income_cells(record);
    cells.reverse();
    cells.sort_by(|a, b| b.0.cmp(&a.0));
    cells.dedup_by_key(|(year, _)| *year);

    IncomeRow {
        name: resolve_text(record, NAME_KEYS).unwrap_or_else(|| UNNAMED_ITEM.to_string()),
        by_year: cells
            .into_iter()
            .map(|(year, amount)| (year_label(year), amount))
            .collect(),
    }
}

pub fn normalize_metrics(records: &[RawRecord]) -> Vec<MetricRow> {
    records.iter().map(normalize_metric).collect()
}

pub fn normalize_balances(records: &[RawRecord]) -> Vec<BalanceRow> {
    records.iter().map(normalize_balance).collect()
}

pub fn normalize_incomes(records: &[RawRecord]) -> Vec<IncomeRow> {
    records.iter().map(normalize_income).collect()
}

// ============ Canonical records ============

impl MetricRow {
    /// Canonical record form (Korean keys)
    pub fn to_record(&self) -> RawRecord {
        RawRecord::new()
            .with(NAME_KEYS[0], RawValue::Text(self.name.clone()))
            .with(VALUE_KEYS[0], RawValue::Number(self.value))
            .with(UNIT_KEYS[0], RawValue::Text(self.unit.clone()))
            .with(
                CHANGE_KEYS[0],
                self.change.map(RawValue::Number).unwrap_or(RawValue::Null),
            )
    }
}

impl BalanceRow {
    pub fn to_record(&self) -> RawRecord {
        RawRecord::new()
            .with(NAME_KEYS[0], RawValue::Text(self.name.clone()))
            .with(VALUE_KEYS[0], RawValue::Number(self.value))
            .with(CATEGORY_KEYS[0], RawValue::Text(self.category.clone()))
    }
}

impl IncomeRow {
    pub fn to_record(&self) -> RawRecord {
        let mut record = RawRecord::new().with(NAME_KEYS[0], RawValue::Text(self.name.clone()));
        for (label, amount) in &self.by_year {
            record.insert(label, RawValue::Number(*amount));
        }
        record
    }
}
