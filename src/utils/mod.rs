//! Utility functions for formatting report figures
//!
//! This module is the single source of every displayed number. Both the
//! terminal and the HTML presenters go through these functions, so the two
//! outputs can never disagree on rounding or scale.
//!
//! Large amounts use the Korean scale units:
//! - 조 = 10^12
//! - 억 = 10^8
//! - 만 = 10^4

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Currency unit used by the reports
pub const CURRENCY_UNIT: &str = "원";

/// Default number of decimals for percentages
pub const DEFAULT_PERCENT_DECIMALS: u32 = 2;

/// A scale band for large-number formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleBand {
    /// 조 (10^12)
    Jo,
    /// 억 (10^8)
    Eok,
    /// 만 (10^4)
    Man,
    /// Below 10^4, printed as a grouped integer
    Ones,
}

impl ScaleBand {
    /// Pick the band for a value, largest first, by absolute value
    pub fn for_value(value: Decimal) -> Self {
        let abs = value.abs();
        if abs >= Self::Jo.divisor() {
            ScaleBand::Jo
        } else if abs >= Self::Eok.divisor() {
            ScaleBand::Eok
        } else if abs >= Self::Man.divisor() {
            ScaleBand::Man
        } else {
            ScaleBand::Ones
        }
    }

    pub fn divisor(&self) -> Decimal {
        match self {
            ScaleBand::Jo => Decimal::from(1_000_000_000_000i64),
            ScaleBand::Eok => Decimal::from(100_000_000i64),
            ScaleBand::Man => Decimal::from(10_000i64),
            ScaleBand::Ones => Decimal::ONE,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            ScaleBand::Jo => "조",
            ScaleBand::Eok => "억",
            ScaleBand::Man => "만",
            ScaleBand::Ones => "",
        }
    }
}

/// Round half away from zero and drop a negative sign on zero
fn round_to(value: Decimal, decimals: u32) -> Decimal {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Format a value with comma thousands separators and fixed decimals.
///
/// # Examples
/// ```
/// use finreport::utils::group_thousands;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(group_thousands(dec!(1234567.891), 2), "1,234,567.89");
/// assert_eq!(group_thousands(dec!(-9999.5), 0), "-10,000");
/// ```
pub fn group_thousands(value: Decimal, decimals: u32) -> String {
    let rounded = round_to(value, decimals);
    let is_negative = rounded < Decimal::ZERO;

    let formatted = format!("{:.prec$}", rounded.abs(), prec = decimals as usize);
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (formatted.as_str(), None),
    };

    // Add thousands separators (,) to integer part
    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    match decimal_part {
        Some(dec) => format!("{}{}.{}", sign, with_separators, dec),
        None => format!("{}{}", sign, with_separators),
    }
}

/// Format an amount with the Korean scale units.
///
/// A missing value renders as the bare string `"0"`, without the unit.
///
/// # Examples
/// ```
/// use finreport::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(Some(dec!(1000000000000)), "원"), "1.00조 원");
/// assert_eq!(format_currency(Some(dec!(150000000000)), "원"), "1500.00억 원");
/// assert_eq!(format_currency(Some(dec!(25000)), "원"), "2.50만 원");
/// assert_eq!(format_currency(Some(dec!(9999)), "원"), "9,999 원");
/// assert_eq!(format_currency(None, "원"), "0");
/// ```
pub fn format_currency(value: Option<Decimal>, unit: &str) -> String {
    let Some(value) = value else {
        return "0".to_string();
    };

    match ScaleBand::for_value(value) {
        ScaleBand::Ones => format!("{} {}", group_thousands(value, 0), unit),
        band => {
            let scaled = round_to(value / band.divisor(), 2);
            format!("{:.2}{} {}", scaled, band.suffix(), unit)
        }
    }
}

/// Format a percentage with fixed decimals; missing renders as `"0%"`.
///
/// # Examples
/// ```
/// use finreport::utils::format_percentage;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_percentage(Some(dec!(15)), 2), "15.00%");
/// assert_eq!(format_percentage(Some(dec!(-2.125)), 1), "-2.1%");
/// assert_eq!(format_percentage(None, 2), "0%");
/// ```
pub fn format_percentage(value: Option<Decimal>, decimals: u32) -> String {
    match value {
        Some(v) => format!("{:.prec$}%", round_to(v, decimals), prec = decimals as usize),
        None => "0%".to_string(),
    }
}

/// Whether a unit label denotes money and gets the scale-unit treatment
pub fn is_currency_unit(unit: &str) -> bool {
    matches!(unit.trim(), CURRENCY_UNIT | "KRW" | "₩")
}

/// Format a metric value for cards and summary tables.
///
/// Money goes through [`format_currency`]; anything else (ratios, counts)
/// is shown with one decimal followed by its unit.
pub fn format_metric_value(value: Decimal, unit: &str) -> String {
    if is_currency_unit(unit) {
        format_currency(Some(value), unit)
    } else if unit.is_empty() {
        group_thousands(value, 1)
    } else {
        format!("{} {}", group_thousands(value, 1), unit)
    }
}

/// Year-over-year change label for metric cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeLabel {
    pub text: String,
    pub positive: bool,
}

/// Whether a change reads as non-negative once shown with one decimal
pub fn change_is_positive(change: Decimal) -> bool {
    round_to(change, 1) >= Decimal::ZERO
}

/// Build the card change label: `"↑ 5.2%"` or `"↓ 2.1%"`
pub fn format_change_label(change: Option<Decimal>) -> Option<ChangeLabel> {
    let change = change?;
    let positive = change_is_positive(change);
    let arrow = if positive { "↑" } else { "↓" };
    Some(ChangeLabel {
        text: format!("{} {:.1}%", arrow, round_to(change.abs(), 1)),
        positive,
    })
}

/// Signed change for tables: `"+5.2%"`, `"-2.1%"`, or `"-"` when absent
pub fn format_signed_change(change: Option<Decimal>) -> String {
    match change {
        Some(c) => {
            let sign = if change_is_positive(c) { "+" } else { "-" };
            format!("{}{:.1}%", sign, round_to(c.abs(), 1))
        }
        None => "-".to_string(),
    }
}
