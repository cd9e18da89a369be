//! Presentation view model shared by the HTML and terminal presenters
//!
//! `ReportView` holds every figure already formatted as display text. It is
//! the only place that calls the numeric formatter for report output, so a
//! number rendered in the terminal and in the HTML file is the same string.

pub mod html;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{classify_row, BalanceClass, TREND_ITEMS};
use crate::reports::{BalanceReport, FinancialReport, IncomeReport, ReportKind, SummaryReport};
use crate::utils::{
    change_is_positive, format_change_label, format_currency, format_metric_value,
    format_percentage, format_signed_change, ChangeLabel, CURRENCY_UNIT, DEFAULT_PERCENT_DECIMALS,
};

/// Heading and empty message of the analysis section
pub const ANALYSIS_TITLE: &str = "재무 분석";
pub const ANALYSIS_EMPTY_MESSAGE: &str = "분석을 위한 데이터를 불러올 수 없습니다.";

pub const OPERATING_MARGIN_LABEL: &str = "영업이익률";
pub const NET_MARGIN_LABEL: &str = "순이익률";

/// Presenter settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub title: String,
    pub currency_unit: String,
    pub source: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            title: crate::config::DEFAULT_TITLE.to_string(),
            currency_unit: CURRENCY_UNIT.to_string(),
            source: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub title: String,
    pub source: String,
    pub summary: SummaryView,
    pub income: IncomeView,
    pub balance: BalanceView,
    pub analysis: AnalysisView,
    pub charts: ChartPayload,
}

/// Headline card: a label, a formatted value and an optional change badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub change: Option<ChangeLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub name: String,
    pub value: String,
    pub change: String,
    /// `None` when the change is absent
    pub change_positive: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryView {
    pub empty_message: Option<String>,
    pub cards: Vec<MetricCard>,
    pub rows: Vec<SummaryLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeLine {
    pub name: String,
    /// One formatted amount per year, aligned with `IncomeView::years`
    pub amounts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearOverYearLine {
    pub name: String,
    pub previous: String,
    pub current: String,
    pub change: String,
    pub change_positive: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeView {
    pub empty_message: Option<String>,
    pub years: Vec<String>,
    pub rows: Vec<IncomeLine>,
    /// `(current, previous)` year labels when at least two years exist
    pub comparison_years: Option<(String, String)>,
    pub year_over_year: Vec<YearOverYearLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryLine {
    pub category: String,
    pub total: String,
    pub share: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceLine {
    pub name: String,
    pub value: String,
    pub category: String,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceView {
    pub empty_message: Option<String>,
    /// 총 자산 / 총 부채 / 총 자본
    pub overview: Vec<MetricCard>,
    pub categories: Vec<CategoryLine>,
    pub rows: Vec<BalanceLine>,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisView {
    pub empty_message: Option<String>,
    pub year: Option<String>,
    pub margins: Vec<MetricCard>,
}

/// One chart series of raw values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<f64>,
}

/// Raw figures for the charts. Values are plotted, never displayed as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub summary_labels: Vec<String>,
    pub summary_values: Vec<f64>,
    pub summary_changes: Vec<f64>,
    pub income_years: Vec<String>,
    pub income_all: Vec<ChartSeries>,
    pub income_trend: Vec<ChartSeries>,
    pub balance_labels: Vec<String>,
    pub balance_values: Vec<f64>,
}

fn chart_number(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn empty_message(kind: ReportKind, is_empty: bool) -> Option<String> {
    is_empty.then(|| kind.empty_message().to_string())
}

pub fn summary_view(report: &SummaryReport) -> SummaryView {
    let cards = report
        .cards()
        .iter()
        .map(|row| MetricCard {
            label: row.name.clone(),
            value: format_metric_value(row.value, &row.unit),
            change: format_change_label(row.change),
        })
        .collect();

    let rows = report
        .rows
        .iter()
        .map(|row| SummaryLine {
            name: row.name.clone(),
            value: format_metric_value(row.value, &row.unit),
            change: format_signed_change(row.change),
            change_positive: row.change.map(change_is_positive),
        })
        .collect();

    SummaryView {
        empty_message: empty_message(ReportKind::Summary, report.is_empty()),
        cards,
        rows,
    }
}

pub fn income_view(report: &IncomeReport, unit: &str) -> IncomeView {
    let rows = report
        .rows
        .iter()
        .map(|row| IncomeLine {
            name: row.name.clone(),
            amounts: report
                .years
                .iter()
                .map(|year| format_currency(Some(report.amount(&row.name, year)), unit))
                .collect(),
        })
        .collect();

    let comparison_years = report
        .year_over_year
        .first()
        .map(|yoy| (yoy.current_year.clone(), yoy.previous_year.clone()));

    let year_over_year = report
        .year_over_year
        .iter()
        .map(|yoy| YearOverYearLine {
            name: yoy.name.clone(),
            previous: format_currency(Some(yoy.previous), unit),
            current: format_currency(Some(yoy.current), unit),
            change: format_signed_change(yoy.change_percent),
            change_positive: yoy.change_percent.map(change_is_positive),
        })
        .collect();

    IncomeView {
        empty_message: empty_message(ReportKind::Income, report.is_empty()),
        years: report.years.clone(),
        rows,
        comparison_years,
        year_over_year,
    }
}

pub fn balance_view(report: &BalanceReport, unit: &str) -> BalanceView {
    let overview = report
        .class_totals
        .iter()
        .map(|total| MetricCard {
            label: total.class.total_label(),
            value: format_currency(Some(total.total), unit),
            change: None,
        })
        .collect();

    let categories = report
        .totals
        .iter()
        .zip(report.category_shares())
        .map(|(total, (_, share))| CategoryLine {
            category: total.category.clone(),
            total: format_currency(Some(total.total), unit),
            share: format_percentage(share, 1),
        })
        .collect();

    let rows = report
        .rows
        .iter()
        .map(|row| BalanceLine {
            name: row.name.clone(),
            value: format_currency(Some(row.value), unit),
            category: row.category.clone(),
            class: match classify_row(row) {
                BalanceClass::Other => String::new(),
                class => class.label().to_string(),
            },
        })
        .collect();

    BalanceView {
        empty_message: empty_message(ReportKind::Balance, report.is_empty()),
        overview,
        categories,
        rows,
        total: format_currency(Some(report.grand_total()), unit),
    }
}

/// Margin cards for the most recent year; a margin that cannot be computed is left out
pub fn analysis_view(report: &IncomeReport) -> AnalysisView {
    let Some(margins) = &report.margins else {
        return AnalysisView {
            empty_message: Some(ANALYSIS_EMPTY_MESSAGE.to_string()),
            year: None,
            margins: Vec::new(),
        };
    };

    let cards: Vec<MetricCard> = [
        (OPERATING_MARGIN_LABEL, margins.operating_margin),
        (NET_MARGIN_LABEL, margins.net_margin),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        value.map(|v| MetricCard {
            label: label.to_string(),
            value: format_percentage(Some(v), DEFAULT_PERCENT_DECIMALS),
            change: None,
        })
    })
    .collect();

    AnalysisView {
        empty_message: cards
            .is_empty()
            .then(|| ANALYSIS_EMPTY_MESSAGE.to_string()),
        year: Some(margins.year.clone()),
        margins: cards,
    }
}

pub fn chart_payload(report: &FinancialReport) -> ChartPayload {
    let summary_rows = report.summary.chart_rows();
    let income = &report.income;

    let series = |name: &str| ChartSeries {
        label: name.to_string(),
        data: income
            .years
            .iter()
            .map(|year| chart_number(income.amount(name, year)))
            .collect(),
    };

    ChartPayload {
        summary_labels: summary_rows.iter().map(|r| r.name.clone()).collect(),
        summary_values: summary_rows.iter().map(|r| chart_number(r.value)).collect(),
        summary_changes: summary_rows
            .iter()
            .map(|r| r.change.map(chart_number).unwrap_or(0.0))
            .collect(),
        income_years: income.years.clone(),
        income_all: income.rows.iter().map(|row| series(&row.name)).collect(),
        income_trend: TREND_ITEMS
            .iter()
            .filter(|item| income.rows.iter().any(|row| row.name == **item))
            .map(|item| series(item))
            .collect(),
        balance_labels: report.balance.totals.iter().map(|t| t.category.clone()).collect(),
        balance_values: report.balance.totals.iter().map(|t| chart_number(t.total)).collect(),
    }
}

impl ReportView {
    pub fn new(report: &FinancialReport, options: &ViewOptions) -> Self {
        let unit = options.currency_unit.as_str();
        Self {
            title: options.title.clone(),
            source: options.source.clone(),
            summary: summary_view(&report.summary),
            income: income_view(&report.income, unit),
            balance: balance_view(&report.balance, unit),
            analysis: analysis_view(&report.income),
            charts: chart_payload(report),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::sample_data;
    use crate::records::{RawRecord, RawValue};
    use crate::reports::{build_report, BuildOptions, ReportData};
    use rust_decimal_macros::dec;

    fn sample_view() -> ReportView {
        let report = build_report(&sample_data().unwrap(), &BuildOptions::default());
        ReportView::new(&report, &ViewOptions::default())
    }

    #[test]
    fn test_summary_card_from_metric() {
        let data = ReportData {
            summary: vec![RawRecord::new()
                .with("항목", RawValue::Text("매출액".into()))
                .with("값", RawValue::Number(dec!(1000000000000)))
                .with("단위", RawValue::Text("원".into()))
                .with("변동률", RawValue::Number(dec!(5.2)))],
            ..Default::default()
        };
        let report = build_report(&data, &BuildOptions::default());
        let view = ReportView::new(&report, &ViewOptions::default());

        let card = &view.summary.cards[0];
        assert_eq!(card.label, "매출액");
        assert_eq!(card.value, "1.00조 원");
        assert_eq!(card.change.as_ref().unwrap().text, "↑ 5.2%");
        assert_eq!(view.summary.rows[0].change, "+5.2%");
    }

    #[test]
    fn test_sample_view_sections() {
        let view = sample_view();
        assert_eq!(view.summary.cards.len(), 6);
        assert_eq!(view.income.years, vec!["2024년", "2023년", "2022년"]);
        assert_eq!(view.income.rows[0].amounts[0], "1.00조 원");
        assert_eq!(view.balance.overview.len(), 3);
        assert_eq!(view.balance.overview[0].label, "총 자산");
        assert!(view.summary.empty_message.is_none());
    }

    #[test]
    fn test_analysis_margins() {
        let view = sample_view();
        assert_eq!(view.analysis.year.as_deref(), Some("2024년"));
        assert_eq!(view.analysis.margins[0].label, OPERATING_MARGIN_LABEL);
        assert_eq!(view.analysis.margins[0].value, "15.00%");
        assert_eq!(view.analysis.margins[1].value, "12.00%");
    }

    #[test]
    fn test_empty_report_has_messages() {
        let report = build_report(&ReportData::default(), &BuildOptions::default());
        let view = ReportView::new(&report, &ViewOptions::default());

        assert_eq!(view.summary.empty_message.as_deref(), Some("요약 데이터가 없습니다."));
        assert_eq!(view.income.empty_message.as_deref(), Some("손익계산서 데이터가 없습니다."));
        assert_eq!(view.balance.empty_message.as_deref(), Some("재무상태표 데이터가 없습니다."));
        assert_eq!(view.analysis.empty_message.as_deref(), Some(ANALYSIS_EMPTY_MESSAGE));
        assert!(view.charts.summary_labels.is_empty());
    }

    #[test]
    fn test_zero_revenue_omits_margins() {
        let data = ReportData {
            income_statement: vec![
                RawRecord::new()
                    .with("항목", RawValue::Text("매출액".into()))
                    .with("2024년", RawValue::Number(dec!(0))),
                RawRecord::new()
                    .with("항목", RawValue::Text("영업이익".into()))
                    .with("2024년", RawValue::Number(dec!(10))),
            ],
            ..Default::default()
        };
        let report = build_report(&data, &BuildOptions::default());
        let view = analysis_view(&report.income);
        assert!(view.margins.is_empty());
        assert_eq!(view.empty_message.as_deref(), Some(ANALYSIS_EMPTY_MESSAGE));
    }

    #[test]
    fn test_missing_latest_year_omits_margin_card() {
        let data = ReportData {
            income_statement: vec![
                RawRecord::new()
                    .with("항목", RawValue::Text("매출액".into()))
                    .with("2024년", RawValue::Number(dec!(1000)))
                    .with("2023년", RawValue::Number(dec!(900))),
                RawRecord::new()
                    .with("항목", RawValue::Text("영업이익".into()))
                    .with("2023년", RawValue::Number(dec!(100))),
            ],
            ..Default::default()
        };
        let report = build_report(&data, &BuildOptions::default());
        let view = analysis_view(&report.income);
        assert_eq!(view.year.as_deref(), Some("2024년"));
        assert!(view.margins.iter().all(|card| card.label != OPERATING_MARGIN_LABEL));
        assert_eq!(view.empty_message.as_deref(), Some(ANALYSIS_EMPTY_MESSAGE));
    }

    #[test]
    fn test_change_color_follows_rounded_sign() {
        let data = ReportData {
            summary: vec![RawRecord::new()
                .with("항목", RawValue::Text("매출액".into()))
                .with("값", RawValue::Number(dec!(100)))
                .with("단위", RawValue::Text("원".into()))
                .with("변동률", RawValue::Number(dec!(-0.04)))],
            ..Default::default()
        };
        let report = build_report(&data, &BuildOptions::default());
        let view = ReportView::new(&report, &ViewOptions::default());

        let change = view.summary.cards[0].change.as_ref().unwrap();
        assert_eq!(change.text, "↑ 0.0%");
        assert!(change.positive);
        assert_eq!(view.summary.rows[0].change, "+0.0%");
        assert_eq!(view.summary.rows[0].change_positive, Some(true));
    }

    #[test]
    fn test_chart_payload_uses_raw_values() {
        let view = sample_view();
        assert_eq!(view.charts.summary_values[0], 1_000_000_000_000.0);
        assert_eq!(view.charts.income_trend.len(), 3);
        assert_eq!(view.charts.income_trend[0].label, "매출액");
        assert_eq!(view.charts.balance_labels.len(), view.balance.categories.len());
    }

    #[test]
    fn test_view_serializes_to_json() {
        let json = sample_view().to_json();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["summary"]["cards"][0]["value"], "1.00조 원");
    }
}
