//! Integration tests for the report pipeline
//!
//! These tests drive a report file through loading, normalization, the
//! report builders and both presenters:
//! - Mixed Korean/English and wide/long schemas
//! - Korean scale-unit formatting in cards and tables
//! - Category totals and class overview
//! - Margin analysis edge cases
//! - Terminal and HTML output showing the same figures

use anyhow::Result;
use chrono::NaiveDate;
use finreport::cli::formatters::{format_balance, format_income, format_summary};
use finreport::importers::{load_report_file, sample_data};
use finreport::presenters::html::render_document;
use finreport::presenters::{ReportView, ViewOptions};
use finreport::reports::{build_report, BuildOptions, FinancialReport, YearWindow};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::PathBuf;
use tempfile::TempDir;

const MIXED_REPORT: &str = r#"{
  "summary": [
    {"name": "Revenue", "value": "1,000,000,000,000원", "unit": "원", "change": "5.2"},
    {"항목": "부채비율", "값": 45.2, "단위": "%", "변동률": -2.1}
  ],
  "income_statement": [
    {"항목": "매출액", "2022년": 900000000000, "2024": 1000000000000, "2023 년": 950000000000},
    {"name": "영업이익", "2024년": 150000000000, "2023년": 140000000000},
    {"항목": "순이익", "연도": "2024", "금액": 120000000000},
    {"항목": "순이익", "연도": 2023, "금액": 100000000000}
  ],
  "balance_sheet": [
    {"항목": "현금", "값": 300000000000, "분류": "유동자산"},
    {"항목": "재고자산", "값": 400000000000, "분류": "유동자산"},
    {"항목": "유형자산", "값": "3,000,000,000,000", "분류": "비유동자산"},
    {"항목": "장기차입금", "값": 1000000000000, "분류": "비유동부채"},
    {"항목": "잡손실충당", "값": 100}
  ]
}"#;

/// Test helper: write a report file into a fresh temp dir
fn write_report_file(name: &str, contents: &str) -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let path = dir.path().join(name);
    std::fs::write(&path, contents)?;
    Ok((dir, path))
}

fn build_mixed_report() -> Result<FinancialReport> {
    let (_dir, path) = write_report_file("report.json", MIXED_REPORT)?;
    let data = load_report_file(&path)?;
    Ok(build_report(&data, &BuildOptions::default()))
}

fn view_of(report: &FinancialReport) -> ReportView {
    ReportView::new(report, &ViewOptions::default())
}

#[test]
fn test_summary_cards_use_korean_units() -> Result<()> {
    let report = build_mixed_report()?;
    let view = view_of(&report);

    assert_eq!(view.summary.cards.len(), 2);
    let revenue = &view.summary.cards[0];
    assert_eq!(revenue.label, "Revenue");
    assert_eq!(revenue.value, "1.00조 원");
    let change = revenue.change.as_ref().expect("revenue has a change");
    assert_eq!(change.text, "↑ 5.2%");
    assert!(change.positive);

    let ratio = &view.summary.cards[1];
    assert_eq!(ratio.value, "45.2 %");
    assert_eq!(ratio.change.as_ref().map(|c| c.text.as_str()), Some("↓ 2.1%"));
    Ok(())
}

#[test]
fn test_income_years_are_unioned_and_descending() -> Result<()> {
    let report = build_mixed_report()?;

    assert_eq!(report.income.years, vec!["2024년", "2023년", "2022년"]);
    let names: Vec<&str> = report.income.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["매출액", "영업이익", "순이익"]);

    // Long-format rows for the same item are pivoted into one row
    assert_eq!(report.income.amount("순이익", "2024년"), dec!(120000000000));
    assert_eq!(report.income.amount("순이익", "2023년"), dec!(100000000000));
    // Absent item/year pairs read as zero
    assert_eq!(report.income.amount("영업이익", "2022년"), Decimal::ZERO);

    let view = view_of(&report);
    assert_eq!(view.income.rows[1].amounts[2], "0 원");
    assert_eq!(view.income.rows[0].amounts[0], "1.00조 원");
    Ok(())
}

#[test]
fn test_recent_year_window() -> Result<()> {
    let (_dir, path) = write_report_file("report.json", MIXED_REPORT)?;
    let data = load_report_file(&path)?;
    let options = BuildOptions {
        year_window: YearWindow::Recent(2),
    };
    let report = build_report(&data, &options);

    assert_eq!(report.income.years, vec!["2024년", "2023년"]);
    assert!(report.income.rows.iter().all(|row| row.by_year.len() == 2));
    Ok(())
}

#[test]
fn test_margins_use_latest_year() -> Result<()> {
    let report = build_mixed_report()?;
    let margins = report.income.margins.as_ref().expect("margins");

    assert_eq!(margins.year, "2024년");
    assert_eq!(margins.operating_margin, Some(dec!(15)));
    assert_eq!(margins.net_margin, Some(dec!(12)));

    let view = view_of(&report);
    let values: Vec<&str> = view.analysis.margins.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, vec!["15.00%", "12.00%"]);
    Ok(())
}

#[test]
fn test_margins_omitted_when_revenue_is_zero() -> Result<()> {
    let (_dir, path) = write_report_file(
        "zero.json",
        r#"{"income_statement": [
            {"항목": "매출액", "2024년": 0},
            {"항목": "영업이익", "2024년": 100}
        ]}"#,
    )?;
    let data = load_report_file(&path)?;
    let report = build_report(&data, &BuildOptions::default());

    let margins = report.income.margins.as_ref().expect("one year present");
    assert_eq!(margins.operating_margin, None);
    assert_eq!(margins.net_margin, None);

    let view = view_of(&report);
    assert!(view.analysis.margins.is_empty());
    assert!(view.analysis.empty_message.is_some());
    Ok(())
}

#[test]
fn test_year_over_year_against_previous_year() -> Result<()> {
    let report = build_mixed_report()?;
    let revenue = report
        .income
        .year_over_year
        .iter()
        .find(|yoy| yoy.name == "매출액")
        .expect("revenue comparison");

    assert_eq!(revenue.current_year, "2024년");
    assert_eq!(revenue.previous_year, "2023년");
    let change = revenue.change_percent.expect("previous year is non-zero");
    assert_eq!(change.round_dp(1), dec!(5.3));
    Ok(())
}

#[test]
fn test_balance_category_totals() -> Result<()> {
    let report = build_mixed_report()?;
    let balance = &report.balance;

    let categories: Vec<&str> = balance.totals.iter().map(|t| t.category.as_str()).collect();
    assert_eq!(categories, vec!["유동자산", "비유동자산", "비유동부채", "기타"]);
    assert_eq!(balance.totals[0].total, dec!(700000000000));

    let sum: Decimal = balance.totals.iter().map(|t| t.total).sum();
    assert_eq!(sum, balance.grand_total());

    let view = view_of(&report);
    assert_eq!(view.balance.categories[0].total, "7000.00억 원");
    assert_eq!(view.balance.categories[3].total, "100 원");
    assert_eq!(view.balance.rows[4].category, "기타");
    Ok(())
}

#[test]
fn test_balance_overview_classes() -> Result<()> {
    let report = build_mixed_report()?;
    let view = view_of(&report);

    let labels: Vec<&str> = view.balance.overview.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["총 자산", "총 부채", "총 자본"]);
    assert_eq!(view.balance.overview[0].value, "3.70조 원");
    assert_eq!(view.balance.overview[1].value, "1.00조 원");
    assert_eq!(view.balance.overview[2].value, "0 원");
    Ok(())
}

#[test]
fn test_empty_sections_render_messages() -> Result<()> {
    let (_dir, path) = write_report_file("empty.json", "{}")?;
    let data = load_report_file(&path)?;
    assert!(data.is_empty());

    let report = build_report(&data, &BuildOptions::default());
    let view = view_of(&report);
    assert!(view.summary.empty_message.is_some());
    assert!(view.income.empty_message.is_some());
    assert!(view.balance.empty_message.is_some());
    assert!(view.analysis.empty_message.is_some());

    let html = render_document(&view, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    assert!(html.contains("생성일: 2025년 01월 02일"));
    Ok(())
}

#[test]
fn test_unsupported_file_is_rejected() -> Result<()> {
    let (_dir, path) = write_report_file("report.csv", "항목,값\n매출액,100\n")?;
    let err = load_report_file(&path).unwrap_err();
    assert!(err.to_string().contains("unsupported file type"));
    Ok(())
}

#[test]
fn test_terminal_and_html_show_same_figures() -> Result<()> {
    colored::control::set_override(false);
    let report = build_report(&sample_data()?, &BuildOptions::default());
    let view = view_of(&report);

    let terminal = format!(
        "{}{}{}",
        format_summary(&view.summary),
        format_income(&view.income),
        format_balance(&view.balance)
    );
    let html = render_document(&view, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());

    let figures = view
        .summary
        .cards
        .iter()
        .map(|c| c.value.clone())
        .chain(view.income.rows.iter().flat_map(|r| r.amounts.clone()))
        .chain(view.balance.categories.iter().map(|c| c.total.clone()))
        .chain(std::iter::once(view.balance.total.clone()));

    for figure in figures {
        assert!(terminal.contains(&figure), "terminal output misses {}", figure);
        assert!(html.contains(&figure), "HTML output misses {}", figure);
    }
    Ok(())
}
