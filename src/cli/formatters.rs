//! Output formatting module for CLI display
//!
//! Terminal rendering of a `ReportView`. Figures arrive pre-formatted, so
//! this module only lays them out and colors them.

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::presenters::{
    AnalysisView, BalanceView, IncomeView, MetricCard, ReportView, SummaryView, ANALYSIS_TITLE,
};
use crate::reports::ReportKind;

/// Which part of the dashboard to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Income,
    Balance,
    Analysis,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Summary,
        Section::Income,
        Section::Balance,
        Section::Analysis,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Section::Summary => "summary",
            Section::Income => "income",
            Section::Balance => "balance",
            Section::Analysis => "analysis",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "summary" | "요약" => Some(Section::Summary),
            "income" | "손익계산서" => Some(Section::Income),
            "balance" | "재무상태표" => Some(Section::Balance),
            "analysis" | "분석" => Some(Section::Analysis),
            _ => None,
        }
    }
}

fn colored_change(text: &str, positive: Option<bool>) -> String {
    match positive {
        Some(true) => text.green().to_string(),
        Some(false) => text.red().to_string(),
        None => text.to_string(),
    }
}

fn section_title(icon: &str, title: &str) -> String {
    format!("\n{} {}\n\n", icon.cyan().bold(), title.bold())
}

fn empty_line(message: &str) -> String {
    format!("{} {}\n", "ℹ".blue().bold(), message)
}

/// Headline cards as an aligned label/value list
pub fn format_cards(cards: &[MetricCard]) -> String {
    let width = cards
        .iter()
        .map(|c| unicode_width::UnicodeWidthStr::width(c.label.as_str()))
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for card in cards {
        let pad = width.saturating_sub(unicode_width::UnicodeWidthStr::width(card.label.as_str()));
        output.push_str(&format!(
            "  {}{}  {}",
            card.label.bold(),
            " ".repeat(pad),
            card.value.cyan()
        ));
        if let Some(change) = &card.change {
            output.push_str(&format!("  {}", colored_change(&change.text, Some(change.positive))));
        }
        output.push('\n');
    }
    output
}

pub fn format_summary(view: &SummaryView) -> String {
    let mut output = section_title("📊", ReportKind::Summary.title());
    if let Some(message) = &view.empty_message {
        output.push_str(&empty_line(message));
        return output;
    }

    output.push_str(&format_cards(&view.cards));

    #[derive(Tabled)]
    struct SummaryRow {
        #[tabled(rename = "항목")]
        name: String,
        #[tabled(rename = "값")]
        value: String,
        #[tabled(rename = "변동률")]
        change: String,
    }

    let rows: Vec<SummaryRow> = view
        .rows
        .iter()
        .map(|line| SummaryRow {
            name: line.name.clone(),
            value: line.value.clone(),
            change: colored_change(&line.change, line.change_positive),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    output.push('\n');
    output.push_str(&table);
    output.push('\n');
    output
}

pub fn format_income(view: &IncomeView) -> String {
    let mut output = section_title("📈", ReportKind::Income.title());
    if let Some(message) = &view.empty_message {
        output.push_str(&empty_line(message));
        return output;
    }

    let mut builder = Builder::default();
    builder.push_record(std::iter::once("항목".to_string()).chain(view.years.iter().cloned()));
    for line in &view.rows {
        builder.push_record(std::iter::once(line.name.clone()).chain(line.amounts.iter().cloned()));
    }
    let table = builder
        .build()
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    output.push_str(&table);
    output.push('\n');

    if let Some((current, previous)) = &view.comparison_years {
        output.push_str(&format!(
            "\n{} 전년 대비 증감 ({} → {})\n\n",
            "↕".cyan().bold(),
            previous,
            current
        ));

        let mut builder = Builder::default();
        builder.push_record(["항목".to_string(), previous.clone(), current.clone(), "증감률".to_string()]);
        for line in &view.year_over_year {
            builder.push_record([
                line.name.clone(),
                line.previous.clone(),
                line.current.clone(),
                colored_change(&line.change, line.change_positive),
            ]);
        }
        let table = builder
            .build()
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .to_string();
        output.push_str(&table);
        output.push('\n');
    }
    output
}

pub fn format_balance(view: &BalanceView) -> String {
    let mut output = section_title("🏦", ReportKind::Balance.title());
    if let Some(message) = &view.empty_message {
        output.push_str(&empty_line(message));
        return output;
    }

    output.push_str(&format_cards(&view.overview));

    #[derive(Tabled)]
    struct CategoryRow {
        #[tabled(rename = "분류")]
        category: String,
        #[tabled(rename = "금액")]
        total: String,
        #[tabled(rename = "비중")]
        share: String,
    }

    #[derive(Tabled)]
    struct DetailRow {
        #[tabled(rename = "항목")]
        name: String,
        #[tabled(rename = "금액")]
        value: String,
        #[tabled(rename = "분류")]
        category: String,
    }

    let categories: Vec<CategoryRow> = view
        .categories
        .iter()
        .map(|line| CategoryRow {
            category: line.category.clone(),
            total: line.total.clone(),
            share: line.share.clone(),
        })
        .collect();
    let details: Vec<DetailRow> = view
        .rows
        .iter()
        .map(|line| DetailRow {
            name: line.name.clone(),
            value: line.value.clone(),
            category: line.category.clone(),
        })
        .collect();

    output.push_str(&format!("\n{}\n", "분류별 합계".bold()));
    output.push_str(
        &Table::new(categories)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .to_string(),
    );
    output.push_str(&format!("\n\n{}\n", "상세 내역".bold()));
    output.push_str(
        &Table::new(details)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..2)).with(Alignment::right()))
            .to_string(),
    );
    output.push_str(&format!("\n{:<10} {}\n", "합계:".bold(), view.total.cyan()));
    output
}

pub fn format_analysis(view: &AnalysisView) -> String {
    let mut output = section_title("🔍", ANALYSIS_TITLE);
    if let Some(message) = &view.empty_message {
        output.push_str(&empty_line(message));
        return output;
    }
    if let Some(year) = &view.year {
        output.push_str(&format!("  기준 연도: {}\n", year));
    }
    output.push_str(&format_cards(&view.margins));
    output
}

pub fn format_section(view: &ReportView, section: Section) -> String {
    match section {
        Section::Summary => format_summary(&view.summary),
        Section::Income => format_income(&view.income),
        Section::Balance => format_balance(&view.balance),
        Section::Analysis => format_analysis(&view.analysis),
    }
}

/// Report heading with the data source
pub fn format_header(view: &ReportView) -> String {
    let mut output = format!("\n{}\n", view.title.bold().underline());
    if !view.source.is_empty() {
        output.push_str(&format!("{}\n", format!("데이터: {}", view.source).bright_black()));
    }
    output
}

/// Every section in dashboard order
pub fn format_dashboard(view: &ReportView) -> String {
    let mut output = format_header(view);
    for section in Section::ALL {
        output.push_str(&format_section(view, section));
    }
    output
}
