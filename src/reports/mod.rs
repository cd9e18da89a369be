// Reports module - canonical report models built from raw records

pub mod balance;
pub mod income;
pub mod summary;

pub use balance::{build_balance, BalanceReport};
pub use income::{build_income, IncomeReport};
pub use summary::{build_summary, SummaryReport, SUMMARY_CARD_LIMIT, SUMMARY_CHART_LIMIT};

use std::fmt;
use std::str::FromStr;
use tracing::info;

pub use crate::normalize::YearWindow;
use crate::records::RawRecord;

/// The three report views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Summary,
    Income,
    Balance,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [ReportKind::Summary, ReportKind::Income, ReportKind::Balance];

    /// Top-level key in JSON input files
    pub fn json_key(&self) -> &'static str {
        match self {
            ReportKind::Summary => "summary",
            ReportKind::Income => "income_statement",
            ReportKind::Balance => "balance_sheet",
        }
    }

    /// Sheet name in Excel input files
    pub fn sheet_name(&self) -> &'static str {
        match self {
            ReportKind::Summary => "전체요약",
            ReportKind::Income => "손익계산서",
            ReportKind::Balance => "재무상태표",
        }
    }

    /// Display title
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Summary => "전체 요약",
            ReportKind::Income => "손익계산서",
            ReportKind::Balance => "재무상태표",
        }
    }

    /// Message shown when the section has no rows
    pub fn empty_message(&self) -> &'static str {
        match self {
            ReportKind::Summary => "요약 데이터가 없습니다.",
            ReportKind::Income => "손익계산서 데이터가 없습니다.",
            ReportKind::Balance => "재무상태표 데이터가 없습니다.",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" | "전체요약" | "전체 요약" => Ok(ReportKind::Summary),
            "income" | "income_statement" | "손익계산서" => Ok(ReportKind::Income),
            "balance" | "balance_sheet" | "재무상태표" => Ok(ReportKind::Balance),
            other => Err(format!(
                "Unknown report '{}'. Use: summary, income, balance",
                other
            )),
        }
    }
}

/// Raw input for all three reports, each an ordered sequence of records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportData {
    pub summary: Vec<RawRecord>,
    pub income_statement: Vec<RawRecord>,
    pub balance_sheet: Vec<RawRecord>,
}

impl ReportData {
    pub fn records(&self, kind: ReportKind) -> &[RawRecord] {
        match kind {
            ReportKind::Summary => &self.summary,
            ReportKind::Income => &self.income_statement,
            ReportKind::Balance => &self.balance_sheet,
        }
    }

    pub fn set(&mut self, kind: ReportKind, records: Vec<RawRecord>) {
        match kind {
            ReportKind::Summary => self.summary = records,
            ReportKind::Income => self.income_statement = records,
            ReportKind::Balance => self.balance_sheet = records,
        }
    }

    pub fn is_empty(&self) -> bool {
        ReportKind::ALL.iter().all(|kind| self.records(*kind).is_empty())
    }
}

/// Options for building the report models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    pub year_window: YearWindow,
}

/// One report view
#[derive(Debug, Clone, PartialEq)]
pub enum ReportModel {
    Summary(SummaryReport),
    Income(IncomeReport),
    Balance(BalanceReport),
}

impl ReportModel {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportModel::Summary(_) => ReportKind::Summary,
            ReportModel::Income(_) => ReportKind::Income,
            ReportModel::Balance(_) => ReportKind::Balance,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ReportModel::Summary(r) => r.is_empty(),
            ReportModel::Income(r) => r.is_empty(),
            ReportModel::Balance(r) => r.is_empty(),
        }
    }
}

/// All three views built from one dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinancialReport {
    pub summary: SummaryReport,
    pub income: IncomeReport,
    pub balance: BalanceReport,
}

impl FinancialReport {
    pub fn model(&self, kind: ReportKind) -> ReportModel {
        match kind {
            ReportKind::Summary => ReportModel::Summary(self.summary.clone()),
            ReportKind::Income => ReportModel::Income(self.income.clone()),
            ReportKind::Balance => ReportModel::Balance(self.balance.clone()),
        }
    }
}

/// Build one report view
pub fn build_model(data: &ReportData, kind: ReportKind, options: &BuildOptions) -> ReportModel {
    let records = data.records(kind);
    match kind {
        ReportKind::Summary => ReportModel::Summary(build_summary(records)),
        ReportKind::Income => ReportModel::Income(build_income(records, options.year_window)),
        ReportKind::Balance => ReportModel::Balance(build_balance(records)),
    }
}

/// Build all three report views
pub fn build_report(data: &ReportData, options: &BuildOptions) -> FinancialReport {
    info!(
        "Building report from {} summary, {} income, {} balance rows",
        data.summary.len(),
        data.income_statement.len(),
        data.balance_sheet.len()
    );

    FinancialReport {
        summary: build_summary(&data.summary),
        income: build_income(&data.income_statement, options.year_window),
        balance: build_balance(&data.balance_sheet),
    }
}
