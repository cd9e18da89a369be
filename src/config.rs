//! Application configuration
//!
//! Read from `--config <path>` or `<config home>/finreport/config.toml`. A
//! missing default file is not an error; every field has a default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ReportError;
use crate::reports::{BuildOptions, YearWindow};
use crate::utils::CURRENCY_UNIT;
use crate::warehouse::QuerySet;

pub const ENV_DB_PATH: &str = "FINREPORT_DB";
pub const ENV_OUTPUT: &str = "FINREPORT_OUTPUT";

pub const DEFAULT_TITLE: &str = "재무실적보고서";
pub const DEFAULT_MAX_YEARS: usize = 5;
pub const DEFAULT_OUTPUT: &str = "financial_report.html";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub warehouse: WarehouseConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    pub path: Option<PathBuf>,
    pub summary_query: String,
    pub income_query: String,
    pub balance_query: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        let queries = QuerySet::default();
        Self {
            path: None,
            summary_query: queries.summary,
            income_query: queries.income,
            balance_query: queries.balance,
        }
    }
}

impl WarehouseConfig {
    pub fn queries(&self) -> QuerySet {
        QuerySet {
            summary: self.summary_query.clone(),
            income: self.income_query.clone(),
            balance: self.balance_query.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
    pub currency_unit: String,
    pub max_years: usize,
    pub output: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            currency_unit: CURRENCY_UNIT.to_string(),
            max_years: DEFAULT_MAX_YEARS,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl ReportConfig {
    /// Build options for the static report; `years` overrides `max_years`
    pub fn build_options(&self, years: Option<usize>) -> BuildOptions {
        let limit = years.unwrap_or(self.max_years);
        BuildOptions {
            year_window: if limit == 0 {
                YearWindow::All
            } else {
                YearWindow::Recent(limit)
            },
        }
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join("finreport").join("config.toml"))
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ReportError::Config(e.to_string()).into())
    }

    /// Load configuration and apply environment overrides.
    ///
    /// An explicit path must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None => match default_config_path() {
                Some(default) if default.exists() => Self::read_file(&default)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ReportError::Config(format!("config file not found: {:?}", path)).into());
        }
        info!("Loading config from {:?}", path);
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file {:?}", path))
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides warehouse path", ENV_DB_PATH);
            self.warehouse.path = Some(PathBuf::from(db));
        }
        if let Some(output) = lookup(ENV_OUTPUT).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides report output", ENV_OUTPUT);
            self.report.output = PathBuf::from(output);
        }
    }
}
