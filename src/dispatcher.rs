//! Command dispatcher that routes both clap Commands and interactive Commands
//! to the appropriate handlers.
//!
//! Data sources do blocking I/O, so fetches run on the blocking thread pool
//! while a spinner runs on stderr.

mod warehouse;

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cli::formatters::{format_dashboard, format_section, Section};
use crate::cli::help::{render_help, RenderOpts};
use crate::cli::{Cli, Commands, SourceArgs};
use crate::commands::Command;
use crate::config::AppConfig;
use crate::error::ReportError;
use crate::importers::{FileSource, SampleSource};
use crate::presenters::html::write_report;
use crate::presenters::{ReportView, ViewOptions};
use crate::reports::{build_report, BuildOptions, FinancialReport, ReportData};
use crate::ui::progress::ProgressPrinter;
use crate::warehouse::{DataSource, SqliteWarehouse};

/// A data source that can be moved onto the blocking pool
pub type BoxedSource = Box<dyn DataSource + Send>;

/// Resolve the warehouse file: the flag, then config/`FINREPORT_DB`
pub fn warehouse_path(flag: Option<&Path>, config: &AppConfig) -> Result<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.warehouse.path.clone())
        .ok_or_else(|| {
            ReportError::InvalidInput(
                "no data source: pass --input FILE, --db PATH or --sample, or set FINREPORT_DB"
                    .to_string(),
            )
            .into()
        })
}

/// Open the data source selected on the command line
pub fn open_source(args: &SourceArgs, config: &AppConfig) -> Result<BoxedSource> {
    if let Some(input) = &args.input {
        return Ok(Box::new(FileSource::new(input.clone())?));
    }
    if args.sample {
        return Ok(Box::new(SampleSource));
    }
    let path = warehouse_path(args.db.as_deref(), config)?;
    Ok(Box::new(SqliteWarehouse::open(path, config.warehouse.queries())?))
}

/// Fetch all report records on the blocking pool.
///
/// The source is handed back even when the fetch fails so a session can retry.
pub async fn fetch_report_data(
    mut source: BoxedSource,
    quiet: bool,
) -> Result<(BoxedSource, Result<ReportData>)> {
    let description = source.describe();
    let mut printer = ProgressPrinter::new(quiet);
    printer.update(&format!("Loading {}", description));

    let (source, result) = tokio::task::spawn_blocking(move || {
        let result = source.fetch_all();
        (source, result)
    })
    .await
    .map_err(|err| anyhow!("Failed to load report data: {}", err))?;

    match &result {
        Ok(data) => printer.finish(
            true,
            &format!(
                "Loaded {} summary, {} income, {} balance rows",
                data.summary.len(),
                data.income_statement.len(),
                data.balance_sheet.len()
            ),
        ),
        Err(_) => printer.finish(false, &format!("Failed to load {}", description)),
    }

    Ok((source, result))
}

/// One loaded dataset and the settings used to present it
pub struct Session {
    source: Option<BoxedSource>,
    description: String,
    config: AppConfig,
    options: BuildOptions,
    report: FinancialReport,
    quiet: bool,
}

impl Session {
    pub async fn open(
        source: BoxedSource,
        config: AppConfig,
        options: BuildOptions,
        quiet: bool,
    ) -> Result<Self> {
        let description = source.describe();
        let (source, data) = fetch_report_data(source, quiet).await?;
        let data = data.with_context(|| format!("Failed to load {}", description))?;
        Ok(Self {
            source: Some(source),
            description,
            report: build_report(&data, &options),
            config,
            options,
            quiet,
        })
    }

    /// Fetch the source again and rebuild the report
    pub async fn reload(&mut self) -> Result<()> {
        let source = self
            .source
            .take()
            .ok_or_else(|| anyhow!("No data source to reload"))?;
        let (source, data) = fetch_report_data(source, self.quiet).await?;
        self.source = Some(source);

        let data = data.with_context(|| format!("Failed to reload {}", self.description))?;
        self.report = build_report(&data, &self.options);
        info!("Reloaded {}", self.description);
        Ok(())
    }

    pub fn title(&self) -> &str {
        &self.config.report.title
    }

    pub fn source_description(&self) -> &str {
        &self.description
    }

    pub fn report(&self) -> &FinancialReport {
        &self.report
    }

    pub fn view(&self) -> ReportView {
        ReportView::new(
            &self.report,
            &ViewOptions {
                title: self.config.report.title.clone(),
                currency_unit: self.config.report.currency_unit.clone(),
                source: self.description.clone(),
            },
        )
    }

    /// Write the static HTML report; the configured output path is the default
    pub fn export(&self, path: Option<&Path>) -> Result<(PathBuf, usize)> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.report.output.clone());
        let today = chrono::Local::now().date_naive();
        let bytes = write_report(&self.view(), today, &path)?;
        Ok((path, bytes))
    }
}

fn section_json(view: &ReportView, section: Section) -> Result<String> {
    let value = match section {
        Section::Summary => serde_json::to_value(&view.summary)?,
        Section::Income => serde_json::to_value(&view.income)?,
        Section::Balance => serde_json::to_value(&view.balance)?,
        Section::Analysis => serde_json::to_value(&view.analysis)?,
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Route an interactive command to its handler
pub async fn dispatch_command(session: &mut Session, command: Command, json_output: bool) -> Result<()> {
    match command {
        Command::Show(section) => {
            let view = session.view();
            if json_output {
                println!("{}", section_json(&view, section)?);
            } else {
                print!("{}", format_section(&view, section));
            }
            Ok(())
        }
        Command::ShowAll => {
            let view = session.view();
            if json_output {
                println!("{}", view.to_json());
            } else {
                print!("{}", format_dashboard(&view));
            }
            Ok(())
        }
        Command::Reload => {
            session.reload().await?;
            println!("{} Reloaded {}", "✓".green().bold(), session.source_description());
            Ok(())
        }
        Command::Export { path } => {
            let (path, _) = session.export(path.as_deref().map(Path::new))?;
            println!("{} Report written to {}", "✓".green().bold(), path.display());
            Ok(())
        }
        Command::Help => {
            render_help(std::io::stdout(), &RenderOpts::default())?;
            Ok(())
        }
        Command::Exit => Ok(()),
    }
}

/// Entry point for parsed CLI arguments
pub async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let json_output = cli.json;

    let Some(command) = cli.command else {
        return dispatch_dashboard(&SourceArgs::default(), config, json_output).await;
    };

    match command {
        Commands::Report {
            source,
            output,
            years,
            title,
        } => dispatch_report(&source, output, years, title, config, json_output).await,
        Commands::Show {
            section,
            source,
            years,
        } => dispatch_show(&section, &source, years, config, json_output).await,
        Commands::Dashboard { source } => dispatch_dashboard(&source, config, json_output).await,
        Commands::Query { sql, db } => {
            warehouse::dispatch_query(&sql, db.as_deref(), &config, json_output).await
        }
        Commands::Tables { db } => warehouse::dispatch_tables(db.as_deref(), &config, json_output).await,
        Commands::Describe { table, db } => {
            warehouse::dispatch_describe(&table, db.as_deref(), &config, json_output).await
        }
        Commands::Ping { db } => warehouse::dispatch_ping(db.as_deref(), &config, json_output).await,
        Commands::InitDb { db } => warehouse::dispatch_init_db(db.as_deref(), &config, json_output).await,
    }
}

async fn dispatch_report(
    source_args: &SourceArgs,
    output: Option<PathBuf>,
    years: Option<usize>,
    title: Option<String>,
    mut config: AppConfig,
    json_output: bool,
) -> Result<()> {
    if let Some(title) = title {
        config.report.title = title;
    }
    let options = config.report.build_options(years);
    let source = open_source(source_args, &config)?;
    let session = Session::open(source, config, options, json_output).await?;

    if session.report().summary.is_empty()
        && session.report().income.is_empty()
        && session.report().balance.is_empty()
    {
        warn!("Data source returned no rows; the report will only contain empty sections");
    }

    let (path, bytes) = session.export(output.as_deref())?;

    if json_output {
        let summary = serde_json::json!({
            "output": path.display().to_string(),
            "bytes": bytes,
            "source": session.source_description(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} Report written to {} ({} bytes)",
            "✓".green().bold(),
            path.display().to_string().cyan(),
            bytes
        );
    }
    Ok(())
}

async fn dispatch_show(
    section: &str,
    source_args: &SourceArgs,
    years: Option<usize>,
    config: AppConfig,
    json_output: bool,
) -> Result<()> {
    let section = Section::parse(section).ok_or_else(|| {
        ReportError::InvalidInput(format!(
            "unknown view '{}'. Use: summary, income, balance, analysis",
            section
        ))
    })?;

    let options = config.report.build_options(years);
    let source = open_source(source_args, &config)?;
    let mut session = Session::open(source, config, options, json_output).await?;
    dispatch_command(&mut session, Command::Show(section), json_output).await
}

async fn dispatch_dashboard(source_args: &SourceArgs, config: AppConfig, json_output: bool) -> Result<()> {
    let options = config.report.build_options(None);
    let source = open_source(source_args, &config)?;
    let session = Session::open(source, config, options, json_output).await?;
    crate::ui::launch_dashboard(session, json_output).await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn sample_session() -> Session {
        Session::open(
            Box::new(SampleSource),
            AppConfig::default(),
            BuildOptions::default(),
            true,
        )
        .await
        .unwrap()
    }

    #[test]
    fn test_warehouse_path_resolution() {
        let mut config = AppConfig::default();
        assert!(warehouse_path(None, &config).is_err());

        config.warehouse.path = Some(PathBuf::from("/data/configured.db"));
        assert_eq!(
            warehouse_path(None, &config).unwrap(),
            PathBuf::from("/data/configured.db")
        );
        assert_eq!(
            warehouse_path(Some(Path::new("flag.db")), &config).unwrap(),
            PathBuf::from("flag.db")
        );
    }

    #[test]
    fn test_open_source_without_any_source_fails() {
        let err = open_source(&SourceArgs::default(), &AppConfig::default()).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ReportError>(),
            Some(ReportError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_open_source_rejects_unsupported_file() {
        let args = SourceArgs {
            input: Some(PathBuf::from("figures.csv")),
            ..Default::default()
        };
        assert!(open_source(&args, &AppConfig::default()).is_err());
    }

    #[tokio::test]
    async fn test_session_loads_sample() {
        let session = sample_session().await;
        assert_eq!(session.report().summary.rows.len(), 6);
        assert_eq!(session.source_description(), "bundled sample data");
        assert_eq!(session.view().title, "재무실적보고서");
    }

    #[tokio::test]
    async fn test_session_reload_keeps_source() {
        let mut session = sample_session().await;
        session.reload().await.unwrap();
        session.reload().await.unwrap();
        assert_eq!(session.report().balance.rows.len(), 8);
    }

    #[tokio::test]
    async fn test_session_export_writes_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        let session = sample_session().await;

        let (written, bytes) = session.export(Some(&path)).unwrap();
        assert_eq!(written, path);
        assert!(bytes > 0);
        assert!(std::fs::read_to_string(&path).unwrap().contains("1.00조 원"));
    }

    #[tokio::test]
    async fn test_failed_fetch_is_reported() {
        struct Broken;
        impl DataSource for Broken {
            fn describe(&self) -> String {
                "broken".to_string()
            }
            fn fetch(&mut self, _kind: crate::reports::ReportKind) -> Result<Vec<crate::records::RawRecord>> {
                Err(ReportError::Warehouse("connection refused".to_string()).into())
            }
        }

        let result = Session::open(Box::new(Broken), AppConfig::default(), BuildOptions::default(), true).await;
        assert!(result.is_err());
    }
}
