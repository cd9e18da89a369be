use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;
pub mod help;

#[derive(Parser)]
#[command(name = "finreport")]
#[command(
    version,
    about = "Financial report dashboard: summary, income statement and balance sheet"
)]
#[command(
    long_about = "Load financial figures from a SQLite warehouse or a JSON/Excel file and present them as a terminal dashboard or a static HTML report, with amounts in 조/억/만 units."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Config file (defaults to <config home>/finreport/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where report data comes from. Without a flag the configured warehouse is used.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
#[group(multiple = false)]
pub struct SourceArgs {
    /// Report file (.json, .xlsx, .xls)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// SQLite warehouse file
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Use the bundled sample figures
    #[arg(long)]
    pub sample: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the static HTML report
    Report {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file (default from config: financial_report.html)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Number of most recent years in the income statement (0 = all)
        #[arg(long)]
        years: Option<usize>,

        /// Report title
        #[arg(long)]
        title: Option<String>,
    },

    /// Print one view in the terminal
    Show {
        /// summary, income, balance or analysis
        section: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Number of most recent years in the income statement (0 = all)
        #[arg(long)]
        years: Option<usize>,
    },

    /// Launch the interactive dashboard
    #[command(alias = "interactive")]
    Dashboard {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Run a SQL query against the warehouse
    Query {
        /// SQL text
        sql: String,

        /// SQLite warehouse file
        #[arg(long, value_name = "PATH")]
        db: Option<PathBuf>,
    },

    /// List warehouse tables and views
    Tables {
        /// SQLite warehouse file
        #[arg(long, value_name = "PATH")]
        db: Option<PathBuf>,
    },

    /// Show the columns of a warehouse table
    Describe {
        /// Table name
        table: String,

        /// SQLite warehouse file
        #[arg(long, value_name = "PATH")]
        db: Option<PathBuf>,
    },

    /// Check the warehouse connection
    Ping {
        /// SQLite warehouse file
        #[arg(long, value_name = "PATH")]
        db: Option<PathBuf>,
    },

    /// Create a warehouse file with the sample tables
    InitDb {
        /// SQLite warehouse file
        #[arg(long, value_name = "PATH")]
        db: Option<PathBuf>,
    },
}
