//! Warehouse passthrough commands: query, tables, describe, ping, init-db

use anyhow::Result;
use colored::Colorize;
use itertools::Itertools;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Segment, Modify, Style, Width},
    Table, Tabled,
};
use tracing::info;

use super::warehouse_path;
use crate::config::AppConfig;
use crate::records::RawRecord;
use crate::warehouse::{init_sample_warehouse, SqliteWarehouse};

/// Widest cell shown in query results before truncation
const MAX_CELL_WIDTH: usize = 40;

fn open_warehouse(db: Option<&Path>, config: &AppConfig) -> Result<SqliteWarehouse> {
    let path = warehouse_path(db, config)?;
    SqliteWarehouse::open(path, config.warehouse.queries())
}

/// Column names across all records, in first-occurrence order
fn record_columns(records: &[RawRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.keys())
        .unique()
        .map(str::to_string)
        .collect()
}

/// Render query results as a table
pub fn format_records_table(records: &[RawRecord]) -> String {
    let columns = record_columns(records);
    let mut builder = Builder::default();
    builder.push_record(columns.iter().cloned());
    for record in records {
        builder.push_record(
            columns
                .iter()
                .map(|c| record.get(c).map(|v| v.display()).unwrap_or_default()),
        );
    }
    builder
        .build()
        .with(Style::rounded())
        .with(Modify::new(Segment::all()).with(Width::truncate(MAX_CELL_WIDTH).suffix("…")))
        .to_string()
}

pub async fn dispatch_query(sql: &str, db: Option<&Path>, config: &AppConfig, json_output: bool) -> Result<()> {
    let warehouse = open_warehouse(db, config)?;
    let records = warehouse.run_query(sql)?;
    info!("Query returned {} rows", records.len());

    if json_output {
        let rows: Vec<serde_json::Value> = records.iter().map(RawRecord::to_json).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("\n{} Query returned no rows\n", "ℹ".blue().bold());
        return Ok(());
    }

    println!("{}", format_records_table(&records));
    println!("{} row(s)", records.len());
    Ok(())
}

pub async fn dispatch_tables(db: Option<&Path>, config: &AppConfig, json_output: bool) -> Result<()> {
    let warehouse = open_warehouse(db, config)?;
    let tables = warehouse.list_tables()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    if tables.is_empty() {
        println!("\n{} No tables found\n", "ℹ".blue().bold());
        return Ok(());
    }

    #[derive(Tabled)]
    struct TableRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Type")]
        table_type: String,
    }

    let rows: Vec<TableRow> = tables
        .into_iter()
        .map(|t| TableRow {
            name: t.name,
            table_type: t.table_type,
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

pub async fn dispatch_describe(
    table: &str,
    db: Option<&Path>,
    config: &AppConfig,
    json_output: bool,
) -> Result<()> {
    let warehouse = open_warehouse(db, config)?;
    let columns = warehouse.describe_table(table)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&columns)?);
        return Ok(());
    }

    #[derive(Tabled)]
    struct ColumnRow {
        #[tabled(rename = "Column")]
        name: String,
        #[tabled(rename = "Type")]
        data_type: String,
        #[tabled(rename = "Nullable")]
        nullable: String,
        #[tabled(rename = "Default")]
        default_value: String,
        #[tabled(rename = "PK")]
        primary_key: String,
    }

    let rows: Vec<ColumnRow> = columns
        .into_iter()
        .map(|c| ColumnRow {
            name: c.name,
            data_type: c.data_type,
            nullable: if c.nullable { "YES" } else { "NO" }.to_string(),
            default_value: c.default_value.unwrap_or_default(),
            primary_key: if c.primary_key { "✓" } else { "" }.to_string(),
        })
        .collect();

    println!("\n{} {}\n", "📋".cyan().bold(), table.bold());
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

pub async fn dispatch_ping(db: Option<&Path>, config: &AppConfig, json_output: bool) -> Result<()> {
    let warehouse = open_warehouse(db, config)?;
    let info = warehouse.ping()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} Connected", "✓".green().bold());
    println!("  SQLite:  {}", info.version);
    if let Some(path) = &info.path {
        println!("  Path:    {}", path);
    }
    println!("  Tables:  {}", info.table_count);
    Ok(())
}

pub async fn dispatch_init_db(db: Option<&Path>, config: &AppConfig, json_output: bool) -> Result<()> {
    let path = warehouse_path(db, config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    init_sample_warehouse(&path)?;

    if json_output {
        let summary = serde_json::json!({ "database": path.display().to_string() });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} Sample warehouse created at {}",
            "✓".green().bold(),
            path.display().to_string().cyan()
        );
    }
    Ok(())
}
