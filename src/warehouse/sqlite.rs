use anyhow::{Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::DataSource;
use crate::error::ReportError;
use crate::records::{RawRecord, RawValue};
use crate::reports::ReportKind;

/// SQL run for each report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySet {
    pub summary: String,
    pub income: String,
    pub balance: String,
}

impl Default for QuerySet {
    fn default() -> Self {
        Self {
            summary: "SELECT * FROM summary ORDER BY rowid".to_string(),
            income: "SELECT * FROM income_statement ORDER BY rowid".to_string(),
            balance: "SELECT * FROM balance_sheet ORDER BY rowid".to_string(),
        }
    }
}

impl QuerySet {
    pub fn query(&self, kind: ReportKind) -> &str {
        match kind {
            ReportKind::Summary => &self.summary,
            ReportKind::Income => &self.income,
            ReportKind::Balance => &self.balance,
        }
    }
}

/// A table or view in the warehouse
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub table_type: String,
}

/// A column of a warehouse table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default_value: Option<String>,
    pub primary_key: bool,
}

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionInfo {
    pub version: String,
    pub path: Option<String>,
    pub table_count: usize,
}

/// SQLite-backed warehouse
pub struct SqliteWarehouse {
    conn: Connection,
    path: Option<PathBuf>,
    queries: QuerySet,
}

impl SqliteWarehouse {
    /// Open an existing warehouse file read-only
    pub fn open<P: AsRef<Path>>(path: P, queries: QuerySet) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReportError::Warehouse(format!(
                "database not found at {:?}. Create one with `finreport init-db`",
                path
            ))
            .into());
        }

        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("Failed to open warehouse at {:?}", path))?;
        info!("Opened warehouse at {:?}", path);

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
            queries,
        })
    }

    /// Wrap an already-open connection
    pub fn from_connection(conn: Connection, queries: QuerySet) -> Self {
        Self {
            conn,
            path: None,
            queries,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Execute SQL and return its rows as records keyed by column name
    pub fn run_query(&self, sql: &str) -> Result<Vec<RawRecord>> {
        debug!("Running query: {}", sql.trim());

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| ReportError::Warehouse(format!("query failed: {}", e)))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = RawRecord::new();
            for (idx, column) in columns.iter().enumerate() {
                record.insert(column, value_from_sql(row.get_ref(idx)?));
            }
            records.push(record);
        }

        debug!("Query returned {} rows", records.len());
        Ok(records)
    }

    /// Tables and views, by name
    pub fn list_tables(&self) -> Result<Vec<TableInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, type FROM sqlite_master
             WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;

        let tables = stmt
            .query_map([], |row| {
                Ok(TableInfo {
                    name: row.get(0)?,
                    table_type: row.get::<_, String>(1)?.to_uppercase(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tables)
    }

    /// Column structure of a table
    pub fn describe_table(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid",
        )?;

        let columns = stmt
            .query_map(params![table], |row| {
                Ok(ColumnInfo {
                    name: row.get(0)?,
                    data_type: row.get(1)?,
                    nullable: row.get::<_, i64>(2)? == 0,
                    default_value: row.get(3)?,
                    primary_key: row.get::<_, i64>(4)? > 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if columns.is_empty() {
            return Err(ReportError::Warehouse(format!("table '{}' not found", table)).into());
        }
        Ok(columns)
    }

    /// Check the connection and report basic facts about it
    pub fn ping(&self) -> Result<ConnectionInfo> {
        let version: String = self
            .conn
            .query_row("SELECT sqlite_version()", [], |row| row.get(0))?;
        Ok(ConnectionInfo {
            version,
            path: self.path.as_ref().map(|p| p.display().to_string()),
            table_count: self.list_tables()?.len(),
        })
    }
}

impl DataSource for SqliteWarehouse {
    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("warehouse {}", path.display()),
            None => "warehouse (in-memory)".to_string(),
        }
    }

    fn fetch(&mut self, kind: ReportKind) -> Result<Vec<RawRecord>> {
        info!("Fetching {} from warehouse", kind.json_key());
        let sql = self.queries.query(kind).to_string();
        self.run_query(&sql)
            .with_context(|| format!("Failed to load {}", kind.title()))
    }
}

fn value_from_sql(value: ValueRef<'_>) -> RawValue {
    match value {
        ValueRef::Null => RawValue::Null,
        ValueRef::Integer(i) => RawValue::Number(i.into()),
        ValueRef::Real(f) => RawValue::from_f64(f),
        ValueRef::Text(bytes) => RawValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => RawValue::Text(format!("<{} bytes>", bytes.len())),
    }
}

/// Create (or reset) a warehouse file seeded with the sample tables
pub fn init_sample_warehouse<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Initializing sample warehouse at: {:?}", path);

    let conn = Connection::open(path)
        .with_context(|| format!("Failed to create warehouse at {:?}", path))?;
    seed_sample_tables(&conn)?;

    info!("Sample warehouse initialized successfully");
    Ok(())
}

/// Create the sample tables on an open connection
pub fn seed_sample_tables(conn: &Connection) -> Result<()> {
    let schema_sql = include_str!("sample_warehouse.sql");
    conn.execute_batch(schema_sql)
        .context("Failed to execute sample warehouse schema")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_warehouse() -> SqliteWarehouse {
        let conn = Connection::open_in_memory().unwrap();
        seed_sample_tables(&conn).unwrap();
        SqliteWarehouse::from_connection(conn, QuerySet::default())
    }

    #[test]
    fn test_fetch_returns_records_in_order() {
        let mut warehouse = sample_warehouse();
        let summary = warehouse.fetch(ReportKind::Summary).unwrap();
        assert_eq!(summary.len(), 6);
        assert_eq!(summary[0].get("항목"), Some(&RawValue::Text("매출액".into())));
        assert_eq!(summary[0].get("값"), Some(&RawValue::Number(dec!(1000000000000))));
        assert_eq!(summary[4].get("값"), Some(&RawValue::Number(dec!(45.2))));
    }

    #[test]
    fn test_fetch_all() {
        let mut warehouse = sample_warehouse();
        let data = warehouse.fetch_all().unwrap();
        assert_eq!(data.income_statement.len(), 12);
        assert_eq!(data.balance_sheet.len(), 8);
    }

    #[test]
    fn test_run_query_null_and_text() {
        let warehouse = sample_warehouse();
        let rows = warehouse.run_query("SELECT NULL AS a, 'x' AS b, 3 AS c").unwrap();
        assert_eq!(rows[0].get("a"), Some(&RawValue::Null));
        assert_eq!(rows[0].get("b"), Some(&RawValue::Text("x".into())));
        assert_eq!(rows[0].get("c"), Some(&RawValue::Number(dec!(3))));
    }

    #[test]
    fn test_bad_query_is_warehouse_error() {
        let warehouse = sample_warehouse();
        let err = warehouse.run_query("SELECT * FROM missing_table").unwrap_err();
        assert!(matches!(err.downcast_ref::<ReportError>(), Some(ReportError::Warehouse(_))));
    }

    #[test]
    fn test_list_and_describe_tables() {
        let warehouse = sample_warehouse();
        let tables = warehouse.list_tables().unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["balance_sheet", "income_statement", "summary"]);

        let columns = warehouse.describe_table("income_statement").unwrap();
        let column_names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(column_names, vec!["항목", "연도", "금액"]);
        assert!(!columns[0].nullable);

        assert!(warehouse.describe_table("nope").is_err());
    }

    #[test]
    fn test_ping() {
        let info = sample_warehouse().ping().unwrap();
        assert!(!info.version.is_empty());
        assert_eq!(info.table_count, 3);
        assert_eq!(info.path, None);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let result = SqliteWarehouse::open("/nonexistent/finreport.db", QuerySet::default());
        assert!(result.is_err());
    }
}
