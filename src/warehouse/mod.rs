//! Data sources for report records
//!
//! The transformation core never opens or caches a connection. Callers open a
//! source, hand it to the dispatcher as `&mut dyn DataSource`, and close it by
//! dropping it.

pub mod sqlite;

use anyhow::Result;

use crate::records::RawRecord;
use crate::reports::{ReportData, ReportKind};

pub use sqlite::{
    init_sample_warehouse, seed_sample_tables, ColumnInfo, ConnectionInfo, QuerySet,
    SqliteWarehouse, TableInfo,
};

/// Anything that can produce the ordered records of a report
pub trait DataSource {
    /// Short human-readable description (shown in headers and logs)
    fn describe(&self) -> String;

    /// Records for one report, in source order
    fn fetch(&mut self, kind: ReportKind) -> Result<Vec<RawRecord>>;

    /// Records for all three reports
    fn fetch_all(&mut self) -> Result<ReportData> {
        let mut data = ReportData::default();
        for kind in ReportKind::ALL {
            data.set(kind, self.fetch(kind)?);
        }
        Ok(data)
    }
}
