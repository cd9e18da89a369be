// Import module - JSON and Excel report files

pub mod excel_report;
mod file_detector;
pub mod json_report;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::records::RawRecord;
use crate::reports::{ReportData, ReportKind};
use crate::warehouse::DataSource;

pub use excel_report::load_report_excel;
pub use file_detector::{detect_file_type, FileType};
pub use json_report::{load_report_json, parse_report_json};

/// Bundled sample figures, used by `--sample` and for previews
const SAMPLE_REPORT: &str = include_str!("sample_report.json");

/// Load a report file with automatic format detection
///
/// Unsupported extensions fail with `ReportError::UnsupportedFile`; this is
/// the only fatal input condition.
pub fn load_report_file<P: AsRef<Path>>(path: P) -> Result<ReportData> {
    let path = path.as_ref();
    match detect_file_type(path)? {
        FileType::Json => load_report_json(path),
        FileType::Excel => load_report_excel(path),
    }
}

/// The bundled sample dataset
pub fn sample_data() -> Result<ReportData> {
    parse_report_json(SAMPLE_REPORT)
}

/// A report file used as a data source. The file is re-read on every fetch
/// so an interactive `reload` picks up edits.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        detect_file_type(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn fetch(&mut self, kind: ReportKind) -> Result<Vec<RawRecord>> {
        let mut data = load_report_file(&self.path)?;
        Ok(std::mem::take(match kind {
            ReportKind::Summary => &mut data.summary,
            ReportKind::Income => &mut data.income_statement,
            ReportKind::Balance => &mut data.balance_sheet,
        }))
    }

    fn fetch_all(&mut self) -> Result<ReportData> {
        info!("Loading report data from {:?}", self.path);
        load_report_file(&self.path)
    }
}

/// The bundled sample dataset as a data source
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSource;

impl DataSource for SampleSource {
    fn describe(&self) -> String {
        "bundled sample data".to_string()
    }

    fn fetch(&mut self, kind: ReportKind) -> Result<Vec<RawRecord>> {
        Ok(sample_data()?.records(kind).to_vec())
    }
}
