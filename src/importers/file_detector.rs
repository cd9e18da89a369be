use std::path::Path;
use tracing::info;

use crate::error::ReportError;

/// Type of report input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Json,
    Excel,
}

/// Detect the type of a report file from its extension
///
/// Detection strategy:
/// - `.json` → JSON object with `summary`, `income_statement`, `balance_sheet`
/// - `.xlsx` / `.xls` / `.xlsm` → workbook with one sheet per report
/// - anything else → `ReportError::UnsupportedFile`
pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType, ReportError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| ReportError::UnsupportedFile(format!("{} (no extension)", path.display())))?;

    let file_type = match extension.as_str() {
        "json" => FileType::Json,
        "xlsx" | "xls" | "xlsm" => FileType::Excel,
        other => return Err(ReportError::UnsupportedFile(format!(".{}", other))),
    };

    info!("Detected {:?} report file: {:?}", file_type, path);
    Ok(file_type)
}
