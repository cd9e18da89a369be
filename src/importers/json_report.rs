use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

use crate::error::ReportError;
use crate::records::RawRecord;
use crate::reports::{ReportData, ReportKind};

/// Parse a JSON report document.
///
/// The document must be an object; each of `summary`, `income_statement` and
/// `balance_sheet` is optional and, when present, must be an array. Array
/// items that are not objects are skipped.
pub fn parse_report_json(text: &str) -> Result<ReportData> {
    let document: Value = serde_json::from_str(text).map_err(ReportError::Json)?;
    let object = document.as_object().ok_or_else(|| {
        ReportError::InvalidInput("report JSON must be an object at the top level".to_string())
    })?;

    let mut data = ReportData::default();
    for kind in ReportKind::ALL {
        let records = match object.get(kind.json_key()) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(idx, item)| {
                    let record = RawRecord::from_json(item);
                    if record.is_none() {
                        warn!("Skipping {} item {}: not an object", kind.json_key(), idx + 1);
                    }
                    record
                })
                .collect(),
            Some(_) => {
                return Err(ReportError::InvalidInput(format!(
                    "'{}' must be an array of records",
                    kind.json_key()
                ))
                .into())
            }
        };
        data.set(kind, records);
    }

    Ok(data)
}

/// Load a JSON report file
pub fn load_report_json<P: AsRef<Path>>(path: P) -> Result<ReportData> {
    let path = path.as_ref();
    info!("Parsing JSON report file: {:?}", path);

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report file {:?}", path))?;
    let data = parse_report_json(&text)
        .with_context(|| format!("Failed to parse report file {:?}", path))?;

    info!(
        "Loaded {} summary, {} income, {} balance records",
        data.summary.len(),
        data.income_statement.len(),
        data.balance_sheet.len()
    );
    Ok(data)
}
