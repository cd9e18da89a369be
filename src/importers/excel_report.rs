use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use std::path::Path;
use tracing::{debug, info};

use crate::records::{RawRecord, RawValue};
use crate::reports::{ReportData, ReportKind};

/// Header cell text; numeric headers such as the year `2024` become `"2024"`
fn header_text(cell: &Data) -> String {
    match cell {
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.is_finite() => format!("{}", *f as i64),
        _ => cell.to_string().trim().to_string(),
    }
}

fn cell_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty | Data::Error(_) => RawValue::Null,
        Data::Int(i) => RawValue::Number((*i).into()),
        Data::Float(f) => RawValue::from_f64(*f),
        Data::Bool(b) => RawValue::Bool(*b),
        Data::String(s) => RawValue::Text(s.clone()),
        other => RawValue::Text(other.to_string()),
    }
}

/// Convert sheet rows into records using the first non-empty row as header
pub fn rows_to_records<'a, I>(rows: I) -> Vec<RawRecord>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows
        .into_iter()
        .skip_while(|row| row.iter().all(|cell| cell.is_empty()));

    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_row.iter().map(header_text).collect();
    debug!("Sheet headers: {:?}", headers);

    rows.filter(|row| !row.iter().all(|cell| cell.is_empty()))
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| !header.is_empty())
                .map(|(idx, header)| {
                    let value = row.get(idx).map(cell_value).unwrap_or(RawValue::Null);
                    (header.as_str(), value)
                })
                .collect()
        })
        .collect()
}

/// Find the sheet for a report: Korean sheet name first, then the JSON key
fn find_sheet(sheet_names: &[String], kind: ReportKind) -> Option<String> {
    let compact = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    let candidates = [kind.sheet_name(), kind.json_key()];

    candidates.iter().find_map(|candidate| {
        sheet_names
            .iter()
            .find(|name| compact(name).eq_ignore_ascii_case(&compact(candidate)))
            .cloned()
    })
}

/// Load an Excel workbook with one sheet per report. Missing sheets are empty.
pub fn load_report_excel<P: AsRef<Path>>(path: P) -> Result<ReportData> {
    let path = path.as_ref();
    info!("Parsing Excel report file: {:?}", path);

    let mut workbook = open_workbook_auto(path).context("Failed to open Excel file")?;
    let sheet_names = workbook.sheet_names();
    info!("Examining Excel sheets: {:?}", sheet_names);

    let mut data = ReportData::default();
    for kind in ReportKind::ALL {
        let Some(sheet) = find_sheet(&sheet_names, kind) else {
            debug!("No sheet for {}", kind.json_key());
            continue;
        };

        let range = workbook
            .worksheet_range(&sheet)
            .with_context(|| format!("Failed to read worksheet '{}'", sheet))?;
        let records = rows_to_records(range.rows());
        info!("Sheet '{}': {} records", sheet, records.len());
        data.set(kind, records);
    }

    Ok(data)
}
