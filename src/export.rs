//! Encoding of a resolved drill-down row set into a downloadable file.

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};

use crate::dataset::Record;
use crate::datatype::Value;
use crate::error::{BenchscopeError, Result};

const SHEET_NAME: &str = "Drill Down Data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    #[serde(alias = "xlsx")]
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn filename(chart_id: &str, format: ExportFormat, at: NaiveDateTime) -> String {
    format!("drilldown_{}_{}.{}", chart_id, at.format("%Y%m%d_%H%M%S"), format.extension())
}

fn cell(record: &Record, column: &str) -> String {
    record.get(column).map(Value::to_string).unwrap_or_default()
}

/// Header row of `columns`, then one line per row. Lines end in `\n`.
pub fn to_csv(columns: &[String], rows: &[&Record]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(columns)?;
    for record in rows {
        writer.write_record(columns.iter().map(|c| cell(record, c)))?;
    }
    writer
        .into_inner()
        .map_err(|e| BenchscopeError::Export(e.to_string()))
}

pub fn to_xlsx(columns: &[String], rows: &[&Record]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (c, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, c as u16, name, &header)?;
    }
    for (r, record) in rows.iter().enumerate() {
        let row = r as u32 + 1;
        for (c, column) in columns.iter().enumerate() {
            let col = c as u16;
            match record.get(column) {
                Some(Value::Number(n)) => {
                    sheet.write_number(row, col, *n)?;
                }
                Some(Value::Empty) | None => {}
                Some(other) => {
                    sheet.write_string(row, col, other.to_string())?;
                }
            }
        }
    }
    Ok(workbook.save_to_buffer()?)
}

pub fn export(
    format: ExportFormat,
    chart_id: &str,
    columns: &[String],
    rows: &[&Record],
    at: NaiveDateTime,
) -> Result<ExportFile> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(columns, rows)?,
        ExportFormat::Excel => to_xlsx(columns, rows)?,
    };
    Ok(ExportFile { filename: filename(chart_id, format, at), content_type: format.content_type(), bytes })
}
