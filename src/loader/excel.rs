//! Excel workbook parser (xls, xlsx)

use std::borrow::Cow;
use std::io::Cursor;

use calamine::{Data, Range, Reader, Xls, Xlsx};
use chrono::Timelike;

use crate::error::{Result, TableError};
use crate::model::{normalize_header_names, CellValue, Table};

use super::Parser;

/// Container format of a workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookKind {
    /// Legacy BIFF workbook (`.xls`)
    Xls,
    /// Office Open XML workbook (`.xlsx`)
    Xlsx,
}

impl WorkbookKind {
    fn label(self) -> &'static str {
        match self {
            WorkbookKind::Xls => "XLS",
            WorkbookKind::Xlsx => "XLSX",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            WorkbookKind::Xls => "xls",
            WorkbookKind::Xlsx => "xlsx",
        }
    }
}

/// Parser reading the first sheet of a workbook, header row first
pub struct ExcelParser {
    kind: WorkbookKind,
}

impl ExcelParser {
    pub fn new(kind: WorkbookKind) -> Self {
        Self { kind }
    }
}

impl Parser for ExcelParser {
    fn parse(&self, bytes: &[u8]) -> Result<Table> {
        let format = self.kind.label();
        let range = match self.kind {
            WorkbookKind::Xls => first_sheet::<Xls<_>>(bytes, format)?,
            WorkbookKind::Xlsx => first_sheet::<Xlsx<_>>(bytes, format)?,
        };

        parse_range(range, format)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext == self.kind.extension()
    }
}

/// Open a workbook with the reader `R` and return its first sheet
fn first_sheet<'a, R>(bytes: &'a [u8], format: &'static str) -> Result<Range<Data>>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: std::error::Error + Send + Sync + 'static,
{
    let mut workbook = R::new(Cursor::new(bytes))
        .map_err(|e| TableError::parse_with_source(format, "failed to open workbook", e))?;

    // Use first sheet
    let sheets = workbook.sheet_names();
    let sheet_name = sheets
        .first()
        .cloned()
        .ok_or_else(|| TableError::parse(format, "no sheets found in workbook"))?;

    workbook.worksheet_range(&sheet_name).map_err(|e| {
        TableError::parse_with_source(format, format!("failed to read sheet '{}'", sheet_name), e)
    })
}

fn parse_range(range: Range<Data>, format: &'static str) -> Result<Table> {
    let (row_count, col_count) = range.get_size();

    if row_count == 0 || col_count == 0 {
        return Err(TableError::parse(format, "first sheet is empty"));
    }

    // First row is header
    let header_row = range
        .rows()
        .next()
        .ok_or_else(|| TableError::parse(format, "no header row found"))?;
    let names = normalize_header_names(header_row.iter().map(cell_to_string));

    // Read data rows
    let rows: Vec<Vec<CellValue>> = range
        .rows()
        .skip(1)
        .map(|row| {
            let mut cells: Vec<CellValue> = row.iter().take(col_count).map(convert_cell).collect();
            // Pad with nulls if row has fewer columns
            cells.resize(col_count, CellValue::Null);
            cells
        })
        .collect();

    Table::from_rows(names, rows)
        .map_err(|e| TableError::parse_with_source(format, "inconsistent table shape", e))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::String(Cow::Owned(s.clone()))
            }
        }
        Data::Float(f) => {
            // Check if it's actually an integer
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => CellValue::Float(dt.as_f64()),
        Data::DateTime(dt) => match dt.as_datetime() {
            // Excel has no separate date type; a midnight value is a plain date
            Some(datetime)
                if datetime.num_seconds_from_midnight() == 0 && datetime.nanosecond() == 0 =>
            {
                CellValue::Date(datetime.date())
            }
            Some(datetime) => CellValue::DateTime(datetime),
            None => CellValue::String(Cow::Owned(dt.to_string())),
        },
        Data::DateTimeIso(s) => {
            if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                CellValue::DateTime(dt)
            } else if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                CellValue::Date(d)
            } else {
                CellValue::String(Cow::Owned(s.clone()))
            }
        }
        Data::DurationIso(s) => CellValue::String(Cow::Owned(s.clone())),
        Data::Error(e) => CellValue::String(Cow::Owned(format!("#{:?}", e))),
    }
}
