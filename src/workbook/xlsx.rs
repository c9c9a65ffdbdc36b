//! Implements the `Workbook` trait for spreadsheet files using `calamine`.

use crate::error::InputError;
use crate::workbook::{Cell, Workbook};
use crate::Result;
use anyhow::anyhow;
use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use chrono::NaiveDate;
use std::io::Cursor;
use std::path::Path;
use tracing::trace;

/// A spreadsheet (`.xlsx`, `.xlsm`, `.xls`, `.ods`) held in memory. Files are read in full before
/// parsing so that uploads and files on disk go through the same path.
pub struct XlsxWorkbook {
    sheets: Sheets<Cursor<Vec<u8>>>,
    names: Vec<String>,
}

impl XlsxWorkbook {
    /// Reads and opens the spreadsheet file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = crate::utils::read(path)?;
        Self::from_bytes(bytes).map_err(|e| anyhow!("Unable to open {}: {e}", path.display()))
    }

    /// Opens a spreadsheet from its raw bytes. The format is detected from the content.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let sheets = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| anyhow!("Unrecognized or corrupt spreadsheet: {e}"))?;
        let names = sheets.sheet_names();
        Ok(Self { sheets, names })
    }
}

impl Workbook for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn rows(&mut self, sheet_name: &str) -> Result<Vec<Vec<Cell>>> {
        if !self.names.iter().any(|n| n == sheet_name) {
            return Err(InputError::missing_sheet(sheet_name).into());
        }
        trace!("Reading sheet '{sheet_name}'");
        let range = self
            .sheets
            .worksheet_range(sheet_name)
            .map_err(|e| anyhow!("Unable to read sheet '{sheet_name}': {e}"))?;
        Ok(range
            .rows()
            .map(|row| row.iter().map(convert).collect())
            .collect())
    }
}

fn convert(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            Cell::date_from_serial(serial)
                .map(Cell::Date)
                .unwrap_or(Cell::Number(serial))
        }
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::from(s.as_str())),
        Data::DurationIso(s) => Cell::from(s.as_str()),
    }
}
