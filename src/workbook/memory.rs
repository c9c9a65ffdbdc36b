//! Implements the `Workbook` trait using in-memory data.
//!
//! This is used for CSV inputs and throughout the tests, so that the whole pipeline can run
//! without a real spreadsheet file.

use crate::error::InputError;
use crate::workbook::{Cell, Workbook};
use crate::Result;
use std::io::Cursor;

/// A workbook held entirely in memory. Sheets keep the order in which they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, Vec<Vec<Cell>>)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a sheet. A replaced sheet keeps its original position.
    pub fn with_sheet(mut self, name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        self.insert(name, rows);
        self
    }

    /// Adds (or replaces) a sheet. A replaced sheet keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, rows: Vec<Vec<Cell>>) {
        let name = name.into();
        match self.sheets.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = rows,
            None => self.sheets.push((name, rows)),
        }
    }

    /// Creates a workbook from `(sheet name, CSV text)` pairs. The first CSV record of each sheet is
    /// its header row.
    pub fn from_csv_sheets<N, D, I>(sheets: I) -> Result<Self>
    where
        N: Into<String>,
        D: AsRef<str>,
        I: IntoIterator<Item = (N, D)>,
    {
        let mut workbook = Self::new();
        for (name, data) in sheets {
            let rows = load_csv(data.as_ref())?;
            workbook.insert(name, rows);
        }
        Ok(workbook)
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn rows(&mut self, sheet_name: &str) -> Result<Vec<Vec<Cell>>> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| InputError::missing_sheet(sheet_name).into())
    }
}

/// Loads rows of cells from a CSV-formatted string. Records may have differing lengths.
fn load_csv(csv_data: &str) -> Result<Vec<Vec<Cell>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(Cell::from).collect());
    }
    Ok(rows)
}
