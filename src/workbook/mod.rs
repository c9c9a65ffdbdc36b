//! Access to spreadsheet workbooks.
//!
//! The rest of the crate only sees the `Workbook` trait, which lists sheet names and hands back
//! the rows of a sheet as typed `Cell` values. `XlsxWorkbook` reads real spreadsheet files with
//! `calamine` and `MemoryWorkbook` holds sheets in memory, usually parsed from CSV text.

mod cell;
mod memory;
mod table;
mod xlsx;

pub use cell::{Cell, MAX_DATE_SERIAL};
pub use memory::MemoryWorkbook;
pub use table::Table;
pub use xlsx::XlsxWorkbook;

use crate::error::InputError;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// A source of sheets. Sheet order matters because the current-week sheet of a bandwidth export is
/// usually identified by position.
pub trait Workbook {
    /// The names of all sheets, in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// The rows of the sheet named `sheet_name`, including the header row. Returns
    /// `InputError::MissingSheet` when there is no such sheet.
    fn rows(&mut self, sheet_name: &str) -> Result<Vec<Vec<Cell>>>;

    /// Reads the sheet named `sheet_name` and indexes it by its header row.
    fn table(&mut self, sheet_name: &str) -> Result<Table> {
        let rows = self.rows(sheet_name)?;
        Ok(Table::new(sheet_name, rows))
    }
}

/// Opens the workbook at `path`. CSV files become a single sheet named after the file stem, all
/// other extensions are handed to `calamine`.
pub fn open(path: impl AsRef<Path>) -> Result<Box<dyn Workbook>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        let sheet_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let data = crate::utils::read_to_string(path)?;
        debug!("Opened {} as a single CSV sheet '{sheet_name}'", path.display());
        let workbook = MemoryWorkbook::from_csv_sheets([(sheet_name, data.as_str())])
            .with_context(|| format!("Unable to parse CSV file {}", path.display()))?;
        return Ok(Box::new(workbook));
    }
    let workbook = XlsxWorkbook::open(path)?;
    debug!(
        "Opened {} with sheets {:?}",
        path.display(),
        workbook.sheet_names()
    );
    Ok(Box::new(workbook))
}

/// Identifies which sheet of a workbook holds the data of interest.
///
/// Serializes as `"last"`, `{"named": "Week 42"}` or `{"index": 0}`.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetSelector {
    /// The last sheet by position. Weekly exports append the current week at the end.
    #[default]
    Last,
    /// The sheet with exactly this name.
    Named(String),
    /// The sheet at this zero-based position.
    Index(usize),
}

impl SheetSelector {
    /// Resolves the selector to a concrete sheet name in `workbook`.
    pub fn resolve(&self, workbook: &dyn Workbook) -> Result<String> {
        let names = workbook.sheet_names();
        match self {
            SheetSelector::Last => names.last().cloned().ok_or_else(|| {
                InputError::NoSheetAt {
                    index: 0,
                    count: 0,
                }
                .into()
            }),
            SheetSelector::Named(name) => {
                if names.iter().any(|n| n == name) {
                    Ok(name.clone())
                } else {
                    Err(InputError::missing_sheet(name).into())
                }
            }
            SheetSelector::Index(index) => names.get(*index).cloned().ok_or_else(|| {
                InputError::NoSheetAt {
                    index: *index,
                    count: names.len(),
                }
                .into()
            }),
        }
    }
}

impl Display for SheetSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetSelector::Last => f.write_str("last"),
            SheetSelector::Named(name) => f.write_str(name),
            SheetSelector::Index(index) => write!(f, "#{index}"),
        }
    }
}

/// Parses the command-line form: `last`, `#N` for a position, anything else is a sheet name.
impl FromStr for SheetSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("last") {
            return Ok(SheetSelector::Last);
        }
        if let Some(index) = trimmed
            .strip_prefix('#')
            .and_then(|n| n.parse::<usize>().ok())
        {
            return Ok(SheetSelector::Index(index));
        }
        Ok(SheetSelector::Named(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workbook() -> MemoryWorkbook {
        MemoryWorkbook::from_csv_sheets([
            ("Week 1", "Name\nA\n"),
            ("Week 2", "Name\nB\n"),
            ("Week 3", "Name\nC\n"),
        ])
        .unwrap()
    }

    #[test]
    fn test_selector_last() {
        let wb = workbook();
        assert_eq!(SheetSelector::Last.resolve(&wb).unwrap(), "Week 3");
    }

    #[test]
    fn test_selector_named_and_index() {
        let wb = workbook();
        let named = SheetSelector::Named("Week 1".to_string());
        assert_eq!(named.resolve(&wb).unwrap(), "Week 1");
        assert_eq!(SheetSelector::Index(1).resolve(&wb).unwrap(), "Week 2");
    }

    #[test]
    fn test_selector_missing() {
        let wb = workbook();
        let err = SheetSelector::Named("Week 9".to_string())
            .resolve(&wb)
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<InputError>(),
            Some(&InputError::missing_sheet("Week 9"))
        );
        let err = SheetSelector::Index(3).resolve(&wb).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::NoSheetAt { index: 3, count: 3 })
        ));
    }

    #[test]
    fn test_selector_last_on_empty_workbook() {
        let wb = MemoryWorkbook::default();
        assert!(SheetSelector::Last.resolve(&wb).is_err());
    }

    #[test]
    fn test_selector_from_str() {
        assert_eq!(
            "last".parse::<SheetSelector>().unwrap(),
            SheetSelector::Last
        );
        assert_eq!(
            "#2".parse::<SheetSelector>().unwrap(),
            SheetSelector::Index(2)
        );
        assert_eq!(
            "Week 42".parse::<SheetSelector>().unwrap(),
            SheetSelector::Named("Week 42".to_string())
        );
    }

    #[test]
    fn test_selector_serde() {
        let json = serde_json::to_string(&SheetSelector::Last).unwrap();
        assert_eq!(json, r#""last""#);
        let named: SheetSelector = serde_json::from_str(r#"{"named":"Week 42"}"#).unwrap();
        assert_eq!(named, SheetSelector::Named("Week 42".to_string()));
    }
}
