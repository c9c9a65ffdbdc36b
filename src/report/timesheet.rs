//! Loads time entries from the detail sheet of a timesheet export.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::{BillingType, Hours, TimeEntry};
use crate::workbook::{Cell, Table, Workbook, MAX_DATE_SERIAL};
use crate::Result;
use chrono::{NaiveDate, NaiveDateTime};
use std::str::FromStr;
use tracing::debug;

pub(crate) const USER_STR: &str = "User";
pub(crate) const DATE_STR: &str = "Date";
pub(crate) const PROJECT_STR: &str = "Project Name";
pub(crate) const TASK_STR: &str = "Task/General/Issue";
pub(crate) const HOURS_STR: &str = "Hours(For Calculation)";
pub(crate) const BILLING_TYPE_STR: &str = "Billing Type";

/// Two-digit years are tried before four-digit ones because `%Y` happily reads `25` as the year 25.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d-%B-%Y",
    "%d %B %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// The entries of a timesheet export, in sheet order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Timesheet {
    sheet: String,
    entries: Vec<TimeEntry>,
}

impl Timesheet {
    /// Reads `sheet_name` from `workbook` and parses every non-blank row into a `TimeEntry`.
    ///
    /// # Errors
    /// - `InputError::MissingSheet` if the sheet does not exist.
    /// - `InputError::MissingColumn` if any of the six expected columns is absent.
    ///
    /// Bad dates and non-numeric hours do not fail the load; they are recorded in `diagnostics`.
    pub fn load(
        workbook: &mut dyn Workbook,
        sheet_name: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self> {
        let table = workbook.table(sheet_name)?;
        Self::from_table(&table, diagnostics)
    }

    pub fn from_table(table: &Table, diagnostics: &mut Diagnostics) -> Result<Self> {
        let user_ix = table.require(USER_STR)?;
        let date_ix = table.require(DATE_STR)?;
        let project_ix = table.require(PROJECT_STR)?;
        let task_ix = table.require(TASK_STR)?;
        let hours_ix = table.require(HOURS_STR)?;
        let billing_ix = table.require(BILLING_TYPE_STR)?;

        let mut entries = Vec::with_capacity(table.len());
        for (ix, row) in table.rows().iter().enumerate() {
            let sheet_row = table.sheet_row(ix);

            let date_cell = table.cell(row, date_ix);
            let date = parse_date_cell(date_cell);
            if date.is_none() && !date_cell.is_blank() {
                diagnostics.push(Diagnostic::UnparseableDate {
                    sheet: table.sheet().to_string(),
                    row: sheet_row,
                    value: date_cell.to_string(),
                });
            }

            let hours_cell = table.cell(row, hours_ix);
            let hours = match parse_hours_cell(hours_cell) {
                Some(hours) => hours,
                None => {
                    diagnostics.push(Diagnostic::UnparseableNumber {
                        sheet: table.sheet().to_string(),
                        row: sheet_row,
                        column: HOURS_STR.to_string(),
                        value: hours_cell.to_string(),
                        recovered_as: Hours::ZERO.to_string(),
                    });
                    Hours::ZERO
                }
            };

            entries.push(TimeEntry {
                row: sheet_row,
                user: table.cell(row, user_ix).to_string(),
                date,
                project: table.cell(row, project_ix).to_string(),
                task: table.cell(row, task_ix).to_string(),
                hours,
                billing_type: BillingType::parse(&table.cell(row, billing_ix).to_string()),
            });
        }

        debug!(
            "Loaded {} time entries from '{}'",
            entries.len(),
            table.sheet()
        );
        Ok(Self {
            sheet: table.sheet().to_string(),
            entries,
        })
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TimeEntry> {
        self.entries
    }
}

/// Blank cells are zero hours. Returns `None` only for values that are not numbers.
fn parse_hours_cell(cell: &Cell) -> Option<Hours> {
    match cell {
        Cell::Empty => Some(Hours::ZERO),
        Cell::Text(s) => Hours::from_str(s).ok(),
        other => other.to_decimal().map(Hours::new),
    }
}

fn parse_date_cell(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(d) => Some(*d),
        Cell::Number(n) if *n >= 1.0 && *n <= MAX_DATE_SERIAL => Cell::date_from_serial(*n),
        Cell::Text(s) => parse_day_first(s),
        _ => None,
    }
}

/// Parses a date written day-first, as in `14/03/2025`. ISO dates are also accepted. A trailing
/// time of day is ignored.
pub(crate) fn parse_day_first(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }

    let first_token = s.split_whitespace().next().unwrap_or(s);
    for candidate in [s, first_token] {
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(candidate, format) {
                return Some(date);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use crate::test::timesheet_workbook;
    use crate::workbook::MemoryWorkbook;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_parse_day_first() {
        assert_eq!(parse_day_first("03/04/2025"), date(2025, 4, 3));
        assert_eq!(parse_day_first("3-4-2025"), date(2025, 4, 3));
        assert_eq!(parse_day_first("03/04/25"), date(2025, 4, 3));
        assert_eq!(parse_day_first("14 Mar 2025"), date(2025, 3, 14));
        assert_eq!(parse_day_first("14-Mar-2025"), date(2025, 3, 14));
        assert_eq!(parse_day_first("2025-03-14"), date(2025, 3, 14));
        assert_eq!(parse_day_first("14/03/2025 17:30"), date(2025, 3, 14));
        assert_eq!(parse_day_first("2025-03-14T09:00:00"), date(2025, 3, 14));
    }

    #[test]
    fn test_parse_day_first_rejects_garbage() {
        assert_eq!(parse_day_first("yesterday"), None);
        assert_eq!(parse_day_first("31/02/2025"), None);
        assert_eq!(parse_day_first(""), None);
    }

    #[test]
    fn test_load_entries() {
        let mut wb = timesheet_workbook(&[
            ["Alice", "03/03/2025", "Apollo", "Design", "7.5", "Billable"],
            ["Bob", "04/03/2025", "Apollo", "Build", "2", "Non Billable"],
        ]);
        let mut diagnostics = Diagnostics::new();
        let timesheet = Timesheet::load(&mut wb, "All Projects", &mut diagnostics).unwrap();
        let entries = timesheet.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].user, "Alice");
        assert_eq!(entries[0].hours, Hours::new(dec!(7.5)));
        assert_eq!(entries[0].billing_type, BillingType::Billable);
        assert_eq!(entries[0].date, date(2025, 3, 3));
        assert_eq!(entries[0].row, 2);
        assert_eq!(entries[1].billing_type, BillingType::NonBillable);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_bad_date_is_kept_as_none() {
        let mut wb = timesheet_workbook(&[["Alice", "someday", "P", "T", "1", "Billable"]]);
        let mut diagnostics = Diagnostics::new();
        let timesheet = Timesheet::load(&mut wb, "All Projects", &mut diagnostics).unwrap();
        assert_eq!(timesheet.entries().len(), 1);
        assert_eq!(timesheet.entries()[0].date, None);
        assert_eq!(
            diagnostics.iter().next(),
            Some(&Diagnostic::UnparseableDate {
                sheet: "All Projects".to_string(),
                row: 2,
                value: "someday".to_string(),
            })
        );
    }

    #[test]
    fn test_bad_hours_become_zero() {
        let mut wb = timesheet_workbook(&[
            ["Alice", "03/03/2025", "P", "T", "lots", "Billable"],
            ["Alice", "03/03/2025", "P", "T", "", "Billable"],
        ]);
        let mut diagnostics = Diagnostics::new();
        let timesheet = Timesheet::load(&mut wb, "All Projects", &mut diagnostics).unwrap();
        assert_eq!(timesheet.entries()[0].hours, Hours::ZERO);
        assert_eq!(timesheet.entries()[1].hours, Hours::ZERO);
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics.iter().next(),
            Some(Diagnostic::UnparseableNumber { row: 2, .. })
        ));
    }

    #[test]
    fn test_headers_with_padding() {
        let mut wb = MemoryWorkbook::from_csv_sheets([(
            "All Projects",
            " User ,Date, Project Name,Task/General/Issue ,Hours(For Calculation) ,Billing Type\n\
             Alice,01/01/2025,P,T,1,Billable\n",
        )])
        .unwrap();
        let mut diagnostics = Diagnostics::new();
        let timesheet = Timesheet::load(&mut wb, "All Projects", &mut diagnostics).unwrap();
        assert_eq!(timesheet.entries().len(), 1);
    }

    #[test]
    fn test_missing_sheet() {
        let mut wb = MemoryWorkbook::from_csv_sheets([("Sheet1", "User\n")]).unwrap();
        let err = Timesheet::load(&mut wb, "All Projects", &mut Diagnostics::new()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InputError>(),
            Some(&InputError::missing_sheet("All Projects"))
        );
    }

    #[test]
    fn test_missing_column() {
        let mut wb = MemoryWorkbook::from_csv_sheets([(
            "All Projects",
            "User,Date,Project Name,Task/General/Issue,Billing Type\n",
        )])
        .unwrap();
        let err = Timesheet::load(&mut wb, "All Projects", &mut Diagnostics::new()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InputError>(),
            Some(&InputError::missing_column(
                "All Projects",
                "Hours(For Calculation)"
            ))
        );
    }
}
