use crate::config::Config;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::{Hours, PlannedCapacity};
use crate::report::{dedup_keep_last, Submission, NAME_STR, PLANNED_STR};
use crate::workbook::{Cell, Table};
use std::str::FromStr;
use tracing::debug;

/// Reads the hours each respondent plans for the coming week and what is left of the base
/// allowance.
///
/// Rows with a blank name or a blank planned value are dropped, as are planned values that are not
/// numbers (with a diagnostic). Repeated names keep their last submission. `available_hours` is not
/// clamped: planning more than the allowance shows up as a negative value with `overcommitted`
/// set.
///
/// When the sheet has no Name or planned column the result is empty and a `MissingColumn`
/// diagnostic is recorded.
pub fn resolve_planned(
    table: &Table,
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> Vec<PlannedCapacity> {
    let columns = [NAME_STR, PLANNED_STR].map(|column| (column, table.column(column)));
    for (column, ix) in &columns {
        if ix.is_none() {
            diagnostics.push(Diagnostic::MissingColumn {
                sheet: table.sheet().to_string(),
                column: column.to_string(),
            });
        }
    }
    let [(_, Some(name_ix)), (_, Some(planned_ix))] = columns else {
        return Vec::new();
    };

    let mut submissions = Vec::new();
    for (ix, row) in table.rows().iter().enumerate() {
        let name = table.cell(row, name_ix);
        let planned_cell = table.cell(row, planned_ix);
        if name.is_blank() || planned_cell.is_blank() {
            continue;
        }
        let sheet_row = table.sheet_row(ix);
        let Some(planned) = parse_planned(planned_cell) else {
            diagnostics.push(Diagnostic::UnparseableNumber {
                sheet: table.sheet().to_string(),
                row: sheet_row,
                column: PLANNED_STR.to_string(),
                value: planned_cell.to_string(),
                recovered_as: String::new(),
            });
            continue;
        };
        submissions.push(Submission {
            name: name.to_string(),
            row: sheet_row,
            value: planned,
        });
    }

    let base = config.base_max_hours();
    let planned: Vec<PlannedCapacity> = dedup_keep_last(table.sheet(), submissions, diagnostics)
        .into_iter()
        .map(|s| {
            let available_hours = base - s.value;
            PlannedCapacity {
                name: s.name,
                planned_hours: s.value,
                available_hours,
                overcommitted: available_hours.is_negative(),
            }
        })
        .collect();
    debug!("Resolved planned hours for {} respondents", planned.len());
    planned
}

fn parse_planned(cell: &Cell) -> Option<Hours> {
    match cell {
        Cell::Text(s) => Hours::from_str(s).ok(),
        other => other.to_decimal().map(Hours::new),
    }
}
