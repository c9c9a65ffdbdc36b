use crate::config::Config;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::{Hours, LeaveRecord};
use crate::report::{dedup_keep_last, Submission, LEAVES_STR, NAME_STR};
use crate::workbook::Table;
use crate::Result;
use rust_decimal::Decimal;
use tracing::debug;

/// Derives each respondent's adjusted weekly capacity from the leave column of the bandwidth sheet.
///
/// Rows with a blank name or a blank leave count are skipped. A leave count that is not a
/// non-negative number counts as zero. When a name is submitted more than once the last row wins.
///
/// # Errors
/// `InputError::MissingColumn` if the Name or leave column is absent.
pub fn resolve_capacity(
    table: &Table,
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<LeaveRecord>> {
    let name_ix = table.require(NAME_STR)?;
    let leaves_ix = table.require(LEAVES_STR)?;

    let mut submissions = Vec::new();
    for (ix, row) in table.rows().iter().enumerate() {
        let name_cell = table.cell(row, name_ix);
        let leaves_cell = table.cell(row, leaves_ix);
        if name_cell.is_blank() || leaves_cell.is_blank() {
            continue;
        }
        let sheet_row = table.sheet_row(ix);
        let leaves = match leaves_cell.to_decimal() {
            Some(leaves) if !leaves.is_sign_negative() => leaves,
            _ => {
                diagnostics.push(Diagnostic::UnparseableNumber {
                    sheet: table.sheet().to_string(),
                    row: sheet_row,
                    column: LEAVES_STR.to_string(),
                    value: leaves_cell.to_string(),
                    recovered_as: "0".to_string(),
                });
                Decimal::ZERO
            }
        };
        submissions.push(Submission {
            name: name_cell.to_string(),
            row: sheet_row,
            value: leaves,
        });
    }

    let records: Vec<LeaveRecord> = dedup_keep_last(table.sheet(), submissions, diagnostics)
        .into_iter()
        .map(|s| leave_record(s.name, s.value, config))
        .collect();
    debug!("Resolved capacity for {} respondents", records.len());
    Ok(records)
}

/// `max(0, base - leaves * hours_per_leave)`
pub(crate) fn leave_record(name: String, leaves: Decimal, config: &Config) -> LeaveRecord {
    let base = config.base_max_hours();
    let deduction = Hours::new(leaves) * config.hours_per_leave();
    LeaveRecord {
        name,
        leaves_past_week: leaves,
        base_max_hours: base,
        adjusted_capacity: (base - deduction).clamp_zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::bandwidth_table;
    use rust_decimal_macros::dec;

    #[test]
    fn test_capacity_from_leaves() {
        let table = bandwidth_table(&[("Alice", "0"), ("Bob", "2"), ("Carol", "0.5")]);
        let records = resolve_capacity(&table, &Config::default(), &mut Diagnostics::new()).unwrap();
        let caps: Vec<Hours> = records.iter().map(|r| r.adjusted_capacity).collect();
        assert_eq!(
            caps,
            vec![
                Hours::new(dec!(45)),
                Hours::new(dec!(27)),
                Hours::new(dec!(40.5))
            ]
        );
    }

    #[test]
    fn test_capacity_never_negative() {
        for leaves in 0..12u32 {
            let record = leave_record("X".to_string(), Decimal::from(leaves), &Config::default());
            assert!(!record.adjusted_capacity.is_negative(), "leaves={leaves}");
        }
        let record = leave_record("X".to_string(), dec!(5), &Config::default());
        assert_eq!(record.adjusted_capacity, Hours::ZERO);
    }

    #[test]
    fn test_last_submission_wins() {
        let table = bandwidth_table(&[("Alice", "1"), ("Bob", "0"), ("Alice", "3")]);
        let mut diagnostics = Diagnostics::new();
        let records = resolve_capacity(&table, &Config::default(), &mut diagnostics).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Bob");
        assert_eq!(records[1].name, "Alice");
        assert_eq!(records[1].leaves_past_week, dec!(3));
        assert_eq!(records[1].adjusted_capacity, Hours::new(dec!(18)));
        assert!(matches!(
            diagnostics.iter().next(),
            Some(Diagnostic::DuplicateSubmission { .. })
        ));
    }

    #[test]
    fn test_non_numeric_leaves_count_as_zero() {
        let table = bandwidth_table(&[("Alice", "none"), ("Bob", "-1")]);
        let mut diagnostics = Diagnostics::new();
        let records = resolve_capacity(&table, &Config::default(), &mut diagnostics).unwrap();
        assert_eq!(records[0].leaves_past_week, Decimal::ZERO);
        assert_eq!(records[0].adjusted_capacity, Hours::new(dec!(45)));
        assert_eq!(records[1].adjusted_capacity, Hours::new(dec!(45)));
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_blank_leaves_row_is_skipped() {
        let table = bandwidth_table(&[("Alice", "2"), ("Alice", ""), ("", "1")]);
        let records = resolve_capacity(&table, &Config::default(), &mut Diagnostics::new()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].adjusted_capacity, Hours::new(dec!(27)));
    }

    #[test]
    fn test_configured_allowance() {
        let config = Config::default()
            .with_base_max_hours(dec!(40))
            .with_hours_per_leave(dec!(8));
        let table = bandwidth_table(&[("Alice", "1")]);
        let records = resolve_capacity(&table, &config, &mut Diagnostics::new()).unwrap();
        assert_eq!(records[0].adjusted_capacity, Hours::new(dec!(32)));
    }
}
