//! The steps that turn two spreadsheet exports into a `DashboardModel`.
//!
//! Each step is a plain function over already-parsed data so that it can be tested on its own.
//! `build_dashboard` runs them in order.

mod aggregate;
mod capacity;
mod compliance;
mod dashboard;
mod merge;
mod overview;
mod planning;
mod project;
mod timesheet;

pub use aggregate::aggregate_hours;
pub use capacity::resolve_capacity;
pub use compliance::summarize_compliance;
pub use dashboard::{build_dashboard, DashboardModel};
pub use merge::merge_summaries;
pub use overview::team_overview;
pub use planning::resolve_planned;
pub use project::{project_breakdown, projects};
pub use timesheet::Timesheet;

use crate::diagnostics::{Diagnostic, Diagnostics};
use std::collections::HashMap;

pub(crate) const NAME_STR: &str = "Name";
pub(crate) const LEAVES_STR: &str = "Number of leaves past week";
pub(crate) const PLANNED_STR: &str = "Planned hours for the coming week";

/// One survey row that survived filtering, with the raw name it is deduplicated on.
#[derive(Debug, Clone)]
pub(crate) struct Submission<T> {
    pub(crate) name: String,
    pub(crate) row: usize,
    pub(crate) value: T,
}

/// Keeps only the last submission for each raw name. Survivors stay at the position of their last
/// occurrence, so `[A, B, A]` becomes `[B, A]`. Every name that was dropped at least once is
/// reported as a `DuplicateSubmission`.
pub(crate) fn dedup_keep_last<T>(
    sheet: &str,
    submissions: Vec<Submission<T>>,
    diagnostics: &mut Diagnostics,
) -> Vec<Submission<T>> {
    let mut last_index: HashMap<&str, usize> = HashMap::new();
    let mut rows_by_name: HashMap<&str, Vec<usize>> = HashMap::new();
    for (ix, submission) in submissions.iter().enumerate() {
        last_index.insert(submission.name.as_str(), ix);
        rows_by_name
            .entry(submission.name.as_str())
            .or_default()
            .push(submission.row);
    }

    let mut duplicates: Vec<(String, Vec<usize>)> = rows_by_name
        .into_iter()
        .filter(|(_, rows)| rows.len() > 1)
        .map(|(name, rows)| (name.to_string(), rows))
        .collect();
    duplicates.sort();

    let keep: Vec<bool> = (0..submissions.len())
        .map(|ix| last_index.get(submissions[ix].name.as_str()) == Some(&ix))
        .collect();

    for (name, rows) in duplicates {
        diagnostics.push(Diagnostic::DuplicateSubmission {
            sheet: sheet.to_string(),
            name,
            rows,
        });
    }

    submissions
        .into_iter()
        .zip(keep)
        .filter_map(|(submission, keep)| keep.then_some(submission))
        .collect()
}
