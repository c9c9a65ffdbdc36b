//! Records of values that were defaulted or skipped while building a dashboard.
//!
//! Bad dates, non-numeric numbers, unknown billing types and unmatched names do not stop a build.
//! Each one is pushed here instead, logged, and returned with the model so that callers and tests
//! can see exactly which rows were touched.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tracing::{debug, warn};

/// A single data-quality event.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A date cell could not be parsed. The entry is kept with no date.
    UnparseableDate {
        sheet: String,
        row: usize,
        value: String,
    },
    /// A numeric cell could not be parsed and `recovered_as` was used instead (empty when the row
    /// was dropped).
    UnparseableNumber {
        sheet: String,
        row: usize,
        column: String,
        value: String,
        recovered_as: String,
    },
    /// A billing type other than "Billable" or "Non Billable". The hours count toward neither.
    UnknownBillingType { row: usize, value: String },
    /// A timesheet row with hours but no user. The hours count toward nobody.
    MissingUser { row: usize },
    /// Nobody in the bandwidth survey matched this timesheet user, so the default capacity applies.
    UnmatchedName { name: String, capacity: String },
    /// The adjusted capacity is zero, so utilization is undefined.
    ZeroCapacity { name: String },
    /// Several raw names normalize to the same key.
    NameCollision {
        key: String,
        names: Vec<String>,
        resolution: String,
    },
    /// A name appeared more than once in the survey and only the last submission was kept.
    DuplicateSubmission {
        sheet: String,
        name: String,
        rows: Vec<usize>,
    },
    /// A compliance question column is not in the survey sheet.
    MissingQuestion { question: String },
    /// An optional column is absent, so the section that needs it is empty.
    MissingColumn { sheet: String, column: String },
}

impl Diagnostic {
    /// Whether the event changes a number that appears on the dashboard.
    pub fn is_warning(&self) -> bool {
        !matches!(
            self,
            Diagnostic::DuplicateSubmission { .. } | Diagnostic::MissingQuestion { .. }
        )
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnparseableDate { sheet, row, value } => {
                write!(f, "{sheet} row {row}: unparseable date '{value}' left empty")
            }
            Diagnostic::UnparseableNumber {
                sheet,
                row,
                column,
                value,
                recovered_as,
            } => {
                if recovered_as.is_empty() {
                    write!(f, "{sheet} row {row}: '{column}' value '{value}' is not a number, row skipped")
                } else {
                    write!(f, "{sheet} row {row}: '{column}' value '{value}' is not a number, using {recovered_as}")
                }
            }
            Diagnostic::UnknownBillingType { row, value } => {
                write!(f, "row {row}: billing type '{value}' is neither billable nor non-billable")
            }
            Diagnostic::MissingUser { row } => write!(f, "row {row}: no user, hours ignored"),
            Diagnostic::UnmatchedName { name, capacity } => {
                write!(f, "'{name}' has no bandwidth submission, using capacity {capacity}")
            }
            Diagnostic::ZeroCapacity { name } => {
                write!(f, "'{name}' has zero capacity, utilization is undefined")
            }
            Diagnostic::NameCollision {
                key,
                names,
                resolution,
            } => write!(f, "names {names:?} all normalize to '{key}': {resolution}"),
            Diagnostic::DuplicateSubmission { sheet, name, rows } => {
                write!(f, "{sheet}: '{name}' submitted on rows {rows:?}, keeping the last")
            }
            Diagnostic::MissingQuestion { question } => {
                write!(f, "compliance question '{question}' not found, skipped")
            }
            Diagnostic::MissingColumn { sheet, column } => {
                write!(f, "{sheet}: optional column '{column}' not found")
            }
        }
    }
}

/// The diagnostics side-channel of a dashboard build.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `diagnostic` and logs it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_warning() {
            warn!("{diagnostic}");
        } else {
            debug!("{diagnostic}");
        }
        self.0.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn warnings(&self) -> usize {
        self.0.iter().filter(|d| d.is_warning()).count()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
