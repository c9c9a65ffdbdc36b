//! Types that represent the dashboard data model, such as `TimeEntry` and `MemberSummary`.
mod billing;
mod hours;
mod name;

pub use billing::BillingType;
pub use hours::{Hours, HoursError};
pub use name::NameKey;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The display name of the synthetic row appended after all team members.
pub const TOTAL_ROW_NAME: &str = "Total";

/// The date format used when showing dates to people.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Represents a single row from the "All Projects" sheet of a timesheet export.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimeEntry {
    /// The 1-based row number in the sheet, counting the header row.
    pub row: usize,
    pub user: String,
    /// `None` when the cell could not be read as a date.
    pub date: Option<NaiveDate>,
    pub project: String,
    pub task: String,
    pub hours: Hours,
    pub billing_type: BillingType,
}

impl TimeEntry {
    /// The date as `dd/mm/yyyy`, or an empty string when the date is unknown.
    pub fn display_date(&self) -> String {
        self.date
            .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

/// Billable and non-billable hours for one user of the timesheet export.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserHoursSummary {
    pub name: String,
    pub billable_hours: Hours,
    pub non_billable_hours: Hours,
    pub total_hours: Hours,
}

impl UserHoursSummary {
    pub fn new(name: impl Into<String>, billable_hours: Hours, non_billable_hours: Hours) -> Self {
        Self {
            name: name.into(),
            billable_hours,
            non_billable_hours,
            total_hours: billable_hours + non_billable_hours,
        }
    }
}

/// One respondent's leave count from the bandwidth survey and the capacity that follows from it.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LeaveRecord {
    pub name: String,
    pub leaves_past_week: Decimal,
    pub base_max_hours: Hours,
    /// `max(0, base_max_hours - leaves_past_week * hours_per_leave)`
    pub adjusted_capacity: Hours,
}

/// A row of the team member summary: hours joined with capacity.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberSummary {
    pub name: String,
    pub billable_hours: Hours,
    pub non_billable_hours: Hours,
    pub total_hours: Hours,
    pub leaves_past_week: Decimal,
    pub adjusted_capacity: Hours,
    /// `None` when the capacity is zero and utilization is undefined.
    pub utilization_percent: Option<Decimal>,
    /// True when no leave record matched and the capacity is the default.
    pub default_capacity: bool,
    /// Set only on the synthetic Total row. A member named "Total" is still a member.
    #[serde(default)]
    pub total: bool,
}

impl MemberSummary {
    pub fn is_total(&self) -> bool {
        self.total
    }
}

/// The answer bucket of a compliance question.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Response {
    Yes,
    No,
}

serde_plain::derive_display_from_serialize!(Response);
serde_plain::derive_fromstr_from_deserialize!(Response);

/// The respondents who gave one kind of answer to one compliance question.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ComplianceBucket {
    /// The exact header text of the question column.
    pub question: String,
    /// A short title for the question, e.g. "Timesheet Submission".
    pub title: String,
    pub response: Response,
    pub count: usize,
    /// Respondent names in sheet order.
    pub names: Vec<String>,
}

/// Planned hours for the coming week and what is left of the base allowance.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlannedCapacity {
    pub name: String,
    pub planned_hours: Hours,
    /// `base_max_hours - planned_hours`, negative when someone planned more than the allowance.
    pub available_hours: Hours,
    pub overcommitted: bool,
}

/// Team-wide totals, computed from the member rows only.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamOverview {
    pub members: usize,
    pub billable_hours: Hours,
    pub non_billable_hours: Hours,
    pub utilized_hours: Hours,
    pub capacity_hours: Hours,
    /// `max(0, capacity_hours - utilized_hours)`
    pub not_utilized_hours: Hours,
    /// Zero when the team has no capacity.
    pub utilization_percent: Decimal,
}

/// One line of a task detail table.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TaskRow {
    pub team_member: String,
    pub hours: Hours,
    #[serde(rename = "type")]
    pub billing_type: BillingType,
    /// `dd/mm/yyyy`, empty when the date could not be parsed.
    pub date: String,
}

/// The entries logged against one task of a project.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TaskBreakdown {
    pub task: String,
    pub rows: Vec<TaskRow>,
}

/// Hours logged by one person against a project.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberHours {
    pub name: String,
    pub hours: Hours,
}

/// The per-task detail tables of one project.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProjectBreakdown {
    pub project: String,
    pub tasks: Vec<TaskBreakdown>,
    pub total_hours: Hours,
    pub hours_per_member: Vec<MemberHours>,
}
