use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::model::{ComplianceBucket, MemberSummary, PlannedCapacity, TeamOverview, TimeEntry};
use crate::report::{
    aggregate_hours, merge_summaries, projects, resolve_capacity, resolve_planned,
    summarize_compliance, team_overview, Timesheet,
};
use crate::workbook::Workbook;
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything a dashboard shows, computed from one timesheet export and one bandwidth export.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardModel {
    /// One row per timesheet user, in name order, followed by the "Total" row.
    pub summary: Vec<MemberSummary>,
    pub overview: TeamOverview,
    /// Distinct project names in the order they first appear in the timesheet.
    pub projects: Vec<String>,
    pub entries: Vec<TimeEntry>,
    pub planned: Vec<PlannedCapacity>,
    pub compliance: Vec<ComplianceBucket>,
    pub diagnostics: Diagnostics,
}

impl DashboardModel {
    /// The summary rows without the "Total" row.
    pub fn members(&self) -> impl Iterator<Item = &MemberSummary> {
        self.summary.iter().filter(|m| !m.is_total())
    }

    pub fn total(&self) -> Option<&MemberSummary> {
        self.summary.iter().find(|m| m.is_total())
    }
}

/// Builds the dashboard model from the two exports.
///
/// The timesheet sheet is named by `config.timesheet_sheet()`. The bandwidth sheet is picked by
/// `config.bandwidth_sheet()` and feeds the capacity, planning and compliance sections.
///
/// The result depends only on the two workbooks and `config`.
///
/// # Errors
/// Missing sheets and required columns, and name collisions under the `error` policy. Data
/// problems inside rows are recorded in `DashboardModel::diagnostics` instead.
pub fn build_dashboard(
    timesheet: &mut dyn Workbook,
    bandwidth: &mut dyn Workbook,
    config: &Config,
) -> Result<DashboardModel> {
    let mut diagnostics = Diagnostics::new();

    let entries = Timesheet::load(timesheet, config.timesheet_sheet(), &mut diagnostics)?
        .into_entries();
    let hours = aggregate_hours(&entries, &mut diagnostics);

    let sheet = config.bandwidth_sheet().resolve(bandwidth)?;
    let survey = bandwidth.table(&sheet)?;
    let leaves = resolve_capacity(&survey, config, &mut diagnostics)?;
    let summary = merge_summaries(&hours, &leaves, config, &mut diagnostics)?;
    let planned = resolve_planned(&survey, config, &mut diagnostics);
    let compliance = summarize_compliance(&survey, config, &mut diagnostics)?;

    let overview = team_overview(&summary);
    info!(
        "Built dashboard for {} members from '{}' and '{}' with {} warnings",
        overview.members,
        config.timesheet_sheet(),
        sheet,
        diagnostics.warnings()
    );

    Ok(DashboardModel {
        projects: projects(&entries),
        summary,
        overview,
        entries,
        planned,
        compliance,
        diagnostics,
    })
}
