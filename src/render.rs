//! Renders the dashboard model as markdown text for the terminal.

use crate::diagnostics::Diagnostics;
use crate::model::{
    BillingType, ComplianceBucket, Hours, MemberSummary, PlannedCapacity, ProjectBreakdown,
    TeamOverview,
};
use crate::report::DashboardModel;
use rust_decimal::Decimal;
use tabled::settings::Style;
use tabled::{Table, Tabled};

const UNDEFINED: &str = "n/a";

/// Renders `rows` as a markdown table, one column per `Tabled` field.
fn markdown<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    format!("{table}\n")
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Billable Hours")]
    billable: Hours,
    #[tabled(rename = "Non-Billable Hours")]
    non_billable: Hours,
    #[tabled(rename = "Total Hours")]
    total: Hours,
    #[tabled(rename = "Leaves Past Week")]
    leaves: Decimal,
    #[tabled(rename = "Adjusted Capacity")]
    capacity: Hours,
    #[tabled(rename = "Utilization %")]
    utilization: String,
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct PlannedRow<'a> {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Name")]
    name: &'a str,
    #[tabled(rename = "Planned Hours")]
    planned: Hours,
    #[tabled(rename = "Available Hours")]
    available: String,
}

#[derive(Tabled)]
struct TaskLine<'a> {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Team Member")]
    team_member: &'a str,
    #[tabled(rename = "Hours")]
    hours: Hours,
    #[tabled(rename = "Type")]
    billing_type: &'a BillingType,
    #[tabled(rename = "Date")]
    date: &'a str,
}

#[derive(Tabled)]
struct MemberHoursRow<'a> {
    #[tabled(rename = "Team Member")]
    name: &'a str,
    #[tabled(rename = "Hours")]
    hours: Hours,
}

/// The whole dashboard: member summary, team overview, planned capacity, compliance and a count
/// of diagnostics.
pub fn dashboard(model: &DashboardModel) -> String {
    let mut output = String::new();
    output.push_str("## Team Member Summary\n\n");
    output.push_str(&summary(&model.summary));
    output.push_str("\n## Team Overview\n\n");
    output.push_str(&overview(&model.overview));
    output.push_str("\n## Planned vs Available Hours\n\n");
    output.push_str(&planned(&model.planned));
    output.push_str("\n## Compliance\n\n");
    output.push_str(&compliance(&model.compliance));
    output.push('\n');
    output.push_str(&diagnostics_line(&model.diagnostics));
    output
}

/// The member summary, numbered from 1, with the Total row last.
pub fn summary(rows: &[MemberSummary]) -> String {
    let mut output = markdown(rows.iter().enumerate().map(|(ix, row)| SummaryRow {
        rank: ix + 1,
        name: if row.default_capacity {
            format!("{}*", row.name)
        } else {
            row.name.clone()
        },
        billable: row.billable_hours,
        non_billable: row.non_billable_hours,
        total: row.total_hours,
        leaves: row.leaves_past_week.normalize(),
        capacity: row.adjusted_capacity,
        utilization: percent(row.utilization_percent),
    }));
    if rows.iter().any(|r| r.default_capacity) {
        output.push_str("\n\\* no bandwidth submission, default capacity used\n");
    }
    output
}

pub fn overview(overview: &TeamOverview) -> String {
    let metric = |metric, value: &dyn std::fmt::Display| MetricRow {
        metric,
        value: value.to_string(),
    };
    markdown([
        metric("Team Members", &overview.members),
        metric("Billable Hours", &overview.billable_hours),
        metric("Non-Billable Hours", &overview.non_billable_hours),
        metric("Utilized Hours", &overview.utilized_hours),
        metric("Not Utilized Hours", &overview.not_utilized_hours),
        metric("Capacity", &overview.capacity_hours),
        metric("Utilization %", &percent(Some(overview.utilization_percent))),
    ])
}

pub fn planned(rows: &[PlannedCapacity]) -> String {
    if rows.is_empty() {
        return "No planned hours submitted.\n".to_string();
    }
    markdown(rows.iter().enumerate().map(|(ix, row)| PlannedRow {
        rank: ix + 1,
        name: &row.name,
        planned: row.planned_hours,
        available: if row.overcommitted {
            format!("{} (overcommitted)", row.available_hours)
        } else {
            row.available_hours.to_string()
        },
    }))
}

/// One section per question, listing the names in each bucket.
pub fn compliance(buckets: &[ComplianceBucket]) -> String {
    if buckets.is_empty() {
        return "No compliance questions found.\n".to_string();
    }
    let mut output = String::new();
    let mut current: Option<&str> = None;
    for bucket in buckets {
        if current != Some(bucket.question.as_str()) {
            if current.is_some() {
                output.push('\n');
            }
            output.push_str(&format!("### {}\n\n", bucket.title));
            current = Some(bucket.question.as_str());
        }
        output.push_str(&format!(
            "- {} ({}): {}\n",
            bucket.response,
            bucket.count,
            bucket.names.join(", ")
        ));
    }
    output
}

/// The per-task tables of one project followed by the hours per member.
pub fn project(breakdown: &ProjectBreakdown) -> String {
    let mut output = format!("## {}\n", breakdown.project);
    for task in &breakdown.tasks {
        output.push_str(&format!("\n### {}\n\n", task.task));
        output.push_str(&markdown(task.rows.iter().enumerate().map(|(ix, row)| {
            TaskLine {
                rank: ix + 1,
                team_member: &row.team_member,
                hours: row.hours,
                billing_type: &row.billing_type,
                date: &row.date,
            }
        })));
    }

    output.push_str(&format!(
        "\nTotal hours logged: {}\n\n",
        breakdown.total_hours
    ));
    output.push_str(&markdown(breakdown.hours_per_member.iter().map(|member| {
        MemberHoursRow {
            name: &member.name,
            hours: member.hours,
        }
    })));
    output
}

pub fn project_list(projects: &[String]) -> String {
    if projects.is_empty() {
        return "No projects found.\n".to_string();
    }
    let mut output = String::new();
    for (ix, project) in projects.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", ix + 1, project));
    }
    output
}

fn diagnostics_line(diagnostics: &Diagnostics) -> String {
    match diagnostics.warnings() {
        0 => format!("{} notes, no warnings\n", diagnostics.len()),
        n => format!(
            "{} notes, {} warnings (use --format json or export to list them)\n",
            diagnostics.len(),
            n
        ),
    }
}

fn percent(value: Option<Decimal>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => UNDEFINED.to_string(),
    }
}
