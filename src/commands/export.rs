use crate::args::ExportArgs;
use crate::commands::summary::load_dashboard;
use crate::commands::Out;
use crate::report::DashboardModel;
use crate::{utils, Config, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;

const SUMMARY_CSV: &str = "summary.csv";
const PLANNED_CSV: &str = "planned.csv";
const COMPLIANCE_CSV: &str = "compliance.csv";
const ENTRIES_CSV: &str = "entries.csv";
const DIAGNOSTICS_CSV: &str = "diagnostics.csv";

/// Builds the dashboard and writes its tables as CSV files into `args.out()`. The structure is the
/// list of files written.
///
/// # Errors
/// - Returns an error if the dashboard cannot be built.
/// - Returns an error if the output directory or any file cannot be written.
pub fn export(config: Config, args: &ExportArgs) -> Result<Out<Vec<PathBuf>>> {
    let model = load_dashboard(config, args.inputs())?;
    let files = write_csv_files(&model, args.out())?;
    Ok(Out::new(
        format!(
            "Wrote {} files to {}",
            files.len(),
            args.out().display()
        ),
        files,
    ))
}

pub(crate) fn write_csv_files(model: &DashboardModel, dir: &Path) -> Result<Vec<PathBuf>> {
    utils::create_dir_all(dir)?;
    let files = vec![
        write_csv(dir, SUMMARY_CSV, summary_rows(model))?,
        write_csv(dir, PLANNED_CSV, planned_rows(model))?,
        write_csv(dir, COMPLIANCE_CSV, compliance_rows(model))?,
        write_csv(dir, ENTRIES_CSV, entry_rows(model))?,
        write_csv(dir, DIAGNOSTICS_CSV, diagnostic_rows(model))?,
    ];
    Ok(files)
}

fn write_csv(dir: &Path, name: &str, rows: Vec<Vec<String>>) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Unable to create {}", path.display()))?;
    for row in &rows {
        writer
            .write_record(row)
            .with_context(|| format!("Unable to write to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Unable to write to {}", path.display()))?;
    debug!("Wrote {} rows to {}", rows.len().saturating_sub(1), path.display());
    Ok(path)
}

fn header(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

fn summary_rows(model: &DashboardModel) -> Vec<Vec<String>> {
    let mut rows = vec![header(&[
        "Name",
        "Billable Hours",
        "Non-Billable Hours",
        "Total Hours",
        "Leaves Past Week",
        "Adjusted Capacity",
        "Utilization %",
        "Default Capacity",
    ])];
    for m in &model.summary {
        rows.push(vec![
            m.name.clone(),
            m.billable_hours.value().to_string(),
            m.non_billable_hours.value().to_string(),
            m.total_hours.value().to_string(),
            m.leaves_past_week.normalize().to_string(),
            m.adjusted_capacity.value().to_string(),
            m.utilization_percent
                .map(|u| u.to_string())
                .unwrap_or_default(),
            m.default_capacity.to_string(),
        ]);
    }
    rows
}

fn planned_rows(model: &DashboardModel) -> Vec<Vec<String>> {
    let mut rows = vec![header(&[
        "Name",
        "Planned Hours",
        "Available Hours",
        "Overcommitted",
    ])];
    for p in &model.planned {
        rows.push(vec![
            p.name.clone(),
            p.planned_hours.value().to_string(),
            p.available_hours.value().to_string(),
            p.overcommitted.to_string(),
        ]);
    }
    rows
}

fn compliance_rows(model: &DashboardModel) -> Vec<Vec<String>> {
    let mut rows = vec![header(&["Question", "Title", "Response", "Count", "Names"])];
    for b in &model.compliance {
        rows.push(vec![
            b.question.clone(),
            b.title.clone(),
            b.response.to_string(),
            b.count.to_string(),
            b.names.join("; "),
        ]);
    }
    rows
}

fn entry_rows(model: &DashboardModel) -> Vec<Vec<String>> {
    let mut rows = vec![header(&[
        "Row",
        "User",
        "Date",
        "Project Name",
        "Task/General/Issue",
        "Hours",
        "Billing Type",
    ])];
    for e in &model.entries {
        rows.push(vec![
            e.row.to_string(),
            e.user.clone(),
            e.display_date(),
            e.project.clone(),
            e.task.clone(),
            e.hours.value().to_string(),
            e.billing_type.to_string(),
        ]);
    }
    rows
}

fn diagnostic_rows(model: &DashboardModel) -> Vec<Vec<String>> {
    let mut rows = vec![header(&["Warning", "Message"])];
    for d in &model.diagnostics {
        rows.push(vec![d.is_warning().to_string(), d.to_string()]);
    }
    rows
}
