use crate::args::ProjectArgs;
use crate::commands::Out;
use crate::diagnostics::Diagnostics;
use crate::model::ProjectBreakdown;
use crate::report::{project_breakdown, projects, Timesheet};
use crate::{render, workbook, Config, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

/// The structured output of `dashboard project`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectReport {
    Projects(Vec<String>),
    Breakdown(ProjectBreakdown),
}

/// Lists the projects of the timesheet export, or shows the detail of `args.project()`.
///
/// # Errors
/// - Returns an error if the file cannot be opened or lacks the timesheet sheet or its columns.
/// - Returns an error if nothing is logged against the requested project.
pub fn project(config: Config, args: &ProjectArgs) -> Result<Out<ProjectReport>> {
    let config = args.input().apply(config);
    let path = args.input().timesheet();
    let mut wb = workbook::open(path)
        .with_context(|| format!("Unable to open the timesheet export {}", path.display()))?;
    let entries =
        Timesheet::load(wb.as_mut(), config.timesheet_sheet(), &mut Diagnostics::new())?
            .into_entries();

    match args.project() {
        None => {
            let names = projects(&entries);
            Ok(Out::new(
                render::project_list(&names),
                ProjectReport::Projects(names),
            ))
        }
        Some(name) => {
            let Some(breakdown) = project_breakdown(&entries, name) else {
                bail!("No time entries are logged against the project '{name}'");
            };
            Ok(Out::new(
                render::project(&breakdown),
                ProjectReport::Breakdown(breakdown),
            ))
        }
    }
}
