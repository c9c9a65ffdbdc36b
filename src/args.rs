//! These structs provide the CLI interface for the dashboard CLI.

use crate::commands::OutputFormat;
use crate::config::CollisionPolicy;
use crate::workbook::SheetSelector;
use crate::Config;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// dashboard: Team utilization, capacity and compliance from two spreadsheet exports.
///
/// The timesheet export holds one row per logged time entry on its "All Projects" sheet. The
/// bandwidth export holds one sheet per week of survey answers: leave taken, hours planned for the
/// coming week and a few yes/no compliance questions. By default the last sheet is the current
/// week.
///
/// Inputs can be .xlsx, .xlsm, .xls or .ods workbooks, or .csv files which are read as a single
/// sheet named after the file.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the team member summary, team overview, planned hours and compliance answers.
    Summary(SummaryArgs),
    /// List the projects of a timesheet export, or show the per-task detail of one project.
    Project(ProjectArgs),
    /// Write the dashboard tables as CSV files into a directory.
    Export(ExportArgs),
    /// Write a configuration file holding the default settings.
    Init(InitArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The configuration file. Defaults to $CONFIG_DIR/timesheet-dashboard/config.json when that
    /// file exists, and to built-in defaults otherwise.
    #[arg(long, env = "DASHBOARD_SETTINGS")]
    settings: Option<PathBuf>,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn settings(&self) -> Option<&Path> {
        self.settings.as_deref()
    }
}

/// The timesheet export and the settings that say how to read it.
#[derive(Debug, Parser, Clone)]
pub struct TimesheetInput {
    /// The timesheet export.
    #[arg(long)]
    timesheet: PathBuf,

    /// The sheet of the timesheet export that holds the time entries. Overrides the configuration.
    #[arg(long)]
    timesheet_sheet: Option<String>,
}

impl TimesheetInput {
    pub fn new(timesheet: impl Into<PathBuf>, timesheet_sheet: Option<String>) -> Self {
        Self {
            timesheet: timesheet.into(),
            timesheet_sheet,
        }
    }

    pub fn timesheet(&self) -> &Path {
        &self.timesheet
    }

    /// `config` with the command-line overrides applied.
    pub fn apply(&self, config: Config) -> Config {
        match &self.timesheet_sheet {
            Some(sheet) => config.with_timesheet_sheet(sheet.clone()),
            None => config,
        }
    }
}

/// Both exports and the settings that say how to read and join them.
#[derive(Debug, Parser, Clone)]
pub struct Inputs {
    #[clap(flatten)]
    timesheet: TimesheetInput,

    /// The bandwidth survey export.
    #[arg(long)]
    bandwidth: PathBuf,

    /// The sheet of the bandwidth export to read: "last", "#N" for the sheet at zero-based
    /// position N, or a sheet name. Overrides the configuration.
    #[arg(long)]
    bandwidth_sheet: Option<SheetSelector>,

    /// What to do when two timesheet users differ only in case or spacing. Overrides the
    /// configuration.
    #[arg(long, value_enum)]
    collision_policy: Option<CollisionPolicy>,
}

impl Inputs {
    pub fn new(timesheet: TimesheetInput, bandwidth: impl Into<PathBuf>) -> Self {
        Self {
            timesheet,
            bandwidth: bandwidth.into(),
            bandwidth_sheet: None,
            collision_policy: None,
        }
    }

    pub fn with_bandwidth_sheet(mut self, selector: SheetSelector) -> Self {
        self.bandwidth_sheet = Some(selector);
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = Some(policy);
        self
    }

    pub fn timesheet(&self) -> &Path {
        self.timesheet.timesheet()
    }

    pub fn bandwidth(&self) -> &Path {
        &self.bandwidth
    }

    /// `config` with the command-line overrides applied.
    pub fn apply(&self, config: Config) -> Config {
        let mut config = self.timesheet.apply(config);
        if let Some(selector) = &self.bandwidth_sheet {
            config = config.with_bandwidth_sheet(selector.clone());
        }
        if let Some(policy) = self.collision_policy {
            config = config.with_collision_policy(policy);
        }
        config
    }
}

/// Args for the `dashboard summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    #[clap(flatten)]
    inputs: Inputs,

    /// Print markdown tables or the whole dashboard model as JSON.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl SummaryArgs {
    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Args for the `dashboard project` command.
#[derive(Debug, Parser, Clone)]
pub struct ProjectArgs {
    #[clap(flatten)]
    input: TimesheetInput,

    /// The project to show. When omitted, the projects are listed.
    #[arg(long)]
    project: Option<String>,

    /// Print markdown tables or JSON.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl ProjectArgs {
    pub fn new(input: TimesheetInput, project: Option<String>, format: OutputFormat) -> Self {
        Self {
            input,
            project,
            format,
        }
    }

    pub fn input(&self) -> &TimesheetInput {
        &self.input
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Args for the `dashboard export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    #[clap(flatten)]
    inputs: Inputs,

    /// The directory to write the CSV files into. It is created if it does not exist.
    #[arg(long)]
    out: PathBuf,
}

impl ExportArgs {
    pub fn new(inputs: Inputs, out: impl Into<PathBuf>) -> Self {
        Self {
            inputs,
            out: out.into(),
        }
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn out(&self) -> &Path {
        &self.out
    }
}

/// Args for the `dashboard init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Where to write the configuration file. Defaults to --settings, then to
    /// $CONFIG_DIR/timesheet-dashboard/config.json.
    #[arg(long)]
    path: Option<PathBuf>,

    /// Replace an existing file.
    #[arg(long)]
    force: bool,
}

impl InitArgs {
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn force(&self) -> bool {
        self.force
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_summary() {
        let args = Args::try_parse_from([
            "dashboard",
            "--log-level",
            "debug",
            "summary",
            "--timesheet",
            "ts.xlsx",
            "--bandwidth",
            "bw.xlsx",
            "--bandwidth-sheet",
            "#2",
            "--collision-policy",
            "error",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        let Command::Summary(summary) = args.command() else {
            panic!("expected the summary command");
        };
        assert_eq!(summary.format(), OutputFormat::Json);
        assert_eq!(summary.inputs().timesheet(), Path::new("ts.xlsx"));

        let config = summary.inputs().apply(Config::default());
        assert_eq!(config.bandwidth_sheet(), &SheetSelector::Index(2));
        assert_eq!(config.collision_policy(), CollisionPolicy::Error);
        assert_eq!(config.timesheet_sheet(), "All Projects");
    }

    #[test]
    fn test_parse_project_defaults() {
        let args = Args::try_parse_from([
            "dashboard",
            "project",
            "--timesheet",
            "ts.csv",
            "--timesheet-sheet",
            "Detail",
        ])
        .unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
        let Command::Project(project) = args.command() else {
            panic!("expected the project command");
        };
        assert_eq!(project.project(), None);
        assert_eq!(project.format(), OutputFormat::Table);
        assert_eq!(
            project.input().apply(Config::default()).timesheet_sheet(),
            "Detail"
        );
    }

    #[test]
    fn test_summary_requires_bandwidth() {
        let result = Args::try_parse_from(["dashboard", "summary", "--timesheet", "ts.xlsx"]);
        assert!(result.is_err());
    }
}
