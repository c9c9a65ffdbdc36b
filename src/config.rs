//! Configuration file handling for the dashboard.
//!
//! The configuration file is a JSON document, by default stored at
//! `$CONFIG_DIR/timesheet-dashboard/config.json`. Every field is optional; missing fields take the
//! values used by the team's exports: an "All Projects" timesheet sheet, the last sheet of the
//! bandwidth export, a 45 hour week and 9 hours deducted per day of leave.

use crate::model::Hours;
use crate::workbook::SheetSelector;
use crate::{utils, Result};
use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "timesheet-dashboard";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const TIMESHEET_SHEET: &str = "All Projects";
const BASE_MAX_HOURS: u32 = 45;
const HOURS_PER_LEAVE: u32 = 9;

/// What to do when two different timesheet users normalize to the same name key.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Sum the hours into one row and record a diagnostic.
    #[default]
    Merge,
    /// Fail the build.
    Error,
}

serde_plain::derive_display_from_serialize!(CollisionPolicy);
serde_plain::derive_fromstr_from_deserialize!(CollisionPolicy);

/// A yes/no question from the bandwidth survey.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ComplianceQuestion {
    /// The exact column header in the survey sheet.
    pub column: String,
    /// A short title for displays.
    pub title: String,
}

impl ComplianceQuestion {
    pub fn new(column: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            title: title.into(),
        }
    }
}

fn default_questions() -> Vec<ComplianceQuestion> {
    vec![
        ComplianceQuestion::new("Is your timesheet submitted?", "Timesheet Submission"),
        ComplianceQuestion::new(
            "All tasks access requested for and created?",
            "Task Access Requested",
        ),
        ComplianceQuestion::new(
            "All checkin and checkout times accurate for the week? Regularized where inaccurate?",
            "Check-in/Checkout Accuracy",
        ),
    ]
}

/// The settings that drive a dashboard build.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "timesheet-dashboard",
///   "config_version": 1,
///   "timesheet_sheet": "All Projects",
///   "bandwidth_sheet": "last",
///   "base_max_hours": "45",
///   "hours_per_leave": "9",
///   "default_capacity": "45",
///   "collision_policy": "merge"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Application name, should always be "timesheet-dashboard"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The sheet of the timesheet export that holds one row per time entry.
    timesheet_sheet: String,

    /// Which sheet of the bandwidth export holds the current week's submissions.
    bandwidth_sheet: SheetSelector,

    /// Weekly hours for somebody who took no leave.
    base_max_hours: Decimal,

    /// Hours deducted from the weekly allowance per day of leave.
    hours_per_leave: Decimal,

    /// Capacity used for timesheet users without a bandwidth submission.
    default_capacity: Decimal,

    collision_policy: CollisionPolicy,

    compliance_questions: Vec<ComplianceQuestion>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            timesheet_sheet: TIMESHEET_SHEET.to_string(),
            bandwidth_sheet: SheetSelector::Last,
            base_max_hours: Decimal::from(BASE_MAX_HOURS),
            hours_per_leave: Decimal::from(HOURS_PER_LEAVE),
            default_capacity: Decimal::from(BASE_MAX_HOURS),
            collision_policy: CollisionPolicy::Merge,
            compliance_questions: default_questions(),
        }
    }
}

impl Config {
    /// The default location of the configuration file, `None` when the platform has no config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_JSON))
    }

    /// Loads the configuration from `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or names another application.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: Config = utils::deserialize(path)?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads `explicit` if it is given. Otherwise loads the file at the default location if there
    /// is one, and falls back to the defaults if there is not.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Saves the configuration to `path`, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        if let Some(parent) = p.parent().filter(|p| !p.as_os_str().is_empty()) {
            utils::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data).context("Unable to write config file")
    }

    pub fn timesheet_sheet(&self) -> &str {
        &self.timesheet_sheet
    }

    pub fn bandwidth_sheet(&self) -> &SheetSelector {
        &self.bandwidth_sheet
    }

    pub fn base_max_hours(&self) -> Hours {
        Hours::new(self.base_max_hours)
    }

    pub fn hours_per_leave(&self) -> Decimal {
        self.hours_per_leave
    }

    pub fn default_capacity(&self) -> Hours {
        Hours::new(self.default_capacity)
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    pub fn compliance_questions(&self) -> &[ComplianceQuestion] {
        &self.compliance_questions
    }

    pub fn with_timesheet_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.timesheet_sheet = sheet.into();
        self
    }

    pub fn with_bandwidth_sheet(mut self, selector: SheetSelector) -> Self {
        self.bandwidth_sheet = selector;
        self
    }

    pub fn with_base_max_hours(mut self, hours: Decimal) -> Self {
        self.base_max_hours = hours;
        self
    }

    pub fn with_hours_per_leave(mut self, hours: Decimal) -> Self {
        self.hours_per_leave = hours;
        self
    }

    pub fn with_default_capacity(mut self, hours: Decimal) -> Self {
        self.default_capacity = hours;
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    pub fn with_compliance_questions(mut self, questions: Vec<ComplianceQuestion>) -> Self {
        self.compliance_questions = questions;
        self
    }
}
