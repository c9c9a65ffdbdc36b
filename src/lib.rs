//! Builds a team dashboard from a timesheet export and a weekly bandwidth survey export.
//!
//! `report::build_dashboard` joins hours logged per person with the capacity left after leave,
//! and summarizes planned hours and compliance answers. The `dashboard` binary renders the
//! result as markdown tables, JSON or CSV files.

pub mod args;
pub mod commands;
mod config;
pub mod diagnostics;
mod error;
pub mod model;
pub mod render;
pub mod report;
mod utils;
pub mod workbook;


pub use config::{CollisionPolicy, ComplianceQuestion, Config};
pub use error::{Error, InputError, Result};
