use thiserror::Error as ThisError;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Structural problems with an input workbook. These abort the build of a dashboard. They travel
/// inside `anyhow::Error` and can be recovered with `downcast_ref`.
#[derive(Debug, Clone, Eq, PartialEq, ThisError)]
pub enum InputError {
    /// The workbook does not contain the sheet we need.
    #[error("The sheet '{sheet}' was not found in the workbook")]
    MissingSheet { sheet: String },

    /// The sheet exists but a required header is absent.
    #[error("The sheet '{sheet}' is missing the required column '{column}'")]
    MissingColumn { sheet: String, column: String },

    /// Two different timesheet users normalize to the same name key and the collision policy is
    /// `error`.
    #[error("The names {names:?} all normalize to '{key}' and cannot be told apart")]
    NameCollision { key: String, names: Vec<String> },

    /// The workbook has no sheets at all, or the requested sheet position does not exist.
    #[error("The workbook has no sheet at position {index} (it has {count} sheets)")]
    NoSheetAt { index: usize, count: usize },
}

impl InputError {
    pub(crate) fn missing_sheet(sheet: impl Into<String>) -> Self {
        InputError::MissingSheet {
            sheet: sheet.into(),
        }
    }

    pub(crate) fn missing_column(sheet: impl Into<String>, column: impl Into<String>) -> Self {
        InputError::MissingColumn {
            sheet: sheet.into(),
            column: column.into(),
        }
    }
}
