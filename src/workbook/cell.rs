use chrono::{NaiveDate, TimeDelta};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Largest date serial a spreadsheet can hold (9999-12-31).
pub const MAX_DATE_SERIAL: f64 = 2_958_465.0;

/// The value of one spreadsheet cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Cell {
    /// Converts a spreadsheet date serial (days since 1899-12-30, with a fractional time part) to
    /// a date. Returns `None` for serials outside `0..=MAX_DATE_SERIAL`.
    pub fn date_from_serial(serial: f64) -> Option<NaiveDate> {
        if !(0.0..=MAX_DATE_SERIAL).contains(&serial) {
            return None;
        }
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
        epoch.checked_add_signed(TimeDelta::try_days(serial.trunc() as i64)?)
    }

    /// True for empty cells and for text that is only whitespace. Spreadsheet readers treat both
    /// as missing values.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// The text of a `Text` cell, `None` for every other kind.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Interprets the cell as a number. Text is trimmed and may contain thousands separators.
    /// Returns `None` for blanks and for text that is not a number.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Cell::Number(n) => Decimal::from_f64(*n).map(|d| d.normalize()),
            Cell::Bool(b) => Some(if *b { Decimal::ONE } else { Decimal::ZERO }),
            Cell::Text(s) => {
                let trimmed = s.trim().replace(',', "");
                if trimmed.is_empty() {
                    return None;
                }
                Decimal::from_str(&trimmed)
                    .or_else(|_| Decimal::from_scientific(&trimmed))
                    .ok()
            }
            Cell::Empty | Cell::Date(_) => None,
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{n:.0}")
                } else {
                    write!(f, "{n}")
                }
            }
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}
