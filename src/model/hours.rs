//! Hours type for handling logged time and capacity values.
//!
//! This module provides the `Hours` type which wraps `Decimal` so that sums of many small entries
//! such as `0.1` do not drift, and handles parsing values that may include thousands separators or
//! an `h` suffix.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

/// A number of hours.
///
/// # Examples
///
/// ```
/// # use timesheet_dashboard::model::Hours;
/// # use std::str::FromStr;
/// let hours = Hours::from_str("1,234.5").unwrap();
/// assert_eq!(hours.to_string(), "1,234.50");
/// ```
///
/// ```
/// # use timesheet_dashboard::model::Hours;
/// # use std::str::FromStr;
/// let hours = Hours::from_str(" 7.5h ").unwrap();
/// assert_eq!(hours, Hours::from_str("7.5").unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hours(Decimal);

impl Hours {
    pub const ZERO: Hours = Hours(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Clamps negative values to zero.
    pub fn clamp_zero(self) -> Self {
        if self.is_negative() {
            Hours::ZERO
        } else {
            self
        }
    }

    /// Rounds half away from zero to `dp` decimal places.
    pub fn round(self, dp: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// `self / other * 100` rounded to two decimal places, or `None` when `other` is zero.
    pub fn percent_of(self, other: Hours) -> Option<Decimal> {
        if other.is_zero() {
            return None;
        }
        let ratio = self.0.checked_div(other.0)?;
        let percent = ratio.checked_mul(Decimal::ONE_HUNDRED)?;
        Some(percent.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}

/// An error that can occur when parsing strings into `Hours` values.
pub struct HoursError(rust_decimal::Error);

impl Debug for HoursError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for HoursError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for HoursError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Hours {
    type Err = HoursError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Hours::default());
        }

        // Some exports suffix durations with an h
        let without_suffix = trimmed
            .strip_suffix("hrs")
            .or_else(|| trimmed.strip_suffix('h'))
            .unwrap_or(trimmed)
            .trim_end();

        let without_commas = without_suffix.replace(',', "");
        let value = Decimal::from_str(&without_commas).map_err(HoursError)?;
        Ok(Hours(value))
    }
}

impl Display for Hours {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rounded = self.round(2).value();
        if rounded.abs() < Decimal::ONE_THOUSAND {
            write!(f, "{:.2}", rounded)
        } else {
            write!(
                f,
                "{}",
                format_num::format_num!(",.2", rounded.to_f64().unwrap_or_default())
            )
        }
    }
}

impl Serialize for Hours {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.normalize().to_string())
    }
}

impl<'de> Deserialize<'de> for Hours {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Hours::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Hours {
    fn from(value: Decimal) -> Self {
        Hours(value)
    }
}

impl From<Hours> for Decimal {
    fn from(hours: Hours) -> Self {
        hours.value()
    }
}

impl Add for Hours {
    type Output = Hours;

    fn add(self, rhs: Hours) -> Self::Output {
        Hours(self.0 + rhs.0)
    }
}

impl AddAssign for Hours {
    fn add_assign(&mut self, rhs: Hours) {
        self.0 += rhs.0;
    }
}

impl Sub for Hours {
    type Output = Hours;

    fn sub(self, rhs: Hours) -> Self::Output {
        Hours(self.0 - rhs.0)
    }
}

impl Mul<Decimal> for Hours {
    type Output = Hours;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Hours(self.0 * rhs)
    }
}

impl Sum for Hours {
    fn sum<I: Iterator<Item = Hours>>(iter: I) -> Self {
        iter.fold(Hours::ZERO, |acc, h| acc + h)
    }
}

impl<'a> Sum<&'a Hours> for Hours {
    fn sum<I: Iterator<Item = &'a Hours>>(iter: I) -> Self {
        iter.fold(Hours::ZERO, |acc, h| acc + *h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_plain() {
        let hours = Hours::from_str("7.25").unwrap();
        assert_eq!(hours.value(), dec!(7.25));
    }

    #[test]
    fn test_parse_empty_string() {
        assert_eq!(Hours::from_str("  ").unwrap(), Hours::ZERO);
    }

    #[test]
    fn test_parse_suffix() {
        assert_eq!(Hours::from_str("8h").unwrap().value(), dec!(8));
        assert_eq!(Hours::from_str("8 hrs").unwrap().value(), dec!(8));
    }

    #[test]
    fn test_parse_commas() {
        assert_eq!(Hours::from_str("1,000.5").unwrap().value(), dec!(1000.5));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Hours::from_str("eight").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Hours::new(dec!(15)).to_string(), "15.00");
        assert_eq!(Hours::new(dec!(0.125)).to_string(), "0.13");
        assert_eq!(Hours::new(dec!(-3)).to_string(), "-3.00");
        assert_eq!(Hours::new(dec!(12345.678)).to_string(), "12,345.68");
    }

    #[test]
    fn test_sum_has_no_drift() {
        let total: Hours = (0..10).map(|_| Hours::new(dec!(0.1))).sum();
        assert_eq!(total.value(), dec!(1.0));
    }

    #[test]
    fn test_clamp_zero() {
        assert_eq!(Hours::new(dec!(-9)).clamp_zero(), Hours::ZERO);
        assert_eq!(Hours::new(dec!(9)).clamp_zero(), Hours::new(dec!(9)));
    }

    #[test]
    fn test_percent_of() {
        let worked = Hours::new(dec!(15));
        let capacity = Hours::new(dec!(45));
        assert_eq!(worked.percent_of(capacity), Some(dec!(33.33)));
        assert_eq!(Hours::new(dec!(8)).percent_of(capacity), Some(dec!(17.78)));
        assert_eq!(worked.percent_of(Hours::ZERO), None);
    }

    #[test]
    fn test_serde() {
        let hours = Hours::new(dec!(7.50));
        let json = serde_json::to_string(&hours).unwrap();
        assert_eq!(json, r#""7.5""#);
        let back: Hours = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value(), dec!(7.5));
    }
}
