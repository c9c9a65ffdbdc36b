use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

pub(crate) const BILLABLE_STR: &str = "Billable";
pub(crate) const NON_BILLABLE_STR: &str = "Non Billable";

/// The billing classification of a time entry. Matching is exact: `"billable"` or `"Billable "`
/// are kept as `Other` and do not count toward either sum.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum BillingType {
    Billable,
    NonBillable,
    /// Any other value found in the Billing Type column, kept verbatim.
    Other(String),
}

impl Default for BillingType {
    fn default() -> Self {
        BillingType::Other(String::new())
    }
}

impl BillingType {
    pub fn parse(s: &str) -> Self {
        match s {
            BILLABLE_STR => BillingType::Billable,
            NON_BILLABLE_STR => BillingType::NonBillable,
            other => BillingType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BillingType::Billable => BILLABLE_STR,
            BillingType::NonBillable => NON_BILLABLE_STR,
            BillingType::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for BillingType {
    fn from(value: &str) -> Self {
        BillingType::parse(value)
    }
}

impl Display for BillingType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BillingType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BillingType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(BillingType::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(BillingType::parse("Billable"), BillingType::Billable);
        assert_eq!(BillingType::parse("Non Billable"), BillingType::NonBillable);
        assert_eq!(
            BillingType::parse("Non-Billable"),
            BillingType::Other("Non-Billable".to_string())
        );
        assert_eq!(
            BillingType::parse("billable"),
            BillingType::Other("billable".to_string())
        );
    }

    #[test]
    fn test_display_round_trips_raw_text() {
        assert_eq!(BillingType::parse("Pending").to_string(), "Pending");
        assert_eq!(BillingType::NonBillable.to_string(), "Non Billable");
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&BillingType::NonBillable).unwrap();
        assert_eq!(json, r#""Non Billable""#);
        let other: BillingType = serde_json::from_str(r#""Pending""#).unwrap();
        assert_eq!(other, BillingType::Other("Pending".to_string()));
    }
}
