use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::{BillingType, Hours, TimeEntry, UserHoursSummary};
use std::collections::BTreeMap;
use tracing::debug;

/// Sums billable and non-billable hours per user.
///
/// Users are grouped on their exact name and returned in name order. Entries whose billing type is
/// neither "Billable" nor "Non Billable" are left out of both sums, and entries without a user are
/// left out entirely; both are reported in `diagnostics`.
pub fn aggregate_hours(entries: &[TimeEntry], diagnostics: &mut Diagnostics) -> Vec<UserHoursSummary> {
    let mut sums: BTreeMap<&str, (Hours, Hours)> = BTreeMap::new();

    for entry in entries {
        let (billable, non_billable) = match &entry.billing_type {
            BillingType::Billable => (entry.hours, Hours::ZERO),
            BillingType::NonBillable => (Hours::ZERO, entry.hours),
            BillingType::Other(value) => {
                diagnostics.push(Diagnostic::UnknownBillingType {
                    row: entry.row,
                    value: value.clone(),
                });
                continue;
            }
        };
        if entry.user.trim().is_empty() {
            diagnostics.push(Diagnostic::MissingUser { row: entry.row });
            continue;
        }
        let sum = sums.entry(entry.user.as_str()).or_default();
        sum.0 += billable;
        sum.1 += non_billable;
    }

    debug!("Aggregated hours for {} users", sums.len());
    sums.into_iter()
        .map(|(name, (billable, non_billable))| {
            UserHoursSummary::new(name, billable, non_billable)
        })
        .collect()
}
