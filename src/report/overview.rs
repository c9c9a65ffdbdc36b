use crate::model::{Hours, MemberSummary, TeamOverview};
use rust_decimal::Decimal;

/// Team-wide totals over the member rows of a summary. The Total row is ignored, so passing the
/// output of `merge_summaries` as is gives the same result as passing the members alone.
pub fn team_overview(summary: &[MemberSummary]) -> TeamOverview {
    let members: Vec<&MemberSummary> = summary.iter().filter(|m| !m.is_total()).collect();

    let billable_hours: Hours = members.iter().map(|m| m.billable_hours).sum();
    let non_billable_hours: Hours = members.iter().map(|m| m.non_billable_hours).sum();
    let utilized_hours = billable_hours + non_billable_hours;
    let capacity_hours: Hours = members.iter().map(|m| m.adjusted_capacity).sum();

    TeamOverview {
        members: members.len(),
        billable_hours,
        non_billable_hours,
        utilized_hours,
        capacity_hours,
        not_utilized_hours: (capacity_hours - utilized_hours).clamp_zero(),
        utilization_percent: utilized_hours
            .percent_of(capacity_hours)
            .unwrap_or(Decimal::ZERO),
    }
}
