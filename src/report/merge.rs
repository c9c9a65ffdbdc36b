use crate::config::{CollisionPolicy, Config};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::InputError;
use crate::model::{
    Hours, LeaveRecord, MemberSummary, NameKey, UserHoursSummary, TOTAL_ROW_NAME,
};
use crate::Result;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

/// Joins per-user hours with leave records and appends the "Total" row.
///
/// The join is a left join on `NameKey`: every user of the timesheet appears exactly once, and
/// users without a leave record get `config.default_capacity()` and zero leaves. Utilization is
/// `total / capacity * 100` rounded to two places, or `None` when the capacity is zero.
///
/// The Total row sums hours and capacity over the member rows, and its utilization is the ratio of
/// those sums. It is not the mean of the member utilizations, so people with more capacity weigh
/// more.
///
/// # Errors
/// `InputError::NameCollision` when two timesheet users share a key and the policy is `error`.
pub fn merge_summaries(
    summaries: &[UserHoursSummary],
    leaves: &[LeaveRecord],
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<MemberSummary>> {
    let grouped = group_by_key(summaries, config.collision_policy(), diagnostics)?;
    let lookup = leave_lookup(leaves, diagnostics);

    let mut rows = Vec::with_capacity(grouped.len() + 1);
    for (key, summary) in grouped {
        let (leaves_past_week, capacity, default_capacity) = match lookup.get(&key) {
            Some(record) => (record.leaves_past_week, record.adjusted_capacity, false),
            None => {
                let capacity = config.default_capacity();
                diagnostics.push(Diagnostic::UnmatchedName {
                    name: summary.name.clone(),
                    capacity: capacity.to_string(),
                });
                (Decimal::ZERO, capacity, true)
            }
        };

        let utilization_percent = summary.total_hours.percent_of(capacity);
        if utilization_percent.is_none() {
            diagnostics.push(Diagnostic::ZeroCapacity {
                name: summary.name.clone(),
            });
        }

        rows.push(MemberSummary {
            name: summary.name,
            billable_hours: summary.billable_hours,
            non_billable_hours: summary.non_billable_hours,
            total_hours: summary.total_hours,
            leaves_past_week,
            adjusted_capacity: capacity,
            utilization_percent,
            default_capacity,
            total: false,
        });
    }

    let total = total_row(&rows);
    debug!(
        "Merged {} members, team utilization {:?}",
        rows.len(),
        total.utilization_percent
    );
    rows.push(total);
    Ok(rows)
}

/// The synthetic "Total" row for `members`.
pub(crate) fn total_row(members: &[MemberSummary]) -> MemberSummary {
    let billable_hours: Hours = members.iter().map(|m| m.billable_hours).sum();
    let non_billable_hours: Hours = members.iter().map(|m| m.non_billable_hours).sum();
    let total_hours: Hours = members.iter().map(|m| m.total_hours).sum();
    let adjusted_capacity: Hours = members.iter().map(|m| m.adjusted_capacity).sum();
    MemberSummary {
        name: TOTAL_ROW_NAME.to_string(),
        billable_hours,
        non_billable_hours,
        total_hours,
        leaves_past_week: members.iter().map(|m| m.leaves_past_week).sum(),
        adjusted_capacity,
        utilization_percent: total_hours.percent_of(adjusted_capacity),
        default_capacity: false,
        total: true,
    }
}

/// Collapses users that share a `NameKey`, keeping input order. Under `merge` the hours are summed
/// into the first row seen and keep its display name.
fn group_by_key(
    summaries: &[UserHoursSummary],
    policy: CollisionPolicy,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<(NameKey, UserHoursSummary)>> {
    let mut grouped: Vec<(NameKey, UserHoursSummary)> = Vec::with_capacity(summaries.len());
    let mut positions: HashMap<NameKey, usize> = HashMap::new();
    let mut raw_names: HashMap<NameKey, Vec<String>> = HashMap::new();

    for summary in summaries {
        let key = NameKey::new(&summary.name);
        raw_names
            .entry(key.clone())
            .or_default()
            .push(summary.name.clone());
        match positions.get(&key) {
            Some(&pos) => {
                let merged = &mut grouped[pos].1;
                *merged = UserHoursSummary::new(
                    merged.name.clone(),
                    merged.billable_hours + summary.billable_hours,
                    merged.non_billable_hours + summary.non_billable_hours,
                );
            }
            None => {
                positions.insert(key.clone(), grouped.len());
                grouped.push((key, summary.clone()));
            }
        }
    }

    for (key, _) in &grouped {
        let names = match raw_names.remove(key) {
            Some(names) if names.len() > 1 => names,
            _ => continue,
        };
        match policy {
            CollisionPolicy::Error => {
                return Err(InputError::NameCollision {
                    key: key.to_string(),
                    names,
                }
                .into())
            }
            CollisionPolicy::Merge => diagnostics.push(Diagnostic::NameCollision {
                key: key.to_string(),
                resolution: format!("hours merged under '{}'", names[0]),
                names,
            }),
        }
    }

    Ok(grouped)
}

/// Indexes leave records by key. When two records share a key the later one wins, the same way a
/// later survey submission replaces an earlier one.
fn leave_lookup<'a>(
    leaves: &'a [LeaveRecord],
    diagnostics: &mut Diagnostics,
) -> HashMap<NameKey, &'a LeaveRecord> {
    let mut lookup: HashMap<NameKey, &LeaveRecord> = HashMap::new();
    let mut collisions: Vec<(NameKey, Vec<String>)> = Vec::new();
    for record in leaves {
        let key = NameKey::new(&record.name);
        if let Some(previous) = lookup.insert(key.clone(), record) {
            match collisions.iter_mut().find(|(k, _)| *k == key) {
                Some((_, names)) => names.push(record.name.clone()),
                None => collisions.push((key, vec![previous.name.clone(), record.name.clone()])),
            }
        }
    }
    for (key, names) in collisions {
        let last = names.last().cloned().unwrap_or_default();
        diagnostics.push(Diagnostic::NameCollision {
            key: key.to_string(),
            names,
            resolution: format!("leave record of '{last}' used"),
        });
    }
    lookup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::capacity::leave_record;
    use rust_decimal_macros::dec;

    fn hours(name: &str, billable: Decimal, non_billable: Decimal) -> UserHoursSummary {
        UserHoursSummary::new(name, Hours::new(billable), Hours::new(non_billable))
    }

    fn leave(name: &str, leaves: Decimal) -> LeaveRecord {
        leave_record(name.to_string(), leaves, &Config::default())
    }

    #[test]
    fn test_alice_and_bob_scenario() {
        let summaries = vec![
            hours("Alice", dec!(10), dec!(5)),
            hours("Bob", dec!(8), dec!(0)),
        ];
        let leaves = vec![leave("Alice", dec!(0))];
        let mut diagnostics = Diagnostics::new();
        let rows = merge_summaries(&summaries, &leaves, &Config::default(), &mut diagnostics).unwrap();

        assert_eq!(rows.len(), 3);
        let alice = &rows[0];
        assert_eq!(alice.total_hours, Hours::new(dec!(15)));
        assert_eq!(alice.adjusted_capacity, Hours::new(dec!(45)));
        assert_eq!(alice.utilization_percent, Some(dec!(33.33)));
        assert!(!alice.default_capacity);

        let bob = &rows[1];
        assert_eq!(bob.billable_hours, Hours::new(dec!(8)));
        assert_eq!(bob.non_billable_hours, Hours::ZERO);
        assert_eq!(bob.adjusted_capacity, Hours::new(dec!(45)));
        assert_eq!(bob.utilization_percent, Some(dec!(17.78)));
        assert!(bob.default_capacity);

        let total = &rows[2];
        assert!(total.is_total());
        assert_eq!(total.total_hours, Hours::new(dec!(23)));
        assert_eq!(total.adjusted_capacity, Hours::new(dec!(90)));
        assert_eq!(total.utilization_percent, Some(dec!(25.56)));

        assert_eq!(
            diagnostics.iter().next(),
            Some(&Diagnostic::UnmatchedName {
                name: "Bob".to_string(),
                capacity: "45.00".to_string(),
            })
        );
    }

    #[test]
    fn test_join_ignores_case_and_whitespace() {
        let summaries = vec![hours("Jane Doe ", dec!(9), dec!(0))];
        let leaves = vec![leave("jane doe", dec!(1))];
        let rows = merge_summaries(&summaries, &leaves, &Config::default(), &mut Diagnostics::new()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Jane Doe ");
        assert_eq!(rows[0].adjusted_capacity, Hours::new(dec!(36)));
        assert_eq!(rows[0].leaves_past_week, dec!(1));
    }

    #[test]
    fn test_every_user_survives_the_join() {
        let summaries = vec![
            hours("A", dec!(1), dec!(0)),
            hours("B", dec!(1), dec!(0)),
            hours("C", dec!(1), dec!(0)),
        ];
        let leaves = vec![leave("B", dec!(0)), leave("Z", dec!(2))];
        let rows = merge_summaries(&summaries, &leaves, &Config::default(), &mut Diagnostics::new()).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "Total"]);
    }

    #[test]
    fn test_total_is_weighted_not_mean() {
        let summaries = vec![
            hours("Alice", dec!(45), dec!(0)),
            hours("Bob", dec!(9), dec!(0)),
        ];
        let leaves = vec![leave("Alice", dec!(0)), leave("Bob", dec!(3))];
        let rows = merge_summaries(&summaries, &leaves, &Config::default(), &mut Diagnostics::new()).unwrap();
        assert_eq!(rows[0].utilization_percent, Some(dec!(100)));
        assert_eq!(rows[1].utilization_percent, Some(dec!(50)));

        let total = &rows[2];
        // (45 + 9) / (45 + 18) * 100
        assert_eq!(total.utilization_percent, Some(dec!(85.71)));
        let mean = (dec!(100) + dec!(50)) / dec!(2);
        assert_ne!(total.utilization_percent, Some(mean));

        let member_total: Hours = rows[..2].iter().map(|r| r.total_hours).sum();
        assert_eq!(total.total_hours, member_total);
    }

    #[test]
    fn test_zero_capacity_is_undefined_not_a_crash() {
        let summaries = vec![hours("Alice", dec!(3), dec!(0))];
        let leaves = vec![leave("Alice", dec!(5))];
        let mut diagnostics = Diagnostics::new();
        let rows = merge_summaries(&summaries, &leaves, &Config::default(), &mut diagnostics).unwrap();
        assert_eq!(rows[0].adjusted_capacity, Hours::ZERO);
        assert_eq!(rows[0].utilization_percent, None);
        assert_eq!(rows[1].utilization_percent, None);
        assert!(diagnostics.iter().any(|d| matches!(
            d,
            Diagnostic::ZeroCapacity { name } if name == "Alice"
        )));
    }

    #[test]
    fn test_collision_merge_policy() {
        let summaries = vec![
            hours("Jane Doe", dec!(4), dec!(0)),
            hours("jane doe", dec!(1), dec!(2)),
        ];
        let mut diagnostics = Diagnostics::new();
        let rows = merge_summaries(&summaries, &[], &Config::default(), &mut diagnostics).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Jane Doe");
        assert_eq!(rows[0].billable_hours, Hours::new(dec!(5)));
        assert_eq!(rows[0].total_hours, Hours::new(dec!(7)));
        assert!(diagnostics.iter().any(|d| matches!(
            d,
            Diagnostic::NameCollision { names, .. } if names.len() == 2
        )));
    }

    #[test]
    fn test_collision_error_policy() {
        let summaries = vec![
            hours("Jane Doe", dec!(4), dec!(0)),
            hours("jane doe", dec!(1), dec!(2)),
        ];
        let config = Config::default().with_collision_policy(CollisionPolicy::Error);
        let err = merge_summaries(&summaries, &[], &config, &mut Diagnostics::new()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InputError>(),
            Some(&InputError::NameCollision {
                key: "jane doe".to_string(),
                names: vec!["Jane Doe".to_string(), "jane doe".to_string()],
            })
        );
    }

    #[test]
    fn test_leave_side_collision_uses_later_record() {
        let summaries = vec![hours("Sam", dec!(9), dec!(0))];
        let leaves = vec![leave("Sam", dec!(0)), leave("sam ", dec!(1))];
        let mut diagnostics = Diagnostics::new();
        let rows = merge_summaries(&summaries, &leaves, &Config::default(), &mut diagnostics).unwrap();
        assert_eq!(rows[0].adjusted_capacity, Hours::new(dec!(36)));
        assert!(diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::NameCollision { .. })));
    }

    #[test]
    fn test_configured_default_capacity() {
        let summaries = vec![hours("Alice", dec!(10), dec!(0)), hours("Bob", dec!(10), dec!(0))];
        let leaves = vec![leave("Alice", dec!(0))];
        let config = Config::default().with_default_capacity(dec!(40));
        let mut diagnostics = Diagnostics::new();
        let rows = merge_summaries(&summaries, &leaves, &config, &mut diagnostics).unwrap();

        assert_eq!(rows[0].adjusted_capacity, Hours::new(dec!(45)));
        assert!(!rows[0].default_capacity);
        assert_eq!(rows[1].adjusted_capacity, Hours::new(dec!(40)));
        assert_eq!(rows[1].utilization_percent, Some(dec!(25)));
        assert!(rows[1].default_capacity);
        assert_eq!(rows[2].adjusted_capacity, Hours::new(dec!(85)));
        assert_eq!(
            diagnostics.iter().next(),
            Some(&Diagnostic::UnmatchedName {
                name: "Bob".to_string(),
                capacity: "40.00".to_string(),
            })
        );
    }

    #[test]
    fn test_member_named_total_is_a_member() {
        let summaries = vec![hours("Total", dec!(9), dec!(0)), hours("Ann", dec!(9), dec!(0))];
        let rows = merge_summaries(&summaries, &[], &Config::default(), &mut Diagnostics::new()).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(!rows[0].is_total());
        assert_eq!(rows[0].name, TOTAL_ROW_NAME);
        assert!(rows[2].is_total());
        assert_eq!(rows[2].total_hours, Hours::new(dec!(18)));
    }

    #[test]
    fn test_empty_timesheet_has_only_total() {
        let rows = merge_summaries(&[], &[], &Config::default(), &mut Diagnostics::new()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_total());
        assert_eq!(rows[0].utilization_percent, None);
    }
}
