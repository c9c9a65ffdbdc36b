use crate::model::{Hours, MemberHours, ProjectBreakdown, TaskBreakdown, TaskRow, TimeEntry};
use std::collections::BTreeMap;

/// Distinct non-blank project names in the order they first appear.
pub fn projects(entries: &[TimeEntry]) -> Vec<String> {
    distinct(entries.iter().map(|e| e.project.as_str()))
}

/// The per-task detail of `project`, or `None` if no entry is logged against it.
///
/// Tasks are listed in the order they first appear, each with every entry logged against it.
/// `total_hours` covers every entry of the project, including those without a task, and is
/// rounded to two places. `hours_per_member` is sorted by name.
pub fn project_breakdown(entries: &[TimeEntry], project: &str) -> Option<ProjectBreakdown> {
    let logged: Vec<&TimeEntry> = entries.iter().filter(|e| e.project == project).collect();
    if logged.is_empty() {
        return None;
    }

    let tasks = distinct(logged.iter().map(|e| e.task.as_str()))
        .into_iter()
        .map(|task| TaskBreakdown {
            rows: logged
                .iter()
                .filter(|e| e.task == task)
                .map(|e| TaskRow {
                    team_member: e.user.clone(),
                    hours: e.hours,
                    billing_type: e.billing_type.clone(),
                    date: e.display_date(),
                })
                .collect(),
            task,
        })
        .collect();

    let mut per_member: BTreeMap<&str, Hours> = BTreeMap::new();
    for entry in logged.iter().filter(|e| !e.user.trim().is_empty()) {
        *per_member.entry(entry.user.as_str()).or_default() += entry.hours;
    }

    Some(ProjectBreakdown {
        project: project.to_string(),
        tasks,
        total_hours: logged.iter().map(|e| e.hours).sum::<Hours>().round(2),
        hours_per_member: per_member
            .into_iter()
            .map(|(name, hours)| MemberHours {
                name: name.to_string(),
                hours,
            })
            .collect(),
    })
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !value.trim().is_empty() && !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
