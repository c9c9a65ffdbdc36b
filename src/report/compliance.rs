use crate::config::Config;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::{ComplianceBucket, Response};
use crate::report::{dedup_keep_last, Submission, NAME_STR};
use crate::workbook::{Cell, Table};
use crate::Result;
use tracing::debug;

const YES_STR: &str = "yes";

/// Buckets the respondents of each configured yes/no question into a Yes and a No group.
///
/// Rows without a name are ignored and repeated names keep only their last submission. An answer
/// counts as Yes only when it reads "yes" after trimming, ignoring case; anything else, including
/// an empty cell, is No. Each question yields its Yes bucket followed by its No bucket, and a bucket
/// nobody falls into is left out. The counts of a question always add up to the number of
/// respondents.
///
/// A question whose column is missing is skipped and reported as a `MissingQuestion`.
///
/// # Errors
/// `InputError::MissingColumn` if the sheet has no Name column.
pub fn summarize_compliance(
    table: &Table,
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<ComplianceBucket>> {
    let name_ix = table.require(NAME_STR)?;

    let mut submissions = Vec::new();
    for (ix, row) in table.rows().iter().enumerate() {
        let name = table.cell(row, name_ix);
        if name.is_blank() {
            continue;
        }
        submissions.push(Submission {
            name: name.to_string(),
            row: table.sheet_row(ix),
            value: row.as_slice(),
        });
    }
    let respondents = dedup_keep_last(table.sheet(), submissions, diagnostics);

    let mut buckets = Vec::with_capacity(config.compliance_questions().len() * 2);
    for question in config.compliance_questions() {
        let Some(col) = table.column(&question.column) else {
            diagnostics.push(Diagnostic::MissingQuestion {
                question: question.column.clone(),
            });
            continue;
        };

        let mut yes = Vec::new();
        let mut no = Vec::new();
        for respondent in &respondents {
            match answer(table.cell(respondent.value, col)) {
                Response::Yes => yes.push(respondent.name.clone()),
                Response::No => no.push(respondent.name.clone()),
            }
        }
        debug!(
            "'{}': {} yes, {} no",
            question.title,
            yes.len(),
            no.len()
        );

        for (response, names) in [(Response::Yes, yes), (Response::No, no)] {
            if names.is_empty() {
                continue;
            }
            buckets.push(ComplianceBucket {
                question: question.column.clone(),
                title: question.title.clone(),
                response,
                count: names.len(),
                names,
            });
        }
    }
    Ok(buckets)
}

fn answer(cell: &Cell) -> Response {
    if cell.to_string().trim().eq_ignore_ascii_case(YES_STR) {
        Response::Yes
    } else {
        Response::No
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComplianceQuestion;
    use crate::error::InputError;

    const QUESTION: &str = "Is your timesheet submitted?";

    fn survey(csv: &str) -> Table {
        crate::test::table("Week 1", csv)
    }

    fn one_question() -> Config {
        Config::default().with_compliance_questions(vec![ComplianceQuestion::new(
            QUESTION,
            "Timesheet Submission",
        )])
    }

    #[test]
    fn test_yes_and_no_buckets() {
        let table = survey(
            "Name,Is your timesheet submitted?\n\
             A,Yes\n\
             B, no \n\
             C,\n",
        );
        let buckets = summarize_compliance(&table, &one_question(), &mut Diagnostics::new()).unwrap();
        assert_eq!(buckets.len(), 2);

        assert_eq!(buckets[0].response, Response::Yes);
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[0].names, vec!["A"]);
        assert_eq!(buckets[0].title, "Timesheet Submission");

        assert_eq!(buckets[1].response, Response::No);
        assert_eq!(buckets[1].count, 2);
        assert_eq!(buckets[1].names, vec!["B", "C"]);
    }

    #[test]
    fn test_yes_ignores_case_and_padding() {
        let table = survey(
            "Name,Is your timesheet submitted?\n\
             A, YES \n\
             B,yes\n\
             C,Yes please\n",
        );
        let buckets = summarize_compliance(&table, &one_question(), &mut Diagnostics::new()).unwrap();
        assert_eq!(buckets[0].names, vec!["A", "B"]);
        assert_eq!(buckets[1].names, vec!["C"]);
    }

    #[test]
    fn test_counts_partition_respondents() {
        let table = survey(
            "Name,Is your timesheet submitted?\n\
             A,Yes\n\
             ,Yes\n\
             B,No\n\
             A,No\n",
        );
        let mut diagnostics = Diagnostics::new();
        let buckets = summarize_compliance(&table, &one_question(), &mut diagnostics).unwrap();
        // The nameless row is dropped and A keeps its last answer.
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].response, Response::No);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[0].names, vec!["B", "A"]);
        assert!(matches!(
            diagnostics.iter().next(),
            Some(Diagnostic::DuplicateSubmission { .. })
        ));
    }

    #[test]
    fn test_default_questions_in_order() {
        let table = survey(
            "Name,Is your timesheet submitted?,All tasks access requested for and created?,\
             All checkin and checkout times accurate for the week? Regularized where inaccurate?\n\
             A,Yes,No,Yes\n\
             B,Yes,Yes,Yes\n",
        );
        let buckets = summarize_compliance(&table, &Config::default(), &mut Diagnostics::new()).unwrap();
        let titles: Vec<(&str, Response)> = buckets
            .iter()
            .map(|b| (b.title.as_str(), b.response))
            .collect();
        assert_eq!(
            titles,
            vec![
                ("Timesheet Submission", Response::Yes),
                ("Task Access Requested", Response::Yes),
                ("Task Access Requested", Response::No),
                ("Check-in/Checkout Accuracy", Response::Yes),
            ]
        );
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[1].names, vec!["B"]);
        assert_eq!(buckets[2].names, vec!["A"]);
    }

    #[test]
    fn test_missing_question_is_skipped() {
        let table = survey("Name,Something else\nA,Yes\n");
        let mut diagnostics = Diagnostics::new();
        let buckets = summarize_compliance(&table, &one_question(), &mut diagnostics).unwrap();
        assert!(buckets.is_empty());
        assert_eq!(
            diagnostics.iter().next(),
            Some(&Diagnostic::MissingQuestion {
                question: QUESTION.to_string()
            })
        );
    }

    #[test]
    fn test_missing_name_column() {
        let table = survey("Respondent,Is your timesheet submitted?\nA,Yes\n");
        let err = summarize_compliance(&table, &one_question(), &mut Diagnostics::new()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InputError>(),
            Some(&InputError::missing_column("Week 1", "Name"))
        );
    }
}
