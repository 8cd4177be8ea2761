use std::collections::BTreeMap;

use super::common::*;
use crate::board::controller::FieldsRejected;
use crate::board::domain::{ApplicationId, MissingField};
use crate::board::fields::FieldDraft;
use crate::board::gateway::SubmitError;

fn missing(keys: &[&str]) -> Vec<MissingField> {
    keys.iter()
        .map(|key| MissingField {
            key: key.to_string(),
            label: None,
        })
        .collect()
}

fn staged(values: &[(&str, &str)]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn draft_treats_blank_values_as_missing() {
    let required = missing(&["visa_status", "salary_expectation"]);
    let mut draft = FieldDraft::default();

    draft.stage("visa_status", "citizen");
    draft.stage("salary_expectation", "   ");
    assert!(!draft.is_complete(&required));
    assert_eq!(
        draft.incomplete_keys(&required),
        vec!["salary_expectation".to_string()]
    );

    draft.stage("salary_expectation", "95000");
    assert!(draft.is_complete(&required));
    assert!(draft.incomplete_keys(&required).is_empty());
}

#[test]
fn submission_carries_one_entry_per_missing_field() {
    let required = missing(&["visa_status"]);
    let mut draft = FieldDraft::seeded(&BTreeMap::from([(
        "portfolio_url".to_string(),
        "https://example.dev".to_string(),
    )]));
    draft.stage("visa_status", "citizen");

    let submission = draft.submission(&required);
    assert_eq!(submission.len(), 1);
    assert_eq!(submission.get("visa_status").map(String::as_str), Some("citizen"));
}

#[test]
fn incomplete_draft_is_rejected_before_any_request() {
    let mut controller = loaded_controller(sample_board());
    controller
        .stage_fields(
            ApplicationId(5),
            staged(&[("visa_status", "citizen")]),
        )
        .expect("staging accepted");

    let rejection = controller
        .begin_field_submission(ApplicationId(5))
        .unwrap_err();
    assert_eq!(
        rejection,
        FieldsRejected::Incomplete {
            missing_keys: vec!["salary_expectation".to_string()],
        }
    );
}

#[test]
fn complete_draft_produces_exactly_one_ticket() {
    let mut controller = loaded_controller(sample_board());
    controller
        .stage_fields(
            ApplicationId(5),
            staged(&[("visa_status", "citizen"), ("salary_expectation", "95000")]),
        )
        .expect("staging accepted");

    let ticket = controller
        .begin_field_submission(ApplicationId(5))
        .expect("submission accepted");
    assert_eq!(ticket.values.len(), 2);
    assert_eq!(ticket.values.get("visa_status").map(String::as_str), Some("citizen"));

    // The submitting flag gates the duplicate.
    let rejection = controller
        .begin_field_submission(ApplicationId(5))
        .unwrap_err();
    assert_eq!(rejection, FieldsRejected::SubmissionInFlight(ApplicationId(5)));
}

#[test]
fn settle_success_clears_the_draft() {
    let mut controller = loaded_controller(sample_board());
    controller
        .stage_fields(
            ApplicationId(5),
            staged(&[("visa_status", "citizen"), ("salary_expectation", "95000")]),
        )
        .expect("staging accepted");
    controller
        .begin_field_submission(ApplicationId(5))
        .expect("submission accepted");

    controller
        .settle_field_submission(ApplicationId(5), Ok(()))
        .expect("settle succeeds");

    let rejection = controller
        .begin_field_submission(ApplicationId(5))
        .unwrap_err();
    assert!(matches!(rejection, FieldsRejected::Incomplete { .. }));
}

#[test]
fn settle_failure_keeps_the_draft_for_retry() {
    let mut controller = loaded_controller(sample_board());
    controller
        .stage_fields(
            ApplicationId(5),
            staged(&[("visa_status", "citizen"), ("salary_expectation", "95000")]),
        )
        .expect("staging accepted");
    controller
        .begin_field_submission(ApplicationId(5))
        .expect("submission accepted");

    let error = controller
        .settle_field_submission(
            ApplicationId(5),
            Err(SubmitError::Transport("connection reset".to_string())),
        )
        .unwrap_err();
    assert!(matches!(error, SubmitError::Transport(_)));

    // The retry needs no re-typing.
    let ticket = controller
        .begin_field_submission(ApplicationId(5))
        .expect("retry accepted");
    assert_eq!(ticket.values.len(), 2);
}

#[test]
fn drafts_seed_from_already_filled_fields() {
    let mut board = sample_board();
    let automation_state = board
        .iter_mut()
        .find(|application| application.id == ApplicationId(5))
        .and_then(|application| application.automation_state.as_mut())
        .expect("automation state present");
    automation_state
        .filled_fields
        .insert("salary_expectation".to_string(), "95000".to_string());

    let mut controller = loaded_controller(board);
    controller
        .stage_fields(ApplicationId(5), staged(&[("visa_status", "citizen")]))
        .expect("staging accepted");

    let ticket = controller
        .begin_field_submission(ApplicationId(5))
        .expect("seeded draft completes the set");
    assert_eq!(
        ticket.values.get("salary_expectation").map(String::as_str),
        Some("95000")
    );
}

#[test]
fn submissions_require_the_awaiting_input_status() {
    let mut controller = loaded_controller(sample_board());
    controller
        .stage_fields(ApplicationId(1), staged(&[("visa_status", "citizen")]))
        .expect("staging alone is allowed");

    let rejection = controller
        .begin_field_submission(ApplicationId(1))
        .unwrap_err();
    assert_eq!(rejection, FieldsRejected::NotAwaitingInput(ApplicationId(1)));
}

#[test]
fn unknown_applications_cannot_stage_fields() {
    let mut controller = loaded_controller(sample_board());
    let rejection = controller
        .stage_fields(ApplicationId(99), staged(&[("visa_status", "citizen")]))
        .unwrap_err();
    assert_eq!(rejection, FieldsRejected::UnknownApplication(ApplicationId(99)));
}
