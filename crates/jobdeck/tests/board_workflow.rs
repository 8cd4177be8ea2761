//! End-to-end scenarios for the board service driven against an in-memory
//! automation backend, exercised through the public facade only.

mod common {
    use std::collections::BTreeMap;
    use std::future::Future;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, TimeZone, Utc};

    use jobdeck::board::{
        Application, ApplicationGateway, ApplicationId, ApplicationStatus, AutomationState,
        BoardService, BoardSnapshot, FetchError, JobPosting, MissingField, SubmitError,
        UpdateError,
    };

    pub fn timestamp(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    pub fn application(
        id: i64,
        company: &str,
        title: &str,
        status: ApplicationStatus,
        created_at: DateTime<Utc>,
    ) -> Application {
        Application {
            id: ApplicationId(id),
            status,
            created_at,
            job_posting: JobPosting {
                company_name: company.to_string(),
                title: title.to_string(),
                location: None,
                url: None,
            },
            automation_state: None,
        }
    }

    pub fn two_application_board() -> Vec<Application> {
        vec![
            application(
                1,
                "Initech",
                "Software Engineer",
                ApplicationStatus::Applied,
                timestamp(2, 9),
            ),
            application(
                2,
                "Hooli",
                "Platform Engineer",
                ApplicationStatus::Rejected,
                timestamp(1, 14),
            ),
        ]
    }

    pub fn awaiting_input_board() -> Vec<Application> {
        let mut record = application(
            3,
            "Pied Piper",
            "Compression Engineer",
            ApplicationStatus::UserInputNeeded,
            timestamp(3, 11),
        );
        record.automation_state = Some(AutomationState {
            missing_fields: vec![
                MissingField {
                    key: "visa_status".to_string(),
                    label: Some("Visa status".to_string()),
                },
                MissingField {
                    key: "salary_expectation".to_string(),
                    label: Some("Salary expectation".to_string()),
                },
            ],
            filled_fields: BTreeMap::new(),
        });
        vec![record]
    }

    /// In-memory stand-in for the automation backend: the status update
    /// mutates its records, and a field submission resumes the automation
    /// run.
    pub struct InMemoryAutomationGateway {
        records: Mutex<Vec<Application>>,
        fail_updates: AtomicBool,
    }

    impl InMemoryAutomationGateway {
        pub fn with_records(records: Vec<Application>) -> Self {
            Self {
                records: Mutex::new(records),
                fail_updates: AtomicBool::new(false),
            }
        }

        pub fn fail_updates(&self, fail: bool) {
            self.fail_updates.store(fail, Ordering::Relaxed);
        }
    }

    impl ApplicationGateway for InMemoryAutomationGateway {
        fn list_applications(
            &self,
        ) -> impl Future<Output = Result<Vec<Application>, FetchError>> + Send {
            let records = self.records.lock().expect("records mutex poisoned").clone();
            async move { Ok(records) }
        }

        fn update_status(
            &self,
            id: ApplicationId,
            status: ApplicationStatus,
        ) -> impl Future<Output = Result<Application, UpdateError>> + Send {
            let result = if self.fail_updates.load(Ordering::Relaxed) {
                Err(UpdateError::Transport("injected failure".to_string()))
            } else {
                let mut records = self.records.lock().expect("records mutex poisoned");
                match records.iter_mut().find(|record| record.id == id) {
                    Some(record) => {
                        record.status = status;
                        Ok(record.clone())
                    }
                    None => Err(UpdateError::Rejected(format!("unknown application {id}"))),
                }
            };
            async move { result }
        }

        fn submit_fields(
            &self,
            id: ApplicationId,
            values: BTreeMap<String, String>,
        ) -> impl Future<Output = Result<(), SubmitError>> + Send {
            let mut records = self.records.lock().expect("records mutex poisoned");
            let result = match records.iter_mut().find(|record| record.id == id) {
                Some(record) if record.status == ApplicationStatus::UserInputNeeded => {
                    if let Some(state) = record.automation_state.as_mut() {
                        state.filled_fields.extend(values);
                        state.missing_fields.clear();
                    }
                    // The backend resumes the automation run with the
                    // provided values.
                    record.status = ApplicationStatus::PendingAutomation;
                    Ok(())
                }
                Some(_) => Err(SubmitError::Rejected(
                    "application is not waiting on input".to_string(),
                )),
                None => Err(SubmitError::Rejected(format!("unknown application {id}"))),
            };
            async move { result }
        }
    }

    pub async fn loaded_service(
        records: Vec<Application>,
    ) -> (
        Arc<BoardService<InMemoryAutomationGateway>>,
        Arc<InMemoryAutomationGateway>,
    ) {
        let gateway = Arc::new(InMemoryAutomationGateway::with_records(records));
        let service = Arc::new(BoardService::new(gateway.clone()));
        service.load().await.expect("initial load succeeds");
        (service, gateway)
    }

    pub fn column_ids(snapshot: &BoardSnapshot, column_id: &str) -> Vec<i64> {
        snapshot
            .columns
            .iter()
            .find(|column| column.id == column_id)
            .expect("column exists")
            .applications
            .iter()
            .map(|card| card.id.0)
            .collect()
    }
}

use std::collections::BTreeMap;

use common::*;
use jobdeck::board::{
    ApplicationId, ApplicationStatus, DragRequest, FieldSubmissionResolution, MoveResolution,
};

fn drag(id: i64, source: &str, target: &str) -> DragRequest {
    DragRequest {
        application_id: ApplicationId(id),
        source_column: source.to_string(),
        target_column: target.to_string(),
        source_index: 0,
        target_index: 0,
    }
}

#[tokio::test]
async fn loaded_applications_bucket_into_their_columns() {
    let (service, _gateway) = loaded_service(two_application_board()).await;
    let snapshot = service.snapshot();

    assert_eq!(column_ids(&snapshot, "applied"), vec![1]);
    assert_eq!(column_ids(&snapshot, "rejected"), vec![2]);
    for empty in ["pending", "needs_input", "interview", "other"] {
        assert!(column_ids(&snapshot, empty).is_empty());
    }
}

#[tokio::test]
async fn successful_drag_commits_and_survives_a_reload() {
    let (service, _gateway) = loaded_service(two_application_board()).await;

    let resolution = service.move_via_drag(drag(1, "applied", "rejected")).await;
    assert_eq!(
        resolution,
        MoveResolution::Committed(ApplicationStatus::Rejected)
    );

    let after_move = service.snapshot();
    assert_eq!(column_ids(&after_move, "rejected"), vec![1, 2]);
    assert!(column_ids(&after_move, "applied").is_empty());

    // The backend now agrees, so a reload changes nothing.
    let after_reload = service.load().await.expect("reload succeeds");
    assert_eq!(after_reload, after_move);
}

#[tokio::test]
async fn failed_drag_returns_the_card_to_its_column() {
    let (service, gateway) = loaded_service(two_application_board()).await;
    gateway.fail_updates(true);

    let resolution = service.move_via_drag(drag(1, "applied", "rejected")).await;
    assert!(matches!(resolution, MoveResolution::Reverted(_)));

    let snapshot = service.snapshot();
    assert_eq!(column_ids(&snapshot, "applied"), vec![1]);
    assert_eq!(column_ids(&snapshot, "rejected"), vec![2]);
}

#[tokio::test]
async fn field_submission_moves_the_application_out_of_needs_input() {
    let (service, _gateway) = loaded_service(awaiting_input_board()).await;
    assert_eq!(column_ids(&service.snapshot(), "needs_input"), vec![3]);

    // Incomplete values are dropped locally.
    let resolution = service
        .provide_missing_fields(
            ApplicationId(3),
            BTreeMap::from([("visa_status".to_string(), "citizen".to_string())]),
        )
        .await;
    assert!(matches!(
        resolution,
        FieldSubmissionResolution::Skipped(_)
    ));
    assert_eq!(column_ids(&service.snapshot(), "needs_input"), vec![3]);

    // The complete set submits and the reload surfaces the backend-driven
    // transition.
    let resolution = service
        .provide_missing_fields(
            ApplicationId(3),
            BTreeMap::from([("salary_expectation".to_string(), "95000".to_string())]),
        )
        .await;
    assert_eq!(resolution, FieldSubmissionResolution::Submitted);

    let snapshot = service.snapshot();
    assert!(column_ids(&snapshot, "needs_input").is_empty());
    assert_eq!(column_ids(&snapshot, "pending"), vec![3]);
}
