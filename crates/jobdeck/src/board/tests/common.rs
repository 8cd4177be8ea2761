use std::collections::{BTreeMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::board::columns::BoardColumn;
use crate::board::controller::{BoardController, DragRequest};
use crate::board::domain::{
    Application, ApplicationId, ApplicationStatus, AutomationState, JobPosting, MissingField,
};
use crate::board::gateway::{ApplicationGateway, FetchError, SubmitError, UpdateError};
use crate::board::service::BoardService;

pub(super) fn timestamp(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn application(
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

pub(super) fn awaiting_input(id: i64, company: &str, keys: &[&str]) -> Application {
    let mut application = application(
        id,
        company,
        "Software Engineer",
        ApplicationStatus::UserInputNeeded,
        timestamp(1, 9),
    );
    application.automation_state = Some(AutomationState {
        missing_fields: keys
            .iter()
            .map(|key| MissingField {
                key: key.to_string(),
                label: None,
            })
            .collect(),
        filled_fields: BTreeMap::new(),
    });
    application
}

pub(super) fn sample_board() -> Vec<Application> {
    vec![
        application(
            1,
            "Acme Analytics",
            "Data Engineer",
            ApplicationStatus::Applied,
            timestamp(3, 9),
        ),
        application(
            2,
            "Borealis Systems",
            "Backend Engineer",
            ApplicationStatus::Rejected,
            timestamp(1, 12),
        ),
        application(
            3,
            "Cobalt Works",
            "Platform Engineer",
            ApplicationStatus::PendingAutomation,
            timestamp(5, 8),
        ),
        application(
            4,
            "Drift Labs",
            "Rust Engineer",
            ApplicationStatus::InterviewInvited,
            timestamp(2, 10),
        ),
        awaiting_input(5, "Ember Health", &["visa_status", "salary_expectation"]),
        application(
            6,
            "Acme Analytics",
            "Senior Data Engineer",
            ApplicationStatus::EmailConfirmationReceived,
            timestamp(4, 16),
        ),
    ]
}

pub(super) fn drag(id: i64, source: &str, target: &str) -> DragRequest {
    DragRequest {
        application_id: ApplicationId(id),
        source_column: source.to_string(),
        target_column: target.to_string(),
        source_index: 0,
        target_index: 0,
    }
}

pub(super) fn column<'a>(columns: &'a [BoardColumn], id: &str) -> &'a BoardColumn {
    columns
        .iter()
        .find(|column| column.spec.id == id)
        .expect("column exists")
}

pub(super) fn card_ids(column: &BoardColumn) -> Vec<i64> {
    column
        .applications
        .iter()
        .map(|application| application.id.0)
        .collect()
}

pub(super) fn loaded_controller(applications: Vec<Application>) -> BoardController {
    let mut controller = BoardController::new();
    assert!(controller.begin_load());
    controller
        .finish_load(Ok(applications))
        .expect("load succeeds");
    controller
}

pub(super) async fn loaded_service(
    applications: Vec<Application>,
) -> (Arc<BoardService<StubGateway>>, Arc<StubGateway>) {
    let gateway = Arc::new(StubGateway::default());
    gateway.queue_list(Ok(applications));
    let service = Arc::new(BoardService::new(gateway.clone()));
    service.load().await.expect("initial load succeeds");
    (service, gateway)
}

/// Scripted gateway: queues of canned responses plus a call journal.
#[derive(Default)]
pub(super) struct StubGateway {
    list_responses: Mutex<VecDeque<Result<Vec<Application>, FetchError>>>,
    update_responses: Mutex<VecDeque<Result<Application, UpdateError>>>,
    submit_responses: Mutex<VecDeque<Result<(), SubmitError>>>,
    update_calls: Mutex<Vec<(ApplicationId, ApplicationStatus)>>,
    submit_calls: Mutex<Vec<(ApplicationId, BTreeMap<String, String>)>>,
}

impl StubGateway {
    pub(super) fn queue_list(&self, response: Result<Vec<Application>, FetchError>) {
        self.list_responses
            .lock()
            .expect("stub mutex poisoned")
            .push_back(response);
    }

    pub(super) fn queue_update(&self, response: Result<Application, UpdateError>) {
        self.update_responses
            .lock()
            .expect("stub mutex poisoned")
            .push_back(response);
    }

    pub(super) fn queue_submit(&self, response: Result<(), SubmitError>) {
        self.submit_responses
            .lock()
            .expect("stub mutex poisoned")
            .push_back(response);
    }

    pub(super) fn update_calls(&self) -> Vec<(ApplicationId, ApplicationStatus)> {
        self.update_calls.lock().expect("stub mutex poisoned").clone()
    }

    pub(super) fn submit_calls(&self) -> Vec<(ApplicationId, BTreeMap<String, String>)> {
        self.submit_calls.lock().expect("stub mutex poisoned").clone()
    }
}

impl ApplicationGateway for StubGateway {
    fn list_applications(
        &self,
    ) -> impl Future<Output = Result<Vec<Application>, FetchError>> + Send {
        let response = self
            .list_responses
            .lock()
            .expect("stub mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(FetchError::Transport(
                    "no scripted list response".to_string(),
                ))
            });
        async move { response }
    }

    fn update_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> impl Future<Output = Result<Application, UpdateError>> + Send {
        self.update_calls
            .lock()
            .expect("stub mutex poisoned")
            .push((id, status));
        let response = self
            .update_responses
            .lock()
            .expect("stub mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(UpdateError::Transport(
                    "no scripted update response".to_string(),
                ))
            });
        async move { response }
    }

    fn submit_fields(
        &self,
        id: ApplicationId,
        values: BTreeMap<String, String>,
    ) -> impl Future<Output = Result<(), SubmitError>> + Send {
        self.submit_calls
            .lock()
            .expect("stub mutex poisoned")
            .push((id, values));
        let response = self
            .submit_responses
            .lock()
            .expect("stub mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(SubmitError::Transport(
                    "no scripted submit response".to_string(),
                ))
            });
        async move { response }
    }
}
