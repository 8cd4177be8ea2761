use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;

use jobdeck::board::{
    Application, ApplicationGateway, ApplicationId, ApplicationStatus, AutomationState,
    FetchError, JobPosting, MissingField, SubmitError, UpdateError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory automation backend used for demos, local development, and
/// tests. Status updates mutate its records; a field submission resumes the
/// automation run.
#[derive(Default)]
pub(crate) struct InMemoryAutomationGateway {
    records: Mutex<Vec<Application>>,
}

impl InMemoryAutomationGateway {
    pub(crate) fn with_records(records: Vec<Application>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub(crate) fn seeded() -> Self {
        Self::with_records(sample_applications())
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
        let mut records = self.records.lock().expect("records mutex poisoned");
        let result = match records.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                record.status = status;
                Ok(record.clone())
            }
            None => Err(UpdateError::Rejected(format!("unknown application {id}"))),
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
                // The automation run resumes with the provided values.
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

fn posting(company: &str, title: &str, location: &str) -> JobPosting {
    JobPosting {
        company_name: company.to_string(),
        title: title.to_string(),
        location: Some(location.to_string()),
        url: None,
    }
}

pub(crate) fn sample_applications() -> Vec<Application> {
    let now = Utc::now();
    let mut records = vec![
        Application {
            id: ApplicationId(1),
            status: ApplicationStatus::Applied,
            created_at: now - Duration::days(3),
            job_posting: posting("Acme Analytics", "Data Engineer", "Berlin"),
            automation_state: None,
        },
        Application {
            id: ApplicationId(2),
            status: ApplicationStatus::PendingAutomation,
            created_at: now - Duration::hours(6),
            job_posting: posting("Borealis Systems", "Backend Engineer", "Remote"),
            automation_state: None,
        },
        Application {
            id: ApplicationId(3),
            status: ApplicationStatus::InterviewInvited,
            created_at: now - Duration::days(7),
            job_posting: posting("Cobalt Works", "Platform Engineer", "Amsterdam"),
            automation_state: None,
        },
        Application {
            id: ApplicationId(4),
            status: ApplicationStatus::EmailConfirmationReceived,
            created_at: now - Duration::days(1),
            job_posting: posting("Drift Labs", "Rust Engineer", "Remote"),
            automation_state: None,
        },
        Application {
            id: ApplicationId(5),
            status: ApplicationStatus::Rejected,
            created_at: now - Duration::days(12),
            job_posting: posting("Ember Health", "Software Engineer", "London"),
            automation_state: None,
        },
        Application {
            id: ApplicationId(6),
            status: ApplicationStatus::OtherUpdate,
            created_at: now - Duration::days(5),
            job_posting: posting("Flux Dynamics", "Site Reliability Engineer", "Munich"),
            automation_state: None,
        },
        Application {
            id: ApplicationId(7),
            status: ApplicationStatus::Failed,
            created_at: now - Duration::days(9),
            job_posting: posting("Granite Cloud", "Infrastructure Engineer", "Remote"),
            automation_state: None,
        },
    ];

    records.push(Application {
        id: ApplicationId(8),
        status: ApplicationStatus::UserInputNeeded,
        created_at: now - Duration::hours(20),
        job_posting: posting("Helix Mobility", "Embedded Engineer", "Stuttgart"),
        automation_state: Some(AutomationState {
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
            filled_fields: BTreeMap::from([(
                "notice_period".to_string(),
                "3 months".to_string(),
            )]),
        }),
    });

    records
}
