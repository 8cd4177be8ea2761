use std::collections::BTreeMap;
use std::future::Future;

use super::domain::{Application, ApplicationId, ApplicationStatus};

/// Remote source of truth for application records.
///
/// Implementations decode transport payloads into domain values; the board
/// never sees wire bytes. Futures must be `Send` so the service can be
/// driven from multi-threaded runtimes.
pub trait ApplicationGateway: Send + Sync {
    /// Fetch the full application list.
    fn list_applications(
        &self,
    ) -> impl Future<Output = Result<Vec<Application>, FetchError>> + Send;

    /// Persist a status change and return the server-confirmed record.
    /// Retrying with the same target status must not double-apply.
    fn update_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> impl Future<Output = Result<Application, UpdateError>> + Send;

    /// Submit values for the fields automation could not fill on its own.
    fn submit_fields(
        &self,
        id: ApplicationId,
        values: BTreeMap<String, String>,
    ) -> impl Future<Output = Result<(), SubmitError>> + Send;
}

/// Failure loading the application list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("application list request failed: {0}")]
    Transport(String),
    #[error("application list payload malformed: {0}")]
    Decode(String),
}

/// Failure persisting a status change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    #[error("status update request failed: {0}")]
    Transport(String),
    #[error("status update rejected by the backend: {0}")]
    Rejected(String),
    #[error("status update response malformed: {0}")]
    Decode(String),
}

/// Failure submitting missing field values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("field submission request failed: {0}")]
    Transport(String),
    #[error("field submission rejected by the backend: {0}")]
    Rejected(String),
}
