//! Async facade joining the board state machine to the automation gateway.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::columns::BoardColumn;
use super::controller::{
    BoardController, ChangeRejected, DragPhase, DragRequest, FieldsRejected, StatusChangeTicket,
};
use super::distribution::SortMode;
use super::domain::{Application, ApplicationId, ApplicationStatus, MissingField};
use super::gateway::{ApplicationGateway, FetchError, SubmitError, UpdateError};

/// How a drag or status-change request settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResolution {
    /// Same-column reorder; view-only.
    Reordered,
    /// The backend confirmed the change; canonical status updated.
    Committed(ApplicationStatus),
    /// The backend refused or the request failed; the board reverted.
    Reverted(UpdateError),
    /// Rejected locally before any request was sent.
    Rejected(ChangeRejected),
}

/// How a field submission settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSubmissionResolution {
    /// Accepted by the backend; the board was reloaded.
    Submitted,
    /// The request failed; the draft is kept for retry.
    Failed(SubmitError),
    /// Rejected locally (validation guard or duplicate submission);
    /// nothing was sent.
    Skipped(FieldsRejected),
}

/// Board operations over a shared controller.
///
/// The controller mutex is held only for the synchronous begin/settle
/// phases, never across a gateway await, so a response settles against the
/// state as of its arrival and user actions stay responsive while requests
/// are outstanding.
pub struct BoardService<G> {
    controller: Mutex<BoardController>,
    gateway: Arc<G>,
}

impl<G> BoardService<G>
where
    G: ApplicationGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            controller: Mutex::new(BoardController::new()),
            gateway,
        }
    }

    /// Replace the canonical list from the collaborator. Failure leaves the
    /// prior board untouched; the caller may retry with another reload.
    pub async fn load(&self) -> Result<BoardSnapshot, FetchError> {
        if !self.state().begin_load() {
            debug!("reload skipped, one already in flight");
            return Ok(self.snapshot());
        }

        let result = self.gateway.list_applications().await;

        let mut state = self.state();
        match state.finish_load(result) {
            Ok(()) => {
                info!(
                    applications = state.applications().len(),
                    "application list replaced"
                );
                Ok(Self::snapshot_of(&state))
            }
            Err(error) => {
                warn!(%error, "application list load failed; keeping previous board");
                Err(error)
            }
        }
    }

    pub fn set_search(&self, query: impl Into<String>) -> BoardSnapshot {
        let mut state = self.state();
        state.set_search(query);
        Self::snapshot_of(&state)
    }

    pub fn toggle_sort(&self) -> BoardSnapshot {
        let mut state = self.state();
        state.toggle_sort();
        Self::snapshot_of(&state)
    }

    /// Apply a drag event: optimistic move, confirm with the backend,
    /// settle.
    pub async fn move_via_drag(&self, request: DragRequest) -> MoveResolution {
        let ticket = {
            let mut state = self.state();
            match state.begin_drag(&request) {
                Ok(DragPhase::Reordered) => return MoveResolution::Reordered,
                Ok(DragPhase::AwaitingConfirmation(ticket)) => ticket,
                Err(rejection) => {
                    debug!(?rejection, "drag rejected locally");
                    return MoveResolution::Rejected(rejection);
                }
            }
        };
        self.confirm(ticket).await
    }

    /// Dropdown-driven status change: no preview, then the same settle
    /// path as a drag.
    pub async fn change_status(
        &self,
        application_id: ApplicationId,
        status: ApplicationStatus,
    ) -> MoveResolution {
        let ticket = {
            let mut state = self.state();
            match state.begin_status_change(application_id, status) {
                Ok(ticket) => ticket,
                Err(rejection) => {
                    debug!(?rejection, "status change rejected locally");
                    return MoveResolution::Rejected(rejection);
                }
            }
        };
        self.confirm(ticket).await
    }

    /// Submit values for an application stuck on user input. Incomplete
    /// drafts are dropped silently before any request; a confirmed
    /// submission clears the draft and reloads the board so the
    /// backend-driven transition shows up.
    pub async fn provide_missing_fields(
        &self,
        application_id: ApplicationId,
        values: BTreeMap<String, String>,
    ) -> FieldSubmissionResolution {
        let ticket = {
            let mut state = self.state();
            if let Err(rejection) = state.stage_fields(application_id, values) {
                debug!(?rejection, "field staging skipped");
                return FieldSubmissionResolution::Skipped(rejection);
            }
            match state.begin_field_submission(application_id) {
                Ok(ticket) => ticket,
                Err(rejection) => {
                    debug!(?rejection, "field submission skipped");
                    return FieldSubmissionResolution::Skipped(rejection);
                }
            }
        };

        let result = self.gateway.submit_fields(application_id, ticket.values).await;
        let settled = self.state().settle_field_submission(application_id, result);
        match settled {
            Ok(()) => {
                info!(%application_id, "missing fields accepted");
                if let Err(error) = self.load().await {
                    warn!(%application_id, %error, "board refresh after field submission failed");
                }
                FieldSubmissionResolution::Submitted
            }
            Err(error) => {
                warn!(%application_id, %error, "field submission failed");
                FieldSubmissionResolution::Failed(error)
            }
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        Self::snapshot_of(&self.state())
    }

    async fn confirm(&self, ticket: StatusChangeTicket) -> MoveResolution {
        let StatusChangeTicket {
            application_id,
            target_status,
        } = ticket;

        let result = self
            .gateway
            .update_status(application_id, target_status)
            .await;

        let mut state = self.state();
        match state.settle_status_change(application_id, result) {
            Ok(confirmed) => {
                info!(%application_id, status = %confirmed, "status change confirmed");
                MoveResolution::Committed(confirmed)
            }
            Err(error) => {
                warn!(%application_id, %error, "status change failed; board reverted");
                MoveResolution::Reverted(error)
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, BoardController> {
        self.controller.lock().expect("board state mutex poisoned")
    }

    fn snapshot_of(state: &BoardController) -> BoardSnapshot {
        BoardSnapshot {
            search_query: state.search_query().to_string(),
            sort_mode: state.sort_mode(),
            loading: state.is_loading(),
            columns: state.columns().iter().map(ColumnView::from_column).collect(),
        }
    }
}

/// Serializable projection of the whole board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub search_query: String,
    pub sort_mode: SortMode,
    pub loading: bool,
    pub columns: Vec<ColumnView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnView {
    pub id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub applications: Vec<CardView>,
}

impl ColumnView {
    fn from_column(column: &BoardColumn) -> Self {
        Self {
            id: column.spec.id,
            title: column.spec.title,
            icon: column.spec.icon,
            color: column.spec.color,
            applications: column
                .applications
                .iter()
                .map(CardView::from_application)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: ApplicationId,
    pub status: ApplicationStatus,
    pub status_label: String,
    pub status_class: String,
    pub company_name: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<MissingField>,
}

impl CardView {
    fn from_application(application: &Application) -> Self {
        Self {
            id: application.id,
            status_label: application.status.label().to_string(),
            status_class: application.status.css_class(),
            status: application.status.clone(),
            company_name: application.job_posting.company_name.clone(),
            title: application.job_posting.title.clone(),
            created_at: application.created_at,
            missing_fields: application.missing_fields().to_vec(),
        }
    }
}
