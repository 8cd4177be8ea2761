//! Synchronous board state machine.
//!
//! The controller owns the canonical application list and every view flag;
//! the derived columns are recomputed, never hand-edited, after each
//! canonical mutation. Collaborator calls are split into begin/settle pairs
//! so each response lands atomically against the state as of its arrival.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::columns::{column_spec, BoardColumn, ColumnSpec};
use super::distribution::{distribute, SortMode};
use super::domain::{Application, ApplicationId, ApplicationStatus};
use super::fields::FieldDraft;
use super::gateway::{FetchError, SubmitError, UpdateError};

/// Drag event as reported by the board surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragRequest {
    pub application_id: ApplicationId,
    pub source_column: String,
    pub target_column: String,
    pub source_index: usize,
    pub target_index: usize,
}

/// First phase of a drag: either the move completed locally or a status
/// change is now in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPhase {
    /// Same-column reorder; view-only, nothing to persist.
    Reordered,
    /// Cross-column move; the card has moved optimistically and the ticket
    /// must be settled against the gateway response.
    AwaitingConfirmation(StatusChangeTicket),
}

/// Outstanding status change for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChangeTicket {
    pub application_id: ApplicationId,
    pub target_status: ApplicationStatus,
}

/// Local rejection of a begin-phase status change; no request was sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChangeRejected {
    #[error("unknown application {0}")]
    UnknownApplication(ApplicationId),
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("a status change for application {0} is already in flight")]
    ChangeInFlight(ApplicationId),
}

/// Local rejection of a field submission. Deliberately not an error type:
/// the validation guard drops the operation silently, nothing is surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldsRejected {
    UnknownApplication(ApplicationId),
    NotAwaitingInput(ApplicationId),
    SubmissionInFlight(ApplicationId),
    Incomplete { missing_keys: Vec<String> },
}

/// Outstanding field submission for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSubmissionTicket {
    pub application_id: ApplicationId,
    pub values: BTreeMap<String, String>,
}

pub struct BoardController {
    applications: Vec<Application>,
    search_query: String,
    sort_mode: SortMode,
    loading: bool,
    columns: Vec<BoardColumn>,
    pending_status_changes: HashSet<ApplicationId>,
    pending_field_submissions: HashSet<ApplicationId>,
    field_drafts: HashMap<ApplicationId, FieldDraft>,
}

impl Default for BoardController {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardController {
    pub fn new() -> Self {
        let mut controller = Self {
            applications: Vec::new(),
            search_query: String::new(),
            sort_mode: SortMode::Date,
            loading: false,
            columns: Vec::new(),
            pending_status_changes: HashSet::new(),
            pending_field_submissions: HashSet::new(),
            field_drafts: HashMap::new(),
        };
        controller.refresh();
        controller
    }

    /// Rebuild the derived columns from the canonical list. Outside an
    /// optimistic preview this is the only way column contents change.
    pub fn refresh(&mut self) {
        self.columns = distribute(&self.applications, &self.search_query, self.sort_mode);
    }

    pub fn columns(&self) -> &[BoardColumn] {
        &self.columns
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Gate a reload; `false` means one is already outstanding.
    pub fn begin_load(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    /// Settle a reload. Success replaces the canonical list wholesale; any
    /// failure leaves prior state untouched and hands the error back.
    pub fn finish_load(
        &mut self,
        result: Result<Vec<Application>, FetchError>,
    ) -> Result<(), FetchError> {
        self.loading = false;
        self.applications = result?;
        self.prune_stale_drafts();
        self.refresh();
        Ok(())
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.refresh();
    }

    pub fn toggle_sort(&mut self) -> SortMode {
        self.sort_mode = self.sort_mode.toggled();
        self.refresh();
        self.sort_mode
    }

    /// First phase of a drag-and-drop event.
    ///
    /// A same-column drop reorders the derived view in place; canonical
    /// order is position-insensitive, so there is nothing to persist and
    /// the arrangement is lost on the next recompute. A cross-column drop
    /// moves the card optimistically and returns the ticket to confirm.
    pub fn begin_drag(&mut self, request: &DragRequest) -> Result<DragPhase, ChangeRejected> {
        let source = column_spec(&request.source_column)
            .ok_or_else(|| ChangeRejected::UnknownColumn(request.source_column.clone()))?;
        let target = column_spec(&request.target_column)
            .ok_or_else(|| ChangeRejected::UnknownColumn(request.target_column.clone()))?;

        if !self.knows(request.application_id) {
            return Err(ChangeRejected::UnknownApplication(request.application_id));
        }

        if source.id == target.id {
            self.reorder_within_column(source, request);
            return Ok(DragPhase::Reordered);
        }

        if !self.pending_status_changes.insert(request.application_id) {
            return Err(ChangeRejected::ChangeInFlight(request.application_id));
        }

        let target_status = target.write_status();
        self.preview_move(request, target);

        Ok(DragPhase::AwaitingConfirmation(StatusChangeTicket {
            application_id: request.application_id,
            target_status,
        }))
    }

    /// Begin a dropdown-driven status change. Same persistence contract as
    /// a cross-column drop, but without any optimistic preview.
    pub fn begin_status_change(
        &mut self,
        application_id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<StatusChangeTicket, ChangeRejected> {
        if !self.knows(application_id) {
            return Err(ChangeRejected::UnknownApplication(application_id));
        }
        if !self.pending_status_changes.insert(application_id) {
            return Err(ChangeRejected::ChangeInFlight(application_id));
        }
        Ok(StatusChangeTicket {
            application_id,
            target_status: status,
        })
    }

    /// Settle a status change. The canonical record only ever takes the
    /// server-confirmed status, which may differ from the requested one; on
    /// failure the recompute discards the optimistic preview.
    pub fn settle_status_change(
        &mut self,
        application_id: ApplicationId,
        result: Result<Application, UpdateError>,
    ) -> Result<ApplicationStatus, UpdateError> {
        self.pending_status_changes.remove(&application_id);
        match result {
            Ok(confirmed) => {
                if let Some(record) = self
                    .applications
                    .iter_mut()
                    .find(|application| application.id == application_id)
                {
                    record.status = confirmed.status.clone();
                }
                self.refresh();
                Ok(confirmed.status)
            }
            Err(error) => {
                self.refresh();
                Err(error)
            }
        }
    }

    /// Stage values into the application's draft buffer, seeding it from
    /// the automation run's already-filled fields on first touch.
    pub fn stage_fields(
        &mut self,
        application_id: ApplicationId,
        values: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), FieldsRejected> {
        let Some(application) = self
            .applications
            .iter()
            .find(|application| application.id == application_id)
        else {
            return Err(FieldsRejected::UnknownApplication(application_id));
        };

        let seed = application
            .automation_state
            .as_ref()
            .map(|state| &state.filled_fields);
        let draft = self
            .field_drafts
            .entry(application_id)
            .or_insert_with(|| match seed {
                Some(filled) => FieldDraft::seeded(filled),
                None => FieldDraft::default(),
            });
        for (key, value) in values {
            draft.stage(key, value);
        }
        Ok(())
    }

    /// Gate a field submission. Every missing field must carry a non-blank
    /// value; an incomplete draft is rejected locally with nothing sent.
    pub fn begin_field_submission(
        &mut self,
        application_id: ApplicationId,
    ) -> Result<FieldSubmissionTicket, FieldsRejected> {
        let Some(application) = self
            .applications
            .iter()
            .find(|application| application.id == application_id)
        else {
            return Err(FieldsRejected::UnknownApplication(application_id));
        };
        if !application.awaiting_input() {
            return Err(FieldsRejected::NotAwaitingInput(application_id));
        }

        let missing = application.missing_fields();
        let draft = self
            .field_drafts
            .get(&application_id)
            .cloned()
            .unwrap_or_default();
        let missing_keys = draft.incomplete_keys(missing);
        if !missing_keys.is_empty() {
            return Err(FieldsRejected::Incomplete { missing_keys });
        }
        let values = draft.submission(missing);

        if !self.pending_field_submissions.insert(application_id) {
            return Err(FieldsRejected::SubmissionInFlight(application_id));
        }

        Ok(FieldSubmissionTicket {
            application_id,
            values,
        })
    }

    /// Settle a field submission; the draft survives failures so a retry
    /// does not re-enter values.
    pub fn settle_field_submission(
        &mut self,
        application_id: ApplicationId,
        result: Result<(), SubmitError>,
    ) -> Result<(), SubmitError> {
        self.pending_field_submissions.remove(&application_id);
        result?;
        self.field_drafts.remove(&application_id);
        Ok(())
    }

    fn knows(&self, application_id: ApplicationId) -> bool {
        self.applications
            .iter()
            .any(|application| application.id == application_id)
    }

    fn column_mut(&mut self, spec: &ColumnSpec) -> Option<&mut BoardColumn> {
        self.columns
            .iter_mut()
            .find(|column| column.spec.id == spec.id)
    }

    fn reorder_within_column(&mut self, spec: &ColumnSpec, request: &DragRequest) {
        let Some(column) = self.column_mut(spec) else {
            return;
        };
        let cards = &mut column.applications;
        let position = match cards.get(request.source_index) {
            Some(card) if card.id == request.application_id => Some(request.source_index),
            _ => cards
                .iter()
                .position(|card| card.id == request.application_id),
        };
        if let Some(position) = position {
            let card = cards.remove(position);
            let slot = request.target_index.min(cards.len());
            cards.insert(slot, card);
        }
    }

    /// Optimistic preview: the card moves in the derived view only; the
    /// canonical record stays untouched until the backend confirms.
    fn preview_move(&mut self, request: &DragRequest, target: &ColumnSpec) {
        let mut card = None;
        for column in &mut self.columns {
            if let Some(position) = column
                .applications
                .iter()
                .position(|application| application.id == request.application_id)
            {
                card = Some(column.applications.remove(position));
                break;
            }
        }
        let Some(card) = card else {
            // Filtered out of the current view; the request still proceeds.
            return;
        };
        if let Some(column) = self.column_mut(target) {
            let slot = request.target_index.min(column.applications.len());
            column.applications.insert(slot, card);
        }
    }

    fn prune_stale_drafts(&mut self) {
        let live: HashSet<ApplicationId> = self
            .applications
            .iter()
            .filter(|application| application.awaiting_input())
            .map(|application| application.id)
            .collect();
        self.field_drafts.retain(|id, _| live.contains(id));
    }
}
