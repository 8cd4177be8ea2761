//! Application board: status registry, column taxonomy, distribution
//! engine, and the optimistic board controller.
//!
//! The canonical application list lives behind [`BoardController`]; every
//! rendered column is derived from it by [`distribute`] and rebuilt after
//! each mutation. [`BoardService`] drives the controller against an
//! [`ApplicationGateway`], applying drag-triggered status changes
//! optimistically and reverting them when the backend refuses.

pub mod columns;
pub mod controller;
pub mod distribution;
pub mod domain;
pub mod fields;
pub mod gateway;
pub mod remote;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use columns::{column_for, column_spec, BoardColumn, ColumnSpec, TAXONOMY};
pub use controller::{
    BoardController, ChangeRejected, DragPhase, DragRequest, FieldSubmissionTicket,
    FieldsRejected, StatusChangeTicket,
};
pub use distribution::{distribute, SortMode};
pub use domain::{
    Application, ApplicationId, ApplicationStatus, AutomationState, JobPosting, MissingField,
};
pub use fields::FieldDraft;
pub use gateway::{ApplicationGateway, FetchError, SubmitError, UpdateError};
pub use remote::{HttpGateway, InvalidBaseUrl};
pub use router::board_router;
pub use service::{
    BoardService, BoardSnapshot, CardView, ColumnView, FieldSubmissionResolution, MoveResolution,
};
