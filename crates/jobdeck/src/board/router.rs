use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::controller::{ChangeRejected, DragRequest};
use super::domain::{ApplicationId, ApplicationStatus};
use super::gateway::ApplicationGateway;
use super::service::{BoardService, FieldSubmissionResolution, MoveResolution};

/// Router builder exposing the board over HTTP.
pub fn board_router<G>(service: Arc<BoardService<G>>) -> Router
where
    G: ApplicationGateway + 'static,
{
    Router::new()
        .route("/api/v1/board", get(snapshot_handler::<G>))
        .route("/api/v1/board/reload", post(reload_handler::<G>))
        .route("/api/v1/board/search", put(search_handler::<G>))
        .route("/api/v1/board/sort", post(sort_handler::<G>))
        .route("/api/v1/board/move", post(move_handler::<G>))
        .route(
            "/api/v1/board/applications/:application_id/status",
            patch(status_handler::<G>),
        )
        .route(
            "/api/v1/board/applications/:application_id/fields",
            post(fields_handler::<G>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    query: String,
}

#[derive(Debug, Deserialize)]
struct StatusChangeRequest {
    status: ApplicationStatus,
}

#[derive(Debug, Deserialize)]
struct ProvideFieldsRequest {
    fields: BTreeMap<String, String>,
}

async fn snapshot_handler<G>(State(service): State<Arc<BoardService<G>>>) -> Response
where
    G: ApplicationGateway + 'static,
{
    Json(service.snapshot()).into_response()
}

async fn reload_handler<G>(State(service): State<Arc<BoardService<G>>>) -> Response
where
    G: ApplicationGateway + 'static,
{
    match service.load().await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

async fn search_handler<G>(
    State(service): State<Arc<BoardService<G>>>,
    Json(payload): Json<SearchRequest>,
) -> Response
where
    G: ApplicationGateway + 'static,
{
    Json(service.set_search(payload.query)).into_response()
}

async fn sort_handler<G>(State(service): State<Arc<BoardService<G>>>) -> Response
where
    G: ApplicationGateway + 'static,
{
    Json(service.toggle_sort()).into_response()
}

async fn move_handler<G>(
    State(service): State<Arc<BoardService<G>>>,
    Json(request): Json<DragRequest>,
) -> Response
where
    G: ApplicationGateway + 'static,
{
    match service.move_via_drag(request).await {
        MoveResolution::Reordered | MoveResolution::Committed(_) => {
            (StatusCode::OK, Json(service.snapshot())).into_response()
        }
        MoveResolution::Reverted(error) => reverted_response(error.to_string(), &service),
        MoveResolution::Rejected(rejection) => rejection_response(rejection),
    }
}

async fn status_handler<G>(
    State(service): State<Arc<BoardService<G>>>,
    Path(application_id): Path<i64>,
    Json(payload): Json<StatusChangeRequest>,
) -> Response
where
    G: ApplicationGateway + 'static,
{
    let id = ApplicationId(application_id);
    match service.change_status(id, payload.status).await {
        MoveResolution::Reordered | MoveResolution::Committed(_) => {
            (StatusCode::OK, Json(service.snapshot())).into_response()
        }
        MoveResolution::Reverted(error) => reverted_response(error.to_string(), &service),
        MoveResolution::Rejected(rejection) => rejection_response(rejection),
    }
}

async fn fields_handler<G>(
    State(service): State<Arc<BoardService<G>>>,
    Path(application_id): Path<i64>,
    Json(payload): Json<ProvideFieldsRequest>,
) -> Response
where
    G: ApplicationGateway + 'static,
{
    let id = ApplicationId(application_id);
    match service.provide_missing_fields(id, payload.fields).await {
        FieldSubmissionResolution::Submitted => {
            let payload = json!({ "submitted": true, "board": service.snapshot() });
            (StatusCode::OK, Json(payload)).into_response()
        }
        FieldSubmissionResolution::Skipped(rejection) => {
            // Validation guard: quietly report that nothing was sent.
            let payload = json!({
                "submitted": false,
                "reason": format!("{rejection:?}"),
                "board": service.snapshot(),
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        FieldSubmissionResolution::Failed(error) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

fn reverted_response<G>(error: String, service: &Arc<BoardService<G>>) -> Response
where
    G: ApplicationGateway + 'static,
{
    let payload = json!({ "error": error, "board": service.snapshot() });
    (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
}

fn rejection_response(rejection: ChangeRejected) -> Response {
    let status = match rejection {
        ChangeRejected::ChangeInFlight(_) => StatusCode::CONFLICT,
        ChangeRejected::UnknownApplication(_) | ChangeRejected::UnknownColumn(_) => {
            StatusCode::NOT_FOUND
        }
    };
    (status, Json(json!({ "error": rejection.to_string() }))).into_response()
}
