//! HTTP route handlers.
//!
//! Each endpoint maps one form interaction onto a `Session` action. Actions
//! run on the blocking pool because rendering and statistics are CPU-bound.

use crate::charts::{ColumnSelection, PlotKind};
use crate::error::AnalysisError;
use crate::web::session::{Action, Outcome};
use crate::web::state::SharedState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::PoisonError;
use uuid::Uuid;

/// Build the API router (without state attached).
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/v1/health", get(health_handler))
        .route("/v1/sessions", post(create_session_handler))
        .route("/v1/sessions/{id}", delete(delete_session_handler))
        .route("/v1/sessions/{id}/table", put(upload_handler))
        .route("/v1/sessions/{id}/options/{kind}", get(plot_options_handler))
        .route("/v1/sessions/{id}/plot", post(plot_handler))
        .route("/v1/sessions/{id}/summary", get(summary_handler))
        .route("/v1/sessions/{id}/ttest/options", get(ttest_options_handler))
        .route("/v1/sessions/{id}/ttest", post(ttest_handler))
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SessionCreated {
    session_id: Uuid,
}

async fn create_session_handler(
    State(state): State<SharedState>,
) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.create_session();
    tracing::info!(%session_id, "session created");
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

async fn delete_session_handler(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.remove_session(id) {
        tracing::info!(session_id = %id, "session discarded");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::unknown_session(id))
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Body is the raw CSV file.
async fn upload_handler(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<Outcome>, AppError> {
    run_action(state, id, Action::Upload(body.to_vec())).await
}

async fn plot_options_handler(
    State(state): State<SharedState>,
    Path((id, kind)): Path<(Uuid, PlotKind)>,
) -> Result<Json<Outcome>, AppError> {
    run_action(state, id, Action::PlotOptions(kind)).await
}

async fn plot_handler(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(selection): Json<ColumnSelection>,
) -> Result<Json<Outcome>, AppError> {
    run_action(state, id, Action::SubmitPlot(selection)).await
}

async fn summary_handler(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Outcome>, AppError> {
    run_action(state, id, Action::ShowSummary).await
}

async fn ttest_options_handler(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Outcome>, AppError> {
    run_action(state, id, Action::TTestOptions).await
}

#[derive(Debug, Deserialize)]
struct TTestRequest {
    column1: String,
    column2: String,
    /// Student's test by default; `false` selects Welch's.
    #[serde(default = "default_true")]
    equal_var: bool,
}

async fn ttest_handler(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TTestRequest>,
) -> Result<Json<Outcome>, AppError> {
    let action = Action::SubmitTTest {
        column1: req.column1,
        column2: req.column2,
        equal_var: req.equal_var,
    };
    run_action(state, id, action).await
}

async fn run_action(
    state: SharedState,
    id: Uuid,
    action: Action,
) -> Result<Json<Outcome>, AppError> {
    let session = state.session(id).ok_or_else(|| AppError::unknown_session(id))?;

    state.inflight.fetch_add(1, Ordering::Relaxed);
    let _guard = DecrementOnDrop(&state.inflight);

    let outcome = tokio::task::spawn_blocking(move || {
        // A panicked action leaves no partial state behind: the table is only
        // ever swapped whole.
        let mut session = session.lock().unwrap_or_else(PoisonError::into_inner);
        session.handle(action).map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::internal(format!("task panicked: {e}")))??;

    Ok(Json(outcome))
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_s: f64,
    sessions: usize,
    inflight: u64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_s: state.started_at.elapsed().as_secs_f64(),
        sessions: state.session_count(),
        inflight: state.inflight.load(Ordering::Relaxed),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Structured JSON error response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn not_found(msg: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg,
        }
    }

    fn internal(msg: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg,
        }
    }

    fn unknown_session(id: Uuid) -> Self {
        Self::not_found(format!("unknown session: {id}"))
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        let status = match &err {
            AnalysisError::ColumnNotFound { .. } => StatusCode::NOT_FOUND,
            AnalysisError::Render(_) | AnalysisError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AnalysisError::Csv(_)
            | AnalysisError::NotEnoughNumericColumns { .. }
            | AnalysisError::NonNumericColumn { .. }
            | AnalysisError::MissingColumn { .. }
            | AnalysisError::NoTable => StatusCode::BAD_REQUEST,
        };
        if status.is_server_error() {
            tracing::error!(%err, "action failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// RAII guard to decrement an atomic counter on drop.
struct DecrementOnDrop<'a>(&'a AtomicU64);

impl Drop for DecrementOnDrop<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}
