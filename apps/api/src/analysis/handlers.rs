//! Axum route handlers for the Analysis API and the HTML pages.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Serialize;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::controller::{AnalysisInput, PendingAnalysis, ViewState};
use crate::analysis::models::AnalysisResult;
use crate::errors::AppError;
use crate::state::AppState;
use crate::view::render_page;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub state: ViewState,
}

/// Runs the remote call in the background; the outcome lands in the session.
fn spawn_analysis(session_id: Uuid, pending: PendingAnalysis) {
    let span = info_span!("analysis", session_id = %session_id);
    tokio::spawn(
        async move {
            info!("Analysis started");
            pending.run().await;
        }
        .instrument(span),
    );
}

// ────────────────────────────────────────────────────────────────────────────
// JSON handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// One-shot analysis without a session. Awaits the model inline.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(input): Json<AnalysisInput>,
) -> Result<Json<AnalysisResult>, AppError> {
    input.validate()?;

    let result = state
        .analyzer
        .analyze(&input.resume_text, &input.job_description)
        .await?;

    Ok(Json(result))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let (session_id, controller) = state.sessions.create().await;
    let view = controller.snapshot().await;
    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            state: view,
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ViewState>, AppError> {
    let controller = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    Ok(Json(controller.snapshot().await))
}

/// POST /api/v1/sessions/:id/analyze
///
/// Starts an analysis and returns immediately with the loading state.
/// Poll `GET /api/v1/sessions/:id` for the outcome.
pub async fn handle_start_analysis(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(input): Json<AnalysisInput>,
) -> Result<(StatusCode, Json<ViewState>), AppError> {
    let controller = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    let pending = controller.begin(input).await?;
    let view = controller.snapshot().await;
    spawn_analysis(session_id, pending);

    Ok((StatusCode::ACCEPTED, Json(view)))
}

// ────────────────────────────────────────────────────────────────────────────
// HTML handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
///
/// Starts a fresh session and sends the browser to its page.
pub async fn handle_index(State(state): State<AppState>) -> Redirect {
    let (session_id, _) = state.sessions.create().await;
    Redirect::to(&format!("/sessions/{session_id}"))
}

/// GET /sessions/:id
pub async fn handle_session_page(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let Some(controller) = state.sessions.get(session_id).await else {
        return Ok(Redirect::to("/").into_response());
    };

    let view = controller.snapshot().await;
    let draft = controller.draft().await;
    let page = render_page(session_id, &draft, &view)?;

    Ok(Html(page).into_response())
}

/// POST /sessions/:id/analyze
///
/// Form submit. Validation failures and busy rejections are already reflected
/// in the session state, so every path redirects back to the page.
pub async fn handle_session_submit(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Form(input): Form<AnalysisInput>,
) -> Redirect {
    let Some(controller) = state.sessions.get(session_id).await else {
        return Redirect::to("/");
    };

    match controller.begin(input).await {
        Ok(pending) => spawn_analysis(session_id, pending),
        Err(e) => debug!(session_id = %session_id, "Submission not started: {e}"),
    }

    Redirect::to(&format!("/sessions/{session_id}"))
}
