//! HTTP handlers for the analyzer.
//!
//! - **GET /**: the rendered page for the current state
//! - **POST /search**: form submit from the page; redirects back to `/`
//! - **GET /api/state**: the current state as JSON
//! - **POST /api/search**: JSON submit for scripted clients
//! - **GET /health**: liveness check
//!
//! Lookups never block a request: submits return as soon as the background
//! lookup has been spawned, and the page polls until it finishes.

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use tracing::{info, instrument};

use crate::controller::SearchController;
use crate::model::{SearchForm, SearchRequest, StateResponse};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub controller: SearchController,
}

/// GET / - Render the analyzer page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let search = state.controller.state().await;
    Html(crate::view::render_page(&search))
}

/// POST /search - Submit the search form.
///
/// Always answers `303 See Other` to `/`; the page then shows the loading
/// skeleton, or the error message when the username was blank.
#[instrument(skip(state, form))]
pub async fn submit_search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Redirect {
    // Blank input is reported through the state; the handle is detached.
    let _ = state.controller.submit(&form.username).await;
    Redirect::to("/")
}

/// GET /api/state - Current search state.
///
/// # Response
///
/// ```json
/// {
///     "query": "natgeo",
///     "phase": "success",
///     "is_loading": false,
///     "error_message": null,
///     "profile": { "username": "natgeo", "engagement_rate_percent": 0.42, ... }
/// }
/// ```
///
/// Phase can be: "idle", "loading", "error", or "success"
#[instrument(skip(state))]
pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let search = state.controller.state().await;
    Json(StateResponse::from(&*search))
}

/// POST /api/search - Start a lookup.
///
/// # Request Body
///
/// ```json
/// { "username": "natgeo" }
/// ```
///
/// # Response
///
/// `202 Accepted` with the state snapshot when a lookup was started, or
/// `422 Unprocessable Entity` with the snapshot (carrying the error message)
/// when the username was blank.
#[instrument(skip(state, request))]
pub async fn post_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> impl IntoResponse {
    let status = match state.controller.submit(&request.username).await {
        Ok(_) => StatusCode::ACCEPTED,
        Err(e) => {
            info!(reason = %e, "Search rejected");
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };

    let search = state.controller.snapshot().await;
    (status, Json(StateResponse::from(&search)))
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
