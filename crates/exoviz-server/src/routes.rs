// =============================================================================
// Exoviz Server - Routes
// =============================================================================
// Table of Contents:
// 1. Application State
// 2. Router Setup
// 3. Handlers
// 4. Tests
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use exoviz_logic::constants::DETAIL_PLACEHOLDER;
use exoviz_logic::{CameraInputs, CameraPose, Frame, SkyContext};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

const INDEX_HTML: &str = include_str!("../static/index.html");

// -----------------------------------------------------------------------------
// 1. Application State
// -----------------------------------------------------------------------------

/// Shared application state. The sky tables never change after startup.
#[derive(Clone)]
pub struct AppState {
    pub sky: Arc<SkyContext>,
}

// -----------------------------------------------------------------------------
// 2. Router Setup
// -----------------------------------------------------------------------------

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "OK" }))
        .route("/api/config", get(dashboard_config))
        .route("/api/scene", post(scene))
        .route("/api/click", post(click))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// -----------------------------------------------------------------------------
// 3. Handlers
// -----------------------------------------------------------------------------

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("no such route".into())
}

/// Settings the page needs before its first tick.
#[derive(Debug, Serialize)]
pub struct DashboardConfig {
    pub tick_interval_ms: u64,
    pub placeholder: &'static str,
}

async fn dashboard_config(State(state): State<AppState>) -> Json<DashboardConfig> {
    Json(DashboardConfig {
        tick_interval_ms: state.sky.config().tick_interval_ms,
        placeholder: DETAIL_PLACEHOLDER,
    })
}

/// Body of `POST /api/scene`.
#[derive(Debug, Default, Deserialize)]
pub struct SceneRequest {
    #[serde(default)]
    pub tick: u64,
    /// Last relayout payload the graph emitted.
    #[serde(default)]
    pub relayout: Option<Value>,
    /// Pose from the browser's local storage. Unparsable values are ignored.
    #[serde(default)]
    pub stored_camera: Option<Value>,
}

impl SceneRequest {
    fn camera_inputs(&self) -> CameraInputs {
        let stored = self
            .stored_camera
            .as_ref()
            .and_then(|v| serde_json::from_value::<CameraPose>(v.clone()).ok());
        CameraInputs::from_relayout(self.relayout.as_ref(), stored)
    }
}

async fn scene(
    State(state): State<AppState>,
    payload: Result<Json<SceneRequest>, JsonRejection>,
) -> Result<Json<Frame>, ApiError> {
    let Json(request) = payload?;
    let inputs = request.camera_inputs();
    let frame = if inputs.live.is_some() {
        state.sky.on_camera_change(request.tick, &inputs)
    } else {
        state.sky.on_tick(request.tick, &inputs)
    };
    tracing::debug!(
        tick = request.tick,
        camera = ?frame.camera_source,
        "scene built"
    );
    Ok(Json(frame))
}

/// Response of `POST /api/click`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ClickResponse {
    /// Hover text of the clicked element, if it had any.
    pub stored: Option<String>,
    /// Text for the detail panel.
    pub detail: String,
}

async fn click(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ClickResponse>, ApiError> {
    let Json(click) = payload?;
    let stored = state.sky.on_click(&click);
    let detail = state.sky.detail_text(stored.as_deref());
    Ok(Json(ClickResponse { stored, detail }))
}

// -----------------------------------------------------------------------------
// 4. Tests
// -----------------------------------------------------------------------------
