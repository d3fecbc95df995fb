use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::core::EventBusStats;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/info", get(info))
        .route("/live", get(live))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthInfoResponse {
    service: &'static str,
    version: &'static str,
    start_time: String,
    uptime: u64,
    lessons: usize,
    active_sessions: usize,
    max_active_sessions: usize,
    events: EventBusStats,
}

#[derive(Serialize)]
struct LivenessResponse {
    status: &'static str,
    timestamp: String,
    uptime: u64,
}

async fn root() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        timestamp: now_iso(),
    })
}

async fn info(State(state): State<AppState>) -> impl IntoResponse {
    let sessions = state.sessions();
    Json(HealthInfoResponse {
        service: "nysh-backend",
        version: env!("CARGO_PKG_VERSION"),
        start_time: chrono::DateTime::<chrono::Utc>::from(state.started_at_system()).to_rfc3339(),
        uptime: state.uptime_seconds(),
        lessons: state.content().len(),
        active_sessions: sessions.len(),
        max_active_sessions: sessions.capacity(),
        events: state.event_bus().stats().await,
    })
}

async fn live(State(state): State<AppState>) -> impl IntoResponse {
    Json(LivenessResponse {
        status: "healthy",
        timestamp: now_iso(),
        uptime: state.uptime_seconds(),
    })
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
