pub mod health;
pub mod lesson_sessions;
pub mod lessons;
pub mod progress;
pub mod realtime;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState, healthcheck_endpoint: &str) -> Router {
    let mut app = Router::new()
        .nest("/api/lessons", lessons::router())
        .nest(
            "/api/lesson-sessions",
            lesson_sessions::router().merge(realtime::router()),
        )
        .nest("/api/progress", progress::router())
        .nest("/api/badges", progress::badges_router());

    let mut health_paths = vec!["/health".to_string()];
    if healthcheck_endpoint != "/health" && healthcheck_endpoint != "/" {
        health_paths.push(healthcheck_endpoint.to_string());
    }
    for path in &health_paths {
        app = app.nest(path.as_str(), health::router());
    }

    app.fallback(fallback_handler).with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found").into_response()
}
