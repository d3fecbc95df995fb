use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use nysh_core::reward::badge_catalog;

use crate::response::SuccessResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_progress))
}

pub fn badges_router() -> Router<AppState> {
    Router::new().route("/", get(list_badges))
}

async fn get_progress(State(state): State<AppState>) -> impl IntoResponse {
    SuccessResponse::new(state.progress().view())
}

async fn list_badges() -> impl IntoResponse {
    SuccessResponse::new(badge_catalog())
}
