pub mod config;
pub mod core;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use nysh_core::ContentStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::state::AppState;

/// Loads the lesson catalogue named by the config, or the built-in one
pub fn load_content(config: &Config) -> Result<ContentStore, nysh_core::ContentError> {
    match &config.content_path {
        Some(path) => ContentStore::from_path(path),
        None => ContentStore::builtin(),
    }
}

pub fn build_app(config: &Config, content: ContentStore) -> axum::Router {
    let state = AppState::new(content, config.max_active_sessions);

    routes::router(state, &config.healthcheck_endpoint)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub fn create_app() -> Result<axum::Router, nysh_core::ContentError> {
    let config = Config::from_env();
    let content = load_content(&config)?;
    Ok(build_app(&config, content))
}
