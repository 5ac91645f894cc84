//! Web module - session handling and the HTTP API

mod routes;
pub mod session;
pub mod state;

pub use routes::router;
pub use session::{Action, Outcome, Session};
pub use state::{AppState, SharedState};

use crate::config::Config;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Full application: routes, fresh state and the standard layers.
pub fn app(config: &Config) -> Router {
    let state = Arc::new(AppState::new(config.render_options()));

    Router::new()
        .merge(router())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
