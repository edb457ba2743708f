use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// API Router Module
///
/// Every path here starts with `/api`, which the route policy excludes from interception.
/// These handlers resolve sessions themselves when they need one.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // GET /api/health
        .route("/api/health", get(handlers::health))
        // GET /api/session
        // The caller's session as JSON, or null.
        .route("/api/session", get(handlers::get_session))
}
