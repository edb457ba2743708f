use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Open Router Module
///
/// Pages classified `Open`: served regardless of session state.
pub fn open_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Landing page. Signed-in users get a personalised greeting.
        .route("/", get(handlers::home))
}
