use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Auth-Only Router Module
///
/// Pages classified `AuthOnly`. A signed-in user requesting them is
/// redirected home by the guard before these handlers run.
pub fn auth_only_routes() -> Router<AppState> {
    Router::new()
        // GET /signin
        .route("/signin", get(handlers::signin_page))
        // GET /signup
        .route("/signup", get(handlers::signup_page))
}
