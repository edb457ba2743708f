use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Protected Router Module
///
/// Everything not listed as open or auth-only. Handlers here take the
/// `CurrentSession` extractor, which reads the session the guard resolved.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // GET /profile
        .route("/profile", get(handlers::get_profile))
        // GET /settings
        // Permanent redirect to the first settings tab.
        .route("/settings", get(handlers::settings_redirect))
        // GET/PUT /settings/profile
        // Name and avatar. Name length is validated on PUT.
        .route(
            "/settings/profile",
            get(handlers::get_profile_settings).put(handlers::update_profile_settings),
        )
        // GET /settings/account
        .route("/settings/account", get(handlers::get_account_settings))
}
