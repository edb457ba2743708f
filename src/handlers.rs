use crate::{
    auth::{
        CurrentSession, ResolverState, SESSION_DATA_COOKIE, encode_session_cache,
        resolve_with_timeout,
    },
    config::{AppConfig, Env},
    error::AppError,
    models::{
        AccountSettings, HomeResponse, ProfileResponse, ProfileSettings, Session, SigninPage,
        SignupPage, UpdateProfileRequest,
    },
    repository::RepositoryState,
};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

// --- Open Pages ---

/// home
///
/// [Open Route] Landing page. Greets the user by name when signed in.
pub async fn home(session: Option<CurrentSession>) -> Json<HomeResponse> {
    Json(HomeResponse {
        signed_in: session.is_some(),
        name: session.map(|CurrentSession(s)| s.user.name),
    })
}

// --- Auth-Only Pages ---

/// signin_page
///
/// [Auth-Only Route] Email/password and Google sign-in.
pub async fn signin_page() -> Json<SigninPage> {
    Json(SigninPage {
        providers: vec!["email".to_string(), "google".to_string()],
        submit_to: "/api/auth/sign-in/email".to_string(),
    })
}

/// signup_page
///
/// [Auth-Only Route] Email/password sign-up. A verification mail is sent on submit.
pub async fn signup_page() -> Json<SignupPage> {
    Json(SignupPage {
        fields: vec![
            "name".to_string(),
            "email".to_string(),
            "password".to_string(),
            "confirm_password".to_string(),
        ],
        submit_to: "/api/auth/sign-up/email".to_string(),
        requires_email_verification: true,
    })
}

// --- Protected Pages ---

/// get_profile
///
/// [Protected Route] The signed-in user's profile.
pub async fn get_profile(CurrentSession(session): CurrentSession) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(&session.user))
}

/// settings_redirect
///
/// [Protected Route] `/settings` has no page of its own.
pub async fn settings_redirect() -> Redirect {
    Redirect::permanent("/settings/profile")
}

/// get_profile_settings
///
/// [Protected Route] Current values of the editable profile fields.
pub async fn get_profile_settings(
    CurrentSession(session): CurrentSession,
) -> Json<ProfileSettings> {
    Json(ProfileSettings::from(&session.user))
}

/// update_profile_settings
///
/// [Protected Route] Partial update of name and avatar. The name is validated
/// before anything touches the database.
///
/// The `session_data` cache cookie is re-signed with the updated user, so the
/// next request does not render the old profile from a stale cache.
pub async fn update_profile_settings(
    CurrentSession(session): CurrentSession,
    State(repo): State<RepositoryState>,
    State(config): State<AppConfig>,
    jar: CookieJar,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<(CookieJar, Json<ProfileSettings>), AppError> {
    payload.validate()?;

    let user = repo
        .update_profile(session.user_id, &payload)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(user_id = %user.id, "profile updated");

    let settings = ProfileSettings::from(&user);
    let refreshed = Session { user, ..session };
    let cache = encode_session_cache(&refreshed, &config.session_cache_secret)
        .map_err(|e| AppError::Internal(format!("failed to sign session cache: {}", e)))?;

    let cookie = Cookie::build((SESSION_DATA_COOKIE, cache))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(config.env == Env::Production);

    Ok((jar.add(cookie), Json(settings)))
}

/// get_account_settings
///
/// [Protected Route] Read-only account facts.
pub async fn get_account_settings(
    CurrentSession(session): CurrentSession,
) -> Json<AccountSettings> {
    Json(AccountSettings::from(&session.user))
}

// --- API (never intercepted by the route guard) ---

/// health
///
/// Liveness probe for load balancers.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}

/// get_session
///
/// Returns the caller's session, or `null` when signed out. Resolution
/// failures are logged and reported as signed out.
#[utoipa::path(
    get,
    path = "/api/session",
    responses((status = 200, description = "Active session, or null when signed out", body = Session))
)]
pub async fn get_session(
    State(resolver): State<ResolverState>,
    State(config): State<AppConfig>,
    headers: HeaderMap,
) -> Json<Option<Session>> {
    match resolve_with_timeout(resolver.as_ref(), &headers, config.session_timeout).await {
        Ok(session) => Json(session),
        Err(e) => {
            tracing::warn!(error = %e, "session lookup failed on /api/session");
            Json(None)
        }
    }
}

/// not_found
///
/// Fallback for unknown paths. Registered before the guard layer so unknown
/// paths are still guarded.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
