use axum::{
    Router,
    extract::{FromRef, Request, State},
    http::HeaderName,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod repository;

// Page routes grouped by route class, plus the /api surface.
pub mod routes;
use routes::{api, auth_only, open, protected};

// --- Public Re-exports ---

pub use auth::{CookieSessionResolver, ResolverState, SessionResolver};
pub use config::AppConfig;
pub use guard::{Decision, RouteClass, RoutePolicy};
pub use repository::{PostgresSessionRepository, RepositoryState};

use auth::resolve_with_timeout;

/// ApiDoc
///
/// OpenAPI document for the `/api` surface, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::health, handlers::get_session),
    components(schemas(models::Session, models::SessionUser)),
    tags(
        (name = "account-portal", description = "Account portal API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared container for the services and configuration every
/// request needs. Cloned per request; all members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// Persistence over the auth framework's tables.
    pub repo: RepositoryState,
    /// Session lookup used by the route guard and `/api/session`.
    pub sessions: ResolverState,
    /// The loaded, immutable configuration (including the route policy).
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for ResolverState {
    fn from_ref(app_state: &AppState) -> ResolverState {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// route_guard
///
/// Middleware applied to every route and the fallback. For intercepted paths it
/// resolves the session (bounded by `session_timeout`), classifies the path and
/// either forwards the request or answers with a temporary redirect home.
///
/// A resolver error or timeout is logged and treated as "no session".
/// On `Allow`, a resolved session is stored in the request extensions for
/// the `CurrentSession` extractor.
async fn route_guard(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let policy = &state.config.routes;
    let path = request.uri().path().to_owned();

    if !policy.intercepts(&path) {
        return next.run(request).await;
    }

    let session = match resolve_with_timeout(
        state.sessions.as_ref(),
        request.headers(),
        state.config.session_timeout,
    )
    .await
    {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, path = %path, "session resolution failed, treating request as signed out");
            None
        }
    };

    let class = policy.classify(&path);
    let decision = guard::decide(class, session.is_some());

    tracing::debug!(
        path = %path,
        ?class,
        has_session = session.is_some(),
        ?decision,
        "route guard decision"
    );

    match decision {
        Decision::Allow => {
            if let Some(session) = session {
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
        Decision::RedirectHome => Redirect::temporary(policy.home()).into_response(),
    }
}

/// create_router
///
/// Assembles the routing structure, applies the route guard and the
/// observability layers, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    // The fallback must be registered before the guard layer, otherwise
    // unknown paths would skip the guard.
    let base_router = Router::new()
        .merge(SwaggerUi::new("/api-docs/ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(open::open_routes())
        .merge(auth_only::auth_only_routes())
        .merge(protected::protected_routes())
        .merge(api::api_routes())
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), route_guard))
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span, tagged with the `x-request-id` generated above
/// so every log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
