use std::{convert::Infallible, sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{HeaderMap, StatusCode, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{models::Session, repository::RepositoryState};

/// Cookie carrying the session token, written as `<token>.<signature>` by the auth framework.
pub const SESSION_TOKEN_COOKIE: &str = "session_token";
/// Cookie carrying the signed session cache.
pub const SESSION_DATA_COOKIE: &str = "session_data";
/// Longest a cached session may be trusted without going back to the database.
pub const SESSION_CACHE_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// SessionError
///
/// Everything that can go wrong while resolving a session. The route guard
/// treats every variant as "signed out".
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session lookup failed: {0}")]
    Database(String),

    #[error("session lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// SessionResolver
///
/// Turns request headers into the caller's session, if any. Injected into the
/// application state so the guard never reaches for a global.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError>;
}

/// ResolverState
///
/// The concrete type used to share the resolver across the application state.
pub type ResolverState = Arc<dyn SessionResolver>;

/// resolve_with_timeout
///
/// Bounds a session lookup so a slow database cannot stall a page request.
pub async fn resolve_with_timeout(
    resolver: &dyn SessionResolver,
    headers: &HeaderMap,
    timeout: Duration,
) -> Result<Option<Session>, SessionError> {
    tokio::time::timeout(timeout, resolver.resolve(headers))
        .await
        .map_err(|_| SessionError::Timeout(timeout))?
}

/// SessionCacheClaims
///
/// Payload of the `session_data` cookie: the whole session plus the JWT timing claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCacheClaims {
    pub session: Session,
    /// Expiration Time: never later than the session itself.
    pub exp: usize,
    /// Issued At.
    pub iat: usize,
}

impl SessionCacheClaims {
    pub fn new(session: Session) -> Self {
        let now = Utc::now().timestamp();
        let cache_exp = now + SESSION_CACHE_MAX_AGE.as_secs() as i64;
        let exp = cache_exp.min(session.expires_at.timestamp()).max(0);

        Self {
            session,
            exp: exp as usize,
            iat: now.max(0) as usize,
        }
    }
}

/// encode_session_cache
///
/// Signs a session into a `session_data` cookie value.
pub fn encode_session_cache(
    session: &Session,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = SessionCacheClaims::new(session.clone());
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// CookieSessionResolver
///
/// Resolves sessions the way the auth framework lays out its cookies:
/// 1. A valid, unexpired `session_data` cache cookie is trusted as-is.
/// 2. Otherwise the `session_token` cookie is looked up in the repository.
///
/// A bad cache cookie is not an error, it just falls through to the database.
pub struct CookieSessionResolver {
    repo: RepositoryState,
    cache_key: DecodingKey,
}

impl CookieSessionResolver {
    pub fn new(repo: RepositoryState, cache_secret: &str) -> Self {
        Self {
            repo,
            cache_key: DecodingKey::from_secret(cache_secret.as_bytes()),
        }
    }

    fn cached_session(&self, jar: &CookieJar) -> Option<Session> {
        let value = jar.get(SESSION_DATA_COOKIE)?.value();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        match decode::<SessionCacheClaims>(value, &self.cache_key, &validation) {
            Ok(data) if !data.claims.session.is_expired_at(Utc::now()) => {
                Some(data.claims.session)
            }
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unusable session cache cookie");
                None
            }
        }
    }
}

/// session_token
///
/// Extracts the bare token from the `session_token` cookie, dropping the signature suffix.
pub fn session_token(jar: &CookieJar) -> Option<&str> {
    let value = jar.get(SESSION_TOKEN_COOKIE)?.value();
    value
        .split('.')
        .next()
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl SessionResolver for CookieSessionResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        let jar = CookieJar::from_headers(headers);

        if let Some(session) = self.cached_session(&jar) {
            return Ok(Some(session));
        }

        let Some(token) = session_token(&jar) else {
            return Ok(None);
        };

        let session = self
            .repo
            .find_session(token)
            .await
            .map_err(|e| SessionError::Database(e.to_string()))?;

        Ok(session.filter(|s| !s.is_expired_at(Utc::now())))
    }
}

/// CurrentSession Extractor
///
/// Hands page handlers the session the route guard resolved and stored in the
/// request extensions. Behind the guard a protected handler always finds one;
/// the 401 rejection only fires when a handler is mounted without the guard.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(CurrentSession)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Session>().cloned().map(CurrentSession))
    }
}
