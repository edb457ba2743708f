#![allow(dead_code)]

use account_portal::{
    AppConfig, AppState,
    auth::{CookieSessionResolver, SessionError, SessionResolver},
    models::{Session, SessionUser, UpdateProfileRequest},
    repository::SessionRepository,
};
use async_trait::async_trait;
use axum::http::HeaderMap;
use chrono::Utc;
use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use uuid::Uuid;

pub const TEST_CACHE_SECRET: &str = "test-cache-secret-1234567890";
pub const TEST_USER_ID: Uuid = Uuid::from_u128(1);

/// A session owned by TEST_USER_ID that expires `expires_in` from now.
pub fn sample_session(expires_in: chrono::Duration) -> Session {
    Session {
        id: Uuid::from_u128(42),
        token: "tok-abc".to_string(),
        user_id: TEST_USER_ID,
        expires_at: Utc::now() + expires_in,
        user: SessionUser {
            id: TEST_USER_ID,
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            email_verified: true,
            image: None,
            role: "user".to_string(),
        },
    }
}

pub fn live_session() -> Session {
    sample_session(chrono::Duration::hours(1))
}

// --- Mock Repository ---

#[derive(Default)]
pub struct MockSessionRepo {
    pub session: Option<Session>,
    pub fail: bool,
    pub user_missing: bool,
    pub lookups: Mutex<Vec<String>>,
    pub updates: Mutex<Vec<(Uuid, UpdateProfileRequest)>>,
}

impl MockSessionRepo {
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Some(session),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepo {
    async fn find_session(&self, token: &str) -> Result<Option<Session>, sqlx::Error> {
        self.lookups.lock().unwrap().push(token.to_string());
        if self.fail {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self.session.clone().filter(|s| s.token == token))
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        req: &UpdateProfileRequest,
    ) -> Result<Option<SessionUser>, sqlx::Error> {
        if self.fail {
            return Err(sqlx::Error::PoolTimedOut);
        }
        self.updates.lock().unwrap().push((user_id, req.clone()));
        if self.user_missing {
            return Ok(None);
        }
        let mut user = live_session().user;
        if let Some(name) = &req.name {
            user.name = name.clone();
        }
        if let Some(image) = &req.image {
            user.image = Some(image.clone());
        }
        Ok(Some(user))
    }
}

// --- Mock Resolver ---

pub enum Outcome {
    SignedIn(Session),
    SignedOut,
    Fail,
    Hang,
}

/// Resolver with a canned outcome that counts how often it is consulted.
pub struct StaticResolver {
    pub outcome: Outcome,
    pub calls: AtomicUsize,
}

impl StaticResolver {
    pub fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionResolver for StaticResolver {
    async fn resolve(&self, _headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::SignedIn(session) => Ok(Some(session.clone())),
            Outcome::SignedOut => Ok(None),
            Outcome::Fail => Err(SessionError::Database("connection refused".to_string())),
            Outcome::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(None)
            }
        }
    }
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.session_timeout = Duration::from_millis(50);
    config.session_cache_secret = TEST_CACHE_SECRET.to_string();
    config
}

/// State with a short session timeout so hanging resolvers fail fast.
pub fn test_state(resolver: Arc<StaticResolver>, repo: Arc<MockSessionRepo>) -> AppState {
    AppState {
        repo,
        sessions: resolver,
        config: test_config(),
    }
}

/// State wired the way `main` wires it: sessions come from request cookies,
/// backed by `repo`.
pub fn cookie_state(repo: Arc<MockSessionRepo>) -> AppState {
    let sessions = Arc::new(CookieSessionResolver::new(repo.clone(), TEST_CACHE_SECRET));
    AppState {
        repo,
        sessions,
        config: test_config(),
    }
}
