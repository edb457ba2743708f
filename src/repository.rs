use crate::models::{Session, SessionRow, SessionUser, UpdateProfileRequest};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// SessionRepository
///
/// Persistence contract over the tables the auth framework owns (`users`, `sessions`).
/// The service only reads sessions; the one write it performs is the profile edit.
///
/// **Send + Sync + async_trait** let the trait object (`Arc<dyn SessionRepository>`)
/// be shared across Axum's request tasks.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Looks up a session by its bare token, joined with its owner.
    /// Expiry is not checked here; callers decide what "live" means.
    async fn find_session(&self, token: &str) -> Result<Option<Session>, sqlx::Error>;

    /// Applies a partial profile update. Returns `None` if the user no longer exists.
    async fn update_profile(
        &self,
        user_id: Uuid,
        req: &UpdateProfileRequest,
    ) -> Result<Option<SessionUser>, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn SessionRepository>;

/// PostgresSessionRepository
///
/// `SessionRepository` backed by the shared PostgreSQL database.
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn find_session(&self, token: &str) -> Result<Option<Session>, sqlx::Error> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                s.id, s.token, s.user_id, s.expires_at,
                u.name, u.email, u.email_verified, u.image, u.role
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Session::from))
    }

    /// update_profile
    ///
    /// COALESCE keeps the stored value for any field the request leaves out.
    async fn update_profile(
        &self,
        user_id: Uuid,
        req: &UpdateProfileRequest,
    ) -> Result<Option<SessionUser>, sqlx::Error> {
        sqlx::query_as::<_, SessionUser>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                image = COALESCE($3, image)
            WHERE id = $1
            RETURNING id, name, email, email_verified, image, role
            "#,
        )
        .bind(user_id)
        .bind(req.name.as_deref())
        .bind(req.image.as_deref())
        .fetch_optional(&self.pool)
        .await
    }
}
