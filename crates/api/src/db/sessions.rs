//! Vendor session repository for database operations.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use megashop_core::{SessionId, VendorId};

use super::{RepositoryError, bounded, conflict_on_unique};
use crate::models::{NewSession, Session};
use crate::store::SessionStore;

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: SessionId,
    vendor_id: VendorId,
    token_hash: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(r: SessionRow) -> Self {
        Self {
            id: r.id,
            vendor_id: r.vendor_id,
            token_hash: r.token_hash,
            expires_at: r.expires_at,
            created_at: r.created_at,
        }
    }
}

/// Repository for vendor session database operations.
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
    timeout: Duration,
}

impl SessionRepository {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn insert(&self, session: NewSession) -> Result<Session, RepositoryError> {
        bounded(self.timeout, async {
            // Plain INSERT: a digest collision must fail, never replace a live session
            let row = sqlx::query_as::<_, SessionRow>(
                "INSERT INTO vendor_session (id, vendor_id, token_hash, expires_at) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, vendor_id, token_hash, expires_at, created_at",
            )
            .bind(session.id)
            .bind(session.vendor_id)
            .bind(&session.token_hash)
            .bind(session.expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "session token"))?;

            Ok(row.into())
        })
        .await
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Session>, RepositoryError> {
        bounded(self.timeout, async {
            let row = sqlx::query_as::<_, SessionRow>(
                "SELECT id, vendor_id, token_hash, expires_at, created_at \
                 FROM vendor_session WHERE token_hash = $1",
            )
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await?;

            Ok(row.map(Session::from))
        })
        .await
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        bounded(self.timeout, async {
            let result = sqlx::query("DELETE FROM vendor_session WHERE token_hash = $1")
                .bind(token_hash)
                .execute(&self.pool)
                .await?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        bounded(self.timeout, async {
            let result = sqlx::query("DELETE FROM vendor_session WHERE expires_at <= $1")
                .bind(now)
                .execute(&self.pool)
                .await?;

            Ok(result.rows_affected())
        })
        .await
    }
}
