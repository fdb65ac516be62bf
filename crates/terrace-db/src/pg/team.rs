//! PostgreSQL team allowlist repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::TeamMemberRow;
use crate::repo::TeamRepository;

/// PostgreSQL team repository
#[derive(Clone)]
pub struct PgTeamRepository {
    pool: PgPool,
}

impl PgTeamRepository {
    /// Create a new team repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PgTeamRepository {
    async fn is_member(&self, email: &str) -> DbResult<bool> {
        let found: Option<(String,)> =
            sqlx::query_as("SELECT email FROM team WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(found.is_some())
    }

    async fn list(&self) -> DbResult<Vec<TeamMemberRow>> {
        let members = sqlx::query_as::<_, TeamMemberRow>(
            "SELECT email, added_at FROM team ORDER BY added_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }
}
