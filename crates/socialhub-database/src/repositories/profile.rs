//! Profile lookups on PostgreSQL.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use socialhub_core::error::{AppError, ErrorKind};
use socialhub_core::result::AppResult;
use socialhub_core::types::UserId;
use socialhub_entity::ProfileSummary;

use crate::store::ProfileDirectory;

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: String,
    user_name: String,
    full_name: String,
    profile_img: Option<String>,
}

/// [`ProfileDirectory`] reading the `users` table.
#[derive(Debug, Clone)]
pub struct PgProfileDirectory {
    pool: PgPool,
}

impl PgProfileDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileDirectory for PgProfileDirectory {
    async fn find_summary(&self, user_id: &UserId) -> AppResult<Option<ProfileSummary>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, user_name, full_name, profile_img FROM users WHERE id = $1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find profile", e))?;

        row.map(|row| {
            Ok(ProfileSummary {
                user_id: UserId::parse(&row.id)?,
                display_name: row.full_name,
                handle: row.user_name,
                avatar_url: row.profile_img.filter(|url| !url.is_empty()),
            })
        })
        .transpose()
    }
}
