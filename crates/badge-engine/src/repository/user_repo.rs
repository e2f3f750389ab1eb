//! 用户仓储

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::UserRepositoryTrait;
use crate::error::Result;
use crate::models::{BookStatus, UserSnapshot};

/// 用户仓储
///
/// 读取用户计数器快照与书单统计
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn get_snapshot(&self, user_id: &str) -> Result<Option<UserSnapshot>> {
        let snapshot = sqlx::query_as::<_, UserSnapshot>(
            r#"
            SELECT id, books_read, current_streak, year_goal
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(snapshot)
    }

    async fn count_completed_books(&self, user_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM user_books
            WHERE user_id = $1 AND status = $2
            "#,
        )
        .bind(user_id)
        .bind(BookStatus::Completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
