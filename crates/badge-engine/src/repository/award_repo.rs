//! 获得记录仓储
//!
//! user_badges 表上的 (user_id, badge_id) 唯一约束是"至多发放一次"的最终保障

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::AwardRepositoryTrait;
use crate::error::{BadgeError, Result};
use crate::models::{AwardRecord, NewAwardRecord};

/// 获得记录仓储
pub struct AwardRepository {
    pool: PgPool,
}

impl AwardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 唯一约束冲突转为 DuplicateAward
fn map_insert_error(err: sqlx::Error, award: &NewAwardRecord) -> BadgeError {
    let is_unique_violation = err
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation());

    if is_unique_violation {
        BadgeError::DuplicateAward {
            user_id: award.user_id.clone(),
            badge_id: award.badge_id.clone(),
        }
    } else {
        BadgeError::Database(err)
    }
}

#[async_trait]
impl AwardRepositoryTrait for AwardRepository {
    async fn find_award(&self, user_id: &str, badge_id: &str) -> Result<Option<AwardRecord>> {
        let award = sqlx::query_as::<_, AwardRecord>(
            r#"
            SELECT id, user_id, badge_id, earned_at
            FROM user_badges
            WHERE user_id = $1 AND badge_id = $2
            "#,
        )
        .bind(user_id)
        .bind(badge_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(award)
    }

    async fn list_badge_ids(&self, user_id: &str) -> Result<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT badge_id
            FROM user_badges
            WHERE user_id = $1
            ORDER BY earned_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn create_award(&self, award: &NewAwardRecord) -> Result<AwardRecord> {
        let record = sqlx::query_as::<_, AwardRecord>(
            r#"
            INSERT INTO user_badges (id, user_id, badge_id, earned_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, badge_id, earned_at
            "#,
        )
        .bind(&award.id)
        .bind(&award.user_id)
        .bind(&award.badge_id)
        .bind(award.earned_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, award))?;

        Ok(record)
    }
}
