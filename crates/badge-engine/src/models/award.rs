//! 徽章获得记录
//!
//! 引擎唯一会创建的实体；不更新、不删除

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户与徽章的关联记录
///
/// 不变式：每个 (user_id, badge_id) 最多一条
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AwardRecord {
    pub id: String,
    pub user_id: String,
    pub badge_id: String,
    pub earned_at: DateTime<Utc>,
}

/// 待写入的获得记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAwardRecord {
    pub id: String,
    pub user_id: String,
    pub badge_id: String,
    pub earned_at: DateTime<Utc>,
}

impl NewAwardRecord {
    /// 以当前时间创建
    pub fn now(user_id: &str, badge_id: &str) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            badge_id: badge_id.to_string(),
            earned_at: Utc::now(),
        }
    }

    pub fn into_record(self) -> AwardRecord {
        AwardRecord {
            id: self.id,
            user_id: self.user_id,
            badge_id: self.badge_id,
            earned_at: self.earned_at,
        }
    }
}
