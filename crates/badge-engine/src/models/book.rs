//! 用户书单条目

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 书籍阅读状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum BookStatus {
    /// 计划阅读
    #[default]
    Planned,
    /// 正在阅读
    Reading,
    /// 已读完
    Completed,
}

/// 用户书单中的一本书
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserBook {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub status: BookStatus,
    pub updated_at: DateTime<Utc>,
}
