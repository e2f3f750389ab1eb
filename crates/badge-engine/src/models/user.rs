//! 用户快照

use serde::{Deserialize, Serialize};

/// 评估时刻读取的用户计数器
///
/// 每次评估都重新读取，不做缓存
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    pub id: String,
    /// 已读完书籍数（权威计数）
    pub books_read: i32,
    /// 连续阅读天数
    pub current_streak: i32,
    /// 年度阅读目标
    pub year_goal: i32,
}

impl UserSnapshot {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            books_read: 0,
            current_streak: 0,
            year_goal: 12,
        }
    }

    pub fn with_books_read(mut self, books_read: i32) -> Self {
        self.books_read = books_read;
        self
    }

    pub fn with_streak(mut self, current_streak: i32) -> Self {
        self.current_streak = current_streak;
        self
    }

    pub fn with_year_goal(mut self, year_goal: i32) -> Self {
        self.year_goal = year_goal;
        self
    }
}
