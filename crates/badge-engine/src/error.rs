//! 徽章引擎错误类型
//!
//! 定义服务层的业务错误和系统错误

use thiserror::Error;

/// 徽章引擎错误类型
#[derive(Debug, Error)]
pub enum BadgeError {
    // === 业务错误 ===
    #[error("用户不存在: {0}")]
    UserNotFound(String),

    #[error("徽章不存在或未启用: {0}")]
    BadgeNotFound(String),

    #[error("用户已持有徽章: user_id={user_id}, badge_id={badge_id}")]
    DuplicateAward { user_id: String, badge_id: String },

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("记录存储不可用: {0}")]
    StoreUnavailable(String),

    #[error("JSON 序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 徽章引擎 Result 类型别名
pub type Result<T> = std::result::Result<T, BadgeError>;

impl BadgeError {
    /// 检查是否为可重试的错误
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::StoreUnavailable(_))
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::BadgeNotFound(_) | Self::DuplicateAward { .. }
        )
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::BadgeNotFound(_) => "BADGE_NOT_FOUND",
            Self::DuplicateAward { .. } => "DUPLICATE_AWARD",
            Self::Database(_) => "DATABASE_ERROR",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
