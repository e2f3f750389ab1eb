//! 基础设施错误
//!
//! 连接池、迁移与配置加载产生的错误；业务错误定义在引擎 crate 中。

use thiserror::Error;

/// 基础设施错误类型
#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("数据库迁移失败: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, BadgeError>;

impl BadgeError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Database(_) => "DATABASE_ERROR",
            Self::Migration(_) => "MIGRATION_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// 连接类错误可以重试，迁移和配置错误需要人工处理
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = BadgeError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.code(), "DATABASE_ERROR");

        let err = BadgeError::Config(config::ConfigError::NotFound("database.url".to_string()));
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("database.url"));

        let err = BadgeError::from(sqlx::migrate::MigrateError::VersionMissing(1));
        assert_eq!(err.code(), "MIGRATION_ERROR");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_is_retryable() {
        assert!(BadgeError::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!BadgeError::Database(sqlx::Error::RowNotFound).is_retryable());
        assert!(!BadgeError::Config(config::ConfigError::Frozen).is_retryable());
    }
}
