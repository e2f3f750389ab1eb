//! 仓储 Trait 定义
//!
//! 记录存储以外部协作方的身份出现，服务层只依赖这些接口，
//! 便于切换 PostgreSQL / 内存夹具实现，也便于 mock 测试

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AwardRecord, Badge, NewAwardRecord, UserSnapshot};

/// 徽章目录仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeRepositoryTrait: Send + Sync {
    /// 所有启用的徽章，按 sort_order、name 排序
    ///
    /// criteria 原样返回，按条件筛选统一交给解析器
    async fn list_active_badges(&self) -> Result<Vec<Badge>>;
    async fn get_badge(&self, id: &str) -> Result<Option<Badge>>;
}

/// 用户仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn get_snapshot(&self, user_id: &str) -> Result<Option<UserSnapshot>>;
    /// 状态为 completed 的书籍数
    async fn count_completed_books(&self, user_id: &str) -> Result<i64>;
}

/// 获得记录仓储接口
///
/// 实现必须在存储层保证 (user_id, badge_id) 唯一，
/// 冲突时 create_award 返回 `BadgeError::DuplicateAward`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AwardRepositoryTrait: Send + Sync {
    async fn find_award(&self, user_id: &str, badge_id: &str) -> Result<Option<AwardRecord>>;
    async fn list_badge_ids(&self, user_id: &str) -> Result<Vec<String>>;
    async fn create_award(&self, award: &NewAwardRecord) -> Result<AwardRecord>;
}
