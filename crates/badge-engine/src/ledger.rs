//! 徽章获得账本
//!
//! 保证每个 (user_id, badge_id) 最多一条获得记录。
//!
//! ## 发放流程
//!
//! 1. 按 (user_id, badge_id) 查询已有记录 -> 2. 已存在则直接返回
//!    -> 3. 写入新记录 -> 4. 写入失败（包括唯一约束冲突）记录日志并返回 false
//!
//! 第 1 步和第 3 步之间不是原子的，存储层的唯一约束才是最终保证；
//! 唯一约束冲突按"已持有"处理，不向调用方抛出。

use std::sync::Arc;

use badge_shared::observability::metrics::{self, outcome};
use tracing::{debug, info, warn};

use crate::error::{BadgeError, Result};
use crate::models::{AwardRecord, NewAwardRecord};
use crate::repository::AwardRepositoryTrait;

/// 徽章获得账本
#[derive(Clone)]
pub struct AwardLedger {
    awards: Arc<dyn AwardRepositoryTrait>,
}

impl AwardLedger {
    pub fn new(awards: Arc<dyn AwardRepositoryTrait>) -> Self {
        Self { awards }
    }

    /// 发放徽章
    ///
    /// 仅当本次调用新建了记录时返回 true；已持有或写入失败返回 false。
    /// 任何错误都不会传播给调用方。
    ///
    /// 查询获得记录失败时不再尝试写入，直接返回 false，由下一次检查重试。
    pub async fn award(&self, user_id: &str, badge_id: &str) -> bool {
        match self.awards.find_award(user_id, badge_id).await {
            Ok(Some(_)) => {
                debug!(user_id = %user_id, badge_id = %badge_id, "用户已持有徽章，跳过");
                metrics::record_badge_award(outcome::DUPLICATE);
                return false;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(user_id = %user_id, badge_id = %badge_id, error = %e, "查询获得记录失败");
                metrics::record_badge_award(outcome::FAILED);
                return false;
            }
        }

        match self.award_unchecked(user_id, badge_id).await {
            Ok(Some(_)) => true,
            Ok(None) => false,
            Err(e) => {
                warn!(user_id = %user_id, badge_id = %badge_id, error = %e, "写入获得记录失败");
                false
            }
        }
    }

    /// 跳过存在性检查直接写入
    ///
    /// 调用方已经排除了已持有的徽章时使用。唯一约束冲突返回 `Ok(None)`，
    /// 其他写入失败原样返回，由调用方决定如何汇报。
    pub async fn award_unchecked(&self, user_id: &str, badge_id: &str) -> Result<Option<AwardRecord>> {
        let award = NewAwardRecord::now(user_id, badge_id);

        match self.awards.create_award(&award).await {
            Ok(record) => {
                info!(
                    user_id = %user_id,
                    badge_id = %badge_id,
                    record_id = %record.id,
                    "徽章发放成功"
                );
                metrics::record_badge_award(outcome::AWARDED);
                Ok(Some(record))
            }
            Err(BadgeError::DuplicateAward { .. }) => {
                debug!(user_id = %user_id, badge_id = %badge_id, "唯一约束冲突，视为已持有");
                metrics::record_badge_award(outcome::DUPLICATE);
                Ok(None)
            }
            Err(e) => {
                metrics::record_badge_award(outcome::FAILED);
                Err(e)
            }
        }
    }
}
