//! 服务层数据传输对象
//!
//! 路由层直接将其序列化为响应体，字段名使用 camelCase

use serde::Serialize;

use crate::models::{AwardRecord, Badge, UserSnapshot};

/// 检查可获得徽章的结果（只读，不发放）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckEarnedResponse {
    pub user: UserSnapshot,
    /// 满足条件且尚未持有的徽章
    pub earned_badges: Vec<Badge>,
    pub total_earned: usize,
}

/// 发放成功的单个徽章
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardedBadge {
    pub badge: Badge,
    pub result: AwardRecord,
}

/// 发放失败的单个徽章
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardFailure {
    pub badge: Badge,
    pub error: String,
}

/// 批量发放结果
///
/// 允许部分成功：`success` 当且仅当 `errors` 为空
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardEarnedResponse {
    pub success: bool,
    pub message: String,
    pub badges_awarded: Vec<AwardedBadge>,
    pub errors: Vec<AwardFailure>,
}

impl AwardEarnedResponse {
    pub fn new(badges_awarded: Vec<AwardedBadge>, errors: Vec<AwardFailure>) -> Self {
        let message = Self::summary(badges_awarded.len(), errors.len());
        Self {
            success: errors.is_empty(),
            message,
            badges_awarded,
            errors,
        }
    }

    fn summary(awarded: usize, failed: usize) -> String {
        if awarded == 0 && failed == 0 {
            return "No new badges to award".to_string();
        }
        let mut message = format!("Awarded {} badges", awarded);
        if failed > 0 {
            message.push_str(&format!(", {} failed", failed));
        }
        message
    }
}
