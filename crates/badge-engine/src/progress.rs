//! 徽章墙进度
//!
//! 为展示层计算每个徽章的达成情况与进度，与发放路径使用同一个评估器。

use std::collections::HashSet;

use serde::Serialize;

use crate::criteria::{describe_condition, parse_lenient};
use crate::evaluator::ConditionEvaluator;
use crate::models::{Badge, UserSnapshot};

/// 单个徽章的展示进度
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeProgress {
    pub badge: Badge,
    /// 条件的用户可读描述
    pub description: String,
    /// 是否满足条件
    pub earned: bool,
    pub progress: i64,
    pub max_progress: i64,
    /// 是否已持有
    pub held: bool,
}

/// 计算徽章墙进度
///
/// 条件解析兼容旧版自由文本，顺序与传入的徽章顺序一致
pub fn badge_progress(
    badges: &[Badge],
    snapshot: &UserSnapshot,
    held_badge_ids: &HashSet<String>,
) -> Vec<BadgeProgress> {
    badges
        .iter()
        .map(|badge| {
            let condition = parse_lenient(&badge.criteria);
            let evaluation = ConditionEvaluator::evaluate(condition.as_ref(), snapshot);
            BadgeProgress {
                badge: badge.clone(),
                description: describe_condition(&badge.criteria, condition.as_ref()),
                earned: evaluation.earned,
                progress: evaluation.progress,
                max_progress: evaluation.max_progress,
                held: held_badge_ids.contains(&badge.id),
            }
        })
        .collect()
}
