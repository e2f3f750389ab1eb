//! 条件评估器
//!
//! 根据解析后的条件与用户快照判断是否达成，并计算进度。
//! 纯函数，无 I/O。

use serde::Serialize;

use crate::criteria::{CriteriaKind, ParsedCriteria};
use crate::models::UserSnapshot;

/// 单个条件的评估结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub earned: bool,
    /// 当前进度，不封顶，可能超过 max_progress
    pub progress: i64,
    pub max_progress: i64,
}

impl Evaluation {
    fn new(earned: bool, progress: i64, max_progress: i64) -> Self {
        Self {
            earned,
            progress,
            max_progress,
        }
    }

    /// 无法评估的条件
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// 条件评估器
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// 评估条件
    ///
    /// - registration：存在快照即视为已注册
    /// - books_read / streak_days：计数 >= 阈值
    /// - year_goal_percentage：四舍五入后的年度目标完成百分比 >= 阈值；
    ///   年度目标为 0 时视为未达成
    /// - referral：快照中没有邀请计数，始终未达成
    /// - 未知条件：未达成，进度均为 0
    pub fn evaluate(condition: Option<&ParsedCriteria>, snapshot: &UserSnapshot) -> Evaluation {
        let Some(condition) = condition else {
            return Evaluation::unknown();
        };
        let threshold = i64::from(condition.threshold);

        match condition.kind {
            CriteriaKind::Registration => Evaluation::new(true, 1, 1),
            CriteriaKind::BooksRead => {
                let books = i64::from(snapshot.books_read.max(0));
                Evaluation::new(books >= threshold, books, threshold)
            }
            CriteriaKind::StreakDays => {
                let streak = i64::from(snapshot.current_streak.max(0));
                Evaluation::new(streak >= threshold, streak, threshold)
            }
            CriteriaKind::YearGoalPercentage => match Self::goal_percentage(snapshot) {
                Some(pct) => Evaluation::new(pct >= threshold, pct, threshold),
                None => Evaluation::new(false, 0, threshold),
            },
            CriteriaKind::Referral => Evaluation::new(false, 0, threshold),
        }
    }

    /// 年度目标完成百分比，四舍五入（0.5 进位）
    ///
    /// 年度目标不为正数时返回 None
    pub fn goal_percentage(snapshot: &UserSnapshot) -> Option<i64> {
        if snapshot.year_goal <= 0 {
            return None;
        }
        let books = i64::from(snapshot.books_read.max(0));
        let goal = i64::from(snapshot.year_goal);
        // floor(100 * books / goal + 1/2)，整数运算避免浮点误差
        Some((200 * books + goal) / (2 * goal))
    }
}
