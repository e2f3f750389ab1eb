//! 徽章获取条件
//!
//! 条件以字符串形式存储在徽章上，是与徽章配置工具之间的约定格式：
//!
//! | 字符串 | 类型 | 阈值 |
//! |---|---|---|
//! | `registration` | Registration | 1 |
//! | `read_N` | BooksRead | N |
//! | `referral_N` | Referral | N |
//! | `streak_N` | StreakDays | N |
//! | `goal_N` | YearGoalPercentage | N |
//!
//! 不符合以上格式的条件不会报错，只是永远不会被满足。
//! 服务端发放与前端进度展示共用本模块，避免两套语法逐渐分叉。

mod describe;
mod diagnostics;
mod parser;

use serde::{Deserialize, Serialize};

pub use describe::describe;
pub(crate) use describe::describe_condition;
pub use diagnostics::WarnOnce;
pub use parser::{is_valid, parse_lenient};

/// 条件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriteriaKind {
    /// 注册即获得
    Registration,
    /// 读完 N 本书
    BooksRead,
    /// 邀请 N 位好友
    Referral,
    /// 连续阅读 N 天
    StreakDays,
    /// 完成年度目标的 N%
    YearGoalPercentage,
}

impl CriteriaKind {
    /// 条件字符串前缀（registration 没有数字后缀）
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::BooksRead => "read",
            Self::Referral => "referral",
            Self::StreakDays => "streak",
            Self::YearGoalPercentage => "goal",
        }
    }

    pub fn all() -> [CriteriaKind; 5] {
        [
            Self::Registration,
            Self::BooksRead,
            Self::Referral,
            Self::StreakDays,
            Self::YearGoalPercentage,
        ]
    }
}

/// 解析后的条件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedCriteria {
    pub kind: CriteriaKind,
    pub threshold: u32,
}

impl ParsedCriteria {
    pub fn new(kind: CriteriaKind, threshold: u32) -> Self {
        // registration 的阈值固定为 1
        let threshold = match kind {
            CriteriaKind::Registration => 1,
            _ => threshold,
        };
        Self { kind, threshold }
    }

    pub fn registration() -> Self {
        Self::new(CriteriaKind::Registration, 1)
    }

    pub fn books_read(threshold: u32) -> Self {
        Self::new(CriteriaKind::BooksRead, threshold)
    }

    pub fn referral(threshold: u32) -> Self {
        Self::new(CriteriaKind::Referral, threshold)
    }

    pub fn streak_days(threshold: u32) -> Self {
        Self::new(CriteriaKind::StreakDays, threshold)
    }

    pub fn year_goal_percentage(threshold: u32) -> Self {
        Self::new(CriteriaKind::YearGoalPercentage, threshold)
    }

    /// 按严格语法解析，无法识别时返回 None
    pub fn parse(criteria: &str) -> Option<Self> {
        parser::parse(criteria)
    }

    /// 生成条件字符串，与 [`ParsedCriteria::parse`] 互逆
    pub fn format(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for ParsedCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            CriteriaKind::Registration => f.write_str(self.kind.prefix()),
            _ => write!(f, "{}_{}", self.kind.prefix(), self.threshold),
        }
    }
}

/// 标准徽章目录使用的条件预设
pub mod presets {
    pub const REGISTRATION: &str = "registration";
    pub const FIRST_BOOK: &str = "read_1";
    pub const BOOKS_10: &str = "read_10";
    pub const BOOKS_20: &str = "read_20";
    pub const BOOKS_50: &str = "read_50";
    pub const BOOKS_100: &str = "read_100";
    pub const FIRST_REFERRAL: &str = "referral_1";
    pub const STREAK_7_DAYS: &str = "streak_7";
    pub const STREAK_30_DAYS: &str = "streak_30";
    pub const GOAL_50_PERCENT: &str = "goal_50";
    pub const GOAL_100_PERCENT: &str = "goal_100";

    pub const ALL: [&str; 11] = [
        REGISTRATION,
        FIRST_BOOK,
        BOOKS_10,
        BOOKS_20,
        BOOKS_50,
        BOOKS_100,
        FIRST_REFERRAL,
        STREAK_7_DAYS,
        STREAK_30_DAYS,
        GOAL_50_PERCENT,
        GOAL_100_PERCENT,
    ];
}
