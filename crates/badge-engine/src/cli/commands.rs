//! CLI 命令定义
//!
//! 使用 clap derive 宏定义命令行接口结构。
//! 每个子命令对应 [`crate::BadgeCheckService`] 的一个入口。

use clap::{Parser, Subcommand};

/// 阅读徽章引擎命令行工具
///
/// 数据源默认取配置中的 `data_source`，`--fixture` 强制使用内存夹具数据。
#[derive(Parser, Debug)]
#[command(name = "badge-engine")]
#[command(version, about = "阅读徽章引擎工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 使用内置的内存夹具数据（默认目录 + demo-user）
    #[arg(long, global = true)]
    pub fixture: bool,

    /// 以缩进格式输出 JSON
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 检查当前满足条件且尚未持有的徽章（不发放）
    Check {
        /// 用户 ID
        user_id: String,
    },

    /// 发放所有满足条件的徽章
    Award {
        /// 用户 ID
        user_id: String,
    },

    /// 按已读完书籍数检查阅读类徽章
    Read {
        /// 用户 ID
        user_id: String,
    },

    /// 发放注册徽章
    Register {
        /// 用户 ID
        user_id: String,
    },

    /// 发放邀请徽章（用户分享时调用）
    Referral {
        /// 用户 ID
        user_id: String,
    },

    /// 手动发放指定徽章
    Grant {
        /// 用户 ID
        user_id: String,

        /// 徽章 ID
        badge_id: String,
    },

    /// 输出徽章墙进度
    Progress {
        /// 用户 ID
        user_id: String,
    },

    /// 执行数据库迁移（仅 PostgreSQL 数据源）
    Migrate,
}
