//! CLI 模块
//!
//! 提供命令行接口，支持以下功能：
//!
//! - `check` - 检查可获得的徽章（只读）
//! - `award` - 发放所有满足条件的徽章
//! - `read` - 检查阅读类徽章
//! - `register` / `referral` - 注册徽章与邀请徽章
//! - `grant` - 手动发放指定徽章
//! - `progress` - 徽章墙进度
//! - `migrate` - 数据库迁移
//!
//! # 使用示例
//!
//! ```bash
//! # 使用内存夹具数据检查演示用户
//! badge-engine --fixture check demo-user
//!
//! # 手动发放
//! badge-engine grant user-001 badge-read-10 --pretty
//!
//! # 初始化数据库
//! BADGE_DATA_SOURCE=postgres BADGE_DATABASE__URL=postgres://... badge-engine migrate
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands};
pub use runner::CommandRunner;
