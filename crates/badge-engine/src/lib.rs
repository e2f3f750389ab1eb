//! 阅读徽章引擎
//!
//! 阅读打卡小程序的成就系统：根据用户的阅读数据判断可获得的徽章，
//! 并保证每个用户对每个徽章最多获得一次。
//!
//! ## 核心功能
//!
//! - **条件解析**：将徽章上的条件字符串（如 `read_10`）解析为类型和阈值
//! - **条件评估**：根据用户快照判断是否达成并计算进度
//! - **获得账本**：先查后写，存储层唯一约束兜底，重复发放视为无操作
//! - **徽章检查**：读完书后的附带检查、只读检查、批量发放、注册/邀请徽章
//! - **徽章墙进度**：与发放路径共用同一套解析和评估逻辑
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `criteria`: 条件解析与描述
//! - `evaluator`: 条件评估
//! - `ledger`: 获得账本
//! - `repository`: 记录存储访问层（PostgreSQL / 内存夹具）
//! - `data_source`: 数据源注入
//! - `service`: 业务服务层
//! - `progress`: 徽章墙进度
//! - `cli`: 命令行入口

pub mod cli;
pub mod criteria;
pub mod data_source;
pub mod error;
pub mod evaluator;
pub mod ledger;
pub mod models;
pub mod progress;
pub mod repository;
pub mod service;

pub use criteria::{CriteriaKind, ParsedCriteria, describe, is_valid, parse_lenient, presets};
pub use data_source::DataSource;
pub use error::{BadgeError, Result};
pub use evaluator::{ConditionEvaluator, Evaluation};
pub use ledger::AwardLedger;
pub use models::*;
pub use progress::{BadgeProgress, badge_progress};
pub use repository::{FixtureStore, default_catalog};
pub use service::{BadgeCheckService, dto};
