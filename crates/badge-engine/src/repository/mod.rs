//! 记录存储访问层
//!
//! ## 设计原则
//!
//! - 仓储只负责数据读写，不包含业务逻辑
//! - PostgreSQL 实现使用 SQLx 运行时查询
//! - 内存夹具实现与 PostgreSQL 实现遵守同样的唯一约束
//! - 定义 trait 接口以支持 mock 测试

mod award_repo;
mod badge_repo;
mod fixture;
mod traits;
mod user_repo;

pub use award_repo::AwardRepository;
pub use badge_repo::BadgeRepository;
pub use fixture::{DEMO_USER_ID, FixtureStore, default_catalog};
pub use traits::*;
pub use user_repo::UserRepository;
