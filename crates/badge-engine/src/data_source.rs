//! 数据源
//!
//! 将三个仓储打包为一个值，在构造服务时注入。
//! PostgreSQL 与内存夹具两种实现可互换，不存在进程级开关。

use std::sync::Arc;

use badge_shared::config::DataSourceKind;
use sqlx::PgPool;

use crate::repository::{
    AwardRepository, AwardRepositoryTrait, BadgeRepository, BadgeRepositoryTrait, FixtureStore,
    UserRepository, UserRepositoryTrait,
};

/// 记录存储的访问入口
#[derive(Clone)]
pub struct DataSource {
    pub badges: Arc<dyn BadgeRepositoryTrait>,
    pub users: Arc<dyn UserRepositoryTrait>,
    pub awards: Arc<dyn AwardRepositoryTrait>,
    kind: DataSourceKind,
}

impl DataSource {
    pub fn new(
        badges: Arc<dyn BadgeRepositoryTrait>,
        users: Arc<dyn UserRepositoryTrait>,
        awards: Arc<dyn AwardRepositoryTrait>,
        kind: DataSourceKind,
    ) -> Self {
        Self {
            badges,
            users,
            awards,
            kind,
        }
    }

    /// PostgreSQL 数据源
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(BadgeRepository::new(pool.clone())),
            Arc::new(UserRepository::new(pool.clone())),
            Arc::new(AwardRepository::new(pool)),
            DataSourceKind::Postgres,
        )
    }

    /// 内存夹具数据源，三个仓储共享同一份数据
    pub fn fixture(store: FixtureStore) -> Self {
        Self::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
            DataSourceKind::Fixture,
        )
    }

    pub fn kind(&self) -> DataSourceKind {
        self.kind
    }
}
