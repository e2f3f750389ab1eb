//! 命令执行器
//!
//! 按配置构造数据源并注入 [`BadgeCheckService`]，
//! 再把各子命令的结果以 JSON 输出到标准输出。

use anyhow::{Result, bail};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use badge_shared::config::{AppConfig, DataSourceKind};
use badge_shared::database::Database;

use crate::cli::Commands;
use crate::data_source::DataSource;
use crate::repository::FixtureStore;
use crate::service::BadgeCheckService;

/// 命令执行器
pub struct CommandRunner {
    service: BadgeCheckService,
    database: Option<Database>,
    pretty: bool,
}

impl CommandRunner {
    /// 按配置创建执行器
    ///
    /// `force_fixture` 为 true 时忽略配置，使用内存夹具数据
    pub async fn connect(config: &AppConfig, force_fixture: bool, pretty: bool) -> Result<Self> {
        let kind = if force_fixture {
            DataSourceKind::Fixture
        } else {
            config.data_source
        };
        info!(data_source = %kind, "初始化数据源");
        if kind == DataSourceKind::Fixture && config.is_production() {
            warn!("生产环境正在使用内存夹具数据，写入不会持久化");
        }

        let (source, database) = match kind {
            DataSourceKind::Fixture => (
                DataSource::fixture(FixtureStore::with_default_catalog()),
                None,
            ),
            DataSourceKind::Postgres => {
                let db = Database::connect(&config.database).await?;
                (DataSource::postgres(db.pool().clone()), Some(db))
            }
        };

        Ok(Self {
            service: BadgeCheckService::new(source),
            database,
            pretty,
        })
    }

    /// 执行子命令
    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Check { user_id } => {
                let result = self.service.check_earned_badges(&user_id).await?;
                self.print(&result)
            }
            Commands::Award { user_id } => {
                let result = self.service.award_earned_badges(&user_id).await?;
                self.print(&result)
            }
            Commands::Read { user_id } => {
                let awarded = self.service.check_read_badges(&user_id).await?;
                self.print(&json!({ "userId": user_id, "awarded": awarded }))
            }
            Commands::Register { user_id } => {
                let awarded = self.service.award_registration_badge(&user_id).await;
                self.print(&json!({ "userId": user_id, "awarded": awarded }))
            }
            Commands::Referral { user_id } => {
                let awarded = self.service.award_referral_badge(&user_id).await;
                self.print(&json!({ "userId": user_id, "awarded": awarded }))
            }
            Commands::Grant { user_id, badge_id } => {
                let awarded = self.service.award_badge(&user_id, &badge_id).await?;
                self.print(&json!({ "userId": user_id, "badgeId": badge_id, "awarded": awarded }))
            }
            Commands::Progress { user_id } => {
                let progress = self.service.badge_progress(&user_id).await?;
                self.print(&progress)
            }
            Commands::Migrate => self.run_migrate().await,
        }
    }

    async fn run_migrate(&self) -> Result<()> {
        let Some(db) = &self.database else {
            bail!("migrate 仅支持 postgres 数据源");
        };
        db.run_migrations().await?;
        info!("数据库迁移完成");
        Ok(())
    }

    /// 释放数据库连接
    pub async fn shutdown(self) {
        if let Some(db) = self.database {
            db.close().await;
        }
    }

    fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        let output = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{}", output);
        Ok(())
    }
}
