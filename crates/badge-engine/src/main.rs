//! 阅读徽章引擎命令行入口

use anyhow::Result;
use badge_shared::{config::AppConfig, observability};
use clap::Parser;

use badge_engine::cli::{Cli, CommandRunner};

const SERVICE_NAME: &str = "badge-engine";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 1. 加载配置：config/ 目录 + BADGE_ 前缀环境变量
    let config = AppConfig::load(SERVICE_NAME).unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig {
            service_name: SERVICE_NAME.to_string(),
            ..AppConfig::default()
        }
    });

    // 2. 初始化可观测性，guard 需存活到进程结束
    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config)?;

    // 3. 构造数据源并执行命令
    let runner = CommandRunner::connect(&config, cli.fixture, cli.pretty).await?;
    let result = runner.run(cli.command).await;
    runner.shutdown().await;

    result
}
