//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

use super::ObservabilityConfig;

/// 徽章发放结果标签
pub mod outcome {
    pub const AWARDED: &str = "awarded";
    pub const DUPLICATE: &str = "duplicate";
    pub const FAILED: &str = "failed";
}

/// Metrics 资源守卫
pub struct MetricsHandle {
    pub addr: SocketAddr,
}

/// 初始化 Prometheus 指标导出
///
/// 在指定端口启动 `/metrics` 抓取端点。
pub fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    register_common_metrics(&config.service_name);
    info!("Metrics exporter listening on {}", addr);

    Ok(MetricsHandle { addr })
}

/// 注册预定义的业务指标
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!(
        "badge_awards_total",
        "Total number of badge award attempts by outcome"
    );
    metrics::describe_counter!(
        "badge_checks_total",
        "Total number of badge checks by scenario"
    );
    metrics::describe_counter!(
        "badge_criteria_unparseable_total",
        "Total number of distinct unparseable criteria strings seen"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

// ============================================================================
// 便捷的指标记录函数
// ============================================================================

/// 记录一次徽章发放尝试
#[inline]
pub fn record_badge_award(outcome: &'static str) {
    metrics::counter!("badge_awards_total", "outcome" => outcome).increment(1);
}

/// 记录一次徽章检查
#[inline]
pub fn record_badge_check(scenario: &'static str) {
    metrics::counter!("badge_checks_total", "scenario" => scenario).increment(1);
}

/// 记录新出现的无法解析的条件字符串
#[inline]
pub fn record_unparseable_criteria() {
    metrics::counter!("badge_criteria_unparseable_total").increment(1);
}
