//! 日志工具模块
//!
//! 提供日志初始化以及启动/统计信息的输出

use crate::config::Config;
use crate::orchestrator::RunStats;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化日志
///
/// 优先使用 `RUST_LOG`；未设置时默认 `info`，`verbose` 为 true 时为 `debug`。
/// 重复调用不会 panic。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 趋势仓库日志");
    info!(
        "🌐 语言: {} 个 | 区域: {} 个 | 历史范围: {:?}",
        config.languages.len(),
        config.locales.len(),
        config.history_scope
    );
    if let Some(index) = &config.index_path {
        info!("📚 滚动索引: {}", index);
    }
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &RunStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📦 分区: {}", stats.sections);
    info!("🕸️ 抓取: {}", stats.fetched);
    info!("✅ 新写入: {}", stats.written);
    if stats.indexed > 0 {
        info!("📚 并入索引: {}", stats.indexed);
    }
    if !stats.empty_sources.is_empty() {
        info!("⚠️ 无结果的来源: {}", stats.empty_sources.len());
        for source in &stats.empty_sources {
            info!("   - {}", source);
        }
    }
    info!("{}", "=".repeat(60));
}
